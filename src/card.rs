use egui::Color32;

use crate::activity::ContributorFigure;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Forge,
    Compass,
    Sentinel,
    Catalyst,
    Anchor,
    Parasite,
    #[default]
    Common,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color32,
    pub secondary: Color32,
    pub accent: Color32,
}

impl Role {
    pub const ALL: [Self; 7] = [
        Self::Forge,
        Self::Compass,
        Self::Sentinel,
        Self::Catalyst,
        Self::Anchor,
        Self::Parasite,
        Self::Common,
    ];

    pub const fn palette(&self) -> Palette {
        const fn palette(primary: [u8; 3], secondary: [u8; 3], accent: [u8; 3]) -> Palette {
            Palette {
                primary: Color32::from_rgb(primary[0], primary[1], primary[2]),
                secondary: Color32::from_rgb(secondary[0], secondary[1], secondary[2]),
                accent: Color32::from_rgb(accent[0], accent[1], accent[2]),
            }
        }

        match self {
            Self::Forge => palette([0xBD, 0x71, 0x20], [0xD4, 0x84, 0x2A], [0xE6, 0xA0, 0x50]),
            Self::Compass => palette([0x36, 0xAE, 0x96], [0x2E, 0x9B, 0x85], [0x4F, 0xC0, 0xA8]),
            Self::Sentinel => palette([0x64, 0x39, 0x73], [0x7A, 0x4A, 0x8A], [0x8E, 0x5C, 0xA0]),
            Self::Catalyst => palette([0x56, 0xA1, 0x3E], [0x4A, 0x8F, 0x35], [0x68, 0xB5, 0x54]),
            Self::Anchor => palette([0xAE, 0xAE, 0xAE], [0x9A, 0x9A, 0x9A], [0xC2, 0xC2, 0xC2]),
            Self::Parasite => palette([0xA7, 0x37, 0x3C], [0x91, 0x2F, 0x34], [0xB8, 0x46, 0x4C]),
            Self::Common => palette([0x80, 0x80, 0x80], [0x6B, 0x6B, 0x6B], [0x99, 0x99, 0x99]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselItem {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub badge: Option<String>,
    pub footer: Option<String>,
    pub role: Role,
    /// Opened by the call to action on the detailed face.
    pub link: Option<String>,
    /// Painted across the upper part of the front face once fetched.
    pub image: Option<String>,
    #[serde(alias = "backContent")]
    pub back: Option<BackContent>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackContent {
    pub heading: Option<String>,
    pub description: Option<String>,
    pub stats: Vec<Stat>,
    pub tags: Vec<String>,
    pub cta_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Stat {
    pub label: String,
    pub value: String,
}

impl Stat {
    pub fn new(label: impl ToString, value: impl ToString) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

impl CarouselItem {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Title")
    }

    pub fn subtitle(&self) -> &str {
        self.subtitle.as_deref().unwrap_or("Subtitle")
    }

    pub fn heading(&self) -> &str {
        self.back
            .as_ref()
            .and_then(|back| back.heading.as_deref())
            .or(self.title.as_deref())
            .unwrap_or("Details")
    }

    pub fn description(&self) -> &str {
        self.back
            .as_ref()
            .and_then(|back| back.description.as_deref())
            .unwrap_or("Hover to explore more about this item.")
    }

    pub fn cta_text(&self) -> &str {
        self.back
            .as_ref()
            .and_then(|back| back.cta_text.as_deref())
            .unwrap_or("Learn More")
    }

    /// Builds a card for a contributor, `rank` picks the role colors.
    pub fn from_figure(figure: &ContributorFigure, rank: usize) -> Self {
        Self {
            title: Some(figure.username.clone()),
            subtitle: Some(format!("{} commits", figure.total_commits)),
            badge: (rank == 0).then(|| "Top contributor".to_string()),
            footer: Some(format!("#{}", rank + 1)),
            role: Role::ALL[rank % Role::ALL.len()],
            link: Some(format!("https://github.com/{}", figure.username)),
            image: Some(format!("https://github.com/{}.png", figure.username)),
            back: Some(BackContent {
                heading: Some(figure.username.clone()),
                description: Some(format!(
                    "Active in {} weeks of the repository's history.",
                    figure.active_weeks
                )),
                stats: vec![
                    Stat::new("Commits", figure.total_commits),
                    Stat::new("Weeks", figure.active_weeks),
                    Stat::new("Added", format!("+{}", figure.additions)),
                    Stat::new("Removed", format!("-{}", figure.deletions)),
                ],
                tags: vec![],
                cta_text: Some("View profile".to_string()),
            }),
        }
    }
}

/// Which side of a card the viewer sees.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Face {
    Front,
    /// Ambient back, shown while the ring turns.
    SimpleBack,
    DetailedBack,
}

impl Face {
    /// `facing` is whether the card's front points at the viewer after any flip.
    pub const fn resolve(facing: bool, revealed: bool) -> Self {
        match (facing, revealed) {
            (true, _) => Self::Front,
            (false, true) => Self::DetailedBack,
            (false, false) => Self::SimpleBack,
        }
    }
}

/// Tap-to-flip toggle for one card.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CardFlip {
    flipped: bool,
}

impl CardFlip {
    pub const fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Drops the toggle once the card may no longer flip.
    pub fn sync(&mut self, can_flip: bool) {
        if !can_flip {
            self.flipped = false;
        }
    }

    pub fn tap(&mut self, can_flip: bool) {
        if can_flip {
            self.flipped = !self.flipped;
        }
    }

    /// Whether the detailed face should be turned toward the viewer.
    pub const fn revealed(&self, can_flip: bool, hovered: bool) -> bool {
        can_flip && (hovered || self.flipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_needs_can_flip() {
        let mut flip = CardFlip::default();
        flip.tap(false);
        assert!(!flip.is_flipped());
        assert!(!flip.revealed(false, true));

        flip.tap(true);
        assert!(flip.is_flipped());
        assert!(flip.revealed(true, false));
        assert!(!flip.revealed(false, false));

        flip.tap(true);
        assert!(!flip.is_flipped());
        assert!(flip.revealed(true, true));
    }

    #[test]
    fn flip_is_cleared_when_card_leaves() {
        let mut flip = CardFlip::default();
        flip.tap(true);
        flip.sync(true);
        assert!(flip.is_flipped());

        flip.sync(false);
        assert!(!flip.is_flipped());

        // coming back to the front doesn't bring the detail back
        flip.sync(true);
        assert!(!flip.revealed(true, false));
    }

    #[test]
    fn faces() {
        assert_eq!(Face::resolve(true, false), Face::Front);
        assert_eq!(Face::resolve(true, true), Face::Front);
        assert_eq!(Face::resolve(false, false), Face::SimpleBack);
        assert_eq!(Face::resolve(false, true), Face::DetailedBack);
    }

    #[test]
    fn item_fallbacks() {
        let item = CarouselItem::default();
        assert_eq!(item.title(), "Title");
        assert_eq!(item.subtitle(), "Subtitle");
        assert_eq!(item.heading(), "Details");
        assert_eq!(item.cta_text(), "Learn More");

        let item = CarouselItem {
            title: Some("Forest Trail".into()),
            ..Default::default()
        };
        assert_eq!(item.heading(), "Forest Trail");
    }

    #[test]
    fn item_from_yaml() {
        let item: CarouselItem = serde_yaml::from_str(
            r#"
            title: Lake View
            role: compass
            back:
              heading: Serene Lake View
              stats:
                - { label: Depth, value: 45m }
              ctaText: Book Stay
            "#,
        )
        .unwrap();

        assert_eq!(item.role, Role::Compass);
        assert_eq!(item.subtitle, None);
        let back = item.back.as_ref().unwrap();
        assert_eq!(back.stats, vec![Stat::new("Depth", "45m")]);
        assert_eq!(item.cta_text(), "Book Stay");
        assert!(back.tags.is_empty());
        assert_eq!(item.image, None);
    }

    #[test]
    fn item_with_back_content_key() {
        let item: CarouselItem = serde_yaml::from_str(
            r#"
            title: Desert Dunes
            image: https://images.unsplash.com/photo-1509316785289-025f5b846b35
            backContent:
              heading: Golden Desert
              tags: [Adventure, Sunset]
            "#,
        )
        .unwrap();

        assert_eq!(item.heading(), "Golden Desert");
        assert_eq!(item.back.as_ref().unwrap().tags, vec!["Adventure", "Sunset"]);
        assert_eq!(
            item.image.as_deref(),
            Some("https://images.unsplash.com/photo-1509316785289-025f5b846b35")
        );
    }

    #[test]
    fn contributor_card() {
        let figure = ContributorFigure {
            username: "octocat".into(),
            total_commits: 42,
            active_weeks: 7,
            additions: 1200,
            deletions: 300,
        };

        let top = CarouselItem::from_figure(&figure, 0);
        assert_eq!(top.title(), "octocat");
        assert_eq!(top.badge.as_deref(), Some("Top contributor"));
        assert_eq!(top.role, Role::Forge);
        assert_eq!(top.link.as_deref(), Some("https://github.com/octocat"));
        assert_eq!(top.image.as_deref(), Some("https://github.com/octocat.png"));
        assert!(top
            .back
            .as_ref()
            .unwrap()
            .stats
            .contains(&Stat::new("Removed", "-300")));

        let later = CarouselItem::from_figure(&figure, 8);
        assert_eq!(later.badge, None);
        assert_eq!(later.role, Role::Compass);
    }
}
