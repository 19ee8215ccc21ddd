use egui::{Align, Color32, Key, Layout, RichText, TextEdit};

use crate::font_icon;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading(String),
    Loaded { repository: String, cards: usize },
    Failed(String),
}

impl Status {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(..))
    }

    fn show(&self, ui: &mut egui::Ui) {
        match self {
            Self::Idle => ui.weak("showing the bundled cards"),
            Self::Loading(url) => ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!("loading {url}"))
            })
            .inner,
            Self::Loaded { repository, cards } => {
                ui.label(format!("{repository}: {cards} contributors"))
            }
            Self::Failed(err) => ui.label(RichText::new(err).color(Color32::LIGHT_RED)),
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RepoAction {
    Load(String),
    Reset,
}

pub struct RepoBar<'a> {
    repo_url: &'a mut String,
    status: &'a Status,
    show_logs: &'a mut bool,
    action: &'a mut Option<RepoAction>,
}

impl<'a> RepoBar<'a> {
    pub fn new(
        repo_url: &'a mut String,
        status: &'a Status,
        show_logs: &'a mut bool,
        action: &'a mut Option<RepoAction>,
    ) -> Self {
        Self {
            repo_url,
            status,
            show_logs,
            action,
        }
    }
}

impl<'a> egui::Widget for RepoBar<'a> {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        ui.horizontal(|ui| {
            let resp = ui.add(
                TextEdit::singleline(self.repo_url)
                    .hint_text("https://github.com/owner/repo")
                    .desired_width(320.0),
            );
            let submitted = resp.lost_focus() && ui.input().key_pressed(Key::Enter);

            let loading = self.status.is_loading();
            let load = ui
                .add_enabled(!loading, egui::Button::new("Load"))
                .on_hover_text("Fetch the repository's contributors");

            if (submitted || load.clicked()) && !loading {
                let url = self.repo_url.trim().to_string();
                if !url.is_empty() {
                    self.action.replace(RepoAction::Load(url));
                }
            }

            if ui
                .button(font_icon::RESET)
                .on_hover_text("Back to the bundled cards")
                .clicked()
            {
                self.action.replace(RepoAction::Reset);
            }

            self.status.show(ui);

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.toggle_value(self.show_logs, font_icon::LOGS)
                    .on_hover_text("Toggle the log window (F12)");
            });
        })
        .response
    }
}
