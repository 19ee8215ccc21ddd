use std::cmp::Reverse;

use egui::{CentralPanel, Key, TopBottomPanel};

use crate::{
    logger::Record,
    widgets::{Carousel, CarouselState, LogWindow, RepoAction, RepoBar, Status},
    CarouselConfig, CarouselItem, EnvConfig, FetchResult, ImageFetcher, RelayFetcher,
};

pub struct App {
    carousel_config: CarouselConfig,
    carousel: CarouselState,
    fetcher: RelayFetcher,
    images: ImageFetcher,

    repo_url: String,
    status: Status,

    logs: flume::Receiver<Record>,
    log_window: LogWindow,
    show_logs: bool,
}

impl App {
    pub const REPO_URL_KEY: &'static str = "spinstats_repo_url";

    pub fn new(
        context: egui::Context,
        config: &EnvConfig,
        carousel_config: CarouselConfig,
        logs: flume::Receiver<Record>,
        repo_url: String,
    ) -> Self {
        Self {
            carousel: CarouselState::new(&carousel_config),
            carousel_config,
            fetcher: RelayFetcher::new(&config.relay_url, context.clone()),
            images: ImageFetcher::new(context),
            repo_url,
            status: Status::default(),
            logs,
            log_window: LogWindow::with_caps(200, 200, 500, 500, 500),
            show_logs: false,
        }
    }

    fn apply(&mut self, action: RepoAction) {
        match action {
            RepoAction::Load(url) => {
                log::info!("loading {url}");
                self.status = Status::Loading(url.clone());
                self.fetcher.fetch(url);
            }
            RepoAction::Reset => {
                self.carousel.set_items(self.carousel_config.items.clone());
                self.status = Status::Idle;
            }
        }
    }

    fn try_fetch(&mut self) {
        let (url, result) = match self.fetcher.try_next() {
            Some(item) => item,
            _ => return,
        };

        self.status = Self::loaded(&mut self.carousel, &url, result);
    }

    fn try_fetch_image(&mut self) {
        for url in self.carousel.wanted_images() {
            self.images.fetch(url);
        }

        let (url, data) = match self.images.try_next() {
            Some(item) => item,
            _ => return,
        };

        self.carousel.add_image(url, data);
    }

    fn loaded(carousel: &mut CarouselState, url: &str, result: FetchResult) -> Status {
        let mut activity = match result {
            Ok(activity) => activity,
            Err(err) => return Status::Failed(err),
        };

        if activity.figures.is_empty() {
            log::warn!("{url} has no contributor stats yet");
            return Status::Failed(format!(
                "{}: no contributor stats available yet",
                activity.repository
            ));
        }

        activity
            .figures
            .sort_by_key(|figure| Reverse(figure.total_commits));

        let items = activity
            .figures
            .iter()
            .enumerate()
            .map(|(rank, figure)| CarouselItem::from_figure(figure, rank))
            .collect::<Vec<_>>();

        let cards = items.len();
        carousel.set_items(items);

        Status::Loaded {
            repository: activity.repository,
            cards,
        }
    }

    fn try_handle_key_press(&mut self, ctx: &egui::Context) {
        if ctx.input().key_pressed(Key::F12) {
            self.show_logs = !self.show_logs
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.log_window.drain(&self.logs);
        self.try_fetch();
        self.try_fetch_image();
        self.try_handle_key_press(ctx);

        let mut action = None;
        TopBottomPanel::top("repo_bar").show(ctx, |ui| {
            ui.add(RepoBar::new(
                &mut self.repo_url,
                &self.status,
                &mut self.show_logs,
                &mut action,
            ))
        });

        if let Some(action) = action {
            self.apply(action);
        }

        CentralPanel::default().show(ctx, |ui| ui.add(Carousel::new(&mut self.carousel)));

        self.log_window.display(&mut self.show_logs, ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        storage.set_string(Self::REPO_URL_KEY, self.repo_url.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ContributorFigure, RepoActivity};

    fn figure(username: &str, total_commits: u64) -> ContributorFigure {
        ContributorFigure {
            username: username.into(),
            total_commits,
            active_weeks: 1,
            additions: 0,
            deletions: 0,
        }
    }

    fn activity(figures: Vec<ContributorFigure>) -> RepoActivity {
        RepoActivity {
            repository: "acme/widgets".into(),
            timeline: vec![],
            contributor_count: figures.len(),
            figures,
            total_commits_fetched: 0,
        }
    }

    #[test]
    fn figures_become_cards() {
        let mut carousel = CarouselState::new(&CarouselConfig::default());
        let status = App::loaded(
            &mut carousel,
            "https://github.com/acme/widgets",
            Ok(activity(vec![figure("few", 2), figure("many", 90)])),
        );

        assert_eq!(
            status,
            Status::Loaded {
                repository: "acme/widgets".into(),
                cards: 2
            }
        );
        assert_eq!(carousel.items().len(), 2);
        assert_eq!(carousel.engine().quantity(), 2);

        let top = carousel
            .items()
            .iter()
            .find(|item| item.badge.is_some())
            .unwrap();
        assert_eq!(top.title(), "many");

        let mut wanted = carousel.wanted_images();
        wanted.sort();
        assert_eq!(
            wanted,
            vec!["https://github.com/few.png", "https://github.com/many.png"]
        );
    }

    #[test]
    fn empty_figures_keep_the_cards() {
        let mut carousel = CarouselState::new(&CarouselConfig::bundled().unwrap());
        let status = App::loaded(&mut carousel, "u", Ok(activity(vec![])));

        assert_eq!(
            status,
            Status::Failed("acme/widgets: no contributor stats available yet".into())
        );
        assert_eq!(carousel.items().len(), 8);
    }

    #[test]
    fn relay_errors_are_shown() {
        let mut carousel = CarouselState::new(&CarouselConfig::default());
        let status = App::loaded(&mut carousel, "u", Err("Invalid GitHub URL".into()));
        assert_eq!(status, Status::Failed("Invalid GitHub URL".into()));
    }
}
