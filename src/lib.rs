#![cfg_attr(debug_assertions, allow(dead_code, unused_variables,))]

pub trait RequestPaint: Send + Sync {
    fn request_repaint(&self) {}
}

impl RequestPaint for egui::Context {
    fn request_repaint(&self) {
        Self::request_repaint(self)
    }
}

pub struct NoopRepaint;
impl RequestPaint for NoopRepaint {}

pub mod rotation;
pub use rotation::{EngineSettings, MotionPhase, RotationEngine, Smoothing};

pub mod layout;
pub use layout::{CardQuad, RingLayout};

pub mod card;
pub use card::{CarouselItem, Role};

pub mod github;

pub mod activity;
pub use activity::{get_repo_activity, RepoActivity};

mod error;
pub use error::RelayError;

pub mod server;

mod config;
pub use config::{CarouselConfig, EnvConfig};

mod queue;
pub use queue::Queue;

mod task_queue;
pub use task_queue::TaskQueue;

mod fetch;
pub use fetch::{FetchResult, RelayFetcher};

mod image_cache;
pub use image_cache::{ImageCache, ImageFetcher, ImageResult};

pub mod logger;

pub mod widgets;

mod app;
pub use app::App;

pub const ENV_FILES: [&str; 2] = [".dev.env", ".secrets.env"];

pub mod font_icon {
    pub const RESET: &str = "🔄";
    pub const LOGS: &str = "📜";
    pub const TIME: &str = "⏰";
    pub const LEVEL: &str = "⏶";
    pub const TARGET: &str = "🎯";
}
