mod card_face;
pub use card_face::CardFace;

mod carousel;
pub use carousel::{Carousel, CarouselState};

mod repo_bar;
pub use repo_bar::{RepoAction, RepoBar, Status};

mod log_window;
pub use log_window::LogWindow;
