pub mod mirror;
pub mod notion;
pub mod pushover;
pub mod window;

pub use mirror::{mirror_command, CommandRunner, MirrorCache, PageSink, ShellRunner};
pub use notion::NotionClient;
pub use pushover::{Notifier, PushoverClient};
pub use window::{advise, window_should_be_open, HumidityTemp, Thresholds, WindowAdvice};

pub mod prelude {
    pub use super::mirror::{mirror_command, CommandRunner, MirrorCache, PageSink};
    pub use super::notion::NotionClient;
    pub use super::pushover::{Notifier, PushoverClient};
    pub use super::window::{advise, window_should_be_open, HumidityTemp, Thresholds, WindowAdvice};
}
