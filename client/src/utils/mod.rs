pub mod config;
pub mod logging;
pub mod sound;

pub use self::config::*;
pub use logging::*;
pub use sound::*;
