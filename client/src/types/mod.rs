pub mod app;
pub mod channel;
pub mod config;
pub mod detail;
pub mod log;
pub mod product;
pub mod session;

pub use app::*;
pub use channel::*;
pub use self::config::*;
pub use detail::*;
pub use log::*;
pub use product::*;
pub use session::*;
