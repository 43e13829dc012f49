pub mod dashboard;
pub mod desk;
pub mod messages;
pub mod polling;
pub mod products;

pub use dashboard::*;
pub use desk::*;
pub use messages::*;
pub use polling::*;
pub use products::*;
