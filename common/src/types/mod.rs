pub mod message;
pub mod payload;
pub mod product;
pub mod session;

pub use message::*;
pub use payload::*;
pub use product::*;
pub use session::*;
