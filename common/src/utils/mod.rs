pub mod de;
pub mod file;
pub mod net;

pub use file::*;
