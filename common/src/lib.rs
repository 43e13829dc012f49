pub mod net;
pub mod types;
pub mod utils;
