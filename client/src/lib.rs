pub mod cmd;
pub mod handlers;
pub mod types;
pub mod ui;
pub mod utils;
