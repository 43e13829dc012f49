pub mod events;
pub mod main_pan;
pub mod product_pan;
pub mod side_pan;
pub mod terminal;

pub use terminal::*;
