pub mod utils;
pub mod validators;
