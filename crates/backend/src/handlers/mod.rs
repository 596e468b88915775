pub mod category;
pub mod content;
pub mod engagement;
pub mod follow;
