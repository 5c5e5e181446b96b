pub mod chapter;
pub mod comment;
pub mod engagement;
pub mod progress;
pub mod series;
pub mod stats;
pub mod user;
