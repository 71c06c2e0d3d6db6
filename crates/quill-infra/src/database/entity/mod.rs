//! SeaORM entities for the Content Store tables.

pub mod category;
pub mod comment;
pub mod post;
pub mod user;
