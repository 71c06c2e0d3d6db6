//! Domain entities - the core business objects.

mod category;
mod comment;
mod dashboard;
mod image;
mod post;
mod tags;
mod user;

pub use category::{Category, CategorySummary, DEFAULT_CATEGORIES};
pub use comment::{Comment, CommentSubmission, CommentWithPost, ModerationFilter, PostRef};
pub use dashboard::DashboardStats;
pub use image::{
    ALLOWED_IMAGE_TYPES, DEFAULT_UPLOAD_FOLDER, ImageUpload, MAX_IMAGE_BYTES, UploadedImage,
};
pub use post::{Post, PostDraft, PostStatus, PostType, PostWithCategory};
pub use tags::parse_tags;
pub use user::{Actor, User};
