//! In-memory Content Store - used when no database is configured, and by
//! the workflow tests.

mod store;

pub use store::{
    InMemoryCategoryRepository, InMemoryCommentRepository, InMemoryContentStore,
    InMemoryPostRepository, InMemoryUserRepository,
};
