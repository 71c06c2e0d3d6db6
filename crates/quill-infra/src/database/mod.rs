//! PostgreSQL Content Store.

mod connection;
mod postgres_base;
mod postgres_repo;

pub mod entity;

pub use connection::{DatabaseConfig, connect};
pub use postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};

#[cfg(test)]
mod tests;
