//! Read-only counts for the admin dashboard. Recomputed on every call.

use std::sync::Arc;

use super::posts::section_or_empty;
use crate::domain::{Actor, DashboardStats};
use crate::error::DomainError;
use crate::ports::{CommentRepository, PostRepository};

#[derive(Clone)]
pub struct DashboardService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl DashboardService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    /// Counts over every post and comment.
    ///
    /// If one projection fails it counts as empty; both failing is an error.
    pub async fn stats(&self, actor: &Actor) -> Result<DashboardStats, DomainError> {
        actor.require_admin()?;

        let (posts, comments) = futures::join!(
            self.posts.status_projection(),
            self.comments.approval_projection(),
        );

        match (posts, comments) {
            (Err(e), Err(_)) => {
                tracing::error!(error = %e, "Dashboard projections both failed");
                Err(e.into())
            }
            (posts, comments) => {
                let posts = section_or_empty("posts", posts);
                let comments = section_or_empty("comments", comments);
                Ok(DashboardStats::tally(&posts, &comments))
            }
        }
    }
}
