//! Comment workflow: visitor submission and admin moderation.
//!
//! A comment is `pending` until approved and disappears when rejected.
//! Submission can never produce an approved row, and the public list never
//! returns a pending one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Actor, Comment, CommentSubmission, CommentWithPost, ModerationFilter};
use crate::error::{DomainError, RepoError};
use crate::ports::{CommentRepository, PostRepository};

/// A bulk entry that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkFailure {
    pub id: Uuid,
    pub reason: String,
}

/// Result of a best-effort bulk moderation action. Nothing is rolled back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    pub applied: Vec<Uuid>,
    pub failed: Vec<BulkFailure>,
}

impl BulkOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Outcome of a single batched write that reported the ids it touched.
    fn from_batch(requested: &[Uuid], done: &[Uuid]) -> Self {
        let mut outcome = Self::default();
        for id in requested {
            if done.contains(id) {
                outcome.applied.push(*id);
            } else {
                outcome.failed.push(BulkFailure {
                    id: *id,
                    reason: RepoError::NotFound.to_string(),
                });
            }
        }
        outcome
    }
}

#[derive(Debug, Clone, Copy)]
enum BulkAction {
    Approve,
    Reject,
}

impl BulkAction {
    fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Approve => "approve",
            BulkAction::Reject => "reject",
        }
    }
}

#[derive(Clone)]
pub struct CommentWorkflow {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentWorkflow {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    /// Public submission. The stored row is always unapproved.
    ///
    /// Comments can only be left on published posts.
    pub async fn submit(&self, submission: CommentSubmission) -> Result<Comment, DomainError> {
        let comment = Comment::pending(submission)?;

        let post_id = comment.post_id;
        self.require_published(post_id).await?;

        let saved = self.comments.insert(comment).await?;
        tracing::info!(comment_id = %saved.id, post_id = %post_id, "Comment submitted for moderation");
        Ok(saved)
    }

    /// Approved comments of a post in discussion order (oldest first).
    ///
    /// Comments of a draft or missing post are not found, like the post itself.
    pub async fn list_approved_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        self.require_published(post_id).await?;
        let mut comments = self.comments.list_approved_for_post(post_id).await?;
        comments.retain(|c| c.approved && c.post_id == post_id);
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    /// Moderation queue, newest first, with the parent post's title.
    pub async fn list_for_moderation(
        &self,
        actor: &Actor,
        filter: ModerationFilter,
    ) -> Result<Vec<CommentWithPost>, DomainError> {
        actor.require_admin()?;
        let wanted = filter.approved();
        let mut comments = self.comments.list_with_post(wanted).await?;
        if let Some(approved) = wanted {
            comments.retain(|c| c.comment.approved == approved);
        }
        comments.sort_by(|a, b| b.comment.created_at.cmp(&a.comment.created_at));
        Ok(comments)
    }

    /// Approve a comment. Approving twice is a no-op.
    pub async fn approve(&self, actor: &Actor, id: Uuid) -> Result<(), DomainError> {
        actor.require_admin()?;
        self.comments
            .set_approved(id)
            .await
            .map_err(|e| not_found_as_comment(e, id))?;
        tracing::info!(comment_id = %id, "Comment approved");
        Ok(())
    }

    /// Reject a comment: it is deleted outright.
    pub async fn reject(&self, actor: &Actor, id: Uuid) -> Result<(), DomainError> {
        actor.require_admin()?;
        self.comments
            .delete(id)
            .await
            .map_err(|e| not_found_as_comment(e, id))?;
        tracing::info!(comment_id = %id, "Comment rejected");
        Ok(())
    }

    pub async fn bulk_approve(
        &self,
        actor: &Actor,
        ids: Vec<Uuid>,
    ) -> Result<BulkOutcome, DomainError> {
        actor.require_admin()?;
        Ok(self.apply_bulk(BulkAction::Approve, ids).await)
    }

    pub async fn bulk_reject(
        &self,
        actor: &Actor,
        ids: Vec<Uuid>,
    ) -> Result<BulkOutcome, DomainError> {
        actor.require_admin()?;
        Ok(self.apply_bulk(BulkAction::Reject, ids).await)
    }

    /// One batched write; if the store refuses it, fall back to one write
    /// per id and report each failure.
    async fn apply_bulk(&self, action: BulkAction, ids: Vec<Uuid>) -> BulkOutcome {
        let mut unique = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if unique.is_empty() {
            return BulkOutcome::default();
        }

        let batch = match action {
            BulkAction::Approve => self.comments.set_approved_many(&unique).await,
            BulkAction::Reject => self.comments.delete_many(&unique).await,
        };

        let outcome = match batch {
            Ok(done) => BulkOutcome::from_batch(&unique, &done),
            Err(e) => {
                tracing::warn!(
                    action = action.as_str(),
                    count = unique.len(),
                    error = %e,
                    "Batched moderation write failed, applying one by one"
                );
                self.apply_one_by_one(action, unique).await
            }
        };

        tracing::info!(
            action = action.as_str(),
            applied = outcome.applied.len(),
            failed = outcome.failed.len(),
            "Bulk moderation finished"
        );
        outcome
    }

    async fn apply_one_by_one(&self, action: BulkAction, ids: Vec<Uuid>) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for id in ids {
            let result = match action {
                BulkAction::Approve => self.comments.set_approved(id).await,
                BulkAction::Reject => self.comments.delete(id).await,
            };
            match result {
                Ok(()) => outcome.applied.push(id),
                Err(e) => {
                    tracing::warn!(comment_id = %id, action = action.as_str(), error = %e, "Bulk entry failed");
                    outcome.failed.push(BulkFailure {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        outcome
    }
}

impl CommentWorkflow {
    async fn require_published(&self, post_id: Uuid) -> Result<(), DomainError> {
        match self.posts.find_by_id(post_id).await? {
            Some(post) if post.is_published() => Ok(()),
            _ => Err(DomainError::post_not_found(post_id)),
        }
    }
}

fn not_found_as_comment(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::comment_not_found(id),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_batch_reports_missing_ids() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let outcome = BulkOutcome::from_batch(&[a, b, c], &[c, a]);

        assert_eq!(outcome.applied, vec![a, c]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].id, b);
        assert!(!outcome.is_complete());
    }
}
