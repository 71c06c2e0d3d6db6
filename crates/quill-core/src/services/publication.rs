//! Publication workflow: the explicit draft/publish actions of the editor.

use uuid::Uuid;

use super::PostService;
use crate::domain::{Actor, Post, PostDraft, PostStatus};
use crate::error::DomainError;

impl PostService {
    /// Save as draft, whatever status the form currently shows.
    ///
    /// Creates a post when `id` is `None`, otherwise updates it. The caller's
    /// form state is untouched since `draft` is consumed.
    pub async fn save_as_draft(
        &self,
        actor: &Actor,
        id: Option<Uuid>,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        self.save(actor, id, draft.with_status(PostStatus::Draft))
            .await
    }

    /// Publish: from this write on the post is on the public read path.
    pub async fn publish(
        &self,
        actor: &Actor,
        id: Option<Uuid>,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        self.save(actor, id, draft.with_status(PostStatus::Published))
            .await
    }

    async fn save(
        &self,
        actor: &Actor,
        id: Option<Uuid>,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        match id {
            Some(id) => self.update(actor, id, draft).await,
            None => self.create(actor, draft).await,
        }
    }
}
