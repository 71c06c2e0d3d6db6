//! Post accessor: the typed read/write paths over the posts table.
//!
//! Public reads only ever see published posts; everything else requires an
//! admin [`Actor`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Actor, Post, PostDraft, PostStatus, PostType, PostWithCategory};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostQuery, PostRepository};

/// Default size of the featured strip.
pub const DEFAULT_FEATURED_LIMIT: u64 = 3;

/// Posts per section of the home feed.
pub const HOME_SECTION_LIMIT: u64 = 6;

/// The three independently fetched sections of the home page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HomeFeed {
    pub featured: Vec<PostWithCategory>,
    pub articles: Vec<PostWithCategory>,
    pub threads: Vec<PostWithCategory>,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Published posts matching `query`, newest first.
    ///
    /// Any status in `query` is overridden.
    pub async fn list_published(
        &self,
        mut query: PostQuery,
    ) -> Result<Vec<PostWithCategory>, DomainError> {
        query.status = Some(PostStatus::Published);
        let mut posts = self.posts.list(&query).await?;
        posts.retain(|p| p.post.is_published());
        Ok(posts)
    }

    /// Published posts flagged featured, newest first.
    pub async fn list_featured(
        &self,
        limit: Option<u64>,
    ) -> Result<Vec<PostWithCategory>, DomainError> {
        self.list_published(PostQuery {
            featured: Some(true),
            limit: Some(limit.unwrap_or(DEFAULT_FEATURED_LIMIT)),
            ..PostQuery::default()
        })
        .await
    }

    /// Public detail view. Drafts are reported as not found.
    pub async fn get_public(&self, id: Uuid) -> Result<PostWithCategory, DomainError> {
        match self.posts.find_with_category(id).await? {
            Some(found) if found.post.is_published() => Ok(found),
            _ => Err(DomainError::post_not_found(id)),
        }
    }

    /// Admin detail view, regardless of status.
    pub async fn get_for_admin(
        &self,
        actor: &Actor,
        id: Uuid,
    ) -> Result<PostWithCategory, DomainError> {
        actor.require_admin()?;
        self.posts
            .find_with_category(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Every post regardless of status, newest first.
    pub async fn list_all(&self, actor: &Actor) -> Result<Vec<PostWithCategory>, DomainError> {
        actor.require_admin()?;
        Ok(self.posts.list(&PostQuery::default()).await?)
    }

    pub async fn create(&self, actor: &Actor, draft: PostDraft) -> Result<Post, DomainError> {
        actor.require_admin()?;
        let post = Post::new(actor.user_id, draft)?;

        let saved = self.posts.insert(post).await?;
        tracing::info!(post_id = %saved.id, status = %saved.status, "Post created");
        Ok(saved)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        draft: PostDraft,
    ) -> Result<Post, DomainError> {
        actor.require_admin()?;
        draft.validate()?;

        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))?;
        post.apply(draft)?;

        let saved = self.posts.update(post).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::post_not_found(id),
            other => other.into(),
        })?;
        tracing::info!(post_id = %saved.id, status = %saved.status, "Post updated");
        Ok(saved)
    }

    /// Hard delete. The store removes the post's comments with it.
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), DomainError> {
        actor.require_admin()?;
        self.posts.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::post_not_found(id),
            other => other.into(),
        })?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Featured posts plus the latest articles and threads.
    ///
    /// A failing section is logged and left empty; the feed only fails when
    /// every section does.
    pub async fn home_feed(&self) -> Result<HomeFeed, DomainError> {
        let latest = |post_type: PostType| PostQuery {
            post_type: Some(post_type),
            limit: Some(HOME_SECTION_LIMIT),
            ..PostQuery::default()
        };

        let (featured, articles, threads) = futures::join!(
            self.list_featured(None),
            self.list_published(latest(PostType::Article)),
            self.list_published(latest(PostType::Thread)),
        );

        match (featured, articles, threads) {
            (Err(e), Err(_), Err(_)) => {
                tracing::error!(error = %e, "Every home feed section failed");
                Err(e)
            }
            (featured, articles, threads) => Ok(HomeFeed {
                featured: section_or_empty("featured", featured),
                articles: section_or_empty("articles", articles),
                threads: section_or_empty("threads", threads),
            }),
        }
    }
}

pub(super) fn section_or_empty<T, E: std::fmt::Display>(
    section: &str,
    result: Result<Vec<T>, E>,
) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(section, error = %e, "Section query failed, showing it empty");
        Vec::new()
    })
}
