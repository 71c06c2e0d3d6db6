use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Category, Comment, CommentWithPost, Post, PostStatus, PostType, PostWithCategory, User,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new row.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing row. `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Hard-delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Filters for post listings. Results are always newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub status: Option<PostStatus>,
    pub post_type: Option<PostType>,
    pub featured: Option<bool>,
    pub category_slug: Option<String>,
    /// Case-insensitive substring of title or excerpt.
    pub search: Option<String>,
    pub limit: Option<u64>,
}

impl PostQuery {
    pub fn published() -> Self {
        Self {
            status: Some(PostStatus::Published),
            ..Self::default()
        }
    }

    /// Whether `post` (with its category slug) satisfies every filter except `limit`.
    pub fn matches(&self, post: &Post, category_slug: Option<&str>) -> bool {
        if self.status.is_some_and(|s| s != post.status) {
            return false;
        }
        if self.post_type.is_some_and(|t| t != post.post_type) {
            return false;
        }
        if self.featured.is_some_and(|f| f != post.featured) {
            return false;
        }
        if let Some(slug) = &self.category_slug {
            if category_slug != Some(slug.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            let in_title = post.title.to_lowercase().contains(&needle);
            let in_excerpt = post
                .excerpt
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(&needle));
            if !in_title && !in_excerpt {
                return false;
            }
        }
        true
    }
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Fetch one post with its category, regardless of status.
    async fn find_with_category(&self, id: Uuid) -> Result<Option<PostWithCategory>, RepoError>;

    /// List posts matching `query`, newest first, category embedded.
    async fn list(&self, query: &PostQuery) -> Result<Vec<PostWithCategory>, RepoError>;

    /// `(status, post_type)` of every post.
    async fn status_projection(&self) -> Result<Vec<(PostStatus, PostType)>, RepoError>;
}

/// Category repository. Categories are read-only here.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Every category ordered by name.
    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Approved comments of a post, oldest first.
    async fn list_approved_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    /// Comments with their post title, newest first, optionally by approval.
    async fn list_with_post(&self, approved: Option<bool>)
    -> Result<Vec<CommentWithPost>, RepoError>;

    /// Mark one comment approved. `RepoError::NotFound` if it does not exist.
    async fn set_approved(&self, id: Uuid) -> Result<(), RepoError>;

    /// Mark every listed comment approved in one write; returns the ids updated.
    async fn set_approved_many(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError>;

    /// Delete every listed comment in one write; returns the ids removed.
    async fn delete_many(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError>;

    /// `approved` of every comment.
    async fn approval_projection(&self) -> Result<Vec<bool>, RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostDraft;

    fn post(title: &str, excerpt: Option<&str>) -> Post {
        Post::new(
            Uuid::new_v4(),
            PostDraft {
                title: title.to_string(),
                excerpt: excerpt.map(str::to_string),
                content: "body".to_string(),
                status: PostStatus::Published,
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_published_query_excludes_drafts() {
        let mut draft = post("Draft", None);
        draft.status = PostStatus::Draft;
        assert!(!PostQuery::published().matches(&draft, None));
        assert!(PostQuery::published().matches(&post("Live", None), None));
    }

    #[test]
    fn test_search_matches_title_or_excerpt_case_insensitively() {
        let query = PostQuery {
            search: Some("neural".to_string()),
            ..PostQuery::published()
        };
        assert!(query.matches(&post("Neural Networks 101", None), None));
        assert!(query.matches(&post("Basics", Some("All about NEURAL nets")), None));
        assert!(!query.matches(&post("Transformers", Some("attention")), None));
    }

    #[test]
    fn test_category_filter() {
        let query = PostQuery {
            category_slug: Some("research".to_string()),
            ..PostQuery::published()
        };
        let p = post("Paper", None);
        assert!(query.matches(&p, Some("research")));
        assert!(!query.matches(&p, Some("news")));
        assert!(!query.matches(&p, None));
    }
}
