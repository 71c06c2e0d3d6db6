use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{
    Category, Comment, CommentWithPost, DEFAULT_CATEGORIES, Post, PostRef, PostStatus, PostType,
    PostWithCategory, User,
};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, PostQuery, PostRepository,
    UserRepository,
};

/// Rows in insertion order. Listing sorts by timestamp, so ties keep the
/// most recently inserted first.
#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl Tables {
    fn category(&self, id: Option<Uuid>) -> Option<&Category> {
        let id = id?;
        self.categories.iter().find(|c| c.id == id)
    }

    fn with_category(&self, post: &Post) -> PostWithCategory {
        PostWithCategory {
            post: post.clone(),
            category: self.category(post.category_id).map(Category::summary),
        }
    }
}

type Shared = Arc<RwLock<Tables>>;

/// In-memory Content Store using `Vec`s behind a single async RwLock.
///
/// Mirrors the relational rules of the PostgreSQL schema: unique user emails
/// and category slugs, comments must reference an existing post, and
/// deleting a post removes its comments.
/// Note: Data is lost on process restart.
#[derive(Clone, Default)]
pub struct InMemoryContentStore {
    tables: Shared,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the default categories.
    pub fn seeded() -> Self {
        let tables = Tables {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|(name, slug)| Category::new(*name, *slug))
                .collect(),
            ..Tables::default()
        };
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    pub async fn add_category(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.categories.iter().any(|c| c.slug == category.slug) {
            return Err(RepoError::Constraint(format!(
                "category slug '{}' already exists",
                category.slug
            )));
        }
        tables.categories.push(category.clone());
        Ok(category)
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository(self.tables.clone())
    }

    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository(self.tables.clone())
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository(self.tables.clone())
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository(self.tables.clone())
    }
}

pub struct InMemoryUserRepository(Shared);
pub struct InMemoryCategoryRepository(Shared);
pub struct InMemoryPostRepository(Shared);
pub struct InMemoryCommentRepository(Shared);

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.0.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.0.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.id == user.id || u.email == user.email)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.0.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(RepoError::Constraint("Email already in use".to_string()));
        }
        let row = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        *row = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.0.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Err(RepoError::NotFound);
        }
        tables.posts.retain(|p| p.author_id != id);
        let posts: Vec<Uuid> = tables.posts.iter().map(|p| p.id).collect();
        tables.comments.retain(|c| posts.contains(&c.post_id));
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.0.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.0.read().await;
        let mut categories = tables.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.0.read().await;
        Ok(tables.categories.iter().find(|c| c.slug == slug).cloned())
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.0.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.0.write().await;
        if tables.posts.iter().any(|p| p.id == post.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        if post.category_id.is_some() && tables.category(post.category_id).is_none() {
            return Err(RepoError::Constraint("unknown category".to_string()));
        }
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.0.write().await;
        if post.category_id.is_some() && tables.category(post.category_id).is_none() {
            return Err(RepoError::Constraint("unknown category".to_string()));
        }
        let row = tables
            .posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *row = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.0.write().await;
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Err(RepoError::NotFound);
        }
        tables.comments.retain(|c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_with_category(&self, id: Uuid) -> Result<Option<PostWithCategory>, RepoError> {
        let tables = self.0.read().await;
        Ok(tables
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.with_category(p)))
    }

    async fn list(&self, query: &PostQuery) -> Result<Vec<PostWithCategory>, RepoError> {
        let tables = self.0.read().await;
        let mut posts: Vec<PostWithCategory> = tables
            .posts
            .iter()
            .rev()
            .filter(|p| {
                let slug = tables.category(p.category_id).map(|c| c.slug.as_str());
                query.matches(p, slug)
            })
            .map(|p| tables.with_category(p))
            .collect();

        posts.sort_by(|a, b| b.post.created_at.cmp(&a.post.created_at));
        if let Some(limit) = query.limit {
            posts.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(posts)
    }

    async fn status_projection(&self) -> Result<Vec<(PostStatus, PostType)>, RepoError> {
        let tables = self.0.read().await;
        Ok(tables
            .posts
            .iter()
            .map(|p| (p.status, p.post_type))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let tables = self.0.read().await;
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.0.write().await;
        if tables.comments.iter().any(|c| c.id == comment.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        if !tables.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                comment.post_id
            )));
        }
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.0.write().await;
        let row = tables
            .comments
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or(RepoError::NotFound)?;
        *row = comment.clone();
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.0.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        if tables.comments.len() == before {
            return Err(RepoError::NotFound);
        }
        for reply in tables.comments.iter_mut() {
            if reply.parent_id == Some(id) {
                reply.parent_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_approved_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let tables = self.0.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id && c.approved)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn list_with_post(
        &self,
        approved: Option<bool>,
    ) -> Result<Vec<CommentWithPost>, RepoError> {
        let tables = self.0.read().await;
        let mut comments: Vec<CommentWithPost> = tables
            .comments
            .iter()
            .rev()
            .filter(|c| approved.is_none_or(|a| c.approved == a))
            .map(|c| CommentWithPost {
                comment: c.clone(),
                post: tables
                    .posts
                    .iter()
                    .find(|p| p.id == c.post_id)
                    .map(|p| PostRef {
                        id: p.id,
                        title: p.title.clone(),
                    }),
            })
            .collect();
        comments.sort_by(|a, b| b.comment.created_at.cmp(&a.comment.created_at));
        Ok(comments)
    }

    async fn set_approved(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.0.write().await;
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepoError::NotFound)?;
        comment.approved = true;
        Ok(())
    }

    async fn set_approved_many(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        let mut tables = self.0.write().await;
        let mut touched = Vec::new();
        for comment in tables.comments.iter_mut().filter(|c| ids.contains(&c.id)) {
            comment.approved = true;
            touched.push(comment.id);
        }
        Ok(touched)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        let mut tables = self.0.write().await;
        let removed: Vec<Uuid> = tables
            .comments
            .iter()
            .filter(|c| ids.contains(&c.id))
            .map(|c| c.id)
            .collect();
        tables.comments.retain(|c| !removed.contains(&c.id));
        for reply in tables.comments.iter_mut() {
            if reply.parent_id.is_some_and(|p| removed.contains(&p)) {
                reply.parent_id = None;
            }
        }
        Ok(removed)
    }

    async fn approval_projection(&self) -> Result<Vec<bool>, RepoError> {
        let tables = self.0.read().await;
        Ok(tables.comments.iter().map(|c| c.approved).collect())
    }
}
