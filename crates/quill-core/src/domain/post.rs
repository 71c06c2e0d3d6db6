use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::CategorySummary;
use super::tags::parse_tags;
use crate::error::DomainError;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(DomainError::Validation(format!(
                "Unknown post status '{other}' (expected draft or published)"
            ))),
        }
    }
}

/// Kind of post: long-form article or discussion thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Article,
    Thread,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Article => "article",
            PostType::Thread => "thread",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(PostType::Article),
            "thread" => Ok(PostType::Thread),
            other => Err(DomainError::Validation(format!(
                "Unknown post type '{other}' (expected article or thread)"
            ))),
        }
    }
}

/// Post entity - an article or discussion thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub category_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub post_type: PostType,
    pub featured: bool,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Build a new post authored by `author_id` from validated form input.
    pub fn new(author_id: Uuid, draft: PostDraft) -> Result<Self, DomainError> {
        draft.validate()?;
        let now = Utc::now();
        let mut post = Self {
            id: Uuid::new_v4(),
            title: String::new(),
            excerpt: None,
            content: String::new(),
            category_id: None,
            tags: Vec::new(),
            featured_image: None,
            status: draft.status,
            post_type: draft.post_type,
            featured: draft.featured,
            author_id,
            created_at: now,
            updated_at: now,
        };
        post.assign(draft);
        Ok(post)
    }

    /// Replace every settable field from form input and refresh `updated_at`.
    ///
    /// `id`, `author_id` and `created_at` are never touched.
    pub fn apply(&mut self, draft: PostDraft) -> Result<(), DomainError> {
        draft.validate()?;
        self.assign(draft);
        self.updated_at = Utc::now().max(self.created_at);
        Ok(())
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    fn assign(&mut self, draft: PostDraft) {
        self.title = draft.title.trim().to_string();
        self.excerpt = non_blank(draft.excerpt);
        self.content = draft.content;
        self.category_id = draft.category_id;
        self.tags = parse_tags(&draft.tags);
        self.featured_image = non_blank(draft.featured_image);
        self.status = draft.status;
        self.post_type = draft.post_type;
        self.featured = draft.featured;
    }
}

/// Post with its category embedded, as returned by listing queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostWithCategory {
    #[serde(flatten)]
    pub post: Post,
    pub category: Option<CategorySummary>,
}

/// Authoring form input for creating or updating a post.
///
/// `tags` is the raw comma-separated string typed by the author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub category_id: Option<Uuid>,
    pub tags: String,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub post_type: PostType,
    pub featured: bool,
}

impl PostDraft {
    /// Title and content must be non-blank.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(DomainError::Validation(
                "Title and content are required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PostDraft {
        PostDraft {
            title: "  Fine-tuning LLMs  ".to_string(),
            excerpt: Some("   ".to_string()),
            content: "<p>Body</p>".to_string(),
            tags: "AI, Machine Learning, , Tutorial".to_string(),
            featured_image: Some(" https://cdn.example.com/a.jpg ".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_post_normalizes_form_input() {
        let author = Uuid::new_v4();
        let post = Post::new(author, draft()).unwrap();

        assert_eq!(post.title, "Fine-tuning LLMs");
        assert_eq!(post.excerpt, None);
        assert_eq!(post.tags, vec!["AI", "Machine Learning", "Tutorial"]);
        assert_eq!(
            post.featured_image.as_deref(),
            Some("https://cdn.example.com/a.jpg")
        );
        assert_eq!(post.author_id, author);
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.created_at, post.updated_at);
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let mut input = draft();
        input.title = "   ".to_string();
        let err = Post::new(Uuid::new_v4(), input).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_blank_content_is_rejected() {
        let mut input = draft();
        input.content = "\n\t".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_apply_keeps_identity_fields() {
        let author = Uuid::new_v4();
        let mut post = Post::new(author, draft()).unwrap();
        let (id, created_at) = (post.id, post.created_at);

        let mut edit = draft();
        edit.title = "Renamed".to_string();
        edit.status = PostStatus::Published;
        post.apply(edit).unwrap();

        assert_eq!(post.id, id);
        assert_eq!(post.author_id, author);
        assert_eq!(post.created_at, created_at);
        assert!(post.updated_at >= post.created_at);
        assert_eq!(post.title, "Renamed");
        assert!(post.is_published());
    }

    #[test]
    fn test_status_and_type_parse() {
        assert_eq!("published".parse::<PostStatus>().unwrap(), PostStatus::Published);
        assert_eq!("thread".parse::<PostType>().unwrap(), PostType::Thread);
        assert!("archived".parse::<PostStatus>().is_err());
        assert!("video".parse::<PostType>().is_err());
    }
}
