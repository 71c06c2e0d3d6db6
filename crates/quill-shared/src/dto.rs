//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// The signed-in operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

fn default_status() -> String {
    "draft".to_string()
}

fn default_post_type() -> String {
    "article".to_string()
}

/// Post editor form. `tags` is the raw comma-separated input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_post_type")]
    pub post_type: String,
    #[serde(default)]
    pub featured: bool,
}

/// Query string of the public post listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListQuery {
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Search text.
    pub q: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub category_id: Option<Uuid>,
    pub category: Option<CategorySummaryResponse>,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub status: String,
    pub post_type: String,
    pub featured: bool,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeFeedResponse {
    pub featured: Vec<PostResponse>,
    pub articles: Vec<PostResponse>,
    pub threads: Vec<PostResponse>,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// Public comment form. Moderation state is not part of the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitCommentRequest {
    pub author_name: String,
    #[serde(default)]
    pub author_email: Option<String>,
    pub content: String,
}

/// A comment as shown to readers. The author's email is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_name: String,
    pub content: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRefResponse {
    pub id: Uuid,
    pub title: String,
}

/// A comment as shown in the moderation queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationCommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub author_name: String,
    pub author_email: Option<String>,
    pub content: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub post: Option<PostRefResponse>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModerationQuery {
    /// `all`, `pending` (default) or `approved`.
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkIdsRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkFailureResponse {
    pub id: Uuid,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkOutcomeResponse {
    pub applied: Vec<Uuid>,
    pub failed: Vec<BulkFailureResponse>,
}

// ---------------------------------------------------------------------------
// Dashboard & images
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub total_posts: usize,
    pub published_posts: usize,
    pub draft_posts: usize,
    pub article_posts: usize,
    pub thread_posts: usize,
    pub total_comments: usize,
    pub pending_comments: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageUploadQuery {
    pub filename: Option<String>,
    pub folder: Option<String>,
    pub resize: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImageResponse {
    pub url: String,
    pub filename: String,
    pub size: u64,
    pub original_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_request_defaults() {
        let req: PostRequest =
            serde_json::from_str(r#"{"title":"Hello","content":"<p>x</p>"}"#).unwrap();
        assert_eq!(req.status, "draft");
        assert_eq!(req.post_type, "article");
        assert_eq!(req.tags, "");
        assert!(!req.featured);
        assert!(req.category_id.is_none());
    }

    #[test]
    fn test_comment_request_ignores_approved_field() {
        let req: SubmitCommentRequest = serde_json::from_str(
            r#"{"author_name":"Ada","content":"hi","approved":true}"#,
        )
        .unwrap();
        assert_eq!(req.author_name, "Ada");
        assert!(req.author_email.is_none());
    }

    #[test]
    fn test_list_query_type_key() {
        let q: PostListQuery = serde_json::from_str(r#"{"type":"thread","limit":5}"#).unwrap();
        assert_eq!(q.post_type.as_deref(), Some("thread"));
        assert_eq!(q.limit, Some(5));
    }
}
