//! Conversions between wire DTOs and domain types.

use quill_core::domain::{
    Category, CategorySummary, Comment, CommentWithPost, DashboardStats, Post, PostDraft,
    PostType, PostWithCategory, UploadedImage, User,
};
use quill_core::error::DomainError;
use quill_core::ports::PostQuery;
use quill_core::services::{BulkOutcome, HomeFeed};
use quill_shared::dto::{
    BulkFailureResponse, BulkOutcomeResponse, CategoryResponse, CategorySummaryResponse,
    CommentResponse, DashboardResponse, HomeFeedResponse, ModerationCommentResponse,
    PostListQuery, PostRefResponse, PostRequest, PostResponse, UploadedImageResponse,
    UserResponse,
};

/// Editor form to draft. Unknown status or type strings are a validation error.
pub fn post_draft(req: PostRequest) -> Result<PostDraft, DomainError> {
    Ok(PostDraft {
        status: req.status.parse()?,
        post_type: req.post_type.parse()?,
        title: req.title,
        excerpt: req.excerpt,
        content: req.content,
        category_id: req.category_id,
        tags: req.tags,
        featured_image: req.featured_image,
        featured: req.featured,
    })
}

pub fn post_query(req: PostListQuery) -> Result<PostQuery, DomainError> {
    Ok(PostQuery {
        post_type: req
            .post_type
            .as_deref()
            .map(str::parse::<PostType>)
            .transpose()?,
        category_slug: req.category.filter(|s| !s.trim().is_empty()),
        search: req
            .q
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty()),
        limit: req.limit,
        ..PostQuery::published()
    })
}

fn category_summary(c: CategorySummary) -> CategorySummaryResponse {
    CategorySummaryResponse {
        id: c.id,
        name: c.name,
        slug: c.slug,
    }
}

pub fn post(p: Post, category: Option<CategorySummary>) -> PostResponse {
    PostResponse {
        id: p.id,
        title: p.title,
        excerpt: p.excerpt,
        content: p.content,
        category_id: p.category_id,
        category: category.map(category_summary),
        tags: p.tags,
        featured_image: p.featured_image,
        status: p.status.to_string(),
        post_type: p.post_type.to_string(),
        featured: p.featured,
        author_id: p.author_id,
        created_at: p.created_at,
        updated_at: p.updated_at,
    }
}

pub fn post_with_category(p: PostWithCategory) -> PostResponse {
    post(p.post, p.category)
}

pub fn posts(list: Vec<PostWithCategory>) -> Vec<PostResponse> {
    list.into_iter().map(post_with_category).collect()
}

pub fn home_feed(feed: HomeFeed) -> HomeFeedResponse {
    HomeFeedResponse {
        featured: posts(feed.featured),
        articles: posts(feed.articles),
        threads: posts(feed.threads),
    }
}

pub fn category(c: Category) -> CategoryResponse {
    CategoryResponse {
        id: c.id,
        name: c.name,
        slug: c.slug,
        description: c.description,
    }
}

pub fn comment(c: Comment) -> CommentResponse {
    CommentResponse {
        id: c.id,
        post_id: c.post_id,
        author_name: c.author_name,
        content: c.content,
        approved: c.approved,
        created_at: c.created_at,
    }
}

pub fn moderation_comment(c: CommentWithPost) -> ModerationCommentResponse {
    let CommentWithPost { comment, post } = c;
    ModerationCommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        parent_id: comment.parent_id,
        author_name: comment.author_name,
        author_email: comment.author_email,
        content: comment.content,
        approved: comment.approved,
        created_at: comment.created_at,
        post: post.map(|p| PostRefResponse {
            id: p.id,
            title: p.title,
        }),
    }
}

pub fn bulk_outcome(o: BulkOutcome) -> BulkOutcomeResponse {
    BulkOutcomeResponse {
        applied: o.applied,
        failed: o
            .failed
            .into_iter()
            .map(|f| BulkFailureResponse {
                id: f.id,
                error: f.reason,
            })
            .collect(),
    }
}

pub fn dashboard(s: DashboardStats) -> DashboardResponse {
    DashboardResponse {
        total_posts: s.total_posts,
        published_posts: s.published_posts,
        draft_posts: s.draft_posts,
        article_posts: s.article_posts,
        thread_posts: s.thread_posts,
        total_comments: s.total_comments,
        pending_comments: s.pending_comments,
    }
}

pub fn uploaded_image(i: UploadedImage) -> UploadedImageResponse {
    UploadedImageResponse {
        url: i.url,
        filename: i.filename,
        size: i.size,
        original_name: i.original_name,
    }
}

pub fn user(u: &User) -> UserResponse {
    UserResponse {
        id: u.id,
        email: u.email.clone(),
        is_admin: u.is_admin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::PostStatus;

    fn request(status: &str, post_type: &str) -> PostRequest {
        PostRequest {
            title: "Title".to_string(),
            excerpt: None,
            content: "Body".to_string(),
            category_id: None,
            tags: "a, b".to_string(),
            featured_image: None,
            status: status.to_string(),
            post_type: post_type.to_string(),
            featured: false,
        }
    }

    #[test]
    fn test_post_draft_parses_enums() {
        let draft = post_draft(request("published", "thread")).unwrap();
        assert_eq!(draft.status, PostStatus::Published);
        assert_eq!(draft.post_type, PostType::Thread);
        assert_eq!(draft.tags, "a, b");
    }

    #[test]
    fn test_post_draft_rejects_unknown_status() {
        assert!(matches!(
            post_draft(request("archived", "article")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_post_query_is_published_only() {
        let query = post_query(PostListQuery {
            post_type: Some("article".to_string()),
            q: Some("  ".to_string()),
            ..PostListQuery::default()
        })
        .unwrap();
        assert_eq!(query.status, Some(PostStatus::Published));
        assert_eq!(query.post_type, Some(PostType::Article));
        assert!(query.search.is_none());
    }
}
