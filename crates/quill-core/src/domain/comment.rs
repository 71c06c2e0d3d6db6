use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Comment entity - a visitor reply to a post, hidden until approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    /// Stored for threading but never assembled into a reply tree.
    pub parent_id: Option<Uuid>,
    pub author_name: String,
    pub author_email: Option<String>,
    pub content: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Build the row for a visitor submission. Always pending moderation.
    pub fn pending(submission: CommentSubmission) -> Result<Self, DomainError> {
        submission.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            post_id: submission.post_id,
            parent_id: None,
            author_name: submission.author_name.trim().to_string(),
            author_email: submission
                .author_email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            content: submission.content.trim().to_string(),
            approved: false,
            created_at: Utc::now(),
        })
    }
}

/// What a visitor submits through the public comment form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSubmission {
    pub post_id: Uuid,
    pub author_name: String,
    pub author_email: Option<String>,
    pub content: String,
}

impl CommentSubmission {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.author_name.trim().is_empty() || self.content.trim().is_empty() {
            return Err(DomainError::Validation(
                "Name and comment are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Title of the post a comment belongs to, for moderation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRef {
    pub id: Uuid,
    pub title: String,
}

/// Comment joined with its parent post, as listed for moderators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentWithPost {
    #[serde(flatten)]
    pub comment: Comment,
    pub post: Option<PostRef>,
}

/// Which comments the moderation list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationFilter {
    All,
    #[default]
    Pending,
    Approved,
}

impl ModerationFilter {
    /// The `approved` value to match, or `None` for every comment.
    pub fn approved(&self) -> Option<bool> {
        match self {
            ModerationFilter::All => None,
            ModerationFilter::Pending => Some(false),
            ModerationFilter::Approved => Some(true),
        }
    }
}

impl FromStr for ModerationFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(ModerationFilter::All),
            "pending" => Ok(ModerationFilter::Pending),
            "approved" => Ok(ModerationFilter::Approved),
            other => Err(DomainError::Validation(format!(
                "Unknown moderation filter '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_comment_is_trimmed_and_unapproved() {
        let post_id = Uuid::new_v4();
        let comment = Comment::pending(CommentSubmission {
            post_id,
            author_name: "  Ada  ".to_string(),
            author_email: Some("   ".to_string()),
            content: " Great write-up! ".to_string(),
        })
        .unwrap();

        assert_eq!(comment.post_id, post_id);
        assert_eq!(comment.author_name, "Ada");
        assert_eq!(comment.author_email, None);
        assert_eq!(comment.content, "Great write-up!");
        assert!(!comment.approved);
        assert!(comment.parent_id.is_none());
    }

    #[test]
    fn test_blank_name_or_content_is_rejected() {
        let blank_name = CommentSubmission {
            post_id: Uuid::new_v4(),
            author_name: " ".to_string(),
            content: "hi".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            Comment::pending(blank_name),
            Err(DomainError::Validation(_))
        ));

        let blank_content = CommentSubmission {
            post_id: Uuid::new_v4(),
            author_name: "Ada".to_string(),
            content: "\n".to_string(),
            ..Default::default()
        };
        assert!(blank_content.validate().is_err());
    }

    #[test]
    fn test_moderation_filter() {
        assert_eq!(ModerationFilter::default(), ModerationFilter::Pending);
        assert_eq!(ModerationFilter::All.approved(), None);
        assert_eq!("approved".parse::<ModerationFilter>().unwrap().approved(), Some(true));
        assert!("spam".parse::<ModerationFilter>().is_err());
    }
}
