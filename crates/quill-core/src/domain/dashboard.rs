use serde::{Deserialize, Serialize};

use super::post::{PostStatus, PostType};

/// Operator-facing counts over posts and comments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_posts: usize,
    pub published_posts: usize,
    pub draft_posts: usize,
    pub article_posts: usize,
    pub thread_posts: usize,
    pub total_comments: usize,
    pub pending_comments: usize,
}

impl DashboardStats {
    /// Count from the `(status, post_type)` and `approved` projections.
    pub fn tally(posts: &[(PostStatus, PostType)], comments: &[bool]) -> Self {
        let mut stats = Self {
            total_posts: posts.len(),
            total_comments: comments.len(),
            ..Self::default()
        };

        for (status, post_type) in posts {
            match status {
                PostStatus::Published => stats.published_posts += 1,
                PostStatus::Draft => stats.draft_posts += 1,
            }
            match post_type {
                PostType::Article => stats.article_posts += 1,
                PostType::Thread => stats.thread_posts += 1,
            }
        }

        stats.pending_comments = comments.iter().filter(|approved| !**approved).count();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally() {
        let posts = [
            (PostStatus::Published, PostType::Article),
            (PostStatus::Draft, PostType::Article),
            (PostStatus::Published, PostType::Thread),
        ];
        let comments = [true, false, false, true, false];

        let stats = DashboardStats::tally(&posts, &comments);

        assert_eq!(
            stats,
            DashboardStats {
                total_posts: 3,
                published_posts: 2,
                draft_posts: 1,
                article_posts: 2,
                thread_posts: 1,
                total_comments: 5,
                pending_comments: 3,
            }
        );
    }

    #[test]
    fn test_tally_empty() {
        assert_eq!(DashboardStats::tally(&[], &[]), DashboardStats::default());
    }
}
