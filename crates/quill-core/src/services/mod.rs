//! Workflows - the operations the HTTP surface exposes, built on the ports.

mod comments;
mod dashboard;
mod posts;
mod publication;

pub use comments::{BulkFailure, BulkOutcome, CommentWorkflow};
pub use dashboard::DashboardService;
pub use posts::{DEFAULT_FEATURED_LIMIT, HOME_SECTION_LIMIT, HomeFeed, PostService};
