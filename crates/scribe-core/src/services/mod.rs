//! Use cases - the operations the HTTP layer calls.
//!
//! Every operation takes the acting identity and the current instant
//! explicitly; nothing here reads the clock for visibility decisions.

mod comments;
mod feed;
mod posts;
mod profiles;

pub use comments::CommentService;
pub use feed::{AuthorFeed, CategoryFeed, FeedService, PostDetail};
pub use posts::PostService;
pub use profiles::ProfileService;
