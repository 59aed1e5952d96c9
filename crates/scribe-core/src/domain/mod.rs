//! Domain entities - the core business objects.

mod category;
mod comment;
mod feed;
mod post;
mod user;

pub use category::{Category, Location};
pub use comment::{Comment, CommentView};
pub use feed::{FeedFilter, PAGE_SIZE, Page, PageRequest};
pub use post::{Post, PostDraft, PostView};
pub use user::{Author, ProfileChanges, User};
