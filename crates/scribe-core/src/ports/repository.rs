use async_trait::async_trait;

use crate::domain::{
    Category, Comment, CommentView, FeedFilter, Location, Page, PageRequest, Post, PostView, User,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
///
/// Entities with id `0` are inserted by `save` and come back with the id
/// the store assigned; any other id updates the existing row.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Categories are managed outside the service; this port only reads them.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// Published categories, ordered by title.
    async fn list_published(&self) -> Result<Vec<Category>, RepoError>;
}

#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Load one post with its joins and comment count.
    async fn find_view(&self, id: i64) -> Result<Option<PostView>, RepoError>;

    /// Load one page of posts matching `filter`, newest `pub_date` first.
    async fn find_feed(
        &self,
        filter: &FeedFilter,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i64> {
    /// Comments of a post with their authors, oldest first.
    async fn find_by_post(&self, post_id: i64) -> Result<Vec<CommentView>, RepoError>;
}
