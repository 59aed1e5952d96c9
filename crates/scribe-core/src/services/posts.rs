//! Write side for posts: create, edit, delete with the ownership guard.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Post, PostDraft, PostView};
use crate::error::DomainError;
use crate::policy;
use crate::ports::{CategoryRepository, LocationRepository, PostRepository, UserRepository};

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    locations: Arc<dyn LocationRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        locations: Arc<dyn LocationRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            categories,
            locations,
            users,
        }
    }

    /// Publish a new post by `author_id`.
    pub async fn create(
        &self,
        author_id: i64,
        draft: PostDraft,
        now: DateTime<Utc>,
    ) -> Result<PostView, DomainError> {
        self.check_references(&draft).await?;

        let pub_date = policy::scheduled_pub_date(draft.pub_date, now);
        let post = self.posts.save(Post::new(author_id, draft, pub_date, now)).await?;

        tracing::info!(post_id = post.id, author_id, %pub_date, "Post created");
        self.reload(post.id).await
    }

    /// Replace the editable fields of a post. Only its author may do this.
    pub async fn update(
        &self,
        post_id: i64,
        actor: i64,
        draft: PostDraft,
        now: DateTime<Utc>,
    ) -> Result<PostView, DomainError> {
        let mut post = self.owned_post(post_id, actor).await?;
        self.check_references(&draft).await?;

        let pub_date = policy::scheduled_pub_date(draft.pub_date, now);
        post.apply(draft, pub_date);
        self.posts.save(post).await?;

        tracing::info!(post_id, actor, "Post updated");
        self.reload(post_id).await
    }

    /// Fails the way `update` and `delete` would when `actor` is not the author.
    pub async fn ensure_author(&self, post_id: i64, actor: i64) -> Result<(), DomainError> {
        self.owned_post(post_id, actor).await.map(|_| ())
    }

    /// Delete a post. Returns the author's username for the redirect.
    pub async fn delete(&self, post_id: i64, actor: i64) -> Result<String, DomainError> {
        let post = self.owned_post(post_id, actor).await?;
        self.posts.delete(post.id).await?;

        tracing::info!(post_id, actor, "Post deleted");

        let author = self
            .users
            .find_by_id(post.author_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", post.author_id))?;
        Ok(author.username)
    }

    async fn owned_post(&self, post_id: i64, actor: i64) -> Result<Post, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;

        if !policy::can_modify(&post, actor) {
            tracing::debug!(post_id, actor, "Post change by non-author refused");
            return Err(DomainError::OwnershipDenied { post_id });
        }
        Ok(post)
    }

    async fn check_references(&self, draft: &PostDraft) -> Result<(), DomainError> {
        if self.categories.find_by_id(draft.category_id).await?.is_none() {
            return Err(DomainError::Validation(format!(
                "Unknown category {}",
                draft.category_id
            )));
        }
        if let Some(location_id) = draft.location_id {
            if self.locations.find_by_id(location_id).await?.is_none() {
                return Err(DomainError::Validation(format!(
                    "Unknown location {location_id}"
                )));
            }
        }
        Ok(())
    }

    async fn reload(&self, post_id: i64) -> Result<PostView, DomainError> {
        self.posts
            .find_view(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }
}
