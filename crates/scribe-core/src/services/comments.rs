//! Comment creation and the author-only edit/delete guard.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Author, Comment, CommentView};
use crate::error::DomainError;
use crate::policy;
use crate::ports::{CommentRepository, UserRepository};

use super::FeedService;

#[derive(Clone)]
pub struct CommentService {
    feeds: FeedService,
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
}

impl CommentService {
    pub fn new(
        feeds: FeedService,
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            feeds,
            comments,
            users,
        }
    }

    /// Attach a new comment by `author_id` to a post the author can see.
    pub async fn create(
        &self,
        post_id: i64,
        author_id: i64,
        text: String,
        now: DateTime<Utc>,
    ) -> Result<CommentView, DomainError> {
        Comment::validate_text(&text)?;
        self.feeds.visible_post(post_id, Some(author_id), now).await?;

        let comment = self
            .comments
            .save(Comment::new(post_id, author_id, text, now))
            .await?;

        tracing::info!(comment_id = comment.id, post_id, author_id, "Comment created");
        self.with_author(comment).await
    }

    /// Change the text of a comment. Only its author may do this.
    pub async fn update(
        &self,
        post_id: i64,
        comment_id: i64,
        actor: i64,
        text: String,
    ) -> Result<CommentView, DomainError> {
        let mut comment = self.owned_comment(post_id, comment_id, actor).await?;
        Comment::validate_text(&text)?;

        comment.text = text;
        let comment = self.comments.save(comment).await?;

        tracing::info!(comment_id, post_id, actor, "Comment updated");
        self.with_author(comment).await
    }

    /// Fails the way `update` and `delete` would when `actor` is not the author.
    pub async fn ensure_author(
        &self,
        post_id: i64,
        comment_id: i64,
        actor: i64,
    ) -> Result<(), DomainError> {
        self.owned_comment(post_id, comment_id, actor).await.map(|_| ())
    }

    pub async fn delete(&self, post_id: i64, comment_id: i64, actor: i64) -> Result<(), DomainError> {
        let comment = self.owned_comment(post_id, comment_id, actor).await?;
        self.comments.delete(comment.id).await?;

        tracing::info!(comment_id, post_id, actor, "Comment deleted");
        Ok(())
    }

    async fn owned_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        actor: i64,
    ) -> Result<Comment, DomainError> {
        let comment = self
            .comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))?;

        if !policy::can_modify(&comment, actor) {
            tracing::debug!(comment_id, actor, "Comment change by non-author refused");
            return Err(DomainError::OwnershipDenied { post_id });
        }
        Ok(comment)
    }

    async fn with_author(&self, comment: Comment) -> Result<CommentView, DomainError> {
        let user = self
            .users
            .find_by_id(comment.author_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", comment.author_id))?;

        Ok(CommentView {
            author: Author::from(&user),
            comment,
        })
    }
}
