//! Read side: the three feeds and the post detail page.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Category, CommentView, FeedFilter, Page, PageRequest, PostView, User};
use crate::error::DomainError;
use crate::policy;
use crate::ports::{CategoryRepository, CommentRepository, PostRepository, UserRepository};
use crate::services::ProfileService;

/// A category together with one page of its visible posts.
#[derive(Debug, Clone)]
pub struct CategoryFeed {
    pub category: Category,
    pub posts: Page<PostView>,
}

/// A user's profile together with one page of their posts.
#[derive(Debug, Clone)]
pub struct AuthorFeed {
    pub profile: User,
    pub posts: Page<PostView>,
}

/// A single post with its comments.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: PostView,
    pub comments: Vec<CommentView>,
}

/// Assembles feeds by combining the post store with the visibility policy.
#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    categories: Arc<dyn CategoryRepository>,
    profiles: ProfileService,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        categories: Arc<dyn CategoryRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            posts,
            comments,
            categories,
            profiles: ProfileService::new(users),
        }
    }

    /// Every publicly visible post.
    pub async fn global_feed(
        &self,
        page: u64,
        now: DateTime<Utc>,
    ) -> Result<Page<PostView>, DomainError> {
        self.load_page(&FeedFilter::public(now), page).await
    }

    /// Publicly visible posts of a published category.
    pub async fn category_feed(
        &self,
        slug: &str,
        page: u64,
        now: DateTime<Utc>,
    ) -> Result<CategoryFeed, DomainError> {
        let category = self
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or_else(|| DomainError::not_found("Category", slug))?;

        let filter = FeedFilter::public(now).in_category(category.id);
        let posts = self.load_page(&filter, page).await?;

        Ok(CategoryFeed { category, posts })
    }

    /// Posts of one author; the author themselves also sees hidden ones.
    pub async fn author_feed(
        &self,
        username: &str,
        viewer: Option<i64>,
        page: u64,
        now: DateTime<Utc>,
    ) -> Result<AuthorFeed, DomainError> {
        let profile = self.profiles.profile(username).await?;

        let filter = if viewer == Some(profile.id) {
            FeedFilter::everything_by(profile.id)
        } else {
            FeedFilter::public(now).by_author(profile.id)
        };
        let posts = self.load_page(&filter, page).await?;

        Ok(AuthorFeed { profile, posts })
    }

    /// One post and its comments, if `viewer` may see it.
    pub async fn post_detail(
        &self,
        post_id: i64,
        viewer: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<PostDetail, DomainError> {
        let post = self.visible_post(post_id, viewer, now).await?;
        let comments = self.comments.find_by_post(post_id).await?;

        Ok(PostDetail { post, comments })
    }

    /// Resolve a post, reporting hidden posts exactly like missing ones.
    pub async fn visible_post(
        &self,
        post_id: i64,
        viewer: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<PostView, DomainError> {
        match self.posts.find_view(post_id).await? {
            Some(view) if policy::can_view(&view, viewer, now) => Ok(view),
            Some(_) => {
                tracing::debug!(post_id, ?viewer, "Post hidden from viewer");
                Err(DomainError::not_found("Post", post_id))
            }
            None => Err(DomainError::not_found("Post", post_id)),
        }
    }

    pub async fn published_categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.list_published().await?)
    }

    async fn load_page(&self, filter: &FeedFilter, page: u64) -> Result<Page<PostView>, DomainError> {
        let request = PageRequest::feed(page);
        if request.offset().is_none() {
            return Err(DomainError::not_found("Page", page));
        }

        let result = self.posts.find_feed(filter, request).await?;

        if !result.in_range() {
            return Err(DomainError::not_found("Page", page));
        }
        Ok(result)
    }
}
