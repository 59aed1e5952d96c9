//! In-memory blog store - used when no database is configured, and in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use scribe_core::domain::{
    Author, Category, Comment, CommentView, FeedFilter, Location, Page, PageRequest, Post,
    PostView, User,
};
use scribe_core::error::RepoError;
use scribe_core::policy;
use scribe_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, Category>,
    locations: BTreeMap<i64, Location>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn matches(&self, post: &Post, filter: &FeedFilter) -> bool {
        if filter.category_id.is_some() && post.category_id != filter.category_id {
            return false;
        }
        if filter.author_id.is_some_and(|id| id != post.author_id) {
            return false;
        }
        match filter.visible_at {
            Some(now) => {
                let category = post.category_id.and_then(|id| self.categories.get(&id));
                policy::is_publicly_visible(post, category, now)
            }
            None => true,
        }
    }

    fn view(&self, post: &Post) -> Result<PostView, RepoError> {
        let author = self
            .users
            .get(&post.author_id)
            .map(Author::from)
            .ok_or_else(|| RepoError::Constraint(format!("Post {} has no author row", post.id)))?;
        let comment_count = self
            .comments
            .values()
            .filter(|c| c.post_id == post.id)
            .count() as u64;

        Ok(PostView {
            post: post.clone(),
            author,
            category: post.category_id.and_then(|id| self.categories.get(&id).cloned()),
            location: post.location_id.and_then(|id| self.locations.get(&id).cloned()),
            comment_count,
        })
    }
}

/// All blog tables behind one async lock.
///
/// Ids are shared across tables and start at 1. Data is lost on restart.
#[derive(Default)]
pub struct InMemoryBlogStore {
    tables: RwLock<Tables>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category, assigning an id when it has none.
    pub async fn insert_category(&self, mut category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .categories
            .values()
            .any(|c| c.slug == category.slug && c.id != category.id)
        {
            return Err(RepoError::Constraint(format!(
                "Category slug '{}' already exists",
                category.slug
            )));
        }
        if category.id == 0 {
            category.id = tables.next_id();
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    /// Add a location, assigning an id when it has none.
    pub async fn insert_location(&self, mut location: Location) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        if location.id == 0 {
            location.id = tables.next_id();
        }
        tables.locations.insert(location.id, location.clone());
        Ok(location)
    }

    /// Remove a category; its posts lose their category reference.
    pub async fn remove_category(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.categories.remove(&id).ok_or(RepoError::NotFound)?;
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<User, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, mut user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        if user.id == 0 {
            user.id = tables.next_id();
        } else if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;

        let owned: Vec<i64> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        tables.posts.retain(|_, p| p.author_id != id);
        tables
            .comments
            .retain(|_, c| c.author_id != id && !owned.contains(&c.post_id));
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn list_published(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| c.is_published)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }
}

#[async_trait]
impl LocationRepository for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, RepoError> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint(format!(
                "Unknown author {}",
                post.author_id
            )));
        }
        if post.id == 0 {
            post.id = tables.next_id();
        } else if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).ok_or(RepoError::NotFound)?;
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn find_view(&self, id: i64) -> Result<Option<PostView>, RepoError> {
        let tables = self.tables.read().await;
        tables.posts.get(&id).map(|p| tables.view(p)).transpose()
    }

    async fn find_feed(
        &self,
        filter: &FeedFilter,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError> {
        let tables = self.tables.read().await;

        let mut matching: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| tables.matches(p, filter))
            .collect();
        matching.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));

        let total_items = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(
                page.offset()
                    .and_then(|o| usize::try_from(o).ok())
                    .unwrap_or(usize::MAX),
            )
            .take(page.size as usize)
            .map(|p| tables.view(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            number: page.number,
            size: page.size,
            total_items,
        })
    }
}

#[async_trait]
impl BaseRepository<Comment, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, mut comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "Unknown post {}",
                comment.post_id
            )));
        }
        if comment.id == 0 {
            comment.id = tables.next_id();
        } else if !tables.comments.contains_key(&comment.id) {
            return Err(RepoError::NotFound);
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.comments.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn find_by_post(&self, post_id: i64) -> Result<Vec<CommentView>, RepoError> {
        let tables = self.tables.read().await;

        let mut comments: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        comments
            .into_iter()
            .map(|c| {
                let author = tables.users.get(&c.author_id).map(Author::from).ok_or_else(|| {
                    RepoError::Constraint(format!("Comment {} has no author row", c.id))
                })?;
                Ok(CommentView {
                    comment: c.clone(),
                    author,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn category(slug: &str, is_published: bool) -> Category {
        Category {
            id: 0,
            title: slug.to_string(),
            description: String::new(),
            slug: slug.to_string(),
            is_published,
            created_at: Utc::now(),
        }
    }

    async fn user(store: &InMemoryBlogStore, username: &str) -> User {
        BaseRepository::<User, i64>::save(
            store,
            User::new(username.to_string(), format!("{username}@example.com"), "hash".to_string()),
        )
        .await
        .unwrap()
    }

    fn post(author_id: i64, category_id: i64, pub_date: chrono::DateTime<Utc>) -> Post {
        Post {
            id: 0,
            author_id,
            category_id: Some(category_id),
            location_id: None,
            title: "Title".to_string(),
            text: "Text".to_string(),
            pub_date,
            image: None,
            is_published: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_username_is_unique() {
        let store = InMemoryBlogStore::new();
        user(&store, "leo").await;

        let duplicate = BaseRepository::<User, i64>::save(
            &store,
            User::new("leo".to_string(), "other@example.com".to_string(), "h".to_string()),
        )
        .await;
        assert!(matches!(duplicate, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_feed_orders_newest_first_and_paginates() {
        let store = InMemoryBlogStore::new();
        let author = user(&store, "leo").await;
        let news = store.insert_category(category("news", true)).await.unwrap();
        let base = Utc::now() - Duration::days(30);

        for day in 0..12 {
            BaseRepository::<Post, i64>::save(&store, post(author.id, news.id, base + Duration::days(day)))
                .await
                .unwrap();
        }

        let first = store
            .find_feed(&FeedFilter::public(Utc::now()), PageRequest::feed(1))
            .await
            .unwrap();
        assert_eq!(first.total_items, 12);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.items[0].post.pub_date, base + Duration::days(11));
        assert!(first
            .items
            .windows(2)
            .all(|w| w[0].post.pub_date >= w[1].post.pub_date));

        let second = store
            .find_feed(&FeedFilter::public(Utc::now()), PageRequest::feed(2))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 2);
    }

    #[tokio::test]
    async fn test_deleting_post_removes_its_comments() {
        let store = InMemoryBlogStore::new();
        let author = user(&store, "leo").await;
        let news = store.insert_category(category("news", true)).await.unwrap();
        let saved = BaseRepository::<Post, i64>::save(&store, post(author.id, news.id, Utc::now()))
            .await
            .unwrap();
        let comment = BaseRepository::<Comment, i64>::save(
            &store,
            Comment::new(saved.id, author.id, "hi".to_string(), Utc::now()),
        )
        .await
        .unwrap();

        BaseRepository::<Post, i64>::delete(&store, saved.id).await.unwrap();

        let found = BaseRepository::<Comment, i64>::find_by_id(&store, comment.id)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_removed_category_leaves_post_uncategorised() {
        let store = InMemoryBlogStore::new();
        let author = user(&store, "leo").await;
        let news = store.insert_category(category("news", true)).await.unwrap();
        let saved = BaseRepository::<Post, i64>::save(&store, post(author.id, news.id, Utc::now()))
            .await
            .unwrap();

        store.remove_category(news.id).await.unwrap();

        let view = store.find_view(saved.id).await.unwrap().unwrap();
        assert!(view.post.category_id.is_none());
        assert!(view.category.is_none());
    }
}
