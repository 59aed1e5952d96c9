//! Application state - shared across all handlers.

use std::sync::Arc;

use chrono::Utc;

use scribe_core::domain::{Category, Location};
use scribe_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use scribe_core::services::{CommentService, FeedService, PostService, ProfileService};
use scribe_infra::InMemoryBlogStore;

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use scribe_infra::database::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub feeds: FeedService,
    pub posts: PostService,
    pub comments: CommentService,
    pub profiles: ProfileService,
    /// Which store backs the repositories: `"postgres"` or `"memory"`.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state, falling back to memory when no database is reachable.
    pub async fn new(config: &AppConfig) -> Self {
        if let Some(state) = Self::postgres(config).await {
            tracing::info!("Application state initialized (postgres)");
            return state;
        }

        if config.database_url.is_none() {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        } else if cfg!(not(feature = "postgres")) {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature.");
        }

        let store = Arc::new(InMemoryBlogStore::new());
        seed_store(&store, &config.seed_categories, &config.seed_locations).await;

        tracing::info!("Application state initialized (memory)");
        Self::in_memory(store)
    }

    #[cfg(feature = "postgres")]
    async fn postgres(config: &AppConfig) -> Option<Self> {
        let db_config = config.database.as_ref()?;

        match scribe_infra::connect(db_config).await {
            Ok(db) => Some(Self::assemble(
                Arc::new(PostgresUserRepository::new(db.clone())),
                Arc::new(PostgresCategoryRepository::new(db.clone())),
                Arc::new(PostgresLocationRepository::new(db.clone())),
                Arc::new(PostgresPostRepository::new(db.clone())),
                Arc::new(PostgresCommentRepository::new(db)),
                "postgres",
            )),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                None
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn postgres(_config: &AppConfig) -> Option<Self> {
        None
    }

    /// State over a single in-memory store.
    pub fn in_memory(store: Arc<InMemoryBlogStore>) -> Self {
        Self::assemble(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            "memory",
        )
    }

    fn assemble(
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
        locations: Arc<dyn LocationRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        storage: &'static str,
    ) -> Self {
        let feeds = FeedService::new(
            posts.clone(),
            comments.clone(),
            categories.clone(),
            users.clone(),
        );

        Self {
            posts: PostService::new(posts, categories, locations, users.clone()),
            comments: CommentService::new(feeds.clone(), comments, users.clone()),
            profiles: ProfileService::new(users.clone()),
            feeds,
            users,
            storage,
        }
    }
}

/// Published categories and locations for a fresh in-memory store, which has
/// no other way to receive them.
pub async fn seed_store(store: &InMemoryBlogStore, categories: &[String], locations: &[String]) {
    let now = Utc::now();

    for slug in categories {
        let category = Category {
            id: 0,
            title: title_case(slug),
            description: String::new(),
            slug: slug.clone(),
            is_published: true,
            created_at: now,
        };
        match store.insert_category(category).await {
            Ok(c) => tracing::info!(category_id = c.id, slug = %c.slug, "Seeded category"),
            Err(e) => tracing::warn!(%slug, error = %e, "Skipping seed category"),
        }
    }

    for name in locations {
        let location = Location {
            id: 0,
            name: name.clone(),
            is_published: true,
            created_at: now,
        };
        match store.insert_location(location).await {
            Ok(l) => tracing::info!(location_id = l.id, name = %l.name, "Seeded location"),
            Err(e) => tracing::warn!(%name, error = %e, "Skipping seed location"),
        }
    }
}

fn title_case(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::domain::{PostDraft, User};
    use scribe_core::ports::BaseRepository;

    #[actix_rt::test]
    async fn test_seeded_memory_store_accepts_posts() {
        let store = Arc::new(InMemoryBlogStore::new());
        seed_store(
            &store,
            &["general".to_string(), "study-notes".to_string(), "general".to_string()],
            &["Campus".to_string()],
        )
        .await;
        let author = store
            .save(User::new(
                "leo".to_string(),
                "leo@example.com".to_string(),
                "unused".to_string(),
            ))
            .await
            .unwrap();
        let state = AppState::in_memory(store);

        let categories = state.feeds.published_categories().await.unwrap();
        let titles: Vec<&str> = categories.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(categories.len(), 2);
        assert!(titles.contains(&"General"));
        assert!(titles.contains(&"Study Notes"));

        let draft = PostDraft {
            title: "Hello".to_string(),
            text: "First post".to_string(),
            pub_date: None,
            category_id: categories[0].id,
            location_id: None,
            image: None,
            is_published: true,
        };
        let post = state.posts.create(author.id, draft, Utc::now()).await.unwrap();
        assert_eq!(post.post.author_id, author.id);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("study-notes"), "Study Notes");
        assert_eq!(title_case("news"), "News");
    }
}
