//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select,
};

use scribe_core::domain::{
    Author, Category, CommentView, FeedFilter, Location, Page, PageRequest, PostView, User,
};
use scribe_core::error::RepoError;
use scribe_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL category repository (read-only).
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository (read-only).
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_published(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::IsPublished.eq(true))
            .order_by_asc(category::Column::Title)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, RepoError> {
        let result = LocationEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

impl PostgresPostRepository {
    fn feed_query(filter: &FeedFilter) -> Select<PostEntity> {
        let mut query = PostEntity::find();

        if let Some(category_id) = filter.category_id {
            query = query.filter(post::Column::CategoryId.eq(category_id));
        }
        if let Some(author_id) = filter.author_id {
            query = query.filter(post::Column::AuthorId.eq(author_id));
        }
        if let Some(now) = filter.visible_at {
            // Inner join drops posts whose category was removed.
            let now: DateTimeWithTimeZone = now.into();
            query = query
                .join(JoinType::InnerJoin, post::Relation::Category.def())
                .filter(post::Column::IsPublished.eq(true))
                .filter(category::Column::IsPublished.eq(true))
                .filter(post::Column::PubDate.lte(now));
        }

        query
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
    }

    /// Attach authors, categories, locations and comment counts to a batch
    /// of posts with one query per relation.
    async fn assemble(&self, posts: Vec<post::Model>) -> Result<Vec<PostView>, RepoError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let author_ids: Vec<i64> = posts.iter().map(|p| p.author_id).collect();
        let category_ids: Vec<i64> = posts.iter().filter_map(|p| p.category_id).collect();
        let location_ids: Vec<i64> = posts.iter().filter_map(|p| p.location_id).collect();

        let authors: HashMap<i64, User> = UserEntity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|m| (m.id, User::from(m)))
            .collect();

        let categories: HashMap<i64, Category> = CategoryEntity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|m| (m.id, Category::from(m)))
            .collect();

        let locations: HashMap<i64, Location> = LocationEntity::find()
            .filter(location::Column::Id.is_in(location_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|m| (m.id, Location::from(m)))
            .collect();

        let counts: HashMap<i64, i64> = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(Expr::col(comment::Column::Id).count(), "comment_count")
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .collect();

        posts
            .into_iter()
            .map(|model| {
                let author = authors
                    .get(&model.author_id)
                    .map(Author::from)
                    .ok_or_else(|| {
                        RepoError::Constraint(format!("Post {} has no author row", model.id))
                    })?;
                let category = model.category_id.and_then(|id| categories.get(&id).cloned());
                let location = model.location_id.and_then(|id| locations.get(&id).cloned());
                let comment_count = counts.get(&model.id).copied().unwrap_or(0).max(0) as u64;

                Ok(PostView {
                    post: model.into(),
                    author,
                    category,
                    location,
                    comment_count,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_view(&self, id: i64) -> Result<Option<PostView>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(self.assemble(vec![model]).await?.pop())
    }

    async fn find_feed(
        &self,
        filter: &FeedFilter,
        page: PageRequest,
    ) -> Result<Page<PostView>, RepoError> {
        tracing::debug!(?filter, page = page.number, "Loading feed page");

        let paginator = Self::feed_query(filter).paginate(&self.db, page.size);
        let total_items = paginator.num_items().await.map_err(map_db_err)?;
        let models = match page.offset() {
            Some(_) => paginator
                .fetch_page(page.number.saturating_sub(1))
                .await
                .map_err(map_db_err)?,
            None => Vec::new(),
        };

        Ok(Page {
            items: self.assemble(models).await?,
            number: page.number,
            size: page.size,
            total_items,
        })
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post(&self, post_id: i64) -> Result<Vec<CommentView>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter()
            .map(|(model, author)| {
                let author = author.map(User::from).ok_or_else(|| {
                    RepoError::Constraint(format!("Comment {} has no author row", model.id))
                })?;
                Ok(CommentView {
                    author: Author::from(&author),
                    comment: model.into(),
                })
            })
            .collect()
    }
}
