//! PostgreSQL repository implementations.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select,
};
use uuid::Uuid;

use scribe_core::domain::{Page, PageRequest, Post, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

fn map_query_err(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

/// Unique-index violations surface as constraint errors so callers can
/// distinguish them from plain query failures.
fn map_write_err(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("entity already exists".to_string())
    } else {
        RepoError::Query(err_str)
    }
}

/// Escapes LIKE metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Case-insensitive substring match on the post title.
fn title_contains(title: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&title.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(post::Column::Title))).like(pattern)
}

/// PostgreSQL user repository.
///
/// The connection is shared behind an `Arc` so every repository in the
/// process runs on the same pool.
pub struct PostgresUserRepository {
    db: Arc<DbConn>,
}

impl PostgresUserRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(map_query_err)?;

        Ok(result.map(Into::into))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, RepoError> {
        let count = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .count(self.db.as_ref())
            .await
            .map_err(map_query_err)?;

        Ok(count > 0)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(self.db.as_ref())
            .await
            .map_err(map_query_err)?;

        Ok(count > 0)
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let active_model: user::ActiveModel = user.into();
        let model = active_model.insert(self.db.as_ref()).await.map_err(map_write_err)?;

        Ok(model.into())
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: Arc<DbConn>,
}

impl PostgresPostRepository {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }

    /// Runs `select` as a newest-first page and wraps it with count metadata.
    async fn fetch(
        &self,
        select: Select<PostEntity>,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let paginator = select
            .order_by_desc(post::Column::CreatedAt)
            .paginate(self.db.as_ref(), page.size.max(1));

        let total_items = paginator.num_items().await.map_err(map_query_err)?;
        let items = paginator
            .fetch_page(page.page)
            .await
            .map_err(map_query_err)?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(Page::new(items, page, total_items))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_query_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let active_model: post::ActiveModel = post.into();
        let model = active_model.insert(self.db.as_ref()).await.map_err(map_write_err)?;

        Ok(model.into())
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let active_model: post::ActiveModel = post.into();
        let model = active_model.update(self.db.as_ref()).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => RepoError::NotFound,
            other => map_write_err(other),
        })?;

        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(map_query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn find_page(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        self.fetch(PostEntity::find(), page).await
    }

    async fn find_by_title(&self, title: &str, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let select = PostEntity::find().filter(title_contains(title));
        self.fetch(select, page).await
    }

    async fn find_by_author(
        &self,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let select = PostEntity::find().filter(post::Column::AuthorId.eq(author_id));
        self.fetch(select, page).await
    }

    async fn find_by_title_and_author(
        &self,
        title: &str,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let select = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .filter(title_contains(title));
        self.fetch(select, page).await
    }
}
