use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Page, PageRequest, Post, User};
use crate::error::RepoError;

/// User repository - the credential store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    /// Find a user by their unique username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Whether a user with this username already exists.
    async fn exists_by_username(&self, username: &str) -> Result<bool, RepoError>;

    /// Whether a user with this email already exists.
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError>;

    /// Persist a new user.
    async fn insert(&self, user: User) -> Result<User, RepoError>;
}

/// Post repository with paged finders.
///
/// Title matching is a case-insensitive substring match; author matching is
/// exact. Pages are ordered newest-first by creation time.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a post by its unique ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Persist a new post.
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Overwrite an existing post record.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// Remove a post record. Fails with [`RepoError::NotFound`] when no row
    /// matched.
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// One page of all posts.
    async fn find_page(&self, page: PageRequest) -> Result<Page<Post>, RepoError>;

    /// One page of posts whose title contains `title`, ignoring case.
    async fn find_by_title(&self, title: &str, page: PageRequest) -> Result<Page<Post>, RepoError>;

    /// One page of posts by the given author.
    async fn find_by_author(
        &self,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError>;

    /// One page of posts matching both the title substring and the author.
    async fn find_by_title_and_author(
        &self,
        title: &str,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError>;
}
