//! In-memory repositories - used as fallback when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use scribe_core::domain::{Page, PageRequest, Post, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{PostRepository, UserRepository};

/// In-memory user store using a simple HashMap with async RwLock.
///
/// This is the fallback implementation when Postgres is not configured.
/// Note: Data is lost on process restart.
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.username == username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().any(|u| u.email == email))
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        // Mirror the unique indexes the Postgres schema enforces.
        if store
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(RepoError::Constraint("entity already exists".to_string()));
        }

        store.insert(user.id, user.clone());
        Ok(user)
    }
}

/// In-memory post store with the same paging and matching semantics as the
/// Postgres repository.
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    fn page_of(mut posts: Vec<Post>, page: PageRequest) -> Page<Post> {
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total_items = posts.len() as u64;
        let items = posts
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect();
        Page::new(items, page, total_items)
    }

    fn matches_title(post: &Post, title: &str) -> bool {
        post.title.to_lowercase().contains(&title.to_lowercase())
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if !store.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }

        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        if store.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn find_page(&self, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(Self::page_of(store.values().cloned().collect(), page))
    }

    async fn find_by_title(&self, title: &str, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let store = self.store.read().await;
        let posts = store
            .values()
            .filter(|p| Self::matches_title(p, title))
            .cloned()
            .collect();
        Ok(Self::page_of(posts, page))
    }

    async fn find_by_author(
        &self,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let store = self.store.read().await;
        let posts = store
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        Ok(Self::page_of(posts, page))
    }

    async fn find_by_title_and_author(
        &self,
        title: &str,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let store = self.store.read().await;
        let posts = store
            .values()
            .filter(|p| p.author_id == author_id && Self::matches_title(p, title))
            .cloned()
            .collect();
        Ok(Self::page_of(posts, page))
    }
}
