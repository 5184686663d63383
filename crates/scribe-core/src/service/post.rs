//! Post CRUD, search, and the image reconciliation logic.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Page, PageRequest, Post};
use crate::error::DomainError;
use crate::ports::{ImageStore, PostRepository, UserRepository};

/// One uploaded file, decoded from the request body.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Fields of a post to create.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub images: Vec<ImageUpload>,
}

/// Partial update of a post. `None` means "leave unchanged".
///
/// `kept_images` is the caller's existing-image list: references currently on
/// the post that survive the update, in the caller's order. `None` retains
/// all current images; `Some(vec![])` drops them all.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub kept_images: Option<Vec<String>>,
    pub new_images: Vec<ImageUpload>,
}

/// Orchestrates create/read/update/delete/search of posts, composing the
/// post store, the image store, and the author-ownership check.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    images: Arc<dyn ImageStore>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            posts,
            users,
            images,
        }
    }

    /// Create a post for `author_id`, persisting uploaded images first.
    ///
    /// Image files are stored before the post record is written, so an upload
    /// failure never leaves an orphaned post behind.
    pub async fn create(&self, new_post: NewPost, author_id: Uuid) -> Result<Post, DomainError> {
        self.ensure_author_exists(author_id).await?;

        let mut references = Vec::with_capacity(new_post.images.len());
        for upload in &new_post.images {
            references.push(self.images.store(&upload.bytes, &upload.file_name).await?);
        }

        let post = Post::new(author_id, new_post.title, new_post.content, references);
        let post = self.posts.insert(post).await?;

        tracing::info!(post_id = %post.id, author_id = %post.author_id, images = post.images.len(), "created post");
        Ok(post)
    }

    /// Fetch a single post.
    pub async fn get(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }

    /// Apply a partial update, reconciling the image list against the store.
    ///
    /// Only the post's author may update it. Title and content are replaced
    /// only where supplied. The final image list is the kept list (caller
    /// order) followed by freshly uploaded references (upload order); current
    /// images missing from the kept list are deleted from the image store,
    /// best-effort. An upload failure aborts the update; a deletion failure
    /// does not.
    pub async fn update(
        &self,
        post_id: Uuid,
        changes: PostChanges,
        requesting_user_id: Uuid,
    ) -> Result<Post, DomainError> {
        let mut post = self.get(post_id).await?;

        if post.author_id != requesting_user_id {
            return Err(DomainError::Forbidden);
        }

        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }

        // Absent kept list means "retain all current images", never "drop all".
        let kept = changes
            .kept_images
            .unwrap_or_else(|| post.images.clone());

        for reference in &post.images {
            if !kept.contains(reference) {
                self.delete_image_best_effort(reference).await;
            }
        }

        let mut images = kept;
        for upload in &changes.new_images {
            images.push(self.images.store(&upload.bytes, &upload.file_name).await?);
        }

        post.images = images;
        post.updated_at = Utc::now();

        let post = self.posts.update(post).await?;
        tracing::info!(post_id = %post.id, images = post.images.len(), "updated post");
        Ok(post)
    }

    /// Delete a post and, best-effort, every image file it owned.
    ///
    /// The record is removed even when some image deletions failed; image
    /// cleanup is not transactional with the post store.
    pub async fn delete(&self, post_id: Uuid) -> Result<(), DomainError> {
        let post = self.get(post_id).await?;

        for reference in &post.images {
            self.delete_image_best_effort(reference).await;
        }

        self.posts.delete(post.id).await?;
        tracing::info!(post_id = %post.id, "deleted post");
        Ok(())
    }

    /// One page of all posts, newest first.
    pub async fn list(&self, page: PageRequest) -> Result<Page<Post>, DomainError> {
        Ok(self.posts.find_page(page).await?)
    }

    /// Posts whose title contains `title`, ignoring case.
    pub async fn search_by_title(
        &self,
        title: &str,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        Ok(self.posts.find_by_title(title, page).await?)
    }

    /// Posts written by `author_id`.
    pub async fn search_by_author(
        &self,
        author_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        self.ensure_author_exists(author_id).await?;
        Ok(self.posts.find_by_author(author_id, page).await?)
    }

    /// Combined search: dispatches on which criteria were supplied.
    pub async fn search(
        &self,
        title: Option<&str>,
        author_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Page<Post>, DomainError> {
        match (title, author_id) {
            (Some(title), Some(author_id)) => {
                self.ensure_author_exists(author_id).await?;
                Ok(self
                    .posts
                    .find_by_title_and_author(title, author_id, page)
                    .await?)
            }
            (Some(title), None) => self.search_by_title(title, page).await,
            (None, Some(author_id)) => self.search_by_author(author_id, page).await,
            (None, None) => self.list(page).await,
        }
    }

    async fn ensure_author_exists(&self, author_id: Uuid) -> Result<(), DomainError> {
        self.users
            .find_by_id(author_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| DomainError::user_not_found(author_id))
    }

    /// Deletion failures are logged and otherwise ignored; the surrounding
    /// operation carries on.
    async fn delete_image_best_effort(&self, reference: &str) {
        if let Err(err) = self.images.delete(reference).await {
            tracing::warn!(%reference, error = %err, "image deletion failed, continuing");
        }
    }
}
