use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog post with an ordered list of image references.
///
/// `author_id` is set once at creation and never changed afterwards. Each
/// entry of `images` is an opaque locator (`/images/{uuid}_{name}`) owned by
/// exactly this post; the list order is the display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with generated ID and timestamps.
    pub fn new(author_id: Uuid, title: String, content: String, images: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            images,
            created_at: now,
            updated_at: now,
        }
    }
}
