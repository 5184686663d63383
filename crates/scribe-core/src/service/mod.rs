//! Services - orchestration of ports into the operations the API exposes.

mod auth;
mod post;

pub use auth::{Authenticated, AuthService};
pub use post::{ImageUpload, NewPost, PostChanges, PostService};
