//! Domain entities - the core business objects.

mod page;
mod post;
mod user;

pub use page::{Page, PageRequest};
pub use post::Post;
pub use user::{DEFAULT_ROLE, User};
