//! Infrastructure layer - adapter implementations of the scribe-core ports.
//!
//! Contains the SeaORM/Postgres repositories (with an in-memory fallback),
//! JWT token issuing, Argon2 password hashing, and filesystem image storage.

pub mod auth;
pub mod database;
pub mod storage;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{
    DatabaseConfig, InMemoryPostRepository, InMemoryUserRepository, PostgresPostRepository,
    PostgresUserRepository,
};
pub use storage::FsImageStore;
