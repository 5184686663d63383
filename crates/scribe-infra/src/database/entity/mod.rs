//! SeaORM entity definitions for the Postgres schema.

pub mod post;
pub mod user;
