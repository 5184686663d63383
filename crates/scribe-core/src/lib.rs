//! # Scribe Core
//!
//! The domain layer of the Scribe blogging backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the ports that infrastructure must implement, and the auth/post
//! services that orchestrate them.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::DomainError;
