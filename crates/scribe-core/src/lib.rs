//! # Scribe Core
//!
//! The domain layer of the Scribe blogging backend: entities, the post
//! visibility policy, repository ports and the services built on them.
//! This crate has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
