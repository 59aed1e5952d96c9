//! # Scribe Shared
//!
//! Wire types shared by the API server and its clients: request/response
//! DTOs, the response envelope and RFC 7807 error bodies.

pub mod dto;
pub mod response;
pub mod validation;

pub use response::{ApiResponse, ErrorResponse, PageMeta};
