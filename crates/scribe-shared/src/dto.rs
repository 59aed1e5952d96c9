//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// =============================================================================
// AUTH & PROFILE
// =============================================================================

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        regex(
            path = "*crate::validation::USERNAME_REGEX",
            message = "Username may contain only letters, digits and . @ + - _"
        )
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Request to edit the caller's own profile.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 150, message = "First name must be 1-150 characters"))]
    pub first_name: String,

    #[validate(length(max = 150, message = "Last name must not exceed 150 characters"))]
    #[serde(default)]
    pub last_name: String,

    #[validate(
        length(min = 1, max = 150, message = "Username must be 1-150 characters"),
        regex(
            path = "*crate::validation::USERNAME_REGEX",
            message = "Username may contain only letters, digits and . @ + - _"
        )
    )]
    pub username: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 150, message = "Email must not exceed 150 characters")
    )]
    pub email: String,
}

/// A user's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: DateTime<Utc>,
}

/// Author summary embedded in posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

// =============================================================================
// POSTS
// =============================================================================

/// The post form, used for both create and edit.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostRequest {
    #[validate(length(min = 1, max = 256, message = "Title must be 1-256 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Text is required"))]
    pub text: String,

    /// Omitted or past dates publish immediately.
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,

    pub category_id: i64,

    #[serde(default)]
    pub location_id: Option<i64>,

    #[validate(length(max = 512, message = "Image path must not exceed 512 characters"))]
    #[serde(default)]
    pub image: Option<String>,

    #[serde(default = "default_true")]
    pub is_published: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: AuthorResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub is_published: bool,
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
}

/// A post with its comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

// =============================================================================
// COMMENTS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 150, message = "Comment must be 1-150 characters"))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub author: AuthorResponse,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// FEEDS
// =============================================================================

/// `?page=N` on feed endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u64,
}

fn default_page() -> u64 {
    1
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFeedResponse {
    pub category: CategoryResponse,
    pub posts: Vec<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileFeedResponse {
    pub profile: ProfileResponse,
    pub posts: Vec<PostResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_request_rejects_151_chars() {
        let req = CommentRequest {
            text: "x".repeat(151),
        };
        assert!(req.validate().is_err());

        let req = CommentRequest {
            text: "x".repeat(150),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_validation() {
        let req = RegisterUserRequest {
            username: "bad name".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_post_request_defaults() {
        let req: PostRequest =
            serde_json::from_str(r#"{"title":"T","text":"Body","category_id":3}"#).unwrap();
        assert!(req.is_published);
        assert!(req.pub_date.is_none());
        assert!(req.location_id.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_page_query_defaults_to_first_page() {
        let q: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page, 1);
    }
}
