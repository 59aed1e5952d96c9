use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Author;
use crate::error::DomainError;

/// Comment entity - a short reply attached to exactly one post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Maximum comment length in characters.
    pub const MAX_LEN: usize = 150;

    pub fn new(post_id: i64, author_id: i64, text: String, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            post_id,
            author_id,
            text,
            created_at: now,
        }
    }

    /// Check comment text against the length rules.
    pub fn validate_text(text: &str) -> Result<(), DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::Validation("Comment must not be empty".to_string()));
        }
        if text.chars().count() > Self::MAX_LEN {
            return Err(DomainError::Validation(format!(
                "Comment must not exceed {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(())
    }
}

/// A comment joined with its author.
#[derive(Debug, Clone)]
pub struct CommentView {
    pub comment: Comment,
    pub author: Author,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text_accepts_limit() {
        let text = "a".repeat(Comment::MAX_LEN);
        assert!(Comment::validate_text(&text).is_ok());
    }

    #[test]
    fn test_validate_text_rejects_151_chars() {
        let text = "a".repeat(151);
        let result = Comment::validate_text(&text);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_validate_text_counts_chars_not_bytes() {
        // 150 Cyrillic letters are 300 bytes.
        let text = "ж".repeat(150);
        assert!(Comment::validate_text(&text).is_ok());
    }

    #[test]
    fn test_validate_text_rejects_blank() {
        assert!(Comment::validate_text("   ").is_err());
    }
}
