use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Author, Category, Location};

/// Post entity - a blog entry, possibly scheduled for a future date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    /// Nulled when the category is removed from the store.
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Build a new, not yet persisted post from a submitted draft.
    ///
    /// `pub_date` must already be clamped by the caller.
    pub fn new(author_id: i64, draft: PostDraft, pub_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            author_id,
            category_id: Some(draft.category_id),
            location_id: draft.location_id,
            title: draft.title,
            text: draft.text,
            pub_date,
            image: draft.image,
            is_published: draft.is_published,
            created_at: now,
        }
    }

    /// Overwrite the editable fields, keeping author and creation time.
    pub fn apply(&mut self, draft: PostDraft, pub_date: DateTime<Utc>) {
        self.category_id = Some(draft.category_id);
        self.location_id = draft.location_id;
        self.title = draft.title;
        self.text = draft.text;
        self.pub_date = pub_date;
        self.image = draft.image;
        self.is_published = draft.is_published;
    }
}

/// The post form as submitted on create and edit.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    /// Requested publish date; `None` means "now".
    pub pub_date: Option<DateTime<Utc>>,
    pub category_id: i64,
    pub location_id: Option<i64>,
    pub image: Option<String>,
    pub is_published: bool,
}

/// A post joined with its author, category and location, plus its comment count.
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: Post,
    pub author: Author,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}
