//! Post visibility and ownership rules.
//!
//! Every read path (feeds, detail) and every mutation path (edit/delete of
//! posts and comments) goes through these functions so the rules cannot
//! drift apart between handlers.

use chrono::{DateTime, Utc};

use crate::domain::{Category, Comment, CommentView, Post, PostView};

/// Anything with a fixed author.
pub trait Authored {
    fn author_id(&self) -> i64;
}

impl Authored for Post {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

impl Authored for PostView {
    fn author_id(&self) -> i64 {
        self.post.author_id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

impl Authored for CommentView {
    fn author_id(&self) -> i64 {
        self.comment.author_id
    }
}

/// Whether anyone at all may read `post` at `now`.
///
/// A post without a category never passes.
pub fn is_publicly_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published && category.is_some_and(|c| c.is_published) && post.pub_date <= now
}

/// Whether `viewer` may read the post. Authors always see their own posts.
pub fn can_view(view: &PostView, viewer: Option<i64>, now: DateTime<Utc>) -> bool {
    viewer == Some(view.post.author_id)
        || is_publicly_visible(&view.post, view.category.as_ref(), now)
}

/// Whether `actor` may edit or delete `entity`.
pub fn can_modify(entity: &impl Authored, actor: i64) -> bool {
    entity.author_id() == actor
}

/// Publish date to store for a submitted post.
///
/// Back-dating is not allowed: a missing or past date becomes `now`.
pub fn scheduled_pub_date(requested: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match requested {
        Some(date) if date > now => date,
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Author;
    use chrono::{Duration, TimeZone};

    const AUTHOR: i64 = 7;
    const STRANGER: i64 = 8;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn category(is_published: bool) -> Category {
        Category {
            id: 1,
            title: "News".to_string(),
            description: "Daily news".to_string(),
            slug: "news".to_string(),
            is_published,
            created_at: now(),
        }
    }

    fn view(is_published: bool, category: Option<Category>, pub_date: DateTime<Utc>) -> PostView {
        PostView {
            post: Post {
                id: 1,
                author_id: AUTHOR,
                category_id: category.as_ref().map(|c| c.id),
                location_id: None,
                title: "Hello".to_string(),
                text: "World".to_string(),
                pub_date,
                image: None,
                is_published,
                created_at: now(),
            },
            author: Author {
                id: AUTHOR,
                username: "author".to_string(),
                first_name: String::new(),
                last_name: String::new(),
            },
            category,
            location: None,
            comment_count: 0,
        }
    }

    #[test]
    fn test_can_view_truth_table() {
        let past = now() - Duration::hours(1);
        let future = now() + Duration::days(1);

        for post_published in [true, false] {
            for category_state in [None, Some(true), Some(false)] {
                for pub_date in [past, now(), future] {
                    let v = view(post_published, category_state.map(category), pub_date);
                    let expected = post_published && category_state == Some(true) && pub_date <= now();

                    assert_eq!(can_view(&v, None, now()), expected, "anonymous");
                    assert_eq!(can_view(&v, Some(STRANGER), now()), expected, "stranger");
                    assert!(can_view(&v, Some(AUTHOR), now()), "author always sees own post");
                }
            }
        }
    }

    #[test]
    fn test_post_without_category_hidden_from_others() {
        let v = view(true, None, now() - Duration::days(3));
        assert!(!can_view(&v, None, now()));
        assert!(!can_view(&v, Some(STRANGER), now()));
        assert!(can_view(&v, Some(AUTHOR), now()));
    }

    #[test]
    fn test_scheduled_post_becomes_visible_at_pub_date() {
        let pub_date = now() + Duration::minutes(5);
        let v = view(true, Some(category(true)), pub_date);
        assert!(!can_view(&v, None, now()));
        assert!(can_view(&v, None, pub_date));
    }

    #[test]
    fn test_can_modify_only_author() {
        let v = view(true, Some(category(true)), now());
        assert!(can_modify(&v, AUTHOR));
        assert!(!can_modify(&v, STRANGER));

        let comment = Comment::new(1, STRANGER, "hi".to_string(), now());
        assert!(can_modify(&comment, STRANGER));
        assert!(!can_modify(&comment, AUTHOR));
    }

    #[test]
    fn test_scheduled_pub_date_clamps_past_to_now() {
        let past = now() - Duration::days(2);
        assert_eq!(scheduled_pub_date(Some(past), now()), now());
        assert_eq!(scheduled_pub_date(None, now()), now());
    }

    #[test]
    fn test_scheduled_pub_date_keeps_future() {
        let future = now() + Duration::days(2);
        assert_eq!(scheduled_pub_date(Some(future), now()), future);
    }
}
