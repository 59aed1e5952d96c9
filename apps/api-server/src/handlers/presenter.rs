//! Core types to wire DTOs.

use scribe_core::domain::{
    Author, Category, CommentView, Page, PostDraft, PostView, User,
};
use scribe_shared::PageMeta;
use scribe_shared::dto::{
    AuthorResponse, CategoryResponse, CommentResponse, LocationResponse, PostRequest,
    PostResponse, ProfileResponse,
};

pub fn author(author: &Author) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username.clone(),
        first_name: author.first_name.clone(),
        last_name: author.last_name.clone(),
    }
}

pub fn category(category: &Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title.clone(),
        description: category.description.clone(),
        slug: category.slug.clone(),
    }
}

pub fn post(view: &PostView) -> PostResponse {
    let post = &view.post;
    PostResponse {
        id: post.id,
        title: post.title.clone(),
        text: post.text.clone(),
        pub_date: post.pub_date,
        author: author(&view.author),
        category: view.category.as_ref().map(category),
        // Unpublished locations are not shown.
        location: view
            .location
            .as_ref()
            .filter(|l| l.is_published)
            .map(|l| LocationResponse {
                id: l.id,
                name: l.name.clone(),
            }),
        image: post.image.clone(),
        is_published: post.is_published,
        comment_count: view.comment_count,
        created_at: post.created_at,
    }
}

pub fn comment(view: &CommentView) -> CommentResponse {
    CommentResponse {
        id: view.comment.id,
        post_id: view.comment.post_id,
        text: view.comment.text.clone(),
        author: author(&view.author),
        created_at: view.comment.created_at,
    }
}

pub fn profile(user: &User) -> ProfileResponse {
    ProfileResponse {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        date_joined: user.created_at,
    }
}

pub fn page_meta<T>(page: &Page<T>) -> PageMeta {
    PageMeta {
        page: page.number,
        page_size: page.size,
        total_items: page.total_items,
        total_pages: page.total_pages(),
        has_next: page.has_next(),
        has_previous: page.has_previous(),
    }
}

pub fn posts(page: &Page<PostView>) -> Vec<PostResponse> {
    page.items.iter().map(post).collect()
}

pub fn post_draft(req: PostRequest) -> PostDraft {
    PostDraft {
        title: req.title,
        text: req.text,
        pub_date: req.pub_date,
        category_id: req.category_id,
        location_id: req.location_id,
        image: req.image.filter(|path| !path.is_empty()),
        is_published: req.is_published,
    }
}
