//! HTTP handlers and route configuration.

mod feed;
mod health;
mod posts;
mod tags;


use actix_web::web;

use inkwell_core::domain::{AuthenticatedUser, AuthorProfile, Post, PostDetail, TagCount};
use inkwell_shared::dto::{AuthorResponse, PostDetailResponse, PostResponse, TagCountResponse};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(feed::home)).service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(feed::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            )
            .route("/me/posts", web::get().to(posts::my_posts))
            .service(
                web::scope("/tags")
                    .route("", web::get().to(tags::tag_counts))
                    .route("/{tag}/posts", web::get().to(tags::posts_by_tag)),
            ),
    );
}

pub(crate) fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        author_id: post.author_id.to_string(),
        title: post.title,
        author: post.author_display_name,
        content: post.content,
        tags: post.tags,
        created_at: post.created_at.to_rfc3339(),
    }
}

pub(crate) fn post_list(posts: Vec<Post>) -> Vec<PostResponse> {
    posts.into_iter().map(post_response).collect()
}

pub(crate) fn tag_list(tags: Vec<TagCount>) -> Vec<TagCountResponse> {
    tags.into_iter()
        .map(|t| TagCountResponse {
            tag: t.tag,
            count: t.count,
        })
        .collect()
}

pub(crate) fn author_response(profile: AuthorProfile) -> AuthorResponse {
    AuthorResponse {
        id: profile.author_id.to_string(),
        display_name: profile.display_name,
        masked_contact: profile.masked_contact,
    }
}

pub(crate) fn viewer_response(user: AuthenticatedUser) -> AuthorResponse {
    AuthorResponse {
        id: user.author_id.to_string(),
        display_name: user.display_name,
        masked_contact: user.masked_contact,
    }
}

pub(crate) fn detail_response(detail: PostDetail) -> PostDetailResponse {
    PostDetailResponse {
        post: post_response(detail.post),
        author: author_response(detail.author),
    }
}
