//! Post endpoints.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_core::domain::NewPost;
use inkwell_shared::dto::{CreatePostRequest, CreatePostResponse, PostListResponse, TagsInput};

use super::{detail_response, post_list};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn parse_post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("invalid post id: {}", raw)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let detail = state.posts.get_post(post_id).await?;
    Ok(HttpResponse::Ok().json(detail_response(detail)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let tags = match body.tags {
        TagsInput::List(tags) => tags,
        TagsInput::Joined(raw) => NewPost::parse_tags(&raw),
    };
    let fields = NewPost::new(body.title, body.author, body.content, tags)?;

    let post_id = state.posts.create_post(&identity.0, fields).await?;
    Ok(HttpResponse::Created().json(CreatePostResponse {
        id: post_id.to_string(),
    }))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    state.posts.delete_post(post_id, &identity.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/me/posts
pub async fn my_posts(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.posts.list_by_author(identity.0.author_id).await?;
    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: post_list(posts),
    }))
}
