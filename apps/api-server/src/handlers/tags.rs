//! Tag index endpoints.

use actix_web::{HttpResponse, web};

use inkwell_shared::dto::PostListResponse;

use super::{post_list, tag_list};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/tags
pub async fn tag_counts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.posts.tag_counts().await?;
    Ok(HttpResponse::Ok().json(tag_list(tags)))
}

/// GET /api/tags/{tag}/posts
pub async fn posts_by_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_by_tag(&path).await?;
    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: post_list(posts),
    }))
}
