//! Landing page and incremental feed loading.

use actix_web::{HttpResponse, web};

use inkwell_core::domain::{Page, VisitorContext};
use inkwell_shared::dto::{FeedQuery, HomePageResponse, PostListResponse};

use super::{post_list, tag_list, viewer_response};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::middleware::visitor::VisitorInfo;
use crate::state::AppState;

/// GET /
///
/// Serves the first feed page and the tag index. The visit is counted in the
/// background and never delays or fails the response.
pub async fn home(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    visitor: VisitorInfo,
) -> AppResult<HttpResponse> {
    let context = VisitorContext::new(identity.0, visitor.network_origin, visitor.agent);
    let page = state.feed.compose_home_page(context).await?;

    Ok(HttpResponse::Ok().json(HomePageResponse {
        viewer: page.viewer.map(viewer_response),
        posts: post_list(page.feed.posts),
        tags: tag_list(page.feed.tag_counts),
    }))
}

/// GET /api/posts?skip=&limit=
///
/// Continuation pages. No visit is recorded here.
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<FeedQuery>,
) -> AppResult<HttpResponse> {
    let page = Page::new(query.skip, query.limit, state.feed.page_limit())?;
    let posts = state.posts.list_feed(page).await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: post_list(posts),
    }))
}
