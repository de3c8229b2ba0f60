use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::page_cache::PageCache;
use super::pages::{
    render_error_page, render_home_page, render_loading_page, render_not_found_page,
    render_post_page, HomePageParams,
};
use super::AppState;
use crate::constants::{FALLBACK_WAIT_MS, MAX_LISTING_PAGES};
use crate::content::{ContentError, PostPage};
use crate::generate::{is_safe_slug, listing_props, post_props, DetailState};
use crate::listing::Listing;

const LOAD_MORE_FAILED: &str = "Não foi possível carregar mais posts.";
const UPSTREAM_FAILED: &str = "Não foi possível carregar o conteúdo. Tente novamente em instantes.";

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/post/:slug", get(post_detail))
        .route("/api/posts", get(api_posts))
        .route("/healthz", get(health))
        .fallback(not_found)
}

async fn cached_listing(state: &AppState) -> Result<PostPage, ContentError> {
    state
        .cache
        .listing
        .get_or_generate(PageCache::LISTING_KEY, || {
            listing_props(state.api.as_ref(), &state.config)
        })
        .await
}

fn upstream_error_page() -> Response {
    let page = render_error_page(UPSTREAM_FAILED);
    (StatusCode::BAD_GATEWAY, Html(page.into_string())).into_response()
}

// ========== HTML Routes ==========

#[derive(Debug, Deserialize)]
pub struct HomeParams {
    pages: Option<usize>,
}

async fn home(State(state): State<AppState>, Query(params): Query<HomeParams>) -> Response {
    let first_page = match cached_listing(&state).await {
        Ok(page) => page,
        Err(e) => {
            error!("Failed to generate listing: {e}");
            return upstream_error_page();
        }
    };

    let pages = params.pages.unwrap_or(1).clamp(1, MAX_LISTING_PAGES);
    let mut listing = Listing::with_scope(first_page, state.shutdown.child_token());

    let load_error = match listing.load_pages(state.api.as_ref(), pages).await {
        Ok(loaded) => {
            debug!(requested = pages, loaded, "Rendered listing");
            None
        }
        Err(e) => {
            warn!(requested = pages, loaded = listing.pages_loaded(), "Listing incomplete: {e}");
            Some(LOAD_MORE_FAILED)
        }
    };

    let html = render_home_page(&HomePageParams::from_listing(&listing, load_error));
    Html(html.into_string()).into_response()
}

async fn post_detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    if !is_safe_slug(&slug) {
        return not_found().await;
    }

    // Generation runs detached so that a slow upstream does not lose the work
    // when the loading page is returned first. Concurrent requests for the
    // same slug share one generation.
    let generation = {
        let state = state.clone();
        tokio::spawn(async move {
            state
                .cache
                .posts
                .get_or_generate(&slug, || post_props(state.api.as_ref(), &state.config, &slug))
                .await
        })
    };

    match tokio::time::timeout(Duration::from_millis(FALLBACK_WAIT_MS), generation).await {
        Ok(Ok(Ok(DetailState::Found(post)))) => Html(render_post_page(&post).into_string()).into_response(),
        Ok(Ok(Ok(DetailState::NotFound { .. }))) => not_found().await,
        Ok(Ok(Err(e))) => {
            error!("Failed to generate post: {e}");
            upstream_error_page()
        }
        Ok(Err(e)) => {
            error!("Post generation task failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
        }
        Err(_) => {
            debug!("Post still generating, serving loading page");
            Html(render_loading_page().into_string()).into_response()
        }
    }
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(render_not_found_page().into_string()),
    )
        .into_response()
}

async fn health() -> &'static str {
    "OK"
}

// ========== JSON API Routes ==========

#[derive(Debug, Deserialize)]
pub struct ApiPostsParams {
    cursor: Option<String>,
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

fn api_error(e: &ContentError) -> Response {
    let status = match e {
        ContentError::InvalidCursor(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ApiError {
            error: e.to_string(),
        }),
    )
        .into_response()
}

/// One page of post summaries. Without a cursor this is the first page.
async fn api_posts(
    State(state): State<AppState>,
    Query(params): Query<ApiPostsParams>,
) -> Response {
    let Some(cursor) = params.cursor.filter(|c| !c.is_empty()) else {
        return match cached_listing(&state).await {
            Ok(page) => Json(page).into_response(),
            Err(e) => {
                error!("Failed to generate listing: {e}");
                api_error(&e)
            }
        };
    };

    match state
        .api
        .fetch_page(&cursor)
        .await
        .and_then(PostPage::from_api)
    {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            warn!("Failed to fetch posts page: {e}");
            api_error(&e)
        }
    }
}
