use axum::{
    Router,
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::auth::CurrentUser;
use crate::errors::ApiError;
use crate::identity;
use crate::models::{ArticleView, BookmarkedArticle, Category};
use crate::repositories::BookmarkRepository;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct NewsQuery {
    page: Option<u32>,
    q: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AddBookmarkRequest {
    article_id: String,
}

#[instrument(skip_all, fields(page = query.page, has_query = query.q.is_some(), category = query.category.as_deref()))]
async fn list_news<S: AppState>(
    State(state): State<S>,
    user: CurrentUser,
    Query(query): Query<NewsQuery>,
) -> Result<ResponseJson<Vec<ArticleView>>, ApiError> {
    debug!("processing news listing request");

    let page = query.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::BadRequest(
            "page must be greater than 0".to_string(),
        ));
    }

    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let category = match query.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) if raw.eq_ignore_ascii_case("all") => None,
        Some(raw) => Some(raw.parse::<Category>()?),
    };

    let articles = state
        .news()
        .get_articles(page, q, category, user.as_deref())
        .await;

    info!(returned_count = articles.len(), "served news listing");
    Ok(ResponseJson(articles))
}

#[instrument(skip_all)]
async fn refresh_news<S: AppState>(State(state): State<S>) -> ResponseJson<Value> {
    info!("refreshing news cache for all categories");
    state.news().refresh_all().await;
    ResponseJson(json!({ "success": true }))
}

#[instrument(skip_all, fields(has_user = user.0.is_some()))]
async fn list_bookmarks<S: AppState>(
    State(state): State<S>,
    user: CurrentUser,
) -> Result<ResponseJson<Vec<BookmarkedArticle>>, ApiError> {
    // Anonymous callers simply have no bookmarks; reads never demand a
    // session.
    let Some(user_id) = user.as_deref() else {
        return Ok(ResponseJson(Vec::new()));
    };

    let entries = state.news().get_bookmarked_articles(user_id).await?;
    info!(returned_count = entries.len(), "served bookmarks listing");
    Ok(ResponseJson(entries))
}

#[instrument(skip_all, fields(has_user = user.0.is_some()))]
async fn add_bookmark<S: AppState>(
    State(state): State<S>,
    user: CurrentUser,
    Json(payload): Json<AddBookmarkRequest>,
) -> Result<StatusCode, ApiError> {
    let user_id = user.require()?;

    let article_id = payload.article_id.trim();
    if article_id.is_empty() {
        return Err(ApiError::BadRequest(
            "article_id must not be empty".to_string(),
        ));
    }

    // Clients may send the raw URL or the stored identity; both normalize
    // to the same key.
    let article_id = identity::encode(article_id);
    state.bookmarks().add(&user_id, &article_id).await?;

    info!(%article_id, "bookmark added");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all, fields(has_user = user.0.is_some()))]
async fn remove_bookmark<S: AppState>(
    State(state): State<S>,
    user: CurrentUser,
    Path(article_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let user_id = user.require()?;

    // The path segment arrives percent-decoded; re-encode to the stored key.
    let article_id = identity::encode(&article_id);
    state.bookmarks().remove(&user_id, &article_id).await?;

    info!(%article_id, "bookmark removed");
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_api_v1_router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/news", get(list_news::<S>))
        .route("/news/refresh", post(refresh_news::<S>))
        .route(
            "/bookmarks",
            get(list_bookmarks::<S>).post(add_bookmark::<S>),
        )
        .route("/bookmarks/{article_id}", delete(remove_bookmark::<S>))
}
