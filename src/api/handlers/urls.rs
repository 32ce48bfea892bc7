//! Handler for listing the caller's short URLs.

use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::url::{PageInfo, UrlListResponse, UrlResponse};
use crate::api::middleware::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's short URLs, newest first.
///
/// # Endpoint
///
/// `GET /url/my-urls?page=1&page_size=25` (authenticated)
///
/// # Errors
///
/// Returns `400` for `page=0` or a `page_size` outside `1..=100`.
pub async fn my_urls_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<UrlListResponse>, AppError> {
    let page = params.resolve()?;

    let (records, total) = state
        .url_service
        .list_for_user(user.id, page.offset(), page.limit())
        .await?;

    let items = records
        .into_iter()
        .map(|record| {
            let short_link = state.url_service.short_link(&record.short_code);
            UrlResponse::from_record(record, short_link)
        })
        .collect();

    Ok(Json(UrlListResponse {
        items,
        pagination: PageInfo::new(page.page, page.page_size, total),
    }))
}
