use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use insights_core::Paginated;
use insights_db::{DeletedCounts, PageListFilters, PageRow};
use insights_service::PageSummary;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, map_service_error, parse_query, ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub(super) struct PagesQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub min_followers: Option<i64>,
    pub max_followers: Option<i64>,
    pub industry: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct PageListResponse {
    pages: Vec<PageRow>,
    total: u64,
    page: u32,
    page_size: u32,
    total_pages: u64,
}

impl From<Paginated<PageRow>> for PageListResponse {
    fn from(paginated: Paginated<PageRow>) -> Self {
        Self {
            pages: paginated.items,
            total: paginated.total,
            page: paginated.page,
            page_size: paginated.page_size,
            total_pages: paginated.total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct DeleteResponse {
    message: String,
    page_id: String,
    deleted: DeletedCounts,
}

/// Blank text filters are treated as absent.
fn text_filter(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(super) async fn list_pages(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<PagesQuery>, QueryRejection>,
) -> Result<Json<PageListResponse>, ApiError> {
    let query = parse_query(&req_id.0, query)?;
    let request = state.page_request(&req_id.0, query.page, query.page_size)?;

    if let (Some(min), Some(max)) = (query.min_followers, query.max_followers) {
        if min > max {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                "min_followers must not exceed max_followers",
            ));
        }
    }

    let filters = PageListFilters {
        min_followers: query.min_followers,
        max_followers: query.max_followers,
        industry: text_filter(query.industry.as_deref()),
        search: text_filter(query.search.as_deref()),
    };
    let pool = state.service.pool();

    let total = insights_db::count_pages(pool, &filters)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let rows = insights_db::list_pages(pool, &filters, request.limit(), request.offset())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(Paginated::new(rows, total, request).into()))
}

pub(super) async fn get_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(page_id): Path<String>,
) -> Result<Json<PageRow>, ApiError> {
    state
        .service
        .get_page(&page_id)
        .await
        .map(Json)
        .map_err(|e| map_service_error(req_id.0, e))
}

pub(super) async fn refresh_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(page_id): Path<String>,
) -> Result<Json<PageRow>, ApiError> {
    state
        .service
        .refresh_page(&page_id)
        .await
        .map(Json)
        .map_err(|e| map_service_error(req_id.0, e))
}

pub(super) async fn delete_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(page_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state
        .service
        .delete_page(&page_id)
        .await
        .map_err(|e| map_service_error(req_id.0, e))?;

    Ok(Json(DeleteResponse {
        message: format!("page {page_id} deleted"),
        page_id,
        deleted,
    }))
}

pub(super) async fn page_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(page_id): Path<String>,
) -> Result<Json<PageSummary>, ApiError> {
    state
        .service
        .page_summary(&page_id)
        .await
        .map(Json)
        .map_err(|e| map_service_error(req_id.0, e))
}
