mod pages;
mod related;

use axum::{
    extract::{rejection::QueryRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use insights_core::{AppConfig, PageRequest, PaginationError};
use insights_service::{IngestError, PageService, ServiceError};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub service: PageService,
    pub pagination: PaginationDefaults,
}

#[derive(Debug, Clone, Copy)]
pub struct PaginationDefaults {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl PaginationDefaults {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

#[derive(Debug, Serialize)]
struct RootData {
    message: &'static str,
    version: &'static str,
    docs: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::BAD_REQUEST,
            "ingestion_failed" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Raw pagination parameters shared by every listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub(super) struct PaginationQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl AppState {
    pub(super) fn page_request(
        &self,
        request_id: &str,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<PageRequest, ApiError> {
        PageRequest::new(
            page,
            page_size,
            self.pagination.default_page_size,
            self.pagination.max_page_size,
        )
        .map_err(|e: PaginationError| ApiError::new(request_id, "validation_error", e.to_string()))
    }
}

/// Unwrap a query extractor, reporting malformed parameters as a
/// `validation_error` instead of axum's plain-text rejection.
pub(super) fn parse_query<T>(
    request_id: &str,
    query: Result<axum::extract::Query<T>, QueryRejection>,
) -> Result<T, ApiError> {
    query
        .map(|q| q.0)
        .map_err(|e| ApiError::new(request_id, "validation_error", e.body_text()))
}

pub(super) fn validate_page_id(request_id: &str, page_id: &str) -> Result<(), ApiError> {
    insights_core::validate_page_id(page_id)
        .map_err(|e| ApiError::new(request_id, "validation_error", e.to_string()))
}

pub(super) fn map_db_error(request_id: String, error: &insights_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

pub(super) fn map_service_error(request_id: String, error: ServiceError) -> ApiError {
    match error {
        ServiceError::NotFound(page_id) => {
            ApiError::new(request_id, "not_found", format!("page {page_id} not found"))
        }
        ServiceError::Validation(e) => ApiError::new(request_id, "validation_error", e.to_string()),
        ServiceError::Ingest(IngestError::Scraper(e)) => {
            ApiError::new(request_id, "ingestion_failed", e.to_string())
        }
        ServiceError::Db(e) | ServiceError::Ingest(IngestError::Db(e)) => {
            map_db_error(request_id, &e)
        }
        ServiceError::Ingest(e) => {
            tracing::error!(error = %e, "ingestion failed");
            ApiError::new(request_id, "internal_error", e.to_string())
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/pages", get(pages::list_pages))
        .route(
            "/api/v1/pages/{page_id}",
            get(pages::get_page).delete(pages::delete_page),
        )
        .route("/api/v1/pages/{page_id}/refresh", post(pages::refresh_page))
        .route("/api/v1/pages/{page_id}/summary", get(pages::page_summary))
        .route("/api/v1/pages/{page_id}/posts", get(related::list_posts))
        .route(
            "/api/v1/pages/{page_id}/employees",
            get(related::list_employees),
        )
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn root() -> Json<RootData> {
    Json(RootData {
        message: "Company Page Insights API",
        version: env!("CARGO_PKG_VERSION"),
        docs: "/api/v1/pages",
    })
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    match insights_db::health_check(state.service.pool()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "healthy",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(
                request_id = %req_id.0,
                error = %e,
                "health check: database unavailable"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests;
