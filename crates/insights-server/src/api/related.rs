//! Posts and employees listed under a page.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use insights_core::{Comment, Paginated};
use insights_db::{PostRow, SocialMediaUserRow};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_db_error, parse_query, validate_page_id, ApiError, AppState, PaginationQuery};

#[derive(Debug, Serialize)]
pub(super) struct PostItem {
    post_id: String,
    page_id: String,
    content: String,
    post_url: String,
    media_urls: Vec<String>,
    likes: i64,
    comments_count: i64,
    reposts: i64,
    posted_at: Option<DateTime<Utc>>,
    comments: Vec<Comment>,
    scraped_at: DateTime<Utc>,
}

impl From<PostRow> for PostItem {
    fn from(row: PostRow) -> Self {
        Self {
            post_id: row.post_id,
            page_id: row.page_id,
            content: row.content,
            post_url: row.post_url,
            media_urls: row.media_urls,
            likes: row.likes,
            comments_count: row.comments_count,
            reposts: row.reposts,
            posted_at: row.posted_at,
            comments: row.comments.0,
            scraped_at: row.scraped_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct EmployeeItem {
    user_id: String,
    name: String,
    profile_url: String,
    profile_picture_url: Option<String>,
    headline: Option<String>,
    position: Option<String>,
    company_page_id: Option<String>,
    scraped_at: DateTime<Utc>,
}

impl From<SocialMediaUserRow> for EmployeeItem {
    fn from(row: SocialMediaUserRow) -> Self {
        Self {
            user_id: row.user_id,
            name: row.name,
            profile_url: row.profile_url,
            profile_picture_url: row.profile_picture_url,
            headline: row.headline,
            position: row.position,
            company_page_id: row.company_page_id,
            scraped_at: row.scraped_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PostListResponse {
    posts: Vec<PostItem>,
    total: u64,
    page: u32,
    page_size: u32,
    total_pages: u64,
}

#[derive(Debug, Serialize)]
pub(super) struct UserListResponse {
    users: Vec<EmployeeItem>,
    total: u64,
    page: u32,
    page_size: u32,
    total_pages: u64,
}

pub(super) async fn list_posts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(page_id): Path<String>,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> Result<Json<PostListResponse>, ApiError> {
    validate_page_id(&req_id.0, &page_id)?;
    let query = parse_query(&req_id.0, query)?;
    let request = state.page_request(&req_id.0, query.page, query.page_size)?;
    let pool = state.service.pool();

    let total = insights_db::count_posts_for_page(pool, &page_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let rows = insights_db::list_posts_for_page(pool, &page_id, request.limit(), request.offset())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let Paginated {
        items,
        total,
        page,
        page_size,
        total_pages,
    } = Paginated::new(rows, total, request).map(PostItem::from);
    Ok(Json(PostListResponse {
        posts: items,
        total,
        page,
        page_size,
        total_pages,
    }))
}

pub(super) async fn list_employees(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(page_id): Path<String>,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> Result<Json<UserListResponse>, ApiError> {
    validate_page_id(&req_id.0, &page_id)?;
    let query = parse_query(&req_id.0, query)?;
    let request = state.page_request(&req_id.0, query.page, query.page_size)?;
    let pool = state.service.pool();

    let total = insights_db::count_users_for_page(pool, &page_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let rows = insights_db::list_users_for_page(pool, &page_id, request.limit(), request.offset())
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let Paginated {
        items,
        total,
        page,
        page_size,
        total_pages,
    } = Paginated::new(rows, total, request).map(EmployeeItem::from);
    Ok(Json(UserListResponse {
        users: items,
        total,
        page,
        page_size,
        total_pages,
    }))
}
