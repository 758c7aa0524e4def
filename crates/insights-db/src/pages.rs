//! Database operations for the `pages` table, plus the cascading page delete.

use chrono::{DateTime, Utc};
use insights_core::NewPage;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::{count_to_u64, DbError};

const PAGE_COLUMNS: &str = "page_id, page_name, page_url, linkedin_id, profile_picture_url, \
     description, website, industry, total_followers, head_count, specialties, location, \
     founded_year, company_type, scraped_at, updated_at";

/// A row from the `pages` table.
///
/// Also the payload cached under `page:{page_id}`, hence the serde derives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PageRow {
    pub page_id: String,
    pub page_name: String,
    pub page_url: String,
    pub linkedin_id: Option<String>,
    pub profile_picture_url: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub total_followers: i64,
    pub head_count: Option<i64>,
    pub specialties: Vec<String>,
    pub location: Option<String>,
    pub founded_year: Option<String>,
    pub company_type: Option<String>,
    pub scraped_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input filters for page listing. Bounds are inclusive; text filters are
/// case-insensitive substring matches.
#[derive(Debug, Clone, Default)]
pub struct PageListFilters<'a> {
    pub min_followers: Option<i64>,
    pub max_followers: Option<i64>,
    pub industry: Option<&'a str>,
    pub search: Option<&'a str>,
}

/// Rows removed by [`delete_page_cascade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeletedCounts {
    pub pages: u64,
    pub posts: u64,
    pub users: u64,
}

impl DeletedCounts {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.pages + self.posts + self.users
    }
}

/// Insert a page or overwrite every ingested field of the existing row.
///
/// `scraped_at` keeps the first-scrape time; `updated_at` never moves
/// backwards.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn upsert_page(pool: &PgPool, page: &NewPage) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO pages \
             (page_id, page_name, page_url, linkedin_id, profile_picture_url, description, \
              website, industry, total_followers, head_count, specialties, location, \
              founded_year, company_type) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         ON CONFLICT (page_id) DO UPDATE SET \
             page_name           = EXCLUDED.page_name, \
             page_url            = EXCLUDED.page_url, \
             linkedin_id         = EXCLUDED.linkedin_id, \
             profile_picture_url = EXCLUDED.profile_picture_url, \
             description         = EXCLUDED.description, \
             website             = EXCLUDED.website, \
             industry            = EXCLUDED.industry, \
             total_followers     = EXCLUDED.total_followers, \
             head_count          = EXCLUDED.head_count, \
             specialties         = EXCLUDED.specialties, \
             location            = EXCLUDED.location, \
             founded_year        = EXCLUDED.founded_year, \
             company_type        = EXCLUDED.company_type, \
             updated_at          = GREATEST(NOW(), pages.updated_at)",
    )
    .bind(&page.page_id)
    .bind(&page.page_name)
    .bind(&page.page_url)
    .bind(&page.linkedin_id)
    .bind(&page.profile_picture_url)
    .bind(&page.description)
    .bind(&page.website)
    .bind(&page.industry)
    .bind(page.total_followers)
    .bind(page.head_count)
    .bind(&page.specialties)
    .bind(&page.location)
    .bind(&page.founded_year)
    .bind(&page.company_type)
    .execute(pool)
    .await?;
    Ok(())
}

/// Fetch one page by its source identifier.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn get_page(pool: &PgPool, page_id: &str) -> Result<Option<PageRow>, DbError> {
    let row = sqlx::query_as::<_, PageRow>(&format!(
        "SELECT {PAGE_COLUMNS} FROM pages WHERE page_id = $1"
    ))
    .bind(page_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// List pages matching `filters`, most-followed first.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_pages(
    pool: &PgPool,
    filters: &PageListFilters<'_>,
    limit: i64,
    offset: i64,
) -> Result<Vec<PageRow>, DbError> {
    Ok(sqlx::query_as::<_, PageRow>(&format!(
        "SELECT {PAGE_COLUMNS} FROM pages \
         WHERE ($1::BIGINT IS NULL OR total_followers >= $1) \
           AND ($2::BIGINT IS NULL OR total_followers <= $2) \
           AND ($3::TEXT IS NULL OR industry ILIKE $3 ESCAPE '\\') \
           AND ($4::TEXT IS NULL OR page_name ILIKE $4 ESCAPE '\\') \
         ORDER BY total_followers DESC, page_id \
         LIMIT $5 OFFSET $6"
    ))
    .bind(filters.min_followers)
    .bind(filters.max_followers)
    .bind(filters.industry.map(contains_pattern))
    .bind(filters.search.map(contains_pattern))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?)
}

/// Count pages matching `filters`.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn count_pages(pool: &PgPool, filters: &PageListFilters<'_>) -> Result<u64, DbError> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pages \
         WHERE ($1::BIGINT IS NULL OR total_followers >= $1) \
           AND ($2::BIGINT IS NULL OR total_followers <= $2) \
           AND ($3::TEXT IS NULL OR industry ILIKE $3 ESCAPE '\\') \
           AND ($4::TEXT IS NULL OR page_name ILIKE $4 ESCAPE '\\')",
    )
    .bind(filters.min_followers)
    .bind(filters.max_followers)
    .bind(filters.industry.map(contains_pattern))
    .bind(filters.search.map(contains_pattern))
    .fetch_one(pool)
    .await?;
    count_to_u64("pages", total)
}

/// Delete a page together with every post and user that references it.
///
/// Returns `None` (and deletes nothing) when the page does not exist.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure; the transaction is rolled
/// back in that case.
pub async fn delete_page_cascade(
    pool: &PgPool,
    page_id: &str,
) -> Result<Option<DeletedCounts>, DbError> {
    let mut tx = pool.begin().await?;

    let pages = sqlx::query("DELETE FROM pages WHERE page_id = $1")
        .bind(page_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if pages == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    let posts = sqlx::query("DELETE FROM posts WHERE page_id = $1")
        .bind(page_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let users = sqlx::query("DELETE FROM social_media_users WHERE company_page_id = $1")
        .bind(page_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    tracing::debug!(page_id, pages, posts, users, "page deleted with dependents");
    Ok(Some(DeletedCounts {
        pages,
        posts,
        users,
    }))
}

/// Wrap user input in `%…%` with LIKE metacharacters escaped, so the filter is
/// a literal substring match.
fn contains_pattern(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len() + 2);
    escaped.push('%');
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
