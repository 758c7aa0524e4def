//! Database operations for the `social_media_users` table (employee proxies).

use chrono::{DateTime, Utc};
use insights_core::NewSocialMediaUser;
use sqlx::PgPool;

use crate::{count_to_u64, DbError};

/// A row from the `social_media_users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SocialMediaUserRow {
    pub user_id: String,
    pub name: String,
    pub profile_url: String,
    pub profile_picture_url: Option<String>,
    pub headline: Option<String>,
    pub position: Option<String>,
    pub company_page_id: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

/// Insert a user or replace the existing row with the same `user_id`.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn upsert_user(pool: &PgPool, user: &NewSocialMediaUser) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO social_media_users \
             (user_id, name, profile_url, profile_picture_url, headline, position, company_page_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (user_id) DO UPDATE SET \
             name                = EXCLUDED.name, \
             profile_url         = EXCLUDED.profile_url, \
             profile_picture_url = EXCLUDED.profile_picture_url, \
             headline            = EXCLUDED.headline, \
             position            = EXCLUDED.position, \
             company_page_id     = EXCLUDED.company_page_id, \
             scraped_at          = NOW()",
    )
    .bind(&user.user_id)
    .bind(&user.name)
    .bind(&user.profile_url)
    .bind(&user.profile_picture_url)
    .bind(&user.headline)
    .bind(&user.position)
    .bind(&user.company_page_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// List users attached to a page, ordered by name.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_users_for_page(
    pool: &PgPool,
    page_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<SocialMediaUserRow>, DbError> {
    Ok(sqlx::query_as::<_, SocialMediaUserRow>(
        "SELECT user_id, name, profile_url, profile_picture_url, headline, position, \
                company_page_id, scraped_at \
         FROM social_media_users \
         WHERE company_page_id = $1 \
         ORDER BY name, user_id \
         LIMIT $2 OFFSET $3",
    )
    .bind(page_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?)
}

/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn count_users_for_page(pool: &PgPool, page_id: &str) -> Result<u64, DbError> {
    let total: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM social_media_users WHERE company_page_id = $1")
            .bind(page_id)
            .fetch_one(pool)
            .await?;
    count_to_u64("social_media_users", total)
}
