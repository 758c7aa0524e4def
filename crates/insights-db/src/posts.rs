//! Database operations for the `posts` table.

use chrono::{DateTime, Utc};
use insights_core::{Comment, NewPost};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::{count_to_u64, DbError};

/// A row from the `posts` table. `comments` is stored as `JSONB`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub post_id: String,
    pub page_id: String,
    pub content: String,
    pub post_url: String,
    pub media_urls: Vec<String>,
    pub likes: i64,
    pub comments_count: i64,
    pub reposts: i64,
    pub posted_at: Option<DateTime<Utc>>,
    pub comments: Json<Vec<Comment>>,
    pub scraped_at: DateTime<Utc>,
}

/// Insert a post or replace the existing row with the same `post_id`.
///
/// Nothing from the previous version survives, including `scraped_at`.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn upsert_post(pool: &PgPool, post: &NewPost) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO posts \
             (post_id, page_id, content, post_url, media_urls, likes, comments_count, \
              reposts, posted_at, comments) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (post_id) DO UPDATE SET \
             page_id        = EXCLUDED.page_id, \
             content        = EXCLUDED.content, \
             post_url       = EXCLUDED.post_url, \
             media_urls     = EXCLUDED.media_urls, \
             likes          = EXCLUDED.likes, \
             comments_count = EXCLUDED.comments_count, \
             reposts        = EXCLUDED.reposts, \
             posted_at      = EXCLUDED.posted_at, \
             comments       = EXCLUDED.comments, \
             scraped_at     = NOW()",
    )
    .bind(&post.post_id)
    .bind(&post.page_id)
    .bind(&post.content)
    .bind(&post.post_url)
    .bind(&post.media_urls)
    .bind(post.likes)
    .bind(post.comments_count)
    .bind(post.reposts)
    .bind(post.posted_at)
    .bind(Json(&post.comments))
    .execute(pool)
    .await?;
    Ok(())
}

/// List a page's posts, newest first; undated posts sort last.
///
/// # Errors
///
/// Returns [`DbError`] on database query failure.
pub async fn list_posts_for_page(
    pool: &PgPool,
    page_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostRow>, DbError> {
    Ok(sqlx::query_as::<_, PostRow>(
        "SELECT post_id, page_id, content, post_url, media_urls, likes, comments_count, \
                reposts, posted_at, comments, scraped_at \
         FROM posts \
         WHERE page_id = $1 \
         ORDER BY posted_at DESC NULLS LAST, post_id \
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
pub async fn count_posts_for_page(pool: &PgPool, page_id: &str) -> Result<u64, DbError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE page_id = $1")
        .bind(page_id)
        .fetch_one(pool)
        .await?;
    count_to_u64("posts", total)
}
