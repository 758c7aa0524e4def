//! Normalized records produced by ingestion and written to the store.
//!
//! These are the write-side shapes: every ingestion builds a full record and
//! the store replaces the existing row wholesale. Counters are `i64` to match
//! the `BIGINT` columns; [`validate`](NewPage::validate) rejects negatives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_PAGE_ID_LEN: usize = 200;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i64 },

    #[error("invalid page id '{page_id}': {reason}")]
    InvalidPageId { page_id: String, reason: String },
}

/// A company page as written by ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPage {
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
}

/// A comment embedded in a [`NewPost`]. Not independently addressable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: String,
    pub author_name: String,
    pub author_profile_url: Option<String>,
    pub content: String,
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub likes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub post_id: String,
    pub page_id: String,
    pub content: String,
    pub post_url: String,
    pub media_urls: Vec<String>,
    pub likes: i64,
    pub comments_count: i64,
    pub reposts: i64,
    pub posted_at: Option<DateTime<Utc>>,
    pub comments: Vec<Comment>,
}

/// A person associated with a page. Stands in for follower identity, which the
/// source network does not expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSocialMediaUser {
    pub user_id: String,
    pub name: String,
    pub profile_url: String,
    pub profile_picture_url: Option<String>,
    pub headline: Option<String>,
    pub position: Option<String>,
    pub company_page_id: Option<String>,
}

impl NewPage {
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the identifier is malformed, the name
    /// is blank, or a counter is negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_page_id(&self.page_id)?;
        require_non_empty("page_name", &self.page_name)?;
        require_non_empty("page_url", &self.page_url)?;
        require_non_negative("total_followers", self.total_followers)?;
        if let Some(head_count) = self.head_count {
            require_non_negative("head_count", head_count)?;
        }
        Ok(())
    }
}

impl Comment {
    /// # Errors
    ///
    /// Returns [`ValidationError`] for a blank id or a negative like count.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("comment_id", &self.comment_id)?;
        require_non_negative("comment likes", self.likes)
    }
}

impl NewPost {
    /// # Errors
    ///
    /// Returns [`ValidationError`] for blank identifiers, negative counters, or
    /// an invalid embedded comment.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("post_id", &self.post_id)?;
        validate_page_id(&self.page_id)?;
        require_non_empty("post_url", &self.post_url)?;
        require_non_negative("likes", self.likes)?;
        require_non_negative("comments_count", self.comments_count)?;
        require_non_negative("reposts", self.reposts)?;
        self.comments.iter().try_for_each(Comment::validate)
    }
}

impl NewSocialMediaUser {
    /// # Errors
    ///
    /// Returns [`ValidationError`] for a blank id or name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("user_id", &self.user_id)?;
        require_non_empty("name", &self.name)
    }
}

/// Checks that a page identifier can be used as a URL path segment and a
/// cache key.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidPageId`] when the id is empty, too long,
/// or contains `/` or whitespace.
pub fn validate_page_id(page_id: &str) -> Result<(), ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidPageId {
        page_id: page_id.to_string(),
        reason: reason.to_string(),
    };

    if page_id.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if page_id.len() > MAX_PAGE_ID_LEN {
        return Err(invalid("must be at most 200 bytes"));
    }
    if page_id.contains('/') {
        return Err(invalid("must not contain '/'"));
    }
    if page_id.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }
    Ok(())
}

/// Stable id for a post the source did not identify: one per (page, position).
///
/// Re-ingesting the same page therefore replaces the same rows instead of
/// accumulating new ones.
#[must_use]
pub fn synthetic_post_id(page_id: &str, index: usize) -> String {
    format!("{page_id}_post_{index}")
}

/// Stable id for an employee the source did not identify.
#[must_use]
pub fn synthetic_user_id(page_id: &str, index: usize) -> String {
    format!("{page_id}_employee_{index}")
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Empty { field })
    } else {
        Ok(())
    }
}

fn require_non_negative(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        Err(ValidationError::Negative { field, value })
    } else {
        Ok(())
    }
}
