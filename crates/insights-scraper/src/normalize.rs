//! Conversion from extracted page data to the validated records the store
//! accepts.
//!
//! Items the source gave no stable id receive a positional one, so
//! re-ingesting an unchanged page replaces rows instead of adding new ones.

use insights_core::{
    synthetic_post_id, synthetic_user_id, Comment, NewPage, NewPost, NewSocialMediaUser,
    ValidationError,
};

use crate::error::ScraperError;
use crate::extractor::{ExtractedComment, ExtractedEmployee, ExtractedPost, ExtractedProfile};

fn to_i64(record: &str, field: &str, value: u64) -> Result<i64, ScraperError> {
    i64::try_from(value).map_err(|_| ScraperError::Normalization {
        record: record.to_string(),
        reason: format!("{field} {value} does not fit in a signed 64-bit integer"),
    })
}

fn invalid(record: &str) -> impl FnOnce(ValidationError) -> ScraperError + '_ {
    move |e| ScraperError::Normalization {
        record: record.to_string(),
        reason: e.to_string(),
    }
}

/// Normalizes an [`ExtractedProfile`] into a [`NewPage`] for `page_id`.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] if a counter overflows `i64` or the
/// resulting record fails validation.
pub fn normalize_profile(
    page_id: &str,
    profile: ExtractedProfile,
) -> Result<NewPage, ScraperError> {
    let page = NewPage {
        page_id: page_id.to_string(),
        total_followers: to_i64("page", "total_followers", profile.total_followers)?,
        head_count: profile
            .head_count
            .map(|n| to_i64("page", "head_count", n))
            .transpose()?,
        page_name: profile.page_name,
        page_url: profile.page_url,
        linkedin_id: profile.linkedin_id,
        profile_picture_url: profile.profile_picture_url,
        description: profile.description,
        website: profile.website,
        industry: profile.industry,
        specialties: profile.specialties,
        location: profile.location,
        founded_year: profile.founded_year,
        company_type: profile.company_type,
    };
    page.validate().map_err(invalid("page"))?;
    Ok(page)
}

fn normalize_comment(
    post_id: &str,
    index: usize,
    comment: ExtractedComment,
) -> Result<Comment, ScraperError> {
    Ok(Comment {
        comment_id: comment
            .comment_id
            .unwrap_or_else(|| format!("{post_id}_comment_{index}")),
        author_name: comment.author_name,
        author_profile_url: comment.author_profile_url,
        content: comment.content,
        posted_at: comment.posted_at,
        likes: to_i64("comment", "likes", comment.likes)?,
    })
}

/// Normalizes the `index`-th [`ExtractedPost`] of `page_id` into a [`NewPost`].
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] if a counter overflows `i64` or the
/// resulting record fails validation.
pub fn normalize_post(
    page_id: &str,
    index: usize,
    post: ExtractedPost,
) -> Result<NewPost, ScraperError> {
    let post_id = post
        .post_id
        .unwrap_or_else(|| synthetic_post_id(page_id, index));
    let comments = post
        .comments
        .into_iter()
        .enumerate()
        .map(|(i, c)| normalize_comment(&post_id, i, c))
        .collect::<Result<Vec<_>, _>>()?;

    let record = NewPost {
        page_id: page_id.to_string(),
        content: post.content,
        post_url: post.post_url,
        media_urls: post.media_urls,
        likes: to_i64("post", "likes", post.likes)?,
        comments_count: to_i64("post", "comments_count", post.comments_count)?,
        reposts: to_i64("post", "reposts", post.reposts)?,
        posted_at: post.posted_at,
        comments,
        post_id,
    };
    record.validate().map_err(invalid("post"))?;
    Ok(record)
}

/// Normalizes the `index`-th [`ExtractedEmployee`] of `page_id` into a
/// [`NewSocialMediaUser`] attached to that page.
///
/// # Errors
///
/// Returns [`ScraperError::Normalization`] if the resulting record fails
/// validation.
pub fn normalize_employee(
    page_id: &str,
    index: usize,
    employee: ExtractedEmployee,
) -> Result<NewSocialMediaUser, ScraperError> {
    let user = NewSocialMediaUser {
        user_id: employee
            .user_id
            .unwrap_or_else(|| synthetic_user_id(page_id, index)),
        name: employee.name,
        profile_url: employee.profile_url,
        profile_picture_url: employee.profile_picture_url,
        headline: employee.headline,
        position: employee.position,
        company_page_id: Some(page_id.to_string()),
    };
    user.validate().map_err(invalid("social media user"))?;
    Ok(user)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
