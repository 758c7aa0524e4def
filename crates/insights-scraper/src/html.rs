//! Best-effort extraction from the public company page markup.
//!
//! Every field is described by a [`FieldRule`]: an ordered list of lookups,
//! tried until one finds a value. A field whose rules all miss takes its
//! default and extraction carries on with the next field.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use insights_core::ExtractionPolicy;
use regex::Regex;

use crate::client::{DocumentKind, PageFetcher};
use crate::document::{
    absolutize_url, document_title, extract_attr, find_all_by_class, find_all_tags, find_by_attr,
    find_by_class, labelled_value, meta_content, non_empty, parse_count, split_blocks, ClassMatch,
    Document,
};
use crate::error::ScraperError;
use crate::extractor::{
    DocumentExtractor, ExtractedComment, ExtractedEmployee, ExtractedPost, ExtractedProfile,
};
use crate::rules::FieldRule;

static ORG_URN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"urn:li:(?:organization|fsd_company):(\d+)").expect("valid organization urn regex")
});
static PROFILE_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/in/([^/?#]+)").expect("valid profile slug regex"));
static SPECIALTY_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i),|\s+and\s+").expect("valid specialty split regex"));

const SOURCE_DOMAINS: &[&str] = &["linkedin.com", "licdn.com"];

const POST_CONTAINERS: &[&str] = &[
    "feed-shared-update",
    "main-feed-activity-card",
    "updates__list-item",
];
const EMPLOYEE_CONTAINERS: &[&str] = &["org-people-profile-card", "org-people", "base-card"];
const COMMENT_CONTAINERS: &[&str] = &["comments-comment-item", "comments-comment-entity"];
const CONTAINER_TAGS: &[&str] = &["div", "article", "li", "section"];

const DEFAULT_PAGE_NAME: &str = "Unknown";
const DEFAULT_POST_CONTENT: &str = "Post content unavailable";
const DEFAULT_EMPLOYEE_NAME: &str = "Unknown Employee";

// ---------------------------------------------------------------------------
// Profile rules
// ---------------------------------------------------------------------------

const PAGE_NAME: FieldRule<String> = FieldRule {
    field: "page_name",
    lookups: &[top_card_title, og_title, title_tag],
};
const LINKEDIN_ID: FieldRule<String> = FieldRule {
    field: "linkedin_id",
    lookups: &[organization_urn],
};
const PROFILE_PICTURE: FieldRule<String> = FieldRule {
    field: "profile_picture_url",
    lookups: &[top_card_image, og_image],
};
const DESCRIPTION: FieldRule<String> = FieldRule {
    field: "description",
    lookups: &[break_words_paragraph, about_description, meta_description],
};
const WEBSITE: FieldRule<String> = FieldRule {
    field: "website",
    lookups: &[about_website_link, first_external_link],
};
const INDUSTRY: FieldRule<String> = FieldRule {
    field: "industry",
    lookups: &[about_industry, labelled_industry],
};
const LOCATION: FieldRule<String> = FieldRule {
    field: "location",
    lookups: &[about_headquarters, labelled_headquarters, location_block],
};
const COMPANY_TYPE: FieldRule<String> = FieldRule {
    field: "company_type",
    lookups: &[about_organization_type, labelled_company_type],
};
const FOUNDED_YEAR: FieldRule<String> = FieldRule {
    field: "founded_year",
    lookups: &[about_founded, labelled_founded],
};
const SPECIALTIES: FieldRule<Vec<String>> = FieldRule {
    field: "specialties",
    lookups: &[about_specialties, labelled_specialties],
};
const TOTAL_FOLLOWERS: FieldRule<u64> = FieldRule {
    field: "total_followers",
    lookups: &[follower_count],
};
const HEAD_COUNT: FieldRule<u64> = FieldRule {
    field: "head_count",
    lookups: &[about_size, employees_count],
};

fn top_card_title(doc: &Document<'_>) -> Option<String> {
    find_by_class(doc.html(), Some("h1"), "top-card-layout__title", ClassMatch::Contains)
        .and_then(|el| el.text())
}

fn og_title(doc: &Document<'_>) -> Option<String> {
    let title = meta_content(doc.html(), "og:title")?;
    let head = title.split(" | ").next().unwrap_or(&title).trim().to_string();
    non_empty(head)
}

fn title_tag(doc: &Document<'_>) -> Option<String> {
    document_title(doc.html())
}

fn organization_urn(doc: &Document<'_>) -> Option<String> {
    ORG_URN_RE
        .captures(doc.html())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn image_url(attrs: &str) -> Option<String> {
    extract_attr(attrs, "src")
        .filter(|src| src.starts_with("http"))
        .or_else(|| extract_attr(attrs, "data-delayed-url"))
}

fn top_card_image(doc: &Document<'_>) -> Option<String> {
    find_by_class(
        doc.html(),
        Some("img"),
        "top-card-layout__entity-image",
        ClassMatch::Contains,
    )
    .and_then(|el| image_url(el.attrs))
}

fn og_image(doc: &Document<'_>) -> Option<String> {
    meta_content(doc.html(), "og:image")
}

fn break_words_paragraph(doc: &Document<'_>) -> Option<String> {
    find_by_class(doc.html(), Some("p"), "break-words", ClassMatch::Exact)
        .and_then(|el| el.text())
}

fn meta_description(doc: &Document<'_>) -> Option<String> {
    meta_content(doc.html(), "description")
}

/// The `<dd>` of a `data-test-id="about-us__{key}"` block, or the block's
/// text when it has no `<dd>`.
fn about_block(doc: &Document<'_>, key: &str) -> Option<String> {
    let block = find_by_attr(doc.html(), None, "data-test-id", &format!("about-us__{key}"))?;
    find_all_tags(block.inner, "dd")
        .first()
        .and_then(|dd| dd.text())
        .or_else(|| block.text())
}

fn about_description(doc: &Document<'_>) -> Option<String> {
    about_block(doc, "description")
}

fn about_website_link(doc: &Document<'_>) -> Option<String> {
    let about = find_by_attr(doc.html(), None, "data-test-id", "about-us__website")?;
    find_all_tags(about.inner, "a")
        .iter()
        .find_map(|a| a.attr("href"))
        .or_else(|| about.text().filter(|t| t.starts_with("http")))
}

fn first_external_link(doc: &Document<'_>) -> Option<String> {
    find_all_tags(doc.html(), "a").iter().find_map(|a| {
        a.attr("href").filter(|href| {
            href.starts_with("http") && !SOURCE_DOMAINS.iter().any(|d| href.contains(d))
        })
    })
}

fn about_industry(doc: &Document<'_>) -> Option<String> {
    about_block(doc, "industry")
}

fn labelled_industry(doc: &Document<'_>) -> Option<String> {
    labelled_value(doc.text_nodes(), "Industry")
}

fn about_headquarters(doc: &Document<'_>) -> Option<String> {
    about_block(doc, "headquarters")
}

fn labelled_headquarters(doc: &Document<'_>) -> Option<String> {
    labelled_value(doc.text_nodes(), "Headquarters")
}

fn location_block(doc: &Document<'_>) -> Option<String> {
    find_by_class(doc.html(), Some("div"), "location", ClassMatch::Contains)
        .and_then(|el| el.text())
}

fn about_organization_type(doc: &Document<'_>) -> Option<String> {
    about_block(doc, "organizationType")
}

fn labelled_company_type(doc: &Document<'_>) -> Option<String> {
    let nodes = doc.text_nodes();
    labelled_value(nodes, "Type").or_else(|| labelled_value(nodes, "Company type"))
}

fn about_founded(doc: &Document<'_>) -> Option<String> {
    about_block(doc, "founded")
}

fn labelled_founded(doc: &Document<'_>) -> Option<String> {
    labelled_value(doc.text_nodes(), "Founded")
}

fn split_specialties(text: &str) -> Option<Vec<String>> {
    let items: Vec<String> = SPECIALTY_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (!items.is_empty()).then_some(items)
}

fn about_specialties(doc: &Document<'_>) -> Option<Vec<String>> {
    about_block(doc, "specialties").and_then(|t| split_specialties(&t))
}

fn labelled_specialties(doc: &Document<'_>) -> Option<Vec<String>> {
    labelled_value(doc.text_nodes(), "Specialties").and_then(|t| split_specialties(&t))
}

/// First count found in a text run that mentions `needle`.
fn count_near(nodes: &[String], needle: &str) -> Option<u64> {
    nodes
        .iter()
        .filter(|text| text.to_lowercase().contains(needle))
        .find_map(|text| parse_count(text))
}

fn follower_count(doc: &Document<'_>) -> Option<u64> {
    count_near(doc.text_nodes(), "followers")
}

fn about_size(doc: &Document<'_>) -> Option<u64> {
    about_block(doc, "size").and_then(|t| parse_count(&t))
}

fn employees_count(doc: &Document<'_>) -> Option<u64> {
    count_near(doc.text_nodes(), "employees")
}

/// Apply the profile rules to the profile document.
#[must_use]
pub fn parse_profile(html: &str, page_url: &str) -> ExtractedProfile {
    let doc = Document::new(html);
    ExtractedProfile {
        page_url: page_url.to_string(),
        page_name: PAGE_NAME.resolve_or(&doc, || DEFAULT_PAGE_NAME.to_string()),
        linkedin_id: LINKEDIN_ID.resolve(&doc),
        profile_picture_url: PROFILE_PICTURE.resolve(&doc),
        description: DESCRIPTION.resolve(&doc),
        website: WEBSITE.resolve(&doc),
        industry: INDUSTRY.resolve(&doc),
        total_followers: TOTAL_FOLLOWERS.resolve_or(&doc, || 0),
        head_count: HEAD_COUNT.resolve(&doc),
        specialties: SPECIALTIES.resolve_or(&doc, Vec::new),
        location: LOCATION.resolve(&doc),
        founded_year: FOUNDED_YEAR.resolve(&doc),
        company_type: COMPANY_TYPE.resolve(&doc),
    }
}

// ---------------------------------------------------------------------------
// Post rules (applied to one post container at a time)
// ---------------------------------------------------------------------------

const POST_ID: FieldRule<String> = FieldRule {
    field: "post_id",
    lookups: &[data_urn, data_activity_urn],
};
const POST_CONTENT: FieldRule<String> = FieldRule {
    field: "content",
    lookups: &[update_description, feed_shared_text, first_paragraph],
};
const POST_LIKES: FieldRule<u64> = FieldRule {
    field: "likes",
    lookups: &[reactions_count, reaction_text_count],
};
const POST_COMMENTS_COUNT: FieldRule<u64> = FieldRule {
    field: "comments_count",
    lookups: &[comments_count],
};
const POST_REPOSTS: FieldRule<u64> = FieldRule {
    field: "reposts",
    lookups: &[reposts_count],
};
const POSTED_AT: FieldRule<DateTime<Utc>> = FieldRule {
    field: "posted_at",
    lookups: &[time_datetime],
};
const POST_MEDIA: FieldRule<Vec<String>> = FieldRule {
    field: "media_urls",
    lookups: &[media_images],
};

fn data_urn(doc: &Document<'_>) -> Option<String> {
    find_by_attr(doc.html(), None, "data-urn", "urn:li:").and_then(|el| el.attr("data-urn"))
}

fn data_activity_urn(doc: &Document<'_>) -> Option<String> {
    find_by_attr(doc.html(), None, "data-activity-urn", "urn:li:")
        .and_then(|el| el.attr("data-activity-urn"))
}

/// Post markup with its embedded comments cut out, so post-level rules do
/// not read comment text.
fn without_comments(block: &str) -> String {
    let mut stripped = block.to_string();
    for container in COMMENT_CONTAINERS {
        for comment in split_blocks(block, CONTAINER_TAGS, container) {
            stripped = stripped.replacen(comment, "", 1);
        }
    }
    stripped
}

fn update_description(doc: &Document<'_>) -> Option<String> {
    find_by_class(doc.html(), None, "update-v2__description", ClassMatch::Contains)
        .or_else(|| {
            find_by_class(doc.html(), None, "update-components-text", ClassMatch::Contains)
        })
        .and_then(|el| el.text())
}

fn feed_shared_text(doc: &Document<'_>) -> Option<String> {
    find_by_class(doc.html(), None, "feed-shared-text", ClassMatch::Contains)
        .and_then(|el| el.text())
}

fn first_paragraph(doc: &Document<'_>) -> Option<String> {
    find_all_tags(doc.html(), "p").iter().find_map(|p| p.text())
}

fn reactions_count(doc: &Document<'_>) -> Option<u64> {
    find_by_class(doc.html(), None, "reactions-count", ClassMatch::Contains)
        .and_then(|el| el.text())
        .and_then(|t| parse_count(&t))
}

fn reaction_text_count(doc: &Document<'_>) -> Option<u64> {
    count_near(doc.text_nodes(), "reaction")
}

fn comments_count(doc: &Document<'_>) -> Option<u64> {
    count_near(doc.text_nodes(), "comment")
}

fn reposts_count(doc: &Document<'_>) -> Option<u64> {
    count_near(doc.text_nodes(), "repost")
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

fn time_datetime(doc: &Document<'_>) -> Option<DateTime<Utc>> {
    find_all_tags(doc.html(), "time")
        .iter()
        .find_map(|t| t.attr("datetime").and_then(|v| parse_timestamp(&v)))
}

fn media_images(doc: &Document<'_>) -> Option<Vec<String>> {
    let urls: Vec<String> = find_all_tags(doc.html(), "img")
        .iter()
        .filter(|img| {
            let class = img.attr("class").unwrap_or_default();
            !class.contains("actor") && !class.contains("avatar") && !class.contains("logo")
        })
        .filter_map(|img| image_url(img.attrs))
        .filter(|url| url.starts_with("http") && !url.contains("profile-displayphoto"))
        .collect();
    (!urls.is_empty()).then_some(urls)
}

// ---------------------------------------------------------------------------
// Comment rules (applied to one comment container at a time)
// ---------------------------------------------------------------------------

const COMMENT_ID: FieldRule<String> = FieldRule {
    field: "comment_id",
    lookups: &[comment_data_id],
};
const COMMENT_AUTHOR: FieldRule<String> = FieldRule {
    field: "author_name",
    lookups: &[comment_author_name],
};
const COMMENT_AUTHOR_URL: FieldRule<String> = FieldRule {
    field: "author_profile_url",
    lookups: &[profile_href],
};
const COMMENT_CONTENT: FieldRule<String> = FieldRule {
    field: "content",
    lookups: &[comment_main_content, first_paragraph],
};
const COMMENT_LIKES: FieldRule<u64> = FieldRule {
    field: "likes",
    lookups: &[comment_like_count],
};

fn comment_data_id(doc: &Document<'_>) -> Option<String> {
    find_by_attr(doc.html(), None, "data-id", "urn:li:").and_then(|el| el.attr("data-id"))
}

fn comment_author_name(doc: &Document<'_>) -> Option<String> {
    find_by_class(doc.html(), None, "name-text", ClassMatch::Contains)
        .or_else(|| find_by_class(doc.html(), None, "comment__author", ClassMatch::Contains))
        .and_then(|el| el.text())
}

fn comment_main_content(doc: &Document<'_>) -> Option<String> {
    find_by_class(doc.html(), None, "main-content", ClassMatch::Contains)
        .or_else(|| find_by_class(doc.html(), None, "comment__text", ClassMatch::Contains))
        .and_then(|el| el.text())
}

fn comment_like_count(doc: &Document<'_>) -> Option<u64> {
    count_near(doc.text_nodes(), "like")
}

fn parse_comments(block: &str, base_url: &str) -> Vec<ExtractedComment> {
    let blocks = COMMENT_CONTAINERS
        .iter()
        .map(|name| split_blocks(block, CONTAINER_TAGS, name))
        .find(|found| !found.is_empty())
        .unwrap_or_default();

    blocks
        .into_iter()
        .map(|comment| {
            let doc = Document::new(comment);
            ExtractedComment {
                comment_id: COMMENT_ID.resolve(&doc),
                author_name: COMMENT_AUTHOR
                    .resolve_or(&doc, || DEFAULT_EMPLOYEE_NAME.to_string()),
                author_profile_url: COMMENT_AUTHOR_URL
                    .resolve(&doc)
                    .and_then(|href| absolutize_url(base_url, &href)),
                content: COMMENT_CONTENT.resolve_or(&doc, String::new),
                posted_at: POSTED_AT.resolve(&doc),
                likes: COMMENT_LIKES.resolve_or(&doc, || 0),
            }
        })
        .collect()
}

/// Split the posts document into post containers and apply the post rules
/// to each, keeping at most `max_posts`.
///
/// The first container class that matches anything decides the layout.
/// Posts without a stable URN link to `posts_url`.
#[must_use]
pub fn parse_posts(
    html: &str,
    base_url: &str,
    posts_url: &str,
    max_posts: usize,
) -> Vec<ExtractedPost> {
    let blocks = POST_CONTAINERS
        .iter()
        .map(|name| split_blocks(html, CONTAINER_TAGS, name))
        .find(|found| !found.is_empty())
        .unwrap_or_default();

    blocks
        .into_iter()
        .take(max_posts)
        .map(|block| {
            let stripped = without_comments(block);
            let own = Document::new(&stripped);
            let post_id = POST_ID.resolve(&Document::new(block));
            let post_url = post_id.as_ref().map_or_else(
                || posts_url.to_string(),
                |urn| format!("{base_url}/feed/update/{urn}/"),
            );
            ExtractedPost {
                post_id,
                post_url,
                content: POST_CONTENT.resolve_or(&own, || DEFAULT_POST_CONTENT.to_string()),
                media_urls: POST_MEDIA.resolve_or(&own, Vec::new),
                likes: POST_LIKES.resolve_or(&own, || 0),
                comments_count: POST_COMMENTS_COUNT.resolve_or(&own, || 0),
                reposts: POST_REPOSTS.resolve_or(&own, || 0),
                posted_at: POSTED_AT.resolve(&own),
                comments: parse_comments(block, base_url),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Employee rules (applied to one person card at a time)
// ---------------------------------------------------------------------------

const EMPLOYEE_SLUG: FieldRule<String> = FieldRule {
    field: "user_id",
    lookups: &[profile_slug],
};
const EMPLOYEE_NAME: FieldRule<String> = FieldRule {
    field: "name",
    lookups: &[card_title, name_block, image_alt],
};
const EMPLOYEE_PROFILE_URL: FieldRule<String> = FieldRule {
    field: "profile_url",
    lookups: &[profile_href],
};
const EMPLOYEE_PICTURE: FieldRule<String> = FieldRule {
    field: "profile_picture_url",
    lookups: &[first_image],
};
const EMPLOYEE_HEADLINE: FieldRule<String> = FieldRule {
    field: "headline",
    lookups: &[card_subtitle, headline_block],
};
const EMPLOYEE_POSITION: FieldRule<String> = FieldRule {
    field: "position",
    lookups: &[position_block],
};

fn profile_href(doc: &Document<'_>) -> Option<String> {
    find_by_attr(doc.html(), Some("a"), "href", "/in/").and_then(|a| a.attr("href"))
}

fn profile_slug(doc: &Document<'_>) -> Option<String> {
    let href = profile_href(doc)?;
    PROFILE_SLUG_RE
        .captures(&href)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn card_title(doc: &Document<'_>) -> Option<String> {
    find_by_class(doc.html(), None, "profile-title", ClassMatch::Contains)
        .or_else(|| find_by_class(doc.html(), None, "lockup__title", ClassMatch::Contains))
        .or_else(|| find_by_class(doc.html(), None, "base-main-card__title", ClassMatch::Exact))
        .and_then(|el| el.text())
}

fn name_block(doc: &Document<'_>) -> Option<String> {
    find_all_by_class(doc.html(), Some("div"), "name", ClassMatch::Contains)
        .iter()
        .find_map(|el| el.text())
}

fn image_alt(doc: &Document<'_>) -> Option<String> {
    find_all_tags(doc.html(), "img").iter().find_map(|img| img.attr("alt"))
}

fn first_image(doc: &Document<'_>) -> Option<String> {
    find_all_tags(doc.html(), "img")
        .iter()
        .find_map(|img| image_url(img.attrs))
}

fn card_subtitle(doc: &Document<'_>) -> Option<String> {
    find_by_class(doc.html(), None, "lockup__subtitle", ClassMatch::Contains)
        .or_else(|| find_by_class(doc.html(), None, "base-main-card__subtitle", ClassMatch::Exact))
        .and_then(|el| el.text())
}

fn headline_block(doc: &Document<'_>) -> Option<String> {
    find_by_class(doc.html(), Some("div"), "headline", ClassMatch::Contains)
        .and_then(|el| el.text())
}

fn position_block(doc: &Document<'_>) -> Option<String> {
    find_by_class(doc.html(), Some("div"), "position", ClassMatch::Contains)
        .and_then(|el| el.text())
}

/// Split the people document into person cards and apply the employee rules
/// to each, keeping at most `max_employees`.
#[must_use]
pub fn parse_employees(
    html: &str,
    base_url: &str,
    max_employees: usize,
) -> Vec<ExtractedEmployee> {
    let blocks = EMPLOYEE_CONTAINERS
        .iter()
        .map(|name| split_blocks(html, CONTAINER_TAGS, name))
        .find(|found| !found.is_empty())
        .unwrap_or_default();

    blocks
        .into_iter()
        .take(max_employees)
        .map(|card| {
            let doc = Document::new(card);
            ExtractedEmployee {
                user_id: EMPLOYEE_SLUG.resolve(&doc),
                name: EMPLOYEE_NAME.resolve_or(&doc, || DEFAULT_EMPLOYEE_NAME.to_string()),
                profile_url: EMPLOYEE_PROFILE_URL
                    .resolve(&doc)
                    .and_then(|href| absolutize_url(base_url, &href))
                    .unwrap_or_default(),
                profile_picture_url: EMPLOYEE_PICTURE.resolve(&doc),
                headline: EMPLOYEE_HEADLINE.resolve(&doc),
                position: EMPLOYEE_POSITION.resolve(&doc),
            }
        })
        .collect()
}

/// Extracts page data by fetching the public profile, posts, and people
/// documents. Parsing runs on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    fetcher: PageFetcher,
}

impl HtmlExtractor {
    #[must_use]
    pub fn new(fetcher: PageFetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl DocumentExtractor for HtmlExtractor {
    fn policy(&self) -> ExtractionPolicy {
        ExtractionPolicy::Html
    }

    async fn extract_profile(&self, page_id: &str) -> Result<ExtractedProfile, ScraperError> {
        let html = self.fetcher.fetch(page_id, DocumentKind::Profile).await?;
        let page_url = self.fetcher.document_url(page_id, DocumentKind::Profile);
        let profile = tokio::task::spawn_blocking(move || parse_profile(&html, &page_url))
            .await?;
        Ok(profile)
    }

    async fn extract_posts(
        &self,
        page_id: &str,
        max_posts: usize,
    ) -> Result<Vec<ExtractedPost>, ScraperError> {
        let html = self.fetcher.fetch(page_id, DocumentKind::Posts).await?;
        let posts_url = self.fetcher.document_url(page_id, DocumentKind::Posts);
        let base_url = self.fetcher.base_url().to_string();
        let posts = tokio::task::spawn_blocking(move || {
            parse_posts(&html, &base_url, &posts_url, max_posts)
        })
        .await?;
        tracing::debug!(page_id, count = posts.len(), "posts extracted");
        Ok(posts)
    }

    async fn extract_employees(
        &self,
        page_id: &str,
        max_employees: usize,
    ) -> Result<Vec<ExtractedEmployee>, ScraperError> {
        let html = self.fetcher.fetch(page_id, DocumentKind::People).await?;
        let base_url = self.fetcher.base_url().to_string();
        let employees =
            tokio::task::spawn_blocking(move || parse_employees(&html, &base_url, max_employees))
                .await?;
        tracing::debug!(page_id, count = employees.len(), "employees extracted");
        Ok(employees)
    }
}

#[cfg(test)]
#[path = "html_test.rs"]
mod tests;
