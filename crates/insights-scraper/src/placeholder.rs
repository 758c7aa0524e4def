//! Deterministic stand-in data for environments that must not scrape.
//!
//! Every value is drawn from an RNG seeded with the SHA-256 of the page id,
//! so ingesting the same page twice writes the same records.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use insights_core::ExtractionPolicy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::client::{document_url, DocumentKind};
use crate::error::ScraperError;
use crate::extractor::{
    DocumentExtractor, ExtractedComment, ExtractedEmployee, ExtractedPost, ExtractedProfile,
};

const MAX_PLACEHOLDER_POSTS: usize = 10;
const MAX_PLACEHOLDER_EMPLOYEES: usize = 10;

/// 2025-01-01T00:00:00Z; placeholder posts are dated backwards from here.
const ANCHOR_UNIX_SECS: i64 = 1_735_689_600;

const INDUSTRIES: &[&str] = &[
    "Software Development",
    "Financial Services",
    "Manufacturing",
    "Hospital & Health Care",
    "Retail",
    "Renewable Energy",
];
const COMPANY_TYPES: &[&str] = &["Privately Held", "Public Company", "Partnership", "Nonprofit"];
const LOCATIONS: &[&str] = &[
    "San Francisco, CA",
    "New York, NY",
    "London, United Kingdom",
    "Bangalore, India",
    "Berlin, Germany",
];
const SPECIALTIES: &[&str] = &[
    "cloud",
    "analytics",
    "consulting",
    "logistics",
    "design",
    "security",
    "research",
];
const FIRST_NAMES: &[&str] = &["Alex", "Priya", "Sam", "Maria", "Chen", "Fatima", "Jordan"];
const LAST_NAMES: &[&str] = &["Kim", "Patel", "Garcia", "Nguyen", "Okafor", "Smith", "Rossi"];
const POSITIONS: &[&str] = &[
    "Software Engineer",
    "Product Manager",
    "Account Executive",
    "Data Scientist",
    "Recruiter",
    "Operations Lead",
];
const POST_TOPICS: &[&str] = &[
    "our latest product release",
    "a new partnership",
    "open roles on the team",
    "highlights from this quarter",
    "a customer success story",
];

/// Produces plausible, repeatable records without any network access.
#[derive(Debug, Clone)]
pub struct PlaceholderExtractor {
    base_url: String,
}

impl PlaceholderExtractor {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn seeded_rng(page_id: &str, stream: &str) -> StdRng {
    let digest = Sha256::digest(format!("{stream}:{page_id}").as_bytes());
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&digest);
    StdRng::from_seed(seed)
}

fn pick<'a>(rng: &mut StdRng, options: &[&'a str]) -> &'a str {
    options[rng.random_range(0..options.len())]
}

/// Title-cased words of `page_id`, or the id itself when it has no words.
fn display_name(page_id: &str) -> String {
    let name = page_id
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        page_id.to_string()
    } else {
        name
    }
}

fn placeholder_profile(base_url: &str, page_id: &str) -> ExtractedProfile {
    let mut rng = seeded_rng(page_id, "profile");
    let name = display_name(page_id);
    let specialty_count = rng.random_range(2..=4);
    let mut specialties: Vec<String> = Vec::with_capacity(specialty_count);
    while specialties.len() < specialty_count {
        let candidate = pick(&mut rng, SPECIALTIES).to_string();
        if !specialties.contains(&candidate) {
            specialties.push(candidate);
        }
    }

    ExtractedProfile {
        page_url: document_url(base_url, page_id, DocumentKind::Profile),
        linkedin_id: Some(rng.random_range(1_000_000_u64..99_999_999).to_string()),
        profile_picture_url: None,
        description: Some(format!(
            "{name} is a placeholder company profile generated for {page_id}."
        )),
        website: Some(format!("https://www.{}.example", page_id.to_lowercase())),
        industry: Some(pick(&mut rng, INDUSTRIES).to_string()),
        total_followers: rng.random_range(500..2_000_000),
        head_count: Some(rng.random_range(10..50_000)),
        specialties,
        location: Some(pick(&mut rng, LOCATIONS).to_string()),
        founded_year: Some(rng.random_range(1950..=2022_u32).to_string()),
        company_type: Some(pick(&mut rng, COMPANY_TYPES).to_string()),
        page_name: name,
    }
}

fn anchor() -> DateTime<Utc> {
    DateTime::from_timestamp(ANCHOR_UNIX_SECS, 0).unwrap_or_default()
}

fn placeholder_posts(base_url: &str, page_id: &str, max_posts: usize) -> Vec<ExtractedPost> {
    let mut rng = seeded_rng(page_id, "posts");
    let count = rng
        .random_range(3..=MAX_PLACEHOLDER_POSTS)
        .min(max_posts);
    let posts_url = document_url(base_url, page_id, DocumentKind::Posts);
    let name = display_name(page_id);

    (0..count)
        .map(|idx| {
            let topic = pick(&mut rng, POST_TOPICS);
            let comment_count = rng.random_range(0..=3_usize);
            let days_back = 3 * i64::try_from(idx).unwrap_or_default() + rng.random_range(0..3);
            let posted_at = anchor() - TimeDelta::days(days_back);
            let comments = (0..comment_count)
                .map(|c| ExtractedComment {
                    comment_id: None,
                    author_name: format!(
                        "{} {}",
                        pick(&mut rng, FIRST_NAMES),
                        pick(&mut rng, LAST_NAMES)
                    ),
                    author_profile_url: None,
                    content: format!("Great update on {topic}! ({})", c + 1),
                    posted_at: Some(posted_at + TimeDelta::hours(rng.random_range(1..48))),
                    likes: rng.random_range(0..50),
                })
                .collect::<Vec<_>>();

            ExtractedPost {
                post_id: None,
                post_url: posts_url.clone(),
                content: format!("{name} is excited to share {topic}."),
                media_urls: Vec::new(),
                likes: rng.random_range(0..5_000),
                comments_count: u64::try_from(comments.len()).unwrap_or_default()
                    + rng.random_range(0..100),
                reposts: rng.random_range(0..500),
                posted_at: Some(posted_at),
                comments,
            }
        })
        .collect()
}

fn placeholder_employees(
    base_url: &str,
    page_id: &str,
    max_employees: usize,
) -> Vec<ExtractedEmployee> {
    let mut rng = seeded_rng(page_id, "employees");
    let count = rng
        .random_range(3..=MAX_PLACEHOLDER_EMPLOYEES)
        .min(max_employees);
    let company = display_name(page_id);

    (0..count)
        .map(|idx| {
            let first = pick(&mut rng, FIRST_NAMES);
            let last = pick(&mut rng, LAST_NAMES);
            let position = pick(&mut rng, POSITIONS);
            let slug = format!(
                "{}-{}-{page_id}-{idx}",
                first.to_lowercase(),
                last.to_lowercase()
            );
            ExtractedEmployee {
                user_id: None,
                name: format!("{first} {last}"),
                profile_url: format!("{base_url}/in/{slug}"),
                profile_picture_url: None,
                headline: Some(format!("{position} at {company}")),
                position: Some(position.to_string()),
            }
        })
        .collect()
}

#[async_trait]
impl DocumentExtractor for PlaceholderExtractor {
    fn policy(&self) -> ExtractionPolicy {
        ExtractionPolicy::Placeholder
    }

    async fn extract_profile(&self, page_id: &str) -> Result<ExtractedProfile, ScraperError> {
        Ok(placeholder_profile(&self.base_url, page_id))
    }

    async fn extract_posts(
        &self,
        page_id: &str,
        max_posts: usize,
    ) -> Result<Vec<ExtractedPost>, ScraperError> {
        Ok(placeholder_posts(&self.base_url, page_id, max_posts))
    }

    async fn extract_employees(
        &self,
        page_id: &str,
        max_employees: usize,
    ) -> Result<Vec<ExtractedEmployee>, ScraperError> {
        Ok(placeholder_employees(&self.base_url, page_id, max_employees))
    }
}
