//! AI-generated page summaries via an `OpenAI`-compatible chat completion API.
//!
//! Generation never fails from the caller's point of view: a missing key, a
//! rejected request, or a transport error becomes a readable placeholder.

use std::time::Duration;

use async_trait::async_trait;
use insights_core::AppConfig;
use insights_db::PageRow;
use reqwest::Client;
use serde_json::{json, Value};

const MAX_TOKENS: u32 = 300;
const TEMPERATURE: f64 = 0.7;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const SYSTEM_PROMPT: &str = "You are a LinkedIn insights analyst.";

pub const MISSING_KEY_SUMMARY: &str = "AI summary unavailable - API key not configured";

#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    /// A short narrative for `page`; always returns text.
    async fn generate_summary(
        &self,
        page: &PageRow,
        posts_count: u64,
        employees_count: u64,
    ) -> String;
}

pub struct OpenAiSummaryGenerator {
    client: Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
}

impl std::fmt::Debug for OpenAiSummaryGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSummaryGenerator")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiSummaryGenerator {
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the HTTP client cannot be constructed.
    pub fn new(
        api_key: Option<String>,
        api_url: &str,
        model: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            api_url: api_url.to_string(),
            model: model.to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.openai_api_key.clone(),
            &config.summary_api_url,
            &config.summary_model,
        )
    }

    async fn request(&self, api_key: &str, prompt: String) -> Result<String, String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("AI summary error: {e}"))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(format!("AI summary generation failed: {}", status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| format!("AI summary error: {e}"))?;
        body.get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(Value::as_str)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| "AI summary error: response carried no message content".to_string())
    }
}

#[async_trait]
impl SummaryGenerator for OpenAiSummaryGenerator {
    async fn generate_summary(
        &self,
        page: &PageRow,
        posts_count: u64,
        employees_count: u64,
    ) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return MISSING_KEY_SUMMARY.to_string();
        };

        let prompt = build_prompt(page, posts_count, employees_count);
        match self.request(api_key, prompt).await {
            Ok(summary) => summary,
            Err(placeholder) => {
                tracing::warn!(
                    page_id = %page.page_id,
                    error = %placeholder,
                    "summary generation failed"
                );
                placeholder
            }
        }
    }
}

/// `1234567` -> `1,234,567`.
fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub(crate) fn build_prompt(page: &PageRow, posts_count: u64, employees_count: u64) -> String {
    format!(
        "Analyze this LinkedIn company page and provide a concise summary:\n\n\
         Company: {name}\n\
         Industry: {industry}\n\
         Followers: {followers}\n\
         Employees: {employees_count}\n\
         Description: {description}\n\
         Recent Posts: {posts_count}\n\n\
         Provide a 2-3 sentence summary covering:\n\
         1. Company profile and market position\n\
         2. Follower engagement level\n\
         3. Employee count and company size assessment",
        name = page.page_name,
        industry = page.industry.as_deref().unwrap_or("Unknown"),
        followers = thousands(page.total_followers),
        description = page.description.as_deref().unwrap_or("Not available"),
    )
}
