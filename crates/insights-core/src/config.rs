use std::net::SocketAddr;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment, ExtractionPolicy};
use crate::ConfigError;

/// Longest accepted cache TTL: 30 days.
const MAX_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// All parsing and validation lives here so tests can drive it from a plain
/// `HashMap` without mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("INSIGHTS_ENV", "development"))?;
    let bind_addr: SocketAddr = parse_var(&or_default, "INSIGHTS_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("INSIGHTS_LOG_LEVEL", "info");

    let db_max_connections: u32 = parse_var(&or_default, "INSIGHTS_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections: u32 = parse_var(&or_default, "INSIGHTS_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs: u64 =
        parse_var(&or_default, "INSIGHTS_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let cache_enabled = parse_bool(
        "INSIGHTS_CACHE_ENABLED",
        &or_default("INSIGHTS_CACHE_ENABLED", "true"),
    )?;
    let cache_ttl_secs: u64 = parse_var(&or_default, "INSIGHTS_CACHE_TTL_SECS", "300")?;
    if cache_ttl_secs > MAX_CACHE_TTL_SECS {
        return Err(ConfigError::InvalidEnvVar {
            var: "INSIGHTS_CACHE_TTL_SECS".to_string(),
            reason: format!("must be at most {MAX_CACHE_TTL_SECS} seconds"),
        });
    }
    let cache_max_entries: usize = parse_var(&or_default, "INSIGHTS_CACHE_MAX_ENTRIES", "10000")?;
    if cache_max_entries == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "INSIGHTS_CACHE_MAX_ENTRIES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let extraction_policy =
        parse_extraction_policy(&or_default("INSIGHTS_EXTRACTION_POLICY", "html"))?;
    let scraper_base_url = or_default("INSIGHTS_SCRAPER_BASE_URL", "https://www.linkedin.com")
        .trim_end_matches('/')
        .to_string();
    let scraper_timeout_secs: u64 = parse_var(&or_default, "INSIGHTS_SCRAPER_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("INSIGHTS_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let max_posts: usize = parse_var(&or_default, "INSIGHTS_MAX_POSTS", "20")?;
    let max_employees: usize = parse_var(&or_default, "INSIGHTS_MAX_EMPLOYEES", "50")?;

    let default_page_size: u32 = parse_var(&or_default, "INSIGHTS_DEFAULT_PAGE_SIZE", "10")?;
    let max_page_size: u32 = parse_var(&or_default, "INSIGHTS_MAX_PAGE_SIZE", "100")?;
    if max_page_size == 0 || default_page_size == 0 || default_page_size > max_page_size {
        return Err(ConfigError::InvalidEnvVar {
            var: "INSIGHTS_DEFAULT_PAGE_SIZE".to_string(),
            reason: format!(
                "default page size {default_page_size} must be between 1 and max page size {max_page_size}"
            ),
        });
    }

    let openai_api_key = optional("OPENAI_API_KEY");
    let summary_model = or_default("INSIGHTS_SUMMARY_MODEL", "gpt-3.5-turbo");
    let summary_api_url = or_default(
        "INSIGHTS_SUMMARY_API_URL",
        "https://api.openai.com/v1/chat/completions",
    );

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        cache_enabled,
        cache_ttl_secs,
        cache_max_entries,
        extraction_policy,
        scraper_base_url,
        scraper_timeout_secs,
        scraper_user_agent,
        max_posts,
        max_employees,
        default_page_size,
        max_page_size,
        openai_api_key,
        summary_model,
        summary_api_url,
    })
}

fn parse_var<T, D>(or_default: &D, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    D: Fn(&str, &str) -> String,
{
    let raw = or_default(var, default);
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "INSIGHTS_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}

fn parse_extraction_policy(s: &str) -> Result<ExtractionPolicy, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "html" => Ok(ExtractionPolicy::Html),
        "placeholder" => Ok(ExtractionPolicy::Placeholder),
        other => Err(ConfigError::InvalidEnvVar {
            var: "INSIGHTS_EXTRACTION_POLICY".to_string(),
            reason: format!("expected html or placeholder, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
