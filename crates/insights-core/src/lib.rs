//! Shared domain records, validation, pagination and configuration for the
//! company page insights workspace.

mod app_config;
mod config;
pub mod pagination;
pub mod records;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, ExtractionPolicy};
pub use config::{load_app_config, load_app_config_from_env};
pub use pagination::{total_pages, PageRequest, Paginated, PaginationError};
pub use records::{
    synthetic_post_id, synthetic_user_id, validate_page_id, Comment, NewPage, NewPost,
    NewSocialMediaUser, ValidationError,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
