//! Domain types and configuration for the Bluesent post store.
//!
//! Everything in this crate is free of I/O except [`config::load_app_config`],
//! which reads the process environment. Merge and staleness rules for scraped
//! posts live in [`posts`]; daily statistics projection lives in [`stats`].

pub mod app_config;
pub mod config;
pub mod posts;
pub mod settings;
pub mod stats;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use posts::{is_stale, merge_post, PostRecord};
pub use settings::{
    min_days_for_update, EnvSettings, SettingsProvider, StaticSettings, MIN_DAYS_FOR_UPDATE,
};
pub use stats::{DailyStats, DayBucket, DayRange};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("setting is not configured: {0}")]
    MissingSetting(String),
    #[error("invalid value for setting {name}: {reason}")]
    InvalidSetting { name: String, reason: String },
}
