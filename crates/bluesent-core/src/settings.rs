//! Named integer settings consumed at reconciliation time.
//!
//! The rescrape threshold is looked up through [`SettingsProvider`] on every
//! call instead of being captured once, so a long-lived reconciler observes
//! changes made by whatever owns the settings.

use std::collections::HashMap;
use std::env::VarError;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Setting holding the minimum post age, in days, before a rescrape.
pub const MIN_DAYS_FOR_UPDATE: &str = "scraping_min_days_for_update";

/// Source of named integer settings.
pub trait SettingsProvider: Send + Sync {
    /// Return the value of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSetting`] if `name` is not configured and
    /// [`ConfigError::InvalidSetting`] if the stored value is not an integer.
    fn get_int(&self, name: &str) -> Result<i64, ConfigError>;
}

/// Resolve the rescrape threshold from `settings`.
///
/// # Errors
///
/// Propagates lookup failures and rejects negative values with
/// [`ConfigError::InvalidSetting`].
pub fn min_days_for_update<P>(settings: &P) -> Result<u32, ConfigError>
where
    P: SettingsProvider + ?Sized,
{
    let raw = settings.get_int(MIN_DAYS_FOR_UPDATE)?;
    u32::try_from(raw).map_err(|_| ConfigError::InvalidSetting {
        name: MIN_DAYS_FOR_UPDATE.to_string(),
        reason: format!("expected a non-negative day count, got {raw}"),
    })
}

/// Settings read from `BLUESENT_<NAME>` environment variables.
///
/// The lookup function is injectable so tests never touch the real
/// process environment.
pub struct EnvSettings<F> {
    lookup: F,
}

type EnvLookup = fn(&str) -> Result<String, VarError>;

fn process_env(key: &str) -> Result<String, VarError> {
    std::env::var(key)
}

impl EnvSettings<EnvLookup> {
    /// Settings backed by the real process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            lookup: process_env,
        }
    }
}

impl<F> EnvSettings<F>
where
    F: Fn(&str) -> Result<String, VarError> + Send + Sync,
{
    #[must_use]
    pub fn with_lookup(lookup: F) -> Self {
        Self { lookup }
    }

    /// Environment variable name backing the setting `name`.
    #[must_use]
    pub fn var_name(name: &str) -> String {
        format!("BLUESENT_{}", name.to_ascii_uppercase())
    }
}

impl<F> SettingsProvider for EnvSettings<F>
where
    F: Fn(&str) -> Result<String, VarError> + Send + Sync,
{
    fn get_int(&self, name: &str) -> Result<i64, ConfigError> {
        let var = Self::var_name(name);
        let raw = (self.lookup)(&var).map_err(|_| ConfigError::MissingSetting(name.to_string()))?;
        raw.trim()
            .parse::<i64>()
            .map_err(|e| ConfigError::InvalidSetting {
                name: name.to_string(),
                reason: format!("{var}={raw:?}: {e}"),
            })
    }
}

/// Fixed in-memory settings, for embedding processes that manage their own
/// configuration and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    values: HashMap<String, i64>,
}

impl StaticSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: i64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }
}

impl SettingsProvider for StaticSettings {
    fn get_int(&self, name: &str) -> Result<i64, ConfigError> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::MissingSetting(name.to_string()))
    }
}

impl SettingsProvider for AppConfig {
    fn get_int(&self, name: &str) -> Result<i64, ConfigError> {
        match name {
            MIN_DAYS_FOR_UPDATE => self
                .scraping_min_days_for_update
                .map(i64::from)
                .ok_or_else(|| ConfigError::MissingSetting(name.to_string())),
            _ => Err(ConfigError::MissingSetting(name.to_string())),
        }
    }
}
