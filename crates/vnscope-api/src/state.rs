//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! ## Architecture
//!
//! AppState holds:
//! - **Records**: submitted survey records (in-memory; durable storage
//!   belongs to the data store this service fronts)
//! - **Profiles**: the identity provider's user assignments
//! - **Evaluator / facade**: access checks and submission validation,
//!   sharing one boundary resolver and cache
//! - **Mask builder**: outside-jurisdiction overlay for presentation

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;
use vnscope_access::{AccessEvaluator, LocationTagged, ValidationFacade};
use vnscope_boundary::{
    BoundaryCache, BoundaryProvider, BoundaryResolver, MaskBuilder, ResolverConfig,
};
use vnscope_core::{GeoPoint, GeoPolygon, ProvinceCode, UserId, WardCode};
use zeroize::Zeroizing;

use crate::auth::SecretToken;
use crate::profiles::ProfileDirectory;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// The lock is `parking_lot` and is never held across `.await` points.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Records matching `predicate`, evaluated under a single read lock.
    pub fn list_where(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.data
            .read()
            .values()
            .filter(|v| predicate(v))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Survey Records -----------------------------------------------------------

/// A stored survey submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub id: Uuid,
    pub submitted_by: UserId,
    pub province_code: Option<ProvinceCode>,
    pub ward_code: Option<WardCode>,
    pub point: Option<GeoPoint>,
    pub polygon: Option<GeoPolygon>,
    /// Plot area, present when a polygon was submitted.
    pub area_sq_meters: Option<f64>,
    /// Free-form questionnaire answers.
    pub answers: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl LocationTagged for SurveyRecord {
    fn province_code(&self) -> Option<ProvinceCode> {
        self.province_code
    }

    fn ward_code(&self) -> Option<WardCode> {
        self.ward_code
    }
}

// -- Configuration ------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        source: url::ParseError,
    },
    #[error("VNSCOPE_AUTH_SECRET is not set; set VNSCOPE_DEV_MODE=true to accept unauthenticated callers")]
    MissingAuthSecret,
}

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Shared bearer secret. If `None`, the API runs in development mode.
    pub auth_secret: Option<SecretToken>,
    /// Explicit opt-in to running without a secret.
    pub dev_mode: bool,
    /// Base URL of the HTTP boundary provider.
    pub boundary_url: Option<Url>,
    pub boundary_token: Option<Zeroizing<String>>,
    /// Static boundary set, used when no URL is configured.
    pub boundary_file: Option<PathBuf>,
    pub profiles_file: Option<PathBuf>,
    pub fetch_timeout: Duration,
    pub fetch_attempts: u32,
    /// Emit JSON log lines.
    pub log_json: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_secret",
                &self.auth_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("dev_mode", &self.dev_mode)
            .field("boundary_url", &self.boundary_url.as_ref().map(Url::as_str))
            .field(
                "boundary_token",
                &self.boundary_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("boundary_file", &self.boundary_file)
            .field("profiles_file", &self.profiles_file)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("fetch_attempts", &self.fetch_attempts)
            .field("log_json", &self.log_json)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_secret: None,
            dev_mode: false,
            boundary_url: None,
            boundary_token: None,
            boundary_file: None,
            profiles_file: None,
            fetch_timeout: Duration::from_millis(5000),
            fetch_attempts: 3,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// - `PORT` (default: 8080)
    /// - `VNSCOPE_AUTH_SECRET` (required unless `VNSCOPE_DEV_MODE=true`)
    /// - `VNSCOPE_DEV_MODE` (default: false)
    /// - `VNSCOPE_BOUNDARY_URL`, `VNSCOPE_BOUNDARY_TOKEN`
    /// - `VNSCOPE_BOUNDARY_FILE`
    /// - `VNSCOPE_PROFILES_FILE`
    /// - `VNSCOPE_FETCH_TIMEOUT_MS` (default: 5000)
    /// - `VNSCOPE_FETCH_ATTEMPTS` (default: 3)
    /// - `VNSCOPE_LOG_JSON` (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingAuthSecret`] when no secret is configured and
    /// development mode was not requested.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let boundary_url = match get("VNSCOPE_BOUNDARY_URL") {
            Some(raw) => Some(Url::parse(raw.trim()).map_err(|source| {
                ConfigError::InvalidUrl {
                    var: "VNSCOPE_BOUNDARY_URL",
                    source,
                }
            })?),
            None => None,
        };

        let config = Self {
            port: parse_var(get("PORT"), "PORT", "port number")?.unwrap_or(defaults.port),
            auth_secret: get("VNSCOPE_AUTH_SECRET").map(SecretToken::new),
            dev_mode: parse_var(get("VNSCOPE_DEV_MODE"), "VNSCOPE_DEV_MODE", "boolean")?
                .unwrap_or(defaults.dev_mode),
            boundary_url,
            boundary_token: get("VNSCOPE_BOUNDARY_TOKEN").map(Zeroizing::new),
            boundary_file: get("VNSCOPE_BOUNDARY_FILE").map(PathBuf::from),
            profiles_file: get("VNSCOPE_PROFILES_FILE").map(PathBuf::from),
            fetch_timeout: parse_var::<u64>(
                get("VNSCOPE_FETCH_TIMEOUT_MS"),
                "VNSCOPE_FETCH_TIMEOUT_MS",
                "millisecond count",
            )?
            .map(Duration::from_millis)
            .unwrap_or(defaults.fetch_timeout),
            fetch_attempts: parse_var(
                get("VNSCOPE_FETCH_ATTEMPTS"),
                "VNSCOPE_FETCH_ATTEMPTS",
                "attempt count",
            )?
            .unwrap_or(defaults.fetch_attempts),
            log_json: parse_var(get("VNSCOPE_LOG_JSON"), "VNSCOPE_LOG_JSON", "boolean")?
                .unwrap_or(defaults.log_json),
        };
        if config.auth_secret.is_none() && !config.dev_mode {
            return Err(ConfigError::MissingAuthSecret);
        }
        Ok(config)
    }

    /// Resolver tunables derived from this configuration.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            fetch_timeout: self.fetch_timeout,
            max_attempts: self.fetch_attempts.max(1),
            ..ResolverConfig::default()
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    raw: Option<String>,
    var: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    raw.map(|value| {
        value.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            expected,
            value,
        })
    })
    .transpose()
}

// -- Application State --------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppState {
    pub records: Store<SurveyRecord>,
    pub profiles: Arc<ProfileDirectory>,
    pub evaluator: AccessEvaluator,
    pub facade: ValidationFacade,
    pub mask_builder: MaskBuilder,
    pub config: AppConfig,
}

impl AppState {
    /// Wire the access stack around `provider`.
    pub fn new(
        config: AppConfig,
        provider: Arc<dyn BoundaryProvider>,
        profiles: Arc<ProfileDirectory>,
    ) -> Self {
        let resolver = Arc::new(BoundaryResolver::new(
            provider,
            Arc::new(BoundaryCache::new()),
            config.resolver_config(),
        ));
        Self::with_resolver(config, resolver, profiles)
    }

    /// Wire the access stack around an existing resolver.
    pub fn with_resolver(
        config: AppConfig,
        resolver: Arc<BoundaryResolver>,
        profiles: Arc<ProfileDirectory>,
    ) -> Self {
        let evaluator = AccessEvaluator::new(resolver);
        Self {
            records: Store::new(),
            profiles,
            facade: ValidationFacade::new(evaluator.clone()),
            evaluator,
            mask_builder: MaskBuilder::default(),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[("VNSCOPE_AUTH_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.port, 8080);
        assert!(!config.dev_mode);
        assert!(config.boundary_url.is_none());
        assert_eq!(config.fetch_timeout, Duration::from_millis(5000));
        assert_eq!(config.fetch_attempts, 3);
        assert!(!config.log_json);
    }

    #[test]
    fn missing_secret_refuses_to_start() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[])),
            Err(ConfigError::MissingAuthSecret)
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("VNSCOPE_DEV_MODE", "false")])),
            Err(ConfigError::MissingAuthSecret)
        ));
    }

    #[test]
    fn dev_mode_allows_running_without_secret() {
        let config = AppConfig::from_lookup(lookup(&[("VNSCOPE_DEV_MODE", "true")])).unwrap();
        assert!(config.dev_mode);
        assert!(config.auth_secret.is_none());
    }

    #[test]
    fn reads_all_variables() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PORT", "9090"),
            ("VNSCOPE_AUTH_SECRET", "s3cret"),
            ("VNSCOPE_BOUNDARY_URL", "https://gis.example.vn/api"),
            ("VNSCOPE_BOUNDARY_TOKEN", "tok"),
            ("VNSCOPE_BOUNDARY_FILE", "/data/boundaries.json"),
            ("VNSCOPE_PROFILES_FILE", "/data/profiles.json"),
            ("VNSCOPE_FETCH_TIMEOUT_MS", "750"),
            ("VNSCOPE_FETCH_ATTEMPTS", "5"),
            ("VNSCOPE_LOG_JSON", "true"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.auth_secret.unwrap().as_str(), "s3cret");
        assert_eq!(
            config.boundary_url.unwrap().as_str(),
            "https://gis.example.vn/api"
        );
        assert_eq!(config.boundary_file, Some(PathBuf::from("/data/boundaries.json")));
        assert_eq!(config.fetch_timeout, Duration::from_millis(750));
        assert_eq!(config.fetch_attempts, 5);
        assert!(config.log_json);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ConfigError::Invalid { var: "PORT", .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("VNSCOPE_BOUNDARY_URL", "not a url")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("VNSCOPE_LOG_JSON", "yes")])),
            Err(ConfigError::Invalid { var: "VNSCOPE_LOG_JSON", .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("VNSCOPE_DEV_MODE", "maybe")])),
            Err(ConfigError::Invalid { var: "VNSCOPE_DEV_MODE", .. })
        ));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = AppConfig::from_lookup(lookup(&[
            ("VNSCOPE_AUTH_SECRET", "hunter2"),
            ("VNSCOPE_BOUNDARY_TOKEN", "gis-token"),
        ]))
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("gis-token"));
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let config = AppConfig {
            fetch_attempts: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.resolver_config().max_attempts, 1);
    }

    #[test]
    fn store_list_where_filters() {
        let store: Store<u32> = Store::new();
        for n in 0..6 {
            store.insert(Uuid::new_v4(), n);
        }
        let mut even = store.list_where(|n| n % 2 == 0);
        even.sort_unstable();
        assert_eq!(even, vec![0, 2, 4]);
        assert_eq!(store.len(), 6);
    }
}
