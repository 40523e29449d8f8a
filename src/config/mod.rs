//! Engine configuration.
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `TALENT_RELAY`
//! prefix with `__` separating nested values:
//!
//! - `TALENT_RELAY__GATEWAY__KEY_ID=rzp_test_xxx` -> `gateway.key_id`
//! - `TALENT_RELAY__BOOKING__SELF_ATTESTED_TIMEOUT_SECS=300`

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::stats::StatsPolicy;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ConfigValidationError),
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Self-attested timeout must be positive")]
    InvalidTimeout,

    #[error("Stats weights must be positive to keep scoring monotonic")]
    InvalidWeights,
}

/// Payment gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Public key id issued by the gateway.
    #[serde(default)]
    pub key_id: String,

    /// Signing secret shared with the gateway (callback verification).
    #[serde(default)]
    pub secret: String,

    /// Currency orders are created in.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            secret: String::new(),
            currency: default_currency(),
        }
    }
}

impl GatewayConfig {
    /// The signing secret wrapped for safe handling.
    pub fn signing_secret(&self) -> SecretString {
        SecretString::new(self.secret.clone())
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.key_id.is_empty() {
            return Err(ConfigValidationError::MissingRequired("GATEWAY__KEY_ID"));
        }
        if self.secret.is_empty() {
            return Err(ConfigValidationError::MissingRequired("GATEWAY__SECRET"));
        }
        Ok(())
    }
}

/// Booking workflow configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Window during which a self-attested payment may be confirmed.
    #[serde(default = "default_self_attested_timeout")]
    pub self_attested_timeout_secs: u64,
}

fn default_self_attested_timeout() -> u64 {
    300
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            self_attested_timeout_secs: default_self_attested_timeout(),
        }
    }
}

impl BookingConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.self_attested_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

/// Statistics scoring configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    /// Points per referral given.
    #[serde(default = "default_referral_weight")]
    pub referral_weight: u64,

    /// Points per successful placement.
    #[serde(default = "default_placement_weight")]
    pub placement_weight: u64,

    /// Bonus points per unlocked achievement.
    #[serde(default = "default_achievement_bonus")]
    pub achievement_bonus: u64,
}

fn default_referral_weight() -> u64 {
    10
}

fn default_placement_weight() -> u64 {
    25
}

fn default_achievement_bonus() -> u64 {
    50
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            referral_weight: default_referral_weight(),
            placement_weight: default_placement_weight(),
            achievement_bonus: default_achievement_bonus(),
        }
    }
}

impl StatsConfig {
    pub fn policy(&self) -> StatsPolicy {
        StatsPolicy {
            referral_weight: self.referral_weight,
            placement_weight: self.placement_weight,
            achievement_bonus: self.achievement_bonus,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.referral_weight == 0 || self.placement_weight == 0 {
            return Err(ConfigValidationError::InvalidWeights);
        }
        Ok(())
    }
}

/// Root engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Payment gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Booking workflow settings.
    #[serde(default)]
    pub booking: BookingConfig,

    /// Statistics scoring settings.
    #[serde(default)]
    pub stats: StatsConfig,

    /// Rust log filter directive.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info,talent_relay=debug".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            booking: BookingConfig::default(),
            stats: StatsConfig::default(),
            log_level: default_log_level(),
        }
    }
}

/// Installs the global tracing subscriber using the configured filter
/// directive. Call once at process startup.
pub fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

impl EngineConfig {
    /// Load configuration from environment variables (and `.env` in
    /// development).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TALENT_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation of loaded values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.gateway.validate()?;
        self.booking.validate()?;
        self.stats.validate()?;
        Ok(())
    }
}
