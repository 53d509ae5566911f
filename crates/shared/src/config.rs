//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger and balance configuration.
    #[serde(default)]
    pub ledger: LedgerSettings,
    /// Closure workflow configuration.
    #[serde(default)]
    pub closure: ClosureSettings,
    /// Query cache configuration.
    #[serde(default)]
    pub cache: CacheSettings,
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSettings {
    /// Reporting currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Maximum debit/credit gap still considered balanced by the balance query.
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: Decimal,
}

fn default_currency() -> String {
    "XOF".to_string()
}

fn default_balance_tolerance() -> Decimal {
    Decimal::ONE
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            balance_tolerance: default_balance_tolerance(),
        }
    }
}

/// How strictly the closure workflow guards its transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosurePolicy {
    /// Dependencies and approvals are informational only.
    #[default]
    Lenient,
    /// Step dependencies and period approvals are enforced.
    Strict,
}

/// Closure workflow configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClosureSettings {
    /// Delay applied before a step execution completes, in milliseconds.
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
    /// Guard policy.
    #[serde(default)]
    pub policy: ClosurePolicy,
}

fn default_step_delay_ms() -> u64 {
    1000
}

impl Default for ClosureSettings {
    fn default() -> Self {
        Self {
            step_delay_ms: default_step_delay_ms(),
            policy: ClosurePolicy::default(),
        }
    }
}

/// Query cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Maximum number of cached query results.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// Time-to-live of a cached result, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_max_capacity() -> u64 {
    100
}

fn default_ttl_secs() -> u64 {
    300 // 5 minutes
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `OHADA__*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("OHADA")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}
