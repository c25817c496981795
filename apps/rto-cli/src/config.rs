//! # Config Loading
//!
//! Builds the [`PricingConfig`] the engine runs with.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RTO_TAX_RATE_BPS=700                                               │
//! │     RTO_FREE_SHIPPING_THRESHOLD=250.00                                 │
//! │     RTO_FLAT_SHIPPING_FEE=4.99                                         │
//! │     RTO_EARLY_BUYOUT_DISCOUNT_BPS=1500                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config PATH, or                                                  │
//! │     ~/.config/rto-pricing/pricing.toml (Linux)                         │
//! │     ~/Library/Application Support/com.rto.rto-pricing/pricing.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     The storefront's live pricing                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The merged result is validated before any command sees it.

use std::path::{Path, PathBuf};

use rto_core::{Money, PricingConfig};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

pub const ENV_TAX_RATE_BPS: &str = "RTO_TAX_RATE_BPS";
pub const ENV_FREE_SHIPPING_THRESHOLD: &str = "RTO_FREE_SHIPPING_THRESHOLD";
pub const ENV_FLAT_SHIPPING_FEE: &str = "RTO_FLAT_SHIPPING_FEE";
pub const ENV_EARLY_BUYOUT_DISCOUNT_BPS: &str = "RTO_EARLY_BUYOUT_DISCOUNT_BPS";

/// Loads configuration from file, environment, and defaults.
///
/// An explicit `--config` path must exist. The platform default path is
/// optional and silently skipped when absent.
pub fn load(explicit_path: Option<&Path>) -> CliResult<PricingConfig> {
    load_with_env(explicit_path, |key| std::env::var(key).ok())
}

/// Same as [`load`] with a custom environment lookup.
pub fn load_with_env<F>(explicit_path: Option<&Path>, env: F) -> CliResult<PricingConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match explicit_path {
        Some(path) => read_file(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => read_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                PricingConfig::default()
            }
            None => PricingConfig::default(),
        },
    };

    apply_env_overrides(&mut config, env);

    config.validate()?;
    Ok(config)
}

fn read_file(path: &Path) -> CliResult<PricingConfig> {
    info!(?path, "Loading pricing config from file");
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::read(path, e))?;
    Ok(toml::from_str(&contents)?)
}

/// Applies `RTO_*` overrides. Unparsable values are logged and ignored.
fn apply_env_overrides<F>(config: &mut PricingConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = env(ENV_TAX_RATE_BPS) {
        match raw.trim().parse::<u32>() {
            Ok(bps) => {
                debug!(bps, "Overriding tax rate from environment");
                config.tax_rate_bps = bps;
            }
            Err(_) => warn!(value = %raw, "Ignoring unparsable {}", ENV_TAX_RATE_BPS),
        }
    }

    if let Some(raw) = env(ENV_FREE_SHIPPING_THRESHOLD) {
        match Money::parse(&raw) {
            Ok(amount) => {
                debug!(%amount, "Overriding free shipping threshold from environment");
                config.free_shipping_threshold = amount;
            }
            Err(_) => warn!(value = %raw, "Ignoring unparsable {}", ENV_FREE_SHIPPING_THRESHOLD),
        }
    }

    if let Some(raw) = env(ENV_FLAT_SHIPPING_FEE) {
        match Money::parse(&raw) {
            Ok(amount) => {
                debug!(%amount, "Overriding flat shipping fee from environment");
                config.flat_shipping_fee = amount;
            }
            Err(_) => warn!(value = %raw, "Ignoring unparsable {}", ENV_FLAT_SHIPPING_FEE),
        }
    }

    if let Some(raw) = env(ENV_EARLY_BUYOUT_DISCOUNT_BPS) {
        match raw.trim().parse::<u32>() {
            Ok(bps) => {
                debug!(bps, "Overriding early buyout discount from environment");
                config.early_buyout_discount_bps = bps;
            }
            Err(_) => warn!(value = %raw, "Ignoring unparsable {}", ENV_EARLY_BUYOUT_DISCOUNT_BPS),
        }
    }
}

/// Returns the default config file path.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "rto", "rto-pricing")
        .map(|dirs| dirs.config_dir().join("pricing.toml"))
}

/// Renders the effective configuration as TOML.
pub fn render(config: &PricingConfig) -> CliResult<String> {
    Ok(toml::to_string_pretty(config)?)
}
