//! # Pricing Configuration
//!
//! Every business number the engine uses: markup tiers, tax rate, shipping
//! policy, early-buyout discount. Nothing here is read from the
//! environment; the caller builds a `PricingConfig` (the CLI loads one from
//! TOML) and hands it to [`crate::engine::PricingEngine`].
//!
//! ## Config File Format
//! ```toml
//! tax_rate_bps = 825                 # 8.25%
//! free_shipping_threshold = "500.00" # strictly above this ships free
//! flat_shipping_fee = "9.99"
//! early_buyout_discount_bps = 1000   # pay 90% of the remaining balance
//! buyout_checkpoints = [3, 6, 9]
//!
//! [[markup_tiers]]
//! up_to_months = 3
//! markup_bps = 500
//!
//! [[markup_tiers]]
//! up_to_months = 6
//! markup_bps = 1000
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Rate, RentalTerm};
use crate::validation::{validate_max_amount, validate_rate_bps};
use crate::MAX_TERM_MONTHS;

// =============================================================================
// Markup Tiers
// =============================================================================

/// Markup applied to every term up to and including `up_to_months`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupTier {
    pub up_to_months: u32,
    pub markup_bps: u32,
}

impl MarkupTier {
    pub const fn new(up_to_months: u32, markup_bps: u32) -> Self {
        MarkupTier {
            up_to_months,
            markup_bps,
        }
    }
}

/// The storefront's tier table.
///
/// ```text
/// term ≤ 3   →  5%
/// term ≤ 6   → 10%
/// term ≤ 12  → 15%
/// term ≤ 24  → 20%
/// ```
pub fn default_markup_tiers() -> Vec<MarkupTier> {
    vec![
        MarkupTier::new(3, 500),
        MarkupTier::new(6, 1000),
        MarkupTier::new(12, 1500),
        MarkupTier::new(MAX_TERM_MONTHS, 2000),
    ]
}

fn default_tax_rate_bps() -> u32 {
    825
}

fn default_free_shipping_threshold() -> Money {
    Money::from_cents(50000)
}

fn default_flat_shipping_fee() -> Money {
    Money::from_cents(999)
}

fn default_early_buyout_discount_bps() -> u32 {
    1000
}

fn default_buyout_checkpoints() -> Vec<u32> {
    vec![3, 6, 9]
}

// =============================================================================
// Pricing Config
// =============================================================================

/// Tunable pricing parameters.
///
/// `Default` reproduces the storefront's live values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Sales tax on the combined purchase + first-month rental subtotal.
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// Orders with a subtotal strictly above this ship free.
    #[serde(default = "default_free_shipping_threshold", with = "crate::money::decimal")]
    pub free_shipping_threshold: Money,

    /// Shipping charged at or below the threshold.
    #[serde(default = "default_flat_shipping_fee", with = "crate::money::decimal")]
    pub flat_shipping_fee: Money,

    /// Share of the remaining balance waived on an early buyout.
    #[serde(default = "default_early_buyout_discount_bps")]
    pub early_buyout_discount_bps: u32,

    /// Months after which the rental quote shows a buyout amount.
    #[serde(default = "default_buyout_checkpoints")]
    pub buyout_checkpoints: Vec<u32>,

    /// Ascending by `up_to_months`; the last tier must reach 24 months.
    #[serde(default = "default_markup_tiers")]
    pub markup_tiers: Vec<MarkupTier>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            tax_rate_bps: default_tax_rate_bps(),
            free_shipping_threshold: default_free_shipping_threshold(),
            flat_shipping_fee: default_flat_shipping_fee(),
            early_buyout_discount_bps: default_early_buyout_discount_bps(),
            buyout_checkpoints: default_buyout_checkpoints(),
            markup_tiers: default_markup_tiers(),
        }
    }
}

impl PricingConfig {
    /// Checks the configuration can price every supported term.
    pub fn validate(&self) -> CoreResult<()> {
        if self.markup_tiers.is_empty() {
            return Err(CoreError::InvalidConfig(
                "markup_tiers must not be empty".into(),
            ));
        }

        let ascending = self
            .markup_tiers
            .windows(2)
            .all(|pair| pair[0].up_to_months < pair[1].up_to_months);
        if !ascending {
            return Err(CoreError::InvalidConfig(
                "markup_tiers must be sorted by up_to_months with no duplicates".into(),
            ));
        }

        let covered = self
            .markup_tiers
            .last()
            .map_or(0, |tier| tier.up_to_months);
        if covered < MAX_TERM_MONTHS {
            return Err(CoreError::InvalidConfig(format!(
                "markup_tiers must cover terms up to {} months, last tier ends at {}",
                MAX_TERM_MONTHS, covered
            )));
        }

        for tier in &self.markup_tiers {
            validate_rate_bps("markup", tier.markup_bps)?;
        }
        validate_rate_bps("tax rate", self.tax_rate_bps)?;
        validate_rate_bps("early buyout discount", self.early_buyout_discount_bps)?;

        if self.free_shipping_threshold.is_negative() {
            return Err(CoreError::InvalidConfig(
                "free_shipping_threshold must not be negative".into(),
            ));
        }
        if self.flat_shipping_fee.is_negative() {
            return Err(CoreError::InvalidConfig(
                "flat_shipping_fee must not be negative".into(),
            ));
        }
        validate_max_amount("free shipping threshold", self.free_shipping_threshold)?;
        validate_max_amount("flat shipping fee", self.flat_shipping_fee)?;

        Ok(())
    }

    /// Markup for the first tier whose bound reaches `term`.
    pub fn markup_for(&self, term: RentalTerm) -> CoreResult<Rate> {
        self.markup_tiers
            .iter()
            .find(|tier| term.months() <= tier.up_to_months)
            .map(|tier| Rate::from_bps(tier.markup_bps))
            .ok_or_else(|| {
                CoreError::InvalidConfig(format!("no markup tier covers {}", term))
            })
    }

    #[inline]
    pub fn tax_rate(&self) -> Rate {
        Rate::from_bps(self.tax_rate_bps)
    }

    #[inline]
    pub fn early_buyout_discount(&self) -> Rate {
        Rate::from_bps(self.early_buyout_discount_bps)
    }

    /// Flat-rate shipping: free strictly above the threshold.
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal > self.free_shipping_threshold {
            Money::zero()
        } else {
            self.flat_shipping_fee
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(months: u32) -> RentalTerm {
        RentalTerm::new(months).unwrap()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = PricingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tax_rate().bps(), 825);
        assert_eq!(config.early_buyout_discount().bps(), 1000);
    }

    #[test]
    fn test_markup_tier_selection() {
        let config = PricingConfig::default();
        assert_eq!(config.markup_for(term(3)).unwrap().bps(), 500);
        assert_eq!(config.markup_for(term(4)).unwrap().bps(), 1000);
        assert_eq!(config.markup_for(term(6)).unwrap().bps(), 1000);
        assert_eq!(config.markup_for(term(9)).unwrap().bps(), 1500);
        assert_eq!(config.markup_for(term(12)).unwrap().bps(), 1500);
        // Slider terms between canonical plans fall into the next tier up
        assert_eq!(config.markup_for(term(15)).unwrap().bps(), 2000);
        assert_eq!(config.markup_for(term(24)).unwrap().bps(), 2000);
    }

    #[test]
    fn test_shipping_threshold_is_strict() {
        let config = PricingConfig::default();
        assert_eq!(config.shipping_for(Money::from_cents(50000)).cents(), 999);
        assert_eq!(config.shipping_for(Money::from_cents(50001)).cents(), 0);
        assert_eq!(config.shipping_for(Money::from_cents(100)).cents(), 999);
    }

    #[test]
    fn test_validation_rejects_bad_tables() {
        let mut config = PricingConfig::default();
        config.markup_tiers.clear();
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.markup_tiers = vec![MarkupTier::new(12, 1500), MarkupTier::new(6, 1000)];
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.markup_tiers = vec![MarkupTier::new(3, 500), MarkupTier::new(12, 1500)];
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));

        let mut config = PricingConfig::default();
        config.tax_rate_bps = 20_000;
        assert!(matches!(config.validate(), Err(CoreError::InvalidArgument(_))));

        let mut config = PricingConfig::default();
        config.flat_shipping_fee = Money::from_cents(-1);
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.flat_shipping_fee = Money::from_cents(i64::MAX);
        assert!(matches!(config.validate(), Err(CoreError::InvalidArgument(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PricingConfig =
            serde_json::from_str(r#"{"tax_rate_bps": 700, "flat_shipping_fee": "4.50"}"#).unwrap();
        assert_eq!(config.tax_rate_bps, 700);
        assert_eq!(config.flat_shipping_fee.cents(), 450);
        assert_eq!(config.free_shipping_threshold.cents(), 50000);
        assert_eq!(config.markup_tiers, default_markup_tiers());
    }
}
