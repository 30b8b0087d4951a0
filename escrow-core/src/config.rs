//! Fee configuration

use crate::types::SubscriptionTier;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fee schedule for escrow funding charges
///
/// Rates are stored in basis points so configuration files stay integral
/// and the derived `Decimal` rates are exact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Platform fee for free-tier clients (basis points)
    pub free_tier_bp: u32,

    /// Platform fee for professional-tier clients (basis points)
    pub professional_tier_bp: u32,

    /// Platform fee for business-tier clients (basis points)
    pub business_tier_bp: u32,

    /// Card processor percentage fee (basis points)
    pub processor_rate_bp: u32,

    /// Card processor fixed fee (minor units)
    pub processor_fixed_cents: u32,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            free_tier_bp: 1_000,        // 10.0%
            professional_tier_bp: 750,  // 7.5%
            business_tier_bp: 500,      // 5.0%
            processor_rate_bp: 290,     // 2.9%
            processor_fixed_cents: 30,  // $0.30
        }
    }
}

impl FeeConfig {
    /// Platform fee rate for a tier, as a fraction of the contract amount
    pub fn platform_fee_rate(&self, tier: SubscriptionTier) -> Decimal {
        let bp = match tier {
            SubscriptionTier::Free => self.free_tier_bp,
            SubscriptionTier::Professional => self.professional_tier_bp,
            SubscriptionTier::Business => self.business_tier_bp,
        };
        Decimal::new(i64::from(bp), 4)
    }

    /// Processor percentage rate, as a fraction of the charged subtotal
    pub fn processor_rate(&self) -> Decimal {
        Decimal::new(i64::from(self.processor_rate_bp), 4)
    }

    /// Fixed processor fee in major units
    pub fn processor_fixed(&self) -> Decimal {
        Decimal::new(i64::from(self.processor_fixed_cents), 2)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FeeConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse fee config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = FeeConfig::default();

        if let Ok(bp) = std::env::var("ESCROW_PROCESSOR_RATE_BP") {
            config.processor_rate_bp = bp
                .parse()
                .map_err(|e| crate::Error::Config(format!("ESCROW_PROCESSOR_RATE_BP: {}", e)))?;
        }

        if let Ok(cents) = std::env::var("ESCROW_PROCESSOR_FIXED_CENTS") {
            config.processor_fixed_cents = cents
                .parse()
                .map_err(|e| crate::Error::Config(format!("ESCROW_PROCESSOR_FIXED_CENTS: {}", e)))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = FeeConfig::default();
        assert_eq!(config.platform_fee_rate(SubscriptionTier::Free), dec!(0.10));
        assert_eq!(config.platform_fee_rate(SubscriptionTier::Professional), dec!(0.075));
        assert_eq!(config.platform_fee_rate(SubscriptionTier::Business), dec!(0.05));
        assert_eq!(config.processor_rate(), dec!(0.029));
        assert_eq!(config.processor_fixed(), dec!(0.30));
    }
}
