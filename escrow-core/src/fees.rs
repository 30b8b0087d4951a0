//! Escrow fee calculation
//!
//! Computes the line-item breakdown embedded in a contract funding charge:
//! platform fee by subscription tier, approximated card-processor fee, and
//! the resulting total.

use crate::config::FeeConfig;
use crate::types::{Currency, SubscriptionTier};
use crate::{Error, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Breakdown of a single escrow funding charge
///
/// Amounts keep full decimal precision; rounding happens only when a value
/// leaves for display or charge creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Contract principal (major units)
    pub contract_amount: Decimal,

    /// Platform fee by subscription tier
    pub platform_fee: Decimal,

    /// Approximated card-processor fee on the post-platform-fee subtotal
    pub processor_fee: Decimal,

    /// Total amount to charge the client
    pub total_charge: Decimal,
}

impl FeeBreakdown {
    /// Breakdown rounded to 2 decimal places, half away from zero
    pub fn rounded(&self) -> Self {
        Self {
            contract_amount: round_display(self.contract_amount),
            platform_fee: round_display(self.platform_fee),
            processor_fee: round_display(self.processor_fee),
            total_charge: round_display(self.total_charge),
        }
    }

    /// Total charge in minor units, as submitted to the payment processor
    pub fn charge_minor_units(&self, currency: Currency) -> Result<i64> {
        let minor = (self.total_charge * Decimal::from(currency.minor_per_major()))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        minor.to_i64().ok_or_else(|| {
            Error::AmountOutOfRange(format!(
                "Total charge {} does not fit in {} minor units",
                self.total_charge, currency
            ))
        })
    }
}

fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Escrow fee calculator
///
/// Pure and stateless: identical inputs always produce identical outputs.
pub struct EscrowFeeCalculator {
    config: FeeConfig,
}

impl EscrowFeeCalculator {
    /// Create a calculator with the given fee schedule
    pub fn new(config: FeeConfig) -> Self {
        Self { config }
    }

    /// Quote the fees for funding a contract
    ///
    /// Total over all positive amounts; callers reject non-positive amounts
    /// before quoting.
    pub fn quote(&self, contract_amount: Decimal, tier: SubscriptionTier) -> FeeBreakdown {
        let platform_fee = contract_amount * self.config.platform_fee_rate(tier);
        let processor_fee =
            (contract_amount + platform_fee) * self.config.processor_rate() + self.config.processor_fixed();
        let total_charge = contract_amount + platform_fee + processor_fee;

        FeeBreakdown {
            contract_amount,
            platform_fee,
            processor_fee,
            total_charge,
        }
    }

    /// Quote with amount validation, for callers that have not pre-checked
    pub fn quote_checked(&self, contract_amount: Decimal, tier: SubscriptionTier) -> Result<FeeBreakdown> {
        if contract_amount <= Decimal::ZERO {
            return Err(Error::AmountOutOfRange(format!(
                "Contract amount must be positive, got {}",
                contract_amount
            )));
        }
        Ok(self.quote(contract_amount, tier))
    }
}

impl Default for EscrowFeeCalculator {
    fn default() -> Self {
        Self::new(FeeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_free_tier_worked_example() {
        let calculator = EscrowFeeCalculator::default();
        let quote = calculator.quote(dec!(5000), SubscriptionTier::Free);

        assert_eq!(quote.platform_fee, dec!(500));
        // (5000 + 500) * 0.029 + 0.30
        assert_eq!(quote.processor_fee, dec!(159.80));
        assert_eq!(quote.total_charge, dec!(5659.80));
    }

    #[test]
    fn test_tier_rates() {
        let calculator = EscrowFeeCalculator::default();

        let professional = calculator.quote(dec!(1000), SubscriptionTier::Professional);
        assert_eq!(professional.platform_fee, dec!(75));

        let business = calculator.quote(dec!(1000), SubscriptionTier::Business);
        assert_eq!(business.platform_fee, dec!(50));
    }

    #[test]
    fn test_charge_minor_units() {
        let calculator = EscrowFeeCalculator::default();
        let quote = calculator.quote(dec!(5000), SubscriptionTier::Free);

        assert_eq!(quote.charge_minor_units(Currency::Usd).unwrap(), 565_980);
    }

    #[test]
    fn test_rounded_half_away_from_zero() {
        let breakdown = FeeBreakdown {
            contract_amount: dec!(10),
            platform_fee: dec!(1.005),
            processor_fee: dec!(0.624),
            total_charge: dec!(11.629),
        };

        let rounded = breakdown.rounded();
        assert_eq!(rounded.platform_fee, dec!(1.01));
        assert_eq!(rounded.processor_fee, dec!(0.62));
        assert_eq!(rounded.total_charge, dec!(11.63));
    }

    #[test]
    fn test_quote_checked_rejects_non_positive() {
        let calculator = EscrowFeeCalculator::default();

        assert!(calculator.quote_checked(dec!(0), SubscriptionTier::Free).is_err());
        assert!(calculator.quote_checked(dec!(-25), SubscriptionTier::Free).is_err());
        assert!(calculator.quote_checked(dec!(0.01), SubscriptionTier::Free).is_ok());
    }
}
