//! Core types shared across the escrow platform

use serde::{Deserialize, Serialize};
use std::fmt;

/// Settlement currency for contracts and withdrawals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US dollar
    Usd,
    /// Euro
    Eur,
    /// Pound sterling
    Gbp,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    /// Minor units per major unit (all supported currencies are 2-decimal)
    pub fn minor_per_major(&self) -> i64 {
        100
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Client subscription tier, determines the platform fee percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    /// No subscription
    Free,
    /// Professional plan
    Professional,
    /// Business plan
    Business,
}

impl SubscriptionTier {
    /// Parse a stored tier value; unrecognized values fall back to `Free`
    pub fn parse(value: &str) -> Self {
        match value {
            "professional" => SubscriptionTier::Professional,
            "business" => SubscriptionTier::Business,
            _ => SubscriptionTier::Free,
        }
    }

    /// Stable string form
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Professional => "professional",
            SubscriptionTier::Business => "business",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
