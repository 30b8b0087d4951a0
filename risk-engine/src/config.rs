//! Configuration for withdrawal risk assessment

use serde::{Deserialize, Serialize};

/// Thresholds and windows for the risk assessor
///
/// Defaults carry the production values; deployments override via TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Accounts younger than this are treated as new (days)
    pub new_account_days: i64,

    /// Window for counting failed withdrawal events (hours)
    pub failure_window_hours: i64,

    /// Failure events within the window that raise a flag
    pub failure_threshold: u32,

    /// KYC risk score above which the account is flagged
    pub kyc_risk_threshold: u32,

    /// High-amount threshold (minor units)
    pub high_amount_cents: i64,

    /// Medium-amount threshold (minor units)
    pub medium_amount_cents: i64,

    /// Multiplier over the recent mean that marks an unusual amount
    pub spike_multiplier: u32,

    /// History window for amount-pattern analysis (days)
    pub pattern_window_days: i64,

    /// Paid/processing withdrawals within the window that mark a rapid pattern
    pub rapid_count: usize,

    /// History window for behavioral analysis (days)
    pub behavior_window_days: i64,

    /// Newest security events considered by behavioral analysis
    pub behavior_event_cap: usize,

    /// Distinct IP addresses beyond which the account is flagged
    pub ip_variety_limit: usize,

    /// Distinct user agents beyond which the account is flagged
    pub ua_variety_limit: usize,

    /// Local hour before which requests are off-hours
    pub quiet_hour_start: u32,

    /// Local hour after which requests are off-hours
    pub quiet_hour_end: u32,

    /// Payout methods younger than this are treated as new (hours)
    pub new_method_hours: i64,

    /// Withdrawals allowed per hourly window
    pub hourly_limit: usize,

    /// Hourly rate-limit window (minutes)
    pub hourly_window_minutes: i64,

    /// Withdrawals allowed per daily window
    pub daily_limit: usize,

    /// Daily rate-limit window (hours)
    pub daily_window_hours: i64,

    /// Score at or above which manual review is required
    pub review_score: u32,

    /// Amount above which manual review is required (minor units)
    pub review_amount_cents: i64,

    /// Score at or above which the withdrawal is denied
    pub deny_score: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            new_account_days: 7,
            failure_window_hours: 24,
            failure_threshold: 5,
            kyc_risk_threshold: 70,
            high_amount_cents: 500_000,   // $5,000
            medium_amount_cents: 100_000, // $1,000
            spike_multiplier: 3,
            pattern_window_days: 7,
            rapid_count: 3,
            behavior_window_days: 30,
            behavior_event_cap: 50,
            ip_variety_limit: 5,
            ua_variety_limit: 3,
            quiet_hour_start: 6,
            quiet_hour_end: 23,
            new_method_hours: 72,
            hourly_limit: 3,
            hourly_window_minutes: 60,
            daily_limit: 10,
            daily_window_hours: 24,
            review_score: 50,
            review_amount_cents: 100_000, // $1,000
            deny_score: 100,
        }
    }
}

impl RiskConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;
        toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))
    }
}
