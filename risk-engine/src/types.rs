//! Core types for withdrawal risk assessment

use escrow_core::Currency;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Fallback denial reason when no higher-priority flag applies
pub const GENERIC_DENIAL_REASON: &str = "Withdrawal declined by security review";

/// Risk flag attached to an assessment
///
/// Most variants are emitted by the sub-checks; `CriticalRisk`,
/// `BlockedUser` and `AccountCompromised` enter an assessment only through
/// the manual block list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    // Account security
    NewAccount,
    IdentityNotVerified,
    HighKycRisk,
    MultipleRecentFailures,
    ProfileNotFound,
    AccountCheckError,

    // Amount and pattern analysis
    HighAmount,
    MediumAmount,
    UnusualAmountPattern,
    RapidWithdrawalPattern,
    AmountCheckError,

    // Behavioral analysis
    MultipleIpAddresses,
    MultipleDevices,
    NewIpAddress,
    UnusualTiming,
    BehaviorCheckError,

    // Payout method
    InvalidPayoutMethod,
    NewPayoutMethod,
    UnverifiedPayoutMethod,
    DebitCardPayout,
    PayoutMethodCheckError,

    // Network and device
    SuspiciousIp,
    SuspiciousUserAgent,
    VpnOrProxy,

    // Velocity
    HourlyRateLimitExceeded,
    DailyRateLimitExceeded,
    RateLimitCheckError,

    // Pipeline failure
    AssessmentError,

    // Reserved, set externally via the manual block list
    CriticalRisk,
    BlockedUser,
    AccountCompromised,
}

impl RiskFlag {
    /// Stable string form used in audit rows and API payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFlag::NewAccount => "new_account",
            RiskFlag::IdentityNotVerified => "identity_not_verified",
            RiskFlag::HighKycRisk => "high_kyc_risk",
            RiskFlag::MultipleRecentFailures => "multiple_recent_failures",
            RiskFlag::ProfileNotFound => "profile_not_found",
            RiskFlag::AccountCheckError => "account_check_error",
            RiskFlag::HighAmount => "high_amount",
            RiskFlag::MediumAmount => "medium_amount",
            RiskFlag::UnusualAmountPattern => "unusual_amount_pattern",
            RiskFlag::RapidWithdrawalPattern => "rapid_withdrawal_pattern",
            RiskFlag::AmountCheckError => "amount_check_error",
            RiskFlag::MultipleIpAddresses => "multiple_ip_addresses",
            RiskFlag::MultipleDevices => "multiple_devices",
            RiskFlag::NewIpAddress => "new_ip_address",
            RiskFlag::UnusualTiming => "unusual_timing",
            RiskFlag::BehaviorCheckError => "behavior_check_error",
            RiskFlag::InvalidPayoutMethod => "invalid_payout_method",
            RiskFlag::NewPayoutMethod => "new_payout_method",
            RiskFlag::UnverifiedPayoutMethod => "unverified_payout_method",
            RiskFlag::DebitCardPayout => "debit_card_payout",
            RiskFlag::PayoutMethodCheckError => "payout_method_check_error",
            RiskFlag::SuspiciousIp => "suspicious_ip",
            RiskFlag::SuspiciousUserAgent => "suspicious_user_agent",
            RiskFlag::VpnOrProxy => "vpn_or_proxy",
            RiskFlag::HourlyRateLimitExceeded => "hourly_rate_limit_exceeded",
            RiskFlag::DailyRateLimitExceeded => "daily_rate_limit_exceeded",
            RiskFlag::RateLimitCheckError => "rate_limit_check_error",
            RiskFlag::AssessmentError => "assessment_error",
            RiskFlag::CriticalRisk => "critical_risk",
            RiskFlag::BlockedUser => "blocked_user",
            RiskFlag::AccountCompromised => "account_compromised",
        }
    }
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score and flags contributed by one sub-check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Non-negative score contribution
    pub score: u32,

    /// Flags raised by the check
    pub flags: Vec<RiskFlag>,
}

impl CheckReport {
    /// Empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed-penalty report (degraded lookups, short-circuits)
    pub fn single(score: u32, flag: RiskFlag) -> Self {
        Self {
            score,
            flags: vec![flag],
        }
    }

    /// Add a scored flag
    pub fn add(&mut self, score: u32, flag: RiskFlag) {
        self.score += score;
        self.flags.push(flag);
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: CheckReport) {
        self.score += other.score;
        self.flags.extend(other.flags);
    }
}

/// One withdrawal attempt, as seen by the assessor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalContext {
    /// Requesting user
    pub user_id: Uuid,

    /// Requested amount in minor units
    pub amount_cents: i64,

    /// Settlement currency
    pub currency: Currency,

    /// Destination payout method
    pub payout_method_id: Uuid,

    /// Requester IP address
    pub ip: String,

    /// Requester user agent
    pub user_agent: String,

    /// Expedited payout requested
    pub urgent: bool,
}

/// Verdict produced for one withdrawal attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityAssessment {
    /// Sum of the sub-check scores (uncapped)
    pub risk_score: u32,

    /// All flags raised during assessment
    pub flags: Vec<RiskFlag>,

    /// Manual review required before funds move
    pub requires_review: bool,

    /// Withdrawal may proceed
    pub allowed: bool,

    /// Denial reason, set only when not allowed
    pub reason: Option<String>,
}

impl SecurityAssessment {
    /// Check for a flag
    pub fn has_flag(&self, flag: RiskFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Fixed maximal-risk result returned when the assessment itself fails
    pub fn fail_secure() -> Self {
        Self {
            risk_score: 100,
            flags: vec![RiskFlag::AssessmentError],
            requires_review: true,
            allowed: false,
            reason: Some(GENERIC_DENIAL_REASON.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_string_form() {
        assert_eq!(RiskFlag::HourlyRateLimitExceeded.as_str(), "hourly_rate_limit_exceeded");
        assert_eq!(RiskFlag::BlockedUser.to_string(), "blocked_user");
    }

    #[test]
    fn test_flag_serde_matches_as_str() {
        let json = serde_json::to_string(&RiskFlag::NewPayoutMethod).unwrap();
        assert_eq!(json, "\"new_payout_method\"");
    }

    #[test]
    fn test_report_merge() {
        let mut report = CheckReport::single(30, RiskFlag::NewAccount);
        report.merge(CheckReport::single(50, RiskFlag::IdentityNotVerified));

        assert_eq!(report.score, 80);
        assert_eq!(report.flags, vec![RiskFlag::NewAccount, RiskFlag::IdentityNotVerified]);
    }

    #[test]
    fn test_fail_secure_shape() {
        let assessment = SecurityAssessment::fail_secure();

        assert_eq!(assessment.risk_score, 100);
        assert_eq!(assessment.flags, vec![RiskFlag::AssessmentError]);
        assert!(assessment.requires_review);
        assert!(!assessment.allowed);
        assert!(assessment.reason.is_some());
    }
}
