//! Data access for risk assessment
//!
//! The assessor reads account history through [`RiskStore`] so route
//! handlers, tests and background jobs can supply different backends
//! instead of sharing a process-global client.

use crate::types::RiskFlag;
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity-verification state carried on a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityStatus {
    /// No verification attempted
    Unverified,
    /// Verification submitted, awaiting result
    Pending,
    /// Identity confirmed
    Verified,
    /// Verification attempted and rejected
    Failed,
}

/// Account profile row read by the account check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Account owner
    pub user_id: Uuid,

    /// Account creation time
    pub created_at: DateTime<Utc>,

    /// Identity-verification state
    pub identity_status: IdentityStatus,

    /// Risk score assigned by the KYC provider (0-100)
    pub kyc_risk_score: u32,

    /// Last KYC check, if any
    pub kyc_checked_at: Option<DateTime<Utc>>,
}

/// Payout destination type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutMethodKind {
    /// Linked bank account
    BankAccount,
    /// Instant-payout debit card
    DebitCard,
    /// PayPal account
    Paypal,
    /// Wire-transfer provider
    Wise,
}

/// Payout destination registered by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutMethod {
    /// Method id
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Destination type
    pub kind: PayoutMethodKind,

    /// Destination has been verified
    pub verified: bool,

    /// When the user added the method
    pub added_at: DateTime<Utc>,
}

/// Lifecycle state of a withdrawal row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    /// Created, not yet picked up
    Pending,
    /// Payout in flight
    Processing,
    /// Funds delivered
    Paid,
    /// Payout failed
    Failed,
}

/// Historical withdrawal row used for pattern and velocity checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRecord {
    /// Withdrawal id
    pub id: Uuid,

    /// Requesting user
    pub user_id: Uuid,

    /// Amount in minor units
    pub amount_cents: i64,

    /// Current status
    pub status: WithdrawalStatus,

    /// Destination method
    pub payout_method_id: Uuid,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Kind of entry in the append-only withdrawal security log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityEventType {
    /// One risk assessment, recorded before any funds move
    Assessment,
    /// Withdrawal executed successfully
    Success,
    /// Withdrawal attempt failed or was refused
    Failure,
}

/// Append-only security log row
///
/// Never mutated or deleted; subsequent assessments read these rows back
/// as behavioral history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    /// Event id
    pub id: Uuid,

    /// Affected user
    pub user_id: Uuid,

    /// Event kind
    pub event_type: SecurityEventType,

    /// Requester IP, when known
    pub ip: Option<String>,

    /// Requester user agent, when known
    pub user_agent: Option<String>,

    /// Risk score at the time of the event
    pub risk_score: Option<u32>,

    /// Flags raised at the time of the event
    pub flags: Vec<RiskFlag>,

    /// Free-form event metadata
    pub metadata: serde_json::Value,

    /// When the event was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Read and append access to account history
#[async_trait]
pub trait RiskStore: Send + Sync {
    /// Fetch a profile by user id
    async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>>;

    /// Fetch a payout method, scoped to its owner
    ///
    /// Returns `None` when the method does not exist or belongs to a
    /// different user.
    async fn payout_method(&self, user_id: Uuid, method_id: Uuid) -> Result<Option<PayoutMethod>>;

    /// Withdrawals created at or after `since`, any status
    async fn withdrawals_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<WithdrawalRecord>>;

    /// Security log entries at or after `since`, newest first, at most `limit`
    async fn security_events_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<SecurityEvent>>;

    /// Count of failure events at or after `since`
    async fn failure_count_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<u32>;

    /// Append one row to the security log
    async fn append_event(&self, event: SecurityEvent) -> Result<()>;
}
