//! Withdrawal Risk Engine for PactWork
//!
//! Scores every withdrawal attempt across six independent checks (account,
//! amount pattern, behavior, payout method, network, velocity) and produces
//! an allow / review / deny verdict backed by an append-only security log.

#![forbid(unsafe_code)]

pub mod account;
pub mod amount;
pub mod assessor;
pub mod behavior;
pub mod blocklist;
pub mod config;
pub mod error;
pub mod memory;
pub mod network;
pub mod payout;
pub mod store;
pub mod types;
pub mod velocity;

pub use assessor::WithdrawalRiskAssessor;
pub use blocklist::{HoldKind, ManualBlocklist};
pub use config::RiskConfig;
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use network::{NetworkReputationChecker, NoopReputation};
pub use store::{
    IdentityStatus, PayoutMethod, PayoutMethodKind, Profile, RiskStore, SecurityEvent,
    SecurityEventType, WithdrawalRecord, WithdrawalStatus,
};
pub use types::{CheckReport, RiskFlag, SecurityAssessment, WithdrawalContext};
