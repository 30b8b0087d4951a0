//! Manual block list
//!
//! Operator-placed holds that feed the reserved verdict flags. Sub-checks
//! never emit these flags; they enter an assessment only through this list.

use crate::types::RiskFlag;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why an operator placed a hold on the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldKind {
    /// Withdrawals are refused outright
    Blocked,
    /// Account shows signs of takeover
    Compromised,
    /// Force manual review regardless of score
    CriticalRisk,
}

impl HoldKind {
    /// Flag this hold contributes to an assessment
    pub fn flag(&self) -> RiskFlag {
        match self {
            HoldKind::Blocked => RiskFlag::BlockedUser,
            HoldKind::Compromised => RiskFlag::AccountCompromised,
            HoldKind::CriticalRisk => RiskFlag::CriticalRisk,
        }
    }
}

/// Thread-safe registry of operator holds
#[derive(Debug, Default)]
pub struct ManualBlocklist {
    holds: DashMap<Uuid, Vec<HoldKind>>,
}

impl ManualBlocklist {
    /// Create an empty block list
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a hold on a user
    pub fn place(&self, user_id: Uuid, kind: HoldKind) {
        let mut entry = self.holds.entry(user_id).or_default();
        if !entry.contains(&kind) {
            entry.push(kind);
        }
    }

    /// Release one hold kind
    pub fn release(&self, user_id: Uuid, kind: HoldKind) {
        if let Some(mut entry) = self.holds.get_mut(&user_id) {
            entry.retain(|k| *k != kind);
        }
    }

    /// Flags currently attached to a user
    pub fn flags_for(&self, user_id: Uuid) -> Vec<RiskFlag> {
        self.holds
            .get(&user_id)
            .map(|kinds| kinds.iter().map(HoldKind::flag).collect())
            .unwrap_or_default()
    }
}
