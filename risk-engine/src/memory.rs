//! In-memory risk store
//!
//! Backs unit and integration tests, and works as a real store for
//! single-process deployments and demos.

use crate::store::{
    PayoutMethod, Profile, RiskStore, SecurityEvent, SecurityEventType, WithdrawalRecord,
};
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// DashMap-backed [`RiskStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: DashMap<Uuid, Profile>,
    payout_methods: DashMap<Uuid, Vec<PayoutMethod>>,
    withdrawals: DashMap<Uuid, Vec<WithdrawalRecord>>,
    events: DashMap<Uuid, Vec<SecurityEvent>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile
    pub fn insert_profile(&self, profile: Profile) {
        self.profiles.insert(profile.user_id, profile);
    }

    /// Register a payout method
    pub fn add_payout_method(&self, method: PayoutMethod) {
        self.payout_methods.entry(method.user_id).or_default().push(method);
    }

    /// Record a historical withdrawal
    pub fn add_withdrawal(&self, withdrawal: WithdrawalRecord) {
        self.withdrawals.entry(withdrawal.user_id).or_default().push(withdrawal);
    }

    /// Seed a security log entry
    pub fn add_event(&self, event: SecurityEvent) {
        self.events.entry(event.user_id).or_default().push(event);
    }

    /// All logged events for a user, in insertion order
    pub fn events_for(&self, user_id: Uuid) -> Vec<SecurityEvent> {
        self.events
            .get(&user_id)
            .map(|rows| rows.value().clone())
            .unwrap_or_default()
    }

    /// Make subsequent reads fail, for degradation tests
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::Relaxed);
    }

    /// Make subsequent appends fail, for degradation tests
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    fn read_guard(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(Error::Store("injected read failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RiskStore for MemoryStore {
    async fn profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        self.read_guard()?;
        Ok(self.profiles.get(&user_id).map(|p| p.value().clone()))
    }

    async fn payout_method(&self, user_id: Uuid, method_id: Uuid) -> Result<Option<PayoutMethod>> {
        self.read_guard()?;
        Ok(self.payout_methods.get(&user_id).and_then(|methods| {
            methods.iter().find(|m| m.id == method_id).cloned()
        }))
    }

    async fn withdrawals_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<WithdrawalRecord>> {
        self.read_guard()?;
        Ok(self
            .withdrawals
            .get(&user_id)
            .map(|rows| {
                rows.iter()
                    .filter(|w| w.created_at >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn security_events_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<SecurityEvent>> {
        self.read_guard()?;
        let mut rows: Vec<SecurityEvent> = self
            .events
            .get(&user_id)
            .map(|rows| {
                rows.iter()
                    .filter(|e| e.recorded_at >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        rows.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn failure_count_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<u32> {
        self.read_guard()?;
        Ok(self
            .events
            .get(&user_id)
            .map(|rows| {
                rows.iter()
                    .filter(|e| e.event_type == SecurityEventType::Failure && e.recorded_at >= since)
                    .count() as u32
            })
            .unwrap_or(0))
    }

    async fn append_event(&self, event: SecurityEvent) -> Result<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(Error::Store("injected write failure".to_string()));
        }
        self.events.entry(event.user_id).or_default().push(event);
        Ok(())
    }
}
