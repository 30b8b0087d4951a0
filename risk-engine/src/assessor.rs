//! Withdrawal risk assessor
//!
//! Combines the six sub-checks into one [`SecurityAssessment`] and records
//! every assessment in the append-only security log. Withdrawal creation
//! happens in the caller after the verdict, so concurrent requests from the
//! same user can each pass the velocity check on a stale count; closing
//! that window would need a serializable check-and-insert in the store.

use crate::blocklist::ManualBlocklist;
use crate::config::RiskConfig;
use crate::network::{NetworkReputationChecker, NoopReputation};
use crate::store::{RiskStore, SecurityEvent, SecurityEventType};
use crate::types::{
    CheckReport, RiskFlag, SecurityAssessment, WithdrawalContext, GENERIC_DENIAL_REASON,
};
use crate::{account, amount, behavior, network, payout, velocity, Result};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const REASON_BLOCKED: &str = "Account is blocked from withdrawals";
const REASON_COMPROMISED: &str = "Account is locked pending security review";
const REASON_IDENTITY: &str = "Identity verification is required before withdrawing";
const REASON_HOURLY: &str = "Too many withdrawal attempts in the last hour";
const REASON_DAILY: &str = "Daily withdrawal limit reached";

/// Withdrawal risk assessor
///
/// Stateless between calls; every assessment re-reads account history
/// through the injected store.
pub struct WithdrawalRiskAssessor {
    store: Arc<dyn RiskStore>,
    config: RiskConfig,
    blocklist: Arc<ManualBlocklist>,
    reputation: Arc<dyn NetworkReputationChecker>,
}

impl WithdrawalRiskAssessor {
    /// Create an assessor with default config, an empty block list and the
    /// no-op reputation checker
    pub fn new(store: Arc<dyn RiskStore>) -> Self {
        Self {
            store,
            config: RiskConfig::default(),
            blocklist: Arc::new(ManualBlocklist::new()),
            reputation: Arc::new(NoopReputation),
        }
    }

    /// Override the threshold configuration
    pub fn with_config(mut self, config: RiskConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a shared manual block list
    pub fn with_blocklist(mut self, blocklist: Arc<ManualBlocklist>) -> Self {
        self.blocklist = blocklist;
        self
    }

    /// Attach a network reputation checker
    pub fn with_reputation(mut self, reputation: Arc<dyn NetworkReputationChecker>) -> Self {
        self.reputation = reputation;
        self
    }

    /// Assess one withdrawal attempt
    ///
    /// Never fails: any error escaping the pipeline collapses to the
    /// maximal-risk fail-secure assessment.
    pub async fn assess(&self, ctx: &WithdrawalContext) -> SecurityAssessment {
        match self.run(ctx).await {
            Ok(assessment) => assessment,
            Err(err) => {
                warn!("Assessment failed for {}: {}", ctx.user_id, err);
                SecurityAssessment::fail_secure()
            }
        }
    }

    async fn run(&self, ctx: &WithdrawalContext) -> Result<SecurityAssessment> {
        let now = Utc::now();
        let store = self.store.as_ref();

        let mut combined = CheckReport::new();
        for flag in self.blocklist.flags_for(ctx.user_id) {
            combined.add(0, flag);
        }

        combined.merge(account::evaluate(store, &self.config, ctx, now).await);
        combined.merge(amount::evaluate(store, &self.config, ctx, now).await);
        combined.merge(behavior::evaluate(store, &self.config, ctx, now).await);
        combined.merge(payout::evaluate(store, &self.config, ctx, now).await);
        combined.merge(network::evaluate(ctx, self.reputation.as_ref()));
        combined.merge(velocity::evaluate(store, &self.config, ctx, now).await);

        let assessment = self.verdict(ctx, combined);
        self.record_assessment(ctx, &assessment).await?;

        if !assessment.allowed {
            info!(
                "Withdrawal DENIED for {} (score: {}): {}",
                ctx.user_id,
                assessment.risk_score,
                assessment.reason.as_deref().unwrap_or(GENERIC_DENIAL_REASON)
            );
        } else if assessment.requires_review {
            info!(
                "Withdrawal queued for review for {} (score: {})",
                ctx.user_id, assessment.risk_score
            );
        }

        Ok(assessment)
    }

    fn verdict(&self, ctx: &WithdrawalContext, report: CheckReport) -> SecurityAssessment {
        let CheckReport { score, flags } = report;

        let requires_review = score >= self.config.review_score
            || ctx.amount_cents > self.config.review_amount_cents
            || flags.contains(&RiskFlag::CriticalRisk);

        let allowed = score < self.config.deny_score
            && !flags.contains(&RiskFlag::BlockedUser)
            && !flags.contains(&RiskFlag::AccountCompromised);

        let reason = if allowed {
            None
        } else {
            Some(deny_reason(&flags).to_string())
        };

        SecurityAssessment {
            risk_score: score,
            flags,
            requires_review,
            allowed,
            reason,
        }
    }

    async fn record_assessment(
        &self,
        ctx: &WithdrawalContext,
        assessment: &SecurityAssessment,
    ) -> Result<()> {
        self.store
            .append_event(SecurityEvent {
                id: Uuid::new_v4(),
                user_id: ctx.user_id,
                event_type: SecurityEventType::Assessment,
                ip: Some(ctx.ip.clone()),
                user_agent: Some(ctx.user_agent.clone()),
                risk_score: Some(assessment.risk_score),
                flags: assessment.flags.clone(),
                metadata: json!({
                    "amount_cents": ctx.amount_cents,
                    "currency": ctx.currency.code(),
                    "payout_method_id": ctx.payout_method_id,
                    "urgent": ctx.urgent,
                    "allowed": assessment.allowed,
                    "requires_review": assessment.requires_review,
                }),
                recorded_at: Utc::now(),
            })
            .await
    }

    /// Record the final outcome of the withdrawal the caller executed
    pub async fn record_outcome(
        &self,
        ctx: &WithdrawalContext,
        assessment: &SecurityAssessment,
        success: bool,
    ) -> Result<()> {
        let event_type = if success {
            SecurityEventType::Success
        } else {
            SecurityEventType::Failure
        };

        self.store
            .append_event(SecurityEvent {
                id: Uuid::new_v4(),
                user_id: ctx.user_id,
                event_type,
                ip: Some(ctx.ip.clone()),
                user_agent: Some(ctx.user_agent.clone()),
                risk_score: Some(assessment.risk_score),
                flags: assessment.flags.clone(),
                metadata: json!({
                    "amount_cents": ctx.amount_cents,
                    "currency": ctx.currency.code(),
                    "payout_method_id": ctx.payout_method_id,
                    "urgent": ctx.urgent,
                }),
                recorded_at: Utc::now(),
            })
            .await
    }
}

/// Human-readable denial reason, highest-priority flag first
fn deny_reason(flags: &[RiskFlag]) -> &'static str {
    const PRIORITY: [(RiskFlag, &str); 5] = [
        (RiskFlag::BlockedUser, REASON_BLOCKED),
        (RiskFlag::AccountCompromised, REASON_COMPROMISED),
        (RiskFlag::IdentityNotVerified, REASON_IDENTITY),
        (RiskFlag::HourlyRateLimitExceeded, REASON_HOURLY),
        (RiskFlag::DailyRateLimitExceeded, REASON_DAILY),
    ];

    PRIORITY
        .iter()
        .find(|(flag, _)| flags.contains(flag))
        .map(|(_, reason)| *reason)
        .unwrap_or(GENERIC_DENIAL_REASON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use escrow_core::Currency;

    fn assessor() -> WithdrawalRiskAssessor {
        WithdrawalRiskAssessor::new(Arc::new(MemoryStore::new()))
    }

    fn ctx(amount_cents: i64) -> WithdrawalContext {
        WithdrawalContext {
            user_id: Uuid::new_v4(),
            amount_cents,
            currency: Currency::Usd,
            payout_method_id: Uuid::new_v4(),
            ip: "203.0.113.7".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            urgent: false,
        }
    }

    #[test]
    fn test_verdict_review_thresholds() {
        let assessor = assessor();

        let low = assessor.verdict(&ctx(10_000), CheckReport::single(49, RiskFlag::NewAccount));
        assert!(!low.requires_review);
        assert!(low.allowed);

        let scored = assessor.verdict(&ctx(10_000), CheckReport::single(50, RiskFlag::IdentityNotVerified));
        assert!(scored.requires_review);
        assert!(scored.allowed);

        // Large amounts force review even with a clean score
        let large = assessor.verdict(&ctx(100_001), CheckReport::new());
        assert!(large.requires_review);
        assert!(large.allowed);

        let at_threshold = assessor.verdict(&ctx(100_000), CheckReport::new());
        assert!(!at_threshold.requires_review);
    }

    #[test]
    fn test_verdict_deny_on_score() {
        let assessor = assessor();

        let denied = assessor.verdict(&ctx(10_000), CheckReport::single(100, RiskFlag::HighAmount));
        assert!(!denied.allowed);
        assert_eq!(denied.reason.as_deref(), Some(GENERIC_DENIAL_REASON));

        let allowed = assessor.verdict(&ctx(10_000), CheckReport::single(99, RiskFlag::HighAmount));
        assert!(allowed.allowed);
        assert!(allowed.reason.is_none());
    }

    #[test]
    fn test_verdict_blocked_flag_denies_any_score() {
        let assessor = assessor();

        let denied = assessor.verdict(&ctx(10_000), CheckReport::single(0, RiskFlag::BlockedUser));
        assert!(!denied.allowed);
        assert_eq!(denied.reason.as_deref(), Some(REASON_BLOCKED));
    }

    #[test]
    fn test_verdict_critical_risk_forces_review_only() {
        let assessor = assessor();

        let result = assessor.verdict(&ctx(10_000), CheckReport::single(0, RiskFlag::CriticalRisk));
        assert!(result.requires_review);
        assert!(result.allowed);
    }

    #[test]
    fn test_deny_reason_priority() {
        let flags = vec![
            RiskFlag::DailyRateLimitExceeded,
            RiskFlag::IdentityNotVerified,
            RiskFlag::AccountCompromised,
        ];
        assert_eq!(deny_reason(&flags), REASON_COMPROMISED);

        let flags = vec![RiskFlag::HourlyRateLimitExceeded, RiskFlag::DailyRateLimitExceeded];
        assert_eq!(deny_reason(&flags), REASON_HOURLY);

        assert_eq!(deny_reason(&[RiskFlag::HighAmount]), GENERIC_DENIAL_REASON);
    }
}
