//! Payout method security check

use crate::config::RiskConfig;
use crate::store::{PayoutMethodKind, RiskStore};
use crate::types::{CheckReport, RiskFlag, WithdrawalContext};
use crate::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::warn;

/// Score the destination payout method's age, verification and type
pub async fn evaluate(
    store: &dyn RiskStore,
    config: &RiskConfig,
    ctx: &WithdrawalContext,
    now: DateTime<Utc>,
) -> CheckReport {
    match run(store, config, ctx, now).await {
        Ok(report) => report,
        Err(err) => {
            warn!("Payout method check failed for {}: {}", ctx.user_id, err);
            CheckReport::single(25, RiskFlag::PayoutMethodCheckError)
        }
    }
}

async fn run(
    store: &dyn RiskStore,
    config: &RiskConfig,
    ctx: &WithdrawalContext,
    now: DateTime<Utc>,
) -> Result<CheckReport> {
    let method = match store.payout_method(ctx.user_id, ctx.payout_method_id).await? {
        Some(method) => method,
        None => return Ok(CheckReport::single(50, RiskFlag::InvalidPayoutMethod)),
    };

    let mut report = CheckReport::new();

    if now - method.added_at < Duration::hours(config.new_method_hours) {
        report.add(35, RiskFlag::NewPayoutMethod);
    }

    if !method.verified {
        report.add(40, RiskFlag::UnverifiedPayoutMethod);
    }

    if method.kind == PayoutMethodKind::DebitCard {
        report.add(10, RiskFlag::DebitCardPayout);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::store::PayoutMethod;
    use escrow_core::Currency;
    use uuid::Uuid;

    fn ctx(user_id: Uuid, method_id: Uuid) -> WithdrawalContext {
        WithdrawalContext {
            user_id,
            amount_cents: 10_000,
            currency: Currency::Usd,
            payout_method_id: method_id,
            ip: "203.0.113.7".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            urgent: false,
        }
    }

    fn method(user_id: Uuid, kind: PayoutMethodKind, verified: bool, age_hours: i64) -> PayoutMethod {
        PayoutMethod {
            id: Uuid::new_v4(),
            user_id,
            kind,
            verified,
            added_at: Utc::now() - Duration::hours(age_hours),
        }
    }

    #[tokio::test]
    async fn test_established_verified_bank_account_is_clean() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let bank = method(user_id, PayoutMethodKind::BankAccount, true, 200);
        let method_id = bank.id;
        store.add_payout_method(bank);

        let report = evaluate(&store, &RiskConfig::default(), &ctx(user_id, method_id), Utc::now()).await;

        assert_eq!(report, CheckReport::new());
    }

    #[tokio::test]
    async fn test_method_age_boundary() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let config = RiskConfig::default();

        let fresh = method(user_id, PayoutMethodKind::BankAccount, true, 71);
        let fresh_id = fresh.id;
        store.add_payout_method(fresh);
        let report = evaluate(&store, &config, &ctx(user_id, fresh_id), Utc::now()).await;
        assert_eq!(report, CheckReport::single(35, RiskFlag::NewPayoutMethod));

        let seasoned = method(user_id, PayoutMethodKind::BankAccount, true, 73);
        let seasoned_id = seasoned.id;
        store.add_payout_method(seasoned);
        let report = evaluate(&store, &config, &ctx(user_id, seasoned_id), Utc::now()).await;
        assert_eq!(report, CheckReport::new());
    }

    #[tokio::test]
    async fn test_unverified_debit_card() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let card = method(user_id, PayoutMethodKind::DebitCard, false, 200);
        let card_id = card.id;
        store.add_payout_method(card);

        let report = evaluate(&store, &RiskConfig::default(), &ctx(user_id, card_id), Utc::now()).await;

        assert_eq!(report.score, 50);
        assert!(report.flags.contains(&RiskFlag::UnverifiedPayoutMethod));
        assert!(report.flags.contains(&RiskFlag::DebitCardPayout));
    }

    #[tokio::test]
    async fn test_unknown_method_short_circuits() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();

        let report = evaluate(&store, &RiskConfig::default(), &ctx(user_id, Uuid::new_v4()), Utc::now()).await;

        assert_eq!(report, CheckReport::single(50, RiskFlag::InvalidPayoutMethod));
    }

    #[tokio::test]
    async fn test_other_users_method_short_circuits() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let requester = Uuid::new_v4();
        // Brand-new unverified card, but owned by someone else: none of its
        // attributes are scored for the requester
        let card = method(owner, PayoutMethodKind::DebitCard, false, 1);
        let card_id = card.id;
        store.add_payout_method(card);

        let report = evaluate(&store, &RiskConfig::default(), &ctx(requester, card_id), Utc::now()).await;

        assert_eq!(report, CheckReport::single(50, RiskFlag::InvalidPayoutMethod));
    }

    #[tokio::test]
    async fn test_lookup_failure_degrades() {
        let store = MemoryStore::new();
        store.fail_reads(true);

        let report = evaluate(&store, &RiskConfig::default(), &ctx(Uuid::new_v4(), Uuid::new_v4()), Utc::now()).await;

        assert_eq!(report, CheckReport::single(25, RiskFlag::PayoutMethodCheckError));
    }
}
