//! Account security check

use crate::config::RiskConfig;
use crate::store::{IdentityStatus, RiskStore};
use crate::types::{CheckReport, RiskFlag, WithdrawalContext};
use crate::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::warn;

/// Score account age, identity verification, KYC risk and recent failures
pub async fn evaluate(
    store: &dyn RiskStore,
    config: &RiskConfig,
    ctx: &WithdrawalContext,
    now: DateTime<Utc>,
) -> CheckReport {
    match run(store, config, ctx, now).await {
        Ok(report) => report,
        Err(err) => {
            warn!("Account check failed for {}: {}", ctx.user_id, err);
            CheckReport::single(30, RiskFlag::AccountCheckError)
        }
    }
}

async fn run(
    store: &dyn RiskStore,
    config: &RiskConfig,
    ctx: &WithdrawalContext,
    now: DateTime<Utc>,
) -> Result<CheckReport> {
    let profile = match store.profile(ctx.user_id).await? {
        Some(profile) => profile,
        None => return Ok(CheckReport::single(50, RiskFlag::ProfileNotFound)),
    };

    let mut report = CheckReport::new();

    if now - profile.created_at < Duration::days(config.new_account_days) {
        report.add(30, RiskFlag::NewAccount);
    }

    if profile.identity_status != IdentityStatus::Verified {
        report.add(50, RiskFlag::IdentityNotVerified);
    }

    if profile.kyc_risk_score > config.kyc_risk_threshold {
        report.add(25, RiskFlag::HighKycRisk);
    }

    let window_start = now - Duration::hours(config.failure_window_hours);
    let failures = store.failure_count_since(ctx.user_id, window_start).await?;
    if failures >= config.failure_threshold {
        report.add(40, RiskFlag::MultipleRecentFailures);
    }

    Ok(report)
}
