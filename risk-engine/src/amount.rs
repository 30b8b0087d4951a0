//! Amount and pattern analysis

use crate::config::RiskConfig;
use crate::store::{RiskStore, WithdrawalStatus};
use crate::types::{CheckReport, RiskFlag, WithdrawalContext};
use crate::Result;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::warn;

/// Classify the requested amount and compare it against recent history
pub async fn evaluate(
    store: &dyn RiskStore,
    config: &RiskConfig,
    ctx: &WithdrawalContext,
    now: DateTime<Utc>,
) -> CheckReport {
    match run(store, config, ctx, now).await {
        Ok(report) => report,
        Err(err) => {
            warn!("Amount check failed for {}: {}", ctx.user_id, err);
            CheckReport::single(15, RiskFlag::AmountCheckError)
        }
    }
}

async fn run(
    store: &dyn RiskStore,
    config: &RiskConfig,
    ctx: &WithdrawalContext,
    now: DateTime<Utc>,
) -> Result<CheckReport> {
    let mut report = CheckReport::new();

    if ctx.amount_cents >= config.high_amount_cents {
        report.add(30, RiskFlag::HighAmount);
    } else if ctx.amount_cents >= config.medium_amount_cents {
        report.add(15, RiskFlag::MediumAmount);
    }

    let window_start = now - Duration::days(config.pattern_window_days);
    let history = store.withdrawals_since(ctx.user_id, window_start).await?;

    if !history.is_empty() {
        let total: i64 = history.iter().map(|w| w.amount_cents).sum();
        let mean = Decimal::from(total) / Decimal::from(history.len() as i64);
        if Decimal::from(ctx.amount_cents) > mean * Decimal::from(config.spike_multiplier) {
            report.add(20, RiskFlag::UnusualAmountPattern);
        }
    }

    let active = history
        .iter()
        .filter(|w| matches!(w.status, WithdrawalStatus::Paid | WithdrawalStatus::Processing))
        .count();
    if active >= config.rapid_count {
        report.add(25, RiskFlag::RapidWithdrawalPattern);
    }

    Ok(report)
}
