//! Withdrawal velocity limits

use crate::config::RiskConfig;
use crate::store::RiskStore;
use crate::types::{CheckReport, RiskFlag, WithdrawalContext};
use crate::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::warn;

/// Score hourly and daily withdrawal counts against the rate limits
pub async fn evaluate(
    store: &dyn RiskStore,
    config: &RiskConfig,
    ctx: &WithdrawalContext,
    now: DateTime<Utc>,
) -> CheckReport {
    match run(store, config, ctx, now).await {
        Ok(report) => report,
        Err(err) => {
            warn!("Rate limit check failed for {}: {}", ctx.user_id, err);
            CheckReport::single(20, RiskFlag::RateLimitCheckError)
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

    let hourly_start = now - Duration::minutes(config.hourly_window_minutes);
    let hourly = store.withdrawals_since(ctx.user_id, hourly_start).await?;
    if hourly.len() >= config.hourly_limit {
        report.add(50, RiskFlag::HourlyRateLimitExceeded);
    }

    let daily_start = now - Duration::hours(config.daily_window_hours);
    let daily = store.withdrawals_since(ctx.user_id, daily_start).await?;
    if daily.len() >= config.daily_limit {
        report.add(40, RiskFlag::DailyRateLimitExceeded);
    }

    Ok(report)
}
