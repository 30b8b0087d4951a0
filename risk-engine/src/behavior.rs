//! Behavioral analysis over the security log

use crate::config::RiskConfig;
use crate::store::RiskStore;
use crate::types::{CheckReport, RiskFlag, WithdrawalContext};
use crate::Result;
use chrono::{DateTime, Duration, Local, Timelike, Utc};
use std::collections::HashSet;
use tracing::warn;

/// Score IP and device variety, unseen addresses and off-hours requests
pub async fn evaluate(
    store: &dyn RiskStore,
    config: &RiskConfig,
    ctx: &WithdrawalContext,
    now: DateTime<Utc>,
) -> CheckReport {
    match run(store, config, ctx, now).await {
        Ok(report) => report,
        Err(err) => {
            warn!("Behavior check failed for {}: {}", ctx.user_id, err);
            CheckReport::single(10, RiskFlag::BehaviorCheckError)
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

    let window_start = now - Duration::days(config.behavior_window_days);
    let events = store
        .security_events_since(ctx.user_id, window_start, config.behavior_event_cap)
        .await?;

    let ips: HashSet<&str> = events.iter().filter_map(|e| e.ip.as_deref()).collect();
    let agents: HashSet<&str> = events.iter().filter_map(|e| e.user_agent.as_deref()).collect();

    if ips.len() > config.ip_variety_limit {
        report.add(20, RiskFlag::MultipleIpAddresses);
    }

    if agents.len() > config.ua_variety_limit {
        report.add(15, RiskFlag::MultipleDevices);
    }

    if !ips.contains(ctx.ip.as_str()) {
        report.add(10, RiskFlag::NewIpAddress);
    }

    report.merge(timing_report(Local::now().hour(), config));

    Ok(report)
}

/// Off-hours scoring, split out so the hour is testable
fn timing_report(hour: u32, config: &RiskConfig) -> CheckReport {
    let mut report = CheckReport::new();
    if hour < config.quiet_hour_start || hour > config.quiet_hour_end {
        report.add(5, RiskFlag::UnusualTiming);
    }
    report
}
