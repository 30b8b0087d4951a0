//! Network and device checks
//!
//! Pure pattern matching on the request context; no store access.

use crate::types::{CheckReport, RiskFlag, WithdrawalContext};
use std::net::IpAddr;

/// Reputation lookup for the requesting address
///
/// The default implementation reports every address as clean; deployments
/// with a reputation feed plug in their own without touching the scoring
/// pipeline.
pub trait NetworkReputationChecker: Send + Sync {
    /// True when the address is a known VPN or proxy exit
    fn is_vpn_or_proxy(&self, ip: &str) -> bool;
}

/// Reputation checker that never flags anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReputation;

impl NetworkReputationChecker for NoopReputation {
    fn is_vpn_or_proxy(&self, _ip: &str) -> bool {
        false
    }
}

const AUTOMATION_MARKERS: [&str; 8] = [
    "bot", "crawler", "spider", "scraper", "curl", "wget", "python", "postman",
];

/// Score the request's network origin and client fingerprint
pub fn evaluate(ctx: &WithdrawalContext, reputation: &dyn NetworkReputationChecker) -> CheckReport {
    let mut report = CheckReport::new();

    if is_private_or_loopback(&ctx.ip) {
        report.add(30, RiskFlag::SuspiciousIp);
    }

    let agent = ctx.user_agent.to_lowercase();
    if AUTOMATION_MARKERS.iter().any(|marker| agent.contains(marker)) {
        report.add(20, RiskFlag::SuspiciousUserAgent);
    }

    if reputation.is_vpn_or_proxy(&ctx.ip) {
        report.add(15, RiskFlag::VpnOrProxy);
    }

    report
}

fn is_private_or_loopback(ip: &str) -> bool {
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_private() || v4.is_loopback(),
        Ok(IpAddr::V6(v6)) => v6.is_loopback(),
        Err(_) => false,
    }
}
