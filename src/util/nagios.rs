//! One-line output and exit codes for Nagios-compatible schedulers.

use crate::alerts::{Alert, Severity};
use crate::config::Thresholds;
use crate::error::PoolFailure;
use crate::models::pool::PoolStatus;
use std::fmt::Display;

/// Ordered by how loudly the scheduler should complain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckLevel {
    Ok,
    Warning,
    Unknown,
    Critical,
}

impl CheckLevel {
    pub fn label(&self) -> &'static str {
        match self {
            CheckLevel::Ok       => "OK",
            CheckLevel::Warning  => "WARNING",
            CheckLevel::Unknown  => "UNKNOWN",
            CheckLevel::Critical => "CRITICAL",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CheckLevel::Ok       => 0,
            CheckLevel::Warning  => 1,
            CheckLevel::Critical => 2,
            CheckLevel::Unknown  => 3,
        }
    }
}

/// A pool we could not read is UNKNOWN, never OK. CRITICAL still wins.
pub fn level(alerts: &[Alert], failures: &[PoolFailure]) -> CheckLevel {
    let from_alerts = alerts.iter()
        .map(|a| match a.severity {
            Severity::Critical => CheckLevel::Critical,
            Severity::Warning  => CheckLevel::Warning,
        })
        .max()
        .unwrap_or(CheckLevel::Ok);
    if failures.is_empty() {
        from_alerts
    } else {
        from_alerts.max(CheckLevel::Unknown)
    }
}

/// `ZPOOL <LEVEL> - <summary> | <perfdata>`
pub fn status_line(
    pools:    &[PoolStatus],
    failures: &[PoolFailure],
    alerts:   &[Alert],
    thr:      &Thresholds,
) -> (CheckLevel, String) {
    // nothing checked is not the same as nothing wrong
    let lvl = if pools.is_empty() && failures.is_empty() {
        CheckLevel::Unknown
    } else {
        level(alerts, failures)
    };

    let mut parts: Vec<String> = Vec::new();
    if lvl == CheckLevel::Ok {
        parts.extend(pools.iter().map(|p| format!(
            "{} {} {}% ({} online, {} faulted)",
            p.name(), p.overall_state, p.capacity_pct, p.online_devices, p.faulted_devices
        )));
    } else {
        parts.extend(alerts.iter().map(|a| format!("{}{}", a.prefix(), a.message)));
        parts.extend(failures.iter().map(|f| format!("[{}] {}", f.pool, f.error)));
    }
    let summary = if parts.is_empty() { "no pools found".to_string() } else { parts.join(", ") };

    let perf: Vec<String> = pools.iter().map(|p| format!(
        "{n}_capacity={}%;{};{};0;100 {n}_online={} {n}_faulted={}",
        p.capacity_pct, thr.capacity_warn_pct, thr.capacity_crit_pct,
        p.online_devices, p.faulted_devices,
        n = p.name(),
    )).collect();

    let line = if perf.is_empty() {
        format!("ZPOOL {} - {}", lvl.label(), summary)
    } else {
        format!("ZPOOL {} - {} | {}", lvl.label(), summary, perf.join(" "))
    };
    (lvl, line)
}

/// Status line for a check that could not even start (bad config, no zpool).
pub fn unknown_line(reason: impl Display) -> (CheckLevel, String) {
    (CheckLevel::Unknown, format!("ZPOOL {} - {}", CheckLevel::Unknown.label(), reason))
}
