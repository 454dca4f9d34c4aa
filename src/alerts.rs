use crate::config::Thresholds;
use crate::error::PoolFailure;
use crate::models::pool::{HealthKeyword, PoolStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Warning  => "WARN",
            Severity::Critical => "CRIT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub severity: Severity,
    pub pool:     String,
    pub message:  String,
}

impl Alert {
    fn new(severity: Severity, pool: &str, message: impl Into<String>) -> Self {
        Self { severity, pool: pool.to_string(), message: message.into() }
    }

    pub fn prefix(&self) -> String {
        format!("[{}] ", self.pool)
    }
}

/// Evaluate all alert conditions for the given pools.
/// Returns a freshly built list sorted Critical → Warning.
pub fn evaluate(pools: &[PoolStatus], thr: &Thresholds) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = Vec::new();

    for pool in pools {
        let name = pool.name();

        // ── Pool state ───────────────────────────────────────────────
        match pool.state() {
            Some(kw @ HealthKeyword::Faulted) => alerts.push(Alert::new(
                Severity::Critical, name, format!("pool state is {}", kw.label()))),
            Some(kw @ HealthKeyword::Degraded) => alerts.push(Alert::new(
                Severity::Warning, name, format!("pool state is {}", kw.label()))),
            Some(HealthKeyword::Online) => {}
            None => alerts.push(Alert::new(
                Severity::Critical, name,
                format!("unrecognized pool state {:?}", pool.overall_state))),
        }

        // ── Devices ──────────────────────────────────────────────────
        if pool.faulted_devices > 0 {
            alerts.push(Alert::new(
                Severity::Critical, name,
                format!("{} faulted or unavailable device(s), {} online",
                    pool.faulted_devices, pool.online_devices)));
        }

        // ── Capacity (config-driven) ─────────────────────────────────
        if pool.capacity_pct >= thr.capacity_crit_pct {
            alerts.push(Alert::new(
                Severity::Critical, name,
                format!("capacity {}% ≥ critical threshold {}%", pool.capacity_pct, thr.capacity_crit_pct)));
        } else if pool.capacity_pct >= thr.capacity_warn_pct {
            alerts.push(Alert::new(
                Severity::Warning, name,
                format!("capacity {}% ≥ warning threshold {}%", pool.capacity_pct, thr.capacity_warn_pct)));
        }

        // health and status come from two different zpool calls
        if pool.health_disagrees() {
            alerts.push(Alert::new(
                Severity::Warning, name,
                format!("health and status disagree (health {}, state {})",
                    if pool.healthy { "ONLINE" } else { "not ONLINE" },
                    pool.overall_state)));
        }
    }

    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));
    alerts
}

/// Like [`evaluate`], but pools whose state was unrecognized are judged on
/// their partial status too, so an unknown state is treated as unhealthy.
pub fn evaluate_with_partials(pools: &[PoolStatus], failures: &[PoolFailure], thr: &Thresholds) -> Vec<Alert> {
    let mut all: Vec<PoolStatus> = pools.to_vec();
    all.extend(failures.iter().filter_map(PoolFailure::partial).cloned());
    evaluate(&all, thr)
}
