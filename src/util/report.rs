use crate::alerts::Alert;
use crate::error::PoolFailure;
use crate::models::pool::PoolStatus;

/// Generate a human-readable health report to a String.
pub fn generate(
    pools:    &[PoolStatus],
    failures: &[PoolFailure],
    alerts:   &[Alert],
    now:      &str,
) -> String {
    let mut out = String::new();

    out.push_str("═══════════════════════════════════════════════\n");
    out.push_str(&format!("  zpool-health report — {}\n", now));
    out.push_str("═══════════════════════════════════════════════\n\n");

    // ── Active alerts ──────────────────────────────────────────────────
    out.push_str(&format!("── Active Alerts ({}) ─────────────────────────\n", alerts.len()));
    if alerts.is_empty() && failures.is_empty() {
        out.push_str("  ● All pools nominal\n");
    } else {
        for a in alerts {
            out.push_str(&format!("  [{}]  {}{}\n", a.severity.label(), a.prefix(), a.message));
        }
    }
    out.push('\n');

    // ── Pools ──────────────────────────────────────────────────────────
    out.push_str(&format!("── Pools ({}) ─────────────────────────────────\n", pools.len()));
    out.push_str(&format!(
        "  {:<16} {:<10} {:<9} {:>5} {:>7} {:>8}\n",
        "Pool", "State", "Health", "Cap", "Online", "Faulted"
    ));
    out.push_str(&format!("  {}\n", "─".repeat(60)));
    for p in pools {
        out.push_str(&format!(
            "  {:<16} {:<10} {:<9} {:>4}% {:>7} {:>8}\n",
            p.name(),
            p.overall_state,
            if p.healthy { "healthy" } else { "unhealthy" },
            p.capacity_pct,
            p.online_devices,
            p.faulted_devices,
        ));
    }
    out.push('\n');

    // ── Unreadable pools ───────────────────────────────────────────────
    if !failures.is_empty() {
        out.push_str(&format!("── Health Unknown ({}) ────────────────────────\n", failures.len()));
        for f in failures {
            out.push_str(&format!("  {:<16} {}\n", f.pool, f.error));
        }
        out.push('\n');
    }

    out.push_str("═══════════════════════════════════════════════\n");
    out
}
