//! Parsers for the text zpool prints.
//!
//! zpool output is meant for humans, so everything here is positional and
//! substring based. All of those assumptions are kept in this file.

use crate::error::{PoolError, Result};
use crate::models::pool::{HealthKeyword, PoolStatus};
use tracing::{debug, warn};

/// Line prefixes that name virtual device groups rather than disks.
const VDEV_GROUP_PREFIXES: &[&str] = &[
    "mirror-", "raid0-", "raid10-", "raidz-", "raidz2-", "raidz3-",
];

const STATE_LABEL: &str = "state:";

/// What a single line of `zpool status` describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Pool header, state line, or a vdev group: not a physical device.
    Topology,
    DeviceOnline,
    DeviceFaulted,
    Other,
}

/// Classify one line of `zpool status` output for pool `pool`.
pub fn classify_line(line: &str, pool: &str) -> LineKind {
    let topology = (!pool.is_empty() && line.contains(pool))
        || line.contains(STATE_LABEL)
        || VDEV_GROUP_PREFIXES.iter().any(|p| line.contains(p));
    if topology {
        return LineKind::Topology;
    }
    if line.contains("FAULTED") || line.contains("UNAVAIL") {
        LineKind::DeviceFaulted
    } else if line.contains("ONLINE") {
        LineKind::DeviceOnline
    } else {
        LineKind::Other
    }
}

/// Pull the state keyword out of the `state: <STATE>` line, which zpool
/// always prints second. Returns "" if that line is missing or has no token
/// after the label.
pub fn state_keyword(output: &str) -> &str {
    let line = match output.lines().nth(1) {
        Some(l) => l,
        None    => return "",
    };
    let mut tokens = line.split_whitespace();
    match tokens.position(|t| t == STATE_LABEL) {
        Some(_) => tokens.next().unwrap_or(""),
        None    => "",
    }
}

/// Fill `status.overall_state` and the device counters from `zpool status`.
///
/// An unknown state still fills everything in, forces `faulted_devices` to 1
/// and hands the result back inside [`PoolError::StatusParse`].
pub fn parse_status(status: &mut PoolStatus, output: &str) -> Result<()> {
    status.overall_state = state_keyword(output).to_string();

    let mut online  = 0u32;
    let mut faulted = 0u32;
    for line in output.lines() {
        match classify_line(line, status.name()) {
            LineKind::DeviceFaulted => faulted += 1,
            LineKind::DeviceOnline  => online  += 1,
            LineKind::Topology | LineKind::Other => {}
        }
    }
    status.online_devices  = online;
    status.faulted_devices = faulted;
    debug!(pool = status.name(), state = %status.overall_state, online, faulted, "parsed zpool status");

    if status.state().is_none() {
        warn!(pool = status.name(), state = %status.overall_state,
              "unrecognized pool state, assuming a faulted device");
        status.faulted_devices = 1;
        return Err(PoolError::StatusParse {
            state:   status.overall_state.clone(),
            partial: Box::new(status.clone()),
        });
    }
    Ok(())
}

/// Classify the output of `zpool list -H -o health <pool>`.
pub fn parse_health(pool: &str, output: &str) -> Result<bool> {
    let line = output.strip_suffix('\n').unwrap_or(output);
    let line = line.strip_suffix('\r').unwrap_or(line);
    match HealthKeyword::from_keyword(line) {
        Some(kw) => Ok(kw == HealthKeyword::Online),
        None     => Err(PoolError::UnrecognizedHealthKeyword {
            pool:    pool.to_string(),
            keyword: line.to_string(),
        }),
    }
}

/// Parse the output of `zpool list -H -o cap <pool>` ("57%") into 0..=100.
pub fn parse_capacity(pool: &str, output: &str) -> Result<u32> {
    let digits = output.split('%').next().unwrap_or("").trim();
    match digits.parse::<u32>() {
        Ok(pct) if pct <= 100 => Ok(pct),
        _ => Err(PoolError::CapacityParse {
            pool: pool.to_string(),
            raw:  output.trim_end().to_string(),
        }),
    }
}

/// Pool names from `zpool list -H -o name`, in the order zpool printed them.
pub fn parse_pool_names(output: &str) -> Vec<String> {
    output.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REAL_STATUS: &str = "  pool: tank
 state: DEGRADED
status: One or more devices could not be used because the label is missing or
\tinvalid.  Sufficient replicas exist for the pool to continue
\tfunctioning in a degraded state.
action: Replace the device using 'zpool replace'.
  scan: scrub repaired 0B in 00:00:01 with 0 errors on Sun Feb  9 00:25:01 2026
config:

\tNAME        STATE     READ WRITE CKSUM
\ttank        DEGRADED     0     0     0
\t  mirror-0  DEGRADED     0     0     0
\t    sda     ONLINE       0     0     0
\t    sdb     UNAVAIL      0     0     0
\t  raidz2-1  ONLINE       0     0     0
\t    sdc     ONLINE       0     0     0
\t    sdd     ONLINE       0     0     0
\t    sde     FAULTED      0     0     0

errors: No known data errors
";

    #[test]
    fn vdev_groups_are_not_devices() {
        assert_eq!(classify_line("mirror-0  ONLINE", "tank"), LineKind::Topology);
        assert_eq!(classify_line("disk1  ONLINE", "tank"), LineKind::DeviceOnline);
        for prefix in VDEV_GROUP_PREFIXES {
            let line = format!("    {}3  FAULTED  0 0 0", prefix);
            assert_eq!(classify_line(&line, "tank"), LineKind::Topology, "{}", line);
        }
    }

    #[test]
    fn pool_name_and_state_lines_are_topology() {
        assert_eq!(classify_line("\ttank  ONLINE  0 0 0", "tank"), LineKind::Topology);
        assert_eq!(classify_line(" state: ONLINE", "tank"), LineKind::Topology);
    }

    #[test]
    fn unavail_counts_as_faulted_and_wins_over_online() {
        assert_eq!(classify_line("sdb UNAVAIL", "tank"), LineKind::DeviceFaulted);
        assert_eq!(classify_line("sdb FAULTED was ONLINE", "tank"), LineKind::DeviceFaulted);
        assert_eq!(classify_line("errors: No known data errors", "tank"), LineKind::Other);
    }

    #[test]
    fn empty_pool_name_does_not_hide_every_line() {
        assert_eq!(classify_line("disk1 ONLINE", ""), LineKind::DeviceOnline);
    }

    #[test]
    fn state_keyword_tolerates_indentation() {
        assert_eq!(state_keyword("pool: tank\n state: ONLINE\n"), "ONLINE");
        assert_eq!(state_keyword("pool: tank\n  state: FAULTED\n"), "FAULTED");
        assert_eq!(state_keyword("pool: tank\nstate:   DEGRADED"), "DEGRADED");
    }

    #[test]
    fn state_keyword_missing() {
        assert_eq!(state_keyword(""), "");
        assert_eq!(state_keyword("pool: tank"), "");
        assert_eq!(state_keyword("pool: tank\n state:"), "");
        assert_eq!(state_keyword("pool: tank\n  scan: none requested\n state: ONLINE"), "");
    }

    #[test]
    fn counts_devices_in_real_output() {
        let mut s = PoolStatus::new("tank");
        parse_status(&mut s, REAL_STATUS).unwrap();
        assert_eq!(s.overall_state, "DEGRADED");
        assert_eq!(s.online_devices, 3);
        assert_eq!(s.faulted_devices, 2);
    }

    #[test]
    fn minimal_status_report() {
        let mut s = PoolStatus::new("tank");
        parse_status(&mut s, "pool: tank\n  state: ONLINE\n  disk1  ONLINE\n  disk2  FAULTED\n").unwrap();
        assert_eq!(s.overall_state, "ONLINE");
        assert_eq!(s.online_devices, 1);
        assert_eq!(s.faulted_devices, 1);
    }

    #[test]
    fn unknown_state_forces_one_faulted_device() {
        let mut s = PoolStatus::new("tank");
        let out = "pool: tank\n state: SUSPENDED\n a ONLINE\n b ONLINE\n c FAULTED\n d UNAVAIL\n";
        let err = parse_status(&mut s, out).unwrap_err();
        match err {
            PoolError::StatusParse { state, partial } => {
                assert_eq!(state, "SUSPENDED");
                assert_eq!(partial.faulted_devices, 1);
                assert_eq!(partial.online_devices, 2);
                assert_eq!(partial.name(), "tank");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(s.faulted_devices, 1);
        assert_eq!(s.overall_state, "SUSPENDED");
    }

    #[test]
    fn garbage_status_is_a_parse_error() {
        let mut s = PoolStatus::new("tank");
        let err = parse_status(&mut s, "internal error: out of memory\n").unwrap_err();
        assert!(matches!(err, PoolError::StatusParse { .. }));
        assert_eq!(s.faulted_devices, 1);
    }

    #[test]
    fn health_keywords() {
        assert!(parse_health("tank", "ONLINE\n").unwrap());
        assert!(parse_health("tank", "ONLINE").unwrap());
        assert!(parse_health("tank", "ONLINE\r\n").unwrap());
        assert!(!parse_health("tank", "DEGRADED\n").unwrap());
        assert!(!parse_health("tank", "FAULTED\n").unwrap());
    }

    #[test]
    fn health_rejects_anything_else() {
        for bad in ["", "\n", "online\n", "ONLINE \n", "ONLINE\n\n", "ONLINEX\n", "OFFLINE\n"] {
            let err = parse_health("tank", bad).unwrap_err();
            assert!(matches!(err, PoolError::UnrecognizedHealthKeyword { .. }), "{:?}", bad);
        }
    }

    #[test]
    fn capacity_values() {
        assert_eq!(parse_capacity("tank", "42%").unwrap(), 42);
        assert_eq!(parse_capacity("tank", "0%").unwrap(), 0);
        assert_eq!(parse_capacity("tank", "57%\n").unwrap(), 57);
        assert_eq!(parse_capacity("tank", " 7%\n").unwrap(), 7);
    }

    #[test]
    fn capacity_hundred_does_not_overflow() {
        assert_eq!(parse_capacity("tank", "100%\n").unwrap(), 100);
        assert_eq!(parse_capacity("tank", "127%").unwrap_err().to_string(),
                   "could not parse capacity \"127%\" for pool tank");
    }

    #[test]
    fn capacity_rejects_non_numeric() {
        for bad in ["abc%", "%", "", "-", "-5%", "4.5%", "cannot open 'x': no such pool\n"] {
            assert!(matches!(parse_capacity("tank", bad), Err(PoolError::CapacityParse { .. })), "{:?}", bad);
        }
    }

    #[test]
    fn pool_names_skip_blank_lines() {
        assert_eq!(parse_pool_names("tank\nbackup\n\n  scratch \n"), vec!["tank", "backup", "scratch"]);
        assert!(parse_pool_names("").is_empty());
    }
}
