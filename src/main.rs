mod alerts;
mod collectors;
mod config;
mod error;
mod logging;
mod models;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use collectors::zpool::{self, ZpoolCli, ZpoolRunner};
use config::Config;
use error::PoolFailure;
use models::pool::PoolStatus;
use serde_json::{json, Value};
use std::fmt::Display;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "zpool-health", about = "Single-shot ZFS pool health check", version)]
struct Cli {
    /// Pools to check. Defaults to [pools] names from the config, then to every imported pool
    pools: Vec<String>,

    /// Print a JSON snapshot of the checked pools and exit
    #[arg(long, conflicts_with_all = ["check", "config"])]
    json: bool,

    /// Monitoring-plugin mode: one status line, exit 0=OK, 1=WARNING, 2=CRITICAL, 3=UNKNOWN
    #[arg(long, conflicts_with = "config")]
    check: bool,

    /// Print config file path and current values, then exit
    #[arg(long)]
    config: bool,

    /// Path to the zpool binary (default: search PATH)
    #[arg(long, value_name = "PATH")]
    zpool: Option<PathBuf>,

    /// Capacity warning threshold in percent
    #[arg(long, value_name = "PCT")]
    warn: Option<u32>,

    /// Capacity critical threshold in percent
    #[arg(long, value_name = "PCT")]
    crit: Option<u32>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    config_file: Option<PathBuf>,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (cfg, load_err) = match resolve_config(&cli) {
        Ok(r)  => r,
        Err(e) if cli.check => exit_unknown(format!("{:#}", e)),
        Err(e) => return Err(e),
    };
    logging::init(&cfg.logging.level, cli.verbose);
    if let Some(e) = load_err {
        warn!(error = %format!("{:#}", e), "ignoring unreadable config, using defaults");
    }

    if cli.config {
        return run_print_config(&cfg);
    }

    let zpool_path = cli.zpool.as_deref().or(cfg.zpool_path());
    let runner = match ZpoolCli::locate(zpool_path) {
        Ok(r)  => r,
        Err(e) if cli.check => exit_unknown(e),
        Err(e) => return Err(e.into()),
    };
    info!(binary = %runner.binary().display(), "zpool located");

    let names = match pool_names(&runner, &cli.pools, &cfg) {
        Ok(n)  => n,
        Err(e) if cli.check => exit_unknown(e),
        Err(e) => return Err(e.into()),
    };

    let (pools, failures) = collect(&runner, &names);
    let active_alerts = alerts::evaluate_with_partials(&pools, &failures, &cfg.thresholds);

    if cli.check {
        let (level, line) = util::nagios::status_line(&pools, &failures, &active_alerts, &cfg.thresholds);
        println!("{}", line);
        std::process::exit(level.exit_code());
    }

    if cli.json {
        let now = chrono::Local::now().to_rfc3339();
        println!("{}", serde_json::to_string_pretty(&snapshot(&pools, &failures, &active_alerts, &now))?);
    } else {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        print!("{}", util::report::generate(&pools, &failures, &active_alerts, &now));
    }

    if !failures.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn exit_unknown(reason: impl Display) -> ! {
    let (level, line) = util::nagios::unknown_line(reason);
    println!("{}", line);
    std::process::exit(level.exit_code());
}

/// Config file plus command-line threshold overrides, validated. The second
/// value is a load error from the default config path that was ignored.
fn resolve_config(cli: &Cli) -> Result<(Config, Option<anyhow::Error>)> {
    let (mut cfg, load_err) = match &cli.config_file {
        Some(path) => (Config::load_from(path)?, None),
        None => match Config::load() {
            Ok(c)  => (c, None),
            Err(e) => (Config::default(), Some(e)),
        },
    };

    if let Some(w) = cli.warn { cfg.thresholds.capacity_warn_pct = w; }
    if let Some(c) = cli.crit { cfg.thresholds.capacity_crit_pct = c; }
    cfg.validate().context("invalid capacity thresholds")?;
    Ok((cfg, load_err))
}

/// Command line first, then the config file, then whatever zpool reports.
fn pool_names<R: ZpoolRunner + ?Sized>(runner: &R, requested: &[String], cfg: &Config) -> error::Result<Vec<String>> {
    if !requested.is_empty() {
        return Ok(requested.to_vec());
    }
    if !cfg.pools.names.is_empty() {
        return Ok(cfg.pools.names.clone());
    }
    zpool::list_pools(runner)
}

/// Check each pool in turn: existence first, then the full status read.
fn collect<R: ZpoolRunner + ?Sized>(runner: &R, names: &[String]) -> (Vec<PoolStatus>, Vec<PoolFailure>) {
    let mut pools    = Vec::new();
    let mut failures = Vec::new();

    for name in names {
        let result = zpool::check_existence(runner, name)
            .and_then(|()| zpool::get_status(runner, name));
        match result {
            Ok(status) => pools.push(status),
            Err(error) => {
                warn!(pool = %name, kind = error.label(), %error, "pool health unknown");
                failures.push(PoolFailure { pool: name.clone(), error });
            }
        }
    }

    (pools, failures)
}

fn snapshot(pools: &[PoolStatus], failures: &[PoolFailure], active: &[alerts::Alert], now: &str) -> Value {
    let errors: Vec<Value> = failures.iter().map(|f| json!({
        "pool":    f.pool,
        "kind":    f.error.label(),
        "message": f.error.to_string(),
        "partial": f.partial(),
    })).collect();

    let alerts_out: Vec<Value> = active.iter().map(|a| json!({
        "severity": a.severity.label(),
        "pool":     a.pool,
        "message":  a.message,
    })).collect();

    json!({
        "version":   env!("CARGO_PKG_VERSION"),
        "timestamp": now,
        "pools":     pools,
        "alerts":    alerts_out,
        "errors":    errors,
    })
}

fn run_print_config(cfg: &Config) -> Result<()> {
    let path = Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    let zpool_path = match cfg.zpool_path() {
        Some(p) => p.display().to_string(),
        None    => "(search PATH)".to_string(),
    };
    println!("Config: {}", path);
    println!();
    println!("[general]");
    println!("  zpool_path        = {}", zpool_path);
    println!();
    println!("[thresholds]");
    println!("  capacity_warn_pct = {}%", cfg.thresholds.capacity_warn_pct);
    println!("  capacity_crit_pct = {}%", cfg.thresholds.capacity_crit_pct);
    println!();
    println!("[pools]");
    if cfg.pools.names.is_empty() {
        println!("  names = (all imported pools)");
    } else {
        println!("  names = {:?}", cfg.pools.names);
    }
    println!();
    println!("[logging]");
    println!("  level = {}", cfg.logging.level);
    Ok(())
}
