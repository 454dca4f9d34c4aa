use crate::collectors::zpool_status::{parse_capacity, parse_health, parse_pool_names, parse_status};
use crate::error::{PoolError, Result};
use crate::models::pool::PoolStatus;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Something that can run `zpool <args>` and hand back what it printed.
pub trait ZpoolRunner {
    /// Returns stdout and stderr together. A non-zero exit is not an error;
    /// only failing to start the tool is.
    fn run(&self, args: &[&str]) -> Result<String>;
}

/// Runs the real `zpool` binary.
#[derive(Debug, Clone)]
pub struct ZpoolCli {
    binary: PathBuf,
}

impl ZpoolCli {
    /// Use `explicit` if given, otherwise search `PATH` for `zpool`.
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        let binary = match explicit {
            Some(p) => p.to_path_buf(),
            None    => which::which("zpool")
                .map_err(|e| PoolError::LaunchFailure(format!("zpool not found in PATH: {}", e)))?,
        };
        debug!(binary = %binary.display(), "using zpool binary");
        Ok(Self { binary })
    }

    pub fn binary(&self) -> &Path { &self.binary }
}

impl ZpoolRunner for ZpoolCli {
    fn run(&self, args: &[&str]) -> Result<String> {
        debug!(binary = %self.binary.display(), ?args, "running zpool");
        let out = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| PoolError::LaunchFailure(format!("{}: {}", self.binary.display(), e)))?;

        debug!(status = %out.status, "zpool exited");
        let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&out.stderr));
        Ok(text)
    }
}

/// Query `zpool status`, health and capacity for `pool`, in that order.
/// Stops at the first step that fails.
pub fn get_status<R: ZpoolRunner + ?Sized>(runner: &R, pool: &str) -> Result<PoolStatus> {
    let mut status = PoolStatus::new(pool);

    let output = runner.run(&["status", pool])?;
    parse_status(&mut status, &output)?;

    let output = runner.run(&["list", "-H", "-o", "health", pool])?;
    status.healthy = parse_health(pool, &output)?;

    let output = runner.run(&["list", "-H", "-o", "cap", pool])?;
    status.capacity_pct = parse_capacity(pool, &output)?;

    debug!(pool, healthy = status.healthy, capacity = status.capacity_pct, "pool status complete");
    Ok(status)
}

/// Fails with [`PoolError::PoolNotFound`] when zpool says the pool does not exist.
pub fn check_existence<R: ZpoolRunner + ?Sized>(runner: &R, pool: &str) -> Result<()> {
    let output = runner.run(&["list", pool])?;
    if output.contains("no such pool") {
        return Err(PoolError::PoolNotFound(pool.to_string()));
    }
    Ok(())
}

/// Every imported pool.
pub fn list_pools<R: ZpoolRunner + ?Sized>(runner: &R) -> Result<Vec<String>> {
    let output = runner.run(&["list", "-H", "-o", "name"])?;
    Ok(parse_pool_names(&output))
}
