use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub pools: PoolsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Path to the zpool binary. Empty = search PATH.
    pub zpool_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Warn when pool capacity reaches this percentage.
    pub capacity_warn_pct: u32,
    /// Critical when pool capacity reaches this percentage.
    pub capacity_crit_pct: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolsConfig {
    /// Pools checked when none are named on the command line. Empty = all imported pools.
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive used when RUST_LOG is unset: "error", "warn", "info", "debug", "trace"
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for Thresholds {
    fn default() -> Self {
        Self { capacity_warn_pct: 80, capacity_crit_pct: 90 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".into() }
    }
}

// ── Load ──────────────────────────────────────────────────────────────

impl Config {
    /// Load from the default location. A missing file means defaults.
    pub fn load() -> Result<Self> {
        match Config::config_path() {
            Some(path) if path.exists() => Config::load_from(&path),
            _ => Ok(Config::default()),
        }
    }

    /// Load from an explicit path. Any problem is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let cfg: Config = toml::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("zpool-health").join("zpool-health.toml"))
    }

    /// The configured zpool binary, if one was set.
    pub fn zpool_path(&self) -> Option<&Path> {
        let p = self.general.zpool_path.trim();
        if p.is_empty() { None } else { Some(Path::new(p)) }
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if t.capacity_crit_pct > 100 || t.capacity_warn_pct > 100 {
            anyhow::bail!("capacity thresholds must be between 0 and 100");
        }
        if t.capacity_warn_pct > t.capacity_crit_pct {
            anyhow::bail!(
                "capacity_warn_pct ({}) is above capacity_crit_pct ({})",
                t.capacity_warn_pct, t.capacity_crit_pct
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(text.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.thresholds.capacity_warn_pct, 80);
        assert_eq!(cfg.thresholds.capacity_crit_pct, 90);
        assert_eq!(cfg.logging.level, "warn");
        assert!(cfg.pools.names.is_empty());
        assert!(cfg.zpool_path().is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let f = write_config("[thresholds]\ncapacity_warn_pct = 70\n\n[pools]\nnames = [\"tank\"]\n");
        let cfg = Config::load_from(f.path()).unwrap();
        assert_eq!(cfg.thresholds.capacity_warn_pct, 70);
        assert_eq!(cfg.thresholds.capacity_crit_pct, 90);
        assert_eq!(cfg.pools.names, vec!["tank"]);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn zpool_path_from_file() {
        let f = write_config("[general]\nzpool_path = \"/sbin/zpool\"\n");
        let cfg = Config::load_from(f.path()).unwrap();
        assert_eq!(cfg.zpool_path(), Some(Path::new("/sbin/zpool")));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let f = write_config("[thresholds\ncapacity_warn_pct = ");
        assert!(Config::load_from(f.path()).is_err());
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let f = write_config("[thresholds]\ncapacity_warn_pct = 95\ncapacity_crit_pct = 90\n");
        let err = Config::load_from(f.path()).unwrap_err();
        assert!(err.to_string().contains("capacity_warn_pct"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(text.contains("capacity_crit_pct = 90"));
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.logging.level, "warn");
    }
}
