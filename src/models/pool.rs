use serde::Serialize;

/// The three keywords zpool uses for pool health and pool state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthKeyword {
    Online,
    Degraded,
    Faulted,
}

impl HealthKeyword {
    /// Exact, case-sensitive match. No trimming happens here.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "ONLINE"   => Some(HealthKeyword::Online),
            "DEGRADED" => Some(HealthKeyword::Degraded),
            "FAULTED"  => Some(HealthKeyword::Faulted),
            _          => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthKeyword::Online   => "ONLINE",
            HealthKeyword::Degraded => "DEGRADED",
            HealthKeyword::Faulted  => "FAULTED",
        }
    }
}

/// Structured health of one pool, built fresh for every check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolStatus {
    name:                String,
    pub capacity_pct:    u32,
    pub healthy:         bool,
    pub overall_state:   String,   // raw keyword from `zpool status`
    pub online_devices:  u32,
    pub faulted_devices: u32,
}

impl PoolStatus {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:            name.into(),
            capacity_pct:    0,
            healthy:         false,
            overall_state:   String::new(),
            online_devices:  0,
            faulted_devices: 0,
        }
    }

    pub fn name(&self) -> &str { &self.name }

    /// Recognized state keyword, if `overall_state` is one.
    pub fn state(&self) -> Option<HealthKeyword> {
        HealthKeyword::from_keyword(&self.overall_state)
    }

    /// True when the health query and the status report tell different stories.
    pub fn health_disagrees(&self) -> bool {
        self.healthy != (self.state() == Some(HealthKeyword::Online))
    }
}
