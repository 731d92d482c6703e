use serde::{Deserialize, Serialize};

pub const DEFAULT_DB_PATH: &str = "ucship.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_ACTIVE_PLAN_YEAR: &str = "2025-26";
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// SQLite database file. Every request opens its own connection to it.
    pub db_path: String,
    pub bind_addr: String,
    /// Plan year whose term bounds `/oop_total` when the caller names none.
    pub active_plan_year: String,
    pub busy_timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            active_plan_year: DEFAULT_ACTIVE_PLAN_YEAR.to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl ServiceConfig {
    /// Defaults, then the optional JSON file, then `SHIP_*` environment overrides.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
                Self::from_json(&content)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: ServiceConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    /// Config for tests: points at `db_path`, everything else default.
    pub fn default_test(db_path: &str) -> Self {
        Self {
            db_path: db_path.to_string(),
            ..Self::default()
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(v) = lookup("SHIP_DB_PATH") {
            self.db_path = v;
        }
        if let Some(v) = lookup("SHIP_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = lookup("SHIP_ACTIVE_PLAN_YEAR") {
            self.active_plan_year = v;
        }
        if let Some(v) = lookup("SHIP_BUSY_TIMEOUT_MS") {
            self.busy_timeout_ms = v
                .parse()
                .map_err(|e| anyhow::anyhow!("SHIP_BUSY_TIMEOUT_MS '{v}': {e}"))?;
        }
        Ok(())
    }
}
