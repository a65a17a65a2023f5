//! 应用运行配置加载。

use domain::GroupingMode;
use std::env;
use std::time::Duration;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub grouping_mode: GroupingMode,
    pub default_page_size: usize,
    pub simulated_latency_ms: u64,
    pub refresh_interval_seconds: u64,
    pub auto_refresh: bool,
    pub seed_locations: usize,
    pub seed_bridges_per_location: usize,
    pub seed_cameras_per_bridge: usize,
}

impl AppConfig {
    /// 从环境变量读取配置（全部可选）。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_addr =
            env::var("CAMGRID_HTTP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let grouping_mode = read_grouping_mode("CAMGRID_GROUPING_MODE")?;
        let default_page_size = read_usize_with_default("CAMGRID_DEFAULT_PAGE_SIZE", 100)?;
        let simulated_latency_ms = read_u64_with_default("CAMGRID_SIMULATED_LATENCY_MS", 500)?;
        let refresh_interval_seconds =
            read_u64_with_default("CAMGRID_REFRESH_INTERVAL_SECONDS", 30)?;
        if refresh_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "CAMGRID_REFRESH_INTERVAL_SECONDS".to_string(),
                "0".to_string(),
            ));
        }
        let auto_refresh = read_bool_with_default("CAMGRID_AUTO_REFRESH", true);
        let seed_locations = read_usize_with_default("CAMGRID_SEED_LOCATIONS", 2)?;
        let seed_bridges_per_location =
            read_usize_with_default("CAMGRID_SEED_BRIDGES_PER_LOCATION", 2)?;
        let seed_cameras_per_bridge =
            read_usize_with_default("CAMGRID_SEED_CAMERAS_PER_BRIDGE", 50)?;

        Ok(Self {
            http_addr,
            grouping_mode,
            default_page_size,
            simulated_latency_ms,
            refresh_interval_seconds,
            auto_refresh,
            seed_locations,
            seed_bridges_per_location,
            seed_cameras_per_bridge,
        })
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }
}

fn read_grouping_mode(key: &str) -> Result<GroupingMode, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .parse::<GroupingMode>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value)),
        _ => Ok(GroupingMode::default()),
    }
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_usize_with_default(key: &str, default: usize) -> Result<usize, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<usize>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
