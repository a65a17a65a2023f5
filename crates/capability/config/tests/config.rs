use camgrid_config::{AppConfig, ConfigError};
use domain::GroupingMode;
use std::time::Duration;

// 环境变量是进程级共享状态，所有断言放在同一个测试里顺序执行。
#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("CAMGRID_HTTP_ADDR", "127.0.0.1:8081");
        std::env::set_var("CAMGRID_GROUPING_MODE", "bridge_camera");
        std::env::set_var("CAMGRID_SIMULATED_LATENCY_MS", "0");
        std::env::set_var("CAMGRID_AUTO_REFRESH", "off");
        std::env::set_var("CAMGRID_SEED_CAMERAS_PER_BRIDGE", "120");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.http_addr, "127.0.0.1:8081");
    assert_eq!(config.grouping_mode, GroupingMode::BridgeCamera);
    assert_eq!(config.simulated_latency(), Duration::ZERO);
    assert!(!config.auto_refresh);
    assert_eq!(config.seed_cameras_per_bridge, 120);
    assert_eq!(config.default_page_size, 100);
    assert_eq!(config.refresh_interval(), Duration::from_secs(30));
    assert_eq!(config.seed_locations, 2);

    unsafe {
        std::env::set_var("CAMGRID_REFRESH_INTERVAL_SECONDS", "0");
    }
    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::Invalid(key, _)) if key == "CAMGRID_REFRESH_INTERVAL_SECONDS"
    ));

    unsafe {
        std::env::set_var("CAMGRID_REFRESH_INTERVAL_SECONDS", "15");
        std::env::set_var("CAMGRID_GROUPING_MODE", "camera-location");
    }
    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::Invalid(key, _)) if key == "CAMGRID_GROUPING_MODE"
    ));

    unsafe {
        std::env::set_var("CAMGRID_GROUPING_MODE", "location-camera");
        std::env::set_var("CAMGRID_DEFAULT_PAGE_SIZE", "many");
    }
    assert!(matches!(
        AppConfig::from_env(),
        Err(ConfigError::Invalid(key, value))
            if key == "CAMGRID_DEFAULT_PAGE_SIZE" && value == "many"
    ));
}
