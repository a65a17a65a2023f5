//! camgrid-api 启动入口。

use camgrid_api::{AppState, build_app};
use camgrid_config::AppConfig;
use camgrid_telemetry::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let state = AppState::from_config(&config);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(
        target: "camgrid.api",
        addr = %config.http_addr,
        mode = %config.grouping_mode,
        auto_refresh = config.auto_refresh,
        "camgrid_api_listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
