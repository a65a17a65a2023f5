//! 摄像头网格 HTTP API：分页拉取服务、网格行数据与刷新控制，附带请求追踪 ID。

pub mod handlers;
pub mod routes;
pub mod utils;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};
use camgrid_config::AppConfig;
use camgrid_grid::{GridSession, RefreshSettings};
use camgrid_storage::{
    EntityStore, InMemoryEntityStore, InMemoryPageFetcher, PageFetcher, SeedConfig,
};
use camgrid_telemetry::new_request_ids;
use domain::GroupingMode;
use std::sync::{Arc, RwLock};
use tower_http::trace::TraceLayer;
use tracing::Instrument;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub session: Arc<RwLock<Arc<GridSession>>>,
    pub default_page_size: usize,
}

impl AppState {
    /// 组装状态并创建网格会话。需要在 tokio 运行时内调用。
    pub fn new(
        store: Arc<dyn EntityStore>,
        fetcher: Arc<dyn PageFetcher>,
        mode: GroupingMode,
        refresh: RefreshSettings,
        default_page_size: usize,
    ) -> Self {
        let session = GridSession::new(mode, fetcher.clone(), refresh);
        Self {
            store,
            fetcher,
            session: Arc::new(RwLock::new(Arc::new(session))),
            default_page_size,
        }
    }

    /// 按配置生成演示数据并组装状态。
    pub fn from_config(config: &AppConfig) -> Self {
        let store = Arc::new(InMemoryEntityStore::with_seed(SeedConfig {
            locations: config.seed_locations,
            bridges_per_location: config.seed_bridges_per_location,
            cameras_per_bridge: config.seed_cameras_per_bridge,
        }));
        let fetcher =
            InMemoryPageFetcher::new(store.clone()).with_latency(config.simulated_latency());
        Self::new(
            store,
            Arc::new(fetcher),
            config.grouping_mode,
            RefreshSettings {
                interval: config.refresh_interval(),
                auto_refresh: config.auto_refresh,
            },
            config.default_page_size,
        )
    }

    /// 当前网格会话。
    pub fn session(&self) -> Arc<GridSession> {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// 以新分组模式重建网格会话，返回新会话。
    pub fn replace_session(&self, mode: GroupingMode) -> Arc<GridSession> {
        let mut current = self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let rebuilt = Arc::new(current.rebuild(mode));
        *current = rebuilt.clone();
        rebuilt
    }
}

/// 构建完整应用路由。
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(handlers::health))
        .nest("/api", routes::create_api_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context))
}

async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    // 生成 request_id 与 trace_id，并注入请求扩展与日志
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}
