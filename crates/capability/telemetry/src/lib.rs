//! 追踪、请求 ID 生成与网格计数指标。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub pages_fetched: u64,
    pub fetch_failures: u64,
    pub fetch_latency_ms_total: u64,
    pub fetch_latency_ms_count: u64,
    pub cursor_restart: u64,
    pub cursor_forward: u64,
    pub cursor_backward: u64,
    pub cursor_repeat: u64,
    pub cursor_synthesized: u64,
    pub rows_served: u64,
    pub reconcile_cycles: u64,
    pub reconcile_skipped: u64,
    pub reconcile_failed: u64,
    pub patches_applied: u64,
}

/// 计数指标。
pub struct TelemetryMetrics {
    pages_fetched: AtomicU64,
    fetch_failures: AtomicU64,
    fetch_latency_ms_total: AtomicU64,
    fetch_latency_ms_count: AtomicU64,
    cursor_restart: AtomicU64,
    cursor_forward: AtomicU64,
    cursor_backward: AtomicU64,
    cursor_repeat: AtomicU64,
    cursor_synthesized: AtomicU64,
    rows_served: AtomicU64,
    reconcile_cycles: AtomicU64,
    reconcile_skipped: AtomicU64,
    reconcile_failed: AtomicU64,
    patches_applied: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            pages_fetched: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
            fetch_latency_ms_total: AtomicU64::new(0),
            fetch_latency_ms_count: AtomicU64::new(0),
            cursor_restart: AtomicU64::new(0),
            cursor_forward: AtomicU64::new(0),
            cursor_backward: AtomicU64::new(0),
            cursor_repeat: AtomicU64::new(0),
            cursor_synthesized: AtomicU64::new(0),
            rows_served: AtomicU64::new(0),
            reconcile_cycles: AtomicU64::new(0),
            reconcile_skipped: AtomicU64::new(0),
            reconcile_failed: AtomicU64::new(0),
            patches_applied: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            fetch_latency_ms_total: self.fetch_latency_ms_total.load(Ordering::Relaxed),
            fetch_latency_ms_count: self.fetch_latency_ms_count.load(Ordering::Relaxed),
            cursor_restart: self.cursor_restart.load(Ordering::Relaxed),
            cursor_forward: self.cursor_forward.load(Ordering::Relaxed),
            cursor_backward: self.cursor_backward.load(Ordering::Relaxed),
            cursor_repeat: self.cursor_repeat.load(Ordering::Relaxed),
            cursor_synthesized: self.cursor_synthesized.load(Ordering::Relaxed),
            rows_served: self.rows_served.load(Ordering::Relaxed),
            reconcile_cycles: self.reconcile_cycles.load(Ordering::Relaxed),
            reconcile_skipped: self.reconcile_skipped.load(Ordering::Relaxed),
            reconcile_failed: self.reconcile_failed.load(Ordering::Relaxed),
            patches_applied: self.patches_applied.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录分页拉取成功次数。
pub fn record_page_fetched() {
    metrics().pages_fetched.fetch_add(1, Ordering::Relaxed);
}

/// 记录分页拉取失败次数。
pub fn record_fetch_failure() {
    metrics().fetch_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录分页拉取耗时（毫秒）。
pub fn record_fetch_latency_ms(latency_ms: u64) {
    let metrics = metrics();
    metrics
        .fetch_latency_ms_total
        .fetch_add(latency_ms, Ordering::Relaxed);
    metrics
        .fetch_latency_ms_count
        .fetch_add(1, Ordering::Relaxed);
}

/// 游标推断：从头开始。
pub fn record_cursor_restart() {
    metrics().cursor_restart.fetch_add(1, Ordering::Relaxed);
}

/// 游标推断：向后翻页（复用 next）。
pub fn record_cursor_forward() {
    metrics().cursor_forward.fetch_add(1, Ordering::Relaxed);
}

/// 游标推断：向前翻页（复用 prev）。
pub fn record_cursor_backward() {
    metrics().cursor_backward.fetch_add(1, Ordering::Relaxed);
}

/// 游标推断：重复请求同一偏移。
pub fn record_cursor_repeat() {
    metrics().cursor_repeat.fetch_add(1, Ordering::Relaxed);
}

/// 记录按偏移合成游标次数（缓存无法给出可用游标）。
pub fn record_cursor_synthesized() {
    metrics().cursor_synthesized.fetch_add(1, Ordering::Relaxed);
}

/// 记录交给渲染层的行数。
pub fn record_rows_served(rows: u64) {
    metrics().rows_served.fetch_add(rows, Ordering::Relaxed);
}

/// 记录完成的刷新周期。
pub fn record_reconcile_cycle() {
    metrics().reconcile_cycles.fetch_add(1, Ordering::Relaxed);
}

/// 记录跳过的刷新周期（未启用或无可见行）。
pub fn record_reconcile_skipped() {
    metrics().reconcile_skipped.fetch_add(1, Ordering::Relaxed);
}

/// 记录失败的刷新周期。
pub fn record_reconcile_failed() {
    metrics().reconcile_failed.fetch_add(1, Ordering::Relaxed);
}

/// 记录应用到视图的补丁数量。
pub fn record_patches_applied(count: u64) {
    metrics()
        .patches_applied
        .fetch_add(count, Ordering::Relaxed);
}
