use async_trait::async_trait;
use camgrid_grid::{GridError, RowSource, TokenCache};
use camgrid_pagination::{Page, decode_page_token};
use camgrid_storage::{
    FetchError, InMemoryEntityStore, InMemoryPageFetcher, PageFetcher, PageRequest, SeedData,
};
use domain::{
    Bridge, Camera, Entity, EntityKind, EntityStatus, GroupingMode, HierarchyPath, Location,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 一个 Location（L1），三个 Bridge：B1 下 120 个、B2 下 15 个、B3 下 5 个 Camera。
fn seed() -> SeedData {
    let locations = vec![Location {
        id: "L1".to_string(),
    }];
    let mut bridges = Vec::new();
    let mut cameras = Vec::new();
    for (bridge_id, count) in [("B1", 120), ("B2", 15), ("B3", 5)] {
        bridges.push(Bridge {
            id: bridge_id.to_string(),
            location_id: "L1".to_string(),
            status: EntityStatus::Online,
        });
        for _ in 0..count {
            cameras.push(Camera {
                id: format!("C{}", cameras.len() + 1),
                location_id: "L1".to_string(),
                bridge_id: bridge_id.to_string(),
                status: if cameras.len() % 4 == 0 {
                    EntityStatus::Error
                } else {
                    EntityStatus::Online
                },
            });
        }
    }
    SeedData {
        locations,
        bridges,
        cameras,
    }
}

struct RecordingFetcher {
    inner: InMemoryPageFetcher,
    requests: Mutex<Vec<PageRequest>>,
}

impl RecordingFetcher {
    fn new() -> Self {
        Self {
            inner: InMemoryPageFetcher::new(Arc::new(InMemoryEntityStore::from_seed(seed()))),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

#[async_trait]
impl PageFetcher for RecordingFetcher {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<Entity>, FetchError> {
        self.requests.lock().expect("lock").push(request.clone());
        self.inner.fetch_page(request).await
    }
}

struct FailingFetcher;

#[async_trait]
impl PageFetcher for FailingFetcher {
    async fn fetch_page(&self, _request: PageRequest) -> Result<Page<Entity>, FetchError> {
        Err(FetchError::Backend("connection reset".to_string()))
    }
}

/// 统计同时在途的请求数。
struct ConcurrencyProbe {
    inner: InMemoryPageFetcher,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[async_trait]
impl PageFetcher for ConcurrencyProbe {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page<Entity>, FetchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        let result = self.inner.fetch_page(request).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

fn source(mode: GroupingMode, fetcher: Arc<dyn PageFetcher>) -> RowSource {
    RowSource::new(mode, fetcher, Arc::new(TokenCache::new()))
}

fn path(keys: &[&str]) -> HierarchyPath {
    keys.iter().copied().collect()
}

#[tokio::test]
async fn forward_paging_reuses_next_cursor() {
    let fetcher = Arc::new(RecordingFetcher::new());
    let source = source(GroupingMode::BridgeCamera, fetcher.clone());
    let b1 = path(&["B1"]);

    let first = source.get_rows(&b1, 0, 100, &[]).await.expect("first");
    assert_eq!(first.row_data.len(), 100);
    assert_eq!(first.row_count, None);
    assert!(first.row_data.iter().all(|row| !row.is_group));

    let second = source.get_rows(&b1, 100, 120, &[]).await.expect("second");
    assert_eq!(second.row_data.len(), 20);
    assert_eq!(second.row_count, Some(120));
    assert_eq!(second.row_data[0].id, "C101");

    let requests = fetcher.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].kind, EntityKind::Camera);
    assert_eq!(requests[0].cursor, None);
    assert_eq!(requests[0].page_size, 100);
    assert_eq!(requests[0].filter.bridge_id.as_deref(), Some("B1"));
    assert_eq!(requests[1].page_size, 20);

    let cursor = requests[1].cursor.as_deref().expect("cursor");
    assert_eq!(decode_page_token(cursor).expect("decode").offset, 100);
    assert_eq!(
        source.cache().entry("level:1:B1").expect("entry").last_requested_offset,
        100
    );
}

#[tokio::test]
async fn returning_to_first_row_never_reuses_a_cursor() {
    let fetcher = Arc::new(RecordingFetcher::new());
    let source = source(GroupingMode::BridgeCamera, fetcher.clone());
    let b1 = path(&["B1"]);

    source.get_rows(&b1, 0, 100, &[]).await.expect("first");
    source.get_rows(&b1, 100, 120, &[]).await.expect("second");
    let again = source.get_rows(&b1, 0, 100, &[]).await.expect("again");

    assert_eq!(again.row_data[0].id, "C1");
    assert_eq!(fetcher.requests()[2].cursor, None);
}

#[tokio::test]
async fn backward_paging_uses_prev_cursor() {
    let fetcher = Arc::new(RecordingFetcher::new());
    let source = source(GroupingMode::BridgeCamera, fetcher.clone());
    let b1 = path(&["B1"]);

    source.get_rows(&b1, 0, 40, &[]).await.expect("p1");
    source.get_rows(&b1, 40, 80, &[]).await.expect("p2");
    let prev = source
        .cache()
        .entry("level:1:B1")
        .expect("entry")
        .prev_cursor
        .expect("prev");
    assert_eq!(decode_page_token(&prev).expect("decode").offset, 0);

    // 回到第 0 行时不使用 prev
    let block = source.get_rows(&b1, 0, 40, &[]).await.expect("p1 again");
    assert_eq!(block.row_data[0].id, "C1");

    source.get_rows(&b1, 40, 80, &[]).await.expect("p2 again");
    source.get_rows(&b1, 80, 120, &[]).await.expect("p3");
    let prev_of_third = source
        .cache()
        .entry("level:1:B1")
        .expect("entry")
        .prev_cursor
        .expect("prev");
    let back = source.get_rows(&b1, 40, 80, &[]).await.expect("back");
    assert_eq!(back.row_data[0].id, "C41");

    let requests = fetcher.requests();
    assert_eq!(requests[2].cursor, None);
    assert_eq!(
        requests.last().and_then(|req| req.cursor.clone()),
        Some(prev_of_third)
    );
}

#[tokio::test]
async fn row_count_only_reported_at_end_of_results() {
    let fetcher = Arc::new(RecordingFetcher::new());
    let source = source(GroupingMode::BridgeCamera, fetcher);
    let b2 = path(&["B2"]);

    let partial = source.get_rows(&b2, 0, 10, &[]).await.expect("partial");
    assert_eq!(partial.row_data.len(), 10);
    assert_eq!(partial.row_count, None);

    let past_end = source.get_rows(&b2, 0, 20, &[]).await.expect("past end");
    assert_eq!(past_end.row_data.len(), 15);
    assert_eq!(past_end.row_count, Some(15));
}

#[tokio::test]
async fn group_depths_yield_group_rows() {
    let fetcher = Arc::new(RecordingFetcher::new());
    let source = source(GroupingMode::LocationBridgeCamera, fetcher.clone());

    let locations = source
        .get_rows(&HierarchyPath::root(), 0, 100, &[])
        .await
        .expect("locations");
    assert_eq!(locations.row_count, Some(1));
    assert!(locations.row_data[0].is_group);
    assert_eq!(locations.row_data[0].location_id.as_deref(), Some("L1"));

    let bridges = source
        .get_rows(&path(&["L1"]), 0, 100, &[])
        .await
        .expect("bridges");
    let ids: Vec<_> = bridges.row_data.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, vec!["B1", "B2", "B3"]);
    assert!(bridges.row_data.iter().all(|row| row.is_group));
    assert_eq!(bridges.row_data[1].bridge_id.as_deref(), Some("B2"));

    let cameras = source
        .get_rows(&path(&["L1", "B3"]), 0, 100, &[])
        .await
        .expect("cameras");
    assert_eq!(cameras.row_count, Some(5));
    assert!(cameras.row_data.iter().all(|row| !row.is_group));

    let requests = fetcher.requests();
    assert_eq!(requests[0].kind, EntityKind::Location);
    assert_eq!(requests[1].kind, EntityKind::Bridge);
    assert_eq!(requests[1].filter.location_id.as_deref(), Some("L1"));
    assert_eq!(requests[2].kind, EntityKind::Camera);
    assert_eq!(requests[2].filter.location_id.as_deref(), Some("L1"));
    assert_eq!(requests[2].filter.bridge_id.as_deref(), Some("B3"));
}

#[tokio::test]
async fn location_camera_mode_skips_bridges() {
    let fetcher = Arc::new(RecordingFetcher::new());
    let source = source(GroupingMode::LocationCamera, fetcher.clone());

    let cameras = source
        .get_rows(&path(&["L1"]), 0, 200, &[])
        .await
        .expect("cameras");
    assert_eq!(cameras.row_count, Some(140));
    assert!(cameras.row_data.iter().all(|row| !row.is_group));

    let request = &fetcher.requests()[0];
    assert_eq!(request.kind, EntityKind::Camera);
    assert_eq!(request.filter.bridge_id, None);
}

#[tokio::test]
async fn status_filter_narrows_and_reshapes_cursor() {
    let fetcher = Arc::new(RecordingFetcher::new());
    let source = source(GroupingMode::BridgeCamera, fetcher.clone());
    let b1 = path(&["B1"]);

    source.get_rows(&b1, 0, 10, &[]).await.expect("unfiltered");
    let filtered = source
        .get_rows(&b1, 10, 20, &[EntityStatus::Error])
        .await
        .expect("filtered");
    assert_eq!(filtered.row_data.len(), 10);
    assert!(
        filtered
            .row_data
            .iter()
            .all(|row| row.status == Some(EntityStatus::Error))
    );
    // B1 下 30 个 error，窗口未到末尾
    assert_eq!(filtered.row_count, None);

    let request = &fetcher.requests()[1];
    assert_eq!(request.filter.status_in, vec![EntityStatus::Error]);
    let token = decode_page_token(request.cursor.as_deref().expect("cursor")).expect("decode");
    assert_eq!(token.offset, 10);
    assert_eq!(token.filters, request.filter);
}

#[tokio::test]
async fn status_filter_is_ignored_for_locations() {
    let fetcher = Arc::new(RecordingFetcher::new());
    let source = source(GroupingMode::LocationBridgeCamera, fetcher.clone());
    let block = source
        .get_rows(&HierarchyPath::root(), 0, 50, &[EntityStatus::Offline])
        .await
        .expect("locations");
    assert_eq!(block.row_data.len(), 1);
    assert!(fetcher.requests()[0].filter.status_in.is_empty());
}

#[tokio::test]
async fn depth_beyond_mode_is_rejected_without_fetching() {
    let fetcher = Arc::new(RecordingFetcher::new());
    let source = source(GroupingMode::BridgeCamera, fetcher.clone());
    let err = source
        .get_rows(&path(&["B1", "C1"]), 0, 10, &[])
        .await
        .expect_err("too deep");
    assert_eq!(
        err,
        GridError::UnsupportedDepth {
            mode: GroupingMode::BridgeCamera,
            depth: 2,
        }
    );
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn fetch_failure_fails_the_request() {
    let source = source(GroupingMode::BridgeCamera, Arc::new(FailingFetcher));
    let err = source
        .get_rows(&path(&["B1"]), 0, 100, &[])
        .await
        .expect_err("failure");
    assert!(matches!(err, GridError::FetchFailure(_)));
    assert!(source.cache().is_empty());
}

#[tokio::test]
async fn empty_window_skips_fetch() {
    let fetcher = Arc::new(RecordingFetcher::new());
    let source = source(GroupingMode::BridgeCamera, fetcher.clone());
    let block = source
        .get_rows(&path(&["B1"]), 30, 30, &[])
        .await
        .expect("empty");
    assert!(block.row_data.is_empty());
    assert!(fetcher.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn same_path_requests_are_serialized() {
    let probe = Arc::new(ConcurrencyProbe {
        inner: InMemoryPageFetcher::new(Arc::new(InMemoryEntityStore::from_seed(seed()))),
        in_flight: AtomicUsize::new(0),
        max_in_flight: AtomicUsize::new(0),
    });
    let source = source(GroupingMode::BridgeCamera, probe.clone());
    let b1 = path(&["B1"]);

    let (first, second) = tokio::join!(
        source.get_rows(&b1, 0, 50, &[]),
        source.get_rows(&b1, 50, 100, &[]),
    );
    assert!(first.is_ok());
    assert_eq!(second.expect("second").row_data[0].id, "C51");
    assert_eq!(probe.max_in_flight.load(Ordering::SeqCst), 1);

    let b2 = path(&["B2"]);
    let (b1_rows, b2_rows) = tokio::join!(
        source.get_rows(&b1, 0, 10, &[]),
        source.get_rows(&b2, 0, 10, &[]),
    );
    assert!(b1_rows.is_ok() && b2_rows.is_ok());
    assert_eq!(probe.max_in_flight.load(Ordering::SeqCst), 2);
}
