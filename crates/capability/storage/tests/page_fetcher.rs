use camgrid_pagination::encode_page_token;
use camgrid_storage::{
    FetchError, InMemoryEntityStore, InMemoryPageFetcher, PageFetcher, PageRequest, SeedConfig,
};
use domain::{EntityFilter, EntityKind, EntityStatus};
use std::sync::Arc;

fn fetcher() -> InMemoryPageFetcher {
    InMemoryPageFetcher::new(Arc::new(InMemoryEntityStore::with_seed(
        SeedConfig::default(),
    )))
}

#[tokio::test]
async fn first_page_has_next_only() {
    let fetcher = fetcher();
    let page = fetcher
        .fetch_page(PageRequest::new(EntityKind::Camera, EntityFilter::new(), 30))
        .await
        .expect("page");
    assert_eq!(page.results.len(), 30);
    assert_eq!(page.total_size, 200);
    assert!(page.prev_cursor.is_none());
    assert_eq!(
        page.next_cursor,
        Some(encode_page_token(30, &EntityFilter::new()))
    );
}

#[tokio::test]
async fn next_cursor_continues_where_previous_page_ended() {
    let fetcher = fetcher();
    let filter = EntityFilter::new().with_bridge("Bridge-2");
    let first = fetcher
        .fetch_page(PageRequest::new(EntityKind::Camera, filter.clone(), 40))
        .await
        .expect("first");
    let second = fetcher
        .fetch_page(PageRequest::new(EntityKind::Camera, filter, 40).with_cursor(first.next_cursor))
        .await
        .expect("second");
    assert_eq!(second.results.len(), 10);
    assert_eq!(second.results[0].id(), "Camera-91");
    assert!(second.next_cursor.is_none());
    assert!(second.prev_cursor.is_some());
}

#[tokio::test]
async fn unsupported_filter_fields_are_ignored_for_kind() {
    let fetcher = fetcher();
    // Location 不支持 status / bridge 过滤
    let filter = EntityFilter::new()
        .with_bridge("Bridge-1")
        .with_status_in(vec![EntityStatus::Error]);
    let page = fetcher
        .fetch_page(PageRequest::new(EntityKind::Location, filter, 100))
        .await
        .expect("page");
    assert_eq!(page.total_size, 2);
}

#[tokio::test]
async fn cursor_from_other_filter_is_rejected() {
    let fetcher = fetcher();
    let stale = encode_page_token(50, &EntityFilter::new().with_bridge("Bridge-1"));
    let request = PageRequest::new(
        EntityKind::Camera,
        EntityFilter::new().with_bridge("Bridge-2"),
        50,
    )
    .with_cursor(Some(stale));
    let err = fetcher.fetch_page(request).await.expect_err("mismatch");
    assert!(matches!(err, FetchError::InvalidCursor(_)));
}

#[tokio::test]
async fn garbage_cursor_is_rejected() {
    let fetcher = fetcher();
    let request = PageRequest::new(EntityKind::Bridge, EntityFilter::new(), 10)
        .with_cursor(Some("%%%".to_string()));
    let err = fetcher.fetch_page(request).await.expect_err("garbage");
    assert!(matches!(err, FetchError::InvalidCursor(_)));
}

#[tokio::test]
async fn id_in_page_returns_only_requested_members() {
    let fetcher = fetcher();
    let filter = EntityFilter::new().with_id_in(["Camera-3", "Camera-150", "Camera-999"]);
    let page = fetcher
        .fetch_page(PageRequest::new(EntityKind::Camera, filter, 3))
        .await
        .expect("page");
    let ids: Vec<_> = page.results.iter().map(|item| item.id()).collect();
    assert_eq!(ids, vec!["Camera-3", "Camera-150"]);
}
