use camgrid_pagination::{
    DEFAULT_PAGE_SIZE, PaginationError, decode_page_token, encode_page_token, paginate,
};
use domain::{EntityFilter, EntityStatus};

fn numbers(count: usize) -> Vec<usize> {
    (0..count).collect()
}

#[test]
fn first_page_has_next_but_no_prev() {
    let filters = EntityFilter::new().with_bridge("Bridge-1");
    let page = paginate(numbers(120), None, 100, &filters).expect("page");
    assert_eq!(page.results.len(), 100);
    assert_eq!(page.total_size, 120);
    assert!(page.prev_cursor.is_none());
    let next = decode_page_token(page.next_cursor.as_deref().expect("next")).expect("decode");
    assert_eq!(next.offset, 100);
    assert_eq!(next.filters, filters);
}

#[test]
fn last_page_has_prev_but_no_next() {
    let filters = EntityFilter::default();
    let token = encode_page_token(100, &filters);
    let page = paginate(numbers(120), Some(&token), 100, &filters).expect("page");
    assert_eq!(page.results, (100..120).collect::<Vec<_>>());
    assert!(page.next_cursor.is_none());
    let prev = decode_page_token(page.prev_cursor.as_deref().expect("prev")).expect("decode");
    assert_eq!(prev.offset, 0);
}

#[test]
fn prev_cursor_clamps_at_zero() {
    let filters = EntityFilter::default();
    let token = encode_page_token(30, &filters);
    let page = paginate(numbers(200), Some(&token), 50, &filters).expect("page");
    assert_eq!(page.results.first(), Some(&30));
    let prev = decode_page_token(page.prev_cursor.as_deref().expect("prev")).expect("decode");
    assert_eq!(prev.offset, 0);
    let next = decode_page_token(page.next_cursor.as_deref().expect("next")).expect("decode");
    assert_eq!(next.offset, 80);
}

#[test]
fn exact_fit_has_no_next() {
    let page = paginate(numbers(100), None, 100, &EntityFilter::default()).expect("page");
    assert_eq!(page.results.len(), 100);
    assert!(page.next_cursor.is_none());
}

#[test]
fn zero_page_size_uses_default() {
    let page = paginate(numbers(250), None, 0, &EntityFilter::default()).expect("page");
    assert_eq!(page.results.len(), DEFAULT_PAGE_SIZE);
}

#[test]
fn cursor_from_other_filter_set_is_rejected() {
    let issued_for = EntityFilter::new().with_status_in([EntityStatus::Online]);
    let token = encode_page_token(10, &issued_for);
    let err = paginate(numbers(50), Some(&token), 10, &EntityFilter::default())
        .expect_err("mismatch");
    assert!(matches!(err, PaginationError::InvalidCursor(_)));
}

#[test]
fn malformed_cursor_is_rejected() {
    let err = paginate(numbers(50), Some("%%%"), 10, &EntityFilter::default())
        .expect_err("malformed");
    assert!(matches!(err, PaginationError::InvalidCursor(_)));
}
