//! Pure, stateless windowing over result rows.

/// One window into a result sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub shown: &'a [T],
    pub has_prev: bool,
    pub has_next: bool,
    pub total_pages: usize,
}

/// Window `items` to the zero-based `index`th page of `page_size` rows.
///
/// `total_pages` is at least 1 even for empty input; an out-of-range index
/// yields an empty `shown` slice. Index clamping is the caller's concern
/// (navigation actions validate before calling).
pub fn page<T>(items: &[T], page_size: usize, index: usize) -> Page<'_, T> {
    debug_assert!(page_size > 0, "page_size must be positive");
    let total_pages = items.len().div_ceil(page_size).max(1);
    let start = index.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    Page {
        shown: &items[start..end],
        has_prev: index > 0,
        has_next: index + 1 < total_pages,
        total_pages,
    }
}
