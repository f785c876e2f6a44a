//! Fixed-size pagination over an in-memory result list

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PageSlice<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice an ordered result list into one fixed-size page. Page numbers
/// are 1-based; out-of-range requests clamp instead of erroring. Shared
/// by both search paths; how the list was produced is not its concern.
pub fn paginate<T: Clone>(all: &[T], page_number: usize, page_size: usize) -> PageSlice<T> {
    let page_size = page_size.max(1);
    let total_items = all.len();
    let total_pages = total_items.div_ceil(page_size);
    let page = page_number.clamp(1, total_pages.max(1));
    let start = (page - 1) * page_size;
    let items = all
        .iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();
    PageSlice {
        items,
        page,
        total_pages,
        total_items,
    }
}
