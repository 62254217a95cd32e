//! Catalog paging arithmetic.
//!
//! The upstream list is addressed by numeric offset only; the viewer exposes a
//! fixed window of [`PAGE_COUNT`] pages of [`PAGE_SIZE`] entries.

pub const PAGE_SIZE: usize = 50;
pub const PAGE_COUNT: usize = 20;
pub const MAX_OFFSET: usize = PAGE_SIZE * (PAGE_COUNT - 1);

/// Snap an arbitrary offset onto a page boundary inside the addressable range.
pub fn clamp_offset(offset: usize) -> usize {
    let bounded = offset.min(MAX_OFFSET);
    bounded - bounded % PAGE_SIZE
}

/// One-based page number shown in the page indicator.
pub fn current_page(offset: usize) -> usize {
    (offset / PAGE_SIZE + 1).clamp(1, PAGE_COUNT)
}

pub fn next_offset(offset: usize) -> usize {
    clamp_offset(offset.saturating_add(PAGE_SIZE))
}

pub fn prev_offset(offset: usize) -> usize {
    clamp_offset(offset.saturating_sub(PAGE_SIZE))
}

pub fn is_first_page(offset: usize) -> bool {
    current_page(offset) == 1
}

pub fn is_last_page(offset: usize) -> bool {
    current_page(offset) == PAGE_COUNT
}

pub fn page_label(offset: usize) -> String {
    format!("Page {} of {}", current_page(offset), PAGE_COUNT)
}
