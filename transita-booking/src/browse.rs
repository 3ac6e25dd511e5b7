//! Trip-browsing snapshots.
//!
//! Filtering and pagination are explicit recompute-on-input-change functions
//! returning fresh vectors, so the data flow (and the test seam) is visible
//! instead of hidden in derived getters.

use transita_domain::{Booking, Trip};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// How many bookings the dashboard shows as "recent".
pub const RECENT_BOOKINGS: usize = 3;

/// Case-insensitive substring filter on origin AND destination; a blank term
/// matches everything.
pub fn filter_trips(trips: &[Trip], origin_term: &str, destination_term: &str) -> Vec<Trip> {
    let origin = origin_term.trim().to_lowercase();
    let destination = destination_term.trim().to_lowercase();

    trips
        .iter()
        .filter(|t| {
            let matches_origin = origin.is_empty() || t.origin.to_lowercase().contains(&origin);
            let matches_destination =
                destination.is_empty() || t.destination.to_lowercase().contains(&destination);
            matches_origin && matches_destination
        })
        .cloned()
        .collect()
}

pub fn page_count(item_count: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    item_count.div_ceil(per_page)
}

/// 1-based page slice; an out-of-range page yields an empty slice.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Vec<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let start = (page - 1) * per_page;
    items
        .iter()
        .skip(start)
        .take(per_page)
        .cloned()
        .collect()
}

/// Window of at most five page numbers around the current page, for the
/// pager control.
pub fn page_window(current: usize, total_pages: usize) -> Vec<usize> {
    if total_pages == 0 {
        return Vec::new();
    }
    let max_pages = total_pages.min(5);
    let start = current.saturating_sub(2).max(1);
    let end = (start + max_pages - 1).min(total_pages);
    (start..=end).collect()
}

/// The dashboard's "recent bookings" strip: the first few entries as served.
pub fn recent_bookings(bookings: &[Booking]) -> Vec<Booking> {
    bookings.iter().take(RECENT_BOOKINGS).cloned().collect()
}
