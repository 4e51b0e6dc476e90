//! Page-number pagination arithmetic
//!
//! Metadata is derived in closed form from the totals; nothing here holds
//! state between calls.

use serde::{Deserialize, Serialize};

/// Pagination metadata of a single page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
	/// Current page number (1-indexed)
	pub current_page: i64,
	/// Total number of pages, `0` when the page size is not positive
	pub total_pages: i64,
	/// Total number of items across all pages
	pub total_results: i64,
	/// Items per page
	pub page_size: i64,
	pub has_next: bool,
	pub has_previous: bool,
}

impl PaginationMetadata {
	/// Derive metadata for `current_page`
	///
	/// # Examples
	///
	/// ```
	/// use structbridge_core::pagination::PaginationMetadata;
	///
	/// let meta = PaginationMetadata::compute(95, 10, 1);
	/// assert_eq!(meta.total_pages, 10);
	/// assert!(meta.has_next);
	/// assert!(!meta.has_previous);
	///
	/// let empty = PaginationMetadata::compute(10, 0, 1);
	/// assert_eq!(empty.total_pages, 0);
	/// assert!(!empty.has_next);
	/// ```
	pub fn compute(total_results: i64, page_size: i64, current_page: i64) -> Self {
		let total_pages = total_pages(total_results, page_size);
		Self {
			current_page,
			total_pages,
			total_results,
			page_size,
			has_next: current_page < total_pages,
			has_previous: current_page > 1,
		}
	}

	/// Highest page number a client may request (never below 1)
	pub fn last_page(&self) -> i64 {
		self.total_pages.max(1)
	}

	/// Whether the current page lies past the last page of a non-empty result
	pub fn is_out_of_range(&self) -> bool {
		self.total_results > 0 && self.current_page > self.last_page()
	}
}

/// `ceil(total_results / page_size)`, or `0` for a non-positive page size
///
/// Uses floor division plus a remainder check so no intermediate sum can
/// overflow.
pub fn total_pages(total_results: i64, page_size: i64) -> i64 {
	if page_size <= 0 {
		return 0;
	}
	let quotient = total_results.div_euclid(page_size);
	if total_results.rem_euclid(page_size) == 0 {
		quotient
	} else {
		quotient + 1
	}
}
