//! Response envelopes
//!
//! Every JSON response body is wrapped in one of two shapes:
//!
//! ```text
//! single:    {"status", "data", "message"}
//! paginated: {"items", "currentPage", "totalPages", "totalResults",
//!             "pageSize", "hasNext", "hasPrevious", "status", "message"}
//! ```
//!
//! Keys are always present and serialized in this order; absent `data` and
//! `message` serialize as `null`.

use serde::{Deserialize, Serialize};
use structbridge_core::pagination::PaginationMetadata;

/// Status reported by successful responses
pub const STATUS_OK: &str = "ok";
/// Status reported by error responses
pub const STATUS_ERROR: &str = "error";

/// `{"status", "data", "message"}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
	pub status: String,
	pub data: Option<T>,
	pub message: Option<String>,
}

impl<T> Envelope<T> {
	/// Successful envelope carrying `data`
	pub fn ok(data: T) -> Self {
		build_response(Some(data), None, STATUS_OK)
	}

	/// Error envelope with a message and optional detail payload
	pub fn error(data: Option<T>, message: &str) -> Self {
		build_response(data, Some(message), STATUS_ERROR)
	}
}

/// Paginated list envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedEnvelope<T> {
	pub items: Vec<T>,
	pub current_page: i64,
	pub total_pages: i64,
	pub total_results: i64,
	pub page_size: i64,
	pub has_next: bool,
	pub has_previous: bool,
	pub status: String,
	pub message: Option<String>,
}

impl<T> PaginatedEnvelope<T> {
	/// Pagination metadata carried by this envelope
	pub fn metadata(&self) -> PaginationMetadata {
		PaginationMetadata {
			current_page: self.current_page,
			total_pages: self.total_pages,
			total_results: self.total_results,
			page_size: self.page_size,
			has_next: self.has_next,
			has_previous: self.has_previous,
		}
	}
}

/// Wrap `data` in a single-object envelope
///
/// # Example
///
/// ```rust
/// use structbridge_http::envelope::build_response;
///
/// let envelope = build_response(Some(42), Some("found"), "ok");
/// assert_eq!(
///     serde_json::to_string(&envelope).unwrap(),
///     r#"{"status":"ok","data":42,"message":"found"}"#
/// );
///
/// let empty = build_response::<i32>(None, None, "ok");
/// assert_eq!(
///     serde_json::to_string(&empty).unwrap(),
///     r#"{"status":"ok","data":null,"message":null}"#
/// );
/// ```
pub fn build_response<T>(data: Option<T>, message: Option<&str>, status: &str) -> Envelope<T> {
	Envelope {
		status: status.to_string(),
		data,
		message: message.map(str::to_string),
	}
}

/// Wrap one page of `items` in a paginated envelope
///
/// Metadata follows [`PaginationMetadata::compute`]; a non-positive
/// `page_size` yields zero pages. No parameter validation happens here.
///
/// # Example
///
/// ```rust
/// use structbridge_http::envelope::build_paginated_response;
///
/// let page = build_paginated_response(vec!["a", "b"], 95, 10, 10, None, "ok");
/// assert_eq!(page.total_pages, 10);
/// assert!(!page.has_next);
/// assert!(page.has_previous);
/// ```
pub fn build_paginated_response<T>(
	items: Vec<T>,
	total_results: i64,
	current_page: i64,
	page_size: i64,
	message: Option<&str>,
	status: &str,
) -> PaginatedEnvelope<T> {
	let metadata = PaginationMetadata::compute(total_results, page_size, current_page);
	PaginatedEnvelope {
		items,
		current_page: metadata.current_page,
		total_pages: metadata.total_pages,
		total_results: metadata.total_results,
		page_size: metadata.page_size,
		has_next: metadata.has_next,
		has_previous: metadata.has_previous,
		status: status.to_string(),
		message: message.map(str::to_string),
	}
}
