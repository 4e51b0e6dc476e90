//! # structbridge HTTP
//!
//! Response envelopes and request body handling.
//!
//! - [`build_response`] / [`build_paginated_response`]: the two envelope shapes
//! - [`respond`] / [`paginate`]: envelopes rendered into a [`JsonResponse`]
//! - [`paginate_results`]: one page cut from a full result list, sized by
//!   `PaginationSettings`
//! - [`decode_body`]: request body decoding with 400/422 error envelopes
//!
//! ## Example
//!
//! ```rust
//! use http::StatusCode;
//! use structbridge_http::paginate;
//!
//! let response = paginate(vec!["a", "b"], 12, 2, 10, None, "ok", StatusCode::OK).unwrap();
//! let json = response.json().unwrap();
//!
//! assert_eq!(json["totalPages"], 2);
//! assert_eq!(json["hasPrevious"], true);
//! ```

pub mod envelope;
pub mod errors;
pub mod response;

pub use envelope::{
	Envelope, PaginatedEnvelope, STATUS_ERROR, STATUS_OK, build_paginated_response, build_response,
};
pub use errors::{RecordError, decode_body};
pub use http::StatusCode;
pub use response::{JsonResponse, paginate, paginate_results, respond};

use structbridge_core::exception::PaginationError;
use thiserror::Error;

/// Errors raised while producing a response
#[derive(Debug, Error)]
pub enum ResponseError {
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error(transparent)]
	Pagination(#[from] PaginationError),
}

pub type ResponseResult<T> = Result<T, ResponseError>;
