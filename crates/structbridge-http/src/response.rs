//! JSON responses
//!
//! [`JsonResponse`] carries a status code, headers, and a serialized envelope.
//! [`respond`], [`paginate`] and [`paginate_results`] build one from data.

use crate::envelope::{Envelope, STATUS_ERROR, build_paginated_response, build_response};
use crate::{ResponseError, ResponseResult};
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{HeaderMap, StatusCode};
use serde::Serialize;
use serde_json::json;
use structbridge_conf::PaginationSettings;
use structbridge_core::exception::PaginationError;
use structbridge_core::pagination::PaginationMetadata;

const APPLICATION_JSON: &str = "application/json";

/// JSON HTTP response
#[derive(Debug, Clone)]
pub struct JsonResponse {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl JsonResponse {
	/// Create an empty response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use http::StatusCode;
	/// use structbridge_http::JsonResponse;
	///
	/// let response = JsonResponse::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Serialize `data` into the body and set `content-type: application/json`
	///
	/// # Examples
	///
	/// ```
	/// use http::StatusCode;
	/// use serde_json::json;
	/// use structbridge_http::JsonResponse;
	///
	/// let response = JsonResponse::new(StatusCode::OK)
	///     .with_json(&json!({"status": "ok"}))
	///     .unwrap();
	///
	/// assert_eq!(
	///     response.headers.get("content-type").unwrap().to_str().unwrap(),
	///     "application/json"
	/// );
	/// ```
	pub fn with_json<T: Serialize>(mut self, data: &T) -> ResponseResult<Self> {
		let json = serde_json::to_vec(data).map_err(|e| {
			tracing::error!(error = %e, "Failed to serialize response body");
			ResponseError::Serialization(e)
		})?;
		self.body = Bytes::from(json);
		self.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
		Ok(self)
	}

	/// Parse the body back into JSON
	pub fn json(&self) -> serde_json::Result<serde_json::Value> {
		serde_json::from_slice(&self.body)
	}

	pub fn into_http(self) -> http::Response<Bytes> {
		self.into()
	}
}

impl From<JsonResponse> for http::Response<Bytes> {
	fn from(response: JsonResponse) -> Self {
		let mut out = http::Response::new(response.body);
		*out.status_mut() = response.status;
		*out.headers_mut() = response.headers;
		out
	}
}

impl From<ResponseError> for JsonResponse {
	fn from(error: ResponseError) -> Self {
		let (status, envelope) = match &error {
			ResponseError::Pagination(err) => (
				StatusCode::BAD_REQUEST,
				Envelope::error(
					Some(json!({ "detail": err.to_string() })),
					"Invalid pagination parameters",
				),
			),
			ResponseError::Serialization(_) => (
				StatusCode::INTERNAL_SERVER_ERROR,
				build_response(None, Some("Internal server error"), STATUS_ERROR),
			),
		};

		JsonResponse::new(status)
			.with_json(&envelope)
			.unwrap_or_else(|_| JsonResponse::internal_server_error())
	}
}

/// Build a JSON response wrapping `data` in a single-object envelope
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use structbridge_http::respond;
///
/// let response = respond(Some(vec![1, 2]), None, "ok", StatusCode::OK).unwrap();
/// assert_eq!(&response.body[..], br#"{"status":"ok","data":[1,2],"message":null}"#);
/// ```
pub fn respond<T: Serialize>(
	data: Option<T>,
	message: Option<&str>,
	status: &str,
	status_code: StatusCode,
) -> ResponseResult<JsonResponse> {
	JsonResponse::new(status_code).with_json(&build_response(data, message, status))
}

/// Build a JSON response for one page of results
///
/// Rejects `page < 1`, `page_size < 1` and negative totals. A page past the
/// last page of a non-empty result is answered with no items.
pub fn paginate<T: Serialize>(
	items: Vec<T>,
	total_results: i64,
	page: i64,
	page_size: i64,
	message: Option<&str>,
	status: &str,
	status_code: StatusCode,
) -> ResponseResult<JsonResponse> {
	PaginationError::check(page, page_size, total_results)?;

	let metadata = PaginationMetadata::compute(total_results, page_size, page);
	let items = if metadata.is_out_of_range() {
		tracing::warn!(
			page,
			last_page = metadata.last_page(),
			total_results,
			"Requested page is past the last page"
		);
		Vec::new()
	} else {
		items
	};

	let envelope =
		build_paginated_response(items, total_results, page, page_size, message, status);
	JsonResponse::new(status_code).with_json(&envelope)
}

/// Build a JSON response for one page cut from the full result list
///
/// The page size comes from `settings`: a missing or non-positive request
/// uses `default_page_size`, larger requests are capped at `max_page_size`.
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use structbridge_conf::PaginationSettings;
/// use structbridge_http::paginate_results;
///
/// let settings = PaginationSettings::default();
/// let results: Vec<i32> = (1..=25).collect();
/// let response =
///     paginate_results(&settings, results, 3, None, None, "ok", StatusCode::OK).unwrap();
/// let json = response.json().unwrap();
///
/// assert_eq!(json["items"], serde_json::json!([21, 22, 23, 24, 25]));
/// assert_eq!(json["pageSize"], 10);
/// assert_eq!(json["totalPages"], 3);
/// ```
pub fn paginate_results<T: Serialize>(
	settings: &PaginationSettings,
	results: Vec<T>,
	page: i64,
	page_size: Option<i64>,
	message: Option<&str>,
	status: &str,
	status_code: StatusCode,
) -> ResponseResult<JsonResponse> {
	let page_size = settings.effective_page_size(page_size);
	let total_results = i64::try_from(results.len()).unwrap_or(i64::MAX);
	PaginationError::check(page, page_size, total_results)?;

	let offset = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
	let take = usize::try_from(page_size).unwrap_or(usize::MAX);
	let items: Vec<T> = results.into_iter().skip(offset).take(take).collect();

	paginate(
		items,
		total_results,
		page,
		page_size,
		message,
		status,
		status_code,
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde::ser::{Error as _, Serializer};

	struct Unserializable;

	impl Serialize for Unserializable {
		fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
			Err(S::Error::custom("refused"))
		}
	}

	#[rstest]
	fn test_respond_sets_status_and_content_type() {
		let response = respond(Some("hi"), Some("greeting"), "ok", StatusCode::CREATED).unwrap();
		assert_eq!(response.status, StatusCode::CREATED);
		assert_eq!(
			response.headers.get(CONTENT_TYPE).unwrap().to_str().unwrap(),
			APPLICATION_JSON
		);
		assert_eq!(
			response.json().unwrap(),
			json!({"status": "ok", "data": "hi", "message": "greeting"})
		);
	}

	#[rstest]
	fn test_respond_serialization_failure() {
		let result = respond(Some(Unserializable), None, "ok", StatusCode::OK);
		assert!(matches!(result, Err(ResponseError::Serialization(_))));
	}

	#[rstest]
	fn test_paginate_in_range() {
		let response = paginate(vec![1, 2, 3], 23, 3, 10, None, "ok", StatusCode::OK).unwrap();
		let json = response.json().unwrap();
		assert_eq!(json["items"], json!([1, 2, 3]));
		assert_eq!(json["totalPages"], 3);
		assert_eq!(json["hasNext"], false);
		assert_eq!(json["hasPrevious"], true);
	}

	#[rstest]
	fn test_paginate_past_last_page_returns_no_items() {
		let response = paginate(vec![1, 2], 20, 5, 10, None, "ok", StatusCode::OK).unwrap();
		let json = response.json().unwrap();
		assert_eq!(json["items"], json!([]));
		assert_eq!(json["currentPage"], 5);
		assert_eq!(json["totalPages"], 2);
	}

	#[rstest]
	fn test_paginate_empty_result_keeps_first_page() {
		let response = paginate(Vec::<i32>::new(), 0, 1, 10, None, "ok", StatusCode::OK).unwrap();
		let json = response.json().unwrap();
		assert_eq!(json["totalPages"], 0);
		assert_eq!(json["hasNext"], false);
	}

	#[rstest]
	#[case(0, 10, 5, Some(0), None, None)]
	#[case(1, 0, 5, None, Some(0), None)]
	#[case(-1, -1, -1, Some(-1), Some(-1), Some(-1))]
	fn test_paginate_rejects_invalid_parameters(
		#[case] page: i64,
		#[case] page_size: i64,
		#[case] total_results: i64,
		#[case] bad_page: Option<i64>,
		#[case] bad_page_size: Option<i64>,
		#[case] bad_total: Option<i64>,
	) {
		let result = paginate(
			Vec::<i32>::new(),
			total_results,
			page,
			page_size,
			None,
			"ok",
			StatusCode::OK,
		);
		let Err(ResponseError::Pagination(err)) = result else {
			panic!("Expected pagination error");
		};
		assert_eq!(err.page, bad_page);
		assert_eq!(err.page_size, bad_page_size);
		assert_eq!(err.total_results, bad_total);
	}

	#[rstest]
	fn test_pagination_error_into_response() {
		let error = PaginationError::check(0, 10, 1).unwrap_err();
		let response = JsonResponse::from(ResponseError::from(error));
		assert_eq!(response.status, StatusCode::BAD_REQUEST);
		let json = response.json().unwrap();
		assert_eq!(json["status"], "error");
		assert_eq!(json["message"], "Invalid pagination parameters");
		assert!(json["data"]["detail"].as_str().unwrap().contains("page must be >= 1"));
	}

	#[rstest]
	fn test_into_http_response() {
		let response = respond(Some(1), None, "ok", StatusCode::ACCEPTED)
			.unwrap()
			.into_http();
		assert_eq!(response.status(), StatusCode::ACCEPTED);
		assert_eq!(
			response.headers()[CONTENT_TYPE].to_str().unwrap(),
			APPLICATION_JSON
		);
		assert_eq!(
			response.body().as_ref(),
			br#"{"status":"ok","data":1,"message":null}"#
		);
	}

	#[rstest]
	#[case(None, 1, 10, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10])]
	#[case(Some(4), 2, 4, vec![5, 6, 7, 8])]
	#[case(Some(0), 3, 10, vec![21, 22, 23, 24, 25])]
	#[case(Some(-2), 1, 10, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10])]
	fn test_paginate_results_page_size(
		#[case] requested: Option<i64>,
		#[case] page: i64,
		#[case] page_size: i64,
		#[case] expected: Vec<i32>,
	) {
		let settings = PaginationSettings::default();
		let results: Vec<i32> = (1..=25).collect();

		let response =
			paginate_results(&settings, results, page, requested, None, "ok", StatusCode::OK)
				.unwrap();

		let json = response.json().unwrap();
		assert_eq!(json["items"], json!(expected));
		assert_eq!(json["pageSize"], page_size);
		assert_eq!(json["totalResults"], 25);
	}

	#[rstest]
	fn test_paginate_results_caps_at_max_page_size() {
		let settings = PaginationSettings {
			default_page_size: 5,
			max_page_size: 8,
		};
		let results: Vec<i32> = (1..=20).collect();

		let response =
			paginate_results(&settings, results, 1, Some(50), None, "ok", StatusCode::OK).unwrap();

		let json = response.json().unwrap();
		assert_eq!(json["pageSize"], 8);
		assert_eq!(json["totalPages"], 3);
		assert_eq!(json["items"].as_array().unwrap().len(), 8);
		assert_eq!(json["hasNext"], true);
	}

	#[rstest]
	fn test_paginate_results_past_last_page() {
		let settings = PaginationSettings::default();
		let results: Vec<i32> = (1..=25).collect();

		let response =
			paginate_results(&settings, results, 9, None, None, "ok", StatusCode::OK).unwrap();

		let json = response.json().unwrap();
		assert_eq!(json["items"], json!([]));
		assert_eq!(json["currentPage"], 9);
		assert_eq!(json["totalPages"], 3);
	}

	#[rstest]
	fn test_paginate_results_rejects_page_zero() {
		let settings = PaginationSettings::default();
		let result = paginate_results(&settings, vec![1], 0, None, None, "ok", StatusCode::OK);
		assert!(matches!(result, Err(ResponseError::Pagination(_))));
	}

	#[rstest]
	fn test_paginate_results_honors_env_override() {
		let settings = structbridge_conf::BridgeSettings::default()
			.apply_overrides([
				(structbridge_conf::ENV_DEFAULT_PAGE_SIZE.to_string(), "2".to_string()),
				(structbridge_conf::ENV_MAX_PAGE_SIZE.to_string(), "3".to_string()),
			])
			.unwrap();
		let results: Vec<i32> = (1..=7).collect();

		let response = paginate_results(
			&settings.pagination,
			results,
			2,
			Some(10),
			None,
			"ok",
			StatusCode::OK,
		)
		.unwrap();

		let json = response.json().unwrap();
		assert_eq!(json["items"], json!([4, 5, 6]));
		assert_eq!(json["totalPages"], 3);
	}
}
