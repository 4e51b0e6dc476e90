//! Request body decoding errors
//!
//! Body decoding failures are always answered with an error envelope, never
//! propagated as a fault: malformed JSON becomes a 400, well-formed JSON with
//! the wrong shape becomes a 422.

use crate::envelope::Envelope;
use crate::response::JsonResponse;
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use serde_json::{Value, json};
use structbridge_core::validators::ValidationError;
use thiserror::Error;

/// Failure to turn a request body into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
	/// Well-formed JSON that does not match the record
	#[error("Validation error: {0}")]
	Validation(String),

	/// Body that is not JSON at all
	#[error("Invalid JSON: {0}")]
	Decode(String),
}

impl RecordError {
	/// Classify a `serde_json` failure
	pub fn from_json_error(error: &serde_json::Error) -> Self {
		match error.classify() {
			Category::Data => RecordError::Validation(error.to_string()),
			_ => RecordError::Decode(error.to_string()),
		}
	}

	pub fn status_code(&self) -> StatusCode {
		match self {
			RecordError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
			RecordError::Decode(_) => StatusCode::BAD_REQUEST,
		}
	}

	/// Error envelope describing this failure
	///
	/// # Example
	///
	/// ```rust
	/// use serde_json::json;
	/// use structbridge_http::RecordError;
	///
	/// let envelope = RecordError::Decode("expected value".to_string()).envelope();
	/// assert_eq!(envelope.status, "error");
	/// assert_eq!(envelope.data, Some(json!({"detail": "Invalid JSON: expected value"})));
	/// assert_eq!(envelope.message.as_deref(), Some("Invalid JSON format"));
	/// ```
	pub fn envelope(&self) -> Envelope<Value> {
		match self {
			RecordError::Validation(msg) => Envelope::error(
				Some(json!({
					"detail": [{
						"loc": ["body"],
						"msg": msg,
						"type": "validation_error",
					}]
				})),
				"Validation error",
			),
			RecordError::Decode(msg) => Envelope::error(
				Some(json!({ "detail": format!("Invalid JSON: {}", msg) })),
				"Invalid JSON format",
			),
		}
	}

	pub fn into_response(self) -> JsonResponse {
		JsonResponse::from(self)
	}
}

impl From<serde_json::Error> for RecordError {
	fn from(error: serde_json::Error) -> Self {
		Self::from_json_error(&error)
	}
}

// Field validators run after decoding, so their failures are validation errors
impl From<ValidationError> for RecordError {
	fn from(error: ValidationError) -> Self {
		RecordError::Validation(error.to_string())
	}
}

impl From<RecordError> for JsonResponse {
	fn from(error: RecordError) -> Self {
		JsonResponse::new(error.status_code())
			.with_json(&error.envelope())
			.unwrap_or_else(|_| JsonResponse::internal_server_error())
	}
}

/// Decode a JSON request body into `T`
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use structbridge_http::{RecordError, decode_body};
///
/// #[derive(Debug, Deserialize)]
/// struct Login {
///     username: String,
/// }
///
/// let login: Login = decode_body(br#"{"username": "alice"}"#).unwrap();
/// assert_eq!(login.username, "alice");
///
/// let err = decode_body::<Login>(br#"{"username": 5}"#).unwrap_err();
/// assert!(matches!(err, RecordError::Validation(_)));
/// ```
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, RecordError> {
	serde_json::from_slice(body).map_err(|e| {
		let error = RecordError::from_json_error(&e);
		tracing::debug!(error = %error, "Rejected request body");
		error
	})
}
