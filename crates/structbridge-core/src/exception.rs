//! Error types shared across structbridge crates

use crate::descriptor::TypeIdentity;
use thiserror::Error;

/// Malformed field metadata reported for a record
///
/// Signals a static definition error; callers propagate it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldIntrospectionError {
	#[error("Fields of record `{record}` were never defined")]
	Undefined { record: TypeIdentity },

	#[error("Fields of record `{record}` are already defined")]
	AlreadyDefined { record: TypeIdentity },

	#[error("Record `{record}` declares a field with an empty name")]
	EmptyName { record: TypeIdentity },

	#[error("Record `{record}` declares field `{field}` more than once")]
	DuplicateField { record: TypeIdentity, field: String },
}

/// Invalid pagination parameters
///
/// Carries every offending parameter, not only the first one found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PaginationError {
	pub page: Option<i64>,
	pub page_size: Option<i64>,
	pub total_results: Option<i64>,
	message: String,
}

impl PaginationError {
	/// Validate request pagination parameters
	///
	/// # Example
	///
	/// ```rust
	/// use structbridge_core::exception::PaginationError;
	///
	/// assert!(PaginationError::check(1, 10, 0).is_ok());
	///
	/// let err = PaginationError::check(0, 10, 5).unwrap_err();
	/// assert_eq!(err.page, Some(0));
	/// assert_eq!(err.to_string(), "Invalid pagination parameters: page must be >= 1, got 0");
	/// ```
	pub fn check(page: i64, page_size: i64, total_results: i64) -> Result<(), Self> {
		let mut issues = Vec::new();
		let mut error = Self {
			page: None,
			page_size: None,
			total_results: None,
			message: String::new(),
		};

		if page < 1 {
			issues.push(format!("page must be >= 1, got {}", page));
			error.page = Some(page);
		}
		if page_size < 1 {
			issues.push(format!("page_size must be >= 1, got {}", page_size));
			error.page_size = Some(page_size);
		}
		if total_results < 0 {
			issues.push(format!("total_results must be >= 0, got {}", total_results));
			error.total_results = Some(total_results);
		}

		if issues.is_empty() {
			return Ok(());
		}

		error.message = format!("Invalid pagination parameters: {}", issues.join("; "));
		Err(error)
	}
}
