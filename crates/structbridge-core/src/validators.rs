//! Lightweight syntactic validators
//!
//! Pure, lock-free checks meant for the request path. The free functions
//! answer yes/no; the [`Validator`] implementations report why a value was
//! rejected.

use thiserror::Error;

/// Default minimum username length (inclusive)
pub const USERNAME_MIN_LENGTH: usize = 3;
/// Default maximum username length (inclusive)
pub const USERNAME_MAX_LENGTH: usize = 50;

const EMAIL_MIN_LENGTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	#[error("Value too short: length {length}, minimum {min}")]
	TooShort { length: usize, min: usize },

	#[error("Value too long: length {length}, maximum {max}")]
	TooLong { length: usize, max: usize },

	#[error("Invalid email shape: {0}")]
	InvalidEmail(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validators
pub trait Validator<T: ?Sized> {
	fn validate(&self, value: &T) -> ValidationResult<()>;
}

/// Check the rough shape of an email address
///
/// Accepts when the string has at least 5 characters, exactly one `@` that
/// is neither first nor last, and a `.` somewhere after the `@` that is not
/// the final character. This is not RFC 5322 validation: `user@.com` passes.
///
/// # Examples
///
/// ```
/// use structbridge_core::validators::validate_email_shape;
///
/// assert!(validate_email_shape("user@example.com"));
/// assert!(validate_email_shape("user@.com"));
/// assert!(!validate_email_shape("user@com"));
/// assert!(!validate_email_shape("user@@x.com"));
/// ```
pub fn validate_email_shape(email: &str) -> bool {
	// Byte length bounds the character count from above
	if email.len() < EMAIL_MIN_LENGTH {
		return false;
	}
	if !email.is_ascii() && email.chars().count() < EMAIL_MIN_LENGTH {
		return false;
	}

	// `@` and `.` are ASCII, so byte positions agree with character positions
	// for the first/last checks below.
	let bytes = email.as_bytes();
	let mut at = None;
	for (index, &byte) in bytes.iter().enumerate() {
		if byte == b'@' {
			if at.is_some() {
				return false;
			}
			at = Some(index);
		}
	}

	let Some(at) = at else {
		return false;
	};
	let last = bytes.len() - 1;
	if at == 0 || at == last {
		return false;
	}

	bytes[at + 1..last].contains(&b'.')
}

/// Check `min <= chars(username) <= max`
///
/// # Examples
///
/// ```
/// use structbridge_core::validators::validate_username_length;
///
/// assert!(validate_username_length("bob", 3, 50));
/// assert!(!validate_username_length("al", 3, 50));
/// ```
pub fn validate_username_length(username: &str, min: usize, max: usize) -> bool {
	let length = username.chars().count();
	min <= length && length <= max
}

/// [`validate_email_shape`] as a [`Validator`]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailShapeValidator;

impl EmailShapeValidator {
	pub fn new() -> Self {
		Self
	}
}

impl Validator<str> for EmailShapeValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		if validate_email_shape(value) {
			Ok(())
		} else {
			Err(ValidationError::InvalidEmail(value.to_string()))
		}
	}
}

impl Validator<String> for EmailShapeValidator {
	fn validate(&self, value: &String) -> ValidationResult<()> {
		Validator::<str>::validate(self, value.as_str())
	}
}

/// Inclusive length bounds for usernames, counted in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsernameLengthValidator {
	min: usize,
	max: usize,
}

impl UsernameLengthValidator {
	/// Creates a validator with explicit bounds.
	///
	/// # Examples
	///
	/// ```
	/// use structbridge_core::validators::{UsernameLengthValidator, Validator};
	///
	/// let validator = UsernameLengthValidator::new(2, 4);
	/// assert!(validator.validate("abc").is_ok());
	/// assert!(validator.validate("abcde").is_err());
	/// ```
	pub fn new(min: usize, max: usize) -> Self {
		Self { min, max }
	}

	pub fn min(&self) -> usize {
		self.min
	}

	pub fn max(&self) -> usize {
		self.max
	}
}

impl Default for UsernameLengthValidator {
	fn default() -> Self {
		Self::new(USERNAME_MIN_LENGTH, USERNAME_MAX_LENGTH)
	}
}

impl Validator<str> for UsernameLengthValidator {
	fn validate(&self, value: &str) -> ValidationResult<()> {
		let length = value.chars().count();
		if length < self.min {
			Err(ValidationError::TooShort {
				length,
				min: self.min,
			})
		} else if length > self.max {
			Err(ValidationError::TooLong {
				length,
				max: self.max,
			})
		} else {
			Ok(())
		}
	}
}

impl Validator<String> for UsernameLengthValidator {
	fn validate(&self, value: &String) -> ValidationResult<()> {
		Validator::<str>::validate(self, value.as_str())
	}
}
