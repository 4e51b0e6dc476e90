//! # structbridge core
//!
//! Building blocks shared by the schema bridge:
//!
//! - **descriptor**: immutable type descriptors produced by record introspection
//! - **pagination**: closed-form page-number pagination metadata
//! - **validators**: email-shape and username-length checks
//! - **exception**: errors raised for malformed definitions and bad parameters
//!
//! ## Example
//!
//! ```rust
//! use structbridge_core::pagination::PaginationMetadata;
//! use structbridge_core::validators::validate_email_shape;
//!
//! assert!(validate_email_shape("user@example.com"));
//! assert_eq!(PaginationMetadata::compute(95, 10, 10).total_pages, 10);
//! ```

pub mod descriptor;
pub mod exception;
pub mod pagination;
pub mod validators;

pub use descriptor::{
	DefaultFactory, EnumDescriptor, FieldDefault, FieldDescriptor, MetadataDescriptor,
	RecordDescriptor, RecordModifiers, RenamePolicy, ScalarKind, TemporalKind, TypeDescriptor,
	TypeIdentity,
};
pub use exception::{FieldIntrospectionError, PaginationError};
pub use pagination::PaginationMetadata;
pub use validators::{
	EmailShapeValidator, UsernameLengthValidator, ValidationError, ValidationResult, Validator,
	validate_email_shape, validate_username_length,
};
