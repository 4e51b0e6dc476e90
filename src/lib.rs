//! # structbridge
//!
//! Bridges compact record descriptors to OpenAPI schemas and wraps API
//! responses in uniform envelopes.
//!
//! ## Feature Flags
//!
//! - `minimal` - Descriptors, settings, and schema generation
//! - `full` (default) - Everything, including HTTP envelopes
//! - `openapi` - Schema converter and registry
//! - `http` - Response envelopes, pagination responses, body decoding
//!
//! ## Quick Example
//!
//! ```rust
//! use structbridge::prelude::*;
//!
//! let user = RecordDescriptor::new(
//!     TypeIdentity::new("app.User"),
//!     "User",
//!     vec![
//!         FieldDescriptor::new("id", TypeDescriptor::Scalar(ScalarKind::Int)),
//!         FieldDescriptor::new("email", TypeDescriptor::Scalar(ScalarKind::Str)),
//!     ],
//! )
//! .unwrap();
//!
//! let schema = schema_for(&user).unwrap();
//! assert_eq!(schema.name(), "UserSchema");
//!
//! assert!(validate_email_shape("user@example.com"));
//! let envelope = build_response(Some(1), None, STATUS_OK);
//! assert_eq!(envelope.status, "ok");
//! ```

pub use structbridge_conf as conf;
pub use structbridge_core::{descriptor, exception, pagination, validators};

#[cfg(feature = "http")]
pub use structbridge_http as http;
#[cfg(feature = "openapi")]
pub use structbridge_openapi as openapi;

pub use structbridge_conf::{BridgeSettings, SettingsError};
pub use structbridge_core::{
	FieldIntrospectionError, PaginationError, PaginationMetadata, ValidationError,
	validate_email_shape, validate_username_length,
};

#[cfg(feature = "http")]
pub use structbridge_http::{
	Envelope, JsonResponse, PaginatedEnvelope, RecordError, ResponseError,
	build_paginated_response, build_response, decode_body, paginate, paginate_results, respond,
};
#[cfg(feature = "openapi")]
pub use structbridge_openapi::{
	RecordSchema, SchemaError, SchemaRegistry, TargetType, as_body, envelope_schema,
	global_registry, paginated_envelope_schema, schema_for,
};

/// Commonly used types
pub mod prelude {
	pub use structbridge_conf::BridgeSettings;
	pub use structbridge_core::descriptor::{
		EnumDescriptor, FieldDescriptor, RecordDescriptor, RecordModifiers, RenamePolicy,
		ScalarKind, TemporalKind, TypeDescriptor, TypeIdentity,
	};
	pub use structbridge_core::validators::{
		EmailShapeValidator, UsernameLengthValidator, Validator, validate_email_shape,
		validate_username_length,
	};

	#[cfg(feature = "openapi")]
	pub use structbridge_openapi::{
		RecordSchema, SchemaError, SchemaRegistry, TargetType, as_body, schema_for,
	};

	#[cfg(feature = "http")]
	pub use structbridge_http::{
		Envelope, JsonResponse, PaginatedEnvelope, RecordError, STATUS_ERROR, STATUS_OK,
		StatusCode, build_paginated_response, build_response, decode_body, paginate,
		paginate_results, respond,
	};
}
