use structbridge_core::descriptor::TypeIdentity;
use structbridge_core::exception::FieldIntrospectionError;
use thiserror::Error;

/// Errors raised while building record schemas
///
/// Unsupported type kinds are not errors: they degrade to an unconstrained
/// schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
	/// Malformed field metadata, passed through unchanged
	#[error(transparent)]
	FieldIntrospection(#[from] FieldIntrospectionError),

	/// A record schema was requested while its construction is still pending.
	/// Indicates a bug in the registry or a custom resolver.
	#[error("Schema for record `{record}` is still under construction")]
	CycleUnresolved { record: TypeIdentity },
}

pub type SchemaResult<T> = Result<T, SchemaError>;
