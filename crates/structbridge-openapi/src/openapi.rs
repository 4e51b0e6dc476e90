//! OpenAPI 3.1 types
//!
//! Re-exports utoipa's OpenAPI types and adds shorthand constructors for the
//! primitive schemas the converter produces.

pub use utoipa::openapi::schema::{
	AdditionalProperties, Array, ArrayBuilder, KnownFormat, Object, ObjectBuilder, OneOf,
	OneOfBuilder, SchemaFormat, SchemaType, Type,
};
pub use utoipa::openapi::{Components, ComponentsBuilder, Ref, RefOr, Schema};

/// Location prefix of component schema references
pub const COMPONENTS_SCHEMAS_PREFIX: &str = "#/components/schemas/";

/// Shorthand constructors for common schemas
pub trait SchemaExt {
	fn integer() -> Self;
	fn string() -> Self;
	fn number() -> Self;
	fn boolean() -> Self;
	/// A schema accepting `null` only
	fn null() -> Self;
	/// A schema with no type constraint
	fn any() -> Self;
	fn object() -> Self;
	/// A string carrying a `format` such as `date-time` or `uuid`
	fn formatted(schema_type: Type, format: &str) -> Self;
	fn array(items: RefOr<Schema>) -> Self;
	/// `oneOf [inner, null]`
	fn nullable(inner: RefOr<Schema>) -> Self;
}

impl SchemaExt for Schema {
	fn integer() -> Self {
		typed(Type::Integer)
	}

	fn string() -> Self {
		typed(Type::String)
	}

	fn number() -> Self {
		typed(Type::Number)
	}

	fn boolean() -> Self {
		typed(Type::Boolean)
	}

	fn null() -> Self {
		typed(Type::Null)
	}

	fn any() -> Self {
		Schema::Object(ObjectBuilder::new().schema_type(SchemaType::AnyValue).build())
	}

	fn object() -> Self {
		typed(Type::Object)
	}

	fn formatted(schema_type: Type, format: &str) -> Self {
		Schema::Object(
			ObjectBuilder::new()
				.schema_type(SchemaType::Type(schema_type))
				.format(Some(SchemaFormat::Custom(format.to_string())))
				.build(),
		)
	}

	fn array(items: RefOr<Schema>) -> Self {
		Schema::Array(ArrayBuilder::new().items(items).build())
	}

	fn nullable(inner: RefOr<Schema>) -> Self {
		Schema::OneOf(
			OneOfBuilder::new()
				.item(inner)
				.item(Schema::null())
				.build(),
		)
	}
}

fn typed(schema_type: Type) -> Schema {
	Schema::Object(
		ObjectBuilder::new()
			.schema_type(SchemaType::Type(schema_type))
			.build(),
	)
}

/// `$ref` to a schema registered under `components/schemas`
pub fn component_ref(name: &str) -> RefOr<Schema> {
	RefOr::Ref(Ref::new(format!("{}{}", COMPONENTS_SCHEMAS_PREFIX, name)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_formatted_schema_json() {
		let schema = Schema::formatted(Type::String, "uuid");
		let json = serde_json::to_value(&schema).unwrap();
		assert_eq!(json["type"], "string");
		assert_eq!(json["format"], "uuid");
	}

	#[rstest]
	fn test_nullable_schema_json() {
		let schema = Schema::nullable(RefOr::T(Schema::string()));
		let json = serde_json::to_value(&schema).unwrap();
		let members = json["oneOf"].as_array().unwrap();
		assert_eq!(members.len(), 2);
		assert_eq!(members[0]["type"], "string");
		assert_eq!(members[1]["type"], "null");
	}

	#[rstest]
	fn test_component_ref() {
		match component_ref("UserSchema") {
			RefOr::Ref(reference) => {
				assert_eq!(reference.ref_location, "#/components/schemas/UserSchema");
			}
			_ => panic!("Expected Ref variant"),
		}
	}
}
