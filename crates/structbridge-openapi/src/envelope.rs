//! Documentation schemas of the response envelopes
//!
//! Property names follow the wire format: `status`/`data`/`message` for the
//! single envelope, camelCase pagination keys for the paginated one.

use crate::openapi::{ObjectBuilder, RefOr, Schema, SchemaExt, SchemaFormat, SchemaType, Type};
use serde_json::json;

/// Default value of the `status` property
pub const DEFAULT_STATUS: &str = "ok";

fn status_property() -> Schema {
	Schema::Object(
		ObjectBuilder::new()
			.schema_type(SchemaType::Type(Type::String))
			.default(Some(json!(DEFAULT_STATUS)))
			.build(),
	)
}

fn count_property() -> Schema {
	Schema::Object(
		ObjectBuilder::new()
			.schema_type(SchemaType::Type(Type::Integer))
			.format(Some(SchemaFormat::Custom("int64".to_string())))
			.build(),
	)
}

/// Schema of `{"status", "data", "message"}` wrapping `data`
///
/// # Example
///
/// ```rust
/// use structbridge_openapi::envelope::envelope_schema;
/// use structbridge_openapi::openapi::{component_ref, Schema};
///
/// let schema = envelope_schema(component_ref("UserSchema"));
/// let json = serde_json::to_value(&schema).unwrap();
/// assert_eq!(json["properties"]["status"]["default"], "ok");
/// ```
pub fn envelope_schema(data: RefOr<Schema>) -> Schema {
	Schema::Object(
		ObjectBuilder::new()
			.schema_type(SchemaType::Type(Type::Object))
			.property("status", status_property())
			.property("data", Schema::nullable(data))
			.property("message", Schema::nullable(RefOr::T(Schema::string())))
			.build(),
	)
}

/// Schema of the paginated envelope with `items` of type `item`
pub fn paginated_envelope_schema(item: RefOr<Schema>) -> Schema {
	let required = [
		"items",
		"currentPage",
		"totalPages",
		"totalResults",
		"pageSize",
		"hasNext",
		"hasPrevious",
	];

	let builder = ObjectBuilder::new()
		.schema_type(SchemaType::Type(Type::Object))
		.property("items", Schema::array(item))
		.property("currentPage", count_property())
		.property("totalPages", count_property())
		.property("totalResults", count_property())
		.property("pageSize", count_property())
		.property("hasNext", Schema::boolean())
		.property("hasPrevious", Schema::boolean())
		.property("status", status_property())
		.property("message", Schema::nullable(RefOr::T(Schema::string())));

	Schema::Object(
		required
			.into_iter()
			.fold(builder, |builder, name| builder.required(name))
			.build(),
	)
}
