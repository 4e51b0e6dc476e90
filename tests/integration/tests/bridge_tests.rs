//! End-to-end bridge tests
//!
//! A record is described once, turned into a component schema, referenced
//! from a response envelope schema, and served through a JSON response.

use rstest::*;
use serde_json::json;
use structbridge::openapi::openapi::component_ref;
use structbridge::prelude::*;
use structbridge::{envelope_schema, paginated_envelope_schema};
use structbridge_integration_tests::{blog_graph, settings};

#[rstest]
fn test_record_schema_feeds_envelope_schema() {
	let registry = SchemaRegistry::new();
	let (article, _) = blog_graph();
	let schema = registry.get_or_create(&article).unwrap();
	assert_eq!(schema.name(), "ArticleSchema");

	let components = serde_json::to_value(registry.to_components()).unwrap();
	let schemas = components["schemas"].as_object().unwrap();
	assert!(schemas.contains_key("ArticleSchema"));
	assert!(schemas.contains_key("AuthorSchema"));
	assert_eq!(
		schemas["AuthorSchema"]["properties"]["articles"]["items"]["$ref"],
		"#/components/schemas/ArticleSchema"
	);

	let envelope = serde_json::to_value(envelope_schema(component_ref(schema.name()))).unwrap();
	assert_eq!(envelope["properties"]["status"]["type"], "string");
	let page =
		serde_json::to_value(paginated_envelope_schema(component_ref(schema.name()))).unwrap();
	assert_eq!(
		page["properties"]["items"]["items"]["$ref"],
		"#/components/schemas/ArticleSchema"
	);
}

#[rstest]
fn test_validated_body_served_in_envelope() {
	let body = br#"{"username": "writer", "email": "writer@example.com"}"#;
	let payload: serde_json::Value = decode_body(body).unwrap();

	let username = payload["username"].as_str().unwrap();
	let email = payload["email"].as_str().unwrap();
	assert!(UsernameLengthValidator::default().validate(username).is_ok());
	assert!(validate_email_shape(email));

	let response = respond(Some(payload.clone()), None, STATUS_OK, StatusCode::OK).unwrap();
	assert_eq!(response.status, StatusCode::OK);
	assert_eq!(
		response.json().unwrap(),
		json!({"status": "ok", "data": payload, "message": null})
	);
}

#[rstest]
fn test_paginated_listing() {
	let response = paginate(
		vec![json!({"id": 1}), json!({"id": 2})],
		5,
		1,
		2,
		Some("Articles"),
		STATUS_OK,
		StatusCode::OK,
	)
	.unwrap();

	let json = response.json().unwrap();
	assert_eq!(json["totalPages"], 3);
	assert_eq!(json["hasNext"], true);
	assert_eq!(json["hasPrevious"], false);
	assert_eq!(json["items"].as_array().unwrap().len(), 2);
}

#[rstest]
fn test_settings_drive_schema_names_and_page_size() {
	let settings = settings(
		r#"
		[schema]
		name_suffix = "Model"

		[pagination]
		default_page_size = 2
		max_page_size = 4
		"#,
	)
	.unwrap();
	let (article, author) = blog_graph();

	let registry = SchemaRegistry::with_settings(settings.schema.clone());
	let schema = registry.get_or_create(&article).unwrap();
	assert_eq!(schema.name(), "ArticleModel");
	assert_eq!(
		registry.lookup(author.identity()).unwrap().name(),
		"AuthorModel"
	);

	let rows: Vec<_> = (1..=9).map(|id| json!({"id": id})).collect();
	let response = paginate_results(
		&settings.pagination,
		rows,
		2,
		Some(100),
		None,
		STATUS_OK,
		StatusCode::OK,
	)
	.unwrap();

	let json = response.json().unwrap();
	assert_eq!(json["pageSize"], 4);
	assert_eq!(json["totalPages"], 3);
	assert_eq!(json["items"], json!([{"id": 5}, {"id": 6}, {"id": 7}, {"id": 8}]));
}
