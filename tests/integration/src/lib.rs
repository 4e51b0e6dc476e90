//! Integration test utilities for structbridge
//!
//! Shared record graphs and settings used by the cross-crate scenarios under
//! `integration/tests/`.

use serde_json::json;
use std::sync::Arc;
use structbridge::prelude::*;
use structbridge_conf::SettingsResult;

/// `Article <-> Author` graph; `Author.articles` points back at `Article`
pub fn blog_graph() -> (Arc<RecordDescriptor>, Arc<RecordDescriptor>) {
	let author = RecordDescriptor::declare(TypeIdentity::new("blog.Author"), "Author");
	let article = RecordDescriptor::new(
		TypeIdentity::new("blog.Article"),
		"Article",
		vec![
			FieldDescriptor::new("id", TypeDescriptor::Scalar(ScalarKind::Int)),
			FieldDescriptor::new("title", TypeDescriptor::Scalar(ScalarKind::Str)),
			FieldDescriptor::new("author", TypeDescriptor::record(&author)),
		],
	)
	.expect("article fields are distinct");
	author
		.define_fields(vec![
			FieldDescriptor::new("name", TypeDescriptor::Scalar(ScalarKind::Str)),
			FieldDescriptor::new(
				"articles",
				TypeDescriptor::list(TypeDescriptor::record(&article)),
			)
			.with_default(json!([])),
		])
		.expect("author fields are defined once");
	(article, author)
}

/// Settings parsed from an inline TOML document
pub fn settings(source: &str) -> SettingsResult<BridgeSettings> {
	BridgeSettings::from_toml_str(source)
}
