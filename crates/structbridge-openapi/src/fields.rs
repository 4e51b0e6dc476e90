//! Record field processing
//!
//! Turns a record's field descriptors into ordered [`FieldDefinition`]s:
//! converted type, resolved default, and optional documentation.

use crate::converter::{TargetType, TypeConverter};
use crate::error::SchemaResult;
use crate::openapi::{RefOr, Schema};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use structbridge_core::descriptor::{
	FieldDefault, FieldDescriptor, RecordDescriptor, TypeDescriptor,
};
use structbridge_core::exception::FieldIntrospectionError;

/// Maps a source field name to the name surfaced in the schema
pub type FieldRenamer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Default of a processed field
///
/// `Required` means "no default"; it is distinct from a `null` default,
/// which is `Value(Value::Null)`.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
	Required,
	Value(Value),
}

impl DefaultValue {
	pub fn is_required(&self) -> bool {
		matches!(self, DefaultValue::Required)
	}

	pub fn value(&self) -> Option<&Value> {
		match self {
			DefaultValue::Required => None,
			DefaultValue::Value(value) => Some(value),
		}
	}
}

/// Documentation copied from a metadata wrapper
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDocs {
	pub description: Option<String>,
	pub examples: Option<Vec<Value>>,
}

/// A processed record field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
	/// Surfaced name
	pub name: String,
	/// Name declared on the record
	pub source_name: String,
	pub ty: TargetType,
	pub default: DefaultValue,
	pub docs: Option<FieldDocs>,
}

impl FieldDefinition {
	pub fn is_required(&self) -> bool {
		self.default.is_required()
	}

	/// Property schema with the default and docs applied
	pub fn to_schema(&self) -> RefOr<Schema> {
		let description = self.docs.as_ref().and_then(|docs| docs.description.clone());
		let examples = self.docs.as_ref().and_then(|docs| docs.examples.clone());
		let default = self.default.value().cloned();

		match self.ty.to_schema() {
			RefOr::T(Schema::Object(mut object)) => {
				object.description = description.or(object.description);
				object.default = default.or(object.default);
				if let Some(examples) = examples {
					object.examples = examples;
				}
				RefOr::T(Schema::Object(object))
			}
			RefOr::T(Schema::Array(mut array)) => {
				array.description = description.or(array.description);
				array.default = default.or(array.default);
				if let Some(examples) = examples {
					array.examples = examples;
				}
				RefOr::T(Schema::Array(array))
			}
			RefOr::T(Schema::OneOf(mut one_of)) => {
				one_of.description = description.or(one_of.description);
				one_of.default = default.or(one_of.default);
				if let Some(examples) = examples {
					one_of.examples = examples;
				}
				RefOr::T(Schema::OneOf(one_of))
			}
			RefOr::Ref(mut reference) => {
				if let Some(description) = description {
					reference.description = description;
				}
				RefOr::Ref(reference)
			}
			other => other,
		}
	}
}

/// Processes the fields of one record
pub struct FieldProcessor<'a> {
	converter: TypeConverter<'a>,
	renamer: Option<FieldRenamer>,
}

impl<'a> FieldProcessor<'a> {
	pub fn new(converter: TypeConverter<'a>) -> Self {
		Self {
			converter,
			renamer: None,
		}
	}

	pub fn with_renamer(mut self, renamer: Option<FieldRenamer>) -> Self {
		self.renamer = renamer;
		self
	}

	/// Process every field in declaration order
	///
	/// Fails with the introspection error when the record's fields are not
	/// defined, or when two fields surface under the same name.
	pub fn process(
		&self,
		record: &RecordDescriptor,
	) -> SchemaResult<IndexMap<String, FieldDefinition>> {
		let fields = record.fields()?;
		let mut definitions = IndexMap::with_capacity(fields.len());

		for field in fields {
			let definition = self.process_field(field)?;
			if definitions.contains_key(&definition.name) {
				return Err(FieldIntrospectionError::DuplicateField {
					record: record.identity().clone(),
					field: definition.name,
				}
				.into());
			}
			definitions.insert(definition.name.clone(), definition);
		}

		Ok(definitions)
	}

	fn process_field(&self, field: &FieldDescriptor) -> SchemaResult<FieldDefinition> {
		let name = match &self.renamer {
			Some(renamer) => renamer(&field.name),
			None => field.name.clone(),
		};

		Ok(FieldDefinition {
			name,
			source_name: field.name.clone(),
			ty: self.converter.convert(&field.ty)?,
			default: resolve_default(&field.default),
			docs: extract_docs(&field.ty),
		})
	}
}

fn resolve_default(default: &FieldDefault) -> DefaultValue {
	match default {
		FieldDefault::Literal(value) => DefaultValue::Value(value.clone()),
		FieldDefault::Factory(factory) => DefaultValue::Value(factory.produce()),
		FieldDefault::NoDefault => DefaultValue::Required,
	}
}

fn extract_docs(ty: &TypeDescriptor) -> Option<FieldDocs> {
	let TypeDescriptor::Metadata(metadata) = ty else {
		return None;
	};
	if metadata.description.is_none() && metadata.examples.is_none() {
		return None;
	}
	Some(FieldDocs {
		description: metadata.description.clone(),
		examples: metadata.examples.clone(),
	})
}
