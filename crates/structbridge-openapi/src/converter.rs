//! Type descriptor conversion
//!
//! [`TypeConverter`] maps a [`TypeDescriptor`] onto a [`TargetType`], the
//! schema-side representation that renders to an OpenAPI schema. Record
//! references are handed to a [`RecordResolver`] so the converter itself holds
//! no registry state.
//!
//! Conversion is total over the descriptor language: kinds without a mapping
//! degrade to [`TargetType::Any`] instead of failing.

use crate::error::SchemaResult;
use crate::openapi::{
	ArrayBuilder, COMPONENTS_SCHEMAS_PREFIX, ObjectBuilder, OneOfBuilder, RefOr, Schema,
	SchemaExt, SchemaType, Type, component_ref,
};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use structbridge_core::descriptor::{
	EnumDescriptor, RecordDescriptor, ScalarKind, TypeDescriptor,
};

/// Prebuilt schema for one scalar kind
///
/// Instances are shared through [`ScalarCache`]; every field of the same
/// kind points at the same allocation.
#[derive(Debug, PartialEq)]
pub struct ScalarType {
	kind: ScalarKind,
	schema: Schema,
}

impl ScalarType {
	fn new(kind: ScalarKind) -> Self {
		let schema = match kind {
			ScalarKind::Int => Schema::formatted(Type::Integer, "int64"),
			ScalarKind::Str => Schema::string(),
			ScalarKind::Float => Schema::formatted(Type::Number, "double"),
			ScalarKind::Bool => Schema::boolean(),
			ScalarKind::Bytes | ScalarKind::ByteArray => Schema::formatted(Type::String, "binary"),
			ScalarKind::Decimal => Schema::formatted(Type::String, "decimal"),
			ScalarKind::DateTime => Schema::formatted(Type::String, "date-time"),
			ScalarKind::Date => Schema::formatted(Type::String, "date"),
			ScalarKind::Time => Schema::formatted(Type::String, "time"),
			ScalarKind::TimeDelta => Schema::formatted(Type::String, "duration"),
			ScalarKind::Uuid => Schema::formatted(Type::String, "uuid"),
		};
		Self { kind, schema }
	}

	pub fn kind(&self) -> ScalarKind {
		self.kind
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}
}

/// Process-wide cache of scalar schemas, one entry per [`ScalarKind`]
#[derive(Debug, Default)]
pub struct ScalarCache {
	entries: RwLock<HashMap<ScalarKind, Arc<ScalarType>>>,
}

impl ScalarCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Shared scalar type for `kind`, created on first use
	///
	/// # Example
	///
	/// ```rust
	/// use std::sync::Arc;
	/// use structbridge_core::descriptor::ScalarKind;
	/// use structbridge_openapi::converter::ScalarCache;
	///
	/// let cache = ScalarCache::new();
	/// let first = cache.get(ScalarKind::Uuid);
	/// let second = cache.get(ScalarKind::Uuid);
	/// assert!(Arc::ptr_eq(&first, &second));
	/// ```
	pub fn get(&self, kind: ScalarKind) -> Arc<ScalarType> {
		if let Some(hit) = self.entries.read().get(&kind) {
			return Arc::clone(hit);
		}

		let mut entries = self.entries.write();
		Arc::clone(
			entries
				.entry(kind)
				.or_insert_with(|| Arc::new(ScalarType::new(kind))),
		)
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

/// Handle to a record schema held by a registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaRef {
	index: usize,
	name: Arc<str>,
}

impl SchemaRef {
	pub fn new(index: usize, name: impl Into<Arc<str>>) -> Self {
		Self {
			index,
			name: name.into(),
		}
	}

	/// Slot of the schema in its registry
	pub fn index(&self) -> usize {
		self.index
	}

	/// Component name of the schema
	pub fn name(&self) -> &str {
		&self.name
	}

	/// `#/components/schemas/{name}`
	pub fn location(&self) -> String {
		format!("{}{}", COMPONENTS_SCHEMAS_PREFIX, self.name)
	}

	pub fn to_schema(&self) -> RefOr<Schema> {
		component_ref(&self.name)
	}
}

impl fmt::Display for SchemaRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}

/// Schema-side representation of a field type
#[derive(Debug, Clone, PartialEq)]
pub enum TargetType {
	/// Unconstrained
	Any,
	Null,
	Scalar(Arc<ScalarType>),
	List(Box<TargetType>),
	Set(Box<TargetType>),
	Dict {
		key: Box<TargetType>,
		value: Box<TargetType>,
	},
	/// Fixed-length heterogeneous sequence
	Tuple(Vec<TargetType>),
	Optional(Box<TargetType>),
	Union(Vec<TargetType>),
	/// Reference to another record's schema
	Record(SchemaRef),
	/// Enumeration passed through unchanged
	Enum(Arc<EnumDescriptor>),
}

impl TargetType {
	pub fn is_optional(&self) -> bool {
		matches!(self, TargetType::Optional(_))
	}

	/// Render as an OpenAPI schema; records render as `$ref`
	pub fn to_schema(&self) -> RefOr<Schema> {
		match self {
			TargetType::Any => RefOr::T(Schema::any()),
			TargetType::Null => RefOr::T(Schema::null()),
			TargetType::Scalar(scalar) => RefOr::T(scalar.schema().clone()),
			TargetType::List(item) => RefOr::T(Schema::array(item.to_schema())),
			TargetType::Set(item) => RefOr::T(Schema::Array(
				ArrayBuilder::new()
					.items(item.to_schema())
					.unique_items(true)
					.build(),
			)),
			TargetType::Dict { value, .. } => RefOr::T(Schema::Object(
				ObjectBuilder::new()
					.schema_type(SchemaType::Type(Type::Object))
					.additional_properties(Some(value.to_schema()))
					.build(),
			)),
			TargetType::Tuple(items) => RefOr::T(tuple_schema(items)),
			TargetType::Optional(inner) => RefOr::T(Schema::nullable(inner.to_schema())),
			TargetType::Union(members) => {
				let one_of = members
					.iter()
					.fold(OneOfBuilder::new(), |builder, member| {
						builder.item(member.to_schema())
					});
				RefOr::T(Schema::OneOf(one_of.build()))
			}
			TargetType::Record(reference) => reference.to_schema(),
			TargetType::Enum(descriptor) => RefOr::T(enum_schema(descriptor)),
		}
	}
}

fn tuple_schema(items: &[TargetType]) -> Schema {
	let mut distinct: Vec<&TargetType> = Vec::with_capacity(items.len());
	for item in items {
		if !distinct.contains(&item) {
			distinct.push(item);
		}
	}

	let item_schema = match distinct.as_slice() {
		[] => RefOr::T(Schema::any()),
		[single] => single.to_schema(),
		many => RefOr::T(Schema::OneOf(
			many.iter()
				.fold(OneOfBuilder::new(), |builder, item| builder.item(item.to_schema()))
				.build(),
		)),
	};

	Schema::Array(
		ArrayBuilder::new()
			.items(item_schema)
			.min_items(Some(items.len()))
			.max_items(Some(items.len()))
			.build(),
	)
}

fn enum_schema(descriptor: &EnumDescriptor) -> Schema {
	let values = descriptor.values();
	let schema_type = if !values.is_empty() && values.iter().all(Value::is_string) {
		SchemaType::Type(Type::String)
	} else if !values.is_empty() && values.iter().all(|v| v.is_i64() || v.is_u64()) {
		SchemaType::Type(Type::Integer)
	} else {
		SchemaType::AnyValue
	};

	Schema::Object(
		ObjectBuilder::new()
			.schema_type(schema_type)
			.title(Some(descriptor.name()))
			.enum_values(Some(values.iter().cloned()))
			.build(),
	)
}

/// Resolves record descriptors to schema references
///
/// Implemented by [`crate::registry::SchemaRegistry`]. Resolution may recurse
/// back into [`TypeConverter::convert`] for the record's own fields.
pub trait RecordResolver {
	fn resolve(&self, record: &Arc<RecordDescriptor>) -> SchemaResult<SchemaRef>;
}

/// Converts type descriptors into [`TargetType`]s
pub struct TypeConverter<'a> {
	resolver: &'a dyn RecordResolver,
	scalars: &'a ScalarCache,
}

impl<'a> TypeConverter<'a> {
	pub fn new(resolver: &'a dyn RecordResolver, scalars: &'a ScalarCache) -> Self {
		Self { resolver, scalars }
	}

	/// Convert a descriptor
	///
	/// Only record resolution can fail; every other kind converts or degrades
	/// to [`TargetType::Any`].
	pub fn convert(&self, ty: &TypeDescriptor) -> SchemaResult<TargetType> {
		let target = match ty {
			TypeDescriptor::None => TargetType::Null,
			TypeDescriptor::Any => TargetType::Any,
			TypeDescriptor::Scalar(kind) => TargetType::Scalar(self.scalars.get(*kind)),
			TypeDescriptor::Temporal(kind) => {
				TargetType::Scalar(self.scalars.get(kind.scalar_kind()))
			}
			TypeDescriptor::List(item) => TargetType::List(Box::new(self.convert(item)?)),
			TypeDescriptor::Set(item) => TargetType::Set(Box::new(self.convert(item)?)),
			TypeDescriptor::Dict { key, value } => TargetType::Dict {
				key: Box::new(self.convert(key)?),
				value: Box::new(self.convert(value)?),
			},
			TypeDescriptor::Tuple(items) => TargetType::Tuple(
				items
					.iter()
					.map(|item| self.convert(item))
					.collect::<SchemaResult<_>>()?,
			),
			TypeDescriptor::Union(members) => self.convert_union(members)?,
			TypeDescriptor::Record(record) => TargetType::Record(self.resolver.resolve(record)?),
			TypeDescriptor::Enum(descriptor) => TargetType::Enum(Arc::clone(descriptor)),
			TypeDescriptor::Metadata(metadata) => self.convert(&metadata.inner)?,
			TypeDescriptor::Unknown(name) => {
				tracing::trace!(kind = %name, "Unsupported type kind, using unconstrained schema");
				TargetType::Any
			}
		};
		Ok(target)
	}

	fn convert_union(&self, members: &[TypeDescriptor]) -> SchemaResult<TargetType> {
		let mut converted = members
			.iter()
			.map(|member| self.convert(member))
			.collect::<SchemaResult<Vec<_>>>()?;

		// `T | None` in either order collapses to an optional
		if converted.len() == 2 {
			if let Some(null_at) = converted.iter().position(|t| *t == TargetType::Null) {
				let inner = converted.swap_remove(1 - null_at);
				// Already nullable: `(T | None) | None` is `T | None`
				return Ok(match inner {
					TargetType::Null | TargetType::Optional(_) => inner,
					other => TargetType::Optional(Box::new(other)),
				});
			}
		}

		Ok(match converted.len() {
			0 => TargetType::Any,
			1 => converted.remove(0),
			_ => TargetType::Union(converted),
		})
	}
}
