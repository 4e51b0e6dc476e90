//! Record type descriptors
//!
//! Immutable description of a record's field types, as produced by the
//! record-introspection layer. Descriptors are built once and then shared
//! (`Arc`) between every schema conversion that reaches them.
//!
//! Records referencing each other (including themselves) are tied in two
//! steps: [`RecordDescriptor::declare`] hands out the shared handle, and
//! [`RecordDescriptor::define_fields`] fills in the field list once every
//! referenced record has been declared.
//!
//! # Example
//!
//! ```rust
//! use structbridge_core::descriptor::{
//!     FieldDescriptor, RecordDescriptor, ScalarKind, TypeDescriptor, TypeIdentity,
//! };
//!
//! let node = RecordDescriptor::declare(TypeIdentity::new("app.Node"), "Node");
//! node.define_fields(vec![
//!     FieldDescriptor::new("value", TypeDescriptor::Scalar(ScalarKind::Int)),
//!     FieldDescriptor::new("next", TypeDescriptor::optional(TypeDescriptor::record(&node))),
//! ])
//! .unwrap();
//!
//! assert_eq!(node.fields().unwrap().len(), 2);
//! ```

use crate::exception::FieldIntrospectionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Scalar kinds with a fixed 1:1 mapping to a schema primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
	Int,
	Str,
	Float,
	Bool,
	Bytes,
	ByteArray,
	Decimal,
	DateTime,
	Date,
	Time,
	TimeDelta,
	Uuid,
}

impl ScalarKind {
	/// Every scalar kind, in declaration order
	pub const ALL: [ScalarKind; 12] = [
		ScalarKind::Int,
		ScalarKind::Str,
		ScalarKind::Float,
		ScalarKind::Bool,
		ScalarKind::Bytes,
		ScalarKind::ByteArray,
		ScalarKind::Decimal,
		ScalarKind::DateTime,
		ScalarKind::Date,
		ScalarKind::Time,
		ScalarKind::TimeDelta,
		ScalarKind::Uuid,
	];

	/// Short lowercase name of the kind
	pub fn as_str(&self) -> &'static str {
		match self {
			ScalarKind::Int => "int",
			ScalarKind::Str => "str",
			ScalarKind::Float => "float",
			ScalarKind::Bool => "bool",
			ScalarKind::Bytes => "bytes",
			ScalarKind::ByteArray => "bytearray",
			ScalarKind::Decimal => "decimal",
			ScalarKind::DateTime => "datetime",
			ScalarKind::Date => "date",
			ScalarKind::Time => "time",
			ScalarKind::TimeDelta => "timedelta",
			ScalarKind::Uuid => "uuid",
		}
	}
}

impl fmt::Display for ScalarKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Date and time kinds reported separately by introspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
	DateTime,
	Date,
	Time,
	TimeDelta,
}

impl TemporalKind {
	/// The scalar kind carrying the same schema mapping
	pub fn scalar_kind(self) -> ScalarKind {
		match self {
			TemporalKind::DateTime => ScalarKind::DateTime,
			TemporalKind::Date => ScalarKind::Date,
			TemporalKind::Time => ScalarKind::Time,
			TemporalKind::TimeDelta => ScalarKind::TimeDelta,
		}
	}
}

/// Identity of a record or enumeration type
///
/// Usually the fully qualified name of the originating type. Two descriptors
/// with the same identity are the same type as far as schema caching goes.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentity(Arc<str>);

impl TypeIdentity {
	pub fn new(qualified_name: impl Into<Arc<str>>) -> Self {
		Self(qualified_name.into())
	}

	/// Identity derived from a Rust type's path
	///
	/// # Example
	///
	/// ```rust
	/// use structbridge_core::descriptor::TypeIdentity;
	///
	/// struct User;
	/// assert!(TypeIdentity::of::<User>().as_str().ends_with("User"));
	/// ```
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self::new(std::any::type_name::<T>())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for TypeIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TypeIdentity({})", self.0)
	}
}

impl fmt::Display for TypeIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Documentation attached to a type (`Annotated[T, Meta(...)]`-style wrapper)
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDescriptor {
	pub inner: Box<TypeDescriptor>,
	pub description: Option<String>,
	pub examples: Option<Vec<Value>>,
}

/// Recursively structured description of a field type
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
	/// The null type, only meaningful as a union member
	None,
	/// Explicitly unconstrained
	Any,
	Scalar(ScalarKind),
	Temporal(TemporalKind),
	List(Box<TypeDescriptor>),
	Set(Box<TypeDescriptor>),
	Dict {
		key: Box<TypeDescriptor>,
		value: Box<TypeDescriptor>,
	},
	Tuple(Vec<TypeDescriptor>),
	Union(Vec<TypeDescriptor>),
	Record(Arc<RecordDescriptor>),
	Enum(Arc<EnumDescriptor>),
	Metadata(MetadataDescriptor),
	/// A kind introspection could not classify, carrying its reported name
	Unknown(String),
}

impl TypeDescriptor {
	pub fn list(item: TypeDescriptor) -> Self {
		Self::List(Box::new(item))
	}

	pub fn set(item: TypeDescriptor) -> Self {
		Self::Set(Box::new(item))
	}

	pub fn dict(key: TypeDescriptor, value: TypeDescriptor) -> Self {
		Self::Dict {
			key: Box::new(key),
			value: Box::new(value),
		}
	}

	pub fn tuple(items: impl IntoIterator<Item = TypeDescriptor>) -> Self {
		Self::Tuple(items.into_iter().collect())
	}

	pub fn union(members: impl IntoIterator<Item = TypeDescriptor>) -> Self {
		Self::Union(members.into_iter().collect())
	}

	/// `T | None`
	pub fn optional(inner: TypeDescriptor) -> Self {
		Self::Union(vec![inner, TypeDescriptor::None])
	}

	pub fn record(record: &Arc<RecordDescriptor>) -> Self {
		Self::Record(Arc::clone(record))
	}

	pub fn enumeration(descriptor: &Arc<EnumDescriptor>) -> Self {
		Self::Enum(Arc::clone(descriptor))
	}

	/// Wrap `inner` with documentation metadata
	///
	/// Either key may be absent; partial metadata is valid.
	pub fn documented(
		inner: TypeDescriptor,
		description: Option<&str>,
		examples: Option<Vec<Value>>,
	) -> Self {
		Self::Metadata(MetadataDescriptor {
			inner: Box::new(inner),
			description: description.map(str::to_string),
			examples,
		})
	}

	/// Name of the descriptor's kind, for diagnostics
	pub fn kind_name(&self) -> &str {
		match self {
			TypeDescriptor::None => "none",
			TypeDescriptor::Any => "any",
			TypeDescriptor::Scalar(kind) => kind.as_str(),
			TypeDescriptor::Temporal(kind) => kind.scalar_kind().as_str(),
			TypeDescriptor::List(_) => "list",
			TypeDescriptor::Set(_) => "set",
			TypeDescriptor::Dict { .. } => "dict",
			TypeDescriptor::Tuple(_) => "tuple",
			TypeDescriptor::Union(_) => "union",
			TypeDescriptor::Record(_) => "record",
			TypeDescriptor::Enum(_) => "enum",
			TypeDescriptor::Metadata(_) => "metadata",
			TypeDescriptor::Unknown(name) => name,
		}
	}
}

/// Produces a fresh default value on every call
#[derive(Clone)]
pub struct DefaultFactory(Arc<dyn Fn() -> Value + Send + Sync>);

impl DefaultFactory {
	pub fn new(factory: impl Fn() -> Value + Send + Sync + 'static) -> Self {
		Self(Arc::new(factory))
	}

	pub fn produce(&self) -> Value {
		(self.0)()
	}
}

impl fmt::Debug for DefaultFactory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("DefaultFactory(..)")
	}
}

/// Declared default of a field
#[derive(Debug, Clone, Default)]
pub enum FieldDefault {
	/// The field is required
	#[default]
	NoDefault,
	Literal(Value),
	Factory(DefaultFactory),
}

/// A single record field as reported by introspection
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
	pub name: String,
	pub ty: TypeDescriptor,
	pub default: FieldDefault,
}

impl FieldDescriptor {
	/// Create a required field
	pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
		Self {
			name: name.into(),
			ty,
			default: FieldDefault::NoDefault,
		}
	}

	pub fn with_default(mut self, value: impl Into<Value>) -> Self {
		self.default = FieldDefault::Literal(value.into());
		self
	}

	pub fn with_default_factory(
		mut self,
		factory: impl Fn() -> Value + Send + Sync + 'static,
	) -> Self {
		self.default = FieldDefault::Factory(DefaultFactory::new(factory));
		self
	}
}

/// Field naming convention declared on a record
///
/// Source field names are expected in `snake_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenamePolicy {
	Lower,
	Upper,
	Camel,
	Pascal,
	Kebab,
}

impl RenamePolicy {
	/// Apply the policy to a `snake_case` field name
	///
	/// # Example
	///
	/// ```rust
	/// use structbridge_core::descriptor::RenamePolicy;
	///
	/// assert_eq!(RenamePolicy::Camel.apply("has_next_page"), "hasNextPage");
	/// assert_eq!(RenamePolicy::Pascal.apply("page_size"), "PageSize");
	/// assert_eq!(RenamePolicy::Kebab.apply("page_size"), "page-size");
	/// ```
	pub fn apply(&self, name: &str) -> String {
		match self {
			RenamePolicy::Lower => name.to_lowercase(),
			RenamePolicy::Upper => name.to_uppercase(),
			RenamePolicy::Kebab => name.replace('_', "-"),
			RenamePolicy::Camel => join_capitalized(name, false),
			RenamePolicy::Pascal => join_capitalized(name, true),
		}
	}
}

fn join_capitalized(name: &str, capitalize_first: bool) -> String {
	let mut out = String::with_capacity(name.len());
	for (index, word) in name.split('_').filter(|w| !w.is_empty()).enumerate() {
		let mut chars = word.chars();
		if let Some(first) = chars.next() {
			if index == 0 && !capitalize_first {
				out.push(first);
			} else {
				out.extend(first.to_uppercase());
			}
			out.push_str(chars.as_str());
		}
	}
	out
}

/// Record-level options (recorded for collaborators, not interpreted here)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordModifiers {
	pub rename: Option<RenamePolicy>,
	/// Name of the discriminator field of a tagged union member
	pub tag_field: Option<String>,
	/// Discriminator value of a tagged union member
	pub tag: Option<String>,
}

/// Ordered field list of a record plus its identity
pub struct RecordDescriptor {
	identity: TypeIdentity,
	name: String,
	modifiers: RecordModifiers,
	fields: OnceLock<Vec<FieldDescriptor>>,
}

impl RecordDescriptor {
	/// Declare a record whose fields are defined later
	pub fn declare(identity: TypeIdentity, name: impl Into<String>) -> Arc<Self> {
		Self::declare_with(identity, name, RecordModifiers::default())
	}

	pub fn declare_with(
		identity: TypeIdentity,
		name: impl Into<String>,
		modifiers: RecordModifiers,
	) -> Arc<Self> {
		Arc::new(Self {
			identity,
			name: name.into(),
			modifiers,
			fields: OnceLock::new(),
		})
	}

	/// Declare and define a record that does not take part in a cycle
	pub fn new(
		identity: TypeIdentity,
		name: impl Into<String>,
		fields: Vec<FieldDescriptor>,
	) -> Result<Arc<Self>, FieldIntrospectionError> {
		let record = Self::declare(identity, name);
		record.define_fields(fields)?;
		Ok(record)
	}

	/// Set the field list
	///
	/// Fails when the list was already set, when a field name is empty, or
	/// when a name appears twice.
	pub fn define_fields(
		&self,
		fields: Vec<FieldDescriptor>,
	) -> Result<(), FieldIntrospectionError> {
		let mut seen = HashSet::with_capacity(fields.len());
		for field in &fields {
			if field.name.is_empty() {
				return Err(FieldIntrospectionError::EmptyName {
					record: self.identity.clone(),
				});
			}
			if !seen.insert(field.name.as_str()) {
				return Err(FieldIntrospectionError::DuplicateField {
					record: self.identity.clone(),
					field: field.name.clone(),
				});
			}
		}

		self.fields
			.set(fields)
			.map_err(|_| FieldIntrospectionError::AlreadyDefined {
				record: self.identity.clone(),
			})
	}

	pub fn fields(&self) -> Result<&[FieldDescriptor], FieldIntrospectionError> {
		self.fields
			.get()
			.map(Vec::as_slice)
			.ok_or_else(|| FieldIntrospectionError::Undefined {
				record: self.identity.clone(),
			})
	}

	pub fn is_defined(&self) -> bool {
		self.fields.get().is_some()
	}

	pub fn identity(&self) -> &TypeIdentity {
		&self.identity
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn modifiers(&self) -> &RecordModifiers {
		&self.modifiers
	}
}

// Records are compared by identity; comparing fields would recurse forever on cycles.
impl PartialEq for RecordDescriptor {
	fn eq(&self, other: &Self) -> bool {
		self.identity == other.identity
	}
}

impl fmt::Debug for RecordDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let field_names: Option<Vec<&str>> = self
			.fields
			.get()
			.map(|fields| fields.iter().map(|field| field.name.as_str()).collect());
		f.debug_struct("RecordDescriptor")
			.field("identity", &self.identity)
			.field("name", &self.name)
			.field("modifiers", &self.modifiers)
			.field("fields", &field_names)
			.finish()
	}
}

/// An enumeration type with its member values
#[derive(Debug)]
pub struct EnumDescriptor {
	identity: TypeIdentity,
	name: String,
	values: Vec<Value>,
}

impl EnumDescriptor {
	pub fn new(
		identity: TypeIdentity,
		name: impl Into<String>,
		values: impl IntoIterator<Item = Value>,
	) -> Arc<Self> {
		Arc::new(Self {
			identity,
			name: name.into(),
			values: values.into_iter().collect(),
		})
	}

	pub fn identity(&self) -> &TypeIdentity {
		&self.identity
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn values(&self) -> &[Value] {
		&self.values
	}
}

impl PartialEq for EnumDescriptor {
	fn eq(&self, other: &Self) -> bool {
		self.identity == other.identity
	}
}
