//! Schema registry
//!
//! Caches one [`RecordSchema`] per record identity and resolves cyclic record
//! graphs.
//!
//! Schemas live in an arena of slots. Construction first allocates a
//! `Pending` slot, so a record reached again while its own fields are being
//! converted resolves to that slot's [`SchemaRef`] instead of recursing. The
//! slot becomes `Ready` once every field is processed. A failed construction
//! truncates the arena back to the failed slot, so callers never observe a
//! partial schema.
//!
//! All of this runs under one re-entrant lock: the thread constructing a
//! schema re-enters the registry for nested records, while other threads wait
//! and then find the finished schema.
//!
//! ## Example
//!
//! ```rust
//! use structbridge_core::descriptor::{
//!     FieldDescriptor, RecordDescriptor, ScalarKind, TypeDescriptor, TypeIdentity,
//! };
//! use structbridge_openapi::registry::SchemaRegistry;
//!
//! let user = RecordDescriptor::new(
//!     TypeIdentity::new("app.User"),
//!     "User",
//!     vec![FieldDescriptor::new("id", TypeDescriptor::Scalar(ScalarKind::Int))],
//! )
//! .unwrap();
//!
//! let registry = SchemaRegistry::new();
//! let schema = registry.get_or_create(&user).unwrap();
//! assert_eq!(schema.name(), "UserSchema");
//! assert!(std::sync::Arc::ptr_eq(&schema, &registry.get_or_create(&user).unwrap()));
//! ```

use crate::converter::{RecordResolver, ScalarCache, SchemaRef, TypeConverter};
use crate::error::{SchemaError, SchemaResult};
use crate::fields::{FieldDefinition, FieldProcessor, FieldRenamer};
use crate::openapi::{Components, ComponentsBuilder, ObjectBuilder, Schema, SchemaType, Type};
use indexmap::IndexMap;
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use structbridge_conf::SchemaSettings;
use structbridge_core::descriptor::{RecordDescriptor, TypeIdentity};

/// Finished schema of one record
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
	name: Arc<str>,
	source: TypeIdentity,
	fields: IndexMap<String, FieldDefinition>,
}

impl RecordSchema {
	/// Component name: record name plus the configured suffix
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Identity of the record this schema was built from
	pub fn source(&self) -> &TypeIdentity {
		&self.source
	}

	pub fn fields(&self) -> &IndexMap<String, FieldDefinition> {
		&self.fields
	}

	pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
		self.fields.get(name)
	}

	/// Names of fields without a default, in declaration order
	pub fn required_fields(&self) -> impl Iterator<Item = &str> {
		self.fields
			.values()
			.filter(|field| field.is_required())
			.map(|field| field.name.as_str())
	}

	/// Render as an OpenAPI object schema
	pub fn to_schema(&self) -> Schema {
		let mut builder = ObjectBuilder::new()
			.schema_type(SchemaType::Type(Type::Object))
			.title(Some(self.name.as_ref()));

		for (name, field) in &self.fields {
			builder = builder.property(name, field.to_schema());
			if field.is_required() {
				builder = builder.required(name);
			}
		}

		Schema::Object(builder.build())
	}
}

enum Slot {
	/// Forward-reference placeholder for a schema under construction
	Pending(Arc<str>),
	Ready(Arc<RecordSchema>),
}

impl Slot {
	fn name(&self) -> &Arc<str> {
		match self {
			Slot::Pending(name) => name,
			Slot::Ready(schema) => &schema.name,
		}
	}
}

#[derive(Default)]
struct RegistryState {
	slots: Vec<Slot>,
	by_identity: HashMap<TypeIdentity, usize>,
	pending: HashSet<TypeIdentity>,
}

impl RegistryState {
	fn handle_for(&self, identity: &TypeIdentity) -> Option<SchemaRef> {
		let index = *self.by_identity.get(identity)?;
		Some(SchemaRef::new(index, Arc::clone(self.slots[index].name())))
	}

	fn ready(&self, index: usize) -> Option<Arc<RecordSchema>> {
		match self.slots.get(index)? {
			Slot::Ready(schema) => Some(Arc::clone(schema)),
			Slot::Pending(_) => None,
		}
	}

	fn allocate(&mut self, identity: TypeIdentity, name: Arc<str>) -> usize {
		let index = self.slots.len();
		self.slots.push(Slot::Pending(name));
		self.by_identity.insert(identity.clone(), index);
		self.pending.insert(identity);
		index
	}

	fn fill(&mut self, index: usize, schema: Arc<RecordSchema>) {
		self.pending.remove(&schema.source);
		self.slots[index] = Slot::Ready(schema);
	}

	/// Drop `index` and every slot allocated after it; returns how many slots went
	fn rollback(&mut self, index: usize) -> usize {
		let discarded = self.slots.len().saturating_sub(index);
		self.slots.truncate(index);
		self.by_identity.retain(|_, slot| *slot < index);
		let by_identity = &self.by_identity;
		self.pending.retain(|identity| by_identity.contains_key(identity));
		discarded
	}
}

/// Rolls a pending slot back unless the construction commits
///
/// Covers unwinding out of user closures (default factories, renamers) as
/// well as ordinary failures.
struct ConstructionGuard<'c> {
	cell: &'c RefCell<RegistryState>,
	index: usize,
	committed: bool,
}

impl<'c> ConstructionGuard<'c> {
	fn new(cell: &'c RefCell<RegistryState>, index: usize) -> Self {
		Self {
			cell,
			index,
			committed: false,
		}
	}

	fn commit(mut self) {
		self.committed = true;
	}

	/// Roll back now; returns how many slots went
	fn rollback(mut self) -> usize {
		self.committed = true;
		self.cell.borrow_mut().rollback(self.index)
	}
}

impl Drop for ConstructionGuard<'_> {
	fn drop(&mut self) {
		if self.committed {
			return;
		}
		if let Ok(mut state) = self.cell.try_borrow_mut() {
			let discarded = state.rollback(self.index);
			tracing::error!(index = self.index, discarded, "Schema construction aborted");
		}
	}
}

/// Thread-safe cache of record schemas
pub struct SchemaRegistry {
	// RefCell borrows are never held across a call that may re-enter.
	state: ReentrantMutex<RefCell<RegistryState>>,
	scalars: ScalarCache,
	settings: SchemaSettings,
	renamer: Option<FieldRenamer>,
	constructions: AtomicUsize,
}

impl Default for SchemaRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl SchemaRegistry {
	pub fn new() -> Self {
		Self::with_settings(SchemaSettings::default())
	}

	pub fn with_settings(settings: SchemaSettings) -> Self {
		Self {
			state: ReentrantMutex::new(RefCell::new(RegistryState::default())),
			scalars: ScalarCache::new(),
			settings,
			renamer: None,
			constructions: AtomicUsize::new(0),
		}
	}

	/// Use `renamer` for every record, overriding declared rename policies
	pub fn with_field_renamer(mut self, renamer: FieldRenamer) -> Self {
		self.renamer = Some(renamer);
		self
	}

	pub fn settings(&self) -> &SchemaSettings {
		&self.settings
	}

	pub fn scalars(&self) -> &ScalarCache {
		&self.scalars
	}

	/// Cached schema for `record`, building it (and every record it reaches)
	/// on first request
	///
	/// Concurrent first requests for the same record build it once; every
	/// caller receives the same `Arc`.
	pub fn get_or_create(
		&self,
		record: &Arc<RecordDescriptor>,
	) -> SchemaResult<Arc<RecordSchema>> {
		let guard = self.state.lock();
		let handle = self.resolve_locked(&guard, record)?;
		let state = guard.borrow();
		match state.ready(handle.index()) {
			Some(schema) if !state.pending.contains(record.identity()) => Ok(schema),
			_ => Err(SchemaError::CycleUnresolved {
				record: record.identity().clone(),
			}),
		}
	}

	/// Finished schema behind a handle
	pub fn get(&self, handle: &SchemaRef) -> Option<Arc<RecordSchema>> {
		let guard = self.state.lock();
		let state = guard.borrow();
		state
			.ready(handle.index())
			.filter(|schema| schema.name() == handle.name())
	}

	/// Finished schema of a record identity, without building anything
	pub fn lookup(&self, identity: &TypeIdentity) -> Option<Arc<RecordSchema>> {
		let guard = self.state.lock();
		let state = guard.borrow();
		let index = *state.by_identity.get(identity)?;
		state.ready(index)
	}

	pub fn contains(&self, identity: &TypeIdentity) -> bool {
		self.lookup(identity).is_some()
	}

	/// Number of finished schemas
	pub fn len(&self) -> usize {
		let guard = self.state.lock();
		let state = guard.borrow();
		state
			.slots
			.iter()
			.filter(|slot| matches!(slot, Slot::Ready(_)))
			.count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// How many constructions have started, including failed ones
	pub fn constructions(&self) -> usize {
		self.constructions.load(Ordering::SeqCst)
	}

	/// Export every finished schema as OpenAPI components
	pub fn to_components(&self) -> Components {
		let guard = self.state.lock();
		let state = guard.borrow();
		state
			.slots
			.iter()
			.filter_map(|slot| match slot {
				Slot::Ready(schema) => Some(schema),
				Slot::Pending(_) => None,
			})
			.fold(ComponentsBuilder::new(), |builder, schema| {
				builder.schema(schema.name(), schema.to_schema())
			})
			.build()
	}

	/// Drop every cached schema
	pub fn clear(&self) {
		let guard = self.state.lock();
		let mut state = guard.borrow_mut();
		let dropped = state.slots.len();
		*state = RegistryState::default();
		tracing::debug!(dropped, "Cleared schema registry");
	}

	fn resolve_locked(
		&self,
		cell: &RefCell<RegistryState>,
		record: &Arc<RecordDescriptor>,
	) -> SchemaResult<SchemaRef> {
		let identity = record.identity();
		{
			let state = cell.borrow();
			if let Some(existing) = state.handle_for(identity) {
				if state.pending.contains(identity) {
					tracing::debug!(
						record = %identity,
						schema = %existing,
						"Forward reference to pending schema"
					);
				} else {
					tracing::debug!(record = %identity, schema = %existing, "Schema cache hit");
				}
				return Ok(existing);
			}
		}

		let name: Arc<str> = Arc::from(format!("{}{}", record.name(), self.settings.name_suffix));
		let index = cell
			.borrow_mut()
			.allocate(identity.clone(), Arc::clone(&name));
		self.constructions.fetch_add(1, Ordering::SeqCst);
		tracing::debug!(record = %identity, schema = %name, index, "Constructing record schema");

		let guard = ConstructionGuard::new(cell, index);
		let built = self.build_fields(record);

		match built {
			Ok(fields) => {
				if fields.is_empty() {
					tracing::warn!(record = %identity, "Record has no fields");
				}
				guard.commit();
				cell.borrow_mut().fill(
					index,
					Arc::new(RecordSchema {
						name: Arc::clone(&name),
						source: identity.clone(),
						fields,
					}),
				);
				Ok(SchemaRef::new(index, name))
			}
			Err(error) => {
				let discarded = guard.rollback();
				tracing::error!(
					record = %identity,
					discarded,
					error = %error,
					"Schema construction failed"
				);
				Err(error)
			}
		}
	}

	fn build_fields(
		&self,
		record: &Arc<RecordDescriptor>,
	) -> SchemaResult<IndexMap<String, FieldDefinition>> {
		let converter = TypeConverter::new(self, &self.scalars);
		FieldProcessor::new(converter)
			.with_renamer(self.renamer_for(record))
			.process(record)
	}

	fn renamer_for(&self, record: &RecordDescriptor) -> Option<FieldRenamer> {
		if let Some(renamer) = &self.renamer {
			return Some(Arc::clone(renamer));
		}
		if !self.settings.honor_rename_policy {
			return None;
		}
		let policy = record.modifiers().rename?;
		Some(Arc::new(move |name: &str| policy.apply(name)))
	}
}

impl RecordResolver for SchemaRegistry {
	fn resolve(&self, record: &Arc<RecordDescriptor>) -> SchemaResult<SchemaRef> {
		let guard = self.state.lock();
		self.resolve_locked(&guard, record)
	}
}

static GLOBAL_SCHEMA_REGISTRY: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::new);

/// Process-wide registry with default settings
pub fn global_registry() -> &'static SchemaRegistry {
	&GLOBAL_SCHEMA_REGISTRY
}

/// Schema of `record` from the global registry
pub fn schema_for(record: &Arc<RecordDescriptor>) -> SchemaResult<Arc<RecordSchema>> {
	global_registry().get_or_create(record)
}

/// Schema of a request body record from the global registry
pub fn as_body(record: &Arc<RecordDescriptor>) -> SchemaResult<Arc<RecordSchema>> {
	schema_for(record)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::converter::TargetType;
	use rstest::rstest;
	use serde_json::json;
	use structbridge_core::descriptor::{
		FieldDescriptor, RecordModifiers, RenamePolicy, ScalarKind, TypeDescriptor,
	};

	fn int() -> TypeDescriptor {
		TypeDescriptor::Scalar(ScalarKind::Int)
	}

	fn simple(name: &str) -> Arc<RecordDescriptor> {
		RecordDescriptor::new(
			TypeIdentity::new(format!("tests.{}", name)),
			name,
			vec![FieldDescriptor::new("id", int())],
		)
		.unwrap()
	}

	#[rstest]
	fn test_idempotent_lookup() {
		let registry = SchemaRegistry::new();
		let user = simple("User");

		let first = registry.get_or_create(&user).unwrap();
		let second = registry.get_or_create(&user).unwrap();

		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(registry.constructions(), 1);
		assert_eq!(registry.len(), 1);
	}

	#[rstest]
	fn test_name_suffix_from_settings() {
		let registry = SchemaRegistry::with_settings(SchemaSettings {
			name_suffix: "Model".to_string(),
			..SchemaSettings::default()
		});
		let schema = registry.get_or_create(&simple("Order")).unwrap();
		assert_eq!(schema.name(), "OrderModel");
	}

	#[rstest]
	fn test_nested_record_registered() {
		let registry = SchemaRegistry::new();
		let address = simple("Address");
		let user = RecordDescriptor::new(
			TypeIdentity::new("tests.UserWithAddress"),
			"UserWithAddress",
			vec![FieldDescriptor::new("address", TypeDescriptor::record(&address))],
		)
		.unwrap();

		let schema = registry.get_or_create(&user).unwrap();
		let TargetType::Record(reference) = &schema.field("address").unwrap().ty else {
			panic!("Expected record reference");
		};

		let nested = registry.get(reference).unwrap();
		assert!(Arc::ptr_eq(&nested, &registry.get_or_create(&address).unwrap()));
		assert_eq!(registry.constructions(), 2);
	}

	#[rstest]
	fn test_self_reference() {
		let registry = SchemaRegistry::new();
		let node = RecordDescriptor::declare(TypeIdentity::new("tests.Node"), "Node");
		node.define_fields(vec![
			FieldDescriptor::new("value", int()),
			FieldDescriptor::new("children", TypeDescriptor::list(TypeDescriptor::record(&node))),
		])
		.unwrap();

		let schema = registry.get_or_create(&node).unwrap();
		let TargetType::List(item) = &schema.field("children").unwrap().ty else {
			panic!("Expected list");
		};
		let TargetType::Record(reference) = item.as_ref() else {
			panic!("Expected record reference");
		};

		assert_eq!(reference.name(), "NodeSchema");
		assert!(Arc::ptr_eq(&registry.get(reference).unwrap(), &schema));
		assert_eq!(registry.constructions(), 1);
	}

	#[rstest]
	fn test_lookup_without_building() {
		let registry = SchemaRegistry::new();
		let user = simple("User");

		assert!(registry.lookup(user.identity()).is_none());
		assert!(!registry.contains(user.identity()));
		assert_eq!(registry.constructions(), 0);

		registry.get_or_create(&user).unwrap();
		assert!(registry.contains(user.identity()));
	}

	#[rstest]
	fn test_stale_handle_after_clear() {
		let registry = SchemaRegistry::new();
		let schema = registry.get_or_create(&simple("User")).unwrap();
		let handle = SchemaRef::new(0, schema.name());

		registry.clear();
		assert!(registry.is_empty());
		assert!(registry.get(&handle).is_none());

		registry.get_or_create(&simple("Other")).unwrap();
		assert!(registry.get(&handle).is_none());
	}

	#[rstest]
	fn test_record_schema_json() {
		let registry = SchemaRegistry::new();
		let user = RecordDescriptor::new(
			TypeIdentity::new("tests.User"),
			"User",
			vec![
				FieldDescriptor::new("id", int()),
				FieldDescriptor::new(
					"email",
					TypeDescriptor::optional(TypeDescriptor::Scalar(ScalarKind::Str)),
				)
				.with_default(serde_json::Value::Null),
			],
		)
		.unwrap();

		let schema = registry.get_or_create(&user).unwrap();
		let json = serde_json::to_value(schema.to_schema()).unwrap();

		assert_eq!(json["type"], "object");
		assert_eq!(json["title"], "UserSchema");
		assert_eq!(json["required"], json!(["id"]));
		assert_eq!(json["properties"]["id"]["type"], "integer");
		let email = &json["properties"]["email"];
		assert_eq!(email["oneOf"][1]["type"], "null");
		assert_eq!(email["default"], serde_json::Value::Null);
		assert_eq!(
			schema.required_fields().collect::<Vec<_>>(),
			vec!["id"]
		);
	}

	#[rstest]
	fn test_to_components() {
		let registry = SchemaRegistry::new();
		registry.get_or_create(&simple("User")).unwrap();
		registry.get_or_create(&simple("Order")).unwrap();

		let components = registry.to_components();
		assert_eq!(components.schemas.len(), 2);
		assert!(components.schemas.contains_key("UserSchema"));
		assert!(components.schemas.contains_key("OrderSchema"));
	}

	#[rstest]
	#[case(false, "page_size")]
	#[case(true, "pageSize")]
	fn test_rename_policy_setting(#[case] honor: bool, #[case] expected: &str) {
		let registry = SchemaRegistry::with_settings(SchemaSettings {
			honor_rename_policy: honor,
			..SchemaSettings::default()
		});
		let record = RecordDescriptor::declare_with(
			TypeIdentity::new("tests.Page"),
			"Page",
			RecordModifiers {
				rename: Some(RenamePolicy::Camel),
				..RecordModifiers::default()
			},
		);
		record
			.define_fields(vec![FieldDescriptor::new("page_size", int())])
			.unwrap();

		let schema = registry.get_or_create(&record).unwrap();
		assert!(schema.field(expected).is_some());
	}

	#[rstest]
	fn test_explicit_renamer_wins() {
		let registry = SchemaRegistry::new()
			.with_field_renamer(Arc::new(|name: &str| name.to_uppercase()));
		let schema = registry.get_or_create(&simple("User")).unwrap();
		assert_eq!(schema.field("ID").unwrap().source_name, "id");
	}

	#[rstest]
	fn test_empty_record_is_valid() {
		let registry = SchemaRegistry::new();
		let empty =
			RecordDescriptor::new(TypeIdentity::new("tests.Empty"), "Empty", Vec::new()).unwrap();
		let schema = registry.get_or_create(&empty).unwrap();
		assert!(schema.fields().is_empty());
	}

	#[rstest]
	fn test_global_registry_is_shared() {
		let record = simple("GlobalProbe");
		let first = schema_for(&record).unwrap();
		let second = as_body(&record).unwrap();
		assert!(Arc::ptr_eq(&first, &second));
		assert!(global_registry().contains(record.identity()));
	}
}
