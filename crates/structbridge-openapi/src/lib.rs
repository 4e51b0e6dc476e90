//! # structbridge OpenAPI
//!
//! Converts record descriptors into OpenAPI schemas.
//!
//! ## Modules
//!
//! - **converter**: descriptor to [`TargetType`] conversion and the scalar cache
//! - **fields**: per-field defaults, documentation, and renaming
//! - **registry**: the [`SchemaRegistry`] with cycle resolution
//! - **envelope**: documentation schemas of the response envelopes
//! - **openapi**: utoipa re-exports and schema shorthands
//!
//! ## Example
//!
//! ```rust
//! use structbridge_core::descriptor::{
//!     FieldDescriptor, RecordDescriptor, ScalarKind, TypeDescriptor, TypeIdentity,
//! };
//! use structbridge_openapi::SchemaRegistry;
//!
//! let author = RecordDescriptor::declare(TypeIdentity::new("blog.Author"), "Author");
//! let post = RecordDescriptor::declare(TypeIdentity::new("blog.Post"), "Post");
//! author
//!     .define_fields(vec![
//!         FieldDescriptor::new("name", TypeDescriptor::Scalar(ScalarKind::Str)),
//!         FieldDescriptor::new("posts", TypeDescriptor::list(TypeDescriptor::record(&post))),
//!     ])
//!     .unwrap();
//! post.define_fields(vec![
//!     FieldDescriptor::new("title", TypeDescriptor::Scalar(ScalarKind::Str)),
//!     FieldDescriptor::new("author", TypeDescriptor::record(&author)),
//! ])
//! .unwrap();
//!
//! let registry = SchemaRegistry::new();
//! registry.get_or_create(&author).unwrap();
//!
//! let components = registry.to_components();
//! assert!(components.schemas.contains_key("AuthorSchema"));
//! assert!(components.schemas.contains_key("PostSchema"));
//! ```

pub mod converter;
pub mod envelope;
pub mod error;
pub mod fields;
pub mod openapi;
pub mod registry;

pub use converter::{RecordResolver, ScalarCache, ScalarType, SchemaRef, TargetType, TypeConverter};
pub use envelope::{envelope_schema, paginated_envelope_schema};
pub use error::{SchemaError, SchemaResult};
pub use fields::{DefaultValue, FieldDefinition, FieldDocs, FieldProcessor, FieldRenamer};
pub use registry::{RecordSchema, SchemaRegistry, as_body, global_registry, schema_for};
