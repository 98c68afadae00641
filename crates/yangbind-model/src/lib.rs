//! Effective YANG statement tree.
//!
//! This crate is the input boundary of the generator reactor. It models the
//! output a schema parser would hand over: an immutable, pre-validated tree of
//! statements addressed by qualified name, with `uses` already instantiated
//! (copied nodes carry `added_by_uses` and point back at their declaration).
//!
//! - `statement` - statement arena ids, kinds and payloads
//! - `types` - leaf/typedef type specifications
//! - `path` - schema node identifiers and leafref path expressions
//! - `context` - the `SchemaContext` owning the arena and module table
//! - `builder` - programmatic construction, including `uses` instantiation
//! - `document` - JSON form of a schema, loaded through the builder

pub mod error;
pub use error::ModelError;

pub mod statement;
pub use statement::{Argument, Statement, StatementKind, StmtId};

pub mod types;
pub use types::{BuiltinType, TypeSpec};

pub mod path;
pub use path::{PathExpression, PathStep, SchemaNodeIdentifier};

pub mod context;
pub use context::{ImportInfo, ModuleInfo, SchemaContext};

pub mod builder;
pub use builder::SchemaBuilder;

pub mod document;
pub use document::{SchemaDocument, load_schema_document};

pub use yangbind_common::{QName, QNameModule};
