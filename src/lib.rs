//! yangbind: YANG schemas to conflict-free binding type graphs.
//!
//! The work is split over the workspace crates, re-exported here:
//!
//! - [`common`] - qualified names, identifier mapping, limits
//! - [`model`] - the effective statement tree and its JSON loader
//! - [`reactor`] - the generator reactor
//!
//! ```ignore
//! let ctx = yangbind::load_schema_document(Path::new("schema.json"))?;
//! let mut reactor = yangbind::Reactor::new(&ctx, yangbind::ReactorOptions::default())?;
//! for (id, ty) in reactor.run()?.generated_types() {
//!     println!("{id}: {}", ty.name);
//! }
//! ```

pub use yangbind_common as common;
pub use yangbind_model as model;
pub use yangbind_reactor as reactor;

pub use yangbind_model::{SchemaBuilder, SchemaContext, SchemaDocument, load_schema_document};
pub use yangbind_reactor::{
    GeneratedType, JavaTypeName, Reactor, ReactorError, ReactorOptions, ReactorOutput,
};

// Tracing configuration (text / tree / JSON output for debugging)
pub mod tracing_config;

// Native CLI
#[cfg(feature = "cli")]
pub mod cli;
