//! Generator reactor.
//!
//! Turns an effective YANG statement tree into a conflict-free graph of named
//! binding types. Every relevant statement gets a generator; the reactor then
//! links them in nine ordered stages:
//!
//! 1. `uses` to groupings
//! 2. augment requirements started
//! 3. original links and augment targets, to a fixpoint
//! 4. typedef and identity references
//! 5. grouping usage, then frozen
//! 6. child-of linkage (already structural)
//! 7. leafref and identityref targets
//! 8. naming members and collision domains, to a fixpoint
//! 9. type materialization against an injected `TypeBuilderFactory`
//!
//! ```ignore
//! let mut reactor = Reactor::new(&ctx, ReactorOptions::default())?;
//! let output = reactor.run()?;
//! for (module, &root) in output.modules() {
//!     println!("{module}: {:?}", output.type_name(root));
//! }
//! ```

pub mod error;
pub use error::ReactorError;

// Generator tree and arena
pub mod generator;
pub use generator::{
    AugmentState, Composite, GenId, Generator, GeneratorArena, GeneratorKind, GroupingState,
    RefTarget, TypeBinding,
};

// Original links of `uses` copies
pub mod original;
pub use original::OriginalLink;

// Naming strategies and collision domains
pub mod naming;
pub use naming::{NamingLevel, NamingStrategy, StatementNamespace};
pub mod collision;
pub use collision::{CollisionDomain, DomainId, Member, MemberId, Naming};

// Linkage
pub mod augment;
pub use augment::{AugmentRequirement, AugmentResolver, AugmentScope, LinkageProgress};
pub mod context;
pub use context::{GeneratorContext, Leniency, LinkContext, ScopedKind};

// Materialization
pub mod types;
pub use types::{
    BINDING_PACKAGE, CodegenMetadata, Constant, GeneratedType, JavaTypeName, MethodSignature,
    TypeKind, TypeRef,
};
pub mod builder;
pub use builder::{
    CodegenTypeBuilderFactory, GeneratedTypeBuilder, RuntimeTypeBuilderFactory, TypeBuilder,
    TypeBuilderFactory,
};
pub mod materialize;
pub use materialize::TypeNames;

pub mod reactor;
pub use reactor::{Reactor, ReactorOptions, ReactorOutput, ReactorState};
