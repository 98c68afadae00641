//! Resolution API used while linking.
//!
//! Stages build a `LinkContext` over the arena (immutably borrowed) and the
//! scope stack of the generator being linked, collect what they resolved, and
//! apply the results to the arena afterwards.

use crate::error::ReactorError;
use crate::generator::{GenId, GeneratorArena, GeneratorKind, RefTarget, TypeBinding};
use tracing::trace;
use yangbind_common::{QName, QNameModule};
use yangbind_model::{PathExpression, PathStep, SchemaContext, TypeSpec};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopedKind {
    Grouping,
    Typedef,
}

impl ScopedKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Grouping => "grouping",
            Self::Typedef => "typedef",
        }
    }

    fn matches(self, kind: &GeneratorKind) -> bool {
        match self {
            Self::Grouping => matches!(kind, GeneratorKind::Grouping(_)),
            Self::Typedef => matches!(kind, GeneratorKind::Typedef { .. }),
        }
    }
}

/// How a failed reference resolution is treated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Leniency {
    /// Every failure aborts the run.
    Strict,
    /// Relative leafref paths that do not resolve stay unresolved. Used for
    /// typedefs, which have no data-tree position of their own.
    RelativePaths,
    /// Every failure leaves the reference unresolved.
    Lenient,
}

impl Leniency {
    fn tolerates_path(self, path: &PathExpression) -> bool {
        match self {
            Self::Strict => false,
            Self::RelativePaths => !path.absolute,
            Self::Lenient => true,
        }
    }
}

/// Lookups a generator may perform while linking.
pub trait GeneratorContext {
    /// The module generator for a namespace.
    fn resolve_module(&self, module: &QNameModule) -> Result<GenId, ReactorError>;

    /// Lexically scoped lookup of a grouping or typedef.
    fn resolve_tree_scoped(&self, kind: ScopedKind, name: &QName) -> Result<GenId, ReactorError>;

    fn resolve_identity(&self, name: &QName) -> Result<GenId, ReactorError>;

    /// Leaf or leaf-list a leafref `path` declared at `site` points to.
    fn resolve_leafref(&self, site: GenId, path: &PathExpression) -> Option<GenId>;
}

pub struct LinkContext<'a> {
    arena: &'a GeneratorArena,
    ctx: &'a SchemaContext,
    /// Enclosing composites, module first.
    stack: &'a [GenId],
}

impl<'a> LinkContext<'a> {
    pub fn new(arena: &'a GeneratorArena, ctx: &'a SchemaContext, stack: &'a [GenId]) -> Self {
        Self { arena, ctx, stack }
    }

    fn module_of(&self, id: GenId) -> Option<&'a QNameModule> {
        let module = self.arena.get(id).module;
        self.ctx
            .module_of(self.arena.get(module).statement)
            .map(|m| &m.qname_module)
    }

    fn child_named(&self, parent: GenId, kind: ScopedKind, name: &QName) -> Option<GenId> {
        self.arena.children(parent).iter().copied().find(|&c| {
            let child = self.arena.get(c);
            kind.matches(&child.kind) && child.qname.as_ref() == Some(name)
        })
    }

    fn site(&self) -> String {
        self.stack
            .last()
            .map_or_else(|| "<root>".to_string(), |&g| self.arena.describe(self.ctx, g))
    }

    /// Link the name references of a declared type. Leafrefs and
    /// identityrefs stay pending until stage 7.
    pub fn bind_type(&self, spec: &TypeSpec) -> Result<TypeBinding, ReactorError> {
        Ok(match spec {
            TypeSpec::Builtin(builtin) => TypeBinding::Builtin(*builtin),
            TypeSpec::Typedef(name) => {
                TypeBinding::Typedef(self.resolve_tree_scoped(ScopedKind::Typedef, name)?)
            }
            TypeSpec::Enumeration(values) => TypeBinding::Enumeration(values.clone()),
            TypeSpec::Bits(bits) => TypeBinding::Bits(bits.clone()),
            TypeSpec::Union(members) => TypeBinding::Union(
                members
                    .iter()
                    .map(|m| self.bind_type(m))
                    .collect::<Result<_, _>>()?,
            ),
            TypeSpec::Leafref(path) => TypeBinding::Leafref {
                path: path.clone(),
                target: RefTarget::Pending,
            },
            TypeSpec::Identityref(bases) => TypeBinding::Identityref {
                bases: bases.clone(),
                targets: vec![RefTarget::Pending; bases.len()],
            },
            TypeSpec::InstanceIdentifier => TypeBinding::InstanceIdentifier,
        })
    }

    /// Resolve pending leafrefs and identityrefs of `binding` declared at
    /// `site`. Failures `leniency` tolerates bind to `RefTarget::Unresolved`.
    pub fn bind_references(
        &self,
        site: GenId,
        binding: &TypeBinding,
        leniency: Leniency,
    ) -> Result<TypeBinding, ReactorError> {
        Ok(match binding {
            TypeBinding::Leafref {
                path,
                target: RefTarget::Pending,
            } => {
                let target = match self.resolve_leafref(site, path) {
                    Some(target) => RefTarget::Resolved(target),
                    None if leniency.tolerates_path(path) => {
                        trace!(site = %site, %path, "leafref left unresolved");
                        RefTarget::Unresolved
                    }
                    None => {
                        return Err(ReactorError::UnresolvedLeafref {
                            path: path.to_string(),
                            site: self.arena.describe(self.ctx, site),
                        });
                    }
                };
                TypeBinding::Leafref {
                    path: path.clone(),
                    target,
                }
            }
            TypeBinding::Identityref { bases, targets } => {
                let mut resolved = Vec::with_capacity(targets.len());
                for (base, target) in bases.iter().zip(targets) {
                    resolved.push(match target {
                        RefTarget::Pending => match self.resolve_identity(base) {
                            Ok(identity) => RefTarget::Resolved(identity),
                            Err(_) if leniency == Leniency::Lenient => RefTarget::Unresolved,
                            Err(err) => return Err(err),
                        },
                        done => done.clone(),
                    });
                }
                TypeBinding::Identityref {
                    bases: bases.clone(),
                    targets: resolved,
                }
            }
            TypeBinding::Union(members) => TypeBinding::Union(
                members
                    .iter()
                    .map(|m| self.bind_references(site, m, leniency))
                    .collect::<Result<_, _>>()?,
            ),
            other => other.clone(),
        })
    }
}

impl GeneratorContext for LinkContext<'_> {
    fn resolve_module(&self, module: &QNameModule) -> Result<GenId, ReactorError> {
        self.arena
            .module_by_namespace(module)
            .ok_or_else(|| ReactorError::UnresolvedModule(module.to_string()))
    }

    fn resolve_tree_scoped(&self, kind: ScopedKind, name: &QName) -> Result<GenId, ReactorError> {
        let same_module = self
            .stack
            .last()
            .and_then(|&top| self.module_of(top))
            .is_some_and(|m| m == &name.module);
        if same_module {
            for &frame in self.stack.iter().rev() {
                if let Some(found) = self.child_named(frame, kind, name) {
                    return Ok(found);
                }
            }
        }
        let module = self.resolve_module(&name.module)?;
        self.child_named(module, kind, name)
            .ok_or_else(|| ReactorError::UnresolvedReference {
                kind: kind.name(),
                name: name.to_string(),
                site: self.site(),
            })
    }

    fn resolve_identity(&self, name: &QName) -> Result<GenId, ReactorError> {
        let module = self.resolve_module(&name.module)?;
        self.arena
            .children(module)
            .iter()
            .copied()
            .find(|&c| {
                let child = self.arena.get(c);
                matches!(child.kind, GeneratorKind::Identity { .. })
                    && child.qname.as_ref() == Some(name)
            })
            .ok_or_else(|| ReactorError::UnresolvedReference {
                kind: "identity",
                name: name.to_string(),
                site: self.site(),
            })
    }

    fn resolve_leafref(&self, site: GenId, path: &PathExpression) -> Option<GenId> {
        let mut current = if path.absolute {
            let first = path.steps.iter().find_map(|s| match s {
                PathStep::Child(q) => Some(q),
                PathStep::Parent => None,
            })?;
            self.resolve_module(&first.module).ok()?
        } else {
            site
        };
        for step in &path.steps {
            current = match step {
                PathStep::Parent => self.arena.data_parent(current)?,
                PathStep::Child(name) => self
                    .arena
                    .data_children(current)
                    .into_iter()
                    .find(|&c| self.arena.get(c).qname.as_ref() == Some(name))?,
            };
        }
        matches!(
            self.arena.get(current).kind,
            GeneratorKind::Leaf { .. } | GeneratorKind::LeafList { .. }
        )
        .then_some(current)
    }
}

#[cfg(test)]
#[path = "tests/context_tests.rs"]
mod context_tests;
