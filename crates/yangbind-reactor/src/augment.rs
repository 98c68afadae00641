//! Augment linkage.
//!
//! An `AugmentRequirement` walks an augment's target path one schema node at
//! a time. A step can only be taken once the next node exists, which for a
//! node contributed by another augment means once that augment has been
//! registered; so walking is resumable and driven by the stage 3 fixpoint.
//! Once the target is reached the augment is registered on it, and the
//! requirement is done when the target's original generator is known.

use crate::error::ReactorError;
use crate::generator::{GenId, GeneratorArena, GeneratorKind};
use rustc_hash::FxHashSet;
use std::fmt;
use tracing::trace;
use yangbind_common::QName;
use yangbind_model::{SchemaContext, StmtId};

/// Result of one linkage attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LinkageProgress {
    NoProgress,
    SomeProgress,
    Done,
}

impl LinkageProgress {
    pub fn made_progress(self) -> bool {
        !matches!(self, Self::NoProgress)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AugmentScope {
    /// Top-level `augment` with an absolute target.
    Module,
    /// `augment` declared under a `uses`.
    Uses,
    /// Copy of a `uses` augment inside an instantiated grouping. Registers the
    /// declaring augment on the instantiated target and completes.
    Instantiated,
}

#[derive(Clone, Debug)]
pub struct AugmentRequirement {
    pub augment: GenId,
    pub scope: AugmentScope,
    pub start: GenId,
    pub path: Vec<QName>,
    position: usize,
    current: GenId,
    registered: bool,
}

impl AugmentRequirement {
    pub fn new(augment: GenId, scope: AugmentScope, start: GenId, path: Vec<QName>) -> Self {
        Self {
            augment,
            scope,
            start,
            path,
            position: 0,
            current: start,
            registered: false,
        }
    }

    /// The node reached so far.
    pub fn current(&self) -> GenId {
        self.current
    }

    pub fn resolve(&mut self, arena: &mut GeneratorArena) -> LinkageProgress {
        let mut progress = false;
        while let Some(step) = self.path.get(self.position) {
            match find_schema_child(arena, self.current, step) {
                Some(next) => {
                    self.current = next;
                    self.position += 1;
                    progress = true;
                }
                None => {
                    trace!(augment = %self.augment, step = %step, "augment target step not available");
                    return if progress {
                        LinkageProgress::SomeProgress
                    } else {
                        LinkageProgress::NoProgress
                    };
                }
            }
        }

        if !self.registered {
            arena.register_augment(self.current, self.augment, self.scope);
            self.registered = true;
            progress = true;
        }
        if self.scope == AugmentScope::Instantiated {
            return LinkageProgress::Done;
        }
        match arena.original(self.current) {
            Some(target) => {
                arena.set_augment_target(self.augment, target);
                LinkageProgress::Done
            }
            None if progress => LinkageProgress::SomeProgress,
            None => LinkageProgress::NoProgress,
        }
    }

    pub fn describe(&self, arena: &GeneratorArena, ctx: &SchemaContext) -> String {
        let missing = self
            .path
            .get(self.position)
            .map_or_else(String::new, |q| format!(", missing '{}'", q.local_name));
        format!(
            "augment {} at {}{}",
            arena.describe(ctx, self.augment),
            arena.describe(ctx, self.current),
            missing
        )
    }
}

impl fmt::Display for AugmentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Module => "module",
            Self::Uses => "uses",
            Self::Instantiated => "instantiated",
        })
    }
}

fn find_schema_child(arena: &GeneratorArena, parent: GenId, name: &QName) -> Option<GenId> {
    arena
        .schema_children(parent)
        .into_iter()
        .find(|&c| arena.get(c).qname.as_ref() == Some(name))
}

impl GeneratorArena {
    pub(crate) fn register_augment(&mut self, site: GenId, augment: GenId, scope: AugmentScope) {
        if let Some(composite) = self.get_mut(site).composite.as_mut()
            && !composite.site_augments.contains(&augment)
        {
            composite.site_augments.push(augment);
        }
        if scope != AugmentScope::Instantiated
            && let GeneratorKind::ModuleAugment(state) | GeneratorKind::UsesAugment(state) =
                &mut self.get_mut(augment).kind
        {
            state.site = Some(site);
        }
    }

    pub(crate) fn set_augment_target(&mut self, augment: GenId, target: GenId) {
        if let GeneratorKind::ModuleAugment(state) | GeneratorKind::UsesAugment(state) =
            &mut self.get_mut(augment).kind
        {
            state.target = Some(target);
        }
    }
}

/// Scope stack used to find the declaration of an instantiated augment.
#[derive(Debug, Default)]
pub struct AugmentResolver {
    stack: Vec<GenId>,
}

impl AugmentResolver {
    pub fn enter(&mut self, composite: GenId) {
        self.stack.push(composite);
    }

    pub fn exit(&mut self) {
        self.stack.pop();
    }

    /// The `UsesAugment` generator an instantiated `augment` was copied from.
    ///
    /// Frames are searched innermost first: a frame's own augments, then
    /// everything reachable through the groupings it uses. Not finding it is
    /// an internal inconsistency of the input tree.
    pub fn get_augment(
        &self,
        arena: &GeneratorArena,
        ctx: &SchemaContext,
        statement: StmtId,
    ) -> Result<GenId, ReactorError> {
        let declared = ctx.get(statement).declared;
        let mut visited = FxHashSet::default();
        for &frame in self.stack.iter().rev() {
            if let Some(found) = search_frame(arena, frame, declared, &mut visited) {
                return Ok(found);
            }
        }
        Err(ReactorError::UnresolvedAugment {
            augment: ctx.describe(statement),
            reason: "no declaring augment in scope".to_string(),
        })
    }
}

fn search_frame(
    arena: &GeneratorArena,
    frame: GenId,
    declared: StmtId,
    visited: &mut FxHashSet<GenId>,
) -> Option<GenId> {
    let composite = arena.composite(frame)?;
    if let Some(&found) = composite
        .augments
        .iter()
        .find(|&&a| arena.get(a).statement == declared)
    {
        return Some(found);
    }
    composite
        .groupings
        .iter()
        .find_map(|&g| search_grouping(arena, g, declared, visited))
}

/// Search a grouping's whole subtree, following the groupings it uses.
fn search_grouping(
    arena: &GeneratorArena,
    node: GenId,
    declared: StmtId,
    visited: &mut FxHashSet<GenId>,
) -> Option<GenId> {
    if !visited.insert(node) {
        return None;
    }
    if let Some(found) = search_frame(arena, node, declared, visited) {
        return Some(found);
    }
    arena
        .children(node)
        .iter()
        .find_map(|&c| search_grouping(arena, c, declared, visited))
}

#[cfg(test)]
#[path = "tests/augment_tests.rs"]
mod augment_tests;
