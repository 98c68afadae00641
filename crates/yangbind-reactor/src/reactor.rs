//! The nine-stage reactor.
//!
//! A `Reactor` owns the generator arena of one schema context and drives it
//! from `Initialized` through `Executing` to `Finished`. Each stage is a
//! method on the reactor; stages that collect lookups through a
//! `LinkContext` apply their results to the arena once the lookups are done.

use crate::augment::{AugmentRequirement, AugmentResolver, AugmentScope, LinkageProgress};
use crate::builder::{CodegenTypeBuilderFactory, RuntimeTypeBuilderFactory, TypeBuilderFactory};
use crate::collision::{DomainId, MemberId, Naming};
use crate::context::{GeneratorContext, Leniency, LinkContext, ScopedKind};
use crate::error::ReactorError;
use crate::generator::{GenId, GeneratorArena, GeneratorKind, RefTarget, TypeBinding};
use crate::materialize::{Materializer, TypeNames};
use crate::naming::{NamingStrategy, StatementNamespace};
use crate::types::{GeneratedType, JavaTypeName};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{Level, debug, span, trace};
use yangbind_common::{QName, QNameModule};
use yangbind_common::limits::DEFAULT_MAX_FIXPOINT_PASSES;
use yangbind_model::{SchemaContext, StmtId, TypeSpec};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReactorOptions {
    /// Attach source documentation to generated types.
    pub documentation: bool,
    /// Upper bound for every fixpoint loop.
    pub max_fixpoint_passes: usize,
}

impl Default for ReactorOptions {
    fn default() -> Self {
        Self {
            documentation: true,
            max_fixpoint_passes: DEFAULT_MAX_FIXPOINT_PASSES,
        }
    }
}

#[derive(Debug)]
pub enum ReactorState {
    Initialized,
    Executing,
    Finished(Box<ReactorOutput>),
    Failed,
}

pub struct Reactor<'a> {
    ctx: &'a SchemaContext,
    options: ReactorOptions,
    arena: GeneratorArena,
    naming: Naming,
    state: ReactorState,
}

impl<'a> Reactor<'a> {
    /// Build the generator tree of `ctx`. Fails on an import cycle.
    pub fn new(ctx: &'a SchemaContext, options: ReactorOptions) -> Result<Self, ReactorError> {
        Ok(Self {
            ctx,
            options,
            arena: GeneratorArena::build(ctx)?,
            naming: Naming::default(),
            state: ReactorState::Initialized,
        })
    }

    pub fn state(&self) -> &ReactorState {
        &self.state
    }

    pub fn arena(&self) -> &GeneratorArena {
        match &self.state {
            ReactorState::Finished(output) => &output.arena,
            _ => &self.arena,
        }
    }

    /// Run with the builder factory selected by `ReactorOptions::documentation`.
    pub fn run(&mut self) -> Result<&ReactorOutput, ReactorError> {
        if self.options.documentation {
            self.execute(&CodegenTypeBuilderFactory)
        } else {
            self.execute(&RuntimeTypeBuilderFactory)
        }
    }

    /// Run all stages once. A finished reactor returns its memoized output;
    /// a reactor that is executing or has failed refuses to run.
    pub fn execute(
        &mut self,
        factory: &dyn TypeBuilderFactory,
    ) -> Result<&ReactorOutput, ReactorError> {
        if matches!(self.state, ReactorState::Initialized) {
            self.state = ReactorState::Executing;
            match self.execute_stages(factory) {
                Ok(output) => self.state = ReactorState::Finished(Box::new(output)),
                Err(err) => {
                    debug!(error = %err, "reactor failed");
                    self.state = ReactorState::Failed;
                    return Err(err);
                }
            }
        }
        match &self.state {
            ReactorState::Finished(output) => Ok(output.as_ref()),
            ReactorState::Executing => Err(ReactorError::IllegalState("already executing")),
            ReactorState::Failed => Err(ReactorError::IllegalState("failed")),
            ReactorState::Initialized => Err(ReactorError::IllegalState("not started")),
        }
    }

    /// Original generator of `id`, linking on demand before the run.
    pub fn original(&mut self, id: GenId) -> Option<GenId> {
        match &self.state {
            ReactorState::Finished(output) => output.original(id),
            _ => self.arena.original(id),
        }
    }

    fn execute_stages(
        &mut self,
        factory: &dyn TypeBuilderFactory,
    ) -> Result<ReactorOutput, ReactorError> {
        self.link_uses()?;
        let requirements = self.start_augments()?;
        self.link_originals(requirements)?;
        self.link_types()?;
        self.propagate_grouping_usage()?;
        self.link_child_of();
        self.bind_references()?;
        self.assign_names()?;
        let materialized = {
            let _span = span!(Level::DEBUG, "reactor_stage", stage = 9).entered();
            let materialized =
                Materializer::new(&self.arena, &self.naming, self.ctx, factory).run()?;
            debug!(
                types = materialized.types.len(),
                keys = materialized.key_types.len(),
                "materialized types"
            );
            materialized
        };

        let arena = std::mem::take(&mut self.arena);
        let modules = arena
            .modules()
            .iter()
            .filter_map(|&m| arena.namespace_of(m).map(|ns| (ns.clone(), m)))
            .collect();
        Ok(ReactorOutput {
            arena,
            naming: std::mem::take(&mut self.naming),
            modules,
            types: materialized.types,
            key_types: materialized.key_types,
        })
    }

    fn describe(&self, id: GenId) -> String {
        self.arena.describe(self.ctx, id)
    }

    /// Stage 1: resolve every declared `uses` to its grouping.
    pub(crate) fn link_uses(&mut self) -> Result<(), ReactorError> {
        let _span = span!(Level::DEBUG, "reactor_stage", stage = 1).entered();
        let mut links = Vec::new();
        for generator in self.arena.iter() {
            let Some(composite) = &generator.composite else {
                continue;
            };
            if composite.uses.is_empty() {
                continue;
            }
            let stack = self.arena.scope_of(generator.id);
            let lookup = LinkContext::new(&self.arena, self.ctx, &stack);
            for &uses in &composite.uses {
                let Some(name) = self.ctx.get(uses).qname() else {
                    continue;
                };
                let grouping = lookup.resolve_tree_scoped(ScopedKind::Grouping, name)?;
                trace!(user = %generator.id, %grouping, "linked uses");
                links.push((generator.id, grouping));
            }
        }
        debug!(uses = links.len(), "linked uses");
        for (user, grouping) in links {
            if let Some(composite) = self.arena.get_mut(user).composite.as_mut() {
                composite.groupings.push(grouping);
            }
            self.arena.add_grouping_user(grouping, user)?;
        }
        Ok(())
    }

    /// Stage 2: one requirement per augment, starting at the node its path
    /// is relative to.
    pub(crate) fn start_augments(&self) -> Result<Vec<AugmentRequirement>, ReactorError> {
        let _span = span!(Level::DEBUG, "reactor_stage", stage = 2).entered();
        let mut requirements = Vec::new();
        let mut resolver = AugmentResolver::default();
        for &module in self.arena.modules() {
            self.start_augments_in(module, &mut resolver, &mut requirements)?;
        }
        debug!(requirements = requirements.len(), "started augment linkage");
        Ok(requirements)
    }

    fn start_augments_in(
        &self,
        id: GenId,
        resolver: &mut AugmentResolver,
        out: &mut Vec<AugmentRequirement>,
    ) -> Result<(), ReactorError> {
        let generator = self.arena.get(id);
        let Some(composite) = &generator.composite else {
            return Ok(());
        };
        resolver.enter(id);

        match &generator.kind {
            GeneratorKind::ModuleAugment(_) => {
                let path = self.augment_path(generator.statement)?;
                let stack = [generator.module];
                let start = LinkContext::new(&self.arena, self.ctx, &stack)
                    .resolve_module(&path[0].module)
                    .map_err(|err| ReactorError::UnresolvedAugment {
                        augment: self.describe(id),
                        reason: err.to_string(),
                    })?;
                out.push(AugmentRequirement::new(id, AugmentScope::Module, start, path));
            }
            GeneratorKind::UsesAugment(_) => {
                let path = self.augment_path(generator.statement)?;
                let Some(parent) = generator.parent else {
                    return Err(ReactorError::UnresolvedAugment {
                        augment: self.describe(id),
                        reason: "uses augment without a parent".to_string(),
                    });
                };
                out.push(AugmentRequirement::new(id, AugmentScope::Uses, parent, path));
            }
            _ => {}
        }

        for &statement in &composite.instantiated_augments {
            let declaring = resolver.get_augment(&self.arena, self.ctx, statement)?;
            let path = self.augment_path(statement)?;
            out.push(AugmentRequirement::new(
                declaring,
                AugmentScope::Instantiated,
                id,
                path,
            ));
        }

        for &child in &composite.children {
            self.start_augments_in(child, resolver, out)?;
        }
        resolver.exit();
        Ok(())
    }

    fn augment_path(&self, statement: StmtId) -> Result<Vec<QName>, ReactorError> {
        match self.ctx.get(statement).schema_node_id() {
            Some(target) if !target.steps.is_empty() => Ok(target.steps.clone()),
            _ => Err(ReactorError::UnresolvedAugment {
                augment: self.ctx.describe(statement),
                reason: "empty target path".to_string(),
            }),
        }
    }

    /// Stage 3: link every copy to its original and walk every augment to
    /// its target until nothing is left. A pass without progress means the
    /// rest can never link.
    pub(crate) fn link_originals(
        &mut self,
        mut requirements: Vec<AugmentRequirement>,
    ) -> Result<(), ReactorError> {
        let _span = span!(Level::DEBUG, "reactor_stage", stage = 3).entered();
        let mut pending: IndexMap<GenId, Vec<GenId>> = IndexMap::new();
        for &module in self.arena.modules() {
            pending.insert(module, Vec::new());
        }
        for generator in self.arena.iter() {
            pending
                .entry(generator.module)
                .or_default()
                .push(generator.id);
        }

        let mut passes = 0usize;
        while !requirements.is_empty() || pending.values().any(|p| !p.is_empty()) {
            passes += 1;
            if passes > self.options.max_fixpoint_passes {
                return Err(self.stalled(&requirements, &pending));
            }
            let arena = &mut self.arena;
            let mut progress = false;
            requirements.retain_mut(|requirement| {
                let step = requirement.resolve(arena);
                progress |= step.made_progress();
                step != LinkageProgress::Done
            });
            for ids in pending.values_mut() {
                ids.retain(|&id| {
                    let linked = arena.link_original(id);
                    progress |= linked;
                    !linked
                });
            }
            if !progress {
                return Err(self.stalled(&requirements, &pending));
            }
        }

        let mut unresolved = Vec::new();
        for index in 0..self.arena.len() {
            let id = GenId(index as u32);
            if self.arena.original(id).is_none() {
                unresolved.push(self.describe(id));
            }
        }
        if !unresolved.is_empty() {
            return Err(ReactorError::StalledLinkage {
                stage: "original-link",
                stuck: unresolved,
            });
        }
        debug!(passes, "linked originals");
        Ok(())
    }

    fn stalled(
        &self,
        requirements: &[AugmentRequirement],
        pending: &IndexMap<GenId, Vec<GenId>>,
    ) -> ReactorError {
        let mut stuck: Vec<String> = requirements
            .iter()
            .map(|r| r.describe(&self.arena, self.ctx))
            .collect();
        stuck.extend(pending.values().flatten().map(|&id| self.describe(id)));
        ReactorError::StalledLinkage {
            stage: "original-link",
            stuck,
        }
    }

    /// Stage 4: link typedef references and identity bases.
    ///
    /// Copies reuse their original's binding, since type names inside a
    /// grouping resolve where the grouping is declared; only leafref paths
    /// are taken from the copy.
    pub(crate) fn link_types(&mut self) -> Result<(), ReactorError> {
        let _span = span!(Level::DEBUG, "reactor_stage", stage = 4).entered();
        let mut bindings: Vec<(GenId, TypeBinding)> = Vec::new();
        let mut bases: Vec<(GenId, Vec<GenId>)> = Vec::new();
        for generator in self.arena.iter().filter(|g| !g.added_by_uses) {
            let stmt = self.ctx.get(generator.statement);
            match &generator.kind {
                GeneratorKind::Leaf { .. }
                | GeneratorKind::LeafList { .. }
                | GeneratorKind::Typedef { .. } => {
                    let Some(spec) = &stmt.type_spec else {
                        continue;
                    };
                    let stack = generator
                        .parent
                        .map(|p| self.arena.scope_of(p))
                        .unwrap_or_default();
                    let binding = LinkContext::new(&self.arena, self.ctx, &stack).bind_type(spec)?;
                    bindings.push((generator.id, binding));
                }
                GeneratorKind::Identity { .. } => {
                    let stack = [generator.module];
                    let lookup = LinkContext::new(&self.arena, self.ctx, &stack);
                    let resolved = stmt
                        .bases
                        .iter()
                        .map(|b| lookup.resolve_identity(b))
                        .collect::<Result<Vec<_>, _>>()?;
                    bases.push((generator.id, resolved));
                }
                _ => {}
            }
        }
        let declared = bindings.len();
        for (id, binding) in bindings {
            if let Some(slot) = self.arena.get_mut(id).kind.binding_mut() {
                *slot = Some(binding);
            }
        }
        for (id, resolved) in bases {
            if let GeneratorKind::Identity { bases } = &mut self.arena.get_mut(id).kind {
                *bases = resolved;
            }
        }

        let mut copies = Vec::new();
        for generator in self.arena.iter().filter(|g| g.added_by_uses) {
            let Some(original) = self.arena.original_of(generator.id) else {
                continue;
            };
            let (Some(binding), Some(spec)) = (
                self.arena.get(original).kind.binding(),
                &self.ctx.get(generator.statement).type_spec,
            ) else {
                continue;
            };
            copies.push((generator.id, rebase_leafrefs(binding, spec)));
        }
        debug!(declared, copies = copies.len(), "linked types");
        for (id, binding) in copies {
            if let Some(slot) = self.arena.get_mut(id).kind.binding_mut() {
                *slot = Some(binding);
            }
        }
        Ok(())
    }

    /// Stage 5: mark groupings used, transitively through other used
    /// groupings, then freeze every user set.
    pub(crate) fn propagate_grouping_usage(&mut self) -> Result<(), ReactorError> {
        let _span = span!(Level::DEBUG, "reactor_stage", stage = 5).entered();
        let groupings: Vec<GenId> = self
            .arena
            .iter()
            .filter(|g| matches!(g.kind, GeneratorKind::Grouping(_)))
            .map(|g| g.id)
            .collect();

        let mut used: FxHashSet<GenId> = FxHashSet::default();
        for &grouping in &groupings {
            let direct = self.arena.grouping_state(grouping).is_some_and(|state| {
                state
                    .users
                    .iter()
                    .any(|&user| !self.arena.is_within_grouping(user))
            });
            if direct {
                used.insert(grouping);
            }
        }

        let mut remaining: Vec<GenId> = groupings
            .iter()
            .copied()
            .filter(|g| !used.contains(g))
            .collect();
        let mut found: Vec<GenId> = used.iter().copied().collect();
        found.sort();
        let mut passes = 0usize;
        loop {
            passes += 1;
            if passes > self.options.max_fixpoint_passes {
                return Err(ReactorError::StalledLinkage {
                    stage: "grouping-usage",
                    stuck: remaining.iter().map(|&g| self.describe(g)).collect(),
                });
            }
            let mut newly_found = Vec::new();
            for &grouping in &found {
                self.collect_used_groupings(grouping, &mut newly_found);
            }
            let before = remaining.len();
            remaining.retain(|g| {
                if newly_found.contains(g) {
                    used.insert(*g);
                    false
                } else {
                    true
                }
            });
            let processed = before - remaining.len();
            trace!(pass = passes, processed, "grouping usage pass");
            if processed == 0 {
                break;
            }
            found = newly_found
                .into_iter()
                .filter(|g| used.contains(g))
                .collect();
        }

        for &grouping in &groupings {
            if let Some(state) = self.arena.grouping_state_mut(grouping) {
                state.used = used.contains(&grouping);
                state.frozen = true;
            }
        }
        debug!(
            groupings = groupings.len(),
            used = used.len(),
            passes,
            "propagated grouping usage"
        );
        Ok(())
    }

    /// Groupings used anywhere inside `id`'s subtree.
    fn collect_used_groupings(&self, id: GenId, out: &mut Vec<GenId>) {
        let Some(composite) = self.arena.composite(id) else {
            return;
        };
        for &grouping in &composite.groupings {
            if !out.contains(&grouping) {
                out.push(grouping);
            }
        }
        for &child in &composite.children {
            self.collect_used_groupings(child, out);
        }
    }

    /// Stage 6: parent/child links exist since tree construction.
    pub(crate) fn link_child_of(&self) {
        let _span = span!(Level::DEBUG, "reactor_stage", stage = 6).entered();
        debug!("child-of linkage established at construction");
    }

    /// Stage 7: resolve leafrefs and identityrefs. Failures inside a
    /// grouping leave the reference unresolved; a typedef outside any
    /// grouping only tolerates relative leafref paths.
    pub(crate) fn bind_references(&mut self) -> Result<(), ReactorError> {
        let _span = span!(Level::DEBUG, "reactor_stage", stage = 7).entered();
        let mut bound = Vec::new();
        let mut unresolved = 0usize;
        for generator in self.arena.iter() {
            let Some(binding) = generator.kind.binding() else {
                continue;
            };
            let leniency = if self.arena.is_within_grouping(generator.id) {
                Leniency::Lenient
            } else if matches!(generator.kind, GeneratorKind::Typedef { .. }) {
                Leniency::RelativePaths
            } else {
                Leniency::Strict
            };
            let stack = self.arena.scope_of(generator.id);
            let linked = LinkContext::new(&self.arena, self.ctx, &stack).bind_references(
                generator.id,
                binding,
                leniency,
            )?;
            if has_unresolved(&linked) {
                unresolved += 1;
            }
            bound.push((generator.id, linked));
        }
        debug!(bound = bound.len(), unresolved, "bound references");
        for (id, binding) in bound {
            if let Some(slot) = self.arena.get_mut(id).kind.binding_mut() {
                *slot = Some(binding);
            }
        }
        Ok(())
    }

    /// Stage 8: give every generator its naming member, then solve all
    /// collision domains together.
    pub(crate) fn assign_names(&mut self) -> Result<(), ReactorError> {
        let _span = span!(Level::DEBUG, "reactor_stage", stage = 8).entered();
        let modules = self.arena.modules().to_vec();
        for module in modules {
            let name = self
                .ctx
                .module_of(self.arena.get(module).statement)
                .map(|m| m.name.clone())
                .unwrap_or_default();
            let domain = self.naming.add_domain(module);
            let member = self
                .naming
                .add_primary(domain, module, NamingStrategy::module(&name));
            let generator = self.arena.get_mut(module);
            generator.member = Some(member);
            if let Some(composite) = generator.composite.as_mut() {
                composite.domain = Some(domain);
            }
            let mut ordinals = FxHashMap::default();
            self.assign_child_names(module, domain, member, &mut ordinals);
        }

        let arena = &self.arena;
        let ctx = self.ctx;
        let passes = self
            .naming
            .solve(self.options.max_fixpoint_passes, &|id| arena.describe(ctx, id))?;
        debug!(domains = self.naming.domains().len(), passes, "solved naming");
        Ok(())
    }

    fn assign_child_names(
        &mut self,
        owner: GenId,
        domain: DomainId,
        owner_member: MemberId,
        ordinals: &mut FxHashMap<(DomainId, String), u32>,
    ) {
        let mut shadowed = false;
        let children = self.arena.children(owner).to_vec();
        for child in children {
            let generator = self.arena.get(child);
            if generator.added_by_uses {
                continue;
            }
            let local_name = generator.local_name().to_string();
            let member = match &generator.kind {
                GeneratorKind::Input | GeneratorKind::Output => {
                    let suffix = if matches!(generator.kind, GeneratorKind::Input) {
                        "Input"
                    } else {
                        "Output"
                    };
                    let operation_domain = self
                        .arena
                        .composite(owner)
                        .and_then(|c| c.domain)
                        .unwrap_or(domain);
                    Some(
                        self.naming
                            .add_secondary(operation_domain, child, owner_member, suffix),
                    )
                }
                GeneratorKind::ModuleAugment(_) | GeneratorKind::UsesAugment(_) => {
                    let target = self
                        .ctx
                        .get(generator.statement)
                        .schema_node_id()
                        .and_then(|t| t.last())
                        .map_or_else(String::new, |q| q.local_name.clone());
                    let ordinal = ordinals.entry((domain, target.clone())).or_insert(0);
                    *ordinal += 1;
                    Some(self.naming.add_primary(
                        domain,
                        child,
                        NamingStrategy::augment(&target, *ordinal),
                    ))
                }
                GeneratorKind::Leaf { binding } | GeneratorKind::LeafList { binding } => {
                    match binding {
                        Some(binding) if binding.is_inline_definition() => {
                            if !shadowed {
                                // Nested types must not reuse the enclosing class name.
                                self.naming.add_secondary(domain, owner, owner_member, "");
                                shadowed = true;
                            }
                            Some(self.naming.add_primary(
                                domain,
                                child,
                                NamingStrategy::new(StatementNamespace::Leaf, local_name),
                            ))
                        }
                        _ => None,
                    }
                }
                kind => namespace_of(kind).map(|namespace| {
                    self.naming
                        .add_primary(domain, child, NamingStrategy::new(namespace, local_name))
                }),
            };
            let Some(member) = member else {
                continue;
            };
            self.arena.get_mut(child).member = Some(member);

            if let GeneratorKind::List { keyed: true, .. } = self.arena.get(child).kind {
                let key = self.naming.add_secondary(domain, child, member, "Key");
                if let GeneratorKind::List { key_member, .. } = &mut self.arena.get_mut(child).kind
                {
                    *key_member = Some(key);
                }
            }

            if self.arena.get(child).kind.is_composite() {
                let child_domain = self.naming.add_domain(child);
                if let Some(composite) = self.arena.get_mut(child).composite.as_mut() {
                    composite.domain = Some(child_domain);
                }
                self.assign_child_names(child, child_domain, member, ordinals);
            }
        }
    }
}

fn namespace_of(kind: &GeneratorKind) -> Option<StatementNamespace> {
    Some(match kind {
        GeneratorKind::Container => StatementNamespace::Container,
        GeneratorKind::List { .. } => StatementNamespace::List,
        GeneratorKind::Choice => StatementNamespace::Choice,
        GeneratorKind::Case => StatementNamespace::Case,
        GeneratorKind::Grouping(_) => StatementNamespace::Grouping,
        GeneratorKind::Typedef { .. } => StatementNamespace::Typedef,
        GeneratorKind::Identity { .. } => StatementNamespace::Identity,
        GeneratorKind::Rpc => StatementNamespace::Rpc,
        GeneratorKind::Action | GeneratorKind::KeyedListAction => StatementNamespace::Action,
        GeneratorKind::Notification
        | GeneratorKind::InstanceNotification
        | GeneratorKind::KeyedListNotification => StatementNamespace::Notification,
        GeneratorKind::Opaque => StatementNamespace::AnyData,
        _ => return None,
    })
}

/// A copy's binding: the original's, with leafref paths taken from the copy
/// and left pending.
fn rebase_leafrefs(original: &TypeBinding, copy: &TypeSpec) -> TypeBinding {
    match (original, copy) {
        (TypeBinding::Leafref { .. }, TypeSpec::Leafref(path)) => TypeBinding::Leafref {
            path: path.clone(),
            target: RefTarget::Pending,
        },
        (TypeBinding::Union(members), TypeSpec::Union(specs)) => TypeBinding::Union(
            members
                .iter()
                .zip(specs)
                .map(|(m, s)| rebase_leafrefs(m, s))
                .collect(),
        ),
        (other, _) => other.clone(),
    }
}

fn has_unresolved(binding: &TypeBinding) -> bool {
    match binding {
        TypeBinding::Leafref { target, .. } => *target == RefTarget::Unresolved,
        TypeBinding::Identityref { targets, .. } => targets.contains(&RefTarget::Unresolved),
        TypeBinding::Union(members) => members.iter().any(has_unresolved),
        _ => false,
    }
}

/// Result of a finished run.
#[derive(Debug)]
pub struct ReactorOutput {
    arena: GeneratorArena,
    naming: Naming,
    modules: IndexMap<QNameModule, GenId>,
    types: FxHashMap<GenId, GeneratedType>,
    key_types: FxHashMap<GenId, GeneratedType>,
}

impl ReactorOutput {
    /// Module generators by namespace, in dependency order.
    pub fn modules(&self) -> &IndexMap<QNameModule, GenId> {
        &self.modules
    }

    pub fn module(&self, module: &QNameModule) -> Option<GenId> {
        self.modules.get(module).copied()
    }

    pub fn arena(&self) -> &GeneratorArena {
        &self.arena
    }

    pub fn naming(&self) -> &Naming {
        &self.naming
    }

    pub fn generator(&self, id: GenId) -> &crate::generator::Generator {
        self.arena.get(id)
    }

    pub fn by_statement(&self, stmt: StmtId) -> Option<GenId> {
        self.arena.by_statement(stmt)
    }

    pub fn schema_children(&self, id: GenId) -> Vec<GenId> {
        self.arena.schema_children(id)
    }

    pub fn original(&self, id: GenId) -> Option<GenId> {
        self.arena.original_of(id)
    }

    /// Original of the node an augment was registered on.
    pub fn augment_target(&self, id: GenId) -> Option<GenId> {
        self.arena.get(id).kind.augment_state()?.target
    }

    pub fn type_name(&self, id: GenId) -> Option<JavaTypeName> {
        TypeNames::new(&self.arena, &self.naming).type_name(id)
    }

    pub fn key_type_name(&self, id: GenId) -> Option<JavaTypeName> {
        TypeNames::new(&self.arena, &self.naming).key_type_name(id)
    }

    /// The type materialized for `id`. Copies share their original's type.
    pub fn generated_type(&self, id: GenId) -> Option<&GeneratedType> {
        self.types.get(&id).or_else(|| {
            let original = self.original(id).filter(|&o| o != id)?;
            self.types.get(&original)
        })
    }

    pub fn key_type(&self, id: GenId) -> Option<&GeneratedType> {
        let original = self.original(id).unwrap_or(id);
        self.key_types.get(&original)
    }

    /// Every materialized type, in generator order.
    pub fn generated_types(&self) -> impl Iterator<Item = (GenId, &GeneratedType)> {
        let mut ids: Vec<GenId> = self.types.keys().copied().collect();
        ids.sort();
        ids.into_iter()
            .filter_map(move |id| self.types.get(&id).map(|ty| (id, ty)))
    }

    pub fn is_grouping_used(&self, id: GenId) -> Option<bool> {
        self.arena.grouping_state(id).map(|state| state.used)
    }

    /// Resolved leafref target of a leaf, leaf-list or typedef.
    pub fn leafref_target(&self, id: GenId) -> Option<RefTarget> {
        match self.arena.get(id).kind.binding()? {
            TypeBinding::Leafref { target, .. } => Some(target.clone()),
            _ => None,
        }
    }

    pub fn describe(&self, ctx: &SchemaContext, id: GenId) -> String {
        self.arena.describe(ctx, id)
    }
}
