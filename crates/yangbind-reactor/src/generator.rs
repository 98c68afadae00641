//! Generator tree.
//!
//! One `Generator` per relevant statement, stored in a flat arena and
//! addressed by `GenId`. The concrete behavior of a generator is selected once,
//! at construction, by `GeneratorKind`; the payload of each kind carries the
//! state its linking stages fill in.
//!
//! `uses` statements do not get generators of their own. A declared `uses` is
//! recorded on its parent composite (stage 1 resolves it to a grouping) and
//! each of its `augment`s becomes a `UsesAugment` child of that composite. An
//! instantiated copy of a `uses` only contributes its `augment` statements to
//! `Composite::instantiated_augments`.

use crate::collision::{DomainId, MemberId};
use crate::error::ReactorError;
use crate::original::OriginalLink;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::fmt;
use tracing::debug;
use yangbind_common::{QName, QNameModule};
use yangbind_model::{
    BuiltinType, PathExpression, SchemaContext, StatementKind, StmtId,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GenId(pub u32);

impl GenId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Outcome of a leafref or identityref lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefTarget {
    Pending,
    Resolved(GenId),
    /// Lenient failure inside a grouping or typedef.
    Unresolved,
}

/// A `TypeSpec` with its references linked to generators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeBinding {
    Builtin(BuiltinType),
    Typedef(GenId),
    Enumeration(Vec<String>),
    Bits(Vec<String>),
    Union(Vec<TypeBinding>),
    Leafref {
        path: PathExpression,
        target: RefTarget,
    },
    Identityref {
        bases: Vec<QName>,
        targets: Vec<RefTarget>,
    },
    InstanceIdentifier,
}

impl TypeBinding {
    pub fn is_inline_definition(&self) -> bool {
        matches!(self, Self::Enumeration(_) | Self::Bits(_) | Self::Union(_))
    }
}

#[derive(Clone, Debug, Default)]
pub struct GroupingState {
    pub users: Vec<GenId>,
    pub used: bool,
    pub frozen: bool,
}

#[derive(Clone, Debug, Default)]
pub struct AugmentState {
    /// Original of the node the augment was registered on.
    pub target: Option<GenId>,
    /// The node the augment was registered on.
    pub site: Option<GenId>,
}

#[derive(Clone, Debug)]
pub enum GeneratorKind {
    Module,
    Container,
    List {
        keyed: bool,
        key_member: Option<MemberId>,
    },
    Leaf {
        binding: Option<TypeBinding>,
    },
    LeafList {
        binding: Option<TypeBinding>,
    },
    Typedef {
        binding: Option<TypeBinding>,
    },
    Choice,
    Case,
    Grouping(GroupingState),
    Identity {
        bases: Vec<GenId>,
    },
    Rpc,
    Action,
    KeyedListAction,
    Input,
    Output,
    Notification,
    InstanceNotification,
    KeyedListNotification,
    /// `anydata` and `anyxml`.
    Opaque,
    ModuleAugment(AugmentState),
    UsesAugment(AugmentState),
}

impl GeneratorKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Container => "container",
            Self::List { .. } => "list",
            Self::Leaf { .. } => "leaf",
            Self::LeafList { .. } => "leaf-list",
            Self::Typedef { .. } => "typedef",
            Self::Choice => "choice",
            Self::Case => "case",
            Self::Grouping(_) => "grouping",
            Self::Identity { .. } => "identity",
            Self::Rpc => "rpc",
            Self::Action => "action",
            Self::KeyedListAction => "keyed-list-action",
            Self::Input => "input",
            Self::Output => "output",
            Self::Notification => "notification",
            Self::InstanceNotification => "instance-notification",
            Self::KeyedListNotification => "keyed-list-notification",
            Self::Opaque => "opaque",
            Self::ModuleAugment(_) => "module-augment",
            Self::UsesAugment(_) => "uses-augment",
        }
    }

    pub const fn is_composite(&self) -> bool {
        !matches!(
            self,
            Self::Leaf { .. }
                | Self::LeafList { .. }
                | Self::Typedef { .. }
                | Self::Identity { .. }
                | Self::Opaque
        )
    }

    pub const fn is_augment(&self) -> bool {
        matches!(self, Self::ModuleAugment(_) | Self::UsesAugment(_))
    }

    /// Nodes that are transparent in the data tree.
    pub const fn is_choice_or_case(&self) -> bool {
        matches!(self, Self::Choice | Self::Case)
    }

    pub fn binding(&self) -> Option<&TypeBinding> {
        match self {
            Self::Leaf { binding } | Self::LeafList { binding } | Self::Typedef { binding } => {
                binding.as_ref()
            }
            _ => None,
        }
    }

    pub(crate) fn binding_mut(&mut self) -> Option<&mut Option<TypeBinding>> {
        match self {
            Self::Leaf { binding } | Self::LeafList { binding } | Self::Typedef { binding } => {
                Some(binding)
            }
            _ => None,
        }
    }

    pub fn augment_state(&self) -> Option<&AugmentState> {
        match self {
            Self::ModuleAugment(state) | Self::UsesAugment(state) => Some(state),
            _ => None,
        }
    }
}

/// Per-composite linkage state.
#[derive(Clone, Debug, Default)]
pub struct Composite {
    /// Child generators in statement order.
    pub children: Vec<GenId>,
    /// Declared `uses` statements of this node.
    pub uses: Vec<StmtId>,
    /// Groupings those `uses` resolved to, filled by stage 1.
    pub groupings: Vec<GenId>,
    /// `augment` generators declared here (module or `uses` augments).
    pub augments: Vec<GenId>,
    /// `augment` statements copied along with an instantiated `uses`.
    pub instantiated_augments: Vec<StmtId>,
    /// Augments registered on this node as their target.
    pub site_augments: Vec<GenId>,
    pub domain: Option<DomainId>,
}

#[derive(Clone, Debug)]
pub struct Generator {
    pub id: GenId,
    pub statement: StmtId,
    /// The declaration a copy was instantiated from; `statement` otherwise.
    pub declared: StmtId,
    pub parent: Option<GenId>,
    pub module: GenId,
    pub qname: Option<QName>,
    pub added_by_uses: bool,
    pub kind: GeneratorKind,
    pub composite: Option<Composite>,
    pub(crate) link: Option<OriginalLink>,
    pub(crate) member: Option<MemberId>,
}

impl Generator {
    pub fn local_name(&self) -> &str {
        self.qname.as_ref().map_or("", |q| q.local_name.as_str())
    }

    pub fn children(&self) -> &[GenId] {
        self.composite.as_ref().map_or(&[], |c| c.children.as_slice())
    }

    pub fn member(&self) -> Option<MemberId> {
        self.member
    }

    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }
}

/// Flat storage for every generator of one reactor run.
#[derive(Debug, Default)]
pub struct GeneratorArena {
    generators: Vec<Generator>,
    by_statement: FxHashMap<StmtId, GenId>,
    modules: Vec<GenId>,
    by_namespace: FxHashMap<QNameModule, GenId>,
    namespaces: FxHashMap<GenId, QNameModule>,
}

impl GeneratorArena {
    /// Build the generator tree of every module, dependencies first.
    pub fn build(ctx: &SchemaContext) -> Result<Self, ReactorError> {
        let order = module_order(ctx)?;
        let mut arena = Self::default();
        for index in order {
            let info = &ctx.modules()[index];
            let module = arena.push(ctx, info.statement, None, GeneratorKind::Module, None);
            arena.modules.push(module);
            arena.by_namespace.insert(info.qname_module.clone(), module);
            arena.namespaces.insert(module, info.qname_module.clone());
            arena.create_children(ctx, module, info.statement)?;
        }
        debug!(
            modules = arena.modules.len(),
            generators = arena.generators.len(),
            "built generator tree"
        );
        Ok(arena)
    }

    fn push(
        &mut self,
        ctx: &SchemaContext,
        statement: StmtId,
        parent: Option<GenId>,
        kind: GeneratorKind,
        module: Option<GenId>,
    ) -> GenId {
        let id = GenId(self.generators.len() as u32);
        let stmt = ctx.get(statement);
        let composite = kind.is_composite().then(Composite::default);
        self.generators.push(Generator {
            id,
            statement,
            declared: stmt.declared,
            parent,
            module: module.unwrap_or(id),
            qname: stmt.qname().cloned(),
            added_by_uses: stmt.added_by_uses,
            kind,
            composite,
            link: None,
            member: None,
        });
        self.by_statement.insert(statement, id);
        if let Some(parent) = parent
            && let Some(composite) = self.generators[parent.index()].composite.as_mut()
        {
            composite.children.push(id);
        }
        id
    }

    fn create_children(
        &mut self,
        ctx: &SchemaContext,
        parent: GenId,
        statement: StmtId,
    ) -> Result<(), ReactorError> {
        let module = self.generators[parent.index()].module;
        for &sub in ctx.substatements(statement) {
            let stmt = ctx.get(sub);
            match stmt.kind {
                StatementKind::Module => {}
                StatementKind::Uses if stmt.added_by_uses => {
                    let augments: Vec<StmtId> =
                        ctx.children_of_kind(sub, StatementKind::Augment).collect();
                    self.composite_mut(parent)
                        .instantiated_augments
                        .extend(augments);
                }
                StatementKind::Uses => {
                    self.composite_mut(parent).uses.push(sub);
                    let augments: Vec<StmtId> =
                        ctx.children_of_kind(sub, StatementKind::Augment).collect();
                    for augment in augments {
                        let id = self.push(
                            ctx,
                            augment,
                            Some(parent),
                            GeneratorKind::UsesAugment(AugmentState::default()),
                            Some(module),
                        );
                        self.composite_mut(parent).augments.push(id);
                        self.create_children(ctx, id, augment)?;
                    }
                }
                StatementKind::Augment => {
                    let id = self.push(
                        ctx,
                        sub,
                        Some(parent),
                        GeneratorKind::ModuleAugment(AugmentState::default()),
                        Some(module),
                    );
                    self.composite_mut(parent).augments.push(id);
                    self.create_children(ctx, id, sub)?;
                }
                kind => {
                    let kind = self.kind_for(ctx, kind, sub, parent);
                    let composite = kind.is_composite();
                    let id = self.push(ctx, sub, Some(parent), kind, Some(module));
                    if composite {
                        self.create_children(ctx, id, sub)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Pick the generator variant for a statement. Notifications and actions
    /// depend on the kind of their parent.
    fn kind_for(
        &self,
        ctx: &SchemaContext,
        kind: StatementKind,
        stmt: StmtId,
        parent: GenId,
    ) -> GeneratorKind {
        let parent_kind = &self.generators[parent.index()].kind;
        let keyed_parent = matches!(parent_kind, GeneratorKind::List { keyed: true, .. });
        match kind {
            StatementKind::Container => GeneratorKind::Container,
            StatementKind::List => GeneratorKind::List {
                keyed: !ctx.get(stmt).keys.is_empty(),
                key_member: None,
            },
            StatementKind::Leaf => GeneratorKind::Leaf { binding: None },
            StatementKind::LeafList => GeneratorKind::LeafList { binding: None },
            StatementKind::Typedef => GeneratorKind::Typedef { binding: None },
            StatementKind::Choice => GeneratorKind::Choice,
            StatementKind::Case => GeneratorKind::Case,
            StatementKind::Grouping => GeneratorKind::Grouping(GroupingState::default()),
            StatementKind::Identity => GeneratorKind::Identity { bases: Vec::new() },
            StatementKind::Rpc => GeneratorKind::Rpc,
            StatementKind::Action if keyed_parent => GeneratorKind::KeyedListAction,
            StatementKind::Action => GeneratorKind::Action,
            StatementKind::Input => GeneratorKind::Input,
            StatementKind::Output => GeneratorKind::Output,
            StatementKind::Notification => match parent_kind {
                GeneratorKind::Module => GeneratorKind::Notification,
                _ if keyed_parent => GeneratorKind::KeyedListNotification,
                _ => GeneratorKind::InstanceNotification,
            },
            StatementKind::AnyData | StatementKind::AnyXml => GeneratorKind::Opaque,
            // Handled by the caller.
            StatementKind::Module | StatementKind::Uses | StatementKind::Augment => {
                GeneratorKind::Opaque
            }
        }
    }

    fn composite_mut(&mut self, id: GenId) -> &mut Composite {
        self.generators[id.index()]
            .composite
            .get_or_insert_with(Composite::default)
    }

    #[inline]
    pub fn get(&self, id: GenId) -> &Generator {
        &self.generators[id.index()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: GenId) -> &mut Generator {
        &mut self.generators[id.index()]
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Generator> {
        self.generators.iter()
    }

    /// Module generators in dependency order.
    pub fn modules(&self) -> &[GenId] {
        &self.modules
    }

    pub fn module_by_namespace(&self, module: &QNameModule) -> Option<GenId> {
        self.by_namespace.get(module).copied()
    }

    /// Namespace of a module generator.
    pub fn namespace_of(&self, module: GenId) -> Option<&QNameModule> {
        self.namespaces.get(&module)
    }

    pub fn by_statement(&self, stmt: StmtId) -> Option<GenId> {
        self.by_statement.get(&stmt).copied()
    }

    pub fn children(&self, id: GenId) -> &[GenId] {
        self.get(id).children()
    }

    pub fn composite(&self, id: GenId) -> Option<&Composite> {
        self.get(id).composite.as_ref()
    }

    /// Schema-tree children: own children plus those contributed by
    /// augments registered on this node.
    pub fn schema_children(&self, id: GenId) -> Vec<GenId> {
        let Some(composite) = self.composite(id) else {
            return Vec::new();
        };
        let mut out: Vec<GenId> = composite
            .children
            .iter()
            .copied()
            .filter(|&c| self.is_schema_node(c))
            .collect();
        for &augment in &composite.site_augments {
            out.extend(
                self.children(augment)
                    .iter()
                    .copied()
                    .filter(|&c| self.is_schema_node(c)),
            );
        }
        out
    }

    fn is_schema_node(&self, id: GenId) -> bool {
        !matches!(
            self.get(id).kind,
            GeneratorKind::Grouping(_)
                | GeneratorKind::Typedef { .. }
                | GeneratorKind::Identity { .. }
                | GeneratorKind::ModuleAugment(_)
                | GeneratorKind::UsesAugment(_)
        )
    }

    pub(crate) fn add_grouping_user(
        &mut self,
        grouping: GenId,
        user: GenId,
    ) -> Result<(), ReactorError> {
        let local_name = self.get(grouping).local_name().to_string();
        match &mut self.get_mut(grouping).kind {
            GeneratorKind::Grouping(state) if state.frozen => {
                Err(ReactorError::FrozenGrouping(local_name))
            }
            GeneratorKind::Grouping(state) => {
                if !state.users.contains(&user) {
                    state.users.push(user);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn grouping_state(&self, id: GenId) -> Option<&GroupingState> {
        match &self.get(id).kind {
            GeneratorKind::Grouping(state) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn grouping_state_mut(&mut self, id: GenId) -> Option<&mut GroupingState> {
        match &mut self.get_mut(id).kind {
            GeneratorKind::Grouping(state) => Some(state),
            _ => None,
        }
    }

    /// `true` when `id` or one of its ancestors is a grouping.
    pub fn is_within_grouping(&self, id: GenId) -> bool {
        self.ancestors(id)
            .any(|a| matches!(self.get(a).kind, GeneratorKind::Grouping(_)))
    }

    /// `id` followed by its parents up to the module.
    pub fn ancestors(&self, id: GenId) -> impl Iterator<Item = GenId> + '_ {
        std::iter::successors(Some(id), move |&g| self.get(g).parent)
    }

    /// Lexical scope of `id`: its ancestors, module first.
    pub fn scope_of(&self, id: GenId) -> Vec<GenId> {
        let mut scope: Vec<GenId> = self.ancestors(id).collect();
        scope.reverse();
        scope
    }

    /// Nearest enclosing data node. Choice and case are skipped and an
    /// augment continues at the node it was registered on.
    pub fn data_parent(&self, id: GenId) -> Option<GenId> {
        let mut current = self.get(id).parent?;
        loop {
            let generator = self.get(current);
            if generator.kind.is_choice_or_case() {
                current = generator.parent?;
            } else if let Some(state) = generator.kind.augment_state() {
                current = state.site?;
            } else {
                return Some(current);
            }
        }
    }

    /// Data children of `id`, looking through choice and case nodes.
    pub fn data_children(&self, id: GenId) -> Vec<GenId> {
        let mut out = Vec::new();
        let mut visited = FxHashSet::default();
        self.collect_data_children(id, &mut out, &mut visited);
        out
    }

    fn collect_data_children(
        &self,
        id: GenId,
        out: &mut Vec<GenId>,
        visited: &mut FxHashSet<GenId>,
    ) {
        if !visited.insert(id) {
            return;
        }
        for child in self.schema_children(id) {
            if self.get(child).kind.is_choice_or_case() {
                self.collect_data_children(child, out, visited);
            } else {
                out.push(child);
            }
        }
    }

    /// Human readable location of a generator, for diagnostics.
    pub fn describe(&self, ctx: &SchemaContext, id: GenId) -> String {
        let generator = self.get(id);
        let module = ctx
            .module_of(generator.statement)
            .map_or("?", |m| m.name.as_str());
        let mut parts: Vec<String> = self
            .ancestors(id)
            .filter(|&a| !matches!(self.get(a).kind, GeneratorKind::Module))
            .map(|a| {
                let stmt = ctx.get(self.get(a).statement);
                format!("{} {}", stmt.kind, stmt.argument_text())
            })
            .collect();
        parts.reverse();
        if parts.is_empty() {
            format!("module {module}")
        } else {
            format!("{module}:{}", parts.join("/"))
        }
    }
}

/// Indices into `ctx.modules()`, each module after the modules it imports.
///
/// Imports naming modules absent from the context are ignored here; a lookup
/// that actually needs such a module reports it.
pub(crate) fn module_order(ctx: &SchemaContext) -> Result<Vec<usize>, ReactorError> {
    let modules = ctx.modules();
    let by_name: FxHashMap<&str, usize> = modules
        .iter()
        .enumerate()
        .map(|(i, m)| (m.name.as_str(), i))
        .collect();

    let mut result = Vec::with_capacity(modules.len());
    let mut visited = FxHashSet::default();
    let mut temp_visited = FxHashSet::default();
    let mut cycle_path = Vec::new();

    for index in 0..modules.len() {
        if !visited.contains(&index)
            && !visit_module(
                ctx,
                &by_name,
                index,
                &mut visited,
                &mut temp_visited,
                &mut result,
                &mut cycle_path,
            )
        {
            cycle_path.reverse();
            let names = cycle_path
                .iter()
                .map(|&i| modules[i].name.clone())
                .collect();
            return Err(ReactorError::CircularModuleDependency(names));
        }
    }
    Ok(result)
}

fn visit_module(
    ctx: &SchemaContext,
    by_name: &FxHashMap<&str, usize>,
    index: usize,
    visited: &mut FxHashSet<usize>,
    temp_visited: &mut FxHashSet<usize>,
    result: &mut Vec<usize>,
    cycle_path: &mut Vec<usize>,
) -> bool {
    if temp_visited.contains(&index) {
        cycle_path.push(index);
        return false;
    }
    if visited.contains(&index) {
        return true;
    }
    temp_visited.insert(index);
    for import in &ctx.modules()[index].imports {
        if let Some(&dep) = by_name.get(import.module.as_str())
            && !visit_module(ctx, by_name, dep, visited, temp_visited, result, cycle_path)
        {
            cycle_path.push(index);
            return false;
        }
    }
    temp_visited.remove(&index);
    visited.insert(index);
    // Post-order puts dependencies first.
    result.push(index);
    true
}

#[cfg(test)]
#[path = "tests/generator_tests.rs"]
mod generator_tests;
