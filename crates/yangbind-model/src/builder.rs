//! Programmatic construction of a `SchemaContext`.
//!
//! The builder produces an *effective* tree: instantiating a `uses` copies the
//! grouping's schema-tree nodes (and nested `uses` with their `augment`s)
//! under the using node, rebinding every name into the using module and
//! marking each copy `added_by_uses` with `declared` pointing at the source's
//! declaration.

use crate::context::{ImportInfo, ModuleInfo, SchemaContext};
use crate::error::ModelError;
use crate::path::{PathExpression, PathStep, SchemaNodeIdentifier};
use crate::statement::{Argument, Statement, StatementKind, StmtId};
use crate::types::{BuiltinType, TypeSpec};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::trace;
use yangbind_common::{QName, QNameModule};

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    statements: Vec<Statement>,
    modules: Vec<ModuleInfo>,
    instantiated: FxHashSet<StmtId>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Modules
    // =========================================================================

    /// Declare a module. Its prefix defaults to its name.
    pub fn module(
        &mut self,
        name: &str,
        namespace: &str,
        revision: Option<&str>,
    ) -> Result<StmtId, ModelError> {
        let qname_module = QNameModule::new(namespace, revision);
        if self
            .modules
            .iter()
            .any(|m| m.name == name || m.qname_module == qname_module)
        {
            return Err(ModelError::DuplicateModule(name.to_string()));
        }
        let id = StmtId(self.statements.len() as u32);
        self.statements.push(Statement {
            kind: StatementKind::Module,
            argument: Argument::Identifier(name.to_string()),
            parent: None,
            module: id,
            substatements: Vec::new(),
            declared: id,
            added_by_uses: false,
            description: None,
            reference: None,
            keys: Vec::new(),
            type_spec: None,
            bases: Vec::new(),
        });
        self.modules.push(ModuleInfo {
            name: name.to_string(),
            prefix: name.to_string(),
            qname_module,
            imports: Vec::new(),
            statement: id,
        });
        Ok(id)
    }

    pub fn set_prefix(&mut self, module: StmtId, prefix: &str) {
        if let Some(info) = self.modules.iter_mut().find(|m| m.statement == module) {
            info.prefix = prefix.to_string();
        }
    }

    pub fn import(&mut self, module: StmtId, imported: &str, prefix: &str) {
        if let Some(info) = self.modules.iter_mut().find(|m| m.statement == module) {
            info.imports.push(ImportInfo {
                module: imported.to_string(),
                prefix: prefix.to_string(),
            });
        }
    }

    pub fn module_info(&self, module: StmtId) -> Option<&ModuleInfo> {
        self.modules.iter().find(|m| m.statement == module)
    }

    pub fn module_by_name(&self, name: &str) -> Option<&ModuleInfo> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// The `module` statement owning `stmt`.
    pub fn module_root(&self, stmt: StmtId) -> StmtId {
        self.statements[stmt.index()].module
    }

    pub fn kind_of(&self, stmt: StmtId) -> StatementKind {
        self.statements[stmt.index()].kind
    }

    /// `kind argument` of a statement, for diagnostics.
    pub fn describe_kind(&self, stmt: StmtId) -> String {
        let s = &self.statements[stmt.index()];
        format!("{} {}", s.kind, s.argument_text())
    }

    /// Namespace of the module owning `stmt`.
    pub fn qname_module(&self, stmt: StmtId) -> QNameModule {
        let module = self.statements[stmt.index()].module;
        self.module_info(module)
            .map(|m| m.qname_module.clone())
            .unwrap_or_else(|| QNameModule::new("", None))
    }

    /// A name in the module owning `stmt`.
    pub fn qname(&self, stmt: StmtId, local_name: &str) -> QName {
        QName::new(self.qname_module(stmt), local_name)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn push(&mut self, parent: StmtId, kind: StatementKind, argument: Argument) -> StmtId {
        let id = StmtId(self.statements.len() as u32);
        let module = self.statements[parent.index()].module;
        self.statements.push(Statement {
            kind,
            argument,
            parent: Some(parent),
            module,
            substatements: Vec::new(),
            declared: id,
            added_by_uses: false,
            description: None,
            reference: None,
            keys: Vec::new(),
            type_spec: None,
            bases: Vec::new(),
        });
        self.statements[parent.index()].substatements.push(id);
        id
    }

    /// Add a named statement of any kind under `parent`, in `parent`'s module.
    pub fn add(&mut self, parent: StmtId, kind: StatementKind, local_name: &str) -> StmtId {
        let qname = self.qname(parent, local_name);
        self.push(parent, kind, Argument::QName(qname))
    }

    pub fn container(&mut self, parent: StmtId, name: &str) -> StmtId {
        self.add(parent, StatementKind::Container, name)
    }

    pub fn list(&mut self, parent: StmtId, name: &str, keys: &[&str]) -> StmtId {
        let id = self.add(parent, StatementKind::List, name);
        let keys = keys.iter().map(|k| self.qname(parent, k)).collect();
        self.statements[id.index()].keys = keys;
        id
    }

    pub fn leaf(&mut self, parent: StmtId, name: &str, type_spec: TypeSpec) -> StmtId {
        let id = self.add(parent, StatementKind::Leaf, name);
        self.statements[id.index()].type_spec = Some(type_spec);
        id
    }

    pub fn leaf_list(&mut self, parent: StmtId, name: &str, type_spec: TypeSpec) -> StmtId {
        let id = self.add(parent, StatementKind::LeafList, name);
        self.statements[id.index()].type_spec = Some(type_spec);
        id
    }

    /// Shorthand for a `string` leaf.
    pub fn string_leaf(&mut self, parent: StmtId, name: &str) -> StmtId {
        self.leaf(parent, name, TypeSpec::Builtin(BuiltinType::String))
    }

    pub fn choice(&mut self, parent: StmtId, name: &str) -> StmtId {
        self.add(parent, StatementKind::Choice, name)
    }

    pub fn case(&mut self, choice: StmtId, name: &str) -> StmtId {
        self.add(choice, StatementKind::Case, name)
    }

    pub fn grouping(&mut self, parent: StmtId, name: &str) -> StmtId {
        self.add(parent, StatementKind::Grouping, name)
    }

    pub fn typedef(&mut self, parent: StmtId, name: &str, type_spec: TypeSpec) -> StmtId {
        let id = self.add(parent, StatementKind::Typedef, name);
        self.statements[id.index()].type_spec = Some(type_spec);
        id
    }

    pub fn identity(&mut self, module: StmtId, name: &str, bases: Vec<QName>) -> StmtId {
        let id = self.add(module, StatementKind::Identity, name);
        self.statements[id.index()].bases = bases;
        id
    }

    pub fn rpc(&mut self, module: StmtId, name: &str) -> StmtId {
        self.add(module, StatementKind::Rpc, name)
    }

    pub fn action(&mut self, parent: StmtId, name: &str) -> StmtId {
        self.add(parent, StatementKind::Action, name)
    }

    /// `input` of an rpc or action.
    pub fn input(&mut self, operation: StmtId) -> StmtId {
        self.add(operation, StatementKind::Input, "input")
    }

    /// `output` of an rpc or action.
    pub fn output(&mut self, operation: StmtId) -> StmtId {
        self.add(operation, StatementKind::Output, "output")
    }

    pub fn notification(&mut self, parent: StmtId, name: &str) -> StmtId {
        self.add(parent, StatementKind::Notification, name)
    }

    /// Module-level `augment` with an absolute target.
    pub fn augment(&mut self, module: StmtId, target: SchemaNodeIdentifier) -> StmtId {
        self.push(module, StatementKind::Augment, Argument::SchemaNodeId(target))
    }

    /// `augment` nested in a `uses`, with a target relative to the `uses` parent.
    pub fn uses_augment(&mut self, uses: StmtId, target: SchemaNodeIdentifier) -> StmtId {
        self.push(uses, StatementKind::Augment, Argument::SchemaNodeId(target))
    }

    pub fn describe(&mut self, id: StmtId, description: &str, reference: Option<&str>) {
        let stmt = &mut self.statements[id.index()];
        stmt.description = Some(description.to_string());
        stmt.reference = reference.map(str::to_string);
    }

    // =========================================================================
    // Uses instantiation
    // =========================================================================

    /// Declare `uses grouping` under `parent` and instantiate it immediately.
    pub fn uses(&mut self, parent: StmtId, grouping: QName) -> Result<StmtId, ModelError> {
        let uses = self.declare_uses(parent, grouping);
        self.instantiate_uses(uses)?;
        Ok(uses)
    }

    /// Declare `uses grouping` without instantiating it, so `augment`s can be
    /// attached first.
    pub fn declare_uses(&mut self, parent: StmtId, grouping: QName) -> StmtId {
        self.push(parent, StatementKind::Uses, Argument::QName(grouping))
    }

    pub fn is_instantiated(&self, uses: StmtId) -> bool {
        self.instantiated.contains(&uses)
    }

    /// Copy the referenced grouping's content right after the `uses` statement.
    pub fn instantiate_uses(&mut self, uses: StmtId) -> Result<(), ModelError> {
        if !self.instantiated.insert(uses) {
            return Ok(());
        }
        let (parent, grouping_name) = self.uses_target(uses)?;
        let grouping = self
            .find_grouping(parent, &grouping_name)
            .ok_or_else(|| ModelError::UnknownGrouping(grouping_name.to_string()))?;
        if self.is_ancestor(grouping, parent) {
            return Err(ModelError::CircularGrouping(vec![grouping_name.to_string()]));
        }

        let from = self.qname_module(grouping);
        let to = self.qname_module(parent);
        let sources: SmallVec<[StmtId; 8]> = self.statements[grouping.index()]
            .substatements
            .iter()
            .copied()
            .filter(|&s| self.statements[s.index()].kind.is_instantiated_by_uses())
            .collect();

        let mut anchor = uses;
        for source in sources {
            anchor = self.copy_subtree(source, parent, Some(anchor), &from, &to);
        }
        trace!(grouping = %grouping_name, "instantiated uses");
        Ok(())
    }

    /// Parent and grouping name of a `uses` statement.
    pub fn uses_target(&self, uses: StmtId) -> Result<(StmtId, QName), ModelError> {
        let stmt = &self.statements[uses.index()];
        match (stmt.kind, stmt.parent, stmt.qname()) {
            (StatementKind::Uses, Some(parent), Some(name)) => Ok((parent, name.clone())),
            _ => Err(ModelError::UnknownGrouping(stmt.argument_text())),
        }
    }

    /// Lexically scoped grouping lookup: enclosing nodes of the same module
    /// first, then the top level of the grouping's module.
    pub fn find_grouping(&self, from: StmtId, name: &QName) -> Option<StmtId> {
        let mut current = Some(from);
        while let Some(id) = current {
            let stmt = &self.statements[id.index()];
            if self.qname_module(id) != name.module {
                break;
            }
            if let Some(found) = self.grouping_child(id, name) {
                return Some(found);
            }
            current = stmt.parent;
        }
        let module = self
            .modules
            .iter()
            .find(|m| m.qname_module == name.module)?;
        self.grouping_child(module.statement, name)
    }

    fn grouping_child(&self, parent: StmtId, name: &QName) -> Option<StmtId> {
        self.statements[parent.index()]
            .substatements
            .iter()
            .copied()
            .find(|&c| {
                let child = &self.statements[c.index()];
                child.kind == StatementKind::Grouping && child.qname() == Some(name)
            })
    }

    fn is_ancestor(&self, ancestor: StmtId, mut node: StmtId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.statements[node.index()].parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// `true` when `stmt` or any descendant is a declared `uses` not yet instantiated.
    pub fn has_pending_uses(&self, stmt: StmtId) -> bool {
        let node = &self.statements[stmt.index()];
        if node.kind == StatementKind::Uses && !node.added_by_uses && !self.is_instantiated(stmt)
        {
            return true;
        }
        node.substatements.iter().any(|&c| self.has_pending_uses(c))
    }

    fn copy_subtree(
        &mut self,
        source: StmtId,
        parent: StmtId,
        after: Option<StmtId>,
        from: &QNameModule,
        to: &QNameModule,
    ) -> StmtId {
        let src = self.statements[source.index()].clone();
        let id = StmtId(self.statements.len() as u32);
        let module = self.statements[parent.index()].module;
        let argument = match &src.argument {
            Argument::QName(qname) if src.kind != StatementKind::Uses => {
                Argument::QName(qname.bind_to(to))
            }
            Argument::SchemaNodeId(target) => Argument::SchemaNodeId(target.rebind(from, to)),
            other => other.clone(),
        };
        self.statements.push(Statement {
            kind: src.kind,
            argument,
            parent: Some(parent),
            module,
            substatements: Vec::new(),
            declared: src.declared,
            added_by_uses: true,
            description: src.description.clone(),
            reference: src.reference.clone(),
            keys: src.keys.iter().map(|k| k.bind_to(to)).collect(),
            type_spec: src.type_spec.as_ref().map(|t| rebind_type(t, from, to)),
            bases: src.bases.clone(),
        });

        let siblings = &mut self.statements[parent.index()].substatements;
        match after.and_then(|a| siblings.iter().position(|&s| s == a)) {
            Some(pos) => siblings.insert(pos + 1, id),
            None => siblings.push(id),
        }

        let children: SmallVec<[StmtId; 8]> = src
            .substatements
            .iter()
            .copied()
            .filter(|&c| {
                let kind = self.statements[c.index()].kind;
                kind.is_instantiated_by_uses()
                    || (kind == StatementKind::Augment && src.kind == StatementKind::Uses)
            })
            .collect();
        for child in children {
            self.copy_subtree(child, id, None, from, to);
        }
        id
    }

    pub fn build(self) -> SchemaContext {
        SchemaContext::new(self.statements, self.modules)
    }
}

fn rebind_type(spec: &TypeSpec, from: &QNameModule, to: &QNameModule) -> TypeSpec {
    match spec {
        // Absolute paths name nodes of the real data tree and stay as declared.
        TypeSpec::Leafref(path) if !path.absolute => TypeSpec::Leafref(PathExpression {
            absolute: path.absolute,
            steps: path
                .steps
                .iter()
                .map(|step| match step {
                    PathStep::Child(q) if &q.module == from => PathStep::Child(q.bind_to(to)),
                    other => other.clone(),
                })
                .collect(),
        }),
        TypeSpec::Union(members) => {
            TypeSpec::Union(members.iter().map(|m| rebind_type(m, from, to)).collect())
        }
        other => other.clone(),
    }
}

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod builder_tests;
