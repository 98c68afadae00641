//! The schema context: statement arena plus module table.

use crate::statement::{Statement, StatementKind, StmtId};
use rustc_hash::FxHashMap;
use yangbind_common::{QName, QNameModule};

/// An `import` of another module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportInfo {
    pub module: String,
    pub prefix: String,
}

/// Module-level facts about one `module` statement.
#[derive(Clone, Debug)]
pub struct ModuleInfo {
    pub name: String,
    pub prefix: String,
    pub qname_module: QNameModule,
    pub imports: Vec<ImportInfo>,
    pub statement: StmtId,
}

/// Immutable, pre-validated statement tree grouped by owning module.
#[derive(Debug, Default)]
pub struct SchemaContext {
    statements: Vec<Statement>,
    modules: Vec<ModuleInfo>,
    by_namespace: FxHashMap<QNameModule, usize>,
    by_name: FxHashMap<String, usize>,
}

impl SchemaContext {
    pub(crate) fn new(statements: Vec<Statement>, modules: Vec<ModuleInfo>) -> Self {
        let by_namespace = modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.qname_module.clone(), i))
            .collect();
        let by_name = modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.clone(), i))
            .collect();
        Self {
            statements,
            modules,
            by_namespace,
            by_name,
        }
    }

    #[inline]
    pub fn get(&self, id: StmtId) -> &Statement {
        &self.statements[id.index()]
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Modules in declaration order.
    pub fn modules(&self) -> &[ModuleInfo] {
        &self.modules
    }

    pub fn module_by_namespace(&self, module: &QNameModule) -> Option<&ModuleInfo> {
        self.by_namespace.get(module).map(|&i| &self.modules[i])
    }

    pub fn module_by_name(&self, name: &str) -> Option<&ModuleInfo> {
        self.by_name.get(name).map(|&i| &self.modules[i])
    }

    /// The module owning `id`.
    pub fn module_of(&self, id: StmtId) -> Option<&ModuleInfo> {
        let module = self.get(id).module;
        self.modules.iter().find(|m| m.statement == module)
    }

    pub fn substatements(&self, id: StmtId) -> &[StmtId] {
        &self.get(id).substatements
    }

    /// Substatements of `id` filtered by kind.
    pub fn children_of_kind(
        &self,
        id: StmtId,
        kind: StatementKind,
    ) -> impl Iterator<Item = StmtId> + '_ {
        self.substatements(id)
            .iter()
            .copied()
            .filter(move |&child| self.get(child).kind == kind)
    }

    pub fn qname(&self, id: StmtId) -> Option<&QName> {
        self.get(id).qname()
    }

    /// Slash-separated path of local names from the module, for diagnostics.
    pub fn describe(&self, id: StmtId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(stmt_id) = current {
            let stmt = self.get(stmt_id);
            parts.push(format!("{} {}", stmt.kind, stmt.argument_text()));
            current = stmt.parent;
        }
        parts.reverse();
        parts.join(" / ")
    }
}
