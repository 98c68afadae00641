//! JSON form of a schema.
//!
//! A `SchemaDocument` lists modules with their bodies as nested statement
//! objects tagged by `kind`. Names may carry a `prefix:` resolved through the
//! module's own prefix and its imports. Loading goes through `SchemaBuilder`,
//! deferring `uses` instantiation until the referenced grouping is itself
//! fully instantiated.
//!
//! ```json
//! { "modules": [ { "name": "a", "namespace": "urn:a", "body": [
//!     { "kind": "grouping", "name": "g", "children": [
//!         { "kind": "leaf", "name": "x", "type": { "builtin": "string" } } ] },
//!     { "kind": "container", "name": "c", "children": [
//!         { "kind": "uses", "grouping": "g" } ] } ] } ] }
//! ```

use crate::builder::SchemaBuilder;
use crate::context::SchemaContext;
use crate::error::ModelError;
use crate::path::{PathExpression, SchemaNodeIdentifier};
use crate::statement::{StatementKind, StmtId};
use crate::types::TypeSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use yangbind_common::{QName, QNameModule};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    #[serde(default)]
    pub modules: Vec<ModuleDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDoc {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub revision: Option<String>,
    #[serde(default)]
    pub imports: Vec<ImportDoc>,
    #[serde(default)]
    pub body: Vec<StatementDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportDoc {
    pub module: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StatementDoc {
    Container(NodeDoc),
    List(ListDoc),
    Leaf(LeafDoc),
    LeafList(LeafDoc),
    Choice(NodeDoc),
    Case(NodeDoc),
    Grouping(NodeDoc),
    Typedef(LeafDoc),
    Identity(IdentityDoc),
    Rpc(NodeDoc),
    Action(NodeDoc),
    Input(BodyDoc),
    Output(BodyDoc),
    Notification(NodeDoc),
    Anydata(NodeDoc),
    Anyxml(NodeDoc),
    Uses(UsesDoc),
    Augment(AugmentDoc),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDoc {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub children: Vec<StatementDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDoc {
    pub name: String,
    #[serde(default)]
    pub key: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub children: Vec<StatementDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeafDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub type_doc: TypeDoc,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityDoc {
    pub name: String,
    #[serde(default)]
    pub base: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDoc {
    #[serde(default)]
    pub children: Vec<StatementDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsesDoc {
    pub grouping: String,
    #[serde(default)]
    pub augments: Vec<AugmentDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AugmentDoc {
    pub target: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub children: Vec<StatementDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeDoc {
    Builtin(String),
    Typedef(String),
    Enumeration(Vec<String>),
    Bits(Vec<String>),
    Union(Vec<TypeDoc>),
    Leafref(String),
    Identityref(Vec<String>),
    InstanceIdentifier,
}

impl SchemaDocument {
    pub fn from_json(source: &str) -> Result<Self, ModelError> {
        serde_json::from_str(source).map_err(|e| ModelError::Malformed(e.to_string()))
    }

    pub fn into_context(&self) -> Result<SchemaContext, ModelError> {
        let mut loader = Loader {
            builder: SchemaBuilder::new(),
            pending_uses: Vec::new(),
        };
        let mut module_ids = Vec::with_capacity(self.modules.len());
        for module in &self.modules {
            let id = loader.builder.module(
                &module.name,
                &module.namespace,
                module.revision.as_deref(),
            )?;
            if let Some(prefix) = &module.prefix {
                loader.builder.set_prefix(id, prefix);
            }
            for import in &module.imports {
                loader.builder.import(id, &import.module, &import.prefix);
            }
            module_ids.push(id);
        }
        for (module, &id) in self.modules.iter().zip(&module_ids) {
            for stmt in &module.body {
                loader.load_statement(id, stmt)?;
            }
        }
        loader.instantiate_pending()?;
        Ok(loader.builder.build())
    }
}

/// Read and load a schema document from disk.
pub fn load_schema_document(path: &Path) -> Result<SchemaContext, ModelError> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| ModelError::Malformed(format!("{}: {e}", path.display())))?;
    SchemaDocument::from_json(&source)?.into_context()
}

struct Loader {
    builder: SchemaBuilder,
    pending_uses: Vec<StmtId>,
}

impl Loader {
    fn resolve_prefix(&self, at: StmtId, prefix: Option<&str>) -> Result<QNameModule, ModelError> {
        let own = self.builder.qname_module(at);
        let Some(prefix) = prefix else {
            return Ok(own);
        };
        let module = self
            .builder
            .module_info(self.module_stmt(at))
            .ok_or_else(|| ModelError::UnknownModule(own.namespace.clone()))?;
        if module.prefix == prefix {
            return Ok(own);
        }
        let import = module
            .imports
            .iter()
            .find(|i| i.prefix == prefix)
            .ok_or_else(|| ModelError::UnknownPrefix {
                module: module.name.clone(),
                prefix: prefix.to_string(),
            })?;
        self.builder
            .module_by_name(&import.module)
            .map(|m| m.qname_module.clone())
            .ok_or_else(|| ModelError::UnknownModule(import.module.clone()))
    }

    fn expect_operation(&self, parent: StmtId, kind: StatementKind) -> Result<(), ModelError> {
        match self.builder.kind_of(parent) {
            StatementKind::Rpc | StatementKind::Action => Ok(()),
            _ => Err(ModelError::InvalidChild(
                self.builder.describe_kind(parent),
                kind.to_string(),
            )),
        }
    }

    fn module_stmt(&self, at: StmtId) -> StmtId {
        self.builder.module_root(at)
    }

    fn parse_qname(&self, at: StmtId, text: &str) -> Result<QName, ModelError> {
        let (prefix, local) = match text.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, text),
        };
        Ok(QName::new(self.resolve_prefix(at, prefix)?, local))
    }

    fn parse_type(&self, at: StmtId, doc: &TypeDoc) -> Result<TypeSpec, ModelError> {
        Ok(match doc {
            TypeDoc::Builtin(name) => TypeSpec::Builtin(name.parse()?),
            TypeDoc::Typedef(name) => TypeSpec::Typedef(self.parse_qname(at, name)?),
            TypeDoc::Enumeration(values) => TypeSpec::Enumeration(values.clone()),
            TypeDoc::Bits(bits) => TypeSpec::Bits(bits.clone()),
            TypeDoc::Union(members) => TypeSpec::Union(
                members
                    .iter()
                    .map(|m| self.parse_type(at, m))
                    .collect::<Result<_, _>>()?,
            ),
            TypeDoc::Leafref(path) => TypeSpec::Leafref(PathExpression::parse(path, &|p| {
                self.resolve_prefix(at, p)
            })?),
            TypeDoc::Identityref(bases) => TypeSpec::Identityref(
                bases
                    .iter()
                    .map(|b| self.parse_qname(at, b))
                    .collect::<Result<_, _>>()?,
            ),
            TypeDoc::InstanceIdentifier => TypeSpec::InstanceIdentifier,
        })
    }

    fn load_children(&mut self, parent: StmtId, children: &[StatementDoc]) -> Result<(), ModelError> {
        for child in children {
            self.load_statement(parent, child)?;
        }
        Ok(())
    }

    fn load_node(&mut self, parent: StmtId, kind: StatementKind, node: &NodeDoc) -> Result<(), ModelError> {
        let id = self.builder.add(parent, kind, &node.name);
        if let Some(description) = &node.description {
            self.builder.describe(id, description, node.reference.as_deref());
        }
        self.load_children(id, &node.children)
    }

    fn load_statement(&mut self, parent: StmtId, doc: &StatementDoc) -> Result<(), ModelError> {
        match doc {
            StatementDoc::Container(node) => self.load_node(parent, StatementKind::Container, node),
            StatementDoc::Choice(node) => self.load_node(parent, StatementKind::Choice, node),
            StatementDoc::Case(node) => self.load_node(parent, StatementKind::Case, node),
            StatementDoc::Grouping(node) => self.load_node(parent, StatementKind::Grouping, node),
            StatementDoc::Rpc(node) => self.load_node(parent, StatementKind::Rpc, node),
            StatementDoc::Action(node) => self.load_node(parent, StatementKind::Action, node),
            StatementDoc::Notification(node) => {
                self.load_node(parent, StatementKind::Notification, node)
            }
            StatementDoc::Anydata(node) => self.load_node(parent, StatementKind::AnyData, node),
            StatementDoc::Anyxml(node) => self.load_node(parent, StatementKind::AnyXml, node),
            StatementDoc::Input(body) => {
                self.expect_operation(parent, StatementKind::Input)?;
                let id = self.builder.input(parent);
                self.load_children(id, &body.children)
            }
            StatementDoc::Output(body) => {
                self.expect_operation(parent, StatementKind::Output)?;
                let id = self.builder.output(parent);
                self.load_children(id, &body.children)
            }
            StatementDoc::List(list) => {
                let keys: Vec<&str> = list.key.iter().map(String::as_str).collect();
                let id = self.builder.list(parent, &list.name, &keys);
                if let Some(description) = &list.description {
                    self.builder.describe(id, description, list.reference.as_deref());
                }
                self.load_children(id, &list.children)
            }
            StatementDoc::Leaf(leaf) | StatementDoc::LeafList(leaf) | StatementDoc::Typedef(leaf) => {
                let type_spec = self.parse_type(parent, &leaf.type_doc)?;
                let id = match doc {
                    StatementDoc::Leaf(_) => self.builder.leaf(parent, &leaf.name, type_spec),
                    StatementDoc::LeafList(_) => {
                        self.builder.leaf_list(parent, &leaf.name, type_spec)
                    }
                    _ => self.builder.typedef(parent, &leaf.name, type_spec),
                };
                if let Some(description) = &leaf.description {
                    self.builder.describe(id, description, leaf.reference.as_deref());
                }
                Ok(())
            }
            StatementDoc::Identity(identity) => {
                let bases = identity
                    .base
                    .iter()
                    .map(|b| self.parse_qname(parent, b))
                    .collect::<Result<_, _>>()?;
                let id = self.builder.identity(parent, &identity.name, bases);
                if let Some(description) = &identity.description {
                    self.builder.describe(id, description, identity.reference.as_deref());
                }
                Ok(())
            }
            StatementDoc::Uses(uses) => {
                let grouping = self.parse_qname(parent, &uses.grouping)?;
                let id = self.builder.declare_uses(parent, grouping);
                for augment in &uses.augments {
                    let target = SchemaNodeIdentifier::parse(&augment.target, &|p| {
                        self.resolve_prefix(parent, p)
                    })?;
                    let aug = self.builder.uses_augment(id, target);
                    if let Some(description) = &augment.description {
                        self.builder.describe(aug, description, None);
                    }
                    self.load_children(aug, &augment.children)?;
                }
                self.pending_uses.push(id);
                Ok(())
            }
            StatementDoc::Augment(augment) => {
                let target = SchemaNodeIdentifier::parse(&augment.target, &|p| {
                    self.resolve_prefix(parent, p)
                })?;
                if !target.absolute {
                    return Err(ModelError::InvalidPath {
                        path: augment.target.clone(),
                        reason: "module-level augment requires an absolute target".to_string(),
                    });
                }
                let module = self.module_stmt(parent);
                if module != parent {
                    return Err(ModelError::InvalidChild(
                        self.builder.describe_kind(parent),
                        StatementKind::Augment.to_string(),
                    ));
                }
                let id = self.builder.augment(module, target);
                if let Some(description) = &augment.description {
                    self.builder.describe(id, description, None);
                }
                self.load_children(id, &augment.children)
            }
        }
    }

    /// Instantiate deferred `uses` once their grouping has no pending `uses` left.
    fn instantiate_pending(&mut self) -> Result<(), ModelError> {
        let mut passes = 0usize;
        while !self.pending_uses.is_empty() {
            passes += 1;
            let mut progressed = false;
            let mut remaining = Vec::with_capacity(self.pending_uses.len());
            for uses in std::mem::take(&mut self.pending_uses) {
                let (parent, name) = self.builder.uses_target(uses)?;
                let grouping = self
                    .builder
                    .find_grouping(parent, &name)
                    .ok_or_else(|| ModelError::UnknownGrouping(name.to_string()))?;
                if self.builder.has_pending_uses(grouping) {
                    remaining.push(uses);
                } else {
                    self.builder.instantiate_uses(uses)?;
                    progressed = true;
                }
            }
            if !progressed {
                let names = remaining
                    .iter()
                    .filter_map(|&u| self.builder.uses_target(u).ok())
                    .map(|(_, name)| name.to_string())
                    .collect();
                return Err(ModelError::CircularGrouping(names));
            }
            self.pending_uses = remaining;
        }
        debug!(passes, "instantiated deferred uses");
        Ok(())
    }
}
