//! Statement arena types.

use crate::path::SchemaNodeIdentifier;
use crate::types::TypeSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use yangbind_common::QName;

/// Index of a statement in its `SchemaContext` arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StmtId(pub u32);

impl StmtId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Statement keywords understood by the reactor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatementKind {
    Module,
    Container,
    List,
    Leaf,
    LeafList,
    Choice,
    Case,
    Grouping,
    Uses,
    Augment,
    Typedef,
    Identity,
    Rpc,
    Action,
    Input,
    Output,
    Notification,
    AnyData,
    AnyXml,
}

impl StatementKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Container => "container",
            Self::List => "list",
            Self::Leaf => "leaf",
            Self::LeafList => "leaf-list",
            Self::Choice => "choice",
            Self::Case => "case",
            Self::Grouping => "grouping",
            Self::Uses => "uses",
            Self::Augment => "augment",
            Self::Typedef => "typedef",
            Self::Identity => "identity",
            Self::Rpc => "rpc",
            Self::Action => "action",
            Self::Input => "input",
            Self::Output => "output",
            Self::Notification => "notification",
            Self::AnyData => "anydata",
            Self::AnyXml => "anyxml",
        }
    }

    /// Statements addressable through a schema node identifier.
    pub const fn is_schema_tree(self) -> bool {
        matches!(
            self,
            Self::Container
                | Self::List
                | Self::Leaf
                | Self::LeafList
                | Self::Choice
                | Self::Case
                | Self::Rpc
                | Self::Action
                | Self::Input
                | Self::Output
                | Self::Notification
                | Self::AnyData
                | Self::AnyXml
        )
    }

    /// Statements copied into the using node when a grouping is instantiated.
    pub const fn is_instantiated_by_uses(self) -> bool {
        (self.is_schema_tree() && !matches!(self, Self::Rpc)) || matches!(self, Self::Uses)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Declared argument of a statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Argument {
    /// `module` name.
    Identifier(String),
    /// Schema-tree nodes, groupings, typedefs, identities; `uses` carries the grouping name.
    QName(QName),
    /// `augment` target.
    SchemaNodeId(SchemaNodeIdentifier),
}

/// One node of the effective statement tree.
#[derive(Clone, Debug)]
pub struct Statement {
    pub kind: StatementKind,
    pub argument: Argument,
    pub parent: Option<StmtId>,
    /// Owning `module` statement.
    pub module: StmtId,
    pub substatements: Vec<StmtId>,
    /// The declaration this statement was instantiated from; itself when declared.
    pub declared: StmtId,
    pub added_by_uses: bool,
    pub description: Option<String>,
    pub reference: Option<String>,
    /// `key` of a list.
    pub keys: Vec<QName>,
    /// `type` of a leaf, leaf-list or typedef.
    pub type_spec: Option<TypeSpec>,
    /// `base` of an identity.
    pub bases: Vec<QName>,
}

impl Statement {
    pub fn qname(&self) -> Option<&QName> {
        match &self.argument {
            Argument::QName(qname) => Some(qname),
            _ => None,
        }
    }

    pub fn schema_node_id(&self) -> Option<&SchemaNodeIdentifier> {
        match &self.argument {
            Argument::SchemaNodeId(id) => Some(id),
            _ => None,
        }
    }

    /// Human readable argument, used in diagnostics.
    pub fn argument_text(&self) -> String {
        match &self.argument {
            Argument::Identifier(name) => name.clone(),
            Argument::QName(qname) => qname.local_name.clone(),
            Argument::SchemaNodeId(id) => id.to_string(),
        }
    }
}
