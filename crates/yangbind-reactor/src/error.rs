//! Fatal reactor failures.
//!
//! Every variant aborts the run. There is no partial result: callers fix the
//! schema and start over with a fresh `Reactor`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReactorError {
    #[error("reactor is {0}")]
    IllegalState(&'static str),

    /// A fixpoint pass made no progress while items remained. Lists every
    /// stuck item, not just the first.
    #[error("{stage} stalled with {} unresolved item(s): {}", stuck.len(), stuck.join("; "))]
    StalledLinkage { stage: &'static str, stuck: Vec<String> },

    #[error("cannot resolve augment {augment}: {reason}")]
    UnresolvedAugment { augment: String, reason: String },

    #[error("cannot resolve {kind} {name} from {site}")]
    UnresolvedReference {
        kind: &'static str,
        name: String,
        site: String,
    },

    #[error("module {0} is not part of the schema context")]
    UnresolvedModule(String),

    #[error("cannot assign distinct names in {domain}: {names:?}")]
    NamingConflict { domain: String, names: Vec<String> },

    #[error("duplicate {kind} '{name}' in {owner}")]
    DuplicateMember {
        kind: &'static str,
        name: String,
        owner: String,
    },

    #[error("leafref path '{path}' of {site} does not resolve to a leaf or leaf-list")]
    UnresolvedLeafref { path: String, site: String },

    #[error("grouping {0} is frozen and cannot gain users")]
    FrozenGrouping(String),

    #[error("type of {0} depends on itself")]
    CircularType(String),

    #[error("modules import each other: {}", .0.join(" -> "))]
    CircularModuleDependency(Vec<String>),
}
