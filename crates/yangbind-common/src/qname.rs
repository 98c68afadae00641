//! Qualified names.
//!
//! A YANG statement argument is identified by the module that defines it
//! (namespace plus optional revision) and its local identifier. Names are
//! compared structurally; two names are equal only when namespace, revision
//! and local name all match.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a schema module: its XML namespace and optional revision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QNameModule {
    pub namespace: String,
    pub revision: Option<String>,
}

impl QNameModule {
    pub fn new(namespace: impl Into<String>, revision: Option<&str>) -> Self {
        Self {
            namespace: namespace.into(),
            revision: revision.map(str::to_string),
        }
    }
}

impl fmt::Display for QNameModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.revision {
            Some(revision) => write!(f, "{}?revision={}", self.namespace, revision),
            None => f.write_str(&self.namespace),
        }
    }
}

/// A qualified name: owning module plus local identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QName {
    pub module: QNameModule,
    pub local_name: String,
}

impl QName {
    pub fn new(module: QNameModule, local_name: impl Into<String>) -> Self {
        Self {
            module,
            local_name: local_name.into(),
        }
    }

    /// Rebind this name into another module, keeping the local name.
    ///
    /// Nodes instantiated through `uses` take the namespace of the module in
    /// which the `uses` appears, so lookups across a grouping boundary compare
    /// names after rebinding.
    pub fn bind_to(&self, module: &QNameModule) -> QName {
        if &self.module == module {
            return self.clone();
        }
        QName {
            module: module.clone(),
            local_name: self.local_name.clone(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}){}", self.module, self.local_name)
    }
}

#[cfg(test)]
#[path = "tests/qname_tests.rs"]
mod qname_tests;
