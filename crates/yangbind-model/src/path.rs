//! Schema node identifiers and leafref path expressions.
//!
//! Both are sequences of qualified names. A schema node identifier (the
//! argument of `augment`) walks the schema tree and names `choice`/`case`
//! nodes explicitly; a leafref path walks the data tree, may step to the
//! parent with `..`, and skips `choice`/`case` nodes. Predicates are accepted
//! in the textual form and dropped: they constrain instances, not the target
//! schema node.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use yangbind_common::{QName, QNameModule};

/// Argument of an `augment` statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaNodeIdentifier {
    /// Absolute identifiers start at a module; descendant ones at the `uses` parent.
    pub absolute: bool,
    pub steps: Vec<QName>,
}

impl SchemaNodeIdentifier {
    pub fn absolute(steps: Vec<QName>) -> Self {
        Self {
            absolute: true,
            steps,
        }
    }

    pub fn descendant(steps: Vec<QName>) -> Self {
        Self {
            absolute: false,
            steps,
        }
    }

    pub fn parse(
        text: &str,
        resolve_prefix: &dyn Fn(Option<&str>) -> Result<QNameModule, ModelError>,
    ) -> Result<Self, ModelError> {
        let expr = PathExpression::parse(text, resolve_prefix)?;
        let mut steps = Vec::with_capacity(expr.steps.len());
        for step in expr.steps {
            match step {
                PathStep::Child(qname) => steps.push(qname),
                PathStep::Parent => {
                    return Err(ModelError::InvalidPath {
                        path: text.to_string(),
                        reason: "'..' is not allowed in a schema node identifier".to_string(),
                    });
                }
            }
        }
        if steps.is_empty() {
            return Err(ModelError::InvalidPath {
                path: text.to_string(),
                reason: "empty schema node identifier".to_string(),
            });
        }
        Ok(Self {
            absolute: expr.absolute,
            steps,
        })
    }

    /// Rebind steps that belong to `from` into `to`.
    pub fn rebind(&self, from: &QNameModule, to: &QNameModule) -> Self {
        Self {
            absolute: self.absolute,
            steps: self
                .steps
                .iter()
                .map(|q| if &q.module == from { q.bind_to(to) } else { q.clone() })
                .collect(),
        }
    }

    pub fn last(&self) -> Option<&QName> {
        self.steps.last()
    }
}

impl fmt::Display for SchemaNodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if self.absolute || i > 0 {
                f.write_str("/")?;
            }
            f.write_str(&step.local_name)?;
        }
        Ok(())
    }
}

/// One step of a leafref path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathStep {
    Parent,
    Child(QName),
}

/// A leafref `path` argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathExpression {
    pub absolute: bool,
    pub steps: Vec<PathStep>,
}

impl PathExpression {
    /// Parse `/p:a/p:b`, `../x` or `a/b`; unprefixed names use `resolve_prefix(None)`.
    pub fn parse(
        text: &str,
        resolve_prefix: &dyn Fn(Option<&str>) -> Result<QNameModule, ModelError>,
    ) -> Result<Self, ModelError> {
        let stripped = strip_predicates(text).map_err(|reason| ModelError::InvalidPath {
            path: text.to_string(),
            reason,
        })?;
        let trimmed = stripped.trim();
        let absolute = trimmed.starts_with('/');
        let mut steps = Vec::new();
        for segment in trimmed.split('/').map(str::trim).filter(|s| !s.is_empty()) {
            if segment == ".." {
                steps.push(PathStep::Parent);
                continue;
            }
            if segment == "." {
                continue;
            }
            let (prefix, local) = match segment.split_once(':') {
                Some((prefix, local)) => (Some(prefix), local),
                None => (None, segment),
            };
            if local.is_empty() || !is_identifier(local) {
                return Err(ModelError::InvalidPath {
                    path: text.to_string(),
                    reason: format!("'{segment}' is not a node name"),
                });
            }
            steps.push(PathStep::Child(QName::new(resolve_prefix(prefix)?, local)));
        }
        if absolute && steps.iter().any(|s| matches!(s, PathStep::Parent)) {
            return Err(ModelError::InvalidPath {
                path: text.to_string(),
                reason: "absolute path cannot step to a parent".to_string(),
            });
        }
        Ok(Self { absolute, steps })
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if self.absolute || i > 0 {
                f.write_str("/")?;
            }
            match step {
                PathStep::Parent => f.write_str("..")?,
                PathStep::Child(qname) => f.write_str(&qname.local_name)?,
            }
        }
        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn strip_predicates(text: &str) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unbalanced ']'".to_string())?;
            }
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced '['".to_string());
    }
    Ok(out)
}

#[cfg(test)]
#[path = "tests/path_tests.rs"]
mod path_tests;
