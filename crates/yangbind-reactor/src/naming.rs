//! Naming strategies.
//!
//! A strategy turns a statement's identifier into a simple class name. On a
//! collision the owning member escalates to the next `NamingLevel`:
//!
//! | Level | `foo-bar` container |
//! |-------|---------------------|
//! | `CamelCase` | `FooBar` |
//! | `CamelCaseWithNamespace` | `FooBar$CO` |
//! | `Bijective` | `Foo$2Dbar` |
//! | `BijectiveWithNamespace` | `Foo$2Dbar$CO` |
//!
//! The bijective levels cannot map two distinct identifiers to one name, and
//! the namespace suffix separates statements of different kinds sharing an
//! identifier. `root_name` and `child_package` never change across levels.

use std::fmt;
use yangbind_common::mapping::{bijective_class_name, class_name, package_segment};

/// Statement namespaces that can share a simple name inside one domain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StatementNamespace {
    Action,
    AnyData,
    Augment,
    Case,
    Choice,
    Container,
    Grouping,
    Identity,
    Input,
    Key,
    Leaf,
    List,
    Module,
    Notification,
    Output,
    Rpc,
    Typedef,
}

impl StatementNamespace {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Action => "$AC",
            Self::AnyData => "$AD",
            Self::Augment => "$AU",
            Self::Case => "$CA",
            Self::Choice => "$CH",
            Self::Container => "$CO",
            Self::Grouping => "$GR",
            Self::Identity => "$IY",
            Self::Input => "$IP",
            Self::Key => "$KE",
            Self::Leaf => "$LF",
            Self::List => "$LI",
            Self::Module => "$MD",
            Self::Notification => "$NO",
            Self::Output => "$OU",
            Self::Rpc => "$RP",
            Self::Typedef => "$TD",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NamingLevel {
    CamelCase,
    CamelCaseWithNamespace,
    Bijective,
    BijectiveWithNamespace,
}

impl NamingLevel {
    const ORDER: [NamingLevel; 4] = [
        Self::CamelCase,
        Self::CamelCaseWithNamespace,
        Self::Bijective,
        Self::BijectiveWithNamespace,
    ];

    pub fn next(self) -> Option<Self> {
        let index = Self::ORDER.iter().position(|&l| l == self)?;
        Self::ORDER.get(index + 1).copied()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamingStrategy {
    pub namespace: StatementNamespace,
    /// The identifier the name is derived from.
    pub root_name: String,
    pub child_package: String,
    pub level: NamingLevel,
    /// Appended to every level, e.g. `Foo1` for the first augment of `foo`.
    pub ordinal: Option<u32>,
    /// Appended to every level, e.g. `Data` for a module's data root.
    pub class_suffix: Option<&'static str>,
}

impl NamingStrategy {
    pub fn new(namespace: StatementNamespace, root_name: impl Into<String>) -> Self {
        let root_name = root_name.into();
        Self {
            namespace,
            child_package: package_segment(&root_name),
            root_name,
            level: NamingLevel::CamelCase,
            ordinal: None,
            class_suffix: None,
        }
    }

    /// Augment names are the target's name plus a per-domain ordinal.
    pub fn augment(target_name: &str, ordinal: u32) -> Self {
        let mut strategy = Self::new(StatementNamespace::Augment, target_name);
        strategy.child_package = package_segment(&format!("{target_name}{ordinal}"));
        strategy.ordinal = Some(ordinal);
        strategy
    }

    /// Module data roots are named `<Module>Data`.
    pub fn module(module_name: &str) -> Self {
        let mut strategy = Self::new(StatementNamespace::Module, module_name);
        strategy.class_suffix = Some("Data");
        strategy
    }

    pub fn simple_class_name(&self) -> String {
        let mut name = match self.level {
            NamingLevel::CamelCase | NamingLevel::CamelCaseWithNamespace => {
                class_name(&self.root_name)
            }
            NamingLevel::Bijective | NamingLevel::BijectiveWithNamespace => {
                bijective_class_name(&self.root_name)
            }
        };
        if let Some(suffix) = self.class_suffix {
            name.push_str(suffix);
        }
        if let Some(ordinal) = self.ordinal {
            name.push_str(&ordinal.to_string());
        }
        if matches!(
            self.level,
            NamingLevel::CamelCaseWithNamespace | NamingLevel::BijectiveWithNamespace
        ) {
            name.push_str(self.namespace.suffix());
        }
        name
    }

    /// The next, more specific strategy; `None` at the terminal level.
    pub fn fallback(&self) -> Option<Self> {
        let level = self.level.next()?;
        Some(Self {
            level,
            ..self.clone()
        })
    }
}

impl fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.simple_class_name(), self.level)
    }
}

#[cfg(test)]
#[path = "tests/naming_strategy_tests.rs"]
mod naming_strategy_tests;
