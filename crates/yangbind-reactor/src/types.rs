//! Binding type descriptors produced by materialization.

use serde::Serialize;
use std::fmt;

/// Package of the binding runtime base types.
pub const BINDING_PACKAGE: &str = "yangbind.binding";

/// A possibly nested class name: `package.Outer.Inner`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct JavaTypeName {
    pub package: String,
    /// Outermost first.
    pub simple_names: Vec<String>,
}

impl JavaTypeName {
    pub fn new(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            simple_names: vec![simple_name.into()],
        }
    }

    pub fn binding(simple_name: &str) -> Self {
        Self::new(BINDING_PACKAGE, simple_name)
    }

    pub fn java_lang(simple_name: &str) -> Self {
        Self::new("java.lang", simple_name)
    }

    /// A class enclosed in this one.
    pub fn nested(&self, simple_name: impl Into<String>) -> Self {
        let mut simple_names = self.simple_names.clone();
        simple_names.push(simple_name.into());
        Self {
            package: self.package.clone(),
            simple_names,
        }
    }

    pub fn simple_name(&self) -> &str {
        self.simple_names.last().map_or("", String::as_str)
    }
}

impl fmt::Display for JavaTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.package.is_empty() {
            write!(f, "{}.", self.package)?;
        }
        f.write_str(&self.simple_names.join("."))
    }
}

/// A reference to a type, possibly with type arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeRef {
    Named(JavaTypeName),
    Parameterized {
        raw: JavaTypeName,
        arguments: Vec<TypeRef>,
    },
}

impl TypeRef {
    pub fn binding(simple_name: &str) -> Self {
        Self::Named(JavaTypeName::binding(simple_name))
    }

    pub fn parameterized(raw: JavaTypeName, arguments: Vec<TypeRef>) -> Self {
        Self::Parameterized { raw, arguments }
    }

    /// Stand-in for references that could not be resolved.
    pub fn object() -> Self {
        Self::Named(JavaTypeName::java_lang("Object"))
    }

    pub fn raw(&self) -> &JavaTypeName {
        match self {
            Self::Named(name) | Self::Parameterized { raw: name, .. } => name,
        }
    }
}

impl From<JavaTypeName> for TypeRef {
    fn from(name: JavaTypeName) -> Self {
        Self::Named(name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::Parameterized { raw, arguments } => {
                write!(f, "{raw}<")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                f.write_str(">")
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    Interface,
    TransferObject,
    Enumeration,
    Union,
    DataRoot,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSignature {
    pub name: String,
    pub return_type: TypeRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constant {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    pub value: String,
}

/// Documentation attached by the codegen builder factory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodegenMetadata {
    pub module_name: String,
    /// `kind argument` of the source statement.
    pub statement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedType {
    pub name: JavaTypeName,
    pub kind: TypeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<TypeRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<Constant>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodSignature>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<GeneratedType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CodegenMetadata>,
}

impl GeneratedType {
    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn constant(&self, name: &str) -> Option<&Constant> {
        self.constants.iter().find(|c| c.name == name)
    }

    pub fn nested_type(&self, simple_name: &str) -> Option<&GeneratedType> {
        self.nested
            .iter()
            .find(|n| n.name.simple_name() == simple_name)
    }

    pub fn implements_raw(&self, simple_name: &str) -> bool {
        self.implements
            .iter()
            .any(|t| t.raw().simple_name() == simple_name)
    }
}
