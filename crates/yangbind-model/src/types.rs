//! Type specifications of leaves, leaf-lists and typedefs.

use crate::error::ModelError;
use crate::path::PathExpression;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use yangbind_common::QName;

/// Built-in YANG types that need no further linkage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinType {
    Binary,
    Boolean,
    Decimal64,
    Empty,
    Int8,
    Int16,
    Int32,
    Int64,
    String,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
}

impl BuiltinType {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Boolean => "boolean",
            Self::Decimal64 => "decimal64",
            Self::Empty => "empty",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::String => "string",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
        }
    }
}

impl FromStr for BuiltinType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "binary" => Self::Binary,
            "boolean" => Self::Boolean,
            "decimal64" => Self::Decimal64,
            "empty" => Self::Empty,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "string" => Self::String,
            "uint8" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            other => return Err(ModelError::UnknownBuiltinType(other.to_string())),
        })
    }
}

/// The `type` substatement of a type-bearing statement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeSpec {
    Builtin(BuiltinType),
    /// Reference to a typedef by qualified name.
    Typedef(QName),
    Enumeration(Vec<String>),
    Bits(Vec<String>),
    Union(Vec<TypeSpec>),
    Leafref(PathExpression),
    Identityref(Vec<QName>),
    InstanceIdentifier,
}

impl TypeSpec {
    /// Inline types define a new enclosed type at their point of use.
    pub fn is_inline_definition(&self) -> bool {
        matches!(self, Self::Enumeration(_) | Self::Bits(_) | Self::Union(_))
    }

    /// Visit every leafref path in this type, including union members.
    pub fn for_each_leafref<'a>(&'a self, f: &mut impl FnMut(&'a PathExpression)) {
        match self {
            Self::Leafref(path) => f(path),
            Self::Union(members) => members.iter().for_each(|m| m.for_each_leafref(f)),
            _ => {}
        }
    }
}
