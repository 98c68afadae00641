//! Injected type-builder abstraction.
//!
//! Materialization only talks to `TypeBuilderFactory` and `TypeBuilder`.
//! `CodegenTypeBuilderFactory` attaches documentation for source emission;
//! `RuntimeTypeBuilderFactory` skips it for callers that only need the
//! resolved type graph.

use crate::error::ReactorError;
use crate::types::{
    CodegenMetadata, Constant, GeneratedType, JavaTypeName, MethodSignature, TypeKind, TypeRef,
};

pub trait TypeBuilder {
    fn name(&self) -> &JavaTypeName;

    fn add_implemented_type(&mut self, type_ref: TypeRef);

    /// Fails on a second method with the same name.
    fn add_method(&mut self, name: &str, return_type: TypeRef) -> Result<(), ReactorError>;

    /// Fails on a second constant with the same name.
    fn add_constant(
        &mut self,
        name: &str,
        type_ref: TypeRef,
        value: String,
    ) -> Result<(), ReactorError>;

    fn add_nested_type(&mut self, nested: GeneratedType) -> Result<(), ReactorError>;

    fn set_metadata(&mut self, metadata: CodegenMetadata);

    fn build(self: Box<Self>) -> GeneratedType;
}

pub trait TypeBuilderFactory {
    fn new_structured_type(&self, name: JavaTypeName) -> Box<dyn TypeBuilder>;

    fn new_transfer_object(&self, name: JavaTypeName) -> Box<dyn TypeBuilder>;

    fn new_enum_type(&self, name: JavaTypeName) -> Box<dyn TypeBuilder>;

    fn new_union_type(&self, name: JavaTypeName) -> Box<dyn TypeBuilder>;

    fn new_data_root(&self, name: JavaTypeName) -> Box<dyn TypeBuilder>;

    /// Invoked once per built type with its source documentation.
    fn attach_codegen_metadata(&self, builder: &mut dyn TypeBuilder, metadata: CodegenMetadata);
}

/// Plain accumulating builder shared by both factories.
#[derive(Debug)]
pub struct GeneratedTypeBuilder {
    ty: GeneratedType,
}

impl GeneratedTypeBuilder {
    pub fn new(name: JavaTypeName, kind: TypeKind) -> Self {
        Self {
            ty: GeneratedType {
                name,
                kind,
                implements: Vec::new(),
                constants: Vec::new(),
                methods: Vec::new(),
                nested: Vec::new(),
                metadata: None,
            },
        }
    }

    fn duplicate(&self, kind: &'static str, name: &str) -> ReactorError {
        ReactorError::DuplicateMember {
            kind,
            name: name.to_string(),
            owner: self.ty.name.to_string(),
        }
    }
}

impl TypeBuilder for GeneratedTypeBuilder {
    fn name(&self) -> &JavaTypeName {
        &self.ty.name
    }

    fn add_implemented_type(&mut self, type_ref: TypeRef) {
        if !self.ty.implements.contains(&type_ref) {
            self.ty.implements.push(type_ref);
        }
    }

    fn add_method(&mut self, name: &str, return_type: TypeRef) -> Result<(), ReactorError> {
        if self.ty.method(name).is_some() {
            return Err(self.duplicate("method", name));
        }
        self.ty.methods.push(MethodSignature {
            name: name.to_string(),
            return_type,
        });
        Ok(())
    }

    fn add_constant(
        &mut self,
        name: &str,
        type_ref: TypeRef,
        value: String,
    ) -> Result<(), ReactorError> {
        if self.ty.constant(name).is_some() {
            return Err(self.duplicate("constant", name));
        }
        self.ty.constants.push(Constant {
            name: name.to_string(),
            type_ref,
            value,
        });
        Ok(())
    }

    fn add_nested_type(&mut self, nested: GeneratedType) -> Result<(), ReactorError> {
        let simple = nested.name.simple_name().to_string();
        if simple == self.ty.name.simple_name() || self.ty.nested_type(&simple).is_some() {
            return Err(self.duplicate("nested type", &simple));
        }
        self.ty.nested.push(nested);
        Ok(())
    }

    fn set_metadata(&mut self, metadata: CodegenMetadata) {
        self.ty.metadata = Some(metadata);
    }

    fn build(self: Box<Self>) -> GeneratedType {
        self.ty
    }
}

fn builder(name: JavaTypeName, kind: TypeKind) -> Box<dyn TypeBuilder> {
    Box::new(GeneratedTypeBuilder::new(name, kind))
}

/// Builders carrying documentation for source emission.
#[derive(Debug, Default, Clone, Copy)]
pub struct CodegenTypeBuilderFactory;

impl TypeBuilderFactory for CodegenTypeBuilderFactory {
    fn new_structured_type(&self, name: JavaTypeName) -> Box<dyn TypeBuilder> {
        builder(name, TypeKind::Interface)
    }

    fn new_transfer_object(&self, name: JavaTypeName) -> Box<dyn TypeBuilder> {
        builder(name, TypeKind::TransferObject)
    }

    fn new_enum_type(&self, name: JavaTypeName) -> Box<dyn TypeBuilder> {
        builder(name, TypeKind::Enumeration)
    }

    fn new_union_type(&self, name: JavaTypeName) -> Box<dyn TypeBuilder> {
        builder(name, TypeKind::Union)
    }

    fn new_data_root(&self, name: JavaTypeName) -> Box<dyn TypeBuilder> {
        builder(name, TypeKind::DataRoot)
    }

    fn attach_codegen_metadata(&self, builder: &mut dyn TypeBuilder, metadata: CodegenMetadata) {
        builder.set_metadata(metadata);
    }
}

/// Builders for the runtime type graph; documentation is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuntimeTypeBuilderFactory;

impl TypeBuilderFactory for RuntimeTypeBuilderFactory {
    fn new_structured_type(&self, name: JavaTypeName) -> Box<dyn TypeBuilder> {
        builder(name, TypeKind::Interface)
    }

    fn new_transfer_object(&self, name: JavaTypeName) -> Box<dyn TypeBuilder> {
        builder(name, TypeKind::TransferObject)
    }

    fn new_enum_type(&self, name: JavaTypeName) -> Box<dyn TypeBuilder> {
        builder(name, TypeKind::Enumeration)
    }

    fn new_union_type(&self, name: JavaTypeName) -> Box<dyn TypeBuilder> {
        builder(name, TypeKind::Union)
    }

    fn new_data_root(&self, name: JavaTypeName) -> Box<dyn TypeBuilder> {
        builder(name, TypeKind::DataRoot)
    }

    fn attach_codegen_metadata(&self, _builder: &mut dyn TypeBuilder, _metadata: CodegenMetadata) {}
}

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod builder_tests;
