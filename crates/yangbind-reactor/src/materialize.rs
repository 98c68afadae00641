//! Type materialization.
//!
//! Pull-based and memoized: `ensure` builds a generator's type at most once,
//! after first ensuring its prerequisites (used groupings, the choice of a
//! case, the target of an augment, base typedefs and identities). Asking for a
//! prerequisite that is still being built means the types depend on each
//! other, which is fatal. Names are already final at this point, so plain
//! references to other types never require building them.

use crate::builder::{TypeBuilder, TypeBuilderFactory};
use crate::collision::{MemberId, Naming};
use crate::error::ReactorError;
use crate::generator::{GenId, GeneratorArena, GeneratorKind, RefTarget, TypeBinding};
use crate::types::{CodegenMetadata, GeneratedType, JavaTypeName, TypeRef};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use yangbind_common::limits::MAX_LEAFREF_CHAIN;
use yangbind_common::mapping::{class_name, getter_name, root_package};
use yangbind_model::{BuiltinType, SchemaContext};

/// Final class names, derived from the solved collision domains.
pub struct TypeNames<'a> {
    pub arena: &'a GeneratorArena,
    pub naming: &'a Naming,
}

impl<'a> TypeNames<'a> {
    pub fn new(arena: &'a GeneratorArena, naming: &'a Naming) -> Self {
        Self { arena, naming }
    }

    /// Class name of a generator. Copies share their original's class and
    /// leaves name the class enclosing their inline type.
    pub fn type_name(&self, id: GenId) -> Option<JavaTypeName> {
        let generator = self.arena.get(id);
        if generator.added_by_uses {
            let original = self.arena.original_of(id)?;
            return (original != id).then(|| self.type_name(original)).flatten();
        }
        let member = generator.member?;
        if matches!(
            generator.kind,
            GeneratorKind::Leaf { .. } | GeneratorKind::LeafList { .. }
        ) {
            let enclosing = self.type_name(generator.parent?)?;
            return Some(enclosing.nested(self.naming.current_name(member)));
        }
        self.member_type_name(member)
    }

    /// Key class of a keyed list.
    pub fn key_type_name(&self, id: GenId) -> Option<JavaTypeName> {
        let original = self.arena.original_of(id).unwrap_or(id);
        match self.arena.get(original).kind {
            GeneratorKind::List {
                key_member: Some(member),
                ..
            } => self.member_type_name(member),
            _ => None,
        }
    }

    fn member_type_name(&self, member: MemberId) -> Option<JavaTypeName> {
        Some(JavaTypeName::new(
            self.package_of(member)?,
            self.naming.current_name(member),
        ))
    }

    /// Package of the domain a member competes in. An operation's input and
    /// output therefore live in the operation's package.
    pub fn package_of(&self, member: MemberId) -> Option<String> {
        let owner = self.naming.domain(self.naming.member(member).domain()).owner;
        let generator = self.arena.get(owner);
        if matches!(generator.kind, GeneratorKind::Module) {
            return self.arena.namespace_of(owner).map(root_package);
        }
        let owner_member = generator.member?;
        Some(format!(
            "{}.{}",
            self.package_of(owner_member)?,
            self.naming.child_package(owner_member)
        ))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Slot {
    Pending,
    InProgress,
    Done,
}

/// Types produced by stage 9.
#[derive(Debug, Default)]
pub(crate) struct Materialized {
    pub(crate) types: FxHashMap<GenId, GeneratedType>,
    pub(crate) key_types: FxHashMap<GenId, GeneratedType>,
}

pub(crate) struct Materializer<'a> {
    names: TypeNames<'a>,
    arena: &'a GeneratorArena,
    ctx: &'a SchemaContext,
    factory: &'a dyn TypeBuilderFactory,
    slots: Vec<Slot>,
    out: Materialized,
}

impl<'a> Materializer<'a> {
    pub(crate) fn new(
        arena: &'a GeneratorArena,
        naming: &'a Naming,
        ctx: &'a SchemaContext,
        factory: &'a dyn TypeBuilderFactory,
    ) -> Self {
        Self {
            names: TypeNames::new(arena, naming),
            arena,
            ctx,
            factory,
            slots: vec![Slot::Pending; arena.len()],
            out: Materialized::default(),
        }
    }

    pub(crate) fn run(mut self) -> Result<Materialized, ReactorError> {
        for &module in self.arena.modules() {
            self.materialize_tree(module)?;
        }
        Ok(self.out)
    }

    fn materialize_tree(&mut self, id: GenId) -> Result<(), ReactorError> {
        self.ensure(id)?;
        if self.arena.get(id).added_by_uses {
            return Ok(());
        }
        for &child in self.arena.children(id) {
            self.materialize_tree(child)?;
        }
        Ok(())
    }

    /// Build the type of `id` unless already built.
    pub(crate) fn ensure(&mut self, id: GenId) -> Result<(), ReactorError> {
        match self.slots[id.index()] {
            Slot::Done => return Ok(()),
            Slot::InProgress => {
                return Err(ReactorError::CircularType(
                    self.arena.describe(self.ctx, id),
                ));
            }
            Slot::Pending => {}
        }
        self.slots[id.index()] = Slot::InProgress;
        for prerequisite in self.prerequisites(id) {
            self.ensure(prerequisite)?;
        }
        if let Some(ty) = self.build(id)? {
            trace!(generator = %id, name = %ty.name, "materialized type");
            self.out.types.insert(id, ty);
        }
        self.slots[id.index()] = Slot::Done;
        Ok(())
    }

    fn prerequisites(&self, id: GenId) -> Vec<GenId> {
        let generator = self.arena.get(id);
        if generator.added_by_uses {
            return self
                .arena
                .original_of(id)
                .filter(|&o| o != id)
                .into_iter()
                .collect();
        }
        let mut out: Vec<GenId> = generator
            .composite
            .as_ref()
            .map(|c| c.groupings.clone())
            .unwrap_or_default();
        match &generator.kind {
            GeneratorKind::Case => out.extend(self.enclosing_choice(id)),
            GeneratorKind::ModuleAugment(state) | GeneratorKind::UsesAugment(state) => {
                out.extend(state.target);
            }
            GeneratorKind::Typedef {
                binding: Some(TypeBinding::Typedef(base)),
            } => out.push(*base),
            GeneratorKind::Identity { bases } => out.extend(bases.iter().copied()),
            _ => {}
        }
        out
    }

    fn enclosing_choice(&self, case: GenId) -> Option<GenId> {
        let parent = self.arena.get(case).parent?;
        match &self.arena.get(parent).kind {
            GeneratorKind::Choice => Some(parent),
            GeneratorKind::ModuleAugment(state) | GeneratorKind::UsesAugment(state) => {
                state.target
            }
            _ => None,
        }
    }

    fn type_ref(&self, id: GenId) -> TypeRef {
        self.names
            .type_name(id)
            .map_or_else(TypeRef::object, TypeRef::Named)
    }

    fn require_name(&self, id: GenId) -> Result<JavaTypeName, ReactorError> {
        self.names.type_name(id).ok_or_else(|| {
            ReactorError::UnresolvedReference {
                kind: "type name",
                name: self.arena.get(id).local_name().to_string(),
                site: self.arena.describe(self.ctx, id),
            }
        })
    }

    fn metadata(&self, id: GenId) -> CodegenMetadata {
        let stmt = self.ctx.get(self.arena.get(id).statement);
        CodegenMetadata {
            module_name: self
                .ctx
                .module_of(self.arena.get(id).statement)
                .map(|m| m.name.clone())
                .unwrap_or_default(),
            statement: format!("{} {}", stmt.kind, stmt.argument_text()),
            description: stmt.description.clone(),
            reference: stmt.reference.clone(),
        }
    }

    fn finish(&self, id: GenId, mut builder: Box<dyn TypeBuilder>) -> GeneratedType {
        self.factory
            .attach_codegen_metadata(builder.as_mut(), self.metadata(id));
        builder.build()
    }

    fn build(&mut self, id: GenId) -> Result<Option<GeneratedType>, ReactorError> {
        let generator = self.arena.get(id);
        if generator.added_by_uses || generator.member.is_none() {
            return Ok(None);
        }
        let ty = match &generator.kind {
            GeneratorKind::Leaf { .. } | GeneratorKind::LeafList { .. } => return Ok(None),
            GeneratorKind::Module => self.build_data_root(id)?,
            GeneratorKind::Typedef { binding } => {
                let name = self.require_name(id)?;
                let binding = binding
                    .clone()
                    .unwrap_or(TypeBinding::Builtin(BuiltinType::String));
                let mut ty = self.definition_type(name, &binding, id, 0)?;
                ty.implements.push(TypeRef::binding("TypeObject"));
                ty
            }
            GeneratorKind::Identity { bases } => {
                let name = self.require_name(id)?;
                let mut builder = self.factory.new_structured_type(name);
                if bases.is_empty() {
                    builder.add_implemented_type(TypeRef::binding("BaseIdentity"));
                }
                for &base in bases {
                    builder.add_implemented_type(self.type_ref(base));
                }
                self.add_qname(&mut *builder, id)?;
                self.finish(id, builder)
            }
            GeneratorKind::Choice => {
                let name = self.require_name(id)?;
                let mut builder = self.factory.new_structured_type(name);
                builder.add_implemented_type(TypeRef::parameterized(
                    JavaTypeName::binding("ChoiceIn"),
                    vec![self.parent_type(id)],
                ));
                self.add_qname(&mut *builder, id)?;
                self.finish(id, builder)
            }
            GeneratorKind::Rpc | GeneratorKind::Action | GeneratorKind::KeyedListAction => {
                self.build_operation(id)?
            }
            _ => self.build_structured(id)?,
        };
        if let GeneratorKind::List { keyed: true, .. } = generator.kind {
            let key = self.build_key(id)?;
            self.out.key_types.insert(id, key);
        }
        Ok(Some(ty))
    }

    fn add_qname(&self, builder: &mut dyn TypeBuilder, id: GenId) -> Result<(), ReactorError> {
        if let Some(qname) = &self.arena.get(id).qname {
            builder.add_constant("QNAME", TypeRef::binding("QName"), qname.to_string())?;
        }
        Ok(())
    }

    /// Type a child's `ChildOf` points at: the parent, the augment target for
    /// augment content, the data root for top-level nodes.
    fn parent_type(&self, id: GenId) -> TypeRef {
        let Some(parent) = self.arena.get(id).parent else {
            return TypeRef::object();
        };
        match &self.arena.get(parent).kind {
            GeneratorKind::ModuleAugment(state) | GeneratorKind::UsesAugment(state) => state
                .target
                .map_or_else(TypeRef::object, |t| self.type_ref(t)),
            _ => self.type_ref(parent),
        }
    }

    fn build_data_root(&mut self, id: GenId) -> Result<GeneratedType, ReactorError> {
        let name = self.require_name(id)?;
        let mut builder = self.factory.new_data_root(name);
        builder.add_implemented_type(TypeRef::parameterized(
            JavaTypeName::binding("DataRoot"),
            vec![self.type_ref(id)],
        ));
        self.add_children(&mut *builder, id)?;
        Ok(self.finish(id, builder))
    }

    fn build_structured(&mut self, id: GenId) -> Result<GeneratedType, ReactorError> {
        let generator = self.arena.get(id);
        let name = self.require_name(id)?;
        let this = self.type_ref(id);
        let mut builder = self.factory.new_structured_type(name);
        if let Some(composite) = &generator.composite {
            for &grouping in &composite.groupings {
                builder.add_implemented_type(self.type_ref(grouping));
            }
        }
        let augmentable = TypeRef::parameterized(
            JavaTypeName::binding("Augmentable"),
            vec![this.clone()],
        );
        let child_of = TypeRef::parameterized(
            JavaTypeName::binding("ChildOf"),
            vec![self.parent_type(id)],
        );
        match &generator.kind {
            GeneratorKind::Container | GeneratorKind::List { .. } => {
                builder.add_implemented_type(child_of);
                builder.add_implemented_type(augmentable);
            }
            GeneratorKind::Case => {
                if let Some(choice) = self.enclosing_choice(id) {
                    builder.add_implemented_type(self.type_ref(choice));
                }
                builder.add_implemented_type(augmentable);
            }
            GeneratorKind::Notification => {
                builder.add_implemented_type(TypeRef::parameterized(
                    JavaTypeName::binding("Notification"),
                    vec![this.clone()],
                ));
                builder.add_implemented_type(augmentable);
            }
            GeneratorKind::InstanceNotification => {
                builder.add_implemented_type(TypeRef::parameterized(
                    JavaTypeName::binding("InstanceNotification"),
                    vec![this.clone(), self.data_parent_type(id)],
                ));
                builder.add_implemented_type(augmentable);
            }
            GeneratorKind::KeyedListNotification => {
                let parent = self.arena.data_parent(id);
                let key = parent
                    .and_then(|p| self.names.key_type_name(p))
                    .map_or_else(TypeRef::object, TypeRef::Named);
                builder.add_implemented_type(TypeRef::parameterized(
                    JavaTypeName::binding("KeyedListNotification"),
                    vec![this.clone(), self.data_parent_type(id), key],
                ));
                builder.add_implemented_type(augmentable);
            }
            GeneratorKind::Input => {
                builder.add_implemented_type(TypeRef::binding("RpcInput"));
                builder.add_implemented_type(augmentable);
            }
            GeneratorKind::Output => {
                builder.add_implemented_type(TypeRef::binding("RpcOutput"));
                builder.add_implemented_type(augmentable);
            }
            GeneratorKind::ModuleAugment(state) | GeneratorKind::UsesAugment(state) => {
                let target = state
                    .target
                    .map_or_else(TypeRef::object, |t| self.type_ref(t));
                builder.add_implemented_type(TypeRef::parameterized(
                    JavaTypeName::binding("Augmentation"),
                    vec![target],
                ));
            }
            GeneratorKind::Opaque => {
                builder.add_implemented_type(child_of);
                builder.add_implemented_type(TypeRef::parameterized(
                    JavaTypeName::binding("OpaqueObject"),
                    vec![this.clone()],
                ));
            }
            _ => {}
        }
        if let GeneratorKind::List { keyed: true, .. } = generator.kind {
            let key = self
                .names
                .key_type_name(id)
                .map_or_else(TypeRef::object, TypeRef::Named);
            builder.add_implemented_type(TypeRef::parameterized(
                JavaTypeName::binding("Identifiable"),
                vec![key.clone()],
            ));
            builder.add_method("key", key)?;
        }
        if !generator.kind.is_augment() && !matches!(generator.kind, GeneratorKind::Grouping(_)) {
            self.add_qname(&mut *builder, id)?;
        }
        self.add_children(&mut *builder, id)?;
        Ok(self.finish(id, builder))
    }

    fn data_parent_type(&self, id: GenId) -> TypeRef {
        self.arena
            .data_parent(id)
            .map_or_else(TypeRef::object, |p| self.type_ref(p))
    }

    fn build_operation(&mut self, id: GenId) -> Result<GeneratedType, ReactorError> {
        let generator = self.arena.get(id);
        let name = self.require_name(id)?;
        let mut builder = self.factory.new_structured_type(name);
        let mut input = TypeRef::binding("RpcInput");
        let mut output = TypeRef::binding("RpcOutput");
        for &child in generator.children() {
            match self.arena.get(child).kind {
                GeneratorKind::Input => input = self.type_ref(child),
                GeneratorKind::Output => output = self.type_ref(child),
                _ => {}
            }
        }
        let parent = self.data_parent_type(id);
        let operation = match generator.kind {
            GeneratorKind::Rpc => TypeRef::parameterized(
                JavaTypeName::binding("Rpc"),
                vec![input, output],
            ),
            GeneratorKind::KeyedListAction => {
                let key = self
                    .arena
                    .data_parent(id)
                    .and_then(|p| self.names.key_type_name(p))
                    .map_or_else(TypeRef::object, TypeRef::Named);
                TypeRef::parameterized(
                    JavaTypeName::binding("KeyedListAction"),
                    vec![key, parent, input, output],
                )
            }
            _ => TypeRef::parameterized(
                JavaTypeName::binding("Action"),
                vec![
                    TypeRef::parameterized(
                        JavaTypeName::binding("InstanceIdentifier"),
                        vec![parent],
                    ),
                    input,
                    output,
                ],
            ),
        };
        builder.add_implemented_type(operation);
        self.add_qname(&mut *builder, id)?;
        Ok(self.finish(id, builder))
    }

    fn build_key(&mut self, list: GenId) -> Result<GeneratedType, ReactorError> {
        let name = self.names.key_type_name(list).ok_or_else(|| {
            ReactorError::UnresolvedReference {
                kind: "list key",
                name: self.arena.get(list).local_name().to_string(),
                site: self.arena.describe(self.ctx, list),
            }
        })?;
        let mut builder = self.factory.new_transfer_object(name);
        builder.add_implemented_type(TypeRef::parameterized(
            JavaTypeName::binding("Identifier"),
            vec![self.type_ref(list)],
        ));
        let keys = &self.ctx.get(self.arena.get(list).statement).keys;
        let children = self.arena.schema_children(list);
        for key in keys {
            let leaf = children
                .iter()
                .copied()
                .find(|&c| self.arena.get(c).qname.as_ref() == Some(key))
                .ok_or_else(|| ReactorError::UnresolvedReference {
                    kind: "key leaf",
                    name: key.to_string(),
                    site: self.arena.describe(self.ctx, list),
                })?;
            let ty = self.leaf_type(leaf, 0)?;
            builder.add_method(&getter_name(&key.local_name), ty)?;
        }
        Ok(self.finish(list, builder))
    }

    /// Getters for data children and enclosed types of inline leaf types.
    fn add_children(&mut self, builder: &mut dyn TypeBuilder, id: GenId) -> Result<(), ReactorError> {
        for &child in self.arena.children(id) {
            let generator = self.arena.get(child);
            let return_type = match &generator.kind {
                GeneratorKind::Container
                | GeneratorKind::Choice
                | GeneratorKind::Opaque => Some(self.type_ref(child)),
                GeneratorKind::List { keyed, .. } => {
                    let element = self.type_ref(child);
                    Some(if *keyed {
                        let key = self
                            .names
                            .key_type_name(child)
                            .map_or_else(TypeRef::object, TypeRef::Named);
                        TypeRef::parameterized(
                            JavaTypeName::new("java.util", "Map"),
                            vec![key, element],
                        )
                    } else {
                        TypeRef::parameterized(
                            JavaTypeName::new("java.util", "List"),
                            vec![element],
                        )
                    })
                }
                GeneratorKind::Leaf { .. } => Some(self.leaf_type(child, 0)?),
                GeneratorKind::LeafList { .. } => Some(TypeRef::parameterized(
                    JavaTypeName::new("java.util", "Set"),
                    vec![self.leaf_type(child, 0)?],
                )),
                _ => None,
            };
            if let Some(return_type) = return_type {
                builder.add_method(&getter_name(generator.local_name()), return_type)?;
            }

            let inline = (!generator.added_by_uses)
                .then(|| generator.kind.binding())
                .flatten()
                .filter(|b| b.is_inline_definition());
            if let Some(binding) = inline {
                let name = self.require_name(child)?;
                let nested = self.definition_type(name, binding, child, 0)?;
                builder.add_nested_type(nested)?;
            }
        }
        Ok(())
    }

    /// Return type of a leaf or leaf-list value.
    fn leaf_type(&self, leaf: GenId, depth: usize) -> Result<TypeRef, ReactorError> {
        if depth > MAX_LEAFREF_CHAIN {
            return Err(ReactorError::CircularType(self.arena.describe(self.ctx, leaf)));
        }
        let Some(binding) = self.arena.get(leaf).kind.binding() else {
            return Ok(TypeRef::object());
        };
        let inline = self.names.type_name(leaf);
        self.value_type(binding, inline.as_ref(), depth)
    }

    fn value_type(
        &self,
        binding: &TypeBinding,
        inline: Option<&JavaTypeName>,
        depth: usize,
    ) -> Result<TypeRef, ReactorError> {
        Ok(match binding {
            TypeBinding::Builtin(builtin) => builtin_type(*builtin),
            TypeBinding::Typedef(typedef) => self.type_ref(*typedef),
            TypeBinding::Enumeration(_) | TypeBinding::Bits(_) | TypeBinding::Union(_) => inline
                .cloned()
                .map_or_else(TypeRef::object, TypeRef::Named),
            TypeBinding::Leafref {
                target: RefTarget::Resolved(target),
                ..
            } => self.leaf_type(*target, depth + 1)?,
            TypeBinding::Leafref { .. } => TypeRef::object(),
            TypeBinding::Identityref { targets, .. } => {
                let base = match targets.as_slice() {
                    [RefTarget::Resolved(identity)] => self.type_ref(*identity),
                    _ => TypeRef::binding("BaseIdentity"),
                };
                TypeRef::parameterized(JavaTypeName::java_lang("Class"), vec![base])
            }
            TypeBinding::InstanceIdentifier => TypeRef::binding("InstanceIdentifier"),
        })
    }

    /// The class defined by a typedef or an inline leaf type.
    fn definition_type(
        &self,
        name: JavaTypeName,
        binding: &TypeBinding,
        site: GenId,
        depth: usize,
    ) -> Result<GeneratedType, ReactorError> {
        match binding {
            TypeBinding::Enumeration(values) => {
                let mut builder = self.factory.new_enum_type(name.clone());
                for value in values {
                    builder.add_constant(
                        &class_name(value),
                        TypeRef::Named(name.clone()),
                        value.clone(),
                    )?;
                }
                Ok(self.finish(site, builder))
            }
            TypeBinding::Bits(bits) => {
                let mut builder = self.factory.new_transfer_object(name);
                for bit in bits {
                    builder.add_method(
                        &getter_name(bit),
                        TypeRef::Named(JavaTypeName::java_lang("Boolean")),
                    )?;
                }
                Ok(self.finish(site, builder))
            }
            TypeBinding::Union(members) => {
                let mut builder = self.factory.new_union_type(name.clone());
                let mut getters = FxHashSet::default();
                for (index, member) in members.iter().enumerate() {
                    let member_type = if member.is_inline_definition() {
                        let nested_name = name.nested(format!("{}{index}", inline_kind(member)));
                        let nested = self.definition_type(nested_name.clone(), member, site, depth + 1)?;
                        builder.add_nested_type(nested)?;
                        TypeRef::Named(nested_name)
                    } else {
                        self.value_type(member, None, depth)?
                    };
                    let mut getter =
                        format!("get{}", member_type.raw().simple_name().replace("[]", "Array"));
                    if !getters.insert(getter.clone()) {
                        getter.push_str(&index.to_string());
                    }
                    builder.add_method(&getter, member_type)?;
                }
                Ok(self.finish(site, builder))
            }
            other => {
                let mut builder = self.factory.new_transfer_object(name);
                if let TypeBinding::Typedef(base) = other {
                    builder.add_implemented_type(self.type_ref(*base));
                }
                builder.add_method("getValue", self.value_type(other, None, depth)?)?;
                Ok(self.finish(site, builder))
            }
        }
    }
}

fn inline_kind(binding: &TypeBinding) -> &'static str {
    match binding {
        TypeBinding::Enumeration(_) => "Enumeration",
        TypeBinding::Bits(_) => "Bits",
        _ => "Union",
    }
}

fn builtin_type(builtin: BuiltinType) -> TypeRef {
    let name = match builtin {
        BuiltinType::Binary => JavaTypeName::new("", "byte[]"),
        BuiltinType::Boolean => JavaTypeName::java_lang("Boolean"),
        BuiltinType::Decimal64 => JavaTypeName::new("java.math", "BigDecimal"),
        BuiltinType::Empty => JavaTypeName::binding("Empty"),
        BuiltinType::Int8 => JavaTypeName::java_lang("Byte"),
        BuiltinType::Int16 => JavaTypeName::java_lang("Short"),
        BuiltinType::Int32 => JavaTypeName::java_lang("Integer"),
        BuiltinType::Int64 => JavaTypeName::java_lang("Long"),
        BuiltinType::String => JavaTypeName::java_lang("String"),
        BuiltinType::Uint8 => JavaTypeName::binding("Uint8"),
        BuiltinType::Uint16 => JavaTypeName::binding("Uint16"),
        BuiltinType::Uint32 => JavaTypeName::binding("Uint32"),
        BuiltinType::Uint64 => JavaTypeName::binding("Uint64"),
    };
    TypeRef::Named(name)
}

#[cfg(test)]
#[path = "tests/materialize_tests.rs"]
mod materialize_tests;
