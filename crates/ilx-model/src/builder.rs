//! Programmatic construction of a [`Program`].
//!
//! The front-end (and every test) describes the loaded IR through this
//! builder. Properties and events expand into their accessor methods, and
//! auto-properties additionally get a compiler-generated backing field, the
//! same shape a compiled assembly has.

use crate::annotation::Annotation;
use crate::errors::ModelError;
use crate::identity::{OperatorKind, SymbolIdentity, SymbolName, TypeKey};
use crate::program::{
    AccessorKind, AssemblyDef, AssemblyId, BodyState, MemberDef, MemberFlags, MemberId,
    MemberKind, ParamDef, Program, Synthesized, TypeDef, TypeFlags, TypeId, TypeKind,
};
use tracing::debug;

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    pub flags: TypeFlags,
    pub base: Option<TypeKey>,
    pub annotations: Vec<Annotation>,
}

impl TypeDecl {
    pub fn new(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            flags: TypeFlags::empty(),
            base: None,
            annotations: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Class, name)
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Struct, name)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Interface, name)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Enum, name)
    }

    #[must_use]
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.base = Some(TypeKey::new(base));
        self
    }

    #[must_use]
    pub fn static_class(mut self) -> Self {
        self.flags |= TypeFlags::STATIC;
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Method, constructor, operator or field declaration.
#[derive(Clone, Debug)]
pub struct MemberDecl {
    pub kind: MemberKind,
    pub name: SymbolName,
    pub params: Vec<ParamDef>,
    pub ty: TypeKey,
    pub flags: MemberFlags,
    pub body: BodyState,
    pub annotations: Vec<Annotation>,
}

impl MemberDecl {
    fn new(kind: MemberKind, name: SymbolName, ty: TypeKey) -> Self {
        Self {
            kind,
            name,
            params: Vec::new(),
            ty,
            flags: MemberFlags::empty(),
            body: BodyState::Present,
            annotations: Vec::new(),
        }
    }

    pub fn method(name: impl Into<String>) -> Self {
        Self::new(
            MemberKind::Method,
            SymbolName::named(name),
            TypeKey::new(TypeKey::VOID),
        )
    }

    pub fn constructor() -> Self {
        Self::new(
            MemberKind::Constructor,
            SymbolName::named(SymbolName::CONSTRUCTOR),
            TypeKey::new(TypeKey::VOID),
        )
    }

    pub fn static_constructor() -> Self {
        let mut decl = Self::new(
            MemberKind::Constructor,
            SymbolName::named(SymbolName::STATIC_CONSTRUCTOR),
            TypeKey::new(TypeKey::VOID),
        );
        decl.flags |= MemberFlags::STATIC;
        decl
    }

    pub fn operator(op: OperatorKind, returns: impl Into<String>) -> Self {
        let mut decl = Self::new(
            MemberKind::Operator,
            SymbolName::Operator(op),
            TypeKey::new(returns),
        );
        decl.flags |= MemberFlags::STATIC;
        decl
    }

    pub fn field(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self::new(MemberKind::Field, SymbolName::named(name), TypeKey::new(ty))
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(ParamDef::new(name, ty));
        self
    }

    #[must_use]
    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.ty = TypeKey::new(ty);
        self
    }

    #[must_use]
    pub fn body(mut self, body: BodyState) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: MemberFlags) -> Self {
        self.flags |= flags;
        if flags.contains(MemberFlags::ABSTRACT) {
            self.body = BodyState::Abstract;
        }
        self
    }

    #[must_use]
    pub fn is_static(self) -> Self {
        self.flags(MemberFlags::STATIC)
    }

    #[must_use]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// One accessor of a property or event.
#[derive(Clone, Debug, Default)]
pub struct AccessorDecl {
    pub body: BodyState,
    pub annotations: Vec<Annotation>,
}

impl AccessorDecl {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn body(mut self, body: BodyState) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Clone, Debug)]
pub struct PropertyDecl {
    pub name: String,
    pub ty: TypeKey,
    pub flags: MemberFlags,
    pub getter: Option<AccessorDecl>,
    pub setter: Option<AccessorDecl>,
    /// Auto-property: accessors and backing field are compiler generated.
    pub auto: bool,
    pub annotations: Vec<Annotation>,
}

impl PropertyDecl {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeKey::new(ty),
            flags: MemberFlags::empty(),
            getter: None,
            setter: None,
            auto: false,
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn getter(self) -> Self {
        self.getter_with(AccessorDecl::new())
    }

    #[must_use]
    pub fn setter(self) -> Self {
        self.setter_with(AccessorDecl::new())
    }

    #[must_use]
    pub fn getter_with(mut self, accessor: AccessorDecl) -> Self {
        self.getter = Some(accessor);
        self
    }

    #[must_use]
    pub fn setter_with(mut self, accessor: AccessorDecl) -> Self {
        self.setter = Some(accessor);
        self
    }

    /// Auto-property with a getter and a setter.
    #[must_use]
    pub fn auto(mut self) -> Self {
        self.auto = true;
        self.getter.get_or_insert_with(AccessorDecl::new);
        self.setter.get_or_insert_with(AccessorDecl::new);
        self
    }

    #[must_use]
    pub fn is_static(mut self) -> Self {
        self.flags |= MemberFlags::STATIC;
        self
    }

    #[must_use]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Clone, Debug)]
pub struct EventDecl {
    pub name: String,
    pub ty: TypeKey,
    pub flags: MemberFlags,
    pub add: AccessorDecl,
    pub remove: AccessorDecl,
    /// Field-like event: accessors are compiler generated.
    pub auto: bool,
    pub annotations: Vec<Annotation>,
}

impl EventDecl {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeKey::new(ty),
            flags: MemberFlags::empty(),
            add: AccessorDecl::new(),
            remove: AccessorDecl::new(),
            auto: false,
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn auto(mut self) -> Self {
        self.auto = true;
        self
    }

    #[must_use]
    pub fn adder(mut self, accessor: AccessorDecl) -> Self {
        self.add = accessor;
        self
    }

    #[must_use]
    pub fn remover(mut self, accessor: AccessorDecl) -> Self {
        self.remove = accessor;
        self
    }

    #[must_use]
    pub fn is_static(mut self) -> Self {
        self.flags |= MemberFlags::STATIC;
        self
    }

    #[must_use]
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyIds {
    pub property: MemberId,
    pub getter: Option<MemberId>,
    pub setter: Option<MemberId>,
    pub backing_field: Option<MemberId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventIds {
    pub event: MemberId,
    pub add: MemberId,
    pub remove: MemberId,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_assembly(&mut self, name: impl Into<String>) -> AssemblyId {
        let id = AssemblyId(self.program.assemblies.len() as u32);
        self.program.assemblies.push(AssemblyDef {
            id,
            name: name.into(),
            annotations: Vec::new(),
            types: Vec::new(),
        });
        id
    }

    pub fn annotate_assembly(&mut self, id: AssemblyId, annotation: Annotation) {
        self.program.assemblies[id.0 as usize]
            .annotations
            .push(annotation);
    }

    /// Add a top-level type. `decl.name` is the full name.
    pub fn add_type(&mut self, assembly: AssemblyId, decl: TypeDecl) -> Result<TypeId, ModelError> {
        let key = TypeKey::new(decl.name.clone());
        let id = self.insert_type(assembly, key, None, decl)?;
        self.program.assemblies[assembly.0 as usize].types.push(id);
        Ok(id)
    }

    /// Add a type nested in `enclosing`. `decl.name` is the simple name.
    pub fn add_nested_type(&mut self, enclosing: TypeId, decl: TypeDecl) -> Result<TypeId, ModelError> {
        let outer = self.program.ty(enclosing);
        let key = TypeKey::new(format!("{}+{}", outer.key, decl.name));
        let assembly = outer.assembly;
        let id = self.insert_type(assembly, key, Some(enclosing), decl)?;
        self.program.types[enclosing.0 as usize].nested.push(id);
        Ok(id)
    }

    fn insert_type(
        &mut self,
        assembly: AssemblyId,
        key: TypeKey,
        enclosing: Option<TypeId>,
        decl: TypeDecl,
    ) -> Result<TypeId, ModelError> {
        if self.program.type_by_key.contains_key(&key) {
            return Err(ModelError::DuplicateType(key));
        }
        let id = TypeId(self.program.types.len() as u32);
        self.program.type_by_key.insert(key.clone(), id);
        self.program.types.push(TypeDef {
            id,
            key,
            kind: decl.kind,
            flags: decl.flags,
            assembly,
            base: decl.base,
            enclosing,
            members: Vec::new(),
            nested: Vec::new(),
            annotations: decl.annotations,
        });
        Ok(id)
    }

    /// Add a method, constructor, operator or field.
    pub fn add_member(&mut self, ty: TypeId, decl: MemberDecl) -> Result<MemberId, ModelError> {
        self.insert_member(ty, decl, None, None)
    }

    pub fn add_property(&mut self, ty: TypeId, decl: PropertyDecl) -> Result<PropertyIds, ModelError> {
        let mut property_decl = MemberDecl::new(
            MemberKind::Property,
            SymbolName::named(decl.name.clone()),
            decl.ty.clone(),
        );
        property_decl.flags = decl.flags;
        property_decl.annotations = decl.annotations.clone();
        let property = self.insert_member(ty, property_decl, None, None)?;

        let synthesized = decl.auto.then_some(Synthesized::AutoPropertyAccessor);
        let getter = match &decl.getter {
            Some(accessor) => {
                let mut get = MemberDecl::method(format!("get_{}", decl.name))
                    .returns(decl.ty.as_str())
                    .body(accessor.body);
                get.flags = decl.flags;
                get.annotations = accessor.annotations.clone();
                Some(self.insert_member(ty, get, Some((AccessorKind::Get, property)), synthesized)?)
            }
            None => None,
        };
        let setter = match &decl.setter {
            Some(accessor) => {
                let mut set = MemberDecl::method(format!("set_{}", decl.name))
                    .param("value", decl.ty.as_str())
                    .body(accessor.body);
                set.flags = decl.flags;
                set.annotations = accessor.annotations.clone();
                Some(self.insert_member(ty, set, Some((AccessorKind::Set, property)), synthesized)?)
            }
            None => None,
        };

        let backing_field = if decl.auto {
            let mut field = MemberDecl::field(format!("<{}>k__BackingField", decl.name), decl.ty.as_str());
            field.flags = decl.flags & MemberFlags::STATIC;
            let id = self.insert_member(ty, field, None, None)?;
            self.program.members[id.0 as usize].backing_field_of = Some(property);
            Some(id)
        } else {
            None
        };

        let owner = &mut self.program.members[property.0 as usize];
        owner.accessors.extend(getter);
        owner.accessors.extend(setter);

        Ok(PropertyIds {
            property,
            getter,
            setter,
            backing_field,
        })
    }

    pub fn add_event(&mut self, ty: TypeId, decl: EventDecl) -> Result<EventIds, ModelError> {
        let mut event_decl = MemberDecl::new(
            MemberKind::Event,
            SymbolName::named(decl.name.clone()),
            decl.ty.clone(),
        );
        event_decl.flags = decl.flags;
        event_decl.annotations = decl.annotations.clone();
        let event = self.insert_member(ty, event_decl, None, None)?;

        let synthesized = decl.auto.then_some(Synthesized::AutoEventAccessor);
        let mut accessor_ids = Vec::with_capacity(2);
        for (kind, accessor) in [(AccessorKind::Add, &decl.add), (AccessorKind::Remove, &decl.remove)] {
            let mut method = MemberDecl::method(format!("{}{}", kind.prefix(), decl.name))
                .param("value", decl.ty.as_str())
                .body(accessor.body);
            method.flags = decl.flags;
            method.annotations = accessor.annotations.clone();
            accessor_ids.push(self.insert_member(ty, method, Some((kind, event)), synthesized)?);
        }
        let (add, remove) = (accessor_ids[0], accessor_ids[1]);
        self.program.members[event.0 as usize]
            .accessors
            .extend([add, remove]);

        Ok(EventIds { event, add, remove })
    }

    pub fn annotate_member(&mut self, id: MemberId, annotation: Annotation) {
        self.program.members[id.0 as usize]
            .annotations
            .push(annotation);
    }

    pub fn annotate_type(&mut self, id: TypeId, annotation: Annotation) {
        self.program.types[id.0 as usize].annotations.push(annotation);
    }

    fn insert_member(
        &mut self,
        ty: TypeId,
        decl: MemberDecl,
        accessor_of: Option<(AccessorKind, MemberId)>,
        synthesized: Option<Synthesized>,
    ) -> Result<MemberId, ModelError> {
        let identity = SymbolIdentity::member(
            decl.kind.symbol_kind(),
            self.program.ty(ty).key.clone(),
            decl.name.clone(),
            decl.params.iter().map(|p| p.ty.clone()),
        )
        .returning(&decl.ty);
        if self.program.member_by_identity.contains_key(&identity) {
            return Err(ModelError::DuplicateMember(identity));
        }

        let id = MemberId(self.program.members.len() as u32);
        self.program.member_by_identity.insert(identity, id);
        self.program.members.push(MemberDef {
            id,
            declaring_type: ty,
            kind: decl.kind,
            name: decl.name,
            params: decl.params,
            ty: decl.ty,
            flags: decl.flags,
            body: decl.body,
            synthesized,
            accessor_of,
            accessors: Vec::new(),
            backing_field_of: None,
            annotations: decl.annotations,
        });
        self.program.types[ty.0 as usize].members.push(id);
        Ok(id)
    }

    /// Resolve base types and freeze the program.
    pub fn build(mut self) -> Program {
        let mut unresolved = 0usize;
        for ty in &self.program.types {
            let Some(base) = &ty.base else { continue };
            match self.program.type_by_key.get(base) {
                Some(base_id) => {
                    self.program.base_ids.insert(ty.id, *base_id);
                }
                None => unresolved += 1,
            }
        }
        debug!(
            assemblies = self.program.assemblies.len(),
            types = self.program.types.len(),
            members = self.program.members.len(),
            unresolved_bases = unresolved,
            "program built"
        );
        self.program
    }
}

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod tests;
