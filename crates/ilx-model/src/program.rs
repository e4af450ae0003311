//! Loaded program model.
//!
//! A [`Program`] is an immutable snapshot of everything the front-end loaded:
//! assemblies, the types they declare and the members of those types. IDs
//! are indices into the arena vectors and are only meaningful for the program
//! that issued them.

use crate::annotation::{Annotation, AnnotationsExt};
use crate::identity::{SymbolIdentity, SymbolKind, SymbolName, TypeKey};
use bitflags::bitflags;
use ilx_common::limits::MAX_NESTING_DEPTH;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AssemblyId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MemberId(pub u32);

/// Either side of the symbol space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolRef {
    Type(TypeId),
    Member(MemberId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberKind {
    Method,
    Field,
    Property,
    Event,
    Constructor,
    Operator,
}

impl MemberKind {
    pub const fn symbol_kind(self) -> SymbolKind {
        match self {
            Self::Method => SymbolKind::Method,
            Self::Field => SymbolKind::Field,
            Self::Property => SymbolKind::Property,
            Self::Event => SymbolKind::Event,
            Self::Constructor => SymbolKind::Constructor,
            Self::Operator => SymbolKind::Operator,
        }
    }

    /// Kinds that carry a body of their own.
    pub const fn has_body(self) -> bool {
        matches!(self, Self::Method | Self::Constructor | Self::Operator)
    }
}

/// Availability of a member's own body IR.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyState {
    #[default]
    Present,
    /// No body in this declaration (extern, native, or not loaded).
    Absent,
    /// Abstract or interface member: no body by nature.
    Abstract,
    /// A body exists but cannot be lowered (e.g. it contains unsafe code).
    Untranslatable,
}

/// Compiler-synthesized members that can be rebuilt without their body IR.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Synthesized {
    AutoPropertyAccessor,
    AutoEventAccessor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessorKind {
    Get,
    Set,
    Add,
    Remove,
}

impl AccessorKind {
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Get => "get_",
            Self::Set => "set_",
            Self::Add => "add_",
            Self::Remove => "remove_",
        }
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u8 {
        const STATIC = 1 << 0;
        const ABSTRACT = 1 << 1;
        const SEALED = 1 << 2;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MemberFlags: u8 {
        const STATIC = 1 << 0;
        const VIRTUAL = 1 << 1;
        const ABSTRACT = 1 << 2;
        const OVERRIDE = 1 << 3;
    }
}

#[derive(Clone, Debug)]
pub struct AssemblyDef {
    pub id: AssemblyId,
    pub name: String,
    pub annotations: Vec<Annotation>,
    pub types: Vec<TypeId>,
}

#[derive(Clone, Debug)]
pub struct TypeDef {
    pub id: TypeId,
    pub key: TypeKey,
    pub kind: TypeKind,
    pub flags: TypeFlags,
    pub assembly: AssemblyId,
    /// Base type as written; may name a type that was not loaded.
    pub base: Option<TypeKey>,
    /// Enclosing type for nested types.
    pub enclosing: Option<TypeId>,
    pub members: Vec<MemberId>,
    pub nested: Vec<TypeId>,
    pub annotations: Vec<Annotation>,
}

impl TypeDef {
    pub fn short_name(&self) -> &str {
        self.key.short_name()
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(TypeFlags::STATIC)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDef {
    pub name: String,
    pub ty: TypeKey,
}

impl ParamDef {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeKey::new(ty),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MemberDef {
    pub id: MemberId,
    pub declaring_type: TypeId,
    pub kind: MemberKind,
    pub name: SymbolName,
    pub params: Vec<ParamDef>,
    /// Return type for callables, value type for fields/properties/events.
    pub ty: TypeKey,
    pub flags: MemberFlags,
    pub body: BodyState,
    pub synthesized: Option<Synthesized>,
    /// For accessor methods: which accessor and its owning property/event.
    pub accessor_of: Option<(AccessorKind, MemberId)>,
    /// For properties/events: their accessor methods.
    pub accessors: Vec<MemberId>,
    /// For compiler-generated backing fields: the owning property.
    pub backing_field_of: Option<MemberId>,
    pub annotations: Vec<Annotation>,
}

impl MemberDef {
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }

    pub fn param_types(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.params.iter().map(|p| p.ty.clone())
    }
}

/// Immutable loaded-IR snapshot.
#[derive(Clone, Debug, Default)]
pub struct Program {
    pub(crate) assemblies: Vec<AssemblyDef>,
    pub(crate) types: Vec<TypeDef>,
    pub(crate) members: Vec<MemberDef>,
    pub(crate) type_by_key: FxHashMap<TypeKey, TypeId>,
    pub(crate) member_by_identity: FxHashMap<SymbolIdentity, MemberId>,
    /// Resolved base type per type, for bases that were loaded.
    pub(crate) base_ids: FxHashMap<TypeId, TypeId>,
}

impl Program {
    pub fn assembly(&self, id: AssemblyId) -> &AssemblyDef {
        &self.assemblies[id.0 as usize]
    }

    pub fn ty(&self, id: TypeId) -> &TypeDef {
        &self.types[id.0 as usize]
    }

    pub fn member(&self, id: MemberId) -> &MemberDef {
        &self.members[id.0 as usize]
    }

    pub fn assemblies(&self) -> &[AssemblyDef] {
        &self.assemblies
    }

    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }

    pub fn members(&self) -> &[MemberDef] {
        &self.members
    }

    pub fn lookup_type(&self, key: &TypeKey) -> Option<TypeId> {
        self.type_by_key.get(key).copied()
    }

    pub fn lookup_member(&self, identity: &SymbolIdentity) -> Option<MemberId> {
        self.member_by_identity.get(identity).copied()
    }

    pub fn lookup(&self, identity: &SymbolIdentity) -> Option<SymbolRef> {
        if identity.is_type() {
            self.lookup_type(&TypeKey::new(identity.name.as_str()))
                .map(SymbolRef::Type)
        } else {
            self.lookup_member(identity).map(SymbolRef::Member)
        }
    }

    /// Loaded base type of `id`, if any.
    pub fn base_of(&self, id: TypeId) -> Option<TypeId> {
        self.base_ids.get(&id).copied()
    }

    pub fn identity_of_type(&self, id: TypeId) -> SymbolIdentity {
        SymbolIdentity::of_type(&self.ty(id).key)
    }

    pub fn identity_of_member(&self, id: MemberId) -> SymbolIdentity {
        let member = self.member(id);
        SymbolIdentity::member(
            member.kind.symbol_kind(),
            self.ty(member.declaring_type).key.clone(),
            member.name.clone(),
            member.param_types(),
        )
        .returning(&member.ty)
    }

    pub fn identity_of(&self, symbol: SymbolRef) -> SymbolIdentity {
        match symbol {
            SymbolRef::Type(id) => self.identity_of_type(id),
            SymbolRef::Member(id) => self.identity_of_member(id),
        }
    }

    /// Members declared directly on `ty`.
    pub fn declared_members(&self, ty: TypeId) -> impl Iterator<Item = &MemberDef> + '_ {
        self.ty(ty).members.iter().map(|id| self.member(*id))
    }

    /// Members declared on `ty` whose declared name is `name`.
    pub fn members_named<'a>(
        &'a self,
        ty: TypeId,
        name: &'a str,
    ) -> impl Iterator<Item = &'a MemberDef> + 'a {
        self.declared_members(ty)
            .filter(move |m| m.name.as_str() == name)
    }

    /// `ty` followed by its enclosing types, innermost first, bounded by
    /// [`MAX_NESTING_DEPTH`].
    pub fn enclosing_chain(&self, ty: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        std::iter::successors(Some(ty), |id| self.ty(*id).enclosing)
            .take(MAX_NESTING_DEPTH as usize)
    }

    pub fn assembly_annotations(&self, ty: TypeId) -> &[Annotation] {
        &self.assembly(self.ty(ty).assembly).annotations
    }

    /// Whether the assembly declaring `ty` is a stub assembly.
    pub fn in_stub_assembly(&self, ty: TypeId) -> bool {
        self.assembly_annotations(ty)
            .has(|a| matches!(a, Annotation::StubAssembly))
    }

    /// Types that are proxy declarations.
    pub fn proxy_types(&self) -> impl Iterator<Item = &TypeDef> + '_ {
        self.types
            .iter()
            .filter(|t| t.annotations.proxy_of().is_some())
    }
}
