//! Symbol identities and the loaded program model.
//!
//! - [`identity`]: canonical, signature-based keys for types and members
//! - [`annotation`]: raw annotation tokens recognised on loaded symbols
//! - [`program`]: the immutable loaded-IR snapshot (`Program`)
//! - [`builder`]: programmatic construction (`ProgramBuilder`)
//! - [`manifest`]: JSON manifests lowered through the builder

pub mod annotation;
pub mod builder;
pub mod errors;
pub mod identity;
pub mod manifest;
pub mod program;

pub use annotation::{Annotation, AnnotationsExt};
pub use builder::{
    AccessorDecl, EventDecl, EventIds, MemberDecl, ProgramBuilder, PropertyDecl, PropertyIds,
    TypeDecl,
};
pub use errors::ModelError;
pub use identity::{OperatorKind, ParamTypes, SymbolIdentity, SymbolKind, SymbolName, TypeKey};
pub use manifest::ProgramManifest;
pub use program::{
    AccessorKind, AssemblyDef, AssemblyId, BodyState, MemberDef, MemberFlags, MemberId,
    MemberKind, ParamDef, Program, SymbolRef, Synthesized, TypeDef, TypeFlags, TypeId, TypeKind,
};
