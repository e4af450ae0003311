//! JSON program manifests.
//!
//! A manifest is a serialised description of a loaded program, used by the
//! CLI and by fixtures. It is lowered through [`ProgramBuilder`], so a
//! manifest and the equivalent builder calls produce the same [`Program`].
//!
//! ```json
//! {
//!   "assemblies": [{
//!     "name": "Test",
//!     "annotations": [{ "kind": "stubAssembly" }],
//!     "types": [{
//!       "name": "Program",
//!       "members": [
//!         { "member": "method", "name": "Main", "params": [{ "name": "args", "ty": "System.String[]" }] },
//!         { "member": "property", "name": "A", "ty": "System.Int32", "auto": true }
//!       ]
//!     }]
//!   }]
//! }
//! ```

use crate::annotation::Annotation;
use crate::builder::{AccessorDecl, EventDecl, MemberDecl, ProgramBuilder, PropertyDecl, TypeDecl};
use crate::errors::ModelError;
use crate::identity::{OperatorKind, TypeKey};
use crate::program::{AssemblyId, BodyState, MemberFlags, Program, TypeFlags, TypeId, TypeKind};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramManifest {
    pub assemblies: Vec<AssemblyManifest>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyManifest {
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub types: Vec<TypeManifest>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeManifest {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub members: Vec<MemberManifest>,
    #[serde(default)]
    pub nested: Vec<TypeManifest>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamManifest {
    pub name: String,
    pub ty: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessorManifest {
    #[serde(default)]
    pub body: BodyState,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "camelCase")]
pub enum MemberManifest {
    #[serde(rename_all = "camelCase")]
    Method {
        name: String,
        #[serde(default)]
        params: Vec<ParamManifest>,
        #[serde(default)]
        returns: Option<String>,
        #[serde(default)]
        body: BodyState,
        #[serde(default)]
        is_static: bool,
        #[serde(default)]
        is_virtual: bool,
        #[serde(default)]
        annotations: Vec<Annotation>,
    },
    #[serde(rename_all = "camelCase")]
    Constructor {
        #[serde(default)]
        params: Vec<ParamManifest>,
        #[serde(default)]
        body: BodyState,
        #[serde(default)]
        is_static: bool,
        #[serde(default)]
        annotations: Vec<Annotation>,
    },
    #[serde(rename_all = "camelCase")]
    Operator {
        operator: OperatorKind,
        params: Vec<ParamManifest>,
        returns: String,
        #[serde(default)]
        body: BodyState,
        #[serde(default)]
        annotations: Vec<Annotation>,
    },
    #[serde(rename_all = "camelCase")]
    Field {
        name: String,
        ty: String,
        #[serde(default)]
        is_static: bool,
        #[serde(default)]
        annotations: Vec<Annotation>,
    },
    #[serde(rename_all = "camelCase")]
    Property {
        name: String,
        ty: String,
        #[serde(default)]
        getter: Option<AccessorManifest>,
        #[serde(default)]
        setter: Option<AccessorManifest>,
        #[serde(default)]
        auto: bool,
        #[serde(default)]
        is_static: bool,
        #[serde(default)]
        annotations: Vec<Annotation>,
    },
    #[serde(rename_all = "camelCase")]
    Event {
        name: String,
        ty: String,
        #[serde(default)]
        add: AccessorManifest,
        #[serde(default)]
        remove: AccessorManifest,
        #[serde(default)]
        auto: bool,
        #[serde(default)]
        is_static: bool,
        #[serde(default)]
        annotations: Vec<Annotation>,
    },
}

impl ProgramManifest {
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl Program {
    /// Lower a manifest into a program.
    pub fn from_manifest(manifest: &ProgramManifest) -> Result<Program, ModelError> {
        let mut builder = ProgramBuilder::new();
        for assembly in &manifest.assemblies {
            let id = builder.add_assembly(assembly.name.clone());
            for annotation in &assembly.annotations {
                builder.annotate_assembly(id, annotation.clone());
            }
            for ty in &assembly.types {
                lower_type(&mut builder, TypeParent::Assembly(id), ty)?;
            }
        }
        Ok(builder.build())
    }

    /// Parse and lower a JSON manifest.
    pub fn from_json(text: &str) -> Result<Program, ModelError> {
        Self::from_manifest(&ProgramManifest::from_json(text)?)
    }
}

enum TypeParent {
    Assembly(AssemblyId),
    Type(TypeId),
}

fn lower_type(
    builder: &mut ProgramBuilder,
    parent: TypeParent,
    manifest: &TypeManifest,
) -> Result<TypeId, ModelError> {
    let mut decl = TypeDecl::new(manifest.kind, manifest.name.clone());
    decl.base = manifest.base.as_deref().map(TypeKey::from);
    if manifest.is_static {
        decl.flags |= TypeFlags::STATIC;
    }
    decl.annotations = manifest.annotations.clone();

    let id = match parent {
        TypeParent::Assembly(assembly) => builder.add_type(assembly, decl)?,
        TypeParent::Type(enclosing) => builder.add_nested_type(enclosing, decl)?,
    };

    for member in &manifest.members {
        lower_member(builder, id, member)?;
    }
    for nested in &manifest.nested {
        lower_type(builder, TypeParent::Type(id), nested)?;
    }
    Ok(id)
}

fn with_params(mut decl: MemberDecl, params: &[ParamManifest]) -> MemberDecl {
    for param in params {
        decl = decl.param(param.name.clone(), param.ty.clone());
    }
    decl
}

fn accessor(manifest: &AccessorManifest) -> AccessorDecl {
    AccessorDecl {
        body: manifest.body,
        annotations: manifest.annotations.clone(),
    }
}

fn static_flag(is_static: bool) -> MemberFlags {
    if is_static {
        MemberFlags::STATIC
    } else {
        MemberFlags::empty()
    }
}

fn lower_member(
    builder: &mut ProgramBuilder,
    ty: TypeId,
    manifest: &MemberManifest,
) -> Result<(), ModelError> {
    match manifest {
        MemberManifest::Method {
            name,
            params,
            returns,
            body,
            is_static,
            is_virtual,
            annotations,
        } => {
            let mut decl = with_params(MemberDecl::method(name.clone()), params)
                .body(*body)
                .flags(static_flag(*is_static));
            if *is_virtual {
                decl = decl.flags(MemberFlags::VIRTUAL);
            }
            if let Some(returns) = returns {
                decl = decl.returns(returns.clone());
            }
            decl.annotations = annotations.clone();
            builder.add_member(ty, decl)?;
        }
        MemberManifest::Constructor {
            params,
            body,
            is_static,
            annotations,
        } => {
            let base = if *is_static {
                MemberDecl::static_constructor()
            } else {
                MemberDecl::constructor()
            };
            let mut decl = with_params(base, params).body(*body);
            decl.annotations = annotations.clone();
            builder.add_member(ty, decl)?;
        }
        MemberManifest::Operator {
            operator,
            params,
            returns,
            body,
            annotations,
        } => {
            let mut decl =
                with_params(MemberDecl::operator(*operator, returns.clone()), params).body(*body);
            decl.annotations = annotations.clone();
            builder.add_member(ty, decl)?;
        }
        MemberManifest::Field {
            name,
            ty: field_ty,
            is_static,
            annotations,
        } => {
            let mut decl = MemberDecl::field(name.clone(), field_ty.clone()).flags(static_flag(*is_static));
            decl.annotations = annotations.clone();
            builder.add_member(ty, decl)?;
        }
        MemberManifest::Property {
            name,
            ty: property_ty,
            getter,
            setter,
            auto,
            is_static,
            annotations,
        } => {
            let mut decl = PropertyDecl::new(name.clone(), property_ty.clone());
            decl.getter = getter.as_ref().map(accessor);
            decl.setter = setter.as_ref().map(accessor);
            if *auto {
                decl = decl.auto();
            }
            decl.flags = static_flag(*is_static);
            decl.annotations = annotations.clone();
            builder.add_property(ty, decl)?;
        }
        MemberManifest::Event {
            name,
            ty: event_ty,
            add,
            remove,
            auto,
            is_static,
            annotations,
        } => {
            let mut decl = EventDecl::new(name.clone(), event_ty.clone())
                .adder(accessor(add))
                .remover(accessor(remove));
            decl.auto = *auto;
            decl.flags = static_flag(*is_static);
            decl.annotations = annotations.clone();
            builder.add_event(ty, decl)?;
        }
    }
    Ok(())
}
