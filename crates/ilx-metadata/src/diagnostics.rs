//! Diagnostic Reporter
//!
//! Refusals and unimplemented members are kept as [`ReferenceDiagnostic`]
//! values carrying their structured payload. They become text only through
//! [`ReferenceDiagnostic::render`], which fills the shared message table in
//! `ilx_common::diagnostics`.
//!
//! Three signature renderings are in use:
//!
//! | template       | rendering                                   | example                            |
//! |----------------|---------------------------------------------|------------------------------------|
//! | reference      | `Name(paramNames)`, bare name for fields    | `set_Name(value)`, `.ctor(s)`      |
//! | external       | `returnType Name(ParamTypes)`               | `System.String get_Property()`     |
//! | untranslatable | `ReturnType Declaring::Name(ParamTypes)`    | `System.Void Test::Baz()`          |
//!
//! The external rendering spells `System.Void` as `void`; the untranslatable
//! one keeps the metadata name.

use ilx_common::diagnostics::{
    Diagnostic, diagnostic_codes, format_message, get_message_template, truncate_to_stem,
};
use ilx_model::{MemberId, MemberKind, Program, TypeId, TypeKey};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReferenceDiagnostic {
    /// Reference to an ignored symbol.
    Refused { signature: String },
    /// Invocation of a member with no body and no proxy.
    ExternalMethod { signature: String, type_name: String },
    /// Use of an external type nothing implements.
    ExternalType { type_name: String },
    /// Invocation of a member whose body could not be lowered.
    Untranslatable { signature: String },
}

impl ReferenceDiagnostic {
    pub const fn code(&self) -> u32 {
        match self {
            Self::Refused { .. } => diagnostic_codes::MEMBER_REFERENCE_REFUSED,
            Self::ExternalMethod { .. } => diagnostic_codes::EXTERNAL_METHOD_NOT_IMPLEMENTED,
            Self::ExternalType { .. } => diagnostic_codes::EXTERNAL_TYPE_NOT_IMPLEMENTED,
            Self::Untranslatable { .. } => diagnostic_codes::FUNCTION_NOT_TRANSLATABLE,
        }
    }

    /// The rendered signature or type name this diagnostic is about.
    pub fn subject(&self) -> &str {
        match self {
            Self::Refused { signature }
            | Self::ExternalMethod { signature, .. }
            | Self::Untranslatable { signature } => signature,
            Self::ExternalType { type_name } => type_name,
        }
    }

    /// Render the message text. With `complete == false` the "not
    /// implemented" messages stop right after "has not".
    pub fn render(&self, complete: bool) -> String {
        let template = get_message_template(self.code()).unwrap_or("{0}");
        let message = match self {
            Self::Refused { signature } | Self::Untranslatable { signature } => {
                format_message(template, &[signature.as_str()])
            }
            Self::ExternalMethod {
                signature,
                type_name,
            } => format_message(template, &[signature.as_str(), type_name.as_str()]),
            Self::ExternalType { type_name } => format_message(template, &[type_name.as_str()]),
        };
        match self {
            Self::ExternalMethod { .. } | Self::ExternalType { .. } if !complete => {
                truncate_to_stem(&message).to_string()
            }
            _ => message,
        }
    }

    pub fn to_diagnostic(&self, complete: bool) -> Diagnostic {
        Diagnostic::error(self.code(), self.render(complete)).with_symbol(self.subject())
    }
}

/// Renders member signatures and builds diagnostics for them.
pub struct Signatures<'a> {
    program: &'a Program,
}

impl<'a> Signatures<'a> {
    pub const fn new(program: &'a Program) -> Self {
        Self { program }
    }

    /// `Name(paramNames)`; fields, properties and events render bare.
    pub fn reference(&self, id: MemberId) -> String {
        let member = self.program.member(id);
        match member.kind {
            MemberKind::Field | MemberKind::Property | MemberKind::Event => {
                member.name.as_str().to_string()
            }
            MemberKind::Method | MemberKind::Constructor | MemberKind::Operator => {
                let names: Vec<&str> = member.params.iter().map(|p| p.name.as_str()).collect();
                format!("{}({})", member.name, names.join(", "))
            }
        }
    }

    /// `returnType Name(ParamTypes)`, with `System.Void` spelled `void`.
    pub fn external(&self, id: MemberId) -> String {
        let member = self.program.member(id);
        let returns = if member.ty.is_void() {
            "void"
        } else {
            member.ty.as_str()
        };
        format!("{returns} {}({})", member.name, self.param_types(id))
    }

    /// `ReturnType Declaring::Name(ParamTypes)`.
    pub fn untranslatable(&self, id: MemberId) -> String {
        let member = self.program.member(id);
        format!(
            "{} {}::{}({})",
            member.ty,
            self.program.ty(member.declaring_type).key,
            member.name,
            self.param_types(id)
        )
    }

    fn param_types(&self, id: MemberId) -> String {
        let types: Vec<&str> = self
            .program
            .member(id)
            .params
            .iter()
            .map(|p| p.ty.as_str())
            .collect();
        types.join(", ")
    }

    pub fn refused(&self, id: MemberId) -> ReferenceDiagnostic {
        ReferenceDiagnostic::Refused {
            signature: self.reference(id),
        }
    }

    pub fn refused_type(&self, ty: TypeId) -> ReferenceDiagnostic {
        ReferenceDiagnostic::Refused {
            signature: self.type_name(ty).to_string(),
        }
    }

    pub fn external_method(&self, id: MemberId) -> ReferenceDiagnostic {
        let member = self.program.member(id);
        ReferenceDiagnostic::ExternalMethod {
            signature: self.external(id),
            type_name: self.type_name(member.declaring_type).to_string(),
        }
    }

    pub fn external_type(&self, ty: TypeId) -> ReferenceDiagnostic {
        ReferenceDiagnostic::ExternalType {
            type_name: self.type_name(ty).to_string(),
        }
    }

    pub fn untranslatable_member(&self, id: MemberId) -> ReferenceDiagnostic {
        ReferenceDiagnostic::Untranslatable {
            signature: self.untranslatable(id),
        }
    }

    fn type_name(&self, ty: TypeId) -> &TypeKey {
        &self.program.ty(ty).key
    }
}

#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod tests;
