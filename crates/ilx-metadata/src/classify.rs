//! Translatability Classifier
//!
//! Decides, per member, what (if anything) is emitted as its implementation.
//! Rules are evaluated in order and the first match wins:
//!
//! 1. The member, its owning property/event, its declaring type or any
//!    enclosing type is ignored: [`Outcome::Refused`].
//! 2. The member carries a `Replacement`: [`Outcome::Replaced`].
//! 3. A proxy supplies a body (see [`crate::proxy`]): [`Outcome::Proxy`].
//! 4. The member's own body is usable: [`Outcome::Own`]. Inside a stub
//!    assembly only synthesized accessors and constructors qualify; abstract
//!    members always do.
//! 5. Otherwise: [`Outcome::Unimplemented`]. The member is still declared
//!    but invoking it raises the attached diagnostic.
//!
//! Proxies are consulted before the own body so that a proxy can replace a
//! member that has one.

use crate::ancestry::AncestorChains;
use crate::diagnostics::{ReferenceDiagnostic, Signatures};
use crate::directive::{Directive, DirectivesExt};
use crate::errors::ConfigurationError;
use crate::proxy::{ProxyBody, ProxyResolver};
use crate::store::MetadataStore;
use ilx_model::{BodyState, MemberId, MemberKind, Program, SymbolIdentity, TypeId};
use serde::Serialize;
use tracing::trace;

/// Resolution outcome of a member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Own,
    Proxy(ProxyBody),
    Replaced(String),
    Unimplemented(ReferenceDiagnostic),
    Refused(ReferenceDiagnostic),
}

/// Where an emitted member's implementation comes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum BodySource {
    Own,
    Proxy(ProxyBody),
    Replacement(String),
    None,
}

impl Outcome {
    pub fn body_source(&self) -> BodySource {
        match self {
            Self::Own => BodySource::Own,
            Self::Proxy(body) => BodySource::Proxy(*body),
            Self::Replaced(expression) => BodySource::Replacement(expression.clone()),
            Self::Unimplemented(_) | Self::Refused(_) => BodySource::None,
        }
    }

    pub const fn is_translatable(&self) -> bool {
        matches!(self, Self::Own | Self::Proxy(_) | Self::Replaced(_))
    }

    pub const fn diagnostic(&self) -> Option<&ReferenceDiagnostic> {
        match self {
            Self::Unimplemented(diag) | Self::Refused(diag) => Some(diag),
            Self::Own | Self::Proxy(_) | Self::Replaced(_) => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Own => "own",
            Self::Proxy(_) => "proxy",
            Self::Replaced(_) => "replaced",
            Self::Unimplemented(_) => "unimplemented",
            Self::Refused(_) => "refused",
        }
    }
}

/// Resolution outcome of a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeOutcome {
    Own,
    /// Declared as an external shell; its members are external.
    External,
    /// Every reference uses this expression.
    Replaced(String),
    Refused(ReferenceDiagnostic),
}

impl TypeOutcome {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Own => "own",
            Self::External => "external",
            Self::Replaced(_) => "replaced",
            Self::Refused(_) => "refused",
        }
    }
}

/// The classifier's per-member result, together with the identifier the
/// member is emitted under.
///
/// `translatable()` is false exactly when `body_source()` is
/// [`BodySource::None`]; both derive from the single `outcome`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedMember {
    pub member: MemberId,
    pub identity: SymbolIdentity,
    pub identifier: String,
    pub outcome: Outcome,
}

impl ResolvedMember {
    pub fn body_source(&self) -> BodySource {
        self.outcome.body_source()
    }

    pub const fn translatable(&self) -> bool {
        self.outcome.is_translatable()
    }

    pub const fn diagnostic(&self) -> Option<&ReferenceDiagnostic> {
        self.outcome.diagnostic()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedType {
    pub ty: TypeId,
    pub identifier: String,
    pub qualified_name: String,
    /// What references to the type emit: the replacement expression if any,
    /// otherwise the qualified name.
    pub reference: String,
    pub outcome: TypeOutcome,
}

pub struct Classifier<'a> {
    program: &'a Program,
    store: &'a MetadataStore,
    proxies: ProxyResolver<'a>,
    signatures: Signatures<'a>,
}

impl<'a> Classifier<'a> {
    pub const fn new(
        program: &'a Program,
        store: &'a MetadataStore,
        chains: &'a AncestorChains,
    ) -> Self {
        Self {
            program,
            store,
            proxies: ProxyResolver::new(program, store, chains),
            signatures: Signatures::new(program),
        }
    }

    /// Ignored directly or through an enclosing type.
    pub fn is_type_ignored(&self, ty: TypeId) -> bool {
        self.program
            .enclosing_chain(ty)
            .any(|t| self.store.type_directives(self.program, t).is_ignored())
    }

    pub fn is_type_external(&self, ty: TypeId) -> bool {
        self.store.type_directives(self.program, ty).is_external()
    }

    fn in_stub_assembly(&self, ty: TypeId) -> bool {
        self.store
            .type_directives(self.program, ty)
            .iter()
            .any(|d| matches!(d, Directive::StubAssembly))
    }

    /// Ignored directly, through its property/event, or through its type.
    pub fn is_member_ignored(&self, id: MemberId) -> bool {
        let member = self.program.member(id);
        self.store.member_directives(self.program, id).is_ignored()
            || member.accessor_of.is_some_and(|(_, owner)| {
                self.store
                    .member_directives(self.program, owner)
                    .is_ignored()
            })
            || self.is_type_ignored(member.declaring_type)
    }

    /// External directly, through its property/event, or through its type.
    pub fn is_member_external(&self, id: MemberId) -> bool {
        let member = self.program.member(id);
        self.store.member_directives(self.program, id).is_external()
            || member.accessor_of.is_some_and(|(_, owner)| {
                self.store
                    .member_directives(self.program, owner)
                    .is_external()
            })
            || self.is_type_external(member.declaring_type)
    }

    pub fn classify_member(&self, id: MemberId) -> Result<Outcome, ConfigurationError> {
        let member = self.program.member(id);

        if self.is_member_ignored(id) {
            trace!(member = %member.name, "ignored");
            return Ok(Outcome::Refused(self.signatures.refused(id)));
        }
        if let Some(expression) = self.store.member_directives(self.program, id).replacement() {
            return Ok(Outcome::Replaced(expression.to_string()));
        }

        match member.kind {
            MemberKind::Field => return Ok(Outcome::Own),
            MemberKind::Property | MemberKind::Event => return self.classify_accessor_owner(id),
            MemberKind::Method | MemberKind::Constructor | MemberKind::Operator => {}
        }

        let identity = self.program.identity_of_member(id);
        if let Some(body) = self.proxies.find(member.declaring_type, &identity)? {
            return Ok(Outcome::Proxy(body));
        }

        let external = self.is_member_external(id);
        let stub = self.in_stub_assembly(member.declaring_type);
        if !external {
            let own = match member.body {
                BodyState::Abstract => true,
                _ if stub => {
                    member.synthesized.is_some() || member.kind == MemberKind::Constructor
                }
                BodyState::Present => true,
                BodyState::Absent | BodyState::Untranslatable => false,
            };
            if own {
                return Ok(Outcome::Own);
            }
        }

        Ok(Outcome::Unimplemented(
            self.unimplemented(id, external || stub),
        ))
    }

    /// Properties and events are declared by their own declaration; an
    /// external one is unimplemented when one of its accessors is.
    fn classify_accessor_owner(&self, id: MemberId) -> Result<Outcome, ConfigurationError> {
        if !self.is_member_external(id) {
            return Ok(Outcome::Own);
        }
        for &accessor in &self.program.member(id).accessors {
            if let Outcome::Unimplemented(diag) = self.classify_member(accessor)? {
                return Ok(Outcome::Unimplemented(diag));
            }
        }
        Ok(Outcome::Own)
    }

    fn unimplemented(&self, id: MemberId, unavailable: bool) -> ReferenceDiagnostic {
        let member = self.program.member(id);
        let ty = member.declaring_type;
        let type_directives = self.store.type_directives(self.program, ty);
        if type_directives.is_external()
            && type_directives.replacement().is_none()
            && self.store.proxies_of(ty).is_empty()
        {
            return self.signatures.external_type(ty);
        }
        if !unavailable && member.body == BodyState::Untranslatable {
            return self.signatures.untranslatable_member(id);
        }
        self.signatures.external_method(id)
    }

    pub fn classify_type(&self, ty: TypeId) -> TypeOutcome {
        if self.is_type_ignored(ty) {
            return TypeOutcome::Refused(self.signatures.refused_type(ty));
        }
        let directives = self.store.type_directives(self.program, ty);
        if let Some(expression) = directives.replacement() {
            TypeOutcome::Replaced(expression.to_string())
        } else if directives.is_external() {
            TypeOutcome::External
        } else {
            TypeOutcome::Own
        }
    }
}

#[cfg(test)]
#[path = "tests/classify_tests.rs"]
mod tests;
