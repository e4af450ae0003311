//! Per-run resolution facade.
//!
//! A [`ResolutionSession`] owns the directive store, the ancestor chains and
//! the cache for one compilation run over an immutable [`Program`]. The
//! emitter asks it for identifiers and outcomes, and for the diagnostic to
//! embed wherever translated code touches a refused or unimplemented member.
//!
//! For parallel emission, [`ResolutionSession::freeze`] resolves everything
//! up front and hands back a read-only [`ResolutionTable`].

use crate::ancestry::AncestorChains;
use crate::cache::{CacheStats, ResolutionCache};
use crate::classify::{Classifier, Outcome, ResolvedMember, ResolvedType, TypeOutcome};
use crate::diagnostics::ReferenceDiagnostic;
use crate::errors::ConfigurationError;
use crate::rename::IdentifierRewriter;
use crate::store::MetadataStore;
use ilx_common::{Diagnostic, ResolverOptions};
use ilx_model::{MemberId, Program, SymbolIdentity, TypeId, TypeKey, TypeKind};
use rustc_hash::FxHashMap;
use tracing::{Level, debug, span, trace, warn};

/// Whether translated code may use a member at a given site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberAccess {
    Allowed { identifier: String },
    /// The site must raise this diagnostic instead.
    Rejected(Diagnostic),
}

impl MemberAccess {
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Verdict for a runtime type test (`x is T`, `x as T`) against a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeCheck {
    /// Test against this reference expression.
    Evaluate { reference: String },
    /// An ignored interface: no emitted type implements it, so the test is
    /// constant false.
    AlwaysFalse,
    /// Any other ignored type; the site must raise this diagnostic instead.
    Rejected(Diagnostic),
}

/// How a field declaration is emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldEmission {
    /// Declared and default-initialised.
    Initialize,
    /// Declared only; an external source supplies the value.
    DeclareOnly,
    /// Not emitted at all.
    Omit,
}

pub struct ResolutionSession<'p> {
    program: &'p Program,
    options: ResolverOptions,
    store: MetadataStore,
    chains: AncestorChains,
    cache: ResolutionCache,
}

impl<'p> ResolutionSession<'p> {
    pub fn new(program: &'p Program, options: ResolverOptions) -> Self {
        let store = MetadataStore::build(program);
        let chains = AncestorChains::build(program, options.max_inheritance_depth);
        let cache = ResolutionCache::new(options.caching_enabled());
        Self {
            program,
            options,
            store,
            chains,
            cache,
        }
    }

    pub const fn program(&self) -> &'p Program {
        self.program
    }

    pub const fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub const fn store(&self) -> &MetadataStore {
        &self.store
    }

    pub const fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    fn classifier(&self) -> Classifier<'_> {
        Classifier::new(self.program, &self.store, &self.chains)
    }

    fn rewriter(&self) -> IdentifierRewriter<'_> {
        IdentifierRewriter::new(self.program, &self.store)
    }

    fn render(&self, diag: &ReferenceDiagnostic) -> Diagnostic {
        diag.to_diagnostic(self.options.complete_unimplemented_messages)
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    pub fn emitted_name(&self, identity: &SymbolIdentity) -> String {
        self.rewriter().emitted_name(identity)
    }

    pub fn member_name(&self, member: MemberId) -> String {
        self.rewriter().member_name(member)
    }

    pub fn type_name(&self, ty: TypeId) -> String {
        self.rewriter().type_name(ty)
    }

    pub fn qualified_name(&self, ty: TypeId) -> String {
        self.rewriter().qualified_name(ty)
    }

    pub fn type_reference(&self, ty: TypeId) -> String {
        self.rewriter().type_reference(ty)
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    pub fn resolve_member(&mut self, member: MemberId) -> Result<ResolvedMember, ConfigurationError> {
        let identity = self.program.identity_of_member(member);
        let _span = span!(Level::DEBUG, "resolve_member", member = %identity).entered();

        if let Some(hit) = self.cache.member(&identity) {
            trace!("cache hit");
            return Ok(hit);
        }

        let outcome = self.classifier().classify_member(member)?;
        debug!(outcome = outcome.label(), "classified");
        let resolved = ResolvedMember {
            member,
            identity: identity.clone(),
            identifier: self.member_name(member),
            outcome,
        };
        self.cache.insert_member(identity, resolved.clone());
        Ok(resolved)
    }

    /// Resolve a member by identity; `None` when nothing declares it.
    pub fn resolve_identity(
        &mut self,
        identity: &SymbolIdentity,
    ) -> Result<Option<ResolvedMember>, ConfigurationError> {
        match self.program.lookup_member(identity) {
            Some(member) => self.resolve_member(member).map(Some),
            None => Ok(None),
        }
    }

    pub fn resolve_type(&mut self, ty: TypeId) -> ResolvedType {
        let identity = self.program.identity_of_type(ty);
        if let Some(hit) = self.cache.ty(&identity) {
            return hit;
        }
        let resolved = ResolvedType {
            ty,
            identifier: self.type_name(ty),
            qualified_name: self.qualified_name(ty),
            reference: self.type_reference(ty),
            outcome: self.classifier().classify_type(ty),
        };
        debug!(ty = %identity, outcome = resolved.outcome.label(), "type classified");
        self.cache.insert_type(identity, resolved.clone());
        resolved
    }

    /// Resolve a call of `signature` through an instance of `receiver`.
    ///
    /// Proxy configuration is checked from the receiver upward; the call then
    /// binds to the most-derived declaration of the signature. `None` when no
    /// type in the chain declares it.
    pub fn resolve_dispatch(
        &mut self,
        receiver: TypeId,
        signature: &SymbolIdentity,
    ) -> Result<Option<ResolvedMember>, ConfigurationError> {
        let target = match self.cache.dispatch(receiver, signature) {
            Some(target) => target,
            None => {
                let target = self.most_derived_declaration(receiver, signature)?;
                self.cache
                    .insert_dispatch(receiver, signature.clone(), target);
                target
            }
        };
        match target {
            Some(member) => self.resolve_member(member).map(Some),
            None => Ok(None),
        }
    }

    fn most_derived_declaration(
        &self,
        receiver: TypeId,
        signature: &SymbolIdentity,
    ) -> Result<Option<MemberId>, ConfigurationError> {
        for &ancestor in self.chains.chain(receiver)? {
            if let Some(err) = self
                .store
                .configuration_error(ancestor, signature.name.as_str())
            {
                return Err(err.clone());
            }
            let declared = signature.with_declaring_type(self.program.ty(ancestor).key.clone());
            if let Some(member) = self.program.lookup_member(&declared) {
                trace!(receiver = %self.program.ty(receiver).key, declared = %declared, "dispatch bound");
                return Ok(Some(member));
            }
        }
        Ok(None)
    }

    // =========================================================================
    // Emission queries
    // =========================================================================

    /// A site that names `member` without invoking it (field access, member
    /// qualifier, delegate creation).
    pub fn check_reference(&mut self, member: MemberId) -> Result<MemberAccess, ConfigurationError> {
        let resolved = self.resolve_member(member)?;
        Ok(match &resolved.outcome {
            Outcome::Refused(diag)
            | Outcome::Unimplemented(diag @ ReferenceDiagnostic::ExternalType { .. }) => {
                MemberAccess::Rejected(self.render(diag))
            }
            _ => MemberAccess::Allowed {
                identifier: resolved.identifier,
            },
        })
    }

    /// A site that invokes `member`.
    pub fn check_invocation(&mut self, member: MemberId) -> Result<MemberAccess, ConfigurationError> {
        let resolved = self.resolve_member(member)?;
        Ok(match &resolved.outcome {
            Outcome::Refused(diag) | Outcome::Unimplemented(diag) => {
                MemberAccess::Rejected(self.render(diag))
            }
            Outcome::Own | Outcome::Proxy(_) | Outcome::Replaced(_) => MemberAccess::Allowed {
                identifier: resolved.identifier,
            },
        })
    }

    /// A site that names the type `ty` (construction, static qualifier,
    /// `typeof`).
    pub fn check_type_reference(&mut self, ty: TypeId) -> MemberAccess {
        let resolved = self.resolve_type(ty);
        match &resolved.outcome {
            TypeOutcome::Refused(diag) => MemberAccess::Rejected(self.render(diag)),
            _ => MemberAccess::Allowed {
                identifier: resolved.reference,
            },
        }
    }

    /// A site that tests a value against `ty` at runtime.
    pub fn type_check(&mut self, ty: TypeId) -> TypeCheck {
        let resolved = self.resolve_type(ty);
        match &resolved.outcome {
            TypeOutcome::Refused(_) if self.program.ty(ty).kind == TypeKind::Interface => {
                trace!(ty = %resolved.qualified_name, "type test against ignored interface");
                TypeCheck::AlwaysFalse
            }
            TypeOutcome::Refused(diag) => TypeCheck::Rejected(self.render(diag)),
            _ => TypeCheck::Evaluate {
                reference: resolved.reference,
            },
        }
    }

    pub fn field_emission(&mut self, field: MemberId) -> Result<FieldEmission, ConfigurationError> {
        let resolved = self.resolve_member(field)?;
        if matches!(resolved.outcome, Outcome::Refused(_) | Outcome::Replaced(_)) {
            return Ok(FieldEmission::Omit);
        }
        if !self.should_declare_local(&self.program.member(field).ty) {
            return Ok(FieldEmission::Omit);
        }
        if self.classifier().is_member_external(field) {
            return Ok(FieldEmission::DeclareOnly);
        }
        Ok(FieldEmission::Initialize)
    }

    /// Whether a local (or field) of type `ty` may be declared in a
    /// translatable body. Arrays and references of an ignored type count as
    /// the ignored type; types that were not loaded are always declared.
    pub fn should_declare_local(&self, ty: &TypeKey) -> bool {
        match self.program.lookup_type(&ty.element_key()) {
            Some(id) => !self.classifier().is_type_ignored(id),
            None => true,
        }
    }

    /// Drop every cached resolution.
    pub fn invalidate(&mut self) {
        debug!("resolution cache invalidated");
        self.cache.invalidate();
    }

    /// Fail on the first unresolvable proxy declaration, whether or not any
    /// resolved symbol walks through it.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match self.store.configuration_errors().first() {
            Some(err) => {
                warn!(%err, "invalid proxy configuration");
                Err(err.clone())
            }
            None => Ok(()),
        }
    }

    /// Resolve every non-proxy type and member, then return the results as
    /// an immutable table. Any configuration error aborts.
    pub fn freeze(mut self) -> Result<ResolutionTable, ConfigurationError> {
        self.validate()?;
        let mut table = ResolutionTable {
            members: FxHashMap::default(),
            types: FxHashMap::default(),
            complete_messages: self.options.complete_unimplemented_messages,
        };
        let program = self.program;
        for ty in program.types() {
            if self.store.is_proxy_type(ty.id) {
                continue;
            }
            table.types.insert(ty.id, self.resolve_type(ty.id));
            for &member in &ty.members {
                table.members.insert(member, self.resolve_member(member)?);
            }
        }
        debug!(
            types = table.types.len(),
            members = table.members.len(),
            "resolution table frozen"
        );
        Ok(table)
    }
}

/// Fully populated, read-only resolutions; safe to share across threads.
#[derive(Clone, Debug)]
pub struct ResolutionTable {
    members: FxHashMap<MemberId, ResolvedMember>,
    types: FxHashMap<TypeId, ResolvedType>,
    complete_messages: bool,
}

impl ResolutionTable {
    pub fn member(&self, id: MemberId) -> Option<&ResolvedMember> {
        self.members.get(&id)
    }

    pub fn ty(&self, id: TypeId) -> Option<&ResolvedType> {
        self.types.get(&id)
    }

    pub fn members(&self) -> impl Iterator<Item = &ResolvedMember> + '_ {
        self.members.values()
    }

    pub fn types(&self) -> impl Iterator<Item = &ResolvedType> + '_ {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Same verdict as [`ResolutionSession::check_invocation`].
    pub fn check_invocation(&self, id: MemberId) -> Option<MemberAccess> {
        let resolved = self.members.get(&id)?;
        Some(match resolved.diagnostic() {
            Some(diag) => MemberAccess::Rejected(diag.to_diagnostic(self.complete_messages)),
            None => MemberAccess::Allowed {
                identifier: resolved.identifier.clone(),
            },
        })
    }

    /// Same verdict as [`ResolutionSession::type_check`].
    pub fn type_check(&self, program: &Program, id: TypeId) -> Option<TypeCheck> {
        let resolved = self.types.get(&id)?;
        Some(match &resolved.outcome {
            TypeOutcome::Refused(_) if program.ty(id).kind == TypeKind::Interface => {
                TypeCheck::AlwaysFalse
            }
            TypeOutcome::Refused(diag) => {
                TypeCheck::Rejected(diag.to_diagnostic(self.complete_messages))
            }
            _ => TypeCheck::Evaluate {
                reference: resolved.reference.clone(),
            },
        })
    }

    /// Members whose own declaration is a callable the emitter writes a
    /// body for.
    pub fn emitted_bodies(&self, program: &Program) -> Vec<MemberId> {
        let mut ids: Vec<MemberId> = self
            .members
            .values()
            .filter(|m| {
                matches!(m.outcome, Outcome::Own | Outcome::Proxy(_))
                    && program.member(m.member).kind.has_body()
            })
            .map(|m| m.member)
            .collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
