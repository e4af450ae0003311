//! Proxy Resolver
//!
//! Finds the proxy member, if any, that supplies the body of a member by
//! walking the ancestor chain of the type the lookup starts from:
//!
//! 1. At each ancestor `A` (most-derived first), look up proxy candidates
//!    registered against the member signature *as declared on* `A`.
//! 2. A candidate targeting an ancestor other than the starting type only
//!    counts when its proxy is inheritable.
//! 3. A candidate without a body (an external proxy member) is skipped as if
//!    it did not exist.
//! 4. The first remaining candidate wins and the walk stops.
//!
//! A derived type's proxy therefore overrides a base proxy for members the
//! derived type re-declares, while members it does not re-declare keep
//! resolving against whichever ancestor's proxy applies.

use crate::ancestry::AncestorChains;
use crate::directive::{ProxyCandidate, ProxyMode};
use crate::errors::ConfigurationError;
use crate::store::MetadataStore;
use ilx_model::{MemberId, Program, SymbolIdentity, TypeId};
use serde::Serialize;
use tracing::trace;

/// A proxy member chosen to supply a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ProxyBody {
    /// The proxy member whose body is emitted.
    pub member: MemberId,
    pub proxy_type: TypeId,
    /// The member the proxy targets, as declared on the ancestor it matched.
    pub target: MemberId,
    pub mode: ProxyMode,
}

impl From<&ProxyCandidate> for ProxyBody {
    fn from(candidate: &ProxyCandidate) -> Self {
        Self {
            member: candidate.member,
            proxy_type: candidate.proxy_type,
            target: candidate.target,
            mode: candidate.mode,
        }
    }
}

pub struct ProxyResolver<'a> {
    program: &'a Program,
    store: &'a MetadataStore,
    chains: &'a AncestorChains,
}

impl<'a> ProxyResolver<'a> {
    pub const fn new(
        program: &'a Program,
        store: &'a MetadataStore,
        chains: &'a AncestorChains,
    ) -> Self {
        Self {
            program,
            store,
            chains,
        }
    }

    /// Walk from `start` upward looking for a proxy that supplies the member
    /// signature of `identity`. The declaring type of `identity` is ignored.
    pub fn find(
        &self,
        start: TypeId,
        identity: &SymbolIdentity,
    ) -> Result<Option<ProxyBody>, ConfigurationError> {
        let chain = self.chains.chain(start)?;
        for (depth, &ancestor) in chain.iter().enumerate() {
            if let Some(err) = self
                .store
                .configuration_error(ancestor, identity.name.as_str())
            {
                return Err(err.clone());
            }

            let declared = identity.with_declaring_type(self.program.ty(ancestor).key.clone());
            for candidate in self.store.proxy_candidates(&declared) {
                let proxy = &self.program.ty(candidate.proxy_type).key;
                if depth > 0 && !candidate.inheritable {
                    trace!(target = %declared, %proxy, "non-inheritable proxy skipped");
                    continue;
                }
                if !candidate.has_body {
                    trace!(target = %declared, %proxy, "proxy member has no body, falling through");
                    continue;
                }
                trace!(target = %declared, %proxy, depth, "proxy supplies body");
                return Ok(Some(ProxyBody::from(candidate)));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[path = "tests/proxy_tests.rs"]
mod tests;
