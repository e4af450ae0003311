//! Metadata Annotation Store
//!
//! Built once per run by scanning every loaded symbol's annotations and every
//! proxy declaration. Lookups are keyed by [`SymbolIdentity`], so a directive
//! contributed by a proxy lands on exactly the symbol its own annotations
//! would have.
//!
//! Proxy types are visited in full-name order. Candidates registered against
//! one target member therefore come out in proxy-name order no matter how the
//! proxies were declared.

use crate::directive::{
    Directive, Directives, ProxyCandidate, ProxyMode, ProxySource, ProxyTarget,
};
use crate::errors::ConfigurationError;
use ilx_model::{
    Annotation, AnnotationsExt, BodyState, MemberDef, MemberId, Program, SymbolIdentity, TypeDef,
    TypeId,
};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

#[derive(Debug, Default)]
pub struct MetadataStore {
    directives: FxHashMap<SymbolIdentity, Directives>,
    /// Proxy candidates keyed by the identity of the target member.
    proxies: FxHashMap<SymbolIdentity, SmallVec<[ProxyCandidate; 1]>>,
    /// Target type -> proxy types declaring it as their target.
    proxy_types: FxHashMap<TypeId, SmallVec<[TypeId; 1]>>,
    proxy_type_set: FxHashSet<TypeId>,
    /// Every unresolvable proxy declaration, in registration order.
    errors: Vec<ConfigurationError>,
    /// Target type -> member name the proxy tried to reach -> index into
    /// `errors`.
    member_errors: FxHashMap<TypeId, FxHashMap<String, usize>>,
}

impl MetadataStore {
    pub fn build(program: &Program) -> Self {
        let mut store = Self::default();

        for ty in program.types() {
            if ty.annotations.proxy_of().is_some() {
                continue;
            }
            let identity = program.identity_of_type(ty.id);
            if program.in_stub_assembly(ty.id) {
                store
                    .directives
                    .entry(identity.clone())
                    .or_default()
                    .push(Directive::StubAssembly);
            }
            store.push_annotations(identity, &ty.annotations);
            for &member in &ty.members {
                store.push_annotations(
                    program.identity_of_member(member),
                    &program.member(member).annotations,
                );
            }
        }

        let mut proxies: Vec<&TypeDef> = program.proxy_types().collect();
        proxies.sort_by(|a, b| a.key.cmp(&b.key));
        for proxy in proxies {
            store.register_proxy(program, proxy);
        }

        debug!(
            symbols = store.directives.len(),
            proxied_members = store.proxies.len(),
            errors = store.errors.len(),
            "metadata store built"
        );
        store
    }

    /// Lower the directive-bearing annotations onto `identity`, after any
    /// directives it already has.
    fn push_annotations(&mut self, identity: SymbolIdentity, annotations: &[Annotation]) {
        let lowered = annotations.iter().filter_map(|annotation| match annotation {
            Annotation::Ignore => Some(Directive::Ignore),
            Annotation::Rename(name) => Some(Directive::Rename(name.clone())),
            Annotation::External => Some(Directive::External),
            Annotation::Replacement(expression) => {
                Some(Directive::Replacement(expression.clone()))
            }
            Annotation::Proxy { .. }
            | Annotation::ProxyTarget(_)
            | Annotation::SuppressBaseCall
            | Annotation::NeverReplace
            | Annotation::StubAssembly => None,
        });
        let mut lowered = lowered.peekable();
        if lowered.peek().is_some() {
            self.directives.entry(identity).or_default().extend(lowered);
        }
    }

    fn register_proxy(&mut self, program: &Program, proxy: &TypeDef) {
        let Some((target_key, inheritable)) = proxy.annotations.proxy_of() else {
            return;
        };
        self.proxy_type_set.insert(proxy.id);

        // Nested inside an ignored type: ignored itself, contributes nothing.
        if program
            .enclosing_chain(proxy.id)
            .skip(1)
            .any(|enclosing| program.ty(enclosing).annotations.is_ignored())
        {
            debug!(proxy = %proxy.key, "proxy type nested in an ignored type");
            return;
        }

        let Some(target_ty) = program.lookup_type(target_key) else {
            warn!(proxy = %proxy.key, target = %target_key, "proxy target type is not loaded");
            self.errors.push(ConfigurationError::UnknownProxyTargetType {
                proxy: proxy.key.clone(),
                target: target_key.clone(),
            });
            return;
        };
        self.proxy_types.entry(target_ty).or_default().push(proxy.id);
        self.push_annotations(program.identity_of_type(target_ty), &proxy.annotations);

        if proxy.annotations.is_ignored() {
            debug!(proxy = %proxy.key, "ignored proxy type supplies no members");
            return;
        }

        for &member_id in &proxy.members {
            let member = program.member(member_id);
            let never_replace = |m: &MemberDef| {
                m.annotations
                    .has(|a| matches!(a, Annotation::NeverReplace))
            };
            if member.backing_field_of.is_some()
                || never_replace(member)
                || member
                    .accessor_of
                    .is_some_and(|(_, owner)| never_replace(program.member(owner)))
            {
                continue;
            }

            let (target, proxy_target) = match resolve_proxy_target(program, member, target_ty) {
                Ok(resolved) => resolved,
                Err((name, err)) => {
                    debug!(proxy = %proxy.key, %err, "unresolvable proxy member");
                    let errors = &mut self.errors;
                    self.member_errors
                        .entry(target_ty)
                        .or_default()
                        .entry(name)
                        .or_insert_with(|| {
                            errors.push(err);
                            errors.len() - 1
                        });
                    continue;
                }
            };

            let target_identity = program.identity_of_member(target);
            self.push_annotations(target_identity.clone(), &member.annotations);
            if !member.kind.has_body() || member.annotations.is_ignored() {
                continue;
            }

            let mode = if member
                .annotations
                .has(|a| matches!(a, Annotation::SuppressBaseCall))
            {
                ProxyMode::ReplaceBodySuppressBaseCall
            } else {
                ProxyMode::ReplaceBody
            };
            let has_body = member.body == BodyState::Present && !member.annotations.is_external();
            trace!(
                proxy_member = %program.identity_of_member(member_id),
                target = %target_identity,
                has_body,
                "registered proxy candidate"
            );

            self.directives
                .entry(program.identity_of_member(member_id))
                .or_default()
                .push(Directive::ProxySource(ProxySource {
                    target: proxy_target,
                    mode,
                    inheritable,
                }));
            self.proxies
                .entry(target_identity)
                .or_default()
                .push(ProxyCandidate {
                    member: member_id,
                    proxy_type: proxy.id,
                    target,
                    mode,
                    inheritable,
                    has_body,
                });
        }
    }

    /// Ordered directives of `identity`; empty when it has none.
    pub fn directives_for(&self, identity: &SymbolIdentity) -> &[Directive] {
        self.directives.get(identity).map(|d| d.as_slice()).unwrap_or(&[])
    }

    pub fn type_directives(&self, program: &Program, ty: TypeId) -> &[Directive] {
        self.directives_for(&program.identity_of_type(ty))
    }

    pub fn member_directives(&self, program: &Program, member: MemberId) -> &[Directive] {
        self.directives_for(&program.identity_of_member(member))
    }

    /// Proxy members supplying `target`, in proxy-name order.
    pub fn proxy_candidates(&self, target: &SymbolIdentity) -> &[ProxyCandidate] {
        self.proxies.get(target).map(|c| c.as_slice()).unwrap_or(&[])
    }

    /// Proxy types whose target is `ty`.
    pub fn proxies_of(&self, ty: TypeId) -> &[TypeId] {
        self.proxy_types.get(&ty).map(|p| p.as_slice()).unwrap_or(&[])
    }

    pub fn is_proxy_type(&self, ty: TypeId) -> bool {
        self.proxy_type_set.contains(&ty)
    }

    /// The configuration error recorded against member `name` of `ty`.
    pub fn configuration_error(&self, ty: TypeId, name: &str) -> Option<&ConfigurationError> {
        let index = *self.member_errors.get(&ty)?.get(name)?;
        self.errors.get(index)
    }

    /// Every unresolvable proxy declaration, in registration order. Proxy
    /// types are registered by full name, so the order is stable.
    pub fn configuration_errors(&self) -> &[ConfigurationError] {
        &self.errors
    }
}

/// Find the member of `target_ty` a proxy member supplies. On failure returns
/// the member name the error is recorded under.
fn resolve_proxy_target(
    program: &Program,
    member: &MemberDef,
    target_ty: TypeId,
) -> Result<(MemberId, ProxyTarget), (String, ConfigurationError)> {
    let target_key = &program.ty(target_ty).key;
    let proxy_member = program.identity_of_member(member.id).to_string();

    let unqualified = member.annotations.iter().find_map(|a| match a {
        Annotation::ProxyTarget(name) => Some(name),
        _ => None,
    });

    if let Some(name) = unqualified {
        let candidates: SmallVec<[&MemberDef; 2]> = program
            .members_named(target_ty, name)
            .filter(|m| m.kind == member.kind)
            .collect();
        let exact = candidates
            .iter()
            .find(|m| m.param_types().eq(member.param_types()));
        let target = match (exact, candidates.as_slice()) {
            (Some(m), _) => m.id,
            (None, [only]) => only.id,
            (None, []) => {
                return Err((
                    name.clone(),
                    ConfigurationError::UnknownProxyTargetMember {
                        proxy_member,
                        target: name.clone(),
                        target_type: target_key.clone(),
                    },
                ));
            }
            (None, _) => {
                return Err((
                    name.clone(),
                    ConfigurationError::AmbiguousProxyTarget {
                        proxy_member,
                        name: name.clone(),
                        target_type: target_key.clone(),
                    },
                ));
            }
        };
        return Ok((
            target,
            ProxyTarget::Unqualified {
                target_type: target_key.clone(),
                name: name.clone(),
            },
        ));
    }

    let identity = program
        .identity_of_member(member.id)
        .with_declaring_type(target_key.clone());
    match program.lookup_member(&identity) {
        Some(target) => Ok((target, ProxyTarget::Symbol(identity))),
        None => Err((
            member.name.as_str().to_string(),
            ConfigurationError::UnknownProxyTargetMember {
                proxy_member,
                target: identity.to_string(),
                target_type: target_key.clone(),
            },
        )),
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
