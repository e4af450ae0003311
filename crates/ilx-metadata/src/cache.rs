//! Per-run resolution cache.
//!
//! Each [`ResolutionSession`](crate::ResolutionSession) owns one instance;
//! nothing is shared between runs. When
//! `optimizer.cacheTypeExpressions` is off the cache stores nothing and
//! every query is recomputed.

use crate::classify::{ResolvedMember, ResolvedType};
use ilx_common::limits::RESOLUTION_CACHE_CAPACITY;
use ilx_model::{MemberId, SymbolIdentity, TypeId};
use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

#[derive(Debug)]
pub struct ResolutionCache {
    enabled: bool,
    members: FxHashMap<SymbolIdentity, ResolvedMember>,
    types: FxHashMap<SymbolIdentity, ResolvedType>,
    /// (receiver, signature) -> most-derived declaration.
    dispatch: FxHashMap<(TypeId, SymbolIdentity), Option<MemberId>>,
    stats: CacheStats,
}

impl ResolutionCache {
    pub fn new(enabled: bool) -> Self {
        let capacity = if enabled { RESOLUTION_CACHE_CAPACITY } else { 0 };
        Self {
            enabled,
            members: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            types: FxHashMap::default(),
            dispatch: FxHashMap::default(),
            stats: CacheStats::default(),
        }
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.members.len() + self.types.len() + self.dispatch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record<T>(&mut self, found: Option<T>) -> Option<T> {
        if found.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        found
    }

    pub fn member(&mut self, identity: &SymbolIdentity) -> Option<ResolvedMember> {
        let found = self.members.get(identity).cloned();
        self.record(found)
    }

    pub fn insert_member(&mut self, identity: SymbolIdentity, resolved: ResolvedMember) {
        if self.enabled {
            self.members.insert(identity, resolved);
        }
    }

    pub fn ty(&mut self, identity: &SymbolIdentity) -> Option<ResolvedType> {
        let found = self.types.get(identity).cloned();
        self.record(found)
    }

    pub fn insert_type(&mut self, identity: SymbolIdentity, resolved: ResolvedType) {
        if self.enabled {
            self.types.insert(identity, resolved);
        }
    }

    pub fn dispatch(&mut self, receiver: TypeId, signature: &SymbolIdentity) -> Option<Option<MemberId>> {
        let found = self.dispatch.get(&(receiver, signature.clone())).copied();
        self.record(found)
    }

    pub fn insert_dispatch(
        &mut self,
        receiver: TypeId,
        signature: SymbolIdentity,
        target: Option<MemberId>,
    ) {
        if self.enabled {
            self.dispatch.insert((receiver, signature), target);
        }
    }

    /// Drop every cached result. Statistics survive.
    pub fn invalidate(&mut self) {
        self.members.clear();
        self.types.clear();
        self.dispatch.clear();
        self.stats.invalidations += 1;
    }
}
