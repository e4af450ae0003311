//! Precomputed ancestor chains.
//!
//! Each type's linear chain (the type itself first, then its loaded bases up
//! to the root) is computed once. Proxy resolution then scans a slice
//! instead of recursing through base types. A chain longer than the
//! configured maximum is recorded as a [`ConfigurationError`]; in a
//! well-formed program that only happens through a cycle.

use crate::errors::ConfigurationError;
use ilx_model::{Program, TypeId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

pub type AncestorChain = SmallVec<[TypeId; 8]>;

#[derive(Debug, Default)]
pub struct AncestorChains {
    chains: FxHashMap<TypeId, AncestorChain>,
    errors: FxHashMap<TypeId, ConfigurationError>,
}

impl AncestorChains {
    pub fn build(program: &Program, max_depth: u32) -> Self {
        let mut chains = Self::default();
        for ty in program.types() {
            let mut chain = AncestorChain::new();
            let mut current = Some(ty.id);
            while let Some(id) = current {
                if chain.len() > max_depth as usize {
                    warn!(ty = %ty.key, max_depth, "inheritance chain too deep");
                    chains.errors.insert(
                        ty.id,
                        ConfigurationError::InheritanceTooDeep {
                            ty: ty.key.clone(),
                            max_depth,
                        },
                    );
                    break;
                }
                chain.push(id);
                current = program.base_of(id);
            }
            chains.chains.insert(ty.id, chain);
        }
        debug!(
            types = chains.chains.len(),
            errors = chains.errors.len(),
            "ancestor chains built"
        );
        chains
    }

    /// `ty` followed by its ancestors, most-derived first.
    pub fn chain(&self, ty: TypeId) -> Result<&[TypeId], ConfigurationError> {
        if let Some(err) = self.errors.get(&ty) {
            return Err(err.clone());
        }
        Ok(self.chains.get(&ty).map(|c| c.as_slice()).unwrap_or(&[]))
    }

    /// Whether `ancestor` is `ty` or one of its loaded bases.
    pub fn is_ancestor(&self, ancestor: TypeId, ty: TypeId) -> bool {
        self.chains
            .get(&ty)
            .is_some_and(|chain| chain.contains(&ancestor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilx_model::{ProgramBuilder, TypeDecl};

    #[test]
    fn test_chain_is_most_derived_first() {
        let mut builder = ProgramBuilder::new();
        let asm = builder.add_assembly("Test");
        let base = builder.add_type(asm, TypeDecl::class("BaseClass")).unwrap();
        let derived = builder
            .add_type(asm, TypeDecl::class("DerivedClass").extends("BaseClass"))
            .unwrap();
        let derived2 = builder
            .add_type(asm, TypeDecl::class("DerivedClass2").extends("DerivedClass"))
            .unwrap();
        let program = builder.build();

        let chains = AncestorChains::build(&program, 64);
        assert_eq!(chains.chain(derived2).unwrap(), &[derived2, derived, base]);
        assert_eq!(chains.chain(base).unwrap(), &[base]);
        assert!(chains.is_ancestor(base, derived2));
        assert!(!chains.is_ancestor(derived2, base));
    }

    #[test]
    fn test_cycle_is_bounded_and_reported() {
        let mut builder = ProgramBuilder::new();
        let asm = builder.add_assembly("Test");
        let a = builder.add_type(asm, TypeDecl::class("A").extends("B")).unwrap();
        builder.add_type(asm, TypeDecl::class("B").extends("A")).unwrap();
        let program = builder.build();

        let chains = AncestorChains::build(&program, 8);
        let err = chains.chain(a).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The inheritance chain of type 'A' exceeds the maximum depth of 8."
        );
    }
}
