//! Identifier Rewriter
//!
//! Computes the identifiers symbols are emitted under. Only a `Rename` on the
//! symbol itself changes its name; renames on enclosing types change the
//! qualified name, never the member name. Diagnostics keep using declared
//! names (see [`crate::diagnostics`]).

use crate::directive::DirectivesExt;
use crate::store::MetadataStore;
use ilx_model::{MemberId, Program, SymbolIdentity, SymbolRef, TypeId, TypeKey};
use smallvec::SmallVec;

pub struct IdentifierRewriter<'a> {
    program: &'a Program,
    store: &'a MetadataStore,
}

impl<'a> IdentifierRewriter<'a> {
    pub const fn new(program: &'a Program, store: &'a MetadataStore) -> Self {
        Self { program, store }
    }

    pub fn emitted_name(&self, identity: &SymbolIdentity) -> String {
        match self.program.lookup(identity) {
            Some(SymbolRef::Type(ty)) => self.type_name(ty),
            Some(SymbolRef::Member(member)) => self.member_name(member),
            None => match self.store.directives_for(identity).rename() {
                Some(name) => name.to_string(),
                None if identity.is_type() => {
                    TypeKey::new(identity.name.as_str()).short_name().to_string()
                }
                None => identity.name.as_str().to_string(),
            },
        }
    }

    pub fn type_name(&self, ty: TypeId) -> String {
        match self.store.type_directives(self.program, ty).rename() {
            Some(name) => name.to_string(),
            None => self.program.ty(ty).short_name().to_string(),
        }
    }

    /// Member identifier:
    /// - its own `Rename`, else
    /// - for accessors of a renamed property/event, `get_`/`set_`/`add_`/
    ///   `remove_` followed by the new name, else
    /// - for auto-property backing fields, `Type$Property$value`, else
    /// - the declared name.
    pub fn member_name(&self, id: MemberId) -> String {
        let member = self.program.member(id);
        if let Some(name) = self.store.member_directives(self.program, id).rename() {
            return name.to_string();
        }
        if let Some((kind, owner)) = member.accessor_of
            && let Some(name) = self.store.member_directives(self.program, owner).rename()
        {
            return format!("{}{name}", kind.prefix());
        }
        if let Some(property) = member.backing_field_of {
            return format!(
                "{}${}$value",
                self.type_name(member.declaring_type),
                self.member_name(property)
            );
        }
        member.name.as_str().to_string()
    }

    /// Namespace, then enclosing types joined by `+`, using emitted names.
    pub fn qualified_name(&self, ty: TypeId) -> String {
        let chain: SmallVec<[TypeId; 4]> = self.program.enclosing_chain(ty).collect();
        let outermost = chain.last().copied().unwrap_or(ty);
        let mut name = match self.program.ty(outermost).key.namespace() {
            Some(namespace) => format!("{namespace}."),
            None => String::new(),
        };
        for (i, &t) in chain.iter().rev().enumerate() {
            if i > 0 {
                name.push('+');
            }
            name.push_str(&self.type_name(t));
        }
        name
    }

    /// What a reference to `ty` emits.
    pub fn type_reference(&self, ty: TypeId) -> String {
        match self.store.type_directives(self.program, ty).replacement() {
            Some(expression) => expression.to_string(),
            None => self.qualified_name(ty),
        }
    }
}

#[cfg(test)]
#[path = "tests/rename_tests.rs"]
mod tests;
