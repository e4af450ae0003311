//! Directives: the resolved, closed set of overrides attached to a symbol.
//!
//! Annotations are raw tokens on the loaded IR. The store lowers them into
//! [`Directive`]s keyed by [`SymbolIdentity`](ilx_model::SymbolIdentity), so
//! every decision in the classifier is an exhaustive match over this enum.

use ilx_model::{MemberId, SymbolIdentity, TypeId, TypeKey};
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    Ignore,
    Rename(String),
    External,
    Replacement(String),
    ProxySource(ProxySource),
    StubAssembly,
}

/// How a proxy body replaces its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProxyMode {
    ReplaceBody,
    /// Replace the body and drop the target's call to its base implementation.
    ReplaceBodySuppressBaseCall,
}

/// Where a proxy member points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProxyTarget {
    /// Same signature, declared on the target type.
    Symbol(SymbolIdentity),
    /// An unqualified member name resolved against the target type's
    /// declared members.
    Unqualified { target_type: TypeKey, name: String },
}

/// Directive carried by a proxy member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProxySource {
    pub target: ProxyTarget,
    pub mode: ProxyMode,
    pub inheritable: bool,
}

/// A proxy member registered against the target member it supplies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProxyCandidate {
    /// The proxy member.
    pub member: MemberId,
    pub proxy_type: TypeId,
    /// The target member, as declared on the target type.
    pub target: MemberId,
    pub mode: ProxyMode,
    pub inheritable: bool,
    /// Whether the proxy member can actually supply a body. External or
    /// bodiless proxy members are recorded but skipped by the walk.
    pub has_body: bool,
}

/// Ordered directives of one symbol. Own directives precede any contributed
/// by proxies.
pub type Directives = SmallVec<[Directive; 2]>;

/// Queries over an ordered directive list.
pub trait DirectivesExt {
    fn is_ignored(&self) -> bool;
    fn is_external(&self) -> bool;
    /// First `Rename`, so a symbol's own rename beats a proxy-contributed one.
    fn rename(&self) -> Option<&str>;
    fn replacement(&self) -> Option<&str>;
    fn proxy_source(&self) -> Option<&ProxySource>;
}

impl DirectivesExt for [Directive] {
    fn is_ignored(&self) -> bool {
        self.iter().any(|d| matches!(d, Directive::Ignore))
    }

    fn is_external(&self) -> bool {
        self.iter().any(|d| matches!(d, Directive::External))
    }

    fn rename(&self) -> Option<&str> {
        self.iter().find_map(|d| match d {
            Directive::Rename(name) => Some(name.as_str()),
            _ => None,
        })
    }

    fn replacement(&self) -> Option<&str> {
        self.iter().find_map(|d| match d {
            Directive::Replacement(expression) => Some(expression.as_str()),
            _ => None,
        })
    }

    fn proxy_source(&self) -> Option<&ProxySource> {
        self.iter().find_map(|d| match d {
            Directive::ProxySource(source) => Some(source),
            _ => None,
        })
    }
}
