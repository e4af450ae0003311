//! Annotation tokens attached to loaded symbols.
//!
//! These are the raw tokens the front-end recognises on assemblies, types and
//! members. The metadata store turns them into directives; the model only
//! carries them.

use crate::identity::TypeKey;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Annotation {
    /// Do not translate the symbol (types: nor any member or nested type).
    Ignore,
    /// Emit the symbol under another identifier.
    Rename(String),
    /// The symbol's implementation is supplied from outside.
    External,
    /// Emit a verbatim target-language expression instead of the symbol.
    Replacement(String),
    /// On a type: the type is a proxy declaration for `target`.
    Proxy {
        target: TypeKey,
        #[serde(default = "default_inheritable")]
        inheritable: bool,
    },
    /// On a proxy member: resolve the target by this unqualified member name
    /// instead of by the proxy member's own name.
    ProxyTarget(String),
    /// On a proxy member: the replaced body must not call the target's base
    /// implementation.
    SuppressBaseCall,
    /// On a proxy member: never use this member as a replacement.
    NeverReplace,
    /// On an assembly: member bodies are not available.
    StubAssembly,
}

const fn default_inheritable() -> bool {
    true
}

impl Annotation {
    pub fn rename(name: impl Into<String>) -> Self {
        Self::Rename(name.into())
    }

    pub fn replacement(expression: impl Into<String>) -> Self {
        Self::Replacement(expression.into())
    }

    pub fn proxy(target: impl Into<String>) -> Self {
        Self::Proxy {
            target: TypeKey::new(target),
            inheritable: true,
        }
    }

    pub fn proxy_non_inheritable(target: impl Into<String>) -> Self {
        Self::Proxy {
            target: TypeKey::new(target),
            inheritable: false,
        }
    }

    pub fn proxy_target(name: impl Into<String>) -> Self {
        Self::ProxyTarget(name.into())
    }
}

/// Lookup helpers over an annotation list.
pub trait AnnotationsExt {
    fn has(&self, probe: fn(&Annotation) -> bool) -> bool;
    fn is_ignored(&self) -> bool;
    fn is_external(&self) -> bool;
    fn proxy_of(&self) -> Option<(&TypeKey, bool)>;
}

impl AnnotationsExt for [Annotation] {
    fn has(&self, probe: fn(&Annotation) -> bool) -> bool {
        self.iter().any(probe)
    }

    fn is_ignored(&self) -> bool {
        self.has(|a| matches!(a, Annotation::Ignore))
    }

    fn is_external(&self) -> bool {
        self.has(|a| matches!(a, Annotation::External))
    }

    fn proxy_of(&self) -> Option<(&TypeKey, bool)> {
        self.iter().find_map(|a| match a {
            Annotation::Proxy {
                target,
                inheritable,
            } => Some((target, *inheritable)),
            _ => None,
        })
    }
}
