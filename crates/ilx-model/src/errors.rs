use crate::identity::{SymbolIdentity, TypeKey};
use std::fmt;

/// Error raised while assembling a [`Program`](crate::Program).
#[derive(Debug)]
pub enum ModelError {
    /// Two types share a full name.
    DuplicateType(TypeKey),
    /// Two members share kind, declaring type, name and parameter types.
    DuplicateMember(SymbolIdentity),
    /// The manifest document could not be parsed.
    Manifest(serde_json::Error),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateType(key) => write!(f, "type '{key}' is declared more than once"),
            Self::DuplicateMember(identity) => {
                write!(f, "member '{identity}' is declared more than once")
            }
            Self::Manifest(err) => write!(f, "invalid program manifest: {err}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Manifest(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Manifest(err)
    }
}
