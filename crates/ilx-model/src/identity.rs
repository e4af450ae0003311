//! Symbol Identity Model
//!
//! A [`SymbolIdentity`] names a type or member independently of any
//! directive layered on top of it. Renames, proxies and ignores never feed
//! into the key, so an identity computed before and after a directive is
//! attached compares equal.
//!
//! Two member declarations are the same symbol iff kind, declaring type,
//! declared name and the ordered parameter *types* are equal. Parameter names
//! are deliberately not part of the key: a proxy method `Add(int a, int b)`
//! matches a target `Add(int x, int y)`. Conversion operators additionally
//! key on their return type, since `op_Implicit(Money)` may be declared once
//! per target type.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Full name of a type as the loaded IR spells it (`System.String`,
/// `Outer+Inner`, `System.String[]`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(String);

impl TypeKey {
    pub const VOID: &'static str = "System.Void";

    pub fn new(full_name: impl Into<String>) -> Self {
        Self(full_name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name without namespace or enclosing types: `Outer+Inner` -> `Inner`.
    pub fn short_name(&self) -> &str {
        let end = self.0.find('`').unwrap_or(self.0.len());
        let name = &self.0[..end];
        match name.rfind(['.', '+']) {
            Some(pos) => &name[pos + 1..],
            None => name,
        }
    }

    /// Namespace portion of a top-level type name, if any.
    pub fn namespace(&self) -> Option<&str> {
        let outer = match self.0.find('+') {
            Some(pos) => &self.0[..pos],
            None => &self.0,
        };
        outer.rfind('.').map(|pos| &outer[..pos])
    }

    pub fn is_void(&self) -> bool {
        self.0 == Self::VOID
    }

    /// Strip array, by-ref and pointer decorations: `Foo[][]&` -> `Foo`.
    pub fn element_key(&self) -> TypeKey {
        let mut name = self.0.as_str();
        loop {
            let trimmed = name
                .strip_suffix("[]")
                .or_else(|| name.strip_suffix('&'))
                .or_else(|| name.strip_suffix('*'));
            match trimmed {
                Some(rest) => name = rest,
                None => break,
            }
        }
        TypeKey::new(name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// What kind of symbol an identity names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Type,
    Method,
    Field,
    Property,
    Event,
    Constructor,
    Operator,
}

/// User-definable operators. Operators match by kind and operand types,
/// never by a conventional method name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperatorKind {
    Addition,
    Subtraction,
    Multiply,
    Division,
    Modulus,
    Equality,
    Inequality,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    BitwiseAnd,
    BitwiseOr,
    ExclusiveOr,
    LeftShift,
    RightShift,
    UnaryNegation,
    UnaryPlus,
    LogicalNot,
    OnesComplement,
    Increment,
    Decrement,
    True,
    False,
    Implicit,
    Explicit,
}

impl OperatorKind {
    /// The metadata method name the operator is compiled to.
    pub const fn metadata_name(self) -> &'static str {
        match self {
            Self::Addition => "op_Addition",
            Self::Subtraction => "op_Subtraction",
            Self::Multiply => "op_Multiply",
            Self::Division => "op_Division",
            Self::Modulus => "op_Modulus",
            Self::Equality => "op_Equality",
            Self::Inequality => "op_Inequality",
            Self::LessThan => "op_LessThan",
            Self::GreaterThan => "op_GreaterThan",
            Self::LessThanOrEqual => "op_LessThanOrEqual",
            Self::GreaterThanOrEqual => "op_GreaterThanOrEqual",
            Self::BitwiseAnd => "op_BitwiseAnd",
            Self::BitwiseOr => "op_BitwiseOr",
            Self::ExclusiveOr => "op_ExclusiveOr",
            Self::LeftShift => "op_LeftShift",
            Self::RightShift => "op_RightShift",
            Self::UnaryNegation => "op_UnaryNegation",
            Self::UnaryPlus => "op_UnaryPlus",
            Self::LogicalNot => "op_LogicalNot",
            Self::OnesComplement => "op_OnesComplement",
            Self::Increment => "op_Increment",
            Self::Decrement => "op_Decrement",
            Self::True => "op_True",
            Self::False => "op_False",
            Self::Implicit => "op_Implicit",
            Self::Explicit => "op_Explicit",
        }
    }

    pub const fn is_conversion(self) -> bool {
        matches!(self, Self::Implicit | Self::Explicit)
    }
}

/// Declared name of a symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolName {
    Named(String),
    Operator(OperatorKind),
}

impl SymbolName {
    pub const CONSTRUCTOR: &'static str = ".ctor";
    pub const STATIC_CONSTRUCTOR: &'static str = ".cctor";

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub const fn is_conversion(&self) -> bool {
        matches!(self, Self::Operator(op) if op.is_conversion())
    }

    /// The name as it appears in metadata (`op_Addition` for operators).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Operator(op) => op.metadata_name(),
        }
    }
}

impl fmt::Display for SymbolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered parameter types of a method, constructor or operator.
pub type ParamTypes = SmallVec<[TypeKey; 4]>;

/// Canonical, signature-based key of a type or member.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolIdentity {
    pub kind: SymbolKind,
    /// Declaring type for members; `None` for types (their full name is
    /// already unique, nested types included).
    pub declaring_type: Option<TypeKey>,
    pub name: SymbolName,
    /// Parameter types for methods, constructors and operators. Always
    /// empty for every other kind.
    pub params: ParamTypes,
    /// Return type of a conversion operator; `None` for everything else.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<TypeKey>,
}

impl SymbolIdentity {
    pub fn of_type(key: &TypeKey) -> Self {
        Self {
            kind: SymbolKind::Type,
            declaring_type: None,
            name: SymbolName::Named(key.as_str().to_string()),
            params: ParamTypes::new(),
            returns: None,
        }
    }

    pub fn member(
        kind: SymbolKind,
        declaring_type: TypeKey,
        name: SymbolName,
        params: impl IntoIterator<Item = TypeKey>,
    ) -> Self {
        let params = if kind.has_signature() {
            params.into_iter().collect()
        } else {
            ParamTypes::new()
        };
        Self {
            kind,
            declaring_type: Some(declaring_type),
            name,
            params,
            returns: None,
        }
    }

    /// Attach the return type when it is part of the key, which is only the
    /// case for conversion operators.
    #[must_use]
    pub fn returning(mut self, ty: &TypeKey) -> Self {
        if self.kind == SymbolKind::Operator && self.name.is_conversion() {
            self.returns = Some(ty.clone());
        }
        self
    }

    /// The same member signature declared on another type. This is how a
    /// proxy member is matched against its target.
    #[must_use]
    pub fn with_declaring_type(&self, declaring_type: TypeKey) -> Self {
        Self {
            declaring_type: Some(declaring_type),
            ..self.clone()
        }
    }

    pub const fn is_type(&self) -> bool {
        matches!(self.kind, SymbolKind::Type)
    }

    /// `true` when `other` is the same member signature, ignoring the
    /// declaring type.
    pub fn same_signature(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.name == other.name
            && self.params == other.params
            && self.returns == other.returns
    }
}

impl SymbolKind {
    /// Kinds whose identity includes parameter types.
    pub const fn has_signature(self) -> bool {
        matches!(self, Self::Method | Self::Constructor | Self::Operator)
    }
}

impl fmt::Display for SymbolIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(declaring) = &self.declaring_type {
            write!(f, "{declaring}::")?;
        }
        write!(f, "{}", self.name)?;
        if self.kind.has_signature() {
            f.write_str("(")?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{param}")?;
            }
            f.write_str(")")?;
        }
        if let Some(returns) = &self.returns {
            write!(f, " : {returns}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/identity_tests.rs"]
mod tests;
