use ilx_common::diagnostics::{
    Diagnostic, diagnostic_codes, format_message, get_message_template,
};
use ilx_model::TypeKey;
use std::fmt;

/// A directive that cannot be honoured. Fatal for every symbol whose
/// resolution depends on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A proxy type targets a type that was not loaded.
    UnknownProxyTargetType { proxy: TypeKey, target: TypeKey },
    /// A proxy member targets a member its target type does not declare.
    UnknownProxyTargetMember {
        proxy_member: String,
        target: String,
        target_type: TypeKey,
    },
    /// An unqualified proxy target name matches several members.
    AmbiguousProxyTarget {
        proxy_member: String,
        name: String,
        target_type: TypeKey,
    },
    /// The ancestor chain of a type is longer than the configured maximum,
    /// which in a well-formed program only happens through a cycle.
    InheritanceTooDeep { ty: TypeKey, max_depth: u32 },
}

impl ConfigurationError {
    pub const fn code(&self) -> u32 {
        match self {
            Self::UnknownProxyTargetType { .. } => diagnostic_codes::PROXY_TARGET_TYPE_NOT_FOUND,
            Self::UnknownProxyTargetMember { .. } => {
                diagnostic_codes::PROXY_TARGET_MEMBER_NOT_FOUND
            }
            Self::AmbiguousProxyTarget { .. } => diagnostic_codes::PROXY_TARGET_AMBIGUOUS,
            Self::InheritanceTooDeep { .. } => diagnostic_codes::INHERITANCE_DEPTH_EXCEEDED,
        }
    }

    /// The rendered message text.
    pub fn message(&self) -> String {
        let template = get_message_template(self.code()).unwrap_or("{0}");
        match self {
            Self::UnknownProxyTargetType { proxy, target } => {
                format_message(template, &[proxy.as_str(), target.as_str()])
            }
            Self::UnknownProxyTargetMember {
                proxy_member,
                target,
                target_type,
            } => format_message(
                template,
                &[proxy_member.as_str(), target.as_str(), target_type.as_str()],
            ),
            Self::AmbiguousProxyTarget {
                proxy_member,
                name,
                target_type,
            } => format_message(
                template,
                &[proxy_member.as_str(), name.as_str(), target_type.as_str()],
            ),
            Self::InheritanceTooDeep { ty, max_depth } => {
                let max_depth = max_depth.to_string();
                format_message(template, &[ty.as_str(), max_depth.as_str()])
            }
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code(), self.message())
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ConfigurationError {}
