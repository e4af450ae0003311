//! Diagnostic types and message lookup for metadata resolution.
//!
//! Message templates are part of the external contract: translated programs
//! embed the rendered text in throwing code paths and consumers match on it.
//! Templates use `{0}`, `{1}`, ... placeholders filled by `format_message()`.

use serde::Serialize;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A rendered diagnostic naming the symbol it concerns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message_text: String,
    /// Rendered signature or type name the diagnostic is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(code: u32, message: String) -> Self {
        Self {
            code,
            category: DiagnosticCategory::Error,
            message_text: message,
            symbol: None,
        }
    }

    /// Attach the rendered symbol this diagnostic concerns.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

// =============================================================================
// Message Table
// =============================================================================

pub mod diagnostic_codes {
    // Reference / invocation diagnostics (embedded in translated output)
    pub const MEMBER_REFERENCE_REFUSED: u32 = 9001;
    pub const EXTERNAL_METHOD_NOT_IMPLEMENTED: u32 = 9002;
    pub const EXTERNAL_TYPE_NOT_IMPLEMENTED: u32 = 9003;
    pub const FUNCTION_NOT_TRANSLATABLE: u32 = 9004;

    // Configuration errors (abort the affected symbol)
    pub const PROXY_TARGET_TYPE_NOT_FOUND: u32 = 9100;
    pub const PROXY_TARGET_MEMBER_NOT_FOUND: u32 = 9101;
    pub const PROXY_TARGET_AMBIGUOUS: u32 = 9102;
    pub const INHERITANCE_DEPTH_EXCEEDED: u32 = 9103;
}

pub mod diagnostic_messages {
    pub const MEMBER_REFERENCE_REFUSED: &str = "an attempt was made to reference the member '{0}'";
    pub const EXTERNAL_METHOD_NOT_IMPLEMENTED: &str =
        "The external method '{0}' of type '{1}' has not been implemented.";
    pub const EXTERNAL_TYPE_NOT_IMPLEMENTED: &str =
        "The external type '{0}' has not been implemented.";
    pub const FUNCTION_NOT_TRANSLATABLE: &str = "The function '{0}' could not be translated.";

    pub const PROXY_TARGET_TYPE_NOT_FOUND: &str =
        "Proxy type '{0}' targets type '{1}', which is not loaded.";
    pub const PROXY_TARGET_MEMBER_NOT_FOUND: &str =
        "Proxy member '{0}' targets '{1}', which is not declared by type '{2}'.";
    pub const PROXY_TARGET_AMBIGUOUS: &str =
        "Proxy member '{0}' names '{1}', which matches more than one member of type '{2}'.";
    pub const INHERITANCE_DEPTH_EXCEEDED: &str =
        "The inheritance chain of type '{0}' exceeds the maximum depth of {1}.";
}

/// Where the "not implemented" templates may be cut when the short form is
/// requested. Consumers only ever match the text up to and including this.
pub const UNIMPLEMENTED_STEM: &str = "has not";

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::MEMBER_REFERENCE_REFUSED,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::MEMBER_REFERENCE_REFUSED,
    },
    DiagnosticMessage {
        code: diagnostic_codes::EXTERNAL_METHOD_NOT_IMPLEMENTED,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::EXTERNAL_METHOD_NOT_IMPLEMENTED,
    },
    DiagnosticMessage {
        code: diagnostic_codes::EXTERNAL_TYPE_NOT_IMPLEMENTED,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::EXTERNAL_TYPE_NOT_IMPLEMENTED,
    },
    DiagnosticMessage {
        code: diagnostic_codes::FUNCTION_NOT_TRANSLATABLE,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::FUNCTION_NOT_TRANSLATABLE,
    },
    DiagnosticMessage {
        code: diagnostic_codes::PROXY_TARGET_TYPE_NOT_FOUND,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::PROXY_TARGET_TYPE_NOT_FOUND,
    },
    DiagnosticMessage {
        code: diagnostic_codes::PROXY_TARGET_MEMBER_NOT_FOUND,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::PROXY_TARGET_MEMBER_NOT_FOUND,
    },
    DiagnosticMessage {
        code: diagnostic_codes::PROXY_TARGET_AMBIGUOUS,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::PROXY_TARGET_AMBIGUOUS,
    },
    DiagnosticMessage {
        code: diagnostic_codes::INHERITANCE_DEPTH_EXCEEDED,
        category: DiagnosticCategory::Error,
        message: diagnostic_messages::INHERITANCE_DEPTH_EXCEEDED,
    },
];

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Cut a rendered "not implemented" message right after [`UNIMPLEMENTED_STEM`].
///
/// Messages without the stem are returned unchanged.
#[must_use]
pub fn truncate_to_stem(message: &str) -> &str {
    match message.rfind(UNIMPLEMENTED_STEM) {
        Some(pos) => &message[..pos + UNIMPLEMENTED_STEM.len()],
        None => message,
    }
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod tests;
