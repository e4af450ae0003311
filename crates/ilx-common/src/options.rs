//! Options that control one resolution run.
//!
//! Options are read from JSON (camelCase keys, every key optional):
//!
//! ```json
//! {
//!   "optimizer": { "cacheTypeExpressions": false },
//!   "maxInheritanceDepth": 32,
//!   "completeUnimplementedMessages": true
//! }
//! ```

use crate::limits::MAX_INHERITANCE_DEPTH;
use serde::{Deserialize, Serialize};

/// Optimizer toggles that affect resolution determinism.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptimizerOptions {
    /// Cache resolved members and types for the lifetime of a run.
    ///
    /// Disabling this forces every query to be recomputed, which is what
    /// isolated test configurations use to rule out stale results.
    pub cache_type_expressions: bool,
}

impl Default for OptimizerOptions {
    fn default() -> Self {
        Self {
            cache_type_expressions: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverOptions {
    pub optimizer: OptimizerOptions,
    /// Ancestor chains longer than this are configuration errors.
    pub max_inheritance_depth: u32,
    /// Render "not implemented" messages as full sentences. When false they
    /// stop right after "has not".
    pub complete_unimplemented_messages: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            optimizer: OptimizerOptions::default(),
            max_inheritance_depth: MAX_INHERITANCE_DEPTH,
            complete_unimplemented_messages: true,
        }
    }
}

impl ResolverOptions {
    /// Parse options from a JSON document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Options with the resolution cache disabled.
    #[must_use]
    pub fn uncached() -> Self {
        let mut options = Self::default();
        options.optimizer.cache_type_expressions = false;
        options
    }

    pub const fn caching_enabled(&self) -> bool {
        self.optimizer.cache_type_expressions
    }
}
