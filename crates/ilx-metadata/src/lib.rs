//! Metadata-driven member resolution and rewrite engine.
//!
//! Given a loaded [`Program`](ilx_model::Program) and the annotations on it,
//! this crate decides for every member what the translator emits:
//!
//! - [`store`]: lowers annotations and proxy declarations into directives
//! - [`ancestry`]: precomputed, depth-bounded ancestor chains
//! - [`proxy`]: the ancestor walk that picks a proxy body
//! - [`classify`]: the translatability decision table
//! - [`rename`]: emitted identifiers
//! - [`diagnostics`]: typed refusals and their literal message rendering
//! - [`session`]: per-run facade with its own cache, and the frozen table
//! - [`report`]: the whole-program pass

pub mod ancestry;
pub mod cache;
pub mod classify;
pub mod diagnostics;
pub mod directive;
pub mod errors;
pub mod proxy;
pub mod rename;
pub mod report;
pub mod session;
pub mod store;

pub use ancestry::AncestorChains;
pub use cache::{CacheStats, ResolutionCache};
pub use classify::{BodySource, Classifier, Outcome, ResolvedMember, ResolvedType, TypeOutcome};
pub use diagnostics::{ReferenceDiagnostic, Signatures};
pub use directive::{
    Directive, Directives, DirectivesExt, ProxyCandidate, ProxyMode, ProxySource, ProxyTarget,
};
pub use errors::ConfigurationError;
pub use proxy::{ProxyBody, ProxyResolver};
pub use rename::IdentifierRewriter;
pub use report::{MemberRecord, ResolutionReport, TypeRecord, resolve_program};
pub use session::{FieldEmission, MemberAccess, ResolutionSession, ResolutionTable, TypeCheck};
pub use store::MetadataStore;
