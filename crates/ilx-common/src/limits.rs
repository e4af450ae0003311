//! Centralized limits and thresholds for metadata resolution.
//!
//! Keeping these values in one place prevents the ancestor walk, the
//! enclosing-type walk and the option defaults from drifting apart.

// =============================================================================
// Recursion / Walk Depth Limits
// =============================================================================

/// Maximum length of a type's ancestor chain (the type itself included).
///
/// A well-formed program cannot produce an inheritance cycle, but a loaded
/// program assembled from mismatched assemblies can. The ancestor chain
/// builder stops at this depth and reports a configuration error for the
/// type instead of looping forever.
///
/// # Example
///
/// ```text
/// class A : B {}
/// class B : A {}   // chain A -> B -> A -> B ... is cut at 64 entries
/// ```
///
/// Used as the default of `ResolverOptions::max_inheritance_depth`.
pub const MAX_INHERITANCE_DEPTH: u32 = 64;

/// Maximum depth of nested type declarations followed when checking whether
/// an enclosing type is ignored.
///
/// ```text
/// [Ignore] class Outer { class Inner { class Innermost {} } }
/// ```
///
/// `Innermost` is ignored because `Outer` is; the walk gives up (treating the
/// type as not ignored) after this many enclosing levels.
pub const MAX_NESTING_DEPTH: u32 = 32;

// =============================================================================
// Capacity Hints
// =============================================================================

/// Initial capacity of the per-run member resolution cache.
pub const RESOLUTION_CACHE_CAPACITY: usize = 256;
