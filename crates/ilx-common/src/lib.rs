//! Common types and utilities for the ilx metadata resolution engine.
//!
//! This crate provides foundational types used across all ilx crates:
//! - Centralized limits (inheritance depth, type nesting depth)
//! - The diagnostic message table and the `Diagnostic` value
//! - Resolver options shared by the library and the CLI

// Centralized limits and thresholds
pub mod limits;

// Diagnostic message table and rendering helpers
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage, format_message};

// Options that control a resolution run
pub mod options;
pub use options::{OptimizerOptions, ResolverOptions};
