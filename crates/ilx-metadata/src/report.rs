//! Whole-program resolution pass.

use crate::cache::CacheStats;
use crate::classify::{BodySource, ResolvedMember, ResolvedType, TypeOutcome};
use crate::errors::ConfigurationError;
use crate::session::ResolutionSession;
use ilx_common::{Diagnostic, ResolverOptions};
use ilx_model::{Program, TypeKey};
use serde::Serialize;
use tracing::info;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub signature: String,
    pub identifier: String,
    pub outcome: &'static str,
    pub translatable: bool,
    /// Proxy member supplying the body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRecord {
    pub name: TypeKey,
    pub identifier: String,
    pub reference: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
    pub members: Vec<MemberRecord>,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionReport {
    pub types: Vec<TypeRecord>,
    /// Every refusal and unimplemented member, in declaration order.
    pub diagnostics: Vec<Diagnostic>,
    pub cache: CacheStats,
}

impl ResolutionReport {
    pub fn member(&self, signature: &str) -> Option<&MemberRecord> {
        self.types
            .iter()
            .flat_map(|t| &t.members)
            .find(|m| m.signature == signature)
    }

    pub fn ty(&self, name: &str) -> Option<&TypeRecord> {
        self.types.iter().find(|t| t.name.as_str() == name)
    }
}

/// Resolve every type and member of `program` except proxy declarations.
///
/// Fails with the first [`ConfigurationError`]: an unresolvable proxy
/// declaration or an inheritance chain a symbol depends on.
pub fn resolve_program(
    program: &Program,
    options: ResolverOptions,
) -> Result<ResolutionReport, ConfigurationError> {
    let complete = options.complete_unimplemented_messages;
    let mut session = ResolutionSession::new(program, options);
    session.validate()?;
    let mut report = ResolutionReport::default();

    for ty in program.types() {
        if session.store().is_proxy_type(ty.id) {
            continue;
        }
        let resolved_ty = session.resolve_type(ty.id);
        let mut record = type_record(program, &resolved_ty, complete);
        if let Some(diag) = &record.diagnostic {
            report.diagnostics.push(diag.clone());
        }
        for &member in &ty.members {
            let resolved = session.resolve_member(member)?;
            let member_record = member_record(program, &resolved, complete);
            if let Some(diag) = &member_record.diagnostic {
                report.diagnostics.push(diag.clone());
            }
            record.members.push(member_record);
        }
        report.types.push(record);
    }

    report.cache = session.cache_stats();
    info!(
        types = report.types.len(),
        diagnostics = report.diagnostics.len(),
        "program resolved"
    );
    Ok(report)
}

fn type_record(program: &Program, resolved: &ResolvedType, complete: bool) -> TypeRecord {
    let diagnostic = match &resolved.outcome {
        TypeOutcome::Refused(diag) => Some(diag.to_diagnostic(complete)),
        _ => None,
    };
    TypeRecord {
        name: program.ty(resolved.ty).key.clone(),
        identifier: resolved.identifier.clone(),
        reference: resolved.reference.clone(),
        outcome: resolved.outcome.label(),
        diagnostic,
        members: Vec::new(),
    }
}

fn member_record(program: &Program, resolved: &ResolvedMember, complete: bool) -> MemberRecord {
    let (proxy, replacement) = match resolved.body_source() {
        BodySource::Proxy(body) => (
            Some(program.identity_of_member(body.member).to_string()),
            None,
        ),
        BodySource::Replacement(expression) => (None, Some(expression)),
        BodySource::Own | BodySource::None => (None, None),
    };
    MemberRecord {
        signature: resolved.identity.to_string(),
        identifier: resolved.identifier.clone(),
        outcome: resolved.outcome.label(),
        translatable: resolved.translatable(),
        proxy,
        replacement,
        diagnostic: resolved.diagnostic().map(|d| d.to_diagnostic(complete)),
    }
}
