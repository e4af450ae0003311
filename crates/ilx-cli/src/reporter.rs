use colored::Colorize;
use ilx_common::{Diagnostic, DiagnosticCategory};
use ilx_metadata::{ConfigurationError, MemberRecord, ResolutionReport, TypeRecord};

/// Renders resolution reports for a terminal.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render_report(&self, report: &ResolutionReport) -> String {
        let mut out = String::new();
        for ty in &report.types {
            self.format_type(&mut out, ty);
        }

        for diagnostic in &report.diagnostics {
            out.push('\n');
            out.push_str(&self.format_diagnostic(diagnostic));
        }

        out.push('\n');
        out.push_str(&self.format_summary(report));
        out
    }

    pub fn render_error(&self, err: &ConfigurationError) -> String {
        self.format_diagnostic(&err.to_diagnostic())
    }

    fn format_type(&self, out: &mut String, ty: &TypeRecord) {
        let header = format!("{} -> {}", ty.name, ty.reference);
        if self.color {
            out.push_str(&header.bold().to_string());
        } else {
            out.push_str(&header);
        }
        out.push_str(&format!(" [{}]\n", self.format_outcome(ty.outcome)));

        for member in &ty.members {
            out.push_str("  ");
            out.push_str(&self.format_member(member));
            out.push('\n');
        }
    }

    fn format_member(&self, member: &MemberRecord) -> String {
        let mut line = format!(
            "{} -> {} [{}]",
            member.signature,
            member.identifier,
            self.format_outcome(member.outcome)
        );
        if let Some(proxy) = &member.proxy {
            line.push_str(&format!(" from {proxy}"));
        }
        if let Some(expression) = &member.replacement {
            line.push_str(&format!(" = {expression}"));
        }
        line
    }

    fn format_outcome(&self, outcome: &str) -> String {
        if !self.color {
            return outcome.to_string();
        }
        match outcome {
            "proxy" | "replaced" => outcome.cyan().to_string(),
            "external" | "unimplemented" => outcome.yellow().to_string(),
            "refused" => outcome.red().to_string(),
            _ => outcome.green().to_string(),
        }
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();
        if let Some(symbol) = &diagnostic.symbol {
            output.push_str(symbol);
            output.push_str(" - ");
        }
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_code(diagnostic.code));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);
        output
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = format!("ILX{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }

    fn format_summary(&self, report: &ResolutionReport) -> String {
        let members: usize = report.types.iter().map(|t| t.members.len()).sum();
        format!(
            "Resolved {} types and {} members: {} diagnostics (cache {} hits / {} misses).",
            report.types.len(),
            members,
            report.diagnostics.len(),
            report.cache.hits,
            report.cache.misses
        )
    }
}
