//! Diagnostic output: the compact `file(line,col): error TSnnnn: text` form
//! and, with `--pretty`, miette's graphical report with the source excerpt.

use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, MietteDiagnostic, NamedSource, Report, Severity};
use tyck_diagnostics::{Diagnostic, DiagnosticCategory};
use tyck_program::CheckReport;

/// One-based `file(line,col): category TSnnnn: message`.
pub fn plain(report: &CheckReport, diagnostic: &Diagnostic) -> String {
    let mut out = String::new();
    if let Some(file) = &diagnostic.file {
        out.push_str(file);
        if let Some(location) = report.line_and_column(diagnostic) {
            out.push_str(&format!("({},{})", location.line + 1, location.column + 1));
        }
        out.push_str(": ");
    }
    out.push_str(&format!(
        "{} TS{}: {}",
        diagnostic.category,
        diagnostic.code,
        diagnostic.full_text()
    ));
    out
}

pub fn pretty(report: &CheckReport, diagnostic: &Diagnostic, color: bool) -> String {
    let severity = match diagnostic.category {
        DiagnosticCategory::Error => Severity::Error,
        DiagnosticCategory::Warning => Severity::Warning,
        DiagnosticCategory::Suggestion | DiagnosticCategory::Message => Severity::Advice,
    };
    let mut rendered = MietteDiagnostic::new(diagnostic.message_text.clone())
        .with_code(format!("TS{}", diagnostic.code))
        .with_severity(severity);
    if !diagnostic.chain.is_empty() {
        let chain: Vec<&str> = diagnostic.chain.iter().map(|entry| entry.text.as_str()).collect();
        rendered = rendered.with_help(chain.join("\n"));
    }

    let source = diagnostic
        .file
        .as_deref()
        .and_then(|file| report.tree(file).map(|tree| (file, tree)));
    let rendered = match (source, diagnostic.range) {
        (Some((file, tree)), Some(range)) => {
            let span = range.pos as usize..range.end.max(range.pos) as usize;
            let rendered = rendered.with_label(LabeledSpan::at(span, "here"));
            Report::new(rendered).with_source_code(NamedSource::new(file, tree.text().to_string()))
        }
        _ => Report::new(rendered),
    };

    let theme = if color {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let mut out = String::new();
    match GraphicalReportHandler::new_themed(theme).render_report(&mut out, &*rendered) {
        Ok(()) => out,
        Err(_) => plain_without_location(diagnostic),
    }
}

fn plain_without_location(diagnostic: &Diagnostic) -> String {
    format!("{} TS{}: {}", diagnostic.category, diagnostic.code, diagnostic.full_text())
}

/// `Found 1 error.` / `Found 3 errors.`
pub fn summary(errors: usize) -> String {
    format!("Found {} error{}.", errors, if errors == 1 { "" } else { "s" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyck_options::CheckerOptions;
    use tyck_program::Program;

    fn report(source: &str) -> CheckReport {
        let mut program = Program::new(CheckerOptions::strict());
        program.add_source("a.ts", source);
        program.check().unwrap()
    }

    #[test]
    fn test_plain_uses_one_based_location() {
        let report = report("let ok = 1;\nlet bad: number = 'x';");
        let line = plain(&report, &report.diagnostics()[0]);
        assert!(line.starts_with("a.ts(2,5): error TS2322: "), "{line}");
    }

    #[test]
    fn test_pretty_includes_code_and_file() {
        let report = report("let bad: number = 'x';");
        let text = pretty(&report, &report.diagnostics()[0], false);
        assert!(text.contains("TS2322"), "{text}");
        assert!(text.contains("a.ts"), "{text}");
    }

    #[test]
    fn test_summary_plural() {
        assert_eq!(summary(1), "Found 1 error.");
        assert_eq!(summary(2), "Found 2 errors.");
    }
}
