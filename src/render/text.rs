//! Plain text renderer implementation.

use crate::model::{BatchSummary, Category, DiagnosticKind, DocumentReport};

const RULE: &str = "~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~";

/// Render a DocumentReport as the human-readable log.
pub fn to_text(report: &DocumentReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Document Name: {}\n", report.document));
    if let Some(ref dir) = report.output_dir {
        out.push_str(&format!("Itemized Files Location: {}\n", dir.display()));
    }

    let counts: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("{} {}", c, report.count(*c)))
        .collect();
    out.push_str(&format!(
        "Entries: {} ({})\n",
        report.total_entries(),
        counts.join(", ")
    ));
    out.push_str(RULE);
    out.push('\n');

    if report.mismatches.is_empty() {
        out.push_str("No Hidden Media Found\n");
    } else {
        out.push_str("Hidden Media Found:\n");
        for mismatch in &report.mismatches {
            out.push_str(&format!(
                "\t{}: declared {}, actually {}\n",
                mismatch.entry, mismatch.declared, mismatch.detected
            ));
        }
    }

    if let Some(ref term) = report.search_term {
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!("Searching File Names And Contents For: {}\n", term));

        let by_name: Vec<&str> = report
            .matches
            .iter()
            .filter(|m| m.location.by_name())
            .map(|m| m.entry.as_str())
            .collect();
        let by_content: Vec<&str> = report
            .matches
            .iter()
            .filter(|m| m.location.by_content())
            .map(|m| m.entry.as_str())
            .collect();

        push_list(&mut out, "File Names Match:", &by_name);
        push_list(&mut out, "File Contents Match:", &by_content);
        let undecodable: Vec<&str> = report.undecodable.iter().map(String::as_str).collect();
        push_list(&mut out, "Unreadable File Contents:", &undecodable);

        if report.matches.is_empty() {
            out.push_str("Search Term Not Found\n");
        }
    }

    if !report.diagnostics.is_empty() {
        out.push_str(RULE);
        out.push('\n');
        out.push_str("Problems:\n");
        for diag in &report.diagnostics {
            let label = match diag.kind {
                DiagnosticKind::EntryReadFailure => "unreadable entry",
                DiagnosticKind::MalformedContent => "malformed content",
            };
            out.push_str(&format!("\t{} ({}): {}\n", diag.entry, label, diag.message));
        }
    }

    out
}

/// Render the one-paragraph batch summary.
pub fn summary_to_text(summary: &BatchSummary) -> String {
    let mut out = format!(
        "Processed {} document(s): {} itemized, {} failed\n",
        summary.attempted(),
        summary.reports.len(),
        summary.failures.len()
    );
    out.push_str(&format!(
        "Findings: {} hidden media, {} search matches\n",
        summary.total_mismatches(),
        summary.total_matches()
    ));
    for failure in &summary.failures {
        out.push_str(&format!(
            "\tFailed: {}: {}\n",
            failure.document.display(),
            failure.error
        ));
    }
    out
}

fn push_list(out: &mut String, heading: &str, items: &[&str]) {
    if items.is_empty() {
        return;
    }
    out.push('\t');
    out.push_str(heading);
    out.push('\n');
    for item in items {
        out.push_str("\t\t");
        out.push_str(item);
        out.push('\n');
    }
}
