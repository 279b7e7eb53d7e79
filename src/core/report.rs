use crate::core::summary::{BankStatus, BankSummary, InputSummary};
use crate::core::ConfigProvider;
use crate::domain::model::{MergeReport, TypeCounts};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub show_duplicates: bool,
    pub duplicate_example_limit: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            show_duplicates: false,
            duplicate_example_limit: 20,
        }
    }
}

impl ReportOptions {
    /// Takes the example cap from the configured settings.
    pub fn from_config(show_duplicates: bool, config: &impl ConfigProvider) -> Self {
        Self {
            show_duplicates,
            duplicate_example_limit: config.duplicate_example_limit(),
        }
    }
}

fn type_breakdown(counts: &TypeCounts) -> String {
    format!(
        "single {}, multi {}, drag {}, hotspot {}, fill {}",
        counts.single, counts.multiselect, counts.dragdrop, counts.hotspot, counts.fillin
    )
}

fn summary_line(out: &mut String, label: &str, counts: &TypeCounts) {
    let _ = writeln!(
        out,
        "- {}: {} total | {}",
        label,
        counts.total(),
        type_breakdown(counts)
    );
}

/// Statistics of a merge run as printed to stdout.
pub fn render_merge_report(report: &MergeReport, options: &ReportOptions) -> String {
    let mut out = String::new();

    for domain in &report.domains {
        let _ = writeln!(
            out,
            "{}: +{} new (skipped {} text-duplicates, reassigned {} IDs)",
            domain.file, domain.added, domain.text_duplicates, domain.reassigned
        );
    }

    out.push_str("\nSummary\n");
    for domain in &report.domains {
        let _ = writeln!(
            out,
            "- {}: added {}, text-duplicates {}, reassigned IDs {}, total {}",
            domain.domain, domain.added, domain.text_duplicates, domain.reassigned, domain.total
        );
    }
    let _ = writeln!(out, "- Total added: {}", report.total_added());
    let _ = writeln!(out, "- Total questions: {}", report.total_questions());

    out.push_str("\nGroup details\n");
    for (name, stats) in report.groups.iter() {
        let _ = writeln!(
            out,
            "- {}: input {}, added {}, text-duplicates {}, reassigned IDs {}",
            name, stats.input, stats.added, stats.text_duplicates, stats.reassigned
        );
    }

    if options.show_duplicates && !report.duplicate_examples.is_empty() {
        out.push_str("\nDuplicate examples (by questionText)\n");
        for example in report
            .duplicate_examples
            .iter()
            .take(options.duplicate_example_limit)
        {
            let existing = example
                .existing_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "?".to_string());
            let _ = writeln!(
                out,
                "- {}: input id {} matches existing id {} | {}",
                example.domain, example.input_id, existing, example.question_text
            );
        }
    }

    if !report.committed {
        out.push_str("\nDry run: no bank file was written.\n");
    }

    out
}

pub fn render_bank_summary(summary: &BankSummary) -> String {
    let mut out = String::new();

    for status in &summary.banks {
        match status {
            BankStatus::Missing { file } => {
                let _ = writeln!(out, "{}: missing", file);
            }
            BankStatus::Invalid { file } => {
                let _ = writeln!(out, "{}: invalid (not an array)", file);
            }
            BankStatus::Loaded(_) => {}
        }
    }

    if summary.loaded().next().is_none() {
        out.push_str("No question banks found.\n");
        return out;
    }

    out.push_str("Question Bank Summary\n");
    for bank in summary.loaded() {
        summary_line(&mut out, bank.domain.as_str(), &bank.counts);
    }
    summary_line(&mut out, "Overall", &summary.overall());
    out.push_str("Note: group names are not stored in the bank files, so summary is by domain.\n");
    out
}

pub fn render_input_summary(summary: &InputSummary) -> String {
    let mut out = String::from("Input Summary\n");
    for domain in &summary.domains {
        summary_line(&mut out, domain.domain.as_str(), &domain.counts);
    }
    summary_line(&mut out, "Overall", &summary.overall());

    out.push_str("\nGroup details\n");
    for (name, counts) in summary.groups.iter() {
        summary_line(&mut out, name, counts);
    }
    out
}
