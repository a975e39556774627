//! Plain-text summary of a single analysis.

use crate::model::DocumentAnalysis;

/// Render a human-readable pagination report.
pub fn to_summary(analysis: &DocumentAnalysis) -> String {
    let mut out = String::new();

    out.push_str(&analysis.file_name);
    out.push('\n');
    out.push_str(&format!("  Pages:           {}\n", analysis.total_pages));
    out.push_str(&format!(
        "  Printed numbers: {} of {} resolved\n",
        analysis.total_pages - analysis.unresolved_pages(),
        analysis.total_pages
    ));
    out.push_str(&format!(
        "  Sequence:        {}\n",
        join_or(
            analysis
                .printed_page_sequence
                .iter()
                .map(|p| p.map_or_else(|| "-".to_string(), |n| n.to_string())),
            "-"
        )
    ));
    out.push_str(&format!(
        "  Missing pages:   {}\n",
        join_or(analysis.missing_pages().iter().map(u32::to_string), "none")
    ));
    out.push_str(&format!(
        "  Question gaps:   {}\n",
        join_or(analysis.question_gaps().iter().map(u32::to_string), "none")
    ));

    if analysis.page_summary.is_empty() {
        return out;
    }

    out.push_str("\n  Page  Printed  Questions\n");
    for (i, page) in analysis.page_summary.iter().enumerate() {
        let printed = page
            .printed_page
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let questions = match &page.range {
            Some(range) if page.question_starts.len() > 1 => format!(
                "{} ({})",
                range,
                join_or(page.question_starts.iter().map(u32::to_string), "")
            ),
            Some(range) => range.clone(),
            None => "-".to_string(),
        };
        out.push_str(&format!("  {:>4}  {:>7}  {}\n", i + 1, printed, questions));
    }

    out
}

fn join_or<I: Iterator<Item = String>>(items: I, empty: &str) -> String {
    let items: Vec<String> = items.collect();
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}
