//! Terminal output formatting.

use colored::Colorize;

use docgraph_graph::{CommitSummary, CypherStatement, GraphCounts, ParamValue};

pub fn print_header(title: &str) {
    println!("{}", title.bold());
    println!("{}", "─".repeat(50));
}

/// Print a statement and its parameters.
pub fn print_statement(reference: &str, kind: &str, statement: &CypherStatement) {
    let kind = match kind {
        "upsert" => kind.green(),
        "delete" => kind.red(),
        _ => kind.normal(),
    };
    println!("{} {}", kind.bold(), reference.cyan());
    println!("  {}", statement.text);
    for (key, value) in &statement.params {
        println!("  {} {}", format!("${}", key).dimmed(), format_param(value));
    }
    println!();
}

fn format_param(value: &ParamValue) -> String {
    match value {
        ParamValue::Null => "null".dimmed().to_string(),
        ParamValue::String(s) => truncate(s, 60),
        ParamValue::List(items) => format!("[{}]", items.join(", ")),
        ParamValue::Map(map) => format!("{{{} entries}}", map.len()),
    }
}

pub fn print_summary(summary: &CommitSummary) {
    println!("\n{}", "Batch committed:".green().bold());
    println!("  Upserts: {}", summary.upserts);
    println!("  Deletes: {}", summary.deletes);
}

pub fn print_counts(label: &str, counts: &GraphCounts) {
    println!("  {:<16} {}", "Label:", label.cyan());
    println!("  {:<16} {}", "Nodes:", counts.nodes);
    println!("  {:<16} {}", "Relationships:", counts.relationships);
}

/// Truncate on a char boundary, appending an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
