//! Output formatting and terminal rendering

use colored::Colorize;
use netlab::{InvariantViolation, Network, ViolationSeverity};

/// Print the network's one-line description followed by its counts
pub fn print_summary(network: &Network) {
    let summary = network.summary();

    println!("{}", network.to_string().bright_cyan());
    println!(
        "  nodes: {} ({} alive, {} dead, {} failed)",
        summary.node_count,
        summary.alive.to_string().green(),
        summary.dead,
        summary.failed.to_string().red()
    );
    if let Some(max_size) = summary.max_size {
        println!("  capacity: {}/{}", summary.node_count, max_size);
    }
    for (kind, count) in &summary.nodes_by_kind {
        println!("  {:<36} {}", kind, count);
    }
    println!("  vectors: {}", summary.vector_count);
}

fn severity_label(severity: ViolationSeverity) -> colored::ColoredString {
    match severity {
        ViolationSeverity::Info => "info".blue(),
        ViolationSeverity::Warning => "warning".yellow(),
        ViolationSeverity::Error => "error".red(),
        ViolationSeverity::Critical => "critical".red().bold(),
    }
}

pub fn print_violations(network: &Network, violations: &[InvariantViolation]) {
    println!("{}", network.to_string().bright_cyan());

    if violations.is_empty() {
        println!("  {}", "all invariants hold".green());
        return;
    }

    for violation in violations {
        println!(
            "  [{}] {}: {}",
            severity_label(violation.severity),
            violation.invariant_name,
            violation.message
        );
    }
}
