use colored::Colorize;
use harvester_core::{ChannelConfigError, Report};
use harvester_engine::SelectionRound;

/// Consolidated end-of-run output: problems in red, then the totals.
pub fn print_report(report: &Report) {
    let lines = report.problem_lines();
    if !lines.is_empty() {
        println!();
        for line in &lines {
            println!("{}", line.red());
        }
    }
    let done = format!(
        "Downloaded {} image(s), {} failed.",
        report.downloaded,
        report.failed.len()
    );
    if report.has_problems() {
        println!("{}", done.yellow());
    } else {
        println!("{}", done.green());
    }
}

/// Dry-run listing of what would be downloaded and where.
pub fn print_selection(round: &SelectionRound, rejected: &[ChannelConfigError]) {
    println!();
    for batch in &round.batches {
        let header = format!("{} ({} selected)", batch.channel_id, batch.candidates.len());
        println!("{}", header.bold());
        for candidate in &batch.candidates {
            println!(
                "  {} -> {}",
                candidate.source_url,
                batch.target_path(candidate).display()
            );
        }
    }

    let report = Report {
        shortfalls: round.shortfalls.clone(),
        channels: round.channels.clone(),
        rejected_configs: rejected.to_vec(),
        ..Report::default()
    };
    for line in report.problem_lines() {
        println!("{}", line.red());
    }
}
