//! Text and JSON rendering of tracker state.

use std::fmt::Write;

use anyhow::Result;
use thon_core::{
    EntryLog, Status, TimeEntry, TimeStats, TimerState, format_clock, format_hours_minutes,
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Formats the current timer.
pub fn format_status(status: &Status<'_>) -> String {
    let mut output = String::new();

    let Some(entry) = status.entry else {
        writeln!(output, "Idle. Use `start <title> -c <category>` to begin.").unwrap();
        return output;
    };

    let state = match status.state {
        TimerState::Running => "Running",
        TimerState::Paused => "Paused",
        TimerState::Idle => "Idle",
    };
    writeln!(output, "{state}  {}", status.elapsed_display()).unwrap();
    writeln!(output, "  {} ({})", entry.title(), entry.category()).unwrap();
    if !entry.labels().is_empty() {
        writeln!(output, "  labels: {}", join_labels(entry)).unwrap();
    }
    writeln!(
        output,
        "  started: {}",
        entry.start_time().format(TIME_FORMAT)
    )
    .unwrap();
    output
}

/// Formats the entry log, newest first.
pub fn format_entries(entries: &EntryLog) -> String {
    let mut output = String::new();

    if entries.is_empty() {
        writeln!(output, "No entries yet.").unwrap();
        return output;
    }

    for entry in entries {
        let duration = entry.duration_seconds().unwrap_or(0);
        writeln!(
            output,
            "- {}  {}",
            entry.title(),
            format_hours_minutes(duration)
        )
        .unwrap();
        if !entry.description().is_empty() {
            writeln!(output, "  {}", entry.description()).unwrap();
        }
        writeln!(output, "  category: {}", entry.category()).unwrap();
        if !entry.labels().is_empty() {
            writeln!(output, "  labels: {}", join_labels(entry)).unwrap();
        }
        if let Some(active) = entry.active_seconds() {
            writeln!(output, "  active: {}", format_clock(active)).unwrap();
        }
        writeln!(
            output,
            "  started: {}",
            entry.start_time().format(TIME_FORMAT)
        )
        .unwrap();
        writeln!(output, "  id: {}", entry.id()).unwrap();
    }
    output
}

pub fn format_entries_json(entries: &EntryLog) -> Result<String> {
    let list: Vec<&TimeEntry> = entries.iter().collect();
    Ok(serde_json::to_string_pretty(&list)?)
}

/// Formats totals: overall, then per category and per label.
pub fn format_stats(stats: &TimeStats) -> String {
    let mut output = String::new();
    writeln!(
        output,
        "Total: {}",
        format_hours_minutes(stats.total_seconds)
    )
    .unwrap();

    for (heading, buckets) in [
        ("By category", &stats.by_category),
        ("By label", &stats.by_label),
    ] {
        writeln!(output).unwrap();
        writeln!(output, "{heading}:").unwrap();
        if buckets.is_empty() {
            writeln!(output, "  (none)").unwrap();
            continue;
        }
        let width = buckets.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        for (name, seconds) in buckets {
            writeln!(
                output,
                "  {name:<width$}  {}",
                format_hours_minutes(*seconds)
            )
            .unwrap();
        }
    }
    output
}

pub fn format_stats_json(stats: &TimeStats) -> Result<String> {
    Ok(serde_json::to_string_pretty(stats)?)
}

fn join_labels(entry: &TimeEntry) -> String {
    entry.labels().iter().collect::<Vec<_>>().join(", ")
}
