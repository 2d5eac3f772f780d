use std::io::IsTerminal;
use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::checklist::Checklist;
use crate::scoring::{Activity, ScoreResult};
use crate::store::{format_timestamp, ResultRecord};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn paint_activity(text: &str, activity: Activity, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match activity {
        Activity::High => text.red().bold().to_string(),
        Activity::Low => text.green().to_string(),
    }
}

/// Numbered checklist, one descriptor per line: index, weight, title.
/// Descriptions are shown indented below when `with_descriptions` is set.
pub fn format_checklist(checklist: &Checklist, with_descriptions: bool, use_colors: bool) -> String {
    let term_width = get_terminal_width();

    checklist
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let index_str = format!("{:>2}.", idx + 1);
            let weight_str = format!("{:>2}", item.score);
            let mut line = if use_colors {
                format!("{} {}  {}", index_str.dimmed(), weight_str.bold(), item.title)
            } else {
                format!("{} {}  {}", index_str, weight_str, item.title)
            };

            if with_descriptions && !item.description.is_empty() {
                // Indent under the title: "NN. WW  "
                let indent = 8;
                let description = match term_width {
                    Some(width) if width > indent + 10 => {
                        truncate(&item.description, width - indent)
                    }
                    _ => item.description.clone(),
                };
                let description = if use_colors {
                    description.dimmed().to_string()
                } else {
                    description
                };
                line.push_str(&format!("\n{:indent$}{}", "", description, indent = indent));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Total, classification and the per-descriptor breakdown
pub fn format_score_result(result: &ScoreResult, use_colors: bool) -> String {
    let total = format!("SLEDAI score: {}", result.total);
    let total = if use_colors {
        total.bold().to_string()
    } else {
        total
    };
    let classification = paint_activity(result.activity.label(), result.activity, use_colors);

    let mut lines = vec![format!("{} ({})", total, classification)];
    if result.contributions.is_empty() {
        lines.push("  No descriptors selected.".to_string());
    }
    for contribution in &result.contributions {
        lines.push(format!(
            "  {:>2}. {:<40} +{}",
            contribution.index + 1,
            contribution.title,
            contribution.points
        ));
    }
    lines.join("\n")
}

/// History as a table, newest first: index, date, score, classification, age.
pub fn format_history_table(records: &[ResultRecord], now: DateTime<Utc>, use_colors: bool) -> String {
    if records.is_empty() {
        return "No saved results.".to_string();
    }

    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let activity = Activity::classify(record.score);
            let index_str = format!("{:>3}.", idx + 1);
            let date_str = record.date.format("%Y-%m-%d %H:%M").to_string();
            let score_str = format!("{:>3}", record.score);
            let age_str = format!("{:>4}", format_age(now - record.date));

            if use_colors {
                format!(
                    "{} {}  {}  {:<13}  {}",
                    index_str.dimmed(),
                    date_str,
                    score_str.bold(),
                    paint_activity(activity.label(), activity, true),
                    age_str.dimmed()
                )
            } else {
                format!(
                    "{} {}  {}  {:<13}  {}",
                    index_str,
                    date_str,
                    score_str,
                    activity.label(),
                    age_str
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// History as tab-separated values for scripting
/// Columns: id, date, score, classification (no headers, no colors)
pub fn format_history_tsv(records: &[ResultRecord]) -> String {
    records
        .iter()
        .map(|record| {
            format!(
                "{}\t{}\t{}\t{}",
                record.id,
                format_timestamp(&record.date),
                record.score,
                Activity::classify(record.score).label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}
