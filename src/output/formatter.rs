use std::io::IsTerminal;
use owo_colors::OwoColorize;

use crate::event::{EventKey, Gender, Modifier};
use crate::mark::Mark;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a scored or converted mark as one line
/// Format: "{points} pts | {mark} | {event}"
pub fn format_mark(mark: &Mark, use_colors: bool) -> String {
    let points = format_points(mark.points());

    if use_colors {
        format!(
            "{} | {} | {}",
            points.bold(),
            mark.display().green(),
            mark.event().cyan()
        )
    } else {
        format!("{} | {} | {}", points, mark.display(), mark.event())
    }
}

/// Format a mark with detailed multi-line output (for verbose mode)
pub fn format_mark_detail(mark: &Mark, use_colors: bool) -> String {
    let description = mark
        .event()
        .parse::<EventKey>()
        .map(|key| describe_event(&key))
        .unwrap_or_else(|_| mark.event().to_string());
    let points = format_points(mark.points());

    if use_colors {
        format!(
            "{}\n  Event: {}\n  Value: {}\n  Points: {}",
            mark.display().bold(),
            description.cyan(),
            mark.value(),
            points.yellow()
        )
    } else {
        format!(
            "{}\n  Event: {}\n  Value: {}\n  Points: {}",
            mark.display(),
            description,
            mark.value(),
            points
        )
    }
}

fn format_points(points: Option<i64>) -> String {
    match points {
        Some(p) => format!("{} pts", p),
        None => "unscored".to_string(),
    }
}

/// Human-readable description, e.g. "Women's 20000m (racewalk, road)"
pub fn describe_event(key: &EventKey) -> String {
    let gender = match key.gender() {
        Gender::Men => "Men's",
        Gender::Women => "Women's",
    };
    let modifiers: Vec<&str> = key.modifiers().map(modifier_name).collect();

    if modifiers.is_empty() {
        format!("{} {}", gender, key.discipline())
    } else {
        format!("{} {} ({})", gender, key.discipline(), modifiers.join(", "))
    }
}

fn modifier_name(modifier: Modifier) -> &'static str {
    match modifier {
        Modifier::ShortTrack => "short track",
        Modifier::Racewalk => "racewalk",
        Modifier::Steeplechase => "steeplechase",
        Modifier::Mixed => "mixed",
        Modifier::RoadRace => "road",
    }
}

/// Format event keys one per line, key first, description after
pub fn format_event_list(events: &[&EventKey], use_colors: bool) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }

    let width = events.iter().map(|k| k.to_string().len()).max().unwrap_or(0);

    events
        .iter()
        .map(|key| {
            let name = format!("{:<width$}", key.to_string(), width = width);
            let description = describe_event(key);
            if use_colors {
                format!("{}  {}", name.bold(), description.dimmed())
            } else {
                format!("{}  {}", name, description)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format marks as tab-separated values for scripting
/// Columns: event, mark, seconds, points (no headers, no colors)
pub fn format_tsv(marks: &[&Mark]) -> String {
    marks
        .iter()
        .map(|mark| {
            format!(
                "{}\t{}\t{}\t{}",
                mark.event(),
                mark.display(),
                mark.value(),
                mark.points().map(|p| p.to_string()).unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
