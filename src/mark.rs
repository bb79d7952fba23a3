use std::fmt;

use crate::error::{Result, ScoringError};
use crate::event::EventKey;

/// A single performance for one event.
///
/// Built either from its formatted form ([`Mark::parse`]) or from its
/// numeric value ([`Mark::from_numeric`]); both fields are populated either
/// way. Only `points` changes after construction, when a table scores it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    event: String,
    display: String,
    value: f64,
    points: Option<i64>,
}

impl Mark {
    /// Parse a formatted mark such as `"9.58"`, `"4:03.21"` or
    /// `"2:05:03.00"`.
    pub fn parse(event: impl Into<String>, display: &str) -> Result<Self> {
        let value = parse_time(display)?;
        Ok(Self {
            event: event.into(),
            display: display.trim().to_string(),
            value,
            points: None,
        })
    }

    /// Wrap a numeric mark (seconds, metres or combined-event score).
    pub fn from_numeric(event: impl Into<String>, value: f64) -> Self {
        let event = event.into();
        let is_field = event
            .parse::<EventKey>()
            .map(|key| key.is_field())
            .unwrap_or(false);

        let display = if is_field {
            format!("{:.2}", value)
        } else {
            format_time(value)
        };

        Self {
            event,
            display,
            value,
            points: None,
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn points(&self) -> Option<i64> {
        self.points
    }

    pub(crate) fn set_points(&mut self, points: i64) {
        self.points = Some(points);
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({}s)", self.event, self.display, self.value)?;
        if let Some(points) = self.points {
            write!(f, " - {} Points", points)?;
        }
        Ok(())
    }
}

/// Convert a formatted mark to seconds.
///
/// Grammar: a plain finite number, `MM:SS[.ff]` or `HH:MM:SS[.ff]`. Leading
/// segments must be unsigned integers; two segments always mean
/// minutes and seconds.
pub fn parse_time(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ScoringError::format(text, "empty mark"));
    }

    if !trimmed.contains(':') {
        return match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ScoringError::format(text, "not a number")),
        };
    }

    let segments: Vec<&str> = trimmed.split(':').collect();
    let (seconds, leading) = match segments.split_last() {
        Some((seconds, leading)) if (1..=2).contains(&leading.len()) => (*seconds, leading),
        _ => {
            return Err(ScoringError::format(
                text,
                "expected MM:SS[.ff] or HH:MM:SS[.ff]",
            ))
        }
    };

    let mut total = 0.0;
    for segment in leading {
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ScoringError::format(
                text,
                format!("'{}' is not a whole number", segment),
            ));
        }
        let whole: f64 = segment
            .parse()
            .map_err(|_| ScoringError::format(text, format!("'{}' is out of range", segment)))?;
        total = total * 60.0 + whole;
    }

    if !is_unsigned_decimal(seconds) {
        return Err(ScoringError::format(
            text,
            format!("'{}' is not a seconds value", seconds),
        ));
    }
    let seconds: f64 = seconds
        .parse()
        .map_err(|_| ScoringError::format(text, "seconds out of range"))?;

    Ok(total * 60.0 + seconds)
}

fn is_unsigned_decimal(s: &str) -> bool {
    let mut parts = s.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let fraction = parts.next().unwrap_or("");
    (!whole.is_empty() || !fraction.is_empty())
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

/// Render seconds as a conventional time string.
///
/// Hundredths are rounded first. Hours are omitted when zero, minutes too
/// (`"9.58"`); with minutes the seconds are padded to `SS.ss`
/// (`"4:03.21"`), with hours to width 6 (`"2:05:003.00"`).
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() {
        return seconds.to_string();
    }

    let hundredths = (seconds.abs() * 100.0).round() as u64;
    let sign = if seconds < 0.0 && hundredths > 0 { "-" } else { "" };

    let hours = hundredths / 360_000;
    let minutes = hundredths % 360_000 / 6_000;
    let secs = format!("{:.2}", (hundredths % 6_000) as f64 / 100.0);

    if hours > 0 {
        format!("{}{}:{:02}:{:0>6}", sign, hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}{}:{:0>5}", sign, minutes, secs)
    } else {
        format!("{}{}", sign, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_minute_time() {
        let mark = Mark::parse("M-1500m", "4:03.21").unwrap();
        assert_relative_eq!(mark.value(), 243.21, epsilon = 1e-9);
        assert_eq!(mark.display(), "4:03.21");
        assert_eq!(mark.points(), None);
    }

    #[test]
    fn test_parse_sub_minute_time() {
        let mark = Mark::parse("M-100m", "9.58").unwrap();
        assert_eq!(mark.value(), 9.58);
        assert_eq!(mark.display(), "9.58");
    }

    #[test]
    fn test_parse_hour_time() {
        let seconds = parse_time("2:01:09").unwrap();
        assert_relative_eq!(seconds, 7269.0);
        let seconds = parse_time("1:02:03.5").unwrap();
        assert_relative_eq!(seconds, 3723.5);
    }

    #[test]
    fn test_two_segments_are_minutes_seconds() {
        assert_relative_eq!(parse_time("12:30").unwrap(), 750.0);
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        for bad in ["", "abc", "1:2:3:4", ":30", "1::30", "1:30:", "4:0x.21", "-1:30", "1.5:30", "inf"] {
            let result = parse_time(bad);
            assert!(
                matches!(result, Err(ScoringError::Format { .. })),
                "expected format error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_from_numeric_minute_time() {
        let mark = Mark::from_numeric("M-1500m", 243.21);
        assert_eq!(mark.display(), "4:03.21");
        assert_eq!(mark.value(), 243.21);
    }

    #[test]
    fn test_from_numeric_field_event() {
        let mark = Mark::from_numeric("M-DT", 65.0);
        assert_eq!(mark.display(), "65.00");
    }

    #[test]
    fn test_format_time_shapes() {
        assert_eq!(format_time(9.58), "9.58");
        assert_eq!(format_time(60.0), "1:00.00");
        assert_eq!(format_time(243.21), "4:03.21");
        assert_eq!(format_time(754.35), "12:34.35");
        assert_eq!(format_time(7503.0), "2:05:003.00");
        assert_eq!(format_time(3600.0), "1:00:000.00");
    }

    #[test]
    fn test_format_time_rounds_before_splitting() {
        assert_eq!(format_time(119.999), "2:00.00");
    }

    #[test]
    fn test_format_time_negative_extrapolation() {
        assert_eq!(format_time(-1.5), "-1.50");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for seconds in [9.58, 47.33, 243.21, 1600.5, 7503.0] {
            let formatted = format_time(seconds);
            assert_relative_eq!(parse_time(&formatted).unwrap(), seconds, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_display_with_points() {
        let mut mark = Mark::parse("M-100m", "9.58").unwrap();
        assert_eq!(mark.to_string(), "M-100m - 9.58 (9.58s)");
        mark.set_points(1356);
        assert_eq!(mark.to_string(), "M-100m - 9.58 (9.58s) - 1356 Points");
    }
}
