//! Extraction of a raw table from the text of the published scoring
//! document.
//!
//! The input is the document's text with pages separated by form feeds
//! (what `pdftotext` produces). A scoring page has a fixed number of
//! non-blank lines: a section title, a row of column titles, value rows and
//! a trailing page number. Every other page is skipped.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use super::raw::{RawCell, RawTable};
use crate::mark::parse_time;

/// Fixes applied, in order, to title and value lines before splitting.
const LINE_REPLACEMENTS: &[(&str, &str)] = &[
    ("ix", "-MX"),
    (" sh", "-SH"),
    (" km", "000m"),
    ("km", "000m"),
    (" Miles", "Mile"),
    (" SC", "-SC"),
    (",", ""),
    ("t.", "t"),
    ("W", "-RW"),
];

const PAGE_SEPARATOR: char = '\u{c}';
const MISSING: &str = "-";
const POINTS_TITLE: &str = "Points";

/// Knobs for reading a scoring document
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Line count identifying a scoring page. Blank lines are not counted.
    pub page_lines: usize,
    /// Highest point value; the table runs from here down to 1
    pub max_points: i64,
    /// Convert time strings to seconds while reading
    pub convert_time_strings: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            page_lines: 53,
            max_points: 1400,
            convert_time_strings: true,
        }
    }
}

/// Read a document text file and extract its table.
///
/// `progress` is called with the 1-based page number and page count.
pub fn extract_from_document<F>(path: &Path, options: &ExtractOptions, progress: F) -> Result<RawTable>
where
    F: FnMut(usize, usize),
{
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read document text at {}", path.display()))?;

    let pages: Vec<&str> = text.split(PAGE_SEPARATOR).collect();
    extract_pages(&pages, options, progress)
        .with_context(|| format!("Failed to extract points table from {}", path.display()))
}

/// Extract a table from already separated pages.
pub fn extract_pages<F>(pages: &[&str], options: &ExtractOptions, mut progress: F) -> Result<RawTable>
where
    F: FnMut(usize, usize),
{
    let mut table = RawTable::with_points((1..=options.max_points).rev());

    for (i, page) in pages.iter().enumerate() {
        progress(i + 1, pages.len());

        let lines: Vec<&str> = page.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.len() != options.page_lines || lines.len() < 3 {
            continue;
        }

        // Drop the page number; the rest is title, column titles, rows
        let body = &lines[..lines.len() - 1];
        let section = body[0].to_lowercase();
        let gender = if section.contains("women") { "W-" } else { "M-" };
        let road = if section.contains("road") { "-RD" } else { "" };

        let header = normalize_line(body[1]);
        let titles: Vec<&str> = header.split_whitespace().collect();

        for (row, line) in body[2..].iter().enumerate() {
            let line = normalize_line(line);
            let values: Vec<&str> = line.split_whitespace().collect();
            if values.len() != titles.len() {
                bail!(
                    "page {} row {}: {} values for {} columns",
                    i + 1,
                    row + 1,
                    values.len(),
                    titles.len()
                );
            }

            for (title, value) in titles.iter().zip(values) {
                if *title == POINTS_TITLE {
                    continue;
                }
                let event = format!("{}{}{}", gender, title, road);
                let cell = read_cell(value, options.convert_time_strings)
                    .with_context(|| format!("page {} row {} column {}", i + 1, row + 1, title))?;
                table.push_cell(&event, cell);
            }
        }
    }

    Ok(table)
}

fn normalize_line(line: &str) -> String {
    LINE_REPLACEMENTS
        .iter()
        .fold(line.to_string(), |acc, (from, to)| acc.replace(from, to))
}

fn read_cell(value: &str, convert_time_strings: bool) -> Result<Option<RawCell>> {
    if value == MISSING {
        return Ok(None);
    }
    if convert_time_strings {
        Ok(Some(RawCell::Number(parse_time(value)?)))
    } else {
        Ok(Some(RawCell::Text(value.to_string())))
    }
}
