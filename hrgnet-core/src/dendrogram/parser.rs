//! Text decoding for the three-section dendrogram format.
//!
//! ```text
//! # tree
//! R A
//! R B
//! # probabilities
//! R 0.5
//! A 0.6
//! B 0.6
//! # sizes
//! A 4
//! B 4
//! ```
//!
//! Sections are separated by lines containing `#`. A leading `#` line is a
//! header only when the file carries exactly three markers.

use std::io::BufRead;

use crate::error::{DendrogramError, FormatError};

use super::DendrogramTables;

const SECTION_MARKER: char = '#';
const HEADED_MARKER_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Edges,
    Probabilities,
    Sizes,
}

impl Section {
    fn next(self) -> Option<Self> {
        match self {
            Self::Edges => Some(Self::Probabilities),
            Self::Probabilities => Some(Self::Sizes),
            Self::Sizes => None,
        }
    }
}

/// Decodes the raw tables without checking tree structure.
pub(crate) fn parse_tables<R: BufRead>(reader: R) -> Result<DendrogramTables, DendrogramError> {
    let lines = reader
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| DendrogramError::Io { source })?;

    let header = header_line(&lines);
    let mut tables = DendrogramTables::default();
    let mut section = Section::Edges;

    for (index, raw) in lines.iter().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || Some(index) == header {
            continue;
        }
        if text.contains(SECTION_MARKER) {
            section = section
                .next()
                .ok_or(FormatError::UnexpectedSection { line })?;
            continue;
        }

        let (node, value) = split_record(text, line)?;
        match section {
            Section::Edges => tables.edges.push((node.to_owned(), value.to_owned())),
            Section::Probabilities => {
                let probability = parse_probability(node, value, line)?;
                tables.probabilities.push((node.to_owned(), probability));
            }
            Section::Sizes => {
                let size = value.parse::<usize>().map_err(|_| FormatError::InvalidSize {
                    line,
                    node: node.to_owned(),
                    value: value.to_owned(),
                })?;
                tables.sizes.push((node.to_owned(), size));
            }
        }
    }
    Ok(tables)
}

fn header_line(lines: &[String]) -> Option<usize> {
    let markers = lines
        .iter()
        .filter(|line| line.contains(SECTION_MARKER))
        .count();
    if markers != HEADED_MARKER_COUNT {
        return None;
    }
    lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .filter(|&first| lines[first].contains(SECTION_MARKER))
}

fn split_record(text: &str, line: usize) -> Result<(&str, &str), FormatError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    match *fields.as_slice() {
        [node, value] => Ok((node, value)),
        _ => Err(FormatError::FieldCount {
            line,
            found: fields.len(),
        }),
    }
}

fn parse_probability(node: &str, value: &str, line: usize) -> Result<f64, FormatError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && (0.0..=1.0).contains(p))
        .ok_or_else(|| FormatError::InvalidProbability {
            line,
            node: node.to_owned(),
            value: value.to_owned(),
        })
}
