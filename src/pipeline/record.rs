use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::config::Heuristics;
use crate::pipeline::roles::RoleMap;
use crate::schema::Schema;
use crate::types::cell;

static TWO_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s*[-:]\s*(\d+)$").unwrap());
static THREE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s*-\s*(\d+)\s*-\s*(\d+)$").unwrap());

/// Win/loss(/tie) counts captured out of one combined cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordCapture {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

fn pattern_for(schema: Schema) -> &'static Regex {
    if schema.tracks_ties() {
        &THREE_FIELD
    } else {
        &TWO_FIELD
    }
}

/// Looks for a column that encodes the whole record as one token per cell
/// ("4-1", "12:3", or "4-1-0" in tie schemas). Only runs while wins or
/// losses is unresolved; the first column (name excluded) where more than
/// the configured share of data rows matches is taken.
pub fn detect_record_column(
    data_rows: &[Vec<String>],
    roles: &RoleMap,
    schema: Schema,
    heuristics: &Heuristics,
) -> Option<usize> {
    if roles.wins.is_some() && roles.losses.is_some() {
        return None;
    }
    if data_rows.is_empty() {
        return None;
    }

    let pattern = pattern_for(schema);
    let width = data_rows.iter().map(|row| row.len()).max().unwrap_or(0);
    for col in 0..width {
        if roles.name == Some(col) {
            continue;
        }
        let hits = data_rows
            .iter()
            .filter(|row| pattern.is_match(cell(row, col).trim()))
            .count();
        if hits as f64 / data_rows.len() as f64 > heuristics.record_hit_rate {
            debug!(column = col, hits, rows = data_rows.len(), "combined record column detected");
            return Some(col);
        }
    }
    None
}

/// Captures the counts from one combined cell; anything that does not match
/// the schema's pattern yields all zeros.
pub fn capture(cell_text: &str, schema: Schema) -> RecordCapture {
    match pattern_for(schema).captures(cell_text.trim()) {
        Some(caps) => RecordCapture {
            wins: capture_int(&caps, 1),
            losses: capture_int(&caps, 2),
            ties: if schema.tracks_ties() {
                capture_int(&caps, 3)
            } else {
                0
            },
        },
        None => RecordCapture::default(),
    }
}

fn capture_int(caps: &Captures<'_>, idx: usize) -> u32 {
    caps.get(idx)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
