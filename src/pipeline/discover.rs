use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::Heuristics;
use crate::schema::Schema;
use crate::types::{PageContext, RawTable, TableGrab};

static STANDALONE_W: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bw\b").unwrap());
static STANDALONE_L: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bl\b").unwrap());
static DIGIT_DASH_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d\s*-\s*\d").unwrap());

/// Relevance score of one table's flattened lowercase text. Keyword groups
/// score independently; the ties group only counts when the schema tracks
/// ties.
pub fn score_table(text: &str, schema: Schema, heuristics: &Heuristics) -> u32 {
    let mut score = 0;
    if text.contains("rank") || text.contains('#') {
        score += heuristics.rank_weight;
    }
    if text.contains("name") || text.contains("player") || text.contains("team") {
        score += heuristics.name_weight;
    }
    if text.contains("wins") || STANDALONE_W.is_match(text) {
        score += heuristics.wins_weight;
    }
    if text.contains("losses") || STANDALONE_L.is_match(text) {
        score += heuristics.losses_weight;
    }
    if text.contains("points") || text.contains("pts") || text.contains("score") {
        score += heuristics.points_weight;
    }
    if schema.tracks_ties() {
        if text.contains("ties") || text.contains("draw") {
            score += heuristics.ties_weight;
        }
        if DIGIT_DASH_DIGIT.is_match(text) {
            score += heuristics.record_hint_weight;
        }
    }
    score
}

/// Best-scoring table of one context. The scan keeps the first table on
/// score ties, and because every table scores at least zero, a context whose
/// tables are all irrelevant still yields its first table.
fn select_table<'a>(
    ctx: &'a PageContext,
    schema: Schema,
    heuristics: &Heuristics,
) -> Option<&'a TableGrab> {
    let mut best: Option<(&TableGrab, u32)> = None;
    for (idx, table) in ctx.tables.iter().enumerate() {
        let score = score_table(&table.text, schema, heuristics);
        debug!(table = idx, score, "scored candidate table");
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((table, score)),
        }
    }
    best.map(|(table, _)| table)
}

/// Locates the most likely standings table in a context tree. The current
/// context is tried first; when it yields no rows (no tables, or the
/// selected table is empty) the search recurses depth-first into child
/// contexts and returns the first non-empty result.
pub fn discover_table(ctx: &PageContext, schema: Schema, heuristics: &Heuristics) -> RawTable {
    if let Some(table) = select_table(ctx, schema, heuristics) {
        if !table.rows.is_empty() {
            debug!(rows = table.rows.len(), "selected standings table");
            return RawTable::new(table.rows.clone());
        }
    }
    for child in &ctx.children {
        let found = discover_table(child, schema, heuristics);
        if !found.is_empty() {
            debug!("standings table found in a nested context");
            return found;
        }
    }
    RawTable::default()
}
