// Leaderboard extraction pipeline: discovery, header resolution, role
// inference, record detection, normalization, ordering, rendering.

pub mod discover;
pub mod header;
pub mod normalize;
pub mod record;
pub mod render;
pub mod roles;

// Re-export the pieces callers normally need
pub use discover::discover_table;
pub use render::render_block;
pub use roles::{resolve_roles, Role, RoleMap};

use tracing::debug;

use crate::config::Heuristics;
use crate::schema::Schema;
use crate::types::{CompetitorRecord, PageContext, RawTable};

/// Discovery plus header resolution: page contexts in, a table whose row 0
/// is a usable header out. The result may still be empty when the context
/// tree holds no tables at all.
pub fn extract_rows(context: &PageContext, schema: Schema, heuristics: &Heuristics) -> RawTable {
    let table = discover::discover_table(context, schema, heuristics);
    header::resolve_header(table, schema)
}

/// Role inference through ordering for an already-extracted table.
pub fn build_records(
    table: &RawTable,
    schema: Schema,
    heuristics: &Heuristics,
    max_rows: Option<usize>,
) -> Vec<CompetitorRecord> {
    let header = table.rows.first().map(Vec::as_slice).unwrap_or(&[]);
    let data = table.data_rows();
    let roles = roles::resolve_roles(header, data, schema, heuristics);
    let record_col = record::detect_record_column(data, &roles, schema, heuristics);
    let records = normalize::normalize_rows(table, &roles, record_col, schema, max_rows);
    normalize::order_records(records, schema.ordering())
}

/// Full run over one page context. `None` when the extracted table has
/// fewer than two rows (no usable header plus data), which is the caller's
/// cue to fall back to the "no table found" message.
pub fn run_pipeline(
    context: &PageContext,
    schema: Schema,
    heuristics: &Heuristics,
    max_rows: Option<usize>,
) -> Option<String> {
    let table = extract_rows(context, schema, heuristics);
    if table.rows.len() < 2 {
        debug!(rows = table.rows.len(), "extracted table too small to render");
        return None;
    }
    let records = build_records(&table, schema, heuristics, max_rows);
    Some(render::render_block(&records, schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TableGrab;

    fn grab(rows: &[&[&str]]) -> TableGrab {
        TableGrab::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn full_run_renders_a_block() {
        let context = PageContext::new(
            vec![grab(&[
                &["#", "Name", "Pts", "W", "L"],
                &["2", "Bob", "9", "3", "2"],
                &["1", "Alice", "12", "4", "1"],
            ])],
            vec![],
        );
        let block = run_pipeline(
            &context,
            Schema::RankPoints,
            &Heuristics::default(),
            None,
        )
        .expect("block");
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "```");
        assert_eq!(lines[1], Schema::RankPoints.header_line());
        // Rank order puts Alice first despite source order.
        assert!(lines[2].contains("Alice"));
        assert!(lines[3].contains("Bob"));
        assert_eq!(lines[4], "```");
    }

    #[test]
    fn header_only_table_yields_no_block() {
        let context = PageContext::new(vec![grab(&[&["Name", "W", "L"]])], vec![]);
        let block = run_pipeline(&context, Schema::WinLoss, &Heuristics::default(), None);
        assert_eq!(block, None);
    }

    #[test]
    fn empty_context_yields_no_block() {
        let context = PageContext::default();
        let block = run_pipeline(&context, Schema::WinLoss, &Heuristics::default(), None);
        assert_eq!(block, None);
    }

    #[test]
    fn headerless_table_still_renders_via_synthesis() {
        // No header row anywhere; one gets synthesized and the original
        // rows all stay data rows.
        let context = PageContext::new(
            vec![grab(&[&["Alice", "4", "1"], &["Bob", "3", "2"]])],
            vec![],
        );
        let block = run_pipeline(&context, Schema::WinLoss, &Heuristics::default(), None)
            .expect("block");
        assert!(block.contains("Alice"));
        assert!(block.contains("Bob"));
    }
}
