use crate::schema::Schema;
use crate::types::CompetitorRecord;

const FENCE: &str = "```";

/// Renders the normalized records as a fenced monospace block: fence,
/// schema header line, one fixed-width row per record, fence.
pub fn render_block(records: &[CompetitorRecord], schema: Schema) -> String {
    let mut lines = Vec::with_capacity(records.len() + 3);
    lines.push(FENCE.to_string());
    lines.push(schema.header_line().to_string());
    for record in records {
        lines.push(render_row(record, schema));
    }
    lines.push(FENCE.to_string());
    lines.join("\n")
}

/// One row at fixed field widths with two-space separators: rank right in 2,
/// name left in 24, points right in 3, counts right in 2. Absent rank and
/// points render as empty fields; counts always render their integer.
fn render_row(record: &CompetitorRecord, schema: Schema) -> String {
    let name = clip_name(&record.name);
    match schema {
        Schema::RankPoints => {
            let rank = record.rank.map(|r| r.to_string()).unwrap_or_default();
            let points = record.points.as_deref().unwrap_or("");
            format!(
                "{:>2}  {:<24}  {:>3}  {:>2}  {:>2}",
                rank, name, points, record.wins, record.losses
            )
        }
        Schema::WinLoss => {
            format!("{:<24}  {:>2}  {:>2}", name, record.wins, record.losses)
        }
        Schema::WinLossTie => {
            format!(
                "{:<24}  {:>2}  {:>2}  {:>2}",
                name, record.wins, record.losses, record.ties
            )
        }
    }
}

/// Names longer than the 24-char field keep their first 23 chars plus an
/// ellipsis. Counted in chars, not bytes.
fn clip_name(name: &str) -> String {
    if name.chars().count() > 24 {
        let mut clipped: String = name.chars().take(23).collect();
        clipped.push('…');
        clipped
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, wins: u32, losses: u32) -> CompetitorRecord {
        CompetitorRecord {
            name: name.to_string(),
            wins,
            losses,
            ..CompetitorRecord::default()
        }
    }

    #[test]
    fn rank_points_row_lines_up() {
        let rec = CompetitorRecord {
            name: "Alice".to_string(),
            rank: Some(1),
            wins: 4,
            losses: 1,
            ties: 0,
            points: Some("12".to_string()),
        };
        assert_eq!(
            render_row(&rec, Schema::RankPoints),
            " 1  Alice                      12   4   1"
        );
    }

    #[test]
    fn absent_rank_and_points_render_empty_fields() {
        let rec = CompetitorRecord {
            name: "Bob".to_string(),
            rank: None,
            wins: 0,
            losses: 12,
            ties: 0,
            points: None,
        };
        assert_eq!(
            render_row(&rec, Schema::RankPoints),
            "    Bob                             0  12"
        );
    }

    #[test]
    fn win_loss_tie_row_carries_three_counts() {
        let rec = CompetitorRecord {
            ties: 3,
            ..record("Carol", 10, 0)
        };
        assert_eq!(
            render_row(&rec, Schema::WinLossTie),
            "Carol                     10   0   3"
        );
    }

    #[test]
    fn long_names_clip_to_23_chars_and_ellipsis() {
        let rec = record("ABCDEFGHIJKLMNOPQRSTUVWXYZ1234", 4, 1);
        let row = render_row(&rec, Schema::WinLoss);
        assert_eq!(row, "ABCDEFGHIJKLMNOPQRSTUVW…   4   1");
        assert_eq!(clip_name(&rec.name).chars().count(), 24);
    }

    #[test]
    fn clipping_counts_chars_not_bytes() {
        let name = "Łukasz Grzegorz Brzęczyszczykiewicz";
        let clipped = clip_name(name);
        assert_eq!(clipped.chars().count(), 24);
        assert!(clipped.ends_with('…'));
        assert!(clipped.starts_with("Łukasz Grzegorz Brzęczy"));
    }

    #[test]
    fn exact_24_char_name_is_untouched() {
        let name = "abcdefghijklmnopqrstuvwx";
        assert_eq!(name.chars().count(), 24);
        assert_eq!(clip_name(name), name);
    }

    #[test]
    fn block_wraps_header_and_rows_in_fences() {
        let records = vec![record("Alice", 4, 1)];
        assert_eq!(
            render_block(&records, Schema::WinLoss),
            "```\nName                      W   L\nAlice                      4   1\n```"
        );
    }

    #[test]
    fn block_with_no_records_is_header_only() {
        assert_eq!(
            render_block(&[], Schema::WinLoss),
            "```\nName                      W   L\n```"
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let records = vec![record("Alice", 4, 1), record("Bob", 3, 2)];
        let first = render_block(&records, Schema::WinLossTie);
        let second = render_block(&records, Schema::WinLossTie);
        assert_eq!(first, second);
    }
}
