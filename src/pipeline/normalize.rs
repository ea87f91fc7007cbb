use crate::pipeline::record;
use crate::pipeline::roles::RoleMap;
use crate::schema::{OrderingPolicy, Schema};
use crate::types::{cell, parse_cell_int, CompetitorRecord, RawTable};

/// Builds one CompetitorRecord per data row, up to `max_rows`. A detected
/// combined-record column supplies wins/losses/ties for every row; otherwise
/// each count reads its own resolved column. Parse failures never drop a
/// row, the field just defaults.
pub fn normalize_rows(
    table: &RawTable,
    roles: &RoleMap,
    record_col: Option<usize>,
    schema: Schema,
    max_rows: Option<usize>,
) -> Vec<CompetitorRecord> {
    table
        .data_rows()
        .iter()
        .take(max_rows.unwrap_or(usize::MAX))
        .map(|row| build_record(row, roles, record_col, schema))
        .collect()
}

fn build_record(
    row: &[String],
    roles: &RoleMap,
    record_col: Option<usize>,
    schema: Schema,
) -> CompetitorRecord {
    let (wins, losses, ties) = match record_col {
        Some(col) => {
            let capture = record::capture(cell(row, col), schema);
            (capture.wins, capture.losses, capture.ties)
        }
        None => (
            count_at(row, roles.wins),
            count_at(row, roles.losses),
            count_at(row, roles.ties),
        ),
    };
    CompetitorRecord {
        name: roles
            .name
            .map(|col| cell(row, col).trim().to_string())
            .unwrap_or_default(),
        rank: roles
            .rank
            .and_then(|col| parse_cell_int(cell(row, col)))
            .and_then(|value| u32::try_from(value).ok()),
        wins,
        losses,
        ties,
        points: roles.points.map(|col| cell(row, col).trim().to_string()),
    }
}

fn count_at(row: &[String], col: Option<usize>) -> u32 {
    col.and_then(|col| parse_cell_int(cell(row, col)))
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0)
}

/// Applies the schema's ordering policy. Source order is a no-op; the other
/// two policies are stable.
pub fn order_records(
    mut records: Vec<CompetitorRecord>,
    policy: OrderingPolicy,
) -> Vec<CompetitorRecord> {
    match policy {
        OrderingPolicy::SourceOrder => {}
        OrderingPolicy::WinLossName => {
            records.sort_by(|a, b| {
                b.wins
                    .cmp(&a.wins)
                    .then_with(|| a.losses.cmp(&b.losses))
                    .then_with(|| a.name.cmp(&b.name))
            });
        }
        OrderingPolicy::RankOrder => sort_by_rank(&mut records),
    }
    records
}

/// Stable ascending pass over the ranked rows. Absent ranks compare equal
/// to everything, which is not a total order, so this is a manual insertion
/// pass rather than `sort_by`: a pair involving an absent rank never swaps.
fn sort_by_rank(records: &mut [CompetitorRecord]) {
    for i in 1..records.len() {
        let mut j = i;
        while j > 0 && ranked_out_of_order(&records[j - 1], &records[j]) {
            records.swap(j - 1, j);
            j -= 1;
        }
    }
}

fn ranked_out_of_order(earlier: &CompetitorRecord, later: &CompetitorRecord) -> bool {
    match (earlier.rank, later.rank) {
        (Some(a), Some(b)) => a > b,
        _ => false,
    }
}
