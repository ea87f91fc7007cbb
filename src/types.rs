/// One table as captured from a document context: a row-matrix of trimmed
/// cell text plus the table's flattened lowercase text, which is only used
/// for relevance scoring during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableGrab {
    pub rows: Vec<Vec<String>>,
    pub text: String,
}

impl TableGrab {
    pub fn new(rows: Vec<Vec<String>>, text: String) -> Self {
        Self { rows, text }
    }

    /// Builds a grab whose scoring text is the lowercased cells joined with
    /// single spaces. Joining per cell keeps adjacent cells from running
    /// together the way raw DOM text can.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let text = rows
            .iter()
            .flat_map(|row| row.iter())
            .map(|cell| cell.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        Self { rows, text }
    }
}

/// One document context: the tables present in it and the nested child
/// contexts (embedded sub-documents). Contexts form a tree rooted at the
/// page, so discovery can walk them depth-first without a visited set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub tables: Vec<TableGrab>,
    pub children: Vec<PageContext>,
}

impl PageContext {
    pub fn new(tables: Vec<TableGrab>, children: Vec<PageContext>) -> Self {
        Self { tables, children }
    }
}

/// The discovered table. After header resolution row 0 is always the header
/// and rows 1.. are data rows. Rows need not share a width; a cell read past
/// a row's end is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows beneath the header; empty when the table is header-only.
    pub fn data_rows(&self) -> &[Vec<String>] {
        if self.rows.len() > 1 {
            &self.rows[1..]
        } else {
            &[]
        }
    }
}

/// One competitor, built during row normalization and immutable afterwards.
/// Numeric fields default to 0 when the source cell is missing or does not
/// parse; `rank` and `points` stay absent instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompetitorRecord {
    pub name: String,
    pub rank: Option<u32>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points: Option<String>,
}

/// Reads a cell by index, treating anything past the row's end as empty.
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Strict whole-cell integer parse: trims, then requires the entire cell to
/// be one integer. Combined tokens like "4-1" do not parse, which keeps
/// record columns out of the numeric heuristics.
pub fn parse_cell_int(cell: &str) -> Option<i64> {
    cell.trim().parse().ok()
}

/// Whether a cell is purely numeric (integer or decimal).
pub fn is_numeric_cell(cell: &str) -> bool {
    cell.trim().parse::<f64>().is_ok()
}
