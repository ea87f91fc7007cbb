use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::Heuristics;
use crate::schema::Schema;
use crate::types::{cell, is_numeric_cell, parse_cell_int};

/// Semantic meaning of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Rank,
    Name,
    Wins,
    Losses,
    Ties,
    Points,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Rank,
        Role::Name,
        Role::Wins,
        Role::Losses,
        Role::Ties,
        Role::Points,
    ];

    /// Labels accepted as an exact, case-insensitive match for this role.
    pub fn exact_aliases(&self) -> &'static [&'static str] {
        match self {
            Role::Rank => &["#", "rank", "pos", "position"],
            Role::Name => &["name", "player", "team"],
            Role::Wins => &["w", "win", "wins"],
            Role::Losses => &["l", "loss", "losses"],
            Role::Ties => &["t", "tie", "ties", "draw", "draws"],
            Role::Points => &["pts", "points", "score"],
        }
    }

    fn partial_pattern(&self) -> &'static Regex {
        static RANK: Lazy<Regex> = Lazy::new(|| Regex::new(r"rank|pos|#").unwrap());
        static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"name|player|team").unwrap());
        static WINS: Lazy<Regex> = Lazy::new(|| Regex::new(r"win").unwrap());
        static LOSSES: Lazy<Regex> = Lazy::new(|| Regex::new(r"loss").unwrap());
        static TIES: Lazy<Regex> = Lazy::new(|| Regex::new(r"tie|draw").unwrap());
        static POINTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"pts|point|score").unwrap());
        match self {
            Role::Rank => &RANK,
            Role::Name => &NAME,
            Role::Wins => &WINS,
            Role::Losses => &LOSSES,
            Role::Ties => &TIES,
            Role::Points => &POINTS,
        }
    }
}

/// Column assignment per role. Built once by the tier reducer and read-only
/// afterwards. No two roles ever hold the same column; `name` is resolved
/// for any table with at least one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleMap {
    pub rank: Option<usize>,
    pub name: Option<usize>,
    pub wins: Option<usize>,
    pub losses: Option<usize>,
    pub ties: Option<usize>,
    pub points: Option<usize>,
}

impl RoleMap {
    pub fn get(&self, role: Role) -> Option<usize> {
        match role {
            Role::Rank => self.rank,
            Role::Name => self.name,
            Role::Wins => self.wins,
            Role::Losses => self.losses,
            Role::Ties => self.ties,
            Role::Points => self.points,
        }
    }

    pub fn is_claimed(&self, col: usize) -> bool {
        Role::ALL.iter().any(|role| self.get(*role) == Some(col))
    }

    fn with(mut self, role: Role, col: usize) -> Self {
        let slot = match role {
            Role::Rank => &mut self.rank,
            Role::Name => &mut self.name,
            Role::Wins => &mut self.wins,
            Role::Losses => &mut self.losses,
            Role::Ties => &mut self.ties,
            Role::Points => &mut self.points,
        };
        *slot = Some(col);
        self
    }

    fn cleared(mut self, role: Role) -> Self {
        let slot = match role {
            Role::Rank => &mut self.rank,
            Role::Name => &mut self.name,
            Role::Wins => &mut self.wins,
            Role::Losses => &mut self.losses,
            Role::Ties => &mut self.ties,
            Role::Points => &mut self.points,
        };
        *slot = None;
        self
    }
}

/// True when a lowercased header cell matches any role's exact alias or
/// partial pattern. Header resolution uses this to decide header-ness.
pub fn matches_any_role(cell: &str) -> bool {
    Role::ALL
        .iter()
        .any(|role| role.exact_aliases().contains(&cell) || role.partial_pattern().is_match(cell))
}

/// Resolves column roles by folding three tiers in order: exact header
/// aliases, partial header patterns, then statistical fallbacks over the
/// data rows. Each tier only touches roles the earlier tiers left
/// unresolved, and never reuses a claimed column.
pub fn resolve_roles(
    header: &[String],
    data_rows: &[Vec<String>],
    schema: Schema,
    heuristics: &Heuristics,
) -> RoleMap {
    let header: Vec<String> = header
        .iter()
        .map(|cell| cell.trim().to_lowercase())
        .collect();

    let map = tier_exact(&header, RoleMap::default());
    let map = tier_partial(&header, map);
    let map = tier_statistical(&header, data_rows, schema, heuristics, map);
    debug!(
        rank = ?map.rank,
        name = ?map.name,
        wins = ?map.wins,
        losses = ?map.losses,
        ties = ?map.ties,
        points = ?map.points,
        "resolved column roles"
    );
    map
}

fn tier_exact(header: &[String], map: RoleMap) -> RoleMap {
    let mut map = map;
    for role in Role::ALL {
        if map.get(role).is_some() {
            continue;
        }
        let hit = header.iter().enumerate().find(|(idx, cell)| {
            !map.is_claimed(*idx) && role.exact_aliases().contains(&cell.as_str())
        });
        if let Some((idx, _)) = hit {
            debug!(?role, column = idx, "exact header match");
            map = map.with(role, idx);
        }
    }
    map
}

fn tier_partial(header: &[String], map: RoleMap) -> RoleMap {
    let mut map = map;
    for role in Role::ALL {
        if map.get(role).is_some() {
            continue;
        }
        let hit = header
            .iter()
            .enumerate()
            .find(|(idx, cell)| !map.is_claimed(*idx) && role.partial_pattern().is_match(cell));
        if let Some((idx, _)) = hit {
            debug!(?role, column = idx, "partial header match");
            map = map.with(role, idx);
        }
    }
    map
}

/// Tier 3 visits name first (rank and the count roles exclude the name
/// column, so it has to be settled), then rank, then wins/losses/ties.
fn tier_statistical(
    header: &[String],
    data_rows: &[Vec<String>],
    schema: Schema,
    heuristics: &Heuristics,
    map: RoleMap,
) -> RoleMap {
    let width = table_width(header, data_rows);
    let map = statistical_name(width, data_rows, map);
    let map = statistical_rank(width, data_rows, heuristics, map);
    statistical_counts(width, data_rows, schema, heuristics, map)
}

fn table_width(header: &[String], data_rows: &[Vec<String>]) -> usize {
    data_rows
        .iter()
        .map(|row| row.len())
        .max()
        .unwrap_or(0)
        .max(header.len())
}

/// Total text length of a column's non-numeric cells, the signal that marks
/// the name column.
fn text_weight(data_rows: &[Vec<String>], col: usize) -> usize {
    data_rows
        .iter()
        .map(|row| {
            let value = cell(row, col);
            if is_numeric_cell(value) {
                0
            } else {
                value.chars().count()
            }
        })
        .sum()
}

fn statistical_name(width: usize, data_rows: &[Vec<String>], map: RoleMap) -> RoleMap {
    if map.name.is_some() || width == 0 {
        return map;
    }

    let pick = |claimed_ok: bool, map: &RoleMap| -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for col in 0..width {
            if !claimed_ok && map.is_claimed(col) {
                continue;
            }
            let weight = text_weight(data_rows, col);
            match best {
                Some((_, best_weight)) if weight <= best_weight => {}
                _ => best = Some((col, weight)),
            }
        }
        best.map(|(col, _)| col)
    };

    if let Some(col) = pick(false, &map) {
        debug!(column = col, "name resolved by text weight");
        return map.with(Role::Name, col);
    }

    // Every column is claimed. Name is the one role with a resolution
    // guarantee, so it takes its best column and the holder is dropped.
    let mut map = map;
    if let Some(col) = pick(true, &map) {
        if let Some(holder) = Role::ALL.iter().find(|role| map.get(**role) == Some(col)) {
            debug!(?holder, column = col, "name takes over a claimed column");
            map = map.cleared(*holder);
        }
        map = map.with(Role::Name, col);
    }
    map
}

fn statistical_rank(
    width: usize,
    data_rows: &[Vec<String>],
    heuristics: &Heuristics,
    map: RoleMap,
) -> RoleMap {
    if map.rank.is_some() {
        return map;
    }
    for col in 0..width {
        if map.name == Some(col) {
            continue;
        }
        let values: Vec<i64> = data_rows
            .iter()
            .filter_map(|row| parse_cell_int(cell(row, col)))
            .collect();
        if values.len() < 2 {
            continue;
        }
        let steps = values.len() - 1;
        let unit_steps = values.windows(2).filter(|pair| pair[1] - pair[0] == 1).count();
        if unit_steps as f64 / steps as f64 > heuristics.rank_step_rate {
            if map.is_claimed(col) {
                debug!(column = col, "rank candidate collides with a claimed column");
            } else {
                debug!(column = col, "rank resolved by ascending sequence");
                return map.with(Role::Rank, col);
            }
            // Candidate found but unusable; rank stays unresolved.
            return map;
        }
    }
    map
}

fn statistical_counts(
    width: usize,
    data_rows: &[Vec<String>],
    schema: Schema,
    heuristics: &Heuristics,
    map: RoleMap,
) -> RoleMap {
    let mut wanted: Vec<Role> = vec![Role::Wins, Role::Losses];
    if schema.tracks_ties() {
        wanted.push(Role::Ties);
    }
    wanted.retain(|role| map.get(*role).is_none());
    if wanted.is_empty() {
        return map;
    }

    struct Candidate {
        col: usize,
        small: usize,
        parseable: usize,
        max_value: i64,
    }

    let mut candidates: Vec<Candidate> = (0..width)
        .filter(|col| !map.is_claimed(*col))
        .filter_map(|col| {
            let values: Vec<i64> = data_rows
                .iter()
                .filter_map(|row| parse_cell_int(cell(row, col)))
                .collect();
            let max_value = values.iter().copied().max()?;
            let small = values
                .iter()
                .filter(|v| (0..=heuristics.small_int_max).contains(*v))
                .count();
            Some(Candidate {
                col,
                small,
                parseable: values.len(),
                max_value,
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.small
            .cmp(&a.small)
            .then(b.parseable.cmp(&a.parseable))
            .then(a.max_value.cmp(&b.max_value))
            .then(a.col.cmp(&b.col))
    });

    let mut map = map;
    let mut remaining = candidates.into_iter();
    for role in wanted {
        match remaining.next() {
            Some(candidate) => {
                debug!(
                    ?role,
                    column = candidate.col,
                    small = candidate.small,
                    "count role resolved statistically"
                );
                map = map.with(role, candidate.col);
            }
            None => break,
        }
    }
    map
}
