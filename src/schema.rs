use std::fmt;
use std::str::FromStr;

use crate::error::ScrapeError;

/// The three output schemas. The schema decides which columns the report
/// shows, which ordering policy applies, and how a synthesized header is
/// labeled when the source table has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Schema {
    /// Rank, name, points and win/loss counts, ordered by rank.
    RankPoints,
    /// Name and win/loss counts in page order.
    WinLoss,
    /// Name, win/loss/tie counts, ordered by record.
    WinLossTie,
}

/// How normalized records are ordered before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingPolicy {
    /// Stable ascending sort by numeric rank; absent ranks keep their position.
    RankOrder,
    /// Keep discovery order.
    SourceOrder,
    /// Wins descending, then losses ascending, then name.
    WinLossName,
}

impl Schema {
    /// Whether this schema carries a ties column.
    pub fn tracks_ties(&self) -> bool {
        matches!(self, Schema::WinLossTie)
    }

    pub fn shows_rank(&self) -> bool {
        matches!(self, Schema::RankPoints)
    }

    pub fn shows_points(&self) -> bool {
        matches!(self, Schema::RankPoints)
    }

    /// Labels used to synthesize a header for a headerless table, assigned
    /// positionally; columns beyond the list get an empty label.
    pub fn canonical_labels(&self) -> &'static [&'static str] {
        match self {
            Schema::RankPoints => &["Rank", "Name", "W", "L", "Pts"],
            Schema::WinLoss => &["Name", "W", "L"],
            Schema::WinLossTie => &["Name", "W", "L", "T"],
        }
    }

    /// The literal header line of the rendered block.
    pub fn header_line(&self) -> &'static str {
        match self {
            Schema::RankPoints => "#  Name                      Pts   W   L",
            Schema::WinLoss => "Name                      W   L",
            Schema::WinLossTie => "Name                      W   L   T",
        }
    }

    pub fn ordering(&self) -> OrderingPolicy {
        match self {
            Schema::RankPoints => OrderingPolicy::RankOrder,
            Schema::WinLoss => OrderingPolicy::SourceOrder,
            Schema::WinLossTie => OrderingPolicy::WinLossName,
        }
    }

    /// Default cap on rendered rows; `None` means every data row is kept.
    pub fn default_max_rows(&self) -> Option<usize> {
        match self {
            Schema::RankPoints => Some(12),
            Schema::WinLoss | Schema::WinLossTie => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Schema::RankPoints => "rank-points",
            Schema::WinLoss => "win-loss",
            Schema::WinLossTie => "win-loss-tie",
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Schema::RankPoints
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Schema {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rank-points" | "rank_points" => Ok(Schema::RankPoints),
            "win-loss" | "win_loss" => Ok(Schema::WinLoss),
            "win-loss-tie" | "win_loss_tie" => Ok(Schema::WinLossTie),
            other => Err(ScrapeError::Config(format!(
                "Unknown schema '{}' (expected rank-points, win-loss or win-loss-tie)",
                other
            ))),
        }
    }
}
