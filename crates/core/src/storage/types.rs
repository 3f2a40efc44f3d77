use std::fmt;
use std::str::FromStr;

/// How a storage backend answers `count_by_object`.
///
/// A deployment picks exactly one strategy: reading the materialised counter
/// and counting rows diverge after partial failures, so they must not be mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountStrategy {
    /// Read the transactionally maintained `(biz, biz_id)` counter row.
    #[default]
    Materialized,
    /// Count comment rows on every read.
    RowCount,
}

impl CountStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            CountStrategy::Materialized => "materialized",
            CountStrategy::RowCount => "row_count",
        }
    }
}

impl fmt::Display for CountStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "materialized" | "counter" => Ok(CountStrategy::Materialized),
            "row_count" | "rows" => Ok(CountStrategy::RowCount),
            other => Err(format!("unknown count strategy: {other}")),
        }
    }
}
