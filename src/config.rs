//! Rank tables: the static tier/value/weight configuration a
//! [`GachaSystem`](crate::GachaSystem) draws from.
//!
//! Tables are usually written as TOML, one `[[rank]]` entry per tier in
//! display order:
//!
//! ```toml
//! [[rank]]
//! name = "SSR"
//! weight = 0.02
//! values = ["Legend_Character_1", "Legend_Character_2"]
//! weights = [0.5, 0.5]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One tier: its selection weight and the weighted values inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankSpec {
    pub name: String,
    pub weight: f64,
    pub values: Vec<String>,
    /// Parallel to `values`.
    pub weights: Vec<f64>,
}

impl RankSpec {
    /// Build from `(value, weight)` pairs.
    pub fn new<N, V, I>(name: N, weight: f64, entries: I) -> Self
    where
        N: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (V, f64)>,
    {
        let (values, weights) = entries
            .into_iter()
            .map(|(v, w)| (v.into(), w))
            .unzip();
        Self {
            name: name.into(),
            weight,
            values,
            weights,
        }
    }
}

/// Ordered set of ranks. Order is kept for display and for value indexing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankTable {
    #[serde(rename = "rank", default)]
    pub ranks: Vec<RankSpec>,
}

impl RankTable {
    pub fn new(ranks: Vec<RankSpec>) -> Self {
        Self { ranks }
    }

    pub fn with_rank(mut self, rank: RankSpec) -> Self {
        self.ranks.push(rank);
        self
    }

    /// Load a table from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a table from a TOML string. Shape only; weights are checked by
    /// [`GachaSystem::setup`](crate::GachaSystem::setup).
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

impl Default for RankTable {
    /// The stock three-tier banner.
    fn default() -> Self {
        Self::new(vec![
            RankSpec::new(
                "SSR",
                0.02,
                [("Legend_Character_1", 0.5), ("Legend_Character_2", 0.5)],
            ),
            RankSpec::new(
                "SR",
                0.15,
                [
                    ("Rare_Character_1", 0.4),
                    ("Rare_Character_2", 0.3),
                    ("Rare_Character_3", 0.3),
                ],
            ),
            RankSpec::new(
                "R",
                0.83,
                [("Common_Character_1", 0.6), ("Common_Character_2", 0.4)],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANNER: &str = r#"
[[rank]]
name = "SSR"
weight = 0.02
values = ["A", "B"]
weights = [0.5, 0.5]

[[rank]]
name = "R"
weight = 0.98
values = ["C"]
weights = [1.0]
"#;

    #[test]
    fn parses_ranks_in_file_order() {
        let table = RankTable::from_toml(BANNER).unwrap();
        let names: Vec<_> = table.ranks.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["SSR", "R"]);
        assert_eq!(table.ranks[0].values, ["A", "B"]);
        assert_eq!(table.ranks[1].weights, [1.0]);
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let err = RankTable::from_toml("[[rank]]\nname = \"SSR\"\nweight = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RankTable::from_file(Path::new("/nonexistent/banner.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/banner.toml"));
    }

    #[test]
    fn default_table_survives_toml() {
        let table = RankTable::default();
        let text = table.to_toml().unwrap();
        assert_eq!(RankTable::from_toml(&text).unwrap(), table);
    }

    #[test]
    fn with_rank_appends_in_order() {
        let ssr = RankSpec::new("SSR", 0.02, [("A", 1.0)]);
        let r = RankSpec::new("R", 0.98, [("C", 1.0)]);
        let table = RankTable::new(vec![])
            .with_rank(ssr.clone())
            .with_rank(r.clone());
        assert_eq!(table.len(), 2);
        assert_eq!(table, RankTable::new(vec![ssr, r]));
    }

    #[test]
    fn rank_spec_from_pairs_keeps_order() {
        let spec = RankSpec::new("SR", 0.15, [("x", 0.4), ("y", 0.6)]);
        assert_eq!(spec.values, ["x", "y"]);
        assert_eq!(spec.weights, [0.4, 0.6]);
    }
}
