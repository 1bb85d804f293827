//! Block summary records and the knobs used to slice them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One pre-computed record per (site, block_type) pair.
///
/// `avg_position` is the mean ordinal position of the block type within the
/// answers of that site, so lower values mean the block tends to appear earlier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub site: String,
    pub block_type: String,
    pub count: u64,
    pub percent: f64,
    pub avg_position: f64,
}

impl BlockSummary {
    pub fn new(
        site: impl Into<String>,
        block_type: impl Into<String>,
        count: u64,
        percent: f64,
        avg_position: f64,
    ) -> Self {
        Self {
            site: site.into(),
            block_type: block_type.into(),
            count,
            percent,
            avg_position,
        }
    }
}

/// Metric a chart is ranked and valued by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Count,
    Percent,
    AvgPosition,
}

impl Metric {
    /// Read this metric off a raw summary record.
    pub fn of_summary(&self, summary: &BlockSummary) -> f64 {
        match self {
            Metric::Count => summary.count as f64,
            Metric::Percent => summary.percent,
            Metric::AvgPosition => summary.avg_position,
        }
    }

    /// Lower is better for position, higher is better for everything else.
    pub fn ascending(&self) -> bool {
        matches!(self, Metric::AvgPosition)
    }

    pub fn axis_title(&self) -> &'static str {
        match self {
            Metric::Count => "Count",
            Metric::Percent => "Percentage (%)",
            Metric::AvgPosition => "Average Position",
        }
    }

    pub fn title_word(&self) -> &'static str {
        match self {
            Metric::Count => "Count",
            Metric::Percent => "Percentage",
            Metric::AvgPosition => "Position",
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "count" => Ok(Self::Count),
            "percent" | "percentage" => Ok(Self::Percent),
            "avg_position" | "position" => Ok(Self::AvgPosition),
            _ => Err(format!("Unknown metric: {}", s)),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Metric::Count => "count",
            Metric::Percent => "percent",
            Metric::AvgPosition => "avg_position",
        };
        f.write_str(s)
    }
}

/// Which sites a view covers. Serialized as `"all"` or the site name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Scope {
    #[default]
    All,
    Site(String),
}

impl Scope {
    pub const ALL_TOKEN: &'static str = "all";

    pub fn matches(&self, site: &str) -> bool {
        match self {
            Scope::All => true,
            Scope::Site(s) => s == site,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Scope::All)
    }
}

impl From<String> for Scope {
    fn from(value: String) -> Self {
        if value.is_empty() || value.eq_ignore_ascii_case(Scope::ALL_TOKEN) {
            Scope::All
        } else {
            Scope::Site(value)
        }
    }
}

impl From<Option<String>> for Scope {
    fn from(value: Option<String>) -> Self {
        value.map(Scope::from).unwrap_or_default()
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::All => Scope::ALL_TOKEN.to_string(),
            Scope::Site(s) => s,
        }
    }
}

/// Presentation shape for a chart dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Pie,
    Treemap,
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bar" => Ok(Self::Bar),
            "pie" => Ok(Self::Pie),
            "treemap" => Ok(Self::Treemap),
            _ => Err(format!("Unknown chart type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_from_str() {
        assert_eq!("count".parse::<Metric>().unwrap(), Metric::Count);
        assert_eq!("Percent".parse::<Metric>().unwrap(), Metric::Percent);
        assert_eq!("avg_position".parse::<Metric>().unwrap(), Metric::AvgPosition);
        assert!("median".parse::<Metric>().is_err());
    }

    #[test]
    fn test_metric_serde_snake_case() {
        let json = serde_json::to_string(&Metric::AvgPosition).unwrap();
        assert_eq!(json, "\"avg_position\"");
    }

    #[test]
    fn test_scope_from_string() {
        assert_eq!(Scope::from("all".to_string()), Scope::All);
        assert_eq!(Scope::from(String::new()), Scope::All);
        assert_eq!(
            Scope::from("stackoverflow".to_string()),
            Scope::Site("stackoverflow".to_string())
        );
        assert_eq!(Scope::from(None::<String>), Scope::All);
    }

    #[test]
    fn test_scope_matches() {
        let site = Scope::Site("a".to_string());
        assert!(site.matches("a"));
        assert!(!site.matches("b"));
        assert!(Scope::All.matches("b"));
    }

    #[test]
    fn test_scope_serializes_as_plain_string() {
        let json = serde_json::to_string(&Scope::All).unwrap();
        assert_eq!(json, "\"all\"");
        let scope: Scope = serde_json::from_str("\"physics\"").unwrap();
        assert_eq!(scope, Scope::Site("physics".to_string()));
    }

    #[test]
    fn test_chart_kind_from_str() {
        assert_eq!("treemap".parse::<ChartKind>().unwrap(), ChartKind::Treemap);
        assert!("donut".parse::<ChartKind>().is_err());
    }
}
