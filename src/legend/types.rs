use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Raw legend labels: one list, or one list per chart type for combo charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegendLabels {
    Flat(Vec<String>),
    ByChartType(IndexMap<String, Vec<String>>),
}

impl LegendLabels {
    /// Number of labels declared for `chart_type`.
    ///
    /// A flat list belongs to whichever chart type asks for it.
    #[must_use]
    pub fn count_for(&self, chart_type: &str) -> Option<usize> {
        match self {
            Self::Flat(labels) => Some(labels.len()),
            Self::ByChartType(labels) => labels.get(chart_type).map(Vec::len),
        }
    }
}

/// Pre-resolved `{chartType, label}` pair, aligned 1:1 with the legend items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendLabel {
    pub chart_type: String,
    pub label: String,
}

impl LegendLabel {
    #[must_use]
    pub fn new(chart_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            chart_type: chart_type.into(),
            label: label.into(),
        }
    }
}

/// Style snapshot resolved for one legend item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTheme {
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}

/// One entry of the legend display list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendItem {
    pub chart_type: String,
    pub label: String,
    pub theme: ItemTheme,
    /// Position within the full legend list.
    pub index: usize,
    /// Ordinal among the items of the same chart type that participate in
    /// rendering; `None` when the item is excluded.
    pub series_index: Option<usize>,
}

/// Explicitly checked series, as consumed by series renderers and the data
/// processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendingData<'a> {
    /// Local indexes checked for the legend's own chart type.
    ChartType {
        chart_type: &'a str,
        checked: &'a BTreeSet<usize>,
    },
    /// Every chart type's set; returned for combo legends and before the
    /// first explicit check.
    All(&'a IndexMap<String, BTreeSet<usize>>),
}

impl<'a> SendingData<'a> {
    /// Checked set of `chart_type`, if one was recorded.
    #[must_use]
    pub fn for_chart_type(&self, chart_type: &str) -> Option<&'a BTreeSet<usize>> {
        match *self {
            Self::ChartType {
                chart_type: own,
                checked,
            } => (own == chart_type).then_some(checked),
            Self::All(map) => map.get(chart_type),
        }
    }
}
