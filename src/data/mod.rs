//! Shared data processor contract and its JSON-backed implementation.

mod series_data_processor;

use std::collections::BTreeSet;

pub use series_data_processor::{RawChartData, RawSeriesData, RawSeriesDatum, SeriesDataProcessor};

use crate::core::Limit;
use crate::legend::{LegendLabel, LegendLabels};

/// Data access shared by every registered component.
///
/// `checked` arguments carry the legend's explicit check set for the chart
/// type (see [`crate::legend::LegendModel::sending_data_for`]); `None` means
/// every series participates.
pub trait DataProcessor {
    /// Active chart type (`combo` for combo charts).
    fn chart_type(&self) -> &str;

    /// Chart types sharing one chart, in declaration order. `None` unless combo.
    fn chart_types(&self) -> Option<&[String]>;

    fn legend_labels(&self) -> LegendLabels;

    /// Flat `{chartType, label}` list aligned with the legend item list.
    fn legend_data(&self) -> Vec<LegendLabel>;

    /// Min/max over the values of participating series of `chart_type`.
    fn limit(&self, chart_type: &str, checked: Option<&BTreeSet<usize>>) -> Option<Limit>;

    /// Per-series value ratios against the participating limit; `None` for
    /// series that do not participate.
    fn data_ratios(
        &self,
        chart_type: &str,
        checked: Option<&BTreeSet<usize>>,
    ) -> Vec<Option<Vec<f64>>>;
}

/// Participation rule shared with the legend model.
#[must_use]
pub fn is_participating(checked: Option<&BTreeSet<usize>>, series_index: usize) -> bool {
    checked.is_none_or(|checked| checked.contains(&series_index))
}
