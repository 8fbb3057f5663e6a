use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Limit;
use crate::error::{ChartError, ChartResult};
use crate::legend::{LegendLabel, LegendLabels};

use super::{DataProcessor, is_participating};

/// One named series; `null` samples are missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeriesDatum {
    pub name: String,
    #[serde(default)]
    pub data: Vec<Option<f64>>,
}

impl RawSeriesDatum {
    #[must_use]
    pub fn new(name: impl Into<String>, data: impl IntoIterator<Item = f64>) -> Self {
        Self {
            name: name.into(),
            data: data.into_iter().map(Some).collect(),
        }
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().flatten().copied().filter(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawSeriesData {
    Flat(Vec<RawSeriesDatum>),
    ByChartType(IndexMap<String, Vec<RawSeriesDatum>>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawChartData {
    #[serde(default)]
    pub categories: Vec<String>,
    pub series: RawSeriesData,
}

/// [`DataProcessor`] over user supplied raw chart data.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesDataProcessor {
    chart_type: String,
    chart_types: Option<Vec<String>>,
    categories: Vec<String>,
    series: IndexMap<String, Vec<RawSeriesDatum>>,
}

impl SeriesDataProcessor {
    /// Builds a processor for `chart_type`.
    ///
    /// Flat series data belongs to `chart_type`; chart-type keyed data makes
    /// the processor a combo processor with the map's key order as the
    /// declaration order.
    pub fn new(chart_type: impl Into<String>, raw: RawChartData) -> ChartResult<Self> {
        let chart_type = chart_type.into();
        if chart_type.is_empty() {
            return Err(ChartError::InvalidConfig(
                "chart type must not be empty".to_owned(),
            ));
        }

        let (chart_types, series) = match raw.series {
            RawSeriesData::Flat(series) => {
                let mut map = IndexMap::new();
                map.insert(chart_type.clone(), series);
                (None, map)
            }
            RawSeriesData::ByChartType(map) => {
                if map.is_empty() {
                    return Err(ChartError::InvalidData(
                        "combo series data must list at least one chart type".to_owned(),
                    ));
                }
                (Some(map.keys().cloned().collect()), map)
            }
        };

        debug!(
            chart_type = %chart_type,
            series_groups = series.len(),
            categories = raw.categories.len(),
            "create series data processor"
        );

        Ok(Self {
            chart_type,
            chart_types,
            categories: raw.categories,
            series,
        })
    }

    pub fn from_json_str(chart_type: impl Into<String>, input: &str) -> ChartResult<Self> {
        let raw: RawChartData = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart data: {e}")))?;
        Self::new(chart_type, raw)
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn series(&self, chart_type: &str) -> &[RawSeriesDatum] {
        self.series.get(chart_type).map_or(&[], Vec::as_slice)
    }

    fn participating<'a>(
        &'a self,
        chart_type: &str,
        checked: Option<&'a BTreeSet<usize>>,
    ) -> impl Iterator<Item = &'a RawSeriesDatum> + 'a {
        self.series(chart_type)
            .iter()
            .enumerate()
            .filter(move |(index, _)| is_participating(checked, *index))
            .map(|(_, datum)| datum)
    }
}

impl DataProcessor for SeriesDataProcessor {
    fn chart_type(&self) -> &str {
        &self.chart_type
    }

    fn chart_types(&self) -> Option<&[String]> {
        self.chart_types.as_deref()
    }

    fn legend_labels(&self) -> LegendLabels {
        match &self.chart_types {
            None => LegendLabels::Flat(
                self.series(&self.chart_type)
                    .iter()
                    .map(|datum| datum.name.clone())
                    .collect(),
            ),
            Some(_) => LegendLabels::ByChartType(
                self.series
                    .iter()
                    .map(|(chart_type, series)| {
                        (
                            chart_type.clone(),
                            series.iter().map(|datum| datum.name.clone()).collect(),
                        )
                    })
                    .collect(),
            ),
        }
    }

    fn legend_data(&self) -> Vec<LegendLabel> {
        self.series
            .iter()
            .flat_map(|(chart_type, series)| {
                series
                    .iter()
                    .map(move |datum| LegendLabel::new(chart_type.clone(), datum.name.clone()))
            })
            .collect()
    }

    fn limit(&self, chart_type: &str, checked: Option<&BTreeSet<usize>>) -> Option<Limit> {
        self.participating(chart_type, checked)
            .flat_map(RawSeriesDatum::values)
            .fold(None, |limit: Option<Limit>, value| {
                Some(match limit {
                    Some(limit) => Limit::new(limit.min.min(value), limit.max.max(value)),
                    None => Limit::new(value, value),
                })
            })
    }

    fn data_ratios(
        &self,
        chart_type: &str,
        checked: Option<&BTreeSet<usize>>,
    ) -> Vec<Option<Vec<f64>>> {
        let limit = self.limit(chart_type, checked);
        self.series(chart_type)
            .iter()
            .enumerate()
            .map(|(index, datum)| {
                if !is_participating(checked, index) {
                    return None;
                }
                let limit = limit?;
                let span = limit.span();
                Some(
                    datum
                        .data
                        .iter()
                        .map(|value| match value {
                            Some(value) if span > 0.0 => (value - limit.min) / span,
                            _ => 0.0,
                        })
                        .collect(),
                )
            })
            .collect()
    }
}
