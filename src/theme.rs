//! Theme tables consumed by the registry and the legend model.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChartError, ChartResult};

/// Palette used for series whose chart type has no theme entry of its own.
pub const DEFAULT_SERIES_COLORS: [&str; 8] = [
    "#ac4142", "#d28445", "#f4bf75", "#90a959", "#75b5aa", "#6a9fb5", "#aa759f", "#8f5536",
];

/// Colors of one series group.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeriesTheme {
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}

impl SeriesTheme {
    #[must_use]
    pub fn with_colors<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            colors: colors.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Theme built from [`DEFAULT_SERIES_COLORS`].
    #[must_use]
    pub fn default_series() -> Self {
        Self::with_colors(DEFAULT_SERIES_COLORS)
    }

    #[must_use]
    pub fn with_single_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.single_colors = Some(colors.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_border_color(mut self, color: impl Into<String>) -> Self {
        self.border_color = Some(color.into());
        self
    }

    /// Color for the `index`-th item; palettes shorter than the item list wrap.
    #[must_use]
    pub fn color_at(&self, index: usize) -> Option<&str> {
        cycle(&self.colors, index)
    }

    #[must_use]
    pub fn single_color_at(&self, index: usize) -> Option<&str> {
        self.single_colors
            .as_deref()
            .and_then(|colors| cycle(colors, index))
    }
}

fn cycle(colors: &[String], index: usize) -> Option<&str> {
    if colors.is_empty() {
        return None;
    }
    Some(colors[index % colors.len()].as_str())
}

/// Legend theme: a single table, or one table per chart type for combo charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegendTheme {
    Flat(SeriesTheme),
    ByChartType(IndexMap<String, SeriesTheme>),
}

impl LegendTheme {
    /// Resolves the table for `chart_type`, using `fallback` when none applies.
    #[must_use]
    pub fn resolve<'a>(&'a self, chart_type: &str, fallback: &'a SeriesTheme) -> &'a SeriesTheme {
        match self {
            Self::Flat(theme) => theme,
            Self::ByChartType(themes) => themes.get(chart_type).unwrap_or(fallback),
        }
    }

    /// Combo-mode resolution: a flat table never matches a chart type.
    #[must_use]
    pub fn resolve_keyed<'a>(
        &'a self,
        chart_type: &str,
        fallback: &'a SeriesTheme,
    ) -> &'a SeriesTheme {
        match self {
            Self::Flat(_) => fallback,
            Self::ByChartType(themes) => themes.get(chart_type).unwrap_or(fallback),
        }
    }
}

impl Default for LegendTheme {
    fn default() -> Self {
        Self::Flat(SeriesTheme::default_series())
    }
}

/// Component-type keyed theme slices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartTheme {
    slices: IndexMap<String, Value>,
}

impl ChartTheme {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse theme json: {e}")))
    }

    #[must_use]
    pub fn with_slice(mut self, component_type: impl Into<String>, slice: Value) -> Self {
        self.slices.insert(component_type.into(), slice);
        self
    }

    #[must_use]
    pub fn slice(&self, component_type: &str) -> Option<&Value> {
        self.slices.get(component_type)
    }
}

/// Parses a theme slice into a legend theme.
pub fn legend_theme_from_slice(slice: &Value) -> ChartResult<LegendTheme> {
    LegendTheme::deserialize(slice)
        .map_err(|e| ChartError::InvalidConfig(format!("invalid legend theme: {e}")))
}
