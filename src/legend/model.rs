use std::collections::BTreeSet;
use std::ops::Range;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{ChartError, ChartResult};
use crate::theme::{LegendTheme, SeriesTheme};

use super::{ItemTheme, LegendItem, LegendLabel, LegendLabels, SendingData};

/// Construction inputs of a [`LegendModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct LegendModelParams {
    pub labels: LegendLabels,
    pub legend_data: Vec<LegendLabel>,
    pub theme: LegendTheme,
    /// Active chart type; `combo` style names are fine for combo charts.
    pub chart_type: String,
    /// Chart types sharing the legend, in declaration order. `Some` switches
    /// the model to combo mode.
    pub chart_types: Option<Vec<String>>,
    /// Table used for chart types without a theme entry.
    pub fallback_theme: SeriesTheme,
}

impl LegendModelParams {
    #[must_use]
    pub fn new(
        labels: LegendLabels,
        legend_data: Vec<LegendLabel>,
        theme: LegendTheme,
        chart_type: impl Into<String>,
    ) -> Self {
        Self {
            labels,
            legend_data,
            theme,
            chart_type: chart_type.into(),
            chart_types: None,
            fallback_theme: SeriesTheme::default_series(),
        }
    }

    #[must_use]
    pub fn with_chart_types<I, S>(mut self, chart_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chart_types = Some(chart_types.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_fallback_theme(mut self, fallback_theme: SeriesTheme) -> Self {
        self.fallback_theme = fallback_theme;
        self
    }
}

/// Contiguous run of legend items owned by one chart type.
#[derive(Debug, Clone, PartialEq)]
struct LegendSlice {
    chart_type: String,
    range: Range<usize>,
}

/// Checked/selected state of a chart legend.
///
/// Every index starts checked. `sending_data` only records *explicit*
/// checks, keyed by chart type and local index within that chart type's
/// slice; a chart type with no record lets all of its series participate.
#[derive(Debug, Clone)]
pub struct LegendModel {
    theme: LegendTheme,
    fallback_theme: SeriesTheme,
    chart_type: String,
    combo: bool,
    legend_data: Vec<LegendLabel>,
    slices: Vec<LegendSlice>,
    data: Vec<LegendItem>,
    selected_index: Option<usize>,
    sending_data: IndexMap<String, BTreeSet<usize>>,
    checked_indexes: Vec<bool>,
}

impl LegendModel {
    pub fn new(params: LegendModelParams) -> ChartResult<Self> {
        let LegendModelParams {
            labels,
            legend_data,
            theme,
            chart_type,
            chart_types,
            fallback_theme,
        } = params;

        let combo = chart_types.is_some();
        let slices = match chart_types {
            Some(chart_types) => combo_slices(&labels, &chart_types, legend_data.len())?,
            None => {
                if let LegendLabels::Flat(flat) = &labels {
                    if flat.len() != legend_data.len() {
                        return Err(ChartError::InvalidConfig(format!(
                            "legend has {} labels but {} legend entries",
                            flat.len(),
                            legend_data.len()
                        )));
                    }
                }
                vec![LegendSlice {
                    chart_type: chart_type.clone(),
                    range: 0..legend_data.len(),
                }]
            }
        };

        debug!(
            chart_type = %chart_type,
            combo,
            items = legend_data.len(),
            "create legend model"
        );

        let mut model = Self {
            theme,
            fallback_theme,
            chart_type,
            combo,
            legend_data,
            slices,
            data: Vec::new(),
            selected_index: None,
            sending_data: IndexMap::new(),
            checked_indexes: Vec::new(),
        };
        model.init_checked_indexes();
        model.set_data();
        Ok(model)
    }

    fn init_checked_indexes(&mut self) {
        self.checked_indexes = vec![true; self.legend_data.len()];
    }

    fn slice_of(&self, index: usize) -> Option<&LegendSlice> {
        self.slices.iter().find(|slice| slice.range.contains(&index))
    }

    fn make_items(&self, slice: &LegendSlice) -> Vec<LegendItem> {
        let theme = if self.combo {
            self.theme
                .resolve_keyed(&slice.chart_type, &self.fallback_theme)
        } else {
            self.theme.resolve(&slice.chart_type, &self.fallback_theme)
        };
        let checked = self.sending_data.get(&slice.chart_type);
        let mut series_index = 0;

        self.legend_data[slice.range.clone()]
            .iter()
            .enumerate()
            .map(|(local, label)| {
                let included = checked.is_none_or(|set| set.contains(&local));
                let item_series_index = included.then(|| {
                    let current = series_index;
                    series_index += 1;
                    current
                });
                LegendItem {
                    chart_type: label.chart_type.clone(),
                    label: label.label.clone(),
                    theme: item_theme(theme, local),
                    index: slice.range.start + local,
                    series_index: item_series_index,
                }
            })
            .collect()
    }

    /// Rebuilds the item list; series indexes restart for every chart type.
    fn set_data(&mut self) {
        let data: Vec<LegendItem> = self
            .slices
            .iter()
            .flat_map(|slice| self.make_items(slice))
            .collect();
        trace!(
            items = data.len(),
            participating = data.iter().filter(|item| item.series_index.is_some()).count(),
            "recompute legend data"
        );
        self.data = data;
    }

    fn ensure_index(&self, index: usize) -> ChartResult<()> {
        if index >= self.data.len() {
            return Err(ChartError::IndexOutOfRange {
                index,
                len: self.data.len(),
            });
        }
        Ok(())
    }

    fn add_sending_datum(&mut self, index: usize) -> ChartResult<()> {
        let slice = self.slice_of(index).ok_or(ChartError::IndexOutOfRange {
            index,
            len: self.data.len(),
        })?;
        let local = index - slice.range.start;
        let chart_type = slice.chart_type.clone();
        self.sending_data
            .entry(chart_type)
            .or_default()
            .insert(local);
        Ok(())
    }

    #[must_use]
    pub fn data(&self) -> &[LegendItem] {
        &self.data
    }

    pub fn datum(&self, index: usize) -> ChartResult<&LegendItem> {
        self.data.get(index).ok_or(ChartError::IndexOutOfRange {
            index,
            len: self.data.len(),
        })
    }

    /// Item under the current selection. Callers check
    /// [`selected_index`](Self::selected_index) first; an empty selection is
    /// reported as [`ChartError::NoSelection`].
    pub fn selected_datum(&self) -> ChartResult<&LegendItem> {
        let index = self.selected_index.ok_or(ChartError::NoSelection)?;
        self.datum(index)
    }

    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn update_selected_index(&mut self, value: Option<usize>) {
        self.selected_index = value;
    }

    /// Selects `index`, or clears the selection when it is already selected.
    pub fn toggle_selected_index(&mut self, index: usize) {
        let next = if self.selected_index == Some(index) {
            None
        } else {
            Some(index)
        };
        self.update_selected_index(next);
    }

    /// Whether another item than `index` is currently selected.
    #[must_use]
    pub fn is_unselected_index(&self, index: usize) -> bool {
        self.selected_index.is_some_and(|selected| selected != index)
    }

    #[must_use]
    pub fn is_checked_index(&self, index: usize) -> bool {
        self.checked_indexes.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn is_checked_selected_index(&self) -> bool {
        self.selected_index
            .is_some_and(|selected| self.is_checked_index(selected))
    }

    /// Explicitly checks the selected item and recomputes the item list.
    pub fn check_selected_index(&mut self) -> ChartResult<()> {
        let index = self.selected_index.ok_or(ChartError::NoSelection)?;
        self.ensure_index(index)?;
        self.checked_indexes[index] = true;
        self.add_sending_datum(index)?;
        self.set_data();
        Ok(())
    }

    /// Replaces the checked set with exactly `indexes`.
    ///
    /// All indexes are validated before any state changes.
    pub fn update_checked_data(&mut self, indexes: &[usize]) -> ChartResult<()> {
        for &index in indexes {
            self.ensure_index(index)?;
        }

        self.checked_indexes = vec![false; self.legend_data.len()];
        self.sending_data.clear();
        for &index in indexes {
            self.checked_indexes[index] = true;
            self.add_sending_datum(index)?;
        }
        debug!(checked = indexes.len(), "update checked legend data");
        self.set_data();
        Ok(())
    }

    /// Checked sets consumed by series renderers and the data processor.
    ///
    /// Returns the legend's own chart type entry when one exists, otherwise
    /// the whole map.
    #[must_use]
    pub fn sending_data(&self) -> SendingData<'_> {
        match self.sending_data.get(&self.chart_type) {
            Some(checked) => SendingData::ChartType {
                chart_type: &self.chart_type,
                checked,
            },
            None => SendingData::All(&self.sending_data),
        }
    }

    #[must_use]
    pub fn sending_data_for(&self, chart_type: &str) -> Option<&BTreeSet<usize>> {
        self.sending_data.get(chart_type)
    }

    /// Whether series `local_index` of `chart_type` participates in rendering
    /// and limit computation.
    #[must_use]
    pub fn is_series_included(&self, chart_type: &str, local_index: usize) -> bool {
        self.sending_data
            .get(chart_type)
            .is_none_or(|checked| checked.contains(&local_index))
    }

    #[must_use]
    pub fn checked_indexes(&self) -> &[bool] {
        &self.checked_indexes
    }

    #[must_use]
    pub fn chart_type(&self) -> &str {
        &self.chart_type
    }

    /// Chart types in legend order.
    pub fn chart_types(&self) -> impl Iterator<Item = &str> {
        self.slices.iter().map(|slice| slice.chart_type.as_str())
    }

    #[must_use]
    pub fn is_combo(&self) -> bool {
        self.combo
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn item_theme(theme: &SeriesTheme, local_index: usize) -> ItemTheme {
    ItemTheme {
        color: theme.color_at(local_index).map(str::to_owned),
        single_color: theme.single_color_at(local_index).map(str::to_owned),
        border_color: theme.border_color.clone(),
    }
}

fn combo_slices(
    labels: &LegendLabels,
    chart_types: &[String],
    total: usize,
) -> ChartResult<Vec<LegendSlice>> {
    let mut start = 0;
    let mut slices = Vec::with_capacity(chart_types.len());
    for chart_type in chart_types {
        let count = labels.count_for(chart_type).ok_or_else(|| {
            ChartError::InvalidConfig(format!("no legend labels for chart type `{chart_type}`"))
        })?;
        slices.push(LegendSlice {
            chart_type: chart_type.clone(),
            range: start..start + count,
        });
        start += count;
    }
    if start != total {
        return Err(ChartError::InvalidConfig(format!(
            "chart type label counts sum to {start} but legend has {total} entries"
        )));
    }
    Ok(slices)
}
