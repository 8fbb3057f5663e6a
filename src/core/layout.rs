use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Dimension, Limit, Position};

/// Layout rectangle handed to a single component.
///
/// Either part may be missing when the shared bounds carry no entry for the
/// component's name nor its type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    pub dimension: Option<Dimension>,
    pub position: Option<Position>,
}

/// Per-axis scale data shared by axes, series and tooltips.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisData {
    pub labels: Vec<String>,
    pub tick_count: usize,
    #[serde(default)]
    pub is_label_axis: bool,
    #[serde(default)]
    pub is_vertical: bool,
}

/// Geometry computed once per full render pass and shared by every component.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsAndScale {
    #[serde(default)]
    pub dimension_map: IndexMap<String, Dimension>,
    #[serde(default)]
    pub position_map: IndexMap<String, Position>,
    #[serde(default)]
    pub limit_map: IndexMap<String, Limit>,
    #[serde(default)]
    pub axis_data_map: IndexMap<String, AxisData>,
    #[serde(default)]
    pub max_radius: Option<f64>,
}

impl BoundsAndScale {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_dimension(mut self, key: impl Into<String>, dimension: Dimension) -> Self {
        self.dimension_map.insert(key.into(), dimension);
        self
    }

    #[must_use]
    pub fn with_position(mut self, key: impl Into<String>, position: Position) -> Self {
        self.position_map.insert(key.into(), position);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, key: impl Into<String>, limit: Limit) -> Self {
        self.limit_map.insert(key.into(), limit);
        self
    }

    #[must_use]
    pub fn with_axis_data(mut self, key: impl Into<String>, axis_data: AxisData) -> Self {
        self.axis_data_map.insert(key.into(), axis_data);
        self
    }

    /// Picks the layout for a component, preferring an entry keyed by its
    /// name and falling back to one keyed by its type.
    #[must_use]
    pub fn layout_for(&self, name: &str, component_type: &str) -> Layout {
        Layout {
            dimension: self
                .dimension_map
                .get(name)
                .or_else(|| self.dimension_map.get(component_type))
                .copied(),
            position: self
                .position_map
                .get(name)
                .or_else(|| self.position_map.get(component_type))
                .copied(),
        }
    }
}
