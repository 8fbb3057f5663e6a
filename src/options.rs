//! User options keyed by component type.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ChartError, ChartResult};

/// Component-type keyed options.
///
/// A JSON array under a component type configures several same-type
/// components individually; the registry picks the entry matching the
/// component's index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartOptions {
    entries: IndexMap<String, Value>,
}

impl ChartOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidConfig(format!("failed to parse options json: {e}")))
    }

    #[must_use]
    pub fn with_entry(mut self, component_type: impl Into<String>, value: Value) -> Self {
        self.entries.insert(component_type.into(), value);
        self
    }

    #[must_use]
    pub fn get(&self, component_type: &str) -> Option<&Value> {
        self.entries.get(component_type)
    }
}

/// Picks the options object for one component.
///
/// Explicit options win over the chart-level entry for `component_type`.
/// List values are indexed by `index`; absent or null values resolve to an
/// empty object.
pub fn resolve_component_options(
    explicit: Option<Value>,
    options: &ChartOptions,
    component_type: &str,
    index: usize,
) -> ChartResult<Value> {
    let selected = explicit.or_else(|| options.get(component_type).cloned());
    match selected {
        Some(Value::Array(mut list)) => {
            let len = list.len();
            if index >= len {
                return Err(ChartError::InvalidConfig(format!(
                    "options for `{component_type}` list {len} entries, index {index} requested"
                )));
            }
            Ok(list.swap_remove(index))
        }
        Some(Value::Null) | None => Ok(Value::Object(Map::new())),
        Some(value) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn list_options_are_indexed() {
        let options =
            ChartOptions::new().with_entry("yAxis", json!([{"title": "a"}, {"title": "b"}]));
        let resolved = resolve_component_options(None, &options, "yAxis", 1).expect("resolve");
        assert_eq!(resolved, json!({"title": "b"}));
    }

    #[test]
    fn explicit_options_override_chart_options() {
        let options = ChartOptions::new().with_entry("legend", json!({"visible": false}));
        let resolved =
            resolve_component_options(Some(json!({"visible": true})), &options, "legend", 0)
                .expect("resolve");
        assert_eq!(resolved, json!({"visible": true}));
    }

    #[test]
    fn missing_options_resolve_to_empty_object() {
        let resolved =
            resolve_component_options(None, &ChartOptions::new(), "plot", 3).expect("resolve");
        assert_eq!(resolved, json!({}));
    }

    #[test]
    fn list_index_past_end_is_a_config_error() {
        let options = ChartOptions::new().with_entry("series", json!([{}]));
        let err = resolve_component_options(None, &options, "series", 2).expect_err("must fail");
        assert!(matches!(err, ChartError::InvalidConfig(_)));
    }
}
