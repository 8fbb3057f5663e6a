use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::data::DataProcessor;
use crate::event_bus::EventBus;
use crate::options::ChartOptions;
use crate::theme::ChartTheme;

/// Chart-level configuration and shared references owned by a registry.
///
/// The data processor and event bus are required before any component can
/// be registered.
#[derive(Clone, Default)]
pub struct RegistryParams {
    pub theme: ChartTheme,
    pub options: ChartOptions,
    pub data_processor: Option<Rc<dyn DataProcessor>>,
    pub has_axes: bool,
    pub event_bus: Option<EventBus>,
}

impl RegistryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ChartTheme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_data_processor(mut self, data_processor: Rc<dyn DataProcessor>) -> Self {
        self.data_processor = Some(data_processor);
        self
    }

    #[must_use]
    pub fn with_axes(mut self, has_axes: bool) -> Self {
        self.has_axes = has_axes;
        self
    }

    #[must_use]
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }
}

impl fmt::Debug for RegistryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryParams")
            .field("theme", &self.theme)
            .field("options", &self.options)
            .field("data_processor", &self.data_processor.is_some())
            .field("has_axes", &self.has_axes)
            .field("event_bus", &self.event_bus)
            .finish()
    }
}

/// Per-registration parameters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegisterParams {
    /// Category used for theme/options lookup; defaults to the name.
    pub component_type: Option<String>,
    /// Disambiguates same-type siblings; defaults to 0.
    pub index: Option<usize>,
    /// Overrides `theme[component_type]`.
    pub theme: Option<Value>,
    /// Overrides `options[component_type]`; a list is still indexed.
    pub options: Option<Value>,
    /// Component-specific values passed through untouched.
    pub extra: IndexMap<String, Value>,
}

impl RegisterParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_component_type(mut self, component_type: impl Into<String>) -> Self {
        self.component_type = Some(component_type.into());
        self
    }

    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Value) -> Self {
        self.theme = Some(theme);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Configuration snapshot handed to a component factory.
#[derive(Clone)]
pub struct ComponentParams {
    pub name: String,
    pub component_type: String,
    pub index: usize,
    pub theme: Option<Value>,
    pub options: Value,
    pub data_processor: Rc<dyn DataProcessor>,
    pub has_axes: bool,
    pub event_bus: EventBus,
    pub extra: IndexMap<String, Value>,
}

impl fmt::Debug for ComponentParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentParams")
            .field("name", &self.name)
            .field("component_type", &self.component_type)
            .field("index", &self.index)
            .field("theme", &self.theme)
            .field("options", &self.options)
            .field("data_processor", &self.data_processor.chart_type())
            .field("has_axes", &self.has_axes)
            .field("event_bus", &self.event_bus)
            .field("extra", &self.extra)
            .finish()
    }
}
