use std::any::Any;
use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::components::Component;
use crate::error::{ChartError, ChartResult};
use crate::options::resolve_component_options;
use crate::render::SurfaceHandle;

use super::{ComponentParams, RegisterParams, RegistryParams};

/// A component together with the identity the registry tagged it with.
pub struct RegisteredComponent {
    pub(super) name: String,
    pub(super) component_type: String,
    pub(super) index: usize,
    pub(super) component: Box<dyn Component>,
}

impl RegisteredComponent {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn component(&self) -> &dyn Component {
        &*self.component
    }

    pub fn component_mut(&mut self) -> &mut dyn Component {
        &mut *self.component
    }

    #[must_use]
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        let component: &dyn Any = &*self.component;
        component.downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        let component: &mut dyn Any = &mut *self.component;
        component.downcast_mut::<T>()
    }

    /// Attribute lookup used by `find_where`: registry tags first, then the
    /// component's own attributes.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            "name" | "componentName" => Some(Value::from(self.name.as_str())),
            "componentType" => Some(Value::from(self.component_type.as_str())),
            "index" => Some(Value::from(self.index)),
            _ => self.component.attribute(key),
        }
    }
}

impl fmt::Debug for RegisteredComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredComponent")
            .field("name", &self.name)
            .field("component_type", &self.component_type)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Owns the chart's components in registration order plus a name index.
pub struct ComponentRegistry {
    pub(super) components: Vec<RegisteredComponent>,
    pub(super) by_name: IndexMap<String, usize>,
    pub(super) params: RegistryParams,
    pub(super) surface: Option<SurfaceHandle>,
}

impl ComponentRegistry {
    #[must_use]
    pub fn new(params: RegistryParams) -> Self {
        Self {
            components: Vec::new(),
            by_name: IndexMap::new(),
            params,
            surface: None,
        }
    }

    /// Builds a component with `factory` and appends it to the render order.
    ///
    /// The theme slice is `theme[component_type]` and the options slice is
    /// `options[component_type]`, indexed by `params.index` when it is a
    /// list. Re-registering a name points lookups at the new component; the
    /// old one keeps its place in the render order.
    pub fn register<C, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
        params: RegisterParams,
    ) -> ChartResult<()>
    where
        C: Component,
        F: FnOnce(ComponentParams) -> ChartResult<C>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(ChartError::InvalidConfig(
                "component name must not be empty".to_owned(),
            ));
        }
        let data_processor = self.params.data_processor.clone().ok_or_else(|| {
            ChartError::InvalidConfig(format!(
                "cannot register `{name}`: registry has no data processor"
            ))
        })?;
        let event_bus = self.params.event_bus.clone().ok_or_else(|| {
            ChartError::InvalidConfig(format!(
                "cannot register `{name}`: registry has no event bus"
            ))
        })?;

        let RegisterParams {
            component_type,
            index,
            theme,
            options,
            extra,
        } = params;
        let component_type = component_type.unwrap_or_else(|| name.clone());
        let index = index.unwrap_or(0);
        let theme = theme.or_else(|| self.params.theme.slice(&component_type).cloned());
        let options =
            resolve_component_options(options, &self.params.options, &component_type, index)?;

        let component = factory(ComponentParams {
            name: name.clone(),
            component_type: component_type.clone(),
            index,
            theme,
            options,
            data_processor,
            has_axes: self.params.has_axes,
            event_bus,
            extra,
        })?;

        debug!(
            name = %name,
            component_type = %component_type,
            index,
            position = self.components.len(),
            "register component"
        );

        let position = self.components.len();
        self.components.push(RegisteredComponent {
            name: name.clone(),
            component_type,
            index,
            component: Box::new(component),
        });
        if let Some(previous) = self.by_name.insert(name.clone(), position) {
            debug!(name = %name, previous, position, "component name re-registered");
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredComponent> {
        self.by_name
            .get(name)
            .and_then(|&position| self.components.get(position))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RegisteredComponent> {
        let position = *self.by_name.get(name)?;
        self.components.get_mut(position)
    }

    /// Typed access to a registered component.
    #[must_use]
    pub fn get_as<T: Component>(&self, name: &str) -> Option<&T> {
        self.get(name).and_then(RegisteredComponent::downcast_ref::<T>)
    }

    pub fn get_as_mut<T: Component>(&mut self, name: &str) -> Option<&mut T> {
        self.get_mut(name).and_then(RegisteredComponent::downcast_mut::<T>)
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component names in render order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(RegisteredComponent::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredComponent> {
        self.components.iter()
    }

    /// Surface established by the most recent render pass.
    #[must_use]
    pub fn surface(&self) -> Option<&SurfaceHandle> {
        self.surface.as_ref()
    }

    #[must_use]
    pub fn params(&self) -> &RegistryParams {
        &self.params
    }

    /// Tears down every component in render order and empties the registry.
    ///
    /// Dropping the registry does the same.
    pub fn destroy(&mut self) {
        self.teardown_components();
        self.by_name.clear();
        self.surface = None;
    }

    fn teardown_components(&mut self) {
        if self.components.is_empty() {
            return;
        }
        for entry in &mut self.components {
            entry.component.teardown();
        }
        debug!(count = self.components.len(), "destroy components");
        self.components.clear();
    }
}

impl Drop for ComponentRegistry {
    fn drop(&mut self) {
        self.teardown_components();
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("components", &self.components)
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}
