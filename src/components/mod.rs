//! Component capability contract.
//!
//! Every capability has a no-op default, so the registry can hold one
//! homogeneous collection and dispatch unconditionally; a component only
//! overrides what it supports.

mod legend_component;
mod plot_component;

use std::any::Any;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{AxisData, BoundsAndScale, Layout, Limit};
use crate::error::ChartResult;
use crate::render::{Element, SurfaceHandle};

pub use legend_component::{
    CHANGE_CHECKED_LEGENDS_EVENT, LegendComponent, SELECT_LEGEND_EVENT,
};
pub use plot_component::{PlotComponent, SurfaceFactory};

/// Input of one component render call, assembled fresh by the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct RenderPayload<'a> {
    pub name: &'a str,
    pub component_type: &'a str,
    /// `None` when the pass carries no shared bounds.
    pub layout: Option<Layout>,
    pub bounds_and_scale: Option<&'a BoundsAndScale>,
    pub additional: &'a IndexMap<String, Value>,
    /// Surface established earlier in the pass, if any.
    pub surface: Option<&'a SurfaceHandle>,
}

impl RenderPayload<'_> {
    #[must_use]
    pub fn limit(&self, key: &str) -> Option<Limit> {
        self.bounds_and_scale
            .and_then(|bounds| bounds.limit_map.get(key))
            .copied()
    }

    #[must_use]
    pub fn axis_data(&self, key: &str) -> Option<&AxisData> {
        self.bounds_and_scale
            .and_then(|bounds| bounds.axis_data_map.get(key))
    }

    #[must_use]
    pub fn max_radius(&self) -> Option<f64> {
        self.bounds_and_scale.and_then(|bounds| bounds.max_radius)
    }
}

/// Result of a render-like capability.
#[derive(Debug, Clone)]
pub enum RenderOutput {
    /// The component does not support the requested operation.
    Skipped,
    /// Rendered, optionally producing an element to attach.
    Rendered(Option<Element>),
    /// Rendered after creating the shared drawing surface.
    CreatedSurface {
        element: Element,
        surface: SurfaceHandle,
    },
}

/// Render-like operations driven through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderOperation {
    Render,
    Rerender,
    Resize,
}

impl RenderOperation {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Render => "render",
            Self::Rerender => "rerender",
            Self::Resize => "resize",
        }
    }

    pub(crate) fn invoke(
        self,
        component: &mut dyn Component,
        payload: &RenderPayload<'_>,
    ) -> ChartResult<RenderOutput> {
        match self {
            Self::Render => component.render(payload),
            Self::Rerender => component.rerender(payload),
            Self::Resize => component.resize(payload),
        }
    }
}

/// Target of a show/hide animation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSelector {
    #[serde(default)]
    pub chart_type: Option<String>,
    #[serde(default)]
    pub group_index: Option<usize>,
    #[serde(default)]
    pub index: Option<usize>,
}

/// Fire-and-forget operation broadcast with `ComponentRegistry::execute`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ShowAnimation(AnimationSelector),
    HideAnimation(AnimationSelector),
    /// Open-ended named operation (`selectLegend`, `showTooltip`, ...).
    Named { name: String, args: Vec<Value> },
}

impl Command {
    #[must_use]
    pub fn named(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Named {
            name: name.into(),
            args,
        }
    }

    /// `selectLegend(index)`: toggles the legend selection.
    #[must_use]
    pub fn select_legend(index: usize) -> Self {
        Self::named("selectLegend", vec![Value::from(index)])
    }

    /// `checkLegend`: checks the selected legend item.
    #[must_use]
    pub fn check_legend() -> Self {
        Self::named("checkLegend", Vec::new())
    }

    /// `checkLegends(indexes)`: replaces the checked legend set.
    #[must_use]
    pub fn check_legends(indexes: &[usize]) -> Self {
        Self::named(
            "checkLegends",
            vec![Value::Array(indexes.iter().map(|&i| Value::from(i)).collect())],
        )
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::ShowAnimation(_) => "showAnimation",
            Self::HideAnimation(_) => "hideAnimation",
            Self::Named { name, .. } => name,
        }
    }

    pub(crate) fn dispatch(&self, component: &mut dyn Component) -> ChartResult<Dispatch> {
        match self {
            Self::ShowAnimation(selector) => Ok(component.show_animation(selector)),
            Self::HideAnimation(selector) => Ok(component.hide_animation(selector)),
            Self::Named { name, args } => component.handle_command(name, args),
        }
    }
}

/// Whether a component acted on a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    Unsupported,
}

/// Polymorphic render/update unit (axis, series, legend, plot, tooltip, ...).
pub trait Component: Any {
    fn render(&mut self, _payload: &RenderPayload<'_>) -> ChartResult<RenderOutput> {
        Ok(RenderOutput::Skipped)
    }

    fn rerender(&mut self, _payload: &RenderPayload<'_>) -> ChartResult<RenderOutput> {
        Ok(RenderOutput::Skipped)
    }

    fn resize(&mut self, _payload: &RenderPayload<'_>) -> ChartResult<RenderOutput> {
        Ok(RenderOutput::Skipped)
    }

    fn show_animation(&mut self, _selector: &AnimationSelector) -> Dispatch {
        Dispatch::Unsupported
    }

    fn hide_animation(&mut self, _selector: &AnimationSelector) -> Dispatch {
        Dispatch::Unsupported
    }

    fn handle_command(&mut self, _name: &str, _args: &[Value]) -> ChartResult<Dispatch> {
        Ok(Dispatch::Unsupported)
    }

    /// Component-specific attribute matched by `ComponentRegistry::find_where`.
    fn attribute(&self, _key: &str) -> Option<Value> {
        None
    }

    /// Best-effort release of surface resources when the chart is discarded.
    fn teardown(&mut self) {}
}
