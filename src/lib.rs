//! chart-components: componentized chart-rendering core.
//!
//! A [`ComponentRegistry`] owns the chart's components (axes, series,
//! legend, plot, tooltip, ...) in registration order, drives them through
//! shared render/rerender/resize passes against one drawing surface, and
//! broadcasts commands. The [`LegendModel`] keeps the checked/selected state
//! that decides which series participate in rendering.

pub mod api;
pub mod components;
pub mod core;
pub mod data;
pub mod error;
pub mod event_bus;
pub mod legend;
pub mod options;
pub mod render;
pub mod telemetry;
pub mod theme;

pub use api::{
    ComponentParams, ComponentRegistry, ConditionMap, RegisterParams, RegisteredComponent,
    RegistryParams, RenderPass,
};
pub use components::{
    AnimationSelector, Command, Component, Dispatch, LegendComponent, PlotComponent,
    RenderOperation, RenderOutput, RenderPayload, SurfaceFactory,
};
pub use core::{AxisData, Bound, BoundsAndScale, Dimension, Layout, Limit, Position};
pub use data::{DataProcessor, SeriesDataProcessor};
pub use error::{ChartError, ChartResult};
pub use event_bus::{EventBus, SubscriptionId};
pub use legend::{LegendItem, LegendModel, LegendModelParams, SendingData};
pub use options::ChartOptions;
pub use render::{DrawingSurface, Element, RecordingSurface, SurfaceHandle};
pub use theme::{ChartTheme, LegendTheme, SeriesTheme};
