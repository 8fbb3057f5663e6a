use std::fmt;
use std::rc::Rc;

use serde_json::{Value, json};
use tracing::{debug, trace, warn};

use crate::api::ComponentParams;
use crate::core::{Bound, Dimension};
use crate::error::{ChartError, ChartResult};
use crate::render::{Element, ShapeAttributes, ShapeId, SurfaceHandle, render_util};

use super::{Component, RenderOutput, RenderPayload};

const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Creates the chart's drawing surface for a given plot size.
pub type SurfaceFactory = Rc<dyn Fn(Dimension) -> ChartResult<SurfaceHandle>>;

/// Plot area background; the component that establishes the drawing surface.
pub struct PlotComponent {
    name: String,
    background: String,
    factory: SurfaceFactory,
    surface: Option<SurfaceHandle>,
    background_rect: Option<ShapeId>,
}

impl PlotComponent {
    pub fn new(params: ComponentParams, factory: SurfaceFactory) -> ChartResult<Self> {
        let background = params
            .theme
            .as_ref()
            .and_then(|theme| theme.get("background"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_BACKGROUND)
            .to_owned();

        Ok(Self {
            name: params.name,
            background,
            factory,
            surface: None,
            background_rect: None,
        })
    }

    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }

    #[must_use]
    pub fn background_rect(&self) -> Option<ShapeId> {
        self.background_rect
    }

    fn plot_bound(&self, payload: &RenderPayload<'_>) -> ChartResult<Bound> {
        let layout = payload.layout.unwrap_or_default();
        let dimension = layout.dimension.ok_or_else(|| {
            ChartError::InvalidData(format!("`{}` has no layout dimension", self.name))
        })?;
        let bound = Bound::from_layout(layout.position.unwrap_or_default(), dimension);
        bound.validate()?;
        Ok(bound)
    }

    fn draw(&mut self, payload: &RenderPayload<'_>) -> ChartResult<RenderOutput> {
        let bound = self.plot_bound(payload)?;

        // A surface handed in by the pass always wins; otherwise reuse ours
        // and report it so later components share it.
        let (surface, supplies_surface) = match (payload.surface, &self.surface) {
            (Some(shared), _) => (shared.clone(), false),
            (None, Some(own)) => (own.clone(), true),
            (None, None) => {
                let created = (self.factory)(Dimension::new(bound.width, bound.height))?;
                debug!(
                    name = %self.name,
                    width = bound.width,
                    height = bound.height,
                    "create drawing surface"
                );
                (created, true)
            }
        };

        if self
            .surface
            .as_ref()
            .is_some_and(|own| !own.same_surface(&surface))
        {
            self.background_rect = None;
        }

        let rect = match self.background_rect {
            Some(rect) => {
                surface.with(|target| render_util::update_rect_bound(target, rect, bound))?;
                rect
            }
            None => {
                let mut attrs = ShapeAttributes::new();
                attrs.insert("fill".to_owned(), json!(self.background));
                attrs.insert("stroke-width".to_owned(), json!(0));
                surface.with(|target| render_util::render_rect(target, bound, Some(attrs)))?
            }
        };
        self.background_rect = Some(rect);
        self.surface = Some(surface.clone());

        let element = Element::new("div")
            .with_class("chart-plot-area")
            .with_attribute("data-name", self.name.as_str());
        Ok(if supplies_surface {
            RenderOutput::CreatedSurface { element, surface }
        } else {
            RenderOutput::Rendered(Some(element))
        })
    }
}

impl Component for PlotComponent {
    fn render(&mut self, payload: &RenderPayload<'_>) -> ChartResult<RenderOutput> {
        self.draw(payload)
    }

    fn rerender(&mut self, payload: &RenderPayload<'_>) -> ChartResult<RenderOutput> {
        self.draw(payload)
    }

    fn resize(&mut self, payload: &RenderPayload<'_>) -> ChartResult<RenderOutput> {
        let (Some(surface), Some(rect)) = (self.surface.clone(), self.background_rect) else {
            return self.draw(payload);
        };
        let bound = self.plot_bound(payload)?;
        surface.with(|target| render_util::update_rect_bound(target, rect, bound))?;
        trace!(name = %self.name, width = bound.width, height = bound.height, "resize plot");
        Ok(RenderOutput::Rendered(None))
    }

    fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            "background" => Some(Value::from(self.background.as_str())),
            _ => None,
        }
    }

    fn teardown(&mut self) {
        if let (Some(surface), Some(rect)) = (&self.surface, self.background_rect.take()) {
            if surface.try_with(|target| target.remove(rect)).is_none() {
                warn!(name = %self.name, "drawing surface busy; plot background left in place");
            }
        }
    }
}

impl fmt::Debug for PlotComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotComponent")
            .field("name", &self.name)
            .field("background", &self.background)
            .field("surface", &self.surface)
            .field("background_rect", &self.background_rect)
            .finish_non_exhaustive()
    }
}
