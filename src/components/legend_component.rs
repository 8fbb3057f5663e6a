use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use tracing::{debug, trace, warn};

use crate::api::ComponentParams;
use crate::core::{Bound, Position};
use crate::error::{ChartError, ChartResult};
use crate::event_bus::EventBus;
use crate::legend::{LegendItem, LegendModel, LegendModelParams};
use crate::render::{Element, ShapeAttributes, ShapeId, SurfaceHandle, TextStyle, render_util};
use crate::theme::{LegendTheme, SeriesTheme, legend_theme_from_slice};

use super::{Component, Dispatch, RenderOutput, RenderPayload};

const ITEM_HEIGHT: f64 = 20.0;
const CHIP_SIZE: f64 = 12.0;
const CHIP_LABEL_GAP: f64 = 5.0;
const UNSELECTED_OPACITY: f64 = 0.3;
const UNCHECKED_COLOR: &str = "#cccccc";
const LABEL_COLOR: &str = "#333333";
/// Keys of a series colour table; anything else in the slice is styling.
const SERIES_THEME_KEYS: [&str; 3] = ["colors", "singleColors", "borderColor"];

/// Event fired after the selection changed.
pub const SELECT_LEGEND_EVENT: &str = "selectLegend";
/// Event fired after the checked set changed.
pub const CHANGE_CHECKED_LEGENDS_EVENT: &str = "changeCheckedLegends";

/// Legend list with selection/check handling on top of [`LegendModel`].
pub struct LegendComponent {
    name: String,
    model: LegendModel,
    event_bus: EventBus,
    label_style: TextStyle,
    label_color: String,
    max_label_width: Option<f64>,
    visible: bool,
    origin: Position,
    surface: Option<SurfaceHandle>,
    shapes: Vec<ShapeId>,
}

impl LegendComponent {
    /// Builds the legend from the shared data processor.
    ///
    /// Theme slice: an optional `label` font table (`fontSize`, `fontFamily`,
    /// `color`) plus series colours, flat or keyed by chart type. Options:
    /// `visible` (default `true`) and `maxWidth` for label truncation.
    pub fn new(params: ComponentParams) -> ChartResult<Self> {
        let (theme, label) = split_theme(params.theme.as_ref())?;

        let mut label_style = TextStyle::default();
        if let Some(size) = label.get("fontSize").and_then(Value::as_f64) {
            label_style.font_size = size;
        }
        if let Some(family) = label.get("fontFamily").and_then(Value::as_str) {
            label_style.font_family = family.to_owned();
        }
        let label_color = label
            .get("color")
            .and_then(Value::as_str)
            .unwrap_or(LABEL_COLOR)
            .to_owned();

        let visible = params
            .options
            .get("visible")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        let max_label_width = params.options.get("maxWidth").and_then(Value::as_f64);

        let processor = &params.data_processor;
        let mut model_params = LegendModelParams::new(
            processor.legend_labels(),
            processor.legend_data(),
            theme,
            processor.chart_type(),
        )
        .with_fallback_theme(SeriesTheme::default_series());
        if let Some(chart_types) = processor.chart_types() {
            model_params = model_params.with_chart_types(chart_types.iter().cloned());
        }
        let model = LegendModel::new(model_params)?;

        Ok(Self {
            name: params.name,
            model,
            event_bus: params.event_bus,
            label_style,
            label_color,
            max_label_width,
            visible,
            origin: Position::default(),
            surface: None,
            shapes: Vec::new(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &LegendModel {
        &self.model
    }

    /// Direct model access; call a render operation afterwards to redraw.
    pub fn model_mut(&mut self) -> &mut LegendModel {
        &mut self.model
    }

    /// Shapes drawn by the latest render, chip then label per item.
    #[must_use]
    pub fn shapes(&self) -> &[ShapeId] {
        &self.shapes
    }

    fn clear_shapes(&mut self) {
        if let Some(surface) = &self.surface {
            let mut target = surface.borrow_mut();
            for id in self.shapes.drain(..) {
                target.remove(id);
            }
        } else {
            self.shapes.clear();
        }
    }

    fn item_color<'a>(&self, item: &'a LegendItem) -> &'a str {
        if self.model.is_checked_index(item.index) {
            item.theme.color.as_deref().unwrap_or(UNCHECKED_COLOR)
        } else {
            UNCHECKED_COLOR
        }
    }

    fn item_opacity(&self, index: usize) -> f64 {
        if self.model.is_unselected_index(index) {
            UNSELECTED_OPACITY
        } else {
            1.0
        }
    }

    fn draw_items(&mut self) -> ChartResult<()> {
        self.clear_shapes();
        let Some(surface) = self.surface.clone() else {
            trace!(name = %self.name, "no drawing surface; legend shapes skipped");
            return Ok(());
        };

        let mut target = surface.borrow_mut();
        let mut shapes = Vec::with_capacity(self.model.len() * 2);
        for (row, item) in self.model.data().iter().enumerate() {
            let top = self.origin.top + row as f64 * ITEM_HEIGHT;
            let opacity = self.item_opacity(item.index);

            let mut chip_attrs = ShapeAttributes::new();
            chip_attrs.insert("fill".to_owned(), json!(self.item_color(item)));
            chip_attrs.insert("opacity".to_owned(), json!(opacity));
            if let Some(border) = &item.theme.border_color {
                chip_attrs.insert("stroke".to_owned(), json!(border));
            }
            let chip = Bound::new(
                self.origin.left,
                top + (ITEM_HEIGHT - CHIP_SIZE) / 2.0,
                CHIP_SIZE,
                CHIP_SIZE,
            );
            shapes.push(render_util::render_rect(&mut *target, chip, Some(chip_attrs))?);

            let label = match self.max_label_width {
                Some(width) => {
                    render_util::ellipsis_text(&mut *target, &item.label, width, &self.label_style)?
                }
                None => item.label.clone(),
            };
            let mut text_attrs = ShapeAttributes::new();
            text_attrs.insert("fill".to_owned(), json!(self.label_color));
            text_attrs.insert("opacity".to_owned(), json!(opacity));
            let position = Position::new(
                self.origin.left + CHIP_SIZE + CHIP_LABEL_GAP,
                top + ITEM_HEIGHT / 2.0,
            );
            shapes.push(render_util::render_text(
                &mut *target,
                position,
                &label,
                &self.label_style,
                Some(text_attrs),
            )?);
        }
        drop(target);

        self.shapes = shapes;
        Ok(())
    }

    fn element(&self) -> Element {
        let mut element = Element::new("div")
            .with_class("chart-legend")
            .with_attribute("data-name", self.name.as_str());
        for item in self.model.data() {
            let mut class_name = String::from("chart-legend-item");
            if !self.model.is_checked_index(item.index) {
                class_name.push_str(" unchecked");
            }
            if self.model.is_unselected_index(item.index) {
                class_name.push_str(" unselected");
            }
            element.append(
                Element::new("div")
                    .with_class(class_name)
                    .with_attribute("data-index", item.index.to_string())
                    .with_attribute("data-chart-type", item.chart_type.as_str())
                    .with_attribute("data-label", item.label.as_str()),
            );
        }
        element
    }

    fn draw(&mut self, payload: &RenderPayload<'_>) -> ChartResult<RenderOutput> {
        if !self.visible {
            return Ok(RenderOutput::Rendered(None));
        }
        if let Some(position) = payload.layout.and_then(|layout| layout.position) {
            self.origin = position;
        }
        if let Some(shared) = payload.surface {
            if self
                .surface
                .as_ref()
                .is_some_and(|own| !own.same_surface(shared))
            {
                self.shapes.clear();
            }
            self.surface = Some(shared.clone());
        }
        self.draw_items()?;
        Ok(RenderOutput::Rendered(Some(self.element())))
    }

    fn redraw(&mut self) -> ChartResult<()> {
        if self.visible && self.surface.is_some() {
            self.draw_items()?;
        }
        Ok(())
    }

    fn select_legend(&mut self, args: &[Value]) -> ChartResult<Dispatch> {
        let index = index_arg(args.first(), "selectLegend")?;
        let chart_type = self.model.datum(index)?.chart_type.clone();
        self.model.toggle_selected_index(index);
        let selected = self.model.selected_index() == Some(index);
        self.redraw()?;

        debug!(name = %self.name, index, selected, "select legend");
        self.event_bus.fire(
            SELECT_LEGEND_EVENT,
            &json!({ "chartType": chart_type, "index": index, "selected": selected }),
        );
        Ok(Dispatch::Handled)
    }

    fn check_legend(&mut self) -> ChartResult<Dispatch> {
        self.model.check_selected_index()?;
        self.after_checked_change()
    }

    fn check_legends(&mut self, args: &[Value]) -> ChartResult<Dispatch> {
        let indexes = match args.first() {
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| index_arg(Some(value), "checkLegends"))
                .collect::<ChartResult<Vec<_>>>()?,
            _ => {
                return Err(ChartError::InvalidData(
                    "checkLegends expects a list of indexes".to_owned(),
                ));
            }
        };
        self.model.update_checked_data(&indexes)?;
        self.after_checked_change()
    }

    fn after_checked_change(&mut self) -> ChartResult<Dispatch> {
        self.redraw()?;
        let payload = self.sending_payload();
        debug!(name = %self.name, checked = self.checked_count(), "change checked legends");
        self.event_bus.fire(CHANGE_CHECKED_LEGENDS_EVENT, &payload);
        Ok(Dispatch::Handled)
    }

    /// Per chart type checked sets as `{chartType: [index, ...]}`.
    fn sending_payload(&self) -> Value {
        let sets: IndexMap<&str, Vec<usize>> = self
            .model
            .chart_types()
            .filter_map(|chart_type| {
                self.model
                    .sending_data_for(chart_type)
                    .map(|set| (chart_type, set.iter().copied().collect()))
            })
            .collect();
        json!(sets)
    }

    fn checked_count(&self) -> usize {
        self.model
            .checked_indexes()
            .iter()
            .filter(|checked| **checked)
            .count()
    }
}

impl Component for LegendComponent {
    fn render(&mut self, payload: &RenderPayload<'_>) -> ChartResult<RenderOutput> {
        self.draw(payload)
    }

    fn rerender(&mut self, payload: &RenderPayload<'_>) -> ChartResult<RenderOutput> {
        self.draw(payload)
    }

    fn resize(&mut self, payload: &RenderPayload<'_>) -> ChartResult<RenderOutput> {
        if let Some(position) = payload.layout.and_then(|layout| layout.position) {
            self.origin = position;
        }
        self.redraw()?;
        Ok(RenderOutput::Rendered(None))
    }

    fn handle_command(&mut self, name: &str, args: &[Value]) -> ChartResult<Dispatch> {
        match name {
            "selectLegend" => self.select_legend(args),
            "checkLegend" => self.check_legend(),
            "checkLegends" => self.check_legends(args),
            _ => Ok(Dispatch::Unsupported),
        }
    }

    fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            "chartType" => Some(Value::from(self.model.chart_type())),
            "checkedCount" => Some(Value::from(self.checked_count())),
            _ => None,
        }
    }

    fn teardown(&mut self) {
        let shapes = std::mem::take(&mut self.shapes);
        let Some(surface) = &self.surface else {
            return;
        };
        let removed = surface.try_with(|target| {
            for id in shapes {
                target.remove(id);
            }
        });
        if removed.is_none() {
            warn!(name = %self.name, "drawing surface busy; legend shapes left in place");
        }
    }
}

impl fmt::Debug for LegendComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegendComponent")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("visible", &self.visible)
            .field("origin", &self.origin)
            .field("shapes", &self.shapes.len())
            .finish_non_exhaustive()
    }
}

fn index_arg(value: Option<&Value>, command: &str) -> ChartResult<usize> {
    value
        .and_then(Value::as_u64)
        .and_then(|index| usize::try_from(index).ok())
        .ok_or_else(|| ChartError::InvalidData(format!("{command} expects a legend index")))
}

/// Splits a legend theme slice into the series colour theme and the label
/// font table.
///
/// A slice with series keys at the top level is a flat table; otherwise
/// every object entry is a table keyed by chart type. Keys that are not
/// series colour keys are ignored at either level.
fn split_theme(slice: Option<&Value>) -> ChartResult<(LegendTheme, Map<String, Value>)> {
    let Some(Value::Object(slice)) = slice else {
        return Ok((LegendTheme::default(), Map::new()));
    };
    let mut colors = slice.clone();
    let label = match colors.remove("label") {
        Some(Value::Object(label)) => label,
        _ => Map::new(),
    };

    let flat = colors.keys().any(|key| is_series_theme_key(key));
    let colors: Map<String, Value> = if flat {
        colors.retain(|key, _| is_series_theme_key(key));
        colors
    } else {
        colors
            .into_iter()
            .filter_map(|(chart_type, table)| match table {
                Value::Object(mut table) => {
                    table.retain(|key, _| is_series_theme_key(key));
                    (!table.is_empty()).then(|| (chart_type, Value::Object(table)))
                }
                _ => None,
            })
            .collect()
    };

    let theme = if colors.is_empty() {
        LegendTheme::default()
    } else {
        legend_theme_from_slice(&Value::Object(colors))?
    };
    Ok((theme, label))
}

fn is_series_theme_key(key: &str) -> bool {
    SERIES_THEME_KEYS.contains(&key)
}
