use std::cell::RefCell;
use std::rc::Rc;

use chart_components::api::{ComponentRegistry, ConditionMap, RegisterParams, RegistryParams};
use chart_components::components::{AnimationSelector, Command, Component, Dispatch};
use chart_components::data::{RawChartData, RawSeriesData, RawSeriesDatum, SeriesDataProcessor};
use chart_components::error::{ChartError, ChartResult};
use chart_components::event_bus::EventBus;
use serde_json::{Value, json};

type Calls = Rc<RefCell<Vec<String>>>;

/// Series stand-in that animates and answers `showTooltip`.
struct Series {
    name: String,
    chart_type: String,
    calls: Calls,
}

impl Component for Series {
    fn show_animation(&mut self, selector: &AnimationSelector) -> Dispatch {
        if selector
            .chart_type
            .as_deref()
            .is_some_and(|chart_type| chart_type != self.chart_type)
        {
            return Dispatch::Unsupported;
        }
        self.calls
            .borrow_mut()
            .push(format!("{}:show:{:?}", self.name, selector.index));
        Dispatch::Handled
    }

    fn hide_animation(&mut self, _selector: &AnimationSelector) -> Dispatch {
        self.calls.borrow_mut().push(format!("{}:hide", self.name));
        Dispatch::Handled
    }

    fn handle_command(&mut self, name: &str, args: &[Value]) -> ChartResult<Dispatch> {
        match name {
            "showTooltip" => {
                self.calls
                    .borrow_mut()
                    .push(format!("{}:tooltip:{}", self.name, args.len()));
                Ok(Dispatch::Handled)
            }
            "explode" if self.chart_type == "column" => {
                Err(ChartError::InvalidData(format!("{} exploded", self.name)))
            }
            "explode" => {
                self.calls.borrow_mut().push(format!("{}:explode", self.name));
                Ok(Dispatch::Handled)
            }
            _ => Ok(Dispatch::Unsupported),
        }
    }

    fn attribute(&self, key: &str) -> Option<Value> {
        match key {
            "chartType" => Some(Value::from(self.chart_type.as_str())),
            _ => None,
        }
    }
}

struct Inert;

impl Component for Inert {}

fn registry(calls: &Calls) -> ComponentRegistry {
    let raw = RawChartData {
        categories: Vec::new(),
        series: RawSeriesData::Flat(vec![RawSeriesDatum::new("a", [1.0])]),
    };
    let processor = SeriesDataProcessor::new("combo", raw).expect("processor");
    let mut registry = ComponentRegistry::new(
        RegistryParams::new()
            .with_data_processor(Rc::new(processor))
            .with_event_bus(EventBus::new()),
    );

    registry
        .register("xAxis", |_| Ok(Inert), RegisterParams::new())
        .expect("x axis");
    for (name, chart_type) in [("columnSeries", "column"), ("lineSeries", "line")] {
        let calls = Rc::clone(calls);
        registry
            .register(
                name,
                move |params| {
                    Ok(Series {
                        name: params.name,
                        chart_type: chart_type.to_owned(),
                        calls,
                    })
                },
                RegisterParams::new().with_component_type("series"),
            )
            .expect("series");
    }
    registry
        .register(
            "rightYAxis",
            |_| Ok(Inert),
            RegisterParams::new().with_component_type("yAxis").with_index(1),
        )
        .expect("right axis");
    registry
}

fn conditions(pairs: &[(&str, Value)]) -> ConditionMap {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), value.clone()))
        .collect()
}

fn names<'a>(
    found: impl IntoIterator<Item = &'a chart_components::RegisteredComponent>,
) -> Vec<&'a str> {
    found.into_iter().map(|entry| entry.name()).collect()
}

#[test]
fn find_where_matches_every_condition() {
    let calls = Calls::default();
    let registry = registry(&calls);

    let series = registry.find_where(&conditions(&[("componentType", json!("series"))]));
    assert_eq!(names(series), vec!["columnSeries", "lineSeries"]);

    let line = registry.find_where(&conditions(&[
        ("componentType", json!("series")),
        ("chartType", json!("line")),
    ]));
    assert_eq!(names(line), vec!["lineSeries"]);

    let right_axis = registry.find_where(&conditions(&[
        ("componentType", json!("yAxis")),
        ("index", json!(1)),
    ]));
    assert_eq!(names(right_axis), vec!["rightYAxis"]);
}

#[test]
fn find_where_with_unknown_key_or_value_matches_nothing() {
    let calls = Calls::default();
    let registry = registry(&calls);

    assert!(
        registry
            .find_where(&conditions(&[("chartType", json!("area"))]))
            .is_empty()
    );
    assert!(
        registry
            .find_where(&conditions(&[("nonexistent", json!(true))]))
            .is_empty()
    );
    assert!(
        registry
            .find_where(&conditions(&[("index", json!("1"))]))
            .is_empty()
    );
}

#[test]
fn empty_conditions_match_all_components_in_order() {
    let calls = Calls::default();
    let registry = registry(&calls);

    let all = registry.find_where(&ConditionMap::new());
    assert_eq!(
        names(all),
        vec!["xAxis", "columnSeries", "lineSeries", "rightYAxis"]
    );
}

#[test]
fn execute_dispatches_to_supporting_components_in_order() {
    let calls = Calls::default();
    let mut registry = registry(&calls);

    let handled = registry
        .execute(&Command::named("showTooltip", vec![json!({"index": 2}), json!(true)]))
        .expect("show tooltip");
    assert_eq!(handled, 2);
    assert_eq!(
        *calls.borrow(),
        vec!["columnSeries:tooltip:2", "lineSeries:tooltip:2"]
    );
}

#[test]
fn animations_are_broadcast_with_their_selector() {
    let calls = Calls::default();
    let mut registry = registry(&calls);

    let selector = AnimationSelector {
        chart_type: Some("line".to_owned()),
        group_index: Some(0),
        index: Some(3),
    };
    let handled = registry
        .execute(&Command::ShowAnimation(selector))
        .expect("show animation");
    assert_eq!(handled, 1);

    let handled = registry
        .execute(&Command::HideAnimation(AnimationSelector::default()))
        .expect("hide animation");
    assert_eq!(handled, 2);

    assert_eq!(
        *calls.borrow(),
        vec!["lineSeries:show:Some(3)", "columnSeries:hide", "lineSeries:hide"]
    );
}

#[test]
fn unknown_command_is_silently_skipped() {
    let calls = Calls::default();
    let mut registry = registry(&calls);

    let handled = registry
        .execute(&Command::named("zoom", Vec::new()))
        .expect("unsupported command");
    assert_eq!(handled, 0);
    assert!(calls.borrow().is_empty());
}

#[test]
fn command_error_is_returned_after_every_component_ran() {
    let calls = Calls::default();
    let mut registry = registry(&calls);

    let err = registry
        .execute(&Command::named("explode", Vec::new()))
        .expect_err("command fails");
    assert!(matches!(err, ChartError::InvalidData(message) if message.contains("columnSeries")));
    // The series after the failing one still received the command.
    assert_eq!(*calls.borrow(), vec!["lineSeries:explode"]);
}
