use std::cell::Cell;
use std::rc::Rc;

use chart_components::api::{ComponentParams, ComponentRegistry, RegisterParams, RegistryParams};
use chart_components::components::Component;
use chart_components::data::{RawChartData, RawSeriesData, RawSeriesDatum, SeriesDataProcessor};
use chart_components::event_bus::EventBus;
use chart_components::options::ChartOptions;
use chart_components::theme::ChartTheme;
use chart_components::ChartError;
use serde_json::json;

struct Probe {
    params: ComponentParams,
    teardowns: Rc<Cell<usize>>,
}

impl Probe {
    fn new(params: ComponentParams) -> Self {
        Self {
            params,
            teardowns: Rc::new(Cell::new(0)),
        }
    }

    fn counting(params: ComponentParams, teardowns: Rc<Cell<usize>>) -> Self {
        Self { params, teardowns }
    }
}

impl Component for Probe {
    fn teardown(&mut self) {
        self.teardowns.set(self.teardowns.get() + 1);
    }
}

struct Other;

impl Component for Other {}

fn processor() -> SeriesDataProcessor {
    let raw = RawChartData {
        categories: vec!["a".to_owned(), "b".to_owned()],
        series: RawSeriesData::Flat(vec![
            RawSeriesDatum::new("first", [1.0, 2.0]),
            RawSeriesDatum::new("second", [3.0, 4.0]),
        ]),
    };
    SeriesDataProcessor::new("line", raw).expect("processor")
}

fn params() -> RegistryParams {
    RegistryParams::new()
        .with_data_processor(Rc::new(processor()))
        .with_event_bus(EventBus::new())
}

#[test]
fn register_resolves_theme_slice_and_indexed_options() {
    let theme = ChartTheme::new().with_slice("legend", json!({"label": {"fontSize": 11}}));
    let options = ChartOptions::new().with_entry("legend", json!([{"a": 1}, {"b": 2}]));
    let mut registry = ComponentRegistry::new(params().with_theme(theme).with_options(options));

    registry
        .register(
            "legend",
            |params| Ok(Probe::new(params)),
            RegisterParams::new().with_index(1),
        )
        .expect("register legend");

    let probe = registry.get_as::<Probe>("legend").expect("probe");
    assert_eq!(probe.params.options, json!({"b": 2}));
    assert_eq!(probe.params.theme, Some(json!({"label": {"fontSize": 11}})));
    assert_eq!(probe.params.component_type, "legend");
    assert_eq!(probe.params.index, 1);
}

#[test]
fn component_type_drives_lookup_when_it_differs_from_name() {
    let options =
        ChartOptions::new().with_entry("yAxis", json!([{"title": "left"}, {"title": "right"}]));
    let mut registry = ComponentRegistry::new(params().with_options(options));

    registry
        .register(
            "rightYAxis",
            |params| Ok(Probe::new(params)),
            RegisterParams::new().with_component_type("yAxis").with_index(1),
        )
        .expect("register axis");

    let entry = registry.get("rightYAxis").expect("entry");
    assert_eq!(entry.name(), "rightYAxis");
    assert_eq!(entry.component_type(), "yAxis");
    assert_eq!(entry.index(), 1);
    let probe = entry.downcast_ref::<Probe>().expect("probe");
    assert_eq!(probe.params.options, json!({"title": "right"}));
}

#[test]
fn missing_slices_resolve_to_defaults() {
    let mut registry = ComponentRegistry::new(params().with_axes(true));
    registry
        .register(
            "tooltip",
            |params| Ok(Probe::new(params)),
            RegisterParams::new().with_extra("chartType", json!("line")),
        )
        .expect("register tooltip");

    let probe = registry.get_as::<Probe>("tooltip").expect("probe");
    assert_eq!(probe.params.theme, None);
    assert_eq!(probe.params.options, json!({}));
    assert!(probe.params.has_axes);
    assert_eq!(probe.params.extra.get("chartType"), Some(&json!("line")));
    assert_eq!(probe.params.data_processor.chart_type(), "line");
}

#[test]
fn explicit_overrides_win_over_chart_level_slices() {
    let theme = ChartTheme::new().with_slice("plot", json!({"background": "#000000"}));
    let options = ChartOptions::new().with_entry("plot", json!({"hidden": true}));
    let mut registry = ComponentRegistry::new(params().with_theme(theme).with_options(options));

    registry
        .register(
            "plot",
            |params| Ok(Probe::new(params)),
            RegisterParams::new()
                .with_theme(json!({"background": "#fafafa"}))
                .with_options(json!({"hidden": false})),
        )
        .expect("register plot");

    let probe = registry.get_as::<Probe>("plot").expect("probe");
    assert_eq!(probe.params.theme, Some(json!({"background": "#fafafa"})));
    assert_eq!(probe.params.options, json!({"hidden": false}));
}

#[test]
fn options_index_past_list_end_is_invalid_config() {
    let options = ChartOptions::new().with_entry("yAxis", json!([{"title": "only"}]));
    let mut registry = ComponentRegistry::new(params().with_options(options));

    let err = registry
        .register(
            "yAxis",
            |params| Ok(Probe::new(params)),
            RegisterParams::new().with_index(3),
        )
        .expect_err("index past end");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
    assert!(registry.is_empty());
}

#[test]
fn registration_requires_shared_references_and_a_name() {
    let mut without_processor =
        ComponentRegistry::new(RegistryParams::new().with_event_bus(EventBus::new()));
    let err = without_processor
        .register("legend", |params| Ok(Probe::new(params)), RegisterParams::new())
        .expect_err("missing processor");
    assert!(matches!(err, ChartError::InvalidConfig(_)));

    let mut without_bus =
        ComponentRegistry::new(RegistryParams::new().with_data_processor(Rc::new(processor())));
    let err = without_bus
        .register("legend", |params| Ok(Probe::new(params)), RegisterParams::new())
        .expect_err("missing event bus");
    assert!(matches!(err, ChartError::InvalidConfig(_)));

    let mut registry = ComponentRegistry::new(params());
    let err = registry
        .register("", |params| Ok(Probe::new(params)), RegisterParams::new())
        .expect_err("empty name");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

#[test]
fn factory_errors_propagate_and_leave_registry_unchanged() {
    let mut registry = ComponentRegistry::new(params());
    let err = registry
        .register(
            "broken",
            |_params| -> Result<Probe, ChartError> {
                Err(ChartError::InvalidData("bad input".to_owned()))
            },
            RegisterParams::new(),
        )
        .expect_err("factory error");
    assert!(matches!(err, ChartError::InvalidData(_)));
    assert!(!registry.has("broken"));
    assert_eq!(registry.len(), 0);
}

#[test]
fn duplicate_name_replaces_lookup_but_keeps_both_in_order() {
    let mut registry = ComponentRegistry::new(params());
    registry
        .register("series", |params| Ok(Probe::new(params)), RegisterParams::new())
        .expect("first");
    registry
        .register("legend", |params| Ok(Probe::new(params)), RegisterParams::new())
        .expect("legend");
    registry
        .register(
            "series",
            |params| Ok(Probe::new(params)),
            RegisterParams::new().with_index(7),
        )
        .expect("second");

    assert_eq!(registry.len(), 3);
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["series", "legend", "series"]
    );
    assert_eq!(registry.get("series").expect("latest").index(), 7);
}

#[test]
fn typed_access_rejects_other_component_types() {
    let mut registry = ComponentRegistry::new(params());
    registry
        .register("other", |_params| Ok(Other), RegisterParams::new())
        .expect("register other");

    assert!(registry.has("other"));
    assert!(registry.get_as::<Probe>("other").is_none());
    assert!(registry.get_as::<Other>("other").is_some());
    assert!(registry.get_as_mut::<Other>("other").is_some());
    assert!(registry.get("missing").is_none());
}

#[test]
fn destroy_tears_down_every_component_and_clears_state() {
    let teardowns = Rc::new(Cell::new(0));
    let mut registry = ComponentRegistry::new(params());
    for name in ["plot", "legend", "tooltip"] {
        let counter = Rc::clone(&teardowns);
        registry
            .register(
                name,
                move |params| Ok(Probe::counting(params, counter)),
                RegisterParams::new(),
            )
            .expect("register");
    }

    registry.destroy();

    assert_eq!(teardowns.get(), 3);
    assert!(registry.is_empty());
    assert!(!registry.has("plot"));
    assert!(registry.surface().is_none());
}

#[test]
fn dropping_the_registry_tears_down_components_once() {
    let teardowns = Rc::new(Cell::new(0));
    {
        let mut registry = ComponentRegistry::new(params());
        for name in ["plot", "legend"] {
            let counter = Rc::clone(&teardowns);
            registry
                .register(
                    name,
                    move |params| Ok(Probe::counting(params, counter)),
                    RegisterParams::new(),
                )
                .expect("register");
        }
    }
    assert_eq!(teardowns.get(), 2);

    let mut registry = ComponentRegistry::new(params());
    let counter = Rc::clone(&teardowns);
    registry
        .register(
            "tooltip",
            move |params| Ok(Probe::counting(params, counter)),
            RegisterParams::new(),
        )
        .expect("register");
    registry.destroy();
    drop(registry);
    assert_eq!(teardowns.get(), 3);
}
