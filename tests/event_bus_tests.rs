use std::cell::RefCell;
use std::rc::Rc;

use chart_components::event_bus::EventBus;
use serde_json::{Value, json};

#[test]
fn handlers_run_in_subscription_order_with_the_payload() {
    let bus = EventBus::new();
    let seen = Rc::new(RefCell::new(Vec::<(usize, Value)>::new()));

    for id in 0..3 {
        let seen = Rc::clone(&seen);
        bus.on("selectLegend", move |payload| {
            seen.borrow_mut().push((id, payload.clone()));
        });
    }

    let invoked = bus.fire("selectLegend", &json!({"index": 1}));

    assert_eq!(invoked, 3);
    let ids: Vec<_> = seen.borrow().iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert!(seen.borrow().iter().all(|(_, payload)| payload["index"] == 1));
}

#[test]
fn events_are_routed_by_name() {
    let bus = EventBus::new();
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    bus.on("changeCheckedLegends", move |_| *counter.borrow_mut() += 1);

    assert_eq!(bus.fire("selectLegend", &Value::Null), 0);
    assert_eq!(bus.fire("changeCheckedLegends", &Value::Null), 1);
    assert_eq!(*count.borrow(), 1);
    assert_eq!(bus.listener_count("changeCheckedLegends"), 1);
    assert_eq!(bus.listener_count("selectLegend"), 0);
}

#[test]
fn off_removes_only_that_subscription() {
    let bus = EventBus::new();
    let first = bus.on("resize", |_| {});
    let _second = bus.on("resize", |_| {});

    assert!(bus.off(first));
    assert!(!bus.off(first));
    assert_eq!(bus.listener_count("resize"), 1);
    assert_eq!(bus.fire("resize", &Value::Null), 1);
}

#[test]
fn clones_share_subscribers() {
    let bus = EventBus::new();
    let clone = bus.clone();
    let hits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&hits);
    clone.on("render", move |_| *counter.borrow_mut() += 1);

    bus.fire("render", &Value::Null);
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn handler_may_fire_other_events_and_subscribe() {
    let bus = EventBus::new();
    let log = Rc::new(RefCell::new(Vec::<String>::new()));

    let inner_log = Rc::clone(&log);
    bus.on("afterSelect", move |_| inner_log.borrow_mut().push("after".to_owned()));

    let relay_bus = bus.clone();
    let relay_log = Rc::clone(&log);
    bus.on("select", move |_| {
        relay_log.borrow_mut().push("select".to_owned());
        relay_bus.fire("afterSelect", &Value::Null);
        relay_bus.on("select", |_| {});
    });

    assert_eq!(bus.fire("select", &Value::Null), 1);
    assert_eq!(*log.borrow(), vec!["select", "after"]);
    // The subscriber added during dispatch only sees later events.
    assert_eq!(bus.listener_count("select"), 2);
    assert_eq!(bus.fire("select", &Value::Null), 2);
}

#[test]
fn running_handler_is_not_re_entered() {
    let bus = EventBus::new();
    let depth = Rc::new(RefCell::new(0));

    let loop_bus = bus.clone();
    let counter = Rc::clone(&depth);
    bus.on("loop", move |_| {
        *counter.borrow_mut() += 1;
        let nested = loop_bus.fire("loop", &Value::Null);
        assert_eq!(nested, 0);
    });

    assert_eq!(bus.fire("loop", &Value::Null), 1);
    assert_eq!(*depth.borrow(), 1);
}
