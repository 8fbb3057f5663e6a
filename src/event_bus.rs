//! Single-threaded publish/subscribe channel shared by all components.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{trace, warn};

/// Payload carried by an event.
pub type EventPayload = Value;

type Handler = Rc<RefCell<dyn FnMut(&EventPayload)>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct EventBusInner {
    next_id: u64,
    handlers: IndexMap<String, Vec<(SubscriptionId, Handler)>>,
}

/// Cloneable event bus; clones share the same subscriber table.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<EventBusInner>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `handler` to `event`.
    pub fn on(
        &self,
        event: impl Into<String>,
        handler: impl FnMut(&EventPayload) + 'static,
    ) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id = inner.next_id.wrapping_add(1);
        let handler: Handler = Rc::new(RefCell::new(handler));
        inner
            .handlers
            .entry(event.into())
            .or_default()
            .push((id, handler));
        id
    }

    /// Removes a subscription. Returns `true` when removed.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        for handlers in inner.handlers.values_mut() {
            if let Some(position) = handlers.iter().position(|(entry, _)| *entry == id) {
                handlers.remove(position);
                return true;
            }
        }
        false
    }

    /// Invokes every handler subscribed to `event`, in subscription order,
    /// and returns how many ran.
    ///
    /// Handlers may subscribe or fire while dispatch is in progress; the
    /// subscriber list is snapshotted first, so new subscribers only see the
    /// next event.
    pub fn fire(&self, event: &str, payload: &EventPayload) -> usize {
        let handlers: Vec<Handler> = match self.inner.borrow().handlers.get(event) {
            Some(handlers) => handlers.iter().map(|(_, h)| Rc::clone(h)).collect(),
            None => return 0,
        };

        let mut invoked = 0;
        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut handler) => {
                    (&mut *handler)(payload);
                    invoked += 1;
                }
                Err(_) => {
                    warn!(event, "skipping re-entrant event handler");
                }
            }
        }
        trace!(event, invoked, "fired event");
        invoked
    }

    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .borrow()
            .handlers
            .get(event)
            .map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        let mut map = f.debug_map();
        for (event, handlers) in &inner.handlers {
            map.entry(event, &handlers.len());
        }
        map.finish()
    }
}
