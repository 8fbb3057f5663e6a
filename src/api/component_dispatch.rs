use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::components::{Command, Dispatch};
use crate::error::{ChartError, ChartResult};

use super::{ComponentRegistry, RegisteredComponent};

/// Attribute/value pairs that must all match for `find_where`.
pub type ConditionMap = IndexMap<String, Value>;

impl ComponentRegistry {
    /// Components whose attributes equal every condition, in render order.
    ///
    /// An empty condition map matches every component.
    #[must_use]
    pub fn find_where(&self, conditions: &ConditionMap) -> Vec<&RegisteredComponent> {
        self.components
            .iter()
            .filter(|entry| {
                conditions
                    .iter()
                    .all(|(key, expected)| entry.attribute(key).as_ref() == Some(expected))
            })
            .collect()
    }

    /// Broadcasts `command` to every component in render order.
    ///
    /// Components that do not support the command are skipped. A failing
    /// component does not stop the broadcast: every component still receives
    /// the command and the first error is returned afterwards. Otherwise
    /// returns how many components handled it.
    pub fn execute(&mut self, command: &Command) -> ChartResult<usize> {
        let mut handled = 0;
        let mut first_error: Option<ChartError> = None;
        for entry in &mut self.components {
            match command.dispatch(entry.component_mut()) {
                Ok(Dispatch::Handled) => {
                    trace!(name = %entry.name(), command = command.name(), "command handled");
                    handled += 1;
                }
                Ok(Dispatch::Unsupported) => {}
                Err(err) => {
                    warn!(
                        name = %entry.name(),
                        command = command.name(),
                        error = %err,
                        "command failed"
                    );
                    first_error.get_or_insert(err);
                }
            }
        }
        debug!(
            command = command.name(),
            handled,
            failed = first_error.is_some(),
            "execute command"
        );
        match first_error {
            Some(err) => Err(err),
            None => Ok(handled),
        }
    }
}
