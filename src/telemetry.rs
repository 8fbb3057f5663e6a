//! Opt-in tracing setup for hosts embedding `chart-components`.
//!
//! What the crate logs through `tracing`:
//! - `debug!` on component registration (`name`, `component_type`, `index`,
//!   `position`) and on name re-registration.
//! - `debug!` summary per render pass (`operation`, `invoked`, `attached`),
//!   `trace!` when a pass establishes its surface and `warn!` when a later
//!   component tries to replace it.
//! - `debug!` per `execute` broadcast (`command`, `handled`, `failed`) and
//!   `warn!` for each component whose command failed.
//! - `debug!`/`trace!` on legend model recomputes and `warn!` when the event
//!   bus skips a re-entrant handler.
//!
//! Hosts with their own subscriber need nothing from this module.

/// Filter used when `RUST_LOG` is unset: warnings from everything, the
/// crate's own events from `info` up.
pub const DEFAULT_FILTER: &str = "warn,chart_components=info";

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, falling back
/// to [`DEFAULT_FILTER`].
///
/// Returns `false` without the `telemetry` feature, or when the host already
/// installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

#[cfg(all(test, not(feature = "telemetry")))]
mod tests {
    use super::*;

    #[test]
    fn init_is_a_no_op_without_the_feature() {
        assert!(!init_default_tracing());
    }
}
