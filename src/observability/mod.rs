//! Observability for the query core
//!
//! - Structured logging (JSON lines)
//! - Typed events
//!
//! Observability is read-only: nothing here changes matching, ordering or
//! canonicalization results.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

use crate::config::ObservabilityConfig;

/// Apply an observability configuration process-wide.
pub fn init(config: &ObservabilityConfig) {
    Logger::configure(config.enabled, config.min_severity);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("min_severity", config.min_severity.as_str())],
    );
}

/// Returns true if `event` would be written under the current config.
///
/// Callers check this before formatting fields for hot-path events.
pub fn is_event_enabled(event: Event) -> bool {
    Logger::is_enabled(event.severity())
}

/// Log an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // Only verifies no panic
        log_event(Event::TargetDerived);
        log_event(Event::ComparatorBuilt);
    }

    #[test]
    fn test_trace_events_filtered_by_default() {
        // Nothing in this crate's tests reconfigures the logger
        assert!(!is_event_enabled(Event::OrderByNormalized));
        assert!(!is_event_enabled(Event::TargetDerived));
        assert!(!is_event_enabled(Event::ComparatorBuilt));
        assert!(is_event_enabled(Event::InvariantViolation));
        assert!(is_event_enabled(Event::QueryRejected));
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::OrderByNormalized, &[("clauses", "2")]);
    }
}
