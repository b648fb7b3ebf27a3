//! Observable events
//!
//! Events are explicit and typed; each one carries its own severity.

use std::fmt;

use super::logger::Severity;

/// Observable events in the query core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Observability configuration applied
    ConfigLoaded,
    /// Effective ordering computed for a query
    OrderByNormalized,
    /// Listen target derived for a query
    TargetDerived,
    /// Document comparator built from a query ordering
    ComparatorBuilt,
    /// A checked builder refused an inconsistent query
    QueryRejected,
    /// A query invariant was violated (FATAL)
    InvariantViolation,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::OrderByNormalized => "ORDER_BY_NORMALIZED",
            Event::TargetDerived => "TARGET_DERIVED",
            Event::ComparatorBuilt => "COMPARATOR_BUILT",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::InvariantViolation => "INVARIANT_VIOLATION",
        }
    }

    /// Returns the severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded => Severity::Info,
            Event::OrderByNormalized | Event::TargetDerived | Event::ComparatorBuilt => {
                Severity::Trace
            }
            Event::QueryRejected => Severity::Warn,
            Event::InvariantViolation => Severity::Fatal,
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::InvariantViolation)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
