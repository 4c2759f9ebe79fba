//! Shared primitive types used across the entire model.

/// A stable scenario identifier, e.g. "A", "B", "C".
pub type ScenarioId = String;

/// Hours per month.
pub type Hours = f64;

/// US dollars. Monthly unless the field name says otherwise.
pub type Dollars = f64;

/// Identifier for one batch evaluation recorded in the store.
pub type RunId = String;
