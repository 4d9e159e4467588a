//! Domain layer - aggregates, value objects, and domain errors.

pub mod foundation;
pub mod settlement;
