//! Itinerary generation engine and trip budget ledger.
//!
//! The itinerary pipeline runs [`search`] (candidate aggregation) into
//! [`schedule`] (padding and tiling the pool) into [`itinerary`] (binding
//! titles to fixed time slots), with wording taken from a [`style`] profile.
//! [`trip::TripPlanner`] wires the stages together.
//!
//! The [`ledger`] module is independent of the pipeline: a persisted budget
//! with an expense history and a two-phase delete.

pub mod itinerary;
pub mod ledger;
pub mod schedule;
pub mod search;
pub mod style;
pub mod trip;
