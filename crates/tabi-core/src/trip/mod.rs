//! Trip planning service.
//!
//! Validates a [`TripRequest`] and runs the full itinerary pipeline:
//! style resolution, candidate aggregation, pool scheduling, and assembly.

use std::sync::Arc;

use rand::Rng;
use tracing::info;

use crate::itinerary::{AssemblerOptions, Itinerary, ItineraryAssembler, SLOTS_PER_DAY};
use crate::schedule;
use crate::search::{CandidateAggregator, QuerySet, SearchSource};
use crate::style;

/// Longest trip the planner accepts, in days.
pub const MAX_DAYS: usize = 7;

/// Reasons a trip request is rejected before planning starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("destination must not be empty")]
    EmptyDestination,

    #[error("trip length must be between 1 and {max} days, got {0}", max = MAX_DAYS)]
    DaysOutOfRange(usize),
}

/// A validated itinerary request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRequest {
    destination: String,
    days: usize,
    style: String,
}

impl TripRequest {
    /// Validate and build a request. The destination is trimmed.
    pub fn new(
        destination: impl AsRef<str>,
        days: usize,
        style: impl Into<String>,
    ) -> Result<Self, RequestError> {
        let destination = destination.as_ref().trim();
        if destination.is_empty() {
            return Err(RequestError::EmptyDestination);
        }
        if !(1..=MAX_DAYS).contains(&days) {
            return Err(RequestError::DaysOutOfRange(days));
        }
        Ok(Self {
            destination: destination.to_string(),
            days,
            style: style.into(),
        })
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    /// Number of slots the itinerary will contain.
    pub fn required_slots(&self) -> usize {
        self.days * SLOTS_PER_DAY
    }
}

/// Planner knobs, usually loaded from the `[itinerary]` config section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlannerOptions {
    pub query_set: QuerySet,
    pub assembler: AssemblerOptions,
}

/// Runs the itinerary pipeline against a search collaborator.
#[derive(Debug, Clone)]
pub struct TripPlanner {
    aggregator: CandidateAggregator,
    assembler: ItineraryAssembler,
}

impl TripPlanner {
    pub fn new(source: Arc<dyn SearchSource>, options: PlannerOptions) -> Self {
        Self {
            aggregator: CandidateAggregator::new(source).with_query_set(options.query_set),
            assembler: ItineraryAssembler::new(options.assembler),
        }
    }

    /// Replace the per-query result cap.
    pub fn with_result_limit(mut self, limit: usize) -> Self {
        self.aggregator = self.aggregator.with_limit(limit);
        self
    }

    /// Generate a complete itinerary for `request`.
    ///
    /// Always succeeds: search failures degrade to fallback titles.
    pub async fn generate<R: Rng + ?Sized>(&self, request: &TripRequest, rng: &mut R) -> Itinerary {
        let profile = style::resolve(request.style());
        let pool = self.aggregator.collect(request.destination()).await;
        let found = pool.len();

        let titles = schedule::schedule(
            pool,
            request.destination(),
            request.required_slots(),
            rng,
        );
        let itinerary = self.assembler.assemble(
            request.destination(),
            request.days(),
            &titles,
            profile,
            rng,
        );

        info!(
            destination = request.destination(),
            days = request.days(),
            style = profile.name.as_str(),
            candidates = found,
            "itinerary generated"
        );
        itinerary
    }
}
