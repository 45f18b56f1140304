//! Itinerary data model and assembly.
//!
//! Every day has exactly [`SLOTS_PER_DAY`] slots, in the fixed order of
//! [`SlotKind::ALL`].

pub mod assemble;

use std::fmt;

use serde::Serialize;

pub use assemble::{AssemblerOptions, ItineraryAssembler};

/// Number of time slots in every day's schedule.
pub const SLOTS_PER_DAY: usize = 5;

/// A fixed time-of-day unit within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Morning,
    LateMorning,
    Noon,
    Afternoon,
    Evening,
}

impl SlotKind {
    /// All slots in schedule order.
    pub const ALL: [SlotKind; SLOTS_PER_DAY] = [
        Self::Morning,
        Self::LateMorning,
        Self::Noon,
        Self::Afternoon,
        Self::Evening,
    ];

    /// Start time shown for the slot.
    pub fn time(self) -> &'static str {
        match self {
            Self::Morning => "09:00",
            Self::LateMorning => "11:00",
            Self::Noon => "12:30",
            Self::Afternoon => "15:00",
            Self::Evening => "18:00",
        }
    }

    /// Display label for the slot.
    pub fn label(self) -> &'static str {
        match self {
            Self::Morning => "朝",
            Self::LateMorning => "午前",
            Self::Noon => "昼",
            Self::Afternoon => "午後",
            Self::Evening => "夜",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One scheduled stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub time: String,
    pub label: String,
    pub title: String,
    pub detail: String,
    pub tips: String,
}

/// One day of the trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPlan {
    /// 1-based day number.
    pub day: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub schedule: Vec<Slot>,
}

/// A complete multi-day schedule for one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Itinerary {
    pub destination: String,
    pub days: Vec<DayPlan>,
}

impl Itinerary {
    /// Total number of slots across all days.
    pub fn slot_count(&self) -> usize {
        self.days.iter().map(|d| d.schedule.len()).sum()
    }

    /// Iterate every slot title in schedule order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.days
            .iter()
            .flat_map(|d| d.schedule.iter().map(|s| s.title.as_str()))
    }
}
