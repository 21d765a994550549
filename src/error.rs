use thiserror::Error;

use crate::models::{Day, MatchType, Side, SlotId, Sport};

/// Errors surfaced by the scheduling engine to the immediate caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Malformed time label '{0}', expected HH:MM")]
    MalformedTime(String),

    #[error("No room for a new slot on day {day}, ground {ground}")]
    PlacementUnavailable { day: Day, ground: u32 },

    #[error("Slot {id} would overlap another slot on the same ground")]
    OverlapRejected { id: SlotId },

    #[error("Start {start} must be before end {end}")]
    InvalidRange { start: String, end: String },

    #[error("Slot would last {length} min, shorter than the {minimum} min grid step")]
    TooShort { length: u32, minimum: u32 },

    #[error("Span {start}-{end} leaves the timeline")]
    OutsideTimeline { start: String, end: String },

    #[error("Unknown slot {0}")]
    UnknownSlot(SlotId),

    #[error("Participants of kind '{found}' do not fit {sport}")]
    ShapeMismatch { sport: Sport, found: &'static str },

    #[error("{0} has no singles/doubles type (wanted {1})")]
    NotMixed(Sport, MatchType),

    #[error("No {side:?} seat {index:?} in a {shape} game")]
    InvalidSeat {
        side: Side,
        index: Option<usize>,
        shape: &'static str,
    },

    #[error("Nothing to undo")]
    NothingToUndo,
}

impl ScheduleError {
    /// Bad caller input, as opposed to a state conflict.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::MalformedTime(_)
                | Self::InvalidRange { .. }
                | Self::TooShort { .. }
                | Self::OutsideTimeline { .. }
                | Self::ShapeMismatch { .. }
                | Self::NotMixed(..)
                | Self::InvalidSeat { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
