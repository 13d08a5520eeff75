//! Ordered placement feeds replayed by the contest runner.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Command, EntityKind, Position, Tenge};

const ROBOT_ROW_KIND: i64 = 1;
const STORE_ROW_KIND: i64 = 2;

/// Single placement scheduled by a contest feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContestEvent {
    /// Places a robot at the provided position.
    Robot {
        /// Position that becomes the robot's home.
        position: Position,
    },
    /// Places a store holding `tenges` at the provided position.
    Store {
        /// Position that should host the store.
        position: Position,
        /// Initial balance held by the store.
        tenges: Tenge,
    },
}

impl ContestEvent {
    /// Kind of entity the event places.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Robot { .. } => EntityKind::Robot,
            Self::Store { .. } => EntityKind::Store,
        }
    }

    /// Position targeted by the placement.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Robot { position } | Self::Store { position, .. } => *position,
        }
    }

    /// Placement command equivalent to the event.
    #[must_use]
    pub const fn command(&self) -> Command {
        match *self {
            Self::Robot { position } => Command::PlaceRobot { position },
            Self::Store { position, tenges } => Command::PlaceStore { position, tenges },
        }
    }
}

/// Ordered sequence of placements.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventFeed {
    events: Vec<ContestEvent>,
}

impl EventFeed {
    /// Creates a feed replaying the provided events in order.
    #[must_use]
    pub fn new(events: Vec<ContestEvent>) -> Self {
        Self { events }
    }

    /// Parses the contest matrix form.
    ///
    /// Each row is `[1, position]` for a robot or `[2, position, tenges]` for
    /// a store. Trailing values beyond the ones a kind needs are ignored.
    pub fn from_rows(rows: &[Vec<i64>]) -> Result<Self, FeedError> {
        let events = rows
            .iter()
            .enumerate()
            .map(|(index, row)| parse_row(index, row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { events })
    }

    /// Road length needed to host every placement: the largest position.
    #[must_use]
    pub fn length(&self) -> u32 {
        self.events
            .iter()
            .map(|event| event.position().get())
            .max()
            .unwrap_or(0)
    }

    /// Iterator over the scheduled placements in feed order.
    pub fn iter(&self) -> impl Iterator<Item = &ContestEvent> {
        self.events.iter()
    }

    /// Retrieves the placement scheduled at the provided index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ContestEvent> {
        self.events.get(index)
    }

    /// Number of scheduled placements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Reports whether the feed schedules nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<Vec<ContestEvent>> for EventFeed {
    fn from(events: Vec<ContestEvent>) -> Self {
        Self::new(events)
    }
}

/// Reasons a contest matrix cannot be turned into a feed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FeedError {
    /// The row does not start with a known entity kind.
    #[error("row {row}: unknown entity kind {kind} (expected 1 for robots or 2 for stores)")]
    UnknownKind {
        /// Zero-based index of the offending row.
        row: usize,
        /// Kind value found in the row.
        kind: i64,
    },
    /// The row ends before a required value.
    #[error("row {row}: missing {field}")]
    MissingField {
        /// Zero-based index of the offending row.
        row: usize,
        /// Name of the missing value.
        field: &'static str,
    },
    /// The position cannot be represented as a road index.
    #[error("row {row}: position {position} is not a valid road index")]
    InvalidPosition {
        /// Zero-based index of the offending row.
        row: usize,
        /// Position found in the row.
        position: i64,
    },
}

fn parse_row(row: usize, values: &[i64]) -> Result<ContestEvent, FeedError> {
    let value_at = |index: usize, field: &'static str| {
        values
            .get(index)
            .copied()
            .ok_or(FeedError::MissingField { row, field })
    };

    let kind = value_at(0, "kind")?;
    let raw_position = value_at(1, "position")?;
    let position = u32::try_from(raw_position)
        .ok()
        .filter(|&value| value > 0)
        .map(Position::new)
        .ok_or(FeedError::InvalidPosition {
            row,
            position: raw_position,
        })?;

    match kind {
        ROBOT_ROW_KIND => Ok(ContestEvent::Robot { position }),
        STORE_ROW_KIND => {
            let tenges = Tenge::new(value_at(2, "tenges")?);
            Ok(ContestEvent::Store { position, tenges })
        }
        other => Err(FeedError::UnknownKind { row, kind: other }),
    }
}
