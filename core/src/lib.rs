#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Silk Road simulator.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative road, and pure systems. Callers submit [`Command`] values
//! describing desired mutations, the road executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing exactly
//! what changed. Rejected commands surface as [`RoadError`] values and leave
//! the road untouched. Systems read immutable snapshots and respond
//! exclusively with new commands.

mod feed;

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use feed::{ContestEvent, EventFeed, FeedError};

/// Commands that express all permissible road mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Places a store holding the provided amount at a road position.
    PlaceStore {
        /// Position that should host the store.
        position: Position,
        /// Initial balance held by the store.
        tenges: Tenge,
    },
    /// Removes the store hosted at the provided position.
    RemoveStore {
        /// Position of the store targeted for removal.
        position: Position,
    },
    /// Places a robot whose home is the provided position.
    PlaceRobot {
        /// Position that becomes the robot's home.
        position: Position,
    },
    /// Removes the robot currently keyed at the provided position.
    RemoveRobot {
        /// Position of the robot targeted for removal.
        position: Position,
    },
    /// Moves the robot keyed at `origin` by a signed number of positions.
    MoveRobot {
        /// Position currently occupied by the robot.
        origin: Position,
        /// Signed distance to travel; negative values move toward position 1.
        delta: i64,
    },
    /// Restores every store to its initial balance.
    ResupplyStores,
    /// Returns every robot to its home position with an empty balance.
    ReturnRobots,
    /// Resupplies all stores and returns all robots.
    Reboot,
    /// Destroys all entities and locks the road against further mutation.
    Finalize,
}

/// Events reported by the road after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that a store was placed on the road.
    StorePlaced {
        /// Position hosting the store.
        position: Position,
        /// Canvas coordinate of the position.
        coordinate: Coordinate,
        /// Initial balance held by the store.
        tenges: Tenge,
    },
    /// Confirms that a store was removed or replaced.
    StoreRemoved {
        /// Position that hosted the store.
        position: Position,
    },
    /// Confirms that a robot was placed on the road.
    RobotPlaced {
        /// Home position of the robot.
        position: Position,
        /// Canvas coordinate of the position.
        coordinate: Coordinate,
    },
    /// Confirms that a robot was removed or replaced.
    RobotRemoved {
        /// Position the robot was keyed at.
        position: Position,
    },
    /// Confirms that a robot travelled between two positions.
    RobotMoved {
        /// Position the robot occupied before moving.
        from: Position,
        /// Position the robot occupies after moving.
        to: Position,
        /// Canvas coordinate of the destination.
        coordinate: Coordinate,
        /// Travel cost charged to the robot.
        cost: Tenge,
        /// Robot balance after the cost was charged.
        tenges: Tenge,
    },
    /// Confirms that a robot emptied the store at its destination.
    StoreCollected {
        /// Position of the emptied store.
        position: Position,
        /// Robot balance right before the collection.
        before: Tenge,
        /// Robot balance right after the collection.
        after: Tenge,
        /// Number of times the store has been emptied, including this one.
        times_emptied: u32,
    },
    /// Confirms that a store balance was restored.
    StoreResupplied {
        /// Position of the resupplied store.
        position: Position,
        /// Balance restored to the store.
        tenges: Tenge,
    },
    /// Confirms that a robot went back to its home position.
    RobotReturned {
        /// Position the robot occupied before returning.
        from: Position,
        /// Home position the robot is keyed at afterwards.
        to: Position,
        /// Canvas coordinate of the home position.
        coordinate: Coordinate,
    },
    /// Announces that the road was finalized.
    RoadFinalized {
        /// Number of robots destroyed by the transition.
        robots: usize,
        /// Number of stores destroyed by the transition.
        stores: usize,
    },
}

/// Kind of entity hosted by a road position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A robot that travels along the road.
    Robot,
    /// A store that holds tenges until collected.
    Store,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Robot => write!(f, "robot"),
            Self::Store => write!(f, "store"),
        }
    }
}

/// Reasons a command may be rejected by the road.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum RoadError {
    /// The position lies outside the range allowed for the operation.
    #[error("position {position} is outside the road (capacity {capacity})")]
    OutOfBounds {
        /// Offending position, possibly the result of an offset.
        position: i64,
        /// Capacity of the road when the command was rejected.
        capacity: u32,
    },
    /// The road was finalized and no longer accepts mutations.
    #[error("road is finalized")]
    Finalized,
    /// No entity of the requested kind lives at the position.
    #[error("no {kind} at position {position}")]
    MissingEntity {
        /// Kind of entity the command referenced.
        kind: EntityKind,
        /// Position that was expected to host the entity.
        position: Position,
    },
    /// Another robot already claims the position.
    #[error("position {position} is already claimed by another robot")]
    Occupied {
        /// Position that is already claimed.
        position: Position,
    },
}

/// One-based index of a location along the road.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position(u32);

impl Position {
    /// Creates a new position wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Applies a signed offset, returning `None` when the result leaves `u32`.
    #[must_use]
    pub fn offset(self, delta: i64) -> Option<Self> {
        let target = i64::from(self.0).checked_add(delta)?;
        u32::try_from(target).ok().map(Self)
    }

    /// Number of positions separating two locations.
    #[must_use]
    pub const fn distance(self, other: Position) -> u32 {
        self.0.abs_diff(other.0)
    }

    /// Signed offset that leads from `self` to `other`.
    #[must_use]
    pub fn delta_to(self, other: Position) -> i64 {
        i64::from(other.0) - i64::from(self.0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Currency balance held by robots and stores.
///
/// Arithmetic saturates at the bounds of `i64` instead of overflowing.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Tenge(i64);

impl Tenge {
    /// An empty balance.
    pub const ZERO: Self = Self(0);

    /// Creates a new balance.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Retrieves the underlying amount.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }

    /// Reports whether the balance is strictly greater than zero.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Balance equivalent to travelling the provided number of positions.
    #[must_use]
    pub fn travel_cost(distance: u32) -> Self {
        Self(i64::from(distance))
    }
}

impl Add for Tenge {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Tenge {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl AddAssign for Tenge {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Tenge {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Sum for Tenge {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Tenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Location of a road position on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    x: i32,
    y: i32,
}

impl Coordinate {
    /// Creates a new canvas coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal component, growing to the right.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical component, growing downwards.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

/// Profit recorded for the last collection at a destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Destination where the collection happened.
    pub position: Position,
    /// Robot balance after paying for the trip, before collecting.
    pub before: Tenge,
    /// Robot balance after collecting.
    pub after: Tenge,
}

/// Immutable representation of a single robot used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RobotSnapshot {
    /// Position the robot is currently keyed at.
    pub position: Position,
    /// Position the robot returns to on reboot.
    pub home: Position,
    /// Canvas coordinate of the current position.
    pub coordinate: Coordinate,
    /// Current balance.
    pub tenges: Tenge,
}

/// Read-only snapshot describing all robots on the road.
#[derive(Clone, Debug, Default)]
pub struct RobotView {
    snapshots: Vec<RobotSnapshot>,
}

impl RobotView {
    /// Creates a new robot view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<RobotSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.position);
        Self { snapshots }
    }

    /// Iterator over the captured robot snapshots in ascending position order.
    pub fn iter(&self) -> impl Iterator<Item = &RobotSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<RobotSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single store used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoreSnapshot {
    /// Position hosting the store.
    pub position: Position,
    /// Canvas coordinate of the position.
    pub coordinate: Coordinate,
    /// Balance the store is resupplied with.
    pub initial_tenges: Tenge,
    /// Balance currently held.
    pub tenges: Tenge,
    /// Number of times the store has been emptied.
    pub times_emptied: u32,
}

/// Read-only snapshot describing all stores on the road.
#[derive(Clone, Debug, Default)]
pub struct StoreView {
    snapshots: Vec<StoreSnapshot>,
}

impl StoreView {
    /// Creates a new store view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<StoreSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.position);
        Self { snapshots }
    }

    /// Iterator over the captured store snapshots in ascending position order.
    pub fn iter(&self) -> impl Iterator<Item = &StoreSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<StoreSnapshot> {
        self.snapshots
    }
}
