//! Robots and stores hosted by the road.

use silk_road_core::{Coordinate, Position, Tenge};

/// Robot travelling along the road and collecting tenges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Robot {
    home: Position,
    coordinate: Coordinate,
    tenges: Tenge,
}

impl Robot {
    pub(crate) fn new(home: Position, coordinate: Coordinate) -> Self {
        Self {
            home,
            coordinate,
            tenges: Tenge::ZERO,
        }
    }

    pub(crate) fn home(&self) -> Position {
        self.home
    }

    pub(crate) fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub(crate) fn tenges(&self) -> Tenge {
        self.tenges
    }

    /// Relocates the robot and charges it for the trip.
    pub(crate) fn travel(&mut self, coordinate: Coordinate, cost: Tenge) {
        self.coordinate = coordinate;
        self.tenges -= cost;
    }

    pub(crate) fn deposit(&mut self, amount: Tenge) {
        self.tenges += amount;
    }

    /// Puts the robot back at its home coordinate with an empty balance.
    pub(crate) fn send_home(&mut self, coordinate: Coordinate) {
        self.coordinate = coordinate;
        self.tenges = Tenge::ZERO;
    }
}

/// Store holding tenges until a robot empties it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Store {
    coordinate: Coordinate,
    initial_tenges: Tenge,
    tenges: Tenge,
    times_emptied: u32,
}

impl Store {
    pub(crate) fn new(coordinate: Coordinate, tenges: Tenge) -> Self {
        Self {
            coordinate,
            initial_tenges: tenges,
            tenges,
            times_emptied: 0,
        }
    }

    pub(crate) fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub(crate) fn initial_tenges(&self) -> Tenge {
        self.initial_tenges
    }

    pub(crate) fn tenges(&self) -> Tenge {
        self.tenges
    }

    pub(crate) fn times_emptied(&self) -> u32 {
        self.times_emptied
    }

    /// Hands over the whole balance. An empty store still counts as emptied.
    pub(crate) fn collect(&mut self) -> Tenge {
        let amount = self.tenges;
        self.tenges = Tenge::ZERO;
        self.times_emptied = self.times_emptied.saturating_add(1);
        amount
    }

    /// Restores the initial balance and returns it.
    pub(crate) fn resupply(&mut self) -> Tenge {
        self.tenges = self.initial_tenges;
        self.tenges
    }
}
