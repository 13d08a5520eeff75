#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative road state management for the Silk Road simulator.

mod entities;
mod ledger;
mod spiral;

use std::collections::BTreeMap;

use silk_road_core::{
    Command, Coordinate, EntityKind, Event, EventFeed, Position, RoadError, Tenge,
};
use tracing::{trace, warn};

use crate::{
    entities::{Robot, Store},
    ledger::ProfitLedger,
};

pub use spiral::{SpiralConfig, SpiralLayout};

/// Lowest position a robot may occupy.
const FIRST_ROBOT_POSITION: u32 = 1;

/// Lowest position a store may occupy. Position 1 is reserved for robots.
const FIRST_STORE_POSITION: u32 = 2;

/// Lifecycle state of a road.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoadState {
    /// The road accepts mutations.
    Active,
    /// The road was finalized and rejects every mutation.
    Finalized,
}

/// Linear road hosting robots and stores at one-based positions.
#[derive(Clone, Debug)]
pub struct Road {
    capacity: u32,
    state: RoadState,
    layout: SpiralLayout,
    robots: BTreeMap<Position, Robot>,
    stores: BTreeMap<Position, Store>,
    ledger: ProfitLedger,
}

impl Road {
    /// Creates an empty road laid out on the default spiral.
    ///
    /// A negative capacity yields a finalized road with capacity zero.
    #[must_use]
    pub fn new(capacity: i64) -> Self {
        Self::with_layout(capacity, SpiralConfig::default())
    }

    /// Creates an empty road laid out on a spiral with the provided configuration.
    #[must_use]
    pub fn with_layout(capacity: i64, config: SpiralConfig) -> Self {
        let state = if capacity < 0 {
            RoadState::Finalized
        } else {
            RoadState::Active
        };
        let capacity = u32::try_from(capacity.max(0)).unwrap_or(u32::MAX);

        Self {
            capacity,
            state,
            layout: SpiralLayout::new(capacity, config),
            robots: BTreeMap::new(),
            stores: BTreeMap::new(),
            ledger: ProfitLedger::default(),
        }
    }

    /// Builds a road long enough for the feed and performs every placement.
    ///
    /// Placements the road rejects are logged and skipped. No robot moves.
    #[must_use]
    pub fn from_feed(feed: &EventFeed) -> Self {
        let mut road = Self::new(i64::from(feed.length()));
        let mut events = Vec::new();

        for (index, event) in feed.iter().enumerate() {
            if let Err(error) = apply(&mut road, event.command(), &mut events) {
                warn!(
                    index,
                    kind = %event.kind(),
                    position = %event.position(),
                    %error,
                    "skipping rejected placement"
                );
            }
        }

        road
    }

    /// Places a store, replacing any store already hosted at the position.
    pub fn place_store(
        &mut self,
        position: Position,
        tenges: Tenge,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RoadError> {
        self.ensure_active()?;
        let coordinate = self.locate(position, FIRST_STORE_POSITION)?;

        if self
            .stores
            .insert(position, Store::new(coordinate, tenges))
            .is_some()
        {
            out_events.push(Event::StoreRemoved { position });
        }
        out_events.push(Event::StorePlaced {
            position,
            coordinate,
            tenges,
        });
        Ok(())
    }

    /// Removes the store hosted at the position.
    pub fn remove_store(
        &mut self,
        position: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RoadError> {
        self.ensure_active()?;
        self.ensure_within(position, FIRST_STORE_POSITION)?;

        match self.stores.remove(&position) {
            Some(_) => {
                out_events.push(Event::StoreRemoved { position });
                Ok(())
            }
            None => Err(RoadError::MissingEntity {
                kind: EntityKind::Store,
                position,
            }),
        }
    }

    /// Places a robot whose home is the position.
    ///
    /// A robot currently keyed at the position is replaced. The placement is
    /// rejected when a robot keyed elsewhere already calls the position home.
    pub fn place_robot(
        &mut self,
        position: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RoadError> {
        self.ensure_active()?;
        let coordinate = self.locate(position, FIRST_ROBOT_POSITION)?;

        let home_claimed = self
            .robots
            .iter()
            .any(|(&key, robot)| key != position && robot.home() == position);
        if home_claimed {
            return Err(RoadError::Occupied { position });
        }

        if self
            .robots
            .insert(position, Robot::new(position, coordinate))
            .is_some()
        {
            out_events.push(Event::RobotRemoved { position });
        }
        out_events.push(Event::RobotPlaced {
            position,
            coordinate,
        });
        Ok(())
    }

    /// Removes the robot keyed at the position.
    pub fn remove_robot(
        &mut self,
        position: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RoadError> {
        self.ensure_active()?;
        self.ensure_within(position, FIRST_ROBOT_POSITION)?;

        match self.robots.remove(&position) {
            Some(_) => {
                out_events.push(Event::RobotRemoved { position });
                Ok(())
            }
            None => Err(RoadError::MissingEntity {
                kind: EntityKind::Robot,
                position,
            }),
        }
    }

    /// Moves the robot keyed at `origin` by `delta` positions.
    ///
    /// The robot pays one tenge per position travelled. When a store sits at
    /// the destination the robot empties it and the ledger records the
    /// balances right before and right after the collection.
    pub fn move_robot(
        &mut self,
        origin: Position,
        delta: i64,
        out_events: &mut Vec<Event>,
    ) -> Result<(), RoadError> {
        self.ensure_active()?;
        if !self.robots.contains_key(&origin) {
            return Err(RoadError::MissingEntity {
                kind: EntityKind::Robot,
                position: origin,
            });
        }

        let destination = origin.offset(delta).ok_or(RoadError::OutOfBounds {
            position: i64::from(origin.get()).saturating_add(delta),
            capacity: self.capacity,
        })?;
        let coordinate = self.locate(destination, FIRST_ROBOT_POSITION)?;
        if destination != origin && self.robots.contains_key(&destination) {
            return Err(RoadError::Occupied {
                position: destination,
            });
        }

        let Some(mut robot) = self.robots.remove(&origin) else {
            return Err(RoadError::MissingEntity {
                kind: EntityKind::Robot,
                position: origin,
            });
        };

        let cost = Tenge::travel_cost(origin.distance(destination));
        robot.travel(coordinate, cost);
        out_events.push(Event::RobotMoved {
            from: origin,
            to: destination,
            coordinate,
            cost,
            tenges: robot.tenges(),
        });

        if let Some(store) = self.stores.get_mut(&destination) {
            let before = robot.tenges();
            robot.deposit(store.collect());
            let after = robot.tenges();
            self.ledger.record(destination, before, after);
            out_events.push(Event::StoreCollected {
                position: destination,
                before,
                after,
                times_emptied: store.times_emptied(),
            });
        }

        let _ = self.robots.insert(destination, robot);
        Ok(())
    }

    /// Restores every store to its initial balance.
    pub fn resupply_stores(&mut self, out_events: &mut Vec<Event>) -> Result<(), RoadError> {
        self.ensure_active()?;

        for (&position, store) in self.stores.iter_mut() {
            let tenges = store.resupply();
            out_events.push(Event::StoreResupplied { position, tenges });
        }
        Ok(())
    }

    /// Sends every robot back to its home position with an empty balance.
    pub fn return_robots(&mut self, out_events: &mut Vec<Event>) -> Result<(), RoadError> {
        self.ensure_active()?;

        let robots = std::mem::take(&mut self.robots);
        for (from, mut robot) in robots {
            let home = robot.home();
            let coordinate = self
                .layout
                .coordinate_of(home)
                .unwrap_or_else(|| robot.coordinate());
            robot.send_home(coordinate);

            if let Some(displaced) = self.robots.insert(home, robot) {
                warn!(
                    %home,
                    displaced_home = %displaced.home(),
                    "robot displaced while returning home"
                );
            }
            out_events.push(Event::RobotReturned {
                from,
                to: home,
                coordinate,
            });
        }
        Ok(())
    }

    /// Resupplies every store, then sends every robot home.
    pub fn reboot(&mut self, out_events: &mut Vec<Event>) -> Result<(), RoadError> {
        self.resupply_stores(out_events)?;
        self.return_robots(out_events)
    }

    /// Destroys every entity and locks the road against further mutation.
    ///
    /// The profit ledger survives the transition.
    pub fn finalize(&mut self, out_events: &mut Vec<Event>) -> Result<(), RoadError> {
        self.ensure_active()?;

        let robots = self.robots.len();
        let stores = self.stores.len();
        self.robots.clear();
        self.stores.clear();
        self.capacity = 0;
        self.layout = SpiralLayout::new(0, self.layout.config());
        self.state = RoadState::Finalized;

        out_events.push(Event::RoadFinalized { robots, stores });
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), RoadError> {
        match self.state {
            RoadState::Active => Ok(()),
            RoadState::Finalized => Err(RoadError::Finalized),
        }
    }

    fn ensure_within(&self, position: Position, lowest: u32) -> Result<(), RoadError> {
        if position.get() >= lowest && position.get() <= self.capacity {
            Ok(())
        } else {
            Err(self.out_of_bounds(position))
        }
    }

    fn locate(&self, position: Position, lowest: u32) -> Result<Coordinate, RoadError> {
        self.ensure_within(position, lowest)?;
        self.layout
            .coordinate_of(position)
            .ok_or_else(|| self.out_of_bounds(position))
    }

    fn out_of_bounds(&self, position: Position) -> RoadError {
        RoadError::OutOfBounds {
            position: i64::from(position.get()),
            capacity: self.capacity,
        }
    }
}

/// Applies the provided command to the road, appending resulting events.
///
/// Rejected commands leave the road untouched and append nothing.
pub fn apply(
    road: &mut Road,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), RoadError> {
    let result = match command {
        Command::PlaceStore { position, tenges } => road.place_store(position, tenges, out_events),
        Command::RemoveStore { position } => road.remove_store(position, out_events),
        Command::PlaceRobot { position } => road.place_robot(position, out_events),
        Command::RemoveRobot { position } => road.remove_robot(position, out_events),
        Command::MoveRobot { origin, delta } => road.move_robot(origin, delta, out_events),
        Command::ResupplyStores => road.resupply_stores(out_events),
        Command::ReturnRobots => road.return_robots(out_events),
        Command::Reboot => road.reboot(out_events),
        Command::Finalize => road.finalize(out_events),
    };

    if let Err(error) = &result {
        trace!(?command, %error, "command rejected");
    }
    result
}

/// Query functions that provide read-only access to the road state.
pub mod query {
    use silk_road_core::{
        Coordinate, LedgerEntry, Position, RobotSnapshot, RobotView, StoreSnapshot, StoreView,
        Tenge,
    };

    use super::{Road, RoadState, SpiralLayout};

    /// Number of positions on the road. Zero once finalized.
    #[must_use]
    pub fn capacity(road: &Road) -> u32 {
        road.capacity
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(road: &Road) -> RoadState {
        road.state
    }

    /// Reports whether the road was finalized.
    #[must_use]
    pub fn is_finalized(road: &Road) -> bool {
        road.state == RoadState::Finalized
    }

    /// Spiral layout used to place positions on the canvas.
    #[must_use]
    pub fn layout(road: &Road) -> &SpiralLayout {
        &road.layout
    }

    /// Canvas coordinate of the position, if the road covers it.
    #[must_use]
    pub fn coordinate_of(road: &Road, position: Position) -> Option<Coordinate> {
        road.layout.coordinate_of(position)
    }

    /// Stores as `(position, balance)` pairs in ascending position order.
    #[must_use]
    pub fn stores(road: &Road) -> Vec<(Position, Tenge)> {
        road.stores
            .iter()
            .map(|(&position, store)| (position, store.tenges()))
            .collect()
    }

    /// Robots as `(position, balance)` pairs in ascending position order.
    #[must_use]
    pub fn robots(road: &Road) -> Vec<(Position, Tenge)> {
        road.robots
            .iter()
            .map(|(&position, robot)| (position, robot.tenges()))
            .collect()
    }

    /// Stores emptied at least once as `(position, times emptied)` pairs.
    #[must_use]
    pub fn emptied_stores(road: &Road) -> Vec<(Position, u32)> {
        road.stores
            .iter()
            .filter(|(_, store)| store.times_emptied() > 0)
            .map(|(&position, store)| (position, store.times_emptied()))
            .collect()
    }

    /// Sum of all robot balances.
    #[must_use]
    pub fn total_profit(road: &Road) -> Tenge {
        road.robots.values().map(|robot| robot.tenges()).sum()
    }

    /// Reports whether the stores hold nothing in total.
    #[must_use]
    pub fn is_solvent(road: &Road) -> bool {
        road.stores.values().map(|store| store.tenges()).sum::<Tenge>() == Tenge::ZERO
    }

    /// Last collection recorded at every destination, in ascending position order.
    #[must_use]
    pub fn profit_per_move(road: &Road) -> Vec<LedgerEntry> {
        road.ledger.entries()
    }

    /// Balance held by the store at the position, if any.
    #[must_use]
    pub fn store_tenges(road: &Road, position: Position) -> Option<Tenge> {
        road.stores.get(&position).map(|store| store.tenges())
    }

    /// Positions currently keyed by robots in ascending order.
    #[must_use]
    pub fn robot_positions(road: &Road) -> Vec<Position> {
        road.robots.keys().copied().collect()
    }

    /// Positions hosting stores in ascending order.
    #[must_use]
    pub fn store_positions(road: &Road) -> Vec<Position> {
        road.stores.keys().copied().collect()
    }

    /// Captures a read-only view of every robot.
    #[must_use]
    pub fn robot_view(road: &Road) -> RobotView {
        let snapshots = road
            .robots
            .iter()
            .map(|(&position, robot)| RobotSnapshot {
                position,
                home: robot.home(),
                coordinate: robot.coordinate(),
                tenges: robot.tenges(),
            })
            .collect();
        RobotView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of every store.
    #[must_use]
    pub fn store_view(road: &Road) -> StoreView {
        let snapshots = road
            .stores
            .iter()
            .map(|(&position, store)| StoreSnapshot {
                position,
                coordinate: store.coordinate(),
                initial_tenges: store.initial_tenges(),
                tenges: store.tenges(),
                times_emptied: store.times_emptied(),
            })
            .collect();
        StoreView::from_snapshots(snapshots)
    }
}
