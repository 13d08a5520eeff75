#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Contest runner that replays placement feeds and records the profit of
//! every step.
//!
//! Each step places one entity, lets the robots run a single greedy round,
//! records the total robot balance and reboots the road so the next step
//! starts from a clean slate. [`Replay`] performs those steps one at a time
//! so an external scheduler can pace them. [`Contest::solve`] simply drives a
//! replay to completion.

use silk_road_core::{Command, Event, EventFeed, Tenge};
use silk_road_system_movement::Movement;
use silk_road_world::{self as world, query, Road, SpiralConfig};
use tracing::{debug, info, warn};

/// Point of a step at which an observer is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReplayPhase {
    /// The placement happened and the robots finished their round.
    Collected,
    /// Stores were resupplied and robots went back home.
    Rebooted,
}

/// State of the road handed to an observer during a step.
#[derive(Clone, Copy, Debug)]
pub struct ReplayFrame<'a> {
    /// Zero-based index of the feed entry being replayed.
    pub step: usize,
    /// Point of the step the frame describes.
    pub phase: ReplayPhase,
    /// Road as it stands at this point.
    pub road: &'a Road,
    /// Events the road reported since the previous frame.
    pub events: &'a [Event],
    /// Profit recorded for the step.
    pub profit: Tenge,
}

/// Callback invoked with every frame produced by a replay.
pub type Observer<'o> = &'o mut dyn FnMut(&ReplayFrame<'_>);

/// Step-by-step replay of a placement feed on a single road.
#[derive(Debug)]
pub struct Replay {
    feed: EventFeed,
    road: Road,
    movement: Movement,
    cursor: usize,
    profits: Vec<Tenge>,
}

impl Replay {
    /// Prepares a replay on a road laid out on the default spiral.
    #[must_use]
    pub fn new(feed: EventFeed) -> Self {
        Self::with_layout(feed, SpiralConfig::default())
    }

    /// Prepares a replay on a road laid out with the provided configuration.
    ///
    /// The road is sized once, upfront, to the largest position in the feed.
    #[must_use]
    pub fn with_layout(feed: EventFeed, config: SpiralConfig) -> Self {
        let road = Road::with_layout(i64::from(feed.length()), config);
        Self {
            feed,
            road,
            movement: Movement::default(),
            cursor: 0,
            profits: Vec::new(),
        }
    }

    /// Replays the next feed entry and returns the profit it produced.
    ///
    /// The observer, when present, sees the road twice: once after the
    /// robots collected and once after the reboot. Returns `None` once the
    /// feed is exhausted.
    pub fn step(&mut self, mut observer: Option<Observer<'_>>) -> Option<Tenge> {
        let event = *self.feed.get(self.cursor)?;
        let step = self.cursor;
        self.cursor += 1;

        let mut events = Vec::new();
        if let Err(error) = world::apply(&mut self.road, event.command(), &mut events) {
            warn!(
                step,
                kind = %event.kind(),
                position = %event.position(),
                %error,
                "placement rejected"
            );
        }

        let summary = self.movement.handle(&mut self.road, &mut events);
        let profit = query::total_profit(&self.road);
        self.profits.push(profit);

        if let Some(observer) = observer.as_deref_mut() {
            observer(&ReplayFrame {
                step,
                phase: ReplayPhase::Collected,
                road: &self.road,
                events: &events,
                profit,
            });
        }

        events.clear();
        if let Err(error) = world::apply(&mut self.road, Command::Reboot, &mut events) {
            warn!(step, %error, "reboot rejected");
        }

        if let Some(observer) = observer.as_deref_mut() {
            observer(&ReplayFrame {
                step,
                phase: ReplayPhase::Rebooted,
                road: &self.road,
                events: &events,
                profit,
            });
        }

        debug!(
            step,
            profit = profit.get(),
            moves = summary.moves,
            rejected = summary.rejected,
            "contest step complete"
        );
        Some(profit)
    }

    /// Reports whether every feed entry was replayed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.feed.len()
    }

    /// Number of steps replayed so far.
    #[must_use]
    pub fn steps_taken(&self) -> usize {
        self.cursor
    }

    /// Profit recorded for every step replayed so far.
    #[must_use]
    pub fn profits(&self) -> &[Tenge] {
        &self.profits
    }

    /// Road the replay runs on.
    #[must_use]
    pub fn road(&self) -> &Road {
        &self.road
    }

    /// Consumes the replay, yielding the recorded profits.
    #[must_use]
    pub fn into_profits(self) -> Vec<Tenge> {
        self.profits
    }
}

/// Batch runner that replays a whole feed at once.
#[derive(Clone, Copy, Debug, Default)]
pub struct Contest;

impl Contest {
    /// Replays the feed and returns the profit recorded after every step.
    ///
    /// An empty feed yields an empty result.
    #[must_use]
    pub fn solve(feed: &EventFeed) -> Vec<Tenge> {
        let mut replay = Replay::new(feed.clone());
        while replay.step(None).is_some() {}

        let profits = replay.into_profits();
        info!(
            steps = profits.len(),
            best = profits.iter().max().map(Tenge::get),
            "contest solved"
        );
        profits
    }
}
