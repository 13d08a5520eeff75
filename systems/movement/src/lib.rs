#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Greedy movement system that sends robots after profitable stores.
//!
//! A round snapshots robot and store positions in ascending order. Every
//! robot then scans the stores once, in order, and travels to each store whose
//! current balance exceeds the cost of getting there from wherever the robot
//! currently stands. Robots do not coordinate: a store emptied by an earlier
//! robot is simply no longer worth visiting for the ones that follow.

use silk_road_core::{Command, Event, Position, Tenge};
use silk_road_world::{self as world, query, Road};
use tracing::debug;

/// Outcome of a single movement round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RoundSummary {
    /// Number of robots evaluated during the round.
    pub robots: usize,
    /// Number of moves the road accepted.
    pub moves: usize,
    /// Number of store collections triggered by those moves.
    pub collections: usize,
    /// Number of profitable moves the road rejected.
    pub rejected: usize,
}

/// Stateful system that drives robots across the road one round at a time.
#[derive(Debug, Default)]
pub struct Movement {
    rounds: u64,
}

impl Movement {
    /// Runs one round over the road, appending every event the road reports.
    pub fn handle(&mut self, road: &mut Road, out_events: &mut Vec<Event>) -> RoundSummary {
        let robots = query::robot_positions(road);
        let stores = query::store_positions(road);
        let mut summary = RoundSummary {
            robots: robots.len(),
            ..RoundSummary::default()
        };

        for robot in robots {
            let mut current = robot;
            for &store in &stores {
                let Some(tenges) = query::store_tenges(road, store) else {
                    continue;
                };
                if !profit(current, store, tenges).is_positive() {
                    continue;
                }

                let command = Command::MoveRobot {
                    origin: current,
                    delta: current.delta_to(store),
                };
                let first_new_event = out_events.len();
                match world::apply(road, command, out_events) {
                    Ok(()) => {
                        summary.moves += 1;
                        summary.collections += out_events[first_new_event..]
                            .iter()
                            .filter(|event| matches!(event, Event::StoreCollected { .. }))
                            .count();
                        current = store;
                    }
                    Err(error) => {
                        summary.rejected += 1;
                        debug!(
                            robot = %robot,
                            from = %current,
                            to = %store,
                            %error,
                            "profitable move rejected"
                        );
                    }
                }
            }
        }

        self.rounds = self.rounds.saturating_add(1);
        debug!(
            round = self.rounds,
            robots = summary.robots,
            moves = summary.moves,
            collections = summary.collections,
            rejected = summary.rejected,
            "movement round complete"
        );
        summary
    }

    /// Number of rounds handled so far.
    #[must_use]
    pub const fn rounds(&self) -> u64 {
        self.rounds
    }
}

fn profit(from: Position, store: Position, tenges: Tenge) -> Tenge {
    tenges - Tenge::travel_cost(from.distance(store))
}
