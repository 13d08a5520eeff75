use silk_road_core::{ContestEvent, Event, EventFeed, Position, Tenge};
use silk_road_system_contest::{Contest, Replay, ReplayFrame, ReplayPhase};
use silk_road_world::query;

#[test]
fn replay_matches_batch_solution_and_is_repeatable() {
    let first = record(scripted_feed());
    let second = record(scripted_feed());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.profits, Contest::solve(&scripted_feed()));
    assert_eq!(first.frames.len(), 2 * scripted_feed().len());
}

#[test]
fn every_rebooted_frame_leaves_robots_home_and_stores_full() {
    let outcome = record(scripted_feed());

    for frame in outcome
        .frames
        .iter()
        .filter(|frame| frame.phase == ReplayPhase::Rebooted)
    {
        assert_eq!(frame.total_profit, Tenge::ZERO, "step {}", frame.step);
        assert!(
            frame.robots.iter().all(|&(position, home)| position == home),
            "step {}",
            frame.step
        );
        assert!(frame.stores_full, "step {}", frame.step);
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Outcome {
    profits: Vec<Tenge>,
    frames: Vec<FrameRecord>,
}

#[derive(Debug, PartialEq, Eq)]
struct FrameRecord {
    step: usize,
    phase: ReplayPhase,
    profit: Tenge,
    total_profit: Tenge,
    robots: Vec<(Position, Position)>,
    stores_full: bool,
    events: Vec<Event>,
}

impl From<&ReplayFrame<'_>> for FrameRecord {
    fn from(frame: &ReplayFrame<'_>) -> Self {
        let robots = query::robot_view(frame.road)
            .into_vec()
            .into_iter()
            .map(|robot| (robot.position, robot.home))
            .collect();
        let stores_full = query::store_view(frame.road)
            .iter()
            .all(|store| store.tenges == store.initial_tenges);

        Self {
            step: frame.step,
            phase: frame.phase,
            profit: frame.profit,
            total_profit: query::total_profit(frame.road),
            robots,
            stores_full,
            events: frame.events.to_vec(),
        }
    }
}

fn record(feed: EventFeed) -> Outcome {
    let mut replay = Replay::new(feed);
    let mut frames = Vec::new();
    let mut observer = |frame: &ReplayFrame<'_>| frames.push(FrameRecord::from(frame));

    while !replay.is_finished() {
        let _ = replay.step(Some(&mut observer));
    }

    Outcome {
        profits: replay.into_profits(),
        frames,
    }
}

fn scripted_feed() -> EventFeed {
    let robot = |position| ContestEvent::Robot {
        position: Position::new(position),
    };
    let store = |position, tenges| ContestEvent::Store {
        position: Position::new(position),
        tenges: Tenge::new(tenges),
    };

    EventFeed::new(vec![
        robot(3),
        store(7, 12),
        robot(11),
        store(2, 4),
        store(9, 1),
        robot(7),
        store(14, 30),
    ])
}
