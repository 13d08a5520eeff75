use silk_road_core::{Command, Event, Position, Tenge};
use silk_road_system_movement::{Movement, RoundSummary};
use silk_road_world::{self as world, query, Road};

fn pos(value: u32) -> Position {
    Position::new(value)
}

fn road_with(capacity: i64, robots: &[u32], stores: &[(u32, i64)]) -> Road {
    let mut road = Road::new(capacity);
    let mut events = Vec::new();
    for &(position, tenges) in stores {
        world::apply(
            &mut road,
            Command::PlaceStore {
                position: pos(position),
                tenges: Tenge::new(tenges),
            },
            &mut events,
        )
        .expect("store placement");
    }
    for &position in robots {
        world::apply(
            &mut road,
            Command::PlaceRobot {
                position: pos(position),
            },
            &mut events,
        )
        .expect("robot placement");
    }
    road
}

#[test]
fn robot_chains_profitable_stores_in_ascending_order() {
    let mut road = road_with(10, &[1], &[(3, 5), (6, 2), (8, 10)]);
    let mut movement = Movement::default();
    let mut events = Vec::new();

    let summary = movement.handle(&mut road, &mut events);

    assert_eq!(
        summary,
        RoundSummary {
            robots: 1,
            moves: 2,
            collections: 2,
            rejected: 0,
        }
    );
    assert_eq!(query::robots(&road), vec![(pos(8), Tenge::new(8))]);
    assert_eq!(query::store_tenges(&road, pos(6)), Some(Tenge::new(2)));
}

#[test]
fn robot_travels_backwards_when_store_is_behind_it() {
    let mut road = road_with(10, &[9], &[(4, 20)]);
    let mut movement = Movement::default();
    let mut events = Vec::new();

    let _ = movement.handle(&mut road, &mut events);

    assert_eq!(query::robots(&road), vec![(pos(4), Tenge::new(15))]);
    assert!(events.contains(&Event::RobotMoved {
        from: pos(9),
        to: pos(4),
        coordinate: query::coordinate_of(&road, pos(4)).expect("coordinate"),
        cost: Tenge::new(5),
        tenges: Tenge::new(-5),
    }));
}

#[test]
fn break_even_stores_are_not_worth_the_trip() {
    let mut road = road_with(10, &[1], &[(5, 4)]);
    let mut movement = Movement::default();
    let mut events = Vec::new();

    let summary = movement.handle(&mut road, &mut events);

    assert_eq!(summary.moves, 0);
    assert!(events.is_empty());
    assert_eq!(query::robots(&road), vec![(pos(1), Tenge::ZERO)]);
}

#[test]
fn later_robots_skip_stores_emptied_earlier_in_the_round() {
    let mut road = road_with(10, &[2, 6], &[(4, 10)]);
    let mut movement = Movement::default();
    let mut events = Vec::new();

    let summary = movement.handle(&mut road, &mut events);

    assert_eq!(summary.moves, 1);
    assert_eq!(
        query::robots(&road),
        vec![(pos(4), Tenge::new(8)), (pos(6), Tenge::ZERO)]
    );
    assert_eq!(query::total_profit(&road), Tenge::new(8));
}

#[test]
fn moves_onto_other_robots_are_rejected_and_counted() {
    let mut road = road_with(10, &[1, 3], &[(3, 10)]);
    let mut movement = Movement::default();
    let mut events = Vec::new();

    let summary = movement.handle(&mut road, &mut events);

    assert_eq!(
        summary,
        RoundSummary {
            robots: 2,
            moves: 1,
            collections: 1,
            rejected: 1,
        }
    );
    assert_eq!(
        query::robots(&road),
        vec![(pos(1), Tenge::ZERO), (pos(3), Tenge::new(10))]
    );
}

#[test]
fn rounds_are_counted_even_when_nothing_moves() {
    let mut road = Road::new(-1);
    let mut movement = Movement::default();
    let mut events = Vec::new();

    assert_eq!(
        movement.handle(&mut road, &mut events),
        RoundSummary::default()
    );
    let _ = movement.handle(&mut road, &mut events);

    assert_eq!(movement.rounds(), 2);
    assert!(events.is_empty());
}
