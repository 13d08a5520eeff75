//! Outward rectangular spiral that lays road positions out on the canvas.

use silk_road_core::{Coordinate, Position};

/// Cell offsets for one lap: right, down, left, up.
const DIRECTIONS: [(i64, i64); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Extra cells walked by the left and up legs compared to the right and down legs.
const RETURN_LEG_EXTENSION: u64 = 2;

/// Growth of the leg length after a full lap.
const LAP_GROWTH: u64 = 4;

/// Parameters describing where and how large the spiral is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpiralConfig {
    origin: Coordinate,
    cell_size: i32,
    initial_leg: u32,
}

impl SpiralConfig {
    /// Canvas coordinate of position 1 when no other origin is configured.
    pub const DEFAULT_ORIGIN: Coordinate = Coordinate::new(500, 300);

    /// Side length of a single road cell expressed in canvas units.
    pub const DEFAULT_CELL_SIZE: i32 = 10;

    /// Number of cells walked by the first rightward leg.
    pub const DEFAULT_INITIAL_LEG: u32 = 3;

    /// Creates a new spiral configuration.
    ///
    /// An `initial_leg` of zero is raised to one so every leg emits cells.
    #[must_use]
    pub const fn new(origin: Coordinate, cell_size: i32, initial_leg: u32) -> Self {
        Self {
            origin,
            cell_size,
            initial_leg: if initial_leg == 0 { 1 } else { initial_leg },
        }
    }

    /// Canvas coordinate of position 1.
    #[must_use]
    pub const fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Side length of a single road cell expressed in canvas units.
    #[must_use]
    pub const fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Number of cells walked by the first rightward leg.
    #[must_use]
    pub const fn initial_leg(&self) -> u32 {
        self.initial_leg
    }
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_ORIGIN,
            Self::DEFAULT_CELL_SIZE,
            Self::DEFAULT_INITIAL_LEG,
        )
    }
}

/// Position to coordinate mapping for a road of fixed length.
///
/// The walk starts at the configured origin and cycles right, down, left and
/// up. With a first leg of `L` cells the right and down legs walk `L` cells,
/// the left and up legs walk `L + 2`, and the next lap starts with `L + 4`.
/// Consecutive positions are always one cell apart and no coordinate repeats.
///
/// The first [`SpiralLayout::MEMOIZED_POSITIONS`] coordinates are computed once
/// into a table. Positions past the table are resolved lap by lap on lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpiralLayout {
    config: SpiralConfig,
    length: u32,
    coordinates: Vec<Coordinate>,
}

impl SpiralLayout {
    /// Largest number of coordinates held in the memoized table.
    pub const MEMOIZED_POSITIONS: u32 = 1 << 16;

    /// Lays out positions `1..=length`.
    #[must_use]
    pub fn new(length: u32, config: SpiralConfig) -> Self {
        let memoized = usize::try_from(length.min(Self::MEMOIZED_POSITIONS)).unwrap_or(0);
        let coordinates = spiral_cells(memoized, config.initial_leg)
            .into_iter()
            .map(|(column, row)| project(config, column, row))
            .collect();
        Self {
            config,
            length,
            coordinates,
        }
    }

    /// Canvas coordinate of the provided position, if the layout covers it.
    #[must_use]
    pub fn coordinate_of(&self, position: Position) -> Option<Coordinate> {
        if position.get() == 0 || position.get() > self.length {
            return None;
        }
        let index = position.get() - 1;
        match usize::try_from(index).ok().and_then(|i| self.coordinates.get(i)) {
            Some(&coordinate) => Some(coordinate),
            None => {
                let (column, row) = spiral_cell_at(u64::from(index), self.config.initial_leg);
                Some(project(self.config, column, row))
            }
        }
    }

    /// Memoized coordinates, starting with position 1.
    ///
    /// Covers every position unless the layout is longer than
    /// [`SpiralLayout::MEMOIZED_POSITIONS`].
    #[must_use]
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Number of positions covered by the layout.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.length).unwrap_or(usize::MAX)
    }

    /// Reports whether the layout covers no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Configuration the layout was computed with.
    #[must_use]
    pub const fn config(&self) -> SpiralConfig {
        self.config
    }
}

fn spiral_cells(length: usize, initial_leg: u32) -> Vec<(i64, i64)> {
    let mut cells = Vec::with_capacity(length);
    let mut cursor = (0_i64, 0_i64);
    let mut leg = u64::from(initial_leg);

    while cells.len() < length {
        let legs = [
            leg,
            leg,
            leg + RETURN_LEG_EXTENSION,
            leg + RETURN_LEG_EXTENSION,
        ];
        for (index, (&(dx, dy), &steps)) in DIRECTIONS.iter().zip(legs.iter()).enumerate() {
            for step in 0..steps {
                if cells.len() == length {
                    return cells;
                }
                if step > 0 {
                    cursor = (cursor.0 + dx, cursor.1 + dy);
                }
                cells.push(cursor);
            }

            let (turn_dx, turn_dy) = DIRECTIONS[(index + 1) % DIRECTIONS.len()];
            cursor = (cursor.0 + turn_dx, cursor.1 + turn_dy);
        }
        leg += LAP_GROWTH;
    }

    cells
}

/// Cell of the zero-based `index` without walking the preceding cells.
///
/// Lap `k` starts at `(-2k, -2k)` and holds `4 * leg + 4` cells.
fn spiral_cell_at(index: u64, initial_leg: u32) -> (i64, i64) {
    let mut remaining = index;
    let mut leg = u64::from(initial_leg);
    let mut lap_start = 0_i64;

    loop {
        let lap_cells = 4 * leg + 2 * RETURN_LEG_EXTENSION;
        if remaining < lap_cells {
            break;
        }
        remaining -= lap_cells;
        leg += LAP_GROWTH;
        lap_start -= 2;
    }

    let (x, y) = (lap_start, lap_start);
    let short = i64::try_from(leg).unwrap_or(i64::MAX);
    let offset = i64::try_from(remaining).unwrap_or(i64::MAX);
    let long = leg + RETURN_LEG_EXTENSION;

    if remaining < leg {
        (x + offset, y)
    } else if remaining < 2 * leg {
        (x + short - 1, y + 1 + offset - short)
    } else if remaining < 2 * leg + long {
        (x + short - 2 - (offset - 2 * short), y + short)
    } else {
        let up = offset - 2 * short - (short + 2);
        (x - 3, y + short - 1 - up)
    }
}

fn project(config: SpiralConfig, column: i64, row: i64) -> Coordinate {
    let cell_size = i64::from(config.cell_size);
    let x = i64::from(config.origin.x()) + column * cell_size;
    let y = i64::from(config.origin.y()) + row * cell_size;
    Coordinate::new(clamp_to_i32(x), clamp_to_i32(y))
}

fn clamp_to_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn coordinates(values: &[(i32, i32)]) -> Vec<Coordinate> {
        values
            .iter()
            .map(|&(x, y)| Coordinate::new(x, y))
            .collect()
    }

    #[test]
    fn first_lap_matches_reference_walk() {
        let layout = SpiralLayout::new(17, SpiralConfig::default());

        assert_eq!(
            layout.coordinates(),
            coordinates(&[
                (500, 300),
                (510, 300),
                (520, 300),
                (520, 310),
                (520, 320),
                (520, 330),
                (510, 330),
                (500, 330),
                (490, 330),
                (480, 330),
                (470, 330),
                (470, 320),
                (470, 310),
                (470, 300),
                (470, 290),
                (470, 280),
                (480, 280),
            ])
            .as_slice()
        );
    }

    #[test]
    fn second_lap_walks_longer_legs() {
        let layout = SpiralLayout::new(40, SpiralConfig::default());

        assert_eq!(
            layout.coordinate_of(Position::new(23)),
            Some(Coordinate::new(540, 280))
        );
        assert_eq!(
            layout.coordinate_of(Position::new(30)),
            Some(Coordinate::new(540, 350))
        );
        assert_eq!(
            layout.coordinate_of(Position::new(39)),
            Some(Coordinate::new(450, 350))
        );
        assert_eq!(
            layout.coordinate_of(Position::new(40)),
            Some(Coordinate::new(450, 340))
        );
    }

    #[test]
    fn coordinates_never_repeat() {
        let layout = SpiralLayout::new(3_000, SpiralConfig::default());
        let unique: HashSet<Coordinate> = layout.coordinates().iter().copied().collect();

        assert_eq!(layout.len(), 3_000);
        assert_eq!(unique.len(), 3_000);
    }

    #[test]
    fn consecutive_positions_are_adjacent_cells() {
        let layout = SpiralLayout::new(500, SpiralConfig::default());

        for pair in layout.coordinates().windows(2) {
            let step = (pair[0].x() - pair[1].x()).abs() + (pair[0].y() - pair[1].y()).abs();
            assert_eq!(step, SpiralConfig::DEFAULT_CELL_SIZE, "{pair:?}");
        }
    }

    #[test]
    fn layout_is_deterministic_and_prefix_stable() {
        let short = SpiralLayout::new(25, SpiralConfig::default());
        let long = SpiralLayout::new(90, SpiralConfig::default());

        assert_eq!(short, SpiralLayout::new(25, SpiralConfig::default()));
        assert_eq!(short.coordinates(), &long.coordinates()[..25]);
    }

    #[test]
    fn zero_length_yields_empty_table() {
        let layout = SpiralLayout::new(0, SpiralConfig::default());

        assert!(layout.is_empty());
        assert_eq!(layout.coordinate_of(Position::new(1)), None);
    }

    #[test]
    fn lookups_outside_the_table_return_none() {
        let layout = SpiralLayout::new(10, SpiralConfig::default());

        assert_eq!(layout.coordinate_of(Position::new(0)), None);
        assert_eq!(layout.coordinate_of(Position::new(11)), None);
        assert_eq!(
            layout.coordinate_of(Position::new(10)),
            Some(Coordinate::new(480, 330))
        );
    }

    #[test]
    fn lap_arithmetic_matches_the_walk() {
        for initial_leg in [1, 2, 3, 7] {
            let walked = spiral_cells(3_000, initial_leg);
            for (index, &cell) in walked.iter().enumerate() {
                assert_eq!(
                    spiral_cell_at(index as u64, initial_leg),
                    cell,
                    "leg {initial_leg}, index {index}"
                );
            }
        }
    }

    #[test]
    fn positions_past_the_table_are_resolved_on_lookup() {
        let layout = SpiralLayout::new(u32::MAX, SpiralConfig::default());
        let memoized = SpiralLayout::MEMOIZED_POSITIONS;

        assert_eq!(layout.len(), u32::MAX as usize);
        assert_eq!(layout.coordinates().len(), memoized as usize);

        let last_memoized = layout
            .coordinate_of(Position::new(memoized))
            .expect("memoized");
        let first_computed = layout
            .coordinate_of(Position::new(memoized + 1))
            .expect("computed");
        let step = (last_memoized.x() - first_computed.x()).abs()
            + (last_memoized.y() - first_computed.y()).abs();
        assert_eq!(step, SpiralConfig::DEFAULT_CELL_SIZE);

        let before_last = layout
            .coordinate_of(Position::new(u32::MAX - 1))
            .expect("covered");
        let last = layout
            .coordinate_of(Position::new(u32::MAX))
            .expect("covered");
        let step = (before_last.x() - last.x()).abs() + (before_last.y() - last.y()).abs();
        assert_eq!(step, SpiralConfig::DEFAULT_CELL_SIZE);
    }

    #[test]
    fn zero_initial_leg_is_raised_to_one() {
        let config = SpiralConfig::new(Coordinate::new(0, 0), 1, 0);

        assert_eq!(config.initial_leg(), 1);
        assert_eq!(
            SpiralLayout::new(3, config).coordinates(),
            coordinates(&[(0, 0), (0, 1), (-1, 1)]).as_slice()
        );
    }

    #[test]
    fn custom_configuration_scales_and_shifts_the_walk() {
        let config = SpiralConfig::new(Coordinate::new(0, 0), 1, 2);
        let layout = SpiralLayout::new(6, config);

        assert_eq!(
            layout.coordinates(),
            coordinates(&[(0, 0), (1, 0), (1, 1), (1, 2), (0, 2), (-1, 2)]).as_slice()
        );
        assert_eq!(layout.config(), config);
    }
}
