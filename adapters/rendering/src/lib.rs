#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Silk Road adapters.
//!
//! Adapters implement [`Canvas`] on top of whatever drawing surface they
//! own. [`RoadPresenter`] translates road snapshots and events into canvas
//! calls, so the simulation never inspects rendering state.

use std::collections::BTreeMap;

use anyhow::Result as AnyResult;
use glam::Vec2;
use silk_road_core::{Coordinate, EntityKind, Event, Position, RobotView, StoreView};
use thiserror::Error;

/// RGBA color used when presenting shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Color of empty road cells.
    pub const ROAD: Self = Self::from_rgb_u8(255, 255, 0);

    /// Color of robots.
    pub const ROBOT: Self = Self::from_rgb_u8(0, 0, 0);

    /// Color of stores holding their balance.
    pub const STORE: Self = Self::from_rgb_u8(0, 0, 255);

    /// Color of stores a robot emptied.
    pub const EMPTIED_STORE: Self = Self::from_rgb_u8(255, 165, 0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Handle of a shape created on a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u32);

impl ShapeId {
    /// Creates a new shape identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying numeric identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Drawing surface able to manage square shapes.
///
/// Shapes are created hidden; callers reveal them with [`Canvas::show`].
pub trait Canvas {
    /// Creates a square centred on `position` and returns its handle.
    fn create_shape_at(&mut self, position: Vec2, size: f32, color: Color) -> AnyResult<ShapeId>;

    /// Moves the shape so it is centred on `position`.
    fn move_shape_to(&mut self, shape: ShapeId, position: Vec2) -> AnyResult<()>;

    /// Makes the shape visible.
    fn show(&mut self, shape: ShapeId) -> AnyResult<()>;

    /// Makes the shape invisible.
    fn hide(&mut self, shape: ShapeId) -> AnyResult<()>;

    /// Changes the fill color of the shape.
    fn recolor(&mut self, shape: ShapeId, color: Color) -> AnyResult<()>;
}

/// Canvas that hands out identifiers and draws nothing.
#[derive(Clone, Debug, Default)]
pub struct NoopCanvas {
    next_shape: u32,
}

impl Canvas for NoopCanvas {
    fn create_shape_at(&mut self, _: Vec2, _: f32, _: Color) -> AnyResult<ShapeId> {
        let shape = ShapeId::new(self.next_shape);
        self.next_shape = self.next_shape.wrapping_add(1);
        Ok(shape)
    }

    fn move_shape_to(&mut self, _: ShapeId, _: Vec2) -> AnyResult<()> {
        Ok(())
    }

    fn show(&mut self, _: ShapeId) -> AnyResult<()> {
        Ok(())
    }

    fn hide(&mut self, _: ShapeId) -> AnyResult<()> {
        Ok(())
    }

    fn recolor(&mut self, _: ShapeId, _: Color) -> AnyResult<()> {
        Ok(())
    }
}

/// Keeps a canvas in sync with the road it presents.
#[derive(Debug)]
pub struct RoadPresenter {
    cell_size: f32,
    visible: bool,
    road_cells: Vec<ShapeId>,
    robots: BTreeMap<Position, ShapeId>,
    stores: BTreeMap<Position, ShapeId>,
    returning: Vec<(Position, ShapeId)>,
}

impl RoadPresenter {
    /// Share of a road cell covered by a store.
    pub const STORE_SCALE: f32 = 0.8;

    /// Share of a road cell covered by a robot.
    pub const ROBOT_SCALE: f32 = 0.5;

    /// Creates a presenter drawing road cells of the provided size.
    pub fn new(cell_size: f32) -> Result<Self, RenderingError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }

        Ok(Self {
            cell_size,
            visible: true,
            road_cells: Vec::new(),
            robots: BTreeMap::new(),
            stores: BTreeMap::new(),
            returning: Vec::new(),
        })
    }

    /// Draws the road cells followed by every store and robot.
    pub fn draw_road<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        cells: &[Coordinate],
        robots: &RobotView,
        stores: &StoreView,
    ) -> AnyResult<()> {
        for &coordinate in cells {
            let shape = self.spawn(canvas, coordinate, self.cell_size, Color::ROAD)?;
            self.road_cells.push(shape);
        }

        for store in stores.iter() {
            let emptied = store.times_emptied > 0 && store.tenges != store.initial_tenges;
            let color = if emptied {
                Color::EMPTIED_STORE
            } else {
                Color::STORE
            };
            self.place_store(canvas, store.position, store.coordinate, color)?;
        }

        for robot in robots.iter() {
            self.place_robot(canvas, robot.position, robot.coordinate)?;
        }

        Ok(())
    }

    /// Mirrors the provided road events on the canvas.
    pub fn apply_events<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        events: &[Event],
    ) -> AnyResult<()> {
        for event in events {
            if !matches!(event, Event::RobotReturned { .. }) {
                self.settle_returning_robots();
            }

            match *event {
                Event::StorePlaced {
                    position,
                    coordinate,
                    ..
                } => self.place_store(canvas, position, coordinate, Color::STORE)?,
                Event::StoreRemoved { position } => {
                    let shape = take_shape(&mut self.stores, EntityKind::Store, position)?;
                    canvas.hide(shape)?;
                }
                Event::RobotPlaced {
                    position,
                    coordinate,
                } => self.place_robot(canvas, position, coordinate)?,
                Event::RobotRemoved { position } => {
                    let shape = take_shape(&mut self.robots, EntityKind::Robot, position)?;
                    canvas.hide(shape)?;
                }
                Event::RobotMoved {
                    from,
                    to,
                    coordinate,
                    ..
                } => {
                    let shape = take_shape(&mut self.robots, EntityKind::Robot, from)?;
                    canvas.move_shape_to(shape, to_canvas(coordinate))?;
                    let _ = self.robots.insert(to, shape);
                }
                Event::StoreCollected { position, .. } => {
                    let shape = shape_at(&self.stores, EntityKind::Store, position)?;
                    canvas.recolor(shape, Color::EMPTIED_STORE)?;
                }
                Event::StoreResupplied { position, .. } => {
                    let shape = shape_at(&self.stores, EntityKind::Store, position)?;
                    canvas.recolor(shape, Color::STORE)?;
                }
                Event::RobotReturned {
                    from,
                    to,
                    coordinate,
                } => {
                    let shape = take_shape(&mut self.robots, EntityKind::Robot, from)?;
                    canvas.move_shape_to(shape, to_canvas(coordinate))?;
                    self.returning.push((to, shape));
                }
                Event::RoadFinalized { .. } => {
                    for shape in self.all_shapes() {
                        canvas.hide(shape)?;
                    }
                    self.robots.clear();
                    self.stores.clear();
                    self.road_cells.clear();
                }
            }
        }

        self.settle_returning_robots();
        Ok(())
    }

    /// Shows or hides every shape the presenter manages.
    pub fn set_visible<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        visible: bool,
    ) -> AnyResult<()> {
        for shape in self.all_shapes() {
            if visible {
                canvas.show(shape)?;
            } else {
                canvas.hide(shape)?;
            }
        }
        self.visible = visible;
        Ok(())
    }

    /// Reports whether shapes are currently shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shape presenting the robot keyed at the position, if any.
    #[must_use]
    pub fn robot_shape(&self, position: Position) -> Option<ShapeId> {
        self.robots.get(&position).copied()
    }

    /// Shape presenting the store at the position, if any.
    #[must_use]
    pub fn store_shape(&self, position: Position) -> Option<ShapeId> {
        self.stores.get(&position).copied()
    }

    fn place_store<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        position: Position,
        coordinate: Coordinate,
        color: Color,
    ) -> AnyResult<()> {
        let size = self.cell_size * Self::STORE_SCALE;
        let shape = self.spawn(canvas, coordinate, size, color)?;
        if let Some(replaced) = self.stores.insert(position, shape) {
            canvas.hide(replaced)?;
        }
        Ok(())
    }

    fn place_robot<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        position: Position,
        coordinate: Coordinate,
    ) -> AnyResult<()> {
        let size = self.cell_size * Self::ROBOT_SCALE;
        let shape = self.spawn(canvas, coordinate, size, Color::ROBOT)?;
        if let Some(replaced) = self.robots.insert(position, shape) {
            canvas.hide(replaced)?;
        }
        Ok(())
    }

    fn spawn<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        coordinate: Coordinate,
        size: f32,
        color: Color,
    ) -> AnyResult<ShapeId> {
        let shape = canvas.create_shape_at(to_canvas(coordinate), size, color)?;
        if self.visible {
            canvas.show(shape)?;
        }
        Ok(shape)
    }

    // Returning robots are rekeyed once the whole batch has moved.
    fn settle_returning_robots(&mut self) {
        for (home, shape) in self.returning.drain(..) {
            let _ = self.robots.insert(home, shape);
        }
    }

    fn all_shapes(&self) -> Vec<ShapeId> {
        self.road_cells
            .iter()
            .chain(self.stores.values())
            .chain(self.robots.values())
            .copied()
            .collect()
    }
}

/// Errors raised while presenting a road.
#[derive(Debug, PartialEq, Error)]
pub enum RenderingError {
    /// Cell size must be positive and finite to produce visible shapes.
    #[error("cell size must be positive (received {cell_size})")]
    InvalidCellSize {
        /// Provided size that failed validation.
        cell_size: f32,
    },
    /// An event referenced an entity the presenter never drew.
    #[error("no {kind} shape drawn at position {position}")]
    MissingShape {
        /// Kind of entity the event referenced.
        kind: EntityKind,
        /// Position the entity was expected at.
        position: Position,
    },
}

fn to_canvas(coordinate: Coordinate) -> Vec2 {
    Vec2::new(coordinate.x() as f32, coordinate.y() as f32)
}

fn shape_at(
    shapes: &BTreeMap<Position, ShapeId>,
    kind: EntityKind,
    position: Position,
) -> Result<ShapeId, RenderingError> {
    shapes
        .get(&position)
        .copied()
        .ok_or(RenderingError::MissingShape { kind, position })
}

fn take_shape(
    shapes: &mut BTreeMap<Position, ShapeId>,
    kind: EntityKind,
    position: Position,
) -> Result<ShapeId, RenderingError> {
    shapes
        .remove(&position)
        .ok_or(RenderingError::MissingShape { kind, position })
}
