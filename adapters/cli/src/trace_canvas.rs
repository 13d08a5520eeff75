use anyhow::Result as AnyResult;
use glam::Vec2;
use silk_road_rendering::{Canvas, Color, ShapeId};
use tracing::info;

/// Canvas that reports every drawing call through the log.
#[derive(Debug, Default)]
pub(crate) struct TraceCanvas {
    next_shape: u32,
}

impl Canvas for TraceCanvas {
    fn create_shape_at(&mut self, position: Vec2, size: f32, color: Color) -> AnyResult<ShapeId> {
        let shape = ShapeId::new(self.next_shape);
        self.next_shape = self.next_shape.wrapping_add(1);
        info!(
            shape = shape.get(),
            x = position.x,
            y = position.y,
            size,
            color = ?color,
            "create shape"
        );
        Ok(shape)
    }

    fn move_shape_to(&mut self, shape: ShapeId, position: Vec2) -> AnyResult<()> {
        info!(shape = shape.get(), x = position.x, y = position.y, "move shape");
        Ok(())
    }

    fn show(&mut self, shape: ShapeId) -> AnyResult<()> {
        info!(shape = shape.get(), "show shape");
        Ok(())
    }

    fn hide(&mut self, shape: ShapeId) -> AnyResult<()> {
        info!(shape = shape.get(), "hide shape");
        Ok(())
    }

    fn recolor(&mut self, shape: ShapeId, color: Color) -> AnyResult<()> {
        info!(shape = shape.get(), color = ?color, "recolor shape");
        Ok(())
    }
}
