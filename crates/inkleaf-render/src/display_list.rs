//! Recording render target.

use crate::renderer::RenderTarget;
use kurbo::{Affine, BezPath, Point, Rect};
use peniko::Color;

/// One recorded draw call.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    FillPath {
        path: BezPath,
        transform: Affine,
        color: Color,
    },
    StrokePath {
        path: BezPath,
        transform: Affine,
        width: f64,
        color: Color,
    },
    Text {
        text: String,
        baseline: Point,
        font_size: f64,
        transform: Affine,
        color: Color,
        underline: bool,
    },
    Image {
        source: String,
        rect: Rect,
        transform: Affine,
    },
}

/// Records draw calls in order so a host can replay them onto its own canvas.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl RenderTarget for DisplayList {
    fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Color) {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            transform,
            color,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, style: &kurbo::Stroke, color: Color) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            transform,
            width: style.width,
            color,
        });
    }

    fn draw_text(
        &mut self,
        text: &str,
        baseline: Point,
        font_size: f64,
        transform: Affine,
        color: Color,
        underline: bool,
    ) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            baseline,
            font_size,
            transform,
            color,
            underline,
        });
    }

    fn draw_image(&mut self, source: &str, rect: Rect, transform: Affine) {
        self.commands.push(DrawCommand::Image {
            source: source.to_string(),
            rect,
            transform,
        });
    }
}
