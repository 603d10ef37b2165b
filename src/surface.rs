use crate::geometry::{Point, Rect};
use crate::palette::Rgba;
use crate::upload::Background;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// Anchor is the left end of the text, vertically centered.
    Left,
    /// Anchor is the center of the text box.
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub color: Rgba,
    pub align: TextAlign,
}

/// Minimal 2D drawing capability the renderer needs. Paths follow the usual
/// canvas model: `begin_path`, then `move_to`/`line_to`/`close_path`, then
/// `fill` and/or `stroke` the current path.
pub trait DrawingSurface {
    /// `false` until the backend has somewhere to draw.
    fn is_attached(&self) -> bool;
    fn size(&self) -> (f32, f32);

    fn clear(&mut self);
    fn draw_image(&mut self, image: &Background, dest: Rect);

    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn close_path(&mut self);
    fn fill(&mut self, color: Rgba);
    fn stroke(&mut self, color: Rgba, width: f32);

    fn circle(&mut self, center: Point, radius: f32, fill: Rgba, stroke: Rgba, stroke_width: f32);
    fn rounded_rect(&mut self, rect: Rect, radius: f32, fill: Rgba);

    /// Returns (width, height) of `text` at `size`.
    fn measure_text(&self, text: &str, size: f32) -> (f32, f32);
    fn fill_text(&mut self, text: &str, at: Point, style: TextStyle);
}

// ── Recording backend ──────────────────────────────────────────────────────

/// One resolved drawing call. Paths are flattened at `fill`/`stroke` time.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    Image {
        background_id: u64,
        dest: Rect,
    },
    FillPath {
        points: Vec<Point>,
        closed: bool,
        color: Rgba,
    },
    StrokePath {
        points: Vec<Point>,
        closed: bool,
        color: Rgba,
        width: f32,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Rgba,
        stroke: Rgba,
        stroke_width: f32,
    },
    RoundedRect {
        rect: Rect,
        radius: f32,
        fill: Rgba,
    },
    Text {
        text: String,
        at: Point,
        style: TextStyle,
    },
}

/// Headless surface that records every call. Text is measured with a fixed
/// advance per character.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    size: (f32, f32),
    attached: bool,
    ops: Vec<DrawOp>,
    path: Vec<Point>,
    path_closed: bool,
}

impl RecordingSurface {
    const CHAR_ADVANCE: f32 = 0.6;

    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: (width, height),
            attached: true,
            ops: Vec::new(),
            path: Vec::new(),
            path_closed: false,
        }
    }

    pub fn detached(width: f32, height: f32) -> Self {
        Self {
            attached: false,
            ..Self::new(width, height)
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, Point)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, at, .. } => Some((text.as_str(), *at)),
            _ => None,
        })
    }
}

impl DrawingSurface for RecordingSurface {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn size(&self) -> (f32, f32) {
        self.size
    }

    fn clear(&mut self) {
        // A cleared frame starts from nothing.
        self.ops.clear();
        self.path.clear();
        self.path_closed = false;
        self.ops.push(DrawOp::Clear);
    }

    fn draw_image(&mut self, image: &Background, dest: Rect) {
        self.ops.push(DrawOp::Image {
            background_id: image.id(),
            dest,
        });
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.path_closed = false;
    }

    fn move_to(&mut self, p: Point) {
        self.path.push(p);
    }

    fn line_to(&mut self, p: Point) {
        self.path.push(p);
    }

    fn close_path(&mut self) {
        self.path_closed = true;
    }

    fn fill(&mut self, color: Rgba) {
        self.ops.push(DrawOp::FillPath {
            points: self.path.clone(),
            closed: self.path_closed,
            color,
        });
    }

    fn stroke(&mut self, color: Rgba, width: f32) {
        self.ops.push(DrawOp::StrokePath {
            points: self.path.clone(),
            closed: self.path_closed,
            color,
            width,
        });
    }

    fn circle(&mut self, center: Point, radius: f32, fill: Rgba, stroke: Rgba, stroke_width: f32) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            fill,
            stroke,
            stroke_width,
        });
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, fill: Rgba) {
        self.ops.push(DrawOp::RoundedRect { rect, radius, fill });
    }

    fn measure_text(&self, text: &str, size: f32) -> (f32, f32) {
        (text.chars().count() as f32 * size * Self::CHAR_ADVANCE, size)
    }

    fn fill_text(&mut self, text: &str, at: Point, style: TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at,
            style,
        });
    }
}
