use crate::geometry::{centroid, vertex_label, Point, Rect};
use crate::palette::{ColorKey, Palette, Rgba};
use crate::session::{AnnotationSession, Polygon};
use crate::surface::{DrawingSurface, TextAlign, TextStyle};
use crate::upload::Background;

pub const CLOSE_HINT: &str = "Drop to complete";

const LINE_WIDTH: f32 = 2.0;
const VERTEX_RADIUS: f32 = 10.0;
const VERTEX_LABEL_SIZE: f32 = 12.0;
const INDEX_LABEL_SIZE: f32 = 16.0;

const GRID_LINE: Rgba = Rgba::rgb(0xdd, 0xdd, 0xdd);
const GRID_LABEL: Rgba = Rgba::rgb(0x66, 0x66, 0x66);
const GRID_LABEL_SIZE: f32 = 8.0;

const HINT_TEXT_SIZE: f32 = 12.0;
const HINT_PADDING: f32 = 6.0;
const HINT_RADIUS: f32 = 4.0;
const HINT_GAP: f32 = 4.0;
const HINT_FILL: Rgba = Rgba::rgba(0x1f, 0x29, 0x37, 0xe6);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    pub closure_threshold: f32,
    pub grid_spacing: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            closure_threshold: crate::session::DEFAULT_CLOSURE_THRESHOLD,
            grid_spacing: 50.0,
        }
    }
}

/// Everything a frame depends on. Borrowed from the session.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub background: Option<&'a Background>,
    pub polygons: &'a [Polygon],
    pub chain: &'a [Point],
    pub pending_point: Option<Point>,
    pub active_color: &'a ColorKey,
}

impl<'a> Frame<'a> {
    pub fn of(session: &'a AnnotationSession) -> Self {
        Self {
            background: session.background(),
            polygons: session.polygons(),
            chain: session.chain(),
            pending_point: session.pending_point(),
            active_color: session.active_color(),
        }
    }
}

/// Stateless frame composer. Every call redraws the whole surface.
#[derive(Clone, Debug)]
pub struct Renderer {
    palette: Palette,
    settings: RenderSettings,
}

impl Renderer {
    pub fn new(palette: Palette, settings: RenderSettings) -> Self {
        Self { palette, settings }
    }

    pub fn render(&self, target: &mut dyn DrawingSurface, frame: &Frame<'_>) {
        if !target.is_attached() {
            tracing::trace!(
                err = %crate::error::AnnotatorError::RenderTargetUnavailable,
                "skipping frame"
            );
            return;
        }
        let (width, height) = target.size();

        target.clear();
        match frame.background {
            Some(bg) => target.draw_image(bg, Rect::new(0.0, 0.0, width, height)),
            None => self.draw_grid(target, width, height),
        }

        for (index, polygon) in frame.polygons.iter().enumerate() {
            self.draw_polygon(target, index, polygon);
        }

        let active = self.palette.stroke_for(frame.active_color);
        if !frame.chain.is_empty() {
            trace_path(target, frame.chain, false);
            target.stroke(active, LINE_WIDTH);
            draw_vertex_markers(target, frame.chain, active);
        }

        if let (Some(last), Some(pending)) = (frame.chain.last(), frame.pending_point) {
            target.begin_path();
            target.move_to(*last);
            target.line_to(pending);
            target.stroke(active, LINE_WIDTH);
        }

        if self.ready_to_close(frame) {
            draw_close_hint(target, frame.chain[0]);
        }
    }

    /// Whether the "drop to complete" affordance applies to this frame.
    pub fn ready_to_close(&self, frame: &Frame<'_>) -> bool {
        if frame.chain.len() <= 2 {
            return false;
        }
        let anchor = frame
            .pending_point
            .or_else(|| frame.chain.last().copied())
            .unwrap_or_default();
        anchor.is_within(frame.chain[0], self.settings.closure_threshold)
    }

    fn draw_grid(&self, target: &mut dyn DrawingSurface, width: f32, height: f32) {
        let spacing = self.settings.grid_spacing;
        if spacing <= 0.0 {
            return;
        }
        let label = TextStyle {
            size: GRID_LABEL_SIZE,
            color: GRID_LABEL,
            align: TextAlign::Left,
        };

        let mut x = 0.0;
        while x <= width {
            target.begin_path();
            target.move_to(Point::new(x, 0.0));
            target.line_to(Point::new(x, height));
            target.stroke(GRID_LINE, 1.0);
            target.fill_text(
                &format!("{x}"),
                Point::new(x + 2.0, height - GRID_LABEL_SIZE),
                label,
            );
            x += spacing;
        }

        let mut y = 0.0;
        while y <= height {
            target.begin_path();
            target.move_to(Point::new(0.0, y));
            target.line_to(Point::new(width, y));
            target.stroke(GRID_LINE, 1.0);
            target.fill_text(&format!("{y}"), Point::new(2.0, y + GRID_LABEL_SIZE), label);
            y += spacing;
        }
    }

    fn draw_polygon(&self, target: &mut dyn DrawingSurface, index: usize, polygon: &Polygon) {
        let stroke = self.palette.stroke_for(polygon.color());
        let points = polygon.points();

        trace_path(target, points, true);
        target.fill(self.palette.fill_for(polygon.color()));
        target.stroke(stroke, LINE_WIDTH);
        draw_vertex_markers(target, points, stroke);

        if points.len() > 2 {
            if let Some(center) = centroid(points) {
                target.fill_text(
                    &(index + 1).to_string(),
                    center,
                    TextStyle {
                        size: INDEX_LABEL_SIZE,
                        color: Rgba::BLACK,
                        align: TextAlign::Center,
                    },
                );
            }
        }
    }
}

fn trace_path(target: &mut dyn DrawingSurface, points: &[Point], closed: bool) {
    target.begin_path();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        target.move_to(*first);
    }
    for p in iter {
        target.line_to(*p);
    }
    if closed {
        target.close_path();
    }
}

fn draw_vertex_markers(target: &mut dyn DrawingSurface, points: &[Point], color: Rgba) {
    let style = TextStyle {
        size: VERTEX_LABEL_SIZE,
        color: Rgba::BLACK,
        align: TextAlign::Center,
    };
    for (i, p) in points.iter().enumerate() {
        target.circle(*p, VERTEX_RADIUS, Rgba::WHITE, color, LINE_WIDTH);
        target.fill_text(&vertex_label(i).to_string(), *p, style);
    }
}

/// Rounded tooltip centered above the first vertex marker.
fn draw_close_hint(target: &mut dyn DrawingSurface, first: Point) {
    let (text_w, text_h) = target.measure_text(CLOSE_HINT, HINT_TEXT_SIZE);
    let width = text_w + HINT_PADDING * 2.0;
    let height = text_h + HINT_PADDING * 2.0;
    let rect = Rect::new(
        first.x - width / 2.0,
        first.y - VERTEX_RADIUS - HINT_GAP - height,
        width,
        height,
    );
    target.rounded_rect(rect, HINT_RADIUS, HINT_FILL);
    target.fill_text(
        CLOSE_HINT,
        Point::new(first.x, rect.y + height / 2.0),
        TextStyle {
            size: HINT_TEXT_SIZE,
            color: Rgba::WHITE,
            align: TextAlign::Center,
        },
    );
}
