use crate::geometry::Point;
use crate::palette::{ColorKey, Palette};
use crate::tag::normalize_tag;
use crate::upload::Background;
use serde::Serialize;

/// Default Euclidean distance inside which a click closes the chain.
pub const DEFAULT_CLOSURE_THRESHOLD: f32 = 10.0;

/// A chain needs more than this many points before it can be closed.
const MIN_CHAIN_BEFORE_CLOSE: usize = 2;

// ── Data Model ──────────────────────────────────────────────────────────────

/// A committed region. Owns its own copy of the vertices.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Polygon {
    points: Vec<Point>,
    color: ColorKey,
    tag: String,
}

impl Polygon {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> &ColorKey {
        &self.color
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Drawing,
    /// The chain was closed and is waiting on the tag prompt.
    AwaitingTag,
}

/// Emitted when a click closes the chain. The caller must answer it with
/// [`AnnotationSession::resolve_tag`].
#[derive(Clone, Debug, PartialEq)]
pub struct TagRequest {
    /// 1-based number the polygon will get.
    pub polygon_number: usize,
    pub vertex_count: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlaceOutcome {
    Started,
    Extended,
    NeedsTag(TagRequest),
    /// Dropped because a tag request is outstanding.
    Ignored,
}

// ── Session ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct AnnotationSession {
    palette: Palette,
    closure_threshold: f32,

    chain: Vec<Point>,
    pending_point: Option<Point>,
    polygons: Vec<Polygon>,
    active_color: ColorKey,
    background: Option<Background>,
    awaiting_tag: bool,
}

impl AnnotationSession {
    pub fn new(palette: Palette, closure_threshold: f32) -> Self {
        let active_color = palette.first();
        Self {
            palette,
            closure_threshold,
            chain: Vec::new(),
            pending_point: None,
            polygons: Vec::new(),
            active_color,
            background: None,
            awaiting_tag: false,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.awaiting_tag {
            SessionState::AwaitingTag
        } else if self.chain.is_empty() {
            SessionState::Idle
        } else {
            SessionState::Drawing
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn closure_threshold(&self) -> f32 {
        self.closure_threshold
    }

    pub fn chain(&self) -> &[Point] {
        &self.chain
    }

    pub fn pending_point(&self) -> Option<Point> {
        self.pending_point
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn active_color(&self) -> &ColorKey {
        &self.active_color
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    fn closes_chain(&self, p: Point) -> bool {
        self.chain.len() > MIN_CHAIN_BEFORE_CLOSE
            && p.is_within(self.chain[0], self.closure_threshold)
    }

    pub fn place_point(&mut self, p: Point) -> PlaceOutcome {
        match self.state() {
            SessionState::AwaitingTag => PlaceOutcome::Ignored,
            SessionState::Idle => {
                self.chain.push(p);
                PlaceOutcome::Started
            }
            SessionState::Drawing if self.closes_chain(p) => {
                self.awaiting_tag = true;
                let request = TagRequest {
                    polygon_number: self.polygons.len() + 1,
                    vertex_count: self.chain.len(),
                };
                tracing::debug!(
                    polygon = request.polygon_number,
                    vertices = request.vertex_count,
                    "chain closed, requesting tag"
                );
                PlaceOutcome::NeedsTag(request)
            }
            SessionState::Drawing => {
                self.chain.push(p);
                PlaceOutcome::Extended
            }
        }
    }

    /// Completes a commit started by [`PlaceOutcome::NeedsTag`]. `None` means
    /// the prompt was cancelled. Returns the new polygon, or `None` if no tag
    /// request was outstanding.
    pub fn resolve_tag(&mut self, input: Option<&str>) -> Option<&Polygon> {
        if !self.awaiting_tag {
            return None;
        }
        self.awaiting_tag = false;

        let polygon = Polygon {
            points: std::mem::take(&mut self.chain),
            color: self.active_color.clone(),
            tag: normalize_tag(input),
        };
        self.pending_point = None;
        self.polygons.push(polygon);
        self.active_color = self.palette.color_for(self.polygons.len());
        self.polygons.last()
    }

    /// Records the pointer position while drawing; returns whether it was taken.
    pub fn hover(&mut self, p: Point) -> bool {
        if self.state() != SessionState::Drawing {
            return false;
        }
        self.pending_point = Some(p);
        true
    }

    pub fn reset(&mut self) {
        self.chain.clear();
        self.pending_point = None;
        self.polygons.clear();
        self.background = None;
        self.awaiting_tag = false;
        self.active_color = self.palette.first();
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = Some(background);
    }
}
