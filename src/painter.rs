use crate::geometry::{triangulate, Point, Rect};
use crate::palette::Rgba;
use crate::surface::{DrawingSurface, TextAlign, TextStyle};
use crate::upload::Background;
use eframe::egui;

/// Triangulated fill for an arbitrary simple ring. egui's own polygon fill
/// fans out from the first vertex, which is only right for convex shapes.
fn fill_mesh(path: &[egui::Pos2], color: egui::Color32) -> Option<egui::epaint::Mesh> {
    let ring: Vec<Point> = path.iter().map(|p| Point::new(p.x, p.y)).collect();
    let triangles = triangulate(&ring);
    if triangles.is_empty() {
        return None;
    }
    let mut mesh = egui::epaint::Mesh::default();
    for pos in path {
        mesh.colored_vertex(*pos, color);
    }
    for [a, b, c] in triangles {
        mesh.add_triangle(a as u32, b as u32, c as u32);
    }
    Some(mesh)
}

/// [`DrawingSurface`] backed by an egui painter. Surface-local coordinates are
/// offset by the canvas rect's origin.
pub struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    rect: egui::Rect,
    texture: Option<(u64, egui::TextureId)>,
    path: Vec<egui::Pos2>,
    path_closed: bool,
}

impl<'a> PainterSurface<'a> {
    /// `texture` is the uploaded copy of the background with that id, if any.
    pub fn new(
        painter: &'a egui::Painter,
        rect: egui::Rect,
        texture: Option<(u64, egui::TextureId)>,
    ) -> Self {
        Self {
            painter,
            rect,
            texture,
            path: Vec::new(),
            path_closed: false,
        }
    }

    fn to_screen(&self, p: Point) -> egui::Pos2 {
        self.rect.min + egui::vec2(p.x, p.y)
    }

    fn to_screen_rect(&self, r: Rect) -> egui::Rect {
        egui::Rect::from_min_max(self.to_screen(r.min()), self.to_screen(r.max()))
    }
}

impl DrawingSurface for PainterSurface<'_> {
    fn is_attached(&self) -> bool {
        self.rect.is_positive()
    }

    fn size(&self) -> (f32, f32) {
        (self.rect.width(), self.rect.height())
    }

    fn clear(&mut self) {
        self.painter
            .rect_filled(self.rect, 0.0, egui::Color32::WHITE);
        self.path.clear();
        self.path_closed = false;
    }

    fn draw_image(&mut self, image: &Background, dest: Rect) {
        match self.texture {
            Some((id, texture)) if id == image.id() => {
                self.painter.image(
                    texture,
                    self.to_screen_rect(dest),
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            _ => tracing::trace!(background = image.id(), "background texture not uploaded yet"),
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.path_closed = false;
    }

    fn move_to(&mut self, p: Point) {
        let pos = self.to_screen(p);
        self.path.push(pos);
    }

    fn line_to(&mut self, p: Point) {
        let pos = self.to_screen(p);
        self.path.push(pos);
    }

    fn close_path(&mut self) {
        self.path_closed = true;
    }

    fn fill(&mut self, color: Rgba) {
        match fill_mesh(&self.path, color.to_egui()) {
            Some(mesh) => {
                self.painter.add(egui::Shape::mesh(mesh));
            }
            None => tracing::trace!(vertices = self.path.len(), "skipping degenerate fill"),
        }
    }

    fn stroke(&mut self, color: Rgba, width: f32) {
        let stroke = egui::Stroke::new(width, color.to_egui());
        let shape = if self.path_closed {
            egui::Shape::closed_line(self.path.clone(), stroke)
        } else {
            egui::Shape::line(self.path.clone(), stroke)
        };
        self.painter.add(shape);
    }

    fn circle(&mut self, center: Point, radius: f32, fill: Rgba, stroke: Rgba, stroke_width: f32) {
        self.painter.circle(
            self.to_screen(center),
            radius,
            fill.to_egui(),
            egui::Stroke::new(stroke_width, stroke.to_egui()),
        );
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f32, fill: Rgba) {
        self.painter
            .rect_filled(self.to_screen_rect(rect), radius, fill.to_egui());
    }

    fn measure_text(&self, text: &str, size: f32) -> (f32, f32) {
        let galley = self.painter.layout_no_wrap(
            text.to_string(),
            egui::FontId::proportional(size),
            egui::Color32::BLACK,
        );
        let size = galley.size();
        (size.x, size.y)
    }

    fn fill_text(&mut self, text: &str, at: Point, style: TextStyle) {
        let anchor = match style.align {
            TextAlign::Left => egui::Align2::LEFT_CENTER,
            TextAlign::Center => egui::Align2::CENTER_CENTER,
        };
        self.painter.text(
            self.to_screen(at),
            anchor,
            text,
            egui::FontId::proportional(style.size),
            style.color.to_egui(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concave_fill_mesh_keeps_every_vertex() {
        let l_shape = [
            egui::pos2(10.0, 10.0),
            egui::pos2(10.0, 200.0),
            egui::pos2(200.0, 200.0),
            egui::pos2(200.0, 100.0),
            egui::pos2(100.0, 100.0),
            egui::pos2(100.0, 10.0),
        ];
        let mesh = fill_mesh(&l_shape, egui::Color32::RED).expect("mesh");
        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.indices.len(), 12);
        assert!(mesh.vertices.iter().zip(l_shape).all(|(v, p)| v.pos == p));
        assert!(mesh.is_valid());
    }

    #[test]
    fn open_segment_has_no_fill() {
        let segment = [egui::pos2(0.0, 0.0), egui::pos2(5.0, 5.0)];
        assert!(fill_mesh(&segment, egui::Color32::RED).is_none());
    }
}
