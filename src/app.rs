use crate::config::AnnotatorConfig;
use crate::geometry::Point;
use crate::mapper::CoordinateMapper;
use crate::painter::PainterSurface;
use crate::render::{Frame, Renderer};
use crate::session::{AnnotationSession, PlaceOutcome, TagRequest};
use crate::table::{commit_record, coordinate_rows};
use crate::tag::display_tag;
use crate::upload::{fit_within, BackgroundLoader};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::path::PathBuf;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp", "tif", "tiff"];

// ── Tag prompt ──────────────────────────────────────────────────────────────

struct TagPrompt {
    request: TagRequest,
    buffer: String,
}

enum PromptAnswer {
    Submit(String),
    Cancel,
}

// ── App ─────────────────────────────────────────────────────────────────────

pub struct AnnotatorApp {
    config: AnnotatorConfig,
    session: AnnotationSession,
    renderer: Renderer,
    loader: BackgroundLoader,
    texture: Option<(u64, egui::TextureHandle)>,
    prompt: Option<TagPrompt>,
}

impl AnnotatorApp {
    pub fn new(config: AnnotatorConfig, initial_image: Option<PathBuf>) -> Self {
        let palette = config.palette();
        let session = AnnotationSession::new(palette.clone(), config.closure_threshold);
        let renderer = Renderer::new(palette, config.render_settings());
        let mut loader = BackgroundLoader::default();
        if let Some(path) = initial_image {
            loader.start(path);
        }
        Self {
            config,
            session,
            renderer,
            loader,
            texture: None,
            prompt: None,
        }
    }

    fn poll_upload(&mut self, ctx: &egui::Context) {
        self.loader.apply_to(&mut self.session);
        if self.loader.is_loading() {
            ctx.request_repaint();
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        let Some(background) = self.session.background() else {
            self.texture = None;
            return;
        };
        if matches!(&self.texture, Some((id, _)) if *id == background.id()) {
            return;
        }
        let max_side = ctx.input(|i| i.max_texture_side) as u32;
        let fitted = fit_within(background.pixels(), max_side);
        let rgba = fitted.as_ref().unwrap_or(background.pixels());
        let size = [rgba.width() as usize, rgba.height() as usize];
        let pixels = rgba.as_flat_samples();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
        let handle = ctx.load_texture("background", color_image, egui::TextureOptions::LINEAR);
        self.texture = Some((background.id(), handle));
    }

    fn pick_image(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file();
        match picked {
            Some(path) => self.loader.start(path),
            None => tracing::debug!("upload cancelled"),
        }
    }

    fn reset(&mut self) {
        self.session.reset();
        self.prompt = None;
        tracing::info!("session reset");
    }

    fn handle_pointer(&mut self, response: &egui::Response, mapper: CoordinateMapper) {
        if self.prompt.is_some() {
            return;
        }
        if let Some(pos) = response.hover_pos() {
            self.session.hover(mapper.to_surface(Point::new(pos.x, pos.y)));
        }
        if !response.clicked() {
            return;
        }
        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };
        let local = mapper.to_surface(Point::new(pos.x, pos.y));
        if let PlaceOutcome::NeedsTag(request) = self.session.place_point(local) {
            self.prompt = Some(TagPrompt {
                request,
                buffer: String::new(),
            });
        }
    }

    fn resolve_prompt(&mut self, answer: PromptAnswer) {
        self.prompt = None;
        let input = match &answer {
            PromptAnswer::Submit(text) => Some(text.as_str()),
            PromptAnswer::Cancel => None,
        };
        if let Some(polygon) = self.session.resolve_tag(input) {
            let record = commit_record(polygon, self.config.tag_field);
            tracing::info!(%record, "polygon committed");
        }
    }

    fn show_prompt(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        let mut answer = None;
        egui::Window::new(format!("Polygon {}", prompt.request.polygon_number))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Add tags for this ROI (comma separated):");
                let te = ui.text_edit_singleline(&mut prompt.buffer);
                te.request_focus();
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        answer = Some(PromptAnswer::Submit(prompt.buffer.clone()));
                    }
                    if ui.button("Cancel").clicked() {
                        answer = Some(PromptAnswer::Cancel);
                    }
                });
            });
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Enter) {
                answer = Some(PromptAnswer::Submit(prompt.buffer.clone()));
            } else if i.key_pressed(egui::Key::Escape) {
                answer = Some(PromptAnswer::Cancel);
            }
        });
        if let Some(answer) = answer {
            self.resolve_prompt(answer);
        }
    }

    fn show_coordinates(&self, ui: &mut egui::Ui) {
        ui.heading("Polygon Coordinates");
        let heading = self.config.tag_field.heading();
        for (index, polygon) in self.session.polygons().iter().enumerate() {
            ui.push_id(index, |ui| {
                ui.add_space(8.0);
                ui.strong(format!("Polygon {}", index + 1));
                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .column(Column::exact(80.0))
                    .column(Column::exact(80.0))
                    .column(Column::remainder())
                    .header(20.0, |mut header| {
                        for title in ["Point", "X", "Y"] {
                            header.col(|ui| {
                                ui.strong(title);
                            });
                        }
                    })
                    .body(|mut body| {
                        for row in coordinate_rows(polygon) {
                            body.row(18.0, |mut r| {
                                r.col(|ui| {
                                    ui.label(row.label.to_string());
                                });
                                r.col(|ui| {
                                    ui.label(row.x.to_string());
                                });
                                r.col(|ui| {
                                    ui.label(row.y.to_string());
                                });
                            });
                        }
                        body.row(18.0, |mut r| {
                            r.col(|ui| {
                                ui.strong(heading);
                            });
                            r.col(|ui| {
                                ui.label(display_tag(polygon.tag()));
                            });
                            r.col(|_| {});
                        });
                    });
            });
        }
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for AnnotatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_upload(ctx);
        self.ensure_texture(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Polygon Drawing Tool");
                ui.separator();
                if ui.button("Upload Image").clicked() {
                    self.pick_image();
                }
                if ui.button("Reset").clicked() {
                    self.reset();
                }
                if self.loader.is_loading() {
                    ui.spinner();
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                let (width, height) = self.config.surface_size();
                let (response, painter) =
                    ui.allocate_painter(egui::vec2(width, height), egui::Sense::click());
                let canvas_rect = response.rect;
                let mapper = CoordinateMapper::new(Point::new(canvas_rect.min.x, canvas_rect.min.y));

                self.handle_pointer(&response, mapper);

                let texture = self.texture.as_ref().map(|(id, handle)| (*id, handle.id()));
                let mut surface = PainterSurface::new(&painter, canvas_rect, texture);
                self.renderer.render(&mut surface, &Frame::of(&self.session));
                painter.rect_stroke(
                    canvas_rect,
                    0.0,
                    egui::Stroke::new(1.0, egui::Color32::from_gray(200)),
                    egui::StrokeKind::Outside,
                );

                ui.add_space(16.0);
                self.show_coordinates(ui);
            });
        });

        self.show_prompt(ctx);
    }
}
