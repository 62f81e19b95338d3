use std::path::PathBuf;

use eframe::egui;
use image::DynamicImage;

use crate::clipboard;
use crate::editor::{Editor, Hit, PointerEvent};
use crate::export;
use crate::load;
use crate::model::Rgb;

/// Side of a checkerboard square, in points.
const CHECKER_SIZE: f32 = 10.0;
/// Half-length of the corner cross markers on the active area.
const CORNER_MARK: f32 = 5.0;
const TOAST_SECONDS: f64 = 3.0;

const TOAST_OK: egui::Color32 = egui::Color32::from_rgb(0x00, 0x7b, 0xff);
const TOAST_ERR: egui::Color32 = egui::Color32::from_rgb(0xdc, 0x35, 0x45);

struct Toast {
    text: String,
    color: egui::Color32,
    expires_at: f64,
}

pub struct AreaEditApp {
    editor: Editor,
    /// Cached export text, refreshed after every mutation.
    coords: String,

    image: Option<DynamicImage>,
    texture: Option<egui::TextureHandle>,
    /// Reset the area list on the next frame, once the canvas has been
    /// fitted to the live container size.
    pending_reset: bool,

    /// How many areas have ever been created, for color assignment.
    created_areas: usize,
    toast: Option<Toast>,
}

impl AreaEditApp {
    pub fn new(image_path: Option<PathBuf>) -> Self {
        let mut app = Self {
            editor: Editor::new(),
            coords: String::new(),
            image: None,
            texture: None,
            pending_reset: false,
            created_areas: 1,
            toast: None,
        };
        app.refresh_coords();
        if let Some(path) = image_path {
            match load::open_image(&path) {
                Ok(img) => app.install_image(img),
                Err(err) => log::warn!("could not open {}: {err}", path.display()),
            }
        }
        app
    }

    fn refresh_coords(&mut self) {
        self.coords = export::coordinates_text(&self.editor);
    }

    fn show_toast(&mut self, ctx: &egui::Context, text: impl Into<String>, color: egui::Color32) {
        self.toast = Some(Toast {
            text: text.into(),
            color,
            expires_at: ctx.input(|i| i.time) + TOAST_SECONDS,
        });
    }

    /// Take a freshly decoded image into the editor: store it, drop the old
    /// texture, and schedule a canvas refit + area reset for the next frame.
    fn install_image(&mut self, img: DynamicImage) {
        log::info!("loaded image {}x{}", img.width(), img.height());
        self.editor
            .set_image(egui::Vec2::new(img.width() as f32, img.height() as f32));
        // Areas reset only on the first load; replacing the image keeps the
        // current geometry, rescaled to the new canvas.
        if self.image.is_none() {
            self.pending_reset = true;
        }
        self.image = Some(img);
        self.texture = None;
    }

    fn open_via_dialog(&mut self, ctx: &egui::Context) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
            .pick_file();
        if let Some(path) = picked {
            match load::open_image(&path) {
                Ok(img) => self.install_image(img),
                Err(err) => {
                    log::warn!("could not open {}: {err}", path.display());
                    self.show_toast(ctx, format!("Could not open image: {err}"), TOAST_ERR);
                }
            }
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(ref img) = self.image {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture =
                Some(ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR));
        }
    }

    fn copy_coordinates(&mut self, ctx: &egui::Context) {
        match clipboard::copy_text(&self.coords) {
            Ok(()) => self.show_toast(ctx, "Copied!", TOAST_OK),
            Err(err) => {
                log::warn!("clipboard copy failed: {err}");
                self.show_toast(ctx, "Copy failed.", TOAST_ERR);
            }
        }
    }

    /// Image input that arrives outside the toolbar: OS drag-drop and
    /// Ctrl+V of a clipboard image.
    fn handle_incoming_images(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(file) = dropped.first() {
            let decoded = if let Some(path) = &file.path {
                load::open_image(path)
            } else if let Some(bytes) = &file.bytes {
                load::decode_bytes(bytes)
            } else {
                return;
            };
            match decoded {
                Ok(img) => self.install_image(img),
                Err(err) => {
                    log::warn!("dropped file rejected: {err}");
                    self.show_toast(ctx, format!("Could not open image: {err}"), TOAST_ERR);
                }
            }
        }

        let paste = ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::V));
        if paste {
            if let Some(rgba) = clipboard::paste_image() {
                self.install_image(DynamicImage::ImageRgba8(rgba));
            }
        }
    }

    // ── Canvas ──────────────────────────────────────────────────────────────

    fn draw_checkerboard(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_rgb(0xcc, 0xcc, 0xcc));
        let mut yi = 0usize;
        let mut y = canvas_rect.min.y;
        while y < canvas_rect.max.y {
            let mut xi = 0usize;
            let mut x = canvas_rect.min.x;
            while x < canvas_rect.max.x {
                if (xi + yi) % 2 == 0 {
                    let square = egui::Rect::from_min_size(
                        egui::pos2(x, y),
                        egui::vec2(CHECKER_SIZE, CHECKER_SIZE),
                    )
                    .intersect(canvas_rect);
                    painter.rect_filled(square, 0.0, egui::Color32::WHITE);
                }
                x += CHECKER_SIZE;
                xi += 1;
            }
            y += CHECKER_SIZE;
            yi += 1;
        }
    }

    fn draw_areas(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let canvas = self.editor.canvas_size();
        let to_screen = |p: egui::Pos2| canvas_rect.min + p.to_vec2();

        for (index, area) in self.editor.areas().iter().enumerate() {
            let points: Vec<egui::Pos2> =
                area.corners.iter().map(|c| to_screen(c.pos)).collect();
            let outline = egui::Stroke::new(2.0, area.color.outline());

            painter.add(egui::Shape::convex_polygon(
                points.clone(),
                area.color.fill(),
                egui::Stroke::NONE,
            ));

            if area.background {
                // Redraw the image clipped to the quad so the fill sits
                // behind it, then outline on top.
                if let Some(tex) = &self.texture {
                    let mut mesh = egui::Mesh::with_texture(tex.id());
                    for corner in &area.corners {
                        mesh.vertices.push(egui::epaint::Vertex {
                            pos: to_screen(corner.pos),
                            uv: egui::pos2(corner.pos.x / canvas.x, corner.pos.y / canvas.y),
                            color: egui::Color32::WHITE,
                        });
                    }
                    mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
                    painter.add(egui::Shape::mesh(mesh));
                }
            }

            painter.add(egui::Shape::closed_line(points, outline));

            if index == self.editor.active_index() {
                let marker = egui::Stroke::new(1.0, egui::Color32::RED);
                for corner in &area.corners {
                    let p = to_screen(corner.pos);
                    painter.line_segment(
                        [
                            egui::pos2(p.x - CORNER_MARK, p.y),
                            egui::pos2(p.x + CORNER_MARK, p.y),
                        ],
                        marker,
                    );
                    painter.line_segment(
                        [
                            egui::pos2(p.x, p.y - CORNER_MARK),
                            egui::pos2(p.x, p.y + CORNER_MARK),
                        ],
                        marker,
                    );
                }
            }
        }
    }

    /// Map raw pointer state onto the editor's event stream. Mouse and touch
    /// arrive through the same egui pointer abstraction.
    fn handle_canvas_input(
        &mut self,
        ctx: &egui::Context,
        canvas_rect: egui::Rect,
        response: &egui::Response,
    ) {
        let (pressed, down, released, pos, time) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
                i.time,
            )
        });

        let to_canvas =
            |p: egui::Pos2| egui::pos2(p.x - canvas_rect.min.x, p.y - canvas_rect.min.y);

        let mut changed = false;
        match pos {
            Some(p) if canvas_rect.contains(p) => {
                let canvas_pos = to_canvas(p);
                // `hovered` is false when a popup occludes the canvas, so a
                // press there never starts a drag.
                if pressed && response.hovered() {
                    changed |= self
                        .editor
                        .dispatch(PointerEvent::Down { pos: canvas_pos, time });
                } else if down && self.editor.is_dragging() {
                    changed |= self.editor.dispatch(PointerEvent::Moved { pos: canvas_pos });
                }
                if released {
                    changed |= self.editor.dispatch(PointerEvent::Up);
                }
                // Cursor feedback mirrors the drag a press would start.
                if !self.editor.is_dragging() && response.hovered() {
                    let icon = match self.editor.hit_test(canvas_pos) {
                        Hit::Body => egui::CursorIcon::Move,
                        Hit::Corner(_) => egui::CursorIcon::Crosshair,
                    };
                    ctx.set_cursor_icon(icon);
                }
            }
            _ => {
                // Pointer left the canvas: any drag in progress ends.
                if self.editor.is_dragging() {
                    changed |= self.editor.dispatch(PointerEvent::Up);
                }
            }
        }
        if changed {
            self.refresh_coords();
        }
    }

    fn draw_toast(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        if self.toast.as_ref().is_some_and(|t| now > t.expires_at) {
            self.toast = None;
        }
        let Some(toast) = &self.toast else { return };
        egui::Area::new(egui::Id::new("toast"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(toast.color)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(&toast.text).color(egui::Color32::WHITE));
                    });
            });
        // Keep repainting so the toast expires without further input.
        ctx.request_repaint();
    }
}

impl eframe::App for AreaEditApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_texture(ctx);
        self.handle_incoming_images(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open image…").clicked() {
                    self.open_via_dialog(ctx);
                }
                ui.separator();

                let active = self.editor.active_index();
                let mut selected = active;
                egui::ComboBox::from_id_salt("area_selector")
                    .selected_text(format!("Area {}", active + 1))
                    .show_ui(ui, |ui| {
                        for i in 0..self.editor.areas().len() {
                            ui.selectable_value(&mut selected, i, format!("Area {}", i + 1));
                        }
                    });
                if selected != active {
                    self.editor.set_active(selected);
                }

                if ui.button("Add area").clicked() {
                    let color = Rgb::for_area(self.created_areas);
                    self.created_areas += 1;
                    self.editor.add_area(color);
                    self.refresh_coords();
                }
                if ui.button("Remove").clicked() && self.editor.remove_active() {
                    self.refresh_coords();
                }
                ui.separator();

                let mut background = self.editor.active_area().background;
                if ui.checkbox(&mut background, "Background").changed() {
                    self.editor.toggle_background();
                    self.refresh_coords();
                }

                ui.label("Source:");
                let mut source = self.editor.active_area().source_id;
                if ui
                    .add(egui::DragValue::new(&mut source).range(1..=999))
                    .changed()
                {
                    self.editor.set_source_id(source);
                    self.refresh_coords();
                }
                ui.separator();

                if ui.button("Reset").clicked() {
                    self.editor.reset();
                    self.created_areas = 1;
                    self.refresh_coords();
                }
                if ui.button("Copy coordinates").clicked() {
                    self.copy_coordinates(ctx);
                }
            });
        });

        egui::TopBottomPanel::bottom("coordinates").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(egui::RichText::new(&self.coords).monospace().weak());
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let container = response.rect;

            if self.editor.fit_to(container.size()) {
                self.refresh_coords();
            }
            if self.pending_reset {
                self.pending_reset = false;
                self.editor.reset();
                self.created_areas = 1;
                self.refresh_coords();
            }

            let canvas_rect =
                egui::Rect::from_center_size(container.center(), self.editor.canvas_size());

            self.draw_checkerboard(&painter, canvas_rect);
            if let Some(tex) = &self.texture {
                painter.image(
                    tex.id(),
                    canvas_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            self.draw_areas(&painter, canvas_rect);

            self.handle_canvas_input(ctx, canvas_rect, &response);
        });

        self.draw_toast(ctx);
    }
}
