//! Main application state and UI layout.

use std::path::Path;
use std::time::Duration;

use eframe::egui;
use monthcard_core::audio::Player;
use monthcard_core::canvas::{Brush, Canvas};
use monthcard_core::io;
use monthcard_core::month::{Month, Resources};

/// Save target in the working directory, overwritten on every save.
const SAVE_FILE: &str = "card.png";

// ─── Actions ────────────────────────────────────────────────────

/// What a widget asked for this frame.
///
/// Collected during the view pass and applied afterwards, so widget layout
/// stays decoupled from the handlers.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    SelectMonth(Month),
    PlayClip,
    Save,
    Clear,
}

// ─── Main app ───────────────────────────────────────────────────

pub struct CardApp {
    resources: Resources,
    month: Month,
    brush: Brush,
    /// None until the first frame sizes it to the view.
    canvas: Option<Canvas>,
    /// Canvas area height measured on the latest frame; template loads size
    /// against this, not the prior raster.
    view_height: u32,
    /// Raster changed since the last texture upload.
    canvas_dirty: bool,
    texture: Option<egui::TextureHandle>,
    /// Previous pointer position in raster coordinates, while dragging.
    last_pointer: Option<(i32, i32)>,
    player: Player,
    /// Last audio problem, shown in the status bar (audio never dialogs).
    audio_note: Option<String>,
}

impl CardApp {
    pub fn new(resources: Resources) -> Self {
        Self {
            resources,
            month: Month::January,
            brush: Brush::default(),
            canvas: None,
            view_height: 0,
            canvas_dirty: false,
            texture: None,
            last_pointer: None,
            player: Player::new(),
            audio_note: None,
        }
    }

    /// Re-upload the raster as an egui texture.
    fn upload_canvas_texture(&mut self, ctx: &egui::Context) {
        let Some(canvas) = self.canvas.as_ref() else {
            return;
        };
        let img = canvas.image();
        let size = [img.width() as usize, img.height() as usize];
        let color = egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw());
        match self.texture.as_mut() {
            Some(texture) => texture.set(color, egui::TextureOptions::NEAREST),
            None => {
                self.texture = Some(ctx.load_texture("canvas", color, egui::TextureOptions::NEAREST))
            }
        }
        self.canvas_dirty = false;
    }

    /// Turn pointer drags over the canvas image into stroke segments.
    fn handle_stroke(&mut self, response: &egui::Response) {
        let origin = response.rect.min;
        let to_raster = |pos: egui::Pos2| {
            let p = pos - origin;
            (p.x.round() as i32, p.y.round() as i32)
        };

        if response.drag_started() {
            // A press resets the trail; the first segment starts here.
            self.last_pointer = response.interact_pointer_pos().map(to_raster);
        } else if response.dragged() {
            if let (Some(prev), Some(pos)) = (self.last_pointer, response.interact_pointer_pos()) {
                let current = to_raster(pos);
                if let Some(canvas) = self.canvas.as_mut() {
                    canvas.stroke(prev, current, &self.brush);
                    self.canvas_dirty = true;
                }
                self.last_pointer = Some(current);
            }
        } else if response.drag_stopped() {
            self.last_pointer = None;
        }
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::SelectMonth(month) => {
                let path = self.resources.template_path(month);
                let view_height = self.view_height;
                match io::load_template(&path) {
                    Ok(template) => {
                        match self.canvas.as_mut() {
                            Some(canvas) => canvas.set_template(&template, view_height),
                            None => {
                                // Month picked before the first paint; size
                                // the raster from the template alone.
                                let mut canvas = Canvas::new(template.width(), template.height());
                                canvas.set_template(&template, view_height);
                                self.canvas = Some(canvas);
                            }
                        }
                        self.canvas_dirty = true;
                    }
                    Err(e) => {
                        // Canvas stays untouched on a failed load.
                        log::error!("{e:#}");
                        error_dialog(&format!("Could not read template image for {month}"));
                    }
                }
            }
            Action::PlayClip => {
                self.audio_note = None;
                self.player.play_file(self.resources.audio_path(self.month));
            }
            Action::Save => {
                let Some(canvas) = self.canvas.as_ref() else {
                    return;
                };
                match io::save_png(canvas.image(), Path::new(SAVE_FILE)) {
                    Ok(()) => info_dialog("Image saved successfully!"),
                    Err(e) => {
                        log::error!("{e:#}");
                        error_dialog(&format!("Error saving image: {e}"));
                    }
                }
            }
            Action::Clear => {
                if let Some(canvas) = self.canvas.as_mut() {
                    canvas.clear();
                    self.canvas_dirty = true;
                }
            }
        }
    }
}

impl eframe::App for CardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(msg) = self.player.state.take_error() {
            log::warn!("Audio: {msg}");
            self.audio_note = Some(msg);
        }
        // Keep the playing indicator fresh without burning frames.
        if self.player.state.is_playing() {
            ctx.request_repaint_after(Duration::from_millis(200));
        }

        let mut actions: Vec<Action> = Vec::new();

        // Top controls: month selector, Save/Play/Clear, brush settings
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let previous = self.month;
                egui::ComboBox::from_id_salt("month")
                    .selected_text(self.month.label())
                    .show_ui(ui, |ui| {
                        for month in Month::ALL {
                            ui.selectable_value(&mut self.month, month, month.label());
                        }
                    });
                if self.month != previous {
                    actions.push(Action::SelectMonth(self.month));
                }

                if ui.button("Save").clicked() {
                    actions.push(Action::Save);
                }
                if ui.button("Play").clicked() {
                    actions.push(Action::PlayClip);
                }
                if ui.button("Clear").clicked() {
                    actions.push(Action::Clear);
                }
            });
            ui.horizontal(|ui| {
                ui.label("Color:");
                ui.color_edit_button_srgb(&mut self.brush.color);
                ui.separator();
                ui.label("Width:");
                ui.add(egui::Slider::new(
                    &mut self.brush.width,
                    Brush::MIN_WIDTH..=Brush::MAX_WIDTH,
                ));
            });
            ui.add_space(4.0);
        });

        // Bottom status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.month.label());
                ui.separator();
                ui.label(format!("Brush {}px", self.brush.clamped_width()));
                if self.player.state.is_playing() {
                    ui.separator();
                    ui.label("Playing");
                }
                if let Some(note) = &self.audio_note {
                    ui.separator();
                    ui.colored_label(egui::Color32::RED, note);
                }
            });
        });

        // Central canvas
        egui::CentralPanel::default().show(ctx, |ui| {
            let size = ui.available_size();
            self.view_height = size.y.round() as u32;
            if self.canvas.is_none() {
                self.canvas = Some(Canvas::new(size.x as u32, size.y as u32));
                self.canvas_dirty = true;
            }
            if self.canvas_dirty {
                self.upload_canvas_texture(ctx);
            }
            let Some((texture_id, texture_size)) =
                self.texture.as_ref().map(|t| (t.id(), t.size_vec2()))
            else {
                return;
            };

            // The raster can outgrow the view after a tall template loads.
            egui::ScrollArea::both().show(ui, |ui| {
                let response = ui.add(
                    egui::Image::new(egui::load::SizedTexture::new(texture_id, texture_size))
                        .sense(egui::Sense::drag()),
                );
                self.handle_stroke(&response);
            });
        });

        for action in actions {
            self.apply_action(action);
        }
    }
}

// ─── Modal dialogs ──────────────────────────────────────────────

fn info_dialog(description: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Info)
        .set_title("Monthcard")
        .set_description(description)
        .show();
}

fn error_dialog(description: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Monthcard")
        .set_description(description)
        .show();
}
