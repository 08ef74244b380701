// src/gui.rs
use std::sync::Arc;
use std::time::Instant;

use egui::{Color32, RichText, Sense, Stroke};

use crate::api::StateBackend;
use crate::config::Settings;
use crate::controller::{Controller, Executor};
use crate::render::Badge;
use crate::state::{parse_count, parse_hex_color, to_hex_color, LED_COUNT};

const CELL_SIZE: f32 = 28.0;
const UNLIT: Color32 = Color32::from_rgb(40, 40, 46);
const UNPAINTABLE: Color32 = Color32::from_rgb(128, 128, 128);

pub struct PanelApp {
    controller: Controller,
    picker: [u8; 3],
    count_text: String,
}

impl PanelApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        backend: Arc<dyn StateBackend>,
        settings: &Settings,
    ) -> Self {
        let ctx = cc.egui_ctx.clone();
        let executor = Executor::Threaded {
            waker: Some(Arc::new(move || ctx.request_repaint())),
        };
        let mut controller = Controller::new(backend, executor, settings.debounce());
        controller.start();

        let mut app = Self {
            controller,
            picker: [0, 0, 0],
            count_text: String::new(),
        };
        app.sync_inputs();
        app
    }

    /// Pull the controller's view of the inputs back into the widgets.
    fn sync_inputs(&mut self) {
        let inputs = self.controller.inputs();
        if let Some(rgb) = parse_hex_color(&inputs.color) {
            self.picker = rgb;
        }
        if self.count_text != inputs.count {
            self.count_text = inputs.count.clone();
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.horizontal(|ui| {
            ui.label("Color");
            if ui.color_edit_button_srgb(&mut self.picker).changed() {
                self.controller.on_color_input(&to_hex_color(self.picker), now);
            }
        });

        ui.horizontal(|ui| {
            ui.label("LEDs");
            let mut count = parse_count(&self.count_text);
            if ui
                .add(egui::Slider::new(&mut count, 0..=LED_COUNT as u8))
                .changed()
            {
                self.controller.on_count_input(&count.to_string(), now);
            }
            let edit = egui::TextEdit::singleline(&mut self.count_text).desired_width(40.0);
            if ui.add(edit).changed() {
                self.controller.on_count_input(&self.count_text, now);
            }
        });

        ui.horizontal(|ui| {
            if ui.button("Off").clicked() {
                self.controller.turn_off();
            }
            if ui.button("Save").clicked() {
                self.controller.save_now();
            }
        });
    }

    fn strip(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for cell in self.controller.preview().cells.iter() {
                let fill = match cell {
                    Some(color) => parse_hex_color(color)
                        .map(|[r, g, b]| Color32::from_rgb(r, g, b))
                        .unwrap_or(UNPAINTABLE),
                    None => UNLIT,
                };
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(CELL_SIZE, CELL_SIZE), Sense::hover());
                ui.painter()
                    .rect(rect, 6.0, fill, Stroke::new(1.0, Color32::from_gray(70)));
            }
        });
    }

    fn labels(&self, ui: &mut egui::Ui) {
        let preview = self.controller.preview();
        egui::Grid::new("labels").num_columns(2).show(ui, |ui| {
            ui.label("Hex");
            ui.monospace(&preview.hex);
            ui.end_row();
            ui.label("Count");
            ui.monospace(&preview.count);
            ui.end_row();
            ui.label("Revision");
            ui.monospace(&preview.rev);
            ui.end_row();
            ui.label("Updated");
            ui.monospace(&preview.updated_at);
            ui.end_row();
        });
    }
}

fn badge(ui: &mut egui::Ui, badge: &Badge) {
    egui::Frame::none()
        .fill(badge.background)
        .stroke(Stroke::new(1.0, badge.border))
        .rounding(10.0)
        .inner_margin(egui::Margin::symmetric(8.0, 3.0))
        .show(ui, |ui| {
            ui.label(RichText::new(&badge.text).small());
        });
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.controller.tick(now);
        self.sync_inputs();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("LED strip");
                badge(ui, self.controller.badge());
            });
            ui.separator();
            self.controls(ui, now);
            ui.add_space(8.0);
            self.strip(ui);
            ui.add_space(8.0);
            self.labels(ui);
        });

        if let Some(wait) = self.controller.next_wakeup(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}
