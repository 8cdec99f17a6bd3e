// src/preview/view.rs
//
// egui window showing the minimap of the last published merge.

use egui::{Color32, Pos2, Rect, Stroke, Vec2};

use crate::preview::minimap::{Minimap, ENTITY_RGB};
use crate::scene::PreviewHandle;

pub struct MinimapView {
    zoom: f32,
    pan: Vec2,
    show_entities: bool,
}

impl Default for MinimapView {
    fn default() -> Self {
        MinimapView {
            zoom: 6.0,
            pan: Vec2::ZERO,
            show_entities: true,
        }
    }
}

impl MinimapView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, minimap: Option<&Minimap>) {
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.show_entities, "Entities");

            if ui.button("Reset View").clicked() {
                *self = MinimapView {
                    show_entities: self.show_entities,
                    ..MinimapView::default()
                };
            }

            ui.add(egui::Slider::new(&mut self.zoom, 1.0..=32.0).text("Zoom"));
        });

        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());
        if response.dragged() {
            self.pan += response.drag_delta();
        }

        painter.rect_filled(response.rect, 0.0, Color32::BLACK);

        let Some(map) = minimap else {
            painter.text(
                response.rect.center(),
                egui::Align2::CENTER_CENTER,
                "no level merged yet",
                egui::FontId::default(),
                Color32::GRAY,
            );
            return;
        };

        for line in &map.lines {
            let [r, g, b] = line.color.rgb();
            painter.line_segment(
                [
                    self.to_screen(map, line.x1, line.y1, response.rect),
                    self.to_screen(map, line.x2, line.y2, response.rect),
                ],
                Stroke::new(1.0, Color32::from_rgb(r, g, b)),
            );
        }

        if self.show_entities {
            let [r, g, b] = ENTITY_RGB;
            for &(x, y) in &map.entities {
                painter.circle_filled(
                    self.to_screen(map, x, y, response.rect),
                    (self.zoom * 0.5).max(1.5),
                    Color32::from_rgb(r, g, b),
                );
            }
        }
    }

    /// Minimap pixels have y pointing up, the screen has it pointing down.
    fn to_screen(&self, map: &Minimap, x: i32, y: i32, rect: Rect) -> Pos2 {
        let local = Vec2::new(
            (x - map.width / 2) as f32,
            (map.height / 2 - y) as f32,
        );
        rect.center() + local * self.zoom + self.pan
    }
}

pub struct MinimapApp {
    handle: PreviewHandle,
    view: MinimapView,
}

impl MinimapApp {
    pub fn new(handle: PreviewHandle) -> Self {
        MinimapApp {
            handle,
            view: MinimapView::new(),
        }
    }
}

impl eframe::App for MinimapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let snapshot = self.handle.snapshot();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(snapshot.status());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.view.show(ui, snapshot.minimap.as_deref());
        });
    }
}

/// Opens the preview window; returns when it is closed.
pub fn run_minimap_window(handle: PreviewHandle) {
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "rust_csg minimap",
        native_options,
        Box::new(|_cc| Box::new(MinimapApp::new(handle))),
    );
}
