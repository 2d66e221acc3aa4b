use eframe::egui;

use crate::figure::EcgFigure;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

/// One plot window for one patient; closed by the user to return to the prompt.
pub struct EcgViewerApp {
    pub figure: EcgFigure,
}

impl EcgViewerApp {
    pub fn new(figure: EcgFigure) -> Self {
        Self { figure }
    }
}

impl eframe::App for EcgViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and record summary ----
        egui::TopBottomPanel::top("summary_bar").show(ctx, |ui| {
            panels::summary_bar(ui, &self.figure);
        });

        // ---- Central panel: lead grid ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::lead_grid(ui, &self.figure);
        });
    }
}
