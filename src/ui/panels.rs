use eframe::egui::{RichText, Ui};

use crate::figure::EcgFigure;

// ---------------------------------------------------------------------------
// Top panel – figure title and record summary
// ---------------------------------------------------------------------------

/// Render the figure title and the `label: value` summary of the record.
pub fn summary_bar(ui: &mut Ui, figure: &EcgFigure) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(&figure.title);
    });

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (i, (label, value)) in figure.summary.iter().enumerate() {
            if i > 0 {
                ui.separator();
            }
            ui.label(RichText::new(format!("{label}:")).strong());
            ui.label(value);
        }
    });
}
