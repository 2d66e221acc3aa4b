use eframe::egui::Ui;
use egui_extras::{Size, StripBuilder};
use egui_plot::{Line, Plot, PlotPoints};

use crate::figure::{EcgFigure, GRID_COLS, GRID_ROWS, LeadPanel, X_LABEL, Y_LABEL};

// ---------------------------------------------------------------------------
// Lead grid (central panel)
// ---------------------------------------------------------------------------

/// Render the 4×3 grid of lead plots, filling rows first.
pub fn lead_grid(ui: &mut Ui, figure: &EcgFigure) {
    StripBuilder::new(ui)
        .sizes(Size::remainder(), GRID_ROWS)
        .vertical(|mut rows| {
            for row in 0..GRID_ROWS {
                rows.cell(|ui: &mut Ui| {
                    StripBuilder::new(ui)
                        .sizes(Size::remainder(), GRID_COLS)
                        .horizontal(|mut cols| {
                            for col in 0..GRID_COLS {
                                cols.cell(|ui: &mut Ui| match figure.panel_at(row, col) {
                                    Some(panel) => lead_plot(ui, row * GRID_COLS + col, panel),
                                    None => {
                                        ui.weak("no lead");
                                    }
                                });
                            }
                        });
                });
            }
        });
}

fn lead_plot(ui: &mut Ui, index: usize, panel: &LeadPanel) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(&panel.title);
    });

    let points: PlotPoints = panel.points.iter().copied().collect();
    let line = Line::new(points)
        .name(&panel.title)
        .color(panel.color)
        .width(0.8);

    Plot::new(("lead_plot", index))
        .x_axis_label(X_LABEL)
        .y_axis_label(Y_LABEL)
        .show_grid(true)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(line);
        });
}
