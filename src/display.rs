use anyhow::{Result, anyhow};
use eframe::egui;

use crate::app::EcgViewerApp;
use crate::figure::EcgFigure;

/// Something that can present a finished figure to the user.
pub trait FigureDisplay {
    /// Show `figure`, returning once the user is done with it.
    fn show(&mut self, figure: EcgFigure) -> Result<()>;
}

/// A native window that blocks until it is closed.
pub struct NativeWindow {
    pub inner_size: [f32; 2],
}

impl Default for NativeWindow {
    fn default() -> Self {
        Self {
            inner_size: [1500.0, 1000.0],
        }
    }
}

impl FigureDisplay for NativeWindow {
    fn show(&mut self, figure: EcgFigure) -> Result<()> {
        let title = figure.title.clone();
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(title.as_str())
                .with_inner_size(self.inner_size)
                .with_min_inner_size([600.0, 400.0]),
            // Hand the event loop back so the next patient can reuse it.
            run_and_return: true,
            ..Default::default()
        };

        log::debug!("opening plot window '{title}'");
        eframe::run_native(
            &title,
            options,
            Box::new(|_cc| Ok(Box::new(EcgViewerApp::new(figure)))),
        )
        .map_err(|e| anyhow!("plot window failed: {e}"))
    }
}
