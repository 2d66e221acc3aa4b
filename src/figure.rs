use eframe::egui::Color32;

use crate::color::lead_palette;
use crate::data::model::MetadataTable;
use crate::signal::EcgRecord;

pub const GRID_ROWS: usize = 4;
pub const GRID_COLS: usize = 3;
pub const X_LABEL: &str = "Time (s)";
pub const Y_LABEL: &str = "mV";

/// One subplot: a single lead against the shared time axis.
#[derive(Debug, Clone)]
pub struct LeadPanel {
    pub title: String,
    pub points: Vec<[f64; 2]>,
    pub color: Color32,
}

/// Everything the plot window needs, detached from the loaded record.
#[derive(Debug, Clone)]
pub struct EcgFigure {
    pub title: String,
    /// `(label, value)` pairs shown above the grid.
    pub summary: Vec<(String, String)>,
    /// Row-major, `GRID_ROWS * GRID_COLS` panels at most.
    pub panels: Vec<LeadPanel>,
}

impl EcgFigure {
    /// Lay out one panel per lead, in lead order, filling rows first.
    pub fn from_record(patient_id: &str, record: &EcgRecord, metadata: &MetadataTable) -> Self {
        let time = record.time_axis();
        let colors = lead_palette(record.n_leads());

        let panels = record
            .leads
            .iter()
            .zip(&record.lead_names)
            .zip(colors)
            .take(GRID_ROWS * GRID_COLS)
            .map(|((samples, name), color)| LeadPanel {
                title: name.clone(),
                points: time.iter().zip(samples).map(|(&t, &v)| [t, v]).collect(),
                color,
            })
            .collect();

        let mut units: Vec<&str> = Vec::new();
        for unit in &record.units {
            if !units.contains(&unit.as_str()) {
                units.push(unit);
            }
        }

        let mut summary = vec![
            ("record".to_string(), record.name.clone()),
            ("fs".to_string(), format!("{} Hz", record.fs)),
            ("samples".to_string(), record.n_samples().to_string()),
            ("duration".to_string(), format!("{:.2} s", record.duration())),
            ("units".to_string(), units.join(", ")),
        ];
        // Keys carry the row number once more than one row matched.
        let numbered = metadata.len() > 1;
        for (n, row) in metadata.rows.iter().enumerate() {
            summary.extend(metadata.columns.iter().zip(row).map(|(col, value)| {
                let key = if numbered {
                    format!("[{}] {col}", n + 1)
                } else {
                    col.clone()
                };
                (key, value.to_string())
            }));
        }

        EcgFigure {
            title: figure_title(patient_id),
            summary,
            panels,
        }
    }

    /// Panel at grid position `(row, col)`, if that cell holds a lead.
    pub fn panel_at(&self, row: usize, col: usize) -> Option<&LeadPanel> {
        self.panels.get(row * GRID_COLS + col)
    }
}

pub fn figure_title(patient_id: &str) -> String {
    format!("Patient {patient_id} – 12-lead ECG")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MetadataValue;

    fn twelve_lead(n_samples: usize, fs: f64) -> EcgRecord {
        let names = [
            "I", "II", "III", "aVR", "aVL", "aVF", "V1", "V2", "V3", "V4", "V5", "V6",
        ];
        EcgRecord {
            name: "1042".into(),
            fs,
            lead_names: names.iter().map(|s| s.to_string()).collect(),
            units: vec!["mV".into(); 12],
            leads: (0..12)
                .map(|lead| (0..n_samples).map(|i| (lead * i) as f64).collect())
                .collect(),
        }
    }

    #[test]
    fn builds_twelve_panels_on_shared_time_axis() {
        let record = twelve_lead(1000, 100.0);
        let fig = EcgFigure::from_record("1042", &record, &MetadataTable::default());

        assert_eq!(fig.title, "Patient 1042 – 12-lead ECG");
        assert_eq!(fig.panels.len(), GRID_ROWS * GRID_COLS);
        for (lead, panel) in fig.panels.iter().enumerate() {
            assert_eq!(panel.title, record.lead_names[lead]);
            assert_eq!(panel.points.len(), 1000);
            assert_eq!(panel.points[0][0], 0.0);
            assert!((panel.points[999][0] - 9.99).abs() < 1e-12);
            assert_eq!(panel.points[10][1], (lead * 10) as f64);
        }
    }

    #[test]
    fn grid_is_filled_row_first() {
        let fig = EcgFigure::from_record("1", &twelve_lead(4, 2.0), &MetadataTable::default());
        assert_eq!(fig.panel_at(0, 0).unwrap().title, "I");
        assert_eq!(fig.panel_at(1, 0).unwrap().title, "aVR");
        assert_eq!(fig.panel_at(3, 2).unwrap().title, "V6");
        assert!(fig.panel_at(4, 0).is_none());
    }

    #[test]
    fn summary_lists_single_metadata_row() {
        let metadata = MetadataTable::new(
            vec!["patient_id".into(), "age".into()],
            vec![vec![MetadataValue::Integer(1042), MetadataValue::Integer(57)]],
        );
        let fig = EcgFigure::from_record("1042", &twelve_lead(10, 100.0), &metadata);
        assert!(fig.summary.contains(&("age".to_string(), "57".to_string())));
        assert!(fig.summary.contains(&("samples".to_string(), "10".to_string())));
    }

    #[test]
    fn summary_lists_every_matching_row() {
        let metadata = MetadataTable::new(
            vec!["patient_id".into(), "visit".into()],
            vec![
                vec![MetadataValue::Integer(7), MetadataValue::String("baseline".into())],
                vec![MetadataValue::Integer(7), MetadataValue::String("follow-up".into())],
            ],
        );
        let fig = EcgFigure::from_record("7", &twelve_lead(10, 100.0), &metadata);
        let pair = |k: &str, v: &str| (k.to_string(), v.to_string());
        assert!(fig.summary.contains(&pair("[1] visit", "baseline")));
        assert!(fig.summary.contains(&pair("[2] visit", "follow-up")));
        assert!(fig.summary.contains(&pair("[2] patient_id", "7")));
        assert!(!fig.summary.iter().any(|(k, _)| k == "visit"));
    }
}
