use std::io::{self, BufRead, Write};

use crate::data::catalog::Catalog;
use crate::data::filter::patient_metadata;
use crate::display::FigureDisplay;
use crate::error::WfdbResult;
use crate::figure::EcgFigure;
use crate::report::MetadataReport;
use crate::signal::{EcgRecord, STANDARD_LEAD_COUNT};
use crate::wfdb::read_record;

/// What one line of input led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Quit,
    NotFound(String),
    Shown(String),
    Failed(String),
}

/// The prompt loop. Owns the catalog for the whole process lifetime.
pub struct Session<D> {
    catalog: Catalog,
    display: D,
    list_limit: usize,
}

impl<D: FigureDisplay> Session<D> {
    pub fn new(catalog: Catalog, display: D, list_limit: usize) -> Self {
        Self {
            catalog,
            display,
            list_limit,
        }
    }

    /// Prompt until the user quits or input ends.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> io::Result<()> {
        loop {
            self.print_listing(&mut out)?;
            write!(out, "\nEnter a patient ID (or 'q' to quit): ")?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                log::debug!("end of input, leaving session");
                return Ok(());
            }
            match self.handle(&line, &mut out)? {
                Step::Quit => return Ok(()),
                Step::NotFound(id) => log::debug!("rejected input '{id}'"),
                Step::Shown(id) => log::info!("plot for patient {id} closed"),
                Step::Failed(id) => log::warn!("patient {id} could not be shown"),
            }
        }
    }

    /// Act on one line of input.
    pub fn handle<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Step> {
        let chosen = line.trim();
        if chosen.eq_ignore_ascii_case("q") {
            return Ok(Step::Quit);
        }
        if !self.catalog.contains(chosen) {
            writeln!(out, "Patient ID '{chosen}' not found. Please try again.")?;
            return Ok(Step::NotFound(chosen.to_string()));
        }

        let record = match self.load_record(chosen) {
            Ok(record) => record,
            Err(e) => {
                log::error!("patient {chosen}: {e}");
                writeln!(out, "Error reading record: {e}")?;
                return Ok(Step::Failed(chosen.to_string()));
            }
        };

        let metadata = patient_metadata(&self.catalog.metadata, chosen);
        if metadata.is_empty() {
            writeln!(out, "No metadata found for patient {chosen}.")?;
        } else {
            writeln!(out, "\n--- Metadata ---")?;
            write!(out, "{}", MetadataReport::new(&metadata))?;
        }
        out.flush()?;

        let figure = EcgFigure::from_record(chosen, &record, &metadata);
        match self.display.show(figure) {
            Ok(()) => Ok(Step::Shown(chosen.to_string())),
            Err(e) => {
                log::error!("patient {chosen}: {e:#}");
                writeln!(out, "Error displaying plot: {e:#}")?;
                Ok(Step::Failed(chosen.to_string()))
            }
        }
    }

    fn load_record(&self, patient_id: &str) -> WfdbResult<EcgRecord> {
        let base = self.catalog.record_base(patient_id);
        log::info!("loading record {}", base.display());
        let record = read_record(&base)?;
        let (n_samples, n_leads) = record.shape();
        log::debug!("{}: {n_leads} leads x {n_samples} samples", record.name);
        record.require_leads(STANDARD_LEAD_COUNT)?;
        Ok(record)
    }

    fn print_listing<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let ids = &self.catalog.patient_ids;
        writeln!(
            out,
            "\n--- Available patient IDs (first {} shown) ---",
            self.list_limit
        )?;
        let shown: Vec<&str> = ids
            .iter()
            .take(self.list_limit)
            .map(String::as_str)
            .collect();
        writeln!(out, "{}", shown.join(", "))?;
        if ids.len() > self.list_limit {
            writeln!(out, "(list truncated)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use anyhow::anyhow;

    use crate::data::catalog::SortPolicy;

    /// Records figures instead of opening windows.
    #[derive(Default)]
    struct RecordingDisplay {
        shown: Vec<EcgFigure>,
        fail: bool,
    }

    impl FigureDisplay for RecordingDisplay {
        fn show(&mut self, figure: EcgFigure) -> anyhow::Result<()> {
            if self.fail {
                return Err(anyhow!("no display available"));
            }
            self.shown.push(figure);
            Ok(())
        }
    }

    /// Write `<root>/<id>/<id>.hea|.dat` with `n_leads` format-16 signals.
    fn write_patient(root: &Path, id: &str, n_leads: usize, n_samples: usize, fs: f64) {
        let dir = root.join(id);
        fs::create_dir_all(&dir).unwrap();
        let mut header = format!("{id} {n_leads} {fs} {n_samples}\n");
        for lead in 0..n_leads {
            header.push_str(&format!("{id}.dat 16 1000/mV 16 0 0 0 0 L{lead}\n"));
        }
        fs::write(dir.join(format!("{id}.hea")), header).unwrap();
        let data: Vec<u8> = (0..n_samples)
            .flat_map(|i| (0..n_leads).map(move |lead| (i + lead) as i16))
            .flat_map(i16::to_le_bytes)
            .collect();
        fs::write(dir.join(format!("{id}.dat")), data).unwrap();
    }

    fn session(root: &Path, display: RecordingDisplay) -> Session<RecordingDisplay> {
        let metadata = root.join("metadata.csv");
        fs::write(&metadata, "patient_id,age,brugada\n1042,57,1\n").unwrap();
        let records = root.join("files");
        fs::create_dir_all(&records).unwrap();
        write_patient(&records, "1042", 12, 1000, 100.0);
        write_patient(&records, "2001", 12, 50, 100.0);
        write_patient(&records, "3000", 8, 50, 100.0);
        let catalog = Catalog::load(&metadata, &records, SortPolicy::Numeric).unwrap();
        Session::new(catalog, display, 20)
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn quit_inputs_end_the_loop() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), RecordingDisplay::default());
        for input in ["q", "Q", "  q\n", "\tQ \r\n"] {
            let mut out = Vec::new();
            assert_eq!(s.handle(input, &mut out).unwrap(), Step::Quit);
            assert!(out.is_empty());
        }
    }

    #[test]
    fn unknown_id_is_reported_and_loop_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), RecordingDisplay::default());
        let mut out = Vec::new();
        let step = s.handle("9999\n", &mut out).unwrap();
        assert_eq!(step, Step::NotFound("9999".into()));
        assert!(output(out).contains("Patient ID '9999' not found"));
    }

    #[test]
    fn blank_input_is_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), RecordingDisplay::default());
        for input in ["", "\n", "   \n"] {
            let mut out = Vec::new();
            assert_eq!(s.handle(input, &mut out).unwrap(), Step::NotFound(String::new()));
            assert_eq!(output(out), "Patient ID '' not found. Please try again.\n");
        }
        assert!(s.display.shown.is_empty());
    }

    #[test]
    fn valid_id_prints_metadata_and_shows_twelve_leads() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), RecordingDisplay::default());
        let mut out = Vec::new();
        assert_eq!(
            s.handle("1042", &mut out).unwrap(),
            Step::Shown("1042".into())
        );

        let text = output(out);
        assert!(text.contains("--- Metadata ---"));
        assert!(text.contains("patient_id age brugada"));
        assert!(text.contains("      1042  57       1"));

        let figure = &s.display.shown[0];
        assert_eq!(figure.title, "Patient 1042 – 12-lead ECG");
        assert_eq!(figure.panels.len(), 12);
        for panel in &figure.panels {
            assert_eq!(panel.points.len(), 1000);
            assert_eq!(panel.points[0][0], 0.0);
            assert!((panel.points[999][0] - 9.99).abs() < 1e-9);
        }
    }

    #[test]
    fn missing_metadata_row_still_plots() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), RecordingDisplay::default());
        let mut out = Vec::new();
        assert_eq!(
            s.handle("2001", &mut out).unwrap(),
            Step::Shown("2001".into())
        );
        assert!(output(out).contains("No metadata found for patient 2001."));
        assert_eq!(s.display.shown.len(), 1);
    }

    #[test]
    fn wrong_lead_count_fails_before_plotting() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), RecordingDisplay::default());
        let mut out = Vec::new();
        assert_eq!(
            s.handle("3000", &mut out).unwrap(),
            Step::Failed("3000".into())
        );
        assert!(output(out).contains("Error reading record: record has 8 leads, expected 12"));
        assert!(s.display.shown.is_empty());
    }

    #[test]
    fn broken_record_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), RecordingDisplay::default());
        fs::remove_file(dir.path().join("files/1042/1042.dat")).unwrap();
        let mut out = Vec::new();
        assert_eq!(
            s.handle("1042", &mut out).unwrap(),
            Step::Failed("1042".into())
        );
        let text = output(out);
        assert!(text.contains("Error reading record"));
        assert!(!text.contains("--- Metadata ---"));
    }

    #[test]
    fn display_failure_is_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let display = RecordingDisplay {
            fail: true,
            ..Default::default()
        };
        let mut s = session(dir.path(), display);
        let input = "1042\n9999\nq\n";
        let mut out = Vec::new();
        s.run(input.as_bytes(), &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("Error displaying plot: no display available"));
        assert!(text.contains("Patient ID '9999' not found"));
        assert_eq!(text.matches("Enter a patient ID").count(), 3);
    }

    #[test]
    fn run_ends_on_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), RecordingDisplay::default());
        let mut out = Vec::new();
        s.run("\n1042\n".as_bytes(), &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("Patient ID '' not found"));
        assert_eq!(text.matches("Enter a patient ID").count(), 3);
        assert_eq!(s.display.shown.len(), 1);
    }

    #[test]
    fn listing_is_truncated_past_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path(), RecordingDisplay::default());
        s.list_limit = 2;
        let mut out = Vec::new();
        s.run("q\n".as_bytes(), &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("1042, 2001\n"));
        assert!(!text.contains("3000"));
        assert!(text.contains("(list truncated)"));
    }
}
