use crate::error::{WfdbError, WfdbResult};

/// Number of leads the viewer lays out.
pub const STANDARD_LEAD_COUNT: usize = 12;

/// A multi-lead recording in physical units.
#[derive(Debug, Clone)]
pub struct EcgRecord {
    pub name: String,
    /// Uniform sampling frequency in Hz
    pub fs: f64,
    pub lead_names: Vec<String>,
    pub units: Vec<String>,
    /// One sample vector per lead, all of equal length.
    pub leads: Vec<Vec<f64>>,
}

impl EcgRecord {
    pub fn n_samples(&self) -> usize {
        self.leads.first().map_or(0, Vec::len)
    }

    pub fn n_leads(&self) -> usize {
        self.leads.len()
    }

    /// (sample_count, lead_count)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_samples(), self.n_leads())
    }

    pub fn duration(&self) -> f64 {
        self.n_samples() as f64 / self.fs
    }

    /// Seconds since the first sample, `i / fs` for every sample index.
    pub fn time_axis(&self) -> Vec<f64> {
        (0..self.n_samples()).map(|i| i as f64 / self.fs).collect()
    }

    /// Fail unless the record carries exactly `expected` leads.
    pub fn require_leads(&self, expected: usize) -> WfdbResult<()> {
        if self.n_leads() != expected {
            return Err(WfdbError::LeadCountMismatch {
                expected,
                found: self.n_leads(),
            });
        }
        Ok(())
    }
}
