//! Reader for single-segment WFDB (PhysioNet) records: a `.hea` text header
//! naming one or more binary data files.

pub mod format;
pub mod header;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{WfdbError, WfdbResult};
use crate::signal::EcgRecord;
use header::{RecordHeader, SignalSpec, parse_header};

/// Header path for a record base path: `<base>.hea`.
pub fn header_path(base: &Path) -> PathBuf {
    let mut path: OsString = base.as_os_str().to_owned();
    path.push(".hea");
    PathBuf::from(path)
}

fn read_bytes(path: &Path) -> WfdbResult<Vec<u8>> {
    fs::read(path).map_err(|source| WfdbError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the record at `base` (no extension) into physical units.
/// Data files are resolved relative to the header's directory.
pub fn read_record(base: &Path) -> WfdbResult<EcgRecord> {
    let hea = header_path(base);
    let text = fs::read_to_string(&hea).map_err(|source| WfdbError::Io {
        path: hea.clone(),
        source,
    })?;
    let header = parse_header(&text)?;
    let dir = hea.parent().unwrap_or_else(|| Path::new("."));
    log::debug!(
        "{}: {} signals at {} Hz",
        hea.display(),
        header.signals.len(),
        header.fs
    );

    let digital = read_digital(&header, dir)?;

    let leads = header
        .signals
        .iter()
        .zip(digital)
        .map(|(spec, samples)| to_physical(spec, &samples))
        .collect();

    Ok(EcgRecord {
        name: header.name.clone(),
        fs: header.fs,
        lead_names: header.signals.iter().map(|s| s.description.clone()).collect(),
        units: header.signals.iter().map(|s| s.units.clone()).collect(),
        leads,
    })
}

/// Digital samples per signal, in header order, all truncated to the
/// common sample count.
fn read_digital(header: &RecordHeader, dir: &Path) -> WfdbResult<Vec<Vec<i32>>> {
    let mut per_signal: Vec<Vec<i32>> = Vec::with_capacity(header.signals.len());

    for group in file_groups(&header.signals) {
        let first = &group[0];
        if let Some(other) = group.iter().find(|s| s.format != first.format) {
            return Err(WfdbError::Unsupported(format!(
                "{} mixes storage formats {:?} and {:?}",
                first.file_name, first.format, other.format
            )));
        }

        let path = dir.join(&first.file_name);
        let bytes = read_bytes(&path)?;
        let body = bytes.get(first.byte_offset..).unwrap_or(&[]);
        let width = group.len();
        let available = first.format.samples_in(body.len()) / width;

        let frames = match header.n_samples {
            Some(expected) if available < expected => {
                return Err(WfdbError::Truncated {
                    path,
                    expected,
                    available,
                });
            }
            Some(expected) => expected,
            None => available,
        };

        let flat = first.format.decode(body, frames * width);
        for column in 0..width {
            per_signal.push(flat.iter().skip(column).step_by(width).copied().collect());
        }
    }

    // Without a declared length, files may disagree; keep the shortest.
    let common = per_signal.iter().map(Vec::len).min().unwrap_or(0);
    for samples in &mut per_signal {
        samples.truncate(common);
    }
    Ok(per_signal)
}

/// Consecutive signals stored in the same file.
fn file_groups(signals: &[SignalSpec]) -> Vec<&[SignalSpec]> {
    signals
        .chunk_by(|a, b| a.file_name == b.file_name)
        .collect()
}

fn to_physical(spec: &SignalSpec, samples: &[i32]) -> Vec<f64> {
    let invalid = spec.format.invalid_sample();
    let baseline = spec.baseline as f64;
    samples
        .iter()
        .map(|&d| {
            if d == invalid {
                f64::NAN
            } else {
                (d as f64 - baseline) / spec.adc_gain
            }
        })
        .collect()
}
