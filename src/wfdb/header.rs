use super::format::StorageFormat;
use crate::error::{WfdbError, WfdbResult};

/// Sampling frequency assumed when the record line omits it.
pub const DEFAULT_FS: f64 = 250.0;
/// ADC gain (units per digital step) assumed when omitted or zero.
pub const DEFAULT_GAIN: f64 = 200.0;

/// The record line plus one spec per signal line of a `.hea` file.
#[derive(Debug, Clone)]
pub struct RecordHeader {
    pub name: String,
    pub fs: f64,
    /// Samples per signal, if declared.
    pub n_samples: Option<usize>,
    pub signals: Vec<SignalSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalSpec {
    pub file_name: String,
    pub format: StorageFormat,
    pub byte_offset: usize,
    pub adc_gain: f64,
    pub baseline: i32,
    pub units: String,
    pub description: String,
}

fn header_err(line: usize, reason: impl Into<String>) -> WfdbError {
    WfdbError::Header {
        line,
        reason: reason.into(),
    }
}

/// Parse the text of a single-segment WFDB header.
pub fn parse_header(text: &str) -> WfdbResult<RecordHeader> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

    let (line_no, record_line) = lines.next().ok_or_else(|| header_err(0, "empty header"))?;
    let mut fields = record_line.split_whitespace();

    let name_field = fields.next().ok_or_else(|| header_err(line_no, "missing record name"))?;
    if let Some((_, segments)) = name_field.split_once('/') {
        return Err(WfdbError::Unsupported(format!(
            "multi-segment record ({segments} segments)"
        )));
    }

    let n_signals: usize = fields
        .next()
        .ok_or_else(|| header_err(line_no, "missing signal count"))?
        .parse()
        .map_err(|_| header_err(line_no, "signal count is not an integer"))?;

    let fs = match fields.next() {
        Some(field) => parse_frequency(field).ok_or_else(|| {
            header_err(line_no, format!("invalid sampling frequency '{field}'"))
        })?,
        None => DEFAULT_FS,
    };

    let n_samples = fields
        .next()
        .map(|field| {
            field
                .parse::<usize>()
                .map_err(|_| header_err(line_no, format!("invalid sample count '{field}'")))
        })
        .transpose()?;

    // The declared count is untrusted until the signal lines are seen.
    let mut signals = Vec::new();
    for index in 0..n_signals {
        let (line_no, line) = lines.next().ok_or_else(|| {
            header_err(
                line_no,
                format!("header declares {n_signals} signals, found {index}"),
            )
        })?;
        signals.push(parse_signal_line(line_no, line, index)?);
    }

    Ok(RecordHeader {
        name: name_field.to_string(),
        fs,
        n_samples,
        signals,
    })
}

/// `FS[/COUNTER_FREQ[(BASE_COUNTER)]]` – only the leading frequency matters.
fn parse_frequency(field: &str) -> Option<f64> {
    let fs_text = field.split('/').next()?;
    let fs: f64 = fs_text.parse().ok()?;
    (fs.is_finite() && fs > 0.0).then_some(fs)
}

fn parse_signal_line(line_no: usize, line: &str, index: usize) -> WfdbResult<SignalSpec> {
    let mut fields = line.split_whitespace();

    let file_name = fields
        .next()
        .ok_or_else(|| header_err(line_no, "missing file name"))?
        .to_string();
    if file_name == "~" {
        return Err(WfdbError::Unsupported(format!(
            "signal {index} has no data file"
        )));
    }

    let format_field = fields
        .next()
        .ok_or_else(|| header_err(line_no, "missing storage format"))?;
    let (format, byte_offset) = parse_format_field(line_no, format_field)?;

    let (adc_gain, baseline, units) = match fields.next() {
        Some(field) => parse_gain_field(line_no, field)?,
        None => (DEFAULT_GAIN, None, None),
    };

    // ADC resolution is not needed to scale samples.
    let _adc_res = fields.next();
    let adc_zero = match fields.next() {
        Some(field) => field
            .parse::<i32>()
            .map_err(|_| header_err(line_no, format!("invalid ADC zero '{field}'")))?,
        None => 0,
    };

    // Initial value, checksum and block size precede the description.
    let description = fields.skip(3).collect::<Vec<_>>().join(" ");
    let description = if description.is_empty() {
        format!("ch{}", index + 1)
    } else {
        description
    };

    Ok(SignalSpec {
        file_name,
        format,
        byte_offset,
        adc_gain,
        baseline: baseline.unwrap_or(adc_zero),
        units: units.unwrap_or_else(|| "mV".to_string()),
        description,
    })
}

/// `FORMAT[xSAMPLES_PER_FRAME][:SKEW][+BYTE_OFFSET]`
fn parse_format_field(line_no: usize, field: &str) -> WfdbResult<(StorageFormat, usize)> {
    let digits_end = field
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(field.len());
    let code: u16 = field[..digits_end]
        .parse()
        .map_err(|_| header_err(line_no, format!("invalid storage format '{field}'")))?;
    let format = StorageFormat::from_code(code)
        .ok_or_else(|| WfdbError::Unsupported(format!("storage format {code}")))?;

    let mut rest = &field[digits_end..];
    let mut byte_offset = 0;

    if let Some(after) = rest.strip_prefix('x') {
        let end = after.find([':', '+']).unwrap_or(after.len());
        let spf: usize = after[..end]
            .parse()
            .map_err(|_| header_err(line_no, format!("invalid samples per frame in '{field}'")))?;
        if spf != 1 {
            return Err(WfdbError::Unsupported(format!(
                "{spf} samples per frame"
            )));
        }
        rest = &after[end..];
    }
    if let Some(after) = rest.strip_prefix(':') {
        // Skew is not applied; it only has to be well formed.
        let end = after.find('+').unwrap_or(after.len());
        after[..end]
            .parse::<i64>()
            .map_err(|_| header_err(line_no, format!("invalid skew in '{field}'")))?;
        rest = &after[end..];
    }
    if let Some(after) = rest.strip_prefix('+') {
        byte_offset = after
            .parse()
            .map_err(|_| header_err(line_no, format!("invalid byte offset in '{field}'")))?;
        rest = "";
    }
    if !rest.is_empty() {
        return Err(header_err(line_no, format!("invalid format field '{field}'")));
    }

    Ok((format, byte_offset))
}

/// `GAIN[(BASELINE)][/UNITS]`
fn parse_gain_field(
    line_no: usize,
    field: &str,
) -> WfdbResult<(f64, Option<i32>, Option<String>)> {
    let (gain_part, units) = match field.split_once('/') {
        Some((gain, units)) => (gain, Some(units.to_string())),
        None => (field, None),
    };
    let (gain_text, baseline) = match gain_part.split_once('(') {
        Some((gain, rest)) => {
            let inner = rest
                .strip_suffix(')')
                .ok_or_else(|| header_err(line_no, format!("unclosed baseline in '{field}'")))?;
            let baseline = inner
                .parse::<i32>()
                .map_err(|_| header_err(line_no, format!("invalid baseline in '{field}'")))?;
            (gain, Some(baseline))
        }
        None => (gain_part, None),
    };
    let gain: f64 = gain_text
        .parse()
        .map_err(|_| header_err(line_no, format!("invalid ADC gain '{field}'")))?;
    let gain = if gain == 0.0 { DEFAULT_GAIN } else { gain };
    Ok((gain, baseline, units))
}
