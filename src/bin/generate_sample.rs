use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

const LEADS: [&str; 12] = [
    "I", "II", "III", "aVR", "aVL", "aVF", "V1", "V2", "V3", "V4", "V5", "V6",
];
const FS: f64 = 100.0;
const N_SAMPLES: usize = 1000;
/// Digital steps per mV in the written records.
const GAIN: f64 = 1000.0;

/// Write a small synthetic 12-lead dataset for trying the viewer
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Output directory; receives `metadata.csv` and `files/`
    #[arg(default_value = "sample_data")]
    out_dir: PathBuf,

    /// Number of patients to generate
    #[arg(long, default_value_t = 5)]
    patients: usize,
}

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// One heartbeat-shaped waveform (P, QRS, T) repeated every `rr` seconds.
fn synth_lead(lead: usize, rr: f64, noise_level: f64, rng: &mut SimpleRng) -> Vec<f64> {
    // Amplitude grows with lead index so the panels are told apart.
    let scale = 0.4 + 0.12 * lead as f64;
    let polarity = if LEADS[lead] == "aVR" { -1.0 } else { 1.0 };
    (0..N_SAMPLES)
        .map(|i| {
            let t = (i as f64 / FS) % rr;
            let beat = gaussian(t, 0.20, 0.025, 0.15)
                + gaussian(t, 0.36, 0.008, -0.12)
                + gaussian(t, 0.40, 0.010, 1.2)
                + gaussian(t, 0.44, 0.008, -0.25)
                + gaussian(t, 0.65, 0.045, 0.3);
            polarity * scale * beat + rng.gauss(0.0, noise_level)
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Write `<dir>/<id>.hea` and `<dir>/<id>.dat` (format 16, interleaved).
fn write_record(dir: &Path, id: &str, leads: &[Vec<f64>]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut header = format!("{id} {} {FS} {N_SAMPLES}\n", leads.len());
    for name in LEADS {
        header.push_str(&format!("{id}.dat 16 {GAIN}/mV 16 0 0 0 0 {name}\n"));
    }
    fs::write(dir.join(format!("{id}.hea")), header).context("writing header")?;

    let mut data = Vec::with_capacity(N_SAMPLES * leads.len() * 2);
    for i in 0..N_SAMPLES {
        for lead in leads {
            let digital = (lead[i] * GAIN).round().clamp(-32767.0, 32767.0) as i16;
            data.extend(digital.to_le_bytes());
        }
    }
    fs::write(dir.join(format!("{id}.dat")), data).context("writing signal file")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(42);

    let files = args.out_dir.join("files");
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let mut writer = csv::Writer::from_path(args.out_dir.join("metadata.csv"))
        .context("creating metadata.csv")?;
    writer.write_record(["patient_id", "age", "sex", "heart_rate", "brugada"])?;

    for p in 0..args.patients {
        let id = (1001 + p).to_string();
        let heart_rate = 55.0 + (rng.next_f64() * 45.0).round();
        let rr = 60.0 / heart_rate;
        let leads: Vec<Vec<f64>> = (0..LEADS.len())
            .map(|lead| synth_lead(lead, rr, 0.02, &mut rng))
            .collect();
        write_record(&files.join(&id), &id, &leads)?;

        let age = 25 + (rng.next_f64() * 50.0) as u32;
        let sex = if rng.next_f64() < 0.5 { "M" } else { "F" };
        let brugada = u8::from(rng.next_f64() < 0.3);
        writer.write_record([
            id,
            age.to_string(),
            sex.to_string(),
            heart_rate.to_string(),
            brugada.to_string(),
        ])?;
    }
    writer.flush()?;

    println!(
        "Wrote {} patients ({} leads, {N_SAMPLES} samples at {FS} Hz) to {}",
        args.patients,
        LEADS.len(),
        args.out_dir.display()
    );
    Ok(())
}
