use anyhow::{Context, Result};

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

    /// Uniform integer in `0..n`.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn bernoulli(&mut self, p: f64) -> u8 {
        u8::from(self.next_f64() < p)
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const HEADER: [&str; 15] = [
    "StudentID",
    "Age",
    "Gender",
    "Ethnicity",
    "ParentalEducation",
    "StudyTimeWeekly",
    "Absences",
    "Tutoring",
    "ParentalSupport",
    "Extracurricular",
    "Sports",
    "Music",
    "Volunteering",
    "GPA",
    "GraduationStatus",
];

/// Writes a synthetic `data_cleaned.csv` with the columns the dashboard expects.
///
/// Usage: `generate_sample [output.csv] [rows]`
fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| "data_cleaned.csv".to_string());
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("row count '{n}' is not a number"))?,
        None => 2392,
    };

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(HEADER)?;

    let mut graduated = 0usize;
    for i in 0..rows {
        let study = (rng.next_f64() * 20.0 * 10.0).round() / 10.0;
        let absences = rng.below(30) as f64;
        let tutoring = rng.bernoulli(0.3);
        let support = rng.below(5);
        let extracurricular = rng.bernoulli(0.38);

        // GPA falls with absences, rises with study time and support.
        let gpa = (3.3 - 0.1 * absences + 0.03 * study + 0.15 * support as f64
            + 0.25 * tutoring as f64
            + 0.1 * extracurricular as f64
            + rng.gauss(0.0, 0.3))
        .clamp(0.0, 4.0);
        let status = u8::from(gpa + rng.gauss(0.0, 0.25) >= 2.5);
        graduated += status as usize;

        writer.write_record([
            (1001 + i).to_string(),
            (15 + rng.below(4)).to_string(),
            rng.bernoulli(0.5).to_string(),
            rng.below(4).to_string(),
            rng.below(5).to_string(),
            format!("{study:.1}"),
            format!("{absences:.0}"),
            tutoring.to_string(),
            support.to_string(),
            extracurricular.to_string(),
            rng.bernoulli(0.3).to_string(),
            rng.bernoulli(0.2).to_string(),
            rng.bernoulli(0.16).to_string(),
            format!("{gpa:.4}"),
            status.to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {rows} students ({graduated} graduated) to {output_path}");
    Ok(())
}
