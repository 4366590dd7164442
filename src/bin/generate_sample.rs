//! Writes `sample_annotations.csv`, a small dataset for trying the viewer:
//! remote, local and `gs://` image references with sparse annotation columns.

use anyhow::{Context, Result};

const SPECIES: &[&str] = &["cat", "dog", "fox", "owl", "heron"];
const POSES: &[&str] = &["sitting", "standing", "flying", "lying"];
const LIGHTING: &[&str] = &["day", "dusk", "night"];

/// Minimal deterministic PRNG (splitmix64).
struct SplitMix(u64);

impl SplitMix {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        (self.next_u64() >> 11) as f64 / ((1u64 << 53) as f64) < p
    }
}

fn main() -> Result<()> {
    let mut rng = SplitMix(42);
    let output_path = "sample_annotations.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating sample CSV")?;

    writer.write_record(["image_path", "species", "pose", "lighting", "reviewer"])?;

    let n_rows = 48;
    for i in 0..n_rows {
        let image = match i % 6 {
            0 => format!("gs://example-annotations/raw/{i:04}.jpg"),
            1 => format!("images/{i:04}.jpg"),
            5 => String::new(),
            _ => format!("https://picsum.photos/id/{}/320/240", 10 + i),
        };
        let species = rng.pick(SPECIES);
        let pose = if rng.chance(0.7) { rng.pick(POSES) } else { "" };
        let lighting = if rng.chance(0.5) { rng.pick(LIGHTING) } else { "NaN" };
        let reviewer = if i % 4 == 0 { " alice " } else { "" };

        writer.write_record([image.as_str(), species, pose, lighting, reviewer])?;
    }
    writer.flush().context("writing sample CSV")?;

    println!("Wrote {n_rows} rows to {output_path}");
    Ok(())
}
