use anyhow::{Context, Result};

use patient_lens::data::model::PATIENT_ID;
use patient_lens::encode::distribution::COMPOSITE_COLUMNS;
use patient_lens::encode::fields::{importance_field, GIS_FIELDS, HOSPITALIZED, PMS_FIELDS};

/// Fields written without an importance column.
const UNSCORED: [&str; 2] = ["assigned_sex", "tree_count"];

const PATIENTS: usize = 250;

/// Deterministic splitmix64 stream; enough for reproducible fixtures.
struct SampleRng(u64);

impl SampleRng {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }

    /// Approximately normal: sum of twelve uniforms (Irwin-Hall).
    fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        let z: f64 = (0..12).map(|_| self.unit()).sum::<f64>() - 6.0;
        mean + sd * z
    }
}

fn header() -> Vec<String> {
    let mut cols = vec![PATIENT_ID.to_string()];
    cols.extend(COMPOSITE_COLUMNS.iter().map(|c| c.to_string()));
    cols.push(HOSPITALIZED.to_string());
    for field in PMS_FIELDS.iter().chain(GIS_FIELDS.iter()) {
        cols.push(field.to_string());
        if !UNSCORED.contains(field) {
            cols.push(importance_field(field));
        }
    }
    cols
}

fn field_value(field: &str, rng: &mut SampleRng) -> String {
    match field {
        "assigned_sex" => ["F", "M"][rng.below(2) as usize].to_string(),
        "age_group_new" => rng.below(8).to_string(),
        "tree_count" => rng.below(400).to_string(),
        f if f.ends_with("_dist") => format!("{:.1}", rng.unit() * 5000.0),
        f if f.ends_with("_mean") => format!("{:.3}", rng.normal(0.0, 1.0)),
        // Encoded PMS measurements are small ordinal codes.
        _ => rng.below(5).to_string(),
    }
}

fn main() -> Result<()> {
    let mut rng = SampleRng(42);
    let output_path = "sample_patients.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record(header()).context("writing header")?;

    for i in 0..PATIENTS {
        let q_pms = rng.normal(0.5, 0.15);
        let q_gis = rng.normal(0.4, 0.2);
        let mut row = vec![
            format!("P{i:04}"),
            format!("{q_gis:.4}"),
            format!("{:.4}", 0.6 * q_pms + 0.4 * q_gis),
            format!("{q_pms:.4}"),
            u64::from(rng.unit() < 0.3).to_string(),
        ];
        for field in PMS_FIELDS.iter().chain(GIS_FIELDS.iter()) {
            row.push(field_value(field, &mut rng));
            if !UNSCORED.contains(field) {
                row.push(format!("{:.4}", rng.normal(0.0, 0.1)));
            }
        }
        writer.write_record(&row).context("writing row")?;
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {PATIENTS} patients to {output_path}");
    Ok(())
}
