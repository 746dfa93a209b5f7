#![allow(dead_code)]

use rand::Rng;
use rand::seq::SliceRandom;
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::{Path, PathBuf};

pub const RATES_FIXTURE: &str = "tests/fixtures/rates.json";
pub const REQUESTS_FIXTURE: &str = "tests/fixtures/requests.jsonl";

pub const FLYER: &str = r#"{"calcType":"flyer","selectedSize":"A4","gsm":130,"paperRate":100,"totalSheets":1000}"#;
pub const FLYER_ROW: &str = "flyer,1000,1000,4037267.08,4037267.08,,,0.00,0.00,0.00,0.00,,,4037267.08,726708.07,4763975.15";

const SIZES: [&str; 6] = ["A3", "A4", "A5", "11x17", "5.5x8.5", "14x9.75"];
const LAMINATIONS: [&str; 5] = ["Gloss BOPP", "Matt BOPP", "Gloss Thermal", "Matt Thermal", "Velvet"];
const BINDINGS: [&str; 6] = ["none", "staple", "spiral", "wiro", "perfect", "hardcover"];
const FOLDS: [&str; 6] = ["None", "Half Fold", "Tri Fold", "Z Fold", "Gate Fold", "Accordion Fold"];
const SIDES: [&str; 2] = ["single", "double"];
const COATINGS: [&str; 3] = ["None", "Single Side", "Both Sides"];
const SCOPES: [&str; 3] = ["None", "Cover Only", "All Pages"];

/// Copies the rate fixture into `dir` so a test may overwrite it.
pub fn rates_file(dir: &Path) -> PathBuf {
    let path = dir.join("rates.json");
    std::fs::copy(RATES_FIXTURE, &path).expect("Failed to copy rates fixture");
    path
}

pub fn requests_file(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("requests.jsonl");
    std::fs::write(&path, lines.join("\n")).expect("Failed to write requests");
    path
}

/// One random, valid request of any product type.
pub fn random_request<R: Rng>(rng: &mut R) -> serde_json::Value {
    let size = *SIZES.choose(rng).unwrap_or(&"A4");
    let lamination = *LAMINATIONS.choose(rng).unwrap_or(&"Velvet");
    match rng.gen_range(0..3) {
        0 => serde_json::json!({
            "calcType": "flyer",
            "selectedSize": size,
            "gsm": rng.gen_range(70..=400),
            "paperRate": rng.gen_range(1..=200),
            "totalSheets": rng.gen_range(1..=20_000),
            "isDoubleSided": rng.gen_bool(0.5),
            "isLamination": rng.gen_bool(0.5),
            "laminationType": lamination,
            "laminationSide": *SIDES.choose(rng).unwrap_or(&"single"),
            "spotUV": rng.gen_bool(0.3),
            "spotUVSide": *SIDES.choose(rng).unwrap_or(&"single"),
            "coatingOption": *COATINGS.choose(rng).unwrap_or(&"None"),
        }),
        1 => serde_json::json!({
            "calcType": "book",
            "selectedSize": size,
            "paperRate": rng.gen_range(1..=50),
            "quantity": rng.gen_range(1..=5_000),
            "totalPages": rng.gen_range(4..=400),
            "coverGSM": rng.gen_range(200..=400),
            "insideGSM": rng.gen_range(60..=170),
            "coverLaminationType": if rng.gen_bool(0.5) { lamination } else { "None" },
            "laminationScope": if rng.gen_bool(0.5) { "Cover Only" } else { "All Pages" },
            "spotUVOption": *SCOPES.choose(rng).unwrap_or(&"None"),
            "coatingOption": *SCOPES.choose(rng).unwrap_or(&"None"),
            "dripOffOption": *SCOPES.choose(rng).unwrap_or(&"None"),
            "bindingType": *BINDINGS.choose(rng).unwrap_or(&"none"),
            "inkOption": if rng.gen_bool(0.5) {
                "Cover 4C / Inside 4C"
            } else {
                "Cover 4C / Inside 1C"
            },
        }),
        _ => serde_json::json!({
            "calcType": "brochure",
            "selectedSize": size,
            "gsm": rng.gen_range(90..=300),
            "paperRate": rng.gen_range(1..=100),
            "quantity": rng.gen_range(1..=50_000),
            "foldType": *FOLDS.choose(rng).unwrap_or(&"None"),
            "isDoubleSided": rng.gen_bool(0.5),
            "laminationType": if rng.gen_bool(0.5) { lamination } else { "None" },
            "laminationSide": *SIDES.choose(rng).unwrap_or(&"single"),
            "spotUV": rng.gen_bool(0.3),
            "coatingOption": *COATINGS.choose(rng).unwrap_or(&"None"),
        }),
    }
}

/// Writes `rows` random valid requests as JSON Lines.
pub fn generate_requests(path: &Path, rows: usize) -> Result<(), Error> {
    let mut rng = rand::thread_rng();
    let mut out = BufWriter::new(File::create(path)?);
    for _ in 0..rows {
        serde_json::to_writer(&mut out, &random_request(&mut rng))?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
