use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_rates_show() {
    let output = Command::new(cargo_bin!("printquote"))
        .arg("rates")
        .arg("show")
        .arg("--rates")
        .arg(common::RATES_FIXTURE)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["spotUVRateVal"], "0.75");
    assert_eq!(config["laminationRates"]["Velvet"], "3.5");
    assert_eq!(config["bindingRates"]["hardcover"], "65");
}

#[test]
fn test_rates_set_keeps_full_precision() {
    let dir = tempdir().unwrap();
    let rates = common::rates_file(dir.path());

    let replacement = dir.path().join("precise_rates.json");
    std::fs::write(
        &replacement,
        std::fs::read_to_string(common::RATES_FIXTURE)
            .unwrap()
            .replace("\"coatingRate\": 0.35", "\"coatingRate\": \"0.3512345678901234567\""),
    )
    .unwrap();

    Command::new(cargo_bin!("printquote"))
        .arg("rates")
        .arg("set")
        .arg("--rates")
        .arg(&rates)
        .arg(&replacement)
        .assert()
        .success();

    let output = Command::new(cargo_bin!("printquote"))
        .arg("rates")
        .arg("show")
        .arg("--rates")
        .arg(&rates)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["coatingRate"], "0.3512345678901234567");
}

#[test]
fn test_rates_set_replaces_document() {
    let dir = tempdir().unwrap();
    let rates = common::rates_file(dir.path());

    let replacement = dir.path().join("new_rates.json");
    std::fs::write(
        &replacement,
        std::fs::read_to_string(common::RATES_FIXTURE)
            .unwrap()
            .replace("\"coatingMinimum\": 400", "\"coatingMinimum\": 5000"),
    )
    .unwrap();

    Command::new(cargo_bin!("printquote"))
        .arg("rates")
        .arg("set")
        .arg("--rates")
        .arg(&rates)
        .arg(&replacement)
        .assert()
        .success();

    let requests = common::requests_file(
        dir.path(),
        &[
            r#"{"calcType":"flyer","selectedSize":"A4","gsm":130,"paperRate":100,"totalSheets":1000,"coatingOption":"Single Side"}"#,
        ],
    );
    Command::new(cargo_bin!("printquote"))
        .arg("quote")
        .arg(&requests)
        .arg("--rates")
        .arg(&rates)
        .arg("--user")
        .arg("1")
        .arg("--plan")
        .arg("basic-monthly")
        .assert()
        .success()
        .stdout(predicate::str::contains(",0.00,0.00,5000.00,0.00,"));
}

#[test]
fn test_rates_set_rejects_invalid_document() {
    let dir = tempdir().unwrap();
    let rates = common::rates_file(dir.path());
    let before = std::fs::read_to_string(&rates).unwrap();

    let replacement = dir.path().join("bad_rates.json");
    std::fs::write(
        &replacement,
        before.replace("\"Velvet\": 3.5", "\"Velvet\": -3.5"),
    )
    .unwrap();

    Command::new(cargo_bin!("printquote"))
        .arg("rates")
        .arg("set")
        .arg("--rates")
        .arg(&rates)
        .arg(&replacement)
        .assert()
        .failure()
        .stderr(predicate::str::contains("laminationRates.Velvet"));

    assert_eq!(std::fs::read_to_string(&rates).unwrap(), before);
}
