use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

mod common;

fn quote_cmd(requests: &std::path::Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("printquote"));
    cmd.arg("quote")
        .arg(requests)
        .arg("--rates")
        .arg(common::RATES_FIXTURE)
        .arg("--user")
        .arg("3")
        .arg("--plan")
        .arg("basic-monthly");
    cmd
}

#[test]
fn test_malformed_lines_are_skipped() {
    let dir = tempdir().unwrap();
    let requests = common::requests_file(
        dir.path(),
        &["{ this is not json", "[1, 2, 3]", "", common::FLYER],
    );

    quote_cmd(&requests)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("4,3,{},99", common::FLYER_ROW)).not())
        .stdout(predicate::str::contains(format!("3,3,{},99", common::FLYER_ROW)))
        .stderr(predicate::str::contains("Error reading request"))
        .stderr(predicate::str::contains("must be a JSON object"));
}

#[test]
fn test_invalid_fields_are_named() {
    let dir = tempdir().unwrap();
    let requests = common::requests_file(
        dir.path(),
        &[
            r#"{"calcType":"flyer","selectedSize":"A4","gsm":130,"paperRate":-5,"totalSheets":1000}"#,
            r#"{"calcType":"flyer","selectedSize":"A4","gsm":130,"paperRate":100,"totalSheets":12.5}"#,
            r#"{"calcType":"flyer","selectedSize":"B9","gsm":130,"paperRate":100,"totalSheets":10}"#,
            r#"{"calcType":"poster","selectedSize":"A4"}"#,
            common::FLYER,
        ],
    );

    quote_cmd(&requests)
        .assert()
        .success()
        .stderr(predicate::str::contains("`paperRate`: must not be negative"))
        .stderr(predicate::str::contains("`totalSheets`: must be a whole number"))
        .stderr(predicate::str::contains("`selectedSize`"))
        .stderr(predicate::str::contains("Unsupported calculation type `poster`"))
        .stdout(predicate::str::contains(format!("5,3,{},99", common::FLYER_ROW)));
}

#[test]
fn test_missing_rate_does_not_charge() {
    let dir = tempdir().unwrap();
    let requests = common::requests_file(
        dir.path(),
        &[
            r#"{"calcType":"flyer","selectedSize":"A4","gsm":130,"paperRate":100,"totalSheets":1000,"isLamination":true,"laminationType":"Holographic"}"#,
            r#"{"calcType":"book","selectedSize":"A4","paperRate":3.22,"quantity":100,"totalPages":64,"coverGSM":300,"insideGSM":80,"bindingType":"wiro"}"#,
            common::FLYER,
        ],
    );

    let mut rates: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(common::RATES_FIXTURE).unwrap()).unwrap();
    rates["bindingRates"].as_object_mut().unwrap().remove("wiro");
    let rates_path = dir.path().join("rates.json");
    std::fs::write(&rates_path, rates.to_string()).unwrap();

    let mut cmd = Command::new(cargo_bin!("printquote"));
    cmd.arg("quote")
        .arg(&requests)
        .arg("--rates")
        .arg(&rates_path)
        .arg("--user")
        .arg("3")
        .arg("--plan")
        .arg("basic-monthly");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "Missing rate configuration for `laminationRates.Holographic`",
        ))
        .stderr(predicate::str::contains(
            "Missing rate configuration for `bindingRates.wiro`",
        ))
        // Only the last request is charged
        .stdout(predicate::str::contains(format!("3,3,{},99", common::FLYER_ROW)));
}

#[test]
fn test_invalid_rates_file_fails() {
    let dir = tempdir().unwrap();
    let requests = common::requests_file(dir.path(), &[common::FLYER]);
    let rates_path = dir.path().join("rates.json");
    std::fs::write(
        &rates_path,
        std::fs::read_to_string(common::RATES_FIXTURE)
            .unwrap()
            .replace("\"coatingMinimum\": 400", "\"coatingMinimum\": -400"),
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("printquote"));
    cmd.arg("quote")
        .arg(&requests)
        .arg("--rates")
        .arg(&rates_path)
        .arg("--user")
        .arg("3");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("coatingMinimum"));
}

#[test]
fn test_missing_input_file_fails() {
    let dir = tempdir().unwrap();
    quote_cmd(&dir.path().join("absent.jsonl")).assert().failure();
}
