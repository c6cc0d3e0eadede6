mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::card_csv;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

#[test]
fn test_batch_fixture() {
    let mut cmd = Command::new(cargo_bin!("card-checkout"));
    cmd.args(["validate-batch", "tests/fixtures/cards.csv"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "number,scheme,number_valid,expiry_valid,cvv_valid",
        ))
        .stdout(predicate::str::contains("************4242,visa,true,true,true"))
        .stdout(predicate::str::contains("************4444,mastercard,true,true,true"))
        .stdout(predicate::str::contains("***********0005,amex,true,true,true"))
        .stdout(predicate::str::contains("************4243,visa,false,true,true"));
}

#[test]
fn test_batch_skips_malformed_rows() {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "number,expiry,cvv").unwrap();
    writeln!(csv, "4242424242424242,12/2099,123").unwrap();
    // Missing columns cannot be deserialized.
    writeln!(csv, "4242424242424242").unwrap();
    writeln!(csv, "5555555555554444,12/2099,321").unwrap();

    let mut cmd = Command::new(cargo_bin!("card-checkout"));
    cmd.arg("validate-batch").arg(csv.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading card record"))
        .stdout(predicate::str::contains("************4242,visa,true,true,true"))
        .stdout(predicate::str::contains("************4444,mastercard,true,true,true"));
}

#[test]
fn test_batch_flags_expired_and_bad_cvv() {
    let csv = card_csv(&[
        ["4242424242424242", "01/2001", "123"],
        ["378282246310005", "12/2099", "123"],
    ]);

    let mut cmd = Command::new(cargo_bin!("card-checkout"));
    cmd.arg("validate-batch").arg(csv.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("************4242,visa,true,false,true"))
        .stdout(predicate::str::contains("***********0005,amex,true,true,false"));
}

#[test]
fn test_batch_missing_file() {
    let mut cmd = Command::new(cargo_bin!("card-checkout"));
    cmd.args(["validate-batch", "tests/fixtures/does_not_exist.csv"]);

    cmd.assert().failure();
}
