use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_malformed_csv_handling() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("robustness_test.csv");
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(&output_path)
        .unwrap();
    wtr.write_record(["type", "id", "name", "price", "payers"])
        .unwrap();

    wtr.write_record(["person", "a", "Ana", "", ""]).unwrap();
    // Invalid type
    wtr.write_record(["refund", "x", "X", "1.0", ""]).unwrap();
    // Negative price
    wtr.write_record(["product", "p1", "Soup", "-4", "a"]).unwrap();
    // Missing price
    wtr.write_record(["product", "p2", "Bread", "", "a"]).unwrap();
    // Text in price
    wtr.write_record(["product", "p3", "Tea", "cheap", "a"]).unwrap();
    // Duplicate person id
    wtr.write_record(["person", "a", "Another Ana", "", ""]).unwrap();
    // Valid product
    wtr.write_record(["product", "p4", "Pie", "3.0", "a"]).unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("tabsplit"));
    cmd.arg(&output_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading invoice row"))
        .stdout(predicate::str::contains("a,Ana,3.00,0.00,3.00"))
        .stdout(predicate::str::contains("subtotal,3.00"))
        .stdout(predicate::str::contains("Another Ana").not());
}

#[test]
fn test_unknown_payer_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("ghost_test.csv");
    let mut wtr = csv::Writer::from_path(&output_path).unwrap();
    wtr.write_record(["type", "id", "name", "price", "payers"])
        .unwrap();
    wtr.write_record(["person", "a", "Ana", "", ""]).unwrap();
    wtr.write_record(["product", "p1", "Pizza", "10", "a;ghost"])
        .unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("tabsplit"));
    cmd.arg(&output_path);

    // The stale id still takes its half of the item.
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("payer ghost of product p1 is not on the roster"))
        .stdout(predicate::str::contains("a,Ana,5.00,0.00,5.00"))
        .stdout(predicate::str::contains("unallocated,5.00"));
}
