//! Binary-level CLI checks.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_describes_the_pipeline() {
    Command::cargo_bin("fathom-release")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--jar"))
        .stdout(predicate::str::contains("installer"));
}

#[test]
fn missing_jar_is_rejected() {
    Command::cargo_bin("fathom-release")
        .unwrap()
        .args(["--jar", "/no/such/Fathom.jar", "--assume-yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Distributable jar not found"));
}
