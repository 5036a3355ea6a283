use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_describes_the_tool() {
    Command::cargo_bin("fix-test-workflow")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("OWNER/REPO"))
        .stdout(predicate::str::contains("--token"));
}

#[test]
fn missing_repositories_is_a_usage_error() {
    Command::cargo_bin("fix-test-workflow")
        .unwrap()
        .env_remove("GITHUB_TOKEN")
        .args(["--token", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OWNER/REPO"));
}

#[test]
fn missing_token_is_a_usage_error() {
    Command::cargo_bin("fix-test-workflow")
        .unwrap()
        .env_remove("GITHUB_TOKEN")
        .arg("octocat/hello-world")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--token"));
}
