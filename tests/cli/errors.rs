//! Tests for error reporting, configuration and logging.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_missing_credentials_hint() {
    let t = Test::new();
    t.write("secrets.yaml", SEALED);

    t.bare_cmd()
        .args(["view", "secrets.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing credential: OS_AUTH_URL"))
        .stderr(predicate::str::contains("OS_TOKEN with OS_KEY_MANAGER_URL"));
}

#[test]
fn test_token_without_endpoint() {
    let t = Test::new();
    t.write("secrets.yaml", SEALED);

    t.bare_cmd()
        .env("OS_TOKEN", TOKEN)
        .args(["view", "secrets.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OS_KEY_MANAGER_URL"));
}

#[test]
fn test_rejected_token() {
    let mut t = Test::new();
    let _mock = t.keystore_fails(401);
    t.write("secrets.yaml", SEALED);

    let output = t.view("secrets.yaml");
    assert_failure(&output);
    assert_stderr_contains(&output, "key store unavailable");
    assert_stderr_contains(&output, "check your OpenStack credentials");
}

#[test]
fn test_duplicate_records_with_strict_lookup() {
    let mut t = Test::new();
    let _mock = t.key_duplicated(DEPLOYMENT);
    t.write(".sealant.toml", "[keystore]\nlookup = \"strict\"\n");
    t.write("secrets.yaml", SEALED);

    let output = t.view("secrets.yaml");
    assert_failure(&output);
    assert_stderr_contains(&output, "2 records share this name");
}

#[test]
fn test_malformed_key_record() {
    let mut t = Test::new();
    let _mocks = t.key_exists(DEPLOYMENT, "only-one-field");
    t.write("secrets.yaml", SEALED);

    let output = t.view("secrets.yaml");
    assert_failure(&output);
    assert_stderr_contains(&output, "malformed key record for 'demo'");
}

#[test]
fn test_malformed_config() {
    let t = Test::new();
    t.write(".sealant.toml", "[keystore\n");
    t.write("plain.yaml", PLAIN);

    let output = t.view("plain.yaml");
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config");
}

#[test]
fn test_keystore_endpoint_from_config() {
    let mut t = Test::new();
    let _mocks = t.key_exists(DEPLOYMENT, PAYLOAD);
    t.write(
        ".sealant.toml",
        &format!("[keystore]\nendpoint = \"{}\"\n", t.server.url()),
    );
    t.write("secrets.yaml", SEALED);

    t.bare_cmd()
        .env("OS_TOKEN", TOKEN)
        .args(["view", "secrets.yaml"])
        .assert()
        .success()
        .stdout(PLAIN);
}

#[test]
fn test_debug_logs_to_stderr() {
    let mut t = Test::new();
    let _mocks = t.key_exists(DEPLOYMENT, PAYLOAD);
    t.write("secrets.yaml", SEALED);

    t.cmd()
        .args(["--debug", "view", "secrets.yaml"])
        .assert()
        .success()
        .stdout(PLAIN)
        .stderr(predicate::str::contains("resolved deployment"))
        .stderr(predicate::str::contains("listing secrets"))
        .stderr(predicate::str::contains(TOKEN).not());
}

#[test]
fn test_log_filter_from_environment() {
    let mut t = Test::new();
    let _mocks = t.key_exists(DEPLOYMENT, PAYLOAD);
    t.write("secrets.yaml", SEALED);

    t.cmd()
        .env("SEALANT_LOG", "sealant=trace")
        .args(["view", "secrets.yaml"])
        .assert()
        .success()
        .stderr(predicate::str::contains("key store response"));
}

#[test]
fn test_completions() {
    let t = Test::new();
    t.bare_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sealant"));
}

#[test]
fn test_help_lists_commands() {
    let t = Test::new();
    t.bare_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("edit"));
}
