//! Tests for `sealant enc/dec/view/edit`.

use crate::support::keystore::assert_mocks;
use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_view_decrypts_to_stdout() {
    let mut t = Test::new();
    let mocks = t.key_exists(DEPLOYMENT, PAYLOAD);
    t.write("secrets.yaml", SEALED);

    let output = t.view("secrets.yaml");
    assert_success(&output);
    assert_eq!(stdout(&output), PLAIN);
    assert_mocks(&mocks);

    // the file itself stays sealed
    assert_eq!(t.read("secrets.yaml"), SEALED);
}

#[test]
fn test_view_tolerates_trailing_newline() {
    let mut t = Test::new();
    let _mocks = t.key_exists(DEPLOYMENT, PAYLOAD);
    t.write("secrets.yaml", &format!("{}\n", SEALED));

    let output = t.view("secrets.yaml");
    assert_success(&output);
    assert_eq!(stdout(&output), PLAIN);
}

#[test]
fn test_view_plaintext_needs_no_credentials() {
    let t = Test::new();
    t.write("plain.yaml", "replicas: 3\n");

    t.bare_cmd()
        .args(["view", "plain.yaml"])
        .assert()
        .success()
        .stdout("replicas: 3\n");
}

#[test]
fn test_enc_seals_in_place() {
    let mut t = Test::new();
    let mocks = t.key_exists(DEPLOYMENT, PAYLOAD);
    t.write("secrets.yaml", PLAIN);

    let output = t.enc("secrets.yaml");
    assert_success(&output);
    assert_stdout_contains(&output, "encrypted secrets.yaml");
    assert_eq!(t.read("secrets.yaml"), SEALED);
    assert_mocks(&mocks);
}

#[test]
fn test_enc_creates_missing_key() {
    let mut t = Test::new();
    let mocks = t.key_missing(DEPLOYMENT);
    t.write("secrets.yaml", PLAIN);

    let output = t.enc("secrets.yaml");
    assert_success(&output);
    assert_mocks(&mocks);

    let sealed = t.read("secrets.yaml");
    assert_ne!(sealed, PLAIN);
    assert_ne!(sealed, SEALED);
    assert!(sealed.ends_with('='));
}

#[test]
fn test_enc_refuses_sealed_content() {
    let t = Test::new();
    t.write("secrets.yaml", SEALED);

    let output = t.enc("secrets.yaml");
    assert_failure(&output);
    assert_stderr_contains(&output, "already encrypted");
    assert_eq!(t.read("secrets.yaml"), SEALED);
}

#[test]
fn test_enc_refuses_empty_file() {
    let t = Test::new();
    t.write("secrets.yaml", "");

    let output = t.enc("secrets.yaml");
    assert_failure(&output);
    assert_stderr_contains(&output, "content is empty");
}

#[test]
fn test_enc_missing_file() {
    let t = Test::new();
    let output = t.enc("nope.yaml");
    assert_failure(&output);
}

#[test]
fn test_dec_restores_plaintext() {
    let mut t = Test::new();
    let _mocks = t.key_exists(DEPLOYMENT, PAYLOAD);
    t.write("secrets.yaml", SEALED);

    let output = t.dec("secrets.yaml");
    assert_success(&output);
    assert_eq!(t.read("secrets.yaml"), PLAIN);
}

#[test]
fn test_dec_refuses_plaintext() {
    let t = Test::new();
    t.write("secrets.yaml", PLAIN);

    let output = t.dec("secrets.yaml");
    assert_failure(&output);
    assert_stderr_contains(&output, "not touching unencrypted content");
    assert_eq!(t.read("secrets.yaml"), PLAIN);
}

#[test]
fn test_wrong_deployment_fails_authentication() {
    let mut t = Test::new();
    let _mocks = t.key_exists("other", OTHER_PAYLOAD);
    t.write("secrets.yaml", SEALED);

    t.cmd()
        .args(["--deployment", "other", "view", "secrets.yaml"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("authentication failed"))
        .stderr(predicate::str::contains("--deployment"));
}

#[test]
fn test_deployment_from_environment() {
    let mut t = Test::new();
    let _mocks = t.key_exists("staging", PAYLOAD);
    t.write("secrets.yaml", SEALED);

    t.cmd()
        .env("SEALANT_DEPLOYMENT", "staging")
        .args(["view", "secrets.yaml"])
        .assert()
        .success()
        .stdout(PLAIN);
}

#[test]
fn test_deployment_from_config_file() {
    let mut t = Test::new();
    let _mocks = t.key_exists("from-config", PAYLOAD);
    t.write(".sealant.toml", "[deployment]\nname = \"from-config\"\n");
    t.write("secrets.yaml", SEALED);

    let output = t.view("secrets.yaml");
    assert_success(&output);
    assert_eq!(stdout(&output), PLAIN);
}

#[test]
fn test_edit_reseals_unchanged_content() {
    let mut t = Test::new();
    let _mocks = t.key_exists(DEPLOYMENT, PAYLOAD);
    t.write("secrets.yaml", SEALED);

    let output = t.edit("secrets.yaml", "true");
    assert_success(&output);
    assert_eq!(t.read("secrets.yaml"), SEALED);
}

#[test]
fn test_edit_missing_file_starts_empty() {
    let mut t = Test::new();
    let _mocks = t.key_exists(DEPLOYMENT, PAYLOAD);

    let output = t.edit("new.yaml", "true");
    assert_success(&output);
    assert_eq!(t.read("new.yaml"), SEALED_EMPTY);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(t.dir.join("new.yaml"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_edit_failing_editor_leaves_file_alone() {
    let mut t = Test::new();
    let _mocks = t.key_exists(DEPLOYMENT, PAYLOAD);
    t.write("secrets.yaml", SEALED);

    let output = t.edit("secrets.yaml", "false");
    assert_failure(&output);
    assert_eq!(t.read("secrets.yaml"), SEALED);
}

#[test]
fn test_edit_unknown_editor() {
    let mut t = Test::new();
    let _mocks = t.key_exists(DEPLOYMENT, PAYLOAD);
    t.write("secrets.yaml", SEALED);

    let output = t.edit("secrets.yaml", "sealant-test-no-such-editor --wait");
    assert_failure(&output);
    assert_stderr_contains(&output, "sealant-test-no-such-editor not found");
}
