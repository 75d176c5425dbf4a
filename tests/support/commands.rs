//! Command helper methods for Test.

use super::{Test, TOKEN};
use assert_cmd::Command;
use std::process::Output;

/// Variables that would otherwise leak the developer's cloud into tests.
const SCRUBBED_ENV: &[&str] = &[
    "OS_AUTH_URL",
    "OS_USERNAME",
    "OS_PASSWORD",
    "OS_PROJECT_NAME",
    "OS_PROJECT_ID",
    "OS_USER_DOMAIN_NAME",
    "OS_PROJECT_DOMAIN_NAME",
    "OS_REGION_NAME",
    "OS_TOKEN",
    "OS_KEY_MANAGER_URL",
    "SEALANT_DEPLOYMENT",
    "SEALANT_LOG",
    "EDITOR",
];

impl Test {
    /// Create a sealant command pointed at the mock key store.
    ///
    /// Returns a Command configured with:
    /// - `OS_TOKEN` and `OS_KEY_MANAGER_URL` for the mock server
    /// - `NO_COLOR` set
    /// - Current directory set to the test project directory
    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.env("OS_TOKEN", TOKEN);
        cmd.env("OS_KEY_MANAGER_URL", self.server.url());
        cmd
    }

    /// Create a sealant command with no key store credentials at all.
    pub fn bare_cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("sealant").expect("failed to find sealant binary");
        for var in SCRUBBED_ENV {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(&self.dir);
        cmd
    }

    /// Shortcut for `sealant <command> <file>`.
    pub fn file_cmd(&self, command: &str, file: &str) -> Output {
        self.cmd()
            .args([command, file])
            .output()
            .expect("failed to run sealant")
    }

    /// Shortcut for `sealant view`.
    pub fn view(&self, file: &str) -> Output {
        self.file_cmd("view", file)
    }

    /// Shortcut for `sealant enc`.
    pub fn enc(&self, file: &str) -> Output {
        self.file_cmd("enc", file)
    }

    /// Shortcut for `sealant dec`.
    pub fn dec(&self, file: &str) -> Output {
        self.file_cmd("dec", file)
    }

    /// Shortcut for `sealant edit` with `editor` as `$EDITOR`.
    pub fn edit(&self, file: &str, editor: &str) -> Output {
        self.cmd()
            .env("EDITOR", editor)
            .args(["edit", file])
            .output()
            .expect("failed to run sealant edit")
    }

    /// Shortcut for a wrapped verb, e.g. `sealant install -f secrets.yaml`.
    pub fn wrap(&self, verb: &str, args: &[&str]) -> Output {
        self.cmd()
            .arg(verb)
            .args(args)
            .output()
            .expect("failed to run sealant")
    }
}
