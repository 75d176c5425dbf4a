//! Test fixtures and constants.

/// Deployment the project directory is named after.
pub const DEPLOYMENT: &str = "demo";

/// Token the mock key store expects.
pub const TOKEN: &str = "test-token";

/// Key record payload for the fixed test key.
pub const PAYLOAD: &str = "s928HkkJKVCGO1q1aIFq1iWG3ZDh6LB7utsZ1mRqjKg=\ncWcmxHPcuG0O0hY3";

/// A different key, for wrong-deployment tests.
pub const OTHER_PAYLOAD: &str = "uJ3x0yq5b6Q2m3o8sTz1m1vXgKkI2rHc8Sx0Jc2bXyE=\nAAECAwQFBgcICQoL";

/// Plaintext secrets document.
pub const PLAIN: &str = "group:\n  value: 1\n";

/// `PLAIN` sealed with the `PAYLOAD` key.
pub const SEALED: &str = "fJAK03a86yOpiN27zz40M1Qj3QqtDY7K5Cf7YkoqwiuQhw==";

/// Empty plaintext sealed with the `PAYLOAD` key.
pub const SEALED_EMPTY: &str = "iWApSrq1FrIQEE9X0JhSyg==";

/// Fake tool: prints each argument, and the content of arguments that
/// name files.
pub const FAKE_TOOL: &str = r#"for a in "$@"; do
  if [ -f "$a" ]; then printf 'file:%s\n' "$a"; cat "$a"; else printf '%s\n' "$a"; fi
done
"#;

/// Fake tool that fails with status 4.
pub const FAILING_TOOL: &str = r#"for a in "$@"; do
  if [ -f "$a" ]; then printf 'file:%s\n' "$a"; fi
done
echo "lint failed" >&2
exit 4
"#;
