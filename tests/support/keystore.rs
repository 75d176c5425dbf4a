//! Mock Barbican endpoints.

use super::{Test, TOKEN};
use mockito::{Matcher, Mock};

impl Test {
    /// Serve a single key record named `name` with `payload`.
    ///
    /// Keep the returned mocks alive for the duration of the test.
    pub fn key_exists(&mut self, name: &str, payload: &str) -> Vec<Mock> {
        let id = format!("{}-id", name);
        let list = self.list_mock(name, &[&id]).expect(1).create();
        let payload = self
            .server
            .mock("GET", format!("/v1/secrets/{}/payload", id).as_str())
            .match_header("x-auth-token", TOKEN)
            .match_header("accept", "text/plain")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body(payload)
            .expect(1)
            .create();
        vec![list, payload]
    }

    /// Serve two records named `name`.
    pub fn key_duplicated(&mut self, name: &str) -> Mock {
        self.list_mock(name, &["first", "second"]).create()
    }

    /// Serve no record named `name` and accept one creation.
    pub fn key_missing(&mut self, name: &str) -> Vec<Mock> {
        let list = self.list_mock(name, &[]).expect(1).create();
        let secret_ref = format!("{}/v1/secrets/{}-new", self.server.url(), name);
        let create = self
            .server
            .mock("POST", "/v1/secrets")
            .match_header("x-auth-token", TOKEN)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "name": name,
                "algorithm": "aes",
                "bit_length": 256,
                "mode": "gcm",
                "payload_content_type": "text/plain",
                "secret_type": "opaque",
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(serde_json::json!({ "secret_ref": secret_ref }).to_string())
            .expect(1)
            .create();
        vec![list, create]
    }

    /// Fail every listing with `status`.
    pub fn keystore_fails(&mut self, status: usize) -> Mock {
        self.server
            .mock("GET", "/v1/secrets")
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body("unavailable")
            .create()
    }

    fn list_mock(&mut self, name: &str, ids: &[&str]) -> Mock {
        let url = self.server.url();
        let secrets: Vec<_> = ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "name": name,
                    "secret_ref": format!("{}/v1/secrets/{}", url, id),
                    "secret_type": "opaque",
                    "status": "ACTIVE",
                })
            })
            .collect();
        let body = serde_json::json!({ "secrets": secrets, "total": ids.len() });

        self.server
            .mock("GET", "/v1/secrets")
            .match_query(Matcher::UrlEncoded("name".into(), name.into()))
            .match_header("x-auth-token", TOKEN)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
    }
}

/// Assert every mock in `mocks` was hit as expected.
pub fn assert_mocks(mocks: &[Mock]) {
    for mock in mocks {
        mock.assert();
    }
}
