//! OpenStack Barbican key store.
//!
//! Talks to the Barbican v1 REST API over HTTPS. A token is obtained from
//! Keystone v3 with password credentials (the usual `OS_*` variables), or a
//! pre-issued token is used together with an explicit endpoint.
//!
//! ## Usage
//!
//! ```bash
//! export OS_AUTH_URL=https://keystone.example.org/v3
//! export OS_USERNAME=deployer OS_PASSWORD=... OS_PROJECT_NAME=web
//! sealant view secrets.yaml
//! ```

use std::cell::OnceCell;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{KeyStore, NewSecret, SecretRecord};
use crate::error::{ConfigError, KeyStoreError, Result};

const TOKEN_HEADER: &str = "X-Auth-Token";
const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";
const KEY_MANAGER_SERVICE: &str = "key-manager";
const DEFAULT_DOMAIN: &str = "Default";

/// Project a password token is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectScope {
    Name { name: String, domain: String },
    Id(String),
}

/// How to authenticate against the key store.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Keystone v3 password authentication.
    Password {
        auth_url: String,
        username: String,
        password: String,
        user_domain: String,
        project: ProjectScope,
        region: Option<String>,
        endpoint: Option<String>,
    },
    /// Pre-issued token for a known endpoint.
    Token { token: String, endpoint: String },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Password {
                auth_url,
                username,
                region,
                ..
            } => f
                .debug_struct("Password")
                .field("auth_url", auth_url)
                .field("username", username)
                .field("region", region)
                .finish_non_exhaustive(),
            Self::Token { endpoint, .. } => f
                .debug_struct("Token")
                .field("endpoint", endpoint)
                .finish_non_exhaustive(),
        }
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    ///
    /// `endpoint` overrides catalog discovery; `OS_KEY_MANAGER_URL` is used
    /// when it is not given.
    pub fn from_env(endpoint: Option<&str>) -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok(), endpoint)
    }

    /// Build credentials from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` naming the first variable
    /// that is required but unset.
    pub fn from_lookup<F>(lookup: F, endpoint: Option<&str>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let endpoint = endpoint
            .map(str::to_string)
            .or_else(|| var("OS_KEY_MANAGER_URL"));

        if let Some(token) = var("OS_TOKEN") {
            let endpoint = endpoint.ok_or(ConfigError::MissingCredential(
                "OS_KEY_MANAGER_URL (required with OS_TOKEN)",
            ))?;
            return Ok(Self::Token { token, endpoint });
        }

        let auth_url = var("OS_AUTH_URL").ok_or(ConfigError::MissingCredential("OS_AUTH_URL"))?;
        let username = var("OS_USERNAME").ok_or(ConfigError::MissingCredential("OS_USERNAME"))?;
        let password = var("OS_PASSWORD").ok_or(ConfigError::MissingCredential("OS_PASSWORD"))?;

        let project = match (var("OS_PROJECT_ID"), var("OS_PROJECT_NAME")) {
            (Some(id), _) => ProjectScope::Id(id),
            (None, Some(name)) => ProjectScope::Name {
                name,
                domain: var("OS_PROJECT_DOMAIN_NAME").unwrap_or_else(|| DEFAULT_DOMAIN.into()),
            },
            (None, None) => return Err(ConfigError::MissingCredential("OS_PROJECT_NAME").into()),
        };

        Ok(Self::Password {
            auth_url,
            username,
            password,
            user_domain: var("OS_USER_DOMAIN_NAME").unwrap_or_else(|| DEFAULT_DOMAIN.into()),
            project,
            region: var("OS_REGION_NAME"),
            endpoint,
        })
    }
}

/// Barbican client holding an authenticated token.
pub struct Barbican {
    client: Client,
    endpoint: String,
    token: String,
}

impl Barbican {
    /// Authenticate and locate the key manager endpoint.
    ///
    /// # Errors
    ///
    /// Returns `KeyStoreError::Unavailable` on transport or auth failure.
    pub fn connect(credentials: &Credentials) -> Result<Self> {
        match credentials {
            Credentials::Token { token, endpoint } => Self::with_token(endpoint, token),
            Credentials::Password {
                auth_url,
                username,
                password,
                user_domain,
                project,
                region,
                endpoint,
            } => {
                let client = build_client()?;
                let request = TokenRequest::password(username, password, user_domain, project);
                let url = format!("{}/auth/tokens", auth_url.trim_end_matches('/'));
                debug!(url = %url, user = %username, "requesting keystone token");

                let response = send(client.post(&url).json(&request))?;
                let token = response
                    .headers()
                    .get(SUBJECT_TOKEN_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        KeyStoreError::Unavailable("keystone returned no token".to_string())
                    })?;

                let endpoint = match endpoint {
                    Some(endpoint) => endpoint.clone(),
                    None => {
                        let body: TokenResponse = response.json().map_err(unavailable)?;
                        body.key_manager_url(region.as_deref())?
                    }
                };
                debug!(endpoint = %endpoint, "using key manager endpoint");

                Ok(Self {
                    client,
                    endpoint: endpoint.trim_end_matches('/').to_string(),
                    token,
                })
            }
        }
    }

    /// Use a pre-issued token against `endpoint`.
    pub fn with_token(endpoint: &str, token: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn secrets_url(&self) -> String {
        format!("{}/v1/secrets", self.endpoint)
    }
}

/// Barbican client that reads credentials and authenticates on first use.
///
/// Commands that end up needing no key never touch the environment or the
/// network.
pub struct LazyBarbican {
    endpoint: Option<String>,
    inner: OnceCell<Barbican>,
}

impl LazyBarbican {
    /// Client configured from `OS_*` variables once a request is made.
    pub fn from_env(endpoint: Option<String>) -> Self {
        Self {
            endpoint,
            inner: OnceCell::new(),
        }
    }

    /// Whether authentication has happened yet.
    pub fn is_connected(&self) -> bool {
        self.inner.get().is_some()
    }

    fn get(&self) -> Result<&Barbican> {
        if let Some(store) = self.inner.get() {
            return Ok(store);
        }
        let credentials = Credentials::from_env(self.endpoint.as_deref())?;
        debug!(credentials = ?credentials, "connecting to key store");
        let store = Barbican::connect(&credentials)?;
        Ok(self.inner.get_or_init(|| store))
    }
}

impl KeyStore for LazyBarbican {
    fn list(&self, name: &str) -> Result<Vec<SecretRecord>> {
        self.get()?.list(name)
    }

    fn create(&self, secret: &NewSecret) -> Result<SecretRecord> {
        self.get()?.create(secret)
    }

    fn payload(&self, id: &str) -> Result<String> {
        self.get()?.payload(id)
    }
}

impl KeyStore for Barbican {
    fn list(&self, name: &str) -> Result<Vec<SecretRecord>> {
        debug!(name = %name, "listing secrets");
        let response = send(
            self.client
                .get(self.secrets_url())
                .query(&[("name", name)])
                .header(TOKEN_HEADER, &self.token)
                .header(reqwest::header::ACCEPT, "application/json"),
        )?;

        let body: SecretList = response.json().map_err(unavailable)?;
        trace!(total = body.secrets.len(), "listed secrets");

        Ok(body
            .secrets
            .into_iter()
            .map(|entry| SecretRecord {
                name: entry.name.unwrap_or_else(|| name.to_string()),
                secret_ref: entry.secret_ref,
            })
            .collect())
    }

    fn create(&self, secret: &NewSecret) -> Result<SecretRecord> {
        debug!(name = %secret.name, "creating secret");
        let request = CreateRequest {
            name: &secret.name,
            algorithm: secret.algorithm,
            bit_length: secret.bit_length,
            mode: secret.mode,
            payload: &secret.payload,
            payload_content_type: secret.payload_content_type,
            secret_type: secret.secret_type,
        };

        let response = send(
            self.client
                .post(self.secrets_url())
                .header(TOKEN_HEADER, &self.token)
                .header(reqwest::header::ACCEPT, "application/json")
                .json(&request),
        )?;
        let body: CreateResponse = response.json().map_err(unavailable)?;

        Ok(SecretRecord {
            name: secret.name.clone(),
            secret_ref: body.secret_ref,
        })
    }

    fn payload(&self, id: &str) -> Result<String> {
        debug!(id = %id, "fetching secret payload");
        let response = send(
            self.client
                .get(format!("{}/{}/payload", self.secrets_url(), id))
                .header(TOKEN_HEADER, &self.token)
                .header(reqwest::header::ACCEPT, "text/plain"),
        )?;
        response.text().map_err(unavailable)
    }
}

fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("sealant/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(unavailable)
}

/// Send a request, mapping transport errors and non-2xx statuses.
fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().map_err(unavailable)?;
    let status = response.status();
    trace!(status = %status, "key store response");

    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(KeyStoreError::Unavailable(format!("authentication rejected ({})", status)).into());
    }
    let body = response.text().unwrap_or_default();
    Err(KeyStoreError::Rejected {
        status: status.as_u16(),
        body: body.trim().to_string(),
    }
    .into())
}

fn unavailable(e: reqwest::Error) -> crate::error::Error {
    KeyStoreError::Unavailable(e.to_string()).into()
}

#[derive(Debug, Deserialize)]
struct SecretList {
    #[serde(default)]
    secrets: Vec<SecretEntry>,
}

#[derive(Debug, Deserialize)]
struct SecretEntry {
    name: Option<String>,
    secret_ref: String,
}

#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    name: &'a str,
    algorithm: &'a str,
    bit_length: u32,
    mode: &'a str,
    payload: &'a str,
    payload_content_type: &'a str,
    secret_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    secret_ref: String,
}

#[derive(Debug, Serialize)]
struct TokenRequest {
    auth: serde_json::Value,
}

impl TokenRequest {
    fn password(username: &str, password: &str, user_domain: &str, project: &ProjectScope) -> Self {
        let project = match project {
            ProjectScope::Id(id) => serde_json::json!({ "id": id }),
            ProjectScope::Name { name, domain } => {
                serde_json::json!({ "name": name, "domain": { "name": domain } })
            }
        };
        Self {
            auth: serde_json::json!({
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": username,
                            "domain": { "name": user_domain },
                            "password": password,
                        }
                    }
                },
                "scope": { "project": project }
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Deserialize)]
struct CatalogEndpoint {
    interface: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    region_id: Option<String>,
    url: String,
}

impl TokenResponse {
    /// Public key-manager URL, restricted to `region` when given.
    fn key_manager_url(&self, region: Option<&str>) -> Result<String> {
        self.token
            .catalog
            .iter()
            .filter(|entry| entry.kind == KEY_MANAGER_SERVICE)
            .flat_map(|entry| entry.endpoints.iter())
            .filter(|ep| ep.interface == "public")
            .find(|ep| match region {
                Some(region) => {
                    ep.region.as_deref() == Some(region) || ep.region_id.as_deref() == Some(region)
                }
                None => true,
            })
            .map(|ep| ep.url.clone())
            .ok_or_else(|| {
                KeyStoreError::Unavailable(format!(
                    "no public key-manager endpoint in catalog{}",
                    region.map(|r| format!(" for region {}", r)).unwrap_or_default()
                ))
                .into()
            })
    }
}
