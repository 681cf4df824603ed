//! Raw TOML shape: the `serde` target before overrides and resolution.
//!
//! Every field is optional here so a `[meta] base` overlay only needs the
//! keys it changes. Missing keys are reported by [`RawEnvironment::resolve`].

use serde::Deserialize;

use crate::environment::{Auth0Config, Environment};
use crate::error::AppError;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawEnvironment {
    /// Consumed while following base chains; carried here so the strict
    /// field check accepts it.
    #[serde(default)]
    #[allow(dead_code)]
    pub meta: Option<RawMeta>,
    pub production: Option<bool>,
    pub api_server_url: Option<String>,
    #[serde(default)]
    pub auth0: RawAuth0,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawMeta {
    #[allow(dead_code)]
    pub base: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawAuth0 {
    pub url: Option<String>,
    pub audience: Option<String>,
    pub client_id: Option<String>,
    pub callback_url: Option<String>,
}

impl From<Environment> for RawEnvironment {
    fn from(env: Environment) -> Self {
        Self {
            meta: None,
            production: Some(env.production),
            api_server_url: Some(env.api_server_url),
            auth0: RawAuth0 {
                url: Some(env.auth0.url),
                audience: Some(env.auth0.audience),
                client_id: Some(env.auth0.client_id),
                callback_url: Some(env.auth0.callback_url),
            },
        }
    }
}

impl RawEnvironment {
    /// Turn the merged shape into a complete record, naming the first
    /// missing key. Does not validate values.
    pub fn resolve(self, source: &str) -> Result<Environment, AppError> {
        let missing = |key: &str| AppError::Config(format!("missing `{key}` in {source}"));
        Ok(Environment {
            production: self.production.ok_or_else(|| missing("production"))?,
            api_server_url: self.api_server_url.ok_or_else(|| missing("api_server_url"))?,
            auth0: Auth0Config {
                url: self.auth0.url.ok_or_else(|| missing("auth0.url"))?,
                audience: self.auth0.audience.ok_or_else(|| missing("auth0.audience"))?,
                client_id: self.auth0.client_id.ok_or_else(|| missing("auth0.client_id"))?,
                callback_url: self
                    .auth0
                    .callback_url
                    .ok_or_else(|| missing("auth0.callback_url"))?,
            },
        })
    }
}
