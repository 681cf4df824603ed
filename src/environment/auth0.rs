//! Identity-provider block of the environment.
//!
//! Only the tenant coordinates live here. The helpers below derive the
//! well-known provider endpoints from them; nothing in this module talks to
//! the network.

use serde::{Deserialize, Serialize};
use url::{Host, Url};

use crate::error::AppError;

/// Hosted Auth0 tenants live under this suffix.
pub const AUTH0_DOMAIN_SUFFIX: &str = ".auth0.com";

/// Auth0 tenant configuration as consumed by the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Auth0Config {
    /// Tenant domain prefix, e.g. `dev-gjnagefq5ixxakc.us`.
    pub url: String,
    /// API identifier the issued tokens are valid for.
    pub audience: String,
    /// Public identifier of the registered client application.
    pub client_id: String,
    /// Where the provider redirects after login. Must be registered with the tenant.
    #[serde(rename = "callbackURL")]
    pub callback_url: String,
}

impl Auth0Config {
    /// Fully-qualified tenant host. A `url` that already carries the
    /// `.auth0.com` suffix is returned unchanged.
    pub fn domain(&self) -> String {
        if self.url.ends_with(AUTH0_DOMAIN_SUFFIX) {
            self.url.clone()
        } else {
            format!("{}{AUTH0_DOMAIN_SUFFIX}", self.url)
        }
    }

    /// Token issuer (`iss` claim), with the trailing slash Auth0 emits.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain())
    }

    /// JSON Web Key Set used to verify tokens issued by the tenant.
    pub fn jwks_url(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.domain())
    }

    /// Login link for the implicit flow.
    ///
    /// `callback_path` is appended verbatim to `callback_url` to form the
    /// `redirect_uri`, so pass `""` to return to the application root.
    pub fn authorize_url(&self, callback_path: &str) -> Result<Url, AppError> {
        let redirect_uri = format!("{}{callback_path}", self.callback_url);
        self.endpoint(
            "/authorize",
            &[
                ("audience", self.audience.as_str()),
                ("response_type", "token"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
            ],
        )
    }

    /// Tenant logout endpoint returning the user to `callback_url`.
    pub fn logout_url(&self) -> Result<Url, AppError> {
        self.endpoint(
            "/v2/logout",
            &[
                ("client_id", self.client_id.as_str()),
                ("returnTo", self.callback_url.as_str()),
            ],
        )
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, AppError> {
        let base = format!("https://{}{path}", self.domain());
        Url::parse_with_params(&base, params)
            .map_err(|e| AppError::Validation(format!("cannot build {base}: {e}")))
    }

    /// The tenant prefix must yield a plain DNS host once the suffix is
    /// added: no scheme, path, port, userinfo, query, fragment or spaces.
    /// URL-shaped fields are checked by the caller, which knows the
    /// deployment mode.
    pub(super) fn validate_tenant(&self) -> Result<(), AppError> {
        let domain = self.domain();
        let invalid = |why: String| {
            AppError::Validation(format!(
                "auth0.url must be a bare tenant domain prefix, got '{}': {why}",
                self.url
            ))
        };
        match Host::parse(&domain) {
            Ok(Host::Domain(parsed)) if parsed == domain.to_ascii_lowercase() => Ok(()),
            Ok(other) => Err(invalid(format!("resolves to host '{other}'"))),
            Err(e) => Err(invalid(e.to_string())),
        }
    }
}
