//! The frontend environment record.
//!
//! One immutable value per process: which backend to call and which Auth0
//! tenant to authenticate against. Serializes to the exact JSON shape the
//! frontend build expects:
//!
//! ```text
//! { "production": bool,
//!   "apiServerUrl": "...",
//!   "auth0": { "url", "audience", "clientId", "callbackURL" } }
//! ```

mod auth0;
mod profile;

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AppError;

pub use auth0::{AUTH0_DOMAIN_SUFFIX, Auth0Config};
pub use profile::Profile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Environment {
    /// Build/runtime mode of the consuming application.
    pub production: bool,
    /// Base URL of the backend HTTP API.
    pub api_server_url: String,
    pub auth0: Auth0Config,
}

impl Environment {
    /// Local development setup: Flask API on :5000, Ionic dev server on :4200.
    pub fn development() -> Self {
        Self {
            production: false,
            api_server_url: "http://127.0.0.1:5000".into(),
            auth0: Auth0Config {
                url: "dev-gjnagefq5ixxakc.us".into(),
                audience: "https://coffee-shop.com".into(),
                client_id: "jbNzMMhg88jOYPPk5gOxpY2bytMdZYsK".into(),
                callback_url: "http://127.0.0.1:4200".into(),
            },
        }
    }

    /// Check that every field is usable.
    ///
    /// Strings must be non-blank with no surrounding whitespace, the tenant
    /// must form a plain host, both URLs must be absolute `http(s)` URLs,
    /// and a production record must use `https` for both.
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("api_server_url", &self.api_server_url)?;
        require_non_empty("auth0.url", &self.auth0.url)?;
        require_non_empty("auth0.audience", &self.auth0.audience)?;
        require_non_empty("auth0.client_id", &self.auth0.client_id)?;
        require_non_empty("auth0.callback_url", &self.auth0.callback_url)?;

        self.auth0.validate_tenant()?;
        require_web_url("api_server_url", &self.api_server_url, self.production)?;
        require_web_url("auth0.callback_url", &self.auth0.callback_url, self.production)?;
        Ok(())
    }

    /// Resolve `path` against the API base URL.
    ///
    /// The base is treated as a directory, so `http://host/api` + `drinks`
    /// gives `http://host/api/drinks`. A leading `/` on `path` is ignored.
    pub fn api_url(&self, path: &str) -> Result<Url, AppError> {
        let mut base = Url::parse(&self.api_server_url).map_err(|e| {
            AppError::Validation(format!("api_server_url '{}': {e}", self.api_server_url))
        })?;
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|e| AppError::Validation(format!("cannot join '{path}' onto api url: {e}")))
    }

    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    // Url::parse strips padding, but the raw string is what gets emitted.
    if value != value.trim() {
        return Err(AppError::Validation(format!(
            "{field} has leading or trailing whitespace: '{value}'"
        )));
    }
    Ok(())
}

fn require_web_url(field: &str, value: &str, https_only: bool) -> Result<Url, AppError> {
    let url = Url::parse(value)
        .map_err(|e| AppError::Validation(format!("{field} is not a valid URL ('{value}'): {e}")))?;
    match url.scheme() {
        "https" => {}
        "http" if !https_only => {}
        "http" => {
            return Err(AppError::Validation(format!(
                "{field} must use https in production, got '{value}'"
            )));
        }
        other => {
            return Err(AppError::Validation(format!(
                "{field} must be an http(s) URL, got scheme '{other}'"
            )));
        }
    }
    Ok(url)
}

// ── process-wide instance ─────────────────────────────────────────────────────

static INSTALLED: OnceLock<Environment> = OnceLock::new();

/// Validate `env` and make it the process-wide environment.
///
/// Succeeds once per process; later calls return [`AppError::AlreadyInstalled`]
/// and leave the first value in place.
pub fn install(env: Environment) -> Result<&'static Environment, AppError> {
    env.validate()?;
    let mut fresh = false;
    let installed = INSTALLED.get_or_init(|| {
        fresh = true;
        env
    });
    if fresh {
        Ok(installed)
    } else {
        Err(AppError::AlreadyInstalled)
    }
}

/// The installed environment, if [`install`] has run.
pub fn current() -> Option<&'static Environment> {
    INSTALLED.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn production() -> Environment {
        Environment {
            production: true,
            api_server_url: "https://api.coffee-shop.com".into(),
            auth0: Auth0Config {
                url: "coffee-shop.us".into(),
                audience: "https://coffee-shop.com".into(),
                client_id: "prodClientId".into(),
                callback_url: "https://coffee-shop.com".into(),
            },
        }
    }

    #[test]
    fn development_is_valid() {
        Environment::development().validate().unwrap();
    }

    #[test]
    fn production_is_valid() {
        production().validate().unwrap();
    }

    #[test]
    fn blank_field_rejected() {
        let mut env = Environment::development();
        env.auth0.client_id = "   ".into();
        let msg = env.validate().unwrap_err().to_string();
        assert!(msg.contains("auth0.client_id"), "{msg}");
    }

    #[test]
    fn every_string_field_checked() {
        let blankers: [fn(&mut Environment); 5] = [
            |e| e.api_server_url.clear(),
            |e| e.auth0.url.clear(),
            |e| e.auth0.audience.clear(),
            |e| e.auth0.client_id.clear(),
            |e| e.auth0.callback_url.clear(),
        ];
        for blank in blankers {
            let mut env = Environment::development();
            blank(&mut env);
            assert!(matches!(env.validate(), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn padded_values_rejected() {
        let mut env = Environment::development();
        env.api_server_url = "  http://127.0.0.1:5000  ".into();
        let msg = env.validate().unwrap_err().to_string();
        assert!(msg.contains("whitespace"), "{msg}");

        let mut env = Environment::development();
        env.auth0.callback_url = "http://127.0.0.1:4200\n".into();
        assert!(matches!(env.validate(), Err(AppError::Validation(_))));

        let mut env = Environment::development();
        env.auth0.client_id = " jbNzMMhg88jOYPPk5gOxpY2bytMdZYsK".into();
        assert!(env.validate().is_err());
    }

    #[test]
    fn bad_tenant_rejected() {
        let mut env = Environment::development();
        env.auth0.url = "evil.example#".into();
        assert!(matches!(env.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn relative_api_url_rejected() {
        let mut env = Environment::development();
        env.api_server_url = "127.0.0.1:5000/api".into();
        assert!(env.validate().is_err());
    }

    #[test]
    fn non_web_scheme_rejected() {
        let mut env = Environment::development();
        env.auth0.callback_url = "ftp://127.0.0.1:4200".into();
        let msg = env.validate().unwrap_err().to_string();
        assert!(msg.contains("scheme 'ftp'"), "{msg}");
    }

    #[test]
    fn production_requires_https() {
        let mut env = production();
        env.api_server_url = "http://api.coffee-shop.com".into();
        let msg = env.validate().unwrap_err().to_string();
        assert!(msg.contains("https"), "{msg}");
    }

    #[test]
    fn api_url_joins_onto_root() {
        let url = Environment::development().api_url("/drinks-detail").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/drinks-detail");
    }

    #[test]
    fn api_url_keeps_base_path() {
        let mut env = Environment::development();
        env.api_server_url = "http://127.0.0.1:5000/api".into();
        let url = env.api_url("drinks/1").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/api/drinks/1");
    }

    #[test]
    fn json_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&Environment::development().to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["production"], serde_json::Value::Bool(false));
        assert_eq!(json["apiServerUrl"], "http://127.0.0.1:5000");
        assert_eq!(json["auth0"]["url"], "dev-gjnagefq5ixxakc.us");
        assert_eq!(json["auth0"]["audience"], "https://coffee-shop.com");
        assert_eq!(json["auth0"]["clientId"], "jbNzMMhg88jOYPPk5gOxpY2bytMdZYsK");
        assert_eq!(json["auth0"]["callbackURL"], "http://127.0.0.1:4200");
        assert_eq!(json.as_object().unwrap().len(), 3);
        assert_eq!(json["auth0"].as_object().unwrap().len(), 4);
    }

    #[test]
    fn string_production_flag_rejected() {
        let raw = r#"{
            "production": "false",
            "apiServerUrl": "http://127.0.0.1:5000",
            "auth0": { "url": "a", "audience": "b", "clientId": "c", "callbackURL": "http://d" }
        }"#;
        assert!(serde_json::from_str::<Environment>(raw).is_err());
    }

    #[test]
    fn unknown_field_rejected() {
        let raw = r#"{
            "production": false,
            "apiServerUrl": "http://127.0.0.1:5000",
            "debug": true,
            "auth0": { "url": "a", "audience": "b", "clientId": "c", "callbackURL": "http://d" }
        }"#;
        assert!(serde_json::from_str::<Environment>(raw).is_err());
    }

    #[test]
    fn install_is_once() {
        let first = install(Environment::development()).unwrap();
        assert!(!first.production);
        assert!(matches!(install(production()), Err(AppError::AlreadyInstalled)));
        assert_eq!(current(), Some(&Environment::development()));
    }
}
