//! Loading logic: base-chain merging, env overrides, profile lookup.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::environment::{Environment, Profile};
use crate::error::AppError;

use super::raw::RawEnvironment;

/// Directory searched for `{profile}.toml` when no explicit path is given.
pub const DEFAULT_CONFIG_DIR: &str = "config";

pub const ENV_CONFIG_DIR: &str = "COFFEE_SHOP_CONFIG_DIR";
pub const ENV_PRODUCTION: &str = "COFFEE_SHOP_PRODUCTION";
pub const ENV_API_SERVER_URL: &str = "COFFEE_SHOP_API_SERVER_URL";
pub const ENV_AUTH0_URL: &str = "COFFEE_SHOP_AUTH0_URL";
pub const ENV_AUTH0_AUDIENCE: &str = "COFFEE_SHOP_AUTH0_AUDIENCE";
pub const ENV_AUTH0_CLIENT_ID: &str = "COFFEE_SHOP_AUTH0_CLIENT_ID";
pub const ENV_AUTH0_CALLBACK_URL: &str = "COFFEE_SHOP_AUTH0_CALLBACK_URL";

/// Per-field substitutions applied on top of whatever the files say.
///
/// An override set to an empty string still counts as set, and is then
/// rejected by validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub production: Option<bool>,
    pub api_server_url: Option<String>,
    pub auth0_url: Option<String>,
    pub auth0_audience: Option<String>,
    pub auth0_client_id: Option<String>,
    pub auth0_callback_url: Option<String>,
}

impl Overrides {
    /// Read the `COFFEE_SHOP_*` variables from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build overrides from an arbitrary key lookup.
    /// Tests pass a map here instead of mutating process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let production = match lookup(ENV_PRODUCTION) {
            Some(v) => Some(parse_bool(ENV_PRODUCTION, &v)?),
            None => None,
        };
        Ok(Self {
            production,
            api_server_url: lookup(ENV_API_SERVER_URL),
            auth0_url: lookup(ENV_AUTH0_URL),
            auth0_audience: lookup(ENV_AUTH0_AUDIENCE),
            auth0_client_id: lookup(ENV_AUTH0_CLIENT_ID),
            auth0_callback_url: lookup(ENV_AUTH0_CALLBACK_URL),
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&self, mut raw: RawEnvironment) -> RawEnvironment {
        if let Some(v) = self.production {
            raw.production = Some(v);
        }
        if let Some(v) = &self.api_server_url {
            raw.api_server_url = Some(v.clone());
        }
        if let Some(v) = &self.auth0_url {
            raw.auth0.url = Some(v.clone());
        }
        if let Some(v) = &self.auth0_audience {
            raw.auth0.audience = Some(v.clone());
        }
        if let Some(v) = &self.auth0_client_id {
            raw.auth0.client_id = Some(v.clone());
        }
        if let Some(v) = &self.auth0_callback_url {
            raw.auth0.callback_url = Some(v.clone());
        }
        raw
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(AppError::Config(format!(
            "{key} must be a boolean (true/false), got '{value}'"
        ))),
    }
}

/// Deep-merge two TOML values.
/// Tables merge recursively; any other overlay value replaces the base value.
fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_tbl), toml::Value::Table(overlay_tbl)) => {
            for (key, ov_val) in overlay_tbl {
                let merged = match base_tbl.remove(&key) {
                    Some(base_val) => merge_toml(base_val, ov_val),
                    None => ov_val,
                };
                base_tbl.insert(key, merged);
            }
            toml::Value::Table(base_tbl)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file, follow any `[meta] base = "..."` chain, and return the
/// merged value. `visited` holds canonical paths already seen in this chain.
fn load_raw_merged(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<toml::Value, AppError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical) {
        return Err(AppError::Config(format!(
            "circular base reference detected at: {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let overlay_val: toml::Value = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    if let Some(base_str) = overlay_val
        .get("meta")
        .and_then(|m| m.get("base"))
        .and_then(|b| b.as_str())
    {
        let base_path = if Path::new(base_str).is_absolute() {
            PathBuf::from(base_str)
        } else {
            path.parent().unwrap_or(Path::new(".")).join(base_str)
        };
        debug!(file = %path.display(), base = %base_path.display(), "following config base");
        let base_val = load_raw_merged(&base_path, visited)?;
        Ok(merge_toml(base_val, overlay_val))
    } else {
        Ok(overlay_val)
    }
}

/// Load one config file (plus its base chain), apply `overrides`, and
/// validate the result.
pub fn load_from(path: &Path, overrides: &Overrides) -> Result<Environment, AppError> {
    let merged = load_raw_merged(path, &mut HashSet::new())?;

    let parsed = RawEnvironment::deserialize(merged).map_err(|e: toml::de::Error| {
        AppError::Config(format!("config error in {}: {e}", path.display()))
    })?;

    let env = overrides
        .apply(parsed)
        .resolve(&path.display().to_string())?;
    env.validate()?;
    Ok(env)
}

/// Load the environment for `profile` from `dir`.
///
/// Falls back to [`Environment::development`] (with overrides) when the
/// development file is absent. Production has no built-in values, so a
/// missing production file is an error.
pub fn load_profile(
    profile: Profile,
    dir: &Path,
    overrides: &Overrides,
) -> Result<Environment, AppError> {
    let path = dir.join(profile.file_name());

    let env = if path.exists() {
        load_from(&path, overrides)?
    } else {
        match profile {
            Profile::Development => {
                info!(missing = %path.display(), "no config file, using built-in development values");
                let env = overrides
                    .apply(Environment::development().into())
                    .resolve("built-in development defaults")?;
                env.validate()?;
                env
            }
            Profile::Production => {
                return Err(AppError::Config(format!(
                    "production profile requires {}",
                    path.display()
                )));
            }
        }
    };

    warn_on_profile_mismatch(profile, &env);
    Ok(env)
}

/// Resolve config location from arguments and env, then load.
///
/// Reads `COFFEE_SHOP_CONFIG_DIR` and the `COFFEE_SHOP_*` field overrides
/// from the process environment and hands off to [`load_with`].
pub fn load(profile: Profile, config_path: Option<&str>) -> Result<Environment, AppError> {
    let overrides = Overrides::from_env()?;
    if !overrides.is_empty() {
        debug!(?overrides, "environment overrides present");
    }
    let config_dir = env::var(ENV_CONFIG_DIR).ok();
    load_with(profile, config_path, config_dir.as_deref(), &overrides)
}

/// Location rules without touching process env.
///
/// An explicit `config_path` wins; otherwise `{config_dir or
/// config}/{profile}.toml` is used. `overrides` apply in both cases, and a
/// `production` flag that disagrees with `profile` is logged at warn.
pub fn load_with(
    profile: Profile,
    config_path: Option<&str>,
    config_dir: Option<&str>,
    overrides: &Overrides,
) -> Result<Environment, AppError> {
    if let Some(path) = config_path {
        let env = load_from(&expand_home(path), overrides)?;
        warn_on_profile_mismatch(profile, &env);
        return Ok(env);
    }

    let dir = config_dir.unwrap_or(DEFAULT_CONFIG_DIR);
    load_profile(profile, &expand_home(dir), overrides)
}

fn warn_on_profile_mismatch(profile: Profile, env: &Environment) {
    if env.production != profile.expects_production_flag() {
        warn!(
            %profile,
            production = env.production,
            "production flag does not match the selected profile"
        );
    }
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
