//! Tests for the shipped profiles under config/

use std::path::Path;

use coffee_shop_env::config::{Overrides, load_from, load_profile};
use coffee_shop_env::{Environment, Profile};

fn load(profile: Profile) -> Environment {
    load_profile(profile, Path::new("config"), &Overrides::default())
        .unwrap_or_else(|e| panic!("{profile} profile failed to load: {e}"))
}

fn keys(env: &Environment) -> Vec<String> {
    fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<String>) {
        if let Some(obj) = value.as_object() {
            for (k, v) in obj {
                let path = if prefix.is_empty() { k.clone() } else { format!("{prefix}.{k}") };
                walk(&path, v, out);
            }
        } else {
            out.push(prefix.to_string());
        }
    }
    let mut out = Vec::new();
    walk("", &serde_json::to_value(env).unwrap(), &mut out);
    out.sort();
    out
}

#[test]
fn test_profile_files_exist() {
    assert!(Path::new("config/development.toml").is_file());
    assert!(Path::new("config/production.toml").is_file());
}

#[test]
fn test_development_matches_builtin() {
    assert_eq!(load(Profile::Development), Environment::development());
}

#[test]
fn test_production_flag_matches_profile() {
    assert!(!load(Profile::Development).production);
    assert!(load(Profile::Production).production);
}

#[test]
fn test_production_uses_https() {
    let env = load(Profile::Production);
    assert!(env.api_server_url.starts_with("https://"));
    assert!(env.auth0.callback_url.starts_with("https://"));
}

#[test]
fn test_profiles_share_shape() {
    let dev = keys(&load(Profile::Development));
    let prod = keys(&load(Profile::Production));
    assert_eq!(dev, prod);
    assert_eq!(
        dev,
        vec![
            "apiServerUrl",
            "auth0.audience",
            "auth0.callbackURL",
            "auth0.clientId",
            "auth0.url",
            "production",
        ]
    );
}

#[test]
fn test_production_inherits_tenant() {
    let dev = load(Profile::Development);
    let prod = load(Profile::Production);
    assert_eq!(prod.auth0.client_id, dev.auth0.client_id);
    assert_eq!(prod.auth0.audience, dev.auth0.audience);
    assert_ne!(prod.api_server_url, dev.api_server_url);
}

#[test]
fn test_override_reaches_production() {
    let overrides = Overrides {
        auth0_client_id: Some("prodTenantClient".into()),
        ..Overrides::default()
    };
    let env = load_from(Path::new("config/production.toml"), &overrides).unwrap();
    assert_eq!(env.auth0.client_id, "prodTenantClient");
    assert!(env.production);
}

#[test]
fn test_insecure_production_override_rejected() {
    let overrides = Overrides {
        api_server_url: Some("http://api.coffee-shop.com".into()),
        ..Overrides::default()
    };
    assert!(load_from(Path::new("config/production.toml"), &overrides).is_err());
}

#[test]
fn test_login_link_for_development() {
    let url = load(Profile::Development).auth0.authorize_url("/tabs/user-page").unwrap();
    assert!(url
        .as_str()
        .starts_with("https://dev-gjnagefq5ixxakc.us.auth0.com/authorize?"));
}
