//! Environment loading with env-var overrides.
//!
//! Reads `config/{profile}.toml` relative to the current working directory
//! (or `COFFEE_SHOP_CONFIG_DIR`), follows `[meta] base` chains, then applies
//! `COFFEE_SHOP_*` field overrides and validates the result.
//!
//! # Module layout
//!
//! - **raw**: TOML deserialization shape (`RawEnvironment`, `RawAuth0`).
//!   All fields optional; kept private.
//! - **load**: `Overrides`, `merge_toml`, `load_raw_merged`, `load`,
//!   `load_with`, `load_profile`, `load_from`, `expand_home`.

mod load;
mod raw;

pub use load::{
    DEFAULT_CONFIG_DIR, ENV_API_SERVER_URL, ENV_AUTH0_AUDIENCE, ENV_AUTH0_CALLBACK_URL,
    ENV_AUTH0_CLIENT_ID, ENV_AUTH0_URL, ENV_CONFIG_DIR, ENV_PRODUCTION, Overrides, expand_home,
    load, load_from, load_profile, load_with,
};
