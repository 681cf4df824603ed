//! Logging initialisation via tracing-subscriber.
//!
//! Output always goes to stderr so stdout stays clean for the emitted JSON.
//! The filter is picked by [`LogSelection::resolve`], then installed once
//! with [`init`].

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Filter used when nothing is configured anywhere.
pub const DEFAULT_DIRECTIVES: &str = "info";

/// Which filter directives to install and where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSelection {
    /// `EnvFilter` syntax: `debug`, `coffee_shop_env=trace,warn`, ...
    pub directives: String,
    /// Set when the value came from `--log-level` or `COFFEE_SHOP_LOG_LEVEL`.
    /// Explicit values beat `RUST_LOG`; the built-in default does not.
    pub explicit: bool,
}

impl LogSelection {
    /// `--log-level` > `COFFEE_SHOP_LOG_LEVEL` > (`RUST_LOG` or `info`).
    ///
    /// Blank values are treated as unset.
    pub fn resolve(cli: Option<String>, env_level: Option<String>) -> Self {
        match cli
            .filter(|v| !v.trim().is_empty())
            .or(env_level.filter(|v| !v.trim().is_empty()))
        {
            Some(directives) => Self { directives, explicit: true },
            None => Self {
                directives: DEFAULT_DIRECTIVES.to_string(),
                explicit: false,
            },
        }
    }

    /// Build the filter. An explicit selection must parse; otherwise
    /// `RUST_LOG` is tried before the default.
    pub fn filter(&self) -> Result<EnvFilter, AppError> {
        if self.explicit {
            return parse_directives(&self.directives);
        }
        EnvFilter::try_from_default_env().or_else(|_| parse_directives(&self.directives))
    }
}

/// Parse `EnvFilter` directives, rejecting blank input and unknown levels.
pub fn parse_directives(directives: &str) -> Result<EnvFilter, AppError> {
    if directives.trim().is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    EnvFilter::try_new(directives)
        .map_err(|e| AppError::Logger(format!("invalid log filter '{directives}': {e}")))
}

/// Install the global subscriber for `selection`.
pub fn init(selection: &LogSelection) -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(selection.filter()?)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}
