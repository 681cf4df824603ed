//! Library root: the environment record and its loader.
//! The binary entry point is src/main.rs.

pub mod config;
pub mod environment;
pub mod error;
pub mod logger;

pub use environment::{Auth0Config, Environment, Profile};
pub use error::AppError;
