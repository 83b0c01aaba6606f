//! Command-line surface of the deferred image encoder.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use error::AppError;
