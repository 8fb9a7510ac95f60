pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod source;
pub mod telemetry;
pub mod types;
