//! Persistence for the agent: TOML configuration.

pub mod config;
