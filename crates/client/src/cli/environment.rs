//! Environment and cache maintenance commands.

use clap::{Parser, Subcommand};

use super::EnvironmentArg;

/// Environment selection commands.
#[derive(Debug, Parser)]
pub struct EnvCommand {
    #[command(subcommand)]
    pub action: EnvAction,
}

/// Available environment actions.
#[derive(Debug, Subcommand)]
pub enum EnvAction {
    /// Show the resolved environment and service URLs.
    Show,
    /// Persist an environment for future runs.
    Force {
        /// Environment to use.
        #[arg(value_enum)]
        environment: EnvironmentArg,
    },
    /// Forget a forced environment and go back to detection.
    Reset,
}

/// Cache maintenance commands.
#[derive(Debug, Parser)]
pub struct CacheCommand {
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Available cache actions.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Tell running watchers to drop their caches and reload.
    Clear,
}
