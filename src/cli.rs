//! Command-line interface definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// urlshortener - URL shortener with user accounts
#[derive(Parser)]
#[command(name = "urlshortener")]
#[command(version)]
#[command(about = "A URL shortener with user accounts and per-user links", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Session signing secret, overrides `auth.jwt_secret`
    #[arg(long, global = true, env = "URLS_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Print a sample configuration file to stdout
    ConfigGen,
}
