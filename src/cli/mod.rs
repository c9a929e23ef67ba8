//! CLI module for the semantic cache proxy
//!
//! - `serve`: run the caching reverse proxy
//! - `config`: print the resolved configuration

pub mod config;
pub mod serve;

use clap::{Parser, Subcommand};

/// Semantic cache-aside reverse proxy for LLM chat APIs
#[derive(Parser)]
#[command(name = "semantic-cache-proxy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the caching proxy
    Serve(serve::ServeArgs),

    /// Print the resolved configuration with credentials masked
    Config,
}
