//! Command-line interface definitions using clap
//!
//! This module defines the administrative CLI for linkvault.

use clap::{Parser, Subcommand};

/// linkvault - embedded storage for short links
#[derive(Parser, Debug)]
#[command(name = "linkvault")]
#[command(version)]
#[command(about = "Manage a linkvault short link store", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: linkvault.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a short link
    Add {
        /// Target URL
        url: String,

        /// Owning user
        #[arg(long, short = 'u')]
        user: String,

        /// Use this short code instead of generating one
        #[arg(long)]
        id: Option<String>,

        /// Expiration time (RFC3339 or relative like "1d", "2h")
        #[arg(long)]
        expire: Option<String>,
    },

    /// Show a short link
    Get {
        /// Short code
        id: String,
    },

    /// Resolve a short link and count the visit
    View {
        /// Short code
        id: String,
    },

    /// Update the target and expiration of a short link
    Update {
        /// Short code to update
        id: String,

        /// New target URL
        url: String,

        /// New expiration time; omit to clear
        #[arg(long)]
        expire: Option<String>,
    },

    /// Soft-delete a short link
    Delete {
        /// Short code to delete
        id: String,
    },

    /// List short links
    List {
        /// Only links owned by this user
        #[arg(long, short = 'u')]
        user: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: linkvault.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
