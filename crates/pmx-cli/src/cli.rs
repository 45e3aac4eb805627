use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pmxdocs")]
#[command(about = "Generate MDX documentation from a Proxmox VE cluster", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the full documentation tree
    Generate {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Output directory for the generated .mdx files
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Path to a pmxdocs.toml config file
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Enable every redaction rule
        #[arg(long)]
        redact_all: bool,
    },

    /// Verify connectivity and authentication, then print the API version
    Check {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Path to a pmxdocs.toml config file
        #[arg(long, short)]
        config: Option<PathBuf>,
    },
}

/// Connection overrides. Anything left unset falls back to the config file.
#[derive(Args)]
pub struct ConnectionArgs {
    /// Proxmox host name or address
    #[arg(long, env = "PROXMOX_HOST")]
    pub host: Option<String>,

    /// API token in USER@REALM!TOKENID=SECRET format
    #[arg(long, env = "PROXMOX_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Username in user@realm format (password authentication)
    #[arg(long, env = "PROXMOX_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "PROXMOX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Verify the TLS certificate of the API endpoint
    #[arg(long)]
    pub verify_ssl: bool,
}
