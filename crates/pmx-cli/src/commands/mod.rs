pub mod check;
pub mod generate;

use std::path::{Path, PathBuf};

use anyhow::Result;
use pmx_config::Config;

use crate::cli::ConnectionArgs;

/// Load the config file and apply CLI overrides on top of it.
pub fn resolve_config(args: &ConnectionArgs, path: Option<&Path>) -> Result<Config> {
    let mut config = Config::load(path)?;

    if let Some(host) = &args.host {
        config.connection.host = host.clone();
    }
    if let Some(token) = &args.api_token {
        config.connection.api_token = Some(token.clone());
    }
    if let Some(username) = &args.username {
        config.connection.username = Some(username.clone());
    }
    if let Some(password) = &args.password {
        config.connection.password = Some(password.clone());
    }
    if args.verify_ssl {
        config.connection.verify_ssl = true;
    }

    config.validate()?;
    Ok(config)
}

pub fn resolve_output(config: &Config, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| config.output.dir.clone())
}
