use std::path::PathBuf;

use anyhow::Result;
use pmx_api::{PveApi, PveClient};
use pmx_core::record;

use crate::cli::ConnectionArgs;
use crate::commands::resolve_config;

pub async fn handle(connection: ConnectionArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(&connection, config_path.as_deref())?;

    let client = PveClient::connect(&config.connection).await?;
    let version = client.version().await?;

    println!("✓ Connected to {} ({})", config.connection.host, config.auth_method());
    println!(
        "  Proxmox VE {} (release {})",
        record::display_key(&version, "version"),
        record::display_key(&version, "release"),
    );

    let nodes = client.nodes().await?;
    println!("  {} node(s) visible", nodes.len());
    for node in &nodes {
        println!(
            "    - {} ({})",
            record::display_key(node, "node"),
            record::str_or(node, "status", "unknown"),
        );
    }
    Ok(())
}
