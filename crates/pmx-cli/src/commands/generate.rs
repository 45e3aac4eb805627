use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use pmx_api::PveClient;
use pmx_redact::{RedactionPolicy, Redactor};
use pmx_render::Renderer;
use tracing::info;

use crate::cli::ConnectionArgs;
use crate::commands::{resolve_config, resolve_output};

pub async fn handle(
    connection: ConnectionArgs,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    redact_all: bool,
) -> Result<()> {
    let config = resolve_config(&connection, config_path.as_deref())?;
    let output_dir = resolve_output(&config, output);

    let policy = if redact_all {
        RedactionPolicy::redact_all()
    } else {
        config.redaction.clone()
    };
    let redactor = Arc::new(Redactor::new(policy));

    info!(
        host = %config.connection.host,
        auth = %config.auth_method(),
        "connecting to Proxmox API"
    );
    let client = PveClient::connect(&config.connection).await?;

    if redactor.should_redact_anything() {
        info!(
            "redaction enabled: {}",
            redactor.redaction_summary().join(", ")
        );
    } else {
        info!("redaction disabled, output will contain unmodified values");
    }

    let renderer = Renderer::new(&output_dir, redactor);
    let generators = renderer.plan(&client).await?;
    info!("planned {} documents", generators.len());

    let report = renderer.run(&client, generators).await;

    println!(
        "Generated {} documents in {}",
        report.generated.len(),
        output_dir.display()
    );
    if !report.all_succeeded() {
        bail!("{} documents failed: {}", report.failed.len(), report.failed.join(", "));
    }
    Ok(())
}
