//! Generator trait and run orchestration

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use pmx_api::PveApi;
use pmx_core::record::{self};
use pmx_core::{Record, Result, format};
use pmx_redact::Redactor;
use tracing::{error, info, warn};

use crate::document::Document;
use crate::generators::{cluster, container, network, node, reference, storage, vm};

/// One documentation page. Generators are planned up front from the
/// cluster inventory, then run sequentially; a failing generator never
/// aborts the run.
#[async_trait]
pub trait DocGenerator: Send + Sync {
    /// Generator name for logs and the failure report.
    fn name(&self) -> String;

    /// Output path relative to the output directory.
    fn output_path(&self) -> PathBuf;

    /// Fetch, decode, redact, and render this page.
    async fn collect(&self, api: &dyn PveApi, redactor: &Redactor) -> Result<Document>;
}

/// Outcome of a full generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub generated: Vec<PathBuf>,
    pub failed: Vec<String>,
}

impl GenerationReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs a planned set of generators against the API and writes the
/// document tree.
pub struct Renderer {
    output_dir: PathBuf,
    redactor: Arc<Redactor>,
}

impl Renderer {
    pub fn new(output_dir: impl Into<PathBuf>, redactor: Arc<Redactor>) -> Self {
        Self {
            output_dir: output_dir.into(),
            redactor,
        }
    }

    /// Build the generator list from the cluster inventory, mirroring the
    /// document tree: cluster overview, per-node pages, per-guest pages,
    /// storage, network, and reference sections. Sections whose listing
    /// fetch fails are skipped with a warning; a missing node list is
    /// fatal.
    pub async fn plan(&self, api: &dyn PveApi) -> Result<Vec<Box<dyn DocGenerator>>> {
        let mut generators: Vec<Box<dyn DocGenerator>> = Vec::new();

        generators.push(Box::new(cluster::ClusterOverview));

        let nodes = api.nodes().await?;
        let node_names: Vec<String> = nodes
            .iter()
            .filter_map(|n| record::get_str(n, "node").map(str::to_string))
            .collect();
        info!("found {} node(s): {}", node_names.len(), node_names.join(", "));

        for name in &node_names {
            generators.push(Box::new(node::NodeOverview::new(name)));
            generators.push(Box::new(node::NodeHardware::new(name)));
            generators.push(Box::new(node::NodeNetwork::new(name)));
        }

        let resources = match api.cluster_resources(None).await {
            Ok(resources) => resources,
            Err(e) => {
                warn!("failed to fetch cluster resources, skipping guest documentation: {e}");
                Vec::new()
            }
        };

        let vms = guests_of_type(&resources, "qemu");
        if !vms.is_empty() {
            info!("found {} VM(s)", vms.len());
            generators.push(Box::new(vm::VmIndex));
            for guest in &vms {
                generators.push(Box::new(vm::VmOverview::new(guest)));
                generators.push(Box::new(vm::VmNetwork::new(guest)));
                generators.push(Box::new(vm::VmStorage::new(guest)));
            }
        }

        let containers = guests_of_type(&resources, "lxc");
        if !containers.is_empty() {
            info!("found {} container(s)", containers.len());
            generators.push(Box::new(container::CtIndex));
            for guest in &containers {
                generators.push(Box::new(container::CtOverview::new(guest)));
                generators.push(Box::new(container::CtNetwork::new(guest)));
            }
        }

        match api.storage_pools().await {
            Ok(pools) => {
                let ids: Vec<String> = pools
                    .iter()
                    .filter_map(|p| record::get_str(p, "storage").map(str::to_string))
                    .collect();
                if !ids.is_empty() {
                    info!("found {} storage pool(s): {}", ids.len(), ids.join(", "));
                    generators.push(Box::new(storage::StorageIndex));
                    for id in ids {
                        generators.push(Box::new(storage::StoragePoolDoc::new(&id)));
                    }
                    generators.push(Box::new(storage::StorageAssignments));
                }
            }
            Err(e) => {
                warn!("failed to fetch storage list, skipping storage documentation: {e}");
            }
        }

        generators.push(Box::new(network::NetworkOverview));
        generators.push(Box::new(network::IpAddressing));
        generators.push(Box::new(network::Vlans));
        generators.push(Box::new(network::Sdn));

        generators.push(Box::new(reference::Firewall));
        generators.push(Box::new(reference::UsersPermissions));
        generators.push(Box::new(reference::BackupPolicies));
        generators.push(Box::new(reference::HighAvailability));

        Ok(generators)
    }

    /// Run all generators. Each document is collected, rendered with the
    /// disclosure note when any redaction rule is on, and written under
    /// the output directory.
    pub async fn run(
        &self,
        api: &dyn PveApi,
        generators: Vec<Box<dyn DocGenerator>>,
    ) -> GenerationReport {
        let summary = self.redactor.redaction_summary();
        let mut report = GenerationReport::default();

        for generator in generators {
            let name = generator.name();
            match self.generate_one(api, generator.as_ref(), &summary).await {
                Ok(path) => {
                    info!("generated {}", path.display());
                    report.generated.push(path);
                }
                Err(e) => {
                    error!("failed to generate {name}: {e}");
                    report.failed.push(name);
                }
            }
        }

        report
    }

    async fn generate_one(
        &self,
        api: &dyn PveApi,
        generator: &dyn DocGenerator,
        summary: &[&str],
    ) -> Result<PathBuf> {
        let document = generator.collect(api, self.redactor.as_ref()).await?;
        let content = document.render(summary)?;

        let path = self.output_dir.join(generator.output_path());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        Ok(path)
    }
}

/// Guest resources of one type, sorted by (node, vmid).
fn guests_of_type(resources: &[Record], guest_type: &str) -> Vec<GuestRef> {
    let mut guests: Vec<GuestRef> = resources
        .iter()
        .filter(|r| record::get_str(r, "type") == Some(guest_type))
        .filter_map(GuestRef::from_resource)
        .collect();
    guests.sort_by(|a, b| (&a.node, a.vmid).cmp(&(&b.node, b.vmid)));
    guests
}

/// Identity of one guest (VM or container) from the resource listing,
/// carried into the per-guest generators so output paths are stable.
#[derive(Debug, Clone)]
pub struct GuestRef {
    pub node: String,
    pub vmid: u64,
    pub name: String,
}

impl GuestRef {
    fn from_resource(resource: &Record) -> Option<Self> {
        let vmid = record::get_u64(resource, "vmid")?;
        let node = record::get_str(resource, "node")?.to_string();
        let name = record::get_str(resource, "name")
            .map(str::to_string)
            .unwrap_or_else(|| format!("guest-{vmid}"));
        Some(Self { node, vmid, name })
    }

    /// Per-guest directory name: `{vmid}-{sanitized name}`.
    pub fn dir_name(&self) -> String {
        format!("{}-{}", self.vmid, format::sanitize_filename(&self.name))
    }
}

/// Relative path helper for per-node pages.
pub fn node_dir(node: &str) -> PathBuf {
    Path::new("nodes").join(format::sanitize_filename(node))
}
