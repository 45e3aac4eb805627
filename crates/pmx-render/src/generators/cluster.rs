//! Cluster overview page

use std::path::PathBuf;

use async_trait::async_trait;
use pmx_api::PveApi;
use pmx_core::record::{self};
use pmx_core::{ClusterInfo, Result};
use pmx_redact::Redactor;

use crate::document::Document;
use crate::generator::DocGenerator;
use crate::markdown::Markdown;

pub struct ClusterOverview;

#[async_trait]
impl DocGenerator for ClusterOverview {
    fn name(&self) -> String {
        "cluster-overview".to_string()
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("index.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, _redactor: &Redactor) -> Result<Document> {
        let status = api.cluster_status().await?;
        let resources = api.cluster_resources(None).await?;
        let version = api.version().await.unwrap_or_default();

        // Standalone hosts have no cluster entry in the status list
        let mut cluster_name = "Proxmox Cluster".to_string();
        let mut quorum = false;
        for item in &status {
            if record::get_str(item, "type") == Some("cluster") {
                if let Some(name) = record::get_str(item, "name") {
                    cluster_name = name.to_string();
                }
                quorum = record::flag(item, "quorum");
            }
        }

        let nodes: Vec<_> = resources
            .iter()
            .filter(|r| record::get_str(r, "type") == Some("node"))
            .collect();
        let online_nodes = nodes
            .iter()
            .filter(|n| record::get_str(n, "status") == Some("online"))
            .count();
        let total_vms = resources
            .iter()
            .filter(|r| record::get_str(r, "type") == Some("qemu"))
            .count();
        let total_containers = resources
            .iter()
            .filter(|r| record::get_str(r, "type") == Some("lxc"))
            .count();
        let storage_count = resources
            .iter()
            .filter(|r| record::get_str(r, "type") == Some("storage"))
            .count();

        let info = ClusterInfo {
            name: cluster_name.clone(),
            quorum,
            nodes: nodes.len(),
            version: record::get_str(&version, "version").map(str::to_string),
            total_vms,
            total_containers,
            online_nodes,
            offline_nodes: nodes.len() - online_nodes,
        };

        let mut md = Markdown::new();
        md.heading(1, &cluster_name);
        md.field("Quorum", if info.quorum { "established" } else { "no quorum" })
            .field("Proxmox VE version", info.version.as_deref().unwrap_or(""))
            .field(
                "Nodes",
                &format!("{} ({} online, {} offline)", info.nodes, info.online_nodes, info.offline_nodes),
            )
            .field("Virtual machines", &info.total_vms.to_string())
            .field("Containers", &info.total_containers.to_string())
            .field("Storage pools", &storage_count.to_string())
            .end_list();

        md.heading(2, "Nodes");
        let rows: Vec<Vec<String>> = nodes
            .iter()
            .map(|n| {
                vec![
                    record::display_key(n, "node"),
                    record::display_key(n, "status"),
                    record::get_u64(n, "maxcpu").map(|c| c.to_string()).unwrap_or_default(),
                    pmx_core::format::format_bytes(record::get_u64(n, "maxmem")),
                ]
            })
            .collect();
        md.table(&["Node", "Status", "CPUs", "Memory"], &rows);

        Ok(Document::new("Cluster Overview", format!("Infrastructure overview for {cluster_name}"))
            .meta("section", "cluster")
            .meta("cluster", serde_json::to_value(&info)?)
            .with_body(md.finish()))
    }
}
