//! Storage pages: index, per-pool detail, guest assignments

use std::path::PathBuf;

use async_trait::async_trait;
use pmx_api::PveApi;
use pmx_core::record::{self};
use pmx_core::{Result, StoragePool, format};
use pmx_redact::Redactor;

use crate::document::Document;
use crate::generator::DocGenerator;
use crate::generators::vm::disk_entries;
use crate::markdown::Markdown;

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct StorageIndex;

#[async_trait]
impl DocGenerator for StorageIndex {
    fn name(&self) -> String {
        "storage-index".to_string()
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("storage").join("index.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, _redactor: &Redactor) -> Result<Document> {
        let pools = api.storage_pools().await?;

        let mut md = Markdown::new();
        md.heading(1, "Storage Pools");
        md.paragraph(&format!("{} storage pool(s) defined.", pools.len()));

        let rows: Vec<Vec<String>> = pools
            .iter()
            .map(|pool| {
                vec![
                    record::display_key(pool, "storage"),
                    record::display_key(pool, "type"),
                    record::display_key(pool, "content"),
                    if record::flag(pool, "shared") { "yes" } else { "no" }.to_string(),
                    if record::flag(pool, "disable") { "no" } else { "yes" }.to_string(),
                    record::display_key(pool, "nodes"),
                ]
            })
            .collect();
        md.table(&["Storage", "Type", "Content", "Shared", "Enabled", "Nodes"], &rows);

        Ok(Document::new("Storage Pools", "Index of all storage pool definitions")
            .meta("section", "storage")
            .meta("total_pools", pools.len())
            .with_body(md.finish()))
    }
}

pub struct StoragePoolDoc {
    storage_id: String,
}

impl StoragePoolDoc {
    pub fn new(storage_id: &str) -> Self {
        Self {
            storage_id: storage_id.to_string(),
        }
    }
}

#[async_trait]
impl DocGenerator for StoragePoolDoc {
    fn name(&self) -> String {
        format!("storage-pool:{}", self.storage_id)
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("storage").join(format!(
            "{}.mdx",
            format::sanitize_filename(&self.storage_id)
        ))
    }

    async fn collect(&self, api: &dyn PveApi, _redactor: &Redactor) -> Result<Document> {
        let pools = api.storage_pools().await?;
        let definition = pools
            .iter()
            .find(|p| record::get_str(p, "storage") == Some(self.storage_id.as_str()))
            .cloned()
            .unwrap_or_default();

        let restricted_nodes = split_list(record::str_or(&definition, "nodes", ""));

        // Per-node usage comes from the node storage status endpoint
        let node_names: Vec<String> = api
            .nodes()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|n| record::get_str(n, "node").map(str::to_string))
            .collect();

        let mut usage_rows: Vec<Vec<String>> = Vec::new();
        let mut total_capacity = None;
        for node in &node_names {
            if !restricted_nodes.is_empty() && !restricted_nodes.contains(node) {
                continue;
            }
            let Ok(statuses) = api.node_storage(node).await else {
                continue;
            };
            let Some(status) = statuses
                .iter()
                .find(|s| record::get_str(s, "storage") == Some(self.storage_id.as_str()))
            else {
                continue;
            };
            let total = record::get_u64(status, "total");
            total_capacity = total_capacity.or(total);
            usage_rows.push(vec![
                node.clone(),
                format::format_bytes(total),
                format::format_bytes(record::get_u64(status, "used")),
                format::format_bytes(record::get_u64(status, "avail")),
                if record::flag(status, "active") { "yes" } else { "no" }.to_string(),
            ]);
        }

        let pool = StoragePool {
            storage_id: self.storage_id.clone(),
            storage_type: record::str_or(&definition, "type", "unknown").to_string(),
            path: record::get_str(&definition, "path").map(str::to_string),
            total_capacity,
            content_types: split_list(record::str_or(&definition, "content", "")),
            nodes: restricted_nodes,
            shared: record::flag(&definition, "shared"),
            enabled: !record::flag(&definition, "disable"),
        };

        let mut md = Markdown::new();
        md.heading(1, &format!("Storage: {}", pool.storage_id));
        md.field("Type", &pool.storage_type)
            .field("Path", pool.path.as_deref().unwrap_or(""))
            .field("Content types", &pool.content_types.join(", "))
            .field("Shared", if pool.shared { "yes" } else { "no" })
            .field("Enabled", if pool.enabled { "yes" } else { "no" })
            .field(
                "Restricted to nodes",
                &if pool.nodes.is_empty() {
                    "all nodes".to_string()
                } else {
                    pool.nodes.join(", ")
                },
            )
            .end_list();

        if !usage_rows.is_empty() {
            md.heading(2, "Usage");
            md.table(&["Node", "Total", "Used", "Available", "Active"], &usage_rows);
        }

        Ok(Document::new(
            format!("Storage: {}", pool.storage_id),
            format!("Details for storage pool {}", pool.storage_id),
        )
        .meta("section", "storage")
        .meta("storage", serde_json::to_value(&pool)?)
        .with_body(md.finish()))
    }
}

pub struct StorageAssignments;

#[async_trait]
impl DocGenerator for StorageAssignments {
    fn name(&self) -> String {
        "storage-assignments".to_string()
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("storage").join("assignments.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, _redactor: &Redactor) -> Result<Document> {
        let resources = api.cluster_resources(None).await?;

        // storage id -> (guest label, device, volume, size)
        let mut assignments: Vec<(String, String, String, String, String)> = Vec::new();

        for resource in &resources {
            let guest_type = record::str_or(resource, "type", "");
            if guest_type != "qemu" && guest_type != "lxc" {
                continue;
            }
            let (Some(node), Some(vmid)) = (
                record::get_str(resource, "node"),
                record::get_u64(resource, "vmid"),
            ) else {
                continue;
            };
            let label = format!(
                "{} {} ({})",
                if guest_type == "qemu" { "VM" } else { "CT" },
                vmid,
                record::str_or(resource, "name", "unnamed"),
            );

            let config = if guest_type == "qemu" {
                api.vm_config(node, vmid).await
            } else {
                api.container_config(node, vmid).await
            };
            // One unreachable guest must not sink the whole assignments page
            let Ok(config) = config else { continue };

            let mut entries = disk_entries(&config);
            if guest_type == "lxc" {
                if let Some(rootfs) = record::get_str(&config, "rootfs") {
                    entries.push(("rootfs".to_string(), rootfs));
                }
                for (key, _, value) in super::vm::numbered_keys(&config, "mp") {
                    entries.push((key, value));
                }
            }

            for (device, value) in entries {
                let parsed = pmx_parse::decode_disk(value);
                let Some(storage) = record::get_str(&parsed, "storage") else {
                    continue;
                };
                assignments.push((
                    storage.to_string(),
                    label.clone(),
                    device,
                    record::display_key(&parsed, "volume"),
                    record::display_key(&parsed, "size"),
                ));
            }
        }

        assignments.sort();

        let mut md = Markdown::new();
        md.heading(1, "Storage Assignments");
        md.paragraph("Which guests keep volumes on which storage pool.");

        let mut current_storage = String::new();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for (storage, label, device, volume, size) in &assignments {
            if storage != &current_storage {
                if !rows.is_empty() {
                    md.table(&["Guest", "Device", "Volume", "Size"], &rows);
                    rows.clear();
                }
                md.heading(2, storage);
                current_storage = storage.clone();
            }
            rows.push(vec![label.clone(), device.clone(), volume.clone(), size.clone()]);
        }
        if !rows.is_empty() {
            md.table(&["Guest", "Device", "Volume", "Size"], &rows);
        }
        if assignments.is_empty() {
            md.paragraph("No guest volumes found.");
        }

        Ok(Document::new("Storage Assignments", "Guest volume placement per storage pool")
            .meta("section", "storage")
            .with_body(md.finish()))
    }
}
