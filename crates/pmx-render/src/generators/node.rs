//! Per-node pages: overview, hardware, network

use std::path::PathBuf;

use async_trait::async_trait;
use pmx_api::PveApi;
use pmx_core::record::{self};
use pmx_core::{NetworkInterface, NodeInfo, Record, Result, format};
use pmx_redact::Redactor;
use serde_json::Value;

use crate::document::Document;
use crate::generator::{DocGenerator, node_dir};
use crate::markdown::Markdown;

fn nested<'a>(record: &'a Record, key: &str) -> Option<&'a Record> {
    record.get(key).and_then(Value::as_object)
}

pub struct NodeOverview {
    node: String,
}

impl NodeOverview {
    pub fn new(node: &str) -> Self {
        Self {
            node: node.to_string(),
        }
    }
}

#[async_trait]
impl DocGenerator for NodeOverview {
    fn name(&self) -> String {
        format!("node-overview:{}", self.node)
    }

    fn output_path(&self) -> PathBuf {
        node_dir(&self.node).join("overview.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, _redactor: &Redactor) -> Result<Document> {
        let status = api.node_status(&self.node).await?;
        let config = api.node_config(&self.node).await.unwrap_or_default();
        let version = api.node_version(&self.node).await.unwrap_or_default();

        let cpuinfo = nested(&status, "cpuinfo");
        let memory_total = nested(&status, "memory").and_then(|m| record::get_u64(m, "total"));
        let rootfs = nested(&status, "rootfs");

        let info = NodeInfo {
            name: self.node.clone(),
            status: "online".to_string(),
            description: record::get_str(&config, "description").map(str::to_string),
            cpu_model: cpuinfo.and_then(|c| record::get_str(c, "model")).map(str::to_string),
            cpu_sockets: cpuinfo.and_then(|c| record::get_u64(c, "sockets")),
            cpu_cores: cpuinfo.and_then(|c| record::get_u64(c, "cores")),
            total_memory: memory_total,
            pve_version: record::get_str(&version, "version").map(str::to_string),
            kernel_version: record::get_str(&status, "kversion").map(str::to_string),
        };

        let mut md = Markdown::new();
        md.heading(1, &format!("Node {}", self.node));
        if let Some(desc) = &info.description {
            md.paragraph(desc);
        }
        md.field("CPU model", info.cpu_model.as_deref().unwrap_or(""))
            .field(
                "CPU topology",
                &match (info.cpu_sockets, info.cpu_cores) {
                    (Some(s), Some(c)) => format!("{s} socket(s), {c} core(s) each"),
                    _ => String::new(),
                },
            )
            .field("Memory", &format::format_bytes(info.total_memory))
            .field("Proxmox VE version", info.pve_version.as_deref().unwrap_or(""))
            .field("Kernel", info.kernel_version.as_deref().unwrap_or(""))
            .end_list();

        if let Some(rootfs) = rootfs {
            md.heading(2, "Root Filesystem");
            let free = record::get_u64(rootfs, "free").or_else(|| record::get_u64(rootfs, "avail"));
            md.field("Total", &format::format_bytes(record::get_u64(rootfs, "total")))
                .field("Used", &format::format_bytes(record::get_u64(rootfs, "used")))
                .field("Free", &format::format_bytes(free))
                .end_list();
        }

        Ok(Document::new(
            format!("Node {}", self.node),
            format!("Overview of cluster node {}", self.node),
        )
        .meta("section", "nodes")
        .meta("node", serde_json::to_value(&info)?)
        .with_body(md.finish()))
    }
}

pub struct NodeHardware {
    node: String,
}

impl NodeHardware {
    pub fn new(node: &str) -> Self {
        Self {
            node: node.to_string(),
        }
    }
}

#[async_trait]
impl DocGenerator for NodeHardware {
    fn name(&self) -> String {
        format!("node-hardware:{}", self.node)
    }

    fn output_path(&self) -> PathBuf {
        node_dir(&self.node).join("hardware.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, redactor: &Redactor) -> Result<Document> {
        let status = api.node_status(&self.node).await?;
        let disks = api.node_disks(&self.node).await.unwrap_or_default();
        let pci = api.node_pci(&self.node).await.unwrap_or_default();

        let mut md = Markdown::new();
        md.heading(1, &format!("{} Hardware", self.node));

        if let Some(cpuinfo) = nested(&status, "cpuinfo") {
            md.heading(2, "CPU");
            let flags = record::display_key(cpuinfo, "flags");
            md.field("Model", &record::display_key(cpuinfo, "model"))
                .field(
                    "Sockets / cores",
                    &format!(
                        "{} / {}",
                        record::display_key(cpuinfo, "sockets"),
                        record::display_key(cpuinfo, "cores")
                    ),
                )
                .field("Total threads", &record::display_key(cpuinfo, "cpus"))
                .field("MHz", &record::display_key(cpuinfo, "mhz"))
                .field("Flags", &redactor.redact_cpu_flags(&flags))
                .end_list();
        }

        if !disks.is_empty() {
            md.heading(2, "Disks");
            let rows: Vec<Vec<String>> = disks
                .iter()
                .map(|disk| {
                    let disk = redactor.redact_disk_info(disk);
                    vec![
                        record::display_key(&disk, "devpath"),
                        record::display_key(&disk, "model"),
                        format::format_bytes(record::get_u64(&disk, "size")),
                        record::display_key(&disk, "serial"),
                        record::display_key(&disk, "wwn"),
                        record::display_key(&disk, "type"),
                    ]
                })
                .collect();
            md.table(&["Device", "Model", "Size", "Serial", "WWN", "Type"], &rows);
        }

        if !pci.is_empty() {
            md.heading(2, "PCI Devices");
            let rows: Vec<Vec<String>> = pci
                .iter()
                .map(|dev| {
                    vec![
                        record::display_key(dev, "id"),
                        record::get_str(dev, "vendor_name")
                            .unwrap_or(record::str_or(dev, "vendor", ""))
                            .to_string(),
                        record::get_str(dev, "device_name")
                            .unwrap_or(record::str_or(dev, "device", ""))
                            .to_string(),
                    ]
                })
                .collect();
            md.table(&["ID", "Vendor", "Device"], &rows);
        }

        Ok(Document::new(
            format!("{} Hardware", self.node),
            format!("Hardware inventory for node {}", self.node),
        )
        .meta("section", "nodes")
        .meta("node_name", self.node.clone())
        .with_body(md.finish()))
    }
}

pub struct NodeNetwork {
    node: String,
}

impl NodeNetwork {
    pub fn new(node: &str) -> Self {
        Self {
            node: node.to_string(),
        }
    }
}

#[async_trait]
impl DocGenerator for NodeNetwork {
    fn name(&self) -> String {
        format!("node-network:{}", self.node)
    }

    fn output_path(&self) -> PathBuf {
        node_dir(&self.node).join("network.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, redactor: &Redactor) -> Result<Document> {
        let interfaces = api.node_network(&self.node).await?;
        let dns = api.node_dns(&self.node).await.unwrap_or_default();

        let redacted: Vec<NetworkInterface> = interfaces
            .iter()
            .map(|iface| NetworkInterface::from_record(&redactor.redact_network_interface(iface)))
            .collect();

        let mut md = Markdown::new();
        md.heading(1, &format!("{} Network", self.node));

        for (kind, title) in [
            ("eth", "Physical Interfaces"),
            ("bridge", "Bridges"),
            ("bond", "Bonds"),
            ("vlan", "VLAN Interfaces"),
        ] {
            let group: Vec<&NetworkInterface> = redacted
                .iter()
                .filter(|i| i.interface_type == kind)
                .collect();
            if group.is_empty() {
                continue;
            }
            md.heading(2, title);
            let rows: Vec<Vec<String>> = group
                .iter()
                .map(|i| {
                    vec![
                        i.iface.clone(),
                        if i.active { "yes" } else { "no" }.to_string(),
                        if i.autostart { "yes" } else { "no" }.to_string(),
                        i.address.clone().unwrap_or_default(),
                        i.gateway.clone().unwrap_or_default(),
                        i.bridge_ports
                            .clone()
                            .or_else(|| i.bond_slaves.clone())
                            .unwrap_or_default(),
                        i.comments.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            md.table(
                &["Interface", "Active", "Autostart", "Address", "Gateway", "Ports/Slaves", "Comment"],
                &rows,
            );
        }

        if !dns.is_empty() {
            md.heading(2, "DNS");
            md.field("Search domain", &record::display_key(&dns, "search"));
            for key in ["dns1", "dns2", "dns3"] {
                if let Some(server) = record::get_str(&dns, key) {
                    md.field("Nameserver", server);
                }
            }
            md.end_list();
        }

        Ok(Document::new(
            format!("{} Network", self.node),
            format!("Host network configuration for node {}", self.node),
        )
        .meta("section", "nodes")
        .meta("node_name", self.node.clone())
        .with_body(md.finish()))
    }
}
