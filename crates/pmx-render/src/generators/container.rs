//! Container pages: index, per-CT overview, network

use std::path::PathBuf;

use async_trait::async_trait;
use pmx_api::PveApi;
use pmx_core::record::{self};
use pmx_core::{Container, Record, Result, format};
use pmx_redact::Redactor;

use crate::document::Document;
use crate::generator::{DocGenerator, GuestRef};
use crate::generators::vm::numbered_keys;
use crate::markdown::Markdown;

pub struct CtIndex;

#[async_trait]
impl DocGenerator for CtIndex {
    fn name(&self) -> String {
        "container-index".to_string()
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("containers").join("index.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, _redactor: &Redactor) -> Result<Document> {
        let mut containers: Vec<Record> = api.cluster_resources(Some("lxc")).await?;
        containers.sort_by_key(|ct| {
            (
                record::str_or(ct, "node", "").to_string(),
                record::get_u64(ct, "vmid").unwrap_or(0),
            )
        });

        let mut md = Markdown::new();
        md.heading(1, "Containers");
        md.paragraph(&format!("{} LXC container(s) across the cluster.", containers.len()));

        let rows: Vec<Vec<String>> = containers
            .iter()
            .map(|ct| {
                vec![
                    record::display_key(ct, "vmid"),
                    record::display_key(ct, "name"),
                    record::display_key(ct, "status"),
                    record::display_key(ct, "node"),
                    record::display_key(ct, "maxcpu"),
                    format::format_bytes(record::get_u64(ct, "maxmem")),
                ]
            })
            .collect();
        md.table(&["VMID", "Hostname", "Status", "Node", "CPUs", "Memory"], &rows);

        Ok(Document::new("Containers", "Index of all LXC containers")
            .meta("section", "containers")
            .meta("total_containers", containers.len())
            .with_body(md.finish()))
    }
}

pub struct CtOverview {
    guest: GuestRef,
}

impl CtOverview {
    pub fn new(guest: &GuestRef) -> Self {
        Self {
            guest: guest.clone(),
        }
    }
}

#[async_trait]
impl DocGenerator for CtOverview {
    fn name(&self) -> String {
        format!("container-overview:{}", self.guest.vmid)
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("containers")
            .join(self.guest.dir_name())
            .join("overview.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, _redactor: &Redactor) -> Result<Document> {
        let config = api.container_config(&self.guest.node, self.guest.vmid).await?;

        let ct = Container {
            vmid: self.guest.vmid,
            hostname: record::get_str(&config, "hostname")
                .map(str::to_string)
                .unwrap_or_else(|| format!("ct-{}", self.guest.vmid)),
            node: self.guest.node.clone(),
            description: record::get_str(&config, "description").map(str::to_string),
            cores: record::get_u64(&config, "cores"),
            memory: record::get_u64(&config, "memory"),
            swap: record::get_u64(&config, "swap"),
            ostype: record::get_str(&config, "ostype").map(str::to_string),
            arch: record::get_str(&config, "arch").map(str::to_string),
            unprivileged: record::flag(&config, "unprivileged"),
            onboot: record::flag(&config, "onboot"),
            protection: record::flag(&config, "protection"),
            tags: pmx_parse::parse_tags(record::str_or(&config, "tags", "")),
        };

        let mut md = Markdown::new();
        md.heading(1, &format!("CT {} — {}", ct.vmid, ct.hostname));
        if let Some(desc) = &ct.description {
            md.paragraph(desc);
        }
        md.field("Node", &ct.node)
            .field("Cores", &ct.cores.map(|c| c.to_string()).unwrap_or_default())
            .field("Memory", &format::format_memory_mb(ct.memory))
            .field("Swap", &format::format_memory_mb(ct.swap))
            .field("OS type", ct.ostype.as_deref().unwrap_or(""))
            .field("Architecture", ct.arch.as_deref().unwrap_or(""))
            .field("Unprivileged", if ct.unprivileged { "yes" } else { "no" })
            .field("Start on boot", if ct.onboot { "yes" } else { "no" })
            .field("Protection", if ct.protection { "yes" } else { "no" })
            .end_list();

        if !ct.tags.is_empty() {
            md.field("Tags", &ct.tags.join(", ")).end_list();
        }

        // Root filesystem and mount points share the disk-string grammar
        let mut rows: Vec<Vec<String>> = Vec::new();
        if let Some(rootfs) = record::get_str(&config, "rootfs") {
            let parsed = pmx_parse::decode_disk(rootfs);
            rows.push(vec![
                "rootfs".to_string(),
                record::display_key(&parsed, "storage"),
                record::display_key(&parsed, "volume"),
                "/".to_string(),
                record::display_key(&parsed, "size"),
            ]);
        }
        for (key, _, value) in numbered_keys(&config, "mp") {
            let parsed = pmx_parse::decode_disk(value);
            rows.push(vec![
                key,
                record::display_key(&parsed, "storage"),
                record::display_key(&parsed, "volume"),
                record::display_key(&parsed, "mp"),
                record::display_key(&parsed, "size"),
            ]);
        }
        if !rows.is_empty() {
            md.heading(2, "Filesystems");
            md.table(&["Mount", "Storage", "Volume", "Path", "Size"], &rows);
        }

        Ok(Document::new(
            format!("CT {} — {}", ct.vmid, ct.hostname),
            format!("Configuration overview for container {}", ct.vmid),
        )
        .meta("section", "containers")
        .meta("container", serde_json::to_value(&ct)?)
        .with_body(md.finish()))
    }
}

pub struct CtNetwork {
    guest: GuestRef,
}

impl CtNetwork {
    pub fn new(guest: &GuestRef) -> Self {
        Self {
            guest: guest.clone(),
        }
    }
}

#[async_trait]
impl DocGenerator for CtNetwork {
    fn name(&self) -> String {
        format!("container-network:{}", self.guest.vmid)
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("containers")
            .join(self.guest.dir_name())
            .join("network.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, redactor: &Redactor) -> Result<Document> {
        let config = api.container_config(&self.guest.node, self.guest.vmid).await?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (key, _, value) in numbered_keys(&config, "net") {
            let parsed = redactor.redact_network_interface(&pmx_parse::decode_ct_network(value));
            rows.push(vec![
                key,
                record::display_key(&parsed, "name"),
                record::display_key(&parsed, "bridge"),
                record::display_key(&parsed, "hwaddr"),
                record::display_key(&parsed, "ip"),
                record::display_key(&parsed, "gw"),
                record::display_key(&parsed, "firewall"),
            ]);
        }

        let mut md = Markdown::new();
        md.heading(1, &format!("CT {} Network", self.guest.vmid));
        if rows.is_empty() {
            md.paragraph("No network interfaces configured.");
        } else {
            md.table(
                &["Interface", "Name", "Bridge", "MAC Address", "IP", "Gateway", "Firewall"],
                &rows,
            );
        }

        Ok(Document::new(
            format!("CT {} Network", self.guest.vmid),
            format!("Network interfaces of container {}", self.guest.vmid),
        )
        .meta("section", "containers")
        .meta("vmid", self.guest.vmid)
        .with_body(md.finish()))
    }
}
