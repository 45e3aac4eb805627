//! Virtual machine pages: index, per-VM overview, network, storage

use std::path::PathBuf;

use async_trait::async_trait;
use pmx_api::PveApi;
use pmx_core::record::{self};
use pmx_core::{Record, Result, VirtualMachine, format};
use pmx_redact::Redactor;

use crate::document::Document;
use crate::generator::{DocGenerator, GuestRef};
use crate::markdown::Markdown;

/// Guest disk device prefixes ("scsi0", "virtio2", ...). "scsihw" and the
/// like are excluded by the numeric-suffix requirement.
const DISK_PREFIXES: [&str; 7] = [
    "virtio", "scsi", "sata", "ide", "efidisk", "tpmstate", "unused",
];

/// Config keys of the form `{prefix}{N}` with a string value, sorted by N.
pub(crate) fn numbered_keys<'a>(
    config: &'a Record,
    prefix: &str,
) -> Vec<(String, u64, &'a str)> {
    let mut keys: Vec<(String, u64, &str)> = config
        .iter()
        .filter_map(|(key, value)| {
            let suffix = key.strip_prefix(prefix)?;
            let n: u64 = suffix.parse().ok()?;
            let value = value.as_str()?;
            Some((key.clone(), n, value))
        })
        .collect();
    keys.sort_by_key(|(_, n, _)| *n);
    keys
}

/// All disk-like config entries, in device order.
pub(crate) fn disk_entries<'a>(config: &'a Record) -> Vec<(String, &'a str)> {
    let mut entries = Vec::new();
    for prefix in DISK_PREFIXES {
        for (key, _, value) in numbered_keys(config, prefix) {
            entries.push((key, value));
        }
    }
    entries
}

pub struct VmIndex;

#[async_trait]
impl DocGenerator for VmIndex {
    fn name(&self) -> String {
        "vm-index".to_string()
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("virtual-machines").join("index.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, _redactor: &Redactor) -> Result<Document> {
        // type=vm also returns containers; keep QEMU guests only
        let mut vms: Vec<Record> = api
            .cluster_resources(Some("vm"))
            .await?
            .into_iter()
            .filter(|r| record::get_str(r, "type") == Some("qemu"))
            .collect();
        vms.sort_by_key(|vm| {
            (
                record::str_or(vm, "node", "").to_string(),
                record::get_u64(vm, "vmid").unwrap_or(0),
            )
        });

        let mut md = Markdown::new();
        md.heading(1, "Virtual Machines");
        md.paragraph(&format!("{} virtual machine(s) across the cluster.", vms.len()));

        let mut current_node = String::new();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for vm in &vms {
            let node = record::str_or(vm, "node", "unknown");
            if node != current_node {
                if !rows.is_empty() {
                    md.table(&["VMID", "Name", "Status", "CPUs", "Memory"], &rows);
                    rows.clear();
                }
                md.heading(2, node);
                current_node = node.to_string();
            }
            rows.push(vec![
                record::display_key(vm, "vmid"),
                record::display_key(vm, "name"),
                record::display_key(vm, "status"),
                record::display_key(vm, "maxcpu"),
                format::format_bytes(record::get_u64(vm, "maxmem")),
            ]);
        }
        if !rows.is_empty() {
            md.table(&["VMID", "Name", "Status", "CPUs", "Memory"], &rows);
        }

        Ok(Document::new("Virtual Machines", "Index of all QEMU virtual machines")
            .meta("section", "virtual-machines")
            .meta("total_vms", vms.len())
            .with_body(md.finish()))
    }
}

pub struct VmOverview {
    guest: GuestRef,
}

impl VmOverview {
    pub fn new(guest: &GuestRef) -> Self {
        Self {
            guest: guest.clone(),
        }
    }
}

#[async_trait]
impl DocGenerator for VmOverview {
    fn name(&self) -> String {
        format!("vm-overview:{}", self.guest.vmid)
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("virtual-machines")
            .join(self.guest.dir_name())
            .join("overview.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, _redactor: &Redactor) -> Result<Document> {
        let config = api.vm_config(&self.guest.node, self.guest.vmid).await?;

        let agent = record::display_key(&config, "agent");
        let vm = VirtualMachine {
            vmid: self.guest.vmid,
            name: record::get_str(&config, "name")
                .map(str::to_string)
                .unwrap_or_else(|| format!("vm-{}", self.guest.vmid)),
            node: self.guest.node.clone(),
            description: record::get_str(&config, "description").map(str::to_string),
            cores: record::get_u64(&config, "cores"),
            sockets: record::get_u64(&config, "sockets"),
            cpu_type: Some(record::str_or(&config, "cpu", "kvm64").to_string()),
            memory: record::get_u64(&config, "memory"),
            ostype: record::get_str(&config, "ostype").map(str::to_string),
            boot_order: record::get_str(&config, "boot").map(str::to_string),
            bios: Some(record::str_or(&config, "bios", "seabios").to_string()),
            machine: record::get_str(&config, "machine").map(str::to_string),
            onboot: record::flag(&config, "onboot"),
            protection: record::flag(&config, "protection"),
            agent_enabled: agent.contains('1'),
            tags: pmx_parse::parse_tags(record::str_or(&config, "tags", "")),
        };

        let mut md = Markdown::new();
        md.heading(1, &format!("VM {} — {}", vm.vmid, vm.name));
        if let Some(desc) = &vm.description {
            md.paragraph(desc);
        }
        md.field("Node", &vm.node)
            .field(
                "CPU",
                &format!(
                    "{} core(s), {} socket(s), type {}",
                    vm.cores.unwrap_or(0),
                    vm.sockets.unwrap_or(1),
                    vm.cpu_type.as_deref().unwrap_or("kvm64")
                ),
            )
            .field("Memory", &format::format_memory_mb(vm.memory))
            .field("OS type", vm.ostype.as_deref().unwrap_or(""))
            .field("Boot order", vm.boot_order.as_deref().unwrap_or(""))
            .field("BIOS", vm.bios.as_deref().unwrap_or("seabios"))
            .field("Machine", vm.machine.as_deref().unwrap_or(""))
            .field("Start on boot", if vm.onboot { "yes" } else { "no" })
            .field("Protection", if vm.protection { "yes" } else { "no" })
            .field("Guest agent", if vm.agent_enabled { "enabled" } else { "disabled" })
            .end_list();

        if !vm.tags.is_empty() {
            md.field("Tags", &vm.tags.join(", ")).end_list();
        }

        Ok(Document::new(
            format!("VM {} — {}", vm.vmid, vm.name),
            format!("Configuration overview for virtual machine {}", vm.vmid),
        )
        .meta("section", "virtual-machines")
        .meta("vm", serde_json::to_value(&vm)?)
        .with_body(md.finish()))
    }
}

pub struct VmNetwork {
    guest: GuestRef,
}

impl VmNetwork {
    pub fn new(guest: &GuestRef) -> Self {
        Self {
            guest: guest.clone(),
        }
    }
}

#[async_trait]
impl DocGenerator for VmNetwork {
    fn name(&self) -> String {
        format!("vm-network:{}", self.guest.vmid)
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("virtual-machines")
            .join(self.guest.dir_name())
            .join("network.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, redactor: &Redactor) -> Result<Document> {
        let config = api.vm_config(&self.guest.node, self.guest.vmid).await?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (key, _, value) in numbered_keys(&config, "net") {
            let parsed = redactor.redact_network_interface(&pmx_parse::decode_network(value));
            rows.push(vec![
                key,
                record::display_key(&parsed, "model"),
                record::display_key(&parsed, "macaddr"),
                record::display_key(&parsed, "bridge"),
                record::display_key(&parsed, "tag"),
                record::display_key(&parsed, "firewall"),
            ]);
        }

        let mut md = Markdown::new();
        md.heading(1, &format!("VM {} Network", self.guest.vmid));
        if rows.is_empty() {
            md.paragraph("No network interfaces configured.");
        } else {
            md.table(&["Interface", "Model", "MAC Address", "Bridge", "VLAN Tag", "Firewall"], &rows);
        }

        Ok(Document::new(
            format!("VM {} Network", self.guest.vmid),
            format!("Network interfaces of virtual machine {}", self.guest.vmid),
        )
        .meta("section", "virtual-machines")
        .meta("vmid", self.guest.vmid)
        .with_body(md.finish()))
    }
}

pub struct VmStorage {
    guest: GuestRef,
}

impl VmStorage {
    pub fn new(guest: &GuestRef) -> Self {
        Self {
            guest: guest.clone(),
        }
    }
}

#[async_trait]
impl DocGenerator for VmStorage {
    fn name(&self) -> String {
        format!("vm-storage:{}", self.guest.vmid)
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("virtual-machines")
            .join(self.guest.dir_name())
            .join("storage.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, redactor: &Redactor) -> Result<Document> {
        let config = api.vm_config(&self.guest.node, self.guest.vmid).await?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (device, value) in disk_entries(&config) {
            let parsed = redactor.redact_disk_info(&pmx_parse::decode_disk(value));
            let options: Vec<String> = parsed
                .iter()
                .filter(|(k, _)| !matches!(k.as_str(), "storage" | "volume" | "size" | "media"))
                .map(|(k, v)| format!("{k}={}", record::display(v)))
                .collect();
            rows.push(vec![
                device,
                record::display_key(&parsed, "storage"),
                record::display_key(&parsed, "volume"),
                record::display_key(&parsed, "size"),
                record::display_key(&parsed, "media"),
                options.join(", "),
            ]);
        }

        let mut md = Markdown::new();
        md.heading(1, &format!("VM {} Storage", self.guest.vmid));
        if rows.is_empty() {
            md.paragraph("No disks configured.");
        } else {
            md.table(&["Device", "Storage", "Volume", "Size", "Media", "Options"], &rows);
        }

        Ok(Document::new(
            format!("VM {} Storage", self.guest.vmid),
            format!("Disk configuration of virtual machine {}", self.guest.vmid),
        )
        .meta("section", "virtual-machines")
        .meta("vmid", self.guest.vmid)
        .with_body(md.finish()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn config() -> Record {
        match json!({
            "name": "web01",
            "scsihw": "virtio-scsi-pci",
            "scsi0": "local-lvm:vm-100-disk-0,size=32G",
            "scsi1": "local-lvm:vm-100-disk-1,size=8G",
            "ide2": "local:iso/debian.iso,media=cdrom",
            "net0": "virtio=BC:24:11:2E:F4:A0,bridge=vmbr0",
            "net10": "virtio=BC:24:11:2E:F4:A1,bridge=vmbr1",
            "net2": "virtio=BC:24:11:2E:F4:A2,bridge=vmbr0",
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn numbered_keys_sort_numerically() {
        let keys: Vec<String> = numbered_keys(&config(), "net")
            .into_iter()
            .map(|(k, _, _)| k)
            .collect();
        assert_eq!(keys, vec!["net0", "net2", "net10"]);
    }

    #[test]
    fn disk_entries_skip_scsihw() {
        let devices: Vec<String> = disk_entries(&config()).into_iter().map(|(k, _)| k).collect();
        assert_eq!(devices, vec!["scsi0", "scsi1", "ide2"]);
    }
}
