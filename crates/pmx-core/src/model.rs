//! Domain models for Proxmox resources

use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Cluster-wide summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub name: String,
    pub quorum: bool,
    pub nodes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub total_vms: usize,
    pub total_containers: usize,
    pub online_nodes: usize,
    pub offline_nodes: usize,
}

/// One cluster node.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NodeInfo {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_sockets: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_cores: Option<u64>,
    /// Total memory in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_memory: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pve_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel_version: Option<String>,
}

/// One QEMU virtual machine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VirtualMachine {
    pub vmid: u64,
    pub name: String,
    pub node: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sockets: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_type: Option<String>,
    /// Memory in MB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ostype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bios: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machine: Option<String>,
    pub onboot: bool,
    pub protection: bool,
    pub agent_enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// One LXC container.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Container {
    pub vmid: u64,
    pub hostname: String,
    pub node: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<u64>,
    /// Memory in MB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    /// Swap in MB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ostype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    pub unprivileged: bool,
    pub onboot: bool,
    pub protection: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// One storage pool definition.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoragePool {
    pub storage_id: String,
    pub storage_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Total capacity in bytes, when a node reports usage for the pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_capacity: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<String>,
    pub shared: bool,
    pub enabled: bool,
}

/// One host network interface, as extracted from `/nodes/{node}/network`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkInterface {
    pub iface: String,
    #[serde(rename = "type")]
    pub interface_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge_ports: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bond_slaves: Option<String>,
    #[serde(rename = "vlan-id", skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u64>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub autostart: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl NetworkInterface {
    /// Typed view over a raw interface record. Best-effort: unknown keys are
    /// ignored, missing keys become defaults.
    pub fn from_record(record: &Record) -> Self {
        use crate::record as rec;
        Self {
            iface: rec::str_or(record, "iface", "").to_string(),
            interface_type: rec::str_or(record, "type", "unknown").to_string(),
            address: rec::get_str(record, "address").map(str::to_string),
            netmask: rec::get_str(record, "netmask").map(str::to_string),
            gateway: rec::get_str(record, "gateway").map(str::to_string),
            bridge_ports: rec::get_str(record, "bridge_ports").map(str::to_string),
            bond_slaves: rec::get_str(record, "slaves").map(str::to_string),
            vlan_id: rec::get_u64(record, "vlan-id"),
            mtu: rec::get_u64(record, "mtu"),
            active: rec::flag(record, "active"),
            autostart: rec::flag(record, "autostart"),
            comments: rec::get_str(record, "comments").map(str::to_string),
        }
    }
}
