//! Cluster-wide network pages: overview, IP addressing, VLANs, SDN

use std::path::PathBuf;

use async_trait::async_trait;
use pmx_api::PveApi;
use pmx_core::record::{self};
use pmx_core::{NetworkInterface, Record, Result};
use pmx_redact::Redactor;

use crate::document::Document;
use crate::generator::DocGenerator;
use crate::generators::vm::numbered_keys;
use crate::markdown::Markdown;

/// Host interfaces of every node, redacted, with the owning node name.
async fn all_host_interfaces(
    api: &dyn PveApi,
    redactor: &Redactor,
) -> Result<Vec<(String, Record)>> {
    let nodes = api.nodes().await?;
    let mut interfaces = Vec::new();
    for node in &nodes {
        let Some(name) = record::get_str(node, "node") else {
            continue;
        };
        let Ok(node_ifaces) = api.node_network(name).await else {
            continue;
        };
        for iface in &node_ifaces {
            interfaces.push((name.to_string(), redactor.redact_network_interface(iface)));
        }
    }
    Ok(interfaces)
}

pub struct NetworkOverview;

#[async_trait]
impl DocGenerator for NetworkOverview {
    fn name(&self) -> String {
        "network-overview".to_string()
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("network").join("index.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, redactor: &Redactor) -> Result<Document> {
        let interfaces = all_host_interfaces(api, redactor).await?;

        let mut md = Markdown::new();
        md.heading(1, "Network Overview");

        for (kind, title) in [
            ("bridge", "Bridges"),
            ("bond", "Bonds"),
            ("eth", "Physical Interfaces"),
        ] {
            let rows: Vec<Vec<String>> = interfaces
                .iter()
                .filter(|(_, iface)| record::get_str(iface, "type") == Some(kind))
                .map(|(node, iface)| {
                    let typed = NetworkInterface::from_record(iface);
                    vec![
                        node.clone(),
                        typed.iface,
                        typed.address.unwrap_or_default(),
                        typed
                            .bridge_ports
                            .or(typed.bond_slaves)
                            .unwrap_or_default(),
                        if typed.active { "yes" } else { "no" }.to_string(),
                        typed.comments.unwrap_or_default(),
                    ]
                })
                .collect();
            if rows.is_empty() {
                continue;
            }
            md.heading(2, title);
            md.table(&["Node", "Interface", "Address", "Ports/Slaves", "Active", "Comment"], &rows);
        }

        Ok(Document::new("Network Overview", "Host networking across all nodes")
            .meta("section", "network")
            .with_body(md.finish()))
    }
}

pub struct IpAddressing;

#[async_trait]
impl DocGenerator for IpAddressing {
    fn name(&self) -> String {
        "ip-addressing".to_string()
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("network").join("ip-addressing.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, redactor: &Redactor) -> Result<Document> {
        let interfaces = all_host_interfaces(api, redactor).await?;

        let mut host_rows: Vec<Vec<String>> = Vec::new();
        for (node, iface) in &interfaces {
            for addr_key in ["address", "address6"] {
                if let Some(address) = record::get_str(iface, addr_key) {
                    host_rows.push(vec![
                        node.clone(),
                        record::display_key(iface, "iface"),
                        address.to_string(),
                        record::display_key(iface, "netmask"),
                        record::display_key(iface, "gateway"),
                    ]);
                }
            }
        }

        // Static guest addresses from the NIC config strings
        let mut guest_rows: Vec<Vec<String>> = Vec::new();
        let resources = api.cluster_resources(None).await.unwrap_or_default();
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
            let config = if guest_type == "qemu" {
                api.vm_config(node, vmid).await
            } else {
                api.container_config(node, vmid).await
            };
            let Ok(config) = config else { continue };

            for (key, _, value) in numbered_keys(&config, "net") {
                let parsed = pmx_parse::decode_ct_network(value);
                let Some(ip) = record::get_str(&parsed, "ip") else {
                    continue;
                };
                guest_rows.push(vec![
                    format!(
                        "{} {} ({})",
                        if guest_type == "qemu" { "VM" } else { "CT" },
                        vmid,
                        record::str_or(resource, "name", "unnamed"),
                    ),
                    key,
                    ip.to_string(),
                    record::display_key(&parsed, "gw"),
                    record::display_key(&parsed, "bridge"),
                ]);
            }
        }

        let mut md = Markdown::new();
        md.heading(1, "IP Addressing");

        if !host_rows.is_empty() {
            md.heading(2, "Host Addresses");
            md.table(&["Node", "Interface", "Address", "Netmask", "Gateway"], &host_rows);
        }
        if !guest_rows.is_empty() {
            md.heading(2, "Guest Static Addresses");
            md.table(&["Guest", "Interface", "IP", "Gateway", "Bridge"], &guest_rows);
        }
        if host_rows.is_empty() && guest_rows.is_empty() {
            md.paragraph("No addresses found.");
        }

        Ok(Document::new("IP Addressing", "Address plan for hosts and guests")
            .meta("section", "network")
            .with_body(md.finish()))
    }
}

pub struct Vlans;

#[async_trait]
impl DocGenerator for Vlans {
    fn name(&self) -> String {
        "vlans".to_string()
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("network").join("vlans.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, redactor: &Redactor) -> Result<Document> {
        let interfaces = all_host_interfaces(api, redactor).await?;

        let rows: Vec<Vec<String>> = interfaces
            .iter()
            .filter(|(_, iface)| {
                record::get_str(iface, "type") == Some("vlan")
                    || iface.contains_key("vlan-id")
            })
            .map(|(node, iface)| {
                vec![
                    node.clone(),
                    record::display_key(iface, "iface"),
                    record::display_key(iface, "vlan-id"),
                    record::display_key(iface, "vlan-raw-device"),
                    record::display_key(iface, "address"),
                    record::display_key(iface, "comments"),
                ]
            })
            .collect();

        let mut md = Markdown::new();
        md.heading(1, "VLANs");
        if rows.is_empty() {
            md.paragraph("No VLAN interfaces configured.");
        } else {
            md.table(&["Node", "Interface", "VLAN ID", "Raw Device", "Address", "Comment"], &rows);
        }

        Ok(Document::new("VLANs", "VLAN interfaces across all nodes")
            .meta("section", "network")
            .with_body(md.finish()))
    }
}

pub struct Sdn;

#[async_trait]
impl DocGenerator for Sdn {
    fn name(&self) -> String {
        "sdn".to_string()
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("network").join("sdn.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, _redactor: &Redactor) -> Result<Document> {
        // SDN endpoints 404 on clusters without the feature
        let zones = api.sdn_zones().await.unwrap_or_default();
        let vnets = api.sdn_vnets().await.unwrap_or_default();

        let mut md = Markdown::new();
        md.heading(1, "Software-Defined Networking");

        if zones.is_empty() && vnets.is_empty() {
            md.paragraph("SDN is not configured on this cluster.");
        }

        if !zones.is_empty() {
            md.heading(2, "Zones");
            let rows: Vec<Vec<String>> = zones
                .iter()
                .map(|zone| {
                    vec![
                        record::display_key(zone, "zone"),
                        record::display_key(zone, "type"),
                        record::display_key(zone, "bridge"),
                        record::display_key(zone, "nodes"),
                    ]
                })
                .collect();
            md.table(&["Zone", "Type", "Bridge", "Nodes"], &rows);
        }

        if !vnets.is_empty() {
            md.heading(2, "VNets");
            let rows: Vec<Vec<String>> = vnets
                .iter()
                .map(|vnet| {
                    vec![
                        record::display_key(vnet, "vnet"),
                        record::display_key(vnet, "zone"),
                        record::display_key(vnet, "tag"),
                        record::display_key(vnet, "alias"),
                    ]
                })
                .collect();
            md.table(&["VNet", "Zone", "Tag", "Alias"], &rows);
        }

        Ok(Document::new("Software-Defined Networking", "SDN zones and virtual networks")
            .meta("section", "network")
            .with_body(md.finish()))
    }
}
