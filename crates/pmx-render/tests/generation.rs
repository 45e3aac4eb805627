//! End-to-end generation against a fixture API: plan the document tree for
//! a small cluster, run it into a temp directory, and check the written
//! files and redaction behavior.

use std::sync::Arc;

use async_trait::async_trait;
use pmx_api::PveApi;
use pmx_core::Result;
use pmx_redact::{RedactionPolicy, Redactor};
use pmx_render::Renderer;
use serde_json::{Value, json};

struct FixtureCluster;

#[async_trait]
impl PveApi for FixtureCluster {
    async fn get(&self, path: &str) -> Result<Value> {
        let data = match path {
            "/version" => json!({"version": "8.2.4", "release": "8.2"}),
            "/cluster/status" => json!([
                {"type": "cluster", "name": "testlab", "quorum": 1},
                {"type": "node", "name": "pve1", "online": 1}
            ]),
            "/nodes" => json!([{"node": "pve1", "status": "online"}]),
            "/cluster/resources" | "/cluster/resources?type=vm" => json!([
                {"type": "qemu", "vmid": 100, "name": "web", "node": "pve1", "status": "running"},
                {"type": "lxc", "vmid": 200, "name": "db", "node": "pve1", "status": "running"}
            ]),
            "/cluster/resources?type=lxc" => json!([
                {"type": "lxc", "vmid": 200, "name": "db", "node": "pve1", "status": "running"}
            ]),
            "/storage" => json!([
                {"storage": "local", "type": "dir", "path": "/var/lib/vz",
                 "content": "images,rootdir", "enabled": 1}
            ]),
            "/nodes/pve1/status" => json!({
                "cpuinfo": {"model": "AMD EPYC 7302", "sockets": 1, "cores": 16,
                            "flags": "fpu vme sev sev-es"},
                "memory": {"total": 68719476736u64, "used": 17179869184u64},
                "kversion": "Linux 6.8.12-1-pve"
            }),
            "/nodes/pve1/network" => json!([
                {"iface": "vmbr0", "type": "bridge", "address": "192.168.1.10",
                 "netmask": "255.255.255.0", "gateway": "192.168.1.1",
                 "bridge_ports": "eno1", "active": 1},
                {"iface": "eno1", "type": "eth", "active": 1}
            ]),
            "/nodes/pve1/disks/list" => json!([
                {"devpath": "/dev/sda", "model": "Samsung SSD 870", "size": 1000204886016u64,
                 "serial": "S5Y1NG0N123456", "wwn": "0x5002538f12345678", "type": "ssd"}
            ]),
            "/nodes/pve1/storage" => json!([
                {"storage": "local", "type": "dir", "total": 536870912000u64,
                 "used": 107374182400u64, "avail": 429496729600u64, "active": 1}
            ]),
            "/nodes/pve1/qemu/100/config" => json!({
                "name": "web", "cores": 2, "memory": 2048, "ostype": "l26",
                "net0": "virtio=AA:BB:CC:DD:EE:FF,bridge=vmbr0,firewall=1",
                "scsi0": "local:vm-100-disk-0,size=32G,ssd=1"
            }),
            "/nodes/pve1/lxc/200/config" => json!({
                "hostname": "db", "cores": 1, "memory": 1024, "ostype": "debian",
                "rootfs": "local:subvol-200-disk-0,size=8G",
                "net0": "name=eth0,bridge=vmbr0,hwaddr=DE:AD:BE:EF:00:01,ip=10.0.0.5/24,gw=10.0.0.1"
            }),
            "/access/users" => json!([
                {"userid": "alice@pve", "email": "alice@example.com", "enable": 1},
                {"userid": "root@pam", "enable": 1}
            ]),
            "/access/users/alice@pve/token" => json!([
                {"tokenid": "automation", "privsep": 1}
            ]),
            "/access/users/root@pam/token" => json!([]),
            // Everything else is empty: Null decodes as an empty record or
            // list, matching a cluster without the feature.
            _ => Value::Null,
        };
        Ok(data)
    }
}

async fn generate(policy: RedactionPolicy) -> (tempfile::TempDir, pmx_render::GenerationReport) {
    let dir = tempfile::tempdir().unwrap();
    let renderer = Renderer::new(dir.path(), Arc::new(Redactor::new(policy)));
    let generators = renderer.plan(&FixtureCluster).await.unwrap();
    let report = renderer.run(&FixtureCluster, generators).await;
    (dir, report)
}

fn read(dir: &tempfile::TempDir, rel: &str) -> String {
    std::fs::read_to_string(dir.path().join(rel)).unwrap()
}

#[tokio::test]
async fn full_tree_is_written() {
    let (dir, report) = generate(RedactionPolicy::default()).await;
    assert!(report.all_succeeded(), "failed: {:?}", report.failed);

    for rel in [
        "index.mdx",
        "nodes/pve1/overview.mdx",
        "nodes/pve1/hardware.mdx",
        "nodes/pve1/network.mdx",
        "virtual-machines/index.mdx",
        "virtual-machines/100-web/overview.mdx",
        "virtual-machines/100-web/network.mdx",
        "virtual-machines/100-web/storage.mdx",
        "containers/index.mdx",
        "containers/200-db/overview.mdx",
        "containers/200-db/network.mdx",
        "storage/index.mdx",
        "storage/local.mdx",
        "storage/assignments.mdx",
        "network/index.mdx",
        "network/ip-addressing.mdx",
        "network/vlans.mdx",
        "network/sdn.mdx",
        "reference/firewall.mdx",
        "reference/users-permissions.mdx",
        "reference/backup-policies.mdx",
        "reference/high-availability.mdx",
    ] {
        assert!(dir.path().join(rel).is_file(), "missing {rel}");
    }

    let index = read(&dir, "index.mdx");
    assert!(index.starts_with("---\n"));
    assert!(index.contains("title: Cluster Overview"));
    assert!(index.contains("testlab"));
    assert!(!index.contains("Redacted for public documentation"));

    let ct_index = read(&dir, "containers/index.mdx");
    assert!(ct_index.contains("1 LXC container(s)"));
    assert!(ct_index.contains("db"));
}

#[tokio::test]
async fn unredacted_output_keeps_real_values() {
    let (dir, report) = generate(RedactionPolicy::default()).await;
    assert!(report.all_succeeded());

    assert!(read(&dir, "virtual-machines/100-web/network.mdx").contains("AA:BB:CC:DD:EE:FF"));
    assert!(read(&dir, "nodes/pve1/hardware.mdx").contains("S5Y1NG0N123456"));
    assert!(read(&dir, "reference/users-permissions.mdx").contains("alice@example.com"));
}

#[tokio::test]
async fn redact_all_replaces_sensitive_values() {
    let (dir, report) = generate(RedactionPolicy::redact_all()).await;
    assert!(report.all_succeeded(), "failed: {:?}", report.failed);

    let vm_net = read(&dir, "virtual-machines/100-web/network.mdx");
    assert!(vm_net.contains("XX:XX:XX:XX:XX:XX"));
    assert!(!vm_net.contains("AA:BB:CC:DD:EE:FF"));
    assert!(vm_net.ends_with(".*\n"), "disclosure note missing");

    let ct_net = read(&dir, "containers/200-db/network.mdx");
    assert!(!ct_net.contains("DE:AD:BE:EF:00:01"));

    let hardware = read(&dir, "nodes/pve1/hardware.mdx");
    assert!(!hardware.contains("S5Y1NG0N123456"));
    assert!(!hardware.contains("0x5002538f12345678"));
    assert!(hardware.contains("REDACTED"));
    assert!(hardware.contains("Available (details redacted for public documentation)"));
    assert!(!hardware.contains("sev-es"));

    let users = read(&dir, "reference/users-permissions.mdx");
    assert!(!users.contains("alice@"));
    assert!(users.contains("user1@pve"));
    assert!(users.contains("root@pam"));
    assert!(users.contains("| REDACTED |"), "token id and email should be sentinels");
}

#[tokio::test]
async fn guest_static_ips_appear_in_addressing_page() {
    let (dir, _) = generate(RedactionPolicy::default()).await;
    let addressing = read(&dir, "network/ip-addressing.mdx");
    assert!(addressing.contains("10.0.0.5/24"));
    assert!(addressing.contains("CT 200 (db)"));
    assert!(addressing.contains("192.168.1.10"));
}
