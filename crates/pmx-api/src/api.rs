//! The `PveApi` trait and typed endpoint helpers

use async_trait::async_trait;
use pmx_core::{Error, Record, Result};
use serde_json::Value;

/// Interpret an endpoint's `data` payload as a list of records.
fn as_list(endpoint: &str, data: Value) -> Result<Vec<Record>> {
    match data {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(Error::Api {
            endpoint: endpoint.to_string(),
            reason: format!("expected a list, got {other}"),
        }),
    }
}

/// Interpret an endpoint's `data` payload as a single record.
fn as_object(endpoint: &str, data: Value) -> Result<Record> {
    match data {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Record::new()),
        other => Err(Error::Api {
            endpoint: endpoint.to_string(),
            reason: format!("expected an object, got {other}"),
        }),
    }
}

/// Read access to the PVE management API.
///
/// Only `get` is required; the typed helpers unwrap the response into
/// records. All helpers are read-only GETs — documentation generation never
/// mutates the cluster.
#[async_trait]
pub trait PveApi: Send + Sync {
    /// Raw GET. `path` is relative to `/api2/json`; the returned value is
    /// the unwrapped `data` field of the response envelope.
    async fn get(&self, path: &str) -> Result<Value>;

    /// PVE version of the host answering the API.
    async fn version(&self) -> Result<Record> {
        as_object("/version", self.get("/version").await?)
    }

    /// Cluster membership and quorum state.
    async fn cluster_status(&self) -> Result<Vec<Record>> {
        as_list("/cluster/status", self.get("/cluster/status").await?)
    }

    async fn nodes(&self) -> Result<Vec<Record>> {
        as_list("/nodes", self.get("/nodes").await?)
    }

    /// Storage pool definitions (datacenter scope).
    async fn storage_pools(&self) -> Result<Vec<Record>> {
        as_list("/storage", self.get("/storage").await?)
    }

    /// Cluster resources, optionally filtered by type (`vm`, `lxc`,
    /// `node`, `storage`).
    async fn cluster_resources(&self, resource_type: Option<&str>) -> Result<Vec<Record>> {
        let path = match resource_type {
            Some(t) => format!("/cluster/resources?type={t}"),
            None => "/cluster/resources".to_string(),
        };
        as_list(&path, self.get(&path).await?)
    }

    async fn node_config(&self, node: &str) -> Result<Record> {
        let path = format!("/nodes/{node}/config");
        as_object(&path, self.get(&path).await?)
    }

    async fn node_status(&self, node: &str) -> Result<Record> {
        let path = format!("/nodes/{node}/status");
        as_object(&path, self.get(&path).await?)
    }

    async fn node_version(&self, node: &str) -> Result<Record> {
        let path = format!("/nodes/{node}/version");
        as_object(&path, self.get(&path).await?)
    }

    async fn node_network(&self, node: &str) -> Result<Vec<Record>> {
        let path = format!("/nodes/{node}/network");
        as_list(&path, self.get(&path).await?)
    }

    async fn node_storage(&self, node: &str) -> Result<Vec<Record>> {
        let path = format!("/nodes/{node}/storage");
        as_list(&path, self.get(&path).await?)
    }

    async fn node_dns(&self, node: &str) -> Result<Record> {
        let path = format!("/nodes/{node}/dns");
        as_object(&path, self.get(&path).await?)
    }

    /// Physical disks of a node, including serials and WWNs.
    async fn node_disks(&self, node: &str) -> Result<Vec<Record>> {
        let path = format!("/nodes/{node}/disks/list");
        as_list(&path, self.get(&path).await?)
    }

    async fn node_pci(&self, node: &str) -> Result<Vec<Record>> {
        let path = format!("/nodes/{node}/hardware/pci");
        as_list(&path, self.get(&path).await?)
    }

    async fn vm_config(&self, node: &str, vmid: u64) -> Result<Record> {
        let path = format!("/nodes/{node}/qemu/{vmid}/config");
        as_object(&path, self.get(&path).await?)
    }

    async fn container_config(&self, node: &str, vmid: u64) -> Result<Record> {
        let path = format!("/nodes/{node}/lxc/{vmid}/config");
        as_object(&path, self.get(&path).await?)
    }

    async fn firewall_options(&self) -> Result<Record> {
        as_object(
            "/cluster/firewall/options",
            self.get("/cluster/firewall/options").await?,
        )
    }

    async fn firewall_rules(&self) -> Result<Vec<Record>> {
        as_list(
            "/cluster/firewall/rules",
            self.get("/cluster/firewall/rules").await?,
        )
    }

    async fn firewall_groups(&self) -> Result<Vec<Record>> {
        as_list(
            "/cluster/firewall/groups",
            self.get("/cluster/firewall/groups").await?,
        )
    }

    async fn firewall_aliases(&self) -> Result<Vec<Record>> {
        as_list(
            "/cluster/firewall/aliases",
            self.get("/cluster/firewall/aliases").await?,
        )
    }

    async fn firewall_ipsets(&self) -> Result<Vec<Record>> {
        as_list(
            "/cluster/firewall/ipset",
            self.get("/cluster/firewall/ipset").await?,
        )
    }

    async fn users(&self) -> Result<Vec<Record>> {
        as_list("/access/users", self.get("/access/users").await?)
    }

    async fn access_groups(&self) -> Result<Vec<Record>> {
        as_list("/access/groups", self.get("/access/groups").await?)
    }

    async fn access_roles(&self) -> Result<Vec<Record>> {
        as_list("/access/roles", self.get("/access/roles").await?)
    }

    async fn acl(&self) -> Result<Vec<Record>> {
        as_list("/access/acl", self.get("/access/acl").await?)
    }

    /// API tokens of one user.
    async fn user_tokens(&self, userid: &str) -> Result<Vec<Record>> {
        let path = format!("/access/users/{userid}/token");
        as_list(&path, self.get(&path).await?)
    }

    async fn backup_jobs(&self) -> Result<Vec<Record>> {
        as_list("/cluster/backup", self.get("/cluster/backup").await?)
    }

    async fn ha_resources(&self) -> Result<Vec<Record>> {
        as_list(
            "/cluster/ha/resources",
            self.get("/cluster/ha/resources").await?,
        )
    }

    async fn ha_groups(&self) -> Result<Vec<Record>> {
        as_list("/cluster/ha/groups", self.get("/cluster/ha/groups").await?)
    }

    async fn ha_status(&self) -> Result<Vec<Record>> {
        as_list(
            "/cluster/ha/status/current",
            self.get("/cluster/ha/status/current").await?,
        )
    }

    async fn sdn_zones(&self) -> Result<Vec<Record>> {
        as_list("/cluster/sdn/zones", self.get("/cluster/sdn/zones").await?)
    }

    async fn sdn_vnets(&self) -> Result<Vec<Record>> {
        as_list("/cluster/sdn/vnets", self.get("/cluster/sdn/vnets").await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixtureApi;

    #[async_trait]
    impl PveApi for FixtureApi {
        async fn get(&self, path: &str) -> Result<Value> {
            match path {
                "/nodes" => Ok(json!([{"node": "pve1"}, {"node": "pve2"}, 42])),
                "/version" => Ok(json!({"version": "8.2.4", "release": "8.2"})),
                "/cluster/resources?type=lxc" => Ok(json!([{"vmid": 101, "type": "lxc"}])),
                "/cluster/ha/groups" => Ok(Value::Null),
                _ => Ok(json!("bogus")),
            }
        }
    }

    #[tokio::test]
    async fn lists_drop_non_object_entries() {
        let nodes = FixtureApi.nodes().await.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0]["node"], "pve1");
    }

    #[tokio::test]
    async fn helpers_work_through_a_trait_object() {
        // The generators only ever see `&dyn PveApi`
        let api: &dyn PveApi = &FixtureApi;
        let version = api.version().await.unwrap();
        assert_eq!(version["version"], "8.2.4");
        let nodes = api.nodes().await.unwrap();
        assert_eq!(nodes.len(), 2);
    }

    #[tokio::test]
    async fn query_parameter_is_appended() {
        let cts = FixtureApi.cluster_resources(Some("lxc")).await.unwrap();
        assert_eq!(cts.len(), 1);
        assert_eq!(cts[0]["vmid"], 101);
    }

    #[tokio::test]
    async fn null_data_means_empty_list() {
        let groups = FixtureApi.ha_groups().await.unwrap();
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn shape_mismatch_is_an_api_error() {
        let err = FixtureApi.cluster_status().await.unwrap_err();
        assert!(matches!(err, Error::Api { .. }));
    }
}
