//! Reference pages: firewall, access control, backup jobs, high availability

use std::path::PathBuf;

use async_trait::async_trait;
use pmx_api::PveApi;
use pmx_core::record::{self};
use pmx_core::{Record, Result};
use pmx_redact::Redactor;

use crate::document::Document;
use crate::generator::DocGenerator;
use crate::markdown::Markdown;

pub struct Firewall;

#[async_trait]
impl DocGenerator for Firewall {
    fn name(&self) -> String {
        "firewall".to_string()
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("reference").join("firewall.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, _redactor: &Redactor) -> Result<Document> {
        let options = api.firewall_options().await.unwrap_or_default();
        let rules = api.firewall_rules().await.unwrap_or_default();
        let groups = api.firewall_groups().await.unwrap_or_default();
        let aliases = api.firewall_aliases().await.unwrap_or_default();
        let ipsets = api.firewall_ipsets().await.unwrap_or_default();

        let mut md = Markdown::new();
        md.heading(1, "Firewall Configuration");

        md.heading(2, "Cluster Options");
        let enabled = record::flag(&options, "enable");
        md.field("Firewall", if enabled { "enabled" } else { "disabled" });
        md.field("Input Policy", &record::display_key(&options, "policy_in"));
        md.field("Output Policy", &record::display_key(&options, "policy_out"));
        md.end_list();

        if !rules.is_empty() {
            md.heading(2, "Cluster Rules");
            let rows: Vec<Vec<String>> = rules
                .iter()
                .map(|rule| {
                    vec![
                        record::display_key(rule, "pos"),
                        record::display_key(rule, "action"),
                        record::display_key(rule, "type"),
                        record::display_key(rule, "source"),
                        record::display_key(rule, "dest"),
                        record::display_key(rule, "proto"),
                        record::display_key(rule, "dport"),
                        record::display_key(rule, "comment"),
                    ]
                })
                .collect();
            md.table(
                &["Pos", "Action", "Direction", "Source", "Dest", "Proto", "Port", "Comment"],
                &rows,
            );
        }

        if !groups.is_empty() {
            md.heading(2, "Security Groups");
            let rows: Vec<Vec<String>> = groups
                .iter()
                .map(|group| {
                    vec![
                        record::display_key(group, "group"),
                        record::display_key(group, "comment"),
                    ]
                })
                .collect();
            md.table(&["Group", "Comment"], &rows);
        }

        if !aliases.is_empty() {
            md.heading(2, "Aliases");
            let rows: Vec<Vec<String>> = aliases
                .iter()
                .map(|alias| {
                    vec![
                        record::display_key(alias, "name"),
                        record::display_key(alias, "cidr"),
                        record::display_key(alias, "comment"),
                    ]
                })
                .collect();
            md.table(&["Name", "CIDR", "Comment"], &rows);
        }

        if !ipsets.is_empty() {
            md.heading(2, "IP Sets");
            let rows: Vec<Vec<String>> = ipsets
                .iter()
                .map(|ipset| {
                    vec![
                        record::display_key(ipset, "name"),
                        record::display_key(ipset, "comment"),
                    ]
                })
                .collect();
            md.table(&["Name", "Comment"], &rows);
        }

        Ok(Document::new("Firewall Configuration", "Cluster firewall rules and objects")
            .meta("section", "reference")
            .with_body(md.finish()))
    }
}

pub struct UsersPermissions;

#[async_trait]
impl DocGenerator for UsersPermissions {
    fn name(&self) -> String {
        "users-permissions".to_string()
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("reference").join("users-permissions.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, redactor: &Redactor) -> Result<Document> {
        let users = api.users().await?;
        let groups = api.access_groups().await.unwrap_or_default();
        let roles = api.access_roles().await.unwrap_or_default();
        let acl = api.acl().await.unwrap_or_default();

        // Tokens are looked up by the real userid, before any pseudonym is
        // assigned for display.
        let mut tokens: Vec<Record> = Vec::new();
        for user in &users {
            let Some(userid) = record::get_str(user, "userid") else {
                continue;
            };
            let Ok(user_tokens) = api.user_tokens(userid).await else {
                continue;
            };
            for mut token in user_tokens {
                token.insert("user".to_string(), userid.into());
                tokens.push(token);
            }
        }

        let mut md = Markdown::new();
        md.heading(1, "Users and Permissions");

        md.heading(2, "Users");
        let rows: Vec<Vec<String>> = users
            .iter()
            .map(|user| {
                let user = redactor.redact_user_info(user);
                vec![
                    record::display_key(&user, "userid"),
                    record::display_key(&user, "email"),
                    record::display_key(&user, "groups"),
                    if record::flag(&user, "enable") { "yes" } else { "no" }.to_string(),
                    record::display_key(&user, "comment"),
                ]
            })
            .collect();
        md.table(&["User", "Email", "Groups", "Enabled", "Comment"], &rows);

        if !tokens.is_empty() {
            md.heading(2, "API Tokens");
            let rows: Vec<Vec<String>> = tokens
                .iter()
                .map(|token| {
                    let token = redactor.redact_token_info(token);
                    vec![
                        record::display_key(&token, "user"),
                        record::display_key(&token, "tokenid"),
                        if record::flag(&token, "privsep") { "yes" } else { "no" }.to_string(),
                        record::display_key(&token, "comment"),
                    ]
                })
                .collect();
            md.table(&["User", "Token", "Privilege Separation", "Comment"], &rows);
        }

        if !groups.is_empty() {
            md.heading(2, "Groups");
            let rows: Vec<Vec<String>> = groups
                .iter()
                .map(|group| {
                    vec![
                        record::display_key(group, "groupid"),
                        record::display_key(group, "comment"),
                    ]
                })
                .collect();
            md.table(&["Group", "Comment"], &rows);
        }

        if !roles.is_empty() {
            md.heading(2, "Roles");
            let rows: Vec<Vec<String>> = roles
                .iter()
                .map(|role| {
                    vec![
                        record::display_key(role, "roleid"),
                        if record::flag(role, "special") { "built-in" } else { "custom" }.to_string(),
                    ]
                })
                .collect();
            md.table(&["Role", "Origin"], &rows);
        }

        if !acl.is_empty() {
            md.heading(2, "Access Control List");
            let rows: Vec<Vec<String>> = acl
                .iter()
                .map(|entry| {
                    let ugid = record::str_or(entry, "ugid", "");
                    let principal = if record::get_str(entry, "type") == Some("user") {
                        redactor.redact_username(ugid)
                    } else {
                        ugid.to_string()
                    };
                    vec![
                        record::display_key(entry, "path"),
                        principal,
                        record::display_key(entry, "type"),
                        record::display_key(entry, "roleid"),
                        if record::flag(entry, "propagate") { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            md.table(&["Path", "Principal", "Type", "Role", "Propagate"], &rows);
        }

        Ok(Document::new("Users and Permissions", "Access control configuration")
            .meta("section", "reference")
            .with_body(md.finish()))
    }
}

pub struct BackupPolicies;

#[async_trait]
impl DocGenerator for BackupPolicies {
    fn name(&self) -> String {
        "backup-policies".to_string()
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("reference").join("backup-policies.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, _redactor: &Redactor) -> Result<Document> {
        let jobs = api.backup_jobs().await?;

        let mut md = Markdown::new();
        md.heading(1, "Backup Policies");

        if jobs.is_empty() {
            md.paragraph("No backup jobs configured.");
        } else {
            let rows: Vec<Vec<String>> = jobs
                .iter()
                .map(|job| {
                    let scope = if record::flag(job, "all") {
                        "all guests".to_string()
                    } else {
                        record::display_key(job, "vmid")
                    };
                    vec![
                        record::display_key(job, "id"),
                        record::display_key(job, "schedule"),
                        record::display_key(job, "storage"),
                        scope,
                        record::display_key(job, "mode"),
                        if record::flag(job, "enabled") { "yes" } else { "no" }.to_string(),
                        record::display_key(job, "comment"),
                    ]
                })
                .collect();
            md.table(
                &["Job", "Schedule", "Storage", "Scope", "Mode", "Enabled", "Comment"],
                &rows,
            );
        }

        Ok(Document::new("Backup Policies", "Scheduled backup jobs")
            .meta("section", "reference")
            .with_body(md.finish()))
    }
}

pub struct HighAvailability;

#[async_trait]
impl DocGenerator for HighAvailability {
    fn name(&self) -> String {
        "high-availability".to_string()
    }

    fn output_path(&self) -> PathBuf {
        PathBuf::from("reference").join("high-availability.mdx")
    }

    async fn collect(&self, api: &dyn PveApi, _redactor: &Redactor) -> Result<Document> {
        let resources = api.ha_resources().await.unwrap_or_default();
        let groups = api.ha_groups().await.unwrap_or_default();
        let status = api.ha_status().await.unwrap_or_default();

        let mut md = Markdown::new();
        md.heading(1, "High Availability");

        if resources.is_empty() && groups.is_empty() {
            md.paragraph("High availability is not configured on this cluster.");
        }

        if !resources.is_empty() {
            md.heading(2, "Managed Resources");
            let rows: Vec<Vec<String>> = resources
                .iter()
                .map(|resource| {
                    vec![
                        record::display_key(resource, "sid"),
                        record::display_key(resource, "state"),
                        record::display_key(resource, "group"),
                        record::display_key(resource, "max_restart"),
                        record::display_key(resource, "max_relocate"),
                        record::display_key(resource, "comment"),
                    ]
                })
                .collect();
            md.table(
                &["Resource", "Requested State", "Group", "Max Restart", "Max Relocate", "Comment"],
                &rows,
            );
        }

        if !groups.is_empty() {
            md.heading(2, "Groups");
            let rows: Vec<Vec<String>> = groups
                .iter()
                .map(|group| {
                    vec![
                        record::display_key(group, "group"),
                        record::display_key(group, "nodes"),
                        if record::flag(group, "restricted") { "yes" } else { "no" }.to_string(),
                        if record::flag(group, "nofailback") { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            md.table(&["Group", "Nodes", "Restricted", "No Failback"], &rows);
        }

        if !status.is_empty() {
            md.heading(2, "Current Status");
            let rows: Vec<Vec<String>> = status
                .iter()
                .map(|entry| {
                    vec![
                        record::display_key(entry, "id"),
                        record::display_key(entry, "type"),
                        record::display_key(entry, "status"),
                        record::display_key(entry, "node"),
                    ]
                })
                .collect();
            md.table(&["ID", "Type", "Status", "Node"], &rows);
        }

        Ok(Document::new("High Availability", "HA resources, groups and manager status")
            .meta("section", "reference")
            .with_body(md.finish()))
    }
}
