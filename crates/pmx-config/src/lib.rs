use std::path::{Path, PathBuf};

use anyhow::bail;
use pmx_redact::RedactionPolicy;
use serde::{Deserialize, Serialize};

/// Configuration for a documentation generation run
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub connection: ConnectionConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub redaction: RedactionPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConnectionConfig {
    /// Proxmox host, e.g. "proxmox.example.com" or "192.168.1.100"
    #[serde(default)]
    pub host: String,

    /// API token in `USER@REALM!TOKENID=SECRET` format (recommended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Username in `user@pam` / `user@pve` format (fallback)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Verify TLS certificates. Off by default: PVE hosts commonly run
    /// self-signed certificates.
    #[serde(default)]
    pub verify_ssl: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

/// Authentication method derived from the connection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    Token,
    Password,
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthMethod::Token => write!(f, "token"),
            AuthMethod::Password => write!(f, "password"),
        }
    }
}

impl Config {
    /// Load config from `path`, or from the default location when `path` is
    /// `None`. A missing file yields the defaults; overrides from the CLI
    /// are applied on top by the caller.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path(),
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Default config file path.
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "pmxdocs", "pmxdocs") {
            dirs.config_dir().join("pmxdocs.toml")
        } else {
            PathBuf::from("pmxdocs.toml")
        }
    }

    /// Check that the connection settings are usable.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.connection.host.is_empty() {
            bail!("host is required (set [connection] host or PROXMOX_HOST)");
        }
        if self.connection.api_token.is_none()
            && !(self.connection.username.is_some() && self.connection.password.is_some())
        {
            bail!(
                "either an API token or both username and password must be provided \
                 (PROXMOX_API_TOKEN, or PROXMOX_USERNAME and PROXMOX_PASSWORD)"
            );
        }
        Ok(())
    }

    pub fn auth_method(&self) -> AuthMethod {
        if self.connection.api_token.is_some() {
            AuthMethod::Token
        } else {
            AuthMethod::Password
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_needs_a_host() {
        let config = Config::default();
        assert!(config.validate().is_err());
        assert_eq!(config.output.dir, PathBuf::from("output"));
        assert!(!config.redaction.any_enabled());
    }

    #[test]
    fn token_auth_is_sufficient() {
        let config: Config = toml::from_str(
            r#"
            [connection]
            host = "pve.example.com"
            api_token = "docs@pve!gen=secret"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.auth_method(), AuthMethod::Token);
    }

    #[test]
    fn password_auth_needs_both_fields() {
        let config: Config = toml::from_str(
            r#"
            [connection]
            host = "pve.example.com"
            username = "docs@pam"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config: Config = toml::from_str(
            r#"
            [connection]
            host = "pve.example.com"
            username = "docs@pam"
            password = "hunter2"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.auth_method(), AuthMethod::Password);
    }

    #[test]
    fn redaction_section_round_trips() {
        let config: Config = toml::from_str(
            r#"
            [connection]
            host = "pve.example.com"
            api_token = "t"

            [redaction]
            redact_mac_addresses = true
            redact_usernames = true
            "#,
        )
        .unwrap();
        assert!(config.redaction.redact_mac_addresses);
        assert!(config.redaction.redact_usernames);
        assert!(!config.redaction.redact_cpu_flags);

        let rendered = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert!(parsed.redaction.redact_mac_addresses);
    }
}
