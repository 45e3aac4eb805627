//! reqwest-backed implementation of `PveApi`

use std::time::Duration;

use async_trait::async_trait;
use pmx_config::ConnectionConfig;
use pmx_core::{Error, Result};
use serde_json::Value;
use tracing::{debug, info};

use crate::api::PveApi;

enum Auth {
    /// `Authorization: PVEAPIToken=USER@REALM!TOKENID=SECRET`
    Token(String),
    /// Ticket cookie plus CSRF token from `/access/ticket`
    Ticket { ticket: String, csrf: String },
}

/// HTTP client for the PVE management API.
pub struct PveClient {
    http: reqwest::Client,
    base_url: String,
    auth: Auth,
}

impl PveClient {
    /// Build a client and authenticate. Token auth needs no round trip;
    /// password auth obtains a ticket from `/access/ticket`.
    pub async fn connect(conn: &ConnectionConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("pmxdocs/0.2 (documentation generator)")
            .timeout(Duration::from_secs(30))
            // PVE hosts commonly run self-signed certificates
            .danger_accept_invalid_certs(!conn.verify_ssl)
            .build()
            .map_err(|e| Error::Other(anyhow::anyhow!("failed to build HTTP client: {e}")))?;

        let base_url = format!("https://{}:8006/api2/json", conn.host);

        let auth = if let Some(token) = &conn.api_token {
            info!("using API token authentication");
            Auth::Token(token.clone())
        } else {
            let (Some(username), Some(password)) = (&conn.username, &conn.password) else {
                return Err(Error::Auth(
                    "either an API token or username and password are required".to_string(),
                ));
            };
            info!("using username/password authentication");
            Self::ticket_auth(&http, &base_url, username, password).await?
        };

        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    async fn ticket_auth(
        http: &reqwest::Client,
        base_url: &str,
        username: &str,
        password: &str,
    ) -> Result<Auth> {
        let url = format!("{base_url}/access/ticket");
        let response = http
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|e| Error::Auth(format!("ticket request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Auth(format!(
                "ticket request rejected with HTTP {}",
                response.status().as_u16()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("invalid ticket response: {e}")))?;

        let data = &body["data"];
        let ticket = data["ticket"]
            .as_str()
            .ok_or_else(|| Error::Auth("ticket missing from response".to_string()))?;
        let csrf = data["CSRFPreventionToken"]
            .as_str()
            .ok_or_else(|| Error::Auth("CSRF token missing from response".to_string()))?;

        info!("authentication successful");
        Ok(Auth::Ticket {
            ticket: ticket.to_string(),
            csrf: csrf.to_string(),
        })
    }
}

#[async_trait]
impl PveApi for PveClient {
    async fn get(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%path, "GET");

        let request = match &self.auth {
            Auth::Token(token) => self
                .http
                .get(&url)
                .header("Authorization", format!("PVEAPIToken={token}")),
            Auth::Ticket { ticket, csrf } => self
                .http
                .get(&url)
                .header("Cookie", format!("PVEAuthCookie={ticket}"))
                .header("CSRFPreventionToken", csrf),
        };

        let response = request.send().await.map_err(|e| Error::Api {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(Error::Api {
                endpoint: path.to_string(),
                reason: format!("HTTP {}", response.status().as_u16()),
            });
        }

        let mut body: Value = response.json().await.map_err(|e| Error::Api {
            endpoint: path.to_string(),
            reason: format!("invalid JSON: {e}"),
        })?;

        // Every PVE response wraps its payload in a `data` envelope
        match body.get_mut("data") {
            Some(data) => Ok(data.take()),
            None => Err(Error::Api {
                endpoint: path.to_string(),
                reason: "response has no data field".to_string(),
            }),
        }
    }
}
