//! Unified client for the Engram platform
//!
//! Composes the storage and state clients behind one handle. `connect`
//! resolves `.env` and environment values, loads `engram.config.json`,
//! and brings up whichever services the configuration enables.

use crate::config::EngramConfig;
use crate::error::{EngramError, Result};
use crate::state::StateClient;
use crate::storage::{StorageClient, StorageOptions};
use crate::types::TransportPreference;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

const DEFAULT_STORAGE_URL: &str = "localhost:50051";
const DEFAULT_STATE_URL: &str = "localhost:50051";
const DEFAULT_HTTP_PORT: u16 = 3000;
const DEFAULT_RUN_ID: &str = "default";

/// Construction options for [`Client`]
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Explicit config file path; defaults to `engram.config.json`
    pub config_path: Option<PathBuf>,
    /// Run id for the state client; wins over `ENGRAM_RUN_ID`
    pub run_id: Option<String>,
}

/// Unified handle over the storage and state services
pub struct Client {
    options: ClientOptions,
    config: EngramConfig,
    storage: Option<StorageClient>,
    state: Option<StateClient>,
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// Split `host[:port]`, keeping `default_port` when the port is absent
/// or unparseable
fn split_host_port(url: &str, default_port: u16) -> (String, u16) {
    match url.rsplit_once(':') {
        Some((host, port)) => (host.to_string(), port.parse().unwrap_or(default_port)),
        None => (url.to_string(), default_port),
    }
}

impl Client {
    pub fn new(options: ClientOptions) -> Self {
        Self {
            options,
            config: EngramConfig::default(),
            storage: None,
            state: None,
        }
    }

    /// Resolve configuration and connect the enabled services
    ///
    /// Storage connects eagerly (auto transport selection, with a
    /// best-effort auto-login when `ENGRAM_STORAGE_TOKEN` is set); the
    /// state client's channel is lazy and connects on first use.
    pub async fn connect(&mut self) -> Result<()> {
        // Best-effort: a missing .env file is fine.
        let _ = dotenvy::dotenv();

        self.config = EngramConfig::load(self.options.config_path.as_deref())?;

        if self.config.storage.enabled {
            let url = env_nonempty("ENGRAM_STORAGE_URL")
                .unwrap_or_else(|| DEFAULT_STORAGE_URL.to_string());
            let (host, grpc_port) = split_host_port(&url, 50051);
            let http_port = env_nonempty("ENGRAM_STORAGE_HTTP_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_HTTP_PORT);
            let token = env_nonempty("ENGRAM_STORAGE_TOKEN");
            let user =
                env_nonempty("ENGRAM_STORAGE_USER").unwrap_or_else(|| "admin".to_string());

            let mut storage = StorageClient::new(StorageOptions {
                host,
                preference: TransportPreference::Auto,
                grpc_port,
                http_port,
                token: token.clone(),
                ..Default::default()
            });
            storage.connect().await?;

            if let Some(token) = token {
                // The configured token doubles as the login password;
                // failure downgrades to a warning rather than failing
                // the whole connect.
                match storage.login(&user, &token).await {
                    Ok(_) => debug!(user = %user, "storage auto-login succeeded"),
                    Err(err) => warn!(user = %user, %err, "storage auto-login failed"),
                }
            }
            self.storage = Some(storage);
        }

        if self.config.state.enabled {
            let address =
                env_nonempty("ENGRAM_STATE_URL").unwrap_or_else(|| DEFAULT_STATE_URL.to_string());
            let token = env_nonempty("ENGRAM_STATE_TOKEN");
            let run_id = self
                .options
                .run_id
                .clone()
                .or_else(|| env_nonempty("ENGRAM_RUN_ID"))
                .unwrap_or_else(|| DEFAULT_RUN_ID.to_string());

            self.state = Some(StateClient::new(&address, token.as_deref(), run_id)?);
        }

        Ok(())
    }

    /// The resolved configuration after `connect`
    pub fn config(&self) -> &EngramConfig {
        &self.config
    }

    pub fn storage(&self) -> Result<&StorageClient> {
        self.storage.as_ref().ok_or_else(|| {
            EngramError::NotConnected("storage is not enabled or not connected".to_string())
        })
    }

    pub fn storage_mut(&mut self) -> Result<&mut StorageClient> {
        self.storage.as_mut().ok_or_else(|| {
            EngramError::NotConnected("storage is not enabled or not connected".to_string())
        })
    }

    pub fn state(&self) -> Result<&StateClient> {
        self.state.as_ref().ok_or_else(|| {
            EngramError::NotConnected("state is not enabled or not connected".to_string())
        })
    }

    pub fn state_mut(&mut self) -> Result<&mut StateClient> {
        self.state.as_mut().ok_or_else(|| {
            EngramError::NotConnected("state is not enabled or not connected".to_string())
        })
    }

    pub async fn disconnect(&mut self) {
        if let Some(mut storage) = self.storage.take() {
            storage.disconnect().await;
        }
        self.state = None;
    }
}
