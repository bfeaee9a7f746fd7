use anyhow::Context;
use serde::{Deserialize, Serialize};
use songcast_protocol::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_FRAME_LEN};
use std::{
    net::{IpAddr, Ipv4Addr},
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub chunk_size: usize,
    pub recv_timeout_ms: u64,
    /// File extensions the catalog picks up, without the dot.
    pub extensions: Vec<String>,
    pub max_frame_len: usize,
    pub listen_backlog: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            chunk_size: DEFAULT_CHUNK_SIZE,
            recv_timeout_ms: 50,
            extensions: vec!["mp3".to_string()],
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            listen_backlog: 10,
        }
    }
}

impl ServerConfig {
    /// `<config dir>/songcast/server.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("songcast").join("server.json"))
    }

    /// Load from `explicit` if given (it must exist), otherwise from
    /// [`default_path`](Self::default_path) if that file exists, otherwise
    /// use defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: ServerConfig = serde_json::from_str(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms.max(1))
    }
}
