//! Server configuration from environment variables.

use care_types::SessionStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_LISTEN: &str = "0.0.0.0:8501";
const DEFAULT_JSONL_PATH: &str = "chat_history.jsonl";
const DEFAULT_SQLITE_PATH: &str = "chat_history.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("history backend '{0}' is not available in this build")]
    Unsupported(String),
    #[error("session store: {0}")]
    Store(#[from] care_types::SessionStoreError),
}

/// Where chat history is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryBackend {
    Memory,
    Jsonl(PathBuf),
    Sqlite(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub history: HistoryBackend,
    /// Per-session turn cap for the in-memory backend.
    pub max_turns: Option<usize>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable lookup (`CARE_LISTEN`, `CARE_HISTORY_BACKEND`,
    /// `CARE_HISTORY_PATH`, `CARE_MAX_TURNS`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_raw = lookup("CARE_LISTEN").unwrap_or_else(|| DEFAULT_LISTEN.to_string());
        let listen = listen_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "CARE_LISTEN",
            value: listen_raw.clone(),
        })?;

        let path = lookup("CARE_HISTORY_PATH").map(PathBuf::from);
        let backend = lookup("CARE_HISTORY_BACKEND").unwrap_or_else(|| "memory".to_string());
        let history = match backend.trim().to_ascii_lowercase().as_str() {
            "memory" | "" => HistoryBackend::Memory,
            "jsonl" => HistoryBackend::Jsonl(path.unwrap_or_else(|| DEFAULT_JSONL_PATH.into())),
            "sqlite" => HistoryBackend::Sqlite(path.unwrap_or_else(|| DEFAULT_SQLITE_PATH.into())),
            _ => {
                return Err(ConfigError::Invalid {
                    name: "CARE_HISTORY_BACKEND",
                    value: backend,
                })
            }
        };

        let max_turns = match lookup("CARE_MAX_TURNS") {
            None => None,
            // At least one exchange (2 turns).
            Some(v) => match v.trim().parse::<usize>() {
                Ok(n) if n >= 2 => Some(n),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "CARE_MAX_TURNS",
                        value: v,
                    })
                }
            },
        };

        Ok(Self {
            listen,
            history,
            max_turns,
        })
    }

    /// Open the configured session store.
    pub fn session_store(&self) -> Result<Arc<dyn SessionStore + Send + Sync>, ConfigError> {
        match &self.history {
            HistoryBackend::Memory => Ok(Arc::new(match self.max_turns {
                Some(max) => care_session::InMemorySessionStore::with_max_turns(max),
                None => care_session::InMemorySessionStore::new(),
            })),
            HistoryBackend::Jsonl(path) => Ok(Arc::new(care_session::JsonlSessionStore::new(path))),
            #[cfg(feature = "sqlite")]
            HistoryBackend::Sqlite(path) => {
                Ok(Arc::new(care_session::SqliteSessionStore::new(path)?))
            }
            #[cfg(not(feature = "sqlite"))]
            HistoryBackend::Sqlite(_) => Err(ConfigError::Unsupported("sqlite".to_string())),
        }
    }
}
