//! JSON Lines file-backed session store (persists across restarts).

use async_trait::async_trait;
use care_types::{ChatTurn, SessionStore, SessionStoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RecordKind {
    Turn,
    Clear,
}

/// One line of the history file.
#[derive(Debug, Serialize, Deserialize)]
struct Record {
    session_id: String,
    kind: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    turn: Option<ChatTurn>,
}

/// Append-only history file. A `clear` record resets its session on replay.
///
/// Reads replay the whole file, so `history`, `clear`, and the count returned by
/// `append_exchange` cost O(file size). The file is never compacted.
pub struct JsonlSessionStore {
    path: PathBuf,
    append_lock: tokio::sync::Mutex<()>,
}

impl JsonlSessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            append_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append_records(&self, records: &[Record]) -> Result<(), SessionStoreError> {
        let mut buf = String::new();
        for r in records {
            let line =
                serde_json::to_string(r).map_err(|e| SessionStoreError::Other(e.to_string()))?;
            buf.push_str(&line);
            buf.push('\n');
        }
        let mut f = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| SessionStoreError::Other(e.to_string()))?;
        f.write_all(buf.as_bytes())
            .await
            .map_err(|e| SessionStoreError::Other(e.to_string()))?;
        f.flush()
            .await
            .map_err(|e| SessionStoreError::Other(e.to_string()))?;
        Ok(())
    }

    async fn replay(&self, session_id: &str) -> Result<Vec<ChatTurn>, SessionStoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SessionStoreError::Other(e.to_string())),
        };
        let mut out = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: Record = match serde_json::from_str(line) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed history line");
                    continue;
                }
            };
            if record.session_id != session_id {
                continue;
            }
            match (record.kind, record.turn) {
                (RecordKind::Turn, Some(turn)) => out.push(turn),
                (RecordKind::Clear, _) => out.clear(),
                (RecordKind::Turn, None) => {}
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl SessionStore for JsonlSessionStore {
    async fn append_exchange(
        &self,
        session_id: &str,
        user_turn: ChatTurn,
        assistant_turn: ChatTurn,
    ) -> Result<usize, SessionStoreError> {
        let _guard = self.append_lock.lock().await;
        let records = [user_turn, assistant_turn].map(|turn| Record {
            session_id: session_id.to_string(),
            kind: RecordKind::Turn,
            turn: Some(turn),
        });
        self.append_records(&records).await?;
        Ok(self.replay(session_id).await?.len())
    }

    async fn history(&self, session_id: &str) -> Result<Vec<ChatTurn>, SessionStoreError> {
        let _guard = self.append_lock.lock().await;
        self.replay(session_id).await
    }

    async fn clear(&self, session_id: &str) -> Result<usize, SessionStoreError> {
        let _guard = self.append_lock.lock().await;
        let existing = self.replay(session_id).await?.len();
        if existing == 0 {
            return Ok(0);
        }
        self.append_records(&[Record {
            session_id: session_id.to_string(),
            kind: RecordKind::Clear,
            turn: None,
        }])
        .await?;
        Ok(existing)
    }
}
