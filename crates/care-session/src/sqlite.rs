//! SQLite-backed session store.

use async_trait::async_trait;
use care_types::{ChatTurn, SessionStore, SessionStoreError, Speaker};
use std::path::Path;

pub struct SqliteSessionStore {
    conn: std::sync::Mutex<rusqlite::Connection>,
}

impl SqliteSessionStore {
    /// Open (or create) the database at `path`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, SessionStoreError> {
        let conn = rusqlite::Connection::open(path)
            .map_err(|e| SessionStoreError::Other(e.to_string()))?;
        Self::init(conn)
    }

    pub fn in_memory() -> Result<Self, SessionStoreError> {
        let conn = rusqlite::Connection::open_in_memory()
            .map_err(|e| SessionStoreError::Other(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: rusqlite::Connection) -> Result<Self, SessionStoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS chat_turns (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                seq INTEGER NOT NULL,
                speaker TEXT NOT NULL,
                message TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_chat_turns_session ON chat_turns(session_id, seq);
            "#,
        )
        .map_err(|e| SessionStoreError::Other(e.to_string()))?;

        Ok(Self {
            conn: std::sync::Mutex::new(conn),
        })
    }

    fn with_conn<T, F>(&self, f: F) -> Result<T, SessionStoreError>
    where
        F: FnOnce(&rusqlite::Connection) -> Result<T, rusqlite::Error>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| SessionStoreError::Other(format!("failed to acquire lock: {}", e)))?;
        f(&conn).map_err(|e| SessionStoreError::Other(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn append_exchange(
        &self,
        session_id: &str,
        user_turn: ChatTurn,
        assistant_turn: ChatTurn,
    ) -> Result<usize, SessionStoreError> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            let next: i64 = tx.query_row(
                "SELECT COALESCE(MAX(seq), -1) + 1 FROM chat_turns WHERE session_id = ?1",
                rusqlite::params![session_id],
                |row| row.get(0),
            )?;
            for (offset, turn) in [user_turn, assistant_turn].iter().enumerate() {
                tx.execute(
                    "INSERT INTO chat_turns (session_id, seq, speaker, message, timestamp) VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![
                        session_id,
                        next + offset as i64,
                        turn.speaker.as_str(),
                        turn.message,
                        turn.timestamp
                    ],
                )?;
            }
            let count: i64 = tx.query_row(
                "SELECT COUNT(*) FROM chat_turns WHERE session_id = ?1",
                rusqlite::params![session_id],
                |row| row.get(0),
            )?;
            tx.commit()?;
            Ok(count as usize)
        })
    }

    async fn history(&self, session_id: &str) -> Result<Vec<ChatTurn>, SessionStoreError> {
        let rows: Vec<(String, String, String)> = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT speaker, message, timestamp FROM chat_turns WHERE session_id = ?1 ORDER BY seq",
            )?;
            let rows = stmt.query_map(rusqlite::params![session_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?;
            let collected = rows.collect::<Result<Vec<_>, _>>();
            collected
        })?;

        let mut out = Vec::with_capacity(rows.len());
        for (speaker, message, timestamp) in rows {
            match Speaker::parse(&speaker) {
                Some(s) => out.push(ChatTurn::new(s, message, timestamp)),
                None => tracing::warn!(%speaker, "skipping turn with unknown speaker"),
            }
        }
        Ok(out)
    }

    async fn clear(&self, session_id: &str) -> Result<usize, SessionStoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM chat_turns WHERE session_id = ?1",
                rusqlite::params![session_id],
            )
        })
    }
}
