//! Session history stores for chat turns.

mod jsonl;
mod memory;

#[cfg(feature = "sqlite")]
mod sqlite;

pub use care_types::{ChatTurn, SessionStore, SessionStoreError, Speaker};
pub use jsonl::JsonlSessionStore;
pub use memory::InMemorySessionStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSessionStore;
