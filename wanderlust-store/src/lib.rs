pub mod app_config;
pub mod kv;
pub mod session;

pub use app_config::Config;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use session::{SessionState, SessionStore, SESSION_KEY};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage lock poisoned")]
    Poisoned,
    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type StoreResult<T> = Result<T, StoreError>;
