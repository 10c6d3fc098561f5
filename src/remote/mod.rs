//! Remote task store: the HTTP endpoint and an in-process stand-in.

pub mod http;
pub mod memory;
pub mod wire;

pub use http::HttpRemote;
pub use memory::MemoryStore;

use crate::model::task::Task;

/// Errors from talking to a task store
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("remote returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("remote unavailable: {0}")]
    Unavailable(String),
}

/// The four calls a session makes against its store.
///
/// Mutating calls take the anti-forgery token, when one has been obtained.
pub trait RemoteStore {
    /// Fetch the anti-forgery token
    fn fetch_token(&mut self) -> Result<String, RemoteError>;

    /// Fetch every task, soft-deleted entries included
    fn fetch_all(&mut self) -> Result<Vec<Task>, RemoteError>;

    /// Persist a new task and return it with its assigned id
    fn create(&mut self, title: &str, token: Option<&str>) -> Result<Task, RemoteError>;

    /// Replace the stored collection with `tasks`
    fn save_all(&mut self, tasks: &[Task], token: Option<&str>) -> Result<(), RemoteError>;
}

impl<R: RemoteStore + ?Sized> RemoteStore for Box<R> {
    fn fetch_token(&mut self) -> Result<String, RemoteError> {
        (**self).fetch_token()
    }

    fn fetch_all(&mut self) -> Result<Vec<Task>, RemoteError> {
        (**self).fetch_all()
    }

    fn create(&mut self, title: &str, token: Option<&str>) -> Result<Task, RemoteError> {
        (**self).create(title, token)
    }

    fn save_all(&mut self, tasks: &[Task], token: Option<&str>) -> Result<(), RemoteError> {
        (**self).save_all(tasks, token)
    }
}
