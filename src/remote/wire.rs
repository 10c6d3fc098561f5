use serde::{Deserialize, Serialize};

use super::RemoteError;
use crate::model::task::{Task, TaskId};

pub const CSRF_PATH: &str = "/csrf/";
pub const TODOS_PATH: &str = "/todos/";
pub const CREATE_PATH: &str = "/todos/create/";

/// Header carrying the anti-forgery token on mutating requests
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Body of `GET /csrf/`
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(rename = "csrfToken")]
    pub csrf_token: String,
}

/// Body of `POST /todos/create/`
#[derive(Debug, Serialize)]
pub struct CreateRequest<'a> {
    pub title: &'a str,
}

/// Body returned by `POST /todos/create/`. Fields are optional so a partial
/// payload can be reported by name instead of as a generic decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreatedTask {
    pub id: Option<TaskId>,
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl CreatedTask {
    pub fn into_task(self) -> Result<Task, RemoteError> {
        match (self.id, self.title, self.completed) {
            (Some(id), Some(title), Some(completed)) => Ok(Task {
                id,
                title,
                completed,
                is_deleted: false,
            }),
            (id, title, completed) => {
                let missing: Vec<&str> = [
                    ("id", id.is_none()),
                    ("title", title.is_none()),
                    ("completed", completed.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(RemoteError::InvalidResponse(format!(
                    "created task is missing {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

/// Decode the `GET /todos/` payload
pub fn decode_task_list(body: &str) -> Result<Vec<Task>, RemoteError> {
    Ok(serde_json::from_str(body)?)
}

/// Decode the `POST /todos/create/` payload
pub fn decode_created(body: &str) -> Result<Task, RemoteError> {
    let created: CreatedTask = serde_json::from_str(body)?;
    created.into_task()
}
