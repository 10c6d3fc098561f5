use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use tracing::debug;

use super::wire::{
    self, CREATE_PATH, CSRF_HEADER, CSRF_PATH, CreateRequest, TODOS_PATH, TokenResponse,
};
use super::{RemoteError, RemoteStore};
use crate::model::config::RemoteConfig;
use crate::model::task::Task;

/// Task store reached over JSON/HTTP
pub struct HttpRemote {
    base_url: String,
    http: Client,
}

impl HttpRemote {
    /// Build a client for `base_url`. A `None` timeout lets calls wait until
    /// the transport resolves or fails.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()?;
        Ok(HttpRemote {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let base_url = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                RemoteError::Unavailable(
                    "no remote.base_url configured (run `tally init --url <URL>` or use --offline)"
                        .into(),
                )
            })?;
        Self::new(base_url, config.timeout_secs.map(Duration::from_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_token(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.header(CSRF_HEADER, token),
            None => request,
        }
    }
}

/// Read the body, turning non-2xx responses into `RemoteError::Status`
fn read_body(response: Response) -> Result<String, RemoteError> {
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        return Err(RemoteError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

impl RemoteStore for HttpRemote {
    fn fetch_token(&mut self) -> Result<String, RemoteError> {
        debug!(base_url = %self.base_url, "fetch_token: called");
        let body = read_body(self.http.get(self.url(CSRF_PATH)).send()?)?;
        let token: TokenResponse = serde_json::from_str(&body)?;
        Ok(token.csrf_token)
    }

    fn fetch_all(&mut self) -> Result<Vec<Task>, RemoteError> {
        debug!(base_url = %self.base_url, "fetch_all: called");
        let body = read_body(self.http.get(self.url(TODOS_PATH)).send()?)?;
        wire::decode_task_list(&body)
    }

    fn create(&mut self, title: &str, token: Option<&str>) -> Result<Task, RemoteError> {
        debug!(%title, "create: called");
        let request = self
            .http
            .post(self.url(CREATE_PATH))
            .json(&CreateRequest { title });
        let body = read_body(Self::with_token(request, token).send()?)?;
        wire::decode_created(&body)
    }

    fn save_all(&mut self, tasks: &[Task], token: Option<&str>) -> Result<(), RemoteError> {
        debug!(count = tasks.len(), "save_all: called");
        let request = self.http.post(self.url(TODOS_PATH)).json(tasks);
        read_body(Self::with_token(request, token).send()?)?;
        Ok(())
    }
}
