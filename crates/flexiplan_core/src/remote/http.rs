//! HTTP implementation of the routine remote.
//!
//! # Responsibility
//! - Map the three remote operations onto the backend REST endpoints.
//! - Attach bearer auth and a per-request correlation id.
//! - Emit metadata-only logs for every request.
//!
//! # Invariants
//! - Every request is bounded by `ClientConfig::request_timeout`.
//! - Response bodies are never logged; error bodies are truncated before
//!   they reach `RemoteError::Status`.

use crate::config::ClientConfig;
use crate::logging::single_line;
use crate::model::routine::WeeklyRoutine;
use crate::remote::wire::{
    routine_from_wire, CompletionRequest, GeneratedRoutineEnvelope, OffDayRequest,
    RoutineEnvelope,
};
use crate::remote::{
    CompletionUpdate, RegenerationMode, RemoteError, RemoteResult, RoutineRemote,
};
use async_trait::async_trait;
use log::{info, warn};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use uuid::Uuid;

const USER_ROUTINE_PATH: &str = "/api/user-routine/";
const MARK_COMPLETED_PATH: &str = "/api/mark-activity-completed/";
const REQUEST_ID_HEADER: &str = "X-Request-ID";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Routine remote backed by the REST backend.
#[derive(Debug, Clone)]
pub struct HttpRoutineRemote {
    client: Client,
    config: ClientConfig,
}

impl HttpRoutineRemote {
    /// Builds an HTTP client honoring the configured timeout.
    pub fn new(config: ClientConfig) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send(&self, operation: &'static str, builder: RequestBuilder) -> RemoteResult<Response> {
        let request_id = Uuid::new_v4();
        let builder = match self.config.access_token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
            .map_err(|err| {
                let mapped = map_reqwest_error(&err);
                warn!(
                    "event=remote_call module=remote status=error op={} request_id={} error={}",
                    operation, request_id, mapped
                );
                mapped
            })?;
        info!(
            "event=remote_call module=remote status=ok op={} request_id={} http_status={}",
            operation,
            request_id,
            response.status().as_u16()
        );
        Ok(response)
    }

    async fn read_week<T, F>(&self, response: Response, extract: F) -> RemoteResult<WeeklyRoutine>
    where
        T: serde::de::DeserializeOwned,
        F: FnOnce(T) -> crate::remote::wire::WireWeek,
    {
        let envelope = response
            .json::<T>()
            .await
            .map_err(|err| map_reqwest_error(&err))?;
        Ok(routine_from_wire(extract(envelope))?)
    }
}

#[async_trait]
impl RoutineRemote for HttpRoutineRemote {
    async fn fetch_routine(&self) -> RemoteResult<Option<WeeklyRoutine>> {
        let url = self.config.endpoint(USER_ROUTINE_PATH);
        let response = self.send("fetch_routine", self.client.get(url)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response).await?;
        let routine = self
            .read_week(response, |envelope: RoutineEnvelope| envelope.routine_data)
            .await?;
        Ok(Some(routine))
    }

    async fn regenerate_routine(
        &self,
        user_id: u64,
        mode: RegenerationMode,
    ) -> RemoteResult<WeeklyRoutine> {
        let url = self.config.endpoint(&generate_routine_path(user_id));
        let builder = match mode {
            RegenerationMode::Create => self.client.post(url),
            RegenerationMode::Update { off_day, day } => self.client.put(url).json(&OffDayRequest {
                off_day,
                day: day.as_str(),
            }),
        };
        let operation = match mode {
            RegenerationMode::Create => "regenerate_create",
            RegenerationMode::Update { .. } => "regenerate_update",
        };
        let response = ensure_success(self.send(operation, builder).await?).await?;
        self.read_week(response, |envelope: GeneratedRoutineEnvelope| envelope.routine)
            .await
    }

    async fn set_activity_completion(&self, update: &CompletionUpdate) -> RemoteResult<()> {
        let url = self.config.endpoint(MARK_COMPLETED_PATH);
        let builder = self.client.post(url).json(&CompletionRequest::from(update));
        ensure_success(self.send("set_activity_completion", builder).await?).await?;
        Ok(())
    }
}

/// Path of the generate/update routine endpoint for one user.
pub fn generate_routine_path(user_id: u64) -> String {
    format!("/api/generate-routine/{user_id}/")
}

async fn ensure_success(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(RemoteError::NotFound);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        code: status.as_u16(),
        message: truncate_error_body(body.as_str()),
    })
}

fn map_reqwest_error(err: &reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::Timeout
    } else if err.is_decode() {
        RemoteError::Decode(err.to_string())
    } else {
        RemoteError::Transport(err.to_string())
    }
}

fn truncate_error_body(body: &str) -> String {
    single_line(body, MAX_ERROR_BODY_CHARS)
}
