use std::collections::VecDeque;

use songvote_core::{
    ApiError, ApiResponse, Command, Controller, DispatchError, Intent, Request, ResultRow,
    ResultsKind,
};
use tracing::{info, warn};

use crate::client::Transport;

#[derive(Debug, thiserror::Error)]
pub(crate) enum SessionError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Api(ApiError),
    #[error("roster could not be loaded")]
    NotLoaded,
}

/// Drives a [`Controller`] against a transport, one request at a time.
pub(crate) struct Session<T> {
    controller: Controller,
    transport: T,
}

impl<T: Transport> Session<T> {
    pub(crate) fn new(controller: Controller, transport: T) -> Self {
        Self {
            controller,
            transport,
        }
    }

    pub(crate) fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Fetches the roster; a failed first load is an error.
    pub(crate) async fn load(&mut self) -> Result<(), SessionError> {
        let failures = self.dispatch(Intent::Load).await?;
        if !self.controller.is_loaded() {
            return Err(failures
                .into_iter()
                .next()
                .map(SessionError::Api)
                .unwrap_or(SessionError::NotLoaded));
        }
        Ok(())
    }

    /// Runs an intent and every follow-up it produces; returns failed writes.
    pub(crate) async fn dispatch(&mut self, intent: Intent) -> Result<Vec<ApiError>, SessionError> {
        let mut queue: VecDeque<Command> = self.controller.handle(intent)?.into();
        let mut failures = Vec::new();
        while let Some(command) = queue.pop_front() {
            let outcome = self.transport.send(&command.request.to_api()).await;
            if let Err(err) = &outcome {
                let kind = if command.request.is_write() { "write" } else { "fetch" };
                warn!(request = %command.id, kind, %err, "request failed");
                failures.push(err.clone());
            }
            queue.extend(self.controller.complete(command.id, outcome));
        }
        info!(
            round = %self.controller.kind(),
            failed = failures.len(),
            "intent settled"
        );
        Ok(failures)
    }

    pub(crate) async fn results(&self, kind: ResultsKind) -> Result<Vec<ResultRow>, SessionError> {
        let request = Request::FetchResults(kind).to_api();
        match self.transport.send(&request).await {
            Ok(ApiResponse::Results(rows)) => Ok(rows),
            Ok(other) => Err(SessionError::Api(ApiError::Decode(format!(
                "expected results, got {other:?}"
            )))),
            Err(err) => Err(SessionError::Api(err)),
        }
    }
}
