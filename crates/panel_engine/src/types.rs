use std::fmt;

use thiserror::Error;

use crate::action::ActionCommand;
use crate::models::VirtualMachine;

/// Identifier assigned by the control plane to an outstanding asynchronous
/// job. Unique among outstanding jobs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Routing token for the view element a submission acts upon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubjectId {
    Instance(String),
    Placeholder(u64),
}

/// Operation submitted to the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Action(ActionCommand),
    Deploy,
}

/// Events emitted by the engine toward the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    InstancesLoaded {
        result: Result<Vec<VirtualMachine>, QueryError>,
    },
    SubmissionAccepted {
        subject: SubjectId,
        operation: Operation,
        job_id: JobId,
    },
    SubmissionFailed {
        subject: SubjectId,
        operation: Operation,
        message: String,
    },
    JobResolved {
        job_id: JobId,
        subject: SubjectId,
        outcome: JobOutcome,
    },
}

/// Terminal result of one polled job. A job never leaves a terminal state
/// and is dropped from the tracked set the moment one is observed.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// `jobstatus == 1`; the payload may carry the updated entity.
    Succeeded {
        virtual_machine: Option<VirtualMachine>,
    },
    /// `jobstatus == 2`, with the server-provided reason.
    Failed { reason: String },
    /// The configured maximum wait elapsed before a terminal status.
    TimedOut,
    /// Polling was abandoned: transport retries exhausted, an unknown status
    /// code, or an explicit cancellation.
    Aborted { message: String },
}

/// Submission failed before a job id was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("synchronous actions are not supported: {command}")]
    SynchronousUnsupported { command: &'static str },
    #[error("malformed response envelope: missing key '{key}'")]
    MalformedEnvelope { key: String },
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A status or listing query failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("unknown job status {0}")]
    UnknownJobStatus(i64),
}

/// The engine could not be constructed from its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(String),
    #[error("http client setup failed: {0}")]
    HttpClient(String),
}
