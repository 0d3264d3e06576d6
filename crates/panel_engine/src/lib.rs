//! Panel engine: control-plane client and asynchronous job tracker.
mod action;
mod client;
mod engine;
mod models;
mod poller;
mod types;

pub use action::{ActionCommand, ActionDescriptor};
pub use client::{ClientSettings, ControlPlane, HttpControlPlane, JobPoll, JobStatus};
pub use engine::{EngineConfig, EngineHandle};
pub use models::{
    DeployParams, DiskOffering, IsoSummary, ServiceOffering, TemplateFilter, TemplateSummary,
    VirtualMachine, Zone,
};
pub use poller::{poll_to_completion, PollSettings};
pub use types::{
    ConfigError, EngineEvent, JobId, JobOutcome, Operation, QueryError, SubjectId, SubmitError,
};
