use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use panel_logging::{panel_info, panel_warn};
use tokio_util::sync::CancellationToken;

use crate::action::ActionCommand;
use crate::client::{ClientSettings, ControlPlane, HttpControlPlane};
use crate::models::DeployParams;
use crate::poller::{poll_to_completion, PollSettings};
use crate::types::{ConfigError, EngineEvent, JobId, JobOutcome, Operation, SubjectId};

enum EngineCommand {
    LoadInstances,
    SubmitAction {
        instance_id: String,
        command: ActionCommand,
    },
    SubmitDeploy {
        placeholder: u64,
        params: DeployParams,
    },
}

/// Engine configuration: where the control plane lives and how jobs are
/// polled.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub api_base_url: String,
    pub client: ClientSettings,
    pub poll: PollSettings,
}

impl EngineConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            client: ClientSettings::default(),
            poll: PollSettings::default(),
        }
    }
}

/// Registry mapping each outstanding job to its cancellation handle, owned
/// exclusively by the tracker. Guarantees a single poller per job id.
#[derive(Default)]
struct JobRegistry {
    inner: Mutex<HashMap<JobId, CancellationToken>>,
}

impl JobRegistry {
    /// Registers a poller for `job_id`; returns `None` when one is already
    /// running.
    fn begin(&self, job_id: &JobId) -> Option<CancellationToken> {
        let mut inner = self.inner.lock().expect("job registry lock");
        if inner.contains_key(job_id) {
            return None;
        }
        let token = CancellationToken::new();
        inner.insert(job_id.clone(), token.clone());
        Some(token)
    }

    /// Cancels and forgets the job. Tolerates repeated calls for the same id.
    fn finish(&self, job_id: &JobId) {
        if let Some(token) = self
            .inner
            .lock()
            .expect("job registry lock")
            .remove(job_id)
        {
            token.cancel();
        }
    }
}

/// Handle to the engine: commands in, events out. The engine owns a tokio
/// runtime on a dedicated thread; every submission and poll runs there.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let client = HttpControlPlane::new(&config.api_base_url, config.client)?;
        Ok(Self::with_client(Arc::new(client), config.poll))
    }

    /// Builds an engine over any control-plane implementation; used by the
    /// app wiring and by tests that script the control plane in process.
    pub fn with_client(client: Arc<dyn ControlPlane>, poll: PollSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let registry = Arc::new(JobRegistry::default());

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let event_tx = event_tx.clone();
                let poll = poll.clone();
                let registry = registry.clone();
                runtime.spawn(async move {
                    handle_command(client, command, poll, registry, event_tx).await;
                });
            }
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn load_instances(&self) {
        let _ = self.cmd_tx.send(EngineCommand::LoadInstances);
    }

    pub fn submit_action(&self, instance_id: impl Into<String>, command: ActionCommand) {
        let _ = self.cmd_tx.send(EngineCommand::SubmitAction {
            instance_id: instance_id.into(),
            command,
        });
    }

    pub fn submit_deploy(&self, placeholder: u64, params: DeployParams) {
        let _ = self.cmd_tx.send(EngineCommand::SubmitDeploy {
            placeholder,
            params,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx
            .lock()
            .ok()
            .and_then(|event_rx| event_rx.try_recv().ok())
    }
}

async fn handle_command(
    client: Arc<dyn ControlPlane>,
    command: EngineCommand,
    poll: PollSettings,
    registry: Arc<JobRegistry>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::LoadInstances => {
            let result = client.list_virtual_machines().await;
            let _ = event_tx.send(EngineEvent::InstancesLoaded { result });
        }
        EngineCommand::SubmitAction {
            instance_id,
            command,
        } => {
            let descriptor = command.descriptor();
            let subject = SubjectId::Instance(instance_id.clone());
            let operation = Operation::Action(command);
            panel_info!(
                "submitting {} for instance {}",
                descriptor.command_name,
                instance_id
            );
            match client.submit_action(descriptor, &instance_id).await {
                Ok(job_id) => {
                    track(client, job_id, subject, operation, poll, registry, event_tx).await;
                }
                Err(err) => {
                    panel_warn!(
                        "{} submission for instance {} failed: {}",
                        descriptor.command_name,
                        instance_id,
                        err
                    );
                    let _ = event_tx.send(EngineEvent::SubmissionFailed {
                        subject,
                        operation,
                        message: err.to_string(),
                    });
                }
            }
        }
        EngineCommand::SubmitDeploy {
            placeholder,
            params,
        } => {
            let subject = SubjectId::Placeholder(placeholder);
            let operation = Operation::Deploy;
            panel_info!("submitting deployVirtualMachine in zone {}", params.zone_id);
            match client.submit_deploy(&params).await {
                Ok(job_id) => {
                    track(client, job_id, subject, operation, poll, registry, event_tx).await;
                }
                Err(err) => {
                    panel_warn!("deployVirtualMachine submission failed: {}", err);
                    let _ = event_tx.send(EngineEvent::SubmissionFailed {
                        subject,
                        operation,
                        message: err.to_string(),
                    });
                }
            }
        }
    }
}

/// Tracks one accepted job to completion: registers it, polls, and emits a
/// single `JobResolved` event once a terminal outcome is observed.
async fn track(
    client: Arc<dyn ControlPlane>,
    job_id: JobId,
    subject: SubjectId,
    operation: Operation,
    poll: PollSettings,
    registry: Arc<JobRegistry>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let _ = event_tx.send(EngineEvent::SubmissionAccepted {
        subject: subject.clone(),
        operation,
        job_id: job_id.clone(),
    });

    let Some(token) = registry.begin(&job_id) else {
        panel_warn!("job {} is already tracked, ignoring duplicate", job_id);
        return;
    };

    let outcome = tokio::select! {
        outcome = poll_to_completion(client.as_ref(), &job_id, &poll) => outcome,
        _ = token.cancelled() => JobOutcome::Aborted {
            message: "polling cancelled".to_string(),
        },
    };
    registry.finish(&job_id);
    panel_info!("job {} resolved: {:?}", job_id, outcome);

    let _ = event_tx.send(EngineEvent::JobResolved {
        job_id,
        subject,
        outcome,
    });
}
