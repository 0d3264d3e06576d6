use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use panel_core::{
    ActionKind, DeploySpec, Effect, Instance, InstanceId, JobId, JobOutcome, Msg, SubjectId,
};
use panel_engine::{ActionCommand, DeployParams, EngineEvent, EngineHandle, VirtualMachine};
use panel_logging::{panel_info, panel_warn};

/// Interprets core effects against the engine and forwards engine events
/// back into the message stream.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, msg_tx: mpsc::Sender<Msg>) -> Self {
        let runner = Self { engine };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadInstances => {
                    panel_info!("requesting instance listing");
                    self.engine.load_instances();
                }
                Effect::SubmitAction { action, subject } => {
                    panel_info!(
                        "submitting {} for instance {}",
                        action.display_label(),
                        subject
                    );
                    self.engine.submit_action(subject.as_str(), map_action(action));
                }
                Effect::SubmitDeploy { placeholder, spec } => {
                    panel_info!("submitting deploy for placeholder #{}", placeholder);
                    self.engine.submit_deploy(placeholder, map_deploy_spec(spec));
                }
            }
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                if msg_tx.send(map_event(event)).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::InstancesLoaded { result } => match result {
            Ok(machines) => {
                Msg::InstancesLoaded(machines.into_iter().map(map_virtual_machine).collect())
            }
            Err(err) => {
                panel_warn!("instance listing failed: {}", err);
                Msg::InstanceListFailed {
                    message: err.to_string(),
                }
            }
        },
        EngineEvent::SubmissionAccepted {
            subject,
            operation,
            job_id,
        } => Msg::SubmissionAccepted {
            subject: map_subject(subject),
            action: map_operation(operation),
            job_id: JobId::new(job_id.as_str()),
        },
        EngineEvent::SubmissionFailed {
            subject,
            operation,
            message,
        } => Msg::SubmissionFailed {
            subject: map_subject(subject),
            action: map_operation(operation),
            message,
        },
        EngineEvent::JobResolved {
            job_id, outcome, ..
        } => Msg::JobResolved {
            job_id: JobId::new(job_id.as_str()),
            outcome: map_outcome(outcome),
        },
    }
}

fn map_action(action: ActionKind) -> ActionCommand {
    match action {
        ActionKind::Start => ActionCommand::StartVirtualMachine,
        ActionKind::Stop => ActionCommand::StopVirtualMachine,
    }
}

fn map_operation(operation: panel_engine::Operation) -> Option<ActionKind> {
    match operation {
        panel_engine::Operation::Action(ActionCommand::StartVirtualMachine) => {
            Some(ActionKind::Start)
        }
        panel_engine::Operation::Action(ActionCommand::StopVirtualMachine) => {
            Some(ActionKind::Stop)
        }
        panel_engine::Operation::Deploy => None,
    }
}

fn map_subject(subject: panel_engine::SubjectId) -> SubjectId {
    match subject {
        panel_engine::SubjectId::Instance(id) => SubjectId::Instance(InstanceId::new(id)),
        panel_engine::SubjectId::Placeholder(placeholder) => SubjectId::Placeholder(placeholder),
    }
}

fn map_outcome(outcome: panel_engine::JobOutcome) -> JobOutcome {
    match outcome {
        panel_engine::JobOutcome::Succeeded { virtual_machine } => JobOutcome::Succeeded {
            instance: virtual_machine.map(map_virtual_machine),
        },
        panel_engine::JobOutcome::Failed { reason } => JobOutcome::Failed { reason },
        panel_engine::JobOutcome::TimedOut => JobOutcome::TimedOut,
        panel_engine::JobOutcome::Aborted { message } => JobOutcome::Aborted { message },
    }
}

fn map_deploy_spec(spec: DeploySpec) -> DeployParams {
    DeployParams {
        zone_id: spec.zone_id,
        display_name: spec.display_name,
        group: spec.group,
        template_id: spec.template_id,
        service_offering_id: spec.service_offering_id,
        disk_offering_id: spec.disk_offering_id,
    }
}

fn map_virtual_machine(machine: VirtualMachine) -> Instance {
    let ha_enabled = machine.ha_enabled();
    Instance {
        id: InstanceId::new(machine.id),
        name: machine.name,
        display_name: machine.displayname,
        ip_address: machine.ipaddress,
        state: machine.state,
        group: machine.group,
        zone_name: machine.zonename,
        template_name: machine.templatename,
        service_offering_name: machine.serviceofferingname,
        ha_enabled,
        created: machine.created,
        account: machine.account,
        domain: machine.domain,
        host_name: machine.hostname,
        iso_id: machine.isoid,
    }
}
