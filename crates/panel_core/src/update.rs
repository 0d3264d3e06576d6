use crate::{Effect, Msg, PanelState, SubjectId};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PanelState, msg: Msg) -> (PanelState, Vec<Effect>) {
    let effects = match msg {
        Msg::PanelOpened => vec![Effect::LoadInstances],
        Msg::InstancesLoaded(instances) => {
            state.load_instances(instances);
            Vec::new()
        }
        Msg::InstanceListFailed { message } => {
            state.set_load_error(message);
            Vec::new()
        }
        Msg::InstanceClicked { id } => {
            state.toggle_selection(&id);
            Vec::new()
        }
        Msg::ActionRequested { action } => {
            let snapshot = state.selection_snapshot();
            let mut effects = Vec::with_capacity(snapshot.len());
            for id in snapshot {
                state.begin_submission(&SubjectId::Instance(id.clone()));
                effects.push(Effect::SubmitAction {
                    action,
                    subject: id,
                });
            }
            // Drained only after every submission for this click was issued,
            // regardless of how each submission turns out.
            state.clear_selection();
            effects
        }
        Msg::DeployRequested { spec } => {
            let placeholder = state.add_placeholder(spec.group.clone());
            vec![Effect::SubmitDeploy { placeholder, spec }]
        }
        Msg::SubmissionAccepted {
            subject,
            action,
            job_id,
        } => {
            state.track_job(job_id, subject, action);
            Vec::new()
        }
        Msg::SubmissionFailed {
            subject,
            action,
            message,
        } => {
            state.apply_submission_failure(&subject, action, &message);
            Vec::new()
        }
        Msg::JobResolved { job_id, outcome } => {
            state.apply_job_outcome(&job_id, outcome);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
