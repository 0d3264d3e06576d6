#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Operator opened the panel; triggers the initial instance load.
    PanelOpened,
    /// Fresh instance listing arrived from the control plane.
    InstancesLoaded(Vec<crate::Instance>),
    /// The instance listing request failed.
    InstanceListFailed { message: String },
    /// Operator clicked an instance row; toggles Selection Set membership.
    InstanceClicked { id: crate::InstanceId },
    /// Operator picked a bulk action from the action menu.
    ActionRequested { action: crate::ActionKind },
    /// Operator completed the deploy wizard.
    DeployRequested { spec: crate::DeploySpec },
    /// The control plane accepted a submission and returned a job id.
    SubmissionAccepted {
        subject: crate::SubjectId,
        action: Option<crate::ActionKind>,
        job_id: crate::JobId,
    },
    /// A submission failed before a job id was obtained.
    SubmissionFailed {
        subject: crate::SubjectId,
        action: Option<crate::ActionKind>,
        message: String,
    },
    /// A tracked job reached a terminal state.
    JobResolved {
        job_id: crate::JobId,
        outcome: crate::JobOutcome,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
