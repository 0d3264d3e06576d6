#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the instance listing from the control plane.
    LoadInstances,
    /// Submit one bulk-action command for a selected instance.
    SubmitAction {
        action: crate::ActionKind,
        subject: crate::InstanceId,
    },
    /// Submit a deploy for a freshly allocated placeholder row.
    SubmitDeploy {
        placeholder: u64,
        spec: crate::DeploySpec,
    },
}
