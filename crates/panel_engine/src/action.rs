/// Static description of one control-plane bulk action: the wire command,
/// the operator-facing label, and where the submission response carries the
/// job id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub command_name: &'static str,
    pub display_label: &'static str,
    pub is_async_job: bool,
    pub response_envelope_key: &'static str,
}

static START_VIRTUAL_MACHINE: ActionDescriptor = ActionDescriptor {
    command_name: "startVirtualMachine",
    display_label: "Start",
    is_async_job: true,
    response_envelope_key: "startvirtualmachineresponse",
};

static STOP_VIRTUAL_MACHINE: ActionDescriptor = ActionDescriptor {
    command_name: "stopVirtualMachine",
    display_label: "Stop",
    is_async_job: true,
    response_envelope_key: "stopvirtualmachineresponse",
};

/// Bulk actions the panel can submit against an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionCommand {
    StartVirtualMachine,
    StopVirtualMachine,
}

impl ActionCommand {
    pub fn descriptor(self) -> &'static ActionDescriptor {
        match self {
            ActionCommand::StartVirtualMachine => &START_VIRTUAL_MACHINE,
            ActionCommand::StopVirtualMachine => &STOP_VIRTUAL_MACHINE,
        }
    }
}
