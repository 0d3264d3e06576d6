//! Panel core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod sanitize;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use sanitize::sanitize_markup;
pub use state::{
    ActionKind, Annotation, DeploySpec, Instance, InstanceId, JobId, JobOutcome, PanelState,
    SubjectId, NO_GROUP_NAME,
};
pub use update::update;
pub use view_model::{
    state_color, DetailView, GroupView, PanelViewModel, RowView, StateColor,
};
