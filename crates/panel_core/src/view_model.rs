use crate::state::{PanelState, Row, RowKind};
use crate::{Annotation, Instance, SubjectId};

/// Color of a status indicator, mirroring the classic green/red/gray icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateColor {
    Green,
    Red,
    Gray,
}

/// Maps an instance state string onto its indicator color.
pub fn state_color(state: &str) -> StateColor {
    match state {
        "Running" => StateColor::Green,
        "Stopped" => StateColor::Red,
        // Destroyed, Creating, and anything else.
        _ => StateColor::Gray,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelViewModel {
    pub groups: Vec<GroupView>,
    pub detail: Option<DetailView>,
    pub selected_count: usize,
    pub outstanding_jobs: usize,
    pub load_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub name: String,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub subject: SubjectId,
    pub title: String,
    pub ip_address: String,
    pub state: String,
    pub state_color: StateColor,
    pub busy: bool,
    pub selected: bool,
    /// Hidden while the row is busy, like the info icon it stands in for.
    pub annotation: Option<Annotation>,
    pub materialized_from: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub state: String,
    pub state_color: StateColor,
    pub ip_address: String,
    pub zone_name: String,
    pub template_name: String,
    pub service_offering_name: String,
    pub ha_enabled: bool,
    pub created: String,
    pub account: String,
    pub domain: String,
    pub host_name: String,
    pub group: String,
    pub iso_attached: bool,
    pub annotation: Option<Annotation>,
}

pub(crate) fn project(state: &PanelState) -> PanelViewModel {
    let mut groups: Vec<GroupView> = Vec::new();
    for row in state.rows() {
        let name = row.group_name();
        let view_row = project_row(state, row);
        // Groups keep the order in which the listing first mentions them.
        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => group.rows.push(view_row),
            None => groups.push(GroupView {
                name,
                rows: vec![view_row],
            }),
        }
    }

    PanelViewModel {
        groups,
        detail: state.detail().and_then(|id| {
            state.rows().iter().find_map(|row| match &row.kind {
                RowKind::Instance(instance) if &instance.id == id => {
                    Some(project_detail(instance, row))
                }
                _ => None,
            })
        }),
        selected_count: state.selection().len(),
        outstanding_jobs: state.outstanding_jobs(),
        load_error: state.load_error().map(ToOwned::to_owned),
    }
}

fn project_row(state: &PanelState, row: &Row) -> RowView {
    let (title, ip_address, instance_state, selected) = match &row.kind {
        RowKind::Instance(instance) => (
            instance.display_title().to_string(),
            instance.ip_address.clone(),
            instance.state.clone(),
            state.selection().contains(&instance.id),
        ),
        RowKind::Deploying { .. } => ("Adding....".to_string(), String::new(), String::new(), false),
        RowKind::DeployFailed { .. } => {
            ("Adding failed".to_string(), String::new(), String::new(), false)
        }
    };
    RowView {
        subject: row.subject.clone(),
        title,
        ip_address,
        state_color: state_color(&instance_state),
        state: instance_state,
        busy: row.busy,
        selected,
        annotation: if row.busy { None } else { row.annotation.clone() },
        materialized_from: row.materialized_from,
    }
}

fn project_detail(instance: &Instance, row: &Row) -> DetailView {
    DetailView {
        title: instance.display_title().to_string(),
        state: instance.state.clone(),
        state_color: state_color(&instance.state),
        ip_address: instance.ip_address.clone(),
        zone_name: instance.zone_name.clone(),
        template_name: instance.template_name.clone(),
        service_offering_name: instance.service_offering_name.clone(),
        ha_enabled: instance.ha_enabled,
        created: instance.created.clone(),
        account: instance.account.clone(),
        domain: instance.domain.clone(),
        host_name: instance.host_name.clone(),
        group: row.group_name(),
        iso_attached: instance.iso_id.as_deref().is_some_and(|iso| !iso.is_empty()),
        annotation: if row.busy { None } else { row.annotation.clone() },
    }
}
