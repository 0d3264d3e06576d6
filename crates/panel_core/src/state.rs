use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::sanitize::sanitize_markup;
use crate::view_model::PanelViewModel;

/// Group label shown for instances without a user-assigned group.
pub const NO_GROUP_NAME: &str = "(no group name)";

/// Opaque control-plane identifier of a virtual machine instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of an outstanding asynchronous job, assigned by the
/// control plane at submission time.
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

/// The view element a job result is routed back to: either an existing
/// instance or a locally allocated placeholder for a deploy in flight.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubjectId {
    Instance(InstanceId),
    Placeholder(u64),
}

/// Bulk action the operator can invoke on selected instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Start,
    Stop,
}

impl ActionKind {
    pub fn display_label(self) -> &'static str {
        match self {
            ActionKind::Start => "Start",
            ActionKind::Stop => "Stop",
        }
    }
}

/// Instance record as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Instance {
    pub id: InstanceId,
    pub name: String,
    pub display_name: String,
    pub ip_address: String,
    pub state: String,
    pub group: String,
    pub zone_name: String,
    pub template_name: String,
    pub service_offering_name: String,
    pub ha_enabled: bool,
    pub created: String,
    pub account: String,
    pub domain: String,
    pub host_name: String,
    pub iso_id: Option<String>,
}

impl Instance {
    /// Operator-facing title: the display name, falling back to the
    /// hypervisor name when no display name is set.
    pub fn display_title(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }

    fn group_label(&self) -> String {
        group_label(&self.group)
    }
}

fn group_label(group: &str) -> String {
    if group.is_empty() {
        NO_GROUP_NAME.to_string()
    } else {
        group.to_string()
    }
}

/// Result banner recorded on a row once its job reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub text: String,
    pub is_error: bool,
}

impl Annotation {
    fn success(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    fn error(text: String) -> Self {
        Self {
            text,
            is_error: true,
        }
    }
}

/// Terminal result of one tracked job, as reported by the job tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// `jobstatus == 1`; the payload may carry the updated entity.
    Succeeded { instance: Option<Instance> },
    /// `jobstatus == 2`; `reason` is server-provided text and is sanitized
    /// before display.
    Failed { reason: String },
    /// The configured maximum wait elapsed before a terminal status.
    TimedOut,
    /// Polling was abandoned: transport retries exhausted, or an unknown
    /// status code. `message` is client-generated.
    Aborted { message: String },
}

/// Parameters for a deploy submission, collected by the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySpec {
    pub zone_id: String,
    pub display_name: Option<String>,
    pub group: Option<String>,
    pub template_id: String,
    pub service_offering_id: String,
    pub disk_offering_id: Option<String>,
}

/// One outstanding job in the routing table: where its terminal result goes
/// and how its status messages are labelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrackedJob {
    pub subject: SubjectId,
    /// `None` marks a deploy job.
    pub action: Option<ActionKind>,
}

impl TrackedJob {
    fn label(&self) -> &'static str {
        match self.action {
            Some(action) => action.display_label(),
            None => "Deploy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RowKind {
    Instance(Instance),
    Deploying { group: String },
    DeployFailed { group: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Row {
    pub subject: SubjectId,
    pub kind: RowKind,
    pub busy: bool,
    pub annotation: Option<Annotation>,
    /// Set when this row was materialized from a deploy placeholder, so the
    /// view layer can replace the placeholder element in place.
    pub materialized_from: Option<u64>,
}

impl Row {
    pub(crate) fn group_name(&self) -> String {
        match &self.kind {
            RowKind::Instance(instance) => instance.group_label(),
            RowKind::Deploying { group } | RowKind::DeployFailed { group } => group_label(group),
        }
    }
}

/// All mutable panel state: instance rows, the Selection Set, the job
/// routing table and the detail panel. Mutated only through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelState {
    rows: Vec<Row>,
    selection: BTreeSet<InstanceId>,
    jobs: BTreeMap<JobId, TrackedJob>,
    detail: Option<InstanceId>,
    load_error: Option<String>,
    next_placeholder: u64,
    dirty: bool,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> PanelViewModel {
        crate::view_model::project(self)
    }

    /// Returns whether a render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn selection(&self) -> &BTreeSet<InstanceId> {
        &self.selection
    }

    pub(crate) fn detail(&self) -> Option<&InstanceId> {
        self.detail.as_ref()
    }

    pub(crate) fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub(crate) fn outstanding_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Replaces the instance rows with a fresh listing. Busy markers and
    /// annotations survive for ids still present; placeholder rows for
    /// deploys in flight are kept at the end of the list.
    pub(crate) fn load_instances(&mut self, instances: Vec<Instance>) {
        let previous = std::mem::take(&mut self.rows);
        let mut rows = Vec::with_capacity(instances.len());
        for instance in instances {
            let subject = SubjectId::Instance(instance.id.clone());
            let carried = previous.iter().find(|row| row.subject == subject);
            rows.push(Row {
                subject,
                kind: RowKind::Instance(instance),
                busy: carried.map(|row| row.busy).unwrap_or(false),
                annotation: carried.and_then(|row| row.annotation.clone()),
                materialized_from: None,
            });
        }
        rows.extend(
            previous
                .into_iter()
                .filter(|row| matches!(row.subject, SubjectId::Placeholder(_))),
        );
        self.rows = rows;
        let rows = &self.rows;
        self.selection
            .retain(|id| rows_contain_instance(rows, id));
        let detail_gone = self
            .detail
            .as_ref()
            .is_some_and(|id| !rows_contain_instance(&self.rows, id));
        if detail_gone {
            self.detail = None;
        }
        self.load_error = None;
        self.dirty = true;
    }

    pub(crate) fn set_load_error(&mut self, message: String) {
        self.load_error = Some(message);
        self.dirty = true;
    }

    /// Toggles Selection Set membership for a listed instance. Selecting
    /// focuses the detail panel on that instance; deselecting clears the
    /// detail panel if it was showing it. Clicks on unknown ids are ignored.
    pub(crate) fn toggle_selection(&mut self, id: &InstanceId) {
        if !rows_contain_instance(&self.rows, id) {
            return;
        }
        if self.selection.remove(id) {
            if self.detail.as_ref() == Some(id) {
                self.detail = None;
            }
        } else {
            self.selection.insert(id.clone());
            self.detail = Some(id.clone());
        }
        self.dirty = true;
    }

    /// Stable snapshot of the Selection Set for one dispatch.
    pub(crate) fn selection_snapshot(&self) -> Vec<InstanceId> {
        self.selection.iter().cloned().collect()
    }

    pub(crate) fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.dirty = true;
        }
    }

    /// Raises the busy indicator on a row, ahead of its submission.
    pub(crate) fn begin_submission(&mut self, subject: &SubjectId) {
        if let Some(idx) = self.row_index(subject) {
            self.rows[idx].busy = true;
            self.dirty = true;
        }
    }

    /// Appends a placeholder row for a deploy in flight and returns its id.
    pub(crate) fn add_placeholder(&mut self, group: Option<String>) -> u64 {
        self.next_placeholder += 1;
        let placeholder = self.next_placeholder;
        self.rows.push(Row {
            subject: SubjectId::Placeholder(placeholder),
            kind: RowKind::Deploying {
                group: group.unwrap_or_default(),
            },
            busy: true,
            annotation: None,
            materialized_from: None,
        });
        self.dirty = true;
        placeholder
    }

    /// Records the `JobId -> SubjectId` routing entry once the control plane
    /// has accepted a submission.
    pub(crate) fn track_job(
        &mut self,
        job_id: JobId,
        subject: SubjectId,
        action: Option<ActionKind>,
    ) {
        self.jobs.insert(job_id, TrackedJob { subject, action });
    }

    /// A submission failed before a job id was obtained: lower the busy
    /// indicator and record an entity-scoped failure banner.
    pub(crate) fn apply_submission_failure(
        &mut self,
        subject: &SubjectId,
        action: Option<ActionKind>,
        message: &str,
    ) {
        let label = match action {
            Some(action) => action.display_label(),
            None => "Deploy",
        };
        let annotation = Annotation::error(format!("{label} action failed. Reason: {message}"));
        self.finish_row(subject, annotation);
    }

    /// Routes a terminal job result back to its subject. The first terminal
    /// observation removes the job from the tracked set; anything after that
    /// (or an unknown job id) is ignored, so reconciliation happens exactly
    /// once per job.
    pub(crate) fn apply_job_outcome(&mut self, job_id: &JobId, outcome: JobOutcome) {
        let Some(job) = self.jobs.remove(job_id) else {
            return;
        };
        let label = job.label();
        match outcome {
            JobOutcome::Succeeded { instance } => {
                self.apply_success(&job, instance, label);
            }
            JobOutcome::Failed { reason } => {
                let annotation = Annotation::error(format!(
                    "{label} action failed. Reason: {}",
                    sanitize_markup(&reason)
                ));
                self.finish_row(&job.subject, annotation);
            }
            JobOutcome::TimedOut => {
                let annotation = Annotation::error(format!("{label} action timed out."));
                self.finish_row(&job.subject, annotation);
            }
            JobOutcome::Aborted { message } => {
                let annotation =
                    Annotation::error(format!("{label} action failed. Reason: {message}"));
                self.finish_row(&job.subject, annotation);
            }
        }
        self.dirty = true;
    }

    fn apply_success(&mut self, job: &TrackedJob, instance: Option<Instance>, label: &str) {
        let Some(idx) = self.row_index(&job.subject) else {
            return;
        };
        let row = &mut self.rows[idx];
        row.busy = false;
        row.annotation = Some(Annotation::success(format!("{label} action succeeded.")));
        match (&job.subject, instance) {
            (SubjectId::Placeholder(placeholder), Some(instance)) => {
                // Materialize the placeholder into a fully populated row.
                row.subject = SubjectId::Instance(instance.id.clone());
                row.kind = RowKind::Instance(instance);
                row.materialized_from = Some(*placeholder);
            }
            (SubjectId::Instance(_), Some(updated)) => {
                // Only the status indicator is reconciled from the payload.
                if let RowKind::Instance(current) = &mut row.kind {
                    current.state = updated.state;
                }
            }
            (_, None) => {}
        }
    }

    fn finish_row(&mut self, subject: &SubjectId, annotation: Annotation) {
        if let Some(idx) = self.row_index(subject) {
            let row = &mut self.rows[idx];
            row.busy = false;
            row.annotation = Some(annotation);
            if let RowKind::Deploying { group } = &row.kind {
                row.kind = RowKind::DeployFailed {
                    group: group.clone(),
                };
            }
            self.dirty = true;
        }
    }

    fn row_index(&self, subject: &SubjectId) -> Option<usize> {
        self.rows.iter().position(|row| &row.subject == subject)
    }
}

fn rows_contain_instance(rows: &[Row], id: &InstanceId) -> bool {
    rows.iter()
        .any(|row| matches!(&row.subject, SubjectId::Instance(existing) if existing == id))
}
