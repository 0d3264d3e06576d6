use panel_core::{DetailView, PanelViewModel, RowView, StateColor, SubjectId};
use panel_logging::panel_info;

/// Rendering contract the reconciler drives. The core never touches the
/// view; everything on screen is derived from view-model diffs.
pub trait ViewSink {
    fn render_busy(&mut self, subject: &SubjectId);
    fn render_idle(&mut self, subject: &SubjectId);
    fn render_status(&mut self, subject: &SubjectId, state: &str, color: StateColor);
    fn render_annotation(&mut self, subject: &SubjectId, text: &str, is_error: bool);
    fn render_selected(&mut self, subject: &SubjectId, selected: bool);
    fn materialize_entity(&mut self, placeholder: u64, row: &RowView);
    fn render_detail(&mut self, detail: Option<&DetailView>);
}

/// Emits view-contract calls for everything that changed between two
/// consecutive view models.
pub fn render(
    previous: Option<&PanelViewModel>,
    current: &PanelViewModel,
    sink: &mut dyn ViewSink,
) {
    for row in rows(current) {
        let before = previous.and_then(|view| find_row(view, &row.subject));

        if before.is_none() {
            if let Some(placeholder) = row.materialized_from {
                let had_placeholder = previous.is_some_and(|view| {
                    find_row(view, &SubjectId::Placeholder(placeholder)).is_some()
                });
                if had_placeholder {
                    sink.materialize_entity(placeholder, row);
                }
            }
        }

        if row.busy != before.is_some_and(|row| row.busy) {
            if row.busy {
                sink.render_busy(&row.subject);
            } else {
                sink.render_idle(&row.subject);
            }
        }

        if !row.state.is_empty() && before.map_or(true, |before| before.state != row.state) {
            sink.render_status(&row.subject, &row.state, row.state_color);
        }

        if before.map_or(true, |before| before.annotation != row.annotation) {
            if let Some(annotation) = &row.annotation {
                sink.render_annotation(&row.subject, &annotation.text, annotation.is_error);
            }
        }

        if row.selected != before.is_some_and(|row| row.selected) {
            sink.render_selected(&row.subject, row.selected);
        }
    }

    if previous.map_or(true, |view| view.detail != current.detail) {
        sink.render_detail(current.detail.as_ref());
    }
}

fn rows(view: &PanelViewModel) -> impl Iterator<Item = &RowView> {
    view.groups.iter().flat_map(|group| group.rows.iter())
}

fn find_row<'a>(view: &'a PanelViewModel, subject: &SubjectId) -> Option<&'a RowView> {
    rows(view).find(|row| &row.subject == subject)
}

/// View sink that narrates every reconciliation step to the log, standing in
/// for a real widget tree.
#[derive(Debug, Default)]
pub struct TerminalViewSink;

impl ViewSink for TerminalViewSink {
    fn render_busy(&mut self, subject: &SubjectId) {
        panel_info!("view: {} busy", describe(subject));
    }

    fn render_idle(&mut self, subject: &SubjectId) {
        panel_info!("view: {} idle", describe(subject));
    }

    fn render_status(&mut self, subject: &SubjectId, state: &str, color: StateColor) {
        panel_info!("view: {} state {} ({:?})", describe(subject), state, color);
    }

    fn render_annotation(&mut self, subject: &SubjectId, text: &str, is_error: bool) {
        if is_error {
            panel_info!("view: {} error banner: {}", describe(subject), text);
        } else {
            panel_info!("view: {} banner: {}", describe(subject), text);
        }
    }

    fn render_selected(&mut self, subject: &SubjectId, selected: bool) {
        panel_info!(
            "view: {} {}",
            describe(subject),
            if selected { "selected" } else { "deselected" }
        );
    }

    fn materialize_entity(&mut self, placeholder: u64, row: &RowView) {
        panel_info!(
            "view: placeholder #{} materialized as {}",
            placeholder,
            row.title
        );
    }

    fn render_detail(&mut self, detail: Option<&DetailView>) {
        match detail {
            Some(detail) => panel_info!("view: detail panel shows {}", detail.title),
            None => panel_info!("view: detail panel cleared"),
        }
    }
}

fn describe(subject: &SubjectId) -> String {
    match subject {
        SubjectId::Instance(id) => format!("instance {id}"),
        SubjectId::Placeholder(placeholder) => format!("placeholder #{placeholder}"),
    }
}
