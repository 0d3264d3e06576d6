use std::sync::Once;

use panel_core::{
    update, ActionKind, Effect, Instance, InstanceId, JobId, JobOutcome, Msg, PanelState,
    PanelViewModel, RowView, SubjectId,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(panel_logging::initialize_for_tests);
}

fn instance(id: &str, name: &str, state: &str) -> Instance {
    Instance {
        id: InstanceId::new(id),
        name: name.to_string(),
        state: state.to_string(),
        ..Instance::default()
    }
}

fn loaded_and_selected(ids: &[&str]) -> PanelState {
    let instances = ids
        .iter()
        .map(|id| instance(id, &format!("vm-{id}"), "Running"))
        .collect();
    let (mut state, _) = update(PanelState::new(), Msg::InstancesLoaded(instances));
    for id in ids {
        let (next, _) = update(
            state,
            Msg::InstanceClicked {
                id: InstanceId::new(*id),
            },
        );
        state = next;
    }
    state
}

fn row<'a>(view: &'a PanelViewModel, id: &str) -> &'a RowView {
    view.groups
        .iter()
        .flat_map(|group| group.rows.iter())
        .find(|row| row.subject == SubjectId::Instance(InstanceId::new(id)))
        .expect("row for instance id")
}

#[test]
fn dispatch_submits_one_job_per_selected_instance() {
    init_logging();
    let state = loaded_and_selected(&["1", "2"]);

    let (state, effects) = update(
        state,
        Msg::ActionRequested {
            action: ActionKind::Stop,
        },
    );

    assert_eq!(
        effects,
        vec![
            Effect::SubmitAction {
                action: ActionKind::Stop,
                subject: InstanceId::new("1"),
            },
            Effect::SubmitAction {
                action: ActionKind::Stop,
                subject: InstanceId::new("2"),
            },
        ]
    );

    // The Selection Set is drained before either job resolves.
    let view = state.view();
    assert_eq!(view.selected_count, 0);
    assert!(row(&view, "1").busy);
    assert!(row(&view, "2").busy);
}

#[test]
fn dispatch_with_empty_selection_is_inert() {
    init_logging();
    let (state, _) = update(
        PanelState::new(),
        Msg::InstancesLoaded(vec![instance("1", "vm-1", "Running")]),
    );

    let (_state, effects) = update(
        state,
        Msg::ActionRequested {
            action: ActionKind::Start,
        },
    );

    assert!(effects.is_empty());
}

#[test]
fn same_selection_cannot_be_dispatched_twice() {
    init_logging();
    let state = loaded_and_selected(&["1"]);

    let (state, effects) = update(
        state,
        Msg::ActionRequested {
            action: ActionKind::Stop,
        },
    );
    assert_eq!(effects.len(), 1);

    let (_state, effects) = update(
        state,
        Msg::ActionRequested {
            action: ActionKind::Stop,
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn busy_rows_hide_their_annotation() {
    init_logging();
    let state = loaded_and_selected(&["1"]);

    // Run one action to completion so the row carries a banner.
    let (state, _) = update(
        state,
        Msg::ActionRequested {
            action: ActionKind::Stop,
        },
    );
    let (state, _) = update(
        state,
        Msg::SubmissionAccepted {
            subject: SubjectId::Instance(InstanceId::new("1")),
            action: Some(ActionKind::Stop),
            job_id: JobId::new("9"),
        },
    );
    let (state, _) = update(
        state,
        Msg::JobResolved {
            job_id: JobId::new("9"),
            outcome: JobOutcome::Succeeded { instance: None },
        },
    );
    assert!(row(&state.view(), "1").annotation.is_some());

    // Re-select (dispatch drained the set) and dispatch again.
    let (state, _) = update(
        state,
        Msg::InstanceClicked {
            id: InstanceId::new("1"),
        },
    );
    let (state, _) = update(
        state,
        Msg::ActionRequested {
            action: ActionKind::Start,
        },
    );

    let view = state.view();
    assert!(row(&view, "1").busy);
    assert!(row(&view, "1").annotation.is_none());
}
