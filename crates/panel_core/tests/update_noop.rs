use panel_core::{update, Effect, Msg, PanelState};

#[test]
fn update_is_noop() {
    let state = PanelState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn panel_opened_requests_instance_load() {
    let (_state, effects) = update(PanelState::new(), Msg::PanelOpened);

    assert_eq!(effects, vec![Effect::LoadInstances]);
}
