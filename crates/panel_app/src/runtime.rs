use std::sync::mpsc;

use panel_core::{update, Msg, PanelState, PanelViewModel};
use panel_engine::{ConfigError, EngineConfig, EngineHandle};

use crate::effects::EffectRunner;
use crate::view::{render, ViewSink};

/// Owns the panel state and drives the message/effect/render cycle.
pub struct PanelRuntime {
    state: PanelState,
    msg_tx: mpsc::Sender<Msg>,
    msg_rx: mpsc::Receiver<Msg>,
    effects: EffectRunner,
    sink: Box<dyn ViewSink>,
    last_view: Option<PanelViewModel>,
}

impl PanelRuntime {
    pub fn new(config: EngineConfig, sink: Box<dyn ViewSink>) -> Result<Self, ConfigError> {
        Ok(Self::with_engine(EngineHandle::new(config)?, sink))
    }

    /// Builds the runtime over an existing engine; used by tests that script
    /// the control plane in process.
    pub fn with_engine(engine: EngineHandle, sink: Box<dyn ViewSink>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        let effects = EffectRunner::new(engine, msg_tx.clone());
        Self {
            state: PanelState::new(),
            msg_tx,
            msg_rx,
            effects,
            sink,
            last_view: None,
        }
    }

    /// Queues a message for the next pump.
    pub fn send(&self, msg: Msg) {
        let _ = self.msg_tx.send(msg);
    }

    /// Applies every queued message, hands effects to the engine, and
    /// renders when the state marked itself dirty.
    pub fn pump(&mut self) {
        let mut inbox = Vec::new();
        while let Ok(msg) = self.msg_rx.try_recv() {
            inbox.push(msg);
        }
        for msg in inbox {
            self.dispatch_msg(msg);
        }
    }

    pub fn view(&self) -> PanelViewModel {
        self.state.view()
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.effects.enqueue(effects);
        if was_dirty {
            let view = self.state.view();
            render(self.last_view.as_ref(), &view, self.sink.as_mut());
            self.last_view = Some(view);
        }
    }
}
