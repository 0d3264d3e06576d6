//! Panel app: wires the pure core to the engine and to a view sink.
mod effects;
mod runtime;
mod view;

pub use effects::EffectRunner;
pub use runtime::PanelRuntime;
pub use view::{render, TerminalViewSink, ViewSink};
