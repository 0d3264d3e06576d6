use std::thread;
use std::time::Duration;

use panel_app::{PanelRuntime, TerminalViewSink};
use panel_core::Msg;
use panel_engine::EngineConfig;
use panel_logging::LogDestination;

fn main() -> anyhow::Result<()> {
    panel_logging::initialize(LogDestination::Terminal);

    let api_base_url = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: panel_app <control-plane-url>"))?;

    let mut runtime = PanelRuntime::new(
        EngineConfig::new(api_base_url),
        Box::new(TerminalViewSink::default()),
    )?;
    runtime.send(Msg::PanelOpened);

    // Headless monitor loop: messages in, renders out, until interrupted.
    loop {
        runtime.send(Msg::Tick);
        runtime.pump();
        thread::sleep(Duration::from_millis(75));
    }
}
