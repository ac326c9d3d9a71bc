//! Event handler: reads the JSON payload from stdin and routes it.

use std::io::{self, Read};

use pulse_core::config::{self, Config};
use pulse_core::error::{PulseError, Result};
use pulse_core::event::HookInput;
use pulse_core::gateway::Gateway;
use pulse_core::store::Store;
use pulse_core::tracker::Tracker;

use crate::EventKind;

pub fn run(event: EventKind) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|err| PulseError::io("Failed to read stdin", err))?;

    // An empty payload is a no-op, not an error.
    if input.trim().is_empty() {
        tracing::warn!(event = event.as_str(), "No input data");
        return Ok(());
    }

    let hook_input: HookInput = serde_json::from_str(&input)
        .map_err(|err| PulseError::json("Failed to parse hook input", err))?;

    if hook_input.hook_event_name != event.as_str() {
        tracing::warn!(
            expected = event.as_str(),
            got = %hook_input.hook_event_name,
            "Hook event name mismatch"
        );
    }

    dispatch(event, &hook_input)
}

fn dispatch(event: EventKind, input: &HookInput) -> Result<()> {
    let config = Config::from_env();
    let store = Store::new(config::db_path()?)?;
    let gateway = Gateway::new(&config);
    let tracker = Tracker::new(&store, &gateway, &config);

    match event {
        EventKind::WorkStarted => {
            tracker.on_work_started(&input.session_id, &input.prompt, &input.cwd)
        }
        EventKind::WorkStopped => tracker.on_work_stopped(&input.session_id, &input.cwd),
        EventKind::SubagentStopped => tracker.on_subagent_stopped(&input.cwd),
        EventKind::Notification => {
            tracker.on_generic_notification(&input.notification_type, &input.message, &input.cwd)
        }
        EventKind::SessionStart => tracker.on_session_start(&input.source, &input.cwd),
        EventKind::SessionEnd => tracker.on_session_end(&input.reason, &input.cwd),
    }
}
