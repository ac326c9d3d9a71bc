//! pulse-hook: CLI hook handler for Pulse task tracking and notifications.
//!
//! Invoked once per assistant lifecycle hook event with the event kind as its
//! only argument; the event payload arrives as a JSON object on stdin.
//!
//! ## Event routing
//!
//! ```text
//! WorkStarted     → open a task (no notification)
//! WorkStopped     → close the latest open task, announce its duration
//! SubagentStopped → quiet heads-up
//! Notification    → dispatch through the rule table
//! SessionStart    → informational, never focuses the editor
//! SessionEnd      → informational, never focuses the editor
//! ```

mod handle;
mod logging;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "pulse-hook")]
#[command(about = "Task tracking and notification dispatch for assistant hooks")]
#[command(version)]
struct Cli {
    /// Hook event kind; the payload is read from stdin as JSON
    #[arg(value_enum, value_name = "EVENT")]
    event: EventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum EventKind {
    WorkStarted,
    WorkStopped,
    SubagentStopped,
    Notification,
    SessionStart,
    SessionEnd,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::WorkStarted => "WorkStarted",
            EventKind::WorkStopped => "WorkStopped",
            EventKind::SubagentStopped => "SubagentStopped",
            EventKind::Notification => "Notification",
            EventKind::SessionStart => "SessionStart",
            EventKind::SessionEnd => "SessionEnd",
        }
    }
}

fn main() {
    let _logging_guard = logging::init();

    // Missing or unrecognized event arguments exit 1; --help/--version keep
    // clap's own exit codes.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                err.exit();
            }
            let _ = err.print();
            tracing::error!(error = ?err.kind(), "Invalid invocation");
            std::process::exit(1);
        }
    };

    if let Err(err) = handle::run(cli.event) {
        tracing::error!(event = cli.event.as_str(), error = %err, "pulse-hook failed");
        std::process::exit(1);
    }
}
