//! Event handlers translating hook events into store mutations and delivery
//! requests.
//!
//! Each handler performs at most one store mutation and at most one delivery
//! request. Store faults surface as errors for the binary to log and turn
//! into an exit code; delivery faults never do.

use chrono::{DateTime, Local, Utc};
use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::format::format_duration;
use crate::gateway::Notify;
use crate::rules::{
    presentation_for, FocusAction, NotificationKind, Presentation, Title, Urgency, DEFAULT_MESSAGE,
};
use crate::store::Store;

pub struct Tracker<'a, N: Notify> {
    store: &'a Store,
    notifier: &'a N,
    config: &'a Config,
}

impl<'a, N: Notify> Tracker<'a, N> {
    pub fn new(store: &'a Store, notifier: &'a N, config: &'a Config) -> Self {
        Self {
            store,
            notifier,
            config,
        }
    }

    /// WorkStarted: record the task; no notification.
    pub fn on_work_started(&self, session_id: &str, prompt: &str, cwd: &str) -> Result<()> {
        let opened = self.store.open_task(session_id, prompt, cwd)?;
        tracing::info!(session = %session_id, seq = opened.seq, "Task started");
        Ok(())
    }

    /// WorkStopped: close the most recent open task and announce its
    /// duration. A stop with no open task is a no-op, not an error.
    pub fn on_work_stopped(&self, session_id: &str, cwd: &str) -> Result<()> {
        self.on_work_stopped_at(session_id, cwd, Utc::now())
    }

    pub fn on_work_stopped_at(
        &self,
        session_id: &str,
        cwd: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let closed = match self.store.close_latest_open_task(session_id, now)? {
            Some(closed) => closed,
            None => {
                tracing::debug!(session = %session_id, "Stop without an open task");
                return Ok(());
            }
        };

        let duration = format_duration(closed.duration_seconds);
        let presentation = Presentation {
            title: Title::Project,
            subtitle: format!("Task #{} complete", closed.seq),
            message: format!("Duration: {}", duration),
            sound: self.config.sound.clone(),
            urgency: Urgency::Normal,
            focus: FocusAction::Focus,
        };
        self.notifier.deliver(&presentation, cwd_path(cwd));

        tracing::info!(
            session = %session_id,
            seq = closed.seq,
            duration = %duration,
            "Task completed"
        );
        Ok(())
    }

    /// SubagentStopped: no store interaction, just a quiet heads-up.
    pub fn on_subagent_stopped(&self, cwd: &str) -> Result<()> {
        let presentation = Presentation {
            title: Title::Project,
            subtitle: "Agent task complete".to_string(),
            message: "Subagent finished processing".to_string(),
            sound: self.config.sound.clone(),
            urgency: Urgency::Low,
            focus: FocusAction::Focus,
        };
        self.notifier.deliver(&presentation, cwd_path(cwd));
        Ok(())
    }

    /// Notification: dispatch through the rule table.
    pub fn on_generic_notification(&self, kind: &str, message: &str, cwd: &str) -> Result<()> {
        let kind = NotificationKind::parse(kind);
        let message = if message.is_empty() {
            DEFAULT_MESSAGE
        } else {
            message
        };
        let presentation = presentation_for(kind, message, &self.config.sound);
        self.notifier.deliver(&presentation, cwd_path(cwd));

        tracing::info!(
            kind = ?kind,
            urgency = presentation.urgency.as_str(),
            "Notification dispatched"
        );
        Ok(())
    }

    /// SessionStart: informational only; never focuses the editor.
    pub fn on_session_start(&self, source: &str, cwd: &str) -> Result<()> {
        self.on_session_start_at(source, cwd, Local::now())
    }

    pub fn on_session_start_at(
        &self,
        source: &str,
        cwd: &str,
        now: DateTime<Local>,
    ) -> Result<()> {
        let subtitle = match source {
            "startup" => "Session started",
            "resume" => "Session resumed",
            "clear" => "Session cleared",
            "compact" => "Session compacted",
            _ => "Session event",
        };

        let presentation = Presentation {
            title: Title::Project,
            subtitle: subtitle.to_string(),
            message: format!("Ready to work • {}", now.format("%H:%M")),
            sound: "Glass".to_string(),
            urgency: Urgency::Low,
            focus: FocusAction::None,
        };
        self.notifier.deliver(&presentation, cwd_path(cwd));
        Ok(())
    }

    /// SessionEnd: informational only; never focuses the editor.
    pub fn on_session_end(&self, reason: &str, cwd: &str) -> Result<()> {
        let presentation = Presentation {
            title: Title::Project,
            subtitle: "Session ended".to_string(),
            message: format!("Reason: {}", reason),
            sound: "Glass".to_string(),
            urgency: Urgency::Low,
            focus: FocusAction::None,
        };
        self.notifier.deliver(&presentation, cwd_path(cwd));
        Ok(())
    }
}

fn cwd_path(cwd: &str) -> Option<&Path> {
    if cwd.is_empty() {
        None
    } else {
        Some(Path::new(cwd))
    }
}
