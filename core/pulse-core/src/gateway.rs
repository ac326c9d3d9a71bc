//! Best-effort desktop notification delivery.
//!
//! Attempts terminal-notifier first and falls back to osascript when it is
//! not installed. Every other transport fault is logged and swallowed: a
//! missed desktop notification is never fatal to the hook invocation. Each
//! transport call is bounded by a timeout so a hung external program cannot
//! hang the hook.

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::rules::{FocusAction, Presentation, Title, PRODUCT_NAME};

const TRANSPORT_TIMEOUT: Duration = Duration::from_secs(5);
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Delivery seam the tracker depends on; tests substitute a recording
/// implementation.
pub trait Notify {
    fn deliver(&self, presentation: &Presentation, cwd: Option<&Path>) -> DeliveryOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { transport: &'static str },
    Failed,
}

/// A presentation with its cwd-derived fields resolved: final title text and
/// the click-to-open command, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNotification {
    pub title: String,
    pub subtitle: String,
    pub message: String,
    pub sound: String,
    pub click_command: Option<String>,
}

/// Resolves a presentation against the event's cwd.
///
/// A `FocusAction::None` presentation never yields a click command, even
/// when a cwd was supplied; the cwd is still used for project-name titles.
pub fn resolve(
    presentation: &Presentation,
    cwd: Option<&Path>,
    editor: &str,
) -> ResolvedNotification {
    let title = match &presentation.title {
        Title::Project => project_name(cwd),
        Title::Static(text) => text.clone(),
    };

    let click_command = match presentation.focus {
        FocusAction::Focus => cwd
            .filter(|path| !path.as_os_str().is_empty())
            .map(|path| editor_open_command(editor, path)),
        FocusAction::None => None,
    };

    ResolvedNotification {
        title,
        subtitle: presentation.subtitle.clone(),
        message: presentation.message.clone(),
        sound: presentation.sound.clone(),
        click_command,
    }
}

fn project_name(cwd: Option<&Path>) -> String {
    cwd.and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| PRODUCT_NAME.to_string())
}

/// Maps an editor identifier to its open-at-path command line, with an
/// identity fallback for unrecognized editors.
fn editor_open_command(editor: &str, path: &Path) -> String {
    let path = path.display();
    match editor {
        "zed" => format!("zed \"{}\"", path),
        "code" => format!("/usr/local/bin/code \"{}\"", path),
        "cursor" => format!("cursor \"{}\"", path),
        "subl" => format!("subl \"{}\"", path),
        "atom" => format!("atom \"{}\"", path),
        other => format!("{} \"{}\"", other, path),
    }
}

pub struct Gateway {
    editor: String,
}

impl Gateway {
    pub fn new(config: &Config) -> Self {
        Self {
            editor: config.editor.clone(),
        }
    }
}

impl Notify for Gateway {
    fn deliver(&self, presentation: &Presentation, cwd: Option<&Path>) -> DeliveryOutcome {
        let resolved = resolve(presentation, cwd, &self.editor);

        match run_terminal_notifier(&resolved) {
            Ok(()) => {
                tracing::info!(
                    title = %resolved.title,
                    subtitle = %resolved.subtitle,
                    "Sent notification"
                );
                DeliveryOutcome::Delivered {
                    transport: "terminal-notifier",
                }
            }
            Err(TransportError::NotInstalled) => match run_osascript(&resolved) {
                Ok(()) => {
                    tracing::info!(title = %resolved.title, "Sent notification via osascript");
                    DeliveryOutcome::Delivered {
                        transport: "osascript",
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "Failed to send notification");
                    DeliveryOutcome::Failed
                }
            },
            Err(err) => {
                tracing::error!(error = %err, "Notification transport failed");
                DeliveryOutcome::Failed
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum TransportError {
    #[error("transport not installed")]
    NotInstalled,
    #[error("transport failed: {0}")]
    Io(std::io::Error),
    #[error("transport exited with {0}")]
    Exit(ExitStatus),
    #[error("transport timed out after {0:?}")]
    TimedOut(Duration),
}

fn run_terminal_notifier(resolved: &ResolvedNotification) -> Result<(), TransportError> {
    let mut command = Command::new("terminal-notifier");
    command
        .arg("-title")
        .arg(&resolved.title)
        .arg("-subtitle")
        .arg(&resolved.subtitle)
        .arg("-message")
        .arg(&resolved.message)
        .arg("-sound")
        .arg(&resolved.sound);

    if let Some(click_command) = &resolved.click_command {
        command.arg("-execute").arg(click_command);
    }

    run_bounded(command)
}

fn run_osascript(resolved: &ResolvedNotification) -> Result<(), TransportError> {
    let script = format!(
        "display notification \"{}\" with title \"{}\" subtitle \"{}\" sound name \"{}\"",
        escape_applescript(&resolved.message),
        escape_applescript(&resolved.title),
        escape_applescript(&resolved.subtitle),
        escape_applescript(&resolved.sound),
    );

    let mut command = Command::new("osascript");
    command.arg("-e").arg(script);
    run_bounded(command)
}

fn escape_applescript(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Spawns the transport and waits at most `TRANSPORT_TIMEOUT`, killing the
/// child on deadline.
fn run_bounded(mut command: Command) -> Result<(), TransportError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(TransportError::NotInstalled)
        }
        Err(err) => return Err(TransportError::Io(err)),
    };

    let deadline = Instant::now() + TRANSPORT_TIMEOUT;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                if status.success() {
                    return Ok(());
                }
                return Err(TransportError::Exit(status));
            }
            Ok(None) => {}
            Err(err) => return Err(TransportError::Io(err)),
        }

        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(TransportError::TimedOut(TRANSPORT_TIMEOUT));
        }

        sleep(WAIT_POLL_INTERVAL);
    }
}
