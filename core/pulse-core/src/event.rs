//! Hook payload read from stdin.
//!
//! Fields are present per event kind; absent fields default to the empty
//! string. Unknown fields are ignored so newer assistant versions can add
//! payload fields without breaking older hooks.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub hook_event_name: String,
    #[serde(default)]
    pub session_id: String,
    /// Only present for WorkStarted.
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub cwd: String,
    /// Only present for Notification.
    #[serde(default)]
    pub notification_type: String,
    #[serde(default)]
    pub message: String,
    /// Only present for SessionStart.
    #[serde(default)]
    pub source: String,
    /// Only present for SessionEnd.
    #[serde(default)]
    pub reason: String,
}
