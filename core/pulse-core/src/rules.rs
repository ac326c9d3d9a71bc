//! Notification dispatch rules.
//!
//! A pure mapping from a notification kind to its presentation template.
//! The kind set is a closed enumeration with an explicit default arm, so
//! adding a kind is a compile-time-checked decision rather than a keyed
//! lookup that silently misses.

/// Title used when no project directory is available, and for the default
/// notification kind.
pub const PRODUCT_NAME: &str = "Claude Code";

/// Message used when a notification event arrives with an empty body.
pub const DEFAULT_MESSAGE: &str = "Claude Code notification";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Low,
    Normal,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Normal => "normal",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }
}

/// Whether clicking the notification should focus the project directory.
/// `None` withholds the cwd from the delivery request even when supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusAction {
    Focus,
    None,
}

/// Notification title: either a fixed string from the rule table, or the
/// project name resolved from the cwd at delivery time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Title {
    Project,
    Static(String),
}

/// The resolved presentation bundle handed to the delivery gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub title: Title,
    pub subtitle: String,
    pub message: String,
    pub sound: String,
    pub urgency: Urgency,
    pub focus: FocusAction,
}

/// Known notification kinds carried in the `notification_type` payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    PermissionPrompt,
    IdlePrompt,
    ElicitationDialog,
    AuthSuccess,
    Other,
}

impl NotificationKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "permission_prompt" => NotificationKind::PermissionPrompt,
            "idle_prompt" => NotificationKind::IdlePrompt,
            "elicitation_dialog" => NotificationKind::ElicitationDialog,
            "auth_success" => NotificationKind::AuthSuccess,
            _ => NotificationKind::Other,
        }
    }
}

/// Builds the presentation for a notification kind.
///
/// `message` is passed through except where the table overrides it;
/// `default_sound` is the configured sound, used only by the default arm.
pub fn presentation_for(kind: NotificationKind, message: &str, default_sound: &str) -> Presentation {
    match kind {
        NotificationKind::PermissionPrompt => Presentation {
            title: Title::Static("Permission Required".to_string()),
            subtitle: "Claude needs approval".to_string(),
            message: message.to_string(),
            sound: "Basso".to_string(),
            urgency: Urgency::Critical,
            focus: FocusAction::Focus,
        },
        NotificationKind::IdlePrompt => Presentation {
            title: Title::Static("Waiting for Input".to_string()),
            subtitle: "Claude is idle".to_string(),
            message: "Waiting for your input (60+ seconds)".to_string(),
            sound: "Purr".to_string(),
            urgency: Urgency::Low,
            focus: FocusAction::Focus,
        },
        NotificationKind::ElicitationDialog => Presentation {
            title: Title::Static("Input Needed".to_string()),
            subtitle: "MCP tool requires input".to_string(),
            message: message.to_string(),
            sound: "Ping".to_string(),
            urgency: Urgency::High,
            focus: FocusAction::Focus,
        },
        NotificationKind::AuthSuccess => Presentation {
            title: Title::Static("Authentication Success".to_string()),
            subtitle: "Logged in successfully".to_string(),
            message: message.to_string(),
            sound: "Glass".to_string(),
            urgency: Urgency::Low,
            focus: FocusAction::None,
        },
        NotificationKind::Other => Presentation {
            title: Title::Static(PRODUCT_NAME.to_string()),
            subtitle: "Notification".to_string(),
            message: message.to_string(),
            sound: default_sound.to_string(),
            urgency: Urgency::Normal,
            focus: FocusAction::Focus,
        },
    }
}
