//! # pulse-core
//!
//! Core library for Pulse: task/session tracking and notification dispatch
//! behind coding-assistant lifecycle hooks.
//!
//! Each hook invocation is a short-lived process. The store (SQLite) is the
//! only state shared between invocations; the tracker turns one event into at
//! most one store mutation and at most one delivery request; the gateway
//! attempts best-effort delivery and never fails the invocation.

pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod gateway;
pub mod rules;
pub mod store;
pub mod tracker;

pub use config::Config;
pub use error::{PulseError, Result};
pub use event::HookInput;
pub use gateway::{DeliveryOutcome, Gateway, Notify};
pub use rules::{NotificationKind, Presentation, Urgency};
pub use store::Store;
pub use tracker::Tracker;
