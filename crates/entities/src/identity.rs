//! Caller identity.

use serde::{Deserialize, Serialize};

/// The authenticated caller, as supplied by the session provider.
///
/// The email doubles as the identity string stored in `Task::owner` and
/// `Comment::author`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Email address.
    pub email: String,
    /// Display name (if available).
    pub name: Option<String>,
}

impl Identity {
    /// Creates a new identity.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the display name if one was supplied.
    pub fn named(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.trim().is_empty())
    }

    /// Returns the display name, falling back to the email.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}
