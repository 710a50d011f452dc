//! Authenticated session context.
//!
//! A `Session` is only created by a successful login and is passed
//! explicitly to every operation that needs authorization.

use crate::accounts::Role;
use crate::error::{CofferError, Result};

/// The identity and role of a logged-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
    role: Role,
}

impl Session {
    pub(crate) fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail with `Unauthorized` unless this session belongs to an admin.
    pub fn require_admin(&self, action: &'static str) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!(username = %self.username, action, "admin action refused");
            Err(CofferError::Unauthorized { action })
        }
    }

    /// End the session.
    pub fn logout(self) {
        tracing::debug!(username = %self.username, "logged out");
    }
}
