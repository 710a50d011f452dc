//! Account table data model.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CofferError;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CofferError;

    /// Parse a role name, ignoring ASCII case and surrounding whitespace.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("admin") {
            Ok(Role::Admin)
        } else if trimmed.eq_ignore_ascii_case("user") {
            Ok(Role::User)
        } else {
            Err(CofferError::InvalidRole(value.to_string()))
        }
    }
}

/// One persisted account.
///
/// Field names match the on-disk JSON: `salt` and `key` are base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub salt: String,
    #[serde(rename = "key")]
    pub derived_key: String,
    pub role: Role,
}

/// The whole account table, keyed by username.
///
/// A `BTreeMap` keeps the rewritten file stable across registrations.
pub type AccountTable = BTreeMap<String, AccountRecord>;
