//! Team permission grants.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
#[path = "permission_tests.rs"]
mod tests;

/// Access level granted to a team on a repository.
///
/// The serialized names match the values the GitHub team-repository endpoint
/// accepts: `admin`, `push`, `pull`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// Full administrative access.
    Admin,
    /// Write access.
    Push,
    /// Read access.
    Pull,
}

impl PermissionLevel {
    /// The wire value for the team-repository grant endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::Admin => "admin",
            PermissionLevel::Push => "push",
            PermissionLevel::Pull => "pull",
        }
    }

    /// Converts a raw GitHub permission string into a level.
    ///
    /// GitHub reports team permissions with several spellings (`push` vs
    /// `write`, `pull` vs `read`). Unrecognized or empty input maps to
    /// [`PermissionLevel::Pull`], the lowest level, so an unknown upstream
    /// value can never escalate access.
    pub fn from_github(raw: &str) -> Self {
        match raw {
            "admin" => PermissionLevel::Admin,
            "push" | "write" => PermissionLevel::Push,
            "pull" | "read" => PermissionLevel::Pull,
            _ => PermissionLevel::Pull,
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A team and the permission level it is granted.
///
/// One grant per team per organization-wide configuration; the grant is
/// applied to every configured repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPermission {
    /// The team slug.
    #[serde(rename = "name")]
    pub team: String,

    /// The level granted to the team.
    pub level: PermissionLevel,
}
