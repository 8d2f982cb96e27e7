use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LensResult;

/// Role attached to an authenticated user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UserRole {
    Admin,
    User,
    /// Any role value the backend sends that this client does not know.
    #[serde(other)]
    Unknown,
}

impl UserRole {
    /// Only `Admin` may see analytics.
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::User => "User",
            UserRole::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" | "admin" => Ok(UserRole::Admin),
            "User" | "user" => Ok(UserRole::User),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Profile returned by `GET /users/me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    pub role: UserRole,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "joinDate", alias = "join_date")]
    pub join_date: Option<String>,
}

/// Aggregated feedback analytics produced by the backend. Every field may be
/// absent on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Analytics {
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub trends: Vec<String>,
}

impl Analytics {
    /// Read an analytics payload from a JSON file.
    pub fn load(path: &Path) -> LensResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
