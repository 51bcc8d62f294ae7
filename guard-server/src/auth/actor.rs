//! Actor context
//!
//! Identity is established upstream (the dashboard's auth layer) and
//! forwarded per request; this service never checks credentials itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role claim forwarded by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Operator,
    Supervisor,
    Management,
    Admin,
}

impl ActorRole {
    /// Explicit role claim replaces the legacy username-substring bypass:
    /// only Admin skips the geofence gate.
    pub fn bypasses_geofence(self) -> bool {
        matches!(self, ActorRole::Admin)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, ActorRole::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActorRole::Operator => "operator",
            ActorRole::Supervisor => "supervisor",
            ActorRole::Management => "management",
            ActorRole::Admin => "admin",
        }
    }
}

impl FromStr for ActorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "operator" => Ok(ActorRole::Operator),
            "supervisor" => Ok(ActorRole::Supervisor),
            "management" => Ok(ActorRole::Management),
            "admin" => Ok(ActorRole::Admin),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated actor for the current request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentActor {
    pub id: String,
    pub name: String,
    pub role: ActorRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!("Admin".parse::<ActorRole>().unwrap(), ActorRole::Admin);
        assert_eq!(
            " supervisor ".parse::<ActorRole>().unwrap(),
            ActorRole::Supervisor
        );
        assert!("root".parse::<ActorRole>().is_err());
    }

    #[test]
    fn only_admin_bypasses_geofence() {
        assert!(ActorRole::Admin.bypasses_geofence());
        assert!(!ActorRole::Management.bypasses_geofence());
        assert!(!ActorRole::Supervisor.bypasses_geofence());
        assert!(!ActorRole::Operator.bypasses_geofence());
    }
}
