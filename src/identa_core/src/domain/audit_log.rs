use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user_id::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    UserRegistered,
    EmailVerified,
    EmailChangeInitiated,
    UserActivated,
    UserDeactivated,
    UserDeleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserRegistered => "USER_REGISTERED",
            Self::EmailVerified => "EMAIL_VERIFIED",
            Self::EmailChangeInitiated => "EMAIL_CHANGE_INITIATED",
            Self::UserActivated => "USER_ACTIVATED",
            Self::UserDeactivated => "USER_DEACTIVATED",
            Self::UserDeleted => "USER_DELETED",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::UserRegistered,
            Self::EmailVerified,
            Self::EmailChangeInitiated,
            Self::UserActivated,
            Self::UserDeactivated,
            Self::UserDeleted,
        ]
        .into_iter()
        .find(|action| action.as_str() == s)
        .ok_or_else(|| format!("unknown audit action {s}"))
    }
}

/// Append-only record of a completed state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub actor_id: UserId,
    pub action: AuditAction,
    pub target_id: Option<UserId>,
    pub metadata: serde_json::Value,
}

impl AuditLog {
    pub fn new(
        actor_id: UserId,
        action: AuditAction,
        target_id: Option<UserId>,
        metadata: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            action,
            target_id,
            metadata,
        }
    }
}
