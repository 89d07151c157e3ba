//! Enumerations used by the entities

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    /// Accepted and rejected requests never change again
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// Decision a host takes on a pending join request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveAction {
    Accept,
    Reject,
}

impl ResolveAction {
    /// Parses the action path segment. The past-tense forms are kept for
    /// clients built against the `/trip-requests/{id}/accepted` style URLs.
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "accept" | "accepted" => Some(ResolveAction::Accept),
            "reject" | "rejected" => Some(ResolveAction::Reject),
            _ => None,
        }
    }

    pub fn target_status(&self) -> RequestStatus {
        match self {
            ResolveAction::Accept => RequestStatus::Accepted,
            ResolveAction::Reject => RequestStatus::Rejected,
        }
    }
}
