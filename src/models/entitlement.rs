use crate::models::GameResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a user may access a game. Classification is priority-ordered and the
/// first match wins: a missing game, then free-to-play, then permanent
/// ownership, then active subscription coverage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "access", rename_all = "snake_case")]
pub enum GameAccess {
    NoAccess {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Free,
    Purchased {
        purchased_at: DateTime<Utc>,
    },
    Subscription {
        plan_name: String,
        expires_at: DateTime<Utc>,
    },
}

impl GameAccess {
    pub fn denied(reason: &str) -> Self {
        GameAccess::NoAccess {
            reason: Some(reason.to_string()),
        }
    }

    pub fn is_granted(&self) -> bool {
        !matches!(self, GameAccess::NoAccess { .. })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LibraryEntry {
    pub game: GameResponse,
    pub access: GameAccess,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LibraryResponse {
    pub games: Vec<LibraryEntry>,
}
