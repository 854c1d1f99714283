//! Bodies exchanged with the HTTP service beyond the documents themselves.

use crate::RoomCode;
use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Value of [`Outcome::error`] when the room code is already in use.
pub const ROOM_CODE_TAKEN: &str = "Room code already exists";
/// Value of [`Outcome::error`] when required fields are missing.
pub const VALIDATION_FAILED: &str = "Validation failed";

/// Result of a state-changing request. Business rejections are reported
/// with `success == false` rather than through the transport status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_code: Option<RoomCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl Outcome {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self { success: true, room_code: None, error: None, message: message.into() }
    }

    pub fn created(room_code: RoomCode, message: impl Into<String>) -> Self {
        Self { room_code: Some(room_code), ..Self::accepted(message) }
    }

    pub fn rejected(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self { success: false, room_code: None, error: Some(error.into()), message: message.into() }
    }

    pub fn is_room_code_taken(&self) -> bool {
        !self.success && self.error.as_deref() == Some(ROOM_CODE_TAKEN)
    }
}
