use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementKind {
    #[default]
    Info,
    Warning,
    Success,
    Error,
}

impl AnnouncementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementKind::Info => "info",
            AnnouncementKind::Warning => "warning",
            AnnouncementKind::Success => "success",
            AnnouncementKind::Error => "error",
        }
    }

    /// Unknown stored values degrade to `Info`.
    pub fn from_stored(raw: &str) -> Self {
        match raw {
            "warning" => AnnouncementKind::Warning,
            "success" => AnnouncementKind::Success,
            "error" => AnnouncementKind::Error,
            _ => AnnouncementKind::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: Uuid,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: AnnouncementKind,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnnouncement {
    pub message: String,
    pub kind: AnnouncementKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostAnnouncementRequest {
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: AnnouncementKind,
}

impl PostAnnouncementRequest {
    pub fn validate(self) -> BookingResult<NewAnnouncement> {
        let message = self.message.unwrap_or_default().trim().to_string();
        if message.is_empty() {
            return Err(BookingError::Validation("message is required".to_string()));
        }
        Ok(NewAnnouncement {
            message,
            kind: self.kind,
        })
    }
}
