use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

/// Moderation state of a guest submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Pending,
    Approved,
    Rejected,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Pending => "pending",
            ContentStatus::Approved => "approved",
            ContentStatus::Rejected => "rejected",
        }
    }
}

impl Display for ContentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ContentStatus::Pending),
            "approved" => Ok(ContentStatus::Approved),
            "rejected" => Ok(ContentStatus::Rejected),
            other => Err(anyhow::anyhow!("Invalid content status: {}", other)),
        }
    }
}

/// What a guest submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Image,
    Video,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Image => "image",
            ContentKind::Video => "video",
        }
    }
}

impl FromStr for ContentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ContentKind::Text),
            "image" => Ok(ContentKind::Image),
            "video" => Ok(ContentKind::Video),
            other => Err(anyhow::anyhow!("Invalid content kind: {}", other)),
        }
    }
}

/// One guest submission as stored by the content repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: Uuid,
    pub guest_name: String,
    pub kind: ContentKind,
    pub message: Option<String>,
    /// Public URL of the uploaded blob; the final path segment is its storage key.
    pub media_url: Option<String>,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
}

/// The slice of a content record the reaper needs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ContentRef {
    pub id: Uuid,
    pub media_url: Option<String>,
}

impl From<&ContentRecord> for ContentRef {
    fn from(record: &ContentRecord) -> Self {
        ContentRef {
            id: record.id,
            media_url: record.media_url.clone(),
        }
    }
}
