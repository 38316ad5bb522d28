use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use std::fmt;

pub const ERROR_GRADE: &str = "error";

/// Backend identifiers come as either JSON numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotificationId {
    Int(i64),
    Text(String),
}

impl NotificationId {
    /// Parses an id received as plain text, e.g. from a URL path segment.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(value) => NotificationId::Int(value),
            Err(_) => NotificationId::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationId::Int(value) => write!(f, "{value}"),
            NotificationId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for NotificationId {
    fn from(value: i64) -> Self {
        NotificationId::Int(value)
    }
}

impl From<&str> for NotificationId {
    fn from(value: &str) -> Self {
        NotificationId::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<NotificationId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Display fields (company, report name, summary) carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notification {
    /// Builds an unread error notification that never came from the backend.
    /// It carries no id; the toast scheduler assigns a local one.
    pub fn local_error(message: &str, detail: Option<&str>, created_at: OffsetDateTime) -> Self {
        let mut extra = Map::new();
        extra.insert("message".to_string(), Value::String(message.to_string()));
        if let Some(detail) = detail {
            extra.insert("detail".to_string(), Value::String(detail.to_string()));
        }
        Self {
            id: None,
            grade: Some(ERROR_GRADE.to_string()),
            is_read: false,
            created_at: created_at.format(&Rfc3339).ok(),
            extra,
        }
    }

    pub fn is_local_error(&self) -> bool {
        self.id.is_none() && self.grade.as_deref() == Some(ERROR_GRADE)
    }
}

/// One page of `GET /notifications`. Missing fields fall back to empty/zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NotificationPage {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub unread_count: u64,
}
