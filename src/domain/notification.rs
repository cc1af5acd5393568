use serde::{Deserialize, Serialize};

/// A notification delivered through the backlog endpoint or the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, alias = "isRead")]
    pub read: bool,
    #[serde(default)]
    pub sent_at: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Notification {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            kind: String::new(),
            read: false,
            sent_at: None,
            user_id: None,
        }
    }
}
