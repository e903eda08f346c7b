use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One message object from a per-channel-per-day export file.
///
/// `ts` is the only required field: it is both the message's identity and its
/// sort key within a channel (`<seconds>.<microseconds>`, lexicographic order
/// matches numeric order on the canonical format). Reactions, attachments,
/// blocks and anything else the exporter emits pass through `extra` untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub ts: String,
    #[serde(rename = "type", default)]
    pub msg_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<MessageFile>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A file attachment reference inside a message.
///
/// Everything is optional: export archives contain tombstoned and external
/// files with most fields missing, and a partial attachment must not fail the
/// whole day file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_private: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
