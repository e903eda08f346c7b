use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the export's channels.json array.
///
/// The channel's `name` doubles as the directory name its message-day files
/// live under inside the archive, and its `id` is the origin identifier that
/// stored messages carry in their `channel_id` column.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_general: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
