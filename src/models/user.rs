use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the export's users.json array.
///
/// Only the fields the store indexes are typed; everything else (the profile
/// blob with its image URLs, custom fields, and whatever the exporter adds in
/// the future) rides along in `extra` and round-trips verbatim into the
/// stored `full_object`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_owner: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
