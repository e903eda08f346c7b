use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use super::schema::{channels, file_cache, messages, users, workspaces};
use crate::models::{Channel, Message, User};

#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = workspaces)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StoredWorkspace {
    pub id: i32,
    pub name: String,
    pub imported_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = workspaces)]
pub struct NewWorkspace {
    pub name: String,
    pub imported_at: NaiveDateTime,
}

impl NewWorkspace {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            imported_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StoredUser {
    pub id: i32,
    pub workspace_id: i32,
    pub slack_id: String,
    pub name: String,
    pub real_name: Option<String>,
    pub deleted: bool,
    pub is_bot: bool,
    pub is_admin: Option<bool>,
    pub is_owner: Option<bool>,
    pub full_object: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub workspace_id: i32,
    pub slack_id: String,
    pub name: String,
    pub real_name: Option<String>,
    pub deleted: bool,
    pub is_bot: bool,
    pub is_admin: Option<bool>,
    pub is_owner: Option<bool>,
    pub full_object: String,
}

impl NewUser {
    /// Normalize one export user: the origin `id` becomes `slack_id`, the
    /// local row id is storage-assigned, and the whole origin object is kept
    /// verbatim in `full_object`.
    pub fn from_export(user: &User, workspace_id: i32) -> Self {
        Self {
            workspace_id,
            slack_id: user.id.clone(),
            name: user.name.clone(),
            real_name: user.real_name.clone(),
            deleted: user.deleted,
            is_bot: user.is_bot,
            is_admin: user.is_admin,
            is_owner: user.is_owner,
            full_object: serde_json::to_string(user).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = channels)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StoredChannel {
    pub id: i32,
    pub workspace_id: i32,
    pub slack_id: String,
    pub name: String,
    pub created: Option<i64>,
    pub creator: Option<String>,
    pub is_archived: bool,
    pub is_general: bool,
    pub full_object: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = channels)]
pub struct NewChannel {
    pub workspace_id: i32,
    pub slack_id: String,
    pub name: String,
    pub created: Option<i64>,
    pub creator: Option<String>,
    pub is_archived: bool,
    pub is_general: bool,
    pub full_object: String,
}

impl NewChannel {
    pub fn from_export(channel: &Channel, workspace_id: i32) -> Self {
        Self {
            workspace_id,
            slack_id: channel.id.clone(),
            name: channel.name.clone(),
            created: channel.created,
            creator: channel.creator.clone(),
            is_archived: channel.is_archived,
            is_general: channel.is_general,
            full_object: serde_json::to_string(channel).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StoredMessage {
    pub id: i32,
    pub workspace_id: i32,
    pub channel_id: String,
    pub ts: String,
    pub msg_type: String,
    pub subtype: Option<String>,
    pub user_id: Option<String>,
    pub bot_id: Option<String>,
    pub username: Option<String>,
    pub text: Option<String>,
    pub thread_ts: Option<String>,
    pub full_object: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessage {
    pub workspace_id: i32,
    pub channel_id: String,
    pub ts: String,
    pub msg_type: String,
    pub subtype: Option<String>,
    pub user_id: Option<String>,
    pub bot_id: Option<String>,
    pub username: Option<String>,
    pub text: Option<String>,
    pub thread_ts: Option<String>,
    pub full_object: String,
}

impl NewMessage {
    /// Tag one export message with its workspace and the **origin** id of the
    /// channel it was found under. Consumers resolve channel display data by
    /// matching `channel_id` against `channels.slack_id`.
    pub fn from_export(message: &Message, channel_id: &str, workspace_id: i32) -> Self {
        Self {
            workspace_id,
            channel_id: channel_id.to_string(),
            ts: message.ts.clone(),
            msg_type: message.msg_type.clone(),
            subtype: message.subtype.clone(),
            user_id: message.user.clone(),
            bot_id: message.bot_id.clone(),
            username: message.username.clone(),
            text: message.text.clone(),
            thread_ts: message.thread_ts.clone(),
            full_object: serde_json::to_string(message).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = file_cache)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StoredFileCache {
    pub id: i32,
    pub workspace_id: i32,
    pub file_id: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = file_cache)]
pub struct NewFileCache {
    pub workspace_id: i32,
    pub file_id: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}
