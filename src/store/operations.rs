use diesel::prelude::*;
use diesel::result::Error as DieselError;

use super::db::StoreConnection;
use super::models::{
    NewChannel, NewFileCache, NewMessage, NewUser, NewWorkspace, StoredChannel, StoredFileCache,
    StoredMessage, StoredUser, StoredWorkspace,
};
use super::schema::{channels, file_cache, messages, users, workspaces};
use crate::import::batcher::TaggedMessage;
use crate::models::{Channel, User};

// SQLite caps bind variables per statement, so bulk inserts are issued in
// row chunks inside one transaction per logical bulk call.
const INSERT_CHUNK_ROWS: usize = 500;

// Write operations used by the import pipeline

/// Create the workspace row and return its generated id.
pub fn insert_workspace(
    conn: &mut StoreConnection,
    name: &str,
    verbose: bool,
) -> Result<i32, DieselError> {
    let workspace_id = diesel::insert_into(workspaces::table)
        .values(NewWorkspace::named(name))
        .returning(workspaces::id)
        .get_result(conn)?;

    if verbose {
        eprintln!("[STORE] Workspace '{}' created with id {}", name, workspace_id);
    }

    Ok(workspace_id)
}

/// Bulk-insert all users of one workspace in a single call.
pub fn insert_users(
    conn: &mut StoreConnection,
    workspace_id: i32,
    user_list: &[User],
    verbose: bool,
) -> Result<(), DieselError> {
    let rows: Vec<NewUser> = user_list
        .iter()
        .map(|u| NewUser::from_export(u, workspace_id))
        .collect();

    conn.transaction(|conn| {
        for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
            diesel::insert_into(users::table).values(chunk).execute(conn)?;
        }
        Ok::<_, DieselError>(())
    })?;

    if verbose {
        eprintln!("[STORE] Inserted {} users", rows.len());
    }

    Ok(())
}

/// Bulk-insert all channels of one workspace in a single call.
pub fn insert_channels(
    conn: &mut StoreConnection,
    workspace_id: i32,
    channel_list: &[Channel],
    verbose: bool,
) -> Result<(), DieselError> {
    let rows: Vec<NewChannel> = channel_list
        .iter()
        .map(|c| NewChannel::from_export(c, workspace_id))
        .collect();

    conn.transaction(|conn| {
        for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
            diesel::insert_into(channels::table).values(chunk).execute(conn)?;
        }
        Ok::<_, DieselError>(())
    })?;

    if verbose {
        eprintln!("[STORE] Inserted {} channels", rows.len());
    }

    Ok(())
}

/// Bulk-insert one completed message batch (at most the batcher's maximum).
///
/// Batches are independent: a failure here leaves previously written batches
/// in place, there is no cross-batch transaction.
pub fn insert_messages(
    conn: &mut StoreConnection,
    workspace_id: i32,
    batch: &[TaggedMessage],
    verbose: bool,
) -> Result<(), DieselError> {
    let rows: Vec<NewMessage> = batch
        .iter()
        .map(|t| NewMessage::from_export(&t.message, &t.channel_id, workspace_id))
        .collect();

    conn.transaction(|conn| {
        for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
            diesel::insert_into(messages::table).values(chunk).execute(conn)?;
        }
        Ok::<_, DieselError>(())
    })?;

    if verbose {
        eprintln!("[STORE] Inserted batch of {} messages", rows.len());
    }

    Ok(())
}

/// Insert a single cached asset row.
pub fn insert_file_cache(
    conn: &mut StoreConnection,
    workspace_id: i32,
    file_id: &str,
    mime_type: &str,
    content: &[u8],
) -> Result<(), DieselError> {
    let row = NewFileCache {
        workspace_id,
        file_id: file_id.to_string(),
        mime_type: mime_type.to_string(),
        content: content.to_vec(),
    };

    diesel::insert_into(file_cache::table).values(&row).execute(conn)?;

    Ok(())
}

/// Delete a workspace and every row referencing it in one transaction.
///
/// Returns `NotFound` when the workspace id does not exist.
pub fn delete_workspace(
    conn: &mut StoreConnection,
    workspace_id: i32,
    verbose: bool,
) -> Result<(), DieselError> {
    conn.transaction(|conn| {
        diesel::delete(messages::table.filter(messages::workspace_id.eq(workspace_id)))
            .execute(conn)?;
        diesel::delete(file_cache::table.filter(file_cache::workspace_id.eq(workspace_id)))
            .execute(conn)?;
        diesel::delete(channels::table.filter(channels::workspace_id.eq(workspace_id)))
            .execute(conn)?;
        diesel::delete(users::table.filter(users::workspace_id.eq(workspace_id))).execute(conn)?;

        let deleted = diesel::delete(workspaces::table.filter(workspaces::id.eq(workspace_id)))
            .execute(conn)?;
        if deleted == 0 {
            return Err(DieselError::NotFound);
        }
        Ok(())
    })?;

    if verbose {
        eprintln!("[STORE] Deleted workspace {} and all its rows", workspace_id);
    }

    Ok(())
}

// Read operations used by the query surface

pub fn list_workspaces(conn: &mut StoreConnection) -> Result<Vec<StoredWorkspace>, DieselError> {
    workspaces::table
        .select(StoredWorkspace::as_select())
        .order(workspaces::imported_at.desc())
        .load(conn)
}

pub fn get_workspace(
    conn: &mut StoreConnection,
    workspace_id: i32,
) -> Result<Option<StoredWorkspace>, DieselError> {
    workspaces::table
        .filter(workspaces::id.eq(workspace_id))
        .select(StoredWorkspace::as_select())
        .first(conn)
        .optional()
}

pub fn get_users(
    conn: &mut StoreConnection,
    workspace_id: i32,
    include_deleted: bool,
) -> Result<Vec<StoredUser>, DieselError> {
    let mut query = users::table
        .filter(users::workspace_id.eq(workspace_id))
        .select(StoredUser::as_select())
        .order(users::name.asc())
        .into_boxed();

    if !include_deleted {
        query = query.filter(users::deleted.eq(false));
    }

    query.load(conn)
}

pub fn get_channels(
    conn: &mut StoreConnection,
    workspace_id: i32,
) -> Result<Vec<StoredChannel>, DieselError> {
    channels::table
        .filter(channels::workspace_id.eq(workspace_id))
        .select(StoredChannel::as_select())
        .order(channels::name.asc())
        .load(conn)
}

pub fn get_channel_by_name(
    conn: &mut StoreConnection,
    workspace_id: i32,
    name: &str,
) -> Result<Option<StoredChannel>, DieselError> {
    channels::table
        .filter(channels::workspace_id.eq(workspace_id))
        .filter(channels::name.eq(name))
        .select(StoredChannel::as_select())
        .first(conn)
        .optional()
}

/// Messages of one channel, identified by the channel's **origin** id and
/// ordered by `ts` ascending. Per-channel ordering is established here, at
/// query time, not at write time.
pub fn get_messages(
    conn: &mut StoreConnection,
    workspace_id: i32,
    channel_id: &str,
    limit: Option<i64>,
) -> Result<Vec<StoredMessage>, DieselError> {
    let mut query = messages::table
        .filter(messages::workspace_id.eq(workspace_id))
        .filter(messages::channel_id.eq(channel_id))
        .select(StoredMessage::as_select())
        .order(messages::ts.asc())
        .into_boxed();

    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    query.load(conn)
}

pub fn count_messages(
    conn: &mut StoreConnection,
    workspace_id: i32,
) -> Result<i64, DieselError> {
    messages::table
        .filter(messages::workspace_id.eq(workspace_id))
        .count()
        .get_result(conn)
}

pub fn get_file_cache(
    conn: &mut StoreConnection,
    workspace_id: i32,
    file_id: &str,
) -> Result<Option<StoredFileCache>, DieselError> {
    file_cache::table
        .filter(file_cache::workspace_id.eq(workspace_id))
        .filter(file_cache::file_id.eq(file_id))
        .select(StoredFileCache::as_select())
        .first(conn)
        .optional()
}

pub fn count_file_cache(
    conn: &mut StoreConnection,
    workspace_id: i32,
) -> Result<i64, DieselError> {
    file_cache::table
        .filter(file_cache::workspace_id.eq(workspace_id))
        .count()
        .get_result(conn)
}
