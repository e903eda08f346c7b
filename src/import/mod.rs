pub mod batcher;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tokio::task::JoinSet;

use crate::archive::ExportArchive;
use crate::assets::{self, AssetFetcher, AssetRef};
use crate::error::ImportError;
use crate::models::{Channel, Message, User};
use crate::store::{self, operations, StorePool};
use batcher::{MessageBatcher, TaggedMessage, MAX_BATCH_SIZE};

/// What one import run produced.
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub workspace_id: i32,
    pub workspace_name: String,
    pub users: usize,
    pub channels: usize,
    pub messages: usize,
    /// Message-day files skipped because they were not valid JSON.
    pub skipped_entries: usize,
    pub assets_discovered: usize,
    /// None when the asset-caching phase was skipped.
    pub assets_cached: Option<usize>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Run the full pipeline: parse and persist the archive, then opportunistically
/// cache discovered assets. Asset fetching never affects import success.
pub async fn run_import(
    pool: &StorePool,
    archive_bytes: Vec<u8>,
    archive_name: &str,
    fetcher: Option<&AssetFetcher>,
    verbose: bool,
) -> Result<ImportReport, ImportError> {
    let (mut report, discovered) =
        import_archive(pool, archive_bytes, archive_name, verbose).await?;

    if let Some(fetcher) = fetcher {
        let cached = fetcher
            .cache_assets(pool, report.workspace_id, &discovered, verbose)
            .await;
        report.assets_cached = Some(cached);
    }

    Ok(report)
}

/// Parse and persist one export archive, returning the report and the
/// deduplicated map of cacheable assets discovered along the way.
pub async fn import_archive(
    pool: &StorePool,
    archive_bytes: Vec<u8>,
    archive_name: &str,
    verbose: bool,
) -> Result<(ImportReport, HashMap<String, AssetRef>), ImportError> {
    let mut archive = ExportArchive::open(archive_bytes)?;

    let users_raw = archive.read_users()?;
    let channels_raw = archive.read_channels()?;

    let users: Vec<User> = serde_json::from_str(&users_raw)
        .map_err(|e| ImportError::MalformedArchive(format!("users.json is not valid JSON: {e}")))?;
    let channels: Vec<Channel> = serde_json::from_str(&channels_raw).map_err(|e| {
        ImportError::MalformedArchive(format!("channels.json is not valid JSON: {e}"))
    })?;

    // Workspace creation is deferred until both required files have parsed,
    // so a malformed archive leaves no orphan workspace row.
    let workspace_name = archive_name.strip_suffix(".zip").unwrap_or(archive_name);

    let mut conn = store::get_connection(pool).await?;
    let workspace_id = operations::insert_workspace(&mut conn, workspace_name, verbose)?;
    operations::insert_users(&mut conn, workspace_id, &users, verbose)?;
    operations::insert_channels(&mut conn, workspace_id, &channels, verbose)?;

    // Message-day directories are matched to channels by name; the stored
    // join key is the channel's origin id.
    let channel_ids: HashMap<String, String> = channels
        .iter()
        .map(|c| (c.name.clone(), c.id.clone()))
        .collect();

    let accumulator = Arc::new(Mutex::new(MessageBatcher::new(MAX_BATCH_SIZE)));
    let discovered = Arc::new(Mutex::new(HashMap::new()));
    let skipped = Arc::new(AtomicUsize::new(0));

    // One parse task per matched entry, unbounded; entries whose directory
    // matches no channel are silently skipped. Decompression stays on this
    // task since the zip reader is sequential.
    let mut tasks: JoinSet<()> = JoinSet::new();
    for entry in archive.message_day_entries() {
        let Some(channel_id) = channel_ids.get(&entry.channel_dir) else {
            continue;
        };

        let raw = match archive.read_entry(&entry.entry_name) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("[IMPORT] Skipping {}: {}", entry.entry_name, e);
                skipped.fetch_add(1, Ordering::Relaxed);
                continue;
            }
        };

        let entry_name = entry.entry_name.clone();
        let channel_id = channel_id.clone();
        let accumulator = Arc::clone(&accumulator);
        let discovered = Arc::clone(&discovered);
        let skipped = Arc::clone(&skipped);
        tasks.spawn(async move {
            parse_day_entry(&entry_name, &channel_id, &raw, &accumulator, &discovered, &skipped);
        });
    }

    // Settle the whole group before flushing the final partial batch.
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            eprintln!("[IMPORT] Message parse task failed: {}", e);
        }
    }

    let batches = lock(&accumulator).take_batches();
    let mut message_count = 0;
    for batch in &batches {
        operations::insert_messages(&mut conn, workspace_id, batch, verbose)?;
        message_count += batch.len();
    }

    let discovered = std::mem::take(&mut *lock(&discovered));

    let report = ImportReport {
        workspace_id,
        workspace_name: workspace_name.to_string(),
        users: users.len(),
        channels: channels.len(),
        messages: message_count,
        skipped_entries: skipped.load(Ordering::Relaxed),
        assets_discovered: discovered.len(),
        assets_cached: None,
    };

    Ok((report, discovered))
}

/// Parse one message-day file and fold it into the shared accumulator.
///
/// A JSON failure skips the whole file with a diagnostic; the rest of the
/// import is unaffected.
fn parse_day_entry(
    entry_name: &str,
    channel_id: &str,
    raw: &str,
    accumulator: &Mutex<MessageBatcher>,
    discovered: &Mutex<HashMap<String, AssetRef>>,
    skipped: &AtomicUsize,
) {
    let parsed: Vec<Message> = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("[IMPORT] Skipping {}: invalid JSON ({})", entry_name, e);
            skipped.fetch_add(1, Ordering::Relaxed);
            return;
        }
    };

    for message in parsed {
        collect_assets(&message, discovered);
        lock(accumulator).push(TaggedMessage {
            channel_id: channel_id.to_string(),
            message,
        });
    }
}

/// Record every cacheable attachment of a message in the shared map.
/// Inserts are keyed by asset id, so concurrent duplicates are idempotent.
fn collect_assets(message: &Message, discovered: &Mutex<HashMap<String, AssetRef>>) {
    for file in message.files.iter().flatten() {
        let (Some(id), Some(url), Some(mime)) = (&file.id, &file.url_private, &file.mimetype)
        else {
            continue;
        };
        if id.is_empty() || url.is_empty() || !assets::is_cacheable(mime) {
            continue;
        }
        lock(discovered).insert(
            id.clone(),
            AssetRef {
                url: url.clone(),
                mime_type: mime.clone(),
            },
        );
    }
}
