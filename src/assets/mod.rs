use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinSet;

use crate::store::{self, StorePool};

/// Live fetch concurrency cap. Unbounded fetches risk tripping the origin's
/// rate limiting and overwhelming the proxy, so assets are processed in
/// chunks of this size with a settle-all join between chunks.
pub const MAX_CONCURRENT_FETCHES: usize = 5;

/// A fetch that never resolves would otherwise stall its slot indefinitely;
/// a timed-out fetch is treated like any other failed fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A cacheable attachment discovered during message parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub url: String,
    pub mime_type: String,
}

/// Whether an attachment with this MIME type is eligible for local caching.
pub fn is_cacheable(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
        || mime_type.starts_with("video/")
        || mime_type == "application/pdf"
}

/// How asset bytes are obtained. Fixed once per fetch run.
#[derive(Debug, Clone)]
pub enum FetchMode {
    /// Authenticated fetch through a trusted proxy that injects the bearer
    /// token server-side, keeping the credential off third-party requests.
    Proxy { base_url: String, token: String },
    /// Credential-less best-effort fetch of the origin URL. Expected to fail
    /// for access-controlled origins.
    Direct,
}

/// Fetches discovered assets and persists them as file_cache rows.
pub struct AssetFetcher {
    client: reqwest::Client,
    mode: FetchMode,
}

impl AssetFetcher {
    pub fn new(mode: FetchMode) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self { client, mode })
    }

    /// Attempt to cache every discovered asset, at most
    /// [`MAX_CONCURRENT_FETCHES`] in flight at a time.
    ///
    /// Failures are independent per asset: a failed fetch, body read, or
    /// insert skips that asset only. There is no aggregate error; the return
    /// value is the number of assets that got a cache row.
    pub async fn cache_assets(
        &self,
        pool: &StorePool,
        workspace_id: i32,
        assets: &HashMap<String, AssetRef>,
        verbose: bool,
    ) -> usize {
        let entries: Vec<(String, AssetRef)> = assets
            .iter()
            .map(|(id, asset)| (id.clone(), asset.clone()))
            .collect();

        if verbose && !entries.is_empty() {
            eprintln!("[ASSET] Caching {} assets ({} mode)", entries.len(), mode_name(&self.mode));
        }

        let mut cached = 0;
        for chunk in entries.chunks(MAX_CONCURRENT_FETCHES) {
            let mut tasks: JoinSet<bool> = JoinSet::new();
            for (file_id, asset) in chunk.iter().cloned() {
                let client = self.client.clone();
                let mode = self.mode.clone();
                let pool = pool.clone();
                tasks.spawn(async move {
                    fetch_and_store(&client, &mode, &pool, workspace_id, &file_id, &asset, verbose)
                        .await
                });
            }
            while let Some(joined) = tasks.join_next().await {
                if matches!(joined, Ok(true)) {
                    cached += 1;
                }
            }
        }

        if verbose && !entries.is_empty() {
            eprintln!("[ASSET] Cached {}/{} assets", cached, entries.len());
        }

        cached
    }
}

fn mode_name(mode: &FetchMode) -> &'static str {
    match mode {
        FetchMode::Proxy { .. } => "proxy",
        FetchMode::Direct => "direct",
    }
}

/// Fetch one asset and insert its file_cache row. Returns whether a row was
/// created; every failure path is logged and swallowed.
async fn fetch_and_store(
    client: &reqwest::Client,
    mode: &FetchMode,
    pool: &StorePool,
    workspace_id: i32,
    file_id: &str,
    asset: &AssetRef,
    verbose: bool,
) -> bool {
    let request = match mode {
        FetchMode::Proxy { base_url, token } => client
            .get(base_url)
            .query(&[("url", asset.url.as_str()), ("token", token.as_str())]),
        FetchMode::Direct => client.get(&asset.url),
    };

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("[ASSET] Could not fetch {} from {}: {}", file_id, asset.url, e);
            return false;
        }
    };

    if !response.status().is_success() {
        eprintln!(
            "[ASSET] Could not fetch {} from {}: HTTP {}",
            file_id,
            asset.url,
            response.status()
        );
        return false;
    }

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            eprintln!("[ASSET] Could not read body of {}: {}", file_id, e);
            return false;
        }
    };

    let mut conn = match store::get_connection(pool).await {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("[ASSET] Could not open store connection for {}: {}", file_id, e);
            return false;
        }
    };

    match store::operations::insert_file_cache(
        &mut conn,
        workspace_id,
        file_id,
        &asset.mime_type,
        &body,
    ) {
        Ok(()) => {
            if verbose {
                eprintln!("[ASSET] Cached {} ({} bytes)", file_id, body.len());
            }
            true
        }
        Err(e) => {
            eprintln!("[ASSET] Could not store {}: {}", file_id, e);
            false
        }
    }
}
