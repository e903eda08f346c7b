use std::io::{Cursor, Write};

use tempfile::TempDir;
use zip::write::FileOptions;
use zip::ZipWriter;

use slarc::error::ImportError;
use slarc::import;
use slarc::store::{self, operations, StorePool};

fn build_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = ZipWriter::new(&mut cursor);
        for (name, contents) in entries {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }
    cursor.into_inner()
}

async fn fresh_store() -> (TempDir, StorePool) {
    let dir = TempDir::new().unwrap();
    let pool = store::create_store_pool(Some(dir.path().join("store.db")), false)
        .await
        .unwrap();
    (dir, pool)
}

const USERS_JSON: &str = r#"[{"id":"U1","name":"alice"}]"#;
const CHANNELS_JSON: &str = r#"[{"id":"C1","name":"general"}]"#;
const DAY_JSON: &str = r#"[{"type":"message","user":"U1","text":"hi","ts":"1700000000.000100"}]"#;

#[tokio::test]
async fn test_end_to_end_minimal_archive() {
    let (_dir, pool) = fresh_store().await;
    let bytes = build_archive(&[
        ("users.json", USERS_JSON),
        ("channels.json", CHANNELS_JSON),
        ("general/2024-01-01.json", DAY_JSON),
    ]);

    let (report, discovered) = import::import_archive(&pool, bytes, "acme.zip", false)
        .await
        .unwrap();

    assert_eq!(report.workspace_name, "acme");
    assert_eq!(report.users, 1);
    assert_eq!(report.channels, 1);
    assert_eq!(report.messages, 1);
    assert_eq!(report.skipped_entries, 0);
    assert!(discovered.is_empty());

    let mut conn = store::get_connection(&pool).await.unwrap();

    let workspaces = operations::list_workspaces(&mut conn).unwrap();
    assert_eq!(workspaces.len(), 1);
    assert_eq!(workspaces[0].name, "acme");

    let users = operations::get_users(&mut conn, report.workspace_id, true).unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].slack_id, "U1");
    assert_eq!(users[0].name, "alice");

    let channels = operations::get_channels(&mut conn, report.workspace_id).unwrap();
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].slack_id, "C1");
    assert_eq!(channels[0].name, "general");

    // Messages carry the channel's origin id, not its local row id.
    let messages = operations::get_messages(&mut conn, report.workspace_id, "C1", None).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].channel_id, "C1");
    assert_eq!(messages[0].ts, "1700000000.000100");
    assert_eq!(messages[0].text.as_deref(), Some("hi"));

    assert_eq!(operations::count_file_cache(&mut conn, report.workspace_id).unwrap(), 0);
}

#[tokio::test]
async fn test_archive_wrapped_in_folder() {
    let (_dir, pool) = fresh_store().await;
    let bytes = build_archive(&[
        ("Acme Export/users.json", USERS_JSON),
        ("Acme Export/channels.json", CHANNELS_JSON),
        ("Acme Export/general/2024-01-01.json", DAY_JSON),
    ]);

    let (report, _) = import::import_archive(&pool, bytes, "wrapped.zip", false)
        .await
        .unwrap();

    assert_eq!(report.messages, 1);
}

#[tokio::test]
async fn test_missing_users_json_creates_nothing() {
    let (_dir, pool) = fresh_store().await;
    let bytes = build_archive(&[
        ("channels.json", CHANNELS_JSON),
        ("general/2024-01-01.json", DAY_JSON),
    ]);

    let err = import::import_archive(&pool, bytes, "bad.zip", false)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::MalformedArchive(_)));

    // Workspace creation is deferred past required-file validation, so a
    // malformed archive leaves no rows at all.
    let mut conn = store::get_connection(&pool).await.unwrap();
    assert!(operations::list_workspaces(&mut conn).unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_users_json_is_malformed() {
    let (_dir, pool) = fresh_store().await;
    let bytes = build_archive(&[
        ("users.json", "{not an array"),
        ("channels.json", CHANNELS_JSON),
    ]);

    let err = import::import_archive(&pool, bytes, "bad.zip", false)
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::MalformedArchive(_)));

    let mut conn = store::get_connection(&pool).await.unwrap();
    assert!(operations::list_workspaces(&mut conn).unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_day_file_is_skipped() {
    let (_dir, pool) = fresh_store().await;
    let bytes = build_archive(&[
        ("users.json", USERS_JSON),
        ("channels.json", CHANNELS_JSON),
        ("general/2024-01-01.json", DAY_JSON),
        ("general/2024-01-02.json", "{{{ definitely not json"),
        (
            "general/2024-01-03.json",
            r#"[{"type":"message","user":"U1","text":"later","ts":"1700000100.000000"}]"#,
        ),
    ]);

    let (report, _) = import::import_archive(&pool, bytes, "partial.zip", false)
        .await
        .unwrap();

    // The bad file contributes nothing; the others import fully.
    assert_eq!(report.messages, 2);
    assert_eq!(report.skipped_entries, 1);

    let mut conn = store::get_connection(&pool).await.unwrap();
    assert_eq!(operations::count_messages(&mut conn, report.workspace_id).unwrap(), 2);
}

#[tokio::test]
async fn test_unknown_channel_directory_is_silently_skipped() {
    let (_dir, pool) = fresh_store().await;
    let bytes = build_archive(&[
        ("users.json", USERS_JSON),
        ("channels.json", CHANNELS_JSON),
        ("general/2024-01-01.json", DAY_JSON),
        ("not-a-channel/2024-01-01.json", DAY_JSON),
    ]);

    let (report, _) = import::import_archive(&pool, bytes, "extra.zip", false)
        .await
        .unwrap();

    assert_eq!(report.messages, 1);
    assert_eq!(report.skipped_entries, 0);
}

#[tokio::test]
async fn test_messages_ordered_by_ts_at_query_time() {
    let (_dir, pool) = fresh_store().await;
    // Two day files with interleaved timestamps; write order across files is
    // not guaranteed, read order must be.
    let bytes = build_archive(&[
        ("users.json", USERS_JSON),
        ("channels.json", CHANNELS_JSON),
        (
            "general/2024-01-02.json",
            r#"[{"type":"message","ts":"1700000200.000000","text":"third"},
                {"type":"message","ts":"1700000300.000500","text":"fourth"}]"#,
        ),
        (
            "general/2024-01-01.json",
            r#"[{"type":"message","ts":"1700000100.000900","text":"second"},
                {"type":"message","ts":"1700000100.000100","text":"first"}]"#,
        ),
    ]);

    let (report, _) = import::import_archive(&pool, bytes, "ordered.zip", false)
        .await
        .unwrap();

    let mut conn = store::get_connection(&pool).await.unwrap();
    let messages = operations::get_messages(&mut conn, report.workspace_id, "C1", None).unwrap();

    let texts: Vec<_> = messages.iter().filter_map(|m| m.text.as_deref()).collect();
    assert_eq!(texts, ["first", "second", "third", "fourth"]);

    // Monotonically non-decreasing as (seconds, microseconds).
    let parsed: Vec<(u64, u64)> = messages
        .iter()
        .map(|m| {
            let (s, us) = m.ts.split_once('.').unwrap();
            (s.parse().unwrap(), us.parse().unwrap())
        })
        .collect();
    assert!(parsed.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_text_plain_attachment_is_never_cacheable() {
    let (_dir, pool) = fresh_store().await;
    let day = r#"[{"type":"message","ts":"1700000000.000100","text":"notes",
        "files":[{"id":"F1","url_private":"https://x/notes.txt","mimetype":"text/plain"}]}]"#;
    let bytes = build_archive(&[
        ("users.json", USERS_JSON),
        ("channels.json", CHANNELS_JSON),
        ("general/2024-01-01.json", day),
    ]);

    let (report, discovered) = import::import_archive(&pool, bytes, "txt.zip", false)
        .await
        .unwrap();

    assert_eq!(report.assets_discovered, 0);
    assert!(discovered.is_empty());

    let mut conn = store::get_connection(&pool).await.unwrap();
    assert_eq!(operations::count_file_cache(&mut conn, report.workspace_id).unwrap(), 0);
}

#[tokio::test]
async fn test_image_attachment_is_discovered_and_deduplicated() {
    let (_dir, pool) = fresh_store().await;
    let day1 = r#"[{"type":"message","ts":"1700000000.000100",
        "files":[{"id":"F1","url_private":"https://x/img.png","mimetype":"image/png"}]}]"#;
    let day2 = r#"[{"type":"message","ts":"1700000400.000100",
        "files":[{"id":"F1","url_private":"https://x/img.png","mimetype":"image/png"},
                 {"id":"F2","url_private":"https://x/doc.pdf","mimetype":"application/pdf"}]}]"#;
    let bytes = build_archive(&[
        ("users.json", USERS_JSON),
        ("channels.json", CHANNELS_JSON),
        ("general/2024-01-01.json", day1),
        ("general/2024-01-02.json", day2),
    ]);

    let (report, discovered) = import::import_archive(&pool, bytes, "img.zip", false)
        .await
        .unwrap();

    assert_eq!(report.assets_discovered, 2);
    assert_eq!(discovered.get("F1").unwrap().mime_type, "image/png");
    assert_eq!(discovered.get("F2").unwrap().url, "https://x/doc.pdf");
}

#[tokio::test]
async fn test_batching_splits_large_channels() {
    let (_dir, pool) = fresh_store().await;

    // More messages than one batch holds; counts must still line up.
    let mut day = String::from("[");
    for i in 0..25_000 {
        if i > 0 {
            day.push(',');
        }
        day.push_str(&format!(
            r#"{{"type":"message","ts":"1700{:06}.000000","text":"m{i}"}}"#,
            i
        ));
    }
    day.push(']');

    let bytes = build_archive(&[
        ("users.json", USERS_JSON),
        ("channels.json", CHANNELS_JSON),
        ("general/2024-01-01.json", &day),
    ]);

    let (report, _) = import::import_archive(&pool, bytes, "big.zip", false)
        .await
        .unwrap();

    assert_eq!(report.messages, 25_000);

    let mut conn = store::get_connection(&pool).await.unwrap();
    assert_eq!(
        operations::count_messages(&mut conn, report.workspace_id).unwrap(),
        25_000
    );
}

#[tokio::test]
async fn test_reimport_creates_independent_snapshot() {
    let (_dir, pool) = fresh_store().await;
    let entries: &[(&str, &str)] = &[
        ("users.json", USERS_JSON),
        ("channels.json", CHANNELS_JSON),
        ("general/2024-01-01.json", DAY_JSON),
    ];

    let (first, _) = import::import_archive(&pool, build_archive(entries), "acme.zip", false)
        .await
        .unwrap();
    let (second, _) = import::import_archive(&pool, build_archive(entries), "acme.zip", false)
        .await
        .unwrap();

    assert_ne!(first.workspace_id, second.workspace_id);

    let mut conn = store::get_connection(&pool).await.unwrap();
    assert_eq!(operations::list_workspaces(&mut conn).unwrap().len(), 2);
    assert_eq!(operations::count_messages(&mut conn, first.workspace_id).unwrap(), 1);
    assert_eq!(operations::count_messages(&mut conn, second.workspace_id).unwrap(), 1);
}

#[tokio::test]
async fn test_delete_workspace_cascades() {
    let (_dir, pool) = fresh_store().await;
    let entries: &[(&str, &str)] = &[
        ("users.json", USERS_JSON),
        ("channels.json", CHANNELS_JSON),
        ("general/2024-01-01.json", DAY_JSON),
    ];

    let (doomed, _) = import::import_archive(&pool, build_archive(entries), "doomed.zip", false)
        .await
        .unwrap();
    let (kept, _) = import::import_archive(&pool, build_archive(entries), "kept.zip", false)
        .await
        .unwrap();

    let mut conn = store::get_connection(&pool).await.unwrap();
    operations::insert_file_cache(&mut conn, doomed.workspace_id, "F1", "image/png", b"bytes")
        .unwrap();

    operations::delete_workspace(&mut conn, doomed.workspace_id, false).unwrap();

    assert!(operations::get_workspace(&mut conn, doomed.workspace_id).unwrap().is_none());
    assert!(operations::get_users(&mut conn, doomed.workspace_id, true).unwrap().is_empty());
    assert!(operations::get_channels(&mut conn, doomed.workspace_id).unwrap().is_empty());
    assert_eq!(operations::count_messages(&mut conn, doomed.workspace_id).unwrap(), 0);
    assert_eq!(operations::count_file_cache(&mut conn, doomed.workspace_id).unwrap(), 0);

    // The sibling workspace is untouched.
    assert!(operations::get_workspace(&mut conn, kept.workspace_id).unwrap().is_some());
    assert_eq!(operations::count_messages(&mut conn, kept.workspace_id).unwrap(), 1);
}

#[tokio::test]
async fn test_import_succeeds_even_when_every_fetch_fails() {
    let (_dir, pool) = fresh_store().await;
    let day = r#"[{"type":"message","ts":"1700000000.000100",
        "files":[{"id":"F1","url_private":"http://127.0.0.1:9/img.png","mimetype":"image/png"}]}]"#;
    let bytes = build_archive(&[
        ("users.json", USERS_JSON),
        ("channels.json", CHANNELS_JSON),
        ("general/2024-01-01.json", day),
    ]);

    let fetcher = slarc::assets::AssetFetcher::new(slarc::assets::FetchMode::Direct).unwrap();
    let report = import::run_import(&pool, bytes, "offline.zip", Some(&fetcher), false)
        .await
        .unwrap();

    // The fetch attempt fails; the import does not.
    assert_eq!(report.messages, 1);
    assert_eq!(report.assets_discovered, 1);
    assert_eq!(report.assets_cached, Some(0));

    let mut conn = store::get_connection(&pool).await.unwrap();
    assert_eq!(operations::count_file_cache(&mut conn, report.workspace_id).unwrap(), 0);
}

#[tokio::test]
async fn test_delete_missing_workspace_is_not_found() {
    let (_dir, pool) = fresh_store().await;
    let mut conn = store::get_connection(&pool).await.unwrap();

    let err = operations::delete_workspace(&mut conn, 999, false).unwrap_err();
    assert_eq!(err, diesel::result::Error::NotFound);
}
