//! Store Facade Round-Trip Tests
//!
//! Runs the facade against real SQLite: in-memory for most cases, a
//! temp directory for the file-backed one. Verifies that what goes in
//! through insert comes back identical through select, that counts are
//! real, and that hostile condition values stay inert.

use chrono::{TimeZone, Utc};
use rowmap::{Backend, Conditions, MapError, SqliteBackend, Store, Value};

rowmap::record! {
    table = "feeds",
    #[derive(Debug, Clone, PartialEq)]
    pub struct Feed {
        pub id: i64 => "id",
        pub url: String => "url",
        pub active: bool => "active",
        pub fetched_at: chrono::DateTime<chrono::Utc> => "fetched_at",
    }
}

rowmap::record! {
    table = "ghosts",
    #[derive(Debug, Clone, PartialEq)]
    pub struct Ghost {
        pub id: i64 => "id",
    }
}

const CREATE_FEEDS: &str = "CREATE TABLE feeds (
    id INTEGER PRIMARY KEY,
    url TEXT NOT NULL,
    active INTEGER NOT NULL,
    fetched_at TEXT NOT NULL
)";

fn setup_store() -> Store<SqliteBackend> {
    let store = Store::new(SqliteBackend::open_in_memory().unwrap());
    store.backend().execute(CREATE_FEEDS, &[]).unwrap();
    store
}

fn feed(id: i64, url: &str) -> Feed {
    Feed {
        id,
        url: url.to_string(),
        active: true,
        fetched_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// INSERT / SELECT ROUND-TRIPS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn roundtrip_insert_one_select_one() {
    let store = setup_store();
    let original = feed(1, "https://example.com/a");

    let affected = store.insert_one(&original).unwrap();
    assert_eq!(affected, 1);

    let read: Feed = store
        .select_one(&Conditions::new().eq("id", 1_i64))
        .unwrap();
    assert_eq!(read, original);
}

#[test]
fn roundtrip_insert_many_reports_real_counts() {
    let store = setup_store();
    let batch = [feed(1, "a"), feed(2, "b"), feed(3, "c")];

    let affected = store.insert_many(&batch).unwrap();
    assert_eq!(affected, 3);
}

#[test]
fn select_many_returns_all_matches_newest_first() {
    let store = setup_store();
    store
        .insert_many(&[feed(1, "a"), feed(2, "b"), feed(3, "c")])
        .unwrap();

    let all: Vec<Feed> = store.select_many(&Conditions::new()).unwrap();
    let ids: Vec<i64> = all.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[test]
fn select_many_filters_conjunctively() {
    let store = setup_store();
    let mut inactive = feed(2, "a");
    inactive.active = false;
    store.insert_many(&[feed(1, "a"), inactive, feed(3, "a")]).unwrap();

    let matches: Vec<Feed> = store
        .select_many(&Conditions::new().eq("url", "a").eq("active", true))
        .unwrap();
    let ids: Vec<i64> = matches.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![3, 1]);
}

#[test]
fn select_one_without_match_is_row_not_found() {
    let store = setup_store();
    let err = store
        .select_one::<Feed>(&Conditions::new().eq("id", 999_i64))
        .unwrap_err();
    assert!(matches!(err, MapError::RowNotFound { table: "feeds" }));
}

#[test]
fn insert_many_empty_batch_is_typed() {
    let store = setup_store();
    let err = store.insert_many::<Feed>(&[]).unwrap_err();
    assert!(matches!(err, MapError::EmptyRecordSet));
}

// ═══════════════════════════════════════════════════════════════════════════
// CONDITION SAFETY
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn hostile_condition_values_are_inert() {
    let store = setup_store();
    store.insert_many(&[feed(1, "a"), feed(2, "b")]).unwrap();

    let matches: Vec<Feed> = store
        .select_many(&Conditions::new().eq("url", "a' OR '1'='1"))
        .unwrap();
    assert!(matches.is_empty());

    // The table survived and normal selects still work.
    let all: Vec<Feed> = store.select_many(&Conditions::new()).unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn hostile_stored_values_roundtrip_verbatim() {
    let store = setup_store();
    let tricky = feed(1, "x'; DROP TABLE feeds; --");
    store.insert_one(&tricky).unwrap();

    let read: Feed = store
        .select_one(&Conditions::new().eq("url", tricky.url.as_str()))
        .unwrap();
    assert_eq!(read, tricky);
}

// ═══════════════════════════════════════════════════════════════════════════
// STORE ENCODINGS AND FAILURES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn booleans_are_stored_as_integers() {
    let store = setup_store();
    store.insert_one(&feed(1, "a")).unwrap();

    let rows = store
        .backend()
        .query("SELECT active FROM feeds WHERE id = ?1", &[Value::Integer(1)])
        .unwrap();
    assert_eq!(rows[0].get(0), Some(&Value::Integer(1)));
}

#[test]
fn statements_against_missing_tables_carry_context() {
    let store = setup_store();
    let err = store
        .select_many::<Ghost>(&Conditions::new())
        .unwrap_err();
    match err {
        MapError::Execution { sql, .. } => assert!(sql.contains("ghosts")),
        other => panic!("expected Execution, got {other:?}"),
    }
}

#[test]
fn transactions_are_honestly_unsupported() {
    let store = setup_store();
    let err = store.begin_transaction().unwrap_err();
    assert!(matches!(err, MapError::NotSupported { .. }));
}

// ═══════════════════════════════════════════════════════════════════════════
// FILE-BACKED STORE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn file_backed_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feeds.db");

    {
        let store = Store::new(SqliteBackend::open(&path).unwrap());
        store.backend().execute(CREATE_FEEDS, &[]).unwrap();
        store.insert_one(&feed(7, "persisted")).unwrap();
    }

    let store = Store::new(SqliteBackend::open(&path).unwrap());
    let read: Feed = store
        .select_one(&Conditions::new().eq("id", 7_i64))
        .unwrap();
    assert_eq!(read.url, "persisted");
}
