//! Synchronizer behaviour against the in-memory store.

use std::sync::Arc;

use proptest::prelude::*;
use sheet_sync::{
    header_row, MemoryTabularStore, PostRecord, Row, StoreError, SyncConfig, SyncError,
    SyncPolicy, Synchronizer,
};

const DEST: &str = "sheet-1";

fn post(n: usize) -> PostRecord {
    PostRecord {
        title: format!("Post {n}"),
        body: format!("Body {n}"),
        published_at: String::new(),
        source_url: format!("https://x.test/post/{n}"),
    }
}

fn posts(n: usize) -> Vec<PostRecord> {
    (1..=n).map(post).collect()
}

fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| c.to_string()).collect()
}

fn synchronizer(store: &MemoryTabularStore, policy: SyncPolicy) -> Synchronizer {
    Synchronizer::new(
        Arc::new(store.clone()),
        SyncConfig::default().with_policy(policy),
    )
}

fn stale_tab() -> MemoryTabularStore {
    MemoryTabularStore::new().with_tab(
        DEST,
        "Source",
        vec![
            header_row(),
            row(&["Old 1", "b", "", "https://x.test/old/1"]),
            row(&["Old 2", "b", "", "https://x.test/old/2"]),
            row(&["Old 3", "b", "", "https://x.test/old/3"]),
        ],
    )
}

#[tokio::test]
async fn test_missing_tab_is_created_with_header_and_rows() {
    let store = MemoryTabularStore::new().with_tab(DEST, "Sheet1", vec![]);
    let outcome = synchronizer(&store, SyncPolicy::ClearAndRewrite)
        .sync(DEST, &posts(3))
        .await
        .unwrap();

    assert_eq!(outcome.written, 3);
    assert!(outcome.header_enforced);
    assert_eq!(store.create_tab_calls(), 1);
    assert_eq!(store.tab_names(DEST), vec!["Sheet1", "Source"]);
    assert_eq!(store.grid_size(DEST, "Source"), Some((1000, 10)));

    let rows = store.rows(DEST, "Source").unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0], header_row());
    assert_eq!(rows[1], row(&["Post 1", "Body 1", "", "https://x.test/post/1"]));
    assert_eq!(rows[3][0], "Post 3");
}

#[tokio::test]
async fn test_clear_and_rewrite_removes_stale_rows() {
    let store = stale_tab();
    let outcome = synchronizer(&store, SyncPolicy::ClearAndRewrite)
        .sync(DEST, &posts(2))
        .await
        .unwrap();

    assert_eq!(outcome.written, 2);
    let rows = store.rows(DEST, "Source").unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| !r[0].starts_with("Old")));
    assert_eq!(store.replace_rows_calls(), 1);
    assert_eq!(store.create_tab_calls(), 0);
}

#[tokio::test]
async fn test_append_preserving_keeps_stale_rows() {
    let store = stale_tab();
    let outcome = synchronizer(&store, SyncPolicy::AppendPreserving)
        .sync(DEST, &posts(2))
        .await
        .unwrap();

    assert_eq!(outcome.written, 2);
    assert!(!outcome.header_enforced);

    let titles: Vec<_> = store
        .rows(DEST, "Source")
        .unwrap()
        .into_iter()
        .map(|r| r[0].clone())
        .collect();
    assert_eq!(titles, vec!["Title", "Old 1", "Old 2", "Old 3", "Post 1", "Post 2"]);
    assert_eq!(store.write_range_calls(), 1);
}

#[tokio::test]
async fn test_append_preserving_fixes_wrong_header() {
    let store = MemoryTabularStore::new().with_tab(
        DEST,
        "Source",
        vec![row(&["Name", "Text"]), row(&["kept", "x"])],
    );
    let outcome = synchronizer(&store, SyncPolicy::AppendPreserving)
        .sync(DEST, &posts(1))
        .await
        .unwrap();

    assert!(outcome.header_enforced);
    let rows = store.rows(DEST, "Source").unwrap();
    assert_eq!(rows[0], header_row());
    assert_eq!(rows[1][0], "kept");
    assert_eq!(rows[2][0], "Post 1");
}

#[tokio::test]
async fn test_append_preserving_overwrites_wide_first_row() {
    let store = MemoryTabularStore::new().with_tab(
        DEST,
        "Source",
        vec![
            row(&["Name", "Text", "Extra", "More", "Notes", "Tags"]),
            row(&["kept", "x"]),
        ],
    );
    let synchronizer = synchronizer(&store, SyncPolicy::AppendPreserving);

    let first = synchronizer.sync(DEST, &posts(1)).await.unwrap();
    assert!(first.header_enforced);
    assert_eq!(store.rows(DEST, "Source").unwrap()[0], header_row());

    let second = synchronizer.sync(DEST, &[post(2)]).await.unwrap();
    assert!(!second.header_enforced);

    let titles: Vec<_> = store
        .rows(DEST, "Source")
        .unwrap()
        .into_iter()
        .map(|r| r[0].clone())
        .collect();
    assert_eq!(titles, vec!["Title", "kept", "Post 1", "Post 2"]);
}

#[tokio::test]
async fn test_append_preserving_on_empty_tab() {
    let store = MemoryTabularStore::new().with_tab(DEST, "Source", vec![]);
    let outcome = synchronizer(&store, SyncPolicy::AppendPreserving)
        .sync(DEST, &posts(2))
        .await
        .unwrap();

    assert!(outcome.header_enforced);
    let rows = store.rows(DEST, "Source").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], header_row());
    assert_eq!(rows[1][0], "Post 1");
}

#[tokio::test]
async fn test_zero_records_still_writes_header() {
    for policy in [SyncPolicy::ClearAndRewrite, SyncPolicy::AppendPreserving] {
        let store = MemoryTabularStore::new().with_destination(DEST);
        let outcome = synchronizer(&store, policy).sync(DEST, &[]).await.unwrap();

        assert_eq!(outcome.written, 0);
        assert!(outcome.header_enforced);
        assert_eq!(store.rows(DEST, "Source").unwrap(), vec![header_row()]);
    }
}

#[tokio::test]
async fn test_unknown_destination() {
    let store = MemoryTabularStore::new();
    let err = synchronizer(&store, SyncPolicy::ClearAndRewrite)
        .sync("nope", &posts(1))
        .await
        .unwrap_err();

    assert_eq!(err, SyncError::DestinationNotFound { id: "nope".into() });
}

#[tokio::test]
async fn test_rate_limit_is_surfaced_and_leaves_prior_state() {
    let store = stale_tab();
    let before = store.rows(DEST, "Source").unwrap();
    store.fail_writes_with(StoreError::RateLimited {
        message: "quota exceeded".into(),
    });

    let err = synchronizer(&store, SyncPolicy::ClearAndRewrite)
        .sync(DEST, &posts(2))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        SyncError::RateLimited {
            message: "quota exceeded".into()
        }
    );
    assert_eq!(store.rows(DEST, "Source").unwrap(), before);
    assert_eq!(store.replace_rows_calls(), 1);
}

#[tokio::test]
async fn test_write_failure_is_transient() {
    let store = stale_tab();
    store.fail_writes_with(StoreError::Transport {
        message: "connection reset".into(),
    });

    let err = synchronizer(&store, SyncPolicy::AppendPreserving)
        .sync(DEST, &posts(1))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::TransientWriteFailure { .. }));
}

#[tokio::test]
async fn test_row_by_row_fallback_without_batch_writes() {
    let store = stale_tab().without_batch_writes();
    let outcome = synchronizer(&store, SyncPolicy::ClearAndRewrite)
        .sync(DEST, &posts(3))
        .await
        .unwrap();

    assert_eq!(outcome.written, 3);
    assert_eq!(store.replace_rows_calls(), 0);
    assert_eq!(store.clear_calls(), 1);
    assert_eq!(store.write_range_calls(), 4);

    let titles: Vec<_> = store
        .rows(DEST, "Source")
        .unwrap()
        .into_iter()
        .map(|r| r[0].clone())
        .collect();
    assert_eq!(titles, vec!["Title", "Post 1", "Post 2", "Post 3"]);
}

#[tokio::test]
async fn test_custom_tab_name() {
    let store = MemoryTabularStore::new().with_destination(DEST);
    let synchronizer = Synchronizer::new(
        Arc::new(store.clone()),
        SyncConfig::default().with_tab_name("Posts").with_initial_size(50, 4),
    );

    synchronizer.sync(DEST, &posts(1)).await.unwrap();

    assert_eq!(store.tab_names(DEST), vec!["Posts"]);
    assert_eq!(store.grid_size(DEST, "Posts"), Some((50, 4)));
}

#[tokio::test]
async fn test_grid_grows_past_initial_capacity() {
    let store = MemoryTabularStore::new().with_destination(DEST);
    let synchronizer = Synchronizer::new(
        Arc::new(store.clone()),
        SyncConfig::default().with_initial_size(5, 4),
    );

    synchronizer.sync(DEST, &posts(12)).await.unwrap();

    assert_eq!(store.rows(DEST, "Source").unwrap().len(), 13);
    assert_eq!(store.grid_size(DEST, "Source"), Some((13, 4)));
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_clear_and_rewrite_is_idempotent(n in 0usize..20, stale in 0usize..20) {
        let store = MemoryTabularStore::new().with_tab(
            DEST,
            "Source",
            (0..stale).map(|i| row(&["stale", &i.to_string()])).collect(),
        );
        let synchronizer = synchronizer(&store, SyncPolicy::ClearAndRewrite);
        let records = posts(n);

        let rt = runtime();
        let first = rt.block_on(synchronizer.sync(DEST, &records)).unwrap();
        let after_first = store.rows(DEST, "Source").unwrap();
        let second = rt.block_on(synchronizer.sync(DEST, &records)).unwrap();
        let after_second = store.rows(DEST, "Source").unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(&after_first, &after_second);
        prop_assert_eq!(after_first.len(), n + 1);
    }

    #[test]
    fn prop_header_holds_after_any_sync(
        initial in prop_oneof![
            Just(None),
            Just(Some(Vec::<Row>::new())),
            Just(Some(vec![row(&["Wrong", "Header"]), row(&["data"])])),
            Just(Some(vec![row(&["Name", "Text", "Extra", "More", "Notes", "Tags"]), row(&["data"])])),
            Just(Some(vec![header_row(), row(&["data"])])),
        ],
        append in any::<bool>(),
        n in 0usize..5,
    ) {
        let store = match initial {
            None => MemoryTabularStore::new().with_destination(DEST),
            Some(rows) => MemoryTabularStore::new().with_tab(DEST, "Source", rows),
        };
        let policy = if append { SyncPolicy::AppendPreserving } else { SyncPolicy::ClearAndRewrite };

        let synchronizer = synchronizer(&store, policy);
        let rt = runtime();
        rt.block_on(synchronizer.sync(DEST, &posts(n))).unwrap();

        let rows = store.rows(DEST, "Source").unwrap();
        prop_assert_eq!(&rows[0], &header_row());

        // Once the header is in place a later append leaves it alone.
        let again = rt.block_on(synchronizer.sync(DEST, &posts(n))).unwrap();
        prop_assert_eq!(again.header_enforced, !append);
    }
}
