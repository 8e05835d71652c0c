use pretty_assertions::assert_eq;

use devprops::{
    DuplicatePolicy, EditorConfig, EntityId, MemoryRecordStore, PropertyError, PropertyStore,
    RecordId, Row, StoreCall, WriteStage, remote::StoredRecord, statics,
};

fn store() -> PropertyStore<MemoryRecordStore> {
    PropertyStore::new(MemoryRecordStore::new(), &EditorConfig::default())
}

fn seed(store: &MemoryRecordStore, id: &str, data: &str) {
    store.insert_raw(StoredRecord {
        id: RecordId::new(id),
        add_in_id: statics::DEFAULT_ADD_IN_ID.to_string(),
        groups: Vec::new(),
        data: data.to_string(),
    });
}

#[tokio::test]
async fn load_without_records_yields_only_the_placeholder() {
    let store = store();
    let loaded = store.load(&EntityId::new("b1")).await.expect("load");
    assert_eq!(loaded.record_id, None);
    assert_eq!(loaded.rows, vec![Row::new("", "", false)]);
    assert_eq!(
        store.remote().calls(),
        vec![StoreCall::Query(EntityId::new("b1"))]
    );
}

#[tokio::test]
async fn load_returns_saved_rows_in_document_order_plus_placeholder() {
    let store = store();
    seed(
        store.remote(),
        "r1",
        r#"{"device":{"id":"b1"},"properties":{"size":"xl","color":"red","owner":"ops"}}"#,
    );
    seed(
        store.remote(),
        "r2",
        r#"{"device":{"id":"b2"},"properties":{"other":"device"}}"#,
    );

    let loaded = store.load(&EntityId::new("b1")).await.expect("load");
    assert_eq!(loaded.record_id, Some(RecordId::new("r1")));
    assert_eq!(
        loaded.rows,
        vec![
            Row::saved("size", "xl"),
            Row::saved("color", "red"),
            Row::saved("owner", "ops"),
            Row::placeholder(),
        ]
    );
}

#[tokio::test]
async fn load_ignores_records_of_other_add_ins() {
    let store = store();
    store.remote().insert_raw(StoredRecord {
        id: RecordId::new("foreign"),
        add_in_id: "someone-else".to_string(),
        groups: Vec::new(),
        data: r#"{"device":{"id":"b1"},"properties":{"a":"b"}}"#.to_string(),
    });
    let loaded = store.load(&EntityId::new("b1")).await.expect("load");
    assert_eq!(loaded.record_id, None);
    assert_eq!(loaded.rows.len(), 1);
}

#[tokio::test]
async fn load_query_failure_is_a_remote_query_error() {
    let store = store();
    store.remote().fail_query("service unavailable");
    let err = store.load(&EntityId::new("b1")).await.unwrap_err();
    assert!(matches!(err, PropertyError::RemoteQuery(ref e) if e.message == "service unavailable"));
}

#[tokio::test]
async fn load_unreadable_payload_is_a_decode_error() {
    let store = store();
    seed(store.remote(), "r1", r#"{"device":{"id":"b1"},"properties":{"a":[1]}}"#);
    let err = store.load(&EntityId::new("b1")).await;
    match err {
        Err(PropertyError::Decode { record_id, .. }) => assert_eq!(record_id, RecordId::new("r1")),
        Ok(loaded) => panic!("expected decode error, got {loaded:?}"),
        Err(other) => panic!("expected decode error, got {other}"),
    }
}

#[tokio::test]
async fn duplicate_records_are_rejected_by_default() {
    let store = store();
    seed(store.remote(), "r1", r#"{"device":{"id":"b1"},"properties":{"a":"1"}}"#);
    seed(store.remote(), "r2", r#"{"device":{"id":"b1"},"properties":{"a":"2"}}"#);

    let err = store.load(&EntityId::new("b1")).await.unwrap_err();
    assert!(matches!(
        err,
        PropertyError::DuplicateRecords { ref parent, count: 2 } if parent.as_str() == "b1"
    ));
}

#[tokio::test]
async fn duplicate_records_use_first_when_configured() {
    let config = EditorConfig {
        duplicate_policy: DuplicatePolicy::UseFirst,
        ..EditorConfig::default()
    };
    let store = PropertyStore::new(MemoryRecordStore::new(), &config);
    seed(store.remote(), "r1", r#"{"device":{"id":"b1"},"properties":{"a":"1"}}"#);
    seed(store.remote(), "r2", r#"{"device":{"id":"b1"},"properties":{"a":"2"}}"#);

    let loaded = store.load(&EntityId::new("b1")).await.expect("load");
    assert_eq!(loaded.record_id, Some(RecordId::new("r1")));
    assert_eq!(loaded.rows, vec![Row::saved("a", "1"), Row::placeholder()]);
}

#[tokio::test]
async fn replace_without_old_record_only_creates() {
    let store = store();
    let parent = EntityId::new("b1");
    let rows = vec![Row::new("color", "red", false), Row::placeholder()];

    let id = store.replace(&parent, None, &rows).await.expect("replace");

    assert_eq!(
        store.remote().calls(),
        vec![StoreCall::Create(
            r#"{"device":{"id":"b1"},"properties":{"color":"red"}}"#.to_string()
        )]
    );
    let records = store.remote().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].add_in_id, statics::DEFAULT_ADD_IN_ID);
    assert_eq!(records[0].groups[0].as_str(), statics::DEFAULT_GROUP_ID);
}

#[tokio::test]
async fn replace_deletes_before_creating() {
    let store = store();
    let parent = EntityId::new("b1");
    let first = store
        .replace(&parent, None, &[Row::saved("a", "1")])
        .await
        .expect("first save");
    store.remote().clear_calls();

    let second = store
        .replace(&parent, Some(&first), &[Row::saved("a", "2")])
        .await
        .expect("second save");

    assert_ne!(first, second);
    assert_eq!(
        store.remote().calls(),
        vec![
            StoreCall::Delete(first),
            StoreCall::Create(r#"{"device":{"id":"b1"},"properties":{"a":"2"}}"#.to_string()),
        ]
    );
    assert_eq!(store.remote().records().len(), 1);
}

#[tokio::test]
async fn failed_delete_aborts_before_create() {
    let store = store();
    let parent = EntityId::new("b1");
    let first = store
        .replace(&parent, None, &[Row::saved("a", "1")])
        .await
        .expect("first save");
    store.remote().clear_calls();
    store.remote().fail_delete("locked");

    let err = store
        .replace(&parent, Some(&first), &[Row::saved("a", "2")])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PropertyError::RemoteWrite {
            stage: WriteStage::Delete,
            ..
        }
    ));
    assert!(!err.previous_record_removed());
    assert_eq!(store.remote().calls(), vec![StoreCall::Delete(first.clone())]);
    assert_eq!(store.remote().records()[0].id, first);
}

#[tokio::test]
async fn failed_create_after_delete_leaves_no_record() {
    let store = store();
    let parent = EntityId::new("b1");
    let first = store
        .replace(&parent, None, &[Row::saved("a", "1")])
        .await
        .expect("first save");
    store.remote().fail_create("quota exceeded");

    let err = store
        .replace(&parent, Some(&first), &[Row::saved("a", "2")])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PropertyError::RemoteWrite {
            stage: WriteStage::Create,
            ..
        }
    ));
    assert!(err.previous_record_removed());
    assert!(store.remote().records().is_empty());
}

#[tokio::test]
async fn replace_then_load_round_trips_non_placeholder_rows() {
    let store = store();
    let parent = EntityId::new("b7");
    let rows = vec![
        Row::saved("color", "red"),
        Row::new("size", "xl", false),
        Row::saved("color", "blue"),
        Row::placeholder(),
    ];

    let id = store.replace(&parent, None, &rows).await.expect("replace");
    let loaded = store.load(&parent).await.expect("load");

    assert_eq!(loaded.record_id, Some(id));
    assert_eq!(
        loaded.rows,
        vec![
            Row::saved("color", "blue"),
            Row::saved("size", "xl"),
            Row::placeholder(),
        ]
    );
}
