use pretty_assertions::assert_eq;

use devprops::{
    DuplicatePolicy, EditorConfig, EntityId, JsonFileRecordStore, PropertyStore, RecordStore, Row,
    remote::RecordId,
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[tokio::test]
async fn properties_survive_reopening_the_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("addin-data.json");
    let config = EditorConfig::default();
    let parent = EntityId::new("b1");

    let store = PropertyStore::new(JsonFileRecordStore::open(&path)?, &config);
    let first = store
        .replace(&parent, None, &[Row::saved("color", "red")])
        .await?;
    let second = store
        .replace(&parent, Some(&first), &[Row::saved("color", "blue"), Row::placeholder()])
        .await?;
    drop(store);

    let reopened = PropertyStore::new(JsonFileRecordStore::open(&path)?, &config);
    assert_eq!(reopened.remote().records().len(), 1);
    let loaded = reopened.load(&parent).await?;
    assert_eq!(loaded.record_id, Some(second));
    assert_eq!(loaded.rows, vec![Row::saved("color", "blue"), Row::placeholder()]);

    // Ids keep counting after a reopen.
    let third = reopened
        .replace(&parent, loaded.record_id.as_ref(), &loaded.rows)
        .await?;
    assert_eq!(third, RecordId::new("rec-3"));
    Ok(())
}

#[tokio::test]
async fn deleting_a_missing_record_fails() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = JsonFileRecordStore::open(&dir.path().join("empty.json"))?;
    let err = store
        .delete(&EditorConfig::default().add_in_id, &RecordId::new("rec-1"))
        .await
        .unwrap_err();
    assert!(err.message.contains("rec-1"));
    assert!(!store.path().exists());
    Ok(())
}

#[test]
fn corrupt_file_is_reported_with_its_path() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.json");
    std::fs::write(&path, b"{ not json")?;

    let err = JsonFileRecordStore::open(&path).unwrap_err();
    assert!(format!("{err:#}").contains("broken.json"));
    Ok(())
}

#[test]
fn config_file_overrides_defaults() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("devprops.json");
    std::fs::write(
        &path,
        r#"{ "add_in_id": "custom", "error_visible_ms": 1500, "duplicate_policy": "use_first" }"#,
    )?;

    let config = EditorConfig::load_path(&path)?;
    assert_eq!(config.add_in_id, "custom");
    assert_eq!(config.error_visible_for(), std::time::Duration::from_millis(1500));
    assert_eq!(config.duplicate_policy, DuplicatePolicy::UseFirst);
    assert_eq!(config.group_id, EditorConfig::default().group_id);

    assert!(EditorConfig::load_path(&dir.path().join("missing.json")).is_err());
    Ok(())
}
