use super::*;

fn sku(id: &str, title: &str) -> SkuRecord {
    SkuRecord {
        id: Some(id.to_string()),
        title: Some(title.to_string()),
        ..SkuRecord::default()
    }
}

fn ids(records: &[SkuRecord]) -> Vec<&str> {
    records.iter().filter_map(|r| r.id.as_deref()).collect()
}

fn store() -> MemoryStore {
    MemoryStore::new("PaintLayering", "GamesWorkshop")
}

#[tokio::test]
async fn insert_preserves_order() {
    let store = store();
    store.ensure_sku_index().await.unwrap();

    let inserted = store
        .insert_records(&[sku("A1", "Red"), sku("A2", "Blue"), sku("B1", "Green")])
        .await
        .unwrap();

    assert_eq!(inserted, 3);
    let records = store.list_records().await.unwrap();
    assert_eq!(ids(&records), ["A1", "A2", "B1"]);
    assert_eq!(store.count_records().await.unwrap(), 3);
}

#[tokio::test]
async fn empty_batch_inserts_nothing() {
    let store = store();
    assert_eq!(store.insert_records(&[]).await.unwrap(), 0);
    assert_eq!(store.count_records().await.unwrap(), 0);
    assert!(store.collection_names().await.is_empty());
}

#[tokio::test]
async fn duplicate_identity_stops_ordered_insert() {
    let store = store();
    store.ensure_sku_index().await.unwrap();

    let err = store
        .insert_records(&[sku("A1", "Red"), sku("B1", "Green"), sku("A1", "Red"), sku("C1", "Grey")])
        .await
        .unwrap_err();

    match err {
        StoreError::DuplicateKey {
            position,
            ref id,
            ref title,
            ..
        } => {
            assert_eq!(position, 2);
            assert_eq!(id.as_deref(), Some("A1"));
            assert_eq!(title.as_deref(), Some("Red"));
        }
        other => panic!("expected DuplicateKey, got: {other:?}"),
    }
    let records = store.list_records().await.unwrap();
    assert_eq!(ids(&records), ["A1", "B1"]);
}

#[tokio::test]
async fn same_id_with_different_title_is_not_a_duplicate() {
    let store = store();
    store.ensure_sku_index().await.unwrap();

    store
        .insert_records(&[sku("A1", "Red"), sku("A1", "Red (Large)")])
        .await
        .unwrap();
    assert_eq!(store.count_records().await.unwrap(), 2);
}

#[tokio::test]
async fn records_missing_identity_are_not_indexed() {
    let store = store();
    store.ensure_sku_index().await.unwrap();
    let untitled = SkuRecord {
        id: Some("X1".to_string()),
        ..SkuRecord::default()
    };

    store
        .insert_records(&[untitled.clone(), untitled, SkuRecord::default()])
        .await
        .unwrap();
    assert_eq!(store.count_records().await.unwrap(), 3);
}

#[tokio::test]
async fn duplicates_are_accepted_without_index() {
    let store = store();
    store
        .insert_records(&[sku("A1", "Red"), sku("A1", "Red")])
        .await
        .unwrap();
    assert_eq!(store.count_records().await.unwrap(), 2);
    assert!(!store.has_sku_index().await);
}

#[tokio::test]
async fn index_creation_discards_existing_duplicates() {
    let store = store();
    store
        .seed_collection(
            "GamesWorkshop",
            vec![sku("A1", "Red"), sku("A2", "Blue"), sku("A1", "Red")],
        )
        .await;

    store.ensure_sku_index().await.unwrap();

    let records = store.list_records().await.unwrap();
    assert_eq!(ids(&records), ["A1", "A2"]);
    assert!(store.has_sku_index().await);
}

#[tokio::test]
async fn insert_checks_against_existing_records() {
    let store = store();
    store.ensure_sku_index().await.unwrap();
    store.insert_records(&[sku("A1", "Red")]).await.unwrap();

    let err = store.insert_records(&[sku("A1", "Red")]).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateKey { position: 0, .. }));
}

#[tokio::test]
async fn database_drop_removes_every_collection() {
    let store = store();
    store.seed_collection("GamesWorkshop", vec![sku("OLD", "Stale")]).await;
    store.seed_collection("Other", vec![sku("O1", "Kept?")]).await;
    store.ensure_sku_index().await.unwrap();

    store.drop_target(DropScope::Database).await.unwrap();

    assert!(store.collection_names().await.is_empty());
    assert!(!store.has_sku_index().await);
    assert_eq!(store.count_records().await.unwrap(), 0);
}

#[tokio::test]
async fn collection_drop_keeps_other_collections() {
    let store = store();
    store.seed_collection("GamesWorkshop", vec![sku("OLD", "Stale")]).await;
    store.seed_collection("Other", vec![sku("O1", "Kept")]).await;

    store.drop_target(DropScope::Collection).await.unwrap();

    assert_eq!(store.collection_names().await, ["Other"]);
    assert_eq!(ids(&store.collection_records("Other").await), ["O1"]);
}

#[tokio::test]
async fn drop_of_missing_target_succeeds() {
    let store = store();
    store.drop_target(DropScope::Collection).await.unwrap();
    store.drop_target(DropScope::Database).await.unwrap();
}

#[test]
fn for_settings_uses_configured_names() {
    let settings = StoreSettings {
        database: "Layers".to_string(),
        collection: "Citadel".to_string(),
        ..StoreSettings::default()
    };
    let store = MemoryStore::for_settings(&settings);
    assert_eq!(store.database_name(), "Layers");
    assert_eq!(store.collection_name(), "Citadel");
}
