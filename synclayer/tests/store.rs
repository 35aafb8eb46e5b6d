use bson::{Bson, Document, doc};
use synclayer::{memory::MemoryStore, prelude::*};

fn records(documents: Vec<Document>) -> Vec<Record> {
    documents
        .into_iter()
        .map(Record::from)
        .collect()
}

fn numeric(id: &Bson) -> f64 {
    match id {
        Bson::Int32(n) => f64::from(*n),
        Bson::Int64(n) => *n as f64,
        Bson::Double(n) => *n,
        other => panic!("unexpected identity {other}"),
    }
}

async fn synced(name: &str) -> MemoryStore {
    MemoryStore::builder(name)
        .data_sync(true)
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn identities_stay_unique_across_saves() {
    for store in [MemoryStore::new("plain"), synced("synced").await] {
        store.save(records(vec![doc! { "id": 1 }, doc! { "id": 2 }]), SaveOptions::default()).await.unwrap();
        store.save(records(vec![doc! { "id": 2, "v": 1 }, doc! { "id": 1_i64 }]), SaveOptions::default()).await.unwrap();
        store.save(records(vec![doc! { "id": 2.0, "v": 2 }]), SaveOptions::reset()).await.unwrap();
        store.save(records(vec![doc! { "id": 1 }, doc! { "id": 1, "v": 3 }]), SaveOptions::default()).await.unwrap();

        let visible = store.read(None).await.unwrap();
        let mut ids = visible
            .iter()
            .filter_map(|record| record.get("id"))
            .map(numeric)
            .collect::<Vec<_>>();
        let count = ids.len();
        ids.sort_by(f64::total_cmp);
        ids.dedup();

        assert_eq!(ids.len(), count, "duplicate identities in {visible:?}");
    }
}

#[tokio::test]
async fn reset_without_sync_is_idempotent() {
    let store = MemoryStore::new("tasks");
    let incoming = records(vec![doc! { "id": 1, "v": "a" }, doc! { "id": 2, "v": "b" }]);

    let once = store.save(incoming.clone(), SaveOptions::reset()).await.unwrap();
    let twice = store.save(incoming.clone(), SaveOptions::reset()).await.unwrap();

    assert_eq!(once, incoming);
    assert_eq!(twice, once);
}

#[tokio::test]
async fn removed_records_are_resurrected_as_modified() {
    let store = synced("tasks").await;
    store.save(records(vec![doc! { "id": 1, "v": "a" }]), SaveOptions::default()).await.unwrap();

    assert!(store.remove(1.into()).await.unwrap().is_empty());
    assert_eq!(store.sync_status(&1.into()).await, Some(SyncStatus::Removed));

    store.save_one(doc! { "id": 1, "v": "b" }.into()).await.unwrap();

    assert_eq!(store.find(1.into()).await.unwrap(), Some(doc! { "id": 1, "v": "b" }.into()));
    assert_eq!(store.sync_status(&1.into()).await, Some(SyncStatus::Modified));
}

#[tokio::test]
async fn top_level_combinators() {
    let store = MemoryStore::new("tasks");
    store.save(records(vec![doc! { "a": 1, "b": 1 }, doc! { "a": 1, "b": 2 }]), SaveOptions::default()).await.unwrap();

    let spec = FilterSpec::from(doc! { "a": 1, "b": 2 });

    assert_eq!(store.filter(Some(&spec), false).await.unwrap(), records(vec![doc! { "a": 1, "b": 2 }]));
    assert_eq!(store.filter(Some(&spec), true).await.unwrap().len(), 2);
}

#[tokio::test]
async fn multi_value_clause() {
    let store = MemoryStore::new("tasks");
    store.save(records(vec![doc! { "a": 1 }, doc! { "a": 3 }]), SaveOptions::default()).await.unwrap();

    let spec = FilterSpec::from(doc! { "a": { "data": [1, 2], "matchAny": true } });

    assert_eq!(store.filter(Some(&spec), false).await.unwrap(), records(vec![doc! { "a": 1 }]));
}

#[tokio::test]
async fn reconciliation_reset() {
    let store = synced("tasks").await;
    store.save(records(vec![doc! { "id": 1 }, doc! { "id": 2 }]), SaveOptions::default()).await.unwrap();

    let visible = store
        .save(records(vec![doc! { "id": 2, "v": "x" }, doc! { "id": 3 }]), SaveOptions::reset())
        .await
        .unwrap();

    assert_eq!(visible, records(vec![doc! { "id": 2, "v": "x" }, doc! { "id": 3 }]));
    assert_eq!(store.read(None).await.unwrap(), visible);
    assert!(store.read(Some(1.into())).await.unwrap().is_empty());

    assert_eq!(store.sync_status(&1.into()).await, Some(SyncStatus::Removed));
    assert_eq!(store.sync_status(&2.into()).await, Some(SyncStatus::Modified));
    assert_eq!(store.sync_status(&3.into()).await, Some(SyncStatus::New));
}

#[tokio::test]
async fn remove_all_empties_the_store() {
    for store in [MemoryStore::new("plain"), synced("synced").await] {
        store.save(records(vec![doc! { "id": 1 }, doc! { "id": 2 }]), SaveOptions::default()).await.unwrap();

        assert!(store.remove(Target::None).await.unwrap().is_empty());
        assert!(store.remove(Target::None).await.unwrap().is_empty());
        assert!(store.read(None).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn read_by_id_on_an_empty_store() {
    let store = MemoryStore::new("tasks");

    assert_eq!(store.read(Some(1.into())).await.unwrap(), vec![]);
    assert_eq!(store.find("missing".into()).await.unwrap(), None);
}

#[tokio::test]
async fn remove_accepts_every_target_shape() {
    let store = MemoryStore::new("tasks");
    store.save(
        records(vec![doc! { "id": 1 }, doc! { "id": "b" }, doc! { "id": 3 }, doc! { "id": 4 }]),
        SaveOptions::default(),
    ).await.unwrap();

    store.remove(1.into()).await.unwrap();
    store.remove(doc! { "id": "b", "title": "ignored" }.into()).await.unwrap();
    let visible = store
        .remove(vec![TargetItem::from(3), TargetItem::from(doc! { "title": "no identity" })].into())
        .await
        .unwrap();

    assert_eq!(visible, records(vec![doc! { "id": 4 }]));
}

#[tokio::test]
async fn custom_identity_field() {
    let store = MemoryStore::builder("tasks")
        .record_id("taskId")
        .data_sync(true)
        .build()
        .await
        .unwrap();

    let visible = store.save(records(vec![doc! { "title": "x" }]), SaveOptions::default()).await.unwrap();
    let id = visible[0].id("taskId").unwrap();

    assert!(visible[0].get("id").is_none());
    assert_eq!(store.sync_status(&id).await, Some(SyncStatus::New));

    store.remove(Target::from(visible[0].clone())).await.unwrap();
    assert!(store.read(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn works_through_a_trait_object() {
    let store: std::sync::Arc<dyn DataStore> = std::sync::Arc::new(MemoryStore::new("tasks"));

    store.save_one(doc! { "id": 1, "tags": ["a", "b"] }.into()).await.unwrap();

    let tagged = store
        .filter(Some(&FilterSpec::new().all_of("tags", ["b", "a"])), false)
        .await
        .unwrap();

    assert_eq!(tagged.len(), 1);
    assert!(store.filter(Some(&FilterSpec::new().eq("tags", "c")), false).await.unwrap().is_empty());
}

#[tokio::test]
async fn large_integer_identities_are_not_merged() {
    let first = 9_007_199_254_740_992_i64;
    let second = first + 1;

    for store in [MemoryStore::new("plain"), synced("synced").await] {
        store.save_one(doc! { "id": first, "v": "a" }.into()).await.unwrap();
        let visible = store.save_one(doc! { "id": second, "v": "b" }.into()).await.unwrap();

        assert_eq!(visible.len(), 2);
        assert_eq!(
            store.read(Some(first.into())).await.unwrap(),
            records(vec![doc! { "id": first, "v": "a" }])
        );

        let visible = store.remove(second.into()).await.unwrap();
        assert_eq!(visible, records(vec![doc! { "id": first, "v": "a" }]));
    }
}
