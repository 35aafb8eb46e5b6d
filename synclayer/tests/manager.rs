use std::sync::Arc;

use bson::doc;
use synclayer::{memory::MemoryStore, prelude::*};

#[tokio::test]
async fn registers_stores_from_every_config_shape() -> DataStoreResult<()> {
    let mut manager = synclayer::data_manager();

    manager
        .add("tags")?
        .add(vec!["projects", "users"])?
        .add(StoreConfig::new("tasks").record_id("taskId").data_sync(true))?;

    assert_eq!(manager.names(), vec!["projects", "tags", "tasks", "users"]);

    let tasks = manager.store("tasks")?;
    assert_eq!(tasks.record_id(), "taskId");
    assert!(tasks.data_sync());
    assert!(tasks.downcast_ref::<MemoryStore>().is_some());

    let saved = tasks.save_one(doc! { "title": "x" }.into()).await?;
    assert!(saved[0].id("taskId").is_some());

    Ok(())
}

#[test]
fn registers_stores_from_json() {
    let configs: StoreConfigs = serde_json::from_str(
        r#"[
            "tags",
            { "name": "tasks", "type": "memory", "settings": { "dataSync": true } }
        ]"#,
    )
    .unwrap();

    let mut manager = synclayer::data_manager();
    manager.add(configs).unwrap();

    assert_eq!(manager.len(), 2);
    assert!(manager.get("tasks").unwrap().data_sync());
    assert!(!manager.get("tags").unwrap().data_sync());
}

#[test]
fn removes_stores_by_name() {
    let mut manager = synclayer::data_manager();
    manager.add(vec!["a", "b", "c"]).unwrap();

    manager
        .remove("a")
        .remove(vec!["b", "missing"]);

    assert_eq!(manager.names(), vec!["c"]);
    assert!(matches!(
        manager.store("a"),
        Err(DataStoreError::StoreNotFound(name)) if name == "a"
    ));
}

#[test]
fn failed_adds_register_nothing() {
    let mut manager = synclayer::data_manager();

    let result = manager.add(vec![
        StoreConfig::new("tasks"),
        StoreConfig::new("remote").adapter("rest"),
    ]);

    assert!(matches!(result, Err(DataStoreError::UnknownAdapter(name)) if name == "rest"));
    assert!(manager.is_empty());
}

#[tokio::test]
async fn re_adding_a_name_replaces_the_store() {
    let mut manager = synclayer::data_manager();
    manager.add("tasks").unwrap();

    let first = manager.store("tasks").unwrap();
    first.save_one(doc! { "id": 1 }.into()).await.unwrap();

    manager.add("tasks").unwrap();

    assert_eq!(manager.len(), 1);
    assert!(manager.store("tasks").unwrap().read(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn custom_adapters() {
    let mut manager = DataManager::new().with_adapter("synced", |config| {
        Ok(Arc::new(MemoryStore::from_config(&config.clone().data_sync(true))) as Arc<dyn DataStore>)
    });

    manager.add(StoreConfig::new("tasks").adapter("synced")).unwrap();

    assert!(manager.store("tasks").unwrap().data_sync());
    assert!(matches!(manager.add("untyped"), Err(DataStoreError::InvalidArgument(_))));
}
