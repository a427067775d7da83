//! Store behavior over the in-memory backend

use std::collections::HashSet;
use todokit::{
    BlobStorage, MemoryStorage, Query, ScriptedIdSource, Store, Todo, TodoBlob, TodoCounts,
    TodoError, TodoModel, TodoPatch,
};

fn seeded(todos: &str) -> Store<MemoryStorage> {
    let storage = MemoryStorage::new();
    storage.set("todos", todos).unwrap();
    Store::open("todos", storage).unwrap()
}

#[test]
fn test_drop_is_idempotent() {
    let store = seeded(r#"{"todos":[{"id":1,"title":"a","completed":false}]}"#);

    assert!(store.drop_all().unwrap().is_empty());
    assert!(store.drop_all().unwrap().is_empty());
    assert!(store.find_all().unwrap().is_empty());
    assert_eq!(
        store.storage().get("todos").unwrap().as_deref(),
        Some(r#"{"todos":[]}"#)
    );
}

#[test]
fn test_generated_ids_are_unique() {
    let store = Store::open("todos", MemoryStorage::new()).unwrap();
    for i in 0..500 {
        store.insert(format!("todo {i}")).unwrap();
    }

    let todos = store.find_all().unwrap();
    let ids: HashSet<_> = todos.iter().map(|todo| todo.id).collect();
    assert_eq!(todos.len(), 500);
    assert_eq!(ids.len(), 500);
    assert!(ids.iter().all(|&id| id < 1_000_000));
}

#[test]
fn test_forced_collision_is_retried() {
    let store = Store::open("todos", MemoryStorage::new())
        .unwrap()
        .with_id_source(ScriptedIdSource::new([123456, 123456, 123456, 654321]));

    let first = store.insert("first").unwrap();
    let second = store.insert("second").unwrap();

    assert_eq!(first.id, 123456);
    assert_eq!(second.id, 654321);
    assert_eq!(store.find_all().unwrap().len(), 2);
}

#[test]
fn test_collision_with_seeded_record() {
    let store = seeded(r#"{"todos":[{"id":7,"title":"existing","completed":false}]}"#)
        .with_id_source(ScriptedIdSource::new([7, 8]));
    assert_eq!(store.insert("new").unwrap().id, 8);
}

#[test]
fn test_full_id_space_is_an_error() {
    let blob = TodoBlob {
        todos: (0..1_000_000).map(|id| Todo::new(id, "taken")).collect(),
    };
    let store = seeded(&blob.to_json().unwrap());
    let before = store.storage().get("todos").unwrap();

    let result = store.insert("x");

    assert!(matches!(result, Err(TodoError::IdSpaceExhausted)));
    assert_eq!(store.storage().get("todos").unwrap(), before);
}

#[test]
fn test_save_then_find_by_id() {
    let store = Store::open("todos", MemoryStorage::new()).unwrap();
    let created = store.save(TodoPatch::title("x"), None).unwrap();
    assert_eq!(created.len(), 1);

    let saved = &created[0];
    assert_eq!(saved.title, "x");
    assert!(!saved.completed);

    let found = store.find(&Query::by_id(saved.id)).unwrap();
    assert_eq!(found, vec![saved.clone()]);
}

#[test]
fn test_find_filters_and_keeps_order() {
    let store = seeded(
        r#"{"todos":[
            {"id":1,"title":"one","completed":false},
            {"id":2,"title":"two","completed":true}
        ]}"#,
    );

    assert_eq!(
        store.find(&Query::by_completed(true)).unwrap(),
        vec![Todo::new(2, "two").completed(true)]
    );
    assert_eq!(
        store.find(&Query::all()).unwrap(),
        vec![Todo::new(1, "one"), Todo::new(2, "two").completed(true)]
    );
    assert!(store.find(&Query::by_id(3)).unwrap().is_empty());
}

#[test]
fn test_find_matches_title_exactly() {
    let store = seeded(r#"{"todos":[{"id":1,"title":"Milk","completed":false}]}"#);
    let query = Query {
        title: Some("milk".to_string()),
        ..Query::default()
    };
    assert!(store.find(&query).unwrap().is_empty());
}

#[test]
fn test_update_merges_only_given_fields() {
    let store = seeded(r#"{"todos":[{"id":5,"title":"keep me","completed":false}]}"#);

    let all = store.update(5, TodoPatch::completed(true)).unwrap();
    assert_eq!(all, vec![Todo::new(5, "keep me").completed(true)]);

    let all = store.update(5, TodoPatch::title("renamed")).unwrap();
    assert_eq!(all, vec![Todo::new(5, "renamed").completed(true)]);
}

#[test]
fn test_remove_returns_remaining() {
    let store = seeded(
        r#"{"todos":[
            {"id":1,"title":"a","completed":false},
            {"id":2,"title":"b","completed":false},
            {"id":3,"title":"c","completed":true}
        ]}"#,
    );

    let remaining = store.remove(2).unwrap();
    assert_eq!(remaining, vec![Todo::new(1, "a"), Todo::new(3, "c").completed(true)]);

    // unknown id leaves everything in place
    assert_eq!(store.remove(99).unwrap().len(), 2);
}

#[test]
fn test_counts_cover_whole_collection() {
    let store = seeded(
        r#"{"todos":[
            {"id":1,"title":"a","completed":false},
            {"id":2,"title":"b","completed":true},
            {"id":3,"title":"c","completed":true}
        ]}"#,
    );
    assert_eq!(
        store.count().unwrap(),
        TodoCounts { active: 1, completed: 2, total: 3 }
    );
}

#[test]
fn test_collections_are_isolated_by_name() {
    let storage = std::sync::Arc::new(MemoryStorage::new());
    let work = Store::open("work", storage.clone()).unwrap();
    let home = Store::open("home", storage.clone()).unwrap();

    work.insert("report").unwrap();
    assert_eq!(work.find_all().unwrap().len(), 1);
    assert!(home.find_all().unwrap().is_empty());
    assert_eq!(storage.len().unwrap(), 2);
}

fn clear<M: TodoModel>(model: M) -> todokit::Result<()> {
    model.remove_all()
}

#[test]
fn test_remove_all_through_model_trait() {
    let store = seeded(r#"{"todos":[{"id":1,"title":"a","completed":true}]}"#);

    clear(&store).unwrap();

    assert_eq!(store.count().unwrap(), TodoCounts::default());
    assert_eq!(
        store.storage().get("todos").unwrap().as_deref(),
        Some(r#"{"todos":[]}"#)
    );
}
