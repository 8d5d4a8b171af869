use todo::drag::{DragSession, DropResult};
use todo::store::TaskStore;
use todo::task::{SequentialIds, TaskId};

fn store() -> TaskStore {
    TaskStore::with_ids(Box::new(SequentialIds::new()))
}

fn store_with(contents: &[&str]) -> TaskStore {
    TaskStore::seeded(Box::new(SequentialIds::new()), contents.iter().copied())
}

fn contents(store: &TaskStore) -> Vec<String> {
    store.tasks().iter().map(|task| task.content.clone()).collect()
}

fn id_of(store: &TaskStore, content: &str) -> TaskId {
    store
        .tasks()
        .iter()
        .find(|task| task.content == content)
        .map(|task| task.id)
        .expect("task present")
}

#[test]
fn adding_one_task_gives_one_open_task() {
    let mut store = store();
    store.add("Buy milk");

    assert_eq!(store.len(), 1);
    assert_eq!(store.completed_count(), 0);
    assert_eq!(store.tasks()[0].content, "Buy milk");
    assert!(!store.tasks()[0].is_complete);
}

#[test]
fn toggling_updates_completed_count() {
    let mut store = store_with(&["A", "B"]);
    let a = id_of(&store, "A");

    store.toggle_complete(&a);
    assert_eq!(store.completed_count(), 1);
    store.toggle_complete(&a);
    assert_eq!(store.completed_count(), 0);
}

#[test]
fn reorder_moves_first_to_last() {
    let mut store = store_with(&["A", "B", "C"]);
    store.reorder(0, 2);
    assert_eq!(contents(&store), vec!["B", "C", "A"]);
}

#[test]
fn delete_only_task_empties_list() {
    let mut store = store();
    store.add("A");
    let a = id_of(&store, "A");
    store.delete(&a);
    assert!(store.is_empty());
    assert_eq!(store.completed_count(), 0);
}

#[test]
fn adds_produce_distinct_ids() {
    let mut store = store();
    for n in 0..50 {
        store.add(&format!("task {n}"));
    }
    assert_eq!(store.len(), 50);

    let mut ids: Vec<TaskId> = store.tasks().iter().map(|task| task.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[test]
fn random_ids_are_distinct_too() {
    let mut store = TaskStore::new();
    for n in 0..50 {
        store.add(&format!("task {n}"));
    }
    let mut ids: Vec<TaskId> = store.tasks().iter().map(|task| task.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[test]
fn empty_add_leaves_list_unchanged() {
    let mut store = store_with(&["A", "B"]);
    let before = store.snapshot();
    for blank in ["", " ", "\t\n"] {
        assert!(store.add(blank).is_none());
        assert_eq!(store.tasks(), before.as_slice());
    }
}

#[test]
fn toggle_twice_is_identity() {
    let mut store = store_with(&["A", "B", "C"]);
    let before = store.snapshot();
    for task in before.iter() {
        store.toggle_complete(&task.id);
        store.toggle_complete(&task.id);
    }
    assert_eq!(store.tasks(), before.as_slice());
}

#[test]
fn operations_on_deleted_id_are_no_ops() {
    let mut store = store_with(&["A", "B"]);
    let a = id_of(&store, "A");
    store.delete(&a);
    let after_delete = store.snapshot();

    assert!(store.toggle_complete(&a).is_none());
    assert!(store.update_content(&a, "again").is_none());
    assert!(store.delete(&a).is_none());
    assert!(store.get(&a).is_none());
    assert_eq!(store.tasks(), after_delete.as_slice());
}

#[test]
fn reorder_then_reverse_restores_order() {
    let names = ["A", "B", "C", "D", "E"];
    for i in 0..names.len() {
        for j in 0..names.len() {
            if i == j {
                continue;
            }
            let mut store = store_with(&names);
            let before = store.snapshot();
            assert!(store.reorder(i, j).is_some());
            assert!(store.reorder(j, i).is_some());
            assert_eq!(store.tasks(), before.as_slice(), "reorder({i}, {j})");
        }
    }
}

#[test]
fn completed_count_matches_flags() {
    let mut store = store_with(&["A", "B", "C", "D"]);
    let ids: Vec<TaskId> = store.tasks().iter().map(|task| task.id).collect();
    for (step, id) in ids.iter().cycle().take(11).enumerate() {
        if step % 3 != 1 {
            store.toggle_complete(id);
        }
        let expected = store.tasks().iter().filter(|task| task.is_complete).count();
        assert_eq!(store.completed_count(), expected);
        assert!(store.completed_count() <= store.len());
    }
}

#[test]
fn drag_gesture_reorders_through_drop_result() {
    let mut store = store_with(&["A", "B", "C"]);

    let mut session = DragSession::grab(2, store.len()).expect("grab");
    session.move_by(-5);
    assert_eq!(session.target(), 0);
    store.apply_drop(&session.drop_here());
    assert_eq!(contents(&store), vec!["C", "A", "B"]);

    let session = DragSession::grab(0, store.len()).expect("grab");
    let before = store.snapshot();
    assert!(store.apply_drop(&session.cancel()).is_none());
    assert!(store.apply_drop(&DropResult::moved(0, 9)).is_none());
    assert_eq!(store.tasks(), before.as_slice());
}
