use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tp_core::{Patch, Priority, Status};
use tp_storage::{CreateTaskRequest, TaskStore, UpdateTaskRequest};

fn temp_storage_dir(label: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic enough for tests")
        .as_nanos();
    path.push(format!(
        "tp-storage-{label}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&path).expect("temp storage dir must be creatable");
    path
}

fn create_request(title: &str) -> CreateTaskRequest {
    CreateTaskRequest {
        title: title.to_string(),
        ..CreateTaskRequest::default()
    }
}

#[test]
fn create_applies_defaults_and_returns_canonical_record() {
    let dir = temp_storage_dir("create-defaults");
    let mut store = TaskStore::open(&dir).expect("fresh store should open");

    let task = store
        .create(CreateTaskRequest {
            title: "Implement CI pipeline".to_string(),
            priority: Some(Priority::Medium),
            status: Some(Status::Pending),
            category: Some("devops".to_string()),
            ..CreateTaskRequest::default()
        })
        .expect("create should succeed");

    assert!(task.id > 0);
    assert_eq!(task.title, "Implement CI pipeline");
    assert_eq!(task.description, "");
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.status, Status::Pending);
    assert_eq!(task.category, "devops");
    assert_eq!(task.due_date, None);
    assert_eq!(task.created_at, task.updated_at);
}

#[test]
fn create_defaults_priority_status_and_category_when_omitted() {
    let dir = temp_storage_dir("create-omitted");
    let mut store = TaskStore::open(&dir).expect("fresh store should open");

    let task = store
        .create(create_request("Bare minimum"))
        .expect("create should succeed");

    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.status, Status::Pending);
    assert_eq!(task.category, "general");
}

#[test]
fn round_trip_through_find_by_id() {
    let dir = temp_storage_dir("round-trip");
    let mut store = TaskStore::open(&dir).expect("fresh store should open");

    let created = store
        .create(CreateTaskRequest {
            title: "Round trip".to_string(),
            description: Some("read it back".to_string()),
            priority: Some(Priority::High),
            status: Some(Status::InProgress),
            category: Some("qa".to_string()),
            due_date: Some("2025-12-01".to_string()),
        })
        .expect("create should succeed");

    let found = store
        .find_by_id(created.id)
        .expect("lookup should succeed")
        .expect("created task must be found");

    assert_eq!(found, created);
}

#[test]
fn find_by_id_reports_absence_without_error() {
    let dir = temp_storage_dir("absent-id");
    let store = TaskStore::open(&dir).expect("fresh store should open");

    let found = store.find_by_id(9999).expect("lookup should succeed");
    assert!(found.is_none());
}

#[test]
fn find_all_returns_every_task_most_recent_first() {
    let dir = temp_storage_dir("find-all");
    let mut store = TaskStore::open(&dir).expect("fresh store should open");

    for title in ["first", "second", "third"] {
        store
            .create(create_request(title))
            .expect("create should succeed");
    }

    let tasks = store.find_all().expect("listing should succeed");
    assert_eq!(tasks.len(), 3);
    for pair in tasks.windows(2) {
        assert!(
            pair[0].created_at >= pair[1].created_at,
            "tasks must be ordered most recently created first"
        );
    }
}

#[test]
fn partial_update_preserves_untouched_fields() {
    let dir = temp_storage_dir("partial-update");
    let mut store = TaskStore::open(&dir).expect("fresh store should open");

    let original = store
        .create(CreateTaskRequest {
            title: "Ship release".to_string(),
            description: Some("cut the tag".to_string()),
            priority: Some(Priority::High),
            status: Some(Status::InProgress),
            category: Some("release".to_string()),
            due_date: Some("2025-11-30".to_string()),
        })
        .expect("create should succeed");

    let updated = store
        .update(
            original.id,
            UpdateTaskRequest {
                status: Some(Status::Completed),
                ..UpdateTaskRequest::default()
            },
        )
        .expect("update should succeed")
        .expect("task must still exist");

    assert_eq!(updated.status, Status::Completed);
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.title, original.title);
    assert_eq!(updated.description, original.description);
    assert_eq!(updated.priority, original.priority);
    assert_eq!(updated.category, original.category);
    assert_eq!(updated.due_date, original.due_date);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at >= original.updated_at);
}

#[test]
fn due_date_update_is_tri_state() {
    let dir = temp_storage_dir("tri-state");
    let mut store = TaskStore::open(&dir).expect("fresh store should open");

    let task = store
        .create(CreateTaskRequest {
            title: "Tri-state".to_string(),
            due_date: Some("2025-10-01".to_string()),
            ..CreateTaskRequest::default()
        })
        .expect("create should succeed");

    // Unset leaves the stored value untouched.
    let unchanged = store
        .update(task.id, UpdateTaskRequest::default())
        .expect("update should succeed")
        .expect("task must still exist");
    assert_eq!(unchanged.due_date, Some("2025-10-01".to_string()));

    // Set overwrites.
    let moved = store
        .update(
            task.id,
            UpdateTaskRequest {
                due_date: Patch::Set("2025-12-01".to_string()),
                ..UpdateTaskRequest::default()
            },
        )
        .expect("update should succeed")
        .expect("task must still exist");
    assert_eq!(moved.due_date, Some("2025-12-01".to_string()));

    // Clear nulls the column.
    let cleared = store
        .update(
            task.id,
            UpdateTaskRequest {
                due_date: Patch::Clear,
                ..UpdateTaskRequest::default()
            },
        )
        .expect("update should succeed")
        .expect("task must still exist");
    assert_eq!(cleared.due_date, None);
}

#[test]
fn empty_update_still_succeeds_and_keeps_every_field() {
    let dir = temp_storage_dir("empty-update");
    let mut store = TaskStore::open(&dir).expect("fresh store should open");

    let original = store
        .create(create_request("No-op update"))
        .expect("create should succeed");

    let updated = store
        .update(original.id, UpdateTaskRequest::default())
        .expect("update should succeed")
        .expect("task must still exist");

    assert_eq!(updated.title, original.title);
    assert_eq!(updated.status, original.status);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at >= original.updated_at);
}

#[test]
fn update_missing_id_returns_none() {
    let dir = temp_storage_dir("update-missing");
    let mut store = TaskStore::open(&dir).expect("fresh store should open");

    let outcome = store
        .update(
            424242,
            UpdateTaskRequest {
                title: Some("ghost".to_string()),
                ..UpdateTaskRequest::default()
            },
        )
        .expect("update should succeed");
    assert!(outcome.is_none());
}

#[test]
fn remove_is_final_and_reports_whether_a_row_matched() {
    let dir = temp_storage_dir("remove");
    let mut store = TaskStore::open(&dir).expect("fresh store should open");

    let task = store
        .create(create_request("Short lived"))
        .expect("create should succeed");

    assert!(store.remove(task.id).expect("delete should succeed"));
    assert!(
        store
            .find_by_id(task.id)
            .expect("lookup should succeed")
            .is_none()
    );
    assert!(!store.remove(task.id).expect("second delete should succeed"));
}

#[test]
fn ids_are_not_reused_after_deletion() {
    let dir = temp_storage_dir("id-reuse");
    let mut store = TaskStore::open(&dir).expect("fresh store should open");

    let first = store
        .create(create_request("first"))
        .expect("create should succeed");
    assert!(store.remove(first.id).expect("delete should succeed"));

    let second = store
        .create(create_request("second"))
        .expect("create should succeed");
    assert!(
        second.id > first.id,
        "AUTOINCREMENT ids must be monotonically increasing"
    );
}
