//! End-to-end board flows over the on-disk backends

use focusflow_board::{
    BoardConfig, DragController, DragEnd, NewTask, StorageBackend, TaskId, TaskPatch, TaskService,
    TaskStatus, TaskStore,
};
use tempfile::TempDir;

fn config(dir: &TempDir, backend: StorageBackend) -> BoardConfig {
    let mut config = BoardConfig::default();
    config.storage.backend = backend;
    config.storage.data_dir = dir.path().to_path_buf();
    config
}

async fn open(config: &BoardConfig) -> TaskService {
    let service = TaskService::new(config.open_adapter().unwrap(), TaskStore::new())
        .with_seed_samples(config.seed_samples);
    service.load_tasks().await.unwrap();
    service
}

async fn full_session(backend: StorageBackend) {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, backend);

    // First run seeds the three samples
    let service = open(&config).await;
    assert_eq!(service.store().len(), 3);

    let task = service
        .add_task(NewTask::new("Plan sprint").with_tags(["work"]))
        .await
        .unwrap();
    service
        .update_task(
            &task.id,
            TaskPatch::new().with_estimated_pomodoros(Some(3)),
        )
        .await
        .unwrap();

    // Drag the new task onto the in-progress sample
    let mut controller = DragController::new();
    let tasks = service.store().tasks();
    assert!(controller.drag_start(&task.id, &tasks));
    let outcome = controller.drag_end(&DragEnd::new(task.id.clone(), Some("2")), &tasks);
    outcome.apply(&service).await.unwrap();

    service.delete_task(&TaskId::from_string("3")).await.unwrap();
    let expected = service.store().tasks();

    // A fresh session sees exactly what the first one left behind
    let reopened = open(&config).await;
    let mut reloaded = reopened.store().tasks();
    let mut expected_sorted = expected.clone();
    reloaded.sort_by(|a, b| a.id.cmp(&b.id));
    expected_sorted.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(reloaded, expected_sorted);

    let moved = reopened.store().get(&task.id).unwrap();
    assert_eq!(moved.status, TaskStatus::InProgress);
    assert_eq!(moved.estimated_pomodoros, Some(3));
    assert!(reopened.store().get(&TaskId::from_string("3")).is_none());

    let column = reopened.store().column(TaskStatus::InProgress);
    assert_eq!(column.len(), 2);
}

#[tokio::test]
async fn test_key_value_session_survives_restart() {
    full_session(StorageBackend::KeyValue).await;
}

#[tokio::test]
async fn test_database_session_survives_restart() {
    full_session(StorageBackend::Database).await;
}

#[tokio::test]
async fn test_key_value_layout_is_one_blob() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, StorageBackend::KeyValue);
    open(&config).await;

    let blob = std::fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1]["status"], "in-progress");
    assert!(records[0]["createdAt"].is_i64());
}

#[tokio::test]
async fn test_settings_live_beside_tasks() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, StorageBackend::Database);

    config
        .settings_store()
        .update(|s| s.pomodoro.short_break_duration = 10)
        .await
        .unwrap();

    let settings = config.settings_store().load().await.unwrap();
    assert_eq!(settings.pomodoro.short_break_duration, 10);
    assert!(dir.path().join("focusflow-settings.json").exists());
}
