//! Command handlers
//!
//! Each handler returns the text to print on stdout; [`run`] prints it and
//! maps errors to exit codes.

use chrono::NaiveDate;
use focusflow_board::types::ThemeMode;
use focusflow_board::{
    BoardConfig, BoardError, ConfigOverrides, DragController, DragEnd, DropTarget, NewTask, StorageBackend,
    TaskId, TaskPatch, TaskService, TaskStatus, TaskStore, Timestamp,
};
use std::path::Path;

use crate::cli::{BackendArg, Cli, Commands, SettingsCommand, StatusArg, TaskCommand, ThemeArg};
use crate::error::{CliError, Result, EXIT_SUCCESS};
use crate::output;

/// Run a parsed command line and return the process exit code.
pub async fn run(cli: Cli) -> i32 {
    match execute(cli).await {
        Ok(out) => {
            if !out.is_empty() {
                println!("{out}");
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {e}");
            e.exit_code()
        }
    }
}

/// Run a parsed command line and return its output.
pub async fn execute(cli: Cli) -> Result<String> {
    let overrides = ConfigOverrides {
        backend: cli.backend.map(backend_of),
        data_dir: cli.data_dir,
    };
    let config = BoardConfig::load_from(Path::new("."), &overrides)?;

    match cli.command {
        // Settings never touch the task backend
        Commands::Settings { command } => settings(&config, command).await,
        Commands::Task(command) => {
            let service = open_service(&config).await?;
            tasks(&service, command).await
        }
    }
}

async fn open_service(config: &BoardConfig) -> Result<TaskService> {
    let service = TaskService::new(config.open_adapter()?, TaskStore::new())
        .with_seed_samples(config.seed_samples);
    service.load_tasks().await?;
    Ok(service)
}

async fn tasks(service: &TaskService, command: TaskCommand) -> Result<String> {
    let store = service.store();

    match command {
        TaskCommand::List {
            status,
            search,
            active,
            recent,
            json,
        } => {
            let mut tasks = match (status, recent) {
                (Some(status), false) => store.column(status_of(status)),
                _ if recent => store.sorted_by_recency(),
                _ => store.tasks(),
            };
            if let Some(status) = status {
                let status = status_of(status);
                tasks.retain(|t| t.status == status);
            }
            if active {
                tasks.retain(|t| t.is_active());
            }
            if let Some(query) = search {
                tasks.retain(|t| t.matches(&query));
            }

            if json {
                output::to_json(&tasks)
            } else {
                Ok(output::task_table(&tasks))
            }
        }

        TaskCommand::Board { json } => {
            let board = store.board();
            if json {
                let columns: Vec<_> = board
                    .columns
                    .iter()
                    .map(|c| serde_json::json!({ "id": c.status, "title": c.title(), "tasks": c.tasks }))
                    .collect();
                output::to_json(&columns)
            } else {
                Ok(output::board_table(&board))
            }
        }

        TaskCommand::Add {
            title,
            description,
            tags,
            due,
            estimate,
        } => {
            if title.trim().is_empty() {
                return Err(BoardError::EmptyTitle.into());
            }
            let mut new_task = NewTask::new(title).with_tags(tags);
            if let Some(description) = description {
                new_task = new_task.with_description(description);
            }
            if let Some(due) = due {
                new_task = new_task.with_due_date(parse_date(&due)?);
            }
            if let Some(estimate) = estimate {
                new_task = new_task.with_estimated_pomodoros(estimate);
            }

            let task = service.add_task(new_task).await?;
            Ok(format!("Created task {}: {}", task.id, task.title))
        }

        TaskCommand::Show { id, json } => {
            let id = resolve_id(store, &id)?;
            let task = store
                .get(&id)
                .ok_or_else(|| CliError::TaskNotFound { id: id.to_string() })?;
            service.select_task(Some(id));
            if json {
                output::to_json(&task)
            } else {
                Ok(output::task_detail(&task))
            }
        }

        TaskCommand::Update {
            id,
            title,
            description,
            tags,
            clear_tags,
            due,
            estimate,
            pomodoros_done,
        } => {
            let id = resolve_id(store, &id)?;
            let mut patch = TaskPatch::new();
            if let Some(title) = title {
                if title.trim().is_empty() {
                    return Err(BoardError::EmptyTitle.into());
                }
                patch = patch.with_title(title);
            }
            if let Some(description) = description {
                let description = Some(description).filter(|d| !d.trim().is_empty());
                patch = patch.with_description(description);
            }
            if clear_tags {
                patch = patch.with_tags(Vec::<String>::new());
            } else if !tags.is_empty() {
                patch = patch.with_tags(tags);
            }
            if let Some(due) = due {
                patch = patch.with_due_date(parse_optional_date(&due)?);
            }
            if let Some(estimate) = estimate {
                patch = patch.with_estimated_pomodoros(Some(estimate));
            }
            if let Some(done) = pomodoros_done {
                patch = patch.with_completed_pomodoros(Some(done));
            }
            if patch.is_empty() {
                return Err(CliError::NothingToUpdate);
            }

            let task = service
                .update_task(&id, patch)
                .await?
                .ok_or_else(|| CliError::TaskNotFound { id: id.to_string() })?;
            Ok(output::task_detail(&task))
        }

        TaskCommand::Status { id, status } => {
            let id = resolve_id(store, &id)?;
            let status = status_of(status);
            let task = service
                .update_task_status(&id, status)
                .await?
                .ok_or_else(|| CliError::TaskNotFound { id: id.to_string() })?;
            Ok(format!("Moved {} to {}", task.id, task.status.title()))
        }

        TaskCommand::Drag { active, over } => {
            let active = resolve_id(store, &active)?;
            let over = match over {
                Some(over) => Some(resolve_drop_target(store, &over)?),
                None => None,
            };

            let tasks = store.tasks();
            let mut controller = DragController::new();
            controller.drag_start(&active, &tasks);
            let outcome = controller.drag_end(&DragEnd::new(active, over.as_deref()), &tasks);
            outcome.apply(service).await?;

            Ok(outcome.to_string())
        }

        TaskCommand::Delete { id } => {
            let id = resolve_id(store, &id)?;
            service.delete_task(&id).await?;
            Ok(format!("Deleted task {id}"))
        }
    }
}

async fn settings(config: &BoardConfig, command: SettingsCommand) -> Result<String> {
    let store = config.settings_store();

    match command {
        SettingsCommand::Show { json } => {
            let settings = store.load().await?;
            if json {
                output::to_json(&settings)
            } else {
                Ok(output::settings_table(&settings))
            }
        }
        SettingsCommand::Set {
            theme,
            work,
            short_break,
            long_break,
            interval,
            auto_start_breaks,
            auto_start_pomodoros,
        } => {
            let nothing = theme.is_none()
                && work.is_none()
                && short_break.is_none()
                && long_break.is_none()
                && interval.is_none()
                && auto_start_breaks.is_none()
                && auto_start_pomodoros.is_none();
            if nothing {
                return Err(CliError::NothingToUpdate);
            }

            let settings = store
                .update(|s| {
                    if let Some(theme) = theme {
                        s.theme.mode = theme_of(theme);
                    }
                    let p = &mut s.pomodoro;
                    p.work_duration = work.unwrap_or(p.work_duration);
                    p.short_break_duration = short_break.unwrap_or(p.short_break_duration);
                    p.long_break_duration = long_break.unwrap_or(p.long_break_duration);
                    p.long_break_interval = interval.unwrap_or(p.long_break_interval);
                    p.auto_start_breaks = auto_start_breaks.unwrap_or(p.auto_start_breaks);
                    p.auto_start_pomodoros = auto_start_pomodoros.unwrap_or(p.auto_start_pomodoros);
                })
                .await?;
            Ok(output::settings_table(&settings))
        }
    }
}

/// Resolve a full id or a unique id prefix against the loaded tasks
pub fn resolve_id(store: &TaskStore, input: &str) -> Result<TaskId> {
    let tasks = store.tasks();
    if let Some(task) = tasks.iter().find(|t| t.id == input) {
        return Ok(task.id.clone());
    }

    let matches: Vec<&TaskId> = tasks
        .iter()
        .map(|t| &t.id)
        .filter(|id| !input.is_empty() && id.as_str().starts_with(input))
        .collect();
    match matches.as_slice() {
        [id] => Ok((*id).clone()),
        [] => Err(CliError::TaskNotFound {
            id: input.to_string(),
        }),
        _ => Err(CliError::AmbiguousId {
            prefix: input.to_string(),
            count: matches.len(),
        }),
    }
}

/// Column ids pass through; task ids may be prefixes. An unknown task id is
/// kept as given so the drag still reaches the reorder step.
fn resolve_drop_target(store: &TaskStore, input: &str) -> Result<String> {
    if let DropTarget::Column(_) = DropTarget::parse(input) {
        return Ok(input.to_string());
    }
    match resolve_id(store, input) {
        Ok(id) => Ok(id.to_string()),
        Err(CliError::TaskNotFound { .. }) => Ok(input.to_string()),
        Err(e) => Err(e),
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<Timestamp> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(Timestamp::from_date)
        .map_err(|_| CliError::InvalidDate {
            value: value.to_string(),
        })
}

/// Like [`parse_date`], with `none` meaning no date
pub fn parse_optional_date(value: &str) -> Result<Option<Timestamp>> {
    if value.trim().eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        parse_date(value).map(Some)
    }
}

fn status_of(arg: StatusArg) -> TaskStatus {
    match arg {
        StatusArg::Todo => TaskStatus::Todo,
        StatusArg::InProgress => TaskStatus::InProgress,
        StatusArg::Completed => TaskStatus::Completed,
    }
}

fn backend_of(arg: BackendArg) -> StorageBackend {
    match arg {
        BackendArg::Memory => StorageBackend::Memory,
        BackendArg::KeyValue => StorageBackend::KeyValue,
        BackendArg::Database => StorageBackend::Database,
    }
}

fn theme_of(arg: ThemeArg) -> ThemeMode {
    match arg {
        ThemeArg::Light => ThemeMode::Light,
        ThemeArg::Dark => ThemeMode::Dark,
        ThemeArg::System => ThemeMode::System,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use focusflow_board::Task;

    fn store() -> TaskStore {
        let task = |id: &str| Task::new(TaskId::from_string(id), id, Timestamp::from_millis(0));
        TaskStore::with_tasks(vec![task("01HXAAA"), task("01HXAAB"), task("01HYZZZ")])
    }

    #[test]
    fn test_resolve_exact_and_prefix() {
        let store = store();
        assert_eq!(resolve_id(&store, "01HXAAB").unwrap(), "01HXAAB");
        assert_eq!(resolve_id(&store, "01HY").unwrap(), "01HYZZZ");
    }

    #[test]
    fn test_resolve_ambiguous_and_missing() {
        let store = store();
        assert!(matches!(
            resolve_id(&store, "01HXAA"),
            Err(CliError::AmbiguousId { count: 2, .. })
        ));
        assert!(matches!(
            resolve_id(&store, "nope"),
            Err(CliError::TaskNotFound { .. })
        ));
        assert!(matches!(
            resolve_id(&store, ""),
            Err(CliError::TaskNotFound { .. })
        ));
    }

    #[test]
    fn test_drop_target_resolution() {
        let store = store();
        assert_eq!(resolve_drop_target(&store, "completed").unwrap(), "completed");
        assert_eq!(resolve_drop_target(&store, "01HY").unwrap(), "01HYZZZ");
        assert_eq!(resolve_drop_target(&store, "gone").unwrap(), "gone");
    }

    #[test]
    fn test_parse_dates() {
        let due = parse_date("2026-02-28").unwrap();
        assert_eq!(due.to_string(), "2026-02-28 00:00");
        assert!(parse_date("28/02/2026").is_err());
        assert_eq!(parse_optional_date("none").unwrap(), None);
        assert!(parse_optional_date("2026-01-01").unwrap().is_some());
    }
}
