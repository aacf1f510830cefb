// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use tasksync_common::{Task, TaskDraft, TaskId};
use tracing::{debug, info};

const TASKS_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        completed BOOLEAN NOT NULL DEFAULT 0,
        priority TEXT NOT NULL DEFAULT 'medium',
        due_date DATE NULL,
        category TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMP NOT NULL,
        updated_at TIMESTAMP NOT NULL
    );
"#;

/// Establishes the database connection pool.
/// If the database does not exist, it creates it.
/// It also ensures the `tasks` table has the correct schema.
pub async fn establish_connection_pool(database_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        info!("Creating database {}", database_url);
        Sqlite::create_database(database_url)
            .await
            .context("Failed to create database")?;
    } else {
        info!("Database already exists.");
    }

    let pool = SqlitePool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    init_schema(&pool).await?;

    Ok(pool)
}

/// Creates the `tasks` table if it is missing.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(TASKS_SCHEMA)
        .execute(pool)
        .await
        .context("Failed to create 'tasks' table")?;

    info!("'tasks' table is ready.");
    Ok(())
}

/// Retrieves every task, oldest first.
pub async fn get_all_tasks_from_db(pool: &SqlitePool) -> Result<Vec<Task>> {
    let tasks = sqlx::query_as::<_, Task>("SELECT * FROM tasks ORDER BY id ASC;")
        .fetch_all(pool)
        .await
        .context("Failed to retrieve tasks from DB")?;

    Ok(tasks)
}

/// Retrieves a single task, `None` when no row has this id.
pub async fn get_task_from_db(pool: &SqlitePool, task_id: TaskId) -> Result<Option<Task>> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ?;")
        .bind(task_id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to retrieve task with ID: {task_id}"))
}

/// Inserts a new task into the database.
/// The title is stored trimmed; `created_at` and `updated_at` are stamped here.
pub async fn create_task_in_db(pool: &SqlitePool, draft: TaskDraft) -> Result<Task> {
    let title = draft.title.trim().to_string();
    let created_at = Utc::now();

    debug!(
        "Insert values: title={}, priority={}, due_date={:?}, category={}, completed={}",
        title, draft.priority, draft.due_date, draft.category, draft.completed
    );

    let id = sqlx::query(
        "INSERT INTO tasks (title, description, completed, priority, due_date, category, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&title)
    .bind(&draft.description)
    .bind(draft.completed)
    .bind(draft.priority)
    .bind(draft.due_date)
    .bind(&draft.category)
    .bind(created_at)
    .bind(created_at)
    .execute(pool)
    .await
    .context("Failed to insert task into DB")?
    .last_insert_rowid();

    Ok(Task {
        id,
        title,
        description: draft.description,
        completed: draft.completed,
        priority: draft.priority,
        due_date: draft.due_date,
        category: draft.category,
        created_at,
        updated_at: created_at,
    })
}

/// Replaces every editable field of a task.
/// Returns `None` if no task with the given ID was found.
pub async fn update_task_in_db(
    pool: &SqlitePool,
    task_id: TaskId,
    draft: TaskDraft,
) -> Result<Option<Task>> {
    debug!("Attempting to update task with ID: {}", task_id);
    let updated_at = Utc::now();

    let result = sqlx::query(
        "UPDATE tasks SET title = ?, description = ?, completed = ?, priority = ?, due_date = ?, category = ?, updated_at = ? WHERE id = ?",
    )
    .bind(draft.title.trim())
    .bind(&draft.description)
    .bind(draft.completed)
    .bind(draft.priority)
    .bind(draft.due_date)
    .bind(&draft.category)
    .bind(updated_at)
    .bind(task_id)
    .execute(pool)
    .await
    .with_context(|| format!("Failed to update task with ID: {task_id}"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_task_from_db(pool, task_id).await
}

/// Deletes a task from the database.
/// Returns true if a row was removed, false if no task with the given ID was found.
pub async fn delete_task_from_db(pool: &SqlitePool, task_id: TaskId) -> Result<bool> {
    debug!("Attempting to delete task with ID: {}", task_id);
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(task_id)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to delete task with ID: {task_id}"))?;

    let rows_affected = result.rows_affected();
    info!("Deleted {} rows for task ID: {}", rows_affected, task_id);

    Ok(rows_affected > 0)
}
