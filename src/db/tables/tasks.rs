//! Task database operations (tasks)

use chrono::{DateTime, Utc};
use rusqlite::Result as SqliteResult;
use uuid::Uuid;

use super::super::Database;
use crate::models::{Task, TaskStatus};

impl Database {
    /// Insert a new task in the pending state and return the stored record.
    pub fn create_task(&self, prompt: &str) -> SqliteResult<Task> {
        let conn = self.conn();
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO tasks (id, prompt, status, created_at, updated_at)
             VALUES (?1, ?2, 'pending', ?3, ?3)",
            rusqlite::params![&id, prompt, &now],
        )?;

        let created_at = DateTime::parse_from_rfc3339(&now)
            .unwrap()
            .with_timezone(&Utc);

        Ok(Task {
            id,
            prompt: prompt.to_string(),
            status: TaskStatus::Pending,
            response: None,
            error_message: None,
            created_at,
            updated_at: created_at,
        })
    }

    /// Transition a pending task to completed with its result text.
    /// Missing and already-terminal tasks are rejected — terminal rows are
    /// never written twice.
    pub fn mark_task_completed(&self, id: &str, response: &str) -> SqliteResult<()> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();

        let changed = conn.execute(
            "UPDATE tasks SET status = 'completed', response = ?1, updated_at = ?2
             WHERE id = ?3 AND status = 'pending'",
            rusqlite::params![response, &now, id],
        )?;

        if changed == 0 {
            return Err(rusqlite::Error::QueryReturnedNoRows);
        }
        Ok(())
    }

    /// Transition a pending task to failed with a diagnostic message.
    pub fn mark_task_failed(&self, id: &str, error_message: &str) -> SqliteResult<()> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();

        let changed = conn.execute(
            "UPDATE tasks SET status = 'failed', error_message = ?1, updated_at = ?2
             WHERE id = ?3 AND status = 'pending'",
            rusqlite::params![error_message, &now, id],
        )?;

        if changed == 0 {
            return Err(rusqlite::Error::QueryReturnedNoRows);
        }
        Ok(())
    }

    /// Fail every task still pending from a previous run. Returns the
    /// number of rows swept.
    pub fn fail_stale_pending_tasks(&self, error_message: &str) -> SqliteResult<usize> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();

        let changed = conn.execute(
            "UPDATE tasks SET status = 'failed', error_message = ?1, updated_at = ?2
             WHERE status = 'pending'",
            rusqlite::params![error_message, &now],
        )?;
        Ok(changed)
    }

    /// Get a task by ID.
    pub fn get_task(&self, id: &str) -> SqliteResult<Option<Task>> {
        let conn = self.conn();
        let task = conn
            .query_row(
                "SELECT id, prompt, status, response, error_message, created_at, updated_at
                 FROM tasks WHERE id = ?1",
                [id],
                |row| Self::row_to_task(row),
            )
            .ok();
        Ok(task)
    }

    fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        let status_str: String = row.get(2)?;
        let created_at_str: String = row.get(5)?;
        let updated_at_str: String = row.get(6)?;

        Ok(Task {
            id: row.get(0)?,
            prompt: row.get(1)?,
            status: TaskStatus::from_str(&status_str).unwrap_or(TaskStatus::Pending),
            response: row.get(3)?,
            error_message: row.get(4)?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .unwrap()
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
                .unwrap()
                .with_timezone(&Utc),
        })
    }
}
