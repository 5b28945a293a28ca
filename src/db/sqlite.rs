use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// SQLite database behind an r2d2 connection pool.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open (or create) the database and run schema setup.
    pub fn new(database_url: &str) -> Result<Self, String> {
        let (manager, max_size) = if database_url == ":memory:" {
            // Each pooled connection would open its own in-memory database;
            // a single connection keeps every caller on the same schema.
            (SqliteConnectionManager::memory(), 1)
        } else {
            if let Some(parent) = Path::new(database_url).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| format!("Failed to create database directory: {}", e))?;
                }
            }
            (SqliteConnectionManager::file(database_url), 8)
        };

        let pool = Pool::builder()
            .max_size(max_size)
            .build(manager)
            .map_err(|e| format!("Failed to create connection pool: {}", e))?;

        let db = Database { pool };
        db.init_schema()
            .map_err(|e| format!("Failed to initialize schema: {}", e))?;
        Ok(db)
    }

    /// Check out a pooled connection.
    pub fn conn(&self) -> DbConn {
        self.pool.get().expect("Database connection pool exhausted")
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        let conn = self.conn();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS tasks (
                id            TEXT PRIMARY KEY,
                prompt        TEXT NOT NULL,
                status        TEXT NOT NULL DEFAULT 'pending',
                response      TEXT,
                error_message TEXT,
                created_at    TEXT NOT NULL,
                updated_at    TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}
