//! Embedded DuckDB adapter.

use super::{ConnectionError, ExecuteError, Gateway, InsertError, INSERT_USER_SQL, USERS_TABLE};
use crate::record::UserRecord;
use duckdb::{params, Connection};
use std::path::Path;

/// Gateway backed by an embedded DuckDB database
pub struct DuckDbGateway {
    conn: Connection,
}

impl DuckDbGateway {
    /// Open a database file, or an in-memory database for `:memory:` / empty
    pub fn open(database: &str) -> Result<Self, ConnectionError> {
        if database.is_empty() || database == ":memory:" {
            return Self::open_in_memory();
        }
        let conn = Connection::open(Path::new(database))
            .map_err(|e| ConnectionError::Engine(e.to_string()))?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, ConnectionError> {
        let conn =
            Connection::open_in_memory().map_err(|e| ConnectionError::Engine(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Get the underlying DuckDB connection (for inspection in tests)
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Number of rows currently in the users table
    pub fn count_users(&self) -> Result<u64, ExecuteError> {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", USERS_TABLE), [], |row| {
                row.get::<_, i64>(0)
            })
            .map(|n| n.max(0) as u64)
            .map_err(|e| ExecuteError::new(e.to_string()))
    }
}

impl Gateway for DuckDbGateway {
    fn execute(&mut self, sql: &str) -> Result<(), ExecuteError> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| ExecuteError::new(e.to_string()))
    }

    fn insert_user(&mut self, record: &UserRecord) -> Result<(), InsertError> {
        match self.conn.execute(
            INSERT_USER_SQL,
            params![record.first_name(), record.last_name(), record.email()],
        ) {
            Ok(_) => Ok(()),
            Err(e) => {
                let message = e.to_string();
                // "Constraint Error: Duplicate key "email: ..." violates unique constraint"
                if message.contains("Duplicate key") {
                    Err(InsertError::DuplicateKey {
                        email: record.email().to_string(),
                    })
                } else {
                    Err(InsertError::Other(message))
                }
            }
        }
    }
}
