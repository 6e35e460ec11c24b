//! MySQL / MariaDB adapter over `sqlx`.
//!
//! The import pipeline is synchronous, so the adapter owns a current-thread
//! tokio runtime and blocks on every round-trip.

use super::{ConnectionError, ConnectionParams, ExecuteError, Gateway, InsertError, INSERT_USER_SQL};
use crate::record::UserRecord;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::ConnectOptions;
use tokio::runtime::{Builder, Runtime};

/// Gateway holding a single MySQL session for the whole run
pub struct MySqlGateway {
    runtime: Runtime,
    conn: MySqlConnection,
}

impl MySqlGateway {
    pub fn connect(params: &ConnectionParams) -> Result<Self, ConnectionError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;

        let options = MySqlConnectOptions::new()
            .host(&params.host)
            .username(&params.user)
            .password(&params.password)
            .database(&params.database);

        let conn = runtime
            .block_on(options.connect())
            .map_err(|e| ConnectionError::Engine(describe(&e)))?;

        Ok(Self { runtime, conn })
    }
}

impl Gateway for MySqlGateway {
    fn execute(&mut self, sql: &str) -> Result<(), ExecuteError> {
        self.runtime
            .block_on(sqlx::raw_sql(sql).execute(&mut self.conn))
            .map(|_| ())
            .map_err(|e| ExecuteError::new(describe(&e)))
    }

    fn insert_user(&mut self, record: &UserRecord) -> Result<(), InsertError> {
        let result = self.runtime.block_on(
            sqlx::query(INSERT_USER_SQL)
                .bind(record.first_name())
                .bind(record.last_name())
                .bind(record.email())
                .execute(&mut self.conn),
        );

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(InsertError::DuplicateKey {
                    email: record.email().to_string(),
                })
            }
            Err(e) => Err(InsertError::Other(describe(&e))),
        }
    }
}

/// Engine message without the driver's "error returned from database" prefix
fn describe(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db) => db.message().to_string(),
        other => other.to_string(),
    }
}
