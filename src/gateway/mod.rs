//! Database gateway: the only code that talks to a database engine.
//!
//! The importer and the schema bootstrapper are written against the
//! [`Gateway`] trait. Two adapters are provided:
//!
//! - [`DuckDbGateway`]: embedded DuckDB, always available
//! - `MySqlGateway`: MySQL/MariaDB over `sqlx` (cargo feature `mysql`)

mod duckdb_gateway;
#[cfg(feature = "mysql")]
mod mysql_gateway;

pub use duckdb_gateway::DuckDbGateway;
#[cfg(feature = "mysql")]
pub use mysql_gateway::MySqlGateway;

use crate::record::UserRecord;
use thiserror::Error;

/// Table the importer writes into
pub const USERS_TABLE: &str = "users";

/// Parameterised single-row insert shared by both adapters
pub const INSERT_USER_SQL: &str = "INSERT INTO users (name, surname, email) VALUES (?, ?, ?)";

/// Opening a connection failed
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("{0}")]
    Engine(String),
    #[error("{0} support was not compiled into this build")]
    Unsupported(&'static str),
    #[error("could not start database runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// A script statement was rejected by the engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExecuteError {
    pub message: String,
}

impl ExecuteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A single-row insert failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// The email already exists in the table
    #[error("Duplicate entry '{email}' for key 'email'")]
    DuplicateKey { email: String },
    /// Any other engine failure
    #[error("{0}")]
    Other(String),
}

impl InsertError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, InsertError::DuplicateKey { .. })
    }
}

/// Operations the import pipeline needs from a database
pub trait Gateway {
    /// Execute one raw SQL statement
    fn execute(&mut self, sql: &str) -> Result<(), ExecuteError>;

    /// Insert one normalized user row
    fn insert_user(&mut self, record: &UserRecord) -> Result<(), InsertError>;
}

impl<G: Gateway + ?Sized> Gateway for Box<G> {
    fn execute(&mut self, sql: &str) -> Result<(), ExecuteError> {
        (**self).execute(sql)
    }

    fn insert_user(&mut self, record: &UserRecord) -> Result<(), InsertError> {
        (**self).insert_user(record)
    }
}

/// Supported database engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    #[default]
    MySql,
    DuckDb,
}

impl Engine {
    /// Whether `-u`, `-p` and `-h` must be supplied
    pub fn requires_credentials(self) -> bool {
        matches!(self, Engine::MySql)
    }
}

impl std::str::FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Engine::MySql),
            "duckdb" => Ok(Engine::DuckDb),
            _ => Err(format!(
                "Unknown database engine: {}. Valid options: mysql, duckdb",
                s
            )),
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::MySql => write!(f, "mysql"),
            Engine::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Everything needed to open a connection
#[derive(Debug, Clone, Default)]
pub struct ConnectionParams {
    pub engine: Engine,
    pub host: String,
    pub user: String,
    pub password: String,
    /// Database name; a file path (or `:memory:`) for DuckDB
    pub database: String,
}

/// Open a connection with the adapter selected by `params.engine`
pub fn connect(params: &ConnectionParams) -> Result<Box<dyn Gateway>, ConnectionError> {
    match params.engine {
        Engine::DuckDb => Ok(Box::new(DuckDbGateway::open(&params.database)?)),
        #[cfg(feature = "mysql")]
        Engine::MySql => Ok(Box::new(MySqlGateway::connect(params)?)),
        #[cfg(not(feature = "mysql"))]
        Engine::MySql => Err(ConnectionError::Unsupported("MySQL")),
    }
}
