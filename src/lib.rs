pub mod diagnostics;
pub mod error;
pub mod gateway;
pub mod importer;
pub mod record;
pub mod schema;
pub mod splitter;
