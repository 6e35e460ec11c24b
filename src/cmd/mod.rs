mod create_table;
mod import;

use anyhow::anyhow;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use user_upload::gateway::{self, ConnectionParams, Engine};
use user_upload::record::DEFAULT_MAX_NAME_LENGTH;
use user_upload::schema::DEFAULT_SCHEMA_PATH;

const HELP_FOOTER: &str = "\
Directives:
* --file [csv file name] - the name of the CSV to be parsed
* --create_table - build the users table (no further action is taken)
* --dry_run - use with --file to run the import without inserting into the
  database. All other functions are executed, but the database is not altered
* -u - MySQL username
* -p - MySQL password
* -h - MySQL host
* --help - output the above list of directives with details.

Using dry_run mode overrides the create_table option.
Rows are imported into the `users` table (name, surname, email) of --database,
created by --create_table from --schema.";

#[derive(Parser)]
#[command(name = "user-upload")]
#[command(version)]
#[command(about = "Import a CSV file of users into a MySQL users table", long_about = None)]
#[command(disable_help_flag = true)]
#[command(after_help = HELP_FOOTER)]
pub struct Cli {
    /// Name of the CSV file to be parsed
    #[arg(long, value_name = "CSV_FILE", num_args = 0..=1)]
    pub file: Option<Option<PathBuf>>,

    /// Build the users table and exit
    #[arg(long = "create_table")]
    pub create_table: bool,

    /// Run everything except the database writes
    #[arg(long = "dry_run")]
    pub dry_run: bool,

    /// MySQL username
    #[arg(short = 'u', value_name = "USER", env = "USER_UPLOAD_DB_USER")]
    pub user: Option<String>,

    /// MySQL password
    #[arg(
        short = 'p',
        value_name = "PASSWORD",
        env = "USER_UPLOAD_DB_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// MySQL host
    #[arg(short = 'h', value_name = "HOST", env = "USER_UPLOAD_DB_HOST")]
    pub host: Option<String>,

    /// Database name (a file path, or :memory:, for duckdb)
    #[arg(long, default_value = "catalyst")]
    pub database: String,

    /// Database engine: mysql or duckdb
    #[arg(long, default_value = "mysql")]
    pub engine: String,

    /// SQL script used by --create_table
    #[arg(long, default_value = DEFAULT_SCHEMA_PATH)]
    pub schema: PathBuf,

    /// Maximum first name length before truncation
    #[arg(long, default_value_t = DEFAULT_MAX_NAME_LENGTH)]
    pub max_first_name_length: usize,

    /// Maximum last name length before truncation
    #[arg(long, default_value_t = DEFAULT_MAX_NAME_LENGTH)]
    pub max_last_name_length: usize,

    /// Output the import summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Output the above list of directives with details
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let quiet = cli.json;

    if cli.dry_run && !quiet {
        println!("Dry run mode ON");
    }

    let engine = cli
        .engine
        .parse::<Engine>()
        .map_err(|e| anyhow!("Exiting... {}", e))?;
    let params = connection_params(&cli, engine)?;

    let mut gateway = gateway::connect(&params)
        .map_err(|e| anyhow!("Could not open connection to database: {}", e))?;
    if !quiet {
        println!("Database connected");
    }

    if cli.create_table {
        return create_table::run(&cli.schema, gateway.as_mut(), cli.dry_run, quiet);
    }

    let file = match cli.file {
        Some(Some(file)) => file,
        _ => return Err(anyhow!("Exiting... must set the filename option")),
    };

    import::run(
        file,
        cli.max_first_name_length,
        cli.max_last_name_length,
        cli.dry_run,
        cli.json,
        gateway.as_mut(),
    )
}

fn connection_params(cli: &Cli, engine: Engine) -> anyhow::Result<ConnectionParams> {
    let mut params = ConnectionParams {
        engine,
        database: cli.database.clone(),
        ..Default::default()
    };

    if engine.requires_credentials() {
        params.user = require(cli.user.as_deref(), "username")?;
        params.password = require(cli.password.as_deref(), "password")?;
        params.host = require(cli.host.as_deref(), "host")?;
    }

    Ok(params)
}

fn require(value: Option<&str>, option: &str) -> anyhow::Result<String> {
    value
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Exiting... must set the {} option", option))
}
