use anyhow::Context;
use std::io;
use std::path::PathBuf;
use user_upload::gateway::Gateway;
use user_upload::importer::Importer;
use user_upload::record::ImportConfig;

pub fn run(
    file: PathBuf,
    max_first_name_length: usize,
    max_last_name_length: usize,
    dry_run: bool,
    json: bool,
    gateway: &mut dyn Gateway,
) -> anyhow::Result<()> {
    let config = ImportConfig::new(file)
        .with_max_first_name_length(max_first_name_length)
        .with_max_last_name_length(max_last_name_length)
        .with_dry_run(dry_run);

    if !json {
        println!("Opening CSV file {}", config.source_path.display());
    }

    let stderr = io::stderr();
    let mut diagnostics = stderr.lock();
    let summary = Importer::new(&config).run(gateway, &mut diagnostics)?;

    if json {
        let output =
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", output);
    } else {
        println!("{}", summary);
    }

    Ok(())
}
