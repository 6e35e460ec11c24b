use std::path::Path;
use user_upload::gateway::Gateway;
use user_upload::schema;

pub fn run(
    schema_path: &Path,
    gateway: &mut dyn Gateway,
    dry_run: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    if !quiet {
        println!("Creating database table...");
    }

    let report = schema::bootstrap(schema_path, gateway, dry_run)?;

    if !quiet {
        if dry_run {
            println!(
                "Dry run: {} statements read from {}, none executed",
                report.statements,
                schema_path.display()
            );
        } else {
            println!("{}", report);
        }
    }

    Ok(())
}
