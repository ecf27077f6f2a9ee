//! Check command implementation

use anyhow::Result;

use crate::cli::{CheckArgs, GlobalArgs};
use crate::commands::common::{build_migrator, load_project, parse_target_version};

pub(crate) async fn execute(args: &CheckArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = load_project(global)?;
    let version = parse_target_version(&args.version)?;
    let migrator = build_migrator(&ctx, global)?;

    if global.verbose {
        eprintln!(
            "[verbose] Looking for {}/{}/{}",
            migrator.migrations_directory().display(),
            version,
            migrator.backend().up_entry_point()
        );
    }

    if migrator.can_migrate(&version).await? {
        println!("v{version} is migratable");
    } else {
        println!("v{version} is not migratable");
    }

    Ok(())
}
