//! Up command implementation

use anyhow::Result;
use sf_engine::UpOutcome;

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::{build_migrator, build_options, load_project, parse_target_version};

pub(crate) async fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = load_project(global)?;
    let desired = parse_target_version(&args.version)?;
    let options = build_options(&ctx.config, &args.vars)?;

    let migrator = build_migrator(&ctx, global)?;
    migrator.connect().await?;

    if global.verbose {
        eprintln!(
            "[verbose] Migrating '{}' to v{} via {}",
            ctx.config.name,
            desired,
            migrator.backend().backend_type()
        );
    }

    match migrator.up(&desired, &options).await? {
        UpOutcome::AlreadyApplied => {
            println!("v{desired} already applied, nothing to do");
        }
        UpOutcome::Applied(versions) => {
            for version in &versions {
                println!("Applied v{version}");
            }
            println!("Migrated to v{desired} ({} step(s))", versions.len());
        }
    }

    Ok(())
}
