//! Status command implementation

use anyhow::Result;
use sf_core::Direction;
use sf_engine::catalog;

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::common::{build_migrator, load_project, parse_target_version};

pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = load_project(global)?;
    let migrator = build_migrator(&ctx, global)?;
    migrator.connect().await?;

    let backend = migrator.backend();
    let available = catalog::list_available(migrator.migrations_directory()).await?;
    let ledger_exists = backend.has_migrations_table().await?;

    println!("Project: {}", ctx.config.name);
    let latest = if ledger_exists {
        backend.get_latest_applied_migration().await?
    } else {
        None
    };
    match &latest {
        Some(version) => println!("Latest applied: v{version}"),
        None => println!("Latest applied: none"),
    }

    if available.is_empty() {
        println!(
            "No migrations found in {}",
            migrator.migrations_directory().display()
        );
    } else {
        println!("Available:");
        for version in &available {
            let applied =
                ledger_exists && backend.has_migration(version, Direction::Up).await?;
            let marker = if applied { "applied" } else { "pending" };
            println!("  v{version} [{marker}]");
        }
    }

    if let Some(raw) = &args.target {
        let target = parse_target_version(raw)?;
        let pending = migrator.pending(&target).await?;
        if pending.is_empty() {
            println!("Nothing pending for v{target}");
        } else {
            println!("Pending for v{target}:");
            for version in &pending {
                println!("  v{version}");
            }
        }
    }

    Ok(())
}
