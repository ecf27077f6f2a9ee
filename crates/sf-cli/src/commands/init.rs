//! Init command implementation - scaffolds a new Semflow project

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::cli::InitArgs;

/// Execute the init command
pub(crate) async fn execute(args: &InitArgs) -> Result<()> {
    // Reject names that could cause path traversal or confusing directory names
    if args.name.contains('/')
        || args.name.contains('\\')
        || args.name.contains("..")
        || args.name.starts_with('.')
        || args.name.starts_with('-')
    {
        anyhow::bail!(
            "Invalid project name '{}': must not contain '/', '\\', '..', or start with '.' or '-'",
            args.name
        );
    }

    let project_dir = Path::new(&args.name);

    if project_dir.exists() {
        anyhow::bail!(
            "Directory '{}' already exists. Choose a different project name.",
            args.name
        );
    }

    println!("Creating new Semflow project: {}\n", args.name);

    let sample_dir = project_dir.join("migrations").join("0.1.0");
    fs::create_dir_all(&sample_dir)
        .with_context(|| format!("Failed to create directory: {}", sample_dir.display()))?;

    // Escape YAML special characters in interpolated values
    let safe_name = args.name.replace('"', "\\\"");
    let safe_db_path = args.database_path.replace('"', "\\\"");
    let config_content = format!(
        r#"name: "{safe_name}"

migrations_path: migrations
table_name: migrations

database:
  type: duckdb
  path: "{safe_db_path}"

vars: {{}}
"#
    );
    fs::write(project_dir.join("semflow.yml"), config_content)
        .context("Failed to write semflow.yml")?;

    let sample_sql = "-- First migration: replace with your own schema.\n\
                      CREATE TABLE example (id INTEGER);\n";
    fs::write(sample_dir.join("up.sql"), sample_sql).context("Failed to write up.sql")?;

    println!("Created {}/semflow.yml", args.name);
    println!("Created {}/migrations/0.1.0/up.sql", args.name);
    println!("\nNext steps:");
    println!("  cd {}", args.name);
    println!("  sf up 0.1.0");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_init(name: &str) -> Result<()> {
        let args = InitArgs {
            name: name.to_string(),
            database_path: "./semflow.duckdb".to_string(),
        };
        tokio::runtime::Runtime::new().unwrap().block_on(execute(&args))
    }

    #[test]
    fn test_rejects_path_traversal_names() {
        for name in ["../evil", "a/b", ".hidden", "-flag"] {
            assert!(run_init(name).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn test_scaffolds_project_layout() {
        let dir = tempfile::tempdir().unwrap();
        let prev = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();

        let result = run_init("demo_project");

        std::env::set_current_dir(prev).unwrap();
        result.unwrap();

        let root = dir.path().join("demo_project");
        assert!(root.join("semflow.yml").is_file());
        assert!(root.join("migrations/0.1.0/up.sql").is_file());

        let config = sf_core::Config::load_from_dir(&root).unwrap();
        assert_eq!(config.name, "demo_project");
    }
}
