//! DuckDB storage backend implementation

use crate::error::{DbError, DbResult};
use crate::script::{load_up_script, render_script};
use crate::traits::{StorageBackend, DEFAULT_MIGRATIONS_TABLE};
use async_trait::async_trait;
use duckdb::Connection;
use sf_core::version::parse_version;
use sf_core::{CustomOptions, Direction, Version};
use std::path::Path;
use std::sync::Mutex;

/// DuckDB storage backend
///
/// Owns its connection and the configured ledger table name. Migration
/// scripts run through `execute_batch`, so a multi-statement `up.sql` is
/// fine.
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
    table: String,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            table: DEFAULT_MIGRATIONS_TABLE.to_string(),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            table: DEFAULT_MIGRATIONS_TABLE.to_string(),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Override the ledger table name (default "migrations")
    pub fn with_table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    fn has_migrations_table_sync(&self) -> DbResult<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
                duckdb::params![self.table],
                |row| row.get(0),
            )
            .map_err(|e| DbError::LedgerError(e.to_string()))?;
        Ok(count > 0)
    }

    fn create_migrations_table_sync(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 version    TEXT NOT NULL,
                 direction  TEXT NOT NULL,
                 applied_at TIMESTAMP NOT NULL DEFAULT now(),
                 UNIQUE (version, direction)
             );",
            self.table
        );
        conn.execute_batch(&sql)
            .map_err(|e| DbError::LedgerError(format!("failed to create ledger table: {e}")))
    }

    fn has_migration_sync(&self, version: &Version, direction: Direction) -> DbResult<bool> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE version = ? AND direction = ?",
            self.table
        );
        let count: i64 = conn
            .query_row(
                &sql,
                duckdb::params![version.to_string(), direction.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| DbError::LedgerError(e.to_string()))?;
        Ok(count > 0)
    }

    fn latest_applied_sync(&self) -> DbResult<Option<Version>> {
        let conn = self.conn.lock().unwrap();
        // Versions are TEXT; "0.10.0" sorts below "0.9.0" lexically, so the
        // maximum is taken under semantic-version ordering here, not in SQL.
        let sql = format!("SELECT version FROM {} WHERE direction = ?", self.table);
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DbError::LedgerError(e.to_string()))?;
        let rows = stmt
            .query_map(duckdb::params![Direction::Up.as_str()], |row| {
                row.get::<_, String>(0)
            })
            .map_err(|e| DbError::LedgerError(e.to_string()))?;

        let mut versions = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| DbError::LedgerError(e.to_string()))?;
            let version = parse_version(&raw)
                .map_err(|e| DbError::LedgerError(format!("corrupt ledger entry: {e}")))?;
            versions.push(version);
        }
        Ok(versions.into_iter().max())
    }

    fn add_migration_sync(&self, version: &Version, direction: Direction) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "INSERT INTO {} (version, direction) VALUES (?, ?)",
            self.table
        );
        conn.execute(
            &sql,
            duckdb::params![version.to_string(), direction.as_str()],
        )
        .map_err(|e| DbError::LedgerError(format!("failed to record migration: {e}")))?;
        Ok(())
    }

    fn up_sync(
        &self,
        version: &Version,
        migrations_directory: &Path,
        options: &CustomOptions,
    ) -> DbResult<()> {
        let source = load_up_script(migrations_directory, version)?;
        let sql = render_script(&source, options)?;
        log::debug!("Executing up script for v{version}");

        let conn = self.conn.lock().unwrap();
        conn.execute_batch(&sql)
            .map_err(|e| DbError::ExecutionError(format!("up script for v{version} failed: {e}")))
    }
}

#[async_trait]
impl StorageBackend for DuckDbBackend {
    async fn connect(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(())
    }

    async fn has_migrations_table(&self) -> DbResult<bool> {
        self.has_migrations_table_sync()
    }

    async fn create_migrations_table(&self) -> DbResult<()> {
        self.create_migrations_table_sync()
    }

    async fn has_migration(&self, version: &Version, direction: Direction) -> DbResult<bool> {
        self.has_migration_sync(version, direction)
    }

    async fn get_latest_applied_migration(&self) -> DbResult<Option<Version>> {
        self.latest_applied_sync()
    }

    async fn add_migration_to_migrations_table(
        &self,
        version: &Version,
        direction: Direction,
    ) -> DbResult<()> {
        self.add_migration_sync(version, direction)
    }

    async fn up(
        &self,
        version: &Version,
        migrations_directory: &Path,
        options: &CustomOptions,
    ) -> DbResult<()> {
        self.up_sync(version, migrations_directory, options)
    }

    fn up_entry_point(&self) -> &'static str {
        crate::script::UP_ENTRY_POINT
    }

    fn backend_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(raw: &str) -> Version {
        parse_version(raw).unwrap()
    }

    fn table_exists(db: &DuckDbBackend, name: &str) -> bool {
        let conn = db.conn.lock().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
                duckdb::params![name],
                |row| row.get(0),
            )
            .unwrap();
        count > 0
    }

    #[tokio::test]
    async fn test_in_memory() {
        let db = DuckDbBackend::in_memory().unwrap();
        assert_eq!(db.backend_type(), "duckdb");
        db.connect().await.unwrap();
    }

    #[tokio::test]
    async fn test_ledger_table_roundtrip() {
        let db = DuckDbBackend::in_memory().unwrap();
        assert!(!db.has_migrations_table().await.unwrap());

        db.create_migrations_table().await.unwrap();
        assert!(db.has_migrations_table().await.unwrap());

        // Idempotent
        db.create_migrations_table().await.unwrap();
    }

    #[tokio::test]
    async fn test_custom_table_name() {
        let db = DuckDbBackend::in_memory().unwrap().with_table("applied");
        db.create_migrations_table().await.unwrap();

        assert!(table_exists(&db, "applied"));
        assert!(!table_exists(&db, "migrations"));
    }

    #[tokio::test]
    async fn test_add_and_has_migration() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.create_migrations_table().await.unwrap();

        assert!(!db.has_migration(&v("0.1.0"), Direction::Up).await.unwrap());

        db.add_migration_to_migrations_table(&v("0.1.0"), Direction::Up)
            .await
            .unwrap();

        assert!(db.has_migration(&v("0.1.0"), Direction::Up).await.unwrap());
        assert!(!db
            .has_migration(&v("0.1.0"), Direction::Down)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_record_rejected() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.create_migrations_table().await.unwrap();

        db.add_migration_to_migrations_table(&v("0.1.0"), Direction::Up)
            .await
            .unwrap();
        let err = db
            .add_migration_to_migrations_table(&v("0.1.0"), Direction::Up)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::LedgerError(_)));
    }

    #[tokio::test]
    async fn test_latest_applied_empty() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.create_migrations_table().await.unwrap();
        assert_eq!(db.get_latest_applied_migration().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_latest_applied_semver_not_lexical() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.create_migrations_table().await.unwrap();

        for raw in ["0.9.0", "0.10.0", "0.2.0"] {
            db.add_migration_to_migrations_table(&v(raw), Direction::Up)
                .await
                .unwrap();
        }

        assert_eq!(
            db.get_latest_applied_migration().await.unwrap(),
            Some(v("0.10.0"))
        );
    }

    #[tokio::test]
    async fn test_up_executes_script() {
        let dir = tempfile::tempdir().unwrap();
        let version_dir = dir.path().join("0.1.0");
        std::fs::create_dir(&version_dir).unwrap();
        std::fs::write(
            version_dir.join("up.sql"),
            "CREATE TABLE widgets (id INTEGER);",
        )
        .unwrap();

        let db = DuckDbBackend::in_memory().unwrap();
        db.up(&v("0.1.0"), dir.path(), &CustomOptions::new())
            .await
            .unwrap();

        assert!(table_exists(&db, "widgets"));
    }

    #[tokio::test]
    async fn test_up_renders_options() {
        let dir = tempfile::tempdir().unwrap();
        let version_dir = dir.path().join("0.1.0");
        std::fs::create_dir(&version_dir).unwrap();
        std::fs::write(
            version_dir.join("up.sql"),
            "CREATE TABLE {{ var('table_name') }} (id INTEGER);",
        )
        .unwrap();

        let mut options = CustomOptions::new();
        options.insert("table_name".to_string(), serde_json::json!("orders"));

        let db = DuckDbBackend::in_memory().unwrap();
        db.up(&v("0.1.0"), dir.path(), &options).await.unwrap();

        assert!(table_exists(&db, "orders"));
    }

    #[tokio::test]
    async fn test_up_missing_script() {
        let dir = tempfile::tempdir().unwrap();
        let db = DuckDbBackend::in_memory().unwrap();

        let err = db
            .up(&v("0.3.0"), dir.path(), &CustomOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::MigrationScriptMissing { .. }));
    }

    #[tokio::test]
    async fn test_up_failing_script() {
        let dir = tempfile::tempdir().unwrap();
        let version_dir = dir.path().join("0.1.0");
        std::fs::create_dir(&version_dir).unwrap();
        std::fs::write(version_dir.join("up.sql"), "NOT VALID SQL;").unwrap();

        let db = DuckDbBackend::in_memory().unwrap();
        let err = db
            .up(&v("0.1.0"), dir.path(), &CustomOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ExecutionError(_)));
    }
}
