//! Schema versions
//!
//! Each step runs in its own transaction together with its row in
//! `schema_migrations`, so a failed step leaves the previous version intact.

use rusqlite::{params, Connection};
use tracing::{info, instrument};

use crate::error::Result;

pub struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// Ordered by version, starting at 1
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        sql: r#"
            -- Roster, in display order
            CREATE TABLE IF NOT EXISTS participants (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                tenure_years INTEGER NOT NULL DEFAULT 0,
                number INTEGER NOT NULL UNIQUE,
                position INTEGER NOT NULL
            );

            -- Prize stock
            CREATE TABLE IF NOT EXISTS prizes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                quantity INTEGER NOT NULL,
                initial_quantity INTEGER NOT NULL,
                info TEXT NOT NULL DEFAULT '',
                color TEXT NOT NULL,
                position INTEGER NOT NULL,
                CHECK (quantity <= initial_quantity)
            );

            -- Numbers that are shown on the wheel but never drawn
            CREATE TABLE IF NOT EXISTS blacklist (
                number INTEGER PRIMARY KEY
            );

            -- Numbers that already won, in win order
            CREATE TABLE IF NOT EXISTS won_numbers (
                position INTEGER PRIMARY KEY,
                number INTEGER NOT NULL
            );

            -- Confirmed wins, position 0 is the newest
            CREATE TABLE IF NOT EXISTS win_records (
                id TEXT PRIMARY KEY,
                participant_name TEXT NOT NULL,
                participant_number INTEGER NOT NULL,
                prize_name TEXT NOT NULL,
                prize_color TEXT NOT NULL,
                won_at TEXT NOT NULL,
                position INTEGER NOT NULL
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Add indexes for history lookups",
        sql: r#"
            CREATE INDEX IF NOT EXISTS idx_win_records_position ON win_records(position);
            CREATE INDEX IF NOT EXISTS idx_win_records_number ON win_records(participant_number);
        "#,
    },
];

fn schema_version(conn: &Connection) -> Result<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )?;
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql)?;
    tx.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        params![migration.version, migration.description, chrono::Utc::now().to_rfc3339()],
    )?;
    tx.commit()?;
    Ok(())
}

fn migrate(conn: &Connection, migrations: &[Migration]) -> Result<u32> {
    let mut version = schema_version(conn)?;
    for migration in migrations.iter() {
        if migration.version <= version {
            continue;
        }
        info!(version = migration.version, description = migration.description, "Applying migration");
        apply(conn, migration)?;
        version = migration.version;
    }
    Ok(version)
}

/// Bring the schema up to the latest version
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    migrate(conn, MIGRATIONS)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latest_version() -> u32 {
        MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
    }

    #[test]
    fn test_migrations_run() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let version = schema_version(&conn).unwrap();
        assert_eq!(version, latest_version());
    }

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = schema_version(&conn).unwrap();
        assert_eq!(version, latest_version());
    }

    #[test]
    fn test_migrations_sequential() {
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(
                migration.version as usize,
                i + 1,
                "Migration {} should have version {}",
                migration.description,
                i + 1
            );
        }
    }

    #[test]
    fn test_schema_tables_exist() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for table in ["participants", "prizes", "blacklist", "won_numbers", "win_records"] {
            let count: u32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {table}");
        }
    }

    #[test]
    fn test_prize_stock_check() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO prizes (id, name, quantity, initial_quantity, color, position)
             VALUES ('p', 'Phone', 3, 1, '#fff', 0)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_failed_migration_rolls_back() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let broken = [Migration {
            version: latest_version() + 1,
            description: "Half applied",
            sql: "CREATE TABLE extra (id INTEGER); INSERT INTO missing VALUES (1);",
        }];
        assert!(migrate(&conn, &broken).is_err());
        assert_eq!(schema_version(&conn).unwrap(), latest_version());

        let extra: u32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'extra'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(extra, 0);
    }
}
