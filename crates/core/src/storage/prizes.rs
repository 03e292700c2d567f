//! Prize storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;

use super::parse::OptionalExt;
use crate::error::Result;
use crate::models::Prize;

const COLUMNS: &str = "id, name, quantity, initial_quantity, info, color";

fn prize_from_row(row: &Row<'_>) -> rusqlite::Result<Prize> {
    Ok(Prize {
        id: row.get(0)?,
        name: row.get(1)?,
        quantity: row.get(2)?,
        initial_quantity: row.get(3)?,
        info: row.get(4)?,
        color: row.get(5)?,
    })
}

pub struct PrizeStore<'a> {
    conn: &'a Connection,
}

impl<'a> PrizeStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert or update one prize
    #[instrument(skip(self, prize), fields(prize_id = %prize.id, quantity = prize.quantity))]
    pub fn upsert(&self, prize: &Prize) -> Result<()> {
        self.conn.execute(
            "INSERT INTO prizes (id, name, quantity, initial_quantity, info, color, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, (SELECT COALESCE(MAX(position) + 1, 0) FROM prizes))
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                quantity = excluded.quantity,
                initial_quantity = excluded.initial_quantity,
                info = excluded.info,
                color = excluded.color",
            params![
                prize.id,
                prize.name,
                prize.quantity,
                prize.initial_quantity,
                prize.info,
                prize.color,
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: &str) -> Result<Option<Prize>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COLUMNS} FROM prizes WHERE id = ?1"))?;
        let prize = stmt.query_row(params![id], prize_from_row).optional()?;
        Ok(prize)
    }

    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Prize>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COLUMNS} FROM prizes ORDER BY position"))?;
        let prizes = stmt
            .query_map([], prize_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(prizes)
    }

    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> Result<bool> {
        let rows = self.conn.execute("DELETE FROM prizes WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    #[instrument(skip(self, prizes), fields(count = prizes.len()))]
    pub fn replace_all(&self, prizes: &[Prize]) -> Result<()> {
        self.conn.execute("DELETE FROM prizes", [])?;
        let mut stmt = self.conn.prepare(
            "INSERT INTO prizes (id, name, quantity, initial_quantity, info, color, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for (position, prize) in prizes.iter().enumerate() {
            stmt.execute(params![
                prize.id,
                prize.name,
                prize.quantity,
                prize.initial_quantity,
                prize.info,
                prize.color,
                position as i64,
            ])?;
        }
        Ok(())
    }
}
