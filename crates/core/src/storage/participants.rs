//! Roster storage operations

use rusqlite::{params, Connection, Row};
use tracing::instrument;

use super::parse::{parse_category, OptionalExt};
use crate::error::Result;
use crate::models::{DrawNumber, Participant};

const COLUMNS: &str = "id, name, category, tenure_years, number";

fn participant_from_row(row: &Row<'_>) -> rusqlite::Result<Participant> {
    Ok(Participant {
        id: row.get(0)?,
        name: row.get(1)?,
        category: parse_category(&row.get::<_, String>(2)?)?,
        tenure_years: row.get(3)?,
        number: DrawNumber(row.get(4)?),
    })
}

pub struct ParticipantStore<'a> {
    conn: &'a Connection,
}

impl<'a> ParticipantStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert or update one participant, appended at the end of the roster
    #[instrument(skip(self, participant), fields(number = %participant.number))]
    pub fn upsert(&self, participant: &Participant) -> Result<()> {
        self.conn.execute(
            "INSERT INTO participants (id, name, category, tenure_years, number, position)
             VALUES (?1, ?2, ?3, ?4, ?5, (SELECT COALESCE(MAX(position) + 1, 0) FROM participants))
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                tenure_years = excluded.tenure_years,
                number = excluded.number",
            params![
                participant.id,
                participant.name,
                participant.category.code(),
                participant.tenure_years,
                participant.number.get(),
            ],
        )?;
        Ok(())
    }

    /// Find a participant by draw number
    #[instrument(skip(self))]
    pub fn find_by_number(&self, number: DrawNumber) -> Result<Option<Participant>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COLUMNS} FROM participants WHERE number = ?1"))?;
        let participant = stmt
            .query_row(params![number.get()], participant_from_row)
            .optional()?;
        Ok(participant)
    }

    /// Whole roster in display order
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Participant>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COLUMNS} FROM participants ORDER BY position"))?;
        let participants = stmt
            .query_map([], participant_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(participants)
    }

    /// Delete a participant. Returns false if the id was unknown.
    #[instrument(skip(self))]
    pub fn delete(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM participants WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    /// Replace the roster, keeping the given order
    #[instrument(skip(self, participants), fields(count = participants.len()))]
    pub fn replace_all(&self, participants: &[Participant]) -> Result<()> {
        self.conn.execute("DELETE FROM participants", [])?;
        let mut stmt = self.conn.prepare(
            "INSERT INTO participants (id, name, category, tenure_years, number, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for (position, participant) in participants.iter().enumerate() {
            stmt.execute(params![
                participant.id,
                participant.name,
                participant.category.code(),
                participant.tenure_years,
                participant.number.get(),
                position as i64,
            ])?;
        }
        Ok(())
    }

    pub fn count(&self) -> Result<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM participants", [], |row| row.get(0))?;
        Ok(count)
    }
}
