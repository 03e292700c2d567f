//! Blacklist, won numbers and win history

use rusqlite::{params, Connection};
use tracing::instrument;

use super::parse::{parse_datetime, parse_uuid};
use crate::error::Result;
use crate::models::{Blacklist, DrawNumber, WinRecord, WonNumbers};

pub struct DrawStateStore<'a> {
    conn: &'a Connection,
}

impl<'a> DrawStateStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    #[instrument(skip(self))]
    pub fn blacklist(&self) -> Result<Blacklist> {
        let mut stmt = self.conn.prepare("SELECT number FROM blacklist ORDER BY number")?;
        let numbers = stmt
            .query_map([], |row| Ok(DrawNumber(row.get(0)?)))?
            .collect::<std::result::Result<Blacklist, _>>()?;
        Ok(numbers)
    }

    #[instrument(skip(self, blacklist), fields(count = blacklist.len()))]
    pub fn replace_blacklist(&self, blacklist: &Blacklist) -> Result<()> {
        self.conn.execute("DELETE FROM blacklist", [])?;
        let mut stmt = self.conn.prepare("INSERT INTO blacklist (number) VALUES (?1)")?;
        for number in blacklist.iter() {
            stmt.execute(params![number.get()])?;
        }
        Ok(())
    }

    /// Won numbers in the order they were won
    #[instrument(skip(self))]
    pub fn won_numbers(&self) -> Result<WonNumbers> {
        let mut stmt = self
            .conn
            .prepare("SELECT number FROM won_numbers ORDER BY position")?;
        let numbers = stmt
            .query_map([], |row| Ok(DrawNumber(row.get(0)?)))?
            .collect::<std::result::Result<WonNumbers, _>>()?;
        Ok(numbers)
    }

    #[instrument(skip(self, won), fields(count = won.len()))]
    pub fn replace_won_numbers(&self, won: &WonNumbers) -> Result<()> {
        self.conn.execute("DELETE FROM won_numbers", [])?;
        let mut stmt = self
            .conn
            .prepare("INSERT INTO won_numbers (position, number) VALUES (?1, ?2)")?;
        for (position, number) in won.iter().enumerate() {
            stmt.execute(params![position as i64, number.get()])?;
        }
        Ok(())
    }

    /// Win history, newest first
    #[instrument(skip(self))]
    pub fn win_history(&self) -> Result<Vec<WinRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, participant_name, participant_number, prize_name, prize_color, won_at
             FROM win_records ORDER BY position",
        )?;
        let records = stmt
            .query_map([], |row| {
                Ok(WinRecord {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    participant_name: row.get(1)?,
                    participant_number: DrawNumber(row.get(2)?),
                    prize_name: row.get(3)?,
                    prize_color: row.get(4)?,
                    timestamp: parse_datetime(&row.get::<_, String>(5)?)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    #[instrument(skip(self, history), fields(count = history.len()))]
    pub fn replace_win_history(&self, history: &[WinRecord]) -> Result<()> {
        self.conn.execute("DELETE FROM win_records", [])?;
        let mut stmt = self.conn.prepare(
            "INSERT INTO win_records
                (id, participant_name, participant_number, prize_name, prize_color, won_at, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for (position, record) in history.iter().enumerate() {
            stmt.execute(params![
                record.id.to_string(),
                record.participant_name,
                record.participant_number.get(),
                record.prize_name,
                record.prize_color,
                record.timestamp.to_rfc3339(),
                position as i64,
            ])?;
        }
        Ok(())
    }

    /// How many times a number appears in the history
    #[instrument(skip(self))]
    pub fn wins_for_number(&self, number: DrawNumber) -> Result<u64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM win_records WHERE participant_number = ?1",
            params![number.get()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Participant, Prize};
    use crate::storage::Database;

    use super::*;

    #[test]
    fn test_blacklist_roundtrip() {
        let db = Database::open_in_memory().unwrap();
        let store = db.draw_state();
        let blacklist = Blacklist::from([44, 7, 13]);
        store.replace_blacklist(&blacklist).unwrap();
        assert_eq!(store.blacklist().unwrap(), blacklist);

        store.replace_blacklist(&Blacklist::new()).unwrap();
        assert!(store.blacklist().unwrap().is_empty());
    }

    #[test]
    fn test_won_numbers_keep_win_order() {
        let db = Database::open_in_memory().unwrap();
        let store = db.draw_state();
        let won = WonNumbers::from([30, 2, 17]);
        store.replace_won_numbers(&won).unwrap();
        let loaded: Vec<u32> = store.won_numbers().unwrap().iter().map(DrawNumber::get).collect();
        assert_eq!(loaded, vec![30, 2, 17]);
    }

    #[test]
    fn test_win_history_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let store = db.draw_state();
        let prize = Prize::new("Mug", 5, "#00FF00");
        let winner = Participant::guest("g1", "Alex", 61);
        let history = vec![
            WinRecord::new(DrawNumber(61), Some(&winner), &prize),
            WinRecord::new(DrawNumber(99), None, &prize),
        ];
        store.replace_win_history(&history).unwrap();

        assert_eq!(store.win_history().unwrap(), history);
        assert_eq!(store.wins_for_number(DrawNumber(61)).unwrap(), 1);
        assert_eq!(store.wins_for_number(DrawNumber(5)).unwrap(), 0);
    }
}
