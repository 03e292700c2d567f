//! SQLite storage layer for the prize wheel

mod draw_state;
mod migrations;
mod parse;
mod participants;
mod prizes;
mod traits;

use rusqlite::Connection;
use std::path::Path;
use tracing::{info, instrument};

use crate::error::Result;
use crate::models::EventState;

pub use draw_state::DrawStateStore;
pub use participants::ParticipantStore;
pub use prizes::PrizeStore;
pub use traits::StateRepository;

/// Database file name inside the data directory
pub const DATABASE_FILE_NAME: &str = "prizewheel.db";

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    pub fn participants(&self) -> ParticipantStore<'_> {
        ParticipantStore::new(&self.conn)
    }

    pub fn prizes(&self) -> PrizeStore<'_> {
        PrizeStore::new(&self.conn)
    }

    /// Blacklist, won numbers and win history
    pub fn draw_state(&self) -> DrawStateStore<'_> {
        DrawStateStore::new(&self.conn)
    }
}

impl StateRepository for Database {
    #[instrument(skip(self))]
    fn load_state(&self) -> Result<EventState> {
        let draw = self.draw_state();
        let state = EventState {
            participants: self.participants().list()?,
            prizes: self.prizes().list()?,
            blacklist: draw.blacklist()?,
            won_numbers: draw.won_numbers()?,
            win_history: draw.win_history()?,
        };
        info!(
            participants = state.participants.len(),
            prizes = state.prizes.len(),
            wins = state.win_history.len(),
            "Loaded event state"
        );
        Ok(state)
    }

    #[instrument(skip(self, state))]
    fn save_state(&self, state: &EventState) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            ParticipantStore::new(&tx).replace_all(&state.participants)?;
            PrizeStore::new(&tx).replace_all(&state.prizes)?;
            let draw = DrawStateStore::new(&tx);
            draw.replace_blacklist(&state.blacklist)?;
            draw.replace_won_numbers(&state.won_numbers)?;
            draw.replace_win_history(&state.win_history)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn is_empty(&self) -> Result<bool> {
        let prizes: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM prizes", [], |row| row.get(0))?;
        Ok(self.participants().count()? == 0 && prizes == 0)
    }
}
