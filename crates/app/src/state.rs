//! Application state management

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use prizewheel_core::seed::demo_state;
use prizewheel_core::storage::DATABASE_FILE_NAME;
use prizewheel_core::{
    Database, DrawSession, Error, RandomSource, Result, SeededRandom, StateRepository, WheelConfig,
};

/// Main application state
pub struct AppState {
    db: Database,
    session: DrawSession,
    data_dir: PathBuf,
}

impl AppState {
    /// Open the event stored in the platform data directory
    pub fn new(config: &WheelConfig) -> Result<Self> {
        Self::open(config, Self::data_path()?, Box::new(SeededRandom::from_entropy()))
    }

    /// Open (or create) the event stored under `data_dir`.
    /// An empty database is seeded with the demo event when the config asks for it.
    pub fn open(config: &WheelConfig, data_dir: PathBuf, rng: Box<dyn RandomSource>) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)?;
        let db = Database::open(data_dir.join(DATABASE_FILE_NAME))?;

        if config.roster.seed_on_empty && db.is_empty()? {
            tracing::info!("Empty database, seeding demo event");
            db.save_state(&demo_state(&mut SeededRandom::from_entropy()))?;
        }

        let session = DrawSession::new(config, db.load_state()?, rng);
        Ok(Self {
            db,
            session,
            data_dir,
        })
    }

    fn data_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "onyx", "prizewheel").ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine data directory",
            ))
        })?;

        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn session(&self) -> &DrawSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut DrawSession {
        &mut self.session
    }

    /// Write the whole event to disk
    pub fn persist(&self) -> Result<()> {
        self.db.save_state(&self.session.export_state())
    }

    /// Replace the event with a fresh demo event and persist it
    pub fn factory_reset(&mut self) -> Result<()> {
        let state = demo_state(&mut SeededRandom::from_entropy());
        self.session.reset(state)?;
        self.persist()
    }
}
