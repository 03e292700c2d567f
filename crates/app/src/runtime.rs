//! Frame loop
//!
//! Drives the session at a fixed frame rate and feeds it operator commands
//! read from stdin on a separate task.

use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use prizewheel_core::Result;

use crate::command::{self, ParseError};
use crate::console::{execute, render_frame, ConsoleObserver, Reply};
use crate::state::AppState;

/// Roughly 60 frames per second
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Forward stdin lines until EOF
async fn read_commands(tx: mpsc::Sender<String>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stdin");
                break;
            }
        }
    }
}

pub async fn run(mut app: AppState) -> Result<()> {
    let (cmd_tx, mut cmd_rx) = mpsc::channel(16);
    tokio::spawn(read_commands(cmd_tx));

    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_frame = Instant::now();
    let mut observer = ConsoleObserver::default();
    let mut input_open = true;

    println!("{}", crate::console::render_status(app.session()));
    println!("Type 'help' for commands.");

    loop {
        tokio::select! {
            now = frames.tick() => {
                let delta = now.saturating_duration_since(last_frame);
                last_frame = now;

                let update = app.session_mut().advance(delta, &mut observer);
                if let Some(line) = render_frame(app.session(), &update) {
                    if line.starts_with('\r') {
                        print!("{line}");
                        let _ = std::io::stdout().flush();
                    } else {
                        println!("\n{line}");
                    }
                }

                // Piped input has ended: stay alive until the wheel is at rest
                if !input_open && !app.session().is_spinning() {
                    break;
                }
            }
            line = cmd_rx.recv(), if input_open => {
                let Some(line) = line else {
                    input_open = false;
                    continue;
                };
                match command::parse(&line) {
                    Ok(cmd) => match execute(&mut app, cmd) {
                        Ok(Reply::Text(text)) => println!("{text}"),
                        Ok(Reply::Quit) => break,
                        Err(e) => println!("Error: {e}"),
                    },
                    Err(ParseError::Empty) => {}
                    Err(e) => println!("{e}"),
                }
            }
        }
    }

    app.persist()?;
    tracing::info!(data_dir = %app.data_dir().display(), "Event saved");
    Ok(())
}
