//! Command execution and text rendering

use std::fmt::Write as _;

use prizewheel_core::{
    DrawNumber, DrawSession, Error, FrameUpdate, GamePhase, Landing, LandingOutcome, Participant,
    Prize, Result, SpinObserver,
};

use crate::command::{Command, ParticipantFields, HELP};
use crate::state::AppState;

/// What the loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

fn text(s: impl Into<String>) -> Result<Reply> {
    Ok(Reply::Text(s.into()))
}

fn find_prize(session: &DrawSession, prize_id: &str) -> Result<Prize> {
    session
        .prizes()
        .iter()
        .find(|p| p.id == prize_id)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("prize {prize_id}")))
}

fn participant(id: String, fields: ParticipantFields) -> Participant {
    Participant::new(id, fields.name, fields.category, fields.tenure_years, fields.number)
}

pub fn execute(app: &mut AppState, command: Command) -> Result<Reply> {
    match command {
        Command::Spin => match app.session_mut().request_spin() {
            Ok(ticket) => text(format!(
                "Spinning for {:.1}s...",
                ticket.duration.as_secs_f64()
            )),
            Err(refusal) => text(format!("Cannot spin: {refusal}")),
        },
        Command::Close => match app.session_mut().close_reveal() {
            Some(record) => {
                app.persist()?;
                text(format!(
                    "Confirmed: #{} {} wins {}",
                    record.participant_number, record.participant_name, record.prize_name
                ))
            }
            None => text("No winner to confirm"),
        },
        Command::Select(prize_id) => {
            app.session_mut().select_prize(&prize_id)?;
            text(format!("Selected prize {prize_id}"))
        }
        Command::Prizes => text(render_prizes(app.session())),
        Command::Roster => text(render_roster(app.session())),
        Command::History => text(render_history(app.session())),
        Command::Status => text(render_status(app.session())),
        Command::Undo => {
            if app.session_mut().undo() {
                app.persist()?;
                text("Undone")
            } else {
                text("Nothing to undo")
            }
        }
        Command::Redo => {
            if app.session_mut().redo() {
                app.persist()?;
                text("Redone")
            } else {
                text("Nothing to redo")
            }
        }
        Command::ShowBlacklist => {
            let numbers: Vec<String> = app
                .session()
                .blacklist()
                .iter()
                .map(|n| n.to_string())
                .collect();
            text(format!("Blacklist: {}", numbers.join(", ")))
        }
        Command::BlacklistAdd(number) => {
            let changed = app.session_mut().blacklist_add(number);
            app.persist()?;
            text(if changed {
                format!("Blacklisted {number}")
            } else {
                format!("{number} was already blacklisted")
            })
        }
        Command::BlacklistRemove(number) => {
            let changed = app.session_mut().blacklist_remove(number);
            app.persist()?;
            text(if changed {
                format!("Removed {number} from the blacklist")
            } else {
                format!("{number} was not blacklisted")
            })
        }
        Command::AddParticipant(fields) => {
            let number = fields.number;
            let id = uuid::Uuid::new_v4().to_string();
            app.session_mut().add_participant(participant(id, fields))?;
            app.persist()?;
            text(format!("Added #{number}"))
        }
        Command::EditParticipant { id, fields } => {
            let edited = participant(id, fields);
            let line = format!("Updated #{} {}", edited.number, edited.name);
            app.session_mut().update_participant(edited)?;
            app.persist()?;
            text(line)
        }
        Command::RemoveParticipant(id) => {
            let removed = app.session_mut().remove_participant(&id)?;
            app.persist()?;
            text(format!("Removed #{} {}", removed.number, removed.name))
        }
        Command::AddPrize {
            id,
            quantity,
            color,
            name,
        } => {
            let prize = Prize::new(name, quantity, color).with_id(id);
            let line = format!("Added prize {} ({} in stock)", prize.name, prize.quantity);
            app.session_mut().add_prize(prize)?;
            app.persist()?;
            text(line)
        }
        Command::RenamePrize { prize_id, name } => {
            let mut prize = find_prize(app.session(), &prize_id)?;
            prize.name = name;
            let line = format!("{prize_id} is now {}", prize.name);
            app.session_mut().update_prize(prize)?;
            app.persist()?;
            text(line)
        }
        Command::Restock { prize_id, quantity } => {
            let mut prize = find_prize(app.session(), &prize_id)?;
            prize.quantity = quantity;
            app.session_mut().update_prize(prize)?;
            app.persist()?;
            text(format!("{prize_id} now has {quantity} left"))
        }
        Command::DeletePrize(prize_id) => {
            let removed = app.session_mut().remove_prize(&prize_id)?;
            app.persist()?;
            text(format!("Deleted prize {}", removed.name))
        }
        Command::Export(path) => {
            let json = app.session().win_history_json()?;
            std::fs::write(&path, json)?;
            text(format!("Wrote {}", path.display()))
        }
        Command::Clear => {
            app.session_mut().clear_participants()?;
            app.persist()?;
            text("Roster cleared")
        }
        Command::Reset => {
            app.factory_reset()?;
            text("Event reset to demo data")
        }
        Command::Help => text(HELP),
        Command::Quit => Ok(Reply::Quit),
    }
}

pub fn render_prizes(session: &DrawSession) -> String {
    let selected = session.selected_prize().map(|p| p.id.as_str());
    let mut out = String::new();
    for prize in session.prizes() {
        let marker = if Some(prize.id.as_str()) == selected { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "{marker} {:<8} {:<20} {:>3}/{:<3} {:>3.0}% given {}",
            prize.id,
            prize.name,
            prize.quantity,
            prize.initial_quantity,
            prize.progress() * 100.0,
            prize.info
        );
    }
    if out.is_empty() {
        out.push_str("No prizes");
    }
    out.trim_end().to_string()
}

pub fn render_roster(session: &DrawSession) -> String {
    let mut out = String::new();
    for p in session.participants() {
        let mut flags = Vec::new();
        if p.is_senior_staff() {
            flags.push("x2");
        }
        if session.blacklist().contains(p.number) {
            flags.push("blacklisted");
        }
        if session.won_numbers().contains(p.number) {
            flags.push("won");
        }
        let _ = writeln!(
            out,
            "#{:<4} {:<24} {:<6} {}",
            p.number,
            p.name,
            p.category.label(),
            flags.join(" ")
        );
    }
    let _ = write!(out, "{} participants, {} wedges", session.participants().len(), session.segments().len());
    out
}

pub fn render_history(session: &DrawSession) -> String {
    if session.win_history().is_empty() {
        return "No winners yet".to_string();
    }
    let mut out = String::new();
    for record in session.win_history() {
        let _ = writeln!(
            out,
            "{} #{:<4} {:<24} {}",
            record.timestamp.format("%H:%M:%S"),
            record.participant_number,
            record.participant_name,
            record.prize_name
        );
    }
    out.trim_end().to_string()
}

pub fn render_status(session: &DrawSession) -> String {
    let pointer = session
        .segment_at_pointer()
        .map(|s| s.value.to_string())
        .unwrap_or_else(|| "-".to_string());
    let prize = session
        .selected_prize()
        .map(|p| format!("{} ({} left)", p.name, p.quantity))
        .unwrap_or_else(|| "none".to_string());
    format!(
        "phase: {} | pointer: {} | prize: {} | undo: {} | redo: {}",
        session.phase().label(),
        pointer,
        prize,
        session.can_undo(),
        session.can_redo()
    )
}

/// Text shown when the winner popup opens
pub fn render_reveal(session: &DrawSession, winner: DrawNumber) -> String {
    let name = session
        .participant_by_number(winner)
        .map(|p| p.name.as_str())
        .unwrap_or(prizewheel_core::UNKNOWN_WINNER);
    let prize = session.selected_prize().map(|p| p.name.as_str()).unwrap_or("-");
    format!("*** #{winner} {name} wins {prize}! *** (type 'close' to confirm)")
}

/// Counts pointer ticks for the live readout
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    pub ticks: u64,
}

impl SpinObserver for ConsoleObserver {
    fn on_tick(&mut self) {
        self.ticks += 1;
        tracing::trace!(ticks = self.ticks, "Tick");
    }

    fn on_landed(&mut self, landing: &Landing) {
        tracing::debug!(value = %landing.value, ticks = self.ticks, "Pointer stopped");
        self.ticks = 0;
    }
}

/// Lines to print for one frame, if any
pub fn render_frame(session: &DrawSession, update: &FrameUpdate) -> Option<String> {
    if let Some(LandingOutcome::Voided(number)) = update.landing {
        return Some(format!("Spin voided: {number} is blacklisted. Spin again."));
    }
    if let Some(winner) = update.reveal {
        return Some(render_reveal(session, winner));
    }
    if matches!(session.phase(), GamePhase::Spinning { .. }) {
        let pointer = session.segment_at_pointer()?;
        return Some(format!("\r  {:>4} ", pointer.value));
    }
    None
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use prizewheel_core::{SeededRandom, WheelConfig};

    use super::*;
    use crate::command::parse;

    fn app(dir: &Path) -> AppState {
        AppState::open(&WheelConfig::default(), dir.to_path_buf(), Box::new(SeededRandom::seeded(5)))
            .unwrap()
    }

    fn run(app: &mut AppState, line: &str) -> String {
        match execute(app, parse(line).unwrap()).unwrap() {
            Reply::Text(text) => text,
            Reply::Quit => "quit".to_string(),
        }
    }

    fn settle(app: &mut AppState) -> Vec<String> {
        let mut observer = ConsoleObserver::default();
        let mut lines = Vec::new();
        for _ in 0..1000 {
            let update = app.session_mut().advance(Duration::from_millis(16), &mut observer);
            if let Some(line) = render_frame(app.session(), &update) {
                lines.push(line);
            }
            if update.reveal.is_some() || update.landing.is_some() {
                break;
            }
        }
        lines
    }

    #[test]
    fn test_spin_without_prize_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        assert_eq!(run(&mut app, "spin"), "Cannot spin: no prize selected");
    }

    #[test]
    fn test_draw_confirm_and_undo() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        run(&mut app, "select p5");
        assert!(run(&mut app, "spin").starts_with("Spinning"));
        let lines = settle(&mut app);
        assert!(lines.last().unwrap().contains("wins Consolation Prize"));

        assert!(run(&mut app, "close").starts_with("Confirmed"));
        assert_eq!(app.session().win_history().len(), 1);
        let prizes = run(&mut app, "prizes");
        assert!(prizes.contains("4/5"));
        assert!(prizes.contains(" 20% given"));

        assert_eq!(run(&mut app, "undo"), "Undone");
        assert_eq!(run(&mut app, "history"), "No winners yet");
        assert_eq!(run(&mut app, "redo"), "Redone");
        assert_eq!(run(&mut app, "close"), "No winner to confirm");
    }

    #[test]
    fn test_admin_commands() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        assert_eq!(run(&mut app, "add guest 81 New Guest"), "Added #81");
        assert!(run(&mut app, "roster").contains("New Guest"));
        assert_eq!(run(&mut app, "blacklist add 81"), "Blacklisted 81");
        assert!(run(&mut app, "blacklist").contains("81"));
        assert_eq!(run(&mut app, "restock p1 3"), "p1 now has 3 left");
        assert!(execute(&mut app, parse("add guest 81 Clash").unwrap()).is_err());
        assert!(execute(&mut app, parse("restock nope 1").unwrap()).is_err());

        assert_eq!(run(&mut app, "clear"), "Roster cleared");
        assert!(app.session().participants().is_empty());
        assert_eq!(run(&mut app, "reset"), "Event reset to demo data");
        assert_eq!(app.session().participants().len(), 80);
    }

    #[test]
    fn test_edit_participant() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        assert_eq!(run(&mut app, "edit guest-3 guest 99 Renamed Guest"), "Updated #99 Renamed Guest");
        let edited = app.session().participant_by_number(DrawNumber(99)).unwrap();
        assert_eq!(edited.id, "guest-3");
        assert!(app.session().participant_by_number(DrawNumber(63)).is_none());

        assert!(execute(&mut app, parse("edit guest-4 guest 99 Clash").unwrap()).is_err());
        assert!(execute(&mut app, parse("edit nobody guest 98 Ghost").unwrap()).is_err());

        let reopened = AppState::open(
            &WheelConfig::default(),
            dir.path().to_path_buf(),
            Box::new(SeededRandom::seeded(5)),
        )
        .unwrap();
        assert_eq!(
            reopened.session().participant_by_number(DrawNumber(99)).unwrap().name,
            "Renamed Guest"
        );
    }

    #[test]
    fn test_prize_commands() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        assert_eq!(
            run(&mut app, "add-prize p6 2 #00A651 Smart Watch"),
            "Added prize Smart Watch (2 in stock)"
        );
        let prizes = run(&mut app, "prizes");
        assert!(prizes.contains("Smart Watch"));
        assert!(prizes.contains("  0% given"));
        assert!(execute(&mut app, parse("add-prize p6 1 #FFFFFF Duplicate").unwrap()).is_err());

        assert_eq!(run(&mut app, "rename-prize p6 Fitness Band"), "p6 is now Fitness Band");
        let renamed = app.session().prizes().iter().find(|p| p.id == "p6").unwrap();
        assert_eq!(renamed.name, "Fitness Band");
        assert_eq!(renamed.quantity, 2);
        assert!(execute(&mut app, parse("rename-prize nope Anything").unwrap()).is_err());

        run(&mut app, "select p6");
        assert!(run(&mut app, "status").contains("Fitness Band (2 left)"));
    }

    #[test]
    fn test_export_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        run(&mut app, "select p3");
        run(&mut app, "spin");
        settle(&mut app);
        run(&mut app, "close");

        let path = dir.path().join("wins.json");
        run(&mut app, &format!("export {}", path.display()));
        let json = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["prize_name"], "Second Prize");
    }

    #[test]
    fn test_status_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        run(&mut app, "select p1");
        let status = run(&mut app, "status");
        assert!(status.starts_with("phase: Idle"));
        assert!(status.contains("Grand Prize (1 left)"));
    }
}
