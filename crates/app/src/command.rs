//! Operator console commands
//!
//! One command per line on stdin. Parsing is separate from execution so it
//! can be tested without a session.

use std::fmt;
use std::path::PathBuf;

use prizewheel_core::{Category, DrawNumber};

pub const HELP: &str = "\
commands:
  spin                          draw a winner for the selected prize
  close                         confirm the revealed winner
  select <prize-id>             choose the prize to draw for
  prizes | roster | history     list state
  status                        phase, pointer and undo/redo availability
  undo | redo                   rewind or replay a confirmed win
  blacklist                     show blacklisted numbers
  blacklist add|remove <n>      edit the blacklist
  add staff <n> <years> <name>  add a staff member
  add guest <n> <name>          add a guest
  edit <participant-id> staff <n> <years> <name>
  edit <participant-id> guest <n> <name>
                                change a participant who has not won yet
  remove <participant-id>       remove a participant
  add-prize <id> <qty> <color> <name>
                                add a prize, e.g. add-prize p6 2 #FFD700 Tablet
  rename-prize <prize-id> <name>
  restock <prize-id> <qty>      set a prize's remaining stock
  delete-prize <prize-id>       remove a prize
  export <path>                 write win history as JSON
  clear                         remove every participant and all wins
  reset                         factory reset to the demo event
  quit";

/// Roster fields typed by the operator for `add` and `edit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantFields {
    pub category: Category,
    pub number: DrawNumber,
    pub tenure_years: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Spin,
    Close,
    Select(String),
    Prizes,
    Roster,
    History,
    Status,
    Undo,
    Redo,
    ShowBlacklist,
    BlacklistAdd(DrawNumber),
    BlacklistRemove(DrawNumber),
    AddParticipant(ParticipantFields),
    EditParticipant { id: String, fields: ParticipantFields },
    RemoveParticipant(String),
    AddPrize {
        id: String,
        quantity: u32,
        color: String,
        name: String,
    },
    RenamePrize { prize_id: String, name: String },
    Restock { prize_id: String, quantity: u32 },
    DeletePrize(String),
    Export(PathBuf),
    Clear,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    Usage(&'static str),
    BadNumber(String),
    ZeroDrawNumber,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty command"),
            ParseError::Unknown(word) => write!(f, "unknown command '{word}', try 'help'"),
            ParseError::Usage(usage) => write!(f, "usage: {usage}"),
            ParseError::BadNumber(raw) => write!(f, "'{raw}' is not a number"),
            ParseError::ZeroDrawNumber => write!(f, "draw numbers start at 1"),
        }
    }
}

impl std::error::Error for ParseError {}

fn number<T: std::str::FromStr>(raw: Option<&str>, usage: &'static str) -> Result<T, ParseError> {
    let raw = raw.ok_or(ParseError::Usage(usage))?;
    raw.parse().map_err(|_| ParseError::BadNumber(raw.to_string()))
}

fn draw_number(raw: Option<&str>, usage: &'static str) -> Result<DrawNumber, ParseError> {
    let value: u32 = number(raw, usage)?;
    if value == 0 {
        return Err(ParseError::ZeroDrawNumber);
    }
    Ok(DrawNumber(value))
}

fn word(raw: Option<&str>, usage: &'static str) -> Result<String, ParseError> {
    raw.map(str::to_string).ok_or(ParseError::Usage(usage))
}

fn rest(words: &[&str], usage: &'static str) -> Result<String, ParseError> {
    if words.is_empty() {
        return Err(ParseError::Usage(usage));
    }
    Ok(words.join(" "))
}

/// `staff <n> <years> <name...>` or `guest <n> <name...>`
fn participant_fields(words: &[&str]) -> Result<ParticipantFields, ParseError> {
    match words.first().copied() {
        Some("staff") => {
            const USAGE: &str = "staff <n> <years> <name>";
            let drawn = draw_number(words.get(1).copied(), USAGE)?;
            let tenure_years = number(words.get(2).copied(), USAGE)?;
            Ok(ParticipantFields {
                category: Category::Staff,
                number: drawn,
                tenure_years,
                name: rest(words.get(3..).unwrap_or_default(), USAGE)?,
            })
        }
        Some("guest") => {
            const USAGE: &str = "guest <n> <name>";
            Ok(ParticipantFields {
                category: Category::Guest,
                number: draw_number(words.get(1).copied(), USAGE)?,
                tenure_years: 0,
                name: rest(words.get(2..).unwrap_or_default(), USAGE)?,
            })
        }
        _ => Err(ParseError::Usage("staff <n> <years> <name> | guest <n> <name>")),
    }
}

pub fn parse(line: &str) -> Result<Command, ParseError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Err(ParseError::Empty);
    };
    let mut it = args.iter().copied();

    let command = match head.to_ascii_lowercase().as_str() {
        "spin" | "s" => Command::Spin,
        "close" | "c" => Command::Close,
        "select" => Command::Select(word(it.next(), "select <prize-id>")?),
        "prizes" => Command::Prizes,
        "roster" => Command::Roster,
        "history" => Command::History,
        "status" => Command::Status,
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "blacklist" => match it.next() {
            None => Command::ShowBlacklist,
            Some("add") => Command::BlacklistAdd(draw_number(it.next(), "blacklist add <n>")?),
            Some("remove") => Command::BlacklistRemove(draw_number(it.next(), "blacklist remove <n>")?),
            Some(_) => return Err(ParseError::Usage("blacklist [add|remove <n>]")),
        },
        "add" => Command::AddParticipant(participant_fields(args)?),
        "edit" => Command::EditParticipant {
            id: word(it.next(), "edit <participant-id> staff|guest ...")?,
            fields: participant_fields(args.get(1..).unwrap_or_default())?,
        },
        "remove" => Command::RemoveParticipant(word(it.next(), "remove <participant-id>")?),
        "add-prize" => {
            const USAGE: &str = "add-prize <id> <qty> <color> <name>";
            Command::AddPrize {
                id: word(it.next(), USAGE)?,
                quantity: number(it.next(), USAGE)?,
                color: word(it.next(), USAGE)?,
                name: rest(args.get(3..).unwrap_or_default(), USAGE)?,
            }
        }
        "rename-prize" => {
            const USAGE: &str = "rename-prize <prize-id> <name>";
            Command::RenamePrize {
                prize_id: word(it.next(), USAGE)?,
                name: rest(args.get(1..).unwrap_or_default(), USAGE)?,
            }
        }
        "restock" => {
            const USAGE: &str = "restock <prize-id> <qty>";
            Command::Restock {
                prize_id: word(it.next(), USAGE)?,
                quantity: number(it.next(), USAGE)?,
            }
        }
        "delete-prize" => Command::DeletePrize(word(it.next(), "delete-prize <prize-id>")?),
        "export" => Command::Export(PathBuf::from(word(it.next(), "export <path>")?)),
        "clear" => Command::Clear,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("spin"), Ok(Command::Spin));
        assert_eq!(parse("  S  "), Ok(Command::Spin));
        assert_eq!(parse("close"), Ok(Command::Close));
        assert_eq!(parse("undo"), Ok(Command::Undo));
        assert_eq!(parse("quit"), Ok(Command::Quit));
        assert_eq!(parse("blacklist"), Ok(Command::ShowBlacklist));
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(parse("select p1"), Ok(Command::Select("p1".into())));
        assert_eq!(parse("blacklist add 13"), Ok(Command::BlacklistAdd(DrawNumber(13))));
        assert_eq!(parse("blacklist remove 7"), Ok(Command::BlacklistRemove(DrawNumber(7))));
        assert_eq!(
            parse("restock p3 4"),
            Ok(Command::Restock {
                prize_id: "p3".into(),
                quantity: 4
            })
        );
        assert_eq!(parse("export out/wins.json"), Ok(Command::Export("out/wins.json".into())));
    }

    #[test]
    fn test_add_participant_keeps_full_name() {
        assert_eq!(
            parse("add staff 81 5 Mai Anh Tran"),
            Ok(Command::AddParticipant(ParticipantFields {
                category: Category::Staff,
                number: DrawNumber(81),
                tenure_years: 5,
                name: "Mai Anh Tran".into(),
            }))
        );
        assert_eq!(
            parse("add guest 90 Visitor"),
            Ok(Command::AddParticipant(ParticipantFields {
                category: Category::Guest,
                number: DrawNumber(90),
                tenure_years: 0,
                name: "Visitor".into(),
            }))
        );
    }

    #[test]
    fn test_edit_and_prize_commands() {
        assert_eq!(
            parse("edit s-12 guest 44 Le Van"),
            Ok(Command::EditParticipant {
                id: "s-12".into(),
                fields: ParticipantFields {
                    category: Category::Guest,
                    number: DrawNumber(44),
                    tenure_years: 0,
                    name: "Le Van".into(),
                },
            })
        );
        assert_eq!(
            parse("add-prize p6 2 #FFD700 Smart Watch"),
            Ok(Command::AddPrize {
                id: "p6".into(),
                quantity: 2,
                color: "#FFD700".into(),
                name: "Smart Watch".into(),
            })
        );
        assert_eq!(
            parse("rename-prize p1 Grand Prize"),
            Ok(Command::RenamePrize {
                prize_id: "p1".into(),
                name: "Grand Prize".into(),
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("   "), Err(ParseError::Empty));
        assert_eq!(parse("dance"), Err(ParseError::Unknown("dance".into())));
        assert_eq!(parse("select"), Err(ParseError::Usage("select <prize-id>")));
        assert_eq!(parse("blacklist add x"), Err(ParseError::BadNumber("x".into())));
        assert_eq!(parse("add guest 5"), Err(ParseError::Usage("guest <n> <name>")));
        assert!(matches!(parse("add robot 1 Bob"), Err(ParseError::Usage(_))));
        assert!(matches!(parse("edit"), Err(ParseError::Usage(_))));
        assert!(matches!(parse("add-prize p6 2 #FFD700"), Err(ParseError::Usage(_))));
        assert!(matches!(parse("rename-prize p1"), Err(ParseError::Usage(_))));
    }

    #[test]
    fn test_zero_draw_number_rejected() {
        assert_eq!(parse("add guest 0 Nobody"), Err(ParseError::ZeroDrawNumber));
        assert_eq!(parse("add staff 0 4 Nobody"), Err(ParseError::ZeroDrawNumber));
        assert_eq!(parse("blacklist add 0"), Err(ParseError::ZeroDrawNumber));
        assert_eq!(parse("edit s-1 guest 0 Nobody"), Err(ParseError::ZeroDrawNumber));
    }
}
