use minegrid_core::{Coord, Coord2};
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  r X Y       reveal the cell at column X, row Y
  f X Y       flag the cell at column X, row Y
  restart     play the same board again
  giveup      end the game and show the mines
  new [MODE]  start a new game (default: current mode)
  peek        show the mines without ending the game
  modes       list the available modes
  help        show this message
  quit        leave";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Restart,
    GiveUp,
    NewGame(Option<String>),
    Peek,
    Modes,
    Help,
    Quit,
    Confirm(bool),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command, type `help` for a list")]
    Empty,
    #[error("Unknown command \"{0}\", type `help` for a list")]
    Unknown(String),
    #[error("Expected two coordinates: {0} X Y")]
    MissingCoords(String),
    #[error("Invalid coordinate \"{0}\"")]
    InvalidCoord(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Empty);
        };
        let name = name.to_ascii_lowercase();

        let command = match name.as_str() {
            "r" | "reveal" => Command::Reveal(parse_coords(&name, &mut words)?),
            "f" | "flag" => Command::Flag(parse_coords(&name, &mut words)?),
            "restart" => Command::Restart,
            "giveup" | "give-up" => Command::GiveUp,
            "new" => Command::NewGame(words.next().map(str::to_ascii_lowercase)),
            "peek" => Command::Peek,
            "modes" => Command::Modes,
            "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            "y" | "yes" => Command::Confirm(true),
            "n" | "no" => Command::Confirm(false),
            _ => return Err(CommandError::Unknown(name)),
        };
        Ok(command)
    }
}

fn parse_coords<'a>(
    name: &str,
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<Coord2, CommandError> {
    let (Some(x), Some(y)) = (words.next(), words.next()) else {
        return Err(CommandError::MissingCoords(name.into()));
    };
    Ok((parse_coord(x)?, parse_coord(y)?))
}

fn parse_coord(word: &str) -> Result<Coord, CommandError> {
    word.parse()
        .map_err(|_| CommandError::InvalidCoord(word.into()))
}
