use minegrid_core::*;
use serde_json::json;
use std::fmt::Write as _;
use std::io::{self, Write};

use crate::session::{Event, Session};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    /// One JSON object per line, for another program acting as the view.
    Json,
}

/// Writes session events for the player.
pub struct View<W> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> View<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn show(&mut self, session: &Session, event: &Event) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => self.show_text(session.engine(), event),
            OutputFormat::Json => self.show_json(session.engine(), event),
        }?;
        self.out.flush()
    }

    fn show_text(&mut self, engine: &GameEngine, event: &Event) -> io::Result<()> {
        match event {
            Event::Update(changes) if !changes.has_update() => Ok(()),
            Event::Update(_) | Event::Redraw => {
                write!(self.out, "{}", render_board(engine, engine.mines_exposed()))
            }
            Event::Peek => write!(self.out, "{}", render_board(engine, true)),
            Event::Tick(_) => writeln!(self.out, "{}", status_line(engine)),
            Event::Message(message) | Event::Prompt(message) => writeln!(self.out, "{}", message),
            Event::Quit => writeln!(self.out, "bye"),
        }
    }

    fn show_json(&mut self, engine: &GameEngine, event: &Event) -> io::Result<()> {
        let value = match event {
            Event::Update(changes) => json!({ "update": changes }),
            Event::Redraw => json!({
                "board": board_rows(engine, engine.mines_exposed()),
                "mode": engine.mode(),
            }),
            Event::Peek => json!({ "mines": engine.mine_coords().collect::<Vec<_>>() }),
            Event::Tick(duration) => json!({ "tick": duration }),
            Event::Message(message) => json!({ "message": message }),
            Event::Prompt(message) => json!({ "prompt": message }),
            Event::Quit => json!({ "quit": true }),
        };
        writeln!(self.out, "{}", value)
    }
}

pub fn glyph(engine: &GameEngine, coords: Coord2, show_mines: bool) -> char {
    let Ok(cell) = engine.cell(coords) else {
        return ' ';
    };

    match cell.state {
        CellState::Revealed if cell.has_mine => 'x',
        _ if cell.has_mine && show_mines => 'x',
        CellState::Hidden => '#',
        CellState::Flagged => '?',
        CellState::Revealed => match engine.adjacent_mine_count(coords) {
            Ok(0) | Err(_) => '.',
            Ok(count) => char::from(b'0' + count),
        },
    }
}

fn board_rows(engine: &GameEngine, show_mines: bool) -> Vec<String> {
    let (size_x, size_y) = engine.size();
    (0..size_y)
        .map(|y| (0..size_x).map(|x| glyph(engine, (x, y), show_mines)).collect())
        .collect()
}

pub fn status_line(engine: &GameEngine) -> String {
    let status = match engine.outcome() {
        Outcome::Won => "Game over - you won!".to_string(),
        Outcome::Lost => "Game over - you lost.".to_string(),
        Outcome::Ongoing => engine.mode().to_string(),
    };
    format!(
        "{}  mines: {:03}  time: {:03}",
        status,
        engine.mines_display(),
        engine.timer().duration()
    )
}

pub fn render_board(engine: &GameEngine, show_mines: bool) -> String {
    let (size_x, _) = engine.size();
    let mut out = String::new();

    let _ = writeln!(out, "{}", status_line(engine));
    out.push_str("    ");
    for x in 0..size_x {
        let _ = write!(out, "{:>3}", x);
    }
    out.push('\n');

    for (y, row) in board_rows(engine, show_mines).iter().enumerate() {
        let _ = write!(out, "{:>3} ", y);
        for glyph in row.chars() {
            let _ = write!(out, "{:>3}", glyph);
        }
        out.push('\n');
    }
    out
}
