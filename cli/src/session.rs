use minegrid_core::*;
use std::time::Duration;

use crate::command::{Command, HELP};

/// What the view has to show after a command.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Cells changed, the board and status need a redraw.
    Update(ChangeSet),
    /// A whole new board, e.g. after a restart or a new game.
    Redraw,
    /// Show the board with every mine visible, without ending the game.
    Peek,
    /// The game timer counted another interval.
    Tick(u32),
    Message(String),
    /// A question answered by a following `y` or `n`.
    Prompt(String),
    Quit,
}

#[derive(Clone, Debug, PartialEq)]
enum Pending {
    Restart,
    NewGame(Mode),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionOptions {
    pub seed: Option<u64>,
    pub tick_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            seed: None,
            tick_interval: Timer::DEFAULT_INTERVAL,
        }
    }
}

/// The view side of a game: owns the engine, turns commands into engine calls and asks
/// for confirmation before throwing away a game in progress.
#[derive(Debug)]
pub struct Session {
    engine: GameEngine,
    pending: Option<Pending>,
    options: SessionOptions,
    games_played: u64,
}

impl Session {
    pub fn new(mode: Mode, options: SessionOptions) -> Result<Self> {
        let engine = Self::build_engine(&options, 0, mode)?;
        Ok(Self {
            engine,
            pending: None,
            options,
            games_played: 1,
        })
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn tick_interval(&self) -> Duration {
        self.options.tick_interval
    }

    /// Forwards one elapsed interval, `None` while the timer is idle.
    pub fn tick(&mut self) -> Option<Event> {
        self.engine.tick().map(Event::Tick)
    }

    pub fn handle(&mut self, command: Command) -> Event {
        let pending = self.pending.take();

        match command {
            Command::Reveal(coords) => self.update(|engine| engine.reveal(coords)),
            Command::Flag(coords) => self.update(|engine| engine.flag(coords)),
            Command::GiveUp => Event::Update(self.engine.give_up()),
            Command::Restart => {
                if self.engine.needs_confirmation() {
                    self.pending = Some(Pending::Restart);
                    Event::Prompt(
                        "A game is in progress - are you sure you want to restart? [y/n]".into(),
                    )
                } else {
                    self.engine.restart();
                    Event::Redraw
                }
            }
            Command::NewGame(key) => {
                let mode = match key {
                    Some(key) => match Mode::from_key(&key) {
                        Ok(mode) => mode,
                        Err(err) => return Event::Message(err.to_string()),
                    },
                    None => self.engine.mode().clone(),
                };

                if self.engine.needs_confirmation() {
                    self.pending = Some(Pending::NewGame(mode));
                    Event::Prompt(
                        "A game is in progress - are you sure you want to start a new one? [y/n]"
                            .into(),
                    )
                } else {
                    self.new_game(mode)
                }
            }
            Command::Confirm(true) => match pending {
                Some(Pending::Restart) => {
                    self.engine.restart();
                    Event::Redraw
                }
                Some(Pending::NewGame(mode)) => self.new_game(mode),
                None => Event::Message("Nothing to confirm".into()),
            },
            Command::Confirm(false) => match pending {
                Some(_) => Event::Message("Cancelled".into()),
                None => Event::Message("Nothing to confirm".into()),
            },
            Command::Peek => Event::Peek,
            Command::Modes => Event::Message(mode_menu()),
            Command::Help => Event::Message(HELP.into()),
            Command::Quit => Event::Quit,
        }
    }

    fn update(&mut self, action: impl FnOnce(&mut GameEngine) -> Result<ChangeSet>) -> Event {
        match action(&mut self.engine) {
            Ok(changes) => Event::Update(changes),
            Err(err) => Event::Message(err.to_string()),
        }
    }

    fn new_game(&mut self, mode: Mode) -> Event {
        match Self::build_engine(&self.options, self.games_played, mode) {
            Ok(engine) => {
                self.engine = engine;
                self.games_played += 1;
                Event::Redraw
            }
            Err(err) => Event::Message(err.to_string()),
        }
    }

    /// Every game of a seeded session gets its own seed, so a replay deals the same boards.
    fn build_engine(options: &SessionOptions, games_played: u64, mode: Mode) -> Result<GameEngine> {
        let generator = match options.seed {
            Some(seed) => RandomMinefieldGenerator::new(seed.wrapping_add(games_played)),
            None => RandomMinefieldGenerator::from_entropy(),
        };
        log::info!("Starting {} (seed {})", mode, generator.seed());

        let timer = Timer::with_interval(options.tick_interval);
        Ok(GameEngine::with_generator(mode, generator)?.with_timer(timer))
    }
}

fn mode_menu() -> String {
    Mode::presets()
        .iter()
        .map(|(key, mode)| format!("{:<8}{}", key, mode))
        .collect::<Vec<_>>()
        .join("\n")
}
