use anyhow::{Context, Result};
use clap::Parser;
use minegrid_core::{CellCount, Coord, Mode};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use command::Command;
use session::{Event, Session, SessionOptions};
use view::{OutputFormat, View};

mod command;
mod session;
mod view;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Preset to start with, see `modes` in game
    #[arg(short, long, default_value = Mode::DEFAULT_KEY)]
    mode: String,

    /// Width of a custom board
    #[arg(long, requires_all = ["height", "mines"], conflicts_with = "mode")]
    width: Option<Coord>,

    /// Height of a custom board
    #[arg(long, requires_all = ["width", "mines"])]
    height: Option<Coord>,

    /// Mine count of a custom board
    #[arg(long, requires_all = ["width", "height"])]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Milliseconds per timer tick
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Print events as JSON lines instead of drawing the board
    #[arg(long)]
    json: bool,
}

impl Args {
    fn game_mode(&self) -> Result<Mode> {
        let mode = match (self.width, self.height, self.mines) {
            (Some(width), Some(height), Some(mines)) => Mode::custom("Custom", width, height, mines),
            _ => Mode::from_key(&self.mode.to_ascii_lowercase()),
        };
        mode.context("Could not set up the game mode")
    }

    fn session_options(&self) -> SessionOptions {
        SessionOptions {
            seed: self.seed,
            tick_interval: Duration::from_millis(self.tick_ms.max(1)),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(std::io::stderr)
        .init();
    log::debug!("args: {:?}", args);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Could not start the event loop")?;
    runtime.block_on(run(args))
}

/// Interval whose first tick fires one `period` from now.
fn ticker(period: Duration) -> Interval {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Serves input and timer ticks from one loop, so the game never sees two at once.
async fn run(args: Args) -> Result<()> {
    let mode = args.game_mode()?;
    let mut session = Session::new(mode, args.session_options())?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut view = View::new(std::io::stdout(), format);
    view.show(&session, &Event::Redraw)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticks = ticker(session.tick_interval());

    loop {
        tokio::select! {
            _ = ticks.tick() => {
                if let Some(event) = session.tick() {
                    view.show(&session, &event)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Could not read input")? else {
                    log::debug!("input closed");
                    break;
                };

                let event = match line.parse::<Command>() {
                    Ok(command) => session.handle(command),
                    Err(err) => Event::Message(err.to_string()),
                };
                view.show(&session, &event)?;

                if event == Event::Quit {
                    break;
                }
            }
        }
    }

    log::info!("Session finished");
    Ok(())
}
