use std::path::PathBuf;
use std::process::ExitCode;

use chase_tag::sim::presenter::LogPresenter;
use chase_tag::sim::Game;
use chase_tag::{Config, TagResult};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "chase-tag", about = "Headless tag rounds against the chaser NPC")]
struct Args {
    /// TOML config file. Defaults apply to anything it leaves out.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Round length in seconds
    #[arg(long)]
    game_time: Option<f32>,
    /// How far the NPC can see ahead
    #[arg(long)]
    escape_distance: Option<f32>,
    /// Rounds to play before quitting
    #[arg(long)]
    rounds: Option<u32>,
    #[arg(long)]
    seed: Option<u64>,
    /// Fixed step in seconds
    #[arg(long)]
    dt: Option<f32>,
    #[arg(long)]
    max_ticks: Option<u64>,
}

impl Args {
    fn into_config(self) -> TagResult<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(v) = self.game_time {
            config.session.game_time = v;
        }
        if let Some(v) = self.escape_distance {
            config.npc.escape_distance = v;
        }
        if let Some(v) = self.rounds {
            config.sim.rounds = v;
        }
        if let Some(v) = self.seed {
            config.sim.seed = v;
        }
        if let Some(v) = self.dt {
            config.sim.dt = v;
        }
        if let Some(v) = self.max_ticks {
            config.sim.max_ticks = v;
        }
        config.validate()?;
        Ok(config)
    }
}

fn run(args: Args) -> TagResult<()> {
    let config = args.into_config()?;
    let mut game = Game::new(&config, LogPresenter::default())?;
    let outcome = game.run();
    info!(
        player = outcome.score.player,
        npc = outcome.score.npc,
        ticks = outcome.ticks,
        finished = outcome.finished,
        "final score"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "chase-tag failed");
            ExitCode::FAILURE
        }
    }
}
