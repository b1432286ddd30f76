//! Headless runner: `replay <replay.json> [config.json]`.
//!
//! Rebuilds the world from the replay's seed (or the config's), plays every
//! recorded command and prints one line per outcome followed by the HUD.

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;

use digmerge::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("digmerge=info")))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(replay_path) = args.next() else {
        bail!("usage: replay <replay.json> [config.json]");
    };
    let mut cfg = match args.next() {
        Some(path) => GameConfig::load(&path).with_context(|| format!("loading config {path}"))?,
        None => GameConfig::default(),
    };

    let text = std::fs::read_to_string(&replay_path).with_context(|| format!("reading {replay_path}"))?;
    let replay = Replay::from_json(&text).with_context(|| format!("parsing {replay_path}"))?;
    if let Some(seed) = replay.seed {
        cfg.seed = seed;
    }

    let mut session = Session::start(&mut ClassicPopulator::from_config(&cfg), &cfg, &mut NullSinks)?;
    let mut source = replay.to_source();
    info!(commands = source.remaining(), seed = cfg.seed, "replaying");

    while let Some(dir) = source.next_command() {
        let outcome = session.step(dir, &mut NullSinks);
        println!("{:<6} {:<12} {}", session.stats.moves, format!("{dir:?}"), outcome.describe());
    }
    println!("{}", format_hud(&session.stats, session.player(), session.environment()));
    Ok(())
}
