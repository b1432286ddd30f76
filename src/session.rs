use tracing::info;

use crate::command::CommandSource;
use crate::config::{ConfigError, GameConfig};
use crate::coords::{Direction, GridCoord};
use crate::grid::Grid;
use crate::layers::{Environment, LayerVisibility, LayerWindow};
use crate::merge::MergeEngine;
use crate::populator::WorldPopulator;
use crate::resolver::{MoveOutcome, MoveResolver};
use crate::sinks::Sinks;
use crate::stats::SessionStats;

/// One play session: the only writer of its grid.
#[derive(Debug, Clone)]
pub struct Session {
	grid: Grid,
	player: GridCoord,
	facing: Option<Direction>,
	layers: LayerVisibility,
	resolver: MoveResolver,
	pub stats: SessionStats,
}

impl Session {
	pub fn new(grid: Grid, cfg: &GameConfig) -> Result<Self, ConfigError> {
		cfg.validate()?;
		Ok(Self {
			grid,
			player: cfg.spawn,
			facing: None,
			layers: LayerVisibility::at_depth(cfg.spawn.y, cfg.lights()),
			resolver: MoveResolver::new(MergeEngine::new(cfg.max_tier()?)),
			stats: SessionStats::new(),
		})
	}

	/// Builds the world and hands the initial scene to the collaborators.
	pub fn start<P, S>(populator: &mut P, cfg: &GameConfig, sinks: &mut S) -> Result<Self, ConfigError>
	where
		P: WorldPopulator + ?Sized,
		S: Sinks + ?Sized,
	{
		let session = Self::new(populator.build(), cfg)?;
		session.publish_world(sinks);
		info!(spawn = %session.player, blocks = session.grid.occupied_count(), "session started");
		Ok(session)
	}

	pub fn publish_world<S: Sinks + ?Sized>(&self, sinks: &mut S) {
		for (c, kind) in self.grid.occupied_cells() {
			sinks.spawn(c, kind);
		}
		self.layers.publish_all(sinks);
	}

	pub fn step<S: Sinks + ?Sized>(&mut self, dir: Direction, sinks: &mut S) -> MoveOutcome {
		let r = self.resolver.resolve(&mut self.grid, &mut self.layers, self.player, dir, sinks);
		if !r.outcome.is_blocked() {
			self.facing = Some(dir);
		}
		self.player = r.player;
		self.stats.record(&r.outcome);
		r.outcome
	}

	/// Pulls one command and resolves it. `None` when the source is idle.
	pub fn tick<C, S>(&mut self, source: &mut C, sinks: &mut S) -> Option<MoveOutcome>
	where
		C: CommandSource + ?Sized,
		S: Sinks + ?Sized,
	{
		let dir = source.next_command()?;
		Some(self.step(dir, sinks))
	}

	/// Ticks until the source runs dry.
	pub fn run<C, S>(&mut self, source: &mut C, sinks: &mut S) -> Vec<MoveOutcome>
	where
		C: CommandSource + ?Sized,
		S: Sinks + ?Sized,
	{
		let mut outcomes = Vec::new();
		while let Some(o) = self.tick(source, sinks) {
			outcomes.push(o);
		}
		outcomes
	}

	pub fn grid(&self) -> &Grid {
		&self.grid
	}

	pub fn player(&self) -> GridCoord {
		self.player
	}

	pub fn facing(&self) -> Option<Direction> {
		self.facing
	}

	pub fn layer_window(&self) -> LayerWindow {
		self.layers.window()
	}

	pub fn environment(&self) -> Environment {
		self.layers.environment()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cell::Cell;
	use crate::command::ScriptedCommands;
	use crate::sinks::{NullSinks, RecordingSinks, SinkEvent};

	fn session_at(grid: Grid, spawn: GridCoord) -> Session {
		Session::new(grid, &GameConfig { spawn, ..GameConfig::default() }).unwrap()
	}

	#[test]
	fn step_updates_player_and_stats() {
		let mut s = session_at(Grid::new(), GridCoord::new(4, 3, 5));
		assert_eq!(s.step(Direction::East, &mut NullSinks), MoveOutcome::SteppedFree);
		assert_eq!(s.player(), GridCoord::new(5, 3, 5));
		assert_eq!(s.facing(), Some(Direction::East));
		assert_eq!(s.stats.moves, 1);
	}

	#[test]
	fn blocked_step_keeps_facing() {
		let mut s = session_at(Grid::new(), GridCoord::new(15, 3, 5));
		assert_eq!(s.step(Direction::East, &mut NullSinks), MoveOutcome::Blocked);
		assert_eq!(s.facing(), None);
		assert_eq!(s.stats.blocked, 1);
	}

	#[test]
	fn tick_consumes_one_command() {
		let mut s = session_at(Grid::new(), GridCoord::new(4, 3, 5));
		let mut src = ScriptedCommands::from_keys("nn").unwrap();
		assert!(s.tick(&mut src, &mut NullSinks).is_some());
		assert_eq!(src.remaining(), 1);
		assert_eq!(s.run(&mut src, &mut NullSinks).len(), 1);
		assert!(s.tick(&mut src, &mut NullSinks).is_none());
		assert_eq!(s.player(), GridCoord::new(4, 3, 7));
	}

	#[test]
	fn start_publishes_scene() {
		let mut populate = || {
			let mut g = Grid::new();
			g.set(GridCoord::new(3, 0, 3), Cell::terrain());
			g
		};
		let mut sinks = RecordingSinks::new();
		let s = Session::start(&mut populate, &GameConfig::default(), &mut sinks).unwrap();
		assert_eq!(s.layer_window(), LayerWindow { top: 0, bottom: 1 });
		assert_eq!(s.environment(), Environment::AboveGround);
		assert!(sinks.contains(&SinkEvent::Spawn(GridCoord::new(3, 0, 3), crate::cell::CellKind::terrain())));
		assert!(sinks.contains(&SinkEvent::Ambient(true)));
		assert_eq!(sinks.active_layers(), vec![0, 1]);
	}

	#[test]
	fn deep_spawn_starts_underground() {
		let cfg = GameConfig { spawn: GridCoord::new(5, 10, 5), ..GameConfig::default() };
		let mut sinks = RecordingSinks::new();
		let mut s = Session::start(&mut Grid::new, &cfg, &mut sinks).unwrap();
		assert_eq!(s.layer_window(), LayerWindow { top: 10, bottom: 11 });
		assert_eq!(s.environment(), Environment::Underground);
		assert_eq!(sinks.active_layers(), vec![10, 11]);
		assert!(sinks.contains(&SinkEvent::Underground(true)));
		assert!(sinks.contains(&SinkEvent::Ambient(false)));

		assert_eq!(s.step(Direction::East, &mut sinks), MoveOutcome::SteppedFree);
		assert_eq!(s.layer_window(), LayerWindow { top: 10, bottom: 11 });
		assert_eq!(s.step(Direction::Down, &mut sinks), MoveOutcome::SteppedFree);
		assert_eq!(sinks.active_layers(), vec![11, 12]);
		assert_eq!(s.environment(), Environment::Underground);
	}

	#[test]
	fn invalid_config_is_rejected() {
		let cfg = GameConfig { max_tier: 3, ..GameConfig::default() };
		assert!(Session::new(Grid::new(), &cfg).is_err());
	}
}
