use crate::coords::{Direction, GridCoord};
use crate::layers::Environment;
use crate::resolver::MoveOutcome;
use crate::stats::SessionStats;

pub fn format_hud(stats: &SessionStats, player: GridCoord, environment: Environment) -> String {
	let depth = if player.y < 0 { "Surface".to_string() } else { player.y.to_string() };
	let best = stats.best_tier.map(|t| t.value().to_string()).unwrap_or_else(|| "-".to_string());
	let env = match environment {
		Environment::AboveGround => "Above ground",
		Environment::Underground => "Underground",
	};
	format!(
		"Depth: {} | Mined: {} | Merged: {} | Best tier: {} | {}",
		depth, stats.mined, stats.merged, best, env
	)
}

pub fn direction_label(dir: Direction) -> &'static str {
	match dir {
		Direction::East => "East",
		Direction::West => "West",
		Direction::North => "North",
		Direction::South => "South",
		Direction::Down => "Dig down",
		Direction::Up => "Climb up",
	}
}

/// Most recent first, capped at `limit` entries.
pub fn format_move_log(log: &[(Direction, MoveOutcome)], limit: usize) -> Vec<String> {
	let mut out = Vec::new();
	out.push("[Moves]".to_string());
	for (dir, outcome) in log.iter().rev().take(limit) {
		out.push(format!("{} – {}", direction_label(*dir), outcome.describe()));
	}
	out
}
