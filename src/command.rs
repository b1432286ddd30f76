use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::Direction;

/// Produces at most one direction per tick.
pub trait CommandSource {
	fn next_command(&mut self) -> Option<Direction>;
}

#[derive(Debug, Error)]
pub enum ReplayError {
	#[error("Unsupported replay version {0}")]
	UnsupportedVersion(u32),
	#[error("Unknown command key '{0}' at position {1}")]
	UnknownKey(char, usize),
	#[error("Schema error: {0}")]
	SchemaError(#[from] serde_json::Error),
}

/// A fixed list of commands, consumed front to back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedCommands {
	queue: VecDeque<Direction>,
}

impl ScriptedCommands {
	pub fn new(commands: impl IntoIterator<Item = Direction>) -> Self {
		Self { queue: commands.into_iter().collect() }
	}

	/// Compact notation: one key per move (`e w n s d u`), whitespace ignored.
	pub fn from_keys(keys: &str) -> Result<Self, ReplayError> {
		let mut queue = VecDeque::new();
		for (i, c) in keys.chars().enumerate() {
			if c.is_whitespace() {
				continue;
			}
			let dir = Direction::from_key(c).ok_or(ReplayError::UnknownKey(c, i))?;
			queue.push_back(dir);
		}
		Ok(Self { queue })
	}

	pub fn remaining(&self) -> usize {
		self.queue.len()
	}
}

impl CommandSource for ScriptedCommands {
	fn next_command(&mut self) -> Option<Direction> {
		self.queue.pop_front()
	}
}

pub const REPLAY_VERSION: u32 = 1;

/// Recorded session input. Replaying it against the same initial grid
/// reproduces every outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
	pub version: u32,
	#[serde(default)]
	pub seed: Option<u64>,
	pub commands: Vec<Direction>,
}

impl Replay {
	pub fn new(seed: Option<u64>, commands: Vec<Direction>) -> Self {
		Self { version: REPLAY_VERSION, seed, commands }
	}

	pub fn from_json(s: &str) -> Result<Self, ReplayError> {
		let replay: Replay = serde_json::from_str(s)?;
		replay.check_version()?;
		Ok(replay)
	}

	pub fn from_value(v: serde_json::Value) -> Result<Self, ReplayError> {
		let replay: Replay = serde_json::from_value(v)?;
		replay.check_version()?;
		Ok(replay)
	}

	pub fn to_json(&self) -> Result<String, ReplayError> {
		Ok(serde_json::to_string(self)?)
	}

	fn check_version(&self) -> Result<(), ReplayError> {
		if self.version != REPLAY_VERSION {
			return Err(ReplayError::UnsupportedVersion(self.version));
		}
		Ok(())
	}

	pub fn to_source(&self) -> ScriptedCommands {
		ScriptedCommands::new(self.commands.iter().copied())
	}
}
