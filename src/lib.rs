pub mod cell;
pub mod command;
pub mod config;
pub mod coords;
pub mod grid;
pub mod hud;
pub mod layers;
pub mod merge;
pub mod populator;
pub mod resolver;
pub mod session;
pub mod sinks;
pub mod stats;

// Re-exports for convenience in tests and integration users.
pub use cell::{Category, Cell, CellKind, InvalidTier, Tier};
pub use command::{CommandSource, Replay, ReplayError, ScriptedCommands};
pub use config::{ConfigError, GameConfig};
pub use coords::{Direction, GridBox, GridCoord};
pub use grid::{Grid, GridError};
pub use hud::{format_hud, format_move_log};
pub use layers::{Environment, LayerVisibility, LayerWindow, window_for};
pub use merge::MergeEngine;
pub use populator::{ClassicPopulator, WorldPopulator};
pub use resolver::{MoveOutcome, MoveResolver, Resolution};
pub use session::Session;
pub use sinks::{EffectsSink, EnvironmentSink, NullSinks, PresentationSink, RecordingSinks, SinkEvent, Sinks};
pub use stats::SessionStats;
