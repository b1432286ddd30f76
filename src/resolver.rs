use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cell::{Cell, Tier, are_similar};
use crate::coords::{Direction, GRID_X, GRID_Y, GRID_Z, GridCoord, SURFACE_DEPTH};
use crate::grid::Grid;
use crate::layers::LayerVisibility;
use crate::merge::MergeEngine;
use crate::sinks::Sinks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Blocked,
    SteppedFree,
    Mined { at: GridCoord },
    Pushed { from: GridCoord, to: GridCoord },
    Merged { at: GridCoord, tier: Tier },
}

impl MoveOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, MoveOutcome::Blocked)
    }

    pub fn describe(&self) -> String {
        match self {
            MoveOutcome::Blocked => "Blocked".to_string(),
            MoveOutcome::SteppedFree => "Stepped".to_string(),
            MoveOutcome::Mined { at } => format!("Mined {at}"),
            MoveOutcome::Pushed { from, to } => format!("Pushed {from} -> {to}"),
            MoveOutcome::Merged { at, tier } => format!("Merged into {} at {at}", tier.value()),
        }
    }
}

/// Result of one move: what happened and where the player now stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: MoveOutcome,
    pub player: GridCoord,
}

/// Player positions the bounds gate accepts. Depth may be the open air at -1.
pub fn within_move_bounds(c: GridCoord) -> bool {
    (0..GRID_X).contains(&c.x) && (SURFACE_DEPTH..GRID_Y).contains(&c.y) && (0..GRID_Z).contains(&c.z)
}

/// A pushed block may not enter the outer ring of its layer.
fn push_leaves_inner_area(target: GridCoord, dir: Direction) -> bool {
    let extent = match dir {
        Direction::East | Direction::West => GRID_X,
        _ => GRID_Z,
    };
    let coord = target.along(dir);
    (dir.sign() < 0 && coord <= 1) || (dir.sign() > 0 && coord >= extent - 2)
}

/// The move state machine. Holds no state between calls: every decision is a
/// function of the grid, the player position and the direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveResolver {
    merge: MergeEngine,
}

impl MoveResolver {
    pub fn new(merge: MergeEngine) -> Self {
        Self { merge }
    }

    pub fn resolve<S: Sinks + ?Sized>(
        &self,
        grid: &mut Grid,
        layers: &mut LayerVisibility,
        player: GridCoord,
        dir: Direction,
        sinks: &mut S,
    ) -> Resolution {
        let target = player.step(dir);
        if !within_move_bounds(target) {
            debug!(%player, ?dir, "blocked by world bounds");
            return Resolution { outcome: MoveOutcome::Blocked, player };
        }

        let cell = grid.cell_at(target);
        let resolution = match cell {
            Cell::Empty => {
                self.advance(layers, player, dir, sinks);
                Resolution { outcome: MoveOutcome::SteppedFree, player: target }
            }
            c if c.is_mineable() => {
                grid.set(target, Cell::Empty);
                sinks.destroy(target);
                sinks.play_mine(target);
                self.advance(layers, player, dir, sinks);
                Resolution { outcome: MoveOutcome::Mined { at: target }, player: target }
            }
            _ if dir.is_vertical() => Resolution { outcome: MoveOutcome::Blocked, player },
            c => Resolution { outcome: self.push(grid, c, target, dir, sinks), player },
        };
        debug!(%player, ?dir, outcome = ?resolution.outcome, "move resolved");
        resolution
    }

    fn push<S: Sinks + ?Sized>(
        &self,
        grid: &mut Grid,
        cell: Cell,
        target: GridCoord,
        dir: Direction,
        sinks: &mut S,
    ) -> MoveOutcome {
        if push_leaves_inner_area(target, dir) || cell.is_marker() {
            return MoveOutcome::Blocked;
        }
        let beyond = target.step(dir);
        let beyond_cell = grid.cell_at(beyond);
        if beyond_cell.is_occupied() {
            if !are_similar(cell, beyond_cell) {
                return MoveOutcome::Blocked;
            }
            return match self.merge.merge(grid, target, beyond, sinks) {
                Some(kind) => MoveOutcome::Merged { at: beyond, tier: kind.tier },
                None => MoveOutcome::Blocked,
            };
        }
        grid.set(beyond, cell);
        grid.set(target, Cell::Empty);
        sinks.move_cell(target, beyond);
        MoveOutcome::Pushed { from: target, to: beyond }
    }

    /// Side effects of the player entering the target cell.
    fn advance<S: Sinks + ?Sized>(
        &self,
        layers: &mut LayerVisibility,
        player: GridCoord,
        dir: Direction,
        sinks: &mut S,
    ) {
        layers.on_step(player.y, dir, sinks);
        let dy = dir.dy();
        let shadow_pinned = (dy == 1 && player.y < 0) || (dy == -1 && player.y == 0);
        if dy != 0 && !shadow_pinned {
            sinks.shift_shadow(-dy);
        }
    }
}
