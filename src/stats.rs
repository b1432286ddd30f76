use serde::{Deserialize, Serialize};

use crate::cell::Tier;
use crate::resolver::MoveOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub moves: u32,
    pub blocked: u32,
    pub mined: u32,
    pub pushed: u32,
    pub merged: u32,
    pub best_tier: Option<Tier>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &MoveOutcome) {
        self.moves = self.moves.saturating_add(1);
        match outcome {
            MoveOutcome::Blocked => self.blocked = self.blocked.saturating_add(1),
            MoveOutcome::SteppedFree => {}
            MoveOutcome::Mined { .. } => self.mined = self.mined.saturating_add(1),
            MoveOutcome::Pushed { .. } => self.pushed = self.pushed.saturating_add(1),
            MoveOutcome::Merged { tier, .. } => {
                self.merged = self.merged.saturating_add(1);
                self.best_tier = self.best_tier.max(Some(*tier));
            }
        }
    }
}
