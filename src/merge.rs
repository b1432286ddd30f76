use crate::cell::{Category, Cell, CellKind, Tier, are_similar, next_tier_kind};
use crate::coords::GridCoord;
use crate::grid::Grid;
use crate::sinks::{EffectsSink, PresentationSink};

/// Tier progression for colliding gems. `max_tier` is terminal: gems at that
/// rank stay put when pushed into an equal neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeEngine {
	max_tier: Tier,
}

impl Default for MergeEngine {
	fn default() -> Self {
		Self::new(Tier::DEFAULT_MAX)
	}
}

impl MergeEngine {
	pub fn new(max_tier: Tier) -> Self {
		Self { max_tier }
	}

	pub fn max_tier(&self) -> Tier {
		self.max_tier
	}

	pub fn next_tier_kind(&self, kind: CellKind) -> Option<CellKind> {
		next_tier_kind(kind, self.max_tier)
	}

	/// Markers are excluded by category, whatever their similarity.
	pub fn can_merge(&self, a: Cell, b: Cell) -> bool {
		match (a, b) {
			(Cell::Occupied(ka), Cell::Occupied(_)) => {
				ka.category == Category::Gem && are_similar(a, b) && self.next_tier_kind(ka).is_some()
			}
			_ => false,
		}
	}

	/// Folds the gem at `source` into `dest`. Returns the resulting kind, or
	/// `None` without touching anything when the pair cannot merge.
	pub fn merge<S: PresentationSink + EffectsSink + ?Sized>(
		&self,
		grid: &mut Grid,
		source: GridCoord,
		dest: GridCoord,
		sinks: &mut S,
	) -> Option<CellKind> {
		let (a, b) = (grid.cell_at(source), grid.cell_at(dest));
		if !self.can_merge(a, b) {
			return None;
		}
		let merged = a.kind().and_then(|k| self.next_tier_kind(k))?;
		grid.set(source, Cell::Empty);
		grid.set(dest, Cell::Occupied(merged));
		sinks.destroy(source);
		sinks.destroy(dest);
		sinks.spawn(dest, merged);
		sinks.play_merge(dest);
		Some(merged)
	}
}
