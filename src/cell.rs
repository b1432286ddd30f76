use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
	/// Grass and dirt. Mined on contact.
	Terrain,
	/// Tiered block that can be pushed and merged.
	Gem,
	/// Containment wall. Never mined, pushed or merged.
	Marker,
}

/// Rank in the doubling sequence 1, 2, 4, ... Non-gems carry `Tier::UNRANKED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Tier(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tier {0} is neither 0 nor a power of two")]
pub struct InvalidTier(pub u32);

impl Tier {
	pub const UNRANKED: Tier = Tier(0);
	pub const LOWEST: Tier = Tier(1);
	pub const DEFAULT_MAX: Tier = Tier(2048);

	/// Only powers of two are valid tiers.
	pub fn new(value: u32) -> Option<Self> {
		value.is_power_of_two().then_some(Tier(value))
	}

	pub fn value(self) -> u32 {
		self.0
	}

	/// The next rank, or `None` once `max` is reached.
	pub fn next(self, max: Tier) -> Option<Tier> {
		if self == Tier::UNRANKED || self >= max {
			return None;
		}
		self.0.checked_mul(2).map(Tier)
	}
}

impl TryFrom<u32> for Tier {
	type Error = InvalidTier;

	fn try_from(value: u32) -> Result<Self, Self::Error> {
		if value == 0 {
			return Ok(Tier::UNRANKED);
		}
		Tier::new(value).ok_or(InvalidTier(value))
	}
}

impl From<Tier> for u32 {
	fn from(t: Tier) -> u32 {
		t.0
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellKind {
	pub category: Category,
	pub tier: Tier,
}

impl CellKind {
	pub fn terrain() -> Self {
		Self { category: Category::Terrain, tier: Tier::UNRANKED }
	}

	pub fn marker() -> Self {
		Self { category: Category::Marker, tier: Tier::UNRANKED }
	}

	pub fn gem(tier: Tier) -> Self {
		Self { category: Category::Gem, tier }
	}

	pub fn label(&self) -> String {
		match self.category {
			Category::Terrain => "terrain".to_string(),
			Category::Marker => "marker".to_string(),
			Category::Gem => format!("gem {}", self.tier.value()),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
	#[default]
	Empty,
	Occupied(CellKind),
}

impl Cell {
	pub fn terrain() -> Self {
		Cell::Occupied(CellKind::terrain())
	}

	pub fn marker() -> Self {
		Cell::Occupied(CellKind::marker())
	}

	pub fn gem(tier: Tier) -> Self {
		Cell::Occupied(CellKind::gem(tier))
	}

	pub fn kind(self) -> Option<CellKind> {
		match self {
			Cell::Empty => None,
			Cell::Occupied(k) => Some(k),
		}
	}

	pub fn is_occupied(self) -> bool {
		matches!(self, Cell::Occupied(_))
	}

	pub fn is_mineable(self) -> bool {
		matches!(self, Cell::Occupied(k) if k.category == Category::Terrain)
	}

	pub fn is_marker(self) -> bool {
		matches!(self, Cell::Occupied(k) if k.category == Category::Marker)
	}
}

/// Same rendered identity: both occupied, same category and tier.
pub fn are_similar(a: Cell, b: Cell) -> bool {
	match (a, b) {
		(Cell::Occupied(a), Cell::Occupied(b)) => a == b,
		_ => false,
	}
}

/// The kind a gem becomes after merging. Terminal tiers and non-gems yield `None`.
pub fn next_tier_kind(kind: CellKind, max: Tier) -> Option<CellKind> {
	if kind.category != Category::Gem {
		return None;
	}
	kind.tier.next(max).map(CellKind::gem)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tier(v: u32) -> Tier {
		Tier::new(v).unwrap()
	}

	#[test]
	fn mineable_flags() {
		assert!(Cell::terrain().is_mineable());
		assert!(!Cell::gem(tier(2)).is_mineable());
		assert!(!Cell::marker().is_mineable());
		assert!(!Cell::Empty.is_mineable());
	}

	#[test]
	fn tiers_are_powers_of_two() {
		assert!(Tier::new(0).is_none());
		assert!(Tier::new(3).is_none());
		assert_eq!(Tier::new(64).map(Tier::value), Some(64));
	}

	#[test]
	fn deserialized_tiers_are_checked() {
		assert_eq!(serde_json::from_str::<Tier>("16").unwrap(), tier(16));
		assert_eq!(serde_json::from_str::<Tier>("0").unwrap(), Tier::UNRANKED);
		assert!(serde_json::from_str::<Tier>("3").is_err());
		assert_eq!(serde_json::to_string(&tier(8)).unwrap(), "8");

		let kind: CellKind = serde_json::from_str(r#"{ "category": "Gem", "tier": 4 }"#).unwrap();
		assert_eq!(kind, CellKind::gem(tier(4)));
		assert!(serde_json::from_str::<CellKind>(r#"{ "category": "Gem", "tier": 6 }"#).is_err());
	}

	#[test]
	fn similarity_needs_same_category_and_tier() {
		assert!(are_similar(Cell::gem(tier(2)), Cell::gem(tier(2))));
		assert!(!are_similar(Cell::gem(tier(2)), Cell::gem(tier(4))));
		assert!(!are_similar(Cell::gem(tier(2)), Cell::terrain()));
		assert!(!are_similar(Cell::Empty, Cell::Empty));
		assert!(are_similar(Cell::marker(), Cell::marker()));
	}

	#[test]
	fn next_tier_doubles_until_max() {
		let max = Tier::DEFAULT_MAX;
		assert_eq!(next_tier_kind(CellKind::gem(tier(1)), max), Some(CellKind::gem(tier(2))));
		assert_eq!(next_tier_kind(CellKind::gem(tier(1024)), max), Some(CellKind::gem(tier(2048))));
		assert_eq!(next_tier_kind(CellKind::gem(tier(2048)), max), None);
		assert_eq!(next_tier_kind(CellKind::gem(tier(8)), tier(8)), None);
	}

	#[test]
	fn non_gems_never_progress() {
		assert_eq!(next_tier_kind(CellKind::marker(), Tier::DEFAULT_MAX), None);
		assert_eq!(next_tier_kind(CellKind::terrain(), Tier::DEFAULT_MAX), None);
	}
}
