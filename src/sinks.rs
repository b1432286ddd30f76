//! Outbound collaborators. The core calls these after each accepted move and
//! never reads anything back, so implementations must tolerate calls for
//! objects they no longer track.

use std::collections::BTreeMap;

use crate::cell::CellKind;
use crate::coords::GridCoord;

pub trait PresentationSink {
	fn spawn(&mut self, pos: GridCoord, kind: CellKind);
	fn destroy(&mut self, pos: GridCoord);
	fn move_cell(&mut self, from: GridCoord, to: GridCoord);
	fn set_layer_active(&mut self, y: i32, active: bool);
	/// World-space vertical shift of the player's shadow (+1 is up).
	fn shift_shadow(&mut self, world_dy: i32);
}

pub trait EffectsSink {
	fn play_mine(&mut self, pos: GridCoord);
	fn play_merge(&mut self, pos: GridCoord);
}

pub trait EnvironmentSink {
	fn set_underground(&mut self, underground: bool);
	/// Water and rain.
	fn set_ambient(&mut self, enabled: bool);
	fn set_light_intensity(&mut self, intensity: f32);
}

/// Everything a move may notify.
pub trait Sinks: PresentationSink + EffectsSink + EnvironmentSink {}

impl<T: PresentationSink + EffectsSink + EnvironmentSink + ?Sized> Sinks for T {}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSinks;

impl PresentationSink for NullSinks {
	fn spawn(&mut self, _pos: GridCoord, _kind: CellKind) {}
	fn destroy(&mut self, _pos: GridCoord) {}
	fn move_cell(&mut self, _from: GridCoord, _to: GridCoord) {}
	fn set_layer_active(&mut self, _y: i32, _active: bool) {}
	fn shift_shadow(&mut self, _world_dy: i32) {}
}

impl EffectsSink for NullSinks {
	fn play_mine(&mut self, _pos: GridCoord) {}
	fn play_merge(&mut self, _pos: GridCoord) {}
}

impl EnvironmentSink for NullSinks {
	fn set_underground(&mut self, _underground: bool) {}
	fn set_ambient(&mut self, _enabled: bool) {}
	fn set_light_intensity(&mut self, _intensity: f32) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
	Spawn(GridCoord, CellKind),
	Destroy(GridCoord),
	Move(GridCoord, GridCoord),
	LayerActive(i32, bool),
	ShiftShadow(i32),
	MineEffect(GridCoord),
	MergeEffect(GridCoord),
	Underground(bool),
	Ambient(bool),
	LightIntensity(f32),
}

/// Keeps every call in order. Used by tests and by front ends that apply
/// the calls once per frame.
#[derive(Debug, Clone, Default)]
pub struct RecordingSinks {
	events: Vec<SinkEvent>,
	layers: BTreeMap<i32, bool>,
}

impl RecordingSinks {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn events(&self) -> &[SinkEvent] {
		&self.events
	}

	pub fn drain(&mut self) -> Vec<SinkEvent> {
		std::mem::take(&mut self.events)
	}

	/// Layers whose last published state is active, ascending.
	pub fn active_layers(&self) -> Vec<i32> {
		self.layers.iter().filter(|&(_, on)| *on).map(|(y, _)| *y).collect()
	}

	pub fn contains(&self, event: &SinkEvent) -> bool {
		self.events.contains(event)
	}
}

impl PresentationSink for RecordingSinks {
	fn spawn(&mut self, pos: GridCoord, kind: CellKind) {
		self.events.push(SinkEvent::Spawn(pos, kind));
	}

	fn destroy(&mut self, pos: GridCoord) {
		self.events.push(SinkEvent::Destroy(pos));
	}

	fn move_cell(&mut self, from: GridCoord, to: GridCoord) {
		self.events.push(SinkEvent::Move(from, to));
	}

	fn set_layer_active(&mut self, y: i32, active: bool) {
		self.layers.insert(y, active);
		self.events.push(SinkEvent::LayerActive(y, active));
	}

	fn shift_shadow(&mut self, world_dy: i32) {
		self.events.push(SinkEvent::ShiftShadow(world_dy));
	}
}

impl EffectsSink for RecordingSinks {
	fn play_mine(&mut self, pos: GridCoord) {
		self.events.push(SinkEvent::MineEffect(pos));
	}

	fn play_merge(&mut self, pos: GridCoord) {
		self.events.push(SinkEvent::MergeEffect(pos));
	}
}

impl EnvironmentSink for RecordingSinks {
	fn set_underground(&mut self, underground: bool) {
		self.events.push(SinkEvent::Underground(underground));
	}

	fn set_ambient(&mut self, enabled: bool) {
		self.events.push(SinkEvent::Ambient(enabled));
	}

	fn set_light_intensity(&mut self, intensity: f32) {
		self.events.push(SinkEvent::LightIntensity(intensity));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn recording_keeps_order_and_layer_state() {
		let mut s = RecordingSinks::new();
		s.set_layer_active(0, true);
		s.set_layer_active(1, true);
		s.set_layer_active(0, false);
		s.play_mine(GridCoord::new(1, 2, 3));
		assert_eq!(s.active_layers(), vec![1]);
		assert_eq!(s.events().len(), 4);
		assert_eq!(s.events()[3], SinkEvent::MineEffect(GridCoord::new(1, 2, 3)));
		let drained = s.drain();
		assert_eq!(drained.len(), 4);
		assert!(s.events().is_empty());
		assert_eq!(s.active_layers(), vec![1]);
	}

	#[test]
	fn null_sinks_accept_everything() {
		fn notify<S: Sinks + ?Sized>(s: &mut S) {
			s.destroy(GridCoord::new(0, 0, 0));
			s.set_ambient(false);
			s.play_merge(GridCoord::new(0, 0, 0));
		}
		notify(&mut NullSinks);
		let dynamic: &mut dyn Sinks = &mut NullSinks;
		notify(dynamic);
	}
}
