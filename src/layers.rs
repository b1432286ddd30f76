use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::coords::{Direction, GRID_Y};
use crate::sinks::{EnvironmentSink, PresentationSink};

/// The depth slices currently shown. `bottom` equals `top` only at the last layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerWindow {
    pub top: i32,
    pub bottom: i32,
}

impl LayerWindow {
    pub fn contains(&self, y: i32) -> bool {
        y >= self.top && y <= self.bottom
    }

    pub fn layers(self) -> impl Iterator<Item = i32> {
        self.top..=self.bottom
    }
}

/// `{y, y+1}`, never above layer 0 and never past the last layer.
pub fn window_for(y: i32) -> LayerWindow {
    let top = y.clamp(0, GRID_Y - 1);
    LayerWindow {
        top,
        bottom: (top + 1).min(GRID_Y - 1),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    AboveGround,
    Underground,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightLevels {
    pub surface: f32,
    pub underground: f32,
}

impl Default for LightLevels {
    fn default() -> Self {
        Self {
            surface: 1.4,
            underground: 0.75,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerVisibility {
    window: LayerWindow,
    environment: Environment,
    lights: LightLevels,
}

impl LayerVisibility {
    pub fn new(lights: LightLevels) -> Self {
        Self::at_depth(0, lights)
    }

    /// State for a player standing at depth `y`: anything below layer 0 is underground.
    pub fn at_depth(y: i32, lights: LightLevels) -> Self {
        Self {
            window: window_for(y),
            environment: if y >= 1 {
                Environment::Underground
            } else {
                Environment::AboveGround
            },
            lights,
        }
    }

    pub fn window(&self) -> LayerWindow {
        self.window
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Pushes the full current state: every layer's activity plus the environment.
    pub fn publish_all<S: PresentationSink + EnvironmentSink + ?Sized>(&self, sinks: &mut S) {
        self.publish_window(sinks);
        let underground = self.environment == Environment::Underground;
        sinks.set_underground(underground);
        sinks.set_ambient(!underground);
        sinks.set_light_intensity(if underground {
            self.lights.underground
        } else {
            self.lights.surface
        });
    }

    fn publish_window<S: PresentationSink + ?Sized>(&self, sinks: &mut S) {
        trace!(top = self.window.top, bottom = self.window.bottom, "publishing layer window");
        for y in 0..GRID_Y {
            sinks.set_layer_active(y, self.window.contains(y));
        }
    }

    /// Called after an accepted move from depth `from_y`. Horizontal moves are ignored.
    pub fn on_step<S: PresentationSink + EnvironmentSink + ?Sized>(
        &mut self,
        from_y: i32,
        dir: Direction,
        sinks: &mut S,
    ) {
        let dy = dir.dy();
        if dy == 0 {
            return;
        }
        self.window = window_for(from_y + dy);
        self.publish_window(sinks);

        if from_y == 0 && dy == 1 {
            self.environment = Environment::Underground;
            info!("entered underground");
            sinks.set_underground(true);
            sinks.set_ambient(false);
            sinks.set_light_intensity(self.lights.underground);
        } else if from_y == 1 && dy == -1 {
            self.environment = Environment::AboveGround;
            info!("returned to the surface");
            sinks.set_underground(false);
            sinks.set_ambient(true);
            sinks.set_light_intensity(self.lights.surface);
        }
    }
}
