use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::cell::{Cell, Tier};
use crate::config::GameConfig;
use crate::coords::{GRID_Y, GridBox, GridCoord};
use crate::grid::Grid;

/// Builds the initial world once per session.
pub trait WorldPopulator {
    fn build(&mut self) -> Grid;
}

impl<F: FnMut() -> Grid> WorldPopulator for F {
    fn build(&mut self) -> Grid {
        self()
    }
}

/// Grass surface with an open clearing in the middle, walled layers below
/// filled with random gems and soft terrain.
#[derive(Debug, Clone)]
pub struct ClassicPopulator {
    seed: u64,
    gem_tiers: Vec<Tier>,
    terrain_ratio: f32,
}

impl ClassicPopulator {
    pub fn new(seed: u64, gem_tiers: Vec<Tier>, terrain_ratio: f32) -> Self {
        Self {
            seed,
            gem_tiers,
            terrain_ratio,
        }
    }

    pub fn from_config(cfg: &GameConfig) -> Self {
        Self::new(cfg.seed, cfg.gem_tiers(), cfg.terrain_ratio)
    }

    /// Open cells on the surface layer.
    pub fn clearing() -> GridBox {
        GridBox::new(GridCoord::new(6, 0, 6), GridCoord::new(10, 0, 10))
    }
}

impl WorldPopulator for ClassicPopulator {
    fn build(&mut self) -> Grid {
        let mut grid = Grid::new();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let clearing = Self::clearing();

        for c in GridBox::layer(0).iter_cells() {
            if !clearing.contains(c) {
                grid.set(c, Cell::terrain());
            }
        }

        let below = GridBox::new(GridCoord::new(0, 1, 0), GridCoord::new(15, GRID_Y - 1, 15));
        for c in below.border_cells() {
            grid.set(c, Cell::marker());
        }
        for c in below.iter_cells() {
            if grid.exists(c) {
                continue;
            }
            let roll: f32 = rng.r#gen();
            let cell = if roll < self.terrain_ratio || self.gem_tiers.is_empty() {
                Cell::terrain()
            } else {
                let i = rng.gen_range(0..self.gem_tiers.len());
                Cell::gem(self.gem_tiers[i])
            };
            grid.set(c, cell);
        }
        grid
    }
}
