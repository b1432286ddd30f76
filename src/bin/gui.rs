use std::collections::BTreeSet;

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};
use tracing_subscriber::EnvFilter;
use digmerge::{
	Category, Cell, ClassicPopulator, Direction, GameConfig, GridBox, GridCoord, MoveOutcome, RecordingSinks,
	Session, SinkEvent, Tier, format_hud, format_move_log,
};

// ---------- Constants ----------
const TILE_SIZE: f32 = 32.0;
const LOG_LIMIT: usize = 200;
const SKY_COLOR: Color = Color::srgb(0.45, 0.65, 0.9);
const CAVE_COLOR: Color = Color::srgb(0.05, 0.04, 0.06);

const KEY_BINDINGS: [(KeyCode, Direction); 6] = [
	(KeyCode::ArrowRight, Direction::East),
	(KeyCode::ArrowLeft, Direction::West),
	(KeyCode::ArrowUp, Direction::North),
	(KeyCode::ArrowDown, Direction::South),
	(KeyCode::KeyS, Direction::Down),
	(KeyCode::KeyW, Direction::Up),
];

// ---------- Components ----------
#[derive(Component)]
struct CellPos {
	x: i32,
	y: i32,
	z: i32,
}

#[derive(Component)]
struct LayerTiles; // Marker to despawn/rebuild when the visible layer changes

#[derive(Component)]
struct PlayerToken;

// ---------- Resources ----------
#[derive(Resource)]
struct UiState {
	move_log: Vec<(Direction, MoveOutcome)>,
	console_log: Vec<String>,
	active_layers: BTreeSet<i32>,
	shown_layer: i32,
	request_rebuild_tiles: bool,
	light: f32,
	ambient: bool,
	toast: Option<(String, f32)>, // (message, remaining_seconds)
}

#[derive(Resource)]
struct GameSession {
	session: Session,
	sinks: RecordingSinks,
}

// ---------- Entry ----------
fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("digmerge=info")))
		.init();

	let cfg = load_config();
	let mut sinks = RecordingSinks::new();
	let session = match Session::start(&mut ClassicPopulator::from_config(&cfg), &cfg, &mut sinks) {
		Ok(s) => s,
		Err(e) => {
			eprintln!("Cannot start session: {e}");
			std::process::exit(1);
		}
	};

	App::new()
		.add_plugins(DefaultPlugins.set(WindowPlugin {
			primary_window: Some(Window {
				title: "Digmerge".to_string(),
				resolution: (1280, 800).into(),
				..Default::default()
			}),
			..Default::default()
		}))
		.add_plugins(EguiPlugin::default())
		// Resources
		.insert_resource(ClearColor(SKY_COLOR))
		.insert_resource(UiState {
			move_log: Vec::new(),
			console_log: vec!["Arrows move, S digs down, W climbs up".to_string()],
			active_layers: BTreeSet::new(),
			shown_layer: 0,
			request_rebuild_tiles: true,
			light: cfg.surface_light,
			ambient: true,
			toast: None,
		})
		.insert_resource(GameSession { session, sinks })
		// Setup
		.add_systems(Startup, setup_scene)
		// Frame systems
		.add_systems(
			Update,
			(
				handle_move_input,
				apply_sink_events,
				build_tiles_when_needed,
				update_tile_colors_from_grid,
				update_player_token,
				update_toast_timer,
			)
				.chain(),
		)
		.add_systems(EguiPrimaryContextPass, draw_ui)
		.run();
}

fn load_config() -> GameConfig {
	let Some(path) = std::env::args().nth(1).or_else(|| std::env::var("DIGMERGE_CONFIG").ok()) else {
		return GameConfig::default();
	};
	match GameConfig::load(&path) {
		Ok(cfg) => cfg,
		Err(e) => {
			eprintln!("Ignoring config {path}: {e}");
			GameConfig::default()
		}
	}
}

// ---------- Setup ----------
fn setup_scene(mut commands: Commands) {
	let center = 8.0 * TILE_SIZE;
	commands.spawn((Camera2d, Transform::from_xyz(center, center, 1000.0)));
	commands.spawn((
		Sprite::from_color(Color::srgb(0.95, 0.2, 0.6), Vec2::splat(TILE_SIZE * 0.6)),
		Transform::from_xyz(0.0, 0.0, 5.0),
		PlayerToken,
	));
}

// ---------- Utilities ----------
fn cell_color(cell: Cell, y: i32) -> Color {
	match cell {
		Cell::Empty => Color::srgba(0.0, 0.0, 0.0, 0.0),
		Cell::Occupied(k) => match k.category {
			Category::Terrain if y == 0 => Color::srgb(0.3, 0.65, 0.25),
			Category::Terrain => Color::srgb(0.45, 0.3, 0.18),
			Category::Marker => Color::srgb(0.2, 0.2, 0.22),
			Category::Gem => gem_color(k.tier),
		},
	}
}

fn gem_color(tier: Tier) -> Color {
	let rank = tier.value().trailing_zeros() as f32;
	Color::hsl((rank * 33.0) % 360.0, 0.75, 0.55)
}

fn tile_center(x: i32, z: i32) -> Vec2 {
	Vec2::new(
		x as f32 * TILE_SIZE + TILE_SIZE * 0.5,
		z as f32 * TILE_SIZE + TILE_SIZE * 0.5,
	)
}

fn set_toast(ui: &mut UiState, msg: impl Into<String>) {
	ui.toast = Some((msg.into(), 2.0));
}

// ---------- Systems: Input ----------
fn handle_move_input(keys: Res<ButtonInput<KeyCode>>, mut game: ResMut<GameSession>, mut ui: ResMut<UiState>) {
	let Some(dir) = KEY_BINDINGS
		.iter()
		.find(|(key, _)| keys.just_pressed(*key))
		.map(|(_, dir)| *dir)
	else {
		return;
	};
	let GameSession { session, sinks } = &mut *game;
	let outcome = session.step(dir, sinks);
	ui.move_log.push((dir, outcome));
	if ui.move_log.len() > LOG_LIMIT {
		ui.move_log.remove(0);
	}
}

// ---------- Systems: Collaborator calls ----------
fn apply_sink_events(mut game: ResMut<GameSession>, mut ui: ResMut<UiState>, mut clear: ResMut<ClearColor>) {
	for event in game.sinks.drain() {
		match event {
			SinkEvent::LayerActive(y, true) => {
				ui.active_layers.insert(y);
			}
			SinkEvent::LayerActive(y, false) => {
				ui.active_layers.remove(&y);
			}
			SinkEvent::Underground(underground) => {
				clear.0 = if underground { CAVE_COLOR } else { SKY_COLOR };
			}
			SinkEvent::Ambient(on) => ui.ambient = on,
			SinkEvent::LightIntensity(v) => ui.light = v,
			SinkEvent::MergeEffect(at) => {
				set_toast(&mut ui, format!("Merged at {at}"));
			}
			SinkEvent::MineEffect(at) => ui.console_log.push(format!("Mined {at}")),
			// Sprites are recoloured from the grid every frame.
			SinkEvent::Spawn(..) | SinkEvent::Destroy(_) | SinkEvent::Move(..) | SinkEvent::ShiftShadow(_) => {}
		}
	}
	let top = ui.active_layers.first().copied().unwrap_or(0);
	if top != ui.shown_layer {
		ui.shown_layer = top;
		ui.request_rebuild_tiles = true;
	}
}

// ---------- Systems: Map Rendering ----------
fn build_tiles_when_needed(
	mut commands: Commands,
	mut ui: ResMut<UiState>,
	existing: Query<Entity, With<LayerTiles>>,
) {
	if !ui.request_rebuild_tiles {
		return;
	}
	for e in &existing {
		commands.entity(e).despawn();
	}
	let y = ui.shown_layer;
	for c in GridBox::layer(y).iter_cells() {
		let pos = tile_center(c.x, c.z);
		commands.spawn((
			Sprite::from_color(Color::NONE, Vec2::splat(TILE_SIZE - 2.0)),
			Transform::from_translation(pos.extend(0.0)),
			CellPos { x: c.x, y: c.y, z: c.z },
			LayerTiles,
		));
	}
	ui.request_rebuild_tiles = false;
}

fn update_tile_colors_from_grid(game: Res<GameSession>, mut q: Query<(&CellPos, &mut Sprite)>) {
	let grid = game.session.grid();
	for (pos, mut sprite) in &mut q {
		let cell = grid.cell_at(GridCoord::new(pos.x, pos.y, pos.z));
		sprite.color = cell_color(cell, pos.y);
	}
}

fn update_player_token(game: Res<GameSession>, mut q: Query<&mut Transform, With<PlayerToken>>) {
	let player = game.session.player();
	for mut t in &mut q {
		let p = tile_center(player.x, player.z);
		t.translation.x = p.x;
		t.translation.y = p.y;
	}
}

// ---------- Systems: Toast ----------
fn update_toast_timer(time: Res<Time>, mut ui: ResMut<UiState>) {
	if let Some((_, ref mut remaining)) = ui.toast {
		*remaining -= time.delta_secs();
		if *remaining <= 0.0 {
			ui.toast = None;
		}
	}
}

// ---------- Systems: UI ----------
fn draw_ui(mut egui_ctx: EguiContexts, ui: Res<UiState>, game: Res<GameSession>) {
	if let Ok(ctx) = egui_ctx.ctx_mut() {

	let session = &game.session;

	// Top HUD
	egui::TopBottomPanel::top("top_hud").show(&*ctx, |ui_top| {
		ui_top.horizontal(|ui_row| {
			ui_row.label(format_hud(&session.stats, session.player(), session.environment()));
			ui_row.separator();
			let window = session.layer_window();
			ui_row.label(format!("Layers {}-{}", window.top, window.bottom));
			ui_row.separator();
			ui_row.label(format!("Light {:.2}", ui.light));
			if ui.ambient {
				ui_row.label("Rain");
			}
			if let Some((ref msg, _)) = ui.toast {
				ui_row.separator();
				ui_row.colored_label(egui::Color32::YELLOW, msg);
			}
		});
	});

	// Right panel (recent moves)
	egui::SidePanel::right("right_panel")
		.resizable(true)
		.default_width(280.0)
		.show(&*ctx, |ui_right| {
			egui::ScrollArea::vertical().show(ui_right, |ui_scroll| {
				for line in format_move_log(&ui.move_log, 40) {
					ui_scroll.label(line);
				}
			});
		});

	// Bottom console
	egui::TopBottomPanel::bottom("bottom_console").resizable(true).show(&*ctx, |ui_bottom| {
		egui::ScrollArea::vertical().stick_to_bottom(true).show(ui_bottom, |ui_logs| {
			for line in &ui.console_log {
				ui_logs.label(line);
			}
		});
	});

	} // end if Ok(ctx)
}

#[cfg(test)]
mod tests {
	use super::*;
	use digmerge::Grid;

	#[test]
	fn bindings_cover_every_direction() {
		for d in Direction::ALL {
			assert_eq!(KEY_BINDINGS.iter().filter(|(_, bd)| *bd == d).count(), 1);
		}
	}

	#[test]
	fn empty_cells_are_transparent() {
		assert_eq!(cell_color(Cell::Empty, 3).alpha(), 0.0);
		assert_ne!(cell_color(Cell::terrain(), 0), cell_color(Cell::terrain(), 1));
	}

	#[test]
	fn sink_events_drive_visible_layer() {
		let mut app = App::new();
		app.add_plugins(MinimalPlugins);

		let cfg = GameConfig { spawn: GridCoord::new(8, 0, 8), ..GameConfig::default() };
		let mut sinks = RecordingSinks::new();
		let mut session = Session::start(&mut || Grid::new(), &cfg, &mut sinks).unwrap();
		session.step(Direction::Down, &mut sinks);

		app.insert_resource(ClearColor(SKY_COLOR));
		app.insert_resource(GameSession { session, sinks });
		app.insert_resource(UiState {
			move_log: Vec::new(),
			console_log: Vec::new(),
			active_layers: BTreeSet::new(),
			shown_layer: 0,
			request_rebuild_tiles: false,
			light: 1.4,
			ambient: true,
			toast: None,
		});
		app.add_systems(Update, (apply_sink_events, build_tiles_when_needed).chain());
		app.update();

		let ui = app.world().resource::<UiState>();
		assert_eq!(ui.shown_layer, 1);
		assert!(!ui.ambient);
		assert_eq!(app.world().resource::<ClearColor>().0, CAVE_COLOR);

		let mut q = app.world_mut().query::<&CellPos>();
		let tiles: Vec<_> = q.iter(app.world()).map(|p| p.y).collect();
		assert_eq!(tiles.len(), 256);
		assert!(tiles.iter().all(|&y| y == 1));
	}
}
