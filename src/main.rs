//! Aberred sprite demo.
//!
//! Builds a small ECS world with one tile sheet, spawns a sprite (from a
//! property file or a built-in definition), tweens its tint and animation
//! frame and runs a fixed number of ticks. Every batch flush is logged, so
//! run with `RUST_LOG=debug` to watch the quads go by.
//!
//! ```sh
//! cargo run -- --ticks 30 --sprite assets/hero.json#hero
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use bevy_ecs::prelude::*;
use clap::Parser;
use glam::Vec2;
use log::info;

use aberredsprite::components::sprite::Sprite;
use aberredsprite::components::tween::{Easing, LoopMode, PropertyTweens, TweenProperty};
use aberredsprite::error::{Result, SpriteError};
use aberredsprite::geometry::Rect;
use aberredsprite::resources::spriteconfig::SpriteConfig;
use aberredsprite::resources::tilesheet::{LogSink, TileSheet};
use aberredsprite::resources::tilesheetstore::TileSheetStore;
use aberredsprite::resources::worldtime::WorldTime;
use aberredsprite::systems::node::attach_sprite_nodes;
use aberredsprite::systems::render::sprite_render_system;
use aberredsprite::systems::time::update_world_time;
use aberredsprite::systems::tween::tween_sprite_properties;

const DEMO_SHEET: &str = "demo";
const DEMO_FRAMES: usize = 4;
const DEMO_TILE: f32 = 32.0;

/// Aberred sprite demo
#[derive(Parser)]
#[command(version, about = "Runs sprites through a few animated ticks")]
struct Cli {
    /// INI file with the `[sprite]` defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Sprite definition to load (`file.json#ns/ns`). Its `tileSheet`
    /// must be `demo`.
    #[arg(long, value_name = "URL")]
    sprite: Option<String>,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 60)]
    ticks: u32,

    /// Seconds per tick.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

fn demo_store() -> Result<TileSheetStore> {
    let mut store = TileSheetStore::new();
    let sheet = store.add(TileSheet::new(DEMO_SHEET, "demo.png"));
    sheet.set_sink(Box::new(LogSink));
    let walk = sheet.add_strip("walk", DEMO_FRAMES)?;
    let frames: Vec<Rect> = (0..DEMO_FRAMES)
        .map(|i| Rect::new(i as f32 * DEMO_TILE, 0.0, DEMO_TILE, DEMO_TILE))
        .collect();
    sheet.set_strip_frames(walk, 0, &frames)?;
    Ok(store)
}

fn demo_sprite(store: &TileSheetStore, config: &SpriteConfig, url: Option<&str>) -> Result<Sprite> {
    if let Some(url) = url {
        return Sprite::from_url(url, store, config);
    }
    let sheet = store
        .get(DEMO_SHEET)
        .ok_or_else(|| SpriteError::TileSheetNotFound(DEMO_SHEET.into()))?;
    let mut sprite = Sprite::create("hero", Arc::clone(&sheet), config);
    sprite.set_size(Vec2::new(64.0, 64.0));
    sprite.set_default_tile(Rect::new(0.0, 0.0, DEMO_TILE, DEMO_TILE));
    sprite.select_strip_frame_by_id("walk", 0)?;
    Ok(sprite)
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            let mut config = SpriteConfig::with_path(path);
            config.load_from_file()?;
            config
        }
        None => SpriteConfig::new(),
    };

    let store = demo_store()?;
    let sprite = demo_sprite(&store, &config, cli.sprite.as_deref())?;
    let tweens = PropertyTweens::new()
        .with(
            TweenProperty::for_target(
                &sprite,
                "ANIMATE_TINT",
                [1.0, 1.0, 1.0, 1.0],
                [1.0, 0.2, 0.2, 1.0],
                0.5,
            )?
            .with_easing(Easing::QuadInOut)
            .with_loop_mode(LoopMode::PingPong),
        )
        .with(
            TweenProperty::for_target(
                &sprite,
                "ANIMATE_FRAME_INDEX",
                [0.0, 0.0],
                [0.0, (DEMO_FRAMES - 1) as f32],
                0.4,
            )?
            .with_loop_mode(LoopMode::Loop),
        );

    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(config);
    world.insert_resource(store);
    let hero = world.spawn((sprite, tweens)).id();

    let mut update = Schedule::default();
    update.add_systems(attach_sprite_nodes);
    update.add_systems(tween_sprite_properties.after(attach_sprite_nodes));
    update.add_systems(sprite_render_system.after(tween_sprite_properties));

    info!("Running {} ticks of {}s", cli.ticks, cli.dt);
    for _ in 0..cli.ticks {
        update_world_time(&mut world, cli.dt);
        update.run(&mut world);
    }

    if let Some(sprite) = world.get::<Sprite>(hero) {
        info!(
            "Sprite '{}' ended on frame {:?} with tint {:?}",
            sprite.id(),
            sprite.current_frame(),
            sprite.tint()
        );
    }
    if let Some(sheet) = world.resource::<TileSheetStore>().get(DEMO_SHEET) {
        info!("Tile sheet '{}' flushed {} batches", sheet.id(), sheet.flush_count());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
