//! Corridor demo
//!
//! Walks a player through a corridor with a pressure plate and a door. The
//! player stops flush against the door, then slides up along it.
//!
//! Usage: `corridor_demo [config.toml|config.ron]`

use std::sync::Arc;

use log::info;
use rust_collision::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
enum DemoError {
    #[error("Collision error: {0}")]
    Collision(#[from] CollisionError),
}

fn build_registry() -> Result<LayerRegistry, DemoError> {
    let registry = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading collision config from {}", path);
            LayerRegistry::from_config_file(&path)?
        }
        None => LayerRegistry::default(),
    };
    registry.add_layer(Tags::ENVIRONMENT)?;
    Ok(registry)
}

fn run() -> Result<(), DemoError> {
    let registry = Arc::new(build_registry()?);

    let _floor = Collidable::new(
        Arc::clone(&registry),
        ColliderDesc::new(WorldPosition::new(150.0, -80.0), 400.0, 32.0).with_tags(Tags::ENVIRONMENT),
    )?;
    let _door = Collidable::new(
        Arc::clone(&registry),
        ColliderDesc::new(WorldPosition::new(150.0, 0.0), 128.0, 128.0)
            .with_tags(Tags::ENVIRONMENT)
            .with_handler(FnHandler::new(
                |other| info!("Door bumped by {:?}", other.id()),
                |other| info!("Door released by {:?}", other.id()),
            )),
    )?;
    let _plate = Collidable::new(
        Arc::clone(&registry),
        ColliderDesc::new(WorldPosition::new(40.0, 0.0), 8.0, 8.0)
            .with_tags(Tags::TRIGGER)
            .with_handler(FnHandler::new(
                |other| info!("Pressure plate pressed at ({}, {})", other.center().x, other.center().y),
                |_| info!("Pressure plate released"),
            )),
    )?;

    let player = Collidable::new(
        Arc::clone(&registry),
        ColliderDesc::new(WorldPosition::origin(), 32.0, 32.0)
            .with_tags(Tags::PLAYER)
            .with_block(Tags::ENVIRONMENT)
            .with_owner(OwnerId(1))
            .with_handler(FnHandler::new(
                |other| info!("Player touched {:?}", other.tags()),
                |other| info!("Player left {:?}", other.tags()),
            )),
    )?;

    let stopped = player.move_to(WorldPosition::new(250.0, 0.0))?;
    info!("Player stopped at ({}, {})", stopped.x, stopped.y);

    let slide = player.slide_to(WorldPosition::new(120.0, 120.0))?;
    info!(
        "Slide ended at ({}, {}) after {} step(s), {:?}",
        slide.position.x, slide.position.y, slide.steps, slide.status
    );

    let back = player.move_by(Vec2::new(-100.0, 0.0))?;
    info!("Walked back to ({}, {}), {:?}", back.position.x, back.position.y, back.status);

    info!("{} collider(s) registered", registry.len());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    info!("Starting corridor demo");

    run()?;

    info!("Corridor demo finished");
    Ok(())
}
