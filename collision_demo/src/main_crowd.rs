//! Crowd demo
//!
//! Several worker threads each drive a walker across a shared checkpoint strip
//! and into a wall, all against one registry. The checkpoint counts how many
//! walkers crossed it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use log::{info, warn};
use rust_collision::prelude::*;
use thiserror::Error;

const WALKERS: u16 = 12;
const LANE_SPACING: f32 = 40.0;

#[derive(Error, Debug)]
enum DemoError {
    #[error("Collision error: {0}")]
    Collision(#[from] CollisionError),

    #[error("Walker thread panicked")]
    WalkerPanicked,
}

fn walk(registry: &Arc<LayerRegistry>, lane: u16) -> Result<(WorldPosition, bool), CollisionError> {
    let y = f32::from(lane) * LANE_SPACING;
    let walker = Collidable::new(
        Arc::clone(registry),
        ColliderDesc::new(WorldPosition::new(-200.0, y), 16.0, 16.0)
            .with_tags(Tags::ENEMY)
            .with_block(Tags::ENVIRONMENT)
            .with_ignore(Tags::ENEMY)
            .with_owner(OwnerId(u64::from(lane))),
    )?;

    for _ in 0..40 {
        if walker.move_by(Vec2::new(12.0, 0.0))?.is_blocked() {
            return Ok((walker.position()?, true));
        }
    }
    Ok((walker.position()?, false))
}

fn run() -> Result<(), DemoError> {
    let config = CollisionConfig {
        layers: Tags::ENVIRONMENT | Tags::TRIGGER,
        parallel_scan_threshold: 8,
    };
    let registry = Arc::new(LayerRegistry::from_config(&config));

    let crossings = Arc::new(AtomicUsize::new(0));
    let checkpoint = {
        let crossings = Arc::clone(&crossings);
        FnHandler::new(
            move |_| {
                crossings.fetch_add(1, Ordering::SeqCst);
            },
            |_| {},
        )
    };
    let height = f32::from(WALKERS) * LANE_SPACING * 2.0;
    let _checkpoint = Collidable::new(
        Arc::clone(&registry),
        ColliderDesc::new(WorldPosition::new(0.0, 0.0), 10.0, height)
            .with_tags(Tags::TRIGGER)
            .with_handler(checkpoint),
    )?;
    let _wall = Collidable::new(
        Arc::clone(&registry),
        ColliderDesc::new(WorldPosition::new(200.0, 0.0), 20.0, height).with_tags(Tags::ENVIRONMENT),
    )?;

    let handles: Vec<_> = (0..WALKERS)
        .map(|lane| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || walk(&registry, lane))
        })
        .collect();

    for (lane, handle) in handles.into_iter().enumerate() {
        match handle.join().map_err(|_| DemoError::WalkerPanicked)? {
            Ok((position, blocked)) => info!(
                "Walker {} ended at ({}, {}), blocked: {}",
                lane, position.x, position.y, blocked
            ),
            Err(e) => warn!("Walker {} failed: {}", lane, e),
        }
    }

    info!(
        "{} of {} walker(s) crossed the checkpoint",
        crossings.load(Ordering::SeqCst),
        WALKERS
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    info!("Starting crowd demo");

    run()?;

    info!("Crowd demo finished");
    Ok(())
}
