//! Shared fixtures: recording handlers and collider shorthands

use std::sync::Arc;

use parking_lot::Mutex;

use crate::foundation::math::WorldPosition;
use crate::physics::{Collider, ColliderDesc, ColliderId, CollisionHandler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seen {
    Enter(ColliderId),
    Exit(ColliderId),
}

/// Handler appending every notification to a shared log
#[derive(Default)]
pub struct Recorder {
    seen: Mutex<Vec<Seen>>,
}

impl Recorder {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Seen> {
        self.seen.lock().clone()
    }

    pub fn enters(&self) -> usize {
        self.events().iter().filter(|e| matches!(e, Seen::Enter(_))).count()
    }

    pub fn exits(&self) -> usize {
        self.events().iter().filter(|e| matches!(e, Seen::Exit(_))).count()
    }
}

impl CollisionHandler for Recorder {
    fn on_enter(&self, other: &Collider) {
        self.seen.lock().push(Seen::Enter(other.id()));
    }

    fn on_exit(&self, other: &Collider) {
        self.seen.lock().push(Seen::Exit(other.id()));
    }
}

pub fn boxed(x: f32, y: f32, width: f32, height: f32) -> ColliderDesc {
    ColliderDesc::new(WorldPosition::new(x, y), width, height)
}

pub fn recorded(desc: ColliderDesc, recorder: &Arc<Recorder>) -> ColliderDesc {
    let handler: Arc<dyn CollisionHandler> = recorder.clone();
    desc.with_shared_handler(handler)
}
