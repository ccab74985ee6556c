//! Swept movement engine
//!
//! A move advances a collider toward its target in steps of
//! [`RAY_STEP`](crate::consts::RAY_STEP). Every step runs two passes over the
//! mover's leading edges:
//!
//! 1. **Blocking pass** against each layer named in the mover's `block` set,
//!    with strict contact. Any hit ends the move at the last committed step.
//! 2. **Notification pass** against the all-colliders layer, with inclusive
//!    contact, skipping tags in the mover's `ignore` set. The result is diffed
//!    against the touching set of the previous step to raise enter/exit events.
//!
//! The registry lock is held for the whole move. Events are queued, then
//! dispatched on the calling thread after the lock is released.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::consts::{MAX_CANDIDATES_PER_STEP, RAY_STEP};
use crate::foundation::math::{Aabb, Vec2, WorldPosition};
use crate::physics::edges::{Contact, LeadingEdges};
use crate::physics::scan::scan_candidates;
use crate::physics::{
    Collider, ColliderId, CollisionError, CollisionHandler, LayerRegistry, RegistryState,
};
use crate::spatial::GridLayer;

/// How a move ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    /// Target equal to the current center; nothing happened
    Unchanged,
    /// The collider reached its target
    Committed,
    /// A blocking layer stopped the collider short of its target
    Blocked,
}

/// Result of a move request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// Committed center after the move
    pub position: WorldPosition,
    /// How the move ended
    pub status: MoveStatus,
    /// Number of steps committed
    pub steps: usize,
}

impl MoveOutcome {
    fn unchanged(position: WorldPosition) -> Self {
        Self {
            position,
            status: MoveStatus::Unchanged,
            steps: 0,
        }
    }

    /// Check whether a blocking layer stopped the move
    pub fn is_blocked(&self) -> bool {
        self.status == MoveStatus::Blocked
    }

    /// Check whether the collider's center changed
    pub fn moved(&self) -> bool {
        self.steps > 0
    }
}

/// Discretized positions from a start to a target
///
/// Step `i` sits at `start + direction * RAY_STEP * i`, computed from the start
/// so rounding does not accumulate. The last step is exactly the target.
#[derive(Debug, Clone)]
pub struct StepPath {
    start: WorldPosition,
    target: WorldPosition,
    direction: Vec2,
    count: usize,
    next: usize,
}

impl StepPath {
    /// Path from `start` to `target`; empty when they are equal
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn new(start: WorldPosition, target: WorldPosition) -> Self {
        let travel = target - start;
        let distance = travel.norm();
        let (direction, count) = if distance > 0.0 {
            (travel / distance, (distance / RAY_STEP).ceil() as usize)
        } else {
            (Vec2::zeros(), 0)
        };

        Self {
            start,
            target,
            direction,
            count,
            next: 0,
        }
    }

    /// Total number of steps
    pub fn step_count(&self) -> usize {
        self.count
    }
}

impl Iterator for StepPath {
    type Item = WorldPosition;

    #[allow(clippy::cast_precision_loss)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        self.next += 1;
        if self.next == self.count {
            Some(self.target)
        } else {
            Some(self.start + self.direction * (RAY_STEP * self.next as f32))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StepPath {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    Enter,
    Exit,
}

/// Event recorded during a move, resolved once the move is over
#[derive(Debug, Clone, Copy)]
struct PendingEvent {
    kind: EventKind,
    receiver: ColliderId,
    other: ColliderId,
}

/// Event ready for dispatch outside the lock
struct ReadyEvent {
    kind: EventKind,
    handler: Arc<dyn CollisionHandler>,
    other: Collider,
}

#[derive(Default)]
struct EventQueue {
    pending: Vec<PendingEvent>,
}

impl EventQueue {
    fn pair(&mut self, kind: EventKind, mover: ColliderId, other: ColliderId) {
        self.pending.push(PendingEvent { kind, receiver: mover, other });
        self.pending.push(PendingEvent { kind, receiver: other, other: mover });
    }

    /// Snapshot handlers and counterparts as they are after the move
    fn resolve(self, state: &RegistryState) -> Vec<ReadyEvent> {
        self.pending
            .into_iter()
            .filter_map(|event| {
                let receiver = state.collider(event.receiver)?;
                let other = state.collider(event.other)?;
                Some(ReadyEvent {
                    kind: event.kind,
                    handler: Arc::clone(&receiver.handler),
                    other: other.clone(),
                })
            })
            .collect()
    }
}

fn dispatch(events: Vec<ReadyEvent>) {
    for event in events {
        match event.kind {
            EventKind::Enter => event.handler.on_enter(&event.other),
            EventKind::Exit => event.handler.on_exit(&event.other),
        }
    }
}

/// Colliders of `layers` listed in the cells covered by the step's edges
fn gather_candidates<'a>(
    state: &RegistryState,
    layers: impl IntoIterator<Item = &'a GridLayer>,
    edges: &LeadingEdges,
    keep: impl Fn(&Collider) -> bool,
) -> Vec<(ColliderId, Aabb)> {
    let mut seen = BTreeSet::new();
    let mut candidates = Vec::new();

    for layer in layers {
        for bounds in edges.bounds() {
            for id in layer.query(&bounds) {
                if !seen.insert(id) {
                    continue;
                }
                if let Some(collider) = state.collider(id).filter(|c| keep(*c)) {
                    candidates.push((id, collider.aabb()));
                }
            }
        }
    }

    if candidates.len() >= MAX_CANDIDATES_PER_STEP {
        warn!(
            "Saw {} collision candidates in one step, abnormal density",
            candidates.len()
        );
    }
    candidates
}

/// Run a whole move with the registry locked
///
/// `target_of` receives the mover's current center and returns the target, so
/// relative moves are resolved under the same lock.
fn sweep(
    state: &mut RegistryState,
    id: ColliderId,
    target_of: impl FnOnce(WorldPosition) -> WorldPosition,
    parallel_threshold: usize,
) -> Result<(MoveOutcome, EventQueue), CollisionError> {
    let mover = state
        .collider(id)
        .ok_or(CollisionError::ColliderNotFound(id))?
        .clone();
    let start = mover.center();
    let target = target_of(start);

    if !(target.x.is_finite() && target.y.is_finite()) {
        return Err(CollisionError::NonFiniteTarget {
            x: target.x,
            y: target.y,
        });
    }
    if target == start {
        return Ok((MoveOutcome::unchanged(start), EventQueue::default()));
    }

    let start_aabb = mover.aabb();
    let notifies = |other: &Collider| other.id() != id && !mover.ignore().excludes(other.tags());

    let mut touching: BTreeSet<ColliderId> = state
        .all_colliders()
        .query(&start_aabb)
        .into_iter()
        .filter_map(|other| state.collider(other))
        .filter(|other| notifies(*other) && other.aabb().touches(&start_aabb))
        .map(Collider::id)
        .collect();

    let mut block_layers = Vec::new();
    for tag in mover.block().singles() {
        match state.lookup(tag) {
            Ok(layer) => block_layers.push(layer),
            Err(_) => warn!("Collider {:?} blocks on unknown layer {:?}, skipping it", id, tag),
        }
    }

    // Blockers already in contact never raise a second enter when pushed against
    let mut start_contacts = BTreeSet::new();
    // Blockers overlapping the start box only stop steps that push deeper in
    let mut escaping = BTreeSet::new();
    for layer in &block_layers {
        for other in layer.query(&start_aabb).into_iter().filter_map(|o| state.collider(o)) {
            if other.id() == id {
                continue;
            }
            let aabb = other.aabb();
            if aabb.touches(&start_aabb) {
                start_contacts.insert(other.id());
            }
            if aabb.overlaps(&start_aabb) {
                escaping.insert(other.id());
            }
        }
    }

    let mut events = EventQueue::default();
    let mut committed = start;
    let mut steps = 0;
    let mut blocked = false;

    for next in StepPath::new(start, target) {
        let edges = LeadingEdges::for_step(committed, next, mover.width(), mover.height());

        let committed_aabb = mover.aabb_at(committed);
        let next_aabb = mover.aabb_at(next);

        let mut blockers = {
            let candidates = gather_candidates(state, block_layers.iter().copied(), &edges, |other| {
                other.id() != id && !escaping.contains(&other.id())
            });
            scan_candidates(&edges, &candidates, Contact::Penetrate, parallel_threshold)?
        };
        blockers.extend(escaping.iter().copied().filter(|&other| {
            state.collider(other).is_some_and(|c| {
                let aabb = c.aabb();
                aabb.overlap_area(&next_aabb) > aabb.overlap_area(&committed_aabb)
            })
        }));
        if !blockers.is_empty() {
            for &blocker in &blockers {
                if !touching.contains(&blocker) && !start_contacts.contains(&blocker) {
                    events.pair(EventKind::Enter, id, blocker);
                }
            }
            info!("Blocked collider {:?} movement at ({}, {})", id, committed.x, committed.y);
            blocked = true;
            break;
        }

        let mut now_touching: BTreeSet<ColliderId> = {
            let candidates =
                gather_candidates(state, [state.all_colliders()], &edges, |other| notifies(other));
            scan_candidates(&edges, &candidates, Contact::Touch, parallel_threshold)?
                .into_iter()
                .collect()
        };
        now_touching.extend(touching.iter().copied().filter(|&other| {
            state
                .collider(other)
                .is_some_and(|c| c.aabb().touches(&next_aabb))
        }));

        for &gone in touching.difference(&now_touching) {
            events.pair(EventKind::Exit, id, gone);
        }
        for &new in now_touching.difference(&touching) {
            events.pair(EventKind::Enter, id, new);
        }

        touching = now_touching;
        escaping.retain(|&other| {
            state
                .collider(other)
                .is_some_and(|c| c.aabb().overlaps(&next_aabb))
        });
        committed = next;
        steps += 1;
    }

    if steps > 0 {
        state.commit_center(id, committed)?;
    }
    debug!("Moved collider {:?} {} step(s) to ({}, {})", id, steps, committed.x, committed.y);

    let status = if blocked {
        MoveStatus::Blocked
    } else {
        MoveStatus::Committed
    };
    Ok((
        MoveOutcome {
            position: committed,
            status,
            steps,
        },
        events,
    ))
}

impl LayerRegistry {
    fn run_move(
        &self,
        id: ColliderId,
        target_of: impl FnOnce(WorldPosition) -> WorldPosition,
    ) -> Result<MoveOutcome, CollisionError> {
        let mut state = self.lock();
        let (outcome, events) = sweep(&mut state, id, target_of, self.parallel_scan_threshold())?;
        let ready = events.resolve(&state);
        drop(state);

        dispatch(ready);
        Ok(outcome)
    }

    /// Move a collider toward `target`, stopping at the first blocking layer
    ///
    /// Enter/exit handlers run on this thread before the call returns, after
    /// the registry lock has been released.
    pub fn move_collider(
        &self,
        id: ColliderId,
        target: WorldPosition,
    ) -> Result<MoveOutcome, CollisionError> {
        self.run_move(id, |_| target)
    }

    /// Move a collider by `delta` from wherever it is when the lock is taken
    pub fn move_collider_by(&self, id: ColliderId, delta: Vec2) -> Result<MoveOutcome, CollisionError> {
        self.run_move(id, |center| center + delta)
    }

    /// Move toward `target`, sliding along whatever blocks the full move
    ///
    /// When the direct move is blocked, the remaining x displacement is tried
    /// alone, then the remaining y displacement. Each attempt is a complete
    /// move of its own with its own notifications.
    pub fn slide_collider(
        &self,
        id: ColliderId,
        target: WorldPosition,
    ) -> Result<MoveOutcome, CollisionError> {
        let direct = self.move_collider(id, target)?;
        if !direct.is_blocked() {
            return Ok(direct);
        }

        let mut position = direct.position;
        let mut steps = direct.steps;
        let along_x = self.move_collider(id, WorldPosition::new(target.x, position.y))?;
        position = along_x.position;
        steps += along_x.steps;
        let along_y = self.move_collider(id, WorldPosition::new(position.x, target.y))?;
        position = along_y.position;
        steps += along_y.steps;

        let status = if position == target {
            MoveStatus::Committed
        } else {
            MoveStatus::Blocked
        };
        Ok(MoveOutcome {
            position,
            status,
            steps,
        })
    }
}
