//! Per-step candidate scan
//!
//! Runs the leading-edge tests of one movement step against every candidate
//! pulled from the spatial index. Small candidate lists are tested inline; large
//! ones are split across scoped worker threads that report hits over a channel.
//! Workers finish in any order, so the result is sorted and deduplicated by
//! handle before anyone reads it.

use std::num::NonZeroUsize;
use std::thread;

use crossbeam::channel;

use crate::foundation::math::Aabb;
use crate::physics::edges::{Contact, LeadingEdges};
use crate::physics::{ColliderId, CollisionError};

/// Test `edges` against every candidate box, returning the handles that were hit
///
/// The scan runs on worker threads once `candidates.len()` reaches
/// `parallel_threshold`. The returned handles are sorted and unique.
pub fn scan_candidates(
    edges: &LeadingEdges,
    candidates: &[(ColliderId, Aabb)],
    contact: Contact,
    parallel_threshold: usize,
) -> Result<Vec<ColliderId>, CollisionError> {
    if edges.is_empty() || candidates.is_empty() {
        return Ok(Vec::new());
    }

    let mut hits = if candidates.len() >= parallel_threshold.max(1) {
        scan_parallel(edges, candidates, contact)?
    } else {
        scan_sequential(edges, candidates, contact)
    };

    hits.sort_unstable();
    hits.dedup();
    Ok(hits)
}

fn scan_sequential(
    edges: &LeadingEdges,
    candidates: &[(ColliderId, Aabb)],
    contact: Contact,
) -> Vec<ColliderId> {
    candidates
        .iter()
        .filter(|(_, aabb)| edges.intersects(aabb, contact))
        .map(|&(id, _)| id)
        .collect()
}

fn scan_parallel(
    edges: &LeadingEdges,
    candidates: &[(ColliderId, Aabb)],
    contact: Contact,
) -> Result<Vec<ColliderId>, CollisionError> {
    let workers = thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .min(candidates.len());
    let chunk_size = candidates.len().div_ceil(workers);
    let (sender, receiver) = channel::unbounded();

    crossbeam::scope(|scope| {
        for chunk in candidates.chunks(chunk_size) {
            let sender = sender.clone();
            scope.spawn(move |_| {
                for &(id, aabb) in chunk {
                    if edges.intersects(&aabb, contact) && sender.send(id).is_err() {
                        break;
                    }
                }
            });
        }
    })
    .map_err(|_| CollisionError::ScanWorkerPanicked)?;

    drop(sender);
    Ok(receiver.into_iter().collect())
}
