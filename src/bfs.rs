//! Breadth-first traversal of the lattice.
//!
//! The sequential version is a plain queue-driven level-order walk. The parallel
//! version is level-synchronous: each wave runs as a four-stage data-parallel
//! pipeline and the next wave starts only after the previous one is compacted.
//!
//! 1. map every frontier vertex to its neighbor count
//! 2. exclusive prefix sum over the counts gives each vertex a base slot
//! 3. every `(vertex, neighbor)` slot tries to claim its neighbor; winners
//!    write the neighbor, losers leave the slot empty
//! 4. drop the empty slots to get the next frontier

use std::collections::VecDeque;

use rayon::prelude::*;

use crate::grid::{AtomicVisited, Vertex, Visited};
use crate::scan::exclusive_scan;

/// Counters collected by [`parallel_bfs_with_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BfsStats {
    /// Non-empty frontiers that were expanded.
    pub waves: usize,
    /// Vertices claimed, root included.
    pub claimed: usize,
}

/// Single-threaded BFS from `root` over a cube of side `size`.
///
/// Returns the visited set. Every vertex reachable from `root` ends up marked.
pub fn sequential_bfs(root: Vertex, size: u32) -> Visited {
    let mut visited = Visited::new(size);
    let mut queue = VecDeque::new();

    visited.insert(root);
    queue.push_back(root);

    while let Some(vertex) = queue.pop_front() {
        for neighbor in vertex.neighbors(size) {
            if visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    visited
}

/// Level-synchronous parallel BFS from `root` over a cube of side `size`.
///
/// Claims the same vertices as [`sequential_bfs`]; only the order in which
/// they are claimed differs. The atomic set is returned as-is, so callers
/// timing the traversal don't pay for [`AtomicVisited::into_visited`].
pub fn parallel_bfs(root: Vertex, size: u32) -> AtomicVisited {
    parallel_bfs_with_stats(root, size).0
}

/// [`parallel_bfs`] that also reports wave and claim counts.
pub fn parallel_bfs_with_stats(root: Vertex, size: u32) -> (AtomicVisited, BfsStats) {
    let visited = AtomicVisited::new(size);
    visited.claim(root);

    let mut frontier = vec![root];
    let mut stats = BfsStats {
        waves: 0,
        claimed: 1,
    };

    while !frontier.is_empty() {
        frontier = expand_wave(&frontier, size, &visited);
        stats.waves += 1;
        stats.claimed += frontier.len();
        log::trace!("wave {}: {} new vertices", stats.waves, frontier.len());
    }

    log::debug!(
        "parallel bfs on side {}: {} waves, {} vertices claimed",
        size,
        stats.waves,
        stats.claimed
    );

    (visited, stats)
}

/// Frontier runs at or below this length are scattered by one task.
const SCATTER_GRAIN: usize = 256;

/// Expand one frontier into the next. Returns once the wave is fully compacted.
fn expand_wave(frontier: &[Vertex], size: u32, visited: &AtomicVisited) -> Vec<Vertex> {
    let counts: Vec<usize> = frontier
        .par_iter()
        .map(|vertex| vertex.neighbor_count(size))
        .collect();

    let (offsets, total) = exclusive_scan(&counts);

    let mut slots: Vec<Option<Vertex>> = vec![None; total];
    if !frontier.is_empty() {
        scatter(frontier, &offsets, &mut slots, size, visited);
    }

    slots.into_par_iter().flatten().collect()
}

/// Claim neighbors of `frontier` into `slots`.
///
/// `slots` covers exactly the output range of `frontier`, starting at
/// `offsets[0]`. The range is halved at a vertex boundary and both halves
/// run in parallel, so every slot has one writer.
fn scatter(
    frontier: &[Vertex],
    offsets: &[usize],
    slots: &mut [Option<Vertex>],
    size: u32,
    visited: &AtomicVisited,
) {
    let base = offsets[0];
    if frontier.len() <= SCATTER_GRAIN {
        for (vertex, &offset) in frontier.iter().zip(offsets) {
            for (k, neighbor) in vertex.neighbors(size).into_iter().enumerate() {
                slots[offset - base + k] = visited.claim(neighbor).then_some(neighbor);
            }
        }
        return;
    }

    let mid = frontier.len() / 2;
    let (left, right) = slots.split_at_mut(offsets[mid] - base);
    rayon::join(
        || scatter(&frontier[..mid], &offsets[..mid], left, size, visited),
        || scatter(&frontier[mid..], &offsets[mid..], right, size, visited),
    );
}
