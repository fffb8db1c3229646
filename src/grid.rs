//! The implicit cubic lattice graph.
//!
//! The lattice is never materialized. A vertex `(x, y, z)` has an edge to each
//! vertex obtained by incrementing exactly one coordinate, as long as the result
//! stays inside `[0, size)`. Every edge increases the coordinate sum by one, so
//! the graph is acyclic and every lattice point is reachable from the origin.
//!
//! Visited sets are flat arrays addressed by `x*size*size + y*size + z`:
//! - [`Visited`]: plain flags, written by a single thread
//! - [`AtomicVisited`]: atomic flags, claimed concurrently with test-and-set

use rayon::prelude::*;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicBool, Ordering};

/// Neighbors of a single vertex. There are never more than three.
pub type Neighbors = SmallVec<[Vertex; 3]>;

/// A lattice point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Vertex {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Vertex {
    /// The corner every traversal in the benchmark starts from.
    pub const ORIGIN: Vertex = Vertex::new(0, 0, 0);

    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Vertex { x, y, z }
    }

    /// Forward neighbors inside a cube of side `size`.
    ///
    /// Each coordinate is tested against the bound on its own, so a vertex on
    /// an edge of the cube has two neighbors and the far corner has none.
    pub fn neighbors(&self, size: u32) -> Neighbors {
        debug_assert!(self.in_bounds(size), "{:?} outside cube of side {}", self, size);
        let mut out = Neighbors::new();
        if self.x + 1 < size {
            out.push(Vertex::new(self.x + 1, self.y, self.z));
        }
        if self.y + 1 < size {
            out.push(Vertex::new(self.x, self.y + 1, self.z));
        }
        if self.z + 1 < size {
            out.push(Vertex::new(self.x, self.y, self.z + 1));
        }
        out
    }

    /// Same as `self.neighbors(size).len()` without building the list.
    pub fn neighbor_count(&self, size: u32) -> usize {
        (self.x + 1 < size) as usize + (self.y + 1 < size) as usize + (self.z + 1 < size) as usize
    }

    /// Position of this vertex in a flat visited array.
    pub fn index(&self, size: u32) -> usize {
        let size = size as usize;
        (self.x as usize * size + self.y as usize) * size + self.z as usize
    }

    /// Inverse of [`Vertex::index`].
    pub fn from_index(index: usize, size: u32) -> Self {
        let size = size as usize;
        Vertex::new(
            (index / (size * size)) as u32,
            (index / size % size) as u32,
            (index % size) as u32,
        )
    }

    pub fn in_bounds(&self, size: u32) -> bool {
        self.x < size && self.y < size && self.z < size
    }
}

/// Free-function form of [`Vertex::neighbors`].
pub fn neighbors(vertex: Vertex, size: u32) -> Neighbors {
    vertex.neighbors(size)
}

/// Number of lattice points in a cube of side `size`.
pub fn vertex_count(size: u32) -> usize {
    let size = size as usize;
    size * size * size
}

/// Dense visited set, one flag per lattice point.
///
/// Flags are only ever set, never cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visited {
    size: u32,
    flags: Vec<bool>,
}

impl Visited {
    pub fn new(size: u32) -> Self {
        assert!(size > 0, "lattice side must be positive");
        Visited {
            size,
            flags: vec![false; vertex_count(size)],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn contains(&self, vertex: Vertex) -> bool {
        self.flags[vertex.index(self.size)]
    }

    /// Mark `vertex`. Returns true if it was not marked before.
    pub fn insert(&mut self, vertex: Vertex) -> bool {
        let flag = &mut self.flags[vertex.index(self.size)];
        !std::mem::replace(flag, true)
    }

    /// Number of marked vertices.
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// Marked vertices in index order.
    pub fn iter(&self) -> impl Iterator<Item = Vertex> + '_ {
        let size = self.size;
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, f)| **f)
            .map(move |(i, _)| Vertex::from_index(i, size))
    }
}

/// Visited set shared between worker threads.
///
/// The only way to set a flag is [`AtomicVisited::claim`], so for every vertex
/// exactly one caller ever sees the unclaimed state.
#[derive(Debug)]
pub struct AtomicVisited {
    size: u32,
    flags: Vec<AtomicBool>,
}

impl AtomicVisited {
    pub fn new(size: u32) -> Self {
        assert!(size > 0, "lattice side must be positive");
        let flags = (0..vertex_count(size))
            .into_par_iter()
            .map(|_| AtomicBool::new(false))
            .collect();
        AtomicVisited { size, flags }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Atomic test-and-set. Returns true if this call claimed the vertex.
    ///
    /// Relaxed is enough: the flag publishes no other data, and the swap alone
    /// makes claims on one vertex mutually exclusive.
    pub fn claim(&self, vertex: Vertex) -> bool {
        !self.flags[vertex.index(self.size)].swap(true, Ordering::Relaxed)
    }

    pub fn is_claimed(&self, vertex: Vertex) -> bool {
        self.flags[vertex.index(self.size)].load(Ordering::Relaxed)
    }

    /// Number of claimed vertices.
    pub fn count(&self) -> usize {
        self.flags
            .par_iter()
            .filter(|f| f.load(Ordering::Relaxed))
            .count()
    }

    /// Snapshot into a plain [`Visited`] once no claimers remain.
    pub fn into_visited(self) -> Visited {
        let flags = self
            .flags
            .into_par_iter()
            .map(AtomicBool::into_inner)
            .collect();
        Visited {
            size: self.size,
            flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_interior_vertex_has_three_neighbors() {
        let n = Vertex::new(1, 1, 1).neighbors(4);
        assert_eq!(
            n.as_slice(),
            &[Vertex::new(2, 1, 1), Vertex::new(1, 2, 1), Vertex::new(1, 1, 2)]
        );
    }

    #[test]
    fn test_far_corner_has_no_neighbors() {
        assert!(Vertex::new(2, 2, 2).neighbors(3).is_empty());
        assert_eq!(Vertex::new(2, 2, 2).neighbor_count(3), 0);
    }

    #[test]
    fn test_edge_vertex_bounds_each_coordinate() {
        let n = neighbors(Vertex::new(2, 0, 2), 3);
        assert_eq!(n.as_slice(), &[Vertex::new(2, 1, 2)]);
    }

    #[test]
    fn test_size_one_has_no_edges() {
        assert!(Vertex::ORIGIN.neighbors(1).is_empty());
        assert_eq!(vertex_count(1), 1);
    }

    #[test]
    fn test_flat_index_layout() {
        assert_eq!(Vertex::new(0, 0, 1).index(10), 1);
        assert_eq!(Vertex::new(0, 1, 0).index(10), 10);
        assert_eq!(Vertex::new(1, 0, 0).index(10), 100);
        assert_eq!(Vertex::new(9, 9, 9).index(10), 999);
    }

    #[test]
    fn test_visited_insert_once() {
        let mut visited = Visited::new(2);
        assert!(visited.insert(Vertex::new(1, 0, 1)));
        assert!(!visited.insert(Vertex::new(1, 0, 1)));
        assert!(visited.contains(Vertex::new(1, 0, 1)));
        assert!(!visited.contains(Vertex::new(0, 0, 1)));
        assert_eq!(visited.count(), 1);
        assert_eq!(visited.iter().collect::<Vec<_>>(), vec![Vertex::new(1, 0, 1)]);
    }

    #[test]
    fn test_atomic_claim_exactly_once() {
        let visited = AtomicVisited::new(4);
        let v = Vertex::new(3, 2, 1);
        let winners = (0..64)
            .into_par_iter()
            .filter(|_| visited.claim(v))
            .count();
        assert_eq!(winners, 1);
        assert!(visited.is_claimed(v));

        let snapshot = visited.into_visited();
        assert_eq!(snapshot.count(), 1);
        assert!(snapshot.contains(v));
    }

    proptest! {
        #[test]
        fn index_round_trips(size in 1u32..20, x in 0u32..20, y in 0u32..20, z in 0u32..20) {
            let v = Vertex::new(x % size, y % size, z % size);
            let i = v.index(size);
            prop_assert!(i < vertex_count(size));
            prop_assert_eq!(Vertex::from_index(i, size), v);
        }

        #[test]
        fn neighbors_step_one_coordinate(size in 1u32..8, x in 0u32..8, y in 0u32..8, z in 0u32..8) {
            let v = Vertex::new(x % size, y % size, z % size);
            let n = v.neighbors(size);
            prop_assert_eq!(n.len(), v.neighbor_count(size));
            for w in n {
                prop_assert!(w.in_bounds(size));
                prop_assert_eq!(w.x + w.y + w.z, v.x + v.y + v.z + 1);
            }
        }
    }
}
