//! Sequential and parallel versions of two classic algorithms, for timing
//! against each other:
//!
//! - **BFS** over an implicit cubic lattice, where the parallel version is
//!   level-synchronous with atomic claims and prefix-sum frontier compaction
//! - **Quicksort** with Lomuto partitioning, where the parallel version forks
//!   both recursive calls above a sequential cutover
//!
//! Parallel work runs on the rayon global pool.
//!
//! # Example
//!
//! ```
//! use parbench::{parallel_bfs, parallel_quicksort, Vertex};
//!
//! let visited = parallel_bfs(Vertex::ORIGIN, 4);
//! assert_eq!(visited.count(), 64);
//!
//! let mut data = vec![5, 3, 8, 3, 1];
//! parallel_quicksort(&mut data);
//! assert_eq!(data, vec![1, 3, 3, 5, 8]);
//! ```

pub mod bfs;
pub mod grid;
pub mod quicksort;
pub mod scan;

pub use bfs::{parallel_bfs, parallel_bfs_with_stats, sequential_bfs, BfsStats};
pub use grid::{neighbors, vertex_count, AtomicVisited, Neighbors, Vertex, Visited};
pub use quicksort::{
    parallel_quicksort, parallel_quicksort_with_config, partition, sequential_quicksort,
    SortConfig, SortStats, DEFAULT_CUTOVER,
};
pub use scan::{exclusive_scan, exclusive_scan_sequential};
