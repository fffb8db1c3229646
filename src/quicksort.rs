//! In-place quicksort with Lomuto partitioning.
//!
//! Both variants share [`partition`]. The parallel variant forks the two
//! recursive calls with `rayon::join` and hands any slice of at most
//! [`SortConfig::cutover`] elements to the sequential routine. A split whose
//! smaller side is at or below the cutover does not fork: that side is sorted
//! sequentially and the larger side is processed in the same task.
//!
//! A subrange `left..=right` of an array is passed as the subslice
//! `&mut array[left..=right]`. After partitioning, the two halves come from
//! `split_at_mut`, so the forked tasks own disjoint memory.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Slices of this many elements or fewer are sorted sequentially.
pub const DEFAULT_CUTOVER: usize = 1000;

/// Parallel quicksort configuration.
#[derive(Debug, Clone)]
pub struct SortConfig {
    /// Largest slice length sorted without forking.
    pub cutover: usize,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            cutover: DEFAULT_CUTOVER,
        }
    }
}

impl SortConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sequential cutover.
    pub fn with_cutover(mut self, cutover: usize) -> Self {
        self.cutover = cutover;
        self
    }
}

/// Counters collected by [`parallel_quicksort_with_config`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortStats {
    /// Number of fork-join points executed.
    pub forks: usize,
}

/// Lomuto partition around the last element.
///
/// Returns the final index of the pivot. Every element before it is `<=` the
/// pivot and every element after it is `>` the pivot.
///
/// # Panics
///
/// Panics if `data` is empty.
pub fn partition<T: Ord>(data: &mut [T]) -> usize {
    let right = data.len() - 1;
    let mut low = 0;
    for i in 0..right {
        if data[i] <= data[right] {
            data.swap(i, low);
            low += 1;
        }
    }
    data.swap(right, low);
    low
}

/// Single-threaded quicksort.
///
/// Recurses into the shorter side and loops on the longer one, so the stack
/// stays logarithmic even on sorted input.
pub fn sequential_quicksort<T: Ord>(mut data: &mut [T]) {
    while data.len() > 1 {
        let pivot = partition(data);
        let (low, rest) = std::mem::take(&mut data).split_at_mut(pivot);
        let high = &mut rest[1..];
        if low.len() < high.len() {
            sequential_quicksort(low);
            data = high;
        } else {
            sequential_quicksort(high);
            data = low;
        }
    }
}

/// Fork-join quicksort with the default cutover. Blocks until the whole
/// task tree has finished.
pub fn parallel_quicksort<T: Ord + Send>(data: &mut [T]) {
    parallel_quicksort_with_config(data, &SortConfig::default());
}

/// Fork-join quicksort with an explicit cutover.
pub fn parallel_quicksort_with_config<T: Ord + Send>(
    data: &mut [T],
    config: &SortConfig,
) -> SortStats {
    let forks = AtomicUsize::new(0);
    fork_join_sort(data, config.cutover, &forks);

    let stats = SortStats {
        forks: forks.into_inner(),
    };
    log::debug!(
        "parallel quicksort of {} elements: {} forks (cutover {})",
        data.len(),
        stats.forks,
        config.cutover
    );
    stats
}

/// Forks only when both sides of a split are above the cutover. A small side
/// is sorted in place and the loop continues on the large one, so the fork
/// depth stays bounded on sorted, reverse-sorted and all-equal input.
fn fork_join_sort<T: Ord + Send>(mut data: &mut [T], cutover: usize, forks: &AtomicUsize) {
    loop {
        if data.len() <= 1 {
            return;
        }
        if data.len() <= cutover {
            sequential_quicksort(data);
            return;
        }

        let pivot = partition(data);
        let (low, rest) = std::mem::take(&mut data).split_at_mut(pivot);
        let high = &mut rest[1..];
        let (small, large) = if low.len() <= high.len() {
            (low, high)
        } else {
            (high, low)
        };

        if small.len() <= cutover {
            sequential_quicksort(small);
            data = large;
            continue;
        }

        forks.fetch_add(1, Ordering::Relaxed);
        rayon::join(
            || fork_join_sort(small, cutover, forks),
            || fork_join_sort(large, cutover, forks),
        );
        return;
    }
}
