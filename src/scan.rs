//! Exclusive prefix sum over `usize` counts.
//!
//! The parallel version is the usual two-pass block scan: per-block totals
//! in parallel, a short sequential scan over the totals, then each block is
//! rescanned in parallel starting from its base offset.

use rayon::prelude::*;

/// Inputs shorter than this are scanned on the calling thread.
const SEQUENTIAL_SCAN_LEN: usize = 4096;

/// Smallest block handed to a worker.
const MIN_BLOCK_LEN: usize = 1024;

/// Sequential exclusive scan.
///
/// Returns `(offsets, total)` where `offsets[i]` is the sum of
/// `values[..i]` and `total` is the sum of all values.
pub fn exclusive_scan_sequential(values: &[usize]) -> (Vec<usize>, usize) {
    let mut offsets = Vec::with_capacity(values.len());
    let mut total = 0usize;
    for &v in values {
        offsets.push(total);
        total += v;
    }
    (offsets, total)
}

/// Parallel exclusive scan with the same result as
/// [`exclusive_scan_sequential`].
pub fn exclusive_scan(values: &[usize]) -> (Vec<usize>, usize) {
    if values.len() < SEQUENTIAL_SCAN_LEN {
        return exclusive_scan_sequential(values);
    }

    let block = (values.len() / (rayon::current_num_threads() * 4)).max(MIN_BLOCK_LEN);

    let block_sums: Vec<usize> = values
        .par_chunks(block)
        .map(|chunk| chunk.iter().sum())
        .collect();
    let (block_bases, total) = exclusive_scan_sequential(&block_sums);

    let mut offsets = vec![0usize; values.len()];
    offsets
        .par_chunks_mut(block)
        .zip(values.par_chunks(block))
        .zip(block_bases.par_iter())
        .for_each(|((dst, src), &base)| {
            let mut acc = base;
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = acc;
                acc += s;
            }
        });

    (offsets, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_scan_empty() {
        assert_eq!(exclusive_scan(&[]), (vec![], 0));
    }

    #[test]
    fn test_scan_small() {
        let (offsets, total) = exclusive_scan(&[3, 0, 2, 1]);
        assert_eq!(offsets, vec![0, 3, 3, 5]);
        assert_eq!(total, 6);
    }

    #[test]
    fn test_scan_parallel_matches_sequential() {
        let mut rng = rand::thread_rng();
        let values: Vec<usize> = (0..100_003).map(|_| rng.gen_range(0..=3)).collect();

        let expected = exclusive_scan_sequential(&values);
        let actual = exclusive_scan(&values);

        assert_eq!(actual, expected);
        assert_eq!(actual.1, values.iter().sum::<usize>());
    }
}
