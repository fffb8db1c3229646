use std::io::Write;
use std::time::Instant;

use parbench::{parallel_quicksort_with_config, sequential_quicksort, SortConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::report::{run_trials, Summary, Variant};
use super::{BenchError, Result};

#[derive(Debug, Clone)]
pub struct QuicksortParams {
    /// Number of elements to sort. Values are drawn from `1..=length`.
    pub length: usize,
    pub trials: usize,
    pub cutover: usize,
    /// Fixed seed for reproducible input; entropy when unset.
    pub seed: Option<u64>,
}

pub fn quicksort(params: &QuicksortParams, out: Box<dyn Write + Send>) -> Result<Summary> {
    if params.length == 0 || params.length > i32::MAX as usize {
        return Err(BenchError::InvalidParameter(format!(
            "length must be in 1..={}, got {}",
            i32::MAX,
            params.length
        )));
    }
    if params.trials == 0 {
        return Err(BenchError::InvalidParameter("trials must be positive".into()));
    }

    log::info!(
        "Quicksort of {} integers, {} trials, cutover {}, {} worker threads",
        params.length,
        params.trials,
        params.cutover,
        rayon::current_num_threads()
    );

    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let config = SortConfig::new().with_cutover(params.cutover);
    let length = params.length;
    let max_value = length as i32;

    run_trials("sort", out, params.trials, |trial, reporter| {
        let mut seq_array: Vec<i32> = (0..length)
            .map(|_| rng.gen_range(1..=max_value))
            .collect();
        let mut par_array = seq_array.clone();

        let start_time = Instant::now();
        sequential_quicksort(&mut seq_array);
        let elapsed = start_time.elapsed();
        log::info!("Trial {}: sequential sort took {:?}", trial, elapsed);
        reporter.record(Variant::Sequential, elapsed)?;

        let start_time = Instant::now();
        let stats = parallel_quicksort_with_config(&mut par_array, &config);
        let elapsed = start_time.elapsed();
        log::info!(
            "Trial {}: parallel sort took {:?} ({} forks)",
            trial,
            elapsed,
            stats.forks
        );
        reporter.record(Variant::Parallel, elapsed)?;

        verify(&seq_array, &par_array)
    })
}

fn verify(seq_array: &[i32], par_array: &[i32]) -> Result<()> {
    if let Some(i) = seq_array.windows(2).position(|w| w[0] > w[1]) {
        return Err(BenchError::Verification(format!(
            "sequential sort out of order at index {}",
            i
        )));
    }
    if seq_array != par_array {
        return Err(BenchError::Verification(
            "parallel sort disagrees with sequential sort".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quicksort_benchmark_runs() {
        let params = QuicksortParams {
            length: 20_000,
            trials: 2,
            cutover: 256,
            seed: Some(7),
        };
        let summary = quicksort(&params, Box::new(std::io::sink())).unwrap();
        assert_eq!(summary.name, "sort");
        assert_eq!(summary.trials, 2);
    }

    #[test]
    fn test_quicksort_rejects_zero_trials() {
        let params = QuicksortParams {
            length: 10,
            trials: 0,
            cutover: 1,
            seed: None,
        };
        let result = quicksort(&params, Box::new(std::io::sink()));
        assert!(matches!(result, Err(BenchError::InvalidParameter(_))));
    }

    #[test]
    fn test_verify_catches_mismatch() {
        assert!(verify(&[1, 2, 3], &[1, 2, 3]).is_ok());
        assert!(matches!(
            verify(&[1, 2, 3], &[1, 3, 2]),
            Err(BenchError::Verification(_))
        ));
        assert!(matches!(
            verify(&[2, 1], &[2, 1]),
            Err(BenchError::Verification(_))
        ));
    }
}
