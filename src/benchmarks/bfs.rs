use std::io::Write;
use std::time::Instant;

use parbench::{parallel_bfs, sequential_bfs, vertex_count, Vertex};

use super::report::{run_trials, Summary, Variant};
use super::{BenchError, Result};

#[derive(Debug, Clone)]
pub struct BfsParams {
    /// Side length of the lattice cube.
    pub size: u32,
    pub trials: usize,
}

pub fn bfs(params: &BfsParams, out: Box<dyn Write + Send>) -> Result<Summary> {
    if params.size == 0 {
        return Err(BenchError::InvalidParameter("cube size must be positive".into()));
    }
    if params.trials == 0 {
        return Err(BenchError::InvalidParameter("trials must be positive".into()));
    }

    log::info!(
        "BFS over a {0}x{0}x{0} lattice, {1} trials, {2} worker threads",
        params.size,
        params.trials,
        rayon::current_num_threads()
    );

    let size = params.size;
    let root = Vertex::ORIGIN;

    run_trials("bfs", out, params.trials, |trial, reporter| {
        let start_time = Instant::now();
        let visited = sequential_bfs(root, size);
        let elapsed = start_time.elapsed();
        log::info!("Trial {}: sequential bfs took {:?}", trial, elapsed);
        reporter.record(Variant::Sequential, elapsed)?;
        verify(visited.count(), size, "sequential")?;

        let start_time = Instant::now();
        let visited = parallel_bfs(root, size);
        let elapsed = start_time.elapsed();
        log::info!("Trial {}: parallel bfs took {:?}", trial, elapsed);
        reporter.record(Variant::Parallel, elapsed)?;
        verify(visited.count(), size, "parallel")
    })
}

fn verify(visited: usize, size: u32, variant: &str) -> Result<()> {
    let expected = vertex_count(size);
    if visited != expected {
        return Err(BenchError::Verification(format!(
            "{} bfs visited {} of {} vertices",
            variant, visited, expected
        )));
    }
    Ok(())
}
