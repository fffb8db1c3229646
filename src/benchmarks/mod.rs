mod bfs;
mod quicksort;
mod report;

// Re-export benchmark functions directly.
pub use bfs::{bfs, BfsParams};
pub use quicksort::{quicksort, QuicksortParams};
pub use report::{open_output, Summary};

/// Errors surfaced by the benchmark driver. The algorithms themselves cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// Writing the report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The rayon global pool could not be configured.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A benchmark parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An algorithm produced a wrong result.
    #[error("Verification failed: {0}")]
    Verification(String),

    /// The reporter thread went away before the benchmark finished.
    #[error("Reporter thread stopped unexpectedly")]
    ReporterGone,
}

pub type Result<T> = std::result::Result<T, BenchError>;
