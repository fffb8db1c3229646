//! Trial timings are streamed over a channel to a reporter thread, which
//! writes one line per sample and the averages once the sender is dropped.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{BenchError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Sequential,
    Parallel,
}

impl Variant {
    fn label(&self) -> &'static str {
        match self {
            Variant::Sequential => "Sequential",
            Variant::Parallel => "Parallel",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    variant: Variant,
    elapsed: Duration,
}

/// Averages over all trials of one benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub name: &'static str,
    pub trials: usize,
    pub avg_sequential_ms: f32,
    pub avg_parallel_ms: f32,
}

impl Summary {
    pub fn speedup(&self) -> f32 {
        if self.avg_parallel_ms > 0.0 {
            self.avg_sequential_ms / self.avg_parallel_ms
        } else {
            f32::INFINITY
        }
    }
}

pub struct Reporter {
    sender: flume::Sender<Sample>,
    handle: JoinHandle<io::Result<Summary>>,
}

impl Reporter {
    pub fn spawn(name: &'static str, out: Box<dyn Write + Send>) -> Self {
        let (sender, receiver) = flume::unbounded();
        let handle = thread::spawn(move || write_report(name, receiver, out));
        Reporter { sender, handle }
    }

    pub fn record(&self, variant: Variant, elapsed: Duration) -> Result<()> {
        self.sender
            .send(Sample { variant, elapsed })
            .map_err(|_| BenchError::ReporterGone)
    }

    /// Close the channel and wait for the averages.
    pub fn finish(self) -> Result<Summary> {
        drop(self.sender);
        let summary = self.handle.join().map_err(|_| BenchError::ReporterGone)??;
        Ok(summary)
    }
}

/// Run `trials` iterations of `trial` against a fresh reporter.
///
/// The reporter thread is joined even when a trial fails, so the report is
/// fully written before the trial's error is returned.
pub fn run_trials<F>(
    name: &'static str,
    out: Box<dyn Write + Send>,
    trials: usize,
    mut trial: F,
) -> Result<Summary>
where
    F: FnMut(usize, &Reporter) -> Result<()>,
{
    let reporter = Reporter::spawn(name, out);
    let outcome = (0..trials).try_for_each(|i| trial(i, &reporter));
    let summary = reporter.finish();
    outcome?;
    summary
}

fn write_report(
    name: &'static str,
    receiver: flume::Receiver<Sample>,
    mut out: Box<dyn Write + Send>,
) -> io::Result<Summary> {
    let mut sum_seq_ms = 0f32;
    let mut sum_par_ms = 0f32;
    let mut trials = 0usize;

    for sample in receiver.iter() {
        let elapsed_ms = sample.elapsed.as_millis();
        writeln!(
            out,
            "{} {} elapsed in {} ms",
            sample.variant.label(),
            name,
            elapsed_ms
        )?;
        match sample.variant {
            Variant::Sequential => {
                sum_seq_ms += elapsed_ms as f32;
                trials += 1;
            }
            Variant::Parallel => sum_par_ms += elapsed_ms as f32,
        }
    }

    let divisor = trials.max(1) as f32;
    let summary = Summary {
        name,
        trials,
        avg_sequential_ms: sum_seq_ms / divisor,
        avg_parallel_ms: sum_par_ms / divisor,
    };

    writeln!(out, "{}", "-".repeat(40))?;
    writeln!(
        out,
        "Avg sequential {} performance: {} ms",
        name, summary.avg_sequential_ms
    )?;
    writeln!(
        out,
        "Avg parallel {} performance: {} ms",
        name, summary.avg_parallel_ms
    )?;
    out.flush()?;

    Ok(summary)
}

/// Report sink: stdout when `to_stdout` is set, otherwise `dir/file_name`.
pub fn open_output(dir: &Path, file_name: &str, to_stdout: bool) -> Result<Box<dyn Write + Send>> {
    if to_stdout {
        return Ok(Box::new(io::stdout()));
    }
    let file = File::create(dir.join(file_name))?;
    Ok(Box::new(BufWriter::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_report_format_and_averages() {
        let buf = SharedBuf::default();
        let reporter = Reporter::spawn("sort", Box::new(buf.clone()));

        reporter.record(Variant::Sequential, Duration::from_millis(30)).unwrap();
        reporter.record(Variant::Parallel, Duration::from_millis(10)).unwrap();
        reporter.record(Variant::Sequential, Duration::from_millis(50)).unwrap();
        reporter.record(Variant::Parallel, Duration::from_millis(10)).unwrap();

        let summary = reporter.finish().unwrap();
        assert_eq!(summary.trials, 2);
        assert_eq!(summary.avg_sequential_ms, 40.0);
        assert_eq!(summary.avg_parallel_ms, 10.0);
        assert_eq!(summary.speedup(), 4.0);

        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Sequential sort elapsed in 30 ms");
        assert_eq!(lines[1], "Parallel sort elapsed in 10 ms");
        assert_eq!(lines[4], "-".repeat(40));
        assert_eq!(lines[5], "Avg sequential sort performance: 40 ms");
        assert_eq!(lines[6], "Avg parallel sort performance: 10 ms");
    }

    #[test]
    fn test_failed_trial_still_completes_report() {
        let buf = SharedBuf::default();
        let result = run_trials("sort", Box::new(buf.clone()), 5, |trial, reporter| {
            reporter.record(Variant::Sequential, Duration::from_millis(20))?;
            reporter.record(Variant::Parallel, Duration::from_millis(5))?;
            if trial == 1 {
                return Err(BenchError::Verification("bad order".into()));
            }
            Ok(())
        });

        assert!(matches!(result, Err(BenchError::Verification(_))));

        // Two trials ran, and the averages were written before the error returned.
        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[5], "Avg sequential sort performance: 20 ms");
        assert_eq!(lines[6], "Avg parallel sort performance: 5 ms");
    }

    #[test]
    fn test_run_trials_counts_every_trial() {
        let summary = run_trials("bfs", Box::new(io::sink()), 3, |_, reporter| {
            reporter.record(Variant::Sequential, Duration::from_millis(9))?;
            reporter.record(Variant::Parallel, Duration::from_millis(3))
        })
        .unwrap();
        assert_eq!(summary.trials, 3);
        assert_eq!(summary.speedup(), 3.0);
    }

    #[test]
    fn test_empty_report() {
        let reporter = Reporter::spawn("bfs", Box::new(io::sink()));
        let summary = reporter.finish().unwrap();
        assert_eq!(summary.trials, 0);
        assert_eq!(summary.avg_sequential_ms, 0.0);
    }
}
