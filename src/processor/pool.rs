use super::ProcessingReport;
use crate::error::SignalResult;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::thread;

/// Run `task` on every path using a fixed pool of worker threads
///
/// Paths are handed out through a shared queue, so completion order is
/// unspecified. A failing path is logged and recorded in the report; the
/// remaining paths still run.
pub fn run_parallel<F>(paths: Vec<PathBuf>, workers: usize, task: F) -> ProcessingReport
where
    F: Fn(&Path) -> SignalResult<PathBuf> + Sync,
{
    let total = paths.len();
    let workers = workers.clamp(1, total.max(1));
    let (job_tx, job_rx) = crossbeam_channel::unbounded::<PathBuf>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded();

    for path in paths {
        // The queue is unbounded and `job_rx` is still alive.
        let _ = job_tx.send(path);
    }
    drop(job_tx);

    let mut report = ProcessingReport::default();

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let task = &task;
            scope.spawn(move || {
                for path in job_rx.iter() {
                    let result = task(&path);
                    if result_tx.send((path, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        for (path, result) in result_rx.iter() {
            match result {
                Ok(output) => {
                    info!("[{}/{}] {:?} -> {:?}", report.total() + 1, total, path, output);
                    report.written.push(output);
                }
                Err(err) => {
                    error!("[{}/{}] {:?} failed: {}", report.total() + 1, total, path, err);
                    report.failed.push((path, err));
                }
            }
        }
    });

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SignalError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_run_parallel_collects_all() {
        let paths: Vec<PathBuf> = (0..20).map(|i| PathBuf::from(format!("{}.wav", i))).collect();
        let calls = AtomicUsize::new(0);

        let report = run_parallel(paths, 4, |path| {
            calls.fetch_add(1, Ordering::Relaxed);
            Ok(path.with_extension("json"))
        });

        assert_eq!(calls.load(Ordering::Relaxed), 20);
        assert!(report.is_success());
        let mut written = report.written;
        written.sort();
        let mut expected: Vec<PathBuf> =
            (0..20).map(|i| PathBuf::from(format!("{}.json", i))).collect();
        expected.sort();
        assert_eq!(written, expected);
    }

    #[test]
    fn test_run_parallel_isolates_failures() {
        let paths: Vec<PathBuf> = (0..10).map(|i| PathBuf::from(format!("{}.wav", i))).collect();

        let report = run_parallel(paths, 3, |path| {
            if path == Path::new("3.wav") || path == Path::new("7.wav") {
                Err(SignalError::ProcessingError("broken".to_string()))
            } else {
                Ok(path.to_path_buf())
            }
        });

        assert_eq!(report.total(), 10);
        assert_eq!(report.written.len(), 8);
        let mut failed: Vec<PathBuf> = report.failed.into_iter().map(|(path, _)| path).collect();
        failed.sort();
        assert_eq!(failed, vec![PathBuf::from("3.wav"), PathBuf::from("7.wav")]);
    }

    #[test]
    fn test_run_parallel_empty() {
        let report = run_parallel(Vec::new(), 8, |path| Ok(path.to_path_buf()));
        assert_eq!(report.total(), 0);
        assert!(report.is_success());
    }
}
