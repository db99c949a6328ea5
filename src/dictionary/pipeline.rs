//! Bounded worker pool for scanning discovered files.
//!
//! A parallel map-reduce over file tasks: a feeder thread pushes tasks
//! onto a bounded queue, a fixed pool of workers runs the scan function,
//! and the calling thread reduces outcomes one at a time. The reducer is
//! therefore the only writer of whatever it aggregates into. The first
//! error from any stage raises a shared cancellation flag, unwinds the
//! pool without deadlock, and is returned to the caller.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TrySendError};
use std::thread;
use std::time::Duration;

/// One unit of work: a discovered file plus its position in the sorted
/// enumeration order.
#[derive(Debug, Clone)]
pub struct FileTask {
    pub rank: u32,
    pub path: PathBuf,
}

/// A scanned file's value, tagged with its task identity.
#[derive(Debug)]
pub struct FileOutcome<T> {
    pub rank: u32,
    pub path: PathBuf,
    pub value: T,
}

/// Interval between cancellation checks while the task queue is full.
const FEED_BACKOFF: Duration = Duration::from_millis(1);

/// Run `scan` over every task on `workers` threads, feeding outcomes to
/// `reduce` on the calling thread.
///
/// Tasks are dispatched in order, but outcomes arrive in completion
/// order; callers needing determinism must key on `FileOutcome::rank`.
/// On error the remaining tasks are abandoned and the first error is
/// returned; no partial result is exposed.
pub fn map_reduce_files<T, S, R>(
    tasks: Vec<FileTask>,
    workers: usize,
    capacity: usize,
    scan: S,
    mut reduce: R,
) -> Result<()>
where
    T: Send,
    S: Fn(&FileTask) -> Result<T> + Sync,
    R: FnMut(FileOutcome<T>) -> Result<()>,
{
    let cancel = AtomicBool::new(false);
    let (task_tx, task_rx) = mpsc::sync_channel::<FileTask>(capacity.max(1));
    let (outcome_tx, outcome_rx) = mpsc::sync_channel::<Result<FileOutcome<T>>>(capacity.max(1));
    // mpsc receivers are single-consumer; the pool shares one behind a lock.
    let task_rx = Mutex::new(task_rx);

    thread::scope(|s| {
        let cancel = &cancel;
        let task_rx = &task_rx;
        let scan = &scan;

        s.spawn(move || feed_tasks(tasks, &task_tx, cancel));

        for _ in 0..workers.max(1) {
            let outcome_tx = outcome_tx.clone();
            s.spawn(move || {
                loop {
                    if cancel.load(Ordering::Relaxed) {
                        return;
                    }
                    // Blocking recv unblocks when the feeder hangs up.
                    let task = match next_task(task_rx) {
                        Some(task) => task,
                        None => return,
                    };
                    let outcome = scan(&task).map(|value| FileOutcome {
                        rank: task.rank,
                        path: task.path,
                        value,
                    });
                    // The aggregator drains until all senders hang up, so
                    // this send cannot block forever.
                    if outcome_tx.send(outcome).is_err() {
                        return;
                    }
                }
            });
        }
        // Workers hold the remaining clones; dropping this one lets the
        // drain loop terminate once they finish.
        drop(outcome_tx);

        let mut failure: Option<anyhow::Error> = None;
        for outcome in outcome_rx {
            match outcome {
                Ok(outcome) if failure.is_none() => {
                    if let Err(err) = reduce(outcome) {
                        cancel.store(true, Ordering::Relaxed);
                        failure = Some(err);
                    }
                }
                Err(err) if failure.is_none() => {
                    cancel.store(true, Ordering::Relaxed);
                    failure = Some(err);
                }
                // Keep draining after a failure so no worker blocks on a
                // full outcome queue.
                _ => {}
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    })
}

/// Push tasks onto the bounded queue, checking the cancellation flag
/// instead of blocking indefinitely on a full queue.
fn feed_tasks(tasks: Vec<FileTask>, task_tx: &mpsc::SyncSender<FileTask>, cancel: &AtomicBool) {
    'tasks: for task in tasks {
        let mut pending = task;
        loop {
            if cancel.load(Ordering::Relaxed) {
                break 'tasks;
            }
            match task_tx.try_send(pending) {
                Ok(()) => break,
                Err(TrySendError::Full(task)) => {
                    pending = task;
                    thread::sleep(FEED_BACKOFF);
                }
                Err(TrySendError::Disconnected(_)) => break 'tasks,
            }
        }
    }
}

fn next_task(task_rx: &Mutex<Receiver<FileTask>>) -> Option<FileTask> {
    let rx = task_rx.lock().expect("task queue lock poisoned");
    rx.recv().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn tasks(n: u32) -> Vec<FileTask> {
        (0..n)
            .map(|rank| FileTask {
                rank,
                path: PathBuf::from(format!("file_{rank}.txt")),
            })
            .collect()
    }

    #[test]
    fn test_all_tasks_reduced() {
        let mut seen = Vec::new();
        map_reduce_files(
            tasks(100),
            8,
            4,
            |task| Ok(task.rank * 2),
            |outcome| {
                seen.push((outcome.rank, outcome.value));
                Ok(())
            },
        )
        .unwrap();
        seen.sort_unstable();
        let expected: Vec<_> = (0..100).map(|r| (r, r * 2)).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_scan_error_aborts() {
        let err = map_reduce_files(
            tasks(500),
            4,
            2,
            |task| {
                if task.rank == 42 {
                    Err(anyhow!("unreadable: {}", task.path.display()))
                } else {
                    Ok(task.rank)
                }
            },
            |_| Ok(()),
        )
        .unwrap_err();
        assert!(err.to_string().contains("unreadable"));
    }

    #[test]
    fn test_reduce_error_aborts() {
        let err = map_reduce_files(
            tasks(500),
            4,
            2,
            |task| Ok(task.rank),
            |outcome| {
                if outcome.value >= 10 {
                    Err(anyhow!("aggregation failed"))
                } else {
                    Ok(())
                }
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("aggregation failed"));
    }

    #[test]
    fn test_no_tasks() {
        map_reduce_files(
            Vec::new(),
            4,
            2,
            |_| Ok(()),
            |_: FileOutcome<()>| panic!("nothing to reduce"),
        )
        .unwrap();
    }

    #[test]
    fn test_single_worker_preserves_dispatch_order() {
        let mut ranks = Vec::new();
        map_reduce_files(
            tasks(50),
            1,
            1,
            |task| Ok(task.rank),
            |outcome| {
                ranks.push(outcome.rank);
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(ranks, (0..50).collect::<Vec<_>>());
    }
}
