//! Background job runner service
//!
//! Runs blocking API calls on worker threads and hands their results back
//! to the event loop through a channel. Nothing is cancelled: every job
//! that was spawned eventually yields exactly one outcome.

use crate::error::ApiError;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

/// A job running on a worker thread
struct BackgroundJob<T> {
    receiver: Receiver<Result<T, ApiError>>,
    start_instant: Instant,
    label: String,
}

/// A finished job
#[derive(Debug)]
pub struct JobOutcome<T> {
    pub label: String,
    pub result: Result<T, ApiError>,
    pub elapsed: Duration,
}

/// Job runner for one kind of request
pub struct JobRunner<T> {
    jobs: Vec<BackgroundJob<T>>,
}

impl<T> Default for JobRunner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> JobRunner<T> {
    pub fn new() -> Self {
        Self { jobs: Vec::new() }
    }

    /// Number of spawned jobs that have not been polled to completion
    pub fn in_flight(&self) -> usize {
        self.jobs.len()
    }
}

impl<T: Send + 'static> JobRunner<T> {
    /// Spawn a new background job
    pub fn spawn<F>(&mut self, label: impl Into<String>, task: F)
    where
        F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let label = label.into();
        tracing::debug!(job = %label, "spawning job");

        thread::spawn(move || {
            let _ = tx.send(task());
        });

        self.jobs.push(BackgroundJob {
            receiver: rx,
            start_instant: Instant::now(),
            label,
        });
    }

    /// Collect finished jobs in spawn order
    pub fn poll(&mut self) -> Vec<JobOutcome<T>> {
        let mut finished = Vec::new();

        self.jobs.retain(|job| {
            let result = match job.receiver.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => Err(ApiError::Transport(
                    "worker exited without a response".to_string(),
                )),
            };
            finished.push(JobOutcome {
                label: job.label.clone(),
                result,
                elapsed: job.start_instant.elapsed(),
            });
            false
        });

        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll_until_done<T: Send + 'static>(runner: &mut JobRunner<T>) -> Vec<JobOutcome<T>> {
        let mut outcomes = Vec::new();
        for _ in 0..500 {
            outcomes.extend(runner.poll());
            if runner.in_flight() == 0 {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        outcomes
    }

    #[test]
    fn test_job_result_is_delivered() {
        let mut runner = JobRunner::new();
        runner.spawn("answer", || Ok(42));
        assert_eq!(runner.in_flight(), 1);

        let outcomes = poll_until_done(&mut runner);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].label, "answer");
        assert_eq!(outcomes[0].result, Ok(42));
        assert_eq!(runner.in_flight(), 0);
    }

    #[test]
    fn test_job_error_is_delivered() {
        let mut runner: JobRunner<()> = JobRunner::new();
        runner.spawn("fail", || Err(ApiError::Status(503)));
        let outcomes = poll_until_done(&mut runner);
        assert_eq!(outcomes[0].result, Err(ApiError::Status(503)));
    }

    #[test]
    fn test_panicking_worker_reports_transport_error() {
        let mut runner: JobRunner<()> = JobRunner::new();
        runner.spawn("boom", || panic!("worker crashed"));
        let outcomes = poll_until_done(&mut runner);
        assert!(matches!(outcomes[0].result, Err(ApiError::Transport(_))));
    }

    #[test]
    fn test_multiple_jobs_all_complete() {
        let mut runner = JobRunner::new();
        for i in 0..3 {
            runner.spawn(format!("job-{}", i), move || Ok(i));
        }
        let mut values: Vec<_> = poll_until_done(&mut runner)
            .into_iter()
            .filter_map(|o| o.result.ok())
            .collect();
        values.sort();
        assert_eq!(values, vec![0, 1, 2]);
    }

    #[test]
    fn test_poll_with_no_jobs() {
        let mut runner: JobRunner<u8> = JobRunner::new();
        assert!(runner.poll().is_empty());
    }
}
