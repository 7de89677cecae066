//! Single-consumer mutation executor.
//!
//! The host only permits document mutation from one designated thread. The
//! bridge models that as a dedicated worker owning the document and draining
//! a job queue; callers submit a closure and block until the worker returns
//! its result. Connection threads never touch the document directly.

use std::sync::mpsc;
use std::thread;

use thiserror::Error;
use tracing::debug;

use super::HostDocument;

/// Tracing target for mutation-thread activity.
const MUTATION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::mutation");

type MutationJob = Box<dyn FnOnce(&dyn HostDocument) + Send>;

/// Errors surfaced while marshaling work onto the mutation thread.
#[derive(Debug, Error)]
pub enum MutationError {
    /// The worker exited before the job could run or reply.
    #[error("mutation thread is no longer running")]
    WorkerGone,
}

/// Owns the host document and the single thread allowed to mutate it.
pub struct MutationThread {
    sender: Option<mpsc::Sender<MutationJob>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl MutationThread {
    /// Moves the document onto a fresh worker thread and starts draining jobs.
    #[must_use]
    pub fn spawn(document: Box<dyn HostDocument>) -> Self {
        let (sender, receiver) = mpsc::channel::<MutationJob>();
        let worker = thread::spawn(move || {
            debug!(target: MUTATION_TARGET, "mutation worker started");
            for job in receiver {
                job(document.as_ref());
            }
            debug!(target: MUTATION_TARGET, "mutation worker stopped");
        });
        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    /// Runs `job` on the mutation thread and blocks until it returns.
    ///
    /// Jobs submitted from different threads are serialised by the queue, so
    /// each job observes the document atomically.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::WorkerGone`] when the worker has exited, e.g.
    /// after a job panicked.
    pub fn run<T, F>(&self, job: F) -> Result<T, MutationError>
    where
        F: FnOnce(&dyn HostDocument) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (reply, response) = mpsc::sync_channel(1);
        let sender = self.sender.as_ref().ok_or(MutationError::WorkerGone)?;
        sender
            .send(Box::new(move |document| {
                let _ = reply.send(job(document));
            }))
            .map_err(|_| MutationError::WorkerGone)?;
        response.recv().map_err(|_| MutationError::WorkerGone)
    }
}

impl Drop for MutationThread {
    fn drop(&mut self) {
        // Dropping the sender ends the worker's receive loop.
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StubHostDocument;

    #[test]
    fn jobs_run_on_a_single_dedicated_thread() {
        let mutation = MutationThread::spawn(Box::new(StubHostDocument::default()));
        let caller = thread::current().id();
        let first = mutation
            .run(|_| thread::current().id())
            .expect("first job should run");
        let second = mutation
            .run(|_| thread::current().id())
            .expect("second job should run");
        assert_eq!(first, second, "all jobs share one worker thread");
        assert_ne!(first, caller, "jobs never run on the caller's thread");
    }

    #[test]
    fn jobs_observe_the_document() {
        let mutation = MutationThread::spawn(Box::new(StubHostDocument::default()));
        let begun = mutation
            .run(|document| {
                let record = document.begin_undo_record("probe");
                document.end_undo_record(record);
                record
            })
            .expect("job should run");
        assert_eq!(begun.0, 1);
    }

    #[test]
    fn concurrent_submissions_all_complete() {
        let mutation = std::sync::Arc::new(MutationThread::spawn(Box::new(
            StubHostDocument::default(),
        )));
        let handles: Vec<_> = (0..8)
            .map(|index| {
                let mutation = std::sync::Arc::clone(&mutation);
                thread::spawn(move || mutation.run(move |_| index).expect("job should run"))
            })
            .collect();
        let mut results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("submitter thread"))
            .collect();
        results.sort_unstable();
        assert_eq!(results, (0..8).collect::<Vec<_>>());
    }
}
