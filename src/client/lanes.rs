//! Background execution lanes.
//!
//! A client dispatches fetch work onto one of two lanes: a serial lane backed
//! by a single worker draining a channel in submission order, and a parallel
//! lane that spawns each unit of work as its own task. The lane is chosen per
//! dispatch call, not per client.

use futures::future::BoxFuture;
use tokio::sync::mpsc;

/// One queued unit of work.
pub(crate) type Job = BoxFuture<'static, ()>;

/// Which execution lane a dispatch call runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// Single worker; jobs run one at a time, in submission order.
    Serial,
    /// One task per job; no ordering between jobs.
    Parallel,
}

/// The lane pair owned by a client. Clones share the same serial worker.
#[derive(Clone)]
pub(crate) struct Lanes {
    serial: mpsc::UnboundedSender<Job>,
}

impl Lanes {
    /// Spawn the serial worker and return the pair.
    ///
    /// Must be called within a Tokio runtime. The worker exits once every
    /// clone of the sending side is gone.
    pub(crate) fn new(label: &str) -> Self {
        let (serial, mut jobs) = mpsc::unbounded_channel::<Job>();
        let lane = format!("{label}.serial");
        tokio::spawn(async move {
            tracing::debug!(%lane, "serial lane worker running");
            while let Some(job) = jobs.recv().await {
                job.await;
            }
            tracing::debug!(%lane, "serial lane worker stopped");
        });

        Lanes { serial }
    }

    /// Submit a job. Serial jobs queue FIFO behind earlier serial jobs;
    /// parallel jobs start independently of everything else.
    pub(crate) fn submit(&self, lane: Lane, job: Job) {
        match lane {
            Lane::Serial => {
                // Sending fails only when the worker is gone, i.e. the owning
                // client is mid-teardown.
                let _ = self.serial.send(job);
            }
            Lane::Parallel => {
                tokio::spawn(job);
            }
        }
    }
}
