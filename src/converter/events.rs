use std::path::PathBuf;
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};

use super::job::{CollisionDecision, JobSummary};

/// Events the worker emits toward the UI. Progress events arrive in file
/// order with non-decreasing percentages; `Finished` arrives exactly once,
/// after the last progress event.
pub enum WorkerEvent {
    /// Percent of files visited so far, in 0..=100.
    Progress(u8),
    /// The destination already exists and the sticky policy does not cover
    /// it. The worker is blocked until exactly one decision is sent on
    /// `reply`; it performs no writes while waiting.
    Collision {
        source: PathBuf,
        dest: PathBuf,
        reply: SyncSender<CollisionDecision>,
    },
    Finished(JobSummary),
}

/// One-shot rendezvous carrying the answer to a single collision question.
pub(crate) fn reply_channel() -> (SyncSender<CollisionDecision>, Receiver<CollisionDecision>) {
    sync_channel(0)
}
