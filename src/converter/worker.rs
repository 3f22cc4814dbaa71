use std::error::Error as _;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{info, warn};

use super::codec::{ImageCodec, StandardCodec};
use super::events::{WorkerEvent, reply_channel};
use super::job::{
    CollisionDecision, CollisionPolicy, ConversionJob, JPEG_QUALITY, JobSummary, Resolution,
};
use crate::error::ConvertError;

/// Handle to a running conversion worker. The thread owns the job; the
/// handle only carries the event stream back to the UI.
pub struct WorkerHandle {
    events: Receiver<WorkerEvent>,
    thread: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn events(&self) -> &Receiver<WorkerEvent> {
        &self.events
    }

    /// Non-blocking poll, for once-per-frame draining from the UI.
    pub fn try_event(&self) -> Option<WorkerEvent> {
        self.events.try_recv().ok()
    }

    pub fn join(self) {
        let _ = self.thread.join();
    }
}

/// Spawns one background worker for `job`. The caller must have validated
/// the job first.
pub fn spawn(job: ConversionJob) -> WorkerHandle {
    spawn_with_codec(job, Arc::new(StandardCodec))
}

pub fn spawn_with_codec(job: ConversionJob, codec: Arc<dyn ImageCodec>) -> WorkerHandle {
    let (tx, rx) = mpsc::channel();
    let thread = thread::spawn(move || {
        let summary = run_job(&job, codec.as_ref(), &tx);
        let _ = tx.send(WorkerEvent::Finished(summary));
    });
    WorkerHandle { events: rx, thread }
}

fn run_job(job: &ConversionJob, codec: &dyn ImageCodec, events: &Sender<WorkerEvent>) -> JobSummary {
    let total = job.files.len();
    info!(
        "Converting {} files to {} in {}",
        total,
        job.format.as_str(),
        job.output_dir.display()
    );

    let mut runner = Runner {
        policy: CollisionPolicy::default(),
        codec,
        events,
    };
    let mut converted = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for (idx, file) in job.files.iter().enumerate() {
        match runner.process_file(file, job) {
            Ok(FileOutcome::Converted) => converted += 1,
            Ok(FileOutcome::Skipped) => skipped += 1,
            Ok(FileOutcome::Cancelled) => {
                info!("Conversion cancelled after {idx} of {total} files");
                return JobSummary::cancelled(converted, skipped, failed);
            }
            Err(err) => {
                failed += 1;
                match err.source() {
                    Some(cause) => warn!("{err}: {cause}"),
                    None => warn!("{err}"),
                }
            }
        }

        // Progress tracks files visited, not files converted.
        let percent = ((idx + 1) * 100 / total) as u8;
        if events.send(WorkerEvent::Progress(percent)).is_err() {
            // The UI hung up; nobody is listening and nobody could answer a
            // collision question, so stop here.
            return JobSummary::cancelled(converted, skipped, failed);
        }
    }

    let summary = JobSummary::finished(converted, skipped, failed);
    info!("Conversion finished: {converted} converted, {skipped} skipped, {failed} failed");
    summary
}

enum FileOutcome {
    Converted,
    Skipped,
    Cancelled,
}

struct Runner<'a> {
    policy: CollisionPolicy,
    codec: &'a dyn ImageCodec,
    events: &'a Sender<WorkerEvent>,
}

impl Runner<'_> {
    fn process_file(
        &mut self,
        source: &Path,
        job: &ConversionJob,
    ) -> Result<FileOutcome, ConvertError> {
        let image = self.codec.decode(source).map_err(|e| ConvertError::Decode {
            path: source.to_path_buf(),
            source: e,
        })?;

        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ConvertError::InvalidFileName(source.to_path_buf()))?;
        let dest = job
            .output_dir
            .join(format!("{stem}.{}", job.format.extension()));

        if dest.exists() {
            match self.policy.resolve() {
                Some(Resolution::Skip) => return Ok(FileOutcome::Skipped),
                Some(Resolution::Overwrite) => {}
                None => match self.ask(source, &dest) {
                    CollisionDecision::Skip => return Ok(FileOutcome::Skipped),
                    CollisionDecision::Overwrite => {}
                    CollisionDecision::OverwriteAll => self.policy.set_overwrite_all(),
                    CollisionDecision::SkipAll => {
                        self.policy.set_skip_all();
                        return Ok(FileOutcome::Skipped);
                    }
                    CollisionDecision::Cancel => return Ok(FileOutcome::Cancelled),
                },
            }
        }

        self.codec
            .encode(&image, &dest, job.format, JPEG_QUALITY)
            .map_err(|e| ConvertError::Encode {
                path: dest.clone(),
                source: e,
            })?;
        Ok(FileOutcome::Converted)
    }

    /// Emits a collision question and blocks until the answer arrives. A
    /// disconnected UI counts as cancel.
    fn ask(&self, source: &Path, dest: &Path) -> CollisionDecision {
        let (reply_tx, reply_rx) = reply_channel();
        let question = WorkerEvent::Collision {
            source: source.to_path_buf(),
            dest: dest.to_path_buf(),
            reply: reply_tx,
        };
        if self.events.send(question).is_err() {
            return CollisionDecision::Cancel;
        }
        reply_rx.recv().unwrap_or(CollisionDecision::Cancel)
    }
}
