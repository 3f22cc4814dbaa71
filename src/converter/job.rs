use std::fs;
use std::path::PathBuf;

use crate::error::JobError;

/// Fixed encoder quality for lossy targets.
pub const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Jpeg,
    Png,
}

impl TargetFormat {
    pub fn as_str(&self) -> &str {
        match self {
            TargetFormat::Jpeg => "JPEG",
            TargetFormat::Png => "PNG",
        }
    }

    pub fn extension(&self) -> &str {
        match self {
            TargetFormat::Jpeg => "jpg",
            TargetFormat::Png => "png",
        }
    }

    pub fn all() -> Vec<TargetFormat> {
        vec![TargetFormat::Jpeg, TargetFormat::Png]
    }
}

/// One batch-conversion run: a fixed file list, an output directory, and a
/// target format. Owned by the worker for the lifetime of the run.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub files: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub format: TargetFormat,
}

impl ConversionJob {
    pub fn new(files: Vec<PathBuf>, output_dir: PathBuf, format: TargetFormat) -> Self {
        Self {
            files,
            output_dir,
            format,
        }
    }

    /// Precondition check, run by the caller before spawning a worker. A job
    /// that fails here is rejected outright and no thread is started.
    pub fn validate(&self) -> Result<(), JobError> {
        if self.files.is_empty() {
            return Err(JobError::EmptyFileList);
        }
        let meta = fs::metadata(&self.output_dir)
            .map_err(|_| JobError::OutputDirMissing(self.output_dir.clone()))?;
        if !meta.is_dir() {
            return Err(JobError::OutputDirNotADirectory(self.output_dir.clone()));
        }
        if meta.permissions().readonly() {
            return Err(JobError::OutputDirReadOnly(self.output_dir.clone()));
        }
        Ok(())
    }
}

/// The user's answer to a single collision question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionDecision {
    Skip,
    Overwrite,
    OverwriteAll,
    SkipAll,
    Cancel,
}

/// How a colliding file is handled once the sticky policy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Skip,
    Overwrite,
}

/// Sticky per-job collision policy. Both flags start false and each can flip
/// to true at most once, only in response to a user decision. The flags are
/// not structurally exclusive; `skip_all` wins when both are set.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionPolicy {
    overwrite_all: bool,
    skip_all: bool,
}

impl CollisionPolicy {
    /// Returns the sticky resolution for a collision, or `None` when the
    /// user has to be asked.
    pub fn resolve(&self) -> Option<Resolution> {
        if self.skip_all {
            Some(Resolution::Skip)
        } else if self.overwrite_all {
            Some(Resolution::Overwrite)
        } else {
            None
        }
    }

    pub fn set_skip_all(&mut self) {
        self.skip_all = true;
    }

    pub fn set_overwrite_all(&mut self) {
        self.overwrite_all = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// At least one file was converted.
    Success,
    /// The batch ran to the end but nothing was written.
    NothingConverted,
    /// The user cancelled at a collision prompt.
    Cancelled,
}

/// Final tally for a job. `converted`, `skipped`, and `failed` are reported
/// separately; the success bit still follows the converted count alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcome: Outcome,
}

impl JobSummary {
    pub(crate) fn finished(converted: usize, skipped: usize, failed: usize) -> Self {
        let outcome = if converted > 0 {
            Outcome::Success
        } else {
            Outcome::NothingConverted
        };
        Self {
            converted,
            skipped,
            failed,
            outcome,
        }
    }

    pub(crate) fn cancelled(converted: usize, skipped: usize, failed: usize) -> Self {
        Self {
            converted,
            skipped,
            failed,
            outcome: Outcome::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_starts_undecided() {
        let policy = CollisionPolicy::default();
        assert_eq!(policy.resolve(), None);
    }

    #[test]
    fn policy_is_sticky() {
        let mut policy = CollisionPolicy::default();
        policy.set_overwrite_all();
        assert_eq!(policy.resolve(), Some(Resolution::Overwrite));

        let mut policy = CollisionPolicy::default();
        policy.set_skip_all();
        assert_eq!(policy.resolve(), Some(Resolution::Skip));
    }

    #[test]
    fn skip_all_wins_over_overwrite_all() {
        let mut policy = CollisionPolicy::default();
        policy.set_overwrite_all();
        policy.set_skip_all();
        assert_eq!(policy.resolve(), Some(Resolution::Skip));
    }

    #[test]
    fn empty_file_list_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let job = ConversionJob::new(Vec::new(), dir.path().to_path_buf(), TargetFormat::Jpeg);
        assert!(matches!(job.validate(), Err(crate::error::JobError::EmptyFileList)));
    }

    #[test]
    fn missing_output_dir_is_rejected() {
        let job = ConversionJob::new(
            vec![PathBuf::from("a.heic")],
            PathBuf::from("/nonexistent/output/dir"),
            TargetFormat::Png,
        );
        assert!(matches!(
            job.validate(),
            Err(crate::error::JobError::OutputDirMissing(_))
        ));
    }

    #[test]
    fn file_as_output_dir_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("not_a_dir");
        fs::write(&file, b"x").expect("write");
        let job = ConversionJob::new(vec![PathBuf::from("a.heic")], file, TargetFormat::Jpeg);
        assert!(matches!(
            job.validate(),
            Err(crate::error::JobError::OutputDirNotADirectory(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn read_only_output_dir_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("out");
        fs::create_dir(&out).expect("create out dir");
        fs::set_permissions(&out, fs::Permissions::from_mode(0o555)).expect("chmod");

        let job = ConversionJob::new(
            vec![PathBuf::from("a.heic")],
            out.clone(),
            TargetFormat::Jpeg,
        );
        assert!(matches!(
            job.validate(),
            Err(crate::error::JobError::OutputDirReadOnly(_))
        ));

        // Restore write permission so the tempdir can clean up.
        fs::set_permissions(&out, fs::Permissions::from_mode(0o755)).expect("chmod back");
    }

    #[test]
    fn summary_success_tracks_converted_count() {
        assert_eq!(JobSummary::finished(2, 1, 0).outcome, Outcome::Success);
        assert_eq!(JobSummary::finished(0, 3, 0).outcome, Outcome::NothingConverted);
        assert_eq!(JobSummary::cancelled(1, 0, 0).outcome, Outcome::Cancelled);
    }
}
