use std::fs;
use std::path::{Path, PathBuf};

use heic_converter::converter::{
    CollisionDecision, ConversionJob, JobSummary, Outcome, TargetFormat, WorkerEvent, spawn,
};
use tempfile::TempDir;

/// Writes a small real image to `path`. The bytes are PNG whatever the
/// extension says; the codec detects the format from the contents.
fn write_image(path: &Path) {
    let img = image::RgbImage::from_fn(8, 8, |x, y| {
        image::Rgb([(x * 30) as u8, (y * 30) as u8, 77])
    });
    img.save_with_format(path, image::ImageFormat::Png)
        .expect("write fixture");
}

fn setup(names: &[&str]) -> (TempDir, Vec<PathBuf>, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("out");
    fs::create_dir(&out).expect("create out dir");
    let files = names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            write_image(&path);
            path
        })
        .collect();
    (dir, files, out)
}

struct Run {
    progress: Vec<u8>,
    questions: Vec<(PathBuf, PathBuf)>,
    summary: JobSummary,
}

/// Drives a job to completion, answering each collision question with the
/// next entry of `decisions`.
fn run_with_decisions(job: ConversionJob, decisions: &[CollisionDecision]) -> Run {
    let handle = spawn(job);
    let mut decisions = decisions.iter().copied();
    let mut progress = Vec::new();
    let mut questions = Vec::new();
    let mut summary = None;

    for event in handle.events().iter() {
        match event {
            WorkerEvent::Progress(p) => progress.push(p),
            WorkerEvent::Collision {
                source,
                dest,
                reply,
            } => {
                questions.push((source, dest));
                let decision = decisions.next().expect("unexpected collision question");
                reply.send(decision).expect("worker hung up");
            }
            WorkerEvent::Finished(s) => summary = Some(s),
        }
    }
    handle.join();

    Run {
        progress,
        questions,
        summary: summary.expect("missing finished event"),
    }
}

fn run(job: ConversionJob) -> Run {
    run_with_decisions(job, &[])
}

#[test]
fn clean_jpeg_batch_converts_every_file() {
    let (_dir, files, out) = setup(&["a.heic", "b.heic"]);
    let job = ConversionJob::new(files, out.clone(), TargetFormat::Jpeg);

    let result = run(job);

    assert_eq!(result.summary.converted, 2);
    assert_eq!(result.summary.outcome, Outcome::Success);
    assert_eq!(result.progress, vec![50, 100]);
    assert!(result.questions.is_empty());
    assert!(out.join("a.jpg").is_file());
    assert!(out.join("b.jpg").is_file());
}

#[test]
fn progress_is_floored_per_file_visited() {
    let (_dir, files, out) = setup(&["p.heic", "q.heic", "r.heic"]);
    let job = ConversionJob::new(files, out, TargetFormat::Jpeg);

    let result = run(job);

    assert_eq!(result.summary.converted, 3);
    assert_eq!(result.progress, vec![33, 66, 100]);
}

#[test]
fn png_target_writes_decodable_png() {
    let (_dir, files, out) = setup(&["a.heic"]);
    let job = ConversionJob::new(files, out.clone(), TargetFormat::Png);

    let result = run(job);

    assert_eq!(result.summary.converted, 1);
    let written = image::open(out.join("a.png")).expect("decodable png");
    assert_eq!((written.width(), written.height()), (8, 8));
}

#[test]
fn skip_leaves_existing_file_untouched() {
    let (_dir, files, out) = setup(&["a.heic"]);
    let existing = out.join("a.jpg");
    fs::write(&existing, b"sentinel").expect("pre-existing dest");
    let job = ConversionJob::new(files.clone(), out, TargetFormat::Jpeg);

    let result = run_with_decisions(job, &[CollisionDecision::Skip]);

    assert_eq!(result.summary.converted, 0);
    assert_eq!(result.summary.skipped, 1);
    assert_eq!(result.summary.outcome, Outcome::NothingConverted);
    assert_eq!(result.progress, vec![100]);
    assert_eq!(result.questions, vec![(files[0].clone(), existing.clone())]);
    assert_eq!(fs::read(&existing).expect("read dest"), b"sentinel");
}

#[test]
fn overwrite_converts_only_that_file() {
    let (_dir, files, out) = setup(&["a.heic", "b.heic"]);
    fs::write(out.join("a.jpg"), b"sentinel").expect("pre-existing dest");
    fs::write(out.join("b.jpg"), b"sentinel").expect("pre-existing dest");
    let job = ConversionJob::new(files, out.clone(), TargetFormat::Jpeg);

    let result = run_with_decisions(
        job,
        &[CollisionDecision::Overwrite, CollisionDecision::Skip],
    );

    // A plain overwrite does not stick, so the second collision asks again.
    assert_eq!(result.questions.len(), 2);
    assert_eq!(result.summary.converted, 1);
    assert_eq!(result.summary.skipped, 1);
    assert_ne!(fs::read(out.join("a.jpg")).expect("read"), b"sentinel");
    assert_eq!(fs::read(out.join("b.jpg")).expect("read"), b"sentinel");
}

#[test]
fn overwrite_all_silences_later_questions() {
    let (_dir, files, out) = setup(&["a.heic", "b.heic", "c.heic"]);
    for name in ["a.jpg", "b.jpg", "c.jpg"] {
        fs::write(out.join(name), b"sentinel").expect("pre-existing dest");
    }
    let job = ConversionJob::new(files, out.clone(), TargetFormat::Jpeg);

    let result = run_with_decisions(job, &[CollisionDecision::OverwriteAll]);

    assert_eq!(result.questions.len(), 1);
    assert_eq!(result.summary.converted, 3);
    assert_eq!(result.summary.outcome, Outcome::Success);
    for name in ["a.jpg", "b.jpg", "c.jpg"] {
        assert_ne!(fs::read(out.join(name)).expect("read"), b"sentinel");
    }
}

#[test]
fn skip_all_still_converts_non_colliding_files() {
    let (_dir, files, out) = setup(&["a.heic", "b.heic", "c.heic"]);
    // a and c collide, b does not.
    fs::write(out.join("a.jpg"), b"sentinel").expect("pre-existing dest");
    fs::write(out.join("c.jpg"), b"sentinel").expect("pre-existing dest");
    let job = ConversionJob::new(files, out.clone(), TargetFormat::Jpeg);

    let result = run_with_decisions(job, &[CollisionDecision::SkipAll]);

    assert_eq!(result.questions.len(), 1);
    assert_eq!(result.summary.converted, 1);
    assert_eq!(result.summary.skipped, 2);
    assert_eq!(result.progress, vec![33, 66, 100]);
    assert_eq!(fs::read(out.join("a.jpg")).expect("read"), b"sentinel");
    assert_eq!(fs::read(out.join("c.jpg")).expect("read"), b"sentinel");
    assert!(out.join("b.jpg").is_file());
}

#[test]
fn cancel_stops_before_remaining_files() {
    let (_dir, files, out) = setup(&["a.heic", "b.heic", "c.heic"]);
    // The second file collides; cancelling there must leave the third alone.
    fs::write(out.join("b.jpg"), b"sentinel").expect("pre-existing dest");
    let job = ConversionJob::new(files, out.clone(), TargetFormat::Jpeg);

    let result = run_with_decisions(job, &[CollisionDecision::Cancel]);

    assert_eq!(result.summary.outcome, Outcome::Cancelled);
    assert_eq!(result.summary.converted, 1);
    // No progress for the cancelled file or anything after it.
    assert_eq!(result.progress, vec![33]);
    assert_eq!(fs::read(out.join("b.jpg")).expect("read"), b"sentinel");
    assert!(!out.join("c.jpg").exists());
    // Files written before the cancel stay on disk.
    assert!(out.join("a.jpg").is_file());
}

#[test]
fn decode_failure_is_skipped_not_fatal() {
    let (dir, mut files, out) = setup(&["a.heic", "c.heic"]);
    let broken = dir.path().join("b.heic");
    fs::write(&broken, b"definitely not an image").expect("write garbage");
    files.insert(1, broken);
    let job = ConversionJob::new(files, out.clone(), TargetFormat::Jpeg);

    let result = run(job);

    assert_eq!(result.summary.converted, 2);
    assert_eq!(result.summary.failed, 1);
    assert_eq!(result.summary.outcome, Outcome::Success);
    assert_eq!(result.progress, vec![33, 66, 100]);
    assert!(!out.join("b.jpg").exists());
}
