//! Artifact relocation: moving screenshot files between report directories.
//!
//! Planning and execution are split. While the tree is merged, the driver
//! asks for a plan per browser entry; planning rewrites the image paths stored
//! in the attempts and returns the file moves that make the data true. The
//! moves of a whole pass are then executed in parallel, and every failure is
//! logged and recorded without stopping the remaining moves.

use crate::models::{ErrorItem, TestResult};
use rayon::prelude::*;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `_<attempt>` right before the final extension of the file name.
static ATTEMPT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(\d+)(\.[^./\\]+)$").expect("attempt token pattern is valid"));

/// One pending file move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Outcome of executing a batch of relocations.
#[derive(Debug, Default)]
pub struct RelocationReport {
    pub moved: usize,
    pub errors: Vec<ErrorItem>,
}

impl RelocationReport {
    pub fn absorb(&mut self, other: RelocationReport) {
        self.moved += other.moved;
        self.errors.extend(other.errors);
    }
}

/// Whether an image path points at a network resource rather than a report file.
#[must_use]
pub fn is_absolute_url(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Replace the attempt index embedded in an artifact file name.
///
/// `images/chrome~current_0.png` becomes `images/chrome~current_3.png` for
/// attempt 3. Paths without an attempt token are returned unchanged.
#[must_use]
pub fn with_attempt(path: &str, attempt: u32) -> String {
    ATTEMPT_TOKEN
        .replace(path, |caps: &regex::Captures<'_>| format!("_{attempt}{}", &caps[2]))
        .into_owned()
}

/// Plans artifact moves from one source report directory into the destination.
#[derive(Debug, Clone)]
pub struct ArtifactRelocator {
    src_dir: PathBuf,
    dest_dir: PathBuf,
}

impl ArtifactRelocator {
    #[must_use]
    pub fn new<S: Into<PathBuf>, D: Into<PathBuf>>(src_dir: S, dest_dir: D) -> Self {
        Self {
            src_dir: src_dir.into(),
            dest_dir: dest_dir.into(),
        }
    }

    /// Plan moves for attempts that keep their relative paths (a graft).
    pub fn plan_verbatim<'a, I>(&self, attempts: I) -> Vec<Relocation>
    where
        I: IntoIterator<Item = &'a TestResult>,
    {
        let mut plan = Vec::new();
        for attempt in attempts {
            for info in &attempt.images_info {
                let images = [&info.actual_img, &info.expected_img, &info.diff_img];
                for image in images.into_iter().flatten() {
                    if is_absolute_url(&image.path) {
                        continue;
                    }
                    plan.push(self.relocation(&image.path, &image.path));
                }
            }
        }
        plan
    }

    /// Plan moves for source attempts shifted by `offset`, rewriting their paths.
    ///
    /// The attempt at local index `i` is renamed to attempt `i + offset`.
    pub fn plan_shifted(&self, attempts: &mut [TestResult], offset: u32) -> Vec<Relocation> {
        let mut plan = Vec::new();
        for (local, attempt) in (0u32..).zip(attempts.iter_mut()) {
            let new_attempt = local + offset;
            for info in &mut attempt.images_info {
                for image in info.relocatable_mut() {
                    if is_absolute_url(&image.path) {
                        continue;
                    }
                    let renamed = with_attempt(&image.path, new_attempt);
                    plan.push(self.relocation(&image.path, &renamed));
                    image.path = renamed;
                }
            }
        }
        plan
    }

    fn relocation(&self, old: &str, new: &str) -> Relocation {
        let relocation = Relocation {
            from: self.src_dir.join(old),
            to: self.dest_dir.join(new),
        };
        log::debug!(
            "Planned move {} -> {}",
            relocation.from.display(),
            relocation.to.display()
        );
        relocation
    }
}

/// Every planned destination of one source file, in plan order.
#[derive(Debug)]
struct MoveJob<'a> {
    from: &'a Path,
    targets: Vec<&'a Path>,
}

/// Group relocations by source file.
///
/// Identical pairs collapse into one. A destination already claimed by an
/// earlier relocation is not written again.
fn group_by_source(relocations: &[Relocation]) -> Vec<MoveJob<'_>> {
    let mut jobs: Vec<MoveJob<'_>> = Vec::new();
    let mut job_index: HashMap<&Path, usize> = HashMap::new();
    let mut claimed: HashSet<&Path> = HashSet::new();

    for relocation in relocations {
        if !claimed.insert(relocation.to.as_path()) {
            log::debug!(
                "Skipping duplicate move {} -> {}",
                relocation.from.display(),
                relocation.to.display()
            );
            continue;
        }

        match job_index.get(relocation.from.as_path()) {
            Some(&idx) => jobs[idx].targets.push(relocation.to.as_path()),
            None => {
                job_index.insert(relocation.from.as_path(), jobs.len());
                jobs.push(MoveJob {
                    from: relocation.from.as_path(),
                    targets: vec![relocation.to.as_path()],
                });
            }
        }
    }

    jobs
}

/// Execute relocations in parallel, never failing the batch.
///
/// Each source file is handled by exactly one job. When several attempts
/// share a source file, the first destination receives the file itself and
/// the others receive copies made before it is moved.
#[must_use]
pub fn execute(relocations: &[Relocation]) -> RelocationReport {
    let jobs = group_by_source(relocations);

    jobs.par_iter()
        .map(run_job)
        .reduce(RelocationReport::default, |mut acc, report| {
            acc.absorb(report);
            acc
        })
}

fn run_job(job: &MoveJob<'_>) -> RelocationReport {
    let mut report = RelocationReport::default();
    let Some((first, extras)) = job.targets.split_first() else {
        return report;
    };

    for to in extras {
        match copy_file(job.from, to) {
            Ok(()) => report.moved += 1,
            Err(err) => report.errors.push(record_error(job.from, to, &err)),
        }
    }

    match move_file(job.from, first) {
        Ok(()) => report.moved += 1,
        Err(err) => report.errors.push(record_error(job.from, first, &err)),
    }

    report
}

fn record_error(from: &Path, to: &Path, err: &io::Error) -> ErrorItem {
    log::error!(
        "The image was not moved from {} to {}: {err}",
        from.display(),
        to.display()
    );

    let code = match err.kind() {
        io::ErrorKind::NotFound => "ENOENT",
        io::ErrorKind::PermissionDenied => "EACCES",
        _ => "EMOVE",
    };

    ErrorItem {
        path: from.to_string_lossy().to_string(),
        code: code.to_string(),
        message: err.to_string(),
    }
}

/// Copy a file, replacing the destination and creating its parent directory.
pub fn copy_file(from: &Path, to: &Path) -> io::Result<()> {
    if from == to {
        return fs::metadata(from).map(|_| ());
    }

    fs::metadata(from)?;
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).map(|_| ())
}

/// Move a file, replacing the destination and creating its parent directory.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if from == to {
        return fs::metadata(from).map(|_| ());
    }

    let metadata = fs::metadata(from)?;

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }

    if to.is_dir() && metadata.is_dir() {
        fs::remove_dir_all(to)?;
    } else if to.exists() && !to.is_dir() {
        fs::remove_file(to)?;
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(err) if metadata.is_file() => {
            log::debug!(
                "Rename {} -> {} failed ({err}), copying instead",
                from.display(),
                to.display()
            );
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(err) => Err(err),
    }
}
