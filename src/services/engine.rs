//! Merge engine façade: folds partial reports into one aggregate, in order.

use super::merge::TreeMerger;
use super::relocate::{self, ArtifactRelocator, RelocationReport};
use super::skips::SkipList;
use super::stats::Stats;
use super::tree::{SuiteTree, validate_nodes};
use crate::models::ReportData;
use crate::{MergeSummary, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Running aggregate plus the directory its artifacts are moved into.
#[derive(Debug)]
pub struct MergeEngine {
    tree: SuiteTree,
    skips: SkipList,
    stats: Stats,
    extra: Map<String, Value>,
    dest_dir: PathBuf,
}

impl MergeEngine {
    /// Start from an initial aggregate whose artifacts already live in `dest_dir`.
    pub fn create<P: Into<PathBuf>>(initial: ReportData, dest_dir: P) -> Result<Self> {
        let ReportData {
            skips,
            suites,
            stats,
            per_browser,
            extra,
        } = initial;

        Ok(Self {
            tree: SuiteTree::from_nodes(suites)?,
            skips: SkipList::new(skips),
            stats: Stats::new(stats, per_browser),
            extra,
            dest_dir: dest_dir.into(),
        })
    }

    /// Merge every source report in iteration order.
    ///
    /// Sources are applied strictly one after another: a browser's attempt
    /// offset depends on what earlier sources already contributed. All file
    /// moves of a source are finished before the next source starts. A
    /// malformed source tree aborts with an error before any of it is applied.
    pub fn merge_with<I, P>(mut self, sources: I) -> Result<MergeSummary>
    where
        I: IntoIterator<Item = (P, ReportData)>,
        P: AsRef<Path>,
    {
        let mut relocations = RelocationReport::default();

        for (src_dir, data) in sources {
            let report = self.merge_one(src_dir.as_ref(), data)?;
            relocations.absorb(report);
        }

        Ok(MergeSummary {
            data: self.into_report(),
            moved_artifacts: relocations.moved,
            errors: relocations.errors,
        })
    }

    fn merge_one(&mut self, src_dir: &Path, data: ReportData) -> Result<RelocationReport> {
        validate_nodes(&data.suites)?;

        log::info!(
            "Merging report {} ({} root suites, {} skips)",
            src_dir.display(),
            data.suites.len(),
            data.skips.len()
        );

        let added = self.skips.merge(data.skips);
        log::debug!("Added {added} skip records from {}", src_dir.display());

        let relocator = ArtifactRelocator::new(src_dir, &self.dest_dir);
        let planned =
            TreeMerger::new(&mut self.tree, &mut self.stats, relocator).merge(data.suites);

        let report = relocate::execute(&planned);
        log::info!(
            "Moved {} artifacts from {} ({} planned, {} failed)",
            report.moved,
            src_dir.display(),
            planned.len(),
            report.errors.len()
        );
        Ok(report)
    }

    fn into_report(self) -> ReportData {
        ReportData {
            skips: self.skips.into_vec(),
            suites: self.tree.into_nodes(),
            stats: self.stats.totals,
            per_browser: self.stats.per_browser,
            extra: self.extra,
        }
    }
}
