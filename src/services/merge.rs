//! Tree merge driver: reconciles one source suite tree into the aggregate.
//!
//! Nodes are matched by name level by level. Unknown subtrees and unknown
//! browsers are grafted verbatim; browsers known on both sides have their
//! histories linearized and their artifacts renamed to the new attempt
//! numbers. Every node the driver descends into has its status re-derived on
//! the way back up, so ancestors always see their children's final statuses.

use super::linearize::linearize;
use super::relocate::{ArtifactRelocator, Relocation};
use super::stats::Stats;
use super::tree::{NodeId, SuiteTree};
use crate::models::{BrowserEntry, SuiteNode};

/// Merges one source report into the aggregate tree.
pub struct TreeMerger<'a> {
    tree: &'a mut SuiteTree,
    stats: &'a mut Stats,
    relocator: ArtifactRelocator,
    planned: Vec<Relocation>,
}

impl<'a> TreeMerger<'a> {
    pub fn new(
        tree: &'a mut SuiteTree,
        stats: &'a mut Stats,
        relocator: ArtifactRelocator,
    ) -> Self {
        Self {
            tree,
            stats,
            relocator,
            planned: Vec::new(),
        }
    }

    /// Merge source root nodes and return the file moves the merge requires.
    pub fn merge(mut self, sources: Vec<SuiteNode>) -> Vec<Relocation> {
        self.merge_level(None, sources);
        self.planned
    }

    fn merge_level(&mut self, parent: Option<NodeId>, sources: Vec<SuiteNode>) {
        for source in sources {
            match self.tree.child(parent, &source.name) {
                Some(id) => self.merge_node(id, source),
                None => self.graft_node(parent, source),
            }
        }
    }

    fn merge_node(&mut self, id: NodeId, source: SuiteNode) {
        let SuiteNode {
            children, browsers, ..
        } = source;

        if let Some(children) = children {
            self.merge_level(Some(id), children);
        }

        for browser in browsers.into_iter().flatten() {
            self.merge_browser(id, browser);
        }

        let status = self.tree.refresh_status(id);
        log::trace!("Status of {:?} is now {status}", self.tree.node(id).suite_path);
    }

    fn graft_node(&mut self, parent: Option<NodeId>, source: SuiteNode) {
        log::debug!("Grafting new suite {:?}", source.suite_path);

        let mut stack = vec![&source];
        while let Some(node) = stack.pop() {
            for browser in node.browsers.iter().flatten() {
                self.record_graft(browser);
            }
            stack.extend(node.children.iter().flatten());
        }

        self.tree.attach(parent, source);
    }

    fn merge_browser(&mut self, id: NodeId, mut source: BrowserEntry) {
        let Some(target) = self.tree.browser_mut(id, &source.name) else {
            log::debug!("Grafting new browser '{}'", source.name);
            self.record_graft(&source);
            self.tree.push_browser(id, source);
            return;
        };

        let offset = u32::try_from(target.attempt_count()).unwrap_or(u32::MAX);
        let old_status = target.result.status;
        let old_retries = target.retries.len();

        self.planned
            .extend(self.relocator.plan_shifted(&mut source.retries, offset));
        let result_offset =
            offset.saturating_add(u32::try_from(source.retries.len()).unwrap_or(u32::MAX));
        self.planned.extend(
            self.relocator
                .plan_shifted(std::slice::from_mut(&mut source.result), result_offset),
        );

        linearize(target, source);

        log::debug!(
            "Merged browser '{}': {} attempts, status {old_status} -> {}",
            target.name,
            target.attempt_count(),
            target.result.status
        );

        let (name, new_status, new_retries) = (
            target.name.clone(),
            target.result.status,
            target.retries.len(),
        );
        self.stats
            .record_update(&name, old_status, new_status, old_retries, new_retries);
    }

    fn record_graft(&mut self, browser: &BrowserEntry) {
        self.stats.record_new(browser);
        self.planned
            .extend(self.relocator.plan_verbatim(browser.attempts()));
    }
}
