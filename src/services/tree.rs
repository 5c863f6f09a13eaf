//! Arena-backed suite tree with per-level name indexes.
//!
//! Every node lives in a single `Vec` and is addressed by [`NodeId`]. A parent
//! owns the ordered list of its children's ids plus a name index over them, so
//! matching a source path against the tree never scans sibling lists. Browser
//! entries are stored inline on their state and indexed by browser name.
//! Traversal is always top-down, so nodes keep no parent links.

use crate::models::{BrowserEntry, Status, SuiteNode};
use crate::services::severity::determine_status;
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Index of a node inside a [`SuiteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
pub struct TreeNode {
    pub name: String,
    pub suite_path: Vec<String>,
    pub status: Option<Status>,
    pub extra: Map<String, Value>,
    children: Option<Vec<NodeId>>,
    child_index: HashMap<String, NodeId>,
    browsers: Option<Vec<BrowserEntry>>,
    browser_index: HashMap<String, usize>,
}

impl TreeNode {
    /// Child ids in insertion order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Browser entries in insertion order.
    #[must_use]
    pub fn browsers(&self) -> &[BrowserEntry] {
        self.browsers.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct SuiteTree {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
    root_index: HashMap<String, NodeId>,
}

impl SuiteTree {
    /// Build an arena from nested nodes, rejecting malformed input.
    pub fn from_nodes(nodes: Vec<SuiteNode>) -> Result<Self> {
        validate_nodes(&nodes)?;

        let mut tree = Self::default();
        for node in nodes {
            tree.attach(None, node);
        }
        Ok(tree)
    }

    /// Convert the arena back into nested nodes.
    #[must_use]
    pub fn into_nodes(self) -> Vec<SuiteNode> {
        let mut slots: Vec<Option<TreeNode>> = self.nodes.into_iter().map(Some).collect();
        self.roots
            .iter()
            .filter_map(|id| take_nested(&mut slots, *id))
            .collect()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Child of `parent` (or root when `parent` is `None`) with the given name.
    #[must_use]
    pub fn child(&self, parent: Option<NodeId>, name: &str) -> Option<NodeId> {
        match parent {
            None => self.root_index.get(name).copied(),
            Some(id) => self.nodes[id.0].child_index.get(name).copied(),
        }
    }

    /// Node addressed by a full suite path.
    #[must_use]
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeId> {
        let mut current = None;
        for segment in path {
            current = Some(self.child(current, segment.as_ref())?);
        }
        current
    }

    /// Insert a nested subtree under `parent` and return the id of its root.
    pub fn attach(&mut self, parent: Option<NodeId>, node: SuiteNode) -> NodeId {
        let SuiteNode {
            name,
            suite_path,
            status,
            children,
            browsers,
            extra,
        } = node;

        let id = NodeId(self.nodes.len());
        let browser_index = browsers
            .iter()
            .flatten()
            .enumerate()
            .map(|(idx, bro)| (bro.name.clone(), idx))
            .collect();

        self.nodes.push(TreeNode {
            name: name.clone(),
            suite_path,
            status,
            extra,
            children: children.as_ref().map(|_| Vec::new()),
            child_index: HashMap::new(),
            browsers,
            browser_index,
        });

        match parent {
            None => {
                self.roots.push(id);
                self.root_index.insert(name, id);
            }
            Some(parent_id) => {
                let parent_node = &mut self.nodes[parent_id.0];
                parent_node.children.get_or_insert_with(Vec::new).push(id);
                parent_node.child_index.insert(name, id);
            }
        }

        for child in children.into_iter().flatten() {
            self.attach(Some(id), child);
        }

        id
    }

    #[must_use]
    pub fn browser(&self, id: NodeId, name: &str) -> Option<&BrowserEntry> {
        let node = &self.nodes[id.0];
        let idx = *node.browser_index.get(name)?;
        node.browsers.as_ref()?.get(idx)
    }

    pub fn browser_mut(&mut self, id: NodeId, name: &str) -> Option<&mut BrowserEntry> {
        let node = &mut self.nodes[id.0];
        let idx = *node.browser_index.get(name)?;
        node.browsers.as_mut()?.get_mut(idx)
    }

    /// Append a browser entry to a state.
    pub fn push_browser(&mut self, id: NodeId, entry: BrowserEntry) {
        let node = &mut self.nodes[id.0];
        let browsers = node.browsers.get_or_insert_with(Vec::new);
        node.browser_index.insert(entry.name.clone(), browsers.len());
        browsers.push(entry);
    }

    /// Re-derive a node's status from its browsers and direct children.
    ///
    /// Children are expected to hold already derived statuses; nodes that never
    /// received one do not take part in the rollup.
    pub fn refresh_status(&mut self, id: NodeId) -> Status {
        let node = &self.nodes[id.0];
        let from_browsers = node.browsers().iter().map(|bro| bro.result.status);
        let from_children = node
            .children()
            .iter()
            .filter_map(|child| self.nodes[child.0].status);
        let status = determine_status(from_browsers.chain(from_children));

        self.nodes[id.0].status = Some(status);
        status
    }

    /// All browser entries in the tree, depth first.
    pub fn browsers(&self) -> impl Iterator<Item = &BrowserEntry> {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        let mut out = Vec::new();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            out.extend(node.browsers());
            stack.extend(node.children().iter().rev().copied());
        }
        out.into_iter()
    }
}

fn take_nested(slots: &mut [Option<TreeNode>], id: NodeId) -> Option<SuiteNode> {
    let node = slots[id.0].take()?;
    let children = node.children.map(|ids| {
        ids.iter()
            .filter_map(|child| take_nested(slots, *child))
            .collect()
    });

    Some(SuiteNode {
        name: node.name,
        suite_path: node.suite_path,
        status: node.status,
        children,
        browsers: node.browsers,
        extra: node.extra,
    })
}

/// Check that nested nodes form a well-shaped tree.
///
/// Every node's `suitePath` must extend its parent's by its own name, sibling
/// names must be unique and a state may hold each browser only once.
pub fn validate_nodes(nodes: &[SuiteNode]) -> Result<()> {
    validate_level(nodes, &[])
}

fn validate_level(nodes: &[SuiteNode], parent_path: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(nodes.len());

    for node in nodes {
        let expected_len = parent_path.len() + 1;
        let path_matches = node.suite_path.len() == expected_len
            && node.suite_path.starts_with(parent_path)
            && node.suite_path.last() == Some(&node.name);

        if !path_matches {
            return Err(Error::MalformedTree(format!(
                "node '{}' has suite path {:?}, expected {:?} + '{}'",
                node.name, node.suite_path, parent_path, node.name
            )));
        }

        if !seen.insert(node.name.as_str()) {
            return Err(Error::MalformedTree(format!(
                "duplicate node '{}' under {:?}",
                node.name, parent_path
            )));
        }

        if let Some(browsers) = &node.browsers {
            let mut names = HashSet::with_capacity(browsers.len());
            for bro in browsers {
                if !names.insert(bro.name.as_str()) {
                    return Err(Error::MalformedTree(format!(
                        "duplicate browser '{}' in {:?}",
                        bro.name, node.suite_path
                    )));
                }
            }
        }

        if let Some(children) = &node.children {
            validate_level(children, &node.suite_path)?;
        }
    }

    Ok(())
}
