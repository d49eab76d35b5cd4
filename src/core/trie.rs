// --- File: src/core/trie.rs
use crate::core::types::EntryRef;
use crate::error::{Error, Lookup, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Handle of a node inside the trie arena. The root is always `0`.
pub type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CategoryNode {
    children: HashMap<String, NodeId>,
    entries: Vec<EntryRef>,
}

impl CategoryNode {
    fn new() -> Self {
        Self { children: HashMap::new(), entries: Vec::new() }
    }
}

/// A hierarchical multimap from category paths (e.g. size -> variant -> generation)
/// to the art entries filed under them.
///
/// Nodes live in a flat arena and reference their children by index, so the
/// whole structure serializes as-is into the pokedex snapshot. A node may carry
/// entries and children at the same time; paths need not end at a leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTrie {
    nodes: Vec<CategoryNode>,
}

impl Default for CategoryTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryTrie {
    pub fn new() -> Self {
        Self { nodes: vec![CategoryNode::new()] }
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Files `entry` under `path`, creating missing nodes on the way.
    /// Re-inserting an identical pair appends a second copy.
    /// O(k) complexity where k is the path length.
    pub fn insert<S: AsRef<str>>(&mut self, path: &[S], entry: EntryRef) -> Result<()> {
        if path.is_empty() {
            return Err(Error::InvalidInsertion(format!(
                "entry {} has an empty category path",
                entry.index
            )));
        }
        if let Some(pos) = path.iter().position(|s| s.as_ref().is_empty()) {
            return Err(Error::InvalidInsertion(format!(
                "entry {} has an empty segment at position {}",
                entry.index, pos
            )));
        }

        let mut node_idx = ROOT;
        for segment in path {
            let segment = segment.as_ref();
            node_idx = match self.nodes[node_idx].children.get(segment) {
                Some(&id) => id,
                None => {
                    let new_node_id = self.nodes.len();
                    self.nodes.push(CategoryNode::new());
                    self.nodes[node_idx].children.insert(segment.to_string(), new_node_id);
                    new_node_id
                }
            };
        }
        self.nodes[node_idx].entries.push(entry);
        Ok(())
    }

    /// Every distinct segment used as a key anywhere in the tree, at any depth,
    /// sorted ascending.
    pub fn list_categories(&self) -> Vec<String> {
        let unique: BTreeSet<&str> = self
            .nodes
            .iter()
            .flat_map(|node| node.children.keys().map(String::as_str))
            .collect();
        unique.into_iter().map(str::to_string).collect()
    }

    /// Follows `prefix` from the root. An empty prefix resolves to the root.
    pub fn lookup<S: AsRef<str>>(&self, prefix: &[S]) -> Result<NodeId> {
        let mut node_idx = ROOT;
        for segment in prefix {
            match self.nodes[node_idx].children.get(segment.as_ref()) {
                Some(&next_idx) => node_idx = next_idx,
                None => return Err(Lookup::Category(join_path(prefix)).into()),
            }
        }
        Ok(node_idx)
    }

    /// Entries attached to `node` and all of its descendants.
    /// The node's own entries come first, in insertion order.
    pub fn collect_entries(&self, node: NodeId) -> Vec<&EntryRef> {
        let mut collected = Vec::new();
        if node >= self.nodes.len() {
            return collected;
        }

        let mut stack = vec![node];
        while let Some(idx) = stack.pop() {
            let current = &self.nodes[idx];
            collected.extend(current.entries.iter());

            // Visit children in key order so results do not depend on hash seeds.
            let mut children: Vec<(&String, &NodeId)> = current.children.iter().collect();
            children.sort_by(|a, b| b.0.cmp(a.0));
            stack.extend(children.into_iter().map(|(_, &child)| child));
        }
        collected
    }

    /// Entries attached exactly at `node`, without descendants.
    pub fn entries_at(&self, node: NodeId) -> &[EntryRef] {
        self.nodes.get(node).map(|n| n.entries.as_slice()).unwrap_or(&[])
    }

    /// Every attached entry paired with the full path of the node holding it.
    /// Only meaningful on a trie that passed `validate`.
    pub fn entry_paths(&self) -> Vec<(Vec<&str>, &EntryRef)> {
        let mut out = Vec::new();
        let mut stack: Vec<(NodeId, Vec<&str>)> = vec![(ROOT, Vec::new())];
        while let Some((idx, path)) = stack.pop() {
            let node = &self.nodes[idx];
            out.extend(node.entries.iter().map(|entry| (path.clone(), entry)));
            for (segment, &child) in &node.children {
                let mut child_path = path.clone();
                child_path.push(segment.as_str());
                stack.push((child, child_path));
            }
        }
        out
    }

    /// Checks the arena invariants: every child handle is in bounds, every
    /// non-root node has exactly one parent and is reachable from the root.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(Error::malformed("category trie has no root node"));
        }
        let mut parents = vec![0usize; self.nodes.len()];
        for node in &self.nodes {
            for (segment, &child) in &node.children {
                if segment.is_empty() {
                    return Err(Error::malformed("category trie contains an empty segment"));
                }
                if child == ROOT || child >= self.nodes.len() {
                    return Err(Error::malformed(format!(
                        "category '{}' points at invalid node {}",
                        segment, child
                    )));
                }
                parents[child] += 1;
            }
        }
        if let Some(orphan) = parents.iter().skip(1).position(|&count| count != 1) {
            return Err(Error::malformed(format!(
                "trie node {} is not reachable by exactly one path",
                orphan + 1
            )));
        }

        // One parent each still admits cycles detached from the root.
        let mut visited = 0;
        let mut stack = vec![ROOT];
        while let Some(idx) = stack.pop() {
            visited += 1;
            stack.extend(self.nodes[idx].children.values().copied());
        }
        if visited != self.nodes.len() {
            return Err(Error::malformed(format!(
                "{} trie nodes are not reachable from the root",
                self.nodes.len() - visited
            )));
        }
        Ok(())
    }
}

pub(crate) fn join_path<S: AsRef<str>>(path: &[S]) -> String {
    path.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("/")
}
