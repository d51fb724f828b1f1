//! Ternary search tree keyed one byte per level.
//!
//! Each level is a small binary search tree over sibling bytes (`lower` /
//! `higher` links); the `child` link descends to the next byte of the key.
//! Nodes live in an arena and are addressed by [`NodeId`]; a node's `parent`
//! is the node of the previous key byte, not its BST parent, so walking
//! `parent` links reconstructs the key back to front.
//!
//! Nodes are never removed individually. Dropping the tree frees the arena in
//! one go, so teardown does not recurse.


use std::ops::ControlFlow;

/// Stable handle to a node of one [`TernarySearchTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("empty key")]
    EmptyKey,

    #[error("tree capacity exceeded")]
    CapacityExceeded,

    #[error("no node matches the given prefix")]
    PrefixNotFound,

    #[error("traversal interrupted by visitor")]
    Interrupted,
}

#[derive(Debug, Clone)]
pub struct TstNode {
    chr: u8,
    /// Occurrences of the key ending here; 0 means "not a stored key".
    count: u32,
    /// 1-based distance from the virtual root.
    depth: u32,
    parent: Option<NodeId>,
    lower: Option<NodeId>,
    higher: Option<NodeId>,
    child: Option<NodeId>,
}

impl TstNode {
    pub fn chr(&self) -> u8 {
        self.chr
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn depth(&self) -> usize {
        self.depth as usize
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_terminal(&self) -> bool {
        self.count != 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct TernarySearchTree {
    nodes: Vec<TstNode>,
    root: Option<NodeId>,
    /// Distinct stored keys.
    key_count: usize,
    /// Length of the longest key ever inserted.
    depth: usize,
}

impl TernarySearchTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.key_count
    }

    /// Length of the longest stored key.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of allocated nodes, terminal or not.
    pub fn node_total(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.key_count = 0;
        self.depth = 0;
    }

    /// Panics if `id` was not produced by this tree.
    pub fn node(&self, id: NodeId) -> &TstNode {
        &self.nodes[id.index()]
    }

    /// Insert `key`, creating missing nodes, and bump its counter.
    ///
    /// On `CapacityExceeded` the nodes created so far stay in place as
    /// non-terminal nodes, so the tree remains consistent.
    pub fn insert(&mut self, key: &[u8]) -> Result<NodeId, TreeError> {
        if u32::try_from(key.len()).is_err() {
            return Err(TreeError::CapacityExceeded);
        }

        let mut parent: Option<NodeId> = None;
        for (depth, &chr) in (1u32..).zip(key) {
            let id = match self.level_head(parent) {
                None => {
                    let id = self.alloc(parent, chr, depth)?;
                    self.set_level_head(parent, id);
                    id
                }
                Some(head) => self.find_or_insert_sibling(head, parent, chr, depth)?,
            };
            parent = Some(id);
        }
        let Some(id) = parent else {
            return Err(TreeError::EmptyKey);
        };

        let node = &mut self.nodes[id.index()];
        if node.count == 0 {
            self.key_count += 1;
        }
        node.count = node.count.saturating_add(1);
        self.depth = self.depth.max(key.len());

        Ok(id)
    }

    /// Exact lookup of a stored key.
    pub fn get(&self, key: &[u8]) -> Option<NodeId> {
        self.locate(key)
            .filter(|id| self.nodes[id.index()].is_terminal())
    }

    /// Lazily enumerate stored keys starting with `prefix`.
    ///
    /// The prefix's own node comes first when it is itself a stored key.
    /// Remaining nodes follow in the order: node, lower subtree, child
    /// subtree, higher subtree. An empty prefix enumerates the whole tree.
    pub fn keys_with_prefix(&self, prefix: &[u8]) -> Result<PrefixIter<'_>, TreeError> {
        if prefix.is_empty() {
            return Ok(PrefixIter {
                tree: self,
                first: None,
                stack: self.root.into_iter().collect(),
            });
        }

        let id = self.locate(prefix).ok_or(TreeError::PrefixNotFound)?;
        let node = &self.nodes[id.index()];
        Ok(PrefixIter {
            tree: self,
            first: node.is_terminal().then_some(id),
            stack: node.child.into_iter().collect(),
        })
    }

    /// Callback form of [`keys_with_prefix`](Self::keys_with_prefix).
    ///
    /// Returns `Interrupted` as soon as `visit` breaks.
    pub fn find_keys<F>(&self, prefix: &[u8], mut visit: F) -> Result<(), TreeError>
    where
        F: FnMut(NodeId) -> ControlFlow<()>,
    {
        for id in self.keys_with_prefix(prefix)? {
            if visit(id).is_break() {
                return Err(TreeError::Interrupted);
            }
        }
        Ok(())
    }

    /// Reconstruct the key ending at `id`.
    pub fn node_key(&self, id: NodeId) -> Vec<u8> {
        let mut buf = vec![0; self.nodes[id.index()].depth()];
        self.node_key_into(id, &mut buf);
        buf
    }

    /// Write the key ending at `id` into `buf`, truncating to `buf.len()`.
    /// Returns the number of bytes written.
    pub fn node_key_into(&self, id: NodeId, buf: &mut [u8]) -> usize {
        let depth = self.nodes[id.index()].depth();
        let mut pos = depth;
        let mut cur = Some(id);
        while let Some(node_id) = cur {
            let node = &self.nodes[node_id.index()];
            pos -= 1;
            if let Some(slot) = buf.get_mut(pos) {
                *slot = node.chr;
            }
            if pos == 0 {
                break;
            }
            cur = node.parent;
        }
        depth.min(buf.len())
    }

    fn level_head(&self, parent: Option<NodeId>) -> Option<NodeId> {
        match parent {
            None => self.root,
            Some(p) => self.nodes[p.index()].child,
        }
    }

    fn set_level_head(&mut self, parent: Option<NodeId>, id: NodeId) {
        match parent {
            None => self.root = Some(id),
            Some(p) => self.nodes[p.index()].child = Some(id),
        }
    }

    /// Walk the sibling BST starting at `head` looking for `chr`.
    fn find_sibling(&self, head: NodeId, chr: u8) -> Option<NodeId> {
        let mut cur = head;
        loop {
            let node = &self.nodes[cur.index()];
            if node.chr == chr {
                return Some(cur);
            }
            cur = if chr < node.chr { node.lower } else { node.higher }?;
        }
    }

    fn find_or_insert_sibling(
        &mut self,
        head: NodeId,
        parent: Option<NodeId>,
        chr: u8,
        depth: u32,
    ) -> Result<NodeId, TreeError> {
        let mut cur = head;
        loop {
            let node = &self.nodes[cur.index()];
            if node.chr == chr {
                return Ok(cur);
            }
            let go_lower = chr < node.chr;
            match if go_lower { node.lower } else { node.higher } {
                Some(next) => cur = next,
                None => {
                    let id = self.alloc(parent, chr, depth)?;
                    let node = &mut self.nodes[cur.index()];
                    if go_lower {
                        node.lower = Some(id);
                    } else {
                        node.higher = Some(id);
                    }
                    return Ok(id);
                }
            }
        }
    }

    /// Node of the last byte of `key`, terminal or not.
    fn locate(&self, key: &[u8]) -> Option<NodeId> {
        let mut parent: Option<NodeId> = None;
        for &chr in key {
            let head = self.level_head(parent)?;
            parent = Some(self.find_sibling(head, chr)?);
        }
        parent
    }

    fn alloc(&mut self, parent: Option<NodeId>, chr: u8, depth: u32) -> Result<NodeId, TreeError> {
        let id = u32::try_from(self.nodes.len()).map_err(|_| TreeError::CapacityExceeded)?;
        self.nodes
            .try_reserve(1)
            .map_err(|_| TreeError::CapacityExceeded)?;
        self.nodes.push(TstNode {
            chr,
            count: 0,
            depth,
            parent,
            lower: None,
            higher: None,
            child: None,
        });
        Ok(NodeId(id))
    }
}

/// Iterator over the stored keys below a prefix, yielding terminal nodes.
///
/// Uses an explicit stack, so arbitrarily long keys do not grow the call
/// stack.
pub struct PrefixIter<'a> {
    tree: &'a TernarySearchTree,
    first: Option<NodeId>,
    stack: Vec<NodeId>,
}

impl Iterator for PrefixIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if let Some(id) = self.first.take() {
            return Some(id);
        }
        while let Some(id) = self.stack.pop() {
            let node = &self.tree.nodes[id.index()];
            // Pushed in reverse so that lower, child, higher pop in that order.
            self.stack.extend(node.higher);
            self.stack.extend(node.child);
            self.stack.extend(node.lower);
            if node.is_terminal() {
                return Some(id);
            }
        }
        None
    }
}
