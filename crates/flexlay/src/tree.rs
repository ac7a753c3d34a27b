//! Arena that owns every node of one or more layout trees.
//!
//! All relationships are [`NodeId`]s into a generational slot map, so an id
//! that outlives its node is detected instead of aliasing a new one. Each
//! node's `owner` is a non-owning back-reference; a node's children are the
//! only ownership edges, and freeing a node cascades only along those.
//!
//! Every mutation goes through `&mut Tree`, so a tree can never be changed
//! while one of its own layout passes is running.

mod setters;

use std::sync::Arc;

use serde_json::{Value, json};
use slotmap::{SecondaryMap, SlotMap, new_key_type};

use crate::config::{Config, LogLevel};
use crate::error::TreeError;
use crate::instrumentation::LayoutStats;
use crate::layout::{ComputedLayout, LayoutState, MeasureInput, Size};
use crate::node::{BaselineFn, DirtiedFn, MeasureFn, Node};
use crate::style::{NodeType, Style};

new_key_type! {
    /// Handle to a node in a [`Tree`].
    pub struct NodeId;
}

/// What [`Tree::dump`] includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpOptions {
    /// Include the rounded layout.
    pub layout: bool,
    /// Include the full style.
    pub style: bool,
    /// Recurse into children.
    pub children: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            layout: true,
            style: false,
            children: true,
        }
    }
}

/// Owner of nodes and entry point for layout.
pub struct Tree {
    pub(crate) nodes: SlotMap<NodeId, Node>,
    pub(crate) config: Arc<Config>,
    /// Bumped once per `compute_layout`.
    pub(crate) generation: u32,
    pub(crate) stats: LayoutStats,
    /// Layout boundaries dirtied since the last pass.
    pub(crate) pending_boundaries: Vec<NodeId>,
    /// For each shared child, the clones that list it without owning it.
    /// Entries may be stale; readers recheck the child list.
    sharers: SecondaryMap<NodeId, Vec<NodeId>>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// An empty tree using the default [`Config`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Arc::new(Config::default()))
    }

    /// An empty tree whose new nodes follow `config`.
    #[must_use]
    pub fn with_config(config: Arc<Config>) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            config,
            generation: 0,
            stats: LayoutStats::default(),
            pending_boundaries: Vec::new(),
            sharers: SecondaryMap::new(),
        }
    }

    /// The config new nodes receive.
    #[must_use]
    pub const fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Create a detached node following the tree's config.
    pub fn new_node(&mut self) -> NodeId {
        let config = Arc::clone(&self.config);
        self.nodes.insert(Node::new(config))
    }

    /// Create a detached node following `config`.
    pub fn new_node_with_config(&mut self, config: Arc<Config>) -> NodeId {
        self.nodes.insert(Node::new(config))
    }

    /// Whether `node` is live.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node.
    #[must_use]
    pub fn get(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node)
    }

    /// A node's style.
    #[must_use]
    pub fn style(&self, node: NodeId) -> Option<&Style> {
        self.nodes.get(node).map(Node::style)
    }

    /// A node's rounded layout.
    #[must_use]
    pub fn layout(&self, node: NodeId) -> Option<&ComputedLayout> {
        self.nodes.get(node).map(Node::layout)
    }

    /// A node's children, or an empty slice for unknown ids.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map_or(&[], Node::children)
    }

    /// The child at `index`.
    #[must_use]
    pub fn child(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.children(node).get(index).copied()
    }

    /// Number of children.
    #[must_use]
    pub fn child_count(&self, node: NodeId) -> usize {
        self.children(node).len()
    }

    /// A node's owner.
    #[must_use]
    pub fn owner(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(Node::owner)
    }

    /// Iterate over the owner chain, nearest first.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.owner(node), |id| self.owner(*id))
    }

    /// Whether `node` can be reached from `root` through child lists.
    #[must_use]
    pub fn is_descendant_of(&self, node: NodeId, root: NodeId) -> bool {
        let mut stack: Vec<NodeId> = self.children(root).to_vec();
        while let Some(current) = stack.pop() {
            if current == node {
                return true;
            }
            stack.extend_from_slice(self.children(current));
        }
        false
    }

    /// Counters from the most recent [`Tree::compute_layout`].
    #[must_use]
    pub const fn last_layout_stats(&self) -> LayoutStats {
        self.stats
    }

    // ===== error reporting =====

    /// Log `error` through the relevant config and hand it back.
    pub(crate) fn report(&self, node: Option<NodeId>, error: TreeError) -> TreeError {
        let config = node
            .and_then(|id| self.nodes.get(id))
            .map_or(&self.config, |n| &n.config);
        config.log(node, LogLevel::Error, &error.to_string());
        error
    }

    fn existing(&self, node: NodeId) -> Result<&Node, TreeError> {
        self.nodes
            .get(node)
            .ok_or_else(|| self.report(None, TreeError::UnknownNode(node)))
    }

    /// Mutable access for operations that change a node's content.
    pub(crate) fn unsealed_mut(&mut self, node: NodeId) -> Result<&mut Node, TreeError> {
        match self.nodes.get(node) {
            None => return Err(self.report(None, TreeError::UnknownNode(node))),
            Some(n) if n.sealed => return Err(self.report(Some(node), TreeError::Sealed(node))),
            Some(_) => {}
        }
        self.nodes
            .get_mut(node)
            .ok_or(TreeError::UnknownNode(node))
    }

    // ===== dirtiness =====

    /// Mark `node` and its ancestors dirty, stopping at a layout boundary.
    pub(crate) fn mark_dirty_and_propagate(&mut self, node: NodeId) {
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(n) = self.nodes.get_mut(id) else {
                return;
            };
            if n.is_dirty {
                return;
            }
            n.is_dirty = true;
            n.state.computed_flex_basis = None;
            let dirtied = n.dirtied.clone();
            let boundary = n.layout_boundary;
            current = n.owner;
            if let Some(callback) = dirtied {
                callback(id);
            }
            if boundary {
                if !self.pending_boundaries.contains(&id) {
                    self.pending_boundaries.push(id);
                }
                return;
            }
        }
    }

    /// Tell the engine a measured leaf's content changed.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotMeasured`] if `node` has no measure callback; only
    /// measured leaves have inputs the engine cannot observe.
    pub fn mark_dirty(&mut self, node: NodeId) -> Result<(), TreeError> {
        if !self.existing(node)?.has_measure_func() {
            return Err(self.report(Some(node), TreeError::NotMeasured(node)));
        }
        self.mark_dirty_and_propagate(node);
        Ok(())
    }

    // ===== child list mutation =====

    /// Insert `child` into `parent`'s children at `index`.
    ///
    /// # Errors
    ///
    /// Fails if either node is unknown, `parent` is sealed or measured,
    /// `child` already has an owner, `index` is past the end, or `child`
    /// is `parent` or one of its ancestors.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
    ) -> Result<(), TreeError> {
        if let Some(owner) = self.existing(child)?.owner {
            return Err(self.report(Some(parent), TreeError::ChildHasOwner { child, owner }));
        }
        let parent_node = self.unsealed_mut(parent)?;
        if parent_node.measure.is_some() {
            return Err(self.report(Some(parent), TreeError::HasMeasureFunc(parent)));
        }
        let len = parent_node.children.len();
        if index > len {
            return Err(self.report(
                Some(parent),
                TreeError::ChildIndexOutOfBounds { index, len },
            ));
        }
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(self.report(Some(parent), TreeError::Cycle { parent, child }));
        }

        self.nodes[parent].children.insert(index, child);
        self.nodes[child].owner = Some(parent);
        self.mark_dirty_and_propagate(parent);
        Ok(())
    }

    /// Append `child` to `parent`'s children.
    ///
    /// # Errors
    ///
    /// See [`Tree::insert_child`].
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let index = self.child_count(parent);
        self.insert_child(parent, child, index)
    }

    /// Remove `child` from `parent`. Removing a node that is not a child is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// Fails if `parent` is unknown or sealed.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let parent_node = self.unsealed_mut(parent)?;
        let Some(position) = parent_node.children.iter().position(|id| *id == child) else {
            return Ok(());
        };
        let _ = parent_node.children.remove(position);
        self.release(parent, child);
        self.mark_dirty_and_propagate(parent);
        Ok(())
    }

    /// Remove every child of `parent`.
    ///
    /// # Errors
    ///
    /// Fails if `parent` is unknown or sealed.
    pub fn remove_all_children(&mut self, parent: NodeId) -> Result<(), TreeError> {
        let children = std::mem::take(&mut self.unsealed_mut(parent)?.children);
        if children.is_empty() {
            return Ok(());
        }
        for child in children {
            self.release(parent, child);
        }
        self.mark_dirty_and_propagate(parent);
        Ok(())
    }

    /// Replace `parent`'s children with `children`.
    ///
    /// Old children absent from the new list are released; children already
    /// owned by `parent` may appear in the new list.
    ///
    /// # Errors
    ///
    /// Fails, changing nothing, if any node is unknown, `parent` is sealed
    /// or measured, a new child belongs to another node, or a new child
    /// would create a cycle.
    pub fn set_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<(), TreeError> {
        if self.unsealed_mut(parent)?.measure.is_some() && !children.is_empty() {
            return Err(self.report(Some(parent), TreeError::HasMeasureFunc(parent)));
        }
        for child in children {
            match self.existing(*child)?.owner {
                Some(owner) if owner != parent => {
                    return Err(self.report(
                        Some(parent),
                        TreeError::ChildHasOwner {
                            child: *child,
                            owner,
                        },
                    ));
                }
                _ => {}
            }
            if *child == parent || self.is_descendant_of(parent, *child) {
                return Err(self.report(
                    Some(parent),
                    TreeError::Cycle {
                        parent,
                        child: *child,
                    },
                ));
            }
        }

        let old = std::mem::replace(&mut self.nodes[parent].children, children.to_vec());
        for child in old.iter().filter(|id| !children.contains(id)) {
            self.release(parent, *child);
        }
        for child in children {
            self.nodes[*child].owner = Some(parent);
        }
        self.mark_dirty_and_propagate(parent);
        Ok(())
    }

    /// Detach `child` from `parent` if `parent` owns it, resetting its layout.
    fn release(&mut self, parent: NodeId, child: NodeId) {
        let Some(node) = self.nodes.get_mut(child) else {
            return;
        };
        if node.owner == Some(parent) {
            node.owner = None;
            node.unrounded = ComputedLayout::default();
            node.layout = ComputedLayout::default();
            node.state = LayoutState::default();
        }
    }

    /// Swap the child at `index` for `replacement`, used by copy-on-write.
    pub(crate) fn replace_child(&mut self, parent: NodeId, index: usize, replacement: NodeId) {
        if let Some(slot) = self.nodes[parent].children.get_mut(index) {
            *slot = replacement;
        }
    }

    // ===== lifetime =====

    /// Destroy `node`, detaching it from its owner and orphaning its children.
    ///
    /// Any other node that listed `node` as a shared child forgets it.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownNode`] if `node` is not live.
    pub fn free(&mut self, node: NodeId) -> Result<(), TreeError> {
        let owner = self.existing(node)?.owner;
        if let Some(owner) = owner {
            self.detach_from(owner, node);
        }
        let children = self.nodes[node].children.clone();
        for child in children {
            if let Some(child_node) = self.nodes.get_mut(child) {
                if child_node.owner == Some(node) {
                    child_node.owner = None;
                }
            }
        }
        self.forget(&[node]);
        Ok(())
    }

    /// Destroy `node` and every descendant it owns.
    ///
    /// Shared children owned by some other node survive.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownNode`] if `node` is not live.
    pub fn free_recursive(&mut self, node: NodeId) -> Result<(), TreeError> {
        let owner = self.existing(node)?.owner;
        if let Some(owner) = owner {
            self.detach_from(owner, node);
        }

        let mut doomed = vec![node];
        let mut cursor = 0;
        while cursor < doomed.len() {
            let current = doomed[cursor];
            cursor += 1;
            for child in self.children(current) {
                if self.owner(*child) == Some(current) {
                    doomed.push(*child);
                }
            }
        }
        self.forget(&doomed);
        Ok(())
    }

    /// Drop `node` from `owner`'s child list without resetting it.
    fn detach_from(&mut self, owner: NodeId, node: NodeId) {
        if let Some(owner_node) = self.nodes.get_mut(owner) {
            owner_node.children.retain(|id| *id != node);
            self.mark_dirty_and_propagate(owner);
        }
    }

    /// Remove `doomed` from the arena and from the child lists of clones
    /// still sharing them. Owners have already let go.
    fn forget(&mut self, doomed: &[NodeId]) {
        for id in doomed {
            let _ = self.nodes.remove(*id);
        }
        for id in doomed {
            for sharer in self.sharers.remove(*id).unwrap_or_default() {
                if let Some(node) = self.nodes.get_mut(sharer) {
                    node.children.retain(|child| child != id);
                }
            }
        }
        if !self.pending_boundaries.is_empty() {
            self.pending_boundaries.retain(|id| !doomed.contains(id));
        }
    }

    /// Return a detached, childless node to its freshly created state.
    ///
    /// # Errors
    ///
    /// Fails if `node` is unknown, sealed, still has children or is still
    /// attached to an owner.
    pub fn reset(&mut self, node: NodeId) -> Result<(), TreeError> {
        let n = self.unsealed_mut(node)?;
        if !n.children.is_empty() {
            return Err(self.report(Some(node), TreeError::HasChildren(node)));
        }
        if let Some(owner) = n.owner {
            return Err(self.report(Some(node), TreeError::ChildHasOwner { child: node, owner }));
        }
        let config = Arc::clone(&n.config);
        *n = Node::new(config);
        Ok(())
    }

    /// Structural copy of `node`: same style and callbacks, detached, empty
    /// cache. The copy lists the original's children but owns none of them,
    /// so the two trees share those subtrees until one side clones them.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownNode`] if `node` is not live.
    pub fn clone_node(&mut self, node: NodeId) -> Result<NodeId, TreeError> {
        let copy = self.existing(node)?.shallow_clone();
        let children = copy.children.clone();
        let id = self.nodes.insert(copy);
        for child in children {
            if let Some(entry) = self.sharers.entry(child) {
                entry.or_default().push(id);
            }
        }
        Ok(id)
    }

    /// Give every child `parent` does not own a private copy, via the
    /// config's clone hook. Runs before `parent` lays its children out.
    pub(crate) fn clone_children_if_needed(&mut self, parent: NodeId) {
        let children = self.nodes[parent].children.clone();
        if children.iter().all(|child| self.owner(*child) == Some(parent)) {
            return;
        }
        let config = Arc::clone(&self.nodes[parent].config);
        for (index, child) in children.into_iter().enumerate() {
            if self.owner(child) == Some(parent) {
                continue;
            }
            match config.clone_node(self, child, parent, index) {
                Ok(clone) => {
                    if let Some(sharers) = self.sharers.get_mut(child) {
                        sharers.retain(|id| *id != parent);
                    }
                    self.replace_child(parent, index, clone);
                    self.nodes[clone].owner = Some(parent);
                }
                Err(error) => {
                    let _ = self.report(Some(parent), error);
                }
            }
        }
    }

    // ===== per-node configuration =====

    /// Make `node` follow `config`.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownNode`] if `node` is not live.
    pub fn set_config(&mut self, node: NodeId, config: Arc<Config>) -> Result<(), TreeError> {
        let _ = self.existing(node)?;
        self.nodes[node].config = config;
        Ok(())
    }

    /// Make `node` follow the tree's default config again.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownNode`] if `node` is not live.
    pub fn reset_config(&mut self, node: NodeId) -> Result<(), TreeError> {
        let config = Arc::clone(&self.config);
        self.set_config(node, config)
    }

    /// Attach an intrinsic-size callback to a leaf.
    ///
    /// # Errors
    ///
    /// Fails if `node` is unknown, sealed, or has children.
    pub fn set_measure_func(
        &mut self,
        node: NodeId,
        measure: impl Fn(MeasureInput) -> Size + Send + Sync + 'static,
    ) -> Result<(), TreeError> {
        let n = self.unsealed_mut(node)?;
        if !n.children.is_empty() {
            return Err(self.report(Some(node), TreeError::HasChildren(node)));
        }
        let measure: MeasureFn = Arc::new(measure);
        n.measure = Some(measure);
        n.node_type = NodeType::Text;
        self.mark_dirty_and_propagate(node);
        Ok(())
    }

    /// Detach the measure callback.
    ///
    /// # Errors
    ///
    /// Fails if `node` is unknown or sealed.
    pub fn unset_measure_func(&mut self, node: NodeId) -> Result<(), TreeError> {
        let n = self.unsealed_mut(node)?;
        if n.measure.take().is_some() {
            n.node_type = NodeType::Default;
            self.mark_dirty_and_propagate(node);
        }
        Ok(())
    }

    /// Attach or remove a baseline callback.
    ///
    /// # Errors
    ///
    /// Fails if `node` is unknown or sealed.
    pub fn set_baseline_func(
        &mut self,
        node: NodeId,
        baseline: Option<BaselineFn>,
    ) -> Result<(), TreeError> {
        let n = self.unsealed_mut(node)?;
        n.baseline = baseline;
        self.mark_dirty_and_propagate(node);
        Ok(())
    }

    /// Attach or remove the clean-to-dirty notification.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownNode`] if `node` is not live.
    pub fn set_dirtied_func(
        &mut self,
        node: NodeId,
        dirtied: Option<DirtiedFn>,
    ) -> Result<(), TreeError> {
        let _ = self.existing(node)?;
        self.nodes[node].dirtied = dirtied;
        Ok(())
    }

    /// Choose how `node` is rounded.
    ///
    /// # Errors
    ///
    /// Fails if `node` is unknown or sealed.
    pub fn set_node_type(&mut self, node: NodeId, node_type: NodeType) -> Result<(), TreeError> {
        self.unsealed_mut(node)?.node_type = node_type;
        Ok(())
    }

    /// Declare that `node`'s size never depends on its owner's available
    /// space, so dirtiness below it stops there.
    ///
    /// # Errors
    ///
    /// Fails if `node` is unknown or sealed.
    pub fn set_layout_boundary(&mut self, node: NodeId, boundary: bool) -> Result<(), TreeError> {
        self.unsealed_mut(node)?.layout_boundary = boundary;
        Ok(())
    }

    /// Prefer `node` when its owner picks the child that supplies its baseline.
    ///
    /// # Errors
    ///
    /// Fails if `node` is unknown or sealed.
    pub fn set_is_reference_baseline(
        &mut self,
        node: NodeId,
        reference: bool,
    ) -> Result<(), TreeError> {
        let n = self.unsealed_mut(node)?;
        if n.is_reference_baseline != reference {
            n.is_reference_baseline = reference;
            self.mark_dirty_and_propagate(node);
        }
        Ok(())
    }

    // ===== sealing =====

    /// Reject mutation of `node` and its subtree until [`Tree::unseal`].
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownNode`] if `node` is not live.
    pub fn seal(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.set_sealed(node, true)
    }

    /// Allow mutation of `node` and its subtree again.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownNode`] if `node` is not live.
    pub fn unseal(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.set_sealed(node, false)
    }

    fn set_sealed(&mut self, node: NodeId, sealed: bool) -> Result<(), TreeError> {
        let _ = self.existing(node)?;
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let n = &mut self.nodes[id];
            n.sealed = sealed;
            stack.extend_from_slice(&n.children);
        }
        Ok(())
    }

    // ===== new-layout acknowledgement =====

    /// Whether the last pass moved or resized `node`.
    #[must_use]
    pub fn has_new_layout(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(Node::has_new_layout)
    }

    /// Read and clear the new-layout flag.
    pub fn take_new_layout(&mut self, node: NodeId) -> bool {
        self.nodes
            .get_mut(node)
            .is_some_and(|n| std::mem::take(&mut n.has_new_layout))
    }

    /// Acknowledge the current layout of `node`.
    pub fn mark_layout_seen(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.has_new_layout = false;
        }
    }

    // ===== debugging =====

    /// JSON snapshot of `node` (and, by default, its subtree).
    #[must_use]
    pub fn dump(&self, node: NodeId, options: DumpOptions) -> Value {
        let Some(n) = self.nodes.get(node) else {
            return Value::Null;
        };
        let mut out = json!({ "id": format!("{node:?}") });
        if options.layout {
            let layout = &n.layout;
            out["layout"] = json!({
                "left": layout.left(),
                "top": layout.top(),
                "width": layout.width(),
                "height": layout.height(),
                "direction": layout.direction.to_string(),
                "had_overflow": layout.had_overflow,
            });
        }
        if options.style {
            out["style"] = serde_json::to_value(&n.style).unwrap_or(Value::Null);
        }
        if options.children && !n.children.is_empty() {
            out["children"] = n
                .children
                .iter()
                .map(|child| self.dump(*child, options))
                .collect();
        }
        out
    }
}
