use anyhow::Result;

use crate::nav::lifecycle::{LifecycleNode, LifecycleState};
use crate::nav::style::Visual;

/// Explicit ownership wrapper around a lifecycle component.
///
/// The container that creates a component owns its destruction. Dropping a
/// node that was never destroyed runs `destroy` as a diagnostic fallback,
/// so a leaked component still tears down, with a debug log pointing at the
/// owner that forgot.
pub struct OwnedNode(Box<dyn LifecycleNode + Send>);

impl OwnedNode {
    pub fn new(node: impl LifecycleNode + Send + 'static) -> Self {
        Self(Box::new(node))
    }

    pub fn get(&self) -> &(dyn LifecycleNode + Send) {
        self.0.as_ref()
    }

    pub fn get_mut(&mut self) -> &mut (dyn LifecycleNode + Send) {
        self.0.as_mut()
    }
}

impl Drop for OwnedNode {
    fn drop(&mut self) {
        if self.0.state() != LifecycleState::Destroyed {
            log::debug!("component dropped in state {:?} without destroy()", self.0.state());
            self.0.destroy();
        }
    }
}

/// One entry in a composite container's child tree.
///
/// Only `Node` is a lifecycle boundary; `Layout` wrappers are transparent to
/// propagation and may nest arbitrarily deep; `Visual` leaves never
/// participate.
pub enum Child {
    /// A lifecycle boundary. Propagation stops here: the node is responsible
    /// for its own subtree.
    Node(OwnedNode),

    /// A non-lifecycle layout wrapper; propagation recurses into it.
    Layout(Vec<Child>),

    /// A plain visual leaf.
    Visual(Visual),
}

impl Child {
    pub fn node(node: impl LifecycleNode + Send + 'static) -> Self {
        Child::Node(OwnedNode::new(node))
    }

    pub fn layout(children: Vec<Child>) -> Self {
        Child::Layout(children)
    }

    pub fn visual(visual: Visual) -> Self {
        Child::Visual(visual)
    }
}

/// Mounts every lifecycle boundary in the tree, depth-first, without
/// descending into a boundary's own children. A tree with no boundaries is
/// a no-op traversal.
pub fn mount_children(children: &mut [Child]) -> Result<()> {
    for child in children {
        match child {
            Child::Node(node) => node.get_mut().mount()?,
            Child::Layout(inner) => mount_children(inner)?,
            Child::Visual(_) => {}
        }
    }
    Ok(())
}

/// Unmount counterpart of [`mount_children`]. Individual unmount failures
/// are already swallowed by the state machine, so one broken component
/// never prevents the rest of the tree from tearing down.
pub fn unmount_children(children: &mut [Child]) {
    for child in children {
        match child {
            Child::Node(node) => node.get_mut().unmount(),
            Child::Layout(inner) => unmount_children(inner),
            Child::Visual(_) => {}
        }
    }
}

/// Destroys every boundary in the tree. Used by owners on final teardown.
pub fn destroy_children(children: &mut [Child]) {
    for child in children {
        match child {
            Child::Node(node) => node.get_mut().destroy(),
            Child::Layout(inner) => destroy_children(inner),
            Child::Visual(_) => {}
        }
    }
}

pub struct Tab {
    pub title: String,
    pub children: Vec<Child>,
}

impl Tab {
    pub fn new(title: impl Into<String>, children: Vec<Child>) -> Self {
        Self { title: title.into(), children }
    }
}

/// A composite container that only keeps its active tab's components
/// mounted. Switching tabs unmounts the outgoing tab's boundaries and
/// mounts the incoming ones, without knowing their concrete types.
pub struct TabbedView {
    tabs: Vec<Tab>,
    active: usize,
    state: LifecycleState,
}

impl TabbedView {
    pub fn new(tabs: Vec<Tab>) -> Self {
        Self { tabs, active: 0, state: LifecycleState::Uninitialized }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Activates the tab at `index`. No-op for the current tab or an
    /// out-of-range index. Propagation only happens while the view itself
    /// is mounted.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if index == self.active || index >= self.tabs.len() {
            return Ok(());
        }
        if self.state == LifecycleState::Mounted {
            unmount_children(&mut self.tabs[self.active].children);
        }
        self.active = index;
        if self.state == LifecycleState::Mounted {
            mount_children(&mut self.tabs[self.active].children)?;
        }
        Ok(())
    }
}

impl LifecycleNode for TabbedView {
    fn state(&self) -> LifecycleState {
        self.state
    }

    fn set_state(&mut self, state: LifecycleState) {
        self.state = state;
    }

    fn on_mount(&mut self) -> Result<()> {
        match self.tabs.get_mut(self.active) {
            Some(tab) => mount_children(&mut tab.children),
            None => Ok(()),
        }
    }

    fn on_unmount(&mut self) -> Result<()> {
        if let Some(tab) = self.tabs.get_mut(self.active) {
            unmount_children(&mut tab.children);
        }
        Ok(())
    }

    fn on_destroy(&mut self) -> Result<()> {
        for tab in &mut self.tabs {
            destroy_children(&mut tab.children);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Leaf {
        state: LifecycleState,
        mounts: Arc<AtomicUsize>,
        unmounts: Arc<AtomicUsize>,
    }

    impl Leaf {
        fn new(mounts: &Arc<AtomicUsize>, unmounts: &Arc<AtomicUsize>) -> Self {
            Self {
                state: LifecycleState::Uninitialized,
                mounts: mounts.clone(),
                unmounts: unmounts.clone(),
            }
        }
    }

    impl LifecycleNode for Leaf {
        fn state(&self) -> LifecycleState {
            self.state
        }

        fn set_state(&mut self, state: LifecycleState) {
            self.state = state;
        }

        fn on_mount(&mut self) -> Result<()> {
            self.mounts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_unmount(&mut self) -> Result<()> {
            self.unmounts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn propagation_reaches_nested_boundaries_once() {
        let mounts = Arc::new(AtomicUsize::new(0));
        let unmounts = Arc::new(AtomicUsize::new(0));

        // Two boundaries at different depths inside plain layout wrappers.
        let mut tree = vec![
            Child::node(Leaf::new(&mounts, &unmounts)),
            Child::layout(vec![
                Child::visual(Visual::new("spacer")),
                Child::layout(vec![Child::node(Leaf::new(&mounts, &unmounts))]),
            ]),
        ];

        mount_children(&mut tree).unwrap();
        assert_eq!(mounts.load(Ordering::SeqCst), 2);

        unmount_children(&mut tree);
        assert_eq!(unmounts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn propagation_stops_at_boundary_subtrees() {
        let outer = Arc::new(AtomicUsize::new(0));
        let outer_un = Arc::new(AtomicUsize::new(0));
        let inner = Arc::new(AtomicUsize::new(0));
        let inner_un = Arc::new(AtomicUsize::new(0));

        // A TabbedView is a boundary; the leaf inside its active tab is
        // mounted by the view itself, not a second time by the outer walk.
        let view = TabbedView::new(vec![Tab::new(
            "today",
            vec![Child::node(Leaf::new(&inner, &inner_un))],
        )]);

        let mut tree = vec![
            Child::node(Leaf::new(&outer, &outer_un)),
            Child::layout(vec![Child::node(view)]),
        ];

        mount_children(&mut tree).unwrap();
        assert_eq!(outer.load(Ordering::SeqCst), 1);
        assert_eq!(inner.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_tree_is_noop() {
        let mut tree = vec![
            Child::visual(Visual::new("label")),
            Child::layout(vec![Child::visual(Visual::new("row"))]),
        ];
        mount_children(&mut tree).unwrap();
        unmount_children(&mut tree);
    }

    #[test]
    fn tab_switch_swaps_mounted_subtrees() {
        let first = Arc::new(AtomicUsize::new(0));
        let first_un = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let second_un = Arc::new(AtomicUsize::new(0));

        let mut view = TabbedView::new(vec![
            Tab::new("chores", vec![Child::node(Leaf::new(&first, &first_un))]),
            Tab::new("rewards", vec![Child::node(Leaf::new(&second, &second_un))]),
        ]);

        view.mount().unwrap();
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);

        view.select(1).unwrap();
        assert_eq!(first_un.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn tab_switch_while_unmounted_defers_mounting() {
        let first = Arc::new(AtomicUsize::new(0));
        let first_un = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let second_un = Arc::new(AtomicUsize::new(0));

        let mut view = TabbedView::new(vec![
            Tab::new("chores", vec![Child::node(Leaf::new(&first, &first_un))]),
            Tab::new("rewards", vec![Child::node(Leaf::new(&second, &second_un))]),
        ]);

        view.select(1).unwrap();
        assert_eq!(second.load(Ordering::SeqCst), 0);

        view.mount().unwrap();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_undestroyed_node_runs_fallback_destroy() {
        struct Tracked {
            state: LifecycleState,
            destroys: Arc<AtomicUsize>,
        }

        impl LifecycleNode for Tracked {
            fn state(&self) -> LifecycleState {
                self.state
            }

            fn set_state(&mut self, state: LifecycleState) {
                self.state = state;
            }

            fn on_destroy(&mut self) -> Result<()> {
                self.destroys.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let destroys = Arc::new(AtomicUsize::new(0));
        {
            let _node = OwnedNode::new(Tracked {
                state: LifecycleState::Mounted,
                destroys: destroys.clone(),
            });
        }
        assert_eq!(destroys.load(Ordering::SeqCst), 1);

        // An explicitly destroyed node is not destroyed twice on drop.
        {
            let mut node = OwnedNode::new(Tracked {
                state: LifecycleState::Mounted,
                destroys: destroys.clone(),
            });
            node.get_mut().destroy();
        }
        assert_eq!(destroys.load(Ordering::SeqCst), 2);
    }
}
