//! Hierarchy of analysis results with change notification.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Listeners
//! subscribe to a node and hear about every result attached anywhere in
//! its subtree: attaching a node notifies each listener on the path from
//! the new node's parent up to its root, once per listener.

use std::fmt;

/// Handle to a node of a [`ResultTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena position of the node.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Event delivered when a result is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultAdded {
    /// The new node.
    pub child: NodeId,
    /// The node it was attached under.
    pub parent: NodeId,
}

type Listener = Box<dyn FnMut(&ResultAdded)>;

struct Node<T> {
    payload: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<Listener>,
}

/// Forest of results of type `T`.
///
/// # Examples
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use u_tendency::result_tree::ResultTree;
///
/// let mut tree = ResultTree::new();
/// let root = tree.add_root("analysis");
/// let heard = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&heard);
/// tree.subscribe(root, move |_| counter.set(counter.get() + 1));
///
/// let child = tree.attach(root, "hopkins");
/// tree.attach(child, "detail");
/// assert_eq!(heard.get(), 2);
/// assert_eq!(tree.children(root), &[child]);
/// ```
pub struct ResultTree<T> {
    nodes: Vec<Node<T>>,
}

impl<T> ResultTree<T> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a parentless node. No listener is notified.
    pub fn add_root(&mut self, payload: T) -> NodeId {
        self.push(payload, None)
    }

    /// Adds `payload` under `parent` and notifies the listeners of
    /// `parent` and all of its ancestors.
    ///
    /// # Panics
    /// Panics if `parent` does not belong to this tree.
    pub fn attach(&mut self, parent: NodeId, payload: T) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "unknown parent {parent}");
        let child = self.push(payload, Some(parent));
        self.nodes[parent.0].children.push(child);

        let event = ResultAdded { child, parent };
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            let node = &mut self.nodes[id.0];
            for listener in &mut node.listeners {
                listener(&event);
            }
            cursor = node.parent;
        }
        child
    }

    /// Registers `listener` for results attached anywhere below `node`.
    ///
    /// # Panics
    /// Panics if `node` does not belong to this tree.
    pub fn subscribe<F>(&mut self, node: NodeId, listener: F)
    where
        F: FnMut(&ResultAdded) + 'static,
    {
        self.nodes[node.0].listeners.push(Box::new(listener));
    }

    /// Whether `node` belongs to this tree.
    pub fn contains(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    /// Payload of `node`, if it exists.
    pub fn get(&self, node: NodeId) -> Option<&T> {
        self.nodes.get(node.0).map(|n| &n.payload)
    }

    /// Parent of `node`; `None` for roots and unknown ids.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    /// Children of `node` in attachment order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map_or(&[][..], |n| n.children.as_slice())
    }

    fn push(&mut self, payload: T, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            payload,
            parent,
            children: Vec::new(),
            listeners: Vec::new(),
        });
        id
    }
}

impl<T> Default for ResultTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ResultTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.nodes.iter().map(|n| (&n.payload, n.parent)))
            .finish()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
