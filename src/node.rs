//! Internal node implementation for the command tree.
//!
//! This module contains the `Node` structure and the `Arena` that owns every
//! node of a tree. Nodes are addressed by `NodeId` indices so that views into
//! the tree can alias any subtree without copying it or borrowing a node
//! directly.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use log::debug;
use once_cell::sync::OnceCell;

use crate::{Error, Result};

/// Stable index of a node inside an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    /// The root node is always the first node of an arena
    pub const ROOT: NodeId = NodeId(0);
}

/// Either a routing node that branches further or a terminal node that
/// carries a payload.
///
/// A terminal node has no children map at all, so it can never be given
/// children once created.
#[derive(Debug)]
pub(crate) enum NodeKind<K, T> {
    Routing {
        /// Child nodes indexed by their segment name
        children: HashMap<K, NodeId>,

        /// Child names in ascending order, computed on first use.
        ///
        /// Cleared whenever a child is attached to this node.
        sorted: OnceCell<Vec<K>>,
    },
    Terminal {
        value: T,
    },
}

/// One segment of a command path.
#[derive(Debug)]
pub(crate) struct Node<K, T> {
    /// The segment name. Only the root has no name.
    pub name: Option<K>,

    pub kind: NodeKind<K, T>,
}

impl<K, T> Node<K, T> {
    /// Creates the unnamed root node
    pub fn root() -> Self {
        Node {
            name: None,
            kind: NodeKind::routing(),
        }
    }

    /// Creates a routing node with the given segment name
    pub fn routing(name: K) -> Self {
        Node {
            name: Some(name),
            kind: NodeKind::routing(),
        }
    }

    /// Creates a terminal node carrying `value`
    pub fn terminal(name: K, value: T) -> Self {
        Node {
            name: Some(name),
            kind: NodeKind::Terminal { value },
        }
    }

    /// Creates a terminal node if a value is given, a routing node otherwise
    pub fn with_value(name: K, value: Option<T>) -> Self {
        match value {
            Some(value) => Node::terminal(name, value),
            None => Node::routing(name),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, NodeKind::Terminal { .. })
    }

    /// Returns the payload of a terminal node
    pub fn value(&self) -> Option<&T> {
        match &self.kind {
            NodeKind::Terminal { value } => Some(value),
            NodeKind::Routing { .. } => None,
        }
    }
}

impl<K, T> NodeKind<K, T> {
    fn routing() -> Self {
        NodeKind::Routing {
            children: HashMap::new(),
            sorted: OnceCell::new(),
        }
    }
}

/// Owner of every node in a tree.
#[derive(Debug)]
pub(crate) struct Arena<K, T> {
    nodes: Vec<Node<K, T>>,
}

impl<K, T> Arena<K, T> {
    /// Creates an arena holding only the root node
    pub fn new() -> Self {
        Arena {
            nodes: vec![Node::root()],
        }
    }

    pub fn node(&self, id: NodeId) -> &Node<K, T> {
        &self.nodes[id.0]
    }

    /// Total number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl<K, T> Arena<K, T>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    /// Attaches `node` under `parent`.
    ///
    /// Fails if a child with the same name already exists, if `parent` is a
    /// terminal node, or if `node` is an unnamed root node.
    pub fn add_child(&mut self, parent: NodeId, node: Node<K, T>) -> Result<NodeId> {
        let name = node.name.clone().ok_or(Error::UnnamedNode)?;
        match &self.node(parent).kind {
            NodeKind::Terminal { .. } => {
                return Err(Error::TerminalNode {
                    key: self.describe(parent),
                });
            }
            NodeKind::Routing { children, .. } => {
                if children.contains_key(&name) {
                    return Err(Error::DuplicateKey {
                        key: format!("{:?}", name),
                        parent: self.describe(parent),
                    });
                }
            }
        }
        Ok(self.attach(parent, name, node))
    }

    /// Attaches `node` under `parent` unless a child with the same name
    /// already exists, in which case the existing child is returned and
    /// `node` (payload included) is dropped.
    pub fn add_child_if_absent(&mut self, parent: NodeId, node: Node<K, T>) -> Result<NodeId> {
        let name = node.name.clone().ok_or(Error::UnnamedNode)?;
        let existing = match &self.node(parent).kind {
            NodeKind::Terminal { .. } => {
                return Err(Error::TerminalNode {
                    key: self.describe(parent),
                });
            }
            NodeKind::Routing { children, .. } => children.get(&name).copied(),
        };
        match existing {
            Some(existing) => {
                if node.is_terminal() {
                    debug!("keeping existing node {:?}, new payload ignored", name);
                }
                Ok(existing)
            }
            None => Ok(self.attach(parent, name, node)),
        }
    }

    fn attach(&mut self, parent: NodeId, name: K, node: Node<K, T>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        if let NodeKind::Routing { children, sorted } = &mut self.nodes[parent.0].kind {
            children.insert(name, id);
            sorted.take();
        }
        id
    }

    /// Renders the name of a node for error messages
    fn describe(&self, id: NodeId) -> String {
        match &self.node(id).name {
            Some(name) => format!("{:?}", name),
            None => "<root>".to_string(),
        }
    }

    pub fn get_child<Q>(&self, parent: NodeId, name: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &self.node(parent).kind {
            NodeKind::Routing { children, .. } => children.get(name).copied(),
            NodeKind::Terminal { .. } => None,
        }
    }

    /// Like [`Arena::get_child`] but fails with `NodeNotFound` when absent
    pub fn get_child_checked<Q>(&self, parent: NodeId, name: &Q) -> Result<NodeId>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.get_child(parent, name).ok_or_else(|| Error::NodeNotFound {
            key: format!("{:?}", name),
            parent: self.describe(parent),
        })
    }

    pub fn has_child<Q>(&self, parent: NodeId, name: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_child(parent, name).is_some()
    }

    /// Immediate child names of `parent`
    pub fn children(&self, parent: NodeId) -> HashSet<&K> {
        match &self.node(parent).kind {
            NodeKind::Routing { children, .. } => children.keys().collect(),
            NodeKind::Terminal { .. } => HashSet::new(),
        }
    }

    /// Immediate child names of `parent` in ascending order
    pub fn sorted_children(&self, parent: NodeId) -> &[K]
    where
        K: Ord,
    {
        match &self.node(parent).kind {
            NodeKind::Routing { children, sorted } => sorted.get_or_init(|| {
                let mut names: Vec<K> = children.keys().cloned().collect();
                names.sort();
                names
            }),
            NodeKind::Terminal { .. } => &[],
        }
    }

    /// Returns the number of terminal nodes in the subtree under `id`
    pub fn subtree_size(&self, id: NodeId) -> usize {
        match &self.node(id).kind {
            NodeKind::Terminal { .. } => 1,
            NodeKind::Routing { children, .. } => {
                children.values().map(|&child| self.subtree_size(child)).sum()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_arena() {
        let arena: Arena<String, u32> = Arena::new();
        let root = arena.node(NodeId::ROOT);

        assert!(root.name.is_none());
        assert!(!root.is_terminal());
        assert!(arena.children(NodeId::ROOT).is_empty());
        assert_eq!(arena.node_count(), 1);
    }

    #[test]
    fn test_with_value() {
        let node: Node<String, u32> = Node::with_value("add".to_string(), Some(42));
        assert!(node.is_terminal());
        assert_eq!(node.value(), Some(&42));

        let node: Node<String, u32> = Node::with_value("math".to_string(), None);
        assert!(!node.is_terminal());
        assert_eq!(node.value(), None);
    }

    #[test]
    fn test_add_child_duplicate() {
        let mut arena: Arena<String, u32> = Arena::new();
        arena
            .add_child(NodeId::ROOT, Node::routing("x".to_string()))
            .unwrap();

        let err = arena
            .add_child(NodeId::ROOT, Node::routing("x".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { .. }));
    }

    #[test]
    fn test_add_child_to_terminal() {
        let mut arena: Arena<String, u32> = Arena::new();
        let leaf = arena
            .add_child(NodeId::ROOT, Node::terminal("leaf".to_string(), 1))
            .unwrap();

        let err = arena
            .add_child(leaf, Node::routing("below".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::TerminalNode { .. }));

        let err = arena
            .add_child_if_absent(leaf, Node::routing("below".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::TerminalNode { .. }));
    }

    #[test]
    fn test_root_cannot_be_child() {
        let mut arena: Arena<String, u32> = Arena::new();
        let err = arena.add_child(NodeId::ROOT, Node::root()).unwrap_err();
        assert_eq!(err, Error::UnnamedNode);
    }

    #[test]
    fn test_add_child_if_absent_keeps_first() {
        let mut arena: Arena<String, u32> = Arena::new();
        let first = arena
            .add_child_if_absent(NodeId::ROOT, Node::terminal("cmd".to_string(), 1))
            .unwrap();
        let second = arena
            .add_child_if_absent(NodeId::ROOT, Node::terminal("cmd".to_string(), 2))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(arena.node(second).value(), Some(&1));
        assert_eq!(arena.node_count(), 2);
    }

    #[test]
    fn test_get_child_checked() {
        let mut arena: Arena<String, u32> = Arena::new();
        let id = arena
            .add_child(NodeId::ROOT, Node::routing("a".to_string()))
            .unwrap();

        assert_eq!(arena.get_child_checked(NodeId::ROOT, "a"), Ok(id));
        assert!(arena.has_child(NodeId::ROOT, "a"));
        assert!(!arena.has_child(NodeId::ROOT, "b"));
        assert!(matches!(
            arena.get_child_checked(NodeId::ROOT, "b"),
            Err(Error::NodeNotFound { .. })
        ));
    }

    #[test]
    fn test_sorted_children_invalidated() {
        let mut arena: Arena<String, u32> = Arena::new();
        for name in &["sub", "add"] {
            arena
                .add_child(NodeId::ROOT, Node::routing(name.to_string()))
                .unwrap();
        }
        assert_eq!(arena.sorted_children(NodeId::ROOT), ["add", "sub"]);

        arena
            .add_child(NodeId::ROOT, Node::routing("mul".to_string()))
            .unwrap();
        assert_eq!(arena.sorted_children(NodeId::ROOT), ["add", "mul", "sub"]);
    }

    #[test]
    fn test_subtree_size() {
        let mut arena: Arena<String, u32> = Arena::new();
        let math = arena
            .add_child(NodeId::ROOT, Node::routing("math".to_string()))
            .unwrap();
        assert_eq!(arena.subtree_size(NodeId::ROOT), 0);

        arena.add_child(math, Node::terminal("add".to_string(), 1)).unwrap();
        arena.add_child(math, Node::terminal("sub".to_string(), 2)).unwrap();
        arena
            .add_child(NodeId::ROOT, Node::terminal("help".to_string(), 3))
            .unwrap();

        assert_eq!(arena.subtree_size(math), 2);
        assert_eq!(arena.subtree_size(NodeId::ROOT), 3);
    }
}
