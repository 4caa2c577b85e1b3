//! The main command tree implementation.
//!
//! This module contains the `CommandTree` type, which owns every node, and
//! the `Subtree` / `SubtreeMut` views that address a node inside it. All
//! traversal algorithms live here.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use log::{debug, trace};

use crate::node::{Arena, Node, NodeId};
use crate::Result;

/// The result of a traversal that may stop early.
///
/// `depth` is the number of input tokens consumed before the traversal
/// stopped, whether at a terminal node, at a missing child, or because the
/// input ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthValue<R> {
    pub depth: usize,
    pub result: R,
}

impl<R> DepthValue<R> {
    pub fn new(depth: usize, result: R) -> Self {
        DepthValue { depth, result }
    }

    /// Maps the result while keeping the depth
    pub fn map<U, F: FnOnce(R) -> U>(self, f: F) -> DepthValue<U> {
        DepthValue {
            depth: self.depth,
            result: f(self.result),
        }
    }
}

/// A hierarchical tree routing token paths to payloads of type `T`.
///
/// The tree owns all of its nodes. Queries return lightweight [`Subtree`]
/// views that alias into it, and insertions return a [`SubtreeMut`] rooted at
/// the last inserted node so that further nodes can be attached relative to
/// it.
///
/// # Examples
///
/// ```
/// use command_tree::CommandTree;
///
/// let mut tree = CommandTree::<String, u32>::new();
/// tree.add_chain(vec!["node1", "node2", "node3"], Some(7));
///
/// assert!(tree.has_child("node1"));
/// assert!(!tree.has_child("node2"));
/// assert_eq!(tree.get_value(["node1", "node2", "node3"]), Ok(Some(&7)));
/// ```
pub struct CommandTree<K, T> {
    arena: Arena<K, T>,
}

impl<K, T> CommandTree<K, T> {
    /// Creates a new, empty tree with a single routing root.
    pub fn new() -> Self {
        CommandTree {
            arena: Arena::new(),
        }
    }

    /// Returns a read-only view of the root.
    pub fn root(&self) -> Subtree<'_, K, T> {
        Subtree {
            arena: &self.arena,
            node: NodeId::ROOT,
        }
    }

    /// Returns a mutable view of the root.
    pub fn root_mut(&mut self) -> SubtreeMut<'_, K, T> {
        SubtreeMut {
            arena: &mut self.arena,
            node: NodeId::ROOT,
        }
    }
}

impl<K, T> Default for CommandTree<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> fmt::Debug for CommandTree<K, T>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTree")
            .field("nodes", &self.arena.node_count())
            .field("children", &self.root().children())
            .finish()
    }
}

impl<K, T> CommandTree<K, T>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    /// Adds a node directly under the root.
    ///
    /// With a value the node is terminal and nothing can be attached to it.
    /// Fails with `DuplicateKey` if a sibling with the same name exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree::{CommandTree, Error};
    ///
    /// let mut tree = CommandTree::<String, u32>::new();
    /// tree.add_child("x", None).unwrap();
    ///
    /// assert!(matches!(tree.add_child("x", None), Err(Error::DuplicateKey { .. })));
    /// ```
    pub fn add_child(&mut self, name: impl Into<K>, value: Option<T>) -> Result<SubtreeMut<'_, K, T>> {
        self.root_mut().into_child(name, value)
    }

    /// Creates a chain of nodes below the root, reusing existing ones.
    ///
    /// See [`SubtreeMut::add_chain`].
    pub fn add_chain<I>(&mut self, path: I, value: Option<T>) -> SubtreeMut<'_, K, T>
    where
        I: IntoIterator,
        I::Item: Into<K>,
    {
        self.root_mut().into_chain(path, value)
    }

    pub fn get_child<Q>(&self, name: &Q) -> Result<Subtree<'_, K, T>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.root().get_child(name)
    }

    pub fn get_child_path<'q, Q, I>(&self, path: I) -> Result<Subtree<'_, K, T>>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized + 'q,
    {
        self.root().get_child_path(path)
    }

    pub fn children(&self) -> HashSet<&K> {
        self.root().children()
    }

    pub fn sorted_children(&self) -> &[K]
    where
        K: Ord,
    {
        self.root().sorted_children()
    }

    pub fn has_child<Q>(&self, name: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.root().has_child(name)
    }

    pub fn get_value<'q, Q, I>(&self, path: I) -> Result<Option<&T>>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized + 'q,
    {
        self.root().get_value(path)
    }

    pub fn get_value_ignored<'q, Q, I>(&self, path: I) -> DepthValue<Option<&T>>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
    {
        self.root().get_value_ignored(path)
    }

    pub fn get_child_furthest<'q, Q, I>(&self, path: I) -> DepthValue<Subtree<'_, K, T>>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
    {
        self.root().get_child_furthest(path)
    }

    /// Returns the number of payloads stored in the tree.
    pub fn len(&self) -> usize {
        self.root().len()
    }

    /// Returns `true` if no payload has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A read-only view of one node of a [`CommandTree`].
///
/// The view acts as the root for relative queries. It aliases the owning
/// tree and cannot outlive it.
pub struct Subtree<'a, K, T> {
    arena: &'a Arena<K, T>,
    node: NodeId,
}

impl<'a, K, T> Clone for Subtree<'a, K, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, T> Copy for Subtree<'a, K, T> {}

/// Two views are equal when they point at the same node of the same tree
impl<'a, K, T> PartialEq for Subtree<'a, K, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.arena, other.arena) && self.node == other.node
    }
}

impl<'a, K, T> Eq for Subtree<'a, K, T> {}

impl<'a, K, T> fmt::Debug for Subtree<'a, K, T>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subtree")
            .field("name", &self.name())
            .field("terminal", &self.is_terminal())
            .finish()
    }
}

impl<'a, K, T> Subtree<'a, K, T> {
    fn at(&self, node: NodeId) -> Self {
        Subtree {
            arena: self.arena,
            node,
        }
    }

    /// The segment name of this node, `None` at the root.
    pub fn name(&self) -> Option<&'a K> {
        self.arena.node(self.node).name.as_ref()
    }

    /// The payload of this node if it is terminal.
    pub fn value(&self) -> Option<&'a T> {
        self.arena.node(self.node).value()
    }

    pub fn is_terminal(&self) -> bool {
        self.arena.node(self.node).is_terminal()
    }
}

impl<'a, K, T> Subtree<'a, K, T>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    /// Returns the immediate child named `name`.
    ///
    /// Fails with `NodeNotFound` if there is no such child.
    pub fn get_child<Q>(&self, name: &Q) -> Result<Self>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        Ok(self.at(self.arena.get_child_checked(self.node, name)?))
    }

    /// Walks `path` and returns a view of the node it ends at.
    ///
    /// Once a terminal node is reached the remaining segments are ignored.
    /// A missing segment before that fails with `NodeNotFound`.
    pub fn get_child_path<'q, Q, I>(&self, path: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized + 'q,
    {
        let mut current = self.node;
        for name in path {
            if self.arena.node(current).is_terminal() {
                break;
            }
            current = self.arena.get_child_checked(current, name)?;
        }
        Ok(self.at(current))
    }

    pub fn children(&self) -> HashSet<&'a K> {
        self.arena.children(self.node)
    }

    /// Immediate child names in ascending order.
    pub fn sorted_children(&self) -> &'a [K]
    where
        K: Ord,
    {
        self.arena.sorted_children(self.node)
    }

    /// Immediate child names starting with `partial`, in ascending order.
    ///
    /// An empty `partial` yields every child.
    pub fn suggestions(&self, partial: &str) -> Vec<&'a K>
    where
        K: Ord + AsRef<str>,
    {
        self.sorted_children()
            .iter()
            .filter(|name| name.as_ref().starts_with(partial))
            .collect()
    }

    pub fn has_child<Q>(&self, name: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.arena.has_child(self.node, name)
    }

    /// Looks up the payload at exactly `path`.
    ///
    /// Fails with `NodeNotFound` if any segment is missing, including
    /// segments past a terminal node. Returns `None` if the node at `path`
    /// exists but is a routing node.
    pub fn get_value<'q, Q, I>(&self, path: I) -> Result<Option<&'a T>>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized + 'q,
    {
        let mut current = self.node;
        for name in path {
            current = self.arena.get_child_checked(current, name)?;
        }
        Ok(self.arena.node(current).value())
    }

    /// Follows `path` until it reaches a terminal node and returns its
    /// payload with the number of tokens consumed.
    ///
    /// Tokens after the terminal node are left untouched; they are the
    /// command's arguments. If the path leaves the tree or runs out on a
    /// routing node, the result is `None` with the depth that was reached.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree::{CommandTree, DepthValue};
    ///
    /// let mut tree = CommandTree::<String, u32>::new();
    /// tree.add_chain(vec!["math", "add"], Some(1));
    ///
    /// assert_eq!(tree.get_value_ignored(["math", "add", "3", "4"]), DepthValue::new(2, Some(&1)));
    /// assert_eq!(tree.get_value_ignored(["math", "mul"]), DepthValue::new(1, None));
    /// ```
    pub fn get_value_ignored<'q, Q, I>(&self, path: I) -> DepthValue<Option<&'a T>>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
    {
        let mut path = path.into_iter();
        let mut current = self.node;
        let mut depth = 0;
        loop {
            if let Some(value) = self.arena.node(current).value() {
                return DepthValue::new(depth, Some(value));
            }
            let name = match path.next() {
                Some(name) => name,
                None => {
                    trace!("path exhausted at depth {} without a terminal node", depth);
                    return DepthValue::new(depth, None);
                }
            };
            match self.arena.get_child(current, name) {
                Some(child) => {
                    current = child;
                    depth += 1;
                }
                None => {
                    trace!("no matching child at depth {}", depth);
                    return DepthValue::new(depth, None);
                }
            }
        }
    }

    /// Follows `path` as far as it can and returns a view of the deepest
    /// node reached with the number of tokens consumed.
    ///
    /// The walk stops at a terminal node, at a token with no matching child,
    /// or when the path runs out. An empty path yields this view at depth 0.
    /// Callers inspect [`Subtree::is_terminal`] on the result to decide
    /// between delegating to the payload and listing the node's children.
    pub fn get_child_furthest<'q, Q, I>(&self, path: I) -> DepthValue<Self>
    where
        I: IntoIterator<Item = &'q Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized + 'q,
    {
        let mut current = self.node;
        let mut depth = 0;
        for name in path {
            if self.arena.node(current).is_terminal() {
                break;
            }
            match self.arena.get_child(current, name) {
                Some(child) => {
                    current = child;
                    depth += 1;
                }
                None => break,
            }
        }
        trace!("furthest match stopped at depth {}", depth);
        DepthValue::new(depth, self.at(current))
    }

    /// Returns the number of payloads stored below this node, itself included.
    pub fn len(&self) -> usize {
        self.arena.subtree_size(self.node)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A mutable view of one node of a [`CommandTree`], used to attach nodes
/// relative to it.
pub struct SubtreeMut<'a, K, T> {
    arena: &'a mut Arena<K, T>,
    node: NodeId,
}

impl<'a, K, T> fmt::Debug for SubtreeMut<'a, K, T>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_subtree(), f)
    }
}

impl<'a, K, T> SubtreeMut<'a, K, T> {
    /// Borrows this view as a read-only view.
    pub fn as_subtree(&self) -> Subtree<'_, K, T> {
        Subtree {
            arena: &*self.arena,
            node: self.node,
        }
    }

    /// Converts this view into a read-only view with the same lifetime.
    pub fn into_subtree(self) -> Subtree<'a, K, T> {
        Subtree {
            arena: self.arena,
            node: self.node,
        }
    }
}

impl<'a, K, T> SubtreeMut<'a, K, T>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    /// Adds a node directly under this one.
    ///
    /// With a value the node is terminal. Fails with `DuplicateKey` if a
    /// sibling has the same name, or `TerminalNode` if this node is terminal.
    pub fn add_child(&mut self, name: impl Into<K>, value: Option<T>) -> Result<SubtreeMut<'_, K, T>> {
        let id = self.arena.add_child(self.node, Node::with_value(name.into(), value))?;
        debug!("added child {:?}", self.arena.node(id).name);
        Ok(SubtreeMut {
            arena: &mut *self.arena,
            node: id,
        })
    }

    fn into_child(self, name: impl Into<K>, value: Option<T>) -> Result<SubtreeMut<'a, K, T>> {
        let id = self.arena.add_child(self.node, Node::with_value(name.into(), value))?;
        debug!("added child {:?}", self.arena.node(id).name);
        Ok(SubtreeMut {
            arena: self.arena,
            node: id,
        })
    }

    /// Creates a chain of nodes descending from this one.
    ///
    /// Existing nodes along `path` are reused, so registrations sharing a
    /// prefix share its nodes. Only the last node becomes terminal, and only
    /// if `value` is given. If a node at `path` already exists the value is
    /// dropped and the existing node is kept. If the walk runs into a terminal
    /// node before the end of `path`, it stops there.
    ///
    /// Returns a view of the node the chain ended at.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree::CommandTree;
    ///
    /// let mut tree = CommandTree::<String, u32>::new();
    /// let mut math = tree.add_chain(vec!["math"], None);
    /// math.add_chain(vec!["add"], Some(1));
    /// math.add_chain(vec!["sub"], Some(2));
    ///
    /// assert_eq!(tree.get_value(["math", "sub"]), Ok(Some(&2)));
    /// ```
    pub fn add_chain<I>(&mut self, path: I, value: Option<T>) -> SubtreeMut<'_, K, T>
    where
        I: IntoIterator,
        I::Item: Into<K>,
    {
        let id = chain(self.arena, self.node, path, value);
        SubtreeMut {
            arena: &mut *self.arena,
            node: id,
        }
    }

    fn into_chain<I>(self, path: I, value: Option<T>) -> SubtreeMut<'a, K, T>
    where
        I: IntoIterator,
        I::Item: Into<K>,
    {
        let id = chain(self.arena, self.node, path, value);
        SubtreeMut {
            arena: self.arena,
            node: id,
        }
    }
}

fn chain<K, T, I>(arena: &mut Arena<K, T>, start: NodeId, path: I, value: Option<T>) -> NodeId
where
    K: Hash + Eq + Clone + fmt::Debug,
    I: IntoIterator,
    I::Item: Into<K>,
{
    let names: Vec<K> = path.into_iter().map(Into::into).collect();
    if names.is_empty() {
        if value.is_some() {
            debug!("empty chain, value dropped");
        }
        return start;
    }

    let last = names.len() - 1;
    let mut value = value;
    let mut current = start;
    for (i, name) in names.into_iter().enumerate() {
        let node = if i == last {
            Node::with_value(name, value.take())
        } else {
            Node::routing(name)
        };
        match arena.add_child_if_absent(current, node) {
            Ok(id) => current = id,
            Err(err) => {
                debug!("chain stopped after {} segment(s): {}", i, err);
                break;
            }
        }
    }
    current
}
