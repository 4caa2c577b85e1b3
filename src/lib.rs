//! # Command Tree
//!
//! A uni-directional lookup tree that routes a sequence of string tokens (a
//! command label followed by its arguments) to a registered payload.
//!
//! Each node of the tree is either a *routing* node, which only branches to
//! further nodes, or a *terminal* node, which carries a payload and never has
//! children. Paths such as `math.add` are registered once at startup and
//! queried many times afterwards.
//!
//! ## Features
//!
//! - **Chained insertion**: nested namespaces are built incrementally and
//!   shared prefixes are reused
//! - **Trailing arguments**: a lookup stops at the first terminal node and
//!   reports how many tokens it consumed, so the rest can be handed to the
//!   command as its arguments
//! - **Furthest match**: partial paths resolve to the deepest reachable node,
//!   which drives completion and "did you mean" suggestions
//! - **Aliasing views**: subtrees are addressed by index into a node arena, so
//!   a view never copies the nodes it points at
//!
//! ## Example
//!
//! ```rust
//! use command_tree::{CommandTree, DepthValue};
//!
//! let mut tree = CommandTree::<String, &str>::new();
//! tree.add_chain(vec!["math", "add"], Some("f_add"));
//! tree.add_chain(vec!["math", "sub"], Some("f_sub"));
//!
//! // Trailing tokens are the command's arguments
//! let hit = tree.get_value_ignored(["math", "add", "3", "4"]);
//! assert_eq!(hit, DepthValue::new(2, Some(&"f_add")));
//!
//! // An unknown subcommand stops at the deepest known node
//! let furthest = tree.get_child_furthest(["math", "mul"]);
//! assert_eq!(furthest.depth, 1);
//! assert_eq!(furthest.result.sorted_children(), ["add", "sub"]);
//! ```

mod config;
mod node;
mod registry;
mod tree;
mod util;

// Re-export public types
pub use crate::config::{DuplicatePolicy, RegistryConfig};
pub use crate::registry::{CommandRegistry, Completion, Registration, Resolution, UnknownCommand};
pub use crate::tree::{CommandTree, DepthValue, Subtree, SubtreeMut};

use thiserror::Error;

/// Errors that can occur while building or strictly querying a tree.
///
/// Lookups driven by user input (`get_value_ignored`, `get_child_furthest`,
/// [`CommandRegistry::resolve`]) never fail; their misses are returned as data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A sibling with the same name is already present
    #[error("a node named {key} is already present under {parent}")]
    DuplicateKey { key: String, parent: String },

    /// A path segment that was expected to exist is absent
    #[error("a node named {key} could not be found under {parent}")]
    NodeNotFound { key: String, parent: String },

    /// Children were attached to a terminal node
    #[error("terminal node {key} cannot have children")]
    TerminalNode { key: String },

    /// The unnamed root node was attached as a child
    #[error("a child node must have a name")]
    UnnamedNode,

    /// A command name is empty or contains an empty segment
    #[error("invalid command name {name:?}")]
    InvalidName { name: String },

    /// A command collides with an existing registration
    #[error("command {name:?} collides with an existing registration")]
    AlreadyRegistered { name: String },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
