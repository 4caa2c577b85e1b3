//! Command registration and dispatch on top of a [`CommandTree`].
//!
//! A registry maps dotted command names (`math.add`) to handler payloads and
//! answers the two request-time questions a host asks: which handler does a
//! typed command line run, and what could the user type next.

use std::fmt;
use std::iter;

use log::{info, warn};

use crate::config::{DuplicatePolicy, RegistryConfig};
use crate::tree::{CommandTree, Subtree};
use crate::util::{join_path, split_name};
use crate::{Error, Result};

/// Outcome of a successful [`CommandRegistry::register`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The top-level label was not known before. Hosts that keep their own
    /// command map register the label there.
    NewLabel,
    /// The command was added under an already known label
    Subcommand,
    /// The command collided with an earlier registration and was ignored
    Ignored,
}

/// Result of resolving a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a, T, S> {
    /// A handler was found. `args` are the tokens after the command path.
    Found {
        value: &'a T,
        depth: usize,
        args: &'a [S],
    },
    Unknown(UnknownCommand),
}

/// Describes a command line that did not reach a handler.
///
/// Its `Display` output is meant to be shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand {
    /// Segments that matched registered nodes
    pub known: Vec<String>,
    /// The first token that did not match, if the input did not simply run out
    pub token: Option<String>,
    /// Valid names at the point where resolution stopped
    pub suggestions: Vec<String>,
}

impl UnknownCommand {
    /// Number of tokens that matched
    pub fn depth(&self) -> usize {
        self.known.len()
    }
}

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known = self.known.join(" ");
        match &self.token {
            Some(token) if known.is_empty() => write!(f, "unknown command {:?}", token)?,
            Some(token) => write!(f, "unknown subcommand {:?} for {:?}", token, known)?,
            None => write!(f, "incomplete command {:?}", known)?,
        }
        if !self.suggestions.is_empty() {
            write!(f, ", did you mean: {}", self.suggestions.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for UnknownCommand {}

/// Result of a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<'a, T, S> {
    /// The input reached a handler. `args` are the tokens after the command
    /// path, to be completed by the handler's own provider.
    Delegate { value: &'a T, args: &'a [S] },
    /// Names that can follow the matched part of the input
    Candidates(Vec<&'a str>),
}

/// Registry of dotted command names mapped to payloads of type `T`.
///
/// # Examples
///
/// ```
/// use command_tree::{CommandRegistry, Registration, Resolution};
///
/// let mut registry = CommandRegistry::new();
/// assert_eq!(registry.register("math.add", "f_add"), Ok(Registration::NewLabel));
/// assert_eq!(registry.register("math.sub", "f_sub"), Ok(Registration::Subcommand));
///
/// match registry.resolve("math", &["add", "3", "4"]) {
///     Resolution::Found { value, args, .. } => {
///         assert_eq!(*value, "f_add");
///         assert_eq!(args, ["3", "4"]);
///     }
///     Resolution::Unknown(unknown) => panic!("{}", unknown),
/// }
/// ```
#[derive(Debug)]
pub struct CommandRegistry<T> {
    tree: CommandTree<String, T>,
    config: RegistryConfig,
}

impl<T> Default for CommandRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CommandRegistry<T> {
    /// Creates an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        CommandRegistry {
            tree: CommandTree::new(),
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The underlying tree
    pub fn tree(&self) -> &CommandTree<String, T> {
        &self.tree
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Registered top-level labels in ascending order
    pub fn labels(&self) -> Vec<&str> {
        self.tree.sorted_children().iter().map(String::as_str).collect()
    }

    /// Registers `value` under the dotted command `name`.
    ///
    /// A name collides with an earlier registration if a handler is already
    /// registered at it or at one of its prefixes, or if other commands are
    /// registered below it. Collisions are handled according to
    /// [`RegistryConfig::duplicates`].
    pub fn register(&mut self, name: &str, value: T) -> Result<Registration> {
        let segments = split_name(name, self.config.separator)?;
        let label_is_new = !self.tree.has_child(segments[0]);

        let furthest = self.tree.get_child_furthest(segments.iter().copied());
        let collides = furthest.result.is_terminal() || furthest.depth == segments.len();
        if collides {
            match self.config.duplicates {
                DuplicatePolicy::KeepFirst => {
                    warn!("command {:?} collides with an existing registration, ignored", name);
                    return Ok(Registration::Ignored);
                }
                DuplicatePolicy::Reject => {
                    return Err(Error::AlreadyRegistered {
                        name: name.to_string(),
                    });
                }
            }
        }

        self.tree.add_chain(segments, Some(value));
        info!("registered command {:?}", name);
        Ok(if label_is_new {
            Registration::NewLabel
        } else {
            Registration::Subcommand
        })
    }

    /// Resolves a command line given as its label and arguments.
    ///
    /// On a hit the handler's own arguments are the tokens after the
    /// registered path. On a miss the result describes how far the input
    /// matched and what could have been typed instead.
    pub fn resolve<'a, S>(&'a self, label: &str, args: &'a [S]) -> Resolution<'a, T, S>
    where
        S: AsRef<str>,
    {
        let tokens: Vec<&str> = iter::once(label)
            .chain(args.iter().map(AsRef::as_ref))
            .collect();

        let hit = self.tree.get_value_ignored(tokens.iter().copied());
        if let Some(value) = hit.result {
            return Resolution::Found {
                value,
                depth: hit.depth,
                args: &args[hit.depth.saturating_sub(1)..],
            };
        }

        let node = self.tree.get_child_furthest(tokens.iter().copied()).result;
        let token = tokens.get(hit.depth).copied();
        let mut suggestions = self.candidates(node, token.unwrap_or(""));
        if suggestions.is_empty() {
            suggestions = self.candidates(node, "");
        }

        Resolution::Unknown(UnknownCommand {
            known: tokens[..hit.depth].iter().map(|s| s.to_string()).collect(),
            token: token.map(str::to_string),
            suggestions: suggestions.into_iter().map(str::to_string).collect(),
        })
    }

    /// Completes a partially typed command line.
    ///
    /// The last argument is treated as the partial token being typed.
    pub fn complete<'a, S>(&'a self, label: &str, args: &'a [S]) -> Completion<'a, T, S>
    where
        S: AsRef<str>,
    {
        let tokens: Vec<&str> = iter::once(label)
            .chain(args.iter().map(AsRef::as_ref))
            .collect();

        let furthest = self.tree.get_child_furthest(tokens.iter().copied());
        if let Some(value) = furthest.result.value() {
            return Completion::Delegate {
                value,
                args: &args[furthest.depth.saturating_sub(1)..],
            };
        }

        let candidates = if furthest.depth == tokens.len() {
            self.candidates(furthest.result, "")
        } else if furthest.depth + 1 == tokens.len() {
            self.candidates(furthest.result, tokens[furthest.depth])
        } else {
            Vec::new()
        };
        Completion::Candidates(candidates)
    }

    /// The full dotted name of a registered path
    pub fn command_name<S: AsRef<str>>(&self, segments: &[S]) -> String {
        join_path(segments, self.config.separator)
    }

    fn candidates<'a>(&self, node: Subtree<'a, String, T>, partial: &str) -> Vec<&'a str> {
        let limit = self.config.max_suggestions.unwrap_or(usize::MAX);
        node.suggestions(partial)
            .into_iter()
            .take(limit)
            .map(String::as_str)
            .collect()
    }
}
