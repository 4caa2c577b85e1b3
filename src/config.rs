//! Registry configuration.

/// What a [`CommandRegistry`](crate::CommandRegistry) does when a command
/// collides with an earlier registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the first registration and ignore the new one
    KeepFirst,
    /// Fail with [`Error::AlreadyRegistered`](crate::Error::AlreadyRegistered)
    Reject,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        DuplicatePolicy::KeepFirst
    }
}

/// Settings for a [`CommandRegistry`](crate::CommandRegistry).
///
/// # Examples
///
/// ```
/// use command_tree::{DuplicatePolicy, RegistryConfig};
///
/// let config = RegistryConfig::default()
///     .with_separator(':')
///     .with_duplicates(DuplicatePolicy::Reject)
///     .with_max_suggestions(5);
///
/// assert_eq!(config.separator, ':');
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Separator between the segments of a command name
    pub separator: char,

    pub duplicates: DuplicatePolicy,

    /// Upper bound on the number of names offered as suggestions
    pub max_suggestions: Option<usize>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            separator: '.',
            duplicates: DuplicatePolicy::default(),
            max_suggestions: None,
        }
    }
}

impl RegistryConfig {
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = Some(max);
        self
    }
}
