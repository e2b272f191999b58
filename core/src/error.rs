//! Error types for command tree definition and invocation.
//!
//! Three families of failure are kept apart:
//!
//! - [`ConfigError`]: the tree, an option, or a section was defined with
//!   impossible parameters. Raised at startup, never recovered.
//! - [`UsageError`]: the user invoked a command the wrong way. Always bound
//!   to the command whose help should be shown alongside the message.
//! - [`CliError`]: everything that can come out of handling one invocation,
//!   including message-only failures and errors raised by leaf actions.

use std::error::Error as StdError;

use command_tree_layout::LayoutError;
use thiserror::Error;

use crate::tree::CommandId;
use crate::validate::ValidationError;

/// Errors raised while defining a command tree or its collaborators.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The command tree failed structural validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// A service was requested from the registry but never registered.
    #[error("no service registered for type '{0}'")]
    UnregisteredService(&'static str),

    /// Completion scripts can only be generated for branch roots.
    #[error("The root command can only be a branch command.")]
    LeafRoot,

    /// A layout section was configured with impossible parameters.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// File I/O failure while loading or saving configuration.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("invalid YAML")]
    Yaml(#[from] serde_yaml::Error),
}

/// What kind of wrong usage a [`UsageError`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageErrorKind {
    /// Unknown child, unknown option, wrong value count, and the like.
    WrongUsage,
    /// The command exists but has nothing to execute.
    MissingImplementation,
}

/// A recoverable error tied to the command the user got wrong.
///
/// The dispatcher answers a usage error by rendering the help of
/// [`command`](Self::command) with the message shown as an error block.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let tree = CommandTree::new(BranchCommand::new("af")).unwrap();
/// let error = UsageError::new(tree.root().id(), "Something is off.");
/// assert_eq!(error.to_string(), "Something is off.");
/// assert_eq!(error.kind(), UsageErrorKind::WrongUsage);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UsageError {
    command: CommandId,
    message: String,
    kind: UsageErrorKind,
}

impl UsageError {
    /// Creates a wrong-usage error bound to `command`.
    pub fn new(command: CommandId, message: impl Into<String>) -> Self {
        Self {
            command,
            message: message.into(),
            kind: UsageErrorKind::WrongUsage,
        }
    }

    /// Creates an error reporting that `command` has nothing to execute.
    pub fn missing_implementation(command: CommandId, message: impl Into<String>) -> Self {
        Self {
            command,
            message: message.into(),
            kind: UsageErrorKind::MissingImplementation,
        }
    }

    /// The command whose help should accompany this error.
    pub fn command(&self) -> CommandId {
        self.command
    }

    /// The message shown to the user.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this is ordinary wrong usage or a missing implementation.
    pub fn kind(&self) -> UsageErrorKind {
        self.kind
    }
}

/// Everything that can fail while handling a single invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// The command was used incorrectly; its help is rendered with the
    /// message.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// A data problem reported verbatim, without regenerating help.
    #[error("{0}")]
    Message(String),

    /// A definition-time problem surfaced while handling the invocation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Help could not be laid out for the available width.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// I/O failure inside a leaf action.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Any other failure raised by a leaf action.
    #[error("command failed")]
    Action(#[source] Box<dyn StdError + Send + Sync>),
}

impl CliError {
    /// Creates a message-only error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Wraps an arbitrary error raised by a leaf action.
    pub fn action(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Action(error.into())
    }
}

/// Convenience alias for results with [`CliError`].
pub type Result<T, E = CliError> = std::result::Result<T, E>;
