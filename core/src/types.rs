//! Definition-time command types.
//!
//! These are the values a program builds to describe its command-line
//! surface. They are consumed by [`CommandTree::new`](crate::CommandTree::new),
//! which validates them and freezes them into an immutable tree.
//!
//! Descriptions are sequences of paragraphs; each paragraph is rendered
//! separately in help output.

use std::fmt;

use crate::action::{ArgumentParser, FnAction, LeafAction, LeafHandler, ParsedAction};
use crate::arguments::CommandArguments;
use crate::error::{CliError, ConfigError};
use crate::registry::Registry;
use crate::validate::ValidationError;

/// A named flag accepted by a leaf command.
///
/// # Examples
///
/// ```
/// use command_tree_core::CommandOption;
///
/// let option = CommandOption::new("--name", ["The name of the dog to print."]).unwrap();
/// assert_eq!(option.label(), "--name");
///
/// assert!(CommandOption::new("  ", ["blank"]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOption {
    label: String,
    description: Vec<String>,
}

impl CommandOption {
    /// Creates an option.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyOptionLabel`] (wrapped in
    /// [`ConfigError::Invalid`]) if `label` is empty or whitespace-only.
    pub fn new<I, S>(label: impl Into<String>, description: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(ValidationError::EmptyOptionLabel.into());
        }

        Ok(Self {
            label,
            description: description.into_iter().map(Into::into).collect(),
        })
    }

    /// The label the user types to select this option.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Description paragraphs.
    pub fn description(&self) -> &[String] {
        &self.description
    }
}

/// A command that groups child commands and never executes itself.
///
/// # Examples
///
/// ```
/// use command_tree_core::{BranchCommand, LeafCommand};
///
/// let branch = BranchCommand::new("af")
///     .with_description(["This program prints animals."])
///     .with_child(LeafCommand::new("create-dog"))
///     .with_child(LeafCommand::new("create-cat"));
///
/// assert_eq!(branch.child_labels(), vec!["create-dog", "create-cat"]);
/// ```
#[derive(Debug, Default)]
pub struct BranchCommand {
    pub(crate) label: String,
    pub(crate) description: Vec<String>,
    pub(crate) children: Vec<Command>,
}

impl BranchCommand {
    /// Creates a branch with no description and no children.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Sets the description paragraphs.
    pub fn with_description<I, S>(mut self, description: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.description = description.into_iter().map(Into::into).collect();
        self
    }

    /// Appends a child command. Children are listed in insertion order.
    pub fn with_child(mut self, child: impl Into<Command>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Labels of the direct children, in declaration order.
    pub fn child_labels(&self) -> Vec<&str> {
        self.children.iter().map(Command::label).collect()
    }
}

/// An executable command with its own options.
///
/// A leaf without an action is allowed to exist; invoking it is reported as
/// a missing implementation.
///
/// # Examples
///
/// ```
/// use command_tree_core::{CommandOption, LeafCommand};
///
/// let leaf = LeafCommand::new("create-dog")
///     .with_description(["Prints out a dog."])
///     .with_option(CommandOption::new("--name", ["The name of the dog."]).unwrap())
///     .with_action(|arguments| {
///         let name = arguments.get("--name")?.expect_single_value()?;
///         println!("I am a dog with the name {name}!");
///         Ok(())
///     });
///
/// assert_eq!(leaf.option_labels(), vec!["--name"]);
/// assert!(leaf.has_action());
/// ```
#[derive(Default)]
pub struct LeafCommand {
    pub(crate) label: String,
    pub(crate) description: Vec<String>,
    pub(crate) options: Vec<CommandOption>,
    pub(crate) action: Option<Box<dyn LeafAction>>,
}

impl LeafCommand {
    /// Creates a leaf with no description, options, or action.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Sets the description paragraphs.
    pub fn with_description<I, S>(mut self, description: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.description = description.into_iter().map(Into::into).collect();
        self
    }

    /// Appends an option. Options are listed in insertion order.
    pub fn with_option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Sets the action from a closure over the grouped arguments.
    pub fn with_action<F>(self, action: F) -> Self
    where
        F: Fn(&CommandArguments<'_>) -> Result<(), CliError> + 'static,
    {
        self.with_leaf_action(FnAction::new(action))
    }

    /// Sets the action from any [`LeafAction`] implementation.
    pub fn with_leaf_action(mut self, action: impl LeafAction + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    /// Sets the action to a parser feeding a handler.
    pub fn with_parser_and_handler<P, H>(self, parser: P, handler: H) -> Self
    where
        P: ArgumentParser + 'static,
        H: LeafHandler<P::Output> + 'static,
    {
        self.with_leaf_action(ParsedAction::new(parser, handler))
    }

    /// Sets the action to a parser and handler resolved from `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnregisteredService`] if either type has no
    /// factory in the registry.
    pub fn with_registered_action<P, H>(self, registry: &Registry) -> Result<Self, ConfigError>
    where
        P: ArgumentParser + 'static,
        H: LeafHandler<P::Output> + 'static,
    {
        let parser = registry.resolve::<P>()?;
        let handler = registry.resolve::<H>()?;
        Ok(self.with_parser_and_handler(parser, handler))
    }

    /// Labels of the declared options, in declaration order.
    pub fn option_labels(&self) -> Vec<&str> {
        self.options.iter().map(CommandOption::label).collect()
    }

    /// Whether an action has been assigned.
    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }
}

impl fmt::Debug for LeafCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafCommand")
            .field("label", &self.label)
            .field("description", &self.description)
            .field("options", &self.options)
            .field("has_action", &self.has_action())
            .finish()
    }
}

/// A node of a command tree definition: either a branch or a leaf.
#[derive(Debug)]
pub enum Command {
    /// Groups child commands.
    Branch(BranchCommand),
    /// Executes an action.
    Leaf(LeafCommand),
}

impl Command {
    /// The label of the command.
    pub fn label(&self) -> &str {
        match self {
            Command::Branch(branch) => &branch.label,
            Command::Leaf(leaf) => &leaf.label,
        }
    }

    /// Description paragraphs.
    pub fn description(&self) -> &[String] {
        match self {
            Command::Branch(branch) => &branch.description,
            Command::Leaf(leaf) => &leaf.description,
        }
    }
}

impl From<BranchCommand> for Command {
    fn from(branch: BranchCommand) -> Self {
        Command::Branch(branch)
    }
}

impl From<LeafCommand> for Command {
    fn from(leaf: LeafCommand) -> Self {
        Command::Leaf(leaf)
    }
}
