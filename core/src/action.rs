//! Executable behavior attached to leaf commands.
//!
//! A leaf runs a [`LeafAction`]. Most programs either pass a closure through
//! [`LeafCommand::with_action`](crate::LeafCommand::with_action), or split the
//! work into an [`ArgumentParser`] that turns grouped arguments into a typed
//! value and a [`LeafHandler`] that acts on it.

use crate::arguments::CommandArguments;
use crate::error::CliError;
use crate::tree::LeafRef;

/// The behavior invoked when a leaf command is the resolution target.
pub trait LeafAction {
    /// Runs the action against the grouped arguments of one invocation.
    ///
    /// # Errors
    ///
    /// Usage errors are rendered with the leaf's help; message-only errors
    /// are printed verbatim; anything else is reported as a failure.
    fn run(&self, arguments: &CommandArguments<'_>) -> Result<(), CliError>;
}

/// Turns grouped arguments into a typed value for a [`LeafHandler`].
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// struct NameParser;
///
/// impl ArgumentParser for NameParser {
///     type Output = String;
///
///     fn parse(&self, arguments: &CommandArguments<'_>) -> Result<String, CliError> {
///         let name = arguments.get("--name")?.expect_single_value()?;
///         if name.is_empty() {
///             return Err(arguments.usage_error("The name cannot be empty."));
///         }
///         Ok(name.to_string())
///     }
/// }
/// ```
pub trait ArgumentParser {
    /// The parsed form handed to the handler.
    type Output;

    /// Parses the arguments.
    ///
    /// # Errors
    ///
    /// Returns a usage error (see [`CommandArguments::usage_error`]) when
    /// the arguments do not describe a valid invocation.
    fn parse(&self, arguments: &CommandArguments<'_>) -> Result<Self::Output, CliError>;
}

/// Performs a leaf's effect on already parsed arguments.
pub trait LeafHandler<A> {
    /// Handles one invocation of `command`.
    ///
    /// # Errors
    ///
    /// Any error is surfaced to the dispatcher.
    fn handle(&self, arguments: A, command: LeafRef<'_>) -> Result<(), CliError>;
}

/// A parser and a handler run in sequence.
pub struct ParsedAction<P, H> {
    parser: P,
    handler: H,
}

impl<P, H> ParsedAction<P, H> {
    /// Pairs `parser` with `handler`.
    pub fn new(parser: P, handler: H) -> Self {
        Self { parser, handler }
    }
}

impl<P, H> LeafAction for ParsedAction<P, H>
where
    P: ArgumentParser,
    H: LeafHandler<P::Output>,
{
    fn run(&self, arguments: &CommandArguments<'_>) -> Result<(), CliError> {
        let parsed = self.parser.parse(arguments)?;
        self.handler.handle(parsed, arguments.command())
    }
}

pub(crate) struct FnAction<F>(F);

impl<F> FnAction<F> {
    pub(crate) fn new(action: F) -> Self {
        Self(action)
    }
}

impl<F> LeafAction for FnAction<F>
where
    F: Fn(&CommandArguments<'_>) -> Result<(), CliError>,
{
    fn run(&self, arguments: &CommandArguments<'_>) -> Result<(), CliError> {
        (self.0)(arguments)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::tree::CommandTree;
    use crate::types::{BranchCommand, CommandOption, LeafCommand};

    struct CountParser;

    impl ArgumentParser for CountParser {
        type Output = i64;

        fn parse(&self, arguments: &CommandArguments<'_>) -> Result<i64, CliError> {
            arguments.get("--count")?.expect_integer()
        }
    }

    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl LeafHandler<i64> for Recorder {
        fn handle(&self, count: i64, command: LeafRef<'_>) -> Result<(), CliError> {
            self.0
                .borrow_mut()
                .push(format!("{} {count}", command.command().label()));
            Ok(())
        }
    }

    #[test]
    fn test_parsed_action_feeds_handler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let tree = CommandTree::new(
            BranchCommand::new("tool").with_child(
                LeafCommand::new("repeat")
                    .with_option(CommandOption::new("--count", ["How often."]).unwrap())
                    .with_parser_and_handler(CountParser, Recorder(Rc::clone(&seen))),
            ),
        )
        .unwrap();

        let leaf = tree.find(&["repeat"]).unwrap().as_leaf().unwrap();
        let tokens = ["--count", "3"];
        let arguments = CommandArguments::new(leaf, &tokens).unwrap();
        leaf.action().unwrap().run(&arguments).unwrap();

        assert_eq!(*seen.borrow(), vec!["repeat 3"]);
    }

    #[test]
    fn test_parser_error_skips_handler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let tree = CommandTree::new(
            LeafCommand::new("repeat")
                .with_option(CommandOption::new("--count", ["How often."]).unwrap())
                .with_parser_and_handler(CountParser, Recorder(Rc::clone(&seen))),
        )
        .unwrap();

        let leaf = tree.root().as_leaf().unwrap();
        let tokens = ["--count", "many"];
        let arguments = CommandArguments::new(leaf, &tokens).unwrap();
        let err = leaf.action().unwrap().run(&arguments).unwrap_err();

        assert!(matches!(err, CliError::Message(ref m) if m == "Could not parse 'many' as an integer."));
        assert!(seen.borrow().is_empty());
    }
}
