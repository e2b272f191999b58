//! The dispatcher: one invocation in, one outcome out.
//!
//! [`ArgumentHandler::dispatch`] resolves the tokens, groups the leaf's
//! arguments and runs its action, returning every failure as a
//! [`CliError`]. [`ArgumentHandler::handle`] is the single place those
//! failures are recovered from: usage errors become annotated help, other
//! errors become a message on the error stream.

use std::error::Error as StdError;
use std::io::{self, Write};
use std::process::ExitCode;

use tracing::debug;

use crate::arguments::CommandArguments;
use crate::config::ArgumentHandlerSettings;
use crate::error::{CliError, UsageError};
use crate::help::HelpProvider;
use crate::resolve::resolve;
use crate::tree::{CommandKind, CommandTree};
use crate::validate::HELP_TOKENS;

/// What a successful dispatch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A leaf action ran to completion.
    Completed,
    /// Help was requested, or the tokens named a branch.
    Help(String),
}

/// Whether handling an invocation succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// An action ran or help was printed on request.
    Success,
    /// An error was reported.
    Failure,
}

impl Status {
    /// The process exit code: 0 on success, 1 on failure.
    pub fn exit_code(self) -> u8 {
        match self {
            Status::Success => 0,
            Status::Failure => 1,
        }
    }
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        ExitCode::from(status.exit_code())
    }
}

/// Routes command-line tokens through a command tree.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let tree = CommandTree::new(
///     BranchCommand::new("af").with_child(
///         LeafCommand::new("create-dog")
///             .with_option(CommandOption::new("--name", ["The name."]).unwrap())
///             .with_action(|arguments| {
///                 let name = arguments.get("--name")?.expect_single_value()?;
///                 assert_eq!(name, "Rex");
///                 Ok(())
///             }),
///     ),
/// )
/// .unwrap();
///
/// let handler = ArgumentHandler::new(ArgumentHandlerSettings::new(tree).with_terminal_width(80));
///
/// let outcome = handler.dispatch(&["create-dog", "--name", "Rex"]).unwrap();
/// assert_eq!(outcome, Outcome::Completed);
///
/// let outcome = handler.dispatch(&["help"]).unwrap();
/// assert!(matches!(outcome, Outcome::Help(text) if text.contains("create-dog")));
/// ```
pub struct ArgumentHandler {
    tree: CommandTree,
    help: Box<dyn HelpProvider>,
}

impl ArgumentHandler {
    /// Creates a dispatcher. The tree was validated when it was built.
    pub fn new(settings: ArgumentHandlerSettings) -> Self {
        let (tree, help) = settings.into_parts();
        Self { tree, help }
    }

    /// The command tree being dispatched over.
    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// Resolves `tokens` and either runs the target leaf or renders help.
    ///
    /// A first token of `help`, `--help` or `-h` renders the help of the
    /// command named by the remaining tokens instead of running it.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Usage`] for wrong usage, including a leaf without
    /// an action, and passes through whatever the leaf action returns.
    pub fn dispatch<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Outcome, CliError> {
        if let Some((first, rest)) = tokens.split_first() {
            if HELP_TOKENS.contains(&first.as_ref()) {
                debug!(token = first.as_ref(), "Explicit help request");
                let resolution = resolve(&self.tree, rest)?;
                return Ok(Outcome::Help(self.help.render(resolution.command, None)?));
            }
        }

        let resolution = resolve(&self.tree, tokens)?;
        match resolution.command.kind() {
            CommandKind::Branch(branch) => {
                debug!(command = %branch.command().label(), "Tokens lead to a branch");
                Ok(Outcome::Help(self.help.render(branch.command(), None)?))
            }
            CommandKind::Leaf(leaf) => {
                let arguments = CommandArguments::new(leaf, resolution.remaining)?;
                let command = leaf.command();
                let action = leaf.action().ok_or_else(|| {
                    UsageError::missing_implementation(
                        command.id(),
                        format!(
                            "The command '{}' does not have an assigned action to invoke.",
                            command.path_as_cli_prompt()
                        ),
                    )
                })?;

                debug!(command = %command.label(), "Running leaf action");
                action.run(&arguments)?;
                Ok(Outcome::Completed)
            }
        }
    }

    /// Dispatches `tokens` and reports the outcome.
    ///
    /// Help, including help annotated with a usage error, goes to `out`.
    /// Message-only and unexpected errors go to `err`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error only if writing to `out` or `err` fails.
    pub fn handle<S, O, E>(&self, tokens: &[S], out: &mut O, err: &mut E) -> io::Result<Status>
    where
        S: AsRef<str>,
        O: Write,
        E: Write,
    {
        let error = match self.dispatch(tokens) {
            Ok(Outcome::Completed) => return Ok(Status::Success),
            Ok(Outcome::Help(text)) => {
                write!(out, "{text}")?;
                return Ok(Status::Success);
            }
            Err(error) => error,
        };

        match error {
            CliError::Usage(usage) => {
                let command = self
                    .tree
                    .get(usage.command())
                    .unwrap_or_else(|| self.tree.root());
                match self.help.render(command, Some(&usage)) {
                    Ok(text) => write!(out, "{text}")?,
                    Err(layout) => writeln!(err, "{layout}")?,
                }
            }
            CliError::Message(message) => writeln!(err, "{message}")?,
            CliError::Layout(layout) => writeln!(err, "{layout}")?,
            other => {
                debug!(error = %other, "Command failed");
                writeln!(err, "error: {other}")?;
                let mut source = other.source();
                while let Some(cause) = source {
                    writeln!(err, "caused by: {cause}")?;
                    source = cause.source();
                }
            }
        }

        Ok(Status::Failure)
    }

    /// [`handle`](Self::handle) on the process's standard streams.
    pub fn run<S: AsRef<str>>(&self, tokens: &[S]) -> Status {
        let stdout = io::stdout();
        let stderr = io::stderr();
        self.handle(tokens, &mut stdout.lock(), &mut stderr.lock())
            .unwrap_or(Status::Failure)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::error::ConfigError;
    use crate::types::{BranchCommand, CommandOption, LeafCommand};

    fn handler(counter: Rc<Cell<u32>>) -> ArgumentHandler {
        let tree = CommandTree::new(
            BranchCommand::new("af")
                .with_child(
                    LeafCommand::new("count")
                        .with_action(move |_| {
                            counter.set(counter.get() + 1);
                            Ok(())
                        }),
                )
                .with_child(LeafCommand::new("todo"))
                .with_child(
                    LeafCommand::new("fail")
                        .with_option(CommandOption::new("--kind", ["What to fail with."]).unwrap())
                        .with_action(|arguments| {
                            match arguments.get("--kind")?.expect_single_value()? {
                                "message" => Err(CliError::message("Nothing to do.")),
                                "io" => Err(io::Error::other("disk on fire").into()),
                                "action" => Err(CliError::action("boom")),
                                "config" => {
                                    let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
                                    Err(ConfigError::Io(missing).into())
                                }
                                _ => Ok(()),
                            }
                        }),
                ),
        )
        .unwrap();
        ArgumentHandler::new(ArgumentHandlerSettings::new(tree).with_terminal_width(100))
    }

    fn run(handler: &ArgumentHandler, tokens: &[&str]) -> (Status, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = handler.handle(tokens, &mut out, &mut err).unwrap();
        (
            status,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_leaf_action_runs_once() {
        let counter = Rc::new(Cell::new(0));
        let handler = handler(Rc::clone(&counter));

        assert_eq!(handler.dispatch(&["count"]).unwrap(), Outcome::Completed);
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_help_tokens_do_not_run_actions() {
        let counter = Rc::new(Cell::new(0));
        let handler = handler(Rc::clone(&counter));

        for token in HELP_TOKENS {
            let outcome = handler.dispatch(&[token, "count"]).unwrap();
            assert!(matches!(outcome, Outcome::Help(ref text) if text.contains("af count")));
        }
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_empty_tokens_show_root_help() {
        let handler = handler(Rc::new(Cell::new(0)));
        let (status, out, err) = run(&handler, &[]);

        assert_eq!(status, Status::Success);
        assert!(out.contains("Child commands:"));
        assert!(err.is_empty());
    }

    #[test]
    fn test_missing_action_is_a_usage_error() {
        let handler = handler(Rc::new(Cell::new(0)));
        let err = handler.dispatch(&["todo"]).unwrap_err();

        assert!(matches!(
            err,
            CliError::Usage(ref usage) if usage.kind() == crate::error::UsageErrorKind::MissingImplementation
        ));

        let (status, out, _) = run(&handler, &["todo"]);
        assert_eq!(status, Status::Failure);
        assert_eq!(out.matches("does not have an assigned action").count(), 1);
    }

    #[test]
    fn test_usage_error_renders_help_of_bound_command() {
        let handler = handler(Rc::new(Cell::new(0)));
        let (status, out, err) = run(&handler, &["fail"]);

        assert_eq!(status, Status::Failure);
        assert!(out.contains("requires the option '--kind' to be specified."));
        assert!(out.contains("af fail [<options>]"));
        assert!(err.is_empty());
    }

    #[test]
    fn test_message_error_goes_to_err_only() {
        let handler = handler(Rc::new(Cell::new(0)));
        let (status, out, err) = run(&handler, &["fail", "--kind", "message"]);

        assert_eq!(status, Status::Failure);
        assert!(out.is_empty());
        assert_eq!(err, "Nothing to do.\n");
    }

    #[test]
    fn test_other_errors_are_reported() {
        let handler = handler(Rc::new(Cell::new(0)));
        let (status, out, err) = run(&handler, &["fail", "--kind", "io"]);

        assert_eq!(status, Status::Failure);
        assert!(out.is_empty());
        assert_eq!(err, "error: I/O error\ncaused by: disk on fire\n");
    }

    #[test]
    fn test_each_cause_is_printed_once() {
        let handler = handler(Rc::new(Cell::new(0)));

        let (status, _, err) = run(&handler, &["fail", "--kind", "action"]);
        assert_eq!(status, Status::Failure);
        assert_eq!(err, "error: command failed\ncaused by: boom\n");

        let (status, _, err) = run(&handler, &["fail", "--kind", "config"]);
        assert_eq!(status, Status::Failure);
        assert_eq!(err, "error: I/O error\ncaused by: gone\n");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Status::Success.exit_code(), 0);
        assert_eq!(Status::Failure.exit_code(), 1);
    }
}
