//! Token-driven tree navigation.

use tracing::debug;

use crate::error::UsageError;
use crate::tree::{CommandKind, CommandRef, CommandTree};

/// The outcome of walking a tree with a token sequence.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'t, 'a, S> {
    /// The command the tokens lead to.
    pub command: CommandRef<'t>,
    /// Tokens left for the command's own option grammar. Always empty when
    /// `command` is a branch.
    pub remaining: &'a [S],
}

/// Walks `tree` from the root, consuming one token per child label.
///
/// The walk stops at the first leaf; that token and everything after it are
/// returned as remaining. If every token names a child and the walk ends on
/// a branch, that branch is returned with nothing remaining; callers show
/// its help.
///
/// # Errors
///
/// Returns a [`UsageError`] bound to the current branch when a token does
/// not name one of its children.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let tree = CommandTree::new(
///     BranchCommand::new("af").with_child(
///         LeafCommand::new("create-dog")
///             .with_option(CommandOption::new("--name", ["The name."]).unwrap()),
///     ),
/// )
/// .unwrap();
///
/// let resolution = resolve(&tree, &["create-dog", "--name", "Rex"]).unwrap();
/// assert_eq!(resolution.command.label(), "create-dog");
/// assert_eq!(resolution.remaining, ["--name", "Rex"]);
///
/// let err = resolve(&tree, &["create-cow"]).unwrap_err();
/// assert_eq!(err.message(), "The command 'af' does not have a child command 'create-cow'.");
/// ```
pub fn resolve<'t, 'a, S: AsRef<str>>(
    tree: &'t CommandTree,
    tokens: &'a [S],
) -> Result<Resolution<'t, 'a, S>, UsageError> {
    let mut current = tree.root();

    for (consumed, token) in tokens.iter().enumerate() {
        let branch = match current.kind() {
            CommandKind::Leaf(_) => {
                debug!(command = %current.label(), consumed, "Resolved leaf");
                return Ok(Resolution {
                    command: current,
                    remaining: &tokens[consumed..],
                });
            }
            CommandKind::Branch(branch) => branch,
        };

        let token = token.as_ref();
        current = branch.child(token).ok_or_else(|| {
            UsageError::new(
                current.id(),
                format!(
                    "The command '{}' does not have a child command '{token}'.",
                    current.path_as_cli_prompt()
                ),
            )
        })?;
    }

    debug!(command = %current.label(), "Resolved all tokens");
    Ok(Resolution {
        command: current,
        remaining: &tokens[tokens.len()..],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BranchCommand, CommandOption, LeafCommand};

    fn sample_tree() -> CommandTree {
        CommandTree::new(
            BranchCommand::new("af")
                .with_child(
                    LeafCommand::new("create-dog")
                        .with_option(CommandOption::new("--name", ["The name."]).unwrap()),
                )
                .with_child(
                    BranchCommand::new("zoo")
                        .with_child(LeafCommand::new("open"))
                        .with_child(BranchCommand::new("empty")),
                ),
        )
        .unwrap()
    }

    #[test]
    fn test_no_tokens_resolves_to_root() {
        let tree = sample_tree();
        let resolution = resolve::<&str>(&tree, &[]).unwrap();
        assert_eq!(resolution.command, tree.root());
        assert!(resolution.remaining.is_empty());
    }

    #[test]
    fn test_leaf_keeps_its_tail() {
        let tree = sample_tree();
        let resolution = resolve(&tree, &["create-dog", "--name", "Rex"]).unwrap();
        assert_eq!(resolution.command.label(), "create-dog");
        assert_eq!(resolution.remaining, ["--name", "Rex"]);
    }

    #[test]
    fn test_tokens_after_leaf_are_not_navigated() {
        let tree = sample_tree();
        let resolution = resolve(&tree, &["zoo", "open", "zoo"]).unwrap();
        assert_eq!(resolution.command.label(), "open");
        assert_eq!(resolution.remaining, ["zoo"]);
    }

    #[test]
    fn test_ending_on_branch() {
        let tree = sample_tree();
        let resolution = resolve(&tree, &["zoo", "empty"]).unwrap();
        assert_eq!(resolution.command.label(), "empty");
        assert!(resolution.command.as_branch().is_some());
        assert!(resolution.remaining.is_empty());
    }

    #[test]
    fn test_unknown_child_is_bound_to_innermost_branch() {
        let tree = sample_tree();
        let err = resolve(&tree, &["zoo", "close"]).unwrap_err();

        let zoo = tree.find(&["zoo"]).unwrap();
        assert_eq!(err.command(), zoo.id());
        assert_eq!(
            err.message(),
            "The command 'af zoo' does not have a child command 'close'."
        );
    }

    #[test]
    fn test_matching_is_exact() {
        let tree = sample_tree();
        assert!(resolve(&tree, &["Zoo"]).is_err());
        assert!(resolve(&tree, &["create"]).is_err());
    }

    #[test]
    fn test_leaf_root_takes_every_token() {
        let tree = CommandTree::new(
            LeafCommand::new("tool").with_option(CommandOption::new("--x", ["x"]).unwrap()),
        )
        .unwrap();

        let resolution = resolve(&tree, &["--x", "1"]).unwrap();
        assert_eq!(resolution.command, tree.root());
        assert_eq!(resolution.remaining, ["--x", "1"]);
    }
}
