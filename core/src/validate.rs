//! Command tree validation.
//!
//! Validates structural invariants of a command definition before it is
//! frozen into a [`CommandTree`](crate::CommandTree): empty labels,
//! duplicate sibling commands, duplicate options within a leaf, and labels
//! that would shadow the built-in help tokens.
//!
//! # Examples
//!
//! ```
//! use command_tree_core::*;
//!
//! let root: Command = BranchCommand::new("af")
//!     .with_child(LeafCommand::new("create-dog"))
//!     .into();
//! assert!(validate_tree(&root).is_empty());
//!
//! // Invalid: two children share a label
//! let bad: Command = BranchCommand::new("af")
//!     .with_child(LeafCommand::new("create-dog"))
//!     .with_child(LeafCommand::new("create-dog"))
//!     .into();
//! assert!(!validate_tree(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{BranchCommand, Command, CommandOption};

/// First tokens that request help instead of running a command.
pub const HELP_TOKENS: [&str; 3] = ["help", "--help", "-h"];

/// Command tree validation errors.
///
/// Each variant describes a specific structural problem found during
/// validation. The `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Option label is empty or whitespace-only.
    #[error("Option label cannot be empty or consist exclusively of whitespace characters.")]
    EmptyOptionLabel,
    /// Command label is empty or whitespace-only.
    #[error("Command label cannot be empty or consist exclusively of whitespace characters.")]
    EmptyCommandLabel,
    /// Two children of the same branch share a label.
    #[error("The command '{branch}' has more than one child command labelled '{label}'.")]
    DuplicateChildCommand {
        /// Labels from the root to the offending branch, space separated.
        branch: String,
        /// The repeated label.
        label: String,
    },
    /// Two options of the same leaf share a label.
    #[error("The command '{command}' has more than one option labelled '{label}'.")]
    DuplicateOption {
        /// Labels from the root to the offending leaf, space separated.
        command: String,
        /// The repeated label.
        label: String,
    },
    /// A root-level label collides with one of [`HELP_TOKENS`].
    #[error(
        "Providing the help command explicitly is forbidden, as it collides with the in-built \
         mechanism. Please don't use the following labels for the root command: [ help, --help, -h ]."
    )]
    ReservedHelpLabel(String),
}

/// Validates a command tree definition.
///
/// Stops at the first problem found, so the returned list holds at most one
/// error. An empty list means the definition can be frozen.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// // A root child named like the help trigger
/// let root: Command = BranchCommand::new("af")
///     .with_child(LeafCommand::new("help"))
///     .into();
/// let errors = validate_tree(&root);
/// assert!(matches!(errors[0], ValidationError::ReservedHelpLabel(_)));
/// ```
pub fn validate_tree(root: &Command) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_reserved_labels(root));
    if !errors.is_empty() {
        return errors;
    }

    let mut path = Vec::new();
    errors.extend(validate_command(root, &mut path));

    errors
}

fn validate_reserved_labels(root: &Command) -> Vec<ValidationError> {
    let labels: Vec<&str> = match root {
        Command::Branch(branch) => branch.child_labels(),
        Command::Leaf(leaf) => leaf.option_labels(),
    };

    labels
        .into_iter()
        .find(|label| HELP_TOKENS.contains(label))
        .map(|label| ValidationError::ReservedHelpLabel(label.to_string()))
        .into_iter()
        .collect()
}

fn validate_command<'a>(command: &'a Command, path: &mut Vec<&'a str>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if command.label().trim().is_empty() {
        errors.push(ValidationError::EmptyCommandLabel);
        return errors;
    }

    path.push(command.label());
    match command {
        Command::Branch(branch) => errors.extend(validate_children(branch, path)),
        Command::Leaf(leaf) => errors.extend(validate_options(&leaf.options, path)),
    }
    path.pop();

    errors
}

fn validate_children<'a>(branch: &'a BranchCommand, path: &mut Vec<&'a str>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for child in &branch.children {
        if !seen.insert(child.label()) {
            errors.push(ValidationError::DuplicateChildCommand {
                branch: path.join(" "),
                label: child.label().to_string(),
            });
            return errors;
        }

        errors.extend(validate_command(child, path));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_options(options: &[CommandOption], path: &[&str]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for option in options {
        if option.label().trim().is_empty() {
            errors.push(ValidationError::EmptyOptionLabel);
            return errors;
        }

        if !seen.insert(option.label()) {
            errors.push(ValidationError::DuplicateOption {
                command: path.join(" "),
                label: option.label().to_string(),
            });
            return errors;
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LeafCommand;

    fn option(label: &str) -> CommandOption {
        CommandOption::new(label, ["desc"]).unwrap()
    }

    #[test]
    fn test_valid_tree() {
        let root: Command = BranchCommand::new("af")
            .with_child(LeafCommand::new("create-dog").with_option(option("--name")))
            .with_child(BranchCommand::new("nested").with_child(LeafCommand::new("help")))
            .into();

        assert!(validate_tree(&root).is_empty());
    }

    #[test]
    fn test_empty_command_label() {
        let root: Command = BranchCommand::new("af")
            .with_child(LeafCommand::new("   "))
            .into();

        assert_eq!(validate_tree(&root), vec![ValidationError::EmptyCommandLabel]);
    }

    #[test]
    fn test_duplicate_child_is_reported_with_branch_path() {
        let root: Command = BranchCommand::new("af")
            .with_child(
                BranchCommand::new("pets")
                    .with_child(LeafCommand::new("dog"))
                    .with_child(BranchCommand::new("dog")),
            )
            .into();

        assert_eq!(
            validate_tree(&root),
            vec![ValidationError::DuplicateChildCommand {
                branch: "af pets".to_string(),
                label: "dog".to_string(),
            }]
        );
    }

    #[test]
    fn test_duplicate_option() {
        let root: Command = BranchCommand::new("af")
            .with_child(
                LeafCommand::new("create-dog")
                    .with_option(option("--name"))
                    .with_option(option("--name")),
            )
            .into();

        let errors = validate_tree(&root);
        assert!(matches!(
            &errors[..],
            [ValidationError::DuplicateOption { command, label }]
                if command == "af create-dog" && label == "--name"
        ));
    }

    #[test]
    fn test_reserved_labels_on_branch_root() {
        for token in HELP_TOKENS {
            let root: Command = BranchCommand::new("af")
                .with_child(LeafCommand::new(token))
                .into();
            assert_eq!(
                validate_tree(&root),
                vec![ValidationError::ReservedHelpLabel(token.to_string())]
            );
        }
    }

    #[test]
    fn test_reserved_labels_on_leaf_root() {
        let root: Command = LeafCommand::new("tool").with_option(option("-h")).into();
        let errors = validate_tree(&root);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("[ help, --help, -h ]"));
    }

    #[test]
    fn test_reserved_labels_only_matter_at_root() {
        let root: Command = BranchCommand::new("af")
            .with_child(LeafCommand::new("run").with_option(option("--help")))
            .into();
        assert!(validate_tree(&root).is_empty());
    }
}
