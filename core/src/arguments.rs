//! Argument grouping and typed value access for leaf commands.
//!
//! The tokens left over after resolution belong to the leaf's own option
//! grammar. [`group_arguments`] partitions them into per-option value lists:
//! every token that equals a declared option label opens a new group, and
//! every other token is a value of the most recently opened one.
//!
//! Arity and type checks are deferred to the accessors on [`OptionInput`],
//! which each leaf calls for the options it cares about.
//!
//! # Examples
//!
//! ```
//! use command_tree_core::*;
//!
//! let tree = CommandTree::new(
//!     LeafCommand::new("copy")
//!         .with_option(CommandOption::new("--from", ["Sources."]).unwrap())
//!         .with_option(CommandOption::new("--to", ["Destination."]).unwrap()),
//! )
//! .unwrap();
//! let leaf = tree.root().as_leaf().unwrap();
//!
//! let grouped = group_arguments(leaf, &["--from", "a", "b", "--to", "c"]).unwrap();
//! assert_eq!(grouped["--from"], vec!["a", "b"]);
//! assert_eq!(grouped["--to"], vec!["c"]);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use clap::ValueEnum;
use tracing::debug;

use crate::error::{CliError, UsageError};
use crate::tree::{CommandRef, LeafRef};

/// Option label mapped to the values supplied after it.
pub type GroupedArguments = HashMap<String, Vec<String>>;

/// Groups the tail `tokens` of an invocation by option label.
///
/// An option followed directly by another option, or by the end of input,
/// maps to an empty list.
///
/// # Errors
///
/// Returns a [`UsageError`] bound to the leaf if tokens were supplied to a
/// leaf without options, if the first token is not a declared option, or if
/// one option is supplied more than once.
pub fn group_arguments<S: AsRef<str>>(
    leaf: LeafRef<'_>,
    tokens: &[S],
) -> Result<GroupedArguments, UsageError> {
    let mut grouped = GroupedArguments::new();
    let command = leaf.command();

    let Some((first, rest)) = tokens.split_first() else {
        return Ok(grouped);
    };

    if leaf.options().is_empty() {
        return Err(UsageError::new(
            command.id(),
            format!(
                "The command '{}' has not been designed to be invoked with arguments.",
                command.path_as_cli_prompt()
            ),
        ));
    }

    let first = first.as_ref();
    if !leaf.has_option(first) {
        return Err(UsageError::new(
            command.id(),
            format!(
                "The command '{}' does not have an option '{first}'.",
                command.path_as_cli_prompt()
            ),
        ));
    }

    let mut current = first.to_string();
    let mut values = Vec::new();

    for token in rest {
        let token = token.as_ref();
        if leaf.has_option(token) {
            close_group(&mut grouped, command, current, std::mem::take(&mut values))?;
            current = token.to_string();
        } else {
            values.push(token.to_string());
        }
    }
    close_group(&mut grouped, command, current, values)?;

    debug!(command = %command.label(), options = grouped.len(), "Grouped arguments");
    Ok(grouped)
}

fn close_group(
    grouped: &mut GroupedArguments,
    command: CommandRef<'_>,
    label: String,
    values: Vec<String>,
) -> Result<(), UsageError> {
    if grouped.contains_key(&label) {
        return Err(UsageError::new(
            command.id(),
            format!("The option '{label}' was specified more than once."),
        ));
    }
    grouped.insert(label, values);
    Ok(())
}

/// The arguments of one leaf invocation, grouped by option.
#[derive(Debug)]
pub struct CommandArguments<'t> {
    leaf: LeafRef<'t>,
    tokens: Vec<String>,
    grouped: GroupedArguments,
}

impl<'t> CommandArguments<'t> {
    /// Groups `tokens` for `leaf`.
    ///
    /// # Errors
    ///
    /// See [`group_arguments`].
    pub fn new<S: AsRef<str>>(leaf: LeafRef<'t>, tokens: &[S]) -> Result<Self, UsageError> {
        let grouped = group_arguments(leaf, tokens)?;
        Ok(Self {
            leaf,
            tokens: tokens.iter().map(|token| token.as_ref().to_string()).collect(),
            grouped,
        })
    }

    /// The leaf being invoked.
    pub fn command(&self) -> LeafRef<'t> {
        self.leaf
    }

    /// The raw tail tokens, before grouping.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The grouped option values.
    pub fn grouped(&self) -> &GroupedArguments {
        &self.grouped
    }

    /// Whether `label` was supplied.
    pub fn contains(&self, label: &str) -> bool {
        self.grouped.contains_key(label)
    }

    /// The input for `label`, or `None` if it was not supplied.
    pub fn try_get(&self, label: &str) -> Option<OptionInput<'_>> {
        self.grouped
            .get_key_value(label)
            .map(|(label, values)| OptionInput {
                command: self.leaf.command(),
                label,
                values,
            })
    }

    /// The input for a mandatory option.
    ///
    /// # Errors
    ///
    /// Returns a [`UsageError`] if `label` was not supplied.
    pub fn get(&self, label: &str) -> Result<OptionInput<'_>, UsageError> {
        self.try_get(label).ok_or_else(|| {
            let command = self.leaf.command();
            UsageError::new(
                command.id(),
                format!(
                    "The command '{}' requires the option '{label}' to be specified.",
                    command.path_as_cli_prompt()
                ),
            )
        })
    }

    /// A usage error bound to this leaf, for parsers that reject the input.
    pub fn usage_error(&self, message: impl Into<String>) -> CliError {
        UsageError::new(self.leaf.command().id(), message).into()
    }
}

/// The values the user supplied for one option.
#[derive(Debug, Clone, Copy)]
pub struct OptionInput<'a> {
    command: CommandRef<'a>,
    label: &'a str,
    values: &'a [String],
}

impl<'a> OptionInput<'a> {
    /// The option label.
    pub fn label(&self) -> &'a str {
        self.label
    }

    /// Every value, in input order.
    pub fn values(&self) -> &'a [String] {
        self.values
    }

    /// The only value.
    ///
    /// # Errors
    ///
    /// Returns a usage error unless exactly one value was supplied.
    pub fn expect_single_value(&self) -> Result<&'a str, CliError> {
        match self.values {
            [value] => Ok(value.as_str()),
            values => {
                let counting = if values.is_empty() {
                    "none was".to_string()
                } else {
                    format!("{} were", values.len())
                };
                Err(self.usage_error(format!(
                    "The command '{}' expects a single value for the option '{}' but {counting} provided.",
                    self.command.path_as_cli_prompt(),
                    self.label
                )))
            }
        }
    }

    /// The only value, as a path to a file that exists.
    ///
    /// # Errors
    ///
    /// Returns a usage error on a wrong value count, or a message-only error
    /// if the file does not exist.
    pub fn expect_existing_file(&self) -> Result<PathBuf, CliError> {
        let value = self.expect_single_value()?;
        let path = PathBuf::from(value);
        if !path.is_file() {
            return Err(CliError::message(format!("The file '{value}' does not exist.")));
        }
        Ok(path)
    }

    /// The only value, as a path to a directory that exists.
    ///
    /// # Errors
    ///
    /// Returns a usage error on a wrong value count, or a message-only error
    /// if the directory does not exist.
    pub fn expect_existing_directory(&self) -> Result<PathBuf, CliError> {
        let value = self.expect_single_value()?;
        let path = PathBuf::from(value);
        if !path.is_dir() {
            return Err(CliError::message(format!(
                "The directory '{value}' does not exist."
            )));
        }
        Ok(path)
    }

    /// The only value, parsed as an integer.
    ///
    /// # Errors
    ///
    /// Returns a usage error on a wrong value count, or a message-only error
    /// if the value is not an integer.
    pub fn expect_integer(&self) -> Result<i64, CliError> {
        let value = self.expect_single_value()?;
        value
            .parse()
            .map_err(|_| CliError::message(format!("Could not parse '{value}' as an integer.")))
    }

    /// The only value, matched case-sensitively against the names of `T`'s
    /// variants.
    ///
    /// # Errors
    ///
    /// Returns a usage error on a wrong value count or an unknown name.
    pub fn expect_enum_value<T: ValueEnum>(&self) -> Result<T, CliError> {
        let value = self.expect_single_value()?;
        self.parse_enum(value)
    }

    /// Every value matched against `T`'s variants, duplicates removed,
    /// first-occurrence order kept.
    ///
    /// # Errors
    ///
    /// Returns a usage error naming the first unknown value.
    pub fn expect_enum_values<T: ValueEnum + PartialEq>(&self) -> Result<Vec<T>, CliError> {
        let mut parsed: Vec<T> = Vec::new();
        for value in self.values {
            let variant = self.parse_enum(value)?;
            if !parsed.contains(&variant) {
                parsed.push(variant);
            }
        }
        Ok(parsed)
    }

    fn parse_enum<T: ValueEnum>(&self, value: &str) -> Result<T, CliError> {
        T::from_str(value, false).map_err(|_| {
            let available: Vec<String> = T::value_variants()
                .iter()
                .filter_map(T::to_possible_value)
                .map(|possible| possible.get_name().to_string())
                .collect();
            self.usage_error(format!(
                "There is no value for {} that maps to '{value}'. Available values are: [ {} ].",
                short_type_name::<T>(),
                available.join(", ")
            ))
        })
    }

    fn usage_error(&self, message: String) -> CliError {
        UsageError::new(self.command.id(), message).into()
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::ValueEnum;
    use tempfile::TempDir;

    use super::*;
    use crate::tree::CommandTree;
    use crate::types::{CommandOption, LeafCommand};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum Species {
        Dog,
        Cat,
    }

    fn tree_with_options(labels: &[&str]) -> CommandTree {
        let leaf = labels.iter().fold(LeafCommand::new("run"), |leaf, label| {
            leaf.with_option(CommandOption::new(*label, ["desc"]).unwrap())
        });
        CommandTree::new(leaf).unwrap()
    }

    fn arguments<'t>(tree: &'t CommandTree, tokens: &[&str]) -> CommandArguments<'t> {
        CommandArguments::new(tree.root().as_leaf().unwrap(), tokens).unwrap()
    }

    fn usage_message(error: CliError) -> String {
        match error {
            CliError::Usage(usage) => usage.message().to_string(),
            other => panic!("expected a usage error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_tail_groups_to_nothing() {
        let tree = tree_with_options(&["--a"]);
        let leaf = tree.root().as_leaf().unwrap();
        assert!(group_arguments::<&str>(leaf, &[]).unwrap().is_empty());

        let tree = tree_with_options(&[]);
        let leaf = tree.root().as_leaf().unwrap();
        assert!(group_arguments::<&str>(leaf, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_tokens_for_leaf_without_options() {
        let tree = tree_with_options(&[]);
        let leaf = tree.root().as_leaf().unwrap();
        let err = group_arguments(leaf, &["x"]).unwrap_err();
        assert_eq!(
            err.message(),
            "The command 'run' has not been designed to be invoked with arguments."
        );
    }

    #[test]
    fn test_first_token_must_be_an_option() {
        let tree = tree_with_options(&["--a"]);
        let leaf = tree.root().as_leaf().unwrap();
        let err = group_arguments(leaf, &["value", "--a"]).unwrap_err();
        assert_eq!(err.message(), "The command 'run' does not have an option 'value'.");
        assert_eq!(err.command(), tree.root().id());
    }

    #[test]
    fn test_values_attach_to_preceding_option() {
        let tree = tree_with_options(&["--a", "--b"]);
        let leaf = tree.root().as_leaf().unwrap();
        let grouped = group_arguments(leaf, &["--a", "x", "y", "--b", "z"]).unwrap();

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["--a"], vec!["x", "y"]);
        assert_eq!(grouped["--b"], vec!["z"]);
    }

    #[test]
    fn test_option_without_values_maps_to_empty_list() {
        let tree = tree_with_options(&["--a", "--b"]);
        let leaf = tree.root().as_leaf().unwrap();
        let grouped = group_arguments(leaf, &["--a", "--b"]).unwrap();

        assert!(grouped["--a"].is_empty());
        assert!(grouped["--b"].is_empty());
    }

    #[test]
    fn test_repeated_option_is_rejected() {
        let tree = tree_with_options(&["--a"]);
        let leaf = tree.root().as_leaf().unwrap();
        let err = group_arguments(leaf, &["--a", "1", "--a", "2"]).unwrap_err();
        assert_eq!(err.message(), "The option '--a' was specified more than once.");
    }

    #[test]
    fn test_arguments_keep_raw_tokens_and_groups() {
        let tree = tree_with_options(&["--a", "--b"]);
        let args = arguments(&tree, &["--b", "1", "--a"]);

        assert_eq!(args.tokens(), ["--b", "1", "--a"]);
        assert_eq!(args.grouped().len(), 2);
        assert_eq!(args.grouped()["--b"], vec!["1"]);
        assert!(args.grouped()["--a"].is_empty());
        assert_eq!(args.command().command().id(), tree.root().id());
    }

    #[test]
    fn test_missing_mandatory_option() {
        let tree = tree_with_options(&["--name"]);
        let args = arguments(&tree, &[]);

        assert!(!args.contains("--name"));
        assert!(args.try_get("--name").is_none());
        assert_eq!(
            args.get("--name").unwrap_err().message(),
            "The command 'run' requires the option '--name' to be specified."
        );
    }

    #[test]
    fn test_single_value_counts() {
        let tree = tree_with_options(&["--a", "--b"]);
        let args = arguments(&tree, &["--a", "--b", "1", "2"]);

        let none = args.get("--a").unwrap().expect_single_value().unwrap_err();
        assert_eq!(
            usage_message(none),
            "The command 'run' expects a single value for the option '--a' but none was provided."
        );

        let two = args.get("--b").unwrap().expect_single_value().unwrap_err();
        assert_eq!(
            usage_message(two),
            "The command 'run' expects a single value for the option '--b' but 2 were provided."
        );
    }

    #[test]
    fn test_integer_accessor() {
        let tree = tree_with_options(&["--count", "--bad"]);
        let args = arguments(&tree, &["--count", "-12", "--bad", "twelve"]);

        assert_eq!(args.get("--count").unwrap().expect_integer().unwrap(), -12);
        let err = args.get("--bad").unwrap().expect_integer().unwrap_err();
        assert!(matches!(err, CliError::Message(ref m) if m == "Could not parse 'twelve' as an integer."));
    }

    #[test]
    fn test_existing_file_and_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, "hello").unwrap();
        let missing = dir.path().join("missing.txt");

        let file_arg = file.to_string_lossy().into_owned();
        let dir_arg = dir.path().to_string_lossy().into_owned();
        let missing_arg = missing.to_string_lossy().into_owned();

        let tree = tree_with_options(&["--file", "--dir", "--missing"]);
        let args = arguments(
            &tree,
            &[
                "--file",
                file_arg.as_str(),
                "--dir",
                dir_arg.as_str(),
                "--missing",
                missing_arg.as_str(),
            ],
        );

        assert_eq!(args.get("--file").unwrap().expect_existing_file().unwrap(), file);
        assert_eq!(
            args.get("--dir").unwrap().expect_existing_directory().unwrap(),
            dir.path()
        );
        assert!(args.get("--dir").unwrap().expect_existing_file().is_err());

        let err = args.get("--missing").unwrap().expect_existing_directory().unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("The directory '{missing_arg}' does not exist.")
        );
    }

    #[test]
    fn test_enum_accessors() {
        let tree = tree_with_options(&["--one", "--many", "--bad"]);
        let args = arguments(
            &tree,
            &["--one", "cat", "--many", "dog", "cat", "dog", "--bad", "Dog"],
        );

        assert_eq!(
            args.get("--one").unwrap().expect_enum_value::<Species>().unwrap(),
            Species::Cat
        );
        let many = args.get("--many").unwrap();
        assert_eq!(many.label(), "--many");
        assert_eq!(many.values(), ["dog", "cat", "dog"]);
        assert_eq!(
            many.expect_enum_values::<Species>().unwrap(),
            vec![Species::Dog, Species::Cat]
        );

        let err = args.get("--bad").unwrap().expect_enum_value::<Species>().unwrap_err();
        assert_eq!(
            usage_message(err),
            "There is no value for Species that maps to 'Dog'. Available values are: [ dog, cat ]."
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn grouping_is_idempotent(
                a in prop::collection::vec("[a-z]{1,6}", 0..5),
                b in prop::collection::vec("[a-z]{1,6}", 0..5),
            ) {
                let tree = tree_with_options(&["--a", "--b"]);
                let leaf = tree.root().as_leaf().unwrap();

                let mut tokens = vec!["--a".to_string()];
                tokens.extend(a.iter().cloned());
                tokens.push("--b".to_string());
                tokens.extend(b.iter().cloned());

                let first = group_arguments(leaf, &tokens).unwrap();
                let second = group_arguments(leaf, &tokens).unwrap();
                prop_assert_eq!(&first, &second);
                prop_assert_eq!(&first["--a"], &a);
                prop_assert_eq!(&first["--b"], &b);
            }

            #[test]
            fn unknown_first_token_is_rejected(first in "[a-z]{1,8}") {
                let tree = tree_with_options(&["--a"]);
                let leaf = tree.root().as_leaf().unwrap();
                prop_assert!(group_arguments(leaf, &[first.as_str(), "--a"]).is_err());
            }
        }
    }
}
