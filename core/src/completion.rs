//! Fish shell completion scripts.
//!
//! The generated script defines a `__fish_using_command` helper that checks
//! whether the words typed so far match a given command path, then adds one
//! `complete` line per command and per leaf option.

use tracing::debug;

use crate::error::ConfigError;
use crate::tree::{CommandKind, CommandRef, CommandTree};

const USING_COMMAND_FUNCTION: &str = "\
function __fish_using_command
    set cmd (commandline -opc)
    if [ (count $cmd) -eq (count $argv) ]
        for i in (seq (count $argv))
            if [ $cmd[$i] != $argv[$i] ]
                return 1
            end
        end
        return 0
    end
    return 1
end";

/// Builds a fish completion script for one or more command trees.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let tree = CommandTree::new(
///     BranchCommand::new("af").with_child(
///         LeafCommand::new("create-dog")
///             .with_description(["Prints out a dog."])
///             .with_option(CommandOption::new("--name", ["The name."]).unwrap()),
///     ),
/// )
/// .unwrap();
///
/// let mut script = FishCompletionScript::new();
/// script.add_command_tree(&tree).unwrap();
/// let script = script.generate();
///
/// assert!(script.starts_with("#!/usr/bin/env fish\n"));
/// assert!(script.contains(
///     "complete --command af --condition \"__fish_using_command af\" --no-files \
///      --arguments create-dog --description \"Prints out a dog.\""
/// ));
/// assert!(script.contains("--long-option name --description \"The name.\""));
/// ```
#[derive(Debug, Clone)]
pub struct FishCompletionScript {
    lines: Vec<String>,
}

impl Default for FishCompletionScript {
    fn default() -> Self {
        Self::new()
    }
}

impl FishCompletionScript {
    /// A script holding only the shebang and the helper function.
    pub fn new() -> Self {
        Self {
            lines: vec![
                "#!/usr/bin/env fish".to_string(),
                String::new(),
                USING_COMMAND_FUNCTION.to_string(),
                String::new(),
            ],
        }
    }

    /// Adds completions for every command and option of `tree`, in
    /// declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LeafRoot`] if the root of `tree` is a leaf.
    pub fn add_command_tree(&mut self, tree: &CommandTree) -> Result<(), ConfigError> {
        let root = tree.root();
        if root.as_branch().is_none() {
            return Err(ConfigError::LeafRoot);
        }

        let before = self.lines.len();
        for command in tree.iter().filter(|command| !command.is_root()) {
            self.add_command(root, command);
            if let CommandKind::Leaf(leaf) = command.kind() {
                let condition = labels(&command.path());
                for option in leaf.options() {
                    self.lines.push(format!(
                        "complete --command {} --condition \"__fish_using_command {condition}\" \
                         --no-files --long-option {} --description \"{}\"",
                        root.label(),
                        option.label().trim_start_matches('-'),
                        escape_description(option.description())
                    ));
                }
            }
        }

        debug!(root = %root.label(), lines = self.lines.len() - before, "Added completions");
        Ok(())
    }

    fn add_command(&mut self, root: CommandRef<'_>, command: CommandRef<'_>) {
        let path = command.path();
        let condition = labels(&path[..path.len() - 1]);
        self.lines.push(format!(
            "complete --command {} --condition \"__fish_using_command {condition}\" \
             --no-files --arguments {} --description \"{}\"",
            root.label(),
            command.label(),
            escape_description(command.description())
        ));
    }

    /// The script, lines joined with `\n`.
    pub fn generate(&self) -> String {
        self.lines.join("\n")
    }
}

fn labels(path: &[CommandRef<'_>]) -> String {
    path.iter()
        .map(CommandRef::label)
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_description(description: &[String]) -> String {
    description.join(" ").replace('"', "\\\"")
}
