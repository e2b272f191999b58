//! The immutable command tree.
//!
//! [`CommandTree::new`] validates a [`Command`] definition and flattens it
//! into an arena of nodes. Parent links are arena indices stamped in one
//! top-down pass, so navigation in both directions is cheap and no node
//! owns a reference to another. The tree is never mutated afterwards.
//!
//! Commands are inspected through [`CommandRef`], a copyable view that
//! borrows the tree, and split into the two variants with
//! [`CommandRef::kind`].

use std::fmt;

use crate::action::LeafAction;
use crate::error::ConfigError;
use crate::types::{Command, CommandOption};
use crate::validate::validate_tree;

/// Handle to a command inside a [`CommandTree`].
///
/// Handles are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(usize);

struct Node {
    label: String,
    description: Vec<String>,
    parent: Option<CommandId>,
    body: Body,
}

enum Body {
    Branch {
        children: Vec<CommandId>,
    },
    Leaf {
        options: Vec<CommandOption>,
        action: Option<Box<dyn LeafAction>>,
    },
}

/// A validated, immutable hierarchy of commands.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let tree = CommandTree::new(
///     BranchCommand::new("af")
///         .with_child(LeafCommand::new("create-dog"))
///         .with_child(LeafCommand::new("create-cat")),
/// )
/// .unwrap();
///
/// let root = tree.root();
/// assert_eq!(root.label(), "af");
/// assert!(root.parent().is_none());
///
/// let dog = tree.find(&["create-dog"]).unwrap();
/// assert_eq!(dog.parent().unwrap().label(), "af");
/// assert_eq!(dog.path_as_cli_prompt(), "af create-dog");
/// assert_eq!(dog.help_path(), "af help create-dog");
/// ```
pub struct CommandTree {
    nodes: Vec<Node>,
}

impl CommandTree {
    /// Validates `root` and builds the tree.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] with the first structural problem
    /// found: an empty label, duplicate sibling labels, duplicate option
    /// labels, or a root-level label that collides with the built-in help
    /// tokens.
    pub fn new(root: impl Into<Command>) -> Result<Self, ConfigError> {
        let root = root.into();
        if let Some(error) = validate_tree(&root).into_iter().next() {
            return Err(error.into());
        }

        let mut tree = Self { nodes: Vec::new() };
        tree.insert(root, None);
        Ok(tree)
    }

    fn insert(&mut self, command: Command, parent: Option<CommandId>) -> CommandId {
        let id = CommandId(self.nodes.len());

        match command {
            Command::Leaf(leaf) => {
                self.nodes.push(Node {
                    label: leaf.label,
                    description: leaf.description,
                    parent,
                    body: Body::Leaf {
                        options: leaf.options,
                        action: leaf.action,
                    },
                });
            }
            Command::Branch(branch) => {
                self.nodes.push(Node {
                    label: branch.label,
                    description: branch.description,
                    parent,
                    body: Body::Branch {
                        children: Vec::new(),
                    },
                });

                let children: Vec<CommandId> = branch
                    .children
                    .into_iter()
                    .map(|child| self.insert(child, Some(id)))
                    .collect();

                if let Body::Branch { children: slot } = &mut self.nodes[id.0].body {
                    *slot = children;
                }
            }
        }

        id
    }

    /// The root command.
    pub fn root(&self) -> CommandRef<'_> {
        CommandRef {
            tree: self,
            id: CommandId(0),
        }
    }

    /// Looks up a command by handle.
    pub fn get(&self, id: CommandId) -> Option<CommandRef<'_>> {
        (id.0 < self.nodes.len()).then_some(CommandRef { tree: self, id })
    }

    /// Follows `labels` from the root, exact match at every step.
    pub fn find<S: AsRef<str>>(&self, labels: &[S]) -> Option<CommandRef<'_>> {
        labels.iter().try_fold(self.root(), |current, label| {
            current.as_branch()?.child(label.as_ref())
        })
    }

    /// Number of commands in the tree, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every command in pre-order, declaration order among siblings.
    pub fn iter(&self) -> impl Iterator<Item = CommandRef<'_>> {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let current = stack.pop()?;
            if let Some(branch) = current.as_branch() {
                stack.extend(branch.children().rev());
            }
            Some(current)
        })
    }

    fn node(&self, id: CommandId) -> &Node {
        &self.nodes[id.0]
    }
}

impl fmt::Debug for CommandTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// A borrowed view of one command in a tree.
#[derive(Clone, Copy)]
pub struct CommandRef<'t> {
    tree: &'t CommandTree,
    id: CommandId,
}

/// The two command variants, as seen through a [`CommandRef`].
#[derive(Debug, Clone, Copy)]
pub enum CommandKind<'t> {
    /// A command that groups children.
    Branch(BranchRef<'t>),
    /// A command that executes an action.
    Leaf(LeafRef<'t>),
}

impl<'t> CommandRef<'t> {
    /// This command's handle.
    pub fn id(&self) -> CommandId {
        self.id
    }

    /// The tree this command belongs to.
    pub fn tree(&self) -> &'t CommandTree {
        self.tree
    }

    /// The label, exactly as defined.
    pub fn label(&self) -> &'t str {
        &self.tree.node(self.id).label
    }

    /// Description paragraphs.
    pub fn description(&self) -> &'t [String] {
        &self.tree.node(self.id).description
    }

    /// The enclosing branch, or `None` at the root.
    pub fn parent(&self) -> Option<CommandRef<'t>> {
        self.tree
            .node(self.id)
            .parent
            .map(|id| CommandRef { tree: self.tree, id })
    }

    /// The root of the tree. May be this command.
    pub fn root(&self) -> CommandRef<'t> {
        self.tree.root()
    }

    /// Whether this is the root command.
    pub fn is_root(&self) -> bool {
        self.tree.node(self.id).parent.is_none()
    }

    /// Splits the command into its variant.
    pub fn kind(&self) -> CommandKind<'t> {
        match &self.tree.node(self.id).body {
            Body::Branch { children } => CommandKind::Branch(BranchRef {
                command: *self,
                children,
            }),
            Body::Leaf { options, action } => CommandKind::Leaf(LeafRef {
                command: *self,
                options,
                action: action.as_deref(),
            }),
        }
    }

    /// The branch view, if this is a branch.
    pub fn as_branch(&self) -> Option<BranchRef<'t>> {
        match self.kind() {
            CommandKind::Branch(branch) => Some(branch),
            CommandKind::Leaf(_) => None,
        }
    }

    /// The leaf view, if this is a leaf.
    pub fn as_leaf(&self) -> Option<LeafRef<'t>> {
        match self.kind() {
            CommandKind::Leaf(leaf) => Some(leaf),
            CommandKind::Branch(_) => None,
        }
    }

    /// Commands from the root down to this one, inclusive.
    pub fn path(&self) -> Vec<CommandRef<'t>> {
        let mut path: Vec<CommandRef<'t>> =
            std::iter::successors(Some(*self), CommandRef::parent).collect();
        path.reverse();
        path
    }

    /// The label as a user would type it in a shell: double quotes escaped,
    /// and the whole label quoted if it contains whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_tree_core::*;
    ///
    /// let tree = CommandTree::new(
    ///     BranchCommand::new("tool").with_child(LeafCommand::new("say \"hi\"")),
    /// )
    /// .unwrap();
    /// let leaf = tree.find(&["say \"hi\""]).unwrap();
    /// assert_eq!(leaf.console_label(), "\"say \\\"hi\\\"\"");
    /// ```
    pub fn console_label(&self) -> String {
        let escaped = self.label().replace('"', "\\\"");
        if escaped.contains(char::is_whitespace) {
            format!("\"{escaped}\"")
        } else {
            escaped
        }
    }

    /// The shell prompt that invokes this command, without options.
    pub fn path_as_cli_prompt(&self) -> String {
        self.path()
            .iter()
            .map(CommandRef::console_label)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The shell prompt that prints this command's help:
    /// `<root> help <remaining path>`.
    pub fn help_path(&self) -> String {
        let path = self.path();
        let mut parts = vec![path[0].console_label(), "help".to_string()];
        parts.extend(path[1..].iter().map(CommandRef::console_label));
        parts.join(" ")
    }
}

impl fmt::Debug for CommandRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRef")
            .field("id", &self.id)
            .field("label", &self.label())
            .finish()
    }
}

impl PartialEq for CommandRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for CommandRef<'_> {}

/// A branch command and its children.
#[derive(Debug, Clone, Copy)]
pub struct BranchRef<'t> {
    command: CommandRef<'t>,
    children: &'t [CommandId],
}

impl<'t> BranchRef<'t> {
    /// The underlying command.
    pub fn command(&self) -> CommandRef<'t> {
        self.command
    }

    /// Direct children in declaration order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = CommandRef<'t>> + 't {
        let tree = self.command.tree;
        self.children.iter().map(move |&id| CommandRef { tree, id })
    }

    /// Whether the branch has no children at all.
    pub fn is_childless(&self) -> bool {
        self.children.is_empty()
    }

    /// The first direct child labelled exactly `label`.
    pub fn child(&self, label: &str) -> Option<CommandRef<'t>> {
        self.children().find(|child| child.label() == label)
    }
}

/// A leaf command, its options, and its action.
#[derive(Clone, Copy)]
pub struct LeafRef<'t> {
    command: CommandRef<'t>,
    options: &'t [CommandOption],
    action: Option<&'t dyn LeafAction>,
}

impl<'t> LeafRef<'t> {
    /// The underlying command.
    pub fn command(&self) -> CommandRef<'t> {
        self.command
    }

    /// Declared options in declaration order.
    pub fn options(&self) -> &'t [CommandOption] {
        self.options
    }

    /// Whether `label` is one of the declared option labels.
    pub fn has_option(&self, label: &str) -> bool {
        self.options.iter().any(|option| option.label() == label)
    }

    /// The assigned action, if any.
    pub fn action(&self) -> Option<&'t dyn LeafAction> {
        self.action
    }
}

impl fmt::Debug for LeafRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafRef")
            .field("command", &self.command)
            .field("options", &self.options)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}
