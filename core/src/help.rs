//! Help screens for branch and leaf commands.
//!
//! A [`HelpProvider`] turns a command (and optionally the usage error that
//! led to it) into text. [`DefaultHelpProvider`] lays the screen out with
//! `command-tree-layout`: a centered banner, an error block, the command
//! description, a usage line, and a two-column listing of children or
//! options.

use command_tree_layout::{LayoutError, Section, TextBlock, TwoColumnParagraph};
use tracing::debug;

use crate::config::HelpLayout;
use crate::error::{UsageError, UsageErrorKind};
use crate::tree::{BranchRef, CommandKind, CommandRef, LeafRef};

/// Renders help for a command.
pub trait HelpProvider {
    /// Renders the help of `command`, annotated with `error` if the user got
    /// the command wrong.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the available width cannot fit the
    /// layout.
    fn render(&self, command: CommandRef<'_>, error: Option<&UsageError>) -> Result<String, LayoutError>;
}

/// The built-in help layout.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let tree = CommandTree::new(
///     BranchCommand::new("af")
///         .with_description(["This program prints animals."])
///         .with_child(LeafCommand::new("create-dog").with_description(["Prints a dog."])),
/// )
/// .unwrap();
///
/// let help = DefaultHelpProvider::new()
///     .with_terminal_width(80)
///     .render(tree.root(), None)
///     .unwrap();
///
/// assert!(help.contains("    Usage:\n\n        af <child command>\n"));
/// assert!(help.contains("        create-dog    Prints a dog.\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultHelpProvider {
    name: Option<String>,
    version: Option<String>,
    layout: HelpLayout,
    terminal_width: Option<usize>,
}

impl DefaultHelpProvider {
    /// A provider with no banner that sizes itself to standard output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the program name centered at the top.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the version centered under the name.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the width limits.
    pub fn with_layout(mut self, layout: HelpLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Pins the terminal width instead of probing standard output.
    pub fn with_terminal_width(mut self, width: usize) -> Self {
        self.terminal_width = Some(width);
        self
    }

    /// The line width the next render will use.
    pub fn line_width(&self) -> usize {
        let terminal_width = self.terminal_width.unwrap_or_else(|| {
            console::Term::stdout()
                .size_checked()
                .map_or(self.layout.fallback_terminal_width, |(_, columns)| {
                    usize::from(columns)
                })
        });
        self.layout.line_width(terminal_width)
    }

    fn banner(&self) -> Result<Option<Section>, LayoutError> {
        if self.name.is_none() && self.version.is_none() {
            return Ok(None);
        }

        let mut sections: Vec<Section> = self
            .name
            .iter()
            .chain(&self.version)
            .map(|text| Section::centered(text.as_str()))
            .collect();
        sections.push(Section::empty(2)?);
        Ok(Some(Section::composite(sections)))
    }

    fn render_branch(
        &self,
        block: &mut TextBlock,
        branch: BranchRef<'_>,
        error: Option<&UsageError>,
    ) -> Result<(), LayoutError> {
        let command = branch.command();
        let path = command.path_as_cli_prompt();

        let note = branch.is_childless().then(|| {
            format!(
                "The command '{path}' is not fully implemented. Code needs to be changed. \
                 You can either define child commands or turn this branch command into a leaf command."
            )
        });
        append_all(block, error_section(error, note)?)?;
        append_all(block, description_section(command)?)?;

        if branch.is_childless() {
            return Ok(());
        }

        block.append(&Section::empty(3)?)?;
        block.append(&Section::header("Usage:")?)?;
        block.append(&Section::empty(1)?)?;
        block.append(&Section::paragraph([format!("{path} <child command>")])?)?;
        block.append(&Section::empty(3)?)?;

        block.append(&Section::header("Child commands:")?)?;
        block.append(&Section::empty(1)?)?;

        let rows: Vec<(String, &[String])> = branch
            .children()
            .map(|child| (child.console_label(), child.description()))
            .collect();
        append_rows(block, &rows)?;

        block.append(&Section::empty(3)?)?;
        block.append(&Section::header(
            "For more details on a particular child command, run:",
        )?)?;
        block.append(&Section::empty(1)?)?;
        block.append(&Section::paragraph([format!(
            "{} <child command>",
            command.help_path()
        )])?)?;

        Ok(())
    }

    fn render_leaf(
        &self,
        block: &mut TextBlock,
        leaf: LeafRef<'_>,
        error: Option<&UsageError>,
    ) -> Result<(), LayoutError> {
        let command = leaf.command();
        let path = command.path_as_cli_prompt();

        let note = leaf.action().is_none().then(|| {
            format!("The command '{path}' does not have an assigned action to invoke.")
        });
        append_all(block, error_section(error, note)?)?;
        append_all(block, description_section(command)?)?;

        let has_options = !leaf.options().is_empty();
        let usage = if has_options {
            format!("{path} [<options>]")
        } else {
            path
        };

        block.append(&Section::empty(3)?)?;
        block.append(&Section::header("Usage:")?)?;
        block.append(&Section::empty(1)?)?;
        block.append(&Section::paragraph([usage])?)?;

        if has_options {
            block.append(&Section::empty(3)?)?;
            block.append(&Section::header("Options:")?)?;
            block.append(&Section::empty(1)?)?;

            let rows: Vec<(String, &[String])> = leaf
                .options()
                .iter()
                .map(|option| (option.label().to_string(), option.description()))
                .collect();
            append_rows(block, &rows)?;
        }

        Ok(())
    }
}

impl HelpProvider for DefaultHelpProvider {
    fn render(&self, command: CommandRef<'_>, error: Option<&UsageError>) -> Result<String, LayoutError> {
        let width = self.line_width();
        debug!(command = %command.label(), width, with_error = error.is_some(), "Rendering help");

        let mut block = TextBlock::new(width)?;
        block.append(&Section::empty(1)?)?;
        if let Some(banner) = self.banner()? {
            block.append(&banner)?;
        }

        match command.kind() {
            CommandKind::Branch(branch) => self.render_branch(&mut block, branch, error)?,
            CommandKind::Leaf(leaf) => self.render_leaf(&mut block, leaf, error)?,
        }

        block.append(&Section::empty(1)?)?;
        Ok(block.to_string())
    }
}

fn append_all(block: &mut TextBlock, section: Option<Section>) -> Result<(), LayoutError> {
    match section {
        Some(section) => block.append(&section),
        None => Ok(()),
    }
}

/// The "Error:" block. `note` reports a missing implementation; it is
/// dropped when `error` already says so.
fn error_section(
    error: Option<&UsageError>,
    note: Option<String>,
) -> Result<Option<Section>, LayoutError> {
    let mut errors: Vec<String> = error.map(|e| e.message().to_string()).into_iter().collect();

    let reported = error.is_some_and(|e| e.kind() == UsageErrorKind::MissingImplementation);
    if let Some(note) = note.filter(|_| !reported) {
        errors.push(note);
    }

    if errors.is_empty() {
        return Ok(None);
    }

    let (header, summary) = if errors.len() > 1 {
        let numbered: Vec<String> = errors
            .iter()
            .enumerate()
            .map(|(i, error)| format!("{}) {error}", i + 1))
            .collect();
        ("Errors:", numbered.join("\n\n"))
    } else {
        ("Error:", errors.join("\n\n"))
    };

    Ok(Some(Section::composite(vec![
        Section::header(header)?,
        Section::empty(1)?,
        Section::paragraph([summary])?,
        Section::empty(3)?,
    ])))
}

fn description_section(command: CommandRef<'_>) -> Result<Option<Section>, LayoutError> {
    let description = command.description();
    if description.is_empty() {
        return Ok(None);
    }

    Ok(Some(Section::composite(vec![
        Section::header("Command description:")?,
        Section::empty(1)?,
        Section::paragraph(description)?,
    ])))
}

/// Label/description rows sharing one first-column width, two blank lines
/// apart.
fn append_rows(block: &mut TextBlock, rows: &[(String, &[String])]) -> Result<(), LayoutError> {
    let first_column_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(1)
        .max(1);

    for (index, (label, description)) in rows.iter().enumerate() {
        if index > 0 {
            block.append(&Section::empty(2)?)?;
        }
        let row = TwoColumnParagraph::new(first_column_width, [label.as_str()], description.iter())?;
        block.append(&Section::two_column(row))?;
    }
    Ok(())
}
