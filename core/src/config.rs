//! Help layout configuration and dispatcher settings.
//!
//! [`HelpLayout`] controls how wide rendered help may grow. It can be kept
//! in a YAML file next to the program.
//!
//! # Example YAML
//!
//! ```yaml
//! max_line_width: 100
//! terminal_margin: 8
//! fallback_terminal_width: 80
//! ```

use std::fmt;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::help::{DefaultHelpProvider, HelpProvider};
use crate::tree::CommandTree;

/// Width limits for rendered help.
///
/// The line width used for one render is
/// `min(terminal width - terminal_margin, max_line_width)`.
///
/// # Examples
///
/// ```
/// use command_tree_core::HelpLayout;
///
/// let layout = HelpLayout::default();
/// assert_eq!(layout.line_width(200), 120);
/// assert_eq!(layout.line_width(100), 92);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpLayout {
    /// Upper bound on the line width, however wide the terminal is.
    pub max_line_width: usize,
    /// Columns left unused on the right of the terminal.
    pub terminal_margin: usize,
    /// Terminal width assumed when standard output is not a terminal.
    pub fallback_terminal_width: usize,
}

impl Default for HelpLayout {
    fn default() -> Self {
        Self {
            max_line_width: 120,
            terminal_margin: 8,
            fallback_terminal_width: 80,
        }
    }
}

impl HelpLayout {
    /// The line width for a terminal `terminal_width` columns wide. May be
    /// zero on a very narrow terminal; rendering then reports the shortfall.
    pub fn line_width(&self, terminal_width: usize) -> usize {
        terminal_width
            .saturating_sub(self.terminal_margin)
            .min(self.max_line_width)
    }

    /// Loads a layout from a YAML file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let layout = serde_yaml::from_reader(reader)?;
        Ok(layout)
    }

    /// Saves the layout as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written, or
    /// [`ConfigError::Yaml`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}

/// Everything an [`ArgumentHandler`](crate::ArgumentHandler) needs.
///
/// # Examples
///
/// ```
/// use command_tree_core::*;
///
/// let tree = CommandTree::new(BranchCommand::new("af").with_child(LeafCommand::new("run"))).unwrap();
/// let settings = ArgumentHandlerSettings::new(tree)
///     .with_name("Animal Factory")
///     .with_version("1.0.0")
///     .with_terminal_width(100);
///
/// assert_eq!(settings.name(), Some("Animal Factory"));
/// ```
pub struct ArgumentHandlerSettings {
    name: Option<String>,
    version: Option<String>,
    layout: HelpLayout,
    terminal_width: Option<usize>,
    tree: CommandTree,
    help_provider: Option<Box<dyn HelpProvider>>,
}

impl ArgumentHandlerSettings {
    /// Settings for `tree` with no banner and the default help provider.
    pub fn new(tree: CommandTree) -> Self {
        Self {
            name: None,
            version: None,
            layout: HelpLayout::default(),
            terminal_width: None,
            tree,
            help_provider: None,
        }
    }

    /// Sets the program name shown at the top of help.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the version shown under the name.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the width limits used by the default help provider.
    pub fn with_layout(mut self, layout: HelpLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Pins the terminal width instead of probing standard output.
    pub fn with_terminal_width(mut self, width: usize) -> Self {
        self.terminal_width = Some(width);
        self
    }

    /// Replaces the default help provider.
    pub fn with_help_provider(mut self, provider: impl HelpProvider + 'static) -> Self {
        self.help_provider = Some(Box::new(provider));
        self
    }

    /// The program name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The program version, if set.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The command tree.
    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub(crate) fn into_parts(self) -> (CommandTree, Box<dyn HelpProvider>) {
        let provider = match self.help_provider {
            Some(provider) => provider,
            None => {
                let mut provider = DefaultHelpProvider::new().with_layout(self.layout);
                if let Some(name) = self.name {
                    provider = provider.with_name(name);
                }
                if let Some(version) = self.version {
                    provider = provider.with_version(version);
                }
                if let Some(width) = self.terminal_width {
                    provider = provider.with_terminal_width(width);
                }
                Box::new(provider)
            }
        };
        (self.tree, provider)
    }
}

impl fmt::Debug for ArgumentHandlerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentHandlerSettings")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("layout", &self.layout)
            .field("terminal_width", &self.terminal_width)
            .field("tree", &self.tree)
            .field("custom_help_provider", &self.help_provider.is_some())
            .finish()
    }
}
