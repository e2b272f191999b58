//! Hierarchical command-line interfaces built from a tree of commands.
//!
//! This crate models a program's command-line surface as a tree:
//!
//! - [`BranchCommand`]: groups child commands; never executes itself.
//! - [`LeafCommand`]: declares [`CommandOption`]s and runs a
//!   [`LeafAction`].
//! - [`CommandTree`]: the validated, immutable arena the definitions are
//!   frozen into, navigated through [`CommandRef`].
//!
//! An invocation flows through [`resolve`] (tokens to target command),
//! [`group_arguments`] (tail tokens to per-option values, wrapped in
//! [`CommandArguments`]) and the leaf's action. [`ArgumentHandler`] ties the
//! steps together and turns every [`UsageError`] into help rendered by a
//! [`HelpProvider`], with the offending message at the top.
//!
//! Also included: a typed service [`Registry`] for wiring parsers and
//! handlers, a [`FishCompletionScript`] builder, and [`HelpLayout`] width
//! settings loadable from YAML.
//!
//! # Example
//!
//! ```
//! use command_tree_core::*;
//!
//! let tree = CommandTree::new(
//!     BranchCommand::new("af")
//!         .with_description(["This program prints animals."])
//!         .with_child(
//!             LeafCommand::new("create-cat")
//!                 .with_description(["Prints out a cat."])
//!                 .with_option(CommandOption::new("--name", ["The name of the cat."]).unwrap())
//!                 .with_action(|arguments| {
//!                     let name = arguments.get("--name")?.expect_single_value()?;
//!                     println!("I am a cat named {name}!");
//!                     Ok(())
//!                 }),
//!         ),
//! )
//! .unwrap();
//!
//! let handler = ArgumentHandler::new(ArgumentHandlerSettings::new(tree).with_terminal_width(100));
//!
//! let mut out = Vec::new();
//! let mut err = Vec::new();
//! let status = handler.handle(&["create-cat"], &mut out, &mut err).unwrap();
//!
//! assert_eq!(status, Status::Failure);
//! let help = String::from_utf8(out).unwrap();
//! assert!(help.contains("requires the option '--name' to be specified."));
//! ```

mod action;
mod arguments;
mod completion;
mod config;
mod error;
mod handler;
mod help;
mod registry;
mod resolve;
mod tree;
mod types;
mod validate;

pub use action::{ArgumentParser, LeafAction, LeafHandler, ParsedAction};
pub use arguments::{CommandArguments, GroupedArguments, OptionInput, group_arguments};
pub use completion::FishCompletionScript;
pub use config::{ArgumentHandlerSettings, HelpLayout};
pub use error::{CliError, ConfigError, Result, UsageError, UsageErrorKind};
pub use handler::{ArgumentHandler, Outcome, Status};
pub use help::{DefaultHelpProvider, HelpProvider};
pub use registry::Registry;
pub use resolve::{Resolution, resolve};
pub use tree::{BranchRef, CommandId, CommandKind, CommandRef, CommandTree, LeafRef};
pub use types::*;
pub use validate::{HELP_TOKENS, ValidationError, validate_tree};

pub use command_tree_layout::LayoutError;
