//! The `af` command tree and the services its leaves are built from.

use std::io::{self, Write};
use std::rc::Rc;

use clap::ValueEnum;
use command_tree_core::{
    ArgumentParser, BranchCommand, CliError, CommandArguments, CommandOption, CommandTree,
    ConfigError, FishCompletionScript, LeafCommand, LeafHandler, LeafRef, Registry,
};
use tracing::debug;

const NAME_LABEL: &str = "--name";
const SPECIES_LABEL: &str = "--species";
const COUNT_LABEL: &str = "--count";

/// Where the animals are printed.
pub trait UserInterface {
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// Writes to standard output.
#[derive(Debug, Default)]
pub struct ConsoleUserInterface;

impl UserInterface for ConsoleUserInterface {
    fn write_line(&self, line: &str) -> io::Result<()> {
        writeln!(io::stdout(), "{line}")
    }
}

pub type SharedUserInterface = Rc<dyn UserInterface>;

/// Animals `create-animal` knows how to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Species {
    Dog,
    Cat,
    Hedgehog,
}

impl Species {
    fn introduce(self, name: &str) -> String {
        match self {
            Species::Dog => format!("I am a doggo 🐶 with the name {name}!"),
            Species::Cat => format!("I am a cat 😸 with the name {name}!"),
            Species::Hedgehog => format!("I am a hedgehog 🦔 with the name {name}!"),
        }
    }
}

/// Reads the single `--name` value.
#[derive(Debug, Default)]
pub struct NameParser;

impl ArgumentParser for NameParser {
    type Output = String;

    fn parse(&self, arguments: &CommandArguments<'_>) -> Result<String, CliError> {
        Ok(arguments.get(NAME_LABEL)?.expect_single_value()?.to_string())
    }
}

pub struct DogHandler {
    ui: SharedUserInterface,
}

impl LeafHandler<String> for DogHandler {
    fn handle(&self, name: String, _command: LeafRef<'_>) -> Result<(), CliError> {
        self.ui.write_line(&Species::Dog.introduce(&name))?;
        Ok(())
    }
}

pub struct CatHandler {
    ui: SharedUserInterface,
}

impl LeafHandler<String> for CatHandler {
    fn handle(&self, name: String, _command: LeafRef<'_>) -> Result<(), CliError> {
        self.ui.write_line(&Species::Cat.introduce(&name))?;
        Ok(())
    }
}

/// A parsed `create-animal` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalRequest {
    pub species: Species,
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Default)]
pub struct AnimalParser;

impl ArgumentParser for AnimalParser {
    type Output = AnimalRequest;

    fn parse(&self, arguments: &CommandArguments<'_>) -> Result<AnimalRequest, CliError> {
        let species = arguments.get(SPECIES_LABEL)?.expect_enum_value::<Species>()?;
        let name = arguments.get(NAME_LABEL)?.expect_single_value()?.to_string();

        let requested = match arguments.try_get(COUNT_LABEL) {
            Some(input) => input.expect_integer()?,
            None => 1,
        };
        let count = u32::try_from(requested)
            .ok()
            .filter(|count| *count > 0)
            .ok_or_else(|| {
                arguments.usage_error(format!(
                    "The option '{COUNT_LABEL}' expects a positive number but got '{requested}'."
                ))
            })?;

        Ok(AnimalRequest {
            species,
            name,
            count,
        })
    }
}

pub struct AnimalHandler {
    ui: SharedUserInterface,
}

impl LeafHandler<AnimalRequest> for AnimalHandler {
    fn handle(&self, request: AnimalRequest, _command: LeafRef<'_>) -> Result<(), CliError> {
        debug!(species = ?request.species, count = request.count, "Printing animals");
        let line = request.species.introduce(&request.name);
        for _ in 0..request.count {
            self.ui.write_line(&line)?;
        }
        Ok(())
    }
}

/// For leaves without options; grouping has already rejected any tokens.
#[derive(Debug, Default)]
pub struct NoArguments;

impl ArgumentParser for NoArguments {
    type Output = ();

    fn parse(&self, _arguments: &CommandArguments<'_>) -> Result<(), CliError> {
        Ok(())
    }
}

/// Prints a fish completion script for the tree the command belongs to.
pub struct FishCompletionHandler {
    ui: SharedUserInterface,
}

impl LeafHandler<()> for FishCompletionHandler {
    fn handle(&self, _arguments: (), command: LeafRef<'_>) -> Result<(), CliError> {
        let mut script = FishCompletionScript::new();
        script.add_command_tree(command.command().tree())?;
        self.ui.write_line(&script.generate())?;
        Ok(())
    }
}

/// Every parser and handler of the `af` tree, sharing `ui`.
pub fn registry(ui: SharedUserInterface) -> Registry {
    Registry::new()
        .with(move |_| Ok(Rc::clone(&ui)))
        .with(|_| Ok(NameParser))
        .with(|_| Ok(AnimalParser))
        .with(|_| Ok(NoArguments))
        .with(|registry| {
            Ok(DogHandler {
                ui: registry.resolve()?,
            })
        })
        .with(|registry| {
            Ok(CatHandler {
                ui: registry.resolve()?,
            })
        })
        .with(|registry| {
            Ok(AnimalHandler {
                ui: registry.resolve()?,
            })
        })
        .with(|registry| {
            Ok(FishCompletionHandler {
                ui: registry.resolve()?,
            })
        })
}

/// Builds the `af` tree, wiring each leaf from `registry`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if a service is missing or the tree is invalid.
pub fn command_tree(registry: &Registry) -> Result<CommandTree, ConfigError> {
    let create_dog = LeafCommand::new("create-dog")
        .with_description(["Prints out a dog."])
        .with_option(CommandOption::new(
            NAME_LABEL,
            ["Required. The name of the dog to print."],
        )?)
        .with_registered_action::<NameParser, DogHandler>(registry)?;

    let create_cat = LeafCommand::new("create-cat")
        .with_description(["Prints out a cat."])
        .with_option(CommandOption::new(
            NAME_LABEL,
            ["Required. The name of the cat to print."],
        )?)
        .with_registered_action::<NameParser, CatHandler>(registry)?;

    let create_animal = LeafCommand::new("create-animal")
        .with_description(["Prints out an animal of the given species."])
        .with_option(CommandOption::new(
            SPECIES_LABEL,
            ["Required. One of: dog, cat, hedgehog."],
        )?)
        .with_option(CommandOption::new(
            NAME_LABEL,
            ["Required. The name of the animal to print."],
        )?)
        .with_option(CommandOption::new(
            COUNT_LABEL,
            ["Optional. How many times to print the animal.", "Defaults to 1."],
        )?)
        .with_registered_action::<AnimalParser, AnimalHandler>(registry)?;

    let completion = BranchCommand::new("completion")
        .with_description(["Generates shell completion scripts."])
        .with_child(
            LeafCommand::new("fish")
                .with_description(["Prints a completion script for the fish shell."])
                .with_registered_action::<NoArguments, FishCompletionHandler>(registry)?,
        );

    CommandTree::new(
        BranchCommand::new("af")
            .with_description(["This program prints animals."])
            .with_child(create_dog)
            .with_child(create_cat)
            .with_child(create_animal)
            .with_child(completion),
    )
}
