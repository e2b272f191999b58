mod animals;
mod telemetry;

use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use command_tree_core::{ArgumentHandler, ArgumentHandlerSettings, ConfigError, HelpLayout};
use tracing::debug;

use crate::animals::{ConsoleUserInterface, SharedUserInterface};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");
const HELP_LAYOUT_ENV: &str = "ANIMAL_KINGDOM_HELP_LAYOUT";

fn main() -> ExitCode {
    let _telemetry = telemetry::init_tracing("warn");

    let tokens: Vec<String> = std::env::args().skip(1).collect();
    match build_handler() {
        Ok(handler) => handler.run(&tokens).into(),
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn build_handler() -> Result<ArgumentHandler, ConfigError> {
    let ui: SharedUserInterface = Rc::new(ConsoleUserInterface);
    let registry = animals::registry(ui);
    let tree = animals::command_tree(&registry)?;

    let mut settings = ArgumentHandlerSettings::new(tree)
        .with_name("Animal Kingdom")
        .with_version(PACKAGE_VERSION);
    if let Some(layout) = help_layout_from_env()? {
        settings = settings.with_layout(layout);
    }

    Ok(ArgumentHandler::new(settings))
}

fn help_layout_from_env() -> Result<Option<HelpLayout>, ConfigError> {
    let Some(path) = std::env::var_os(HELP_LAYOUT_ENV).map(PathBuf::from) else {
        return Ok(None);
    };
    debug!(path = %path.display(), "Loading help layout");
    HelpLayout::load(&path).map(Some)
}
