mod commands;
mod exit_code;
mod terminal;

use std::io::Write;
use std::process::ExitCode;

use commands::{CommandLine, Commands, config, schema};
use terminal::logging;
use winsvc_common::config::Config;
use winsvc_common::localization::Catalog;

fn main() -> ExitCode {
    let commands = CommandLine::parse_args();
    let cfg = Config::from_env();

    if let Err(err) = logging::init(&cfg) {
        let _ = writeln!(std::io::stderr(), "{err:#}");
    }

    let catalog = Catalog::for_locale(&cfg.locale);
    match run(commands, &catalog) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(exit_code::report(&err, &catalog)),
    }
}

fn run(commands: CommandLine, catalog: &Catalog) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();

    match commands.command {
        Commands::Config { action } => {
            let directory = winsvc_core::directory::local();
            config::run(action, directory.as_ref(), catalog, &mut stdout)
        }
        Commands::Schema => schema::schema(&mut stdout),
    }
}
