// CLI binary entry point for tagsweep
//
// This is the main entry point for the tagsweep command-line tool.

mod cli;

use std::process;

use clap::Parser;
use log::LevelFilter;

use cli::{commands, Commands, Config, OutputFormatter};

fn main() {
    let config = Config::parse();
    init_logging(&config);

    let formatter = OutputFormatter::new(config.format.into(), config.quiet);

    let result = match &config.command {
        Commands::Show { files, raw, encoding } => {
            commands::command_show(files, *raw, encoding, &formatter)
        }
        Commands::Tag { file, fields, write } => {
            commands::command_tag(file, fields, write, &formatter)
        }
        Commands::TagAlbum { directories, write } => {
            commands::command_tag_album(directories, write, &formatter)
        }
    };

    if let Err(e) = result {
        formatter.print_error(&format!("{:#}", e));
        process::exit(1);
    }
}

fn init_logging(config: &Config) {
    let level = match (config.quiet, config.verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}
