mod cli;
mod error;
mod fmt;
mod logging;
mod mapper;
mod models;
mod normalizer;
mod pipeline;
mod settings;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init { output_dir } => cli::init::run(output_dir),
        Commands::Status => cli::status::run(),
        Commands::Convert { files, output_dir } => cli::convert::run(&files, output_dir),
        Commands::Preview { files, limit } => cli::preview::run(&files, limit),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
