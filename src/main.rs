mod app;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod output;
mod source;
mod utils;

use clap::Parser;

use cli::Cli;
use config::{Config, Settings};
use utils::set_parse_debug;

fn main() {
    let cli = Cli::parse();

    // JSON output must stay clean, so load config quietly
    let config = if cli.json || cli.quiet {
        Config::load_quiet()
    } else {
        Config::load()
    };
    let cli = cli.with_config(&config);
    set_parse_debug(cli.debug);

    let result = Settings::resolve(&cli).and_then(|settings| app::run(&settings));
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
