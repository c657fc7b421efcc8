use clap::Parser;
use ctest_dashboard::cli::commands::cmd_render;
use ctest_dashboard::cli::config::{Cli, load_config, resolve_options};
use ctest_dashboard::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    // Resolve settings: CLI > config > defaults
    let config = load_config(cli.config.as_deref())?;
    let options = resolve_options(&cli, &config);

    let (_collection, stdout) = cmd_render(&options)?;
    print!("{}", stdout);

    Ok(())
}
