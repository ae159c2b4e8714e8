use clap::Parser;
use color_eyre::eyre::{Report, eyre};
use env_logger::{Builder, Env};
use snipman::cli::{self, Cli};

fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

/// Carries an anyhow error into the color_eyre report, context chain included.
fn report(err: anyhow::Error) -> Report {
    eyre!("{err:#}")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_logger();

    let cli = Cli::parse();
    let outcome = cli::execute_cli(cli).map_err(report)?;
    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
