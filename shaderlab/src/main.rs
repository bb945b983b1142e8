use clap::Parser;
use shaderlab::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    shaderlab::init_logger(cli.verbose);

    log::debug!("start...");
    shaderlab::run(cli)?;
    log::debug!("exit...");

    Ok(())
}
