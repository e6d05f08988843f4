mod cli;
mod logging;

use std::io;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use legacy_date::{Date, Demo, read_date};
use tracing::info;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let zone = cli.zone;
    let today = match &cli.today {
        Some(input) => {
            read_date(input, zone).with_context(|| format!("reading --today {input:?}"))?
        }
        None => Date::now_in(zone),
    };
    let fcs = read_date(&cli.fcs, zone).with_context(|| format!("reading --fcs {:?}", cli.fcs))?;
    info!(%zone, %today, %fcs, "starting countdown");

    let demo = Demo::new(today, fcs, zone);
    demo.write_to(&mut io::stdout().lock())
        .context("writing report")?;
    Ok(())
}
