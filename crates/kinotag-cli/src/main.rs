//! Kinotag binary entry point.

mod app;
mod cli;
mod config;
mod loader;

use clap::Parser;

use crate::app::App;
use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let app = App::from_args(&args)?;
    app.init_logging(args.verbose, args.quiet);
    app.run(args.command).await
}
