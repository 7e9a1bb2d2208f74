//! resttest - readable reports for pyresttest runs
//!
//! With no arguments an interactive menu is opened; flags run tests directly.

use clap::Parser;
use resttest::cli::App;
use resttest::commands::Cli;
use resttest::common::config::Config;
use resttest::common::logging;
use resttest::common::paths::LogLayout;
use resttest::runner::{Orchestrator, PyRestTest};

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    let result = match cli.validate() {
        Ok(()) => run(&cli).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> resttest::Result<()> {
    let config = Config::load()?;
    let layout = LogLayout::new(config.logs.dir.clone());
    let source = PyRestTest::new(config.runner.clone());

    let orchestrator = Orchestrator::new(source, config, layout);
    let mut app = App::new(orchestrator, std::io::BufReader::new(std::io::stdin()));
    app.run(cli.argument_run()).await
}
