//! # artline Main Entry Point
//!
//! Command prompt browser for a remote art-collection catalog.

use anyhow::Result;
use artline::{cmd_args::CommandLineArgs, config::LOG_LEVEL_ENV_VAR, AppController};
use tracing_subscriber::{fmt::time::ChronoLocal, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cmd_args = CommandLineArgs::parse();
    init_tracing_subscriber(cmd_args.verbose())?;

    tracing::debug!("Command line arguments: {:?}", cmd_args);

    let mut app = AppController::new(&cmd_args)?;

    if cmd_args.once() {
        return app.run_once().await;
    }

    println!("Virtual Art Gallery. Type 'help' for commands.");
    app.run().await
}

/// Log to stderr so results on stdout stay clean.
/// `ARTLINE_LOG_LEVEL` wins over `--verbose`.
fn init_tracing_subscriber(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level))
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("hyper_util=warn".parse()?)
        .add_directive("tokio=warn".parse()?)
        .add_directive("tracing=warn".parse()?)
        .add_directive("tracing_subscriber=warn".parse()?)
        .add_directive("tokio_rustls=warn".parse()?)
        .add_directive("rustls=warn".parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    Ok(())
}
