mod app;
mod commands;

use app::{App, Commands, LogLevel};
use clap::Parser;
use pkgsource::{LoaderConfig, LoaderFactory};
use std::env;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

// The bin target is named `pkgsource`, so its events share the library's target prefix.
fn create_log_directives(level: Option<&LogLevel>) -> String {
    format!("off,pkgsource={}", level.unwrap_or(&LogLevel::Warn))
}

fn setup_tracing(level: Option<&LogLevel>) {
    tracing_subscriber::registry()
        .with(EnvFilter::new(create_log_directives(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = App::parse();

    setup_tracing(cli.log.as_ref());

    debug!(
        args = ?env::args().collect::<Vec<_>>(),
        "Running pkgsource v{}",
        env!("CARGO_PKG_VERSION")
    );

    let factory = LoaderFactory::new(&LoaderConfig::from_env())?;

    match cli.command {
        Commands::Cat(args) => commands::cat(&factory, args).await,
        Commands::Commit(args) => commands::commit(&factory, args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_on_crate_target() {
        assert_eq!(create_log_directives(None), "off,pkgsource=warn");
        assert_eq!(
            create_log_directives(Some(&LogLevel::Trace)),
            "off,pkgsource=trace"
        );
    }
}
