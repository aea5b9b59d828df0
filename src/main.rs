use clap::Parser;
use pydeploy::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    let default_filter = if verbose {
        "pydeploy=debug"
    } else {
        "pydeploy=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();

    if let Err(err) = cli::run(cli) {
        if verbose {
            eprintln!("error: {err:?}");
        } else {
            eprintln!("error: {err:#}");
        }
        std::process::exit(1);
    }
}
