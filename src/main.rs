use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use ideacheck::cli::{self, Cli, EXIT_HARNESS_ERROR, OutputFormat};
use ideacheck::{run_suite, storage};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list {
        println!("{}", cli::render_plan(cli.extended));
        return ExitCode::SUCCESS;
    }

    let config = match cli.harness_config() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            return ExitCode::from(EXIT_HARNESS_ERROR);
        }
    };

    let report = match run_suite(&config).await {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "suite aborted before any step ran");
            return ExitCode::from(EXIT_HARNESS_ERROR);
        }
    };

    match cli.format {
        OutputFormat::Text => println!("{}", storage::render_text(&report)),
        OutputFormat::Json => match storage::render_json(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                error!(error = %err, "failed to render report");
                return ExitCode::from(EXIT_HARNESS_ERROR);
            }
        },
    }

    if let Some(path) = &cli.report
        && let Err(err) = storage::save_report(path, &report)
    {
        error!(error = %err, "failed to write report file");
        return ExitCode::from(EXIT_HARNESS_ERROR);
    }

    ExitCode::from(cli::exit_status(&report))
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "ideacheck=debug,warn" } else { "ideacheck=info,warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
