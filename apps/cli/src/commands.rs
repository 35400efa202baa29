//! CLI definition, tracing setup, and run dispatch.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use url::Url;

use minutegen_shared::{Params, load_params_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// minutegen — render meeting-minutes index and resolutions pages.
#[derive(Parser)]
#[command(
    name = "minutegen",
    version,
    about = "Harvest a working group's published minutes and render its index and resolutions pages.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to the TOML parameter file.
    #[arg(env = "MINUTEGEN_CONFIG", default_value = "minutegen.toml")]
    pub config: PathBuf,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "minutegen=info",
        1 => "minutegen=debug",
        _ => "minutegen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Load parameters and run the full generation pipeline.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let params = load_params_from(&cli.config)?;
    validate_endpoints(&params)?;

    info!(
        config = %cli.config.display(),
        scope = %params.scope,
        "generating minutes pages"
    );

    let report = minutegen_core::run(&params).await?;

    println!();
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => println!("  {:<12} written to {}", outcome.kind.name(), outcome.output),
            Err(e) => println!("  {:<12} FAILED: {e}", outcome.kind.name()),
        }
    }
    println!();

    let failed = report.failed();
    if failed > 0 {
        return Err(eyre!("{failed} of {} targets failed", report.outcomes.len()));
    }
    Ok(())
}

/// Check that the configured URL templates resolve to parseable URLs, so
/// typos fail before any network work starts.
fn validate_endpoints(params: &Params) -> Result<()> {
    let listing = params.listing_url.replace("{scope}", &params.scope);
    Url::parse(&listing).map_err(|e| eyre!("invalid listing_url '{listing}': {e}"))?;

    let content = params
        .content_url
        .replace("{scope}", &params.scope)
        .replace("{path}", "minutes/index.html");
    Url::parse(&content).map_err(|e| eyre!("invalid content_url '{content}': {e}"))?;

    Ok(())
}
