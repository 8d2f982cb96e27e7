//! Feedback Lens: generates synthetic feedback traffic through the user
//! journey and renders the analytics and home views from the command line.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use lens_core::config::AppConfig;
use lens_core::{Analytics, UserRole};
use lens_journey::backend::{FeedbackBackend, InMemoryBackend};
use lens_journey::http::HttpBackend;
use lens_journey::{BatchPolicy, HeadlessApp, JourneyOrchestrator, Polarity};
use lens_sentiment::AnalyticsView;
use lens_session::{HomeView, UserClient};
use tracing::{info, warn};

/// Used when `RUST_LOG` is unset. Every workspace crate logs at `info`.
const DEFAULT_LOG_FILTER: &str =
    "feedback_lens=info,lens_core=info,lens_journey=info,lens_session=info,lens_sentiment=info";

#[derive(Parser, Debug)]
#[command(name = "feedback-lens")]
#[command(about = "Synthetic feedback journeys and analytics views")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides config)
    #[arg(long, global = true, env = "FEEDBACK_LENS__BACKEND_URL")]
    backend_url: Option<String>,

    /// Front-end base URL (overrides config)
    #[arg(long, global = true, env = "FEEDBACK_LENS__FRONTEND_URL")]
    frontend_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a batch of journeys, each submitting one catalogue sample
    Generate {
        /// positive, negative or mixed
        #[arg(short, long)]
        polarity: Polarity,

        /// Number of journeys (defaults to the whole catalogue for the polarity)
        #[arg(short, long)]
        count: Option<usize>,

        /// Stop the batch at the first failed journey
        #[arg(long, default_value_t = false)]
        abort_on_failure: bool,

        /// Use an in-memory backend instead of the live one
        #[arg(long, default_value_t = false)]
        simulate: bool,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Render the analytics panel for a payload file
    Analytics {
        /// Path to an analytics JSON payload
        #[arg(short, long)]
        file: PathBuf,

        /// Viewer role; resolved from --token when omitted
        #[arg(long)]
        role: Option<UserRole>,

        /// Bearer token used to look up the viewer's role
        #[arg(long, env = "FEEDBACK_LENS_TOKEN")]
        token: Option<String>,
    },

    /// Show the home view for a session token
    Whoami {
        #[arg(long, env = "FEEDBACK_LENS_TOKEN")]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(url) = cli.backend_url {
        config.backend_url = url;
    }
    if let Some(url) = cli.frontend_url {
        config.frontend_url = url;
    }

    match cli.command {
        Commands::Generate {
            polarity,
            count,
            abort_on_failure,
            simulate,
            json,
        } => {
            let policy = if abort_on_failure {
                BatchPolicy::AbortOnFailure
            } else {
                BatchPolicy::ContinueOnFailure
            };
            generate(&config, polarity, count, policy, simulate, json).await
        }
        Commands::Analytics { file, role, token } => {
            analytics(&config, &file, role, token.as_deref()).await
        }
        Commands::Whoami { token } => {
            let client = UserClient::from_config(&config)?;
            let home = HomeView::load(&client, token.as_deref()).await;
            print!("{}", home.render_text());
            if home.role().is_none() {
                bail!("no user session");
            }
            Ok(())
        }
    }
}

async fn generate(
    config: &AppConfig,
    polarity: Polarity,
    count: Option<usize>,
    policy: BatchPolicy,
    simulate: bool,
    json: bool,
) -> anyhow::Result<()> {
    let backend: Arc<dyn FeedbackBackend> = if simulate {
        Arc::new(InMemoryBackend::new())
    } else {
        Arc::new(HttpBackend::from_config(config)?)
    };
    info!(
        backend_url = %config.backend_url,
        frontend_url = %config.frontend_url,
        simulate,
        "Feedback Lens generating journeys"
    );

    let app = HeadlessApp::new(backend, config.frontend_url.clone());
    let mut orchestrator = JourneyOrchestrator::new(app, &config.journey);
    let count = count.unwrap_or_else(|| orchestrator.catalogue().len(polarity));

    let report = orchestrator.run_batch(polarity, count, policy).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }

    if !report.all_passed() {
        bail!("{} of {} journeys failed", report.failed, report.requested);
    }
    Ok(())
}

async fn analytics(
    config: &AppConfig,
    file: &Path,
    role: Option<UserRole>,
    token: Option<&str>,
) -> anyhow::Result<()> {
    let payload = Analytics::load(file)
        .with_context(|| format!("loading analytics payload from {}", file.display()))?;

    let role = match role {
        Some(role) => Some(role),
        None => {
            let client = UserClient::from_config(config)?;
            HomeView::load(&client, token).await.role()
        }
    };

    match AnalyticsView::build(role, Some(&payload)) {
        Some(view) => {
            print!("{}", view.render_text());
            Ok(())
        }
        None => bail!("analytics are only visible to admins"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_default_filter_covers_library_crates() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        let directives: Vec<&str> = DEFAULT_LOG_FILTER.split(',').collect();
        for target in ["lens_session=info", "lens_sentiment=info", "lens_journey=info"] {
            assert!(directives.contains(&target), "missing {target}");
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
        let cli = Cli::try_parse_from([
            "feedback-lens",
            "--backend-url",
            "http://host/api",
            "generate",
            "--polarity",
            "negative",
            "--simulate",
        ])
        .unwrap();
        assert_eq!(cli.backend_url.as_deref(), Some("http://host/api"));
        assert!(matches!(
            cli.command,
            Commands::Generate {
                polarity: Polarity::Negative,
                simulate: true,
                count: None,
                ..
            }
        ));
    }
}
