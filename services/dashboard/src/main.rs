//! `atlas`: terminal dashboard for zone production statistics.
//!
//! Logs in against the backend API, then browses administrative zones and
//! their statistics from the map API:
//! - one-shot commands (`zones`, `search`, `report`)
//! - an interactive drill-down browser (`browse`)

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use atlas_common::{
    AtlasError, DivisionLevel, EvolutionSelection, LoginRequest, OtpRequest, RegisterRequest,
    SectorFamily, Theme, ZoneId,
};
use clap::{Parser, Subcommand, ValueEnum};
use dashboard::report;
use dashboard::{App, AtlasConfig, Overrides, Route};
use tracing::{info, Level};
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "atlas")]
#[command(about = "Browse production statistics of administrative zones", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (YAML)
    #[arg(long, global = true, env = "ATLAS_CONFIG")]
    config: Option<PathBuf>,

    /// Backend (authentication) API base URL
    #[arg(long, global = true, env = "API_URL")]
    api_url: Option<String>,

    /// Map API base URL
    #[arg(long, global = true, env = "MAP_API_URL")]
    map_api_url: Option<String>,

    /// Session file
    #[arg(long, global = true, env = "ATLAS_SESSION")]
    session: Option<PathBuf>,

    /// Colour theme: light or dark
    #[arg(long, global = true)]
    theme: Option<Theme>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "ATLAS_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account; a verification code is sent by e-mail
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "ATLAS_PASSWORD", hide_env_values = true)]
        password: String,

        /// Password confirmation
        #[arg(long)]
        confirm: String,
    },

    /// Confirm a registration with the e-mailed code
    VerifyOtp {
        #[arg(short, long)]
        email: String,

        #[arg(long)]
        otp: String,
    },

    /// Show the logged-in user
    Whoami,

    /// Forget the stored session
    Logout,

    /// List the zones of one level
    Zones {
        /// REGION, DEPARTEMENT or ARRONDISSEMENT
        #[arg(short, long, default_value = "REGION")]
        level: DivisionLevel,

        /// Parent zone id
        #[arg(long)]
        parent: Option<ZoneId>,
    },

    /// Search zones by name
    Search { query: String },

    /// Full statistics report of a zone
    Report {
        zone_id: ZoneId,

        /// Evolution tab: agriculture, elevage or peche
        #[arg(short = 'c', long)]
        category: Option<SectorFamily>,
    },

    /// Interactive drill-down dashboard
    Browse,
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Surface the server's message as is.
fn user_error(err: AtlasError) -> anyhow::Error {
    anyhow!(err.user_message())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json)?;

    let overrides = Overrides {
        backend_url: cli.api_url.clone(),
        map_url: cli.map_api_url.clone(),
        session_file: cli.session.clone(),
        theme: cli.theme,
    };
    let config = AtlasConfig::load(cli.config.as_deref(), overrides)?;
    let app = App::new(config)?;
    let json = cli.output == OutputFormat::Json;

    match cli.command {
        Commands::Login { email, password } => {
            app.enter(Route::Auth).await?;
            let auth = app
                .auth_api
                .login(&LoginRequest { email, password })
                .await
                .map_err(user_error)?;
            let session = app.sessions.save(&auth)?;
            println!("Connecté en tant que {}", session.user.display_name());
        }
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            confirm,
        } => {
            app.enter(Route::Auth).await?;
            let request = RegisterRequest {
                first_name,
                last_name,
                email,
                password,
            };
            let response = app
                .auth_api
                .register(&request, &confirm)
                .await
                .map_err(user_error)?;
            if let Some(message) = response.message {
                println!("{}", message);
            }
            println!(
                "Saisissez le code reçu avec : atlas verify-otp --email {} --otp <code>",
                request.email
            );
        }
        Commands::VerifyOtp { email, otp } => {
            app.enter(Route::Auth).await?;
            let auth = app
                .auth_api
                .verify_otp(&OtpRequest { email, otp })
                .await
                .map_err(user_error)?;
            let session = app.sessions.save(&auth)?;
            println!("Compte vérifié, connecté en tant que {}", session.user.display_name());
        }
        Commands::Whoami => {
            let session = app.enter(Route::Protected).await?;
            if let Some(session) = session {
                if json {
                    println!("{}", report::format_json(&session.user)?);
                } else {
                    println!("{}", report::format_user(&session.user, session.expires_at));
                }
            }
        }
        Commands::Logout => {
            app.sessions.clear()?;
            info!("Session cleared");
            println!("Déconnecté");
        }
        Commands::Zones { level, parent } => {
            app.enter(Route::Protected).await?;
            let zones = app.map_api.zones(level, parent).await.map_err(user_error)?;
            if json {
                println!("{}", report::format_json(&zones)?);
            } else {
                println!("{}", report::format_zones(&zones));
            }
        }
        Commands::Search { query } => {
            app.enter(Route::Protected).await?;
            let results = app.map_api.search(&query).await.map_err(user_error)?;
            if json {
                println!("{}", report::format_json(&results)?);
            } else {
                println!("{}", report::format_search(&results));
            }
        }
        Commands::Report { zone_id, category } => {
            app.enter(Route::Protected).await?;
            let (full, details) =
                tokio::join!(app.map_api.report(zone_id), app.map_api.zone_details(zone_id));
            let full = full.unwrap_or_default();
            let details = details.unwrap_or_default();
            if json {
                println!(
                    "{}",
                    report::format_json(&serde_json::json!({
                        "report": full,
                        "details": details,
                    }))?
                );
            } else {
                let title = format!("Zone {}", zone_id);
                let selection = full.evolution.as_ref().map(|evolution| match category {
                    Some(family) => EvolutionSelection::for_family(evolution, family),
                    None => EvolutionSelection::first_tab(evolution),
                });
                println!("{}", report::format_report(&title, &full, selection.as_ref()));
                println!("{}", report::format_zone_stats("Détails de production", &details));
            }
        }
        Commands::Browse => {
            app.enter(Route::Protected).await?;
            let mut browser = app.browser();
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            browser.run(input, std::io::stdout()).await?;
        }
    }

    Ok(())
}
