// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use axum::Router;
use clap::Parser;
use fiscal_rollover_domain::{CalendarDate, DateFormat};
use fiscal_rollover_persistence::{CompanyRecord, NewCompany, Persistence};
use fiscal_rollover_server::{AppState, DEFAULT_KEEP_ALIVE, build_router};
use std::time::Duration;
use tracing::{info, warn};

/// Fiscal Rollover Server - HTTP server for fiscal year rollovers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Seconds between keep-alive comments on progress streams
    #[arg(long, default_value_t = DEFAULT_KEEP_ALIVE.as_secs())]
    keep_alive_secs: u64,

    /// Name of the company to create when the database has none
    #[arg(long)]
    company_name: Option<String>,

    /// Calendar of the bootstrapped company (`nepali` or `english`)
    #[arg(long, default_value = "english")]
    date_format: String,

    /// First day of the bootstrapped company's first fiscal year
    #[arg(long, requires = "company_name")]
    fiscal_year_start: Option<String>,

    /// Last day of the bootstrapped company's first fiscal year
    #[arg(long, requires = "company_name")]
    fiscal_year_end: Option<String>,
}

/// Creates the company from the command line when the database has none.
fn bootstrap(
    persistence: &mut Persistence,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(name) = &args.company_name else {
        return Ok(());
    };
    if let Some(existing) = persistence.primary_company()? {
        warn!(
            company = %existing.name,
            requested = %name,
            "Database already has a company; skipping bootstrap"
        );
        return Ok(());
    }

    let date_format: DateFormat = args.date_format.parse()?;
    let (Some(start), Some(end)) = (&args.fiscal_year_start, &args.fiscal_year_end) else {
        return Err("--fiscal-year-start and --fiscal-year-end are required to bootstrap".into());
    };

    let company: CompanyRecord = persistence.bootstrap_company(&NewCompany {
        name: name.clone(),
        first_fiscal_year_start: CalendarDate::parse(date_format, start)?,
        first_fiscal_year_end: CalendarDate::parse(date_format, end)?,
    })?;
    info!(
        company_id = company.company_id,
        company = %company.name,
        date_format = %company.date_format,
        "Bootstrapped company"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Fiscal Rollover Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    bootstrap(&mut persistence, &args)?;

    let app_state: AppState =
        AppState::new(persistence, Duration::from_secs(args.keep_alive_secs));

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
