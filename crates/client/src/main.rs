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

use clap::{Parser, Subcommand};
use fiscal_rollover::{Command, ControllerState, CoreError};
use fiscal_rollover_api::SwitchCurrentResponse;
use fiscal_rollover_client::{
    ClientError, Directory, EXIT_CLIENT_ERROR, EXIT_COMPLETED, EXIT_FAILED, EXIT_INVALID,
    HttpDirectory, HttpProgressChannel, RolloverSession, SessionOutcome, StopHandle,
    new_request_id,
};
use fiscal_rollover_domain::{CalendarDate, DirectoryListing, DomainError, TransitionInfo};
use std::io::{BufRead, Write};
use std::process::ExitCode;
use tracing::{error, info};

/// Fiscal Rollover CLI - drive fiscal year rollovers from a terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the rollover server
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    server: String,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Show the current fiscal year and the next start date
    Info,
    /// List every fiscal year of the company
    List,
    /// Make another fiscal year current
    Switch {
        /// Id of the fiscal year to make current
        fiscal_year_id: i64,
    },
    /// Roll the company over into a new fiscal year
    Rollover {
        /// Last day of the new fiscal year; defaults to one year after the start
        #[arg(long)]
        end_date: Option<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Idempotency key; reuse one to safely repeat an interrupted rollover
        #[arg(long)]
        request_id: Option<String>,
    },
}

type HttpSession = RolloverSession<HttpProgressChannel, HttpDirectory>;

fn report_error(err: &ClientError) -> u8 {
    error!(error = %err, "Command failed");
    eprintln!("error: {err}");
    EXIT_CLIENT_ERROR
}

async fn show_info(directory: &HttpDirectory) -> Result<(), ClientError> {
    let info: TransitionInfo = directory.transition_info().await?;
    let current = &info.current_fiscal_year;
    println!("Company:             {}", info.current_company_name);
    println!("Calendar:            {}", info.company_date_format);
    println!(
        "Current fiscal year: {} ({} to {})",
        current.name, current.start_date, current.end_date
    );
    println!("Next year starts:    {}", info.next_fiscal_year_start_date);
    Ok(())
}

async fn show_list(directory: &HttpDirectory) -> Result<(), ClientError> {
    let listing: DirectoryListing = directory.list().await?;
    println!("{}", listing.current_company_name);
    for fiscal_year in &listing.fiscal_years {
        let marker: &str = if fiscal_year.is_current { "*" } else { " " };
        println!(
            "{marker} {:>4}  {:<8} {} to {}",
            fiscal_year.id, fiscal_year.name, fiscal_year.start_date, fiscal_year.end_date
        );
    }
    Ok(())
}

async fn switch(directory: &HttpDirectory, fiscal_year_id: i64) -> Result<u8, ClientError> {
    let response: SwitchCurrentResponse = directory.switch_current(fiscal_year_id).await?;
    if response.success {
        let name: &str = response.fiscal_year.as_ref().map_or("?", |fy| fy.name.as_str());
        println!("Fiscal year {name} is now current");
        Ok(EXIT_COMPLETED)
    } else {
        eprintln!(
            "Switch failed: {}",
            response.error.as_deref().unwrap_or("unknown error")
        );
        Ok(EXIT_FAILED)
    }
}

fn print_new_lines(state: &ControllerState, printed: &mut usize) {
    for entry in state.log.iter().skip(*printed) {
        println!("  {}", entry.message);
    }
    *printed = state.log.len();
}

fn print_steps(state: &ControllerState) {
    for step in &state.step_indicator().steps {
        let mark: &str = if step.reached { "x" } else { " " };
        println!("  [{mark}] {}. {}", step.number, step.label);
    }
}

fn confirm_prompt() -> bool {
    print!("Proceed? [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer: String = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn invalid(err: &DomainError) -> u8 {
    eprintln!("invalid request: {err}");
    EXIT_INVALID
}

/// Loads the transition info and submits the end date.
async fn prepare(
    session: &mut HttpSession,
    directory: &HttpDirectory,
    end_date: Option<String>,
    request_id: String,
) -> Result<TransitionInfo, u8> {
    let info: TransitionInfo = directory
        .transition_info()
        .await
        .map_err(|err| report_error(&err))?;
    let start: CalendarDate = info
        .next_start()
        .map_err(|err| report_error(&err.into()))?;
    let end: CalendarDate = match end_date {
        Some(value) => CalendarDate::parse(info.company_date_format, &value),
        None => start.default_fiscal_end(),
    }
    .map_err(|err| invalid(&err))?;

    session
        .dispatch(Command::Prepare {
            date_format: info.company_date_format,
            start_date: start,
        })
        .await
        .map_err(|err| report_error(&err.into()))?;

    session
        .dispatch(Command::Submit {
            end_date: end,
            request_id: Some(request_id),
        })
        .await
        .map_err(|err| match err {
            CoreError::Validation(domain) => invalid(&domain),
            other => report_error(&other.into()),
        })?;

    Ok(info)
}

async fn rollover(
    client: reqwest::Client,
    server: &str,
    end_date: Option<String>,
    yes: bool,
    request_id: Option<String>,
) -> u8 {
    let directory: HttpDirectory = HttpDirectory::new(client.clone(), server);
    let channel: HttpProgressChannel = HttpProgressChannel::new(client, server);
    let mut session: HttpSession = RolloverSession::new(channel, directory.clone());
    let request_id: String = request_id.unwrap_or_else(new_request_id);

    let info: TransitionInfo =
        match prepare(&mut session, &directory, end_date, request_id.clone()).await {
            Ok(info) => info,
            Err(code) => return code,
        };

    if let Some(request) = &session.state().request {
        println!(
            "Roll {} over from fiscal year {} into {} to {}",
            info.current_company_name,
            info.current_fiscal_year.name,
            request.start_date(),
            request
                .resolved_end_date()
                .map_or_else(|_| String::from("?"), |end| end.to_string())
        );
    }
    println!("Request id: {request_id}");

    if !yes && !confirm_prompt() {
        if let Err(err) = session.dispatch(Command::Cancel).await {
            return report_error(&err.into());
        }
        println!("Cancelled");
        return EXIT_COMPLETED;
    }

    let stop: StopHandle = session.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.stop();
        }
    });

    if let Err(err) = session.dispatch(Command::Confirm).await {
        return report_error(&err.into());
    }
    info!(request_id = %request_id, "Rollover started");

    let mut printed: usize = 0;
    print_new_lines(session.state(), &mut printed);
    let outcome: Option<SessionOutcome> = match session
        .run_until_settled(|state| print_new_lines(state, &mut printed))
        .await
    {
        Ok(outcome) => outcome,
        Err(err) => return report_error(&err.into()),
    };
    print_steps(session.state());

    match outcome {
        Some(outcome) => {
            match &outcome {
                SessionOutcome::Completed => {
                    let current: Option<&str> = session
                        .listing()
                        .and_then(DirectoryListing::current)
                        .map(|fy| fy.name.as_str());
                    println!(
                        "Rollover complete; current fiscal year: {}",
                        current.unwrap_or("?")
                    );
                }
                SessionOutcome::Failed(message) => eprintln!("Rollover failed: {message}"),
                SessionOutcome::Unknown(message) => {
                    eprintln!("{message}");
                    eprintln!("Re-run with --request-id {request_id} to retry safely.");
                }
            }
            outcome.exit_code()
        }
        None => EXIT_CLIENT_ERROR,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let client: reqwest::Client = reqwest::Client::new();
    let directory: HttpDirectory = HttpDirectory::new(client.clone(), &args.server);

    let code: u8 = match args.command {
        CliCommand::Info => show_info(&directory)
            .await
            .map_or_else(|err| report_error(&err), |()| EXIT_COMPLETED),
        CliCommand::List => show_list(&directory)
            .await
            .map_or_else(|err| report_error(&err), |()| EXIT_COMPLETED),
        CliCommand::Switch { fiscal_year_id } => switch(&directory, fiscal_year_id)
            .await
            .unwrap_or_else(|err| report_error(&err)),
        CliCommand::Rollover {
            end_date,
            yes,
            request_id,
        } => rollover(client, &args.server, end_date, yes, request_id).await,
    };

    ExitCode::from(code)
}
