//! ig-archive - CLI entry point.

use std::fs::OpenOptions;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ig_archive::{
    api::GraphApi,
    archive::{install_interrupt_handler, run_doctor, ArchiveSettings, Archiver},
    cli::{Args, Command, ExchangeArgs},
    config::{validate_config, Config, RunMode},
    error::{exit_codes, Error, Result},
    output::{
        print_banner, print_error, print_info, print_run_header, print_run_summary,
        print_success, print_warning,
    },
    state::JsonStateStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            tracing::error!("{}", e);
            ExitCode::from(exit_code_for(&e) as u8)
        }
    }
}

fn exit_code_for(error: &Error) -> i32 {
    match error {
        Error::Config(_)
        | Error::ConfigValidation { .. }
        | Error::MissingConfig(_)
        | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
        Error::Authentication(_) => exit_codes::AUTH_ERROR,
        Error::Transient { .. }
        | Error::HttpStatus { .. }
        | Error::Api(_)
        | Error::Download(_)
        | Error::Http(_)
        | Error::Io(_) => exit_codes::RUN_ERROR,
        _ => exit_codes::UNEXPECTED_ERROR,
    }
}

/// Console layer always; plain-text file layer when `log_file` is given.
fn init_logging(debug: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(())
}

async fn run() -> Result<i32> {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        Config::default()
    };
    args.merge_into_config(&mut config);

    if let Command::ExchangeToken(exchange) = &args.command {
        init_logging(args.debug, None).map_err(|e| Error::Config(format!("{:#}", e)))?;
        return exchange_token(&config, exchange).await;
    }

    let log_file = config.log_file();
    init_logging(args.debug, Some(&log_file)).map_err(|e| Error::Config(format!("{:#}", e)))?;

    if !config_path.exists() {
        tracing::debug!(
            "No configuration file at {}; using flags and environment",
            config_path.display()
        );
    }

    validate_config(&config)?;
    let api = GraphApi::new(&config)?;

    let Some(mode) = args.run_mode() else {
        let identity = run_doctor(&api, &config).await?;
        print_success(&format!(
            "All checks passed for @{}",
            identity.username.as_deref().unwrap_or(&identity.id)
        ));
        return Ok(exit_codes::SUCCESS);
    };

    archive(&api, &config, mode).await
}

async fn archive(api: &GraphApi, config: &Config, mode: RunMode) -> Result<i32> {
    print_banner();
    print_run_header(
        &config.account.user_id,
        mode,
        &config.archive.output_dir,
        config.archive.max_pages,
    );

    let interrupt = install_interrupt_handler();
    let store = JsonStateStore::in_dir(&config.archive.output_dir);
    let archiver =
        Archiver::new(api, store, ArchiveSettings::from_config(config)).with_interrupt(interrupt);

    let summary = archiver.run(mode).await?;
    print_run_summary(&summary);

    if summary.interrupted {
        print_warning("Interrupted; progress saved. Re-run to continue.");
        return Ok(exit_codes::INTERRUPTED);
    }

    if summary.items_partial > 0 && mode != RunMode::Repair {
        print_info("Some items are missing files; `ig-archive repair` retries them.");
    }

    if summary.has_failures() {
        print_warning("Run finished with failures; see the log for details.");
    } else {
        print_success("Run complete.");
    }

    Ok(exit_codes::SUCCESS)
}

async fn exchange_token(config: &Config, exchange: &ExchangeArgs) -> Result<i32> {
    let api = GraphApi::new(config)?;
    let token = api
        .exchange_token(&exchange.short_token, &exchange.app_id, &exchange.app_secret)
        .await?;

    // The token goes to stdout only, never through tracing.
    println!("{}", token.access_token);
    if let Some(expires_in) = token.expires_in {
        eprintln!("Expires in {} days.", expires_in / 86_400);
    }

    Ok(exit_codes::SUCCESS)
}
