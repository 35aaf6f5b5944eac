//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` defaults and parses CLI arguments
//! - builds the HTTP client
//! - runs the table / statistics / calculator workflows
//! - prints reports and charts
//! - writes optional exports

use std::time::Duration;

use clap::Parser;
use log::info;

use crate::cli::{ApiArgs, CalcArgs, Command, PlotArgs, StatsArgs, TableArgs};
use crate::data::{HttpFetcher, ItemSource};
use crate::error::AppError;
use crate::report::FlatTableEngine;

pub mod pipeline;

use pipeline::{ApiQuery, RunKind};

/// Entry point for the `lend` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Table(args) => handle_table(args)
            .map_err(|e| AppError::new(e.exit_code(), pipeline::failure_status(RunKind::Table, &e))),
        Command::Stats(args) => handle_stats(args)
            .map_err(|e| AppError::new(e.exit_code(), pipeline::failure_status(RunKind::Statistics, &e))),
        Command::Calc(args) => handle_calc(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn item_source(api: &ApiArgs) -> Result<ItemSource<HttpFetcher>, AppError> {
    let fetcher = HttpFetcher::new(Duration::from_secs(api.timeout_secs.max(1)))?;
    Ok(ItemSource::new(fetcher))
}

fn handle_table(args: TableArgs) -> Result<(), AppError> {
    let source = item_source(&args.api)?;

    let file = if args.pick {
        Some(crate::cli::picker::prompt_for_json_path()?)
    } else {
        args.file.clone()
    };

    let run = match file {
        Some(path) => {
            info!("Loading offers from {}", path.display());
            pipeline::run_table_from_file(&source, &FlatTableEngine, &path, &args.aliases)?
        }
        None => {
            let params = args.api_params();
            let query = ApiQuery {
                base_url: &args.api.api_url,
                params: &params,
                status: args.status.as_deref(),
                ignore_tls: args.api.ignore_tls,
            };
            pipeline::run_table_from_api(&source, &FlatTableEngine, query, &args.aliases)?
        }
    };

    print!("{}", crate::report::format_table_report(&run.report));
    if let Some(note) = &run.fetch_note {
        println!("{note}");
    }
    println!("{}", run.status);

    if let Some(path) = &args.export {
        crate::io::write_table_csv(path, &run.report)?;
    }
    Ok(())
}

fn handle_stats(args: StatsArgs) -> Result<(), AppError> {
    let source = item_source(&args.api)?;
    let run = pipeline::run_distribution(&source, &args.api.api_url, args.api.ignore_tls, args.filters())?;

    print!("{}", crate::report::format_distribution(&run.distribution));
    if !args.no_plot {
        println!();
        print!("{}", crate::plot::render_distribution_bars(&run.distribution, args.width));
    }
    if let Some(note) = &run.fetch_note {
        println!("{note}");
    }
    println!("{}", run.status);

    if let Some(path) = &args.export {
        crate::io::write_distribution_json(path, &run.distribution, &run.filters)?;
    }
    Ok(())
}

fn handle_calc(args: CalcArgs) -> Result<(), AppError> {
    let calc = crate::calc::calculate(&args.amount, &args.rate, &args.period);
    print!("{}", crate::report::format_calculation(&calc));
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let doc = crate::io::read_distribution_json(&args.stats)?;
    println!("Generated: {}", doc.generated_at.to_rfc3339());
    print!("{}", crate::plot::render_distribution_bars(&doc.distribution, args.width));
    Ok(())
}
