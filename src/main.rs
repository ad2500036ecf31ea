//! pressify - turn a static site into a minimal WordPress theme.

mod cli;
mod config;
mod convert;
mod hooks;
mod image;
mod logger;
mod template;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Convert { args } => cli::convert::run_convert(args).map(|()| ExitCode::SUCCESS),
        Commands::Render { args } => cli::render::run_render(args).map(|()| ExitCode::SUCCESS),
        Commands::Resize { args } => cli::images::run_resize(args),
        Commands::Webp { args } => cli::images::run_webp(args).map(|()| ExitCode::SUCCESS),
    }
}
