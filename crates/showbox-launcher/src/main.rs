mod roots;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use showbox_engine::logging::{LoggingConfig, init_logging};
use showbox_engine::window::WindowMode;
use showbox_host::{HostConfig, Loader, Registry};

#[derive(Parser, Debug)]
#[command(name = "showbox")]
#[command(about = "Browse and run demo scripts, one at a time")]
struct Cli {
    /// Open a borderless full-screen window.
    #[arg(long)]
    fullscreen: bool,
    /// Demo root; searched for upwards from the working directory when omitted.
    #[arg(long, env = "SHOWBOX_DEMOS")]
    demos: Option<PathBuf>,
    /// Discovery pattern; `{a,b}` alternatives are allowed.
    #[arg(long)]
    pattern: Option<String>,
    /// Start with this example (type name or file stem) instead of the welcome one.
    #[arg(long)]
    start: Option<String>,
    /// Print the discovered examples and features, then exit.
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let pattern = match cli.pattern {
        Some(p) => p,
        None => roots::default_pattern(&roots::find_demo_root(cli.demos.as_deref())?),
    };

    let mut registry = Registry::new();
    let report = Loader::new(&mut registry).discover_and_load(&pattern);
    log::info!("{pattern}: {report}");

    if cli.list {
        print_catalog(&registry);
        return Ok(());
    }

    let config = HostConfig::default().start(cli.start).fullscreen(cli.fullscreen);
    let mode = if cli.fullscreen { WindowMode::Fullscreen } else { WindowMode::Windowed };
    showbox_host::run(registry, config, mode)
}

fn print_catalog(registry: &Registry) {
    println!("examples:");
    for d in registry.list_examples() {
        println!("  {:<24} {}", d.type_name(), d.origin().display());
    }
    println!("features:");
    for d in registry.list_features() {
        println!("  {:<24} {}", d.type_name(), d.origin().display());
    }
}
