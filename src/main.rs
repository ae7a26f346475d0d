use clap::Parser;
use std::path::PathBuf;

/// Interactive circle layout checker.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON catalog to load at startup
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Start with light visuals
    #[arg(long)]
    light: bool,
}

fn main() -> Result<(), eframe::Error> {
    // Set up logging; RUST_LOG controls the level
    env_logger::init();
    let args = Args::parse();

    // File dialogs and catalog I/O run as tasks on this runtime
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            log::error!("Failed to start the async runtime: {err}");
            std::process::exit(1);
        }
    };
    let _guard = runtime.enter();

    circle_fit::run_app(circle_fit::LaunchOptions {
        catalog: args.catalog,
        light_mode: args.light,
    })
}
