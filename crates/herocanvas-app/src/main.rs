//! Command-line entry point.

use clap::Parser;
use herocanvas_app::{Cli, run};

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };

    log::info!("Starting HeroCanvas");
    match run(&config) {
        Ok(summary) => {
            log::info!(
                "Exported {} ({}x{}, {} sprites)",
                summary.export_path.display(),
                summary.export_width,
                summary.export_height,
                summary.sprites
            );
            println!("{}", summary.export_path.display());
        }
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    }
}
