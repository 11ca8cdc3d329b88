use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::Parser;
use log::{error, info, warn};

use anvio_launch::browser::SystemBrowser;
use anvio_launch::docker::DockerCli;
use anvio_launch::resolve::PairingRule;
use anvio_launch::{Context, Controller, Outcome, config, logging, ui};

#[derive(Parser)]
#[command(name = "anvio-launch", version)]
#[command(about = "Open an anvi'o pangenome in the browser, served from a Docker container")]
struct Args {
    /// Docker image to run [default: meren/anvio:5.5, or `image` from .anvio-launch.yaml]
    #[arg(long, value_name = "IMAGE")]
    image: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;

    let mut cfg = config::load(&cwd)?;
    if let Some(image) = args.image {
        cfg.image = image;
    }
    config::validate(&cfg)?;

    let interactive = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
    let ctx = Context::new(cfg, interactive);
    ctx.install_signal_handler()?;
    if interactive {
        ui::install_panic_hook();
    }

    info!("Finding input files");
    let selection = select_database(&ctx, &cwd)?;

    let engine = DockerCli::new(ctx.config.engine.clone());
    let mut controller = Controller::new(&ctx, &engine, &SystemBrowser);

    match controller.run(selection.as_deref()) {
        Ok(Outcome::Finished) => {
            info!("Server stopped");
            Ok(ExitCode::SUCCESS)
        }
        Ok(Outcome::Cancelled) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            error!("{err}");
            if ctx.interactive
                && let Err(e) = ui::acknowledge(err.title(), &err.to_string())
            {
                warn!("Could not show the error dialog: {e:#}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

/// The configured database, or whatever the user picks interactively.
fn select_database(ctx: &Context, cwd: &std::path::Path) -> Result<Option<PathBuf>> {
    if let Some(db) = &ctx.config.database {
        return Ok(Some(cwd.join(db)));
    }
    if !ctx.interactive {
        warn!(
            "No terminal to show the file picker; set `database` in {}",
            config::CONFIG_FILE
        );
        return Ok(None);
    }
    ui::pick_database(cwd, PairingRule::from_config(&ctx.config))
}
