use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use emberhook::config::LoaderConfig;
use emberhook::injector::collect_preloads;
use emberhook::logging::init_logging;
use emberhook::payload::PayloadWriter;

#[derive(Parser)]
#[command(
    name = "emberhook",
    about = "Inspect and toggle emberhook script injection",
    version
)]
struct Cli {
    /// Path to the loader config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory to operate on (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the layout, cached bundle state and preload run order
    Status,
    /// Drop the disabled marker so nothing is injected
    Disable,
    /// Remove the disabled marker
    Enable,
    /// Print the payload script that would be injected
    Payload,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LoaderConfig::load(path)?,
        None => LoaderConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = Some(data_dir);
    }

    let paths = config.paths();
    let log_dir = config.file_logging.then(|| paths.log_dir());
    let _guard = init_logging("cli", log_dir.as_deref())?;

    match cli.command {
        Command::Status => {
            let main_script = paths.main_script();
            println!("data dir:      {}", paths.data_dir().display());
            println!("preloads dir:  {}", paths.preloads_dir().display());
            println!(
                "main script:   {} ({})",
                main_script.display(),
                if main_script.exists() {
                    "present"
                } else {
                    "absent, fallback bundle would be used"
                }
            );
            println!(
                "injection:     {}",
                if paths.disabled_marker().exists() {
                    "disabled by marker"
                } else {
                    "enabled"
                }
            );

            let preloads = collect_preloads(&paths.preloads_dir());
            if preloads.is_empty() {
                println!("preloads:      none");
            } else {
                println!("preloads (in run order):");
                for script in preloads {
                    println!("  {}", script.display());
                }
            }
        }
        Command::Disable => {
            paths.ensure_layout()?;
            let marker = paths.disabled_marker();
            fs::write(&marker, "")
                .with_context(|| format!("failed to create marker {}", marker.display()))?;
            println!("Injection disabled ({})", marker.display());
        }
        Command::Enable => {
            let marker = paths.disabled_marker();
            if marker.exists() {
                fs::remove_file(&marker)
                    .with_context(|| format!("failed to remove marker {}", marker.display()))?;
                println!("Injection enabled");
            } else {
                println!("Injection already enabled");
            }
        }
        Command::Payload => {
            let writer = PayloadWriter::new(Vec::new());
            println!("{}", writer.render_script());
        }
    }

    Ok(())
}
