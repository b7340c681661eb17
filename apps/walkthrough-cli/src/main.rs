mod script;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use walkthrough_kernel::{Session, WalkthroughConfig};

use crate::script::Script;

#[derive(Parser)]
#[command(name = "walkthrough-cli", about = "Inspect and simulate first-person walkthroughs")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Load and validate a walkthrough config (.yaml, .yml or .json)
    Validate {
        config: PathBuf,
    },
    /// List rooms and their doors
    Rooms {
        /// Config file; the built-in museum when omitted
        config: Option<PathBuf>,
    },
    /// Run a scripted input sequence headlessly
    Simulate {
        /// Config file; the built-in museum when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Script of input steps
        #[arg(short, long)]
        script: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<WalkthroughConfig> {
    match path {
        Some(path) => WalkthroughConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(WalkthroughConfig::museum()?),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("walkthrough-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", walkthrough_kernel::crate_info());
            let museum = WalkthroughConfig::museum()?;
            println!(
                "built-in museum: rooms={}, doors={}, start={}",
                museum.world.rooms.len(),
                museum.world.doors.len(),
                museum.world.start_room
            );
        }
        Commands::Validate { config } => {
            let loaded = load_config(Some(&config))?;
            println!(
                "{}: OK (rooms={}, doors={})",
                config.display(),
                loaded.world.rooms.len(),
                loaded.world.doors.len()
            );
        }
        Commands::Rooms { config } => {
            let loaded = load_config(config.as_deref())?;
            let world = &loaded.world;
            for room in &world.rooms {
                let marker = if room.id == world.start_room { " (start)" } else { "" };
                println!("{} - {}{marker}", room.id, room.name);
                if let Some(b) = room.bounds {
                    println!(
                        "  bounds: x {}..{}, z {}..{}",
                        b.min_x, b.max_x, b.min_z, b.max_z
                    );
                }
                for door in world.doors.iter().filter(|d| d.from_room == room.id) {
                    println!(
                        "  {} -> {} at {:?} r={} \"{}\"",
                        door.id, door.to_room, door.anchor, door.radius, door.label
                    );
                }
            }
        }
        Commands::Simulate { config, script } => {
            let loaded = load_config(config.as_deref())?;
            let script = Script::load(&script)?;
            let mut session = Session::new(loaded)?;

            let summaries = script.run(&mut session)?;
            for (i, step) in summaries.iter().enumerate() {
                println!(
                    "step {i}: room={} pos=({:.2}, {:.2}, {:.2}) speed={:.2}",
                    step.room, step.position.x, step.position.y, step.position.z, step.speed
                );
                for event in &step.events {
                    println!("  {event:?}");
                }
            }
            let stats = session.stats();
            println!(
                "frames={} failures={} blocked_axes={} transitions={} avg_dt={:.4}",
                stats.frames(),
                stats.failures(),
                stats.blocked_axes(),
                stats.transitions(),
                stats.average()
            );
        }
    }

    Ok(())
}
