use anyhow::Context;
use clap::{Parser, Subcommand};
use nexus::config::{self, Config};
use nexus::events::Request;
use nexus::registry::{SectorId, SectorRegistry};
use nexus::render::{MenuView, ThemeColors, render_ring};
use nexus::replay::{self, Script};
use nexus::sys::runtime::{self, DaemonOptions};
use nexus::sys::server::SOCKET_PATH;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "nexus", version, about = "Radial sector menu core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file to use instead of the per-user one
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Render the ring as SVG.
    Render {
        /// Sector under the pointer
        #[arg(long)]
        hovered: Option<String>,
        /// Sector whose panel is shown
        #[arg(long)]
        active: Option<String>,
        /// Write to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Play a timed hover script and print every panel change.
    Replay { script: PathBuf },
    /// Run the hover daemon.
    Run {
        #[arg(long, default_value = SOCKET_PATH)]
        socket: PathBuf,
        /// Re-render the ring here on every state change
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Send one command line to a running daemon (e.g. `send enter neural`).
    Send {
        #[arg(long, default_value = SOCKET_PATH)]
        socket: PathBuf,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Write the default config file if none exists.
    Init,
    /// List the configured sectors.
    Sectors,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Send { socket, words } => send_command(&socket, &words),
        Commands::Render {
            hovered,
            active,
            output,
        } => {
            let registry = load_registry(cli.config.as_deref())?;
            render(&registry, hovered, active, output.as_deref())
        }
        Commands::Replay { script } => {
            let config = config::load_or_default(cli.config.as_deref())?;
            let registry = SectorRegistry::from_config(&config)?;
            let text = fs_err::read_to_string(&script)?;
            let script = Script::parse(&text)
                .with_context(|| format!("Invalid script {}", script.display()))?;
            for entry in replay::run(&script, registry, config.timing) {
                println!("{entry}");
            }
            Ok(())
        }
        Commands::Sectors => {
            let config = config::load_or_default(cli.config.as_deref())?;
            let registry = SectorRegistry::from_config(&config)?;
            for (sector, wedge) in registry.iter() {
                println!(
                    "{:<8} {:>5}..{:<5} {:<5} {}",
                    sector.id,
                    wedge.start(),
                    wedge.end(),
                    registry.panel_side(&sector.id),
                    sector.label
                );
            }
            Ok(())
        }
        Commands::Run { socket, output } => {
            let config_path = match &cli.config {
                Some(p) => Some(p.clone()),
                None => config::get_config_path().ok(),
            };
            let config = config::load_or_default(config_path.as_deref())?;
            runtime::run(
                config,
                DaemonOptions {
                    socket,
                    output,
                    config_path,
                },
            )?;
            Ok(())
        }
    }
}

fn load_registry(path: Option<&Path>) -> anyhow::Result<SectorRegistry> {
    let config: Config = config::load_or_default(path)?;
    Ok(SectorRegistry::from_config(&config)?)
}

fn known(registry: &SectorRegistry, id: Option<String>) -> anyhow::Result<Option<SectorId>> {
    match id.map(SectorId::new) {
        Some(id) if !registry.contains(&id) => anyhow::bail!("Unknown sector '{}'", id),
        other => Ok(other),
    }
}

fn render(
    registry: &SectorRegistry,
    hovered: Option<String>,
    active: Option<String>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let hovered = known(registry, hovered)?;
    let active = known(registry, active)?;
    let view = MenuView::new(hovered.as_ref(), active.as_ref());
    let svg = render_ring(registry, &view, &ThemeColors::default())?;

    match output {
        Some(path) => fs_err::write(path, svg)?,
        None => print!("{svg}"),
    }
    Ok(())
}

fn send_command(socket: &Path, words: &[String]) -> anyhow::Result<()> {
    // Parsed locally before connecting.
    let request = Request::from_words(words)?;
    let mut stream = UnixStream::connect(socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to nexus daemon at {}: {}. Is nexus running?",
            socket.display(),
            e
        )
    })?;

    writeln!(stream, "{}", shell_words::join(words))?;
    if request == Request::Status {
        let mut reply = String::new();
        BufReader::new(&stream).read_line(&mut reply)?;
        print!("{reply}");
    }
    Ok(())
}
