use crate::config::{self, Config, ConfigError, TimingConfig};
use crate::debounce::{PanelChange, Scheduler};
use crate::events::AppEvent;
use crate::registry::{RegistryError, SectorRegistry};
use crate::render::{ThemeColors, render_ring};
use crate::session::Session;
use crate::sys::server::{self, ServerError};
use crate::sys::timer::TokioScheduler;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::signal::unix::{Signal, SignalKind, signal};

#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub socket: PathBuf,
    /// Rewritten whenever the hover state changes.
    pub output: Option<PathBuf>,
    /// Watched for changes; `None` disables hot reload.
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Runs the daemon on a single-threaded runtime until SIGINT or SIGTERM.
pub fn run(config: Config, options: DaemonOptions) -> Result<(), DaemonError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(serve(config, options))
}

async fn serve(config: Config, options: DaemonOptions) -> Result<(), DaemonError> {
    let registry = SectorRegistry::from_config(&config)?;
    let (tx, rx) = async_channel::bounded(64);

    let mut signals = ShutdownSignals::install()?;

    let listener = server::bind(&options.socket)?;
    tokio::spawn(server::run_server(listener, tx.clone()));
    log::info!("Listening on {}", options.socket.display());

    if let Some(path) = options.config_path.clone() {
        tokio::spawn(config::run_async_watcher(path, tx.clone()));
    }

    let mut session = Session::new(registry, config.timing, TokioScheduler::new(tx.clone()));
    let colors = ThemeColors::default();
    write_output(&session, options.output.as_deref(), &colors);

    loop {
        let event = tokio::select! {
            res = rx.recv() => match res {
                Ok(event) => event,
                Err(_) => break,
            },
            _ = signals.recv() => AppEvent::Shutdown,
        };

        match handle_event(&mut session, event, options.config_path.as_deref()) {
            Step::Changed => write_output(&session, options.output.as_deref(), &colors),
            Step::Unchanged => {}
            Step::Stop => break,
        }
    }

    let _ = fs_err::remove_file(&options.socket);
    log::info!("Shut down");
    Ok(())
}

/// SIGINT and SIGTERM, registered once up front. A signal that lands
/// while an event is being handled is kept until the next `recv`.
struct ShutdownSignals {
    interrupt: Signal,
    terminate: Signal,
}

impl ShutdownSignals {
    fn install() -> std::io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    async fn recv(&mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => {}
            _ = self.terminate.recv() => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Changed,
    Unchanged,
    Stop,
}

/// Applies one event. `Changed` means the hover state moved and the ring
/// needs redrawing.
fn handle_event<S: Scheduler>(
    session: &mut Session<S>,
    event: AppEvent,
    config_path: Option<&Path>,
) -> Step {
    let before = session.state().clone();
    let change = match event {
        AppEvent::Hover(event) => session.handle_hover(event),
        AppEvent::TimerFired(token) => session.handle_timer(token),
        AppEvent::ConfigReload => reload(session, config_path),
        AppEvent::Status(reply) => {
            let _ = reply.send(session.state().clone());
            None
        }
        AppEvent::Shutdown => return Step::Stop,
    };

    if let Some(change) = &change {
        log_change(change, session);
    }
    if *session.state() != before {
        Step::Changed
    } else {
        Step::Unchanged
    }
}

fn log_change<S: Scheduler>(change: &PanelChange, session: &Session<S>) {
    match &change.to {
        Some(id) => log::info!("Panel '{}' open on the {}", id, session.panel_side()),
        None => log::info!(
            "Panel '{}' closed",
            change.from.as_ref().map(|id| id.as_str()).unwrap_or_default()
        ),
    }
}

fn load_registry(path: Option<&Path>) -> Result<(SectorRegistry, TimingConfig), DaemonError> {
    let config = match path {
        Some(p) => config::load_config_from(p)?,
        None => config::load_config()?,
    };
    let registry = SectorRegistry::from_config(&config)?;
    Ok((registry, config.timing))
}

/// Keeps the current registry when the new config does not load.
fn reload<S: Scheduler>(session: &mut Session<S>, path: Option<&Path>) -> Option<PanelChange> {
    match load_registry(path) {
        Ok((registry, timing)) => {
            log::info!("Configuration reloaded ({} sectors)", registry.len());
            session.reload(registry, timing)
        }
        Err(e) => {
            log::error!("Failed to reload config, keeping the current one: {}", e);
            None
        }
    }
}

fn write_output<S: Scheduler>(session: &Session<S>, output: Option<&Path>, colors: &ThemeColors) {
    let Some(path) = output else {
        return;
    };
    let svg = match render_ring(session.registry(), &session.view(), colors) {
        Ok(svg) => svg,
        Err(e) => {
            log::error!("Rendering error: {}", e);
            return;
        }
    };
    if let Err(e) = fs_err::write(path, svg) {
        log::error!("{}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::{HoverState, ManualScheduler};
    use crate::events::HoverEvent;
    use crate::registry::SectorId;
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn session() -> Session<ManualScheduler> {
        let config = Config::builtin().unwrap();
        let registry = SectorRegistry::from_config(&config).unwrap();
        Session::new(registry, config.timing, ManualScheduler::default())
    }

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("nexus-runtime-{}", std::process::id()));
        fs_err::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    fn enter(id: &str) -> AppEvent {
        AppEvent::Hover(HoverEvent::Enter(SectorId::new(id)))
    }

    #[test]
    fn test_only_state_changes_redraw() {
        let mut session = session();
        assert_eq!(handle_event(&mut session, enter("neural"), None), Step::Changed);
        assert_eq!(handle_event(&mut session, enter("neural"), None), Step::Unchanged);
        assert_eq!(handle_event(&mut session, enter("bogus"), None), Step::Unchanged);
        // hovered moves at once, active only after the switch delay
        assert_eq!(handle_event(&mut session, enter("iso"), None), Step::Changed);
        assert_eq!(session.state().active, Some(SectorId::new("neural")));
        assert_eq!(handle_event(&mut session, AppEvent::Shutdown, None), Step::Stop);
    }

    #[test]
    fn test_status_reflects_earlier_events() {
        let mut session = session();
        handle_event(&mut session, enter("aero"), None);

        let (tx, mut rx) = oneshot::channel();
        assert_eq!(
            handle_event(&mut session, AppEvent::Status(tx), None),
            Step::Unchanged
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            HoverState {
                hovered: Some(SectorId::new("aero")),
                active: Some(SectorId::new("aero")),
            }
        );
    }

    #[test]
    fn test_invalid_reload_keeps_registry() {
        let mut session = session();
        handle_event(&mut session, enter("neural"), None);

        let path = scratch("overlapping.toml");
        fs_err::write(&path, "[ring]\nspan = 90.0\n").unwrap();
        let step = handle_event(&mut session, AppEvent::ConfigReload, Some(&path));

        assert_eq!(step, Step::Unchanged);
        assert_eq!(session.registry().len(), 6);
        assert_eq!(session.registry().ring().span, 56.0);
        assert_eq!(session.state().active, Some(SectorId::new("neural")));
        let _ = fs_err::remove_file(&path);
    }

    #[test]
    fn test_reload_applies_new_sectors() {
        let mut session = session();
        handle_event(&mut session, enter("neural"), None);

        let path = scratch("single.toml");
        fs_err::write(
            &path,
            r#"
left_panel = ["aero"]

[[sectors]]
id = "aero"
label = "AERO"
subtitle = "Only one"
description = "The single sector."
start_angle = 0.0
"#,
        )
        .unwrap();
        let step = handle_event(&mut session, AppEvent::ConfigReload, Some(&path));

        assert_eq!(step, Step::Changed);
        assert_eq!(session.registry().len(), 1);
        assert_eq!(session.state(), &HoverState::default());
        let _ = fs_err::remove_file(&path);
    }

    #[test]
    fn test_write_output_renders_current_view() {
        let mut session = session();
        handle_event(&mut session, enter("vector"), None);

        let path = scratch("ring.svg");
        write_output(&session, Some(&path), &ThemeColors::default());
        let svg = fs_err::read_to_string(&path).unwrap();
        assert!(svg.contains(r#"class="panel-left""#));
        let _ = fs_err::remove_file(&path);
    }

    #[tokio::test]
    async fn test_signal_before_recv_is_not_lost() {
        let mut signals = ShutdownSignals::install().unwrap();
        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        // nothing was waiting when the signal arrived
        tokio::time::timeout(Duration::from_secs(5), signals.recv())
            .await
            .unwrap();
    }
}
