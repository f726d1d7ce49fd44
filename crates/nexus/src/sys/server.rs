use crate::debounce::HoverState;
use crate::events::{AppEvent, Request};
use crate::registry::SectorId;
use async_channel::Sender;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::oneshot;

pub const SOCKET_PATH: &str = "/tmp/nexus.sock";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {path}: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn or_none(id: Option<&SectorId>) -> String {
    id.map_or_else(|| "none".to_string(), ToString::to_string)
}

pub fn status_line(state: &HoverState) -> String {
    format!(
        "active={} hovered={}",
        or_none(state.active.as_ref()),
        or_none(state.hovered.as_ref())
    )
}

/// Binds the control socket, replacing a stale one left by a previous run.
pub fn bind(path: &Path) -> Result<UnixListener, ServerError> {
    if path.exists() {
        let _ = fs_err::remove_file(path);
    }
    UnixListener::bind(path).map_err(|source| ServerError::Bind {
        path: path.to_path_buf(),
        source,
    })
}

pub async fn run_server(listener: UnixListener, tx: Sender<AppEvent>) {
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, tx).await {
                        log::warn!("Connection closed: {}", e);
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn handle_connection(stream: UnixStream, tx: Sender<AppEvent>) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Request>() {
            Ok(Request::Hover(event)) => {
                if tx.send(AppEvent::Hover(event)).await.is_err() {
                    break;
                }
            }
            Ok(Request::Status) => {
                // Queued behind this connection's earlier commands.
                let (reply_tx, reply_rx) = oneshot::channel();
                if tx.send(AppEvent::Status(reply_tx)).await.is_err() {
                    break;
                }
                let Ok(state) = reply_rx.await else {
                    break;
                };
                let reply = status_line(&state);
                writer.write_all(format!("{reply}\n").as_bytes()).await?;
            }
            Err(e) => log::warn!("Ignoring '{}': {}", line.trim(), e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::HoverEvent;

    #[test]
    fn test_status_line() {
        let state = HoverState {
            hovered: None,
            active: Some(SectorId::new("aero")),
        };
        assert_eq!(status_line(&state), "active=aero hovered=none");
        assert_eq!(
            status_line(&HoverState::default()),
            "active=none hovered=none"
        );
    }

    #[tokio::test]
    async fn test_socket_forwards_events_and_answers_status() {
        let path = std::env::temp_dir().join(format!("nexus-test-{}.sock", std::process::id()));
        let listener = bind(&path).unwrap();
        let (tx, rx) = async_channel::unbounded();
        tokio::spawn(run_server(listener, tx));

        let stream = UnixStream::connect(&path).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        writer
            .write_all(b"enter neural\nbogus\nleave\nstatus\n")
            .await
            .unwrap();

        assert!(matches!(
            rx.recv().await.unwrap(),
            AppEvent::Hover(HoverEvent::Enter(id)) if id == SectorId::new("neural")
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            AppEvent::Hover(HoverEvent::Leave)
        ));
        // status arrives after the hover commands sent before it
        let AppEvent::Status(reply) = rx.recv().await.unwrap() else {
            panic!("expected a status request");
        };
        reply
            .send(HoverState {
                hovered: None,
                active: Some(SectorId::new("neural")),
            })
            .unwrap();

        let mut replies = BufReader::new(reader).lines();
        assert_eq!(
            replies.next_line().await.unwrap().as_deref(),
            Some("active=neural hovered=none")
        );

        let _ = fs_err::remove_file(&path);
    }
}
