//! WebSocket server: serves the page, streams view events, accepts commands.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::tungstenite::Message;

use super::backend::BroadcastSink;
use crate::core::constants::WEB_COMMAND_CAPACITY;
use crate::fishing::logic::FishingGame;
use crate::fishing::types::Difficulty;

/// A control sent by a browser client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ClientCommand {
    Start,
    Restart,
    Difficulty { level: Difficulty },
}

pub fn parse_command(json: &str) -> Option<ClientCommand> {
    serde_json::from_str(json).ok()
}

/// Serves the game on `port` until the process exits.
pub async fn serve(game: FishingGame<BroadcastSink>, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("web server listening on http://localhost:{}", port);

    let (command_tx, mut command_rx) = mpsc::channel(WEB_COMMAND_CAPACITY);
    let sink = Arc::clone(game.sink());
    tokio::spawn(accept_loop(listener, sink, command_tx));

    while let Some(command) = command_rx.recv().await {
        apply_command(&game, command);
    }
    Ok(())
}

fn apply_command(game: &FishingGame<BroadcastSink>, command: ClientCommand) {
    tracing::debug!(?command, "client command");
    match command {
        ClientCommand::Start => {
            let game = game.clone();
            tokio::spawn(async move {
                // Failures are logged inside the round.
                let _ = game.start_round().await;
            });
        }
        ClientCommand::Restart => {
            if let Err(e) = game.restart() {
                tracing::warn!(error = %e, "restart failed");
            }
        }
        ClientCommand::Difficulty { level } => {
            if let Err(e) = game.select_difficulty(level) {
                tracing::warn!(error = %e, "difficulty selection failed");
            }
        }
    }
}

async fn accept_loop(
    listener: TcpListener,
    sink: Arc<BroadcastSink>,
    commands: mpsc::Sender<ClientCommand>,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let sink = Arc::clone(&sink);
                let commands = commands.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, addr, sink, commands).await {
                        tracing::warn!(%addr, error = %e, "connection error");
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "accept error");
            }
        }
    }
}

/// Handle a single HTTP or WebSocket connection
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    sink: Arc<BroadcastSink>,
    commands: mpsc::Sender<ClientCommand>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Plain GET without an upgrade gets the page
    let mut peek_buf = [0u8; 512];
    let n = stream.peek(&mut peek_buf).await?;
    let request = String::from_utf8_lossy(&peek_buf[..n]);
    if request.starts_with("GET / ") && !request.contains("Upgrade: websocket") {
        serve_html(stream).await?;
        return Ok(());
    }

    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    tracing::info!(%addr, "browser connected");

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (replay, mut events) = sink.subscribe();

    let send_task = tokio::spawn(async move {
        for json in replay {
            if ws_sender.send(Message::Text(json)).await.is_err() {
                return;
            }
        }
        loop {
            match events.recv().await {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "client lagging behind");
                    continue;
                }
            }
        }
    });

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match parse_command(&text) {
                Some(command) => {
                    if commands.send(command).await.is_err() {
                        break;
                    }
                }
                None => tracing::debug!(%text, "ignoring unknown message"),
            },
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => {}
        }
    }

    send_task.abort();
    tracing::info!(%addr, "browser disconnected");
    Ok(())
}

/// Serve the game page
async fn serve_html(mut stream: TcpStream) -> std::io::Result<()> {
    use tokio::io::AsyncWriteExt;

    let html = include_str!("../../web/index.html");
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        html.len(),
        html
    );

    stream.write_all(response.as_bytes()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command(r#"{"action":"start"}"#), Some(ClientCommand::Start));
        assert_eq!(
            parse_command(r#"{"action":"restart"}"#),
            Some(ClientCommand::Restart)
        );
        assert_eq!(
            parse_command(r#"{"action":"difficulty","level":"hard"}"#),
            Some(ClientCommand::Difficulty {
                level: Difficulty::Hard
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_input() {
        assert_eq!(parse_command(r#"{"action":"dance"}"#), None);
        assert_eq!(
            parse_command(r#"{"action":"difficulty","level":"extreme"}"#),
            None
        );
        assert_eq!(parse_command("start"), None);
    }
}
