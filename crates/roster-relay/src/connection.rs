//! Per-connection handler: read the join, register in the room, then forward
//! frames to the other members.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use roster_config::RelayConfig;
use roster_presence::{RelayHello, RelayReply};

use crate::protocol::{check_join, wrap_frame};
use crate::room::RoomRegistry;

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;
type WsSource = SplitStream<WebSocketStream<TcpStream>>;

/// Handle a single WebSocket connection.
pub async fn handle_connection(
    ws: WebSocketStream<TcpStream>,
    addr: SocketAddr,
    rooms: RoomRegistry,
    config: RelayConfig,
) {
    let (mut sink, mut stream) = ws.split();

    // 1. Read the join request.
    let hello_timeout = Duration::from_secs(u64::from(config.hello_timeout_secs));
    let joined = read_hello(&mut stream, addr, hello_timeout)
        .await
        .and_then(|(room, identity)| check_join(&room, &identity).map(|()| (room, identity)));
    let (room, identity) = match joined {
        Ok(v) => v,
        Err(message) => {
            tracing::warn!(peer = %addr, reason = %message, "Join rejected");
            let _ = send_reply(&mut sink, &RelayReply::Error { message }).await;
            return;
        }
    };

    // 2. Register our queue in the room.
    let (tx, mut rx) = mpsc::channel::<String>(config.queue_capacity as usize);
    let id = rooms.join(&room, &identity, tx).await;

    let members = rooms.member_count(&room).await;
    tracing::info!(
        peer = %addr,
        room = %room,
        identity = %identity,
        members = members,
        "Client joined"
    );

    if send_reply(&mut sink, &RelayReply::Joined { room: room.clone() })
        .await
        .is_err()
    {
        rooms.leave(&room, id).await;
        return;
    }

    // 3. Forwarding loop.
    loop {
        tokio::select! {
            Some(frame) = rx.recv() => {
                if sink.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match wrap_frame(&identity, &text) {
                        Ok(wrapped) => {
                            let delivered = rooms.broadcast(&room, id, &wrapped).await;
                            tracing::trace!(room = %room, identity = %identity, delivered, "Frame relayed");
                        }
                        Err(e) => {
                            tracing::debug!(peer = %addr, error = %e, "Dropping malformed frame");
                        }
                    },
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    // 4. Cleanup. Other members notice the departure through the client's
    // disconnect beacon or, failing that, the state timeout.
    rooms.leave(&room, id).await;
    tracing::info!(peer = %addr, room = %room, identity = %identity, "Client left");
}

/// Read and parse the first frame as a join request.
async fn read_hello(
    stream: &mut WsSource,
    addr: SocketAddr,
    timeout: Duration,
) -> Result<(String, String), String> {
    let frame = tokio::time::timeout(timeout, stream.next()).await;

    match frame {
        Ok(Some(Ok(Message::Text(text)))) => match serde_json::from_str::<RelayHello>(&text) {
            Ok(RelayHello::Join { room, identity }) => Ok((room, identity)),
            Err(e) => Err(format!("invalid join message: {e}")),
        },
        Ok(Some(Ok(_))) => Err("expected a text join frame".into()),
        Ok(Some(Err(e))) => Err(format!("connection error during join: {e}")),
        Ok(None) => {
            tracing::debug!(peer = %addr, "Connection closed before join");
            Err("connection closed before join".into())
        }
        Err(_) => Err(format!("no join received within {}s", timeout.as_secs())),
    }
}

/// Send a handshake reply as a JSON text frame.
async fn send_reply(
    sink: &mut WsSink,
    reply: &RelayReply,
) -> Result<(), tokio_tungstenite::tungstenite::Error> {
    let json = serde_json::to_string(reply)
        .map_err(|e| tokio_tungstenite::tungstenite::Error::Io(std::io::Error::other(e)))?;
    sink.send(Message::Text(json.into())).await
}
